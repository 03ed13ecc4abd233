//! Message resolution and ICU-style message formatting.
//!
//! A [`MessageResolver`] turns a message id (and an optional default template)
//! into a [`Message`]. `Message::format` supports the commonly used subset of
//! ICU MessageFormat:
//!
//! - `{name}` plain arguments
//! - `{n, number}`, `{n, number, percent}`, `{n, number, integer}`
//! - `{d, date}` / `{d, time}` with `short`, `medium`, `long` and `full` styles
//! - `{x, select, a {...} other {...}}`
//! - `{n, plural, =0 {...} one {# item} other {# items}}`, including `offset:`
//! - apostrophe quoting: `''` is a quote and `'{...}'` is literal text

use crate::dates;
use crate::types::Value;
use crate::util::{self, format_number};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MessageError {
    #[error("The intl string context variable \"{name}\" was not provided to the string \"{template}\"")]
    MissingValue { name: String, template: String },

    #[error("Invalid message \"{template}\": {message}")]
    Syntax { message: String, template: String },

    #[error("No \"other\" case for \"{name}\" in \"{template}\"")]
    MissingOther { name: String, template: String },
}

/// Resolves messages for `string.format` and `translate`.
pub trait MessageResolver: Send + Sync {
    /// Looks up `id`, falling back to `default_message`. Unknown messages
    /// resolve to an empty template.
    fn get_message(&self, id: Option<&str>, default_message: Option<&str>) -> Message;
}

/// A static catalog of message templates for one locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageCatalog {
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new(locale: impl Into<String>) -> Self {
        MessageCatalog {
            locale: locale.into(),
            messages: HashMap::new(),
        }
    }

    pub fn with_message(mut self, id: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(id.into(), template.into());
        self
    }
}

impl MessageResolver for MessageCatalog {
    fn get_message(&self, id: Option<&str>, default_message: Option<&str>) -> Message {
        let template = id
            .and_then(|id| self.messages.get(id))
            .map(String::as_str)
            .or(default_message)
            .unwrap_or_default();
        Message::new(template, &self.locale)
    }
}

/// A resolved message template ready to be formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    template: String,
    locale: String,
}

impl Message {
    pub fn new(template: &str, locale: &str) -> Self {
        Message {
            template: template.to_string(),
            locale: locale.to_string(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Formats the message, substituting `values`.
    ///
    /// Fails if the template is malformed or references an argument that is
    /// not present in `values`.
    pub fn format(&self, values: Option<&IndexMap<String, Value>>) -> Result<String, MessageError> {
        let parts = Parser::new(&self.template).parse()?;
        let mut out = String::new();
        self.render(&parts, values, None, &mut out)?;
        Ok(out)
    }

    fn lookup<'v>(
        &self,
        name: &str,
        values: Option<&'v IndexMap<String, Value>>,
    ) -> Result<&'v Value, MessageError> {
        values
            .and_then(|v| v.get(name))
            .ok_or_else(|| MessageError::MissingValue {
                name: name.to_string(),
                template: self.template.clone(),
            })
    }

    fn render(
        &self,
        parts: &[Part],
        values: Option<&IndexMap<String, Value>>,
        pound: Option<f64>,
        out: &mut String,
    ) -> Result<(), MessageError> {
        for part in parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Pound => match pound {
                    Some(n) => out.push_str(&format_number(n)),
                    None => out.push('#'),
                },
                Part::Arg(name) => {
                    let value = self.lookup(name, values)?;
                    if !value.is_undefined() {
                        out.push_str(&util::str_val(value));
                    }
                }
                Part::Number { name, style } => {
                    let n = util::num(self.lookup(name, values)?);
                    out.push_str(&format_styled_number(n, style.as_deref()));
                }
                Part::Date { name, style, time } => {
                    let value = self.lookup(name, values)?;
                    match dates::to_date(value) {
                        Some(date) => {
                            let fmt = date_style(style.as_deref(), *time);
                            out.push_str(&date.format(fmt).to_string());
                        }
                        None => out.push_str(&util::str_val(value)),
                    }
                }
                Part::Select { name, cases } => {
                    let key = util::str_val(self.lookup(name, values)?);
                    let case = cases
                        .iter()
                        .find(|(selector, _)| *selector == key)
                        .or_else(|| cases.iter().find(|(selector, _)| selector == "other"))
                        .ok_or_else(|| self.missing_other(name))?;
                    self.render(&case.1, values, pound, out)?;
                }
                Part::Plural { name, offset, cases } => {
                    let n = util::num(self.lookup(name, values)?);
                    let exact = format!("={}", format_number(n));
                    let category = plural_category(&self.locale, n - offset);
                    let case = cases
                        .iter()
                        .find(|(selector, _)| *selector == exact)
                        .or_else(|| cases.iter().find(|(selector, _)| selector == category))
                        .or_else(|| cases.iter().find(|(selector, _)| selector == "other"))
                        .ok_or_else(|| self.missing_other(name))?;
                    self.render(&case.1, values, Some(n - offset), out)?;
                }
            }
        }
        Ok(())
    }

    fn missing_other(&self, name: &str) -> MessageError {
        MessageError::MissingOther {
            name: name.to_string(),
            template: self.template.clone(),
        }
    }
}

fn format_styled_number(n: f64, style: Option<&str>) -> String {
    match style {
        Some("percent") => format!("{}%", format_number((n * 100.0).round())),
        Some("integer") => format_number(n.round()),
        _ => format_number(n),
    }
}

fn date_style(style: Option<&str>, time: bool) -> &'static str {
    match (time, style) {
        (false, Some("short")) => "%-m/%-d/%y",
        (false, Some("long")) => "%B %-d, %Y",
        (false, Some("full")) => "%A, %B %-d, %Y",
        (false, _) => "%b %-d, %Y",
        (true, Some("short")) => "%-I:%M %p",
        (true, _) => "%-I:%M:%S %p",
    }
}

/// CLDR cardinal category. Only the `one`/`other` split is distinguished;
/// locales without a singular form always select `other`.
fn plural_category(locale: &str, n: f64) -> &'static str {
    let language = locale.split(['-', '_']).next().unwrap_or_default();
    if matches!(language, "ja" | "ko" | "zh" | "th" | "vi" | "id") {
        return "other";
    }
    if n.abs() == 1.0 {
        "one"
    } else {
        "other"
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Text(String),
    Pound,
    Arg(String),
    Number { name: String, style: Option<String> },
    Date { name: String, style: Option<String>, time: bool },
    Select { name: String, cases: Vec<(String, Vec<Part>)> },
    Plural { name: String, offset: f64, cases: Vec<(String, Vec<Part>)> },
}

struct Parser<'a> {
    template: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(template: &'a str) -> Self {
        Parser {
            template,
            chars: template.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Vec<Part>, MessageError> {
        let parts = self.parse_message(false, false)?;
        if self.pos < self.chars.len() {
            return Err(self.error("unexpected \"}\""));
        }
        Ok(parts)
    }

    fn error(&self, message: &str) -> MessageError {
        MessageError::Syntax {
            message: format!("{message} at position {}", self.pos),
            template: self.template.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<(), MessageError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected \"{c}\"")))
        }
    }

    /// Parses text and arguments up to an unmatched `}` (when `nested`) or
    /// the end of input.
    fn parse_message(&mut self, nested: bool, in_plural: bool) -> Result<Vec<Part>, MessageError> {
        let mut parts = Vec::new();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                '}' => break,
                '{' => {
                    if !text.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut text)));
                    }
                    parts.push(self.parse_argument()?);
                }
                '#' if in_plural => {
                    if !text.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut text)));
                    }
                    parts.push(Part::Pound);
                    self.pos += 1;
                }
                '\'' => self.parse_quote(in_plural, &mut text),
                _ => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }
        if nested && self.peek() != Some('}') {
            return Err(self.error("unclosed \"{\""));
        }
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }
        Ok(parts)
    }

    fn parse_quote(&mut self, in_plural: bool, text: &mut String) {
        self.pos += 1;
        match self.peek() {
            Some('\'') => {
                text.push('\'');
                self.pos += 1;
            }
            Some(c) if c == '{' || c == '}' || (in_plural && c == '#') => {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == '\'' {
                        if self.peek() == Some('\'') {
                            text.push('\'');
                            self.pos += 1;
                        } else {
                            return;
                        }
                    } else {
                        text.push(c);
                    }
                }
            }
            _ => text.push('\''),
        }
    }

    fn parse_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | ',') {
                break;
            }
            word.push(c);
            self.pos += 1;
        }
        word
    }

    fn parse_argument(&mut self) -> Result<Part, MessageError> {
        self.expect('{')?;
        self.skip_ws();
        let name = self.parse_word();
        if name.is_empty() {
            return Err(self.error("expected argument name"));
        }
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Part::Arg(name));
        }
        self.expect(',')?;
        self.skip_ws();
        let kind = self.parse_word();
        self.skip_ws();
        let part = match kind.as_str() {
            "number" | "date" | "time" => {
                let style = if self.peek() == Some(',') {
                    self.pos += 1;
                    self.skip_ws();
                    let style = self.parse_word();
                    self.skip_ws();
                    Some(style)
                } else {
                    None
                };
                if kind == "number" {
                    Part::Number { name, style }
                } else {
                    Part::Date {
                        name,
                        style,
                        time: kind == "time",
                    }
                }
            }
            "select" => {
                self.expect(',')?;
                let cases = self.parse_cases(false)?;
                Part::Select { name, cases }
            }
            "plural" | "selectordinal" => {
                self.expect(',')?;
                self.skip_ws();
                let mut offset = 0.0;
                if self.chars[self.pos..].starts_with(&['o', 'f', 'f', 's', 'e', 't', ':']) {
                    self.pos += 7;
                    self.skip_ws();
                    let word = self.parse_word();
                    offset = word
                        .parse()
                        .map_err(|_| self.error(&format!("invalid offset \"{word}\"")))?;
                }
                let cases = self.parse_cases(true)?;
                Part::Plural { name, offset, cases }
            }
            other => return Err(self.error(&format!("unknown argument type \"{other}\""))),
        };
        self.skip_ws();
        self.expect('}')?;
        Ok(part)
    }

    fn parse_cases(&mut self, in_plural: bool) -> Result<Vec<(String, Vec<Part>)>, MessageError> {
        let mut cases = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') || self.peek().is_none() {
                break;
            }
            let selector = self.parse_word();
            if selector.is_empty() {
                return Err(self.error("expected selector"));
            }
            self.skip_ws();
            self.expect('{')?;
            let body = self.parse_message(true, in_plural)?;
            self.expect('}')?;
            cases.push((selector, body));
        }
        if cases.is_empty() {
            return Err(self.error("expected at least one case"));
        }
        Ok(cases)
    }
}
