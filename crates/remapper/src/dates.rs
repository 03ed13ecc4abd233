//! Date parsing and formatting for the `date.*` operations.
//!
//! Format strings use Unicode date field tokens (`yyyy-MM-dd HH:mm`), which are
//! translated once into chrono's strftime items when the remapper is parsed.

use crate::types::Value;
use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A translated date format.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFormat {
    source: String,
    strftime: String,
    has_date: bool,
}

impl DateFormat {
    /// Translates `source` into a strftime pattern.
    ///
    /// Fails on an unknown, unquoted letter token or an unterminated quote.
    pub fn new(source: &str) -> Result<Self, String> {
        let (strftime, has_date) = translate(source)?;
        Ok(DateFormat {
            source: source.to_string(),
            strftime,
            has_date,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn format(&self, date: &DateTime<Utc>) -> String {
        date.format(&self.strftime).to_string()
    }

    /// Parses `input`. Missing date fields default to 1970-01-01 and missing
    /// time fields to midnight; the result is read as UTC.
    pub fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, input, StrftimeItems::new(&self.strftime)).ok()?;
        if let Ok(dt) = parsed.to_datetime() {
            return Some(dt.with_timezone(&Utc));
        }
        let date = if self.has_date {
            parsed.to_naive_date().ok()?
        } else {
            NaiveDate::from_ymd_opt(1970, 1, 1)?
        };
        let time = parsed
            .to_naive_time()
            .ok()
            .or_else(|| NaiveTime::from_hms_opt(0, 0, 0))?;
        Some(NaiveDateTime::new(date, time).and_utc())
    }
}

fn token(letter: char, count: usize) -> Option<&'static str> {
    let spec = match (letter, count) {
        ('y', 4) => "%Y",
        ('y', 2) => "%y",
        ('M', 4) => "%B",
        ('M', 3) => "%b",
        ('M', 2) => "%m",
        ('M', 1) => "%-m",
        ('d', 2) => "%d",
        ('d', 1) => "%-d",
        ('E', 4) => "%A",
        ('E', 1..=3) => "%a",
        ('H', 2) => "%H",
        ('H', 1) => "%-H",
        ('h', 2) => "%I",
        ('h', 1) => "%-I",
        ('m', 2) => "%M",
        ('m', 1) => "%-M",
        ('s', 2) => "%S",
        ('s', 1) => "%-S",
        ('S', 3) => "%3f",
        ('a', 1..=3) => "%p",
        ('X', 3) => "%:z",
        ('X', 1 | 2) => "%z",
        _ => return None,
    };
    Some(spec)
}

/// Returns the strftime pattern and whether it names any date field.
fn translate(source: &str) -> Result<(String, bool), String> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::new();
    let mut has_date = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            // '' is a literal quote; 'text' is literal text.
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => return Err(format!("unterminated quote in \"{source}\"")),
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        out.push('\'');
                        j += 2;
                    }
                    Some('\'') => break,
                    Some('%') => {
                        out.push_str("%%");
                        j += 1;
                    }
                    Some(other) => {
                        out.push(*other);
                        j += 1;
                    }
                }
            }
            i = j + 1;
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i] == c {
                i += 1;
            }
            let spec = token(c, i - start)
                .ok_or_else(|| format!("unsupported token \"{}\" in \"{source}\"", c.to_string().repeat(i - start)))?;
            has_date |= matches!(c, 'y' | 'M' | 'd' | 'E');
            out.push_str(spec);
        } else {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
            i += 1;
        }
    }
    Ok((out, has_date))
}

/// Parses an ISO-8601 date or date-time. Date-times without an offset are UTC.
pub fn parse_iso(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Reads a date from a date value, epoch milliseconds, or an ISO string.
pub fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Number(n) => match Value::date_from_millis(*n)? {
            Value::Date(d) => Some(d),
            _ => None,
        },
        Value::String(s) => parse_iso(s),
        _ => None,
    }
}
