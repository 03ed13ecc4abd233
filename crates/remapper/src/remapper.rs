//! The remapper tree, validated at the deserialization boundary.
//!
//! Raw JSON is converted once into a closed [`Remapper`] value: structural
//! problems, unknown operation names and malformed arguments are all reported
//! here, so the evaluator only ever sees well-formed operations.

use crate::dates;
use crate::duration::parse_duration;
use crate::error::{RemapperError, Result};
use crate::types::Value;
use crate::util::format_number;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Map;
use tracing::Level;

/// A parsed remapper.
#[derive(Debug, Clone, PartialEq)]
pub enum Remapper {
    /// A string, number, boolean or `null`; evaluates to itself.
    Literal(Value),
    /// A single `{ "name": argument }` object.
    Operation(Box<Operation>),
    /// Stages applied left to right, each receiving the previous output.
    Pipeline(Vec<Operation>),
}

/// One operation together with the JSON it was parsed from.
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: OperationKind,
    pub source: serde_json::Value,
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppField {
    Id,
    Locale,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageField {
    Data,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayField {
    Index,
    Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct MatchCase {
    pub case: Remapper,
    pub value: Remapper,
}

#[derive(Debug, Clone)]
pub struct StringFormatArgs {
    pub message_id: Option<String>,
    pub template: Option<String>,
    pub values: Option<IndexMap<String, Remapper>>,
}

#[derive(Debug, Clone)]
pub struct IcsArgs {
    pub start: Remapper,
    pub end: Option<Remapper>,
    pub duration: Option<Remapper>,
    pub title: Option<Remapper>,
    pub description: Option<Remapper>,
    pub url: Option<Remapper>,
    pub location: Option<Remapper>,
    pub coordinates: Option<Remapper>,
}

/// Every operation the evaluator knows, with its validated arguments.
#[derive(Debug, Clone)]
pub enum OperationKind {
    App(AppField),
    Page(PageField),
    Context(Vec<String>),
    User(String),

    Equals(Vec<Remapper>),
    Not(Vec<Remapper>),
    And(Vec<Remapper>),
    Or(Vec<Remapper>),
    Gt(Remapper, Remapper),
    Lt(Remapper, Remapper),

    If {
        condition: Remapper,
        then: Remapper,
        otherwise: Remapper,
    },
    Match(Vec<MatchCase>),

    ObjectFrom(IndexMap<String, Remapper>),
    ObjectAssign(IndexMap<String, Remapper>),
    ObjectOmit(Vec<Vec<String>>),

    ArrayMap(Remapper),
    ArrayUnique(Option<Remapper>),
    ArrayFrom(Vec<Remapper>),
    ArrayAppend(Vec<Remapper>),
    ArrayOmit(Vec<Remapper>),
    Array(ArrayField),

    Root,
    Prior(i64),
    FromHistory {
        index: i64,
        props: IndexMap<String, Remapper>,
    },
    AssignHistory {
        index: i64,
        props: IndexMap<String, Remapper>,
    },
    OmitHistory {
        index: i64,
        keys: Vec<Vec<String>>,
    },

    DateNow,
    /// Milliseconds to add; `None` when the duration did not parse.
    DateAdd(Option<f64>),
    DateParse(Option<dates::DateFormat>),
    DateFormat(Option<dates::DateFormat>),

    RandomChoice,
    RandomInteger {
        min: f64,
        max: f64,
    },
    RandomFloat {
        min: f64,
        max: f64,
    },
    RandomString {
        choice: Vec<char>,
        length: usize,
    },

    StringCase(Option<Case>),
    StringFormat(Box<StringFormatArgs>),
    StringReplace {
        pattern: Regex,
        replacement: String,
    },
    Translate(String),

    NullStrip {
        depth: Option<usize>,
    },
    Ics(Box<IcsArgs>),

    Static(Value),
    Prop(Vec<String>),
    Type,
    Len,
    Log(Level),
}

impl OperationKind {
    /// The operation name as written in a remapper.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::App(_) => "app",
            OperationKind::Page(_) => "page",
            OperationKind::Context(_) => "context",
            OperationKind::User(_) => "user",
            OperationKind::Equals(_) => "equals",
            OperationKind::Not(_) => "not",
            OperationKind::And(_) => "and",
            OperationKind::Or(_) => "or",
            OperationKind::Gt(..) => "gt",
            OperationKind::Lt(..) => "lt",
            OperationKind::If { .. } => "if",
            OperationKind::Match(_) => "match",
            OperationKind::ObjectFrom(_) => "object.from",
            OperationKind::ObjectAssign(_) => "object.assign",
            OperationKind::ObjectOmit(_) => "object.omit",
            OperationKind::ArrayMap(_) => "array.map",
            OperationKind::ArrayUnique(_) => "array.unique",
            OperationKind::ArrayFrom(_) => "array.from",
            OperationKind::ArrayAppend(_) => "array.append",
            OperationKind::ArrayOmit(_) => "array.omit",
            OperationKind::Array(_) => "array",
            OperationKind::Root => "root",
            OperationKind::Prior(_) => "prior",
            OperationKind::FromHistory { .. } => "from.history",
            OperationKind::AssignHistory { .. } => "assign.history",
            OperationKind::OmitHistory { .. } => "omit.history",
            OperationKind::DateNow => "date.now",
            OperationKind::DateAdd(_) => "date.add",
            OperationKind::DateParse(_) => "date.parse",
            OperationKind::DateFormat(_) => "date.format",
            OperationKind::RandomChoice => "random.choice",
            OperationKind::RandomInteger { .. } => "random.integer",
            OperationKind::RandomFloat { .. } => "random.float",
            OperationKind::RandomString { .. } => "random.string",
            OperationKind::StringCase(_) => "string.case",
            OperationKind::StringFormat(_) => "string.format",
            OperationKind::StringReplace { .. } => "string.replace",
            OperationKind::Translate(_) => "translate",
            OperationKind::NullStrip { .. } => "null.strip",
            OperationKind::Ics(_) => "ics",
            OperationKind::Static(_) => "static",
            OperationKind::Prop(_) => "prop",
            OperationKind::Type => "type",
            OperationKind::Len => "len",
            OperationKind::Log(_) => "log",
        }
    }
}

impl Remapper {
    /// Validates a raw remapper tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use remapper::{Remapper, RemapperError};
    /// use serde_json::json;
    ///
    /// assert!(Remapper::parse(&json!({ "prop": "name" })).is_ok());
    /// assert!(matches!(
    ///     Remapper::parse(&json!({ "prop": "a", "static": 1 })),
    ///     Err(RemapperError::Structural { .. })
    /// ));
    /// ```
    pub fn parse(json: &serde_json::Value) -> Result<Remapper> {
        match json {
            serde_json::Value::Array(stages) => stages
                .iter()
                .map(|stage| match stage {
                    serde_json::Value::Object(map) => Operation::parse(map, stage),
                    other => Err(RemapperError::Structural {
                        keys: Vec::new(),
                        remapper: other.clone(),
                    }),
                })
                .collect::<Result<Vec<_>>>()
                .map(Remapper::Pipeline),
            serde_json::Value::Object(map) => {
                Operation::parse(map, json).map(|op| Remapper::Operation(Box::new(op)))
            }
            literal => Ok(Remapper::Literal(Value::from(literal))),
        }
    }

    /// The JSON this remapper was parsed from.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Remapper::Literal(value) => value.to_json(),
            Remapper::Operation(op) => op.source.clone(),
            Remapper::Pipeline(stages) => {
                serde_json::Value::Array(stages.iter().map(|op| op.source.clone()).collect())
            }
        }
    }
}

impl Operation {
    fn parse(map: &Map<String, serde_json::Value>, source: &serde_json::Value) -> Result<Operation> {
        let mut entries = map.iter();
        let (name, arg) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(RemapperError::Structural {
                    keys: map.keys().cloned().collect(),
                    remapper: source.clone(),
                })
            }
        };
        let args = Args { name, arg, source };
        let kind = match name.as_str() {
            "app" => OperationKind::App(match args.string()? {
                "id" => AppField::Id,
                "locale" => AppField::Locale,
                "url" => AppField::Url,
                other => return Err(args.invalid(format!("unknown app property \"{other}\""))),
            }),
            "page" => OperationKind::Page(match args.string()? {
                "data" => PageField::Data,
                "url" => PageField::Url,
                other => return Err(args.invalid(format!("unknown page property \"{other}\""))),
            }),
            "context" => OperationKind::Context(args.string()?.split('.').map(String::from).collect()),
            "user" => OperationKind::User(args.string()?.to_string()),

            "equals" => OperationKind::Equals(args.list(arg)?),
            "not" => OperationKind::Not(args.list(arg)?),
            "and" => OperationKind::And(args.list(arg)?),
            "or" => OperationKind::Or(args.list(arg)?),
            "gt" | "lt" => {
                let mut operands = args.list(arg)?;
                if operands.len() != 2 {
                    return Err(args.invalid(format!("expected 2 operands, got {}", operands.len())));
                }
                let right = operands.pop();
                let left = operands.pop();
                match (left, right) {
                    (Some(left), Some(right)) if name == "gt" => OperationKind::Gt(left, right),
                    (Some(left), Some(right)) => OperationKind::Lt(left, right),
                    _ => return Err(args.invalid("expected 2 operands")),
                }
            }

            "if" => {
                let fields = args.object(arg)?;
                args.only_keys(fields, &["condition", "then", "else"])?;
                OperationKind::If {
                    condition: args.required(fields, "condition")?,
                    then: args.required(fields, "then")?,
                    otherwise: args.required(fields, "else")?,
                }
            }
            "match" => OperationKind::Match(
                args.array(arg)?
                    .iter()
                    .map(|case| {
                        let fields = args.object(case)?;
                        args.only_keys(fields, &["case", "value"])?;
                        Ok(MatchCase {
                            case: args.required(fields, "case")?,
                            value: args.required(fields, "value")?,
                        })
                    })
                    .collect::<Result<_>>()?,
            ),

            "object.from" => OperationKind::ObjectFrom(args.props(arg)?),
            "object.assign" => OperationKind::ObjectAssign(args.props(arg)?),
            "object.omit" => OperationKind::ObjectOmit(args.paths(arg)?),

            "array.map" => OperationKind::ArrayMap(Remapper::parse(arg)?),
            "array.unique" => OperationKind::ArrayUnique(match arg {
                serde_json::Value::Null => None,
                key => Some(Remapper::parse(key)?),
            }),
            "array.from" => OperationKind::ArrayFrom(args.list(arg)?),
            "array.append" => OperationKind::ArrayAppend(args.list(arg)?),
            "array.omit" => OperationKind::ArrayOmit(args.list(arg)?),
            "array" => OperationKind::Array(match args.string()? {
                "index" => ArrayField::Index,
                "length" => ArrayField::Length,
                other => return Err(args.invalid(format!("unknown array property \"{other}\""))),
            }),

            "root" => OperationKind::Root,
            "prior" => OperationKind::Prior(args.integer(arg)?),
            "from.history" | "assign.history" => {
                let fields = args.object(arg)?;
                args.only_keys(fields, &["index", "props"])?;
                let index = args.integer(fields.get("index").unwrap_or(&serde_json::Value::Null))?;
                let props = args.props(fields.get("props").unwrap_or(&serde_json::Value::Null))?;
                if name == "from.history" {
                    OperationKind::FromHistory { index, props }
                } else {
                    OperationKind::AssignHistory { index, props }
                }
            }
            "omit.history" => {
                let fields = args.object(arg)?;
                args.only_keys(fields, &["index", "keys"])?;
                OperationKind::OmitHistory {
                    index: args.integer(fields.get("index").unwrap_or(&serde_json::Value::Null))?,
                    keys: args.paths(fields.get("keys").unwrap_or(&serde_json::Value::Null))?,
                }
            }

            "date.now" => OperationKind::DateNow,
            "date.add" => OperationKind::DateAdd(arg.as_str().and_then(parse_duration)),
            "date.parse" => OperationKind::DateParse(args.date_format()?),
            "date.format" => OperationKind::DateFormat(args.date_format()?),

            "random.choice" => OperationKind::RandomChoice,
            "random.integer" | "random.float" => {
                let (min, max) = args.range()?;
                if name == "random.integer" {
                    OperationKind::RandomInteger { min, max }
                } else {
                    OperationKind::RandomFloat { min, max }
                }
            }
            "random.string" => {
                let fields = args.object(arg)?;
                args.only_keys(fields, &["choice", "length"])?;
                let choice = fields
                    .get("choice")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| args.invalid("\"choice\" must be a string"))?;
                let length = fields
                    .get("length")
                    .and_then(serde_json::Value::as_u64)
                    .ok_or_else(|| args.invalid("\"length\" must be a non-negative integer"))?;
                let mut unique: Vec<char> = Vec::new();
                for c in choice.chars() {
                    if !unique.contains(&c) {
                        unique.push(c);
                    }
                }
                OperationKind::RandomString {
                    choice: unique,
                    length: usize::try_from(length).map_err(|_| args.invalid("\"length\" is too large"))?,
                }
            }

            "string.case" => OperationKind::StringCase(match arg.as_str() {
                Some("upper") => Some(Case::Upper),
                Some("lower") => Some(Case::Lower),
                _ => None,
            }),
            "string.format" => {
                let fields = args.object(arg)?;
                args.only_keys(fields, &["messageId", "template", "values"])?;
                OperationKind::StringFormat(Box::new(StringFormatArgs {
                    message_id: args.optional_string(fields, "messageId")?,
                    template: args.optional_string(fields, "template")?,
                    values: fields.get("values").map(|values| args.props(values)).transpose()?,
                }))
            }
            "string.replace" => {
                let fields = args.object(arg)?;
                let mut pairs = fields.iter();
                let (pattern, replacement) = match (pairs.next(), pairs.next()) {
                    (Some((pattern, serde_json::Value::String(replacement))), None) => (pattern, replacement),
                    _ => return Err(args.invalid("expected exactly one pattern mapped to a replacement string")),
                };
                OperationKind::StringReplace {
                    pattern: Regex::new(&format!("(?m){pattern}"))
                        .map_err(|e| args.invalid(format!("invalid pattern: {e}")))?,
                    replacement: replacement_template(replacement),
                }
            }
            "translate" => OperationKind::Translate(args.string()?.to_string()),

            "null.strip" => OperationKind::NullStrip {
                depth: match arg {
                    serde_json::Value::Null => None,
                    serde_json::Value::Object(fields) => {
                        args.only_keys(fields, &["depth"])?;
                        match fields.get("depth") {
                            None | Some(serde_json::Value::Null) => None,
                            Some(depth) => Some(
                                depth
                                    .as_u64()
                                    .and_then(|d| usize::try_from(d).ok())
                                    .ok_or_else(|| args.invalid("\"depth\" must be a non-negative integer"))?,
                            ),
                        }
                    }
                    _ => return Err(args.invalid("expected null or an object with \"depth\"")),
                },
            },
            "ics" => {
                let fields = args.object(arg)?;
                args.only_keys(
                    fields,
                    &["start", "end", "duration", "title", "description", "url", "location", "coordinates"],
                )?;
                let optional = |key: &str| fields.get(key).map(Remapper::parse).transpose();
                OperationKind::Ics(Box::new(IcsArgs {
                    start: args.required(fields, "start")?,
                    end: optional("end")?,
                    duration: optional("duration")?,
                    title: optional("title")?,
                    description: optional("description")?,
                    url: optional("url")?,
                    location: optional("location")?,
                    coordinates: optional("coordinates")?,
                }))
            }

            "static" => OperationKind::Static(Value::from(arg)),
            "prop" => OperationKind::Prop(match arg {
                serde_json::Value::Array(segments) => segments
                    .iter()
                    .map(|segment| {
                        segment_name(segment).ok_or_else(|| args.invalid("path segments must be strings or numbers"))
                    })
                    .collect::<Result<_>>()?,
                single => vec![segment_name(single)
                    .or_else(|| single.is_null().then(|| "null".to_string()))
                    .ok_or_else(|| args.invalid("expected a property name or path"))?],
            }),
            "type" => OperationKind::Type,
            "len" => OperationKind::Len,
            "log" => OperationKind::Log(match arg {
                serde_json::Value::Null => Level::INFO,
                serde_json::Value::String(level) => level
                    .parse()
                    .map_err(|_| args.invalid(format!("unknown log level \"{level}\"")))?,
                _ => return Err(args.invalid("expected a log level")),
            }),

            _ => {
                return Err(RemapperError::UnknownOperation {
                    name: name.clone(),
                    remapper: source.clone(),
                })
            }
        };
        Ok(Operation {
            kind,
            source: source.clone(),
        })
    }
}

fn segment_name(segment: &serde_json::Value) -> Option<String> {
    match segment {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => n.as_f64().map(format_number),
        _ => None,
    }
}

/// Rewrites `$1`, `$&` and `$$` replacement references into the regex crate's
/// `${1}` syntax.
fn replacement_template(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(d) if d.is_ascii_digit() => {
                out.push_str("${");
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    out.push(d);
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push_str("$$"),
        }
    }
    out
}

/// Argument readers for one operation, producing errors tagged with it.
struct Args<'a> {
    name: &'a str,
    arg: &'a serde_json::Value,
    source: &'a serde_json::Value,
}

impl<'a> Args<'a> {
    fn invalid(&self, message: impl Into<String>) -> RemapperError {
        RemapperError::invalid(self.name, message, self.source)
    }

    fn string(&self) -> Result<&'a str> {
        self.arg.as_str().ok_or_else(|| self.invalid("expected a string"))
    }

    fn integer(&self, value: &serde_json::Value) -> Result<i64> {
        value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| self.invalid("\"index\" must be an integer"))
    }

    fn array<'v>(&self, value: &'v serde_json::Value) -> Result<&'v Vec<serde_json::Value>> {
        value.as_array().ok_or_else(|| self.invalid("expected an array"))
    }

    fn object<'v>(&self, value: &'v serde_json::Value) -> Result<&'v Map<String, serde_json::Value>> {
        value.as_object().ok_or_else(|| self.invalid("expected an object"))
    }

    fn only_keys(&self, fields: &Map<String, serde_json::Value>, allowed: &[&str]) -> Result<()> {
        match fields.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(self.invalid(format!("unexpected property \"{key}\""))),
            None => Ok(()),
        }
    }

    fn required(&self, fields: &Map<String, serde_json::Value>, key: &str) -> Result<Remapper> {
        let value = fields
            .get(key)
            .ok_or_else(|| self.invalid(format!("missing property \"{key}\"")))?;
        Remapper::parse(value)
    }

    fn optional_string(&self, fields: &Map<String, serde_json::Value>, key: &str) -> Result<Option<String>> {
        match fields.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(format!("\"{key}\" must be a string"))),
        }
    }

    fn list(&self, value: &serde_json::Value) -> Result<Vec<Remapper>> {
        self.array(value)?.iter().map(Remapper::parse).collect()
    }

    fn props(&self, value: &serde_json::Value) -> Result<IndexMap<String, Remapper>> {
        self.object(value)?
            .iter()
            .map(|(key, remapper)| Ok((key.clone(), Remapper::parse(remapper)?)))
            .collect()
    }

    /// Keys to omit: each entry is a key or a path of keys.
    fn paths(&self, value: &serde_json::Value) -> Result<Vec<Vec<String>>> {
        let invalid = || self.invalid("keys must be strings or arrays of strings");
        self.array(value)?
            .iter()
            .map(|entry| match entry {
                serde_json::Value::Array(path) => path
                    .iter()
                    .map(|segment| segment_name(segment).ok_or_else(invalid))
                    .collect(),
                key => segment_name(key).map(|key| vec![key]).ok_or_else(invalid),
            })
            .collect()
    }

    fn date_format(&self) -> Result<Option<dates::DateFormat>> {
        match self.arg {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) if s.is_empty() => Ok(None),
            serde_json::Value::String(s) => dates::DateFormat::new(s)
                .map(Some)
                .map_err(|e| self.invalid(format!("invalid date format: {e}"))),
            _ => Err(self.invalid("expected a date format string")),
        }
    }

    /// A `[min, max]` pair in either order, normalized so `min <= max`.
    fn range(&self) -> Result<(f64, f64)> {
        match self.array(self.arg)?.as_slice() {
            [a, b] => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => Ok((a.min(b), a.max(b))),
                _ => Err(self.invalid("bounds must be numbers")),
            },
            other => Err(self.invalid(format!("expected [min, max], got {} values", other.len()))),
        }
    }
}

impl TryFrom<&serde_json::Value> for Remapper {
    type Error = RemapperError;

    fn try_from(json: &serde_json::Value) -> Result<Self> {
        Remapper::parse(json)
    }
}

impl TryFrom<serde_json::Value> for Remapper {
    type Error = RemapperError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        Remapper::parse(&json)
    }
}

impl From<Remapper> for serde_json::Value {
    fn from(remapper: Remapper) -> Self {
        remapper.to_json()
    }
}

impl Serialize for Remapper {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Remapper {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Remapper::parse(&json).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_err(json: serde_json::Value) -> RemapperError {
        match Remapper::parse(&json) {
            Ok(remapper) => panic!("expected {json} to be rejected, got {remapper:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn literals() {
        assert_eq!(Remapper::parse(&json!("x")).unwrap(), Remapper::Literal(Value::from("x")));
        assert_eq!(Remapper::parse(&json!(null)).unwrap(), Remapper::Literal(Value::Null));
        assert_eq!(Remapper::parse(&json!(2)).unwrap(), Remapper::Literal(Value::Number(2.0)));
    }

    #[test]
    fn structural_errors_list_keys() {
        let err = parse_err(json!({ "prop": "a", "static": "b" }));
        assert_eq!(
            err,
            RemapperError::Structural {
                keys: vec!["prop".into(), "static".into()],
                remapper: json!({ "prop": "a", "static": "b" }),
            }
        );
        assert!(err.to_string().contains("prop, static"));
        assert!(matches!(parse_err(json!({})), RemapperError::Structural { keys, .. } if keys.is_empty()));
    }

    #[test]
    fn pipeline_stages_must_be_operations() {
        assert!(matches!(parse_err(json!([{ "prop": "a" }, "b"])), RemapperError::Structural { .. }));
        assert!(matches!(parse_err(json!([[{ "prop": "a" }]])), RemapperError::Structural { .. }));
        assert!(matches!(Remapper::parse(&json!([])).unwrap(), Remapper::Pipeline(stages) if stages.is_empty()));
    }

    #[test]
    fn unknown_operation() {
        let err = parse_err(json!({ "nope": null }));
        assert_eq!(err.to_string(), "Remapper nope does not exist");
    }

    #[test]
    fn nested_errors_surface() {
        let err = parse_err(json!({ "object.from": { "a": { "x": 1, "y": 2 } } }));
        assert_eq!(err.remapper(), &json!({ "x": 1, "y": 2 }));
    }

    #[test]
    fn argument_shapes() {
        assert!(matches!(parse_err(json!({ "app": "foo" })), RemapperError::InvalidArgument { .. }));
        assert!(matches!(parse_err(json!({ "gt": [1] })), RemapperError::InvalidArgument { .. }));
        assert!(matches!(parse_err(json!({ "string.replace": { "(": "x" } })), RemapperError::InvalidArgument { .. }));
        assert!(matches!(parse_err(json!({ "date.format": "yyyy-QQ" })), RemapperError::InvalidArgument { .. }));
        assert!(matches!(parse_err(json!({ "if": { "condition": true, "then": 1 } })), RemapperError::InvalidArgument { .. }));
        assert!(matches!(parse_err(json!({ "log": "loud" })), RemapperError::InvalidArgument { .. }));
    }

    #[test]
    fn prop_arguments() {
        let prop = |json: serde_json::Value| match Remapper::parse(&json).unwrap() {
            Remapper::Operation(op) => match op.kind {
                OperationKind::Prop(path) => path,
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(prop(json!({ "prop": null })), vec!["null"]);
        assert_eq!(prop(json!({ "prop": 0 })), vec!["0"]);
        assert_eq!(prop(json!({ "prop": ["a", 1] })), vec!["a", "1"]);
    }

    #[test]
    fn replacement_references() {
        assert_eq!(replacement_template("$1-$2"), "${1}-${2}");
        assert_eq!(replacement_template("[$&]"), "[${0}]");
        assert_eq!(replacement_template("$$ and $"), "$$ and $$");
    }

    #[test]
    fn serde_round_trip() {
        let json = json!([{ "prop": "a" }, { "string.case": "upper" }]);
        let remapper: Remapper = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&remapper).unwrap(), json);
        assert!(serde_json::from_value::<Remapper>(json!({ "a": 1, "b": 2 })).is_err());
    }
}
