//! Date operators.

use crate::dates::{self, DateFormat};
use crate::eval_ctx::EvalCtx;
use crate::types::{date_to_iso, Value};
use crate::util;
use chrono::Duration;

pub fn now_eval(ctx: EvalCtx<'_>) -> Value {
    Value::Date(ctx.context.now())
}

/// Adds `millis` to a date or epoch-millisecond input. Anything else, or a
/// duration that did not parse, returns the input unchanged.
pub fn add_eval(millis: Option<f64>, input: &Value) -> Value {
    let Some(millis) = millis.filter(|ms| *ms != 0.0 && ms.is_finite()) else {
        return input.clone();
    };
    if !util::is_truthy(input) {
        return input.clone();
    }
    let start = match input {
        Value::Date(date) => *date,
        Value::Number(n) => match Value::date_from_millis(*n) {
            Some(Value::Date(date)) => date,
            _ => return input.clone(),
        },
        _ => return input.clone(),
    };
    if millis.abs() >= i64::MAX as f64 {
        return input.clone();
    }
    Duration::try_milliseconds(millis.round() as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .map(Value::Date)
        .unwrap_or_else(|| input.clone())
}

/// Parses a string with `format`, or as ISO-8601 without one. Dates pass
/// through; anything unparsable is `null`.
pub fn parse_eval(format: Option<&DateFormat>, input: &Value) -> Value {
    let parsed = match (input, format) {
        (Value::Date(date), _) => Some(*date),
        (Value::String(s), Some(format)) => format.parse(s),
        (Value::String(s), None) => dates::parse_iso(s),
        (Value::Number(n), _) => return Value::date_from_millis(*n).unwrap_or(Value::Null),
        _ => None,
    };
    parsed.map(Value::Date).unwrap_or(Value::Null)
}

pub fn format_eval(format: Option<&DateFormat>, input: &Value) -> Value {
    match (dates::to_date(input), format) {
        (Some(date), Some(format)) => Value::String(format.format(&date)),
        (Some(date), None) => Value::String(date_to_iso(&date)),
        (None, _) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn add_to_dates_and_numbers() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let day = Some(86_400_000.0);
        assert_eq!(
            add_eval(day, &Value::Date(start)),
            Value::Date(Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            add_eval(day, &Value::Number(start.timestamp_millis() as f64)),
            Value::Date(Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn add_leaves_other_input_alone() {
        assert_eq!(add_eval(None, &Value::Number(5.0)), Value::Number(5.0));
        assert_eq!(add_eval(Some(1000.0), &Value::from("2020")), Value::from("2020"));
        assert_eq!(add_eval(Some(1000.0), &Value::Number(0.0)), Value::Number(0.0));
        assert_eq!(add_eval(Some(1000.0), &Value::Null), Value::Null);
    }

    #[test]
    fn add_out_of_range_returns_input() {
        let input = Value::Number(1000.0);
        assert_eq!(add_eval(Some(-1e19), &input), input);
        assert_eq!(add_eval(Some(1e19), &input), input);
        assert_eq!(add_eval(Some(1e18), &input), input);
    }

    #[test]
    fn parse_with_and_without_format() {
        let format = DateFormat::new("dd-MM-yyyy").unwrap();
        assert_eq!(
            parse_eval(Some(&format), &Value::from("02-03-2021")),
            Value::Date(Utc.with_ymd_and_hms(2021, 3, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_eval(None, &Value::from("2021-03-02T10:00:00Z")),
            Value::Date(Utc.with_ymd_and_hms(2021, 3, 2, 10, 0, 0).unwrap())
        );
        assert_eq!(parse_eval(None, &Value::from("soon")), Value::Null);
    }

    #[test]
    fn format_dates() {
        let date = Value::Date(Utc.with_ymd_and_hms(2021, 3, 2, 10, 5, 0).unwrap());
        let format = DateFormat::new("yyyy/MM/dd HH:mm").unwrap();
        assert_eq!(format_eval(Some(&format), &date), Value::from("2021/03/02 10:05"));
        assert_eq!(format_eval(None, &date), Value::from("2021-03-02T10:05:00.000Z"));
        assert_eq!(format_eval(None, &Value::from("garbage")), Value::Null);
    }
}
