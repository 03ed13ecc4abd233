//! iCalendar (RFC 5545) event generation for the `ics` operation.

use crate::duration::{parse_duration, to_ical_duration};
use crate::types::Value;
use crate::util;
use chrono::{DateTime, Timelike, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("invalid {field} date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// When an event ends.
#[derive(Debug, Clone, PartialEq)]
pub enum EventEnd {
    At(DateTime<Utc>),
    /// Milliseconds after the start.
    After(f64),
}

/// A single calendar event. Dates are kept at minute precision in UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub product_id: String,
    pub stamp: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub end: Option<EventEnd>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub geo: Option<(f64, f64)>,
}

/// Normalizes an event date given as a date value or an ISO string, dropping
/// seconds and below.
pub fn event_date(field: &'static str, value: &Value) -> Result<DateTime<Utc>, CalendarError> {
    let date = match value {
        Value::Date(d) => Some(*d),
        Value::String(s) => crate::dates::parse_iso(s),
        _ => None,
    };
    date.and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .ok_or_else(|| CalendarError::InvalidDate {
            field,
            value: util::str_val(value),
        })
}

pub fn event_duration(value: &Value) -> Result<f64, CalendarError> {
    value
        .as_str()
        .and_then(parse_duration)
        .ok_or_else(|| CalendarError::InvalidDuration(util::str_val(value)))
}

/// Reads coordinates from `[lat, lon]`, `{lat, lng}` / `{lat, lon}` /
/// `{latitude, longitude}`, or a `"lat,lon"` string.
pub fn event_geo(value: &Value) -> Result<(f64, f64), CalendarError> {
    let invalid = || CalendarError::InvalidCoordinates(util::str_val(value));
    let (lat, lon) = match value {
        Value::Array(arr) if arr.len() == 2 => (util::num(&arr[0]), util::num(&arr[1])),
        Value::Object(obj) => {
            let lat = obj.get("lat").or_else(|| obj.get("latitude"));
            let lon = obj
                .get("lng")
                .or_else(|| obj.get("lon"))
                .or_else(|| obj.get("longitude"));
            match (lat, lon) {
                (Some(lat), Some(lon)) => (util::num(lat), util::num(lon)),
                _ => return Err(invalid()),
            }
        }
        Value::String(s) => {
            let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
            (
                lat.trim().parse().map_err(|_| invalid())?,
                lon.trim().parse().map_err(|_| invalid())?,
            )
        }
        _ => return Err(invalid()),
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(invalid());
    }
    Ok((lat, lon))
}

fn stamp(date: &DateTime<Utc>) -> String {
    date.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Folds a content line at 75 octets without splitting UTF-8 sequences.
fn fold(line: &str, out: &mut String) {
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > 75 {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
}

impl CalendarEvent {
    /// Renders a complete `VCALENDAR` document with CRLF line endings.
    pub fn to_ics(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            format!("PRODID:{}", escape_text(&self.product_id)),
            "METHOD:PUBLISH".to_string(),
            "X-PUBLISHED-TTL:PT1H".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
        ];
        if let Some(title) = &self.title {
            lines.push(format!("SUMMARY:{}", escape_text(title)));
        }
        lines.push(format!("DTSTAMP:{}", stamp(&self.stamp)));
        lines.push(format!("DTSTART:{}", stamp(&self.start)));
        match &self.end {
            Some(EventEnd::At(end)) => lines.push(format!("DTEND:{}", stamp(end))),
            Some(EventEnd::After(ms)) => lines.push(format!("DURATION:{}", to_ical_duration(*ms))),
            None => {}
        }
        if let Some(description) = &self.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        if let Some(url) = &self.url {
            lines.push(format!("URL:{url}"));
        }
        if let Some((lat, lon)) = self.geo {
            lines.push(format!("GEO:{};{}", util::format_number(lat), util::format_number(lon)));
        }
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in &lines {
            fold(line, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event() -> CalendarEvent {
        CalendarEvent {
            uid: "uid-1".into(),
            product_id: "https://app.example".into(),
            stamp: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            start: Utc.with_ymd_and_hms(2021, 2, 3, 14, 30, 0).unwrap(),
            end: Some(EventEnd::After(3_600_000.0)),
            title: Some("Standup, daily".into()),
            description: None,
            url: None,
            location: None,
            geo: Some((52.0, 5.5)),
        }
    }

    #[test]
    fn renders_event() {
        let ics = event().to_ics();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.contains("SUMMARY:Standup\\, daily\r\n"));
        assert!(ics.contains("DTSTART:20210203T143000Z\r\n"));
        assert!(ics.contains("DURATION:PT1H\r\n"));
        assert!(ics.contains("GEO:52;5.5\r\n"));
        assert!(ics.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
    }

    #[test]
    fn folds_long_lines() {
        let mut e = event();
        e.description = Some("x".repeat(200));
        let ics = e.to_ics();
        assert!(ics.lines().all(|l| l.len() <= 75));
        assert!(ics.contains("\r\n x"));
    }

    #[test]
    fn event_dates_drop_seconds() {
        let date = event_date("start", &Value::from("2021-02-03T14:30:59Z")).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2021, 2, 3, 14, 30, 0).unwrap());
        assert!(event_date("start", &Value::from("not a date")).is_err());
        assert!(event_date("start", &Value::Undefined).is_err());
    }

    #[test]
    fn coordinates() {
        assert_eq!(event_geo(&Value::from(json!([1, 2]))).unwrap(), (1.0, 2.0));
        assert_eq!(event_geo(&Value::from(json!({"lat": 1, "lng": 2}))).unwrap(), (1.0, 2.0));
        assert_eq!(event_geo(&Value::from("1.5, 2")).unwrap(), (1.5, 2.0));
        assert!(event_geo(&Value::from(json!([100, 0]))).is_err());
        assert!(event_geo(&Value::from("nowhere")).is_err());
    }

    #[test]
    fn durations() {
        assert_eq!(event_duration(&Value::from("1h")).unwrap(), 3_600_000.0);
        assert!(event_duration(&Value::from("whenever")).is_err());
        assert!(event_duration(&Value::from(json!(5))).is_err());
    }
}
