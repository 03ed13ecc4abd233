//! Human readable durations such as `"3d"`, `"-1d"` or `"1h 30m"`.

use regex::Regex;
use std::sync::OnceLock;

const SECOND: f64 = 1000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const YEAR: f64 = 365.25 * DAY;
const MONTH: f64 = YEAR / 12.0;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(-?(?:\d+\.?\d*|\d*\.?\d+)(?:[eE][-+]?\d+)?)\s*([\p{L}µ]*)")
            .expect("duration pattern is valid")
    })
}

fn unit_millis(unit: &str) -> Option<f64> {
    let ms = match unit.to_lowercase().as_str() {
        "" | "ms" | "msec" | "millisecond" | "milliseconds" => 1.0,
        "ns" | "nanosecond" | "nanoseconds" => 1e-6,
        "us" | "µs" | "microsecond" | "microseconds" => 1e-3,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "wk" | "wks" | "week" | "weeks" => WEEK,
        "mo" | "month" | "months" => MONTH,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR,
        _ => return None,
    };
    Some(ms)
}

/// Parses a duration into milliseconds.
///
/// Returns `None` when nothing matches or a unit is unknown.
pub fn parse_duration(input: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut matched = false;
    for caps in pattern().captures_iter(input) {
        let amount: f64 = caps[1].parse().ok()?;
        total += amount * unit_millis(&caps[2])?;
        matched = true;
    }
    matched.then_some(total)
}

/// Formats milliseconds as an iCalendar `DURATION` value, e.g. `PT1H30M`.
pub fn to_ical_duration(millis: f64) -> String {
    let sign = if millis < 0.0 { "-" } else { "" };
    let mut secs = (millis.abs() / SECOND).round() as u64;
    if secs == 0 {
        return "PT0S".to_string();
    }
    let secs_per_day = DAY as u64 / 1000;
    let secs_per_week = WEEK as u64 / 1000;
    if secs % secs_per_week == 0 {
        return format!("{sign}P{}W", secs / secs_per_week);
    }
    let days = secs / secs_per_day;
    secs %= secs_per_day;
    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    secs %= 60;

    let mut out = format!("{sign}P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || secs > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if secs > 0 {
            out.push_str(&format!("{secs}S"));
        }
    }
    out
}
