//! Timestamp and duration normalization.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const DURATION_UNIT: &str =
    r"(ns|us|µs|ms|seconds|second|secs|sec|s|minutes|minute|mins|min|m|hours|hour|hrs|hr|h|days|day|d)";

static DURATION_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(?:\s*\d+(?:\.\d+)?\s*{DURATION_UNIT})+\s*$"))
        .expect("duration pattern is valid")
});

static DURATION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)(\d+(?:\.\d+)?)\s*{DURATION_UNIT}")).expect("duration token pattern is valid")
});

static CLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2})(?::(\d{2}(?:\.\d+)?))?$").expect("clock pattern is valid")
});

/// Trailing zone abbreviation after a numeric offset, e.g. `+0000 UTC`.
static ZONE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([+-]\d{2}:?\d{2})\s+[A-Z]{2,5}$").expect("zone suffix pattern is valid"));

/// Offset-carrying shapes, tried in order.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%a %b %e %H:%M:%S %Y %z",
];

/// Shapes without an offset; interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn unit_seconds(unit: &str) -> f64 {
    match unit.to_lowercase().as_str() {
        "ns" => 1e-9,
        "us" | "µs" => 1e-6,
        "ms" => 1e-3,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600.0,
        "d" | "day" | "days" => 86_400.0,
        _ => 0.0,
    }
}

/// Convert a duration string to seconds.
///
/// Accepts unit-suffixed values (`"1.5s"`, `"150ms"`, `"1m30s"`), clock
/// notation (`"01:30"` as minutes:seconds, `"1:02:03"`), bare numbers
/// (seconds) and anything `humantime` understands (`"2 minutes"`).
/// Unparseable input yields `0.0`.
#[must_use]
pub fn duration_to_seconds(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Ok(value) = trimmed.parse::<f64>() {
        return if value.is_finite() && value >= 0.0 { value } else { 0.0 };
    }

    if DURATION_FULL.is_match(trimmed) {
        return DURATION_TOKEN
            .captures_iter(trimmed)
            .map(|caps| caps[1].parse::<f64>().unwrap_or(0.0) * unit_seconds(&caps[2]))
            .sum();
    }

    if let Some(caps) = CLOCK.captures(trimmed) {
        let first: f64 = caps[1].parse().unwrap_or(0.0);
        let second: f64 = caps[2].parse().unwrap_or(0.0);
        return match caps.get(3) {
            Some(third) => first * 3600.0 + second * 60.0 + third.as_str().parse::<f64>().unwrap_or(0.0),
            None => first * 60.0 + second,
        };
    }

    humantime::parse_duration(trimmed)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Normalize a timestamp to ISO-8601 (RFC 3339).
///
/// Already-ISO input is returned unchanged, which makes the function
/// idempotent. Offsets are preserved; shapes without an offset are taken
/// as UTC. Epoch values are accepted in seconds or milliseconds.
/// Input that matches no known shape is returned trimmed but otherwise
/// unchanged.
#[must_use]
pub fn timestamp_to_canonical(text: &str) -> String {
    let trimmed = text.trim();

    if is_iso(trimmed) {
        return trimmed.to_string();
    }

    parse_timestamp(trimmed)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_else(|| trimmed.to_string())
}

/// Convert epoch milliseconds to a canonical timestamp.
#[must_use]
pub fn epoch_millis_to_canonical(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn is_iso(text: &str) -> bool {
    text.contains(&['T', 't'][..]) && DateTime::parse_from_rfc3339(text).is_ok()
}

fn parse_timestamp(text: &str) -> Option<DateTime<chrono::FixedOffset>> {
    if text.is_empty() {
        return None;
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        let value: i64 = text.parse().ok()?;
        let dt = if text.len() >= 12 {
            Utc.timestamp_millis_opt(value).single()?
        } else {
            Utc.timestamp_opt(value, 0).single()?
        };
        return Some(dt.fixed_offset());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt);
    }

    let without_zone = ZONE_SUFFIX.replace(text, "$1");
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&without_zone, format) {
            return Some(dt);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    None
}
