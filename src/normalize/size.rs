//! Byte size and percentage normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]*\.?[0-9]+)\s*([A-Za-z]*)$").expect("size pattern is valid")
});

/// Multiplier for a size unit suffix, matched case-insensitively.
///
/// Decimal units are 1000-based, `i` units are 1024-based.
fn unit_multiplier(unit: &str) -> Option<f64> {
    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "k" | "kb" => 1e3,
        "m" | "mb" => 1e6,
        "g" | "gb" => 1e9,
        "t" | "tb" => 1e12,
        "ki" | "kib" => 1024.0,
        "mi" | "mib" => 1024.0 * 1024.0,
        "gi" | "gib" => 1024.0 * 1024.0 * 1024.0,
        "ti" | "tib" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    Some(multiplier)
}

/// Convert a size string such as `"150MiB"`, `"1.2kB"` or `"648B"` to bytes.
///
/// Placeholders (`"--"`, `""`) and anything unparseable yield `0`.
#[must_use]
pub fn size_to_bytes(text: &str) -> u64 {
    let trimmed = text.trim();
    let Some(caps) = SIZE_PATTERN.captures(trimmed) else {
        return 0;
    };

    let Ok(value) = caps[1].parse::<f64>() else {
        return 0;
    };

    match unit_multiplier(&caps[2]) {
        Some(multiplier) => (value * multiplier).round() as u64,
        None => 0,
    }
}

/// Split a `"used / limit"` pair (as printed for memory, network and block
/// I/O) into two byte counts. A missing half yields `0`.
#[must_use]
pub fn size_pair(text: &str) -> (u64, u64) {
    match text.split_once('/') {
        Some((left, right)) => (size_to_bytes(left), size_to_bytes(right)),
        None => (size_to_bytes(text), 0),
    }
}

/// Parse a percentage string such as `"0.07%"`. Unparseable input yields `0.0`.
#[must_use]
pub fn percent_to_f64(text: &str) -> f64 {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Format a byte count for display using binary units.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
