//! Shared formatting helpers for view rows.
//!
//! performance_schema reports times in picoseconds. Everything here is pure
//! and works on signed values, since a counter reset can leave relative
//! values below zero.

const PS_PER_NS: f64 = 1_000.0;
const PS_PER_US: f64 = 1_000_000.0;
const PS_PER_MS: f64 = 1_000_000_000.0;
const PS_PER_SEC: f64 = 1_000_000_000_000.0;
const PS_PER_MIN: f64 = 60.0 * PS_PER_SEC;
const PS_PER_HOUR: f64 = 3_600.0 * PS_PER_SEC;

/// Format a picosecond duration into at most 10 characters: `"1.23 s"`,
/// `"450.00 us"`, `"2:03:04"`. Zero renders as an empty string so idle
/// columns stay blank.
pub fn format_time(picoseconds: i64) -> String {
    if picoseconds == 0 {
        return String::new();
    }
    if picoseconds < 0 {
        return format!("-{}", format_time_abs(picoseconds.unsigned_abs()));
    }
    format_time_abs(picoseconds as u64)
}

fn format_time_abs(picoseconds: u64) -> String {
    let ps = picoseconds as f64;
    if ps >= PS_PER_HOUR * 100.0 {
        format!("{:.2} h", ps / PS_PER_HOUR)
    } else if ps >= PS_PER_MIN {
        format_hms(picoseconds / PS_PER_SEC as u64)
    } else if ps >= PS_PER_SEC {
        format!("{:.2} s", ps / PS_PER_SEC)
    } else if ps >= PS_PER_MS {
        format!("{:.2} ms", ps / PS_PER_MS)
    } else if ps >= PS_PER_US {
        format!("{:.2} us", ps / PS_PER_US)
    } else if ps >= PS_PER_NS {
        format!("{:.2} ns", ps / PS_PER_NS)
    } else {
        format!("{} ps", picoseconds)
    }
}

fn format_hms(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Format a ratio (0.0 - 1.0) as a percentage, blank when effectively zero.
pub fn format_pct(ratio: f64) -> String {
    if ratio.abs() < 0.0001 {
        String::new()
    } else {
        format!("{:5.1}%", ratio * 100.0)
    }
}

/// Format a counter with a decimal suffix: `"123"`, `"1.50 k"`, `"12.0 M"`.
/// Blank for zero.
pub fn format_amount(amount: i64) -> String {
    if amount == 0 {
        return String::new();
    }
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    if abs < 1_000 {
        return format!("{}{}", sign, abs);
    }

    let suffixes = ["k", "M", "G", "T", "P", "E"];
    let mut value = abs as f64;
    let mut idx = 0;
    value /= 1_000.0;
    while value >= 1_000.0 && idx < suffixes.len() - 1 {
        value /= 1_000.0;
        idx += 1;
    }

    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    format!("{}{:.*} {}", sign, decimals, value, suffixes[idx])
}

/// Safe division returning 0.0 when the divisor is zero.
pub fn divide(a: i64, b: i64) -> f64 {
    if b == 0 { 0.0 } else { a as f64 / b as f64 }
}

/// Format server uptime in seconds: `"3d 04:05:06"` or `"04:05:06"`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let rest = secs % 86_400;
    let hms = format!(
        "{:02}:{:02}:{:02}",
        rest / 3600,
        (rest % 3600) / 60,
        rest % 60
    );
    if days > 0 {
        format!("{}d {}", days, hms)
    } else {
        hms
    }
}

/// Joins schema and table into the identity key used by table domains.
pub fn qualified_table_name(schema: &str, table: &str) -> String {
    if schema.is_empty() {
        table.to_string()
    } else {
        format!("{}.{}", schema, table)
    }
}
