//! Human size expressions such as `500`, `1.5 GB` or `20m`, measured in
//! kilobytes.
//!
//! Grammar: an optional `-`, one or more digits, an optional `.` followed by
//! digits, optional whitespace, then an optional unit `k`, `m`, `g` or `t`
//! with an optional trailing `b` (case-insensitive). Without a unit the value
//! is already in kilobytes. Multiples are binary: 1 MB = 1024 KB.

const KB_PER_MB: f64 = 1024.0;
const KB_PER_GB: f64 = 1024.0 * 1024.0;
const KB_PER_TB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Parse a size expression into kilobytes. Returns `None` when the text does
/// not follow the grammar.
pub fn parse_size_kb(expr: &str) -> Option<f64> {
    let expr = expr.trim();

    let number_len = number_prefix_len(expr)?;
    let (number, rest) = expr.split_at(number_len);
    let value: f64 = number.parse().ok()?;

    let unit = rest.trim_start().to_ascii_lowercase();
    let multiplier = match unit.as_str() {
        "" | "k" | "kb" => 1.0,
        "m" | "mb" => KB_PER_MB,
        "g" | "gb" => KB_PER_GB,
        "t" | "tb" => KB_PER_TB,
        _ => return None,
    };

    Some(value * multiplier)
}

/// Length of the leading `-?\d+(\.\d*)?` run, or `None` when there is no digit
/// before the optional decimal point.
fn number_prefix_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    if bytes.first() == Some(&b'-') {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == int_start {
        return None;
    }

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }

    Some(pos)
}

/// Format kilobytes for log and report output.
pub fn format_kb(kb: f64) -> String {
    if kb < KB_PER_MB {
        format!("{:.1} KB", kb)
    } else if kb < KB_PER_GB {
        format!("{:.1} MB", kb / KB_PER_MB)
    } else if kb < KB_PER_TB {
        format!("{:.1} GB", kb / KB_PER_GB)
    } else {
        format!("{:.1} TB", kb / KB_PER_TB)
    }
}
