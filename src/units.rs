//! Human-readable byte sizes
//!
//! Below 1 KB sizes print as `N bytes`; above that they use 1024-based
//! KB/MB/GB with thousands grouping and at most two decimals.

const KILOBYTE: f64 = 1024.0;
const MEGABYTE: f64 = KILOBYTE * 1024.0;
const GIGABYTE: f64 = MEGABYTE * 1024.0;

/// Formats a byte count for display
pub trait ByteFormatter {
    fn format_bytes(&self, bytes: u64) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ByteUnits;

impl ByteFormatter for ByteUnits {
    fn format_bytes(&self, bytes: u64) -> String {
        let value = bytes as f64;
        if value < KILOBYTE {
            format!("{} bytes", bytes)
        } else if value < MEGABYTE {
            format!("{} KB", decimal(value / KILOBYTE))
        } else if value < GIGABYTE {
            format!("{} MB", decimal(value / MEGABYTE))
        } else {
            format!("{} GB", decimal(value / GIGABYTE))
        }
    }
}

/// `1234.5` -> `1,234.5`; trailing zeros dropped
fn decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if frac.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, frac)
    }
}
