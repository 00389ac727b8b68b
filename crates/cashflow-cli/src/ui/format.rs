//! String formatting utilities for UI rendering.

use std::time::SystemTime;

use cashflow_core::Id;
use chrono::{DateTime, Local};

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// First 8 characters of an id, braces dropped.
pub fn short_id(id: &Id) -> String {
    id.bare().chars().take(8).collect()
}

/// Format an amount with two decimals and thousands separators.
pub fn format_amount(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.00 prints without a sign
    let sign = if value < 0.0 && text != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

/// Format a file modification time for display.
pub fn format_modified(time: SystemTime, pretty: bool) -> String {
    let local: DateTime<Local> = time.into();
    if pretty {
        local.format("%Y-%m-%d %H:%M").to_string()
    } else {
        local.to_rfc3339()
    }
}

/// Sanitize a string for single-line output (replace newlines with spaces).
pub fn single_line(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("Rent", 10), "Rent");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("Misc. Take Home Pay", 10), "Misc. T...");
    }

    #[test]
    fn test_truncate_very_short_max() {
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_short_id() {
        let id: Id = "7a2e3c0b-1234-5678-9abc-def012345678".parse().unwrap();
        assert_eq!(short_id(&id), "7a2e3c0b");
        let braced: Id = "{7a2e3c0b-1234-5678-9abc-def012345678}".parse().unwrap();
        assert_eq!(short_id(&braced), "7a2e3c0b");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(12.5), "12.50");
        assert_eq!(format_amount(1234.0), "1,234.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-950.25), "-950.25");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_format_modified_plain_is_rfc3339() {
        let text = format_modified(SystemTime::UNIX_EPOCH, false);
        assert!(DateTime::parse_from_rfc3339(&text).is_ok());
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("paid\nlate"), "paid late");
        assert_eq!(single_line("no newlines"), "no newlines");
    }
}
