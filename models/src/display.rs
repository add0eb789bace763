// models/src/display.rs

use chrono::{NaiveDate, NaiveDateTime};

pub const PLACEHOLDER: &str = "-";

pub fn format_timestamp(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|v| v.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_date(value: Option<&NaiveDate>) -> String {
    value
        .map(|v| v.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Cuts `text` to at most `max` characters, ending with "..." when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

pub fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Bệnh viện Đa khoa", 8), "Bệnh ...");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn missing_values_show_placeholder() {
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(or_placeholder(Some("  ")), "-");
        let at = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(format_timestamp(Some(&at)), "02/01/2024 08:05");
    }
}
