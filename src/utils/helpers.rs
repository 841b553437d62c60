//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a receipt reference number: RCB-YYYYMM-XXXXXX
pub fn generate_receipt_number(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("RCB-{}-{:06}", now.format("%Y%m"), suffix)
}

/// Whole days elapsed between a past timestamp and now (floor division).
pub fn days_since(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(timestamp).num_days()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a date the way members expect to read it (day/month/year).
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format a timestamp for user display (relative time)
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let diff = now.signed_duration_since(timestamp);

    if diff < Duration::minutes(1) {
        "just now".to_string()
    } else if diff < Duration::hours(1) {
        format!("{} minutes ago", diff.num_minutes())
    } else if diff < Duration::days(1) {
        format!("{} hours ago", diff.num_hours())
    } else if diff < Duration::weeks(1) {
        format!("{} days ago", diff.num_days())
    } else {
        format_timestamp(timestamp)
    }
}

/// Format integer cents as a BRL amount string (R$ 1.234,56)
pub fn format_amount_brl(amount_cents: i64) -> String {
    let negative = amount_cents < 0;
    let cents = amount_cents.unsigned_abs();
    let whole = cents / 100;
    let frac = cents % 100;

    let mut grouped = String::new();
    let digits = whole.to_string();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!(
        "{}R$ {},{:02}",
        if negative { "-" } else { "" },
        grouped,
        frac
    )
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        text.to_string()
    } else {
        format!("{}...", &text[..max_length.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn days_since_floors_partial_days() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let exactly_30 = now - Duration::days(30);
        let almost_31 = now - Duration::days(30) - Duration::hours(23);

        assert_eq!(days_since(exactly_30, now), 30);
        assert_eq!(days_since(almost_31, now), 30);
        assert_eq!(days_since(now - Duration::days(31), now), 31);
    }

    #[test]
    fn receipt_numbers_carry_period_prefix() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 9, 30, 0).unwrap();
        let number = generate_receipt_number(now);
        assert!(number.starts_with("RCB-202503-"));
        assert_eq!(number.len(), "RCB-202503-".len() + 6);
    }

    #[test]
    fn brl_amounts_group_thousands() {
        assert_eq!(format_amount_brl(0), "R$ 0,00");
        assert_eq!(format_amount_brl(950), "R$ 9,50");
        assert_eq!(format_amount_brl(123_456_789), "R$ 1.234.567,89");
        assert_eq!(format_amount_brl(-2500), "-R$ 25,00");
    }

    #[test]
    fn truncate_respects_limit() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer sentence", 9), "a long...");
    }

    #[test]
    fn dates_render_day_first() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 7).unwrap();
        assert_eq!(format_date_br(date), "07/12/2025");
    }
}
