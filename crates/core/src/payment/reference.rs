//! Payment reference number generation.
//!
//! Format: `PAY` + six-digit date (`%y%m%d`) + four-digit zero-padded
//! random suffix, e.g. `PAY2608290042`. Caller-supplied reference
//! numbers are stored as-is; uniqueness is enforced by the storage
//! layer's unique constraint.

use chrono::NaiveDate;
use rand::Rng;

/// Formats a reference number for the given date and suffix.
///
/// Deterministic; used by [`generate_reference_number`] and by tests.
#[must_use]
pub fn format_reference_number(date: NaiveDate, suffix: u16) -> String {
    format!("PAY{}{suffix:04}", date.format("%y%m%d"))
}

/// Generates a reference number from today's date and a random suffix.
#[must_use]
pub fn generate_reference_number(today: NaiveDate) -> String {
    let suffix = rand::rng().random_range(0..10_000_u16);
    format_reference_number(today, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();
        assert_eq!(format_reference_number(date, 42), "PAY2603170042");
    }

    #[test]
    fn test_suffix_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(format_reference_number(date, 7), "PAY2612010007");
        assert_eq!(format_reference_number(date, 9999), "PAY2612019999");
    }

    #[test]
    fn test_generated_length_and_prefix() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let reference = generate_reference_number(date);
        assert_eq!(reference.len(), 13);
        assert!(reference.starts_with("PAY260829"));
        assert!(reference[3..].chars().all(|c| c.is_ascii_digit()));
    }
}
