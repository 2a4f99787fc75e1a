// Utility functions
use chrono::DateTime;

/// Date layout shared by every stored vacancy.
pub const DATE_FORMAT: &str = "%Y.%m.%d";

/// Formats unix epoch seconds as a UTC `YYYY.MM.DD` date.
pub fn format_epoch_date(seconds: i64) -> Option<String> {
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// Cuts an ISO-8601 timestamp down to its date part in `YYYY.MM.DD` form.
pub fn truncate_iso_date(iso: &str) -> Option<String> {
    let date = iso.get(..10)?;
    let dotted = date.replace('-', ".");
    is_dotted_date(&dotted).then_some(dotted)
}

/// Checks the `^\d{4}\.\d{2}\.\d{2}$` shape.
pub fn is_dotted_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_formatted_in_utc() {
        // 2024-01-31T23:30:00Z
        assert_eq!(format_epoch_date(1_706_743_800).as_deref(), Some("2024.01.31"));
        assert_eq!(format_epoch_date(0).as_deref(), Some("1970.01.01"));
    }

    #[test]
    fn iso_timestamp_is_truncated_and_dotted() {
        assert_eq!(
            truncate_iso_date("2024-02-15T10:11:12+0300").as_deref(),
            Some("2024.02.15")
        );
        assert_eq!(truncate_iso_date("2024-02").as_deref(), None);
        assert_eq!(truncate_iso_date("yesterday at noon").as_deref(), None);
    }

    #[test]
    fn dotted_date_shape() {
        assert!(is_dotted_date("2023.12.01"));
        assert!(!is_dotted_date("2023-12-01"));
        assert!(!is_dotted_date("2023.12.1"));
    }
}
