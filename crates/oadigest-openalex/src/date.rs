//! Date normalization to `YYYY-MM-DD`

use chrono::NaiveDate;

/// Normalize a date-like string to `YYYY-MM-DD`.
///
/// Accepts full dates, timestamps (date part kept, no timezone shift),
/// `YYYY-MM` and `YYYY` (completed to the first day). Anything else is None.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Timestamp: "2024-03-15T10:20:30.123456" or "2024-03-15 10:20:30"
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);

    let date = parse_full(date_part)
        .or_else(|| parse_year_month(date_part))
        .or_else(|| parse_year(date_part))?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn parse_full(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_year_month(s: &str) -> Option<NaiveDate> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn parse_year(s: &str) -> Option<NaiveDate> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_date_kept() {
        assert_eq!(normalize_date("2023-06-01").as_deref(), Some("2023-06-01"));
    }

    #[test]
    fn timestamps_cut_to_date() {
        assert_eq!(
            normalize_date("2024-03-15T10:20:30.123456").as_deref(),
            Some("2024-03-15")
        );
        assert_eq!(
            normalize_date("2024-03-15T23:59:59+05:00").as_deref(),
            Some("2024-03-15")
        );
        assert_eq!(normalize_date("2024-03-15 08:00:00").as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn partial_dates_completed() {
        assert_eq!(normalize_date("2021-07").as_deref(), Some("2021-07-01"));
        assert_eq!(normalize_date("1999").as_deref(), Some("1999-01-01"));
    }

    #[test]
    fn unparseable_is_none() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("   "), None);
        assert_eq!(normalize_date("yesterday"), None);
        assert_eq!(normalize_date("2021-13"), None);
        assert_eq!(normalize_date("2021-02-30"), None);
        assert_eq!(normalize_date("99"), None);
    }
}
