//! HTTP-date helpers for `expires` and `last-modified`.

use chrono::{DateTime, Utc};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Formats as an IMF-fixdate, e.g. `Sun, 18 Oct 2026 09:30:00 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

/// Parses an HTTP date (IMF-fixdate or any RFC 2822 form).
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_http_date_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(http_date(at), "Sun, 18 Oct 2026 09:30:00 GMT");
    }

    #[test]
    fn test_parse_round_trip() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_http_date(&http_date(at)), Some(at));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_http_date("tomorrow"), None);
        assert_eq!(parse_http_date(""), None);
    }
}
