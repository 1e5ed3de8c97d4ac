//! Insights query types and pagination parsing.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Default and maximum page size.
pub const MAX_LIMIT: i64 = 50;

/// One recorded prompt query with its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStat {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub prompt: Option<String>,
    pub no_response: Option<bool>,
    pub feedback: Option<serde_json::Value>,
}

/// Raw query string of the endpoint. Values are parsed leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightsQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Effective page size and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub page: i64,
}

impl Pagination {
    /// `limit` defaults to and is capped at 50, `page` defaults to 0.
    pub fn from_query(limit: Option<&str>, page: Option<&str>) -> Self {
        Self {
            limit: safe_parse_int(limit, MAX_LIMIT).clamp(1, MAX_LIMIT),
            page: safe_parse_int(page, 0).max(0),
        }
    }

    /// Index of the first row of the page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.limit)
    }
}

/// Optional creation-time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse RFC 3339 timestamps or `YYYY-MM-DD` dates (midnight UTC).
    /// Absent or empty bounds are open.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        })
    }
}

fn parse_bound(value: Option<&str>) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => match DateTime::parse_from_rfc3339(v) {
            Ok(at) => Ok(Some(at.with_timezone(&Utc))),
            Err(_) => {
                let day = NaiveDate::parse_from_str(v, "%Y-%m-%d")?;
                Ok(Some(Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN))))
            }
        },
        None => Ok(None),
    }
}

/// Parse a leading integer the way browsers' `parseInt` does, falling back
/// to `default` when there is none.
///
/// `"12abc"` → 12, `" -3"` → -3, `"0x10"` → 16, `"abc"` → default.
/// Values beyond the `i64` range saturate.
pub fn safe_parse_int(value: Option<&str>, default: i64) -> i64 {
    let Some(s) = value.map(str::trim_start) else {
        return default;
    };

    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return default;
    }

    // Only overflow can fail here.
    match i64::from_str_radix(digits, radix) {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_parse_int() {
        assert_eq!(safe_parse_int(Some("10"), 50), 10);
        assert_eq!(safe_parse_int(Some("12abc"), 50), 12);
        assert_eq!(safe_parse_int(Some(" -3"), 0), -3);
        assert_eq!(safe_parse_int(Some("+7"), 0), 7);
        assert_eq!(safe_parse_int(Some("abc"), 50), 50);
        assert_eq!(safe_parse_int(Some(""), 50), 50);
        assert_eq!(safe_parse_int(Some("-"), 50), 50);
        assert_eq!(safe_parse_int(None, 0), 0);
    }

    #[test]
    fn test_safe_parse_int_hex_and_overflow() {
        assert_eq!(safe_parse_int(Some("0x10"), 0), 16);
        assert_eq!(safe_parse_int(Some("-0XfFz"), 0), -255);
        assert_eq!(safe_parse_int(Some("0x"), 50), 50);
        assert_eq!(safe_parse_int(Some("99999999999999999999"), 0), i64::MAX);
        assert_eq!(safe_parse_int(Some("-99999999999999999999"), 0), i64::MIN);
    }

    #[test]
    fn test_huge_page_saturates() {
        let p = Pagination::from_query(Some("10"), Some("99999999999999999999"));
        assert_eq!(p.page, i64::MAX);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(Pagination::from_query(Some("100"), None).limit, 50);
        assert_eq!(Pagination::from_query(Some("20"), None).limit, 20);
    }

    #[test]
    fn test_defaults() {
        let p = Pagination::from_query(None, None);
        assert_eq!(p, Pagination { limit: 50, page: 0 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_out_of_range_values_are_floored() {
        let p = Pagination::from_query(Some("-5"), Some("-2"));
        assert_eq!(p, Pagination { limit: 1, page: 0 });
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::from_query(Some("10"), Some("3")).offset(), 30);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::parse(Some("2024-01-01T00:00:00Z"), None).unwrap();
        assert!(range.from.is_some());
        assert!(range.to.is_none());

        assert_eq!(DateRange::parse(Some(""), Some(" ")).unwrap(), DateRange::default());
        assert!(DateRange::parse(Some("yesterday"), None).is_err());
        assert!(DateRange::parse(Some("2024-13-01"), None).is_err());
    }

    #[test]
    fn test_date_only_bounds_start_at_midnight_utc() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-02-01")).unwrap();
        assert_eq!(range.from.unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(range.to.unwrap().to_rfc3339(), "2024-02-01T00:00:00+00:00");
    }
}
