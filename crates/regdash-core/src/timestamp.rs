//! Timestamp parsing for feeds, query strings and CLI flags.
//!
//! Offset-aware RFC 3339 input is always converted to UTC. Naive input has no
//! zone, so the caller picks which clock it is read on.

use crate::window::WindowResolver;
use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_with(raw: &str, naive: impl FnOnce(NaiveDateTime) -> DateTime<Utc>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    parse_naive(raw).map(naive)
}

/// Naive input is taken as UTC.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    parse_with(raw, |n| n.and_utc())
}

/// Naive input is read on the lab clock.
pub fn parse_local(raw: &str, resolver: &WindowResolver) -> Option<DateTime<Utc>> {
    parse_with(raw, |n| resolver.local_to_utc(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn naive_input_depends_on_clock() {
        let r = WindowResolver::lab();
        assert_eq!(
            parse_local("2025-10-24 10:00:01", &r),
            Some(utc("2025-10-24T04:30:01Z"))
        );
        assert_eq!(
            parse_utc("2025-10-24 10:00:01"),
            Some(utc("2025-10-24T10:00:01Z"))
        );
    }

    #[test]
    fn offset_aware_input_ignores_clock() {
        let r = WindowResolver::lab();
        let raw = "2025-10-24T10:00:00+00:00";
        assert_eq!(parse_local(raw, &r), parse_utc(raw));
    }

    #[test]
    fn minute_precision_is_accepted() {
        let r = WindowResolver::lab();
        assert_eq!(
            parse_local("2025-10-24T10:00", &r),
            Some(utc("2025-10-24T04:30:00Z"))
        );
        assert_eq!(parse_utc("2025-10-24 10:00"), Some(utc("2025-10-24T10:00:00Z")));
        assert_eq!(parse_utc("2025-10-24"), None);
        assert_eq!(parse_utc("yesterday"), None);
    }
}
