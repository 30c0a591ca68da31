//! Serde adapter for note dates.
//!
//! Writes `YYYY-MM-DDTHH:MM:SS.sssZ`. Reads any RFC 3339 timestamp, plus a bare
//! `YYYY-MM-DD` calendar date interpreted as midnight UTC.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use serde::de::Unexpected::Str;
use serde::de::{Error, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt::Formatter;

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    struct IsoDateVisitor;

    impl Visitor<'_> for IsoDateVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("an ISO-8601 date or date-time string")
        }

        fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
            parse(v).ok_or_else(|| Error::invalid_value(Str(v), &self))
        }
    }

    deserializer.deserialize_str(IsoDateVisitor)
}

/// Renders a date the way the stored collection expects it.
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 date-time or a plain calendar date.
///
/// Sub-millisecond digits are dropped so a parsed date always survives
/// `format` unchanged.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc).trunc_subsecs(3));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::{format, parse};
    use chrono::{Datelike, TimeZone, Utc};

    #[test]
    fn format_uses_millisecond_precision_and_z_suffix() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(format(&date), "2024-01-05T09:30:00.000Z");
    }

    #[test]
    fn parse_accepts_offsets_and_plain_dates() {
        let offset = parse("2024-01-05T23:30:00.000-02:00").expect("offset date-time");
        assert_eq!(offset.day(), 6);

        let plain = parse(" 2024-01-05 ").expect("calendar date");
        assert_eq!(format(&plain), "2024-01-05T00:00:00.000Z");
    }

    #[test]
    fn parse_drops_sub_millisecond_digits() {
        let parsed = parse("2024-01-05T09:30:00.123456789Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(parse(&format(&parsed)), Some(parsed));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse("yesterday").is_none());
        assert!(parse("").is_none());
    }
}
