//! crates/spotter_core/src/timestamps.rs
//!
//! Timestamp decoding for backend responses.
//!
//! The backend is not consistent about how it renders timestamps: stored
//! procedures return fractional-second ISO-8601, plain table reads return
//! whole-second ISO-8601, some legacy rows carry a `+0000`-style offset
//! without a colon, and date-only columns come back as bare `YYYY-MM-DD`.
//! Decoding tries each shape in that order and fails only when none match.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Raised when a timestamp string matches none of the accepted formats.
#[derive(Debug, thiserror::Error)]
#[error("unrecognised timestamp format: '{0}'")]
pub struct TimestampFormatError(pub String);

/// Parses a backend timestamp string, attempting each accepted shape in order.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampFormatError> {
    // Fractional and whole-second ISO-8601, with 'Z' or a ':'-separated offset.
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    // Offsets without a colon, e.g. "2024-03-01T09:30:00+0000".
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    // Bare dates decode as midnight UTC.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| TimestampFormatError(raw.to_string()))?;
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    Err(TimestampFormatError(raw.to_string()))
}

/// Serde adapter for required timestamp fields.
///
/// Deserializes through [`parse_timestamp`]; serializes as fractional
/// ISO-8601 UTC, which every backend procedure accepts on the way in.
pub mod flexible {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case::fractional_iso("2024-03-01T09:30:00.250000Z")]
    #[case::whole_second_iso("2024-03-01T09:30:00Z")]
    #[case::colon_offset("2024-03-01T10:30:00+01:00")]
    #[case::no_colon_offset("2024-03-01T09:30:00+0000")]
    fn accepted_formats_agree_on_the_instant(#[case] raw: &str) {
        let parsed = parse_timestamp(raw).expect("format should be accepted");
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        // The fractional case carries 250ms; compare at whole-second granularity.
        assert_eq!(parsed.timestamp(), expected.timestamp());
    }

    #[test]
    fn bare_date_decodes_as_midnight_utc() {
        let parsed = parse_timestamp("2024-03-01").expect("bare date should be accepted");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn malformed_string_is_rejected() {
        let error = parse_timestamp("March 1st, 2024").expect_err("format should be rejected");
        assert!(error.to_string().contains("March 1st, 2024"));
    }

    #[test]
    fn fractional_seconds_are_preserved() {
        let parsed = parse_timestamp("2024-03-01T09:30:00.250000Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }
}
