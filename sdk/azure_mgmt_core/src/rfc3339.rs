//! Serde adapters for ARM timestamps.
//!
//! Services emit RFC 3339 timestamps, but some omit the zone designator
//! (`2021-06-01T17:44:01.0000000`). Those are read as UTC.
//!
//! Use with `#[serde(default, with = "azure_mgmt_core::rfc3339::option")]` on
//! `Option<DateTime<Utc>>` fields.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse an ARM timestamp, accepting zone-less values as UTC.
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(err) => {
            let trimmed = value.trim_end_matches(['Z', 'z']);
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .map_err(|_| err)
        }
    }
}

/// Format a timestamp as RFC 3339 with a `Z` suffix.
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

/// Adapter for `Option<DateTime<Utc>>` fields.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&super::format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => super::parse(s)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_zoned_timestamps() {
        let dt = parse("2021-06-01T17:44:01.123+02:00").unwrap();
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.nanosecond(), 123_000_000);
    }

    #[test]
    fn parses_zone_less_timestamps_as_utc() {
        let dt = parse("2021-06-01T17:44:01.0000000").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2021, 6, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (17, 44, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
    }

    #[test]
    fn option_adapter_round_trips_through_json() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(default, with = "option", skip_serializing_if = "Option::is_none")]
            at: Option<DateTime<Utc>>,
        }

        let w: Wrapper = serde_json::from_str(r#"{"at": "2020-01-02T03:04:05Z"}"#).unwrap();
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"at":"2020-01-02T03:04:05Z"}"#);

        let empty: Wrapper = serde_json::from_str("{}").unwrap();
        assert!(empty.at.is_none());
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");
    }
}
