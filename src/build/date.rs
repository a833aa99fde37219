//! Publication date parsing and formatting.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid date '{value}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
pub struct DateError {
    pub value: String,
}

/// A post's publication timestamp, stored as UTC.
///
/// Front matter accepts either a bare date (`2024-06-15`, taken as midnight
/// UTC) or a full RFC 3339 timestamp (`2024-06-15T09:30:00Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PostDate(NaiveDateTime);

impl PostDate {
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date.and_time(NaiveTime::MIN)));
        }

        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.naive_utc()))
            .map_err(|_| DateError {
                value: s.to_string(),
            })
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// RFC 2822 rendering, used for feed `pubDate` fields.
    pub fn to_rfc2822(&self) -> String {
        Utc.from_utc_datetime(&self.0).to_rfc2822()
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PostDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_date() {
        let date = PostDate::parse("2024-06-15").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.to_string(), "2024-06-15");
    }

    #[test]
    fn test_parse_rfc3339() {
        let date = PostDate::parse("2024-06-15T09:30:00Z").unwrap();
        assert_eq!(date.to_string(), "2024-06-15");
        assert!(date > PostDate::parse("2024-06-15").unwrap());
    }

    #[test]
    fn test_parse_rejects_invalid_dates() {
        assert!(PostDate::parse("not-a-date").is_err());
        assert!(PostDate::parse("2024-13-01").is_err());
        assert!(PostDate::parse("2023-02-29").is_err());
        assert!(PostDate::parse("").is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let older = PostDate::parse("2023-01-31").unwrap();
        let newer = PostDate::parse("2024-01-01").unwrap();
        assert!(newer > older);
    }

    #[test]
    fn test_rfc2822() {
        let date = PostDate::parse("2024-01-15T10:30:45Z").unwrap();
        let rfc2822 = date.to_rfc2822();
        assert!(rfc2822.contains("15 Jan 2024"));
        assert!(rfc2822.contains("10:30:45"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let date: PostDate = serde_yaml::from_str("2024-06-15").unwrap();
        assert_eq!(date, PostDate::parse("2024-06-15").unwrap());
        assert!(serde_yaml::to_string(&date).unwrap().contains("2024-06-15"));
    }
}
