// models/src/timestamp.rs

// The backend serialises some timestamps with an offset and some as bare local
// date-times. Both decode to `NaiveDateTime` (offset ones are normalised to UTC).

use chrono::{DateTime, NaiveDateTime, ParseError, Utc};

pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse(raw: &str) -> Result<NaiveDateTime, ParseError> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc).naive_utc());
    }
    let mut last_err = None;
    for format in LOCAL_FORMATS {
        match NaiveDateTime::parse_from_str(raw, format) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(e),
        None => NaiveDateTime::parse_from_str(raw, WIRE_FORMAT),
    }
}

pub mod option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&v.format(super::WIRE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse(&s)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", s, e))),
        }
    }
}

pub mod required {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(super::WIRE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parses_local_and_offset_forms() {
        let local = parse("2024-05-01T10:15:30").unwrap();
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let fractional = parse("2024-05-01T10:15:30.123456").unwrap();
        assert_eq!(fractional.second(), 30);
        let offset = parse("2024-05-01T17:15:30+07:00").unwrap();
        assert_eq!(offset, local);
        assert!(parse("yesterday").is_err());
    }

    #[derive(serde::Deserialize)]
    struct Row {
        #[serde(default, with = "super::option")]
        at: Option<NaiveDateTime>,
    }

    #[test]
    fn blank_and_missing_decode_to_none() {
        let row: Row = serde_json::from_str(r#"{"at": ""}"#).unwrap();
        assert!(row.at.is_none());
        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert!(row.at.is_none());
        let row: Row = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(row.at.is_none());
    }
}
