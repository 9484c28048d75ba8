use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Weekday};

use super::error::BonusError;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Transaction instant resolved to the wall clock it was reported in.
///
/// Calendar facts are read from the local date and time as written, so
/// `2024-01-06T23:30:00-05:00` is a Saturday even though it is Sunday in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionTime {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl TransactionTime {
    /// Parse an ISO-8601 timestamp. A trailing `Z` is read as `+00:00`.
    pub fn parse(raw: &str) -> Result<Self, BonusError> {
        let invalid = || BonusError::InvalidTimestamp {
            value: raw.to_string(),
        };

        let mut normalized = match raw.strip_suffix('Z') {
            Some(head) => format!("{head}+00:00"),
            None => raw.to_string(),
        };
        if normalized.get(10..11) == Some(" ") {
            normalized.replace_range(10..11, "T");
        }
        if is_hour_only(&normalized) {
            normalized.insert_str(13, ":00");
        }

        for format in OFFSET_FORMATS {
            if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
                return Ok(Self {
                    local: parsed.naive_local(),
                    offset: Some(*parsed.offset()),
                });
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(local) = NaiveDateTime::parse_from_str(&normalized, format) {
                return Ok(Self {
                    local,
                    offset: None,
                });
            }
        }

        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|local| Self {
                local,
                offset: None,
            })
            .ok_or_else(invalid)
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn weekday(&self) -> Weekday {
        self.local.weekday()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// `YYYY-MM-DDTHH`, optionally followed by an offset.
fn is_hour_only(value: &str) -> bool {
    let hour_digits = value
        .get(11..13)
        .is_some_and(|hour| hour.bytes().all(|b| b.is_ascii_digit()));
    let tail = value.get(13..14);
    value.get(10..11) == Some("T")
        && hour_digits
        && matches!(tail, None | Some("+") | Some("-"))
}
