//! Canonical UTC timestamps of the wire format.
//!
//! The control plane exchanges times as `YYYY-MM-DDTHH:MM:SS.mmmZ`. A
//! [`Timestamp`] stores exactly what that text can express (millisecond
//! precision, years 0000 through 9999), so formatting and parsing are exact
//! inverses.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MessageError, MessageResult};

/// `chrono` format string of the canonical text form.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Shape of the canonical text; `0` stands for any ASCII digit.
const TIMESTAMP_TEMPLATE: &str = "0000-00-00T00:00:00.000Z";

/// Unix seconds of `0001-01-01T00:00:00Z`, the wire value of an unset time.
const ZERO_UNIX_SECONDS: i64 = -62_135_596_800;

const NANOS_PER_MILLI: u32 = 1_000_000;

/// A UTC instant with millisecond precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time, truncated to milliseconds.
    #[must_use]
    pub fn now() -> Self {
        Self(truncate_to_millis(Utc::now()))
    }

    /// `0001-01-01T00:00:00.000Z`, sent by the control plane for unset times.
    #[must_use]
    pub fn zero() -> Self {
        Self(DateTime::from_timestamp(ZERO_UNIX_SECONDS, 0).unwrap_or_default())
    }

    /// Wrap a `chrono` instant, dropping sub-millisecond precision.
    ///
    /// Fails for years outside 0000..=9999 and for leap seconds, neither of
    /// which the canonical text can carry.
    pub fn from_datetime(datetime: DateTime<Utc>) -> MessageResult<Self> {
        if !(0..=9999).contains(&datetime.year()) {
            return Err(MessageError::invalid_timestamp(
                datetime.to_rfc3339(),
                "year must be between 0000 and 9999",
            ));
        }
        if datetime.nanosecond() >= 1_000_000_000 {
            return Err(MessageError::invalid_timestamp(
                datetime.to_rfc3339(),
                "leap seconds are not representable",
            ));
        }
        Ok(Self(truncate_to_millis(datetime)))
    }

    /// Instant `millis` milliseconds after the Unix epoch.
    pub fn from_unix_millis(millis: i64) -> MessageResult<Self> {
        let datetime = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            MessageError::invalid_timestamp(millis.to_string(), "out of range unix milliseconds")
        })?;
        Self::from_datetime(datetime)
    }

    /// Underlying `chrono` instant.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub fn unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::zero()
    }
}

fn truncate_to_millis(datetime: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = datetime.nanosecond() / NANOS_PER_MILLI * NANOS_PER_MILLI;
    datetime.with_nanosecond(nanos).unwrap_or(datetime)
}

fn matches_template(text: &str) -> bool {
    text.len() == TIMESTAMP_TEMPLATE.len()
        && text
            .bytes()
            .zip(TIMESTAMP_TEMPLATE.bytes())
            .all(|(actual, expected)| match expected {
                b'0' => actual.is_ascii_digit(),
                literal => actual == literal,
            })
}

/// Parse canonical timestamp text.
pub fn parse_timestamp(text: &str) -> MessageResult<Timestamp> {
    if !matches_template(text) {
        return Err(MessageError::invalid_timestamp(
            text,
            "expected the form YYYY-MM-DDTHH:MM:SS.mmmZ",
        ));
    }
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|err| MessageError::invalid_timestamp(text, err.to_string()))?;
    Timestamp::from_datetime(naive.and_utc())
        .map_err(|_| MessageError::invalid_timestamp(text, "not representable"))
}

/// Canonical text of a timestamp.
#[must_use]
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.0.format(TIMESTAMP_FORMAT).to_string()
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = MessageError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_timestamp(text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text).map_err(D::Error::custom)
    }
}
