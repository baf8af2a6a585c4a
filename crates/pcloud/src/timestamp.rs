//! Timestamps as the pCloud API writes them.
//!
//! Every date on the wire uses one fixed layout, e.g.
//! `Wed, 06 Dec 2023 10:15:30 +0000`. Anything else, including ISO-8601, is a
//! parse error rather than a silent fallback.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// `chrono` format string for the wire layout.
pub const FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// A timestamp decoded from a response.
pub type Timestamp = DateTime<FixedOffset>;

/// Parses a wire timestamp.
///
/// # Errors
///
/// Returns an error if `value` does not match [`FORMAT`] exactly.
pub fn parse(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_str(value, FORMAT)
}

/// Formats a timestamp in the wire layout.
pub fn format<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    value.format(FORMAT).to_string()
}

pub(crate) fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|e| D::Error::custom(format_args!("invalid timestamp '{raw}': {e}")))
}

/// Serde adapters for `Option<Timestamp>` fields.
pub(crate) mod option {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::Timestamp;

    #[expect(
        clippy::ref_option,
        reason = "serde's serialize_with passes a reference to the field"
    )]
    pub(crate) fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => super::serialize(ts, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(Some)
                .map_err(|e| D::Error::custom(format_args!("invalid timestamp '{raw}': {e}"))),
            None => Ok(None),
        }
    }
}
