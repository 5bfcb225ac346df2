//! Scalar encodings for `timestamptz` and `uuid` values.
//!
//! The backend renders timestamps with fractional seconds and a zone offset
//! (`2019-10-12T14:03:21.123456+00:00`), but the client only reads the leading
//! `yyyy-MM-dd'T'HH:mm:ss` part. Everything after it is ignored and the result
//! is taken to be UTC. The format carries no zone of its own, so UTC is a
//! convention, not something read off the wire.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::DecodeError;

/// `strftime` pattern equivalent to `yyyy-MM-dd'T'HH:mm:ss`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Length of a timestamp rendered with [`TIMESTAMP_FORMAT`].
const TIMESTAMP_LEN: usize = 19;

/// Decode a backend timestamp.
///
/// Reads the first 19 characters as `yyyy-MM-dd'T'HH:mm:ss`; any suffix
/// (fractional seconds, `Z`, `+00:00`) is ignored.
pub fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, DecodeError> {
    let head = value.get(..TIMESTAMP_LEN).ok_or_else(|| DecodeError::Timestamp {
        value: value.to_string(),
        reason: format!("expected at least {TIMESTAMP_LEN} characters"),
    })?;

    NaiveDateTime::parse_from_str(head, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| DecodeError::Timestamp { value: value.to_string(), reason: e.to_string() })
}

/// Encode a timestamp as `yyyy-MM-dd'T'HH:mm:ss` (UTC, no suffix).
pub fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Decode a hyphenated UUID string.
pub fn decode_uuid(value: &str) -> Result<Uuid, DecodeError> {
    Uuid::parse_str(value)
        .map_err(|e| DecodeError::Uuid { value: value.to_string(), reason: e.to_string() })
}

/// Encode a UUID in its standard hyphenated form.
pub fn encode_uuid(value: &Uuid) -> String {
    value.hyphenated().to_string()
}
