//! Pagination cursor carried in queue messages.
//!
//! The cursor is never stored by the sync itself. Each invocation reads it
//! from the trigger message and publishes the advanced value as the next
//! message, which is what keeps the pagination chain moving.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when decoding an offset message.
#[derive(thiserror::Error, Debug)]
pub enum CursorError {
    /// The payload is not valid JSON of the expected shape.
    #[error("invalid offset message: {0}")]
    Json(#[from] serde_json::Error),
    /// The offset is not a non-negative integer.
    #[error("offset must be a non-negative integer, got {0:?}")]
    InvalidOffset(String),
}

/// Offset into the source catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(u64);

impl Cursor {
    /// Create a cursor at the given offset.
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Get the offset value.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.0
    }

    /// The cursor for the page after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Decode a cursor from a raw queue message payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not `{"offset": ...}` or the offset
    /// is not a non-negative integer.
    pub fn from_message_bytes(bytes: &[u8]) -> Result<Self, CursorError> {
        let message: OffsetMessage = serde_json::from_slice(bytes)?;
        message.cursor()
    }

    /// Encode this cursor as a queue message payload.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_message_bytes(self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&OffsetMessage::from(self))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Cursor {
    fn from(offset: u64) -> Self {
        Self(offset)
    }
}

/// Queue message body: `{"offset": "<integer-as-string>"}`.
///
/// The offset is always written as a string. On read a bare JSON integer is
/// accepted too, since hand-published seed messages often use one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetMessage {
    #[serde(deserialize_with = "offset_as_string")]
    pub offset: String,
}

impl OffsetMessage {
    /// Parse the offset field into a cursor.
    ///
    /// # Errors
    ///
    /// Returns `CursorError::InvalidOffset` if the offset is not a
    /// non-negative integer.
    pub fn cursor(&self) -> Result<Cursor, CursorError> {
        self.offset
            .trim()
            .parse::<u64>()
            .map(Cursor)
            .map_err(|_| CursorError::InvalidOffset(self.offset.clone()))
    }
}

impl From<Cursor> for OffsetMessage {
    fn from(cursor: Cursor) -> Self {
        Self {
            offset: cursor.0.to_string(),
        }
    }
}

fn offset_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or integer offset, got {other}"
        ))),
    }
}
