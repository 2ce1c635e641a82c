//! Cache entries and their representation inside the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Entry stored in the cache namespace.
///
/// In the session it is kept as a two-element array `[value, expires_at]`,
/// with `expires_at` as Unix milliseconds or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry(
    /// Cached value.
    pub Value,
    /// Absolute expiry. `None` means the entry lives as long as the session.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub Option<DateTime<Utc>>,
);

impl CacheEntry {
    /// Create a new cache entry.
    pub fn new(value: Value, expires_at: Option<DateTime<Utc>>) -> Self {
        Self(value, expires_at)
    }

    /// The cached value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consume the entry, returning the cached value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// When the entry expires, if ever.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.1
    }

    /// Whether the entry is stale at `now`. An entry expiring exactly now is stale.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.1.is_some_and(|expires_at| expires_at <= now)
    }

    /// Encode as the `[value, expires_at]` array kept in the session.
    pub fn to_stored(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode an entry read back from the session. `key` only labels the error.
    pub fn from_stored(key: &str, stored: Value) -> Result<Self> {
        serde_json::from_value(stored).map_err(|e| Error::CorruptEntry {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
