//! Configuration for the session cache.
//!
//! ```toml
//! [session_cache]
//! namespace = "sessioncache"
//! default_ttl_secs = 300    # fractions allowed, e.g. 1.5
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Session key under which all cache entries are grouped.
pub const DEFAULT_NAMESPACE: &str = "sessioncache";

/// Table holding the cache settings in a shared config file.
const SECTION: &str = "session_cache";

/// Configuration for the session cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Session key holding the cache namespace.
    pub namespace: String,

    /// TTL applied when `set` gets no explicit TTL.
    /// Absent or zero means entries live as long as the session.
    #[serde(
        rename = "default_ttl_secs",
        with = "ttl_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_ttl: None,
        }
    }
}

#[derive(Serialize)]
struct SectionedRef<'a> {
    session_cache: &'a CacheConfig,
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session key used as the cache namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the default TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Disable the default TTL (entries live as long as the session).
    pub fn without_default_ttl(mut self) -> Self {
        self.default_ttl = None;
        self
    }

    /// The effective default TTL. Zero counts as no default.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl.filter(|ttl| !ttl.is_zero())
    }

    /// Parse from a TOML string.
    ///
    /// Reads the `[session_cache]` table when present, otherwise the
    /// top-level keys. Unknown keys are rejected.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(toml_str)?;
        let config: CacheConfig = match table.remove(SECTION) {
            Some(section) => section.try_into()?,
            None => toml::Value::Table(table).try_into()?,
        };
        Ok(config)
    }

    /// Serialize to a TOML string under a `[session_cache]` table.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&SectionedRef {
            session_cache: self,
        })?)
    }
}

/// Load a cache configuration from a TOML file.
pub fn load_config_file(path: &Path) -> Result<CacheConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let config = CacheConfig::from_toml(&contents)?;
    tracing::debug!(
        path = %path.display(),
        namespace = %config.namespace,
        default_ttl = ?config.default_ttl,
        "Loaded session cache config"
    );
    Ok(config)
}

/// TTL as (possibly fractional) seconds in TOML.
mod ttl_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ttl: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match ttl {
            None => s.serialize_none(),
            Some(ttl) if ttl.subsec_nanos() == 0 => s.serialize_some(&ttl.as_secs()),
            Some(ttl) => s.serialize_some(&ttl.as_secs_f64()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let Some(secs) = Option::<f64>::deserialize(d)? else {
            return Ok(None);
        };
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid TTL of {} seconds", secs)))
    }
}
