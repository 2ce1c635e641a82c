//! Session cache with lazy TTL expiration.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::error::{Error, Result};
use crate::logger::CacheLogger;
use crate::store::{MemorySessionStore, SessionStore};

/// A key/value cache.
///
/// Object safe, so hosts can hold a `Box<dyn Cache>` and swap
/// implementations.
pub trait Cache: Send + Sync {
    /// Get a cached value, or `None` on a miss.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store a value. `ttl` of `None` falls back to the cache default.
    fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()>;

    /// Remove one key. Missing keys are ignored.
    fn purge(&self, key: &str) -> Result<()>;

    /// Remove everything.
    fn purge_all(&self) -> Result<()>;
}

/// Cache whose entries live inside the user's session.
///
/// All entries are kept under one namespace key of the session store as
/// `key -> [value, expires_at]`. The cache itself holds no entries: every
/// call goes straight to the store, which stays the single source of truth.
///
/// Expired entries are removed lazily, when a `get` finds them stale.
pub struct SessionCache<S: SessionStore = MemorySessionStore> {
    store: S,
    logger: Arc<dyn CacheLogger>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl<S: SessionStore> SessionCache<S> {
    /// Create a cache over `store` with the default configuration.
    pub fn new(store: S, logger: impl CacheLogger + 'static) -> Self {
        Self {
            store,
            logger: Arc::new(logger),
            clock: Arc::new(SystemClock),
            config: CacheConfig::default(),
        }
    }

    /// Start building a cache over `store`.
    pub fn builder(store: S) -> SessionCacheBuilder<S> {
        SessionCacheBuilder::new(store)
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the underlying session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Get a cached value.
    ///
    /// A stale entry is deleted from the session and reported as a miss.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(stored) = self.store.read_entry(self.namespace(), key)? else {
            self.logger.trace(&format!(
                "Retrieving key '{}' from session cache: cache miss.",
                key
            ));
            return Ok(None);
        };

        let entry = CacheEntry::from_stored(key, stored)?;
        if entry.is_expired(self.clock.now()) {
            self.store.remove_entry(self.namespace(), key)?;
            self.logger.trace(&format!(
                "Retrieving key '{}' from session cache: key outdated, cache miss.",
                key
            ));
            return Ok(None);
        }

        self.logger
            .trace(&format!("Retrieving key '{}' from session cache.", key));
        Ok(Some(entry.into_value()))
    }

    /// Store a value, overwriting any existing entry for `key`.
    ///
    /// Expiry comes from `ttl` if given and non-zero, else from the
    /// configured default TTL, else the entry lives as long as the session.
    pub fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        self.logger
            .trace(&format!("Storing value in cache: key '{}'", key));

        let expires_at = self.expiry_for(ttl);
        let entry = CacheEntry::new(value, expires_at);
        self.store
            .write_entry(self.namespace(), key, entry.to_stored()?)
    }

    /// Remove `key` from the cache. No-op if it is not cached.
    pub fn purge(&self, key: &str) -> Result<()> {
        self.logger
            .trace(&format!("Purging key '{}' from session cache.", key));
        if self.store.contains_namespace(self.namespace())? {
            self.store.remove_entry(self.namespace(), key)?;
        }
        Ok(())
    }

    /// Remove the whole namespace from the session.
    pub fn purge_all(&self) -> Result<()> {
        self.logger.trace("Purging the whole session cache.");
        self.store.remove_namespace(self.namespace())
    }

    /// Whether the cache namespace currently exists in the session.
    pub fn is_initialized(&self) -> Result<bool> {
        self.store.contains_namespace(self.namespace())
    }

    /// Get a cached value and deserialize it into `T`.
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` and store it.
    pub fn set_typed<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value, ttl)
    }

    fn expiry_for(&self, ttl: Option<Duration>) -> Option<DateTime<Utc>> {
        let ttl = ttl
            .filter(|ttl| !ttl.is_zero())
            .or_else(|| self.config.default_ttl())?;
        // Expiries past the representable range never expire.
        let delta = TimeDelta::from_std(ttl).ok()?;
        self.clock.now().checked_add_signed(delta)
    }
}

impl<S: SessionStore> Cache for SessionCache<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        SessionCache::get(self, key)
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        SessionCache::set(self, key, value, ttl)
    }

    fn purge(&self, key: &str) -> Result<()> {
        SessionCache::purge(self, key)
    }

    fn purge_all(&self) -> Result<()> {
        SessionCache::purge_all(self)
    }
}

impl<S: SessionStore + Clone> Clone for SessionCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            logger: Arc::clone(&self.logger),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

/// Builder for [`SessionCache`].
///
/// A logger is compulsory; [`build`](Self::build) fails with
/// [`Error::MissingLogger`] without one.
pub struct SessionCacheBuilder<S: SessionStore> {
    store: S,
    logger: Option<Arc<dyn CacheLogger>>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl<S: SessionStore> SessionCacheBuilder<S> {
    /// Create a builder over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            logger: None,
            clock: Arc::new(SystemClock),
            config: CacheConfig::default(),
        }
    }

    /// Set the logger.
    pub fn logger(mut self, logger: impl CacheLogger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Set the time source.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default TTL.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config = self.config.with_default_ttl(ttl);
        self
    }

    /// Set the session key used as the cache namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config = self.config.with_namespace(namespace);
        self
    }

    /// Build the cache.
    pub fn build(self) -> Result<SessionCache<S>> {
        let logger = self.logger.ok_or(Error::MissingLogger)?;
        tracing::debug!(
            namespace = %self.config.namespace,
            default_ttl = ?self.config.default_ttl(),
            "Session cache created"
        );
        Ok(SessionCache {
            store: self.store,
            logger,
            clock: self.clock,
            config: self.config,
        })
    }
}
