//! Per-user key/value cache stored inside a session.
//!
//! This crate memoizes values for the lifetime of one user's session:
//! - Entries live under a single namespace key in the session store
//! - Optional per-entry or default TTL, expired lazily on read
//! - Every operation reads and writes through the store; the cache keeps no state
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use session_cache::{MemorySessionStore, SessionCache, TracingLogger};
//!
//! let store = MemorySessionStore::started();
//! let cache = SessionCache::builder(store)
//!     .logger(TracingLogger)
//!     .default_ttl(Duration::from_secs(300))
//!     .build()?;
//!
//! cache.set_typed("user:42:name", &"Ada", None)?;
//! let name: Option<String> = cache.get_typed("user:42:name")?;
//! ```

mod cache;
mod clock;
mod config;
mod entry;
mod error;
mod logger;
mod store;

pub use cache::{Cache, SessionCache, SessionCacheBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_NAMESPACE, load_config_file};
pub use entry::CacheEntry;
pub use error::{ConfigError, Error, Result};
pub use logger::{CacheLogger, LogEntry, MemoryLogger, TracingLogger};
pub use store::{MemorySessionStore, SessionStore};
