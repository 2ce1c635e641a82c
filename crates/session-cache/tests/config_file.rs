//! Loading cache configuration from disk.

use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

use session_cache::{
    ConfigError, ManualClock, MemoryLogger, MemorySessionStore, SessionCache, SessionStore,
    load_config_file,
};

#[test]
fn test_load_and_apply() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("cache.toml");
    std::fs::write(
        &path,
        r#"
[session_cache]
namespace = "navigation"
default_ttl_secs = 120
"#,
    )?;

    let config = load_config_file(&path)?;
    assert_eq!(config.default_ttl(), Some(Duration::from_secs(120)));

    let store = MemorySessionStore::started();
    let clock = ManualClock::default();
    let cache = SessionCache::builder(store.clone())
        .logger(MemoryLogger::new())
        .clock(clock.clone())
        .config(config)
        .build()?;

    cache.set("breadcrumbs", json!(["home", "docs"]), None)?;
    assert!(store.contains_namespace("navigation")?);
    assert!(!store.contains_namespace("sessioncache")?);

    clock.advance(Duration::from_secs(120));
    assert_eq!(cache.get("breadcrumbs")?, None);
    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_config_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[test]
fn test_saved_config_loads_back() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("cache.toml");
    let config = session_cache::CacheConfig::new().with_default_ttl(Duration::from_secs(15));

    std::fs::write(&path, config.to_toml()?)?;

    assert_eq!(load_config_file(&path)?, config);
    Ok(())
}
