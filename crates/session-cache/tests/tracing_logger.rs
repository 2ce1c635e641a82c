//! `TracingLogger` emits cache activity as TRACE events.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;

use session_cache::{ManualClock, MemorySessionStore, SessionCache, TracingLogger};

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    target: String,
    message: String,
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);
        self.events.lock().push(Captured {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
        });
    }
}

#[test]
fn test_cache_activity_is_traced() {
    let layer = CaptureLayer::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        let clock = ManualClock::default();
        let cache = SessionCache::builder(MemorySessionStore::started())
            .logger(TracingLogger)
            .clock(clock.clone())
            .build()
            .unwrap();

        cache.get("a").unwrap();
        cache
            .set("a", json!(1), Some(Duration::from_secs(1)))
            .unwrap();
        cache.get("a").unwrap();
        clock.advance(Duration::from_secs(1));
        cache.get("a").unwrap();
        cache.purge("a").unwrap();
        cache.purge_all().unwrap();
    });

    let traced: Vec<Captured> = events
        .lock()
        .iter()
        .filter(|e| e.target == "session_cache")
        .cloned()
        .collect();

    assert!(traced.iter().all(|e| e.level == Level::TRACE));
    let messages: Vec<&str> = traced.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Retrieving key 'a' from session cache: cache miss.",
            "Storing value in cache: key 'a'",
            "Retrieving key 'a' from session cache.",
            "Retrieving key 'a' from session cache: key outdated, cache miss.",
            "Purging key 'a' from session cache.",
            "Purging the whole session cache.",
        ]
    );
}
