//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{TimeZone, Utc};

use colab_planner::app::{Action, App};
use colab_planner::config::PlannerConfig;
use colab_planner::error::{ClipboardError, StoreError};
use colab_planner::flows::clipboard::{Clipboard, MemoryClipboard};
use colab_planner::flows::store::{KeyValueStore, MemoryStore};
use colab_planner::wizard::binder::Field;

/// Stock configuration with a fixed chart seed.
pub fn seeded_config() -> PlannerConfig {
    let mut config = PlannerConfig::standard();
    config.chart.seed = Some(42);
    config
}

/// Planner with in-memory storage and clipboard, clock fixed at a known date.
pub fn app_with(config: PlannerConfig) -> App {
    app_with_backends(
        config,
        Box::new(MemoryStore::new()),
        Box::new(MemoryClipboard::new()),
    )
}

pub fn default_app() -> App {
    app_with(seeded_config())
}

pub fn app_with_backends(
    config: PlannerConfig,
    store: Box<dyn KeyValueStore>,
    clipboard: Box<dyn Clipboard>,
) -> App {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
    App::with_now(config, store, clipboard, now)
}

pub fn edit(app: &mut App, field: Field, raw: &str) {
    app.dispatch(Action::Edit {
        field,
        raw: raw.to_string(),
    });
}

/// Message of the newest live toast.
pub fn last_message(app: &App) -> Option<String> {
    app.notifier().latest().map(|t| t.message.clone())
}

/// Store whose contents stay readable after the planner takes ownership.
#[derive(Debug, Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<BTreeMap<String, String>>>);

impl KeyValueStore for SharedStore {
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.0.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.borrow().get(key).cloned())
    }
}

/// Store that rejects every write.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn set(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }
}

/// Clipboard that is never available.
pub struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError("permission denied".to_string()))
    }
}
