//! Host global sources

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;

use super::keys::{DisplayMode, GlobalKey, GlobalValue, GlobalsUpdated};

const EVENT_CAPACITY: usize = 64;

/// Capability the host environment injects into the widget
///
/// Implementations:
/// - `HostGlobals`: in-process globals for embedding and tests
#[async_trait]
pub trait GlobalSource: Send + Sync {
    /// Current value of a global, if the host has set it
    fn get(&self, key: GlobalKey) -> Option<GlobalValue>;

    /// Receiver for change notifications. Hosts may also mutate silently.
    fn on_change(&self) -> broadcast::Receiver<GlobalsUpdated>;

    /// Ask the host to switch display mode; returns the mode it granted
    async fn request_display_mode(&self, _mode: DisplayMode) -> Option<DisplayMode> {
        None
    }
}

/// Globals held in process
///
/// `set` publishes a `GlobalsUpdated` event, `set_silently` does not.
#[derive(Debug)]
pub struct HostGlobals {
    values: RwLock<HashMap<GlobalKey, GlobalValue>>,
    events: broadcast::Sender<GlobalsUpdated>,
}

impl Default for HostGlobals {
    fn default() -> Self {
        Self::new()
    }
}

impl HostGlobals {
    /// Host with the presence flag set and display-mode requests enabled
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut values = HashMap::new();
        values.insert(GlobalKey::HostPresent, GlobalValue::new(Value::Bool(true)));
        values.insert(GlobalKey::RequestDisplayMode, GlobalValue::new(Value::Bool(true)));
        Self {
            values: RwLock::new(values),
            events,
        }
    }

    /// Set a value and notify listeners
    pub fn set(&self, key: GlobalKey, value: impl Into<Value>) -> GlobalValue {
        let value = GlobalValue::new(value.into());
        self.set_shared(key, value.clone());
        value
    }

    /// Set an already shared value and notify listeners
    pub fn set_shared(&self, key: GlobalKey, value: GlobalValue) {
        self.values.write().insert(key, value.clone());
        // No receivers is fine.
        let _ = self.events.send(GlobalsUpdated::single(key, value));
    }

    /// Set a value without dispatching an event
    pub fn set_silently(&self, key: GlobalKey, value: impl Into<Value>) -> GlobalValue {
        let value = GlobalValue::new(value.into());
        self.values.write().insert(key, value.clone());
        value
    }

    /// Unset a value and notify listeners with `null`
    pub fn remove(&self, key: GlobalKey) -> Option<GlobalValue> {
        let previous = self.values.write().remove(&key);
        if previous.is_some() {
            let _ = self
                .events
                .send(GlobalsUpdated::single(key, GlobalValue::new(Value::Null)));
        }
        previous
    }

    /// Number of live change receivers
    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }
}

#[async_trait]
impl GlobalSource for HostGlobals {
    fn get(&self, key: GlobalKey) -> Option<GlobalValue> {
        self.values.read().get(&key).cloned()
    }

    fn on_change(&self) -> broadcast::Receiver<GlobalsUpdated> {
        self.events.subscribe()
    }

    async fn request_display_mode(&self, mode: DisplayMode) -> Option<DisplayMode> {
        if self.get(GlobalKey::RequestDisplayMode).is_none() {
            return None;
        }
        self.set(GlobalKey::DisplayMode, mode.as_str());
        Some(mode)
    }
}
