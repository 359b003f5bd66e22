//! Subscribable view over host globals

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::keys::{same_value, DisplayMode, GlobalKey, GlobalValue, Theme};
use super::source::GlobalSource;
use crate::config::BridgeConfig;
use crate::log_debug;
use crate::logging::Logger;
use crate::types::CancellationToken;

/// Default polling-channel interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Reads host globals and notifies subscribers when a value changes.
///
/// Changes are detected on two channels: host `GlobalsUpdated` events and a
/// polling timer for hosts that mutate silently. Both channels compare
/// against the same last-seen value, so a change reported by one is not
/// reported again by the other.
///
/// Without a host source every read is `None` and subscriptions are inert.
#[derive(Clone)]
pub struct GlobalBridge {
    source: Option<Arc<dyn GlobalSource>>,
    poll_interval: Duration,
    logger: Arc<dyn Logger>,
}

impl GlobalBridge {
    pub fn new(source: Arc<dyn GlobalSource>, logger: Arc<dyn Logger>) -> Self {
        Self {
            source: Some(source),
            poll_interval: DEFAULT_POLL_INTERVAL,
            logger,
        }
    }

    /// Bridge whose polling channel runs at the configured interval
    pub fn from_config(
        source: Arc<dyn GlobalSource>,
        config: &BridgeConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self::new(source, logger).with_poll_interval(config.poll_interval())
    }

    /// Bridge used outside any host environment
    pub fn standalone(logger: Arc<dyn Logger>) -> Self {
        Self {
            source: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            logger,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        // A zero period would make tokio's interval panic.
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Current value of `key`; `None` when unset or without a host
    pub fn read(&self, key: GlobalKey) -> Option<GlobalValue> {
        self.source.as_ref().and_then(|source| source.get(key))
    }

    /// Current value of `key` decoded as `T`; `None` when absent or mistyped
    pub fn read_as<T: DeserializeOwned>(&self, key: GlobalKey) -> Option<T> {
        let value = self.read(key)?;
        match serde_json::from_value(value.as_ref().clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                self.logger
                    .debug(&format!("[GlobalBridge] Ignoring {} value: {}", key, e));
                None
            }
        }
    }

    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.read_as(GlobalKey::DisplayMode)
    }

    pub fn max_height(&self) -> Option<u32> {
        self.read_as(GlobalKey::MaxHeight)
    }

    pub fn theme(&self) -> Option<Theme> {
        self.read_as(GlobalKey::Theme)
    }

    pub fn is_host_present(&self) -> bool {
        self.read_as::<bool>(GlobalKey::HostPresent).unwrap_or(false)
    }

    /// Ask the host for a display mode; `None` when no host can grant it
    pub async fn request_display_mode(&self, mode: DisplayMode) -> Option<DisplayMode> {
        let source = self.source.as_ref()?;
        let granted = source.request_display_mode(mode).await;
        self.logger.debug(&format!(
            "[GlobalBridge] Requested display mode {}, granted {:?}",
            mode.as_str(),
            granted
        ));
        granted
    }

    /// Call `on_change` whenever the value of `key` changes.
    ///
    /// The callback runs on a background task and receives the new value.
    /// It does not fire for the value current at subscribe time. Requires a
    /// tokio runtime; without one (or without a host) the subscription is
    /// inert.
    pub fn subscribe<F>(&self, key: GlobalKey, on_change: F) -> Subscription
    where
        F: Fn(Option<GlobalValue>) + Send + Sync + 'static,
    {
        let source = match self.source {
            Some(ref source) => Arc::clone(source),
            None => return Subscription::inert(key),
        };
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                self.logger.warn(&format!(
                    "[GlobalBridge] No async runtime; subscription to {} is inactive",
                    key
                ));
                return Subscription::inert(key);
            }
        };

        let token = CancellationToken::new();
        let mut events = source.on_change();
        let mut last = source.get(key);
        let period = self.poll_interval;
        let logger = Arc::clone(&self.logger);
        let cancelled = token.clone();

        handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut events_open = true;

            loop {
                let recheck = tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    event = events.recv(), if events_open => match event {
                        Ok(update) => update.contains(key),
                        Err(RecvError::Lagged(skipped)) => {
                            logger.debug(&format!(
                                "[GlobalBridge] Missed {} events for {}; re-reading",
                                skipped, key
                            ));
                            true
                        }
                        Err(RecvError::Closed) => {
                            events_open = false;
                            false
                        }
                    },
                    _ = ticker.tick() => true,
                };
                if !recheck {
                    continue;
                }

                let current = source.get(key);
                if !same_value(&last, &current) {
                    last = current.clone();
                    on_change(current);
                }
            }
        });

        log_debug!(self.logger, "[GlobalBridge] Subscribed to {}", key);
        Subscription {
            key,
            token: Some(token),
        }
    }
}

impl std::fmt::Debug for GlobalBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalBridge")
            .field("has_source", &self.source.is_some())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// Handle for one bridge subscription. Unsubscribes when dropped.
#[derive(Debug)]
pub struct Subscription {
    key: GlobalKey,
    token: Option<CancellationToken>,
}

impl Subscription {
    fn inert(key: GlobalKey) -> Self {
        Self { key, token: None }
    }

    pub fn key(&self) -> GlobalKey {
        self.key
    }

    /// Whether the subscription can still fire
    pub fn is_active(&self) -> bool {
        self.token
            .as_ref()
            .map_or(false, |token| !token.is_cancelled())
    }

    /// Stop the listener and the timer. Safe to call any number of times.
    pub fn unsubscribe(&self) {
        if let Some(ref token) = self.token {
            token.cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
