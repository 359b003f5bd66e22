//! Global Sync Bridge
//!
//! Mirrors host-owned globals into subscribable values. The host may
//! announce changes with an event or mutate silently, so every subscription
//! listens for events and also polls.
//!
//! ```text
//! host ──GlobalsUpdated──┐
//!                        ├──▶ re-read ──changed?──▶ on_change(value)
//! poll tick (500 ms) ────┘         (shared last-seen value)
//! ```

mod keys;
mod source;
mod global;

pub use keys::{same_value, DisplayMode, GlobalKey, GlobalValue, GlobalsUpdated, Theme};
pub use source::{GlobalSource, HostGlobals};
pub use global::{GlobalBridge, Subscription, DEFAULT_POLL_INTERVAL};
