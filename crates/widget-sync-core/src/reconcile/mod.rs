//! Client reconciliation
//!
//! `WidgetStore` mirrors the server collection from structured results,
//! arriving either through the bridge's tool output or as direct responses
//! to calls made through a `ToolInvoker`.

mod invoker;
mod store;

pub use invoker::{InvokeError, InvokeResult, ToolInvoker};
pub use store::{StoreState, WidgetStore};
