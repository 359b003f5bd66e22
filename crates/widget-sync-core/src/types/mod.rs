//! Core types shared by the registry, the bridge and the widget store

mod item;
mod result;
mod cancellation;

pub use item::{Item, ItemId, ItemIdGenerator};
pub use result::{ContentBlock, ResultAction, StructuredResult, ToolResponse};
pub use cancellation::CancellationToken;
