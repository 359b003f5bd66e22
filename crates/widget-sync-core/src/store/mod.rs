//! Collection storage
//!
//! The registry owns exactly one `CollectionStore`. `MemoryCollection` is the
//! built-in implementation; durable backends plug in behind the same trait.

mod traits;
mod memory;

pub use traits::CollectionStore;
pub use memory::MemoryCollection;
