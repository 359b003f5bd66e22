//! Tool registry
//!
//! Five named operations over one shared collection. Every operation returns
//! a `ToolResponse` whose structured content is the full post-mutation
//! collection plus a result label.
//!
//! ```text
//! host ──tools/call──▶ ToolRegistry ──validate──▶ Operation
//!                          │
//!                          ▼ (one lock per call)
//!                   CollectionStore ──snapshot──▶ StructuredResult
//! ```

mod error;
mod schema;
mod ops;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use schema::{AddTodoArgs, CompleteTodoArgs, DeleteTodoArgs, NoArgs, Operation, TodoTool};
pub use registry::{ToolInfo, ToolRegistry};
