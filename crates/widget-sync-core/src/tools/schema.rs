//! Tool catalogue and argument validation
//!
//! Each tool's arguments deserialize into a typed struct; the same struct
//! produces the JSON Schema advertised to the host.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::error::{RegistryError, RegistryResult};
use crate::types::ItemId;

/// Arguments for `add_todo`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddTodoArgs {
    /// The task description
    pub text: String,
}

/// Arguments for `complete_todo`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompleteTodoArgs {
    /// The ID of the task to complete
    pub id: String,
}

/// Arguments for `delete_todo`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteTodoArgs {
    /// The ID of the task to delete
    pub id: String,
}

/// Tools that take no arguments
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// The fixed set of tools the registry exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoTool {
    AddTodo,
    ListTodos,
    CompleteTodo,
    DeleteTodo,
    ClearCompleted,
}

impl TodoTool {
    pub const ALL: [TodoTool; 5] = [
        TodoTool::AddTodo,
        TodoTool::ListTodos,
        TodoTool::CompleteTodo,
        TodoTool::DeleteTodo,
        TodoTool::ClearCompleted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TodoTool::AddTodo => "add_todo",
            TodoTool::ListTodos => "list_todos",
            TodoTool::CompleteTodo => "complete_todo",
            TodoTool::DeleteTodo => "delete_todo",
            TodoTool::ClearCompleted => "clear_completed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TodoTool::AddTodo => "Add Todo",
            TodoTool::ListTodos => "List Todos",
            TodoTool::CompleteTodo => "Complete Todo",
            TodoTool::DeleteTodo => "Delete Todo",
            TodoTool::ClearCompleted => "Clear Completed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TodoTool::AddTodo => "Add a new task to the todo list",
            TodoTool::ListTodos => "Show all tasks in the todo list",
            TodoTool::CompleteTodo => "Mark a task as completed",
            TodoTool::DeleteTodo => "Remove a task from the todo list",
            TodoTool::ClearCompleted => "Remove all completed tasks from the list",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// JSON Schema for this tool's arguments
    pub fn input_schema(&self) -> Value {
        let schema = match self {
            TodoTool::AddTodo => serde_json::to_value(schema_for!(AddTodoArgs)),
            TodoTool::CompleteTodo => serde_json::to_value(schema_for!(CompleteTodoArgs)),
            TodoTool::DeleteTodo => serde_json::to_value(schema_for!(DeleteTodoArgs)),
            TodoTool::ListTodos | TodoTool::ClearCompleted => serde_json::to_value(schema_for!(NoArgs)),
        };
        // MCP requires an object schema even for argument-less tools.
        let mut schema = schema.unwrap_or_else(|_| json!({}));
        if let Some(object) = schema.as_object_mut() {
            object.insert("type".to_string(), json!("object"));
            object.entry("properties").or_insert_with(|| Value::Object(Map::new()));
        }
        schema
    }
}

/// A validated request against the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Add { text: String },
    List,
    Complete { id: ItemId },
    Delete { id: ItemId },
    ClearCompleted,
}

impl Operation {
    /// Validate raw arguments for `tool`
    ///
    /// A `null` argument value is treated as an empty object.
    pub fn parse(tool: TodoTool, arguments: Value) -> RegistryResult<Self> {
        match tool {
            TodoTool::AddTodo => {
                let args: AddTodoArgs = parse_args(tool, arguments)?;
                if args.text.trim().is_empty() {
                    return Err(RegistryError::invalid_arguments(
                        tool.name(),
                        "`text` must not be empty",
                    ));
                }
                Ok(Operation::Add { text: args.text })
            }
            TodoTool::ListTodos => {
                parse_args::<NoArgs>(tool, arguments)?;
                Ok(Operation::List)
            }
            TodoTool::CompleteTodo => {
                let args: CompleteTodoArgs = parse_args(tool, arguments)?;
                Ok(Operation::Complete { id: ItemId::new(args.id) })
            }
            TodoTool::DeleteTodo => {
                let args: DeleteTodoArgs = parse_args(tool, arguments)?;
                Ok(Operation::Delete { id: ItemId::new(args.id) })
            }
            TodoTool::ClearCompleted => {
                parse_args::<NoArgs>(tool, arguments)?;
                Ok(Operation::ClearCompleted)
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: TodoTool, arguments: Value) -> RegistryResult<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => arguments,
        other => {
            return Err(RegistryError::invalid_arguments(
                tool.name(),
                format!("expected an object, got {}", json_type(&other)),
            ))
        }
    };
    serde_json::from_value(arguments)
        .map_err(|e| RegistryError::invalid_arguments(tool.name(), e.to_string()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
