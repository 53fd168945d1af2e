use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::Todo;

/// Persistence operations behind the todo handlers.
///
/// Requests reaching a store have already been validated; `title` and
/// `status` are the normalized values to persist.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos in storage order.
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError>;

    /// Insert a todo and return it with its assigned id.
    async fn create_todo(&self, title: &str, status: &str) -> Result<Todo, ApiError>;

    /// Replace title and status of an existing todo.
    /// Absent ids yield `ApiError::NotFound`.
    async fn update_todo(&self, id: i32, title: &str, status: &str) -> Result<Todo, ApiError>;

    /// Remove a todo, returning its content as it was before deletion.
    /// Absent ids yield `ApiError::NotFound`.
    async fn delete_todo(&self, id: i32) -> Result<Todo, ApiError>;
}
