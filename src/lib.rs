// Library root for the todo REST API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use std::{sync::Arc, time::Duration};

use axum::{
    routing::{get, put},
    Router,
};

use handlers::{
    health_check,
    todos::{create_todo, delete_todo, list_todos, update_todo},
};
use middleware::apply_middleware;

// Re-export commonly used types
pub use db::Database;
pub use error::ApiError;
pub use models::{StatusSet, Todo, TodoList, TodoRequest};
pub use store::TodoStore;

/// Shared handler state: the store and the allowed status set.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub statuses: Arc<StatusSet>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, statuses: StatusSet) -> Self {
        AppState {
            store,
            statuses: Arc::new(statuses),
        }
    }
}

/// Build the router with all endpoints and middleware.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/", get(health_check))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
        .with_state(state);

    apply_middleware(routes, request_timeout)
}
