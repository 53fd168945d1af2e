#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tokio::sync::RwLock;
use tower::ServiceExt;

use todo_rest_api::{create_router, ApiError, AppState, StatusSet, Todo, TodoStore};

/// In-memory store with serial ids, mirroring the `todo` table.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryTable>,
}

#[derive(Default)]
struct MemoryTable {
    last_id: i32,
    rows: BTreeMap<i32, Todo>,
}

impl MemoryStore {
    pub async fn snapshot(&self) -> Vec<Todo> {
        self.inner.read().await.rows.values().cloned().collect()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        Ok(self.snapshot().await)
    }

    async fn create_todo(&self, title: &str, status: &str) -> Result<Todo, ApiError> {
        let mut table = self.inner.write().await;
        table.last_id += 1;
        let todo = Todo {
            id: table.last_id,
            title: title.to_string(),
            status: status.to_string(),
        };
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update_todo(&self, id: i32, title: &str, status: &str) -> Result<Todo, ApiError> {
        let mut table = self.inner.write().await;
        let todo = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("Todo with id {}", id)))?;
        todo.title = title.to_string();
        todo.status = status.to_string();
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: i32) -> Result<Todo, ApiError> {
        self.inner
            .write()
            .await
            .rows
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(format!("Todo with id {}", id)))
    }
}

/// Store whose every call fails like an unreachable database.
pub struct UnavailableStore;

#[async_trait]
impl TodoStore for UnavailableStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        Err(ApiError::Database("Database connection unavailable".to_string()))
    }

    async fn create_todo(&self, _title: &str, _status: &str) -> Result<Todo, ApiError> {
        Err(ApiError::Database("Database connection unavailable".to_string()))
    }

    async fn update_todo(&self, _id: i32, _title: &str, _status: &str) -> Result<Todo, ApiError> {
        Err(ApiError::Database("Database connection unavailable".to_string()))
    }

    async fn delete_todo(&self, _id: i32) -> Result<Todo, ApiError> {
        Err(ApiError::Database("Database connection unavailable".to_string()))
    }
}

/// Store that holds every call for `delay` before answering from `MemoryStore`.
pub struct SlowStore {
    pub delay: Duration,
    pub inner: MemoryStore,
}

#[async_trait]
impl TodoStore for SlowStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        tokio::time::sleep(self.delay).await;
        self.inner.list_todos().await
    }

    async fn create_todo(&self, title: &str, status: &str) -> Result<Todo, ApiError> {
        tokio::time::sleep(self.delay).await;
        self.inner.create_todo(title, status).await
    }

    async fn update_todo(&self, id: i32, title: &str, status: &str) -> Result<Todo, ApiError> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_todo(id, title, status).await
    }

    async fn delete_todo(&self, id: i32) -> Result<Todo, ApiError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_todo(id).await
    }
}

/// Store whose rows vanish between the existence check and the write,
/// so every mutation affects zero rows.
pub struct VanishingRowStore;

#[async_trait]
impl TodoStore for VanishingRowStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_todo(&self, title: &str, status: &str) -> Result<Todo, ApiError> {
        Ok(Todo {
            id: 1,
            title: title.to_string(),
            status: status.to_string(),
        })
    }

    async fn update_todo(&self, id: i32, _title: &str, _status: &str) -> Result<Todo, ApiError> {
        Err(ApiError::operation_failed(format!("Update of todo {} affected no rows", id)))
    }

    async fn delete_todo(&self, id: i32) -> Result<Todo, ApiError> {
        Err(ApiError::operation_failed(format!("Delete of todo {} affected no rows", id)))
    }
}

pub fn app_with(store: Arc<dyn TodoStore>) -> Router {
    app_with_timeout(store, Duration::from_secs(5))
}

pub fn app_with_timeout(store: Arc<dyn TodoStore>, request_timeout: Duration) -> Router {
    create_router(AppState::new(store, StatusSet::default()), request_timeout)
}

pub fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (app_with(store.clone()), store)
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn create(app: &Router, title: &str, status: &str) -> Todo {
    let body = serde_json::json!({ "title": title, "status": status }).to_string();
    let response = send(app, json_request("POST", "/todos", &body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
