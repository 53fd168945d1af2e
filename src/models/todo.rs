use serde::{Deserialize, Serialize};

use super::status::StatusSet;

/// A persisted todo item. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub status: String,
}

/// Envelope returned by `GET /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

/// Body accepted by create and update.
/// Missing fields deserialize to empty strings so they fail validation
/// with the same message as explicitly empty ones.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

impl TodoRequest {
    /// Both fields are required and `status` must belong to `allowed`.
    pub fn validate(&self, allowed: &StatusSet) -> Result<(), String> {
        let title = self.title.trim();
        let status = self.status.trim();

        if title.is_empty() || status.is_empty() {
            return Err("Todo request is missing status or title".to_string());
        }

        if !allowed.contains(status) {
            return Err(format!(
                "Invalid todo status '{}', expected one of: {}",
                status, allowed
            ));
        }

        Ok(())
    }

    /// Title as it will be stored (trimmed)
    pub fn get_normalized_title(&self) -> String {
        self.title.trim().to_string()
    }

    /// Status as it will be stored (trimmed)
    pub fn get_normalized_status(&self) -> String {
        self.status.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, status: &str) -> TodoRequest {
        TodoRequest {
            title: title.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_todo_request_validation() {
        let allowed = StatusSet::default();

        assert!(request("buy milk", "pending").validate(&allowed).is_ok());
        assert!(request("buy milk", "done").validate(&allowed).is_ok());

        // Empty or whitespace-only fields
        assert!(request("", "pending").validate(&allowed).is_err());
        assert!(request("   ", "pending").validate(&allowed).is_err());
        assert!(request("buy milk", "").validate(&allowed).is_err());

        // Status outside the allowed set
        let err = request("buy milk", "someday").validate(&allowed).unwrap_err();
        assert!(err.contains("someday"));
        assert!(err.contains("in-progress"));
    }

    #[test]
    fn test_validation_uses_configured_statuses() {
        let allowed = StatusSet::parse("open,closed");
        assert!(request("write report", "open").validate(&allowed).is_ok());
        assert!(request("write report", "pending").validate(&allowed).is_err());
    }

    #[test]
    fn test_todo_request_normalization() {
        let req = request("  buy milk  ", " pending ");
        assert!(req.validate(&StatusSet::default()).is_ok());
        assert_eq!(req.get_normalized_title(), "buy milk");
        assert_eq!(req.get_normalized_status(), "pending");
    }

    #[test]
    fn test_todo_request_missing_fields_default_to_empty() {
        let req: TodoRequest =
            serde_json::from_str(r#"{"title":"buy milk"}"#).expect("Failed to deserialize TodoRequest");
        assert_eq!(req.title, "buy milk");
        assert_eq!(req.status, "");
        assert!(req.validate(&StatusSet::default()).is_err());
    }

    #[test]
    fn test_todo_list_serialization() {
        let list = TodoList {
            todos: vec![Todo {
                id: 1,
                title: "buy milk".to_string(),
                status: "pending".to_string(),
            }],
        };

        let json = serde_json::to_string(&list).expect("Failed to serialize todo list");
        let expected = r#"{"todos":[{"id":1,"title":"buy milk","status":"pending"}]}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_empty_todo_list_serialization() {
        let json = serde_json::to_string(&TodoList { todos: vec![] }).expect("Failed to serialize todo list");
        assert_eq!(json, r#"{"todos":[]}"#);
    }
}
