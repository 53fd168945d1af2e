// Models module

pub mod status;
pub mod todo;

// Re-export commonly used types
pub use status::StatusSet;
pub use todo::{Todo, TodoList, TodoRequest};
