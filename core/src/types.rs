//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's JSON contracts but are defined
//! independently so the client never links against axum or sea-orm. The
//! integration test runs both crates together and catches schema drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
///
/// `description: Some(None)` serializes as an explicit `null`, which clears
/// the description server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Response of a successful delete.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DeletedTodo {
    pub message: String,
    pub todos: Vec<Todo>,
}

/// Body the server sends with every error status.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}
