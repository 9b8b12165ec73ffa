//! Request and response contracts for the todo API.
//!
//! # Design
//! Input shapes only carry client-settable fields; `id` and both timestamps
//! exist only on the response side. Every input body implements `Validate`,
//! which the `ValidJson` extractor runs before a handler body executes.
//!
//! `UpdateTodo` distinguishes absent keys from explicit `null`s. An absent
//! key leaves the column alone; `"description": null` clears it and
//! `"title": null` is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::{self, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
use crate::error::ApiError;

/// A todo as returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::Model> for Todo {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Query string for `GET /todos`.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub completed: Option<bool>,
}

/// Query string for `PUT /todos?title=...`.
#[derive(Debug, Deserialize)]
pub struct TitleLookup {
    pub title: String,
}

/// Body of a successful `DELETE /todos/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedTodo {
    pub message: String,
    pub todos: Vec<Todo>,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Field-level checks applied to a decoded request body.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

impl Validate for CreateTodo {
    fn validate(&self) -> Result<(), ApiError> {
        check_title(&self.title)?;
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        Ok(())
    }
}

impl Validate for UpdateTodo {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.title {
            Some(Some(title)) => check_title(title)?,
            Some(None) => {
                return Err(ApiError::Validation("title must not be null".to_string()));
            }
            None => {}
        }
        if let Some(Some(description)) = &self.description {
            check_description(description)?;
        }
        Ok(())
    }
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "description must be at most {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}

// A present key, even `null`, becomes `Some(_)`; `#[serde(default)]` covers
// the absent case.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No completed field"}"#).unwrap();
        assert_eq!(input.title, "No completed field");
        assert!(input.description.is_none());
        assert!(!input.completed);
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_title_length_boundary() {
        let ok = CreateTodo {
            title: "a".repeat(TITLE_MAX_LEN),
            description: None,
            completed: false,
        };
        assert!(ok.validate().is_ok());

        let too_long = CreateTodo {
            title: "a".repeat(TITLE_MAX_LEN + 1),
            description: None,
            completed: false,
        };
        assert!(matches!(too_long.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn create_todo_counts_characters_not_bytes() {
        let input = CreateTodo {
            title: "할".repeat(TITLE_MAX_LEN),
            description: None,
            completed: false,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn create_todo_rejects_blank_title() {
        let input = CreateTodo {
            title: "   ".to_string(),
            description: None,
            completed: false,
        };
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn create_todo_rejects_long_description() {
        let input = CreateTodo {
            title: "ok".to_string(),
            description: Some("d".repeat(DESCRIPTION_MAX_LEN + 1)),
            completed: false,
        };
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn update_todo_distinguishes_null_from_absent_description() {
        let cleared: UpdateTodo = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let untouched: UpdateTodo = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert_eq!(untouched.description, None);
        assert_eq!(untouched.completed, Some(true));
    }

    #[test]
    fn update_todo_validates_supplied_title() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn update_todo_rejects_null_title() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert_eq!(input.title, Some(None));
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn todo_serializes_with_null_description() {
        let now = Utc::now();
        let todo = Todo {
            id: 1,
            title: "Test".to_string(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Test");
        assert!(json["description"].is_null());
        assert_eq!(json["completed"], false);
        assert!(json["created_at"].is_string());
    }
}
