//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeletedTodo, ErrorBody, Todo, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /todos`, with `?completed=` only when a filter is given.
    pub fn build_list_todos(&self, completed: Option<bool>) -> HttpRequest {
        let path = match completed {
            Some(completed) => format!("{}/todos?completed={completed}", self.base_url),
            None => format!("{}/todos", self.base_url),
        };
        HttpRequest::empty(HttpMethod::Get, path)
    }

    pub fn build_get_todo(&self, id: i32) -> HttpRequest {
        HttpRequest::empty(HttpMethod::Get, self.todo_path(id))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(HttpRequest::json(
            HttpMethod::Post,
            format!("{}/todos", self.base_url),
            body,
        ))
    }

    pub fn build_update_todo(&self, id: i32, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(HttpRequest::json(HttpMethod::Put, self.todo_path(id), body))
    }

    /// `PUT /todos?title=...`; the title is form-url-encoded.
    pub fn build_update_todo_by_title(
        &self,
        title: &str,
        input: &UpdateTodo,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("title", title)
            .finish();
        Ok(HttpRequest::json(
            HttpMethod::Put,
            format!("{}/todos?{query}", self.base_url),
            body,
        ))
    }

    pub fn build_delete_todo(&self, id: i32) -> HttpRequest {
        HttpRequest::empty(HttpMethod::Delete, self.todo_path(id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        from_json(&response.body)
    }

    /// Parses the response of either update request.
    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<DeletedTodo, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    fn todo_path(&self, id: i32) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound(detail(&response.body))),
        422 => Err(ApiError::Validation(detail(&response.body))),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

// Falls back to the raw body when it is not the server's error shape.
fn detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| body.to_string())
}
