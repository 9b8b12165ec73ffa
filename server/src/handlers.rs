//! Route handlers.
//!
//! # Design
//! Each handler opens one transaction from the pool, runs a single store
//! operation (delete also re-reads the remaining rows), and commits. Any `?`
//! before the commit drops the transaction, which rolls it back and returns
//! the connection to the pool.
//!
//! Handlers that read a row and then write it claim the row first, so the
//! transaction holds the write lock before its first read.

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::entity;
use crate::error::ApiError;
use crate::extract::{ApiQuery, TodoId, ValidJson};
use crate::store;
use crate::types::{CreateTodo, DeletedTodo, ListFilter, TitleLookup, Todo, UpdateTodo};

pub async fn list_todos(
    State(db): State<DatabaseConnection>,
    ApiQuery(filter): ApiQuery<ListFilter>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let session = db.begin().await?;
    let todos = store::list_all(&session, filter.completed).await?;
    session.commit().await?;
    Ok(Json(todos.into_iter().map(Todo::from).collect()))
}

pub async fn get_todo(
    State(db): State<DatabaseConnection>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    let session = db.begin().await?;
    let todo = require_id(&session, id).await?;
    session.commit().await?;
    Ok(Json(todo.into()))
}

pub async fn create_todo(
    State(db): State<DatabaseConnection>,
    ValidJson(input): ValidJson<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let session = db.begin().await?;
    let todo = store::create(&session, input).await?;
    session.commit().await?;
    log::info!("created todo {}", todo.id);
    Ok((StatusCode::CREATED, Json(todo.into())))
}

pub async fn update_todo(
    State(db): State<DatabaseConnection>,
    TodoId(id): TodoId,
    ValidJson(changes): ValidJson<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    let session = db.begin().await?;
    let existing = claim_id(&session, id).await?;
    let todo = store::update(&session, existing, changes).await?;
    session.commit().await?;
    log::info!("updated todo {}", todo.id);
    Ok(Json(todo.into()))
}

pub async fn update_todo_by_title(
    State(db): State<DatabaseConnection>,
    ApiQuery(lookup): ApiQuery<TitleLookup>,
    ValidJson(changes): ValidJson<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    let session = db.begin().await?;
    let existing = if store::claim_by_title(&session, &lookup.title).await? > 0 {
        store::get_by_title(&session, &lookup.title).await?
    } else {
        None
    };
    let existing = existing.ok_or_else(|| {
        log::debug!("no todo titled {:?}", lookup.title);
        ApiError::NotFound(format!("Todo titled {:?} not found", lookup.title))
    })?;
    let todo = store::update(&session, existing, changes).await?;
    session.commit().await?;
    log::info!("updated todo {}", todo.id);
    Ok(Json(todo.into()))
}

pub async fn delete_todo(
    State(db): State<DatabaseConnection>,
    TodoId(id): TodoId,
) -> Result<Json<DeletedTodo>, ApiError> {
    let session = db.begin().await?;
    let existing = claim_id(&session, id).await?;
    store::delete(&session, existing).await?;
    let remaining = store::list_all(&session, None).await?;
    session.commit().await?;
    log::info!("deleted todo {id}");
    Ok(Json(DeletedTodo {
        message: format!("Todo {id} deleted"),
        todos: remaining.into_iter().map(Todo::from).collect(),
    }))
}

async fn require_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<entity::Model, ApiError> {
    store::get_by_id(db, id).await?.ok_or_else(|| not_found(id))
}

/// Like `require_id`, but takes the row's write lock before reading it.
async fn claim_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<entity::Model, ApiError> {
    if store::claim_by_id(db, id).await? == 0 {
        return Err(not_found(id));
    }
    require_id(db, id).await
}

fn not_found(id: i32) -> ApiError {
    log::debug!("todo {id} not found");
    ApiError::NotFound(format!("Todo {id} not found"))
}
