//! HTTP CRUD service for todo items backed by a SQLite table.
//!
//! # Overview
//! `app` builds the axum `Router`; `run` serves it on a listener. The
//! connection pool is created once by `db::connect` and handed to the router
//! as state, so each handler can take its own short-lived transaction.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod store;
pub mod types;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;

pub use config::{ConfigError, DatabaseSettings, ServerConfig};
pub use error::ApiError;
pub use types::{CreateTodo, DeletedTodo, ErrorBody, Todo, UpdateTodo};

pub fn app(db: DatabaseConnection) -> Router {
    use handlers::*;

    Router::new()
        .route(
            "/todos",
            get(list_todos).post(create_todo).put(update_todo_by_title),
        )
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: DatabaseConnection) -> Result<(), std::io::Error> {
    axum::serve(listener, app(db)).await
}
