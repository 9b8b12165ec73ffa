//! Persistence primitives over the `todos` table.
//!
//! # Design
//! Every function takes any `ConnectionTrait`, so handlers pass the
//! per-request `DatabaseTransaction` and tests can pass a bare connection.
//! None of these functions commit; the caller owns the session boundary.
//!
//! SQLite cannot upgrade a deferred transaction's read lock to a write lock
//! while another writer is pending; it fails with `SQLITE_BUSY` instead of
//! waiting. Read-modify-write callers therefore start with `claim_by_id` or
//! `claim_by_title`, whose `UPDATE` takes the write lock up front and so
//! waits on the busy timeout like any other writer.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entity::{self, ActiveModel, Column, Entity};
use crate::types::{CreateTodo, UpdateTodo};

/// All todos in primary-key order, optionally narrowed by `completed`.
pub async fn list_all<C: ConnectionTrait>(
    db: &C,
    completed: Option<bool>,
) -> Result<Vec<entity::Model>, DbErr> {
    let mut query = Entity::find();
    if let Some(completed) = completed {
        query = query.filter(Column::Completed.eq(completed));
    }
    query.order_by_asc(Column::Id).all(db).await
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<entity::Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Exact title match. Titles are not unique; the oldest row wins.
pub async fn get_by_title<C: ConnectionTrait>(
    db: &C,
    title: &str,
) -> Result<Option<entity::Model>, DbErr> {
    Entity::find()
        .filter(Column::Title.eq(title))
        .order_by_asc(Column::Id)
        .one(db)
        .await
}

/// Takes the write lock on the rows with this id. Returns how many matched.
pub async fn claim_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
    claim(db, Column::Id.eq(id)).await
}

/// Takes the write lock on the rows with this exact title. Returns how many
/// matched.
pub async fn claim_by_title<C: ConnectionTrait>(db: &C, title: &str) -> Result<u64, DbErr> {
    claim(db, Column::Title.eq(title)).await
}

// `SET id = id` leaves the rows untouched.
async fn claim<C: ConnectionTrait>(db: &C, filter: SimpleExpr) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Id, Expr::col(Column::Id).into())
        .filter(filter)
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: CreateTodo,
) -> Result<entity::Model, DbErr> {
    let now = Utc::now();
    ActiveModel {
        title: Set(input.title),
        description: Set(input.description),
        completed: Set(input.completed),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Applies the fields present in `changes` and refreshes `updated_at`.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    existing: entity::Model,
    changes: UpdateTodo,
) -> Result<entity::Model, DbErr> {
    let stamp = next_updated_at(existing.updated_at, Utc::now());
    let mut active: ActiveModel = existing.into();
    if let Some(Some(title)) = changes.title {
        active.title = Set(title);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(completed) = changes.completed {
        active.completed = Set(completed);
    }
    active.updated_at = Set(stamp);
    active.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, existing: entity::Model) -> Result<(), DbErr> {
    Entity::delete_by_id(existing.id).exec(db).await?;
    Ok(())
}

// `updated_at` never moves backwards, even if the wall clock does.
fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    previous.max(now)
}
