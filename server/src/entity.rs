//! The `todos` table.
//!
//! # Design
//! `id` is an auto-increment primary key; on SQLite the generated DDL uses
//! `AUTOINCREMENT`, so ids of deleted rows are never handed out again.
//! Timestamps are UTC and written by the store, never by clients.

use sea_orm::entity::prelude::*;

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 400;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub title: String,
    #[sea_orm(column_type = "String(StringLen::N(400))", nullable)]
    pub description: Option<String>,
    #[sea_orm(default_value = false)]
    pub completed: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
