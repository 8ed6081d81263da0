//! # sqlforge-core
//!
//! A fluent SQL statement builder.
//!
//! Chained calls describe a statement's shape; a terminal call renders it as
//! text with `?` placeholders plus the ordered list of values bound to them.
//! Nothing is executed and no connection is held.
//!
//! This crate provides:
//! - [`QueryBuilder`] for SELECT, INSERT, REPLACE, UPDATE, DELETE, batch
//!   statements, unions, existence checks and aggregates
//! - [`schema`] for CREATE TABLE and ALTER TABLE
//! - [`TextBuilder`], the placeholder-safe text accumulator both are built on
//!
//! ## Building a query
//!
//! ```rust
//! use sqlforge_core::{Direction, Op, QueryBuilder, SqlValue};
//!
//! let mut qb = QueryBuilder::new();
//! let (sql, args) = qb
//!     .table("posts")
//!     .select(&["title", "body"])
//!     .where_("points", Op::Gt, 3)
//!     .order_by("points", Direction::Desc)
//!     .limit(15)
//!     .offset(5)
//!     .query()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "title", "body" FROM "posts" WHERE "points" > ? ORDER BY "posts"."points" DESC LIMIT 5,15"#
//! );
//! assert_eq!(args, vec![SqlValue::Int(3)]);
//! ```
//!
//! ## Values are always bound
//!
//! ```rust
//! use sqlforge_core::{Op, QueryBuilder, SqlValue};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, args) = QueryBuilder::new()
//!     .table("users")
//!     .where_("name", Op::Eq, user_input)
//!     .query()
//!     .unwrap();
//!
//! assert_eq!(sql, r#"SELECT * FROM "users" WHERE "name" = ?"#);
//! assert_eq!(args, vec![SqlValue::Text(String::from(user_input))]);
//! ```
//!
//! Identifiers (table and column names, raw fragments) are trusted input and
//! are written as given.

pub mod builder;
pub mod error;
pub mod schema;

pub use builder::{
    Direction, JoinType, Op, QueryBuilder, QueryState, SqlValue, TextBuilder, ToSqlValue,
    drop_table, drop_table_if_exists, rename_table, truncate,
};
pub use error::{BuildError, Result};
pub use schema::{ColumnBuilder, ColumnType, ForeignKeyAction, Table, create_table, modify_table};
