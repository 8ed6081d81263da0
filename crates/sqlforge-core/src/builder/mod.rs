//! Statement Builder
//!
//! A [`QueryBuilder`] accumulates the shape of one statement through chained
//! calls and renders it on a terminal call as parameterized SQL plus the
//! ordered argument list.
//!
//! # Example
//!
//! ```rust
//! use sqlforge_core::builder::{Op, QueryBuilder, SqlValue};
//!
//! let mut qb = QueryBuilder::new();
//! let (sql, args) = qb.table("t").where_in("id", vec![1, 2, 3]).query().unwrap();
//!
//! assert_eq!(sql, r#"SELECT * FROM "t" WHERE "id" IN (?, ?, ?)"#);
//! assert_eq!(args, vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]);
//!
//! let (sql, _) = qb.table("t").where_("a", Op::IsNull, SqlValue::Null).delete().unwrap();
//! assert_eq!(sql, r#"DELETE FROM "t" WHERE "a" IS NULL"#);
//! ```

mod batch;
mod mutation;
mod op;
mod predicate;
mod query;
mod state;
pub mod text;
pub mod value;

pub use mutation::{drop_table, drop_table_if_exists, rename_table, truncate};
pub use op::Op;
pub use query::QueryBuilder;
pub use state::{Direction, JoinType, QueryState};
pub use text::{QUOTE, TextBuilder, quote};
pub use value::{SqlValue, ToSqlValue};
