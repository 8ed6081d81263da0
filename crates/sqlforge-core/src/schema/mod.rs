//! Schema Builder
//!
//! A schema callback receives a mutable [`Table`] and declares columns on
//! it. Every column constructor returns a [`ColumnBuilder`] bound to the new
//! column, so modifiers can only ever target a column that exists.

mod column;
mod table;

pub use column::{
    ColumnAction, ColumnBuilder, ColumnSpec, ColumnType, DefaultStyle, ForeignKeyAction,
    ForeignKeyRef,
};
pub use table::{Table, create_table, modify_table};
