//! Query state and clause assembly.
//!
//! [`QueryState`] owns everything a statement is assembled from. Clause
//! assembly never mutates the state: every render starts a fresh
//! [`TextBuilder`] and splices the predicate builders into it, so the same
//! state renders to the same text and arguments as often as it is asked.

use super::text::{QUOTE, TextBuilder};
use crate::error::{BuildError, Result};

/// Sort direction of an ORDER BY entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `FULL JOIN`
    Full,
    /// `FULL OUTER JOIN`
    FullOuter,
}

impl JoinType {
    /// Returns the SQL keyword(s) preceding `JOIN`.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::FullOuter => "FULL OUTER",
        }
    }
}

/// Everything a statement is assembled from.
///
/// `Clone` is a full value copy: the predicate builders and their argument
/// lists share no storage with the original.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub(crate) table: String,
    pub(crate) from: Option<String>,
    pub(crate) columns: Vec<String>,
    pub(crate) joins: Vec<String>,
    pub(crate) predicate: TextBuilder,
    pub(crate) group_by: Option<String>,
    pub(crate) having: TextBuilder,
    pub(crate) order_by: Vec<(String, Direction)>,
    pub(crate) order_by_raw: Option<String>,
    pub(crate) limit: i64,
    pub(crate) offset: i64,
    pub(crate) unions: Vec<Self>,
    pub(crate) union_all: bool,
    pub(crate) lock_for_update: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    /// Creates an empty state selecting `*` with no table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: String::new(),
            from: None,
            columns: vec![String::from("*")],
            joins: vec![],
            predicate: TextBuilder::new(),
            group_by: None,
            having: TextBuilder::new(),
            order_by: vec![],
            order_by_raw: None,
            limit: 0,
            offset: 0,
            unions: vec![],
            union_all: false,
            lock_for_update: false,
        }
    }

    /// Clears everything for a new target table.
    ///
    /// Captured union branches and the union-all flag survive, so a union
    /// can span two tables.
    pub fn reset(&mut self, table: &str) {
        let unions = std::mem::take(&mut self.unions);
        let union_all = self.union_all;
        *self = Self::new();
        self.table = String::from(table);
        self.unions = unions;
        self.union_all = union_all;
    }

    /// Returns the target table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] if no table was selected.
    pub fn table(&self) -> Result<&str> {
        if self.table.is_empty() {
            Err(BuildError::NoTable)
        } else {
            Ok(&self.table)
        }
    }

    /// Returns the WHERE clause built so far.
    #[must_use]
    pub fn predicate(&self) -> &TextBuilder {
        &self.predicate
    }

    /// Returns the HAVING clause built so far.
    #[must_use]
    pub fn having(&self) -> &TextBuilder {
        &self.having
    }

    /// Returns the captured union branches.
    #[must_use]
    pub fn unions(&self) -> &[Self] {
        &self.unions
    }

    /// Snapshots the current select as a union branch.
    pub(crate) fn capture_union(&mut self) {
        let mut branch = self.clone();
        branch.unions.clear();
        self.unions.push(branch);
    }

    /// Renders `SELECT <columns> FROM <table> <clauses>`.
    pub(crate) fn render_select(&self, columns: &[String]) -> Result<TextBuilder> {
        let table = self.table()?;
        let mut b = TextBuilder::new();
        b.write("SELECT").pad();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            write_column(&mut b, col);
        }
        b.pad().write("FROM").pad().identifier(table);
        self.render_clauses(&mut b);
        Ok(b)
    }

    /// Renders the select with any captured union branches in front.
    pub(crate) fn render_query(&self) -> Result<TextBuilder> {
        let last = self.render_select(&self.columns)?;
        let mut b = TextBuilder::new();
        for branch in &self.unions {
            b.append(&branch.render_select(&branch.columns)?)
                .pad()
                .write("UNION")
                .pad();
            if self.union_all {
                b.write("ALL").pad();
            }
        }
        b.append(&last);
        Ok(b)
    }

    /// Appends joins, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT and the
    /// lock clause, in that order.
    pub(crate) fn render_clauses(&self, b: &mut TextBuilder) {
        for join in &self.joins {
            b.pad().write(join);
        }

        if !self.predicate.is_empty() {
            b.pad().append(&self.predicate);
        }

        if let Some(group) = &self.group_by {
            b.pad().write("GROUP BY").pad();
            write_column(b, group);
        }

        if !self.having.is_empty() {
            b.pad().write("HAVING").pad().append(&self.having);
        }

        self.render_order_by(b);

        if self.limit > 0 {
            b.pad().write("LIMIT").pad();
            if self.offset > 0 {
                b.write(&self.offset.to_string()).write(",");
            }
            b.write(&self.limit.to_string());
        }

        if self.lock_for_update {
            b.pad().write("FOR UPDATE");
        }
    }

    fn render_order_by(&self, b: &mut TextBuilder) {
        if !self.order_by.is_empty() {
            b.pad().write("ORDER BY").pad();
            for (i, (column, direction)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    b.comma();
                }
                if column.contains('.') {
                    write_column(b, column);
                } else {
                    b.qualified_identifier(&self.table, column);
                }
                b.pad().write(direction.as_sql());
            }
        } else if let Some(raw) = &self.order_by_raw {
            b.pad().write("ORDER BY").pad().write(raw);
        }
    }
}

/// Writes one select-list entry.
///
/// Wildcards and pre-formed expressions (anything quoted, containing a call
/// or an `AS` alias) go out verbatim; `a.b` is quoted per segment; anything
/// else is quoted as a plain identifier.
pub(crate) fn write_column(b: &mut TextBuilder, col: &str) {
    if col == "*" || col.ends_with(".*") || is_expression(col) {
        b.write(col);
    } else if col.contains('.') {
        for (i, segment) in col.split('.').enumerate() {
            if i > 0 {
                b.write_char('.');
            }
            b.identifier(segment);
        }
    } else {
        b.identifier(col);
    }
}

fn is_expression(col: &str) -> bool {
    col.contains(QUOTE)
        || col.contains('(')
        || col
            .split_whitespace()
            .any(|token| token == "AS" || token == "as")
}
