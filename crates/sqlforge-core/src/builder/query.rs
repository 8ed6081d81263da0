//! Fluent SELECT builder.
//!
//! Configuration calls mutate the builder in place and hand it back for
//! chaining; terminal calls (`query`, `exists`, aggregates) borrow it and
//! render a fresh statement, so they can be repeated.

use tracing::debug;

use super::state::{Direction, JoinType, QueryState};
use super::text::TextBuilder;
use super::value::SqlValue;
use crate::error::Result;

/// A reusable statement builder.
///
/// One instance builds one statement at a time; [`table`](Self::table)
/// resets it for the next one.
///
/// # Example
///
/// ```rust
/// use sqlforge_core::{Direction, Op, QueryBuilder};
///
/// let mut qb = QueryBuilder::new();
/// let (sql, args) = qb
///     .table("posts")
///     .select(&["title", "body"])
///     .where_("points", Op::Gt, 3)
///     .order_by("points", Direction::Desc)
///     .limit(15)
///     .offset(5)
///     .query()
///     .unwrap();
///
/// assert_eq!(
///     sql,
///     r#"SELECT "title", "body" FROM "posts" WHERE "points" > ? ORDER BY "posts"."points" DESC LIMIT 5,15"#
/// );
/// assert_eq!(args.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    pub(crate) state: QueryState,
}

impl QueryBuilder {
    /// Creates a builder with no table selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Selects the target table, resetting everything but union branches.
    pub fn table(&mut self, table: &str) -> &mut Self {
        self.state.reset(table);
        self
    }

    /// Replaces the select list.
    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        self.state.columns = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Appends to the select list.
    pub fn add_select(&mut self, columns: &[&str]) -> &mut Self {
        self.state
            .columns
            .extend(columns.iter().map(|c| String::from(*c)));
        self
    }

    /// Replaces the select list with one raw expression.
    pub fn select_raw(&mut self, raw: &str) -> &mut Self {
        self.state.columns = vec![String::from(raw)];
        self
    }

    /// Adds an INNER JOIN.
    pub fn inner_join(&mut self, table: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.join(JoinType::Inner, table, left, op, right)
    }

    /// Adds a LEFT JOIN.
    pub fn left_join(&mut self, table: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.join(JoinType::Left, table, left, op, right)
    }

    /// Adds a RIGHT JOIN.
    pub fn right_join(&mut self, table: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.join(JoinType::Right, table, left, op, right)
    }

    /// Adds a FULL JOIN.
    pub fn full_join(&mut self, table: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.join(JoinType::Full, table, left, op, right)
    }

    /// Adds a FULL OUTER JOIN.
    pub fn full_outer_join(
        &mut self,
        table: &str,
        left: &str,
        op: &str,
        right: &str,
    ) -> &mut Self {
        self.join(JoinType::FullOuter, table, left, op, right)
    }

    /// Adds a join of the given kind. Table and condition are trusted text.
    pub fn join(
        &mut self,
        kind: JoinType,
        table: &str,
        left: &str,
        op: &str,
        right: &str,
    ) -> &mut Self {
        self.state.joins.push(format!(
            "{} JOIN {table} ON {left} {op} {right}",
            kind.as_sql()
        ));
        self
    }

    /// Sets the GROUP BY expression.
    pub fn group_by(&mut self, expr: &str) -> &mut Self {
        self.state.group_by = Some(String::from(expr));
        self
    }

    /// Adds an ORDER BY entry. Ordering a column twice replaces its
    /// direction and keeps its position.
    pub fn order_by(&mut self, column: &str, direction: Direction) -> &mut Self {
        let order = &mut self.state.order_by;
        match order.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = direction,
            None => order.push((String::from(column), direction)),
        }
        self
    }

    /// Sets a raw ORDER BY expression, used when no column ordering is set.
    pub fn order_by_raw(&mut self, expr: &str) -> &mut Self {
        self.state.order_by_raw = Some(String::from(expr));
        self
    }

    /// Orders rows randomly. Expensive on large tables.
    pub fn in_random_order(&mut self) -> &mut Self {
        self.order_by_raw("random()")
    }

    /// Sets LIMIT. Values `<= 0` leave it unset.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.state.limit = limit;
        self
    }

    /// Sets the offset. Only rendered together with a limit.
    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.state.offset = offset;
        self
    }

    /// Captures the current select as a branch joined with `UNION`.
    pub fn union(&mut self) -> &mut Self {
        self.state.capture_union();
        self
    }

    /// Captures the current select as a branch; every branch is then
    /// joined with `UNION ALL`.
    pub fn union_all(&mut self) -> &mut Self {
        self.state.capture_union();
        self.state.union_all = true;
        self
    }

    /// Appends `FOR UPDATE`.
    pub fn lock_for_update(&mut self) -> &mut Self {
        self.state.lock_for_update = true;
        self
    }

    /// Sets the source table of `UPDATE ... FROM`.
    pub fn from(&mut self, table: &str) -> &mut Self {
        self.state.from = Some(String::from(table));
        self
    }

    /// Renders the SELECT statement, preceded by any union branches.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`](crate::BuildError::NoTable) if no
    /// table was selected.
    pub fn query(&self) -> Result<(String, Vec<SqlValue>)> {
        Ok(finish("select", self.state.render_query()?))
    }

    /// Renders `SELECT EXISTS(SELECT 1 FROM <table> <clauses>)`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`](crate::BuildError::NoTable) if no
    /// table was selected.
    pub fn exists(&self) -> Result<(String, Vec<SqlValue>)> {
        let snapshot = self.state.clone();
        let table = snapshot.table()?;
        let mut b = TextBuilder::new();
        b.write("SELECT EXISTS").nested(|inner| {
            inner.write("SELECT 1 FROM").pad().identifier(table);
            snapshot.render_clauses(inner);
        });
        Ok(finish("exists", b))
    }

    /// Renders `SELECT COUNT(*)` with the current clauses.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`](crate::BuildError::NoTable) if no
    /// table was selected.
    pub fn count(&self) -> Result<(String, Vec<SqlValue>)> {
        self.aggregate(String::from("COUNT(*)"))
    }

    /// Renders `SELECT AVG(<column>)` with the current clauses.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`](crate::BuildError::NoTable) if no
    /// table was selected.
    pub fn avg(&self, column: &str) -> Result<(String, Vec<SqlValue>)> {
        self.aggregate(format!("AVG({column})"))
    }

    /// Renders `SELECT MIN(<column>)` with the current clauses.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`](crate::BuildError::NoTable) if no
    /// table was selected.
    pub fn min(&self, column: &str) -> Result<(String, Vec<SqlValue>)> {
        self.aggregate(format!("MIN({column})"))
    }

    /// Renders `SELECT MAX(<column>)` with the current clauses.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`](crate::BuildError::NoTable) if no
    /// table was selected.
    pub fn max(&self, column: &str) -> Result<(String, Vec<SqlValue>)> {
        self.aggregate(format!("MAX({column})"))
    }

    /// Renders `SELECT SUM(<column>)` with the current clauses.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`](crate::BuildError::NoTable) if no
    /// table was selected.
    pub fn sum(&self, column: &str) -> Result<(String, Vec<SqlValue>)> {
        self.aggregate(format!("SUM({column})"))
    }

    fn aggregate(&self, expr: String) -> Result<(String, Vec<SqlValue>)> {
        let b = self.state.render_select(&[expr])?;
        Ok(finish("aggregate", b))
    }
}

/// Takes the rendered statement apart and logs it.
pub(crate) fn finish(kind: &'static str, b: TextBuilder) -> (String, Vec<SqlValue>) {
    let (sql, args) = b.build();
    debug!(kind = kind, sql = %sql, args = args.len(), "Built statement");
    (sql, args)
}
