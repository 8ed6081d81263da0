//! WHERE and HAVING predicates.
//!
//! Every `where_*` call opens the clause with `WHERE` when it is still
//! empty and joins onto it with `AND` otherwise; `or_where_*` joins with
//! `OR`. The column, operator and placeholders are written in one go so the
//! argument list stays aligned with the text.

use super::op::Op;
use super::query::QueryBuilder;
use super::state::write_column;
use super::text::TextBuilder;
use super::value::{SqlValue, ToSqlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    And,
    Or,
}

/// Writes the operator and its bound value.
fn write_operand<T: ToSqlValue>(b: &mut TextBuilder, op: Op, value: T) {
    b.operator(op);
    match op {
        Op::In | Op::NotIn => {
            b.nested(|n| {
                n.argument(value);
            });
        }
        _ if op.is_postfix() => {}
        _ => {
            b.argument(value);
        }
    }
}

impl QueryBuilder {
    fn open_predicate(&mut self, conj: Conjunction) -> &mut TextBuilder {
        let p = &mut self.state.predicate;
        if p.is_empty() {
            p.write("WHERE ");
        } else if conj == Conjunction::Or {
            p.write(" OR ");
        } else {
            p.write(" AND ");
        }
        p
    }

    fn compare<T: ToSqlValue>(
        &mut self,
        conj: Conjunction,
        column: &str,
        op: Op,
        value: T,
    ) -> &mut Self {
        let p = self.open_predicate(conj);
        write_column(p, column);
        write_operand(p, op, value);
        self
    }

    fn range<T: ToSqlValue, U: ToSqlValue>(
        &mut self,
        conj: Conjunction,
        column: &str,
        op: Op,
        low: T,
        high: U,
    ) -> &mut Self {
        let p = self.open_predicate(conj);
        write_column(p, column);
        p.operator(op).argument(low).write(" AND ").argument(high);
        self
    }

    fn list<I, T>(&mut self, conj: Conjunction, column: &str, op: Op, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        let values: Vec<SqlValue> = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        let p = self.open_predicate(conj);
        // An empty list matches nothing for IN and everything for NOT IN.
        if values.is_empty() {
            p.write(if op == Op::In { "1 = 0" } else { "1 = 1" });
            return self;
        }
        write_column(p, column);
        p.operator(op).nested(|n| {
            n.argument_list(&values);
        });
        self
    }

    fn null_check(&mut self, conj: Conjunction, column: &str, op: Op) -> &mut Self {
        let p = self.open_predicate(conj);
        write_column(p, column);
        p.operator(op);
        self
    }

    fn empty_check(&mut self, conj: Conjunction, column: &str) -> &mut Self {
        let p = self.open_predicate(conj);
        p.nested(|n| {
            write_column(n, column);
            n.operator(Op::Eq).argument("").write(" OR ");
            write_column(n, column);
            n.operator(Op::IsNull);
        });
        self
    }

    fn raw<I, T>(&mut self, conj: Conjunction, raw: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.open_predicate(conj).write(raw).bind_only(args);
        self
    }

    /// Adds `<column> <op> ?`. Postfix operators bind nothing.
    ///
    /// `In` and `NotIn` wrap the single value as `IN (?)`. Ranges need
    /// [`where_between`](Self::where_between); `Between` here still binds
    /// just one value.
    pub fn where_<T: ToSqlValue>(&mut self, column: &str, op: Op, value: T) -> &mut Self {
        self.compare(Conjunction::And, column, op, value)
    }

    /// Adds `AND <column> <op> ?`.
    pub fn and_where<T: ToSqlValue>(&mut self, column: &str, op: Op, value: T) -> &mut Self {
        self.compare(Conjunction::And, column, op, value)
    }

    /// Adds `OR <column> <op> ?`.
    pub fn or_where<T: ToSqlValue>(&mut self, column: &str, op: Op, value: T) -> &mut Self {
        self.compare(Conjunction::Or, column, op, value)
    }

    /// Adds a raw predicate whose `?` tokens are bound to `args` in order.
    pub fn where_raw<I, T>(&mut self, raw: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.raw(Conjunction::And, raw, args)
    }

    /// Adds `AND <raw>`.
    pub fn and_where_raw<I, T>(&mut self, raw: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.raw(Conjunction::And, raw, args)
    }

    /// Adds `OR <raw>`.
    pub fn or_where_raw<I, T>(&mut self, raw: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.raw(Conjunction::Or, raw, args)
    }

    /// Adds `<column> BETWEEN ? AND ?`.
    pub fn where_between<T: ToSqlValue, U: ToSqlValue>(
        &mut self,
        column: &str,
        low: T,
        high: U,
    ) -> &mut Self {
        self.range(Conjunction::And, column, Op::Between, low, high)
    }

    /// Adds `AND <column> BETWEEN ? AND ?`.
    pub fn and_where_between<T: ToSqlValue, U: ToSqlValue>(
        &mut self,
        column: &str,
        low: T,
        high: U,
    ) -> &mut Self {
        self.range(Conjunction::And, column, Op::Between, low, high)
    }

    /// Adds `OR <column> BETWEEN ? AND ?`.
    pub fn or_where_between<T: ToSqlValue, U: ToSqlValue>(
        &mut self,
        column: &str,
        low: T,
        high: U,
    ) -> &mut Self {
        self.range(Conjunction::Or, column, Op::Between, low, high)
    }

    /// Adds `<column> NOT BETWEEN ? AND ?`.
    pub fn where_not_between<T: ToSqlValue, U: ToSqlValue>(
        &mut self,
        column: &str,
        low: T,
        high: U,
    ) -> &mut Self {
        self.range(Conjunction::And, column, Op::NotBetween, low, high)
    }

    /// Adds `AND <column> NOT BETWEEN ? AND ?`.
    pub fn and_where_not_between<T: ToSqlValue, U: ToSqlValue>(
        &mut self,
        column: &str,
        low: T,
        high: U,
    ) -> &mut Self {
        self.range(Conjunction::And, column, Op::NotBetween, low, high)
    }

    /// Adds `OR <column> NOT BETWEEN ? AND ?`.
    pub fn or_where_not_between<T: ToSqlValue, U: ToSqlValue>(
        &mut self,
        column: &str,
        low: T,
        high: U,
    ) -> &mut Self {
        self.range(Conjunction::Or, column, Op::NotBetween, low, high)
    }

    /// Adds `<column> IN (?, ...)`. An empty list renders `1 = 0`.
    pub fn where_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.list(Conjunction::And, column, Op::In, values)
    }

    /// Adds `AND <column> IN (?, ...)`.
    pub fn and_where_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.list(Conjunction::And, column, Op::In, values)
    }

    /// Adds `OR <column> IN (?, ...)`.
    pub fn or_where_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.list(Conjunction::Or, column, Op::In, values)
    }

    /// Adds `<column> NOT IN (?, ...)`. An empty list renders `1 = 1`.
    pub fn where_not_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.list(Conjunction::And, column, Op::NotIn, values)
    }

    /// Adds `AND <column> NOT IN (?, ...)`.
    pub fn and_where_not_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.list(Conjunction::And, column, Op::NotIn, values)
    }

    /// Adds `OR <column> NOT IN (?, ...)`.
    pub fn or_where_not_in<I, T>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.list(Conjunction::Or, column, Op::NotIn, values)
    }

    /// Adds `<column> LIKE ?`.
    pub fn where_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.compare(Conjunction::And, column, Op::Like, pattern)
    }

    /// Adds `AND <column> LIKE ?`.
    pub fn and_where_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.compare(Conjunction::And, column, Op::Like, pattern)
    }

    /// Adds `OR <column> LIKE ?`.
    pub fn or_where_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.compare(Conjunction::Or, column, Op::Like, pattern)
    }

    /// Adds `<column> NOT LIKE ?`.
    pub fn where_not_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.compare(Conjunction::And, column, Op::NotLike, pattern)
    }

    /// Adds `AND <column> NOT LIKE ?`.
    pub fn and_where_not_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.compare(Conjunction::And, column, Op::NotLike, pattern)
    }

    /// Adds `OR <column> NOT LIKE ?`.
    pub fn or_where_not_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.compare(Conjunction::Or, column, Op::NotLike, pattern)
    }

    /// Adds `<column> IS NULL`.
    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Conjunction::And, column, Op::IsNull)
    }

    /// Adds `AND <column> IS NULL`.
    pub fn and_where_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Conjunction::And, column, Op::IsNull)
    }

    /// Adds `OR <column> IS NULL`.
    pub fn or_where_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Conjunction::Or, column, Op::IsNull)
    }

    /// Adds `<column> IS NOT NULL`.
    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Conjunction::And, column, Op::IsNotNull)
    }

    /// Adds `AND <column> IS NOT NULL`.
    pub fn and_where_not_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Conjunction::And, column, Op::IsNotNull)
    }

    /// Adds `OR <column> IS NOT NULL`.
    pub fn or_where_not_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Conjunction::Or, column, Op::IsNotNull)
    }

    /// Adds `(<column> = '' OR <column> IS NULL)`.
    pub fn where_empty(&mut self, column: &str) -> &mut Self {
        self.empty_check(Conjunction::And, column)
    }

    /// Adds `AND (<column> = '' OR <column> IS NULL)`.
    pub fn and_where_empty(&mut self, column: &str) -> &mut Self {
        self.empty_check(Conjunction::And, column)
    }

    /// Adds `OR (<column> = '' OR <column> IS NULL)`.
    pub fn or_where_empty(&mut self, column: &str) -> &mut Self {
        self.empty_check(Conjunction::Or, column)
    }

    /// Adds a HAVING condition; repeated calls are joined with `AND`.
    pub fn having<T: ToSqlValue>(&mut self, column: &str, op: Op, value: T) -> &mut Self {
        let h = &mut self.state.having;
        if !h.is_empty() {
            h.write(" AND ");
        }
        write_column(h, column);
        write_operand(h, op, value);
        self
    }

    /// Returns the arguments bound to the WHERE clause so far.
    #[must_use]
    pub fn where_args(&self) -> &[SqlValue] {
        self.state.predicate.args()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn where_sql(qb: &QueryBuilder) -> &str {
        qb.state().predicate().sql()
    }

    #[test]
    fn test_where_in() {
        let mut qb = QueryBuilder::new();
        qb.table("t").where_in("id", vec![1, 2, 3]);
        let (sql, args) = qb.query().unwrap();
        assert_eq!(sql, "SELECT * FROM \"t\" WHERE \"id\" IN (?, ?, ?)");
        assert_eq!(
            args,
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }

    #[test]
    fn test_empty_in_lists() {
        let mut qb = QueryBuilder::new();
        qb.table("t")
            .where_in("id", Vec::<i64>::new())
            .or_where_not_in("id", Vec::<i64>::new())
            .and_where_in("kind", vec!["a"]);
        assert_eq!(where_sql(&qb), "WHERE 1 = 0 OR 1 = 1 AND \"kind\" IN (?)");
        assert_eq!(qb.where_args(), &[SqlValue::Text(String::from("a"))]);
    }

    #[test]
    fn test_in_through_where_is_parenthesized() {
        let mut qb = QueryBuilder::new();
        qb.table("t").where_("id", Op::In, 7).and_where("kind", Op::NotIn, "x");
        assert_eq!(where_sql(&qb), "WHERE \"id\" IN (?) AND \"kind\" NOT IN (?)");
        assert_eq!(qb.where_args().len(), 2);
    }

    #[test]
    fn test_connectives() {
        let mut qb = QueryBuilder::new();
        qb.table("t")
            .where_("a", Op::Eq, 1)
            .where_("b", Op::NotEq, 2)
            .or_where("c", Op::Lt, 3)
            .and_where("d", Op::LtEq, 4);
        assert_eq!(
            where_sql(&qb),
            "WHERE \"a\" = ? AND \"b\" <> ? OR \"c\" < ? AND \"d\" <= ?"
        );
        assert_eq!(qb.where_args().len(), 4);
    }

    #[test]
    fn test_or_first_opens_with_where() {
        let mut qb = QueryBuilder::new();
        qb.table("t").or_where_null("deleted_at");
        assert_eq!(where_sql(&qb), "WHERE \"deleted_at\" IS NULL");
        assert!(qb.where_args().is_empty());
    }

    #[test]
    fn test_between_family() {
        let mut qb = QueryBuilder::new();
        qb.table("t")
            .where_between("age", 18, 30)
            .or_where_not_between("score", 1.5, 2.5);
        assert_eq!(
            where_sql(&qb),
            "WHERE \"age\" BETWEEN ? AND ? OR \"score\" NOT BETWEEN ? AND ?"
        );
        assert_eq!(
            qb.where_args(),
            &[
                SqlValue::Int(18),
                SqlValue::Int(30),
                SqlValue::Float(1.5),
                SqlValue::Float(2.5)
            ]
        );
    }

    #[test]
    fn test_like_and_not_in() {
        let mut qb = QueryBuilder::new();
        qb.table("t")
            .where_like("email", "%@example.com")
            .and_where_not_in("status", vec!["banned", "deleted"])
            .or_where_not_like("name", "bot%");
        assert_eq!(
            where_sql(&qb),
            "WHERE \"email\" LIKE ? AND \"status\" NOT IN (?, ?) OR \"name\" NOT LIKE ?"
        );
        assert_eq!(qb.where_args().len(), 4);
        assert_eq!(qb.where_args()[1], SqlValue::Text(String::from("banned")));
    }

    #[test]
    fn test_where_empty() {
        let mut qb = QueryBuilder::new();
        qb.table("t").where_not_null("a").and_where_empty("bio");
        assert_eq!(
            where_sql(&qb),
            "WHERE \"a\" IS NOT NULL AND (\"bio\" = ? OR \"bio\" IS NULL)"
        );
        assert_eq!(qb.where_args(), &[SqlValue::Text(String::new())]);
    }

    #[test]
    fn test_where_raw_binds_in_order() {
        let mut qb = QueryBuilder::new();
        qb.table("t")
            .where_("a", Op::Eq, 1)
            .or_where_raw("b > ? AND c < ?", vec![2, 3])
            .and_where_in("d", vec![4]);
        assert_eq!(
            where_sql(&qb),
            "WHERE \"a\" = ? OR b > ? AND c < ? AND \"d\" IN (?)"
        );
        let args: Vec<String> = qb.where_args().iter().map(SqlValue::to_literal).collect();
        assert_eq!(args, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_postfix_operator_through_where() {
        let mut qb = QueryBuilder::new();
        qb.table("t").where_("a", Op::IsNotNull, SqlValue::Null);
        assert_eq!(where_sql(&qb), "WHERE \"a\" IS NOT NULL");
        assert!(qb.where_args().is_empty());
    }

    #[test]
    fn test_having_joined_with_and() {
        let mut qb = QueryBuilder::new();
        qb.table("t")
            .group_by("kind")
            .having("SUM(amount)", Op::Gt, 100)
            .having("kind", Op::NotEq, "misc");
        assert_eq!(
            qb.state().having().sql(),
            "SUM(amount) > ? AND \"kind\" <> ?"
        );
    }
}
