//! INSERT, REPLACE, UPDATE and DELETE statements, plus table utilities.
//!
//! Data is taken as an iterator of `(column, value)` pairs. Columns are
//! rendered in iteration order and the arguments follow the same order, so a
//! `Vec` of pairs keeps the caller's order and a `BTreeMap` sorts by name.

use tracing::debug;

use super::query::{QueryBuilder, finish};
use super::text::{TextBuilder, quote};
use super::value::{SqlValue, ToSqlValue};
use crate::error::{BuildError, Result};

/// Collects `(column, value)` pairs, failing on empty input.
pub(crate) fn collect_pairs<I, K, V>(
    data: I,
    statement: &'static str,
) -> Result<Vec<(String, SqlValue)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToSqlValue,
{
    let pairs: Vec<(String, SqlValue)> = data
        .into_iter()
        .map(|(k, v)| (String::from(k.as_ref()), v.to_sql_value()))
        .collect();
    if pairs.is_empty() {
        return Err(BuildError::EmptyData(statement));
    }
    Ok(pairs)
}

/// Writes `INSERT INTO "t" ("a", "b") VALUES (?, ?)`.
fn write_insert(b: &mut TextBuilder, table: &str, pairs: &[(String, SqlValue)]) {
    b.write("INSERT INTO").pad().identifier(table).pad();
    b.nested(|cols| {
        for (i, (column, _)) in pairs.iter().enumerate() {
            if i > 0 {
                cols.comma();
            }
            cols.identifier(column);
        }
    });
    b.pad().write("VALUES").pad();
    b.nested(|vals| {
        vals.argument_list(pairs.iter().map(|(_, v)| v));
    });
}

impl QueryBuilder {
    /// Renders a single-row INSERT.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] without a target table and
    /// [`BuildError::EmptyData`] when `data` is empty.
    pub fn insert<I, K, V>(&self, data: I) -> Result<(String, Vec<SqlValue>)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToSqlValue,
    {
        let table = self.state.table()?;
        let pairs = collect_pairs(data, "insert")?;
        let mut b = TextBuilder::new();
        write_insert(&mut b, table, &pairs);
        Ok(finish("insert", b))
    }

    /// Renders an INSERT that updates the existing row on a key conflict.
    ///
    /// Every inserted column, in order, is overwritten with the incoming
    /// value. `conflict` names the key the database resolves against; the
    /// `ON DUPLICATE KEY` form does not render it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] without a target table and
    /// [`BuildError::EmptyData`] when `data` is empty.
    pub fn replace<I, K, V>(&self, data: I, conflict: &str) -> Result<(String, Vec<SqlValue>)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToSqlValue,
    {
        let table = self.state.table()?;
        let pairs = collect_pairs(data, "replace")?;
        debug!(table = table, conflict = conflict, "Building upsert");
        let mut b = TextBuilder::new();
        write_insert(&mut b, table, &pairs);
        b.pad().write("ON DUPLICATE KEY UPDATE").pad();
        for (i, (column, _)) in pairs.iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            b.identifier(column).write(" = excluded.").identifier(column);
        }
        Ok(finish("replace", b))
    }

    /// Renders `UPDATE "t" SET "a" = ?, ...` followed by `FROM` (if set)
    /// and the regular clause tail.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] without a target table and
    /// [`BuildError::EmptyData`] when `data` is empty.
    pub fn update<I, K, V>(&self, data: I) -> Result<(String, Vec<SqlValue>)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToSqlValue,
    {
        let table = self.state.table()?;
        let pairs = collect_pairs(data, "update")?;
        let mut b = TextBuilder::new();
        b.write("UPDATE").pad().identifier(table).pad().write("SET").pad();
        for (i, (column, value)) in pairs.into_iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            b.identifier(&column).write(" = ").argument(value);
        }
        if let Some(from) = &self.state.from {
            b.pad().write("FROM").pad().write(from);
        }
        self.state.render_clauses(&mut b);
        Ok(finish("update", b))
    }

    /// Renders `DELETE FROM "t"` followed by the clause tail.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] without a target table.
    pub fn delete(&self) -> Result<(String, Vec<SqlValue>)> {
        let table = self.state.table()?;
        let mut b = TextBuilder::new();
        b.write("DELETE FROM").pad().identifier(table);
        self.state.render_clauses(&mut b);
        Ok(finish("delete", b))
    }
}

/// Renders `DROP TABLE "t"`.
#[must_use]
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE {}", quote(table))
}

/// Renders `DROP TABLE IF EXISTS "t"`.
#[must_use]
pub fn drop_table_if_exists(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote(table))
}

/// Renders `TRUNCATE "t"`.
#[must_use]
pub fn truncate(table: &str) -> String {
    format!("TRUNCATE {}", quote(table))
}

/// Renders `ALTER TABLE "from" RENAME TO "to"`.
#[must_use]
pub fn rename_table(from: &str, to: &str) -> String {
    format!("ALTER TABLE {} RENAME TO {}", quote(from), quote(to))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::builder::op::Op;

    #[test]
    fn test_insert_follows_pair_order() {
        let mut qb = QueryBuilder::new();
        qb.table("users");
        let (sql, args) = qb.insert(vec![("name", "alice"), ("email", "a@x.io")]).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"name\", \"email\") VALUES (?, ?)"
        );
        assert_eq!(
            args,
            vec![
                SqlValue::Text(String::from("alice")),
                SqlValue::Text(String::from("a@x.io"))
            ]
        );
    }

    #[test]
    fn test_insert_from_map() {
        let mut data = BTreeMap::new();
        data.insert("b", 2);
        data.insert("a", 1);
        let mut qb = QueryBuilder::new();
        qb.table("t");
        let (sql, args) = qb.insert(data).unwrap();
        assert_eq!(sql, "INSERT INTO \"t\" (\"a\", \"b\") VALUES (?, ?)");
        assert_eq!(args, vec![SqlValue::Int(1), SqlValue::Int(2)]);
    }

    #[test]
    fn test_insert_errors() {
        let empty: Vec<(&str, i64)> = vec![];
        assert_eq!(
            QueryBuilder::new().insert(vec![("a", 1)]).unwrap_err(),
            BuildError::NoTable
        );
        let mut qb = QueryBuilder::new();
        qb.table("t");
        assert_eq!(qb.insert(empty).unwrap_err(), BuildError::EmptyData("insert"));
    }

    #[test]
    fn test_replace_updates_every_column() {
        let mut qb = QueryBuilder::new();
        qb.table("users");
        let (sql, args) = qb.replace(vec![("id", 1), ("n", 2)], "id").unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"id\", \"n\") VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE \"id\" = excluded.\"id\", \"n\" = excluded.\"n\""
        );
        assert_eq!(args, vec![SqlValue::Int(1), SqlValue::Int(2)]);
    }

    #[test]
    fn test_replace_single_column() {
        let mut qb = QueryBuilder::new();
        qb.table("t");
        let (sql, _) = qb.replace(vec![("id", 1)], "id").unwrap();
        assert!(sql.ends_with("ON DUPLICATE KEY UPDATE \"id\" = excluded.\"id\""));
    }

    #[test]
    fn test_update_with_where() {
        let mut qb = QueryBuilder::new();
        qb.table("posts").where_("id", Op::Eq, 9);
        let (sql, args) = qb
            .update(vec![
                ("title", SqlValue::Text(String::from("new"))),
                ("points", SqlValue::Int(4)),
            ])
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"posts\" SET \"title\" = ?, \"points\" = ? WHERE \"id\" = ?"
        );
        assert_eq!(
            args,
            vec![
                SqlValue::Text(String::from("new")),
                SqlValue::Int(4),
                SqlValue::Int(9)
            ]
        );
    }

    #[test]
    fn test_update_from() {
        let mut qb = QueryBuilder::new();
        qb.table("a")
            .from("b")
            .where_raw("a.id = b.a_id AND b.flag = ?", vec![true]);
        let (sql, args) = qb.update(vec![("synced", 1)]).unwrap();
        assert_eq!(
            sql,
            "UPDATE \"a\" SET \"synced\" = ? FROM b WHERE a.id = b.a_id AND b.flag = ?"
        );
        assert_eq!(args, vec![SqlValue::Int(1), SqlValue::Bool(true)]);
    }

    #[test]
    fn test_delete() {
        let mut qb = QueryBuilder::new();
        qb.table("sessions").where_("expires", Op::Lt, 100).limit(50);
        let (sql, args) = qb.delete().unwrap();
        assert_eq!(
            sql,
            "DELETE FROM \"sessions\" WHERE \"expires\" < ? LIMIT 50"
        );
        assert_eq!(args, vec![SqlValue::Int(100)]);
        assert_eq!(QueryBuilder::new().delete().unwrap_err(), BuildError::NoTable);
    }

    #[test]
    fn test_table_utilities() {
        assert_eq!(drop_table("t"), "DROP TABLE \"t\"");
        assert_eq!(drop_table_if_exists("t"), "DROP TABLE IF EXISTS \"t\"");
        assert_eq!(truncate("t"), "TRUNCATE \"t\"");
        assert_eq!(rename_table("a", "b"), "ALTER TABLE \"a\" RENAME TO \"b\"");
    }
}
