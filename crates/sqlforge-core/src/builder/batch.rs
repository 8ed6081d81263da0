//! Multi-row INSERT and CASE-based multi-row UPDATE.

use super::mutation::collect_pairs;
use super::query::{QueryBuilder, finish};
use super::state::write_column;
use super::text::TextBuilder;
use super::value::{SqlValue, ToSqlValue};
use crate::error::{BuildError, Result};

/// One column of a batch update with its per-row values.
type BatchColumn = (String, Vec<SqlValue>);

fn collect_columns<I, K, V>(columns: I) -> Vec<BatchColumn>
where
    I: IntoIterator<Item = (K, Vec<V>)>,
    K: AsRef<str>,
    V: ToSqlValue,
{
    columns
        .into_iter()
        .map(|(k, values)| {
            let values = values.into_iter().map(ToSqlValue::to_sql_value).collect();
            (String::from(k.as_ref()), values)
        })
        .collect()
}

/// Reorders a row to `columns`, or returns `None` if its column set differs.
fn align_row(columns: &[String], mut row: Vec<(String, SqlValue)>) -> Option<Vec<SqlValue>> {
    if row.len() != columns.len() {
        return None;
    }
    columns
        .iter()
        .map(|column| {
            let at = row.iter().position(|(c, _)| c == column)?;
            Some(row.swap_remove(at).1)
        })
        .collect()
}

impl QueryBuilder {
    /// Renders one INSERT carrying several rows.
    ///
    /// The first row fixes the column list and its order; every later row
    /// must carry exactly the same column names, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] without a target table,
    /// [`BuildError::EmptyData`] when there are no rows or the first row is
    /// empty, and [`BuildError::RowShapeMismatch`] for a row whose column
    /// set differs from the first.
    pub fn insert_batch<R, I, K, V>(&self, rows: R) -> Result<(String, Vec<SqlValue>)>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToSqlValue,
    {
        let table = self.state.table()?;
        let mut rows = rows.into_iter();
        let first = rows
            .next()
            .ok_or(BuildError::EmptyData("batch insert"))?;
        let first = collect_pairs(first, "batch insert")?;
        let (columns, first_values): (Vec<String>, Vec<SqlValue>) = first.into_iter().unzip();

        let mut values = vec![first_values];
        for (i, row) in rows.enumerate() {
            let row: Vec<(String, SqlValue)> = row
                .into_iter()
                .map(|(k, v)| (String::from(k.as_ref()), v.to_sql_value()))
                .collect();
            let aligned =
                align_row(&columns, row).ok_or(BuildError::RowShapeMismatch { row: i + 1 })?;
            values.push(aligned);
        }

        let mut b = TextBuilder::new();
        b.write("INSERT INTO").pad().identifier(table).pad();
        b.nested(|cols| {
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    cols.comma();
                }
                cols.identifier(column);
            }
        });
        b.pad().write("VALUES").pad();
        for (i, row) in values.into_iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            b.nested(|n| {
                n.argument_list(row);
            });
        }
        Ok(finish("insert_batch", b))
    }

    /// Renders one UPDATE that sets different values on several rows.
    ///
    /// `keys` and `updates` are parallel columns: row `i` is identified by
    /// the `i`th value of every key column and receives the `i`th value of
    /// every update column.
    ///
    /// ```text
    /// UPDATE "t" SET "a" = CASE WHEN "k1" = ? AND "k2" = ? THEN ? ... ELSE "a" END, ...
    /// ```
    ///
    /// The regular clause tail (WHERE, LIMIT, ...) is appended.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] without a target table,
    /// [`BuildError::EmptyData`] when either side has no columns or no rows,
    /// and [`BuildError::BatchLengthMismatch`] for a column whose value count
    /// differs from the first key column.
    pub fn update_batch<KI, KK, KV, UI, UK, UV>(
        &self,
        keys: KI,
        updates: UI,
    ) -> Result<(String, Vec<SqlValue>)>
    where
        KI: IntoIterator<Item = (KK, Vec<KV>)>,
        KK: AsRef<str>,
        KV: ToSqlValue,
        UI: IntoIterator<Item = (UK, Vec<UV>)>,
        UK: AsRef<str>,
        UV: ToSqlValue,
    {
        let table = self.state.table()?;
        let keys = collect_columns(keys);
        let updates = collect_columns(updates);

        let expected = match keys.first() {
            Some((_, values)) if !values.is_empty() && !updates.is_empty() => values.len(),
            _ => return Err(BuildError::EmptyData("batch update")),
        };
        if let Some((column, values)) = keys
            .iter()
            .chain(updates.iter())
            .find(|(_, values)| values.len() != expected)
        {
            return Err(BuildError::BatchLengthMismatch {
                column: column.clone(),
                expected,
                found: values.len(),
            });
        }

        let mut b = TextBuilder::new();
        b.write("UPDATE").pad().identifier(table).pad().write("SET").pad();
        for (i, (column, values)) in updates.iter().enumerate() {
            if i > 0 {
                b.comma();
            }
            b.identifier(column).write(" = CASE");
            for (row, value) in values.iter().enumerate() {
                b.write(" WHEN ");
                for (k, (key, key_values)) in keys.iter().enumerate() {
                    if k > 0 {
                        b.write(" AND ");
                    }
                    write_column(&mut b, key);
                    b.write(" = ").argument(&key_values[row]);
                }
                b.write(" THEN ").argument(value);
            }
            b.write(" ELSE ").identifier(column).write(" END");
        }
        self.state.render_clauses(&mut b);
        Ok(finish("update_batch", b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::op::Op;

    #[test]
    fn test_insert_batch_aligns_rows_by_name() {
        let mut qb = QueryBuilder::new();
        qb.table("users");
        let rows = vec![
            vec![("name", SqlValue::Text(String::from("a"))), ("age", SqlValue::Int(1))],
            vec![("age", SqlValue::Int(2)), ("name", SqlValue::Text(String::from("b")))],
        ];
        let (sql, args) = qb.insert_batch(rows).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"name\", \"age\") VALUES (?, ?), (?, ?)"
        );
        let literals: Vec<String> = args.iter().map(SqlValue::to_literal).collect();
        assert_eq!(literals, vec!["a", "1", "b", "2"]);
    }

    #[test]
    fn test_insert_batch_rejects_other_shape() {
        let mut qb = QueryBuilder::new();
        qb.table("t");
        let rows = vec![vec![("a", 1), ("b", 2)], vec![("a", 3), ("c", 4)]];
        assert_eq!(
            qb.insert_batch(rows).unwrap_err(),
            BuildError::RowShapeMismatch { row: 1 }
        );

        let rows = vec![vec![("a", 1)], vec![("a", 2), ("b", 3)]];
        assert_eq!(
            qb.insert_batch(rows).unwrap_err(),
            BuildError::RowShapeMismatch { row: 1 }
        );

        let rows: Vec<Vec<(&str, i64)>> = vec![];
        assert_eq!(
            qb.insert_batch(rows).unwrap_err(),
            BuildError::EmptyData("batch insert")
        );
    }

    #[test]
    fn test_update_batch() {
        let mut qb = QueryBuilder::new();
        qb.table("users").where_in("id", vec![1, 2]);
        let (sql, args) = qb
            .update_batch(
                vec![("id", vec![1, 2])],
                vec![("name", vec!["x", "y"])],
            )
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"users\" SET \"name\" = CASE WHEN \"id\" = ? THEN ? \
             WHEN \"id\" = ? THEN ? ELSE \"name\" END WHERE \"id\" IN (?, ?)"
        );
        let literals: Vec<String> = args.iter().map(SqlValue::to_literal).collect();
        assert_eq!(literals, vec!["1", "x", "2", "y", "1", "2"]);
    }

    #[test]
    fn test_update_batch_composite_key() {
        let mut qb = QueryBuilder::new();
        qb.table("stock").where_("active", Op::Eq, true);
        let (sql, args) = qb
            .update_batch(
                vec![("shop", vec![1, 1]), ("item", vec![7, 8])],
                vec![("qty", vec![10, 20]), ("price", vec![5, 6])],
            )
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"stock\" SET \
             \"qty\" = CASE WHEN \"shop\" = ? AND \"item\" = ? THEN ? \
             WHEN \"shop\" = ? AND \"item\" = ? THEN ? ELSE \"qty\" END, \
             \"price\" = CASE WHEN \"shop\" = ? AND \"item\" = ? THEN ? \
             WHEN \"shop\" = ? AND \"item\" = ? THEN ? ELSE \"price\" END \
             WHERE \"active\" = ?"
        );
        assert_eq!(args.len(), 13);
        assert_eq!(args[12], SqlValue::Bool(true));
    }

    #[test]
    fn test_update_batch_shape_errors() {
        let mut qb = QueryBuilder::new();
        qb.table("t");
        assert_eq!(
            qb.update_batch(vec![("id", vec![1, 2])], vec![("a", vec![1])])
                .unwrap_err(),
            BuildError::BatchLengthMismatch {
                column: String::from("a"),
                expected: 2,
                found: 1
            }
        );
        let no_updates: Vec<(&str, Vec<i64>)> = vec![];
        assert_eq!(
            qb.update_batch(vec![("id", vec![1])], no_updates).unwrap_err(),
            BuildError::EmptyData("batch update")
        );
    }
}
