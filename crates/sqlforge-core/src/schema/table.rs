//! CREATE TABLE and ALTER TABLE generation.
//!
//! Column definitions go into a main builder in declaration order.
//! Table-level clauses (keys, indexes, foreign keys) are collected in a
//! separate child builder and spliced in after the last column, so they
//! never interleave with the column list.

use tracing::debug;

use super::column::{
    ColumnAction, ColumnBuilder, ColumnSpec, ColumnType, DefaultStyle, ForeignKeyAction,
    ForeignKeyRef,
};
use crate::builder::TextBuilder;
use crate::error::{BuildError, Result};

/// Column to place added columns after when none is given.
const DEFAULT_AFTER: &str = "id";

/// A table definition collected by a schema callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<ColumnSpec>,
    comment: Option<String>,
}

impl Table {
    /// Creates an empty definition for `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            columns: vec![],
            comment: None,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared columns in order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Appends a column and returns its modifier handle.
    pub fn column(&mut self, spec: ColumnSpec) -> ColumnBuilder<'_> {
        let at = self.columns.len();
        self.columns.push(spec);
        ColumnBuilder::new(&mut self.columns[at])
    }

    fn typed(&mut self, name: &str, column_type: ColumnType) -> ColumnBuilder<'_> {
        self.column(ColumnSpec::new(name, column_type))
    }

    /// Auto-incremented `INTEGER` primary key.
    pub fn increments(&mut self, name: &str) -> ColumnBuilder<'_> {
        let mut c = self.typed(name, ColumnType::Integer);
        c.primary_key().auto_increment();
        c
    }

    /// Auto-incremented `BIGINT` primary key.
    pub fn big_increments(&mut self, name: &str) -> ColumnBuilder<'_> {
        let mut c = self.typed(name, ColumnType::BigInt);
        c.primary_key().auto_increment();
        c
    }

    /// Boolean column, stored as `TINYINT`.
    pub fn boolean(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::TinyInt)
    }

    /// `TINYINT` column.
    pub fn tiny_int(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::TinyInt)
    }

    /// `SMALLINT` column.
    pub fn small_int(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::SmallInt)
    }

    /// `MEDIUMINT` column.
    pub fn medium_int(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::MediumInt)
    }

    /// `INTEGER` column.
    pub fn integer(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Integer)
    }

    /// `BIGINT` column.
    pub fn big_int(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::BigInt)
    }

    /// `FLOAT` column.
    pub fn float(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Float)
    }

    /// `DOUBLE` column.
    pub fn double(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Double)
    }

    /// `DECIMAL(precision, scale)` column.
    pub fn decimal(&mut self, name: &str, precision: u32, scale: u32) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Decimal { precision, scale })
    }

    /// `DATE` column.
    pub fn date(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Date)
    }

    /// `TIME` column.
    pub fn time(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Time)
    }

    /// `YEAR` column.
    pub fn year(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Year)
    }

    /// `DATETIME` column.
    pub fn date_time(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::DateTime)
    }

    /// `TIMESTAMP` column. With `is_default` it is `NOT NULL DEFAULT
    /// CURRENT_TIMESTAMP`, otherwise explicitly `NULL`.
    pub fn timestamp(&mut self, name: &str, is_default: bool) -> ColumnBuilder<'_> {
        let mut c = self.typed(name, ColumnType::Timestamp);
        if is_default {
            c.not_null().default("CURRENT_TIMESTAMP");
        } else {
            c.nullable();
        }
        c
    }

    /// `CHAR(len)` column.
    pub fn char(&mut self, name: &str, len: u32) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Char(len))
    }

    /// `VARCHAR(len)` column.
    pub fn string(&mut self, name: &str, len: u32) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Varchar(len))
    }

    /// `TEXT` column.
    pub fn text(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Text)
    }

    /// `BLOB` column.
    pub fn blob(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Blob)
    }

    /// `LONGTEXT` column.
    pub fn long_text(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::LongText)
    }

    /// `LONGBLOB` column.
    pub fn long_blob(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::LongBlob)
    }

    /// `JSON` column.
    pub fn json(&mut self, name: &str) -> ColumnBuilder<'_> {
        self.typed(name, ColumnType::Json)
    }

    /// Renames a column without touching its definition.
    pub fn rename(&mut self, from: &str, to: &str) -> &mut Self {
        self.columns.push(ColumnSpec {
            name: String::from(from),
            action: ColumnAction::Change,
            rename_to: Some(String::from(to)),
            ..ColumnSpec::default()
        });
        self
    }

    /// Drops a column.
    pub fn drop_column(&mut self, name: &str) -> &mut Self {
        self.columns.push(ColumnSpec {
            name: String::from(name),
            action: ColumnAction::DropColumn,
            ..ColumnSpec::default()
        });
        self
    }

    /// Drops an index.
    pub fn drop_index(&mut self, name: &str) -> &mut Self {
        self.columns.push(ColumnSpec {
            name: String::from(name),
            action: ColumnAction::DropIndex,
            ..ColumnSpec::default()
        });
        self
    }

    /// Sets the table comment.
    pub fn table_comment(&mut self, comment: &str) -> &mut Self {
        self.comment = Some(String::from(comment));
        self
    }

    /// Renders `CREATE TABLE`.
    ///
    /// Only added columns take part; renames and drops are ALTER-only.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoColumns`] when no column is declared and
    /// [`BuildError::MultipleAutoIncrement`] when more than one column
    /// auto-increments.
    pub fn to_create_sql(&self) -> Result<String> {
        let columns: Vec<&ColumnSpec> = self
            .columns
            .iter()
            .filter(|c| c.action == ColumnAction::Add)
            .collect();
        if columns.is_empty() {
            return Err(BuildError::NoColumns);
        }
        let auto_increments = columns.iter().filter(|c| c.auto_increment).count();
        if auto_increments > 1 {
            return Err(BuildError::MultipleAutoIncrement(auto_increments));
        }

        let mut b = TextBuilder::new();
        b.write("CREATE TABLE").pad().identifier(&self.name).pad();
        b.nested(|body| {
            let mut child = TextBuilder::new();
            write_primary_key(&mut child, &columns, "");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    body.comma();
                }
                body.identifier(&column.name);
                write_definition(body, column);
                write_indexes(&mut child, column, "");
            }
            body.append(&child);
        });
        if let Some(comment) = &self.comment {
            b.pad().write("COMMENT").pad();
            write_quoted(&mut b, comment);
        }

        let (sql, _) = b.build();
        Ok(sql)
    }

    /// Renders `ALTER TABLE`.
    ///
    /// Each entry is a `DROP INDEX`, `DROP COLUMN`, `CHANGE COLUMN` or
    /// `ADD COLUMN`. Added columns without an explicit position go after
    /// `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoColumns`] when there is neither a column
    /// entry nor a table comment.
    pub fn to_alter_sql(&self) -> Result<String> {
        if self.columns.is_empty() && self.comment.is_none() {
            return Err(BuildError::NoColumns);
        }

        let mut b = TextBuilder::new();
        let mut child = TextBuilder::new();
        b.write("ALTER TABLE").pad().identifier(&self.name);
        let added: Vec<&ColumnSpec> = self
            .columns
            .iter()
            .filter(|c| c.action == ColumnAction::Add)
            .collect();
        write_primary_key(&mut child, &added, "ADD ");
        for (i, column) in self.columns.iter().enumerate() {
            b.write(if i == 0 { " " } else { ", " });
            match column.action {
                ColumnAction::DropIndex => {
                    b.write("DROP INDEX").pad().identifier(&column.name);
                }
                ColumnAction::DropColumn => {
                    b.write("DROP COLUMN").pad().identifier(&column.name);
                }
                ColumnAction::Change => {
                    b.write("CHANGE COLUMN").pad().identifier(&column.name).pad();
                    b.identifier(column.rename_to.as_deref().unwrap_or(&column.name));
                    write_definition(&mut b, column);
                    write_indexes(&mut child, column, "ADD ");
                }
                ColumnAction::Add => {
                    b.write("ADD COLUMN").pad().identifier(&column.name);
                    write_definition(&mut b, column);
                    b.pad().write("AFTER").pad();
                    b.identifier(column.after.as_deref().unwrap_or(DEFAULT_AFTER));
                    write_indexes(&mut child, column, "ADD ");
                }
            }
        }
        b.append(&child);
        if let Some(comment) = &self.comment {
            b.write(if self.columns.is_empty() { " " } else { ", " });
            b.write("COMMENT").pad();
            write_quoted(&mut b, comment);
        }

        let (sql, _) = b.build();
        Ok(sql)
    }
}

/// Writes the type and modifiers that follow a column name.
fn write_definition(b: &mut TextBuilder, column: &ColumnSpec) {
    if let Some(column_type) = column.column_type {
        b.pad().write(&column_type.to_string());
    }
    if column.auto_increment {
        b.pad().write("AUTO_INCREMENT");
    }
    if let Some(charset) = &column.charset {
        b.pad().write("CHARACTER SET").pad();
        write_quoted(b, charset);
    }
    if let Some(collation) = &column.collation {
        b.pad().write("COLLATE").pad();
        write_quoted(b, collation);
    }
    match column.not_null {
        Some(true) => {
            b.pad().write("NOT NULL");
        }
        Some(false) => {
            b.pad().write("NULL");
        }
        None => {}
    }
    if let Some(default) = &column.default {
        let style = column
            .column_type
            .map_or(DefaultStyle::Bare, ColumnType::default_style);
        match style {
            DefaultStyle::Quoted => {
                b.pad().write("DEFAULT").pad();
                write_quoted(b, default);
            }
            DefaultStyle::Bare => {
                b.pad().write("DEFAULT").pad().write(default);
            }
            DefaultStyle::Suppressed => {}
        }
    }
    if let Some(comment) = &column.comment {
        b.pad().write("COMMENT").pad();
        write_quoted(b, comment);
    }
}

/// Writes the index, unique index and foreign key clauses of a column,
/// each prefixed with `, ` and `prefix`.
fn write_indexes(child: &mut TextBuilder, column: &ColumnSpec, prefix: &str) {
    if let Some(index) = &column.index {
        child.comma().write(prefix).write("INDEX").pad().identifier(index).pad();
        write_key_columns(child, &column.name, true);
    }
    if let Some(unique) = &column.unique {
        child
            .comma()
            .write(prefix)
            .write("UNIQUE INDEX")
            .pad()
            .identifier(unique)
            .pad();
        write_key_columns(child, &column.name, true);
    }
    if let Some(fk) = &column.foreign_key {
        child.comma().write(prefix);
        write_foreign_key(child, &column.name, fk);
    }
}

/// Writes one `PRIMARY KEY ("a", "b")` clause covering every key column.
fn write_primary_key(child: &mut TextBuilder, columns: &[&ColumnSpec], prefix: &str) {
    let keys: Vec<&str> = columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.as_str())
        .collect();
    if keys.is_empty() {
        return;
    }
    child.comma().write(prefix).write("PRIMARY KEY").pad();
    child.nested(|n| {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                n.comma();
            }
            n.identifier(key);
        }
    });
}

fn write_key_columns(b: &mut TextBuilder, column: &str, ascending: bool) {
    b.nested(|n| {
        n.identifier(column);
        if ascending {
            n.write(" ASC");
        }
    });
}

fn write_foreign_key(b: &mut TextBuilder, column: &str, fk: &ForeignKeyRef) {
    b.write("CONSTRAINT").pad().identifier(&fk.name).pad();
    b.write("FOREIGN KEY").pad();
    write_key_columns(b, column, false);
    b.pad().write("REFERENCES").pad().identifier(&fk.table).pad();
    write_key_columns(b, &fk.column, false);
    let on_update = fk.on_update.unwrap_or(ForeignKeyAction::NoAction);
    let on_delete = fk.on_delete.unwrap_or(ForeignKeyAction::NoAction);
    b.write(" ON UPDATE ").write(on_update.as_sql());
    b.write(" ON DELETE ").write(on_delete.as_sql());
}

/// Writes `'text'` with embedded single quotes doubled.
fn write_quoted(b: &mut TextBuilder, text: &str) {
    b.write_char('\'')
        .write(&text.replace('\'', "''"))
        .write_char('\'');
}

fn collect<F>(name: &str, define: F) -> Result<Table>
where
    F: FnOnce(&mut Table) -> Result<()>,
{
    let mut table = Table::new(name);
    define(&mut table)?;
    Ok(table)
}

/// Runs `define` against a fresh [`Table`] and renders `CREATE TABLE`.
///
/// # Example
///
/// ```rust
/// use sqlforge_core::schema::create_table;
///
/// let sql = create_table("users", |t| {
///     t.increments("id");
///     t.string("name", 64).not_null();
///     Ok(())
/// })
/// .unwrap();
///
/// assert_eq!(
///     sql,
///     r#"CREATE TABLE "users" ("id" INTEGER AUTO_INCREMENT, "name" VARCHAR(64) NOT NULL, PRIMARY KEY ("id"))"#
/// );
/// ```
///
/// # Errors
///
/// Propagates the callback's error untouched, and otherwise fails as
/// [`Table::to_create_sql`] does. No SQL is produced on failure.
pub fn create_table<F>(name: &str, define: F) -> Result<String>
where
    F: FnOnce(&mut Table) -> Result<()>,
{
    let sql = collect(name, define)?.to_create_sql()?;
    debug!(table = name, sql = %sql, "Built CREATE TABLE");
    Ok(sql)
}

/// Runs `define` against a fresh [`Table`] and renders `ALTER TABLE`.
///
/// # Errors
///
/// Propagates the callback's error untouched, and otherwise fails as
/// [`Table::to_alter_sql`] does. No SQL is produced on failure.
pub fn modify_table<F>(name: &str, define: F) -> Result<String>
where
    F: FnOnce(&mut Table) -> Result<()>,
{
    let sql = collect(name, define)?.to_alter_sql()?;
    debug!(table = name, sql = %sql, "Built ALTER TABLE");
    Ok(sql)
}
