//! Column definitions and their per-column modifier handle.

use std::fmt;

use crate::builder::ToSqlValue;

/// Column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// `TINYINT`
    TinyInt,
    /// `SMALLINT`
    SmallInt,
    /// `MEDIUMINT`
    MediumInt,
    /// `INTEGER`
    Integer,
    /// `BIGINT`
    BigInt,
    /// `FLOAT`
    Float,
    /// `DOUBLE`
    Double,
    /// `DECIMAL(precision, scale)`
    Decimal {
        /// Total number of digits.
        precision: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
    /// `DATE`
    Date,
    /// `TIME`
    Time,
    /// `YEAR`
    Year,
    /// `DATETIME`
    DateTime,
    /// `TIMESTAMP`
    Timestamp,
    /// `CHAR(len)`
    Char(u32),
    /// `VARCHAR(len)`
    Varchar(u32),
    /// `BLOB`
    Blob,
    /// `TEXT`
    Text,
    /// `LONGBLOB`
    LongBlob,
    /// `LONGTEXT`
    LongText,
    /// `JSON`
    Json,
}

/// How a `DEFAULT` literal is rendered for a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultStyle {
    /// Wrapped in single quotes.
    Quoted,
    /// Written as is.
    Bare,
    /// Not rendered at all.
    Suppressed,
}

impl ColumnType {
    /// Returns how a default value is rendered for this type.
    #[must_use]
    pub const fn default_style(self) -> DefaultStyle {
        match self {
            Self::Char(_) | Self::Varchar(_) | Self::Date | Self::Time | Self::DateTime => {
                DefaultStyle::Quoted
            }
            Self::Blob | Self::LongBlob | Self::Text | Self::LongText | Self::Json => {
                DefaultStyle::Suppressed
            }
            _ => DefaultStyle::Bare,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TinyInt => f.write_str("TINYINT"),
            Self::SmallInt => f.write_str("SMALLINT"),
            Self::MediumInt => f.write_str("MEDIUMINT"),
            Self::Integer => f.write_str("INTEGER"),
            Self::BigInt => f.write_str("BIGINT"),
            Self::Float => f.write_str("FLOAT"),
            Self::Double => f.write_str("DOUBLE"),
            Self::Decimal { precision, scale } => write!(f, "DECIMAL({precision}, {scale})"),
            Self::Date => f.write_str("DATE"),
            Self::Time => f.write_str("TIME"),
            Self::Year => f.write_str("YEAR"),
            Self::DateTime => f.write_str("DATETIME"),
            Self::Timestamp => f.write_str("TIMESTAMP"),
            Self::Char(len) => write!(f, "CHAR({len})"),
            Self::Varchar(len) => write!(f, "VARCHAR({len})"),
            Self::Blob => f.write_str("BLOB"),
            Self::Text => f.write_str("TEXT"),
            Self::LongBlob => f.write_str("LONGBLOB"),
            Self::LongText => f.write_str("LONGTEXT"),
            Self::Json => f.write_str("JSON"),
        }
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A named foreign key constraint on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// Constraint name.
    pub name: String,
    /// The referenced table name.
    pub table: String,
    /// The referenced column name.
    pub column: String,
    /// Action on update; `NO ACTION` when absent.
    pub on_update: Option<ForeignKeyAction>,
    /// Action on delete; `NO ACTION` when absent.
    pub on_delete: Option<ForeignKeyAction>,
}

/// What an ALTER TABLE does with a column entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAction {
    /// `ADD COLUMN`; the only action CREATE TABLE renders.
    #[default]
    Add,
    /// `CHANGE COLUMN`, optionally renaming.
    Change,
    /// `DROP COLUMN`
    DropColumn,
    /// `DROP INDEX`; the entry name is the index name.
    DropIndex,
}

/// One column's full definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSpec {
    /// Column name (index name for [`ColumnAction::DropIndex`]).
    pub name: String,
    /// Type; absent for pure renames and drops.
    pub column_type: Option<ColumnType>,
    /// ALTER TABLE action.
    pub action: ColumnAction,
    /// New name for a `CHANGE COLUMN`.
    pub rename_to: Option<String>,
    /// `Some(true)` renders `NOT NULL`, `Some(false)` renders `NULL`.
    pub not_null: Option<bool>,
    /// Renders `AUTO_INCREMENT`.
    pub auto_increment: bool,
    /// Adds a `PRIMARY KEY` clause.
    pub primary_key: bool,
    /// Default literal, quoted according to [`ColumnType::default_style`].
    pub default: Option<String>,
    /// Name of a plain index on this column.
    pub index: Option<String>,
    /// Name of a unique index on this column.
    pub unique: Option<String>,
    /// Foreign key constraint.
    pub foreign_key: Option<ForeignKeyRef>,
    /// Column comment.
    pub comment: Option<String>,
    /// Column to add this one after; `id` when absent.
    pub after: Option<String>,
    /// Character set.
    pub charset: Option<String>,
    /// Collation.
    pub collation: Option<String>,
}

impl ColumnSpec {
    /// Creates a bare column of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type: Some(column_type),
            ..Self::default()
        }
    }
}

/// Modifier handle bound to the column it was returned for.
///
/// ```rust
/// use sqlforge_core::schema::{ColumnType, Table};
///
/// let mut table = Table::new("users");
/// table.string("email", 128).not_null().unique("uq_email");
///
/// let email = &table.columns()[0];
/// assert_eq!(email.column_type, Some(ColumnType::Varchar(128)));
/// assert_eq!(email.not_null, Some(true));
/// ```
#[derive(Debug)]
pub struct ColumnBuilder<'a> {
    spec: &'a mut ColumnSpec,
}

impl<'a> ColumnBuilder<'a> {
    pub(crate) fn new(spec: &'a mut ColumnSpec) -> Self {
        Self { spec }
    }

    /// Marks the column `NOT NULL`.
    pub fn not_null(&mut self) -> &mut Self {
        self.spec.not_null = Some(true);
        self
    }

    /// Marks the column explicitly `NULL`.
    pub fn nullable(&mut self) -> &mut Self {
        self.spec.not_null = Some(false);
        self
    }

    /// Adds a `PRIMARY KEY` clause for the column.
    pub fn primary_key(&mut self) -> &mut Self {
        self.spec.primary_key = true;
        self
    }

    /// Marks the column `AUTO_INCREMENT`.
    pub fn auto_increment(&mut self) -> &mut Self {
        self.spec.auto_increment = true;
        self
    }

    /// Sets the default value.
    pub fn default<T: ToSqlValue>(&mut self, value: T) -> &mut Self {
        self.spec.default = Some(value.to_sql_value().to_literal());
        self
    }

    /// Sets the column comment.
    pub fn comment(&mut self, comment: &str) -> &mut Self {
        self.spec.comment = Some(String::from(comment));
        self
    }

    /// Adds a named index on the column.
    pub fn index(&mut self, name: &str) -> &mut Self {
        self.spec.index = Some(String::from(name));
        self
    }

    /// Adds a named unique index on the column.
    pub fn unique(&mut self, name: &str) -> &mut Self {
        self.spec.unique = Some(String::from(name));
        self
    }

    /// Adds a named foreign key referencing `table.column`.
    pub fn foreign_key(
        &mut self,
        name: &str,
        table: &str,
        column: &str,
        on_update: Option<ForeignKeyAction>,
        on_delete: Option<ForeignKeyAction>,
    ) -> &mut Self {
        self.spec.foreign_key = Some(ForeignKeyRef {
            name: String::from(name),
            table: String::from(table),
            column: String::from(column),
            on_update,
            on_delete,
        });
        self
    }

    /// Sets the collation.
    pub fn collation(&mut self, collation: &str) -> &mut Self {
        self.spec.collation = Some(String::from(collation));
        self
    }

    /// Sets the character set.
    pub fn charset(&mut self, charset: &str) -> &mut Self {
        self.spec.charset = Some(String::from(charset));
        self
    }

    /// Positions an added column after `column`.
    pub fn after(&mut self, column: &str) -> &mut Self {
        self.spec.after = Some(String::from(column));
        self
    }

    /// Changes the existing column in place instead of adding it.
    pub fn change(&mut self) -> &mut Self {
        self.spec.action = ColumnAction::Change;
        self
    }

    /// Changes the existing column and renames it.
    pub fn rename_to(&mut self, name: &str) -> &mut Self {
        self.spec.action = ColumnAction::Change;
        self.spec.rename_to = Some(String::from(name));
        self
    }
}
