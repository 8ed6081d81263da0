//! Append-only statement text with its bound arguments.
//!
//! A [`TextBuilder`] is the primitive every statement is assembled on. The
//! text and the argument list only grow together: each [`argument`] call
//! pushes one value and emits exactly one `?`, and [`nested`] / [`append`]
//! splice another builder's text and arguments in one step, so the Nth
//! placeholder always pairs with the Nth argument.
//!
//! [`argument`]: TextBuilder::argument
//! [`nested`]: TextBuilder::nested
//! [`append`]: TextBuilder::append

use super::op::Op;
use super::value::{SqlValue, ToSqlValue};

/// The identifier quote character.
pub const QUOTE: char = '"';

/// Wraps an identifier in quote characters.
#[must_use]
pub fn quote(ident: &str) -> String {
    format!("{QUOTE}{ident}{QUOTE}")
}

/// Statement text plus the ordered values bound to its placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBuilder {
    sql: String,
    args: Vec<SqlValue>,
}

impl TextBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw text.
    pub fn write(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    /// Appends a single character.
    pub fn write_char(&mut self, c: char) -> &mut Self {
        self.sql.push(c);
        self
    }

    /// Appends a single space.
    pub fn pad(&mut self) -> &mut Self {
        self.write_char(' ')
    }

    /// Appends `", "`.
    pub fn comma(&mut self) -> &mut Self {
        self.write(", ")
    }

    /// Appends a quoted identifier.
    pub fn identifier(&mut self, name: &str) -> &mut Self {
        self.write_char(QUOTE).write(name).write_char(QUOTE)
    }

    /// Appends `"table"."name"`.
    pub fn qualified_identifier(&mut self, table: &str, name: &str) -> &mut Self {
        self.identifier(table).write_char('.').identifier(name)
    }

    /// Appends an operator padded on both sides, or only on the left for
    /// `IS NULL` / `IS NOT NULL`.
    pub fn operator(&mut self, op: Op) -> &mut Self {
        self.pad().write(op.as_sql());
        if !op.is_postfix() {
            self.pad();
        }
        self
    }

    /// Binds one value and appends its placeholder.
    pub fn argument<T: ToSqlValue>(&mut self, value: T) -> &mut Self {
        self.args.push(value.to_sql_value());
        self.write(SqlValue::placeholder())
    }

    /// Binds every value, appending comma-separated placeholders.
    pub fn argument_list<I, T>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.argument(value);
        }
        self
    }

    /// Binds values without emitting placeholders.
    ///
    /// Only for raw fragments that already carry their own `?` tokens.
    pub fn bind_only<I, T>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.args.extend(values.into_iter().map(ToSqlValue::to_sql_value));
        self
    }

    /// Builds a group on a fresh builder and appends it wrapped in
    /// parentheses, together with its arguments.
    pub fn nested<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let mut inner = Self::new();
        build(&mut inner);
        self.write_char('(');
        self.append(&inner);
        self.write_char(')')
    }

    /// Appends another builder's text and arguments.
    pub fn append(&mut self, other: &Self) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.args.extend(other.args.iter().cloned());
        self
    }

    /// Returns `true` if no text has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Returns the length of the text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sql.len()
    }

    /// Returns the text written so far.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the arguments bound so far.
    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    /// Consumes the builder and returns the SQL and parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.args)
    }
}
