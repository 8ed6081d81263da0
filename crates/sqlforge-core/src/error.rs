//! Error types for statement building.

use thiserror::Error;

/// Errors reported while assembling a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A terminal call was made before `table()` selected a target.
    #[error("no table selected: call table() before building a statement")]
    NoTable,

    /// More than one column of a table was declared auto-increment.
    #[error("the table only supports one auto-increment column, found {0}")]
    MultipleAutoIncrement(usize),

    /// A CREATE/ALTER TABLE definition declared nothing.
    #[error("table definition has no columns")]
    NoColumns,

    /// An insert/update was given no data.
    #[error("no data given for {0}")]
    EmptyData(&'static str),

    /// A batch-insert row does not carry the first row's column set.
    #[error("batch row {row} does not match the columns of the first row")]
    RowShapeMismatch {
        /// Zero-based index of the offending row.
        row: usize,
    },

    /// A batch-update column holds a different number of values than
    /// the first where column.
    #[error("batch column '{column}' has {found} values, expected {expected}")]
    BatchLengthMismatch {
        /// Column name.
        column: String,
        /// Row count taken from the first where column.
        expected: usize,
        /// Row count found on this column.
        found: usize,
    },

    /// A schema definition callback reported a failure.
    #[error("table definition aborted: {0}")]
    Aborted(String),
}

impl BuildError {
    /// Creates an `Aborted` error, for use inside schema callbacks.
    #[must_use]
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted(message.into())
    }
}

/// Result type alias for statement building.
pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            BuildError::MultipleAutoIncrement(2).to_string(),
            "the table only supports one auto-increment column, found 2"
        );
        assert_eq!(
            BuildError::aborted("bad column").to_string(),
            "table definition aborted: bad column"
        );
    }
}
