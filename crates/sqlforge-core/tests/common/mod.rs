#![allow(dead_code)]

use sqlforge_core::{QueryBuilder, SqlValue};

/// Counts `?` placeholders outside single-quoted literals.
pub fn placeholder_count(sql: &str) -> usize {
    let mut in_literal = false;
    sql.chars()
        .filter(|c| {
            if *c == '\'' {
                in_literal = !in_literal;
            }
            *c == '?' && !in_literal
        })
        .count()
}

/// Asserts that the statement binds exactly one argument per placeholder.
pub fn assert_aligned(sql: &str, args: &[SqlValue]) {
    assert_eq!(
        placeholder_count(sql),
        args.len(),
        "placeholder/argument mismatch in: {sql}\nargs: {args:?}"
    );
}

/// Renders the builder's SELECT, panicking on failure.
pub fn select(qb: &QueryBuilder) -> (String, Vec<SqlValue>) {
    qb.query()
        .unwrap_or_else(|e| panic!("failed to build query: {e}"))
}

/// Renders the arguments as literal text for compact comparisons.
pub fn literals(args: &[SqlValue]) -> Vec<String> {
    args.iter().map(SqlValue::to_literal).collect()
}
