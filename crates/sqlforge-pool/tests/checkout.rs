use std::sync::Arc;

use sqlforge_core::{Direction, Op, SqlValue};
use sqlforge_pool::Registry;

#[test]
fn test_checkouts_share_connection_not_builder() {
    let registry = Registry::new();
    let mut first = registry.checkout("mysql").unwrap();
    let second = registry.checkout("mysql").unwrap();

    assert!(Arc::ptr_eq(first.connection(), second.connection()));
    assert_eq!(first.target(), "mysql");

    first.table("users").where_("id", Op::Eq, 1);
    assert_eq!(first.where_args().len(), 1);
    assert!(second.where_args().is_empty());
}

#[test]
fn test_handle_exposes_builder() {
    let registry = Registry::new();
    let mut db = registry.checkout("postgres").unwrap();
    db.table("posts")
        .select(&["title"])
        .order_by("points", Direction::Desc)
        .limit(3);
    let (sql, args) = db.query().unwrap();
    assert_eq!(
        sql,
        "SELECT \"title\" FROM \"posts\" ORDER BY \"posts\".\"points\" DESC LIMIT 3"
    );
    assert!(args.is_empty());

    let (sql, args) = db.table("posts").insert(vec![("title", "hello")]).unwrap();
    assert_eq!(sql, "INSERT INTO \"posts\" (\"title\") VALUES (?)");
    assert_eq!(args, vec![SqlValue::Text(String::from("hello"))]);
}

#[test]
fn test_handle_builds_schema() {
    let db = Registry::new().checkout("mysql").unwrap();
    let sql = db
        .create_table("tags", |t| {
            t.increments("id");
            t.string("label", 32).not_null();
            Ok(())
        })
        .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE \"tags\" (\"id\" INTEGER AUTO_INCREMENT, \"label\" VARCHAR(32) NOT NULL, \
         PRIMARY KEY (\"id\"))"
    );

    let sql = db
        .modify_table("tags", |t| {
            t.drop_column("label");
            Ok(())
        })
        .unwrap();
    assert_eq!(sql, "ALTER TABLE \"tags\" DROP COLUMN \"label\"");
}

#[test]
fn test_global_registry_hands_out_fresh_builders() {
    let mut first = Registry::global().checkout("sqlite").unwrap();
    first.table("logs").where_("level", Op::Eq, "warn");
    let second = Registry::global().checkout("sqlite").unwrap();
    assert!(Arc::ptr_eq(first.connection(), second.connection()));
    assert!(second.where_args().is_empty());
}
