use sqlforge_core::BuildError;
use sqlforge_core::schema::{ColumnType, ForeignKeyAction, Table, create_table, modify_table};

#[test]
fn test_two_auto_increments_produce_no_sql() {
    let result = create_table("t", |t| {
        t.increments("id");
        t.string("name", 20);
        t.big_increments("seq");
        Ok(())
    });
    assert_eq!(result, Err(BuildError::MultipleAutoIncrement(2)));
}

#[test]
fn test_create_users_table() {
    let sql = create_table("users", |t| {
        t.increments("id");
        t.string("email", 255).not_null().unique("uq_users_email");
        t.decimal("balance", 10, 2).default(0);
        t.boolean("active").not_null().default(true);
        t.date_time("last_login").nullable();
        t.long_text("bio");
        t.table_comment("registered users");
        Ok(())
    })
    .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE \"users\" (\"id\" INTEGER AUTO_INCREMENT, \
         \"email\" VARCHAR(255) NOT NULL, \"balance\" DECIMAL(10, 2) DEFAULT 0, \
         \"active\" TINYINT NOT NULL DEFAULT 1, \"last_login\" DATETIME NULL, \
         \"bio\" LONGTEXT, PRIMARY KEY (\"id\"), \
         UNIQUE INDEX \"uq_users_email\" (\"email\" ASC)) COMMENT 'registered users'"
    );
}

#[test]
fn test_composite_primary_key_renders_one_clause() {
    let sql = create_table("memberships", |t| {
        t.big_int("user_id").not_null().primary_key();
        t.big_int("group_id").not_null().primary_key();
        Ok(())
    })
    .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE \"memberships\" (\"user_id\" BIGINT NOT NULL, \
         \"group_id\" BIGINT NOT NULL, PRIMARY KEY (\"user_id\", \"group_id\"))"
    );
}

#[test]
fn test_foreign_key_defaults_to_no_action() {
    let sql = create_table("posts", |t| {
        t.big_int("user_id")
            .not_null()
            .foreign_key("fk_posts_user", "users", "id", None, None);
        Ok(())
    })
    .unwrap();
    assert!(sql.ends_with(
        "CONSTRAINT \"fk_posts_user\" FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\") \
         ON UPDATE NO ACTION ON DELETE NO ACTION)"
    ));
}

#[test]
fn test_callback_failure_propagates() {
    let result = modify_table("users", |t| {
        t.string("nickname", 20);
        Err(BuildError::aborted("nickname is reserved"))
    });
    assert_eq!(
        result,
        Err(BuildError::Aborted(String::from("nickname is reserved")))
    );
}

#[test]
fn test_alter_statement() {
    let sql = modify_table("users", |t| {
        t.char("country", 2)
            .not_null()
            .default("NL")
            .collation("utf8mb4_bin")
            .after("email");
        t.text("bio").comment("about").rename_to("about");
        t.medium_int("score")
            .index("idx_score")
            .foreign_key("fk_score", "scores", "id", Some(ForeignKeyAction::Cascade), None);
        t.drop_index("idx_legacy");
        Ok(())
    })
    .unwrap();
    assert_eq!(
        sql,
        "ALTER TABLE \"users\" ADD COLUMN \"country\" CHAR(2) COLLATE 'utf8mb4_bin' NOT NULL \
         DEFAULT 'NL' AFTER \"email\", \
         CHANGE COLUMN \"bio\" \"about\" TEXT COMMENT 'about', \
         ADD COLUMN \"score\" MEDIUMINT AFTER \"id\", DROP INDEX \"idx_legacy\", \
         ADD INDEX \"idx_score\" (\"score\" ASC), \
         ADD CONSTRAINT \"fk_score\" FOREIGN KEY (\"score\") REFERENCES \"scores\" (\"id\") \
         ON UPDATE CASCADE ON DELETE NO ACTION"
    );
}

#[test]
fn test_table_collects_column_specs() {
    let mut table = Table::new("events");
    table.year("season");
    table.time("starts_at");
    table.timestamp("created_at", true);
    table.rename("old", "new");
    table.drop_column("gone");

    assert_eq!(table.name(), "events");
    let types: Vec<Option<ColumnType>> = table.columns().iter().map(|c| c.column_type).collect();
    assert_eq!(
        types,
        vec![
            Some(ColumnType::Year),
            Some(ColumnType::Time),
            Some(ColumnType::Timestamp),
            None,
            None
        ]
    );
    assert_eq!(
        table.columns()[2].default.as_deref(),
        Some("CURRENT_TIMESTAMP")
    );
}
