//! Import, export and re-import the demo schemas
//!
//! For every dialect the diagram rebuilt from exported SQL must match the
//! diagram it was exported from, ignoring ids and layout.

use anyhow::Result;
use drawdb_sql::dialect::CommentStyle;
use drawdb_sql::model::{Cardinality, ReferentialAction};
use drawdb_sql::{export_sql, import_sql, Diagram, Dialect};

const SHOP_MYSQL: &str = include_str!("../../demos/shop-mysql.sql");
const BLOG_POSTGRES: &str = include_str!("../../demos/blog-postgres.sql");
const NOTES_SQLITE: &str = include_str!("../../demos/notes-sqlite.sql");

fn import_clean(sql: &str, dialect: Dialect) -> Result<Diagram> {
    let outcome = import_sql(sql, dialect, dialect)?;
    assert!(
        outcome.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        outcome.diagnostics
    );
    Ok(outcome.diagram)
}

fn assert_round_trip(sql: &str, dialect: Dialect) -> Result<Diagram> {
    let first = import_clean(sql, dialect)?;

    let exported = export_sql(&first, dialect);
    assert!(
        exported.diagnostics.is_empty(),
        "unexpected export diagnostics: {:?}",
        exported.diagnostics
    );

    let second = import_clean(&exported.sql, dialect)?;
    assert_eq!(
        first.schema_view(),
        second.schema_view(),
        "exported SQL:\n{}",
        exported.sql
    );
    Ok(first)
}

/// Import MySQL source into a `dialect` diagram, then round trip it through
/// `dialect` itself. Import-time fallbacks are expected here.
fn assert_converted_round_trip(sql: &str, dialect: Dialect) -> Result<Diagram> {
    let mut first = import_sql(sql, Dialect::MySql, dialect)?.diagram;
    if dialect.descriptor().comments == CommentStyle::LineComment {
        for table in first.tables.values_mut() {
            table.comment = None;
            for field in &mut table.fields {
                field.comment = None;
            }
        }
    }

    let exported = export_sql(&first, dialect);
    let second = import_sql(&exported.sql, dialect, dialect)?.diagram;
    assert_eq!(
        first.schema_view(),
        second.schema_view(),
        "exported SQL:\n{}",
        exported.sql
    );
    Ok(first)
}

#[test]
fn test_mariadb_round_trip() -> Result<()> {
    let diagram = assert_round_trip(SHOP_MYSQL, Dialect::MariaDb)?;
    assert_eq!(diagram.tables.len(), 4);
    assert_eq!(diagram.relationships.len(), 3);

    let converted = assert_converted_round_trip(SHOP_MYSQL, Dialect::MariaDb)?;
    let status = converted
        .table_by_name("users")
        .and_then(|t| t.field_by_name("status"))
        .unwrap();
    assert_eq!(status.data_type, "users_status");
    Ok(())
}

#[test]
fn test_oracle_round_trip() -> Result<()> {
    let diagram = assert_converted_round_trip(SHOP_MYSQL, Dialect::Oracle)?;
    assert!(diagram.enums.is_empty());

    let users = diagram.table_by_name("users").unwrap();
    assert_eq!(users.comment.as_deref(), Some("Registered accounts"));
    let status = users.field_by_name("status").unwrap();
    assert_eq!(status.data_type, "VARCHAR2");
    assert_eq!(status.check.as_deref(), Some("status IN ('active', 'banned')"));
    assert!(users.field_by_name("id").unwrap().increment);
    Ok(())
}

#[test]
fn test_sql_server_round_trip() -> Result<()> {
    let diagram = assert_converted_round_trip(SHOP_MYSQL, Dialect::MsSql)?;
    assert_eq!(diagram.relationships.len(), 3);

    let items = diagram.table_by_name("order_items").unwrap();
    assert_eq!(items.primary_fields().len(), 2);
    let orders = diagram.table_by_name("orders").unwrap();
    assert!(orders.field_by_name("id").unwrap().increment);
    Ok(())
}

#[test]
fn test_mysql_round_trip() -> Result<()> {
    let diagram = assert_round_trip(SHOP_MYSQL, Dialect::MySql)?;

    let names: Vec<&str> = diagram.tables.values().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["users", "products", "orders", "order_items"]);
    assert_eq!(diagram.relationships.len(), 3);

    let users = diagram.table_by_name("users").unwrap();
    assert_eq!(users.comment.as_deref(), Some("Registered accounts"));
    let status = users.field_by_name("status").unwrap();
    assert_eq!(status.data_type, "users_status");
    assert_eq!(
        diagram.enum_by_name("users_status").unwrap().values,
        vec!["active", "banned"]
    );

    let products = diagram.table_by_name("products").unwrap();
    let price = products.field_by_name("price").unwrap();
    assert_eq!(price.size.as_deref(), Some("10,2"));
    assert_eq!(price.check.as_deref(), Some("price >= 0"));
    assert!(products.field_by_name("stock").unwrap().unsigned);
    Ok(())
}

#[test]
fn test_postgres_round_trip() -> Result<()> {
    let diagram = assert_round_trip(BLOG_POSTGRES, Dialect::Postgres)?;

    assert_eq!(diagram.enums.len(), 1);
    let posts = diagram.table_by_name("posts").unwrap();
    assert_eq!(posts.comment.as_deref(), Some("Blog entries"));
    assert_eq!(
        posts.field_by_name("title").unwrap().comment.as_deref(),
        Some("Headline")
    );
    assert!(posts.field_by_name("id").unwrap().increment);
    assert_eq!(posts.field_by_name("state").unwrap().data_type, "post_state");

    let rel = &diagram.relationships[0];
    assert_eq!(rel.name, "fk_posts_author_id");
    assert_eq!(rel.delete_constraint, ReferentialAction::Cascade);
    assert_eq!(rel.cardinality, Cardinality::ManyToOne);
    Ok(())
}

#[test]
fn test_sqlite_round_trip() -> Result<()> {
    let diagram = assert_round_trip(NOTES_SQLITE, Dialect::Sqlite)?;

    let notes = diagram.table_by_name("notes").unwrap();
    assert!(notes.field_by_name("id").unwrap().increment);
    assert_eq!(
        notes.field_by_name("body").unwrap().check.as_deref(),
        Some("length(body) < 10000")
    );
    assert_eq!(
        diagram.relationships[0].delete_constraint,
        ReferentialAction::SetNull
    );

    let exported = export_sql(&diagram, Dialect::Sqlite);
    assert!(!exported.sql.contains("ALTER TABLE"));
    Ok(())
}

#[test]
fn test_composite_primary_key_survives() -> Result<()> {
    let diagram = import_clean(SHOP_MYSQL, Dialect::MySql)?;
    let exported = export_sql(&diagram, Dialect::MySql);
    assert!(exported
        .sql
        .contains("  quantity INT NOT NULL DEFAULT 1,\n  PRIMARY KEY (order_id, product_id)\n);"));
    assert!(!exported.sql.contains("order_id INT NOT NULL PRIMARY KEY"));

    let items = diagram.table_by_name("order_items").unwrap();
    let keys: Vec<&str> = items
        .primary_fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(keys, vec!["order_id", "product_id"]);
    Ok(())
}
