//! Cross-dialect conversion, determinism and partial failure

use anyhow::Result;
use drawdb_sql::{
    are_fields_compatible, export_sql, import_sql, Diagram, DiagnosticKind, Dialect, Error,
};

const SHOP_MYSQL: &str = include_str!("../../demos/shop-mysql.sql");
const BLOG_POSTGRES: &str = include_str!("../../demos/blog-postgres.sql");
const PARTIAL_FAILURE: &str = include_str!("../../demos/partial-failure.sql");

#[test]
fn test_export_is_deterministic() -> Result<()> {
    let diagram = import_sql(SHOP_MYSQL, Dialect::MySql, Dialect::MySql)?.diagram;

    for dialect in Dialect::ALL {
        let first = export_sql(&diagram, dialect);
        let second = export_sql(&diagram, dialect);
        assert_eq!(first.sql, second.sql, "{} output differs", dialect);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
    Ok(())
}

#[test]
fn test_diagram_json_round_trip_exports_identically() -> Result<()> {
    let diagram = import_sql(BLOG_POSTGRES, Dialect::Postgres, Dialect::Postgres)?.diagram;
    let json = serde_json::to_string(&diagram)?;
    let restored: Diagram = serde_json::from_str(&json)?;

    assert_eq!(restored, diagram);
    assert_eq!(
        export_sql(&restored, Dialect::Postgres).sql,
        export_sql(&diagram, Dialect::Postgres).sql
    );
    Ok(())
}

#[test]
fn test_partial_failure_keeps_valid_statements() -> Result<()> {
    let outcome = import_sql(PARTIAL_FAILURE, Dialect::MySql, Dialect::MySql)?;

    let names: Vec<&str> = outcome
        .diagram
        .tables
        .values()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["teams", "players", "matches"]);
    assert_eq!(outcome.diagram.relationships.len(), 1);

    let found: Vec<(DiagnosticKind, Option<usize>)> = outcome
        .diagnostics
        .iter()
        .map(|d| (d.kind(), d.statement()))
        .collect();
    assert_eq!(
        found,
        vec![
            (DiagnosticKind::MalformedAst, Some(2)),
            (DiagnosticKind::DanglingReference, Some(3)),
        ]
    );
    Ok(())
}

#[test]
fn test_unterminated_literal_costs_one_statement() -> Result<()> {
    let sql = "CREATE TABLE teams (id INT PRIMARY KEY);\n\
               CREATE TABLE broken (motto TEXT DEFAULT 'never);\n\
               CREATE TABLE players (id INT PRIMARY KEY, team_id INT REFERENCES teams (id));";
    let outcome = import_sql(sql, Dialect::Postgres, Dialect::Postgres)?;

    let names: Vec<&str> = outcome
        .diagram
        .tables
        .values()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["teams", "players"]);
    assert_eq!(outcome.diagram.relationships.len(), 1);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind(), DiagnosticKind::MalformedAst);
    assert_eq!(outcome.diagnostics[0].statement(), Some(1));
    Ok(())
}

#[test]
fn test_only_malformed_input_is_rejected() {
    let result = import_sql("CREATE TABLE (;", Dialect::MySql, Dialect::MySql);
    match result {
        Err(Error::NothingImported { diagnostics }) => {
            assert_eq!(diagnostics[0].kind(), DiagnosticKind::MalformedAst);
        }
        other => panic!("expected NothingImported, got {:?}", other),
    }
}

#[test]
fn test_mysql_to_postgres() -> Result<()> {
    let outcome = import_sql(SHOP_MYSQL, Dialect::MySql, Dialect::Postgres)?;
    let diagram = outcome.diagram;
    assert_eq!(diagram.enums[0].name, "users_status");

    let exported = export_sql(&diagram, Dialect::Postgres);
    assert!(exported
        .sql
        .starts_with("CREATE TYPE users_status AS ENUM ('active', 'banned');"));
    assert!(exported
        .sql
        .contains("COMMENT ON TABLE users IS 'Registered accounts';"));
    assert!(exported
        .sql
        .contains("id INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY"));
    assert!(!exported.sql.contains("UNSIGNED"));

    let reimported = import_sql(&exported.sql, Dialect::Postgres, Dialect::Postgres)?;
    assert_eq!(reimported.diagram.tables.len(), 4);
    assert_eq!(reimported.diagram.relationships.len(), 3);
    Ok(())
}

#[test]
fn test_mysql_to_sqlite_reports_enum_fallback() -> Result<()> {
    let outcome = import_sql(SHOP_MYSQL, Dialect::MySql, Dialect::Sqlite)?;
    assert!(outcome.diagram.enums.is_empty());
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.kind() == DiagnosticKind::UnknownTypeMapping));

    let status = outcome
        .diagram
        .table_by_name("users")
        .and_then(|t| t.field_by_name("status"))
        .unwrap();
    assert_eq!(status.data_type, "TEXT");
    assert_eq!(status.check.as_deref(), Some("status IN ('active', 'banned')"));

    let exported = export_sql(&outcome.diagram, Dialect::Sqlite);
    assert!(exported
        .sql
        .contains("status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'banned'))"));
    Ok(())
}

#[test]
fn test_mysql_to_oracle_and_sql_server() -> Result<()> {
    let diagram = import_sql(SHOP_MYSQL, Dialect::MySql, Dialect::MySql)?.diagram;

    let oracle = export_sql(&diagram, Dialect::Oracle);
    assert!(oracle.sql.contains("price NUMBER(10,2) NOT NULL CHECK (price >= 0)"));
    assert!(oracle.sql.contains("email VARCHAR2(255) NOT NULL UNIQUE"));
    assert!(oracle.sql.contains("COMMENT ON TABLE users IS 'Registered accounts';"));

    let mssql = export_sql(&diagram, Dialect::MsSql);
    assert!(mssql.sql.contains("id INT NOT NULL IDENTITY(1,1) PRIMARY KEY"));
    assert!(mssql.sql.contains("-- Registered accounts\nCREATE TABLE users ("));
    assert!(mssql
        .diagnostics
        .iter()
        .all(|d| d.kind() == DiagnosticKind::UnsupportedDialectFeature));
    Ok(())
}

#[test]
fn test_field_compatibility() {
    assert!(are_fields_compatible(Dialect::MySql, "INT", "BIGINT"));
    assert!(!are_fields_compatible(Dialect::MySql, "VARCHAR", "INT"));
    assert!(are_fields_compatible(Dialect::MySql, "DATE", "TIMESTAMP"));
    assert!(are_fields_compatible(Dialect::MySql, "INT", "INT"));
    assert!(!are_fields_compatible(Dialect::MySql, "", "INT"));
}
