//! drawdb-sql: Convert SQL DDL to and from the DrawDB diagram model
//!
//! Supported dialects are MySQL, PostgreSQL, SQLite, MariaDB, SQL Server and
//! Oracle. DDL is parsed with `sqlparser-rs`, normalized into a small set of
//! statement variants and imported into a [`Diagram`]. A diagram can be
//! exported as DDL for any dialect. Whatever cannot be represented exactly is
//! reported as a [`Diagnostic`] next to the result instead of failing the call.
//!
//! # Importing
//!
//! ```rust,ignore
//! use drawdb_sql::{import_sql, Dialect};
//!
//! let outcome = import_sql("CREATE TABLE users (id INT PRIMARY KEY);", Dialect::MySql, Dialect::MySql)?;
//! assert_eq!(outcome.diagram.tables.len(), 1);
//! ```
//!
//! # Converting between dialects
//!
//! ```rust,ignore
//! drawdb_sql::ConvertBuilder::new("schema.sql")
//!     .source(drawdb_sql::Dialect::MySql)
//!     .target(drawdb_sql::Dialect::Postgres)
//!     .output_file("schema.pg.sql")
//!     .convert()?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! drawdb-sql --input schema.sql --from mysql --to oracle convert
//! ```

pub mod compat;
pub mod config;
pub mod diagnostic;
pub mod dialect;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod parser;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

pub use compat::are_fields_compatible;
pub use config::ConvertConfig;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use export::{ExportOutcome, SchemaExporter};
pub use import::{ImportOutcome, SchemaImporter};
pub use model::Diagram;

/// Parse `sql` written in `source` and import it as a diagram in `model_dialect`
pub fn import_sql(sql: &str, source: Dialect, model_dialect: Dialect) -> Result<ImportOutcome> {
    let statements = parser::parse_statements(sql, source);
    SchemaImporter::new(source, model_dialect).import(&statements)
}

/// Render `diagram` as DDL for `target`
pub fn export_sql(diagram: &Diagram, target: Dialect) -> ExportOutcome {
    SchemaExporter::new(target).export(diagram)
}

/// Result of a conversion run
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub sql: String,
    /// Tables left after filtering
    pub tables: usize,
    pub relationships: usize,
    /// Import diagnostics followed by export diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

/// Main entry point for SQL to SQL conversion
pub fn convert(config: &ConvertConfig) -> Result<ConvertReport> {
    info!(
        "Converting {:?} from {} to {}",
        config.input_file, config.source_dialect, config.target_dialect
    );
    let sql = std::fs::read_to_string(&config.input_file)?;

    let imported = import_sql(&sql, config.source_dialect, config.model_dialect())?;
    info!("Imported {} tables", imported.diagram.tables.len());

    let diagram = filter_tables(imported.diagram, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        diagram.tables.len(),
        config.include_tables,
        config.exclude_tables
    );

    let exported = export_sql(&diagram, config.target_dialect);
    let mut diagnostics = imported.diagnostics;
    diagnostics.extend(exported.diagnostics);

    if config.strict && !diagnostics.is_empty() {
        return Err(Error::Strict { diagnostics });
    }

    if let Some(output) = &config.output_file {
        info!("Writing {:?}", output);
        std::fs::write(output, &exported.sql)?;
    }

    Ok(ConvertReport {
        sql: exported.sql,
        tables: diagram.tables.len(),
        relationships: diagram.relationships.len(),
        diagnostics,
    })
}

/// Keep the tables selected by include/exclude patterns, along with the
/// relationships between them
pub fn filter_tables(mut diagram: Diagram, include: &str, exclude: &str) -> Diagram {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let all_ids: Vec<_> = diagram.tables.keys().copied().collect();
    diagram.tables.retain(|_, t| {
        let included = include_all || include_set.contains(&t.name);
        let excluded = exclude_set.contains(&t.name);
        included && !excluded
    });
    let removed: Vec<_> = all_ids
        .into_iter()
        .filter(|id| !diagram.tables.contains_key(id))
        .collect();
    diagram
        .relationships
        .retain(|r| !removed.iter().any(|id| r.touches_table(*id)));
    diagram
}

/// Builder pattern for programmatic conversions
pub struct ConvertBuilder {
    config: ConvertConfig,
}

impl ConvertBuilder {
    /// Create a new builder reading the given SQL file
    pub fn new(input_file: impl AsRef<Path>) -> Self {
        Self {
            config: ConvertConfig::default_with_input(input_file.as_ref().to_path_buf()),
        }
    }

    /// Set the dialect of the input SQL
    pub fn source(mut self, dialect: Dialect) -> Self {
        self.config.source_dialect = dialect;
        self
    }

    /// Set the dialect of the generated SQL
    pub fn target(mut self, dialect: Dialect) -> Self {
        self.config.target_dialect = dialect;
        self
    }

    /// Hold the intermediate diagram in `dialect` instead of the target
    pub fn model_dialect(mut self, dialect: Dialect) -> Self {
        self.config.model_dialect = Some(dialect);
        self
    }

    /// Write the generated SQL to `path`
    pub fn output_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.output_file = Some(PathBuf::from(path.as_ref()));
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Fail on any diagnostic
    pub fn strict(mut self) -> Self {
        self.config.strict = true;
        self
    }

    /// Settings collected so far
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Run the conversion
    pub fn convert(self) -> Result<ConvertReport> {
        self.config.validate()?;
        convert(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = r#"
        CREATE TABLE users (id INT PRIMARY KEY, email VARCHAR(255) NOT NULL);
        CREATE TABLE orders (
            id INT PRIMARY KEY,
            user_id INT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id)
        );
        CREATE TABLE audit_log (id INT PRIMARY KEY, message TEXT);
    "#;

    #[test]
    fn test_filter_tables_drops_touching_relationships() {
        let outcome = import_sql(SHOP, Dialect::MySql, Dialect::MySql).unwrap();
        assert_eq!(outcome.diagram.relationships.len(), 1);

        let filtered = filter_tables(outcome.diagram.clone(), "*", "users");
        assert_eq!(filtered.tables.len(), 2);
        assert!(filtered.relationships.is_empty());

        let filtered = filter_tables(outcome.diagram, "users, orders", "");
        assert_eq!(filtered.tables.len(), 2);
        assert_eq!(filtered.relationships.len(), 1);
    }

    #[test]
    fn test_convert_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("shop.sql");
        let output = dir.path().join("shop.sqlite.sql");
        std::fs::write(&input, SHOP).unwrap();

        let report = ConvertBuilder::new(&input)
            .source(Dialect::MySql)
            .target(Dialect::Sqlite)
            .exclude_tables(&["audit_log"])
            .output_file(&output)
            .convert()
            .unwrap();

        assert_eq!(report.tables, 2);
        assert_eq!(report.relationships, 1);
        assert!(report.diagnostics.is_empty());
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, report.sql);
        assert!(written.contains("REFERENCES users (id)"));
        assert!(!written.contains("audit_log"));
    }

    #[test]
    fn test_strict_mode_rejects_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("shop.sql");
        std::fs::write(&input, "CREATE TABLE t (id INT PRIMARY KEY); DROP TABLE x;").unwrap();

        let result = ConvertBuilder::new(&input).strict().convert();
        match result {
            Err(Error::Strict { diagnostics }) => {
                assert_eq!(diagnostics[0].kind(), DiagnosticKind::UnsupportedStatement);
            }
            other => panic!("expected strict failure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            import_sql("  ", Dialect::MySql, Dialect::MySql),
            Err(Error::EmptyInput)
        ));
    }
}
