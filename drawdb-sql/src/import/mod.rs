//! Normalized DDL statements to a diagram fragment
//!
//! Statements are applied in three passes so that forward references work:
//! definitions (tables, enums, types), then indexes and comments, then
//! foreign keys. Problems local to one statement become diagnostics.

mod references;
mod tables;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::diagnostic::Diagnostic;
use crate::dialect::{Dialect, DialectDescriptor, EnumSupport};
use crate::error::{Error, Result};
use crate::model::{CustomType, Diagram, Enum, Index, TypeField};
use crate::parser::{CommentTarget, CreateIndexStmt, DdlStatement, ForeignKeySpec};

/// Result of a successful import
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub diagram: Diagram,
    pub diagnostics: Vec<Diagnostic>,
}

/// Converts statements written in `source` into a diagram in `target`
#[derive(Debug, Clone, Copy)]
pub struct SchemaImporter {
    source: Dialect,
    target: Dialect,
}

impl SchemaImporter {
    pub fn new(source: Dialect, target: Dialect) -> Self {
        Self { source, target }
    }

    /// Import a batch of statements.
    ///
    /// Fails only when there is nothing to import or nothing could be
    /// imported; everything else is reported in the outcome's diagnostics.
    pub fn import(&self, statements: &[DdlStatement]) -> Result<ImportOutcome> {
        if statements.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut context = ImportContext::new(self.source, self.target);

        for (index, statement) in statements.iter().enumerate() {
            let result = match statement {
                DdlStatement::CreateTable(create) => context.add_table(index, create),
                DdlStatement::CreateEnum { name, values } => context.add_enum(name, values),
                DdlStatement::CreateCompositeType { name, fields } => {
                    context.add_composite_type(name, fields)
                }
                DdlStatement::AddForeignKey {
                    table,
                    foreign_keys,
                } => {
                    for foreign_key in foreign_keys {
                        context.defer_foreign_key(index, table, foreign_key);
                    }
                    Ok(())
                }
                DdlStatement::Unsupported { kind } => Err(Diagnostic::UnsupportedStatement {
                    statement: None,
                    kind: kind.clone(),
                }),
                DdlStatement::Malformed { kind, reason } => {
                    Err(Diagnostic::malformed(kind.clone(), reason.clone()))
                }
                DdlStatement::CreateIndex(_) | DdlStatement::Comment { .. } => Ok(()),
            };
            context.record(index, result);
        }

        for (index, statement) in statements.iter().enumerate() {
            let result = match statement {
                DdlStatement::CreateIndex(create) => context.add_index(create),
                DdlStatement::Comment { target, text } => context.set_comment(target, text),
                _ => Ok(()),
            };
            context.record(index, result);
        }

        context.resolve_foreign_keys();

        let ImportContext {
            diagram,
            diagnostics,
            ..
        } = context;

        if diagram.is_empty() {
            return Err(Error::NothingImported { diagnostics });
        }

        info!(
            "Imported {} tables, {} relationships ({} diagnostics)",
            diagram.tables.len(),
            diagram.relationships.len(),
            diagnostics.len()
        );
        Ok(ImportOutcome {
            diagram,
            diagnostics,
        })
    }
}

/// Foreign key waiting for every table to exist
struct PendingForeignKey {
    statement: usize,
    table: String,
    spec: ForeignKeySpec,
}

/// Mutable state of one import call
struct ImportContext {
    source: Dialect,
    target: &'static DialectDescriptor,
    diagram: Diagram,
    diagnostics: Vec<Diagnostic>,
    pending: Vec<PendingForeignKey>,
    /// Enums declared in the input that the target cannot hold, by name
    dropped_enums: HashMap<String, Vec<String>>,
    /// Composite types declared in the input that the target cannot hold
    dropped_types: Vec<String>,
}

impl ImportContext {
    fn new(source: Dialect, target: Dialect) -> Self {
        Self {
            source,
            target: target.descriptor(),
            diagram: Diagram::new(target),
            diagnostics: Vec::new(),
            pending: Vec::new(),
            dropped_enums: HashMap::new(),
            dropped_types: Vec::new(),
        }
    }

    fn record(&mut self, statement: usize, result: std::result::Result<(), Diagnostic>) {
        if let Err(diagnostic) = result {
            self.push(statement, diagnostic);
        }
    }

    fn push(&mut self, statement: usize, diagnostic: Diagnostic) {
        let diagnostic = diagnostic.at_statement(statement);
        debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn defer_foreign_key(&mut self, statement: usize, table: &str, spec: &ForeignKeySpec) {
        self.pending.push(PendingForeignKey {
            statement,
            table: table.to_string(),
            spec: spec.clone(),
        });
    }

    fn add_enum(&mut self, name: &str, values: &[String]) -> std::result::Result<(), Diagnostic> {
        if self.diagram.enum_by_name(name).is_some() || self.dropped_enums.contains_key(name) {
            return Err(Diagnostic::DuplicateDefinition {
                statement: None,
                name: name.to_string(),
            });
        }
        if self.target.enums == EnumSupport::None {
            self.dropped_enums.insert(name.to_string(), values.to_vec());
            return Err(Diagnostic::UnsupportedStatement {
                statement: None,
                kind: format!("CREATE TYPE {} AS ENUM", name),
            });
        }
        self.diagram.enums.push(Enum {
            name: name.to_string(),
            values: values.to_vec(),
        });
        Ok(())
    }

    fn add_composite_type(
        &mut self,
        name: &str,
        fields: &[(String, String)],
    ) -> std::result::Result<(), Diagnostic> {
        if self.diagram.type_by_name(name).is_some() || self.dropped_types.iter().any(|t| t == name) {
            return Err(Diagnostic::DuplicateDefinition {
                statement: None,
                name: name.to_string(),
            });
        }
        if !self.target.custom_types {
            self.dropped_types.push(name.to_string());
            return Err(Diagnostic::UnsupportedStatement {
                statement: None,
                kind: format!("CREATE TYPE {}", name),
            });
        }
        self.diagram.types.push(CustomType {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(name, data_type)| TypeField {
                    name: name.clone(),
                    data_type: data_type.clone(),
                })
                .collect(),
            comment: None,
        });
        Ok(())
    }

    fn add_index(&mut self, create: &CreateIndexStmt) -> std::result::Result<(), Diagnostic> {
        let context = match &create.name {
            Some(name) => format!("index `{}`", name),
            None => format!("index on `{}`", create.table),
        };
        let table_id = self
            .diagram
            .table_id_by_name(&create.table)
            .ok_or_else(|| Diagnostic::dangling(context.clone(), create.table.clone()))?;
        let table = self
            .diagram
            .tables
            .get_mut(&table_id)
            .ok_or_else(|| Diagnostic::dangling(context.clone(), create.table.clone()))?;

        let mut fields = Vec::with_capacity(create.columns.len());
        for column in &create.columns {
            let field = table.field_by_name(column).ok_or_else(|| {
                Diagnostic::dangling(context.clone(), format!("{}.{}", table.name, column))
            })?;
            fields.push(field.name.clone());
        }

        if let Some(name) = &create.name {
            if table.indices.iter().any(|i| i.name.as_deref() == Some(name.as_str())) {
                return Err(Diagnostic::DuplicateDefinition {
                    statement: None,
                    name: name.clone(),
                });
            }
        }

        table.indices.push(Index {
            name: create.name.clone(),
            unique: create.unique,
            fields,
        });
        Ok(())
    }

    fn set_comment(
        &mut self,
        target: &CommentTarget,
        text: &Option<String>,
    ) -> std::result::Result<(), Diagnostic> {
        let table_name = match target {
            CommentTarget::Table(table) | CommentTarget::Column { table, .. } => table,
        };
        let table_id = self
            .diagram
            .table_id_by_name(table_name)
            .ok_or_else(|| Diagnostic::dangling("comment", table_name.clone()))?;
        let table = self
            .diagram
            .tables
            .get_mut(&table_id)
            .ok_or_else(|| Diagnostic::dangling("comment", table_name.clone()))?;

        match target {
            CommentTarget::Table(_) => table.comment = text.clone(),
            CommentTarget::Column { column, .. } => {
                let qualified = format!("{}.{}", table.name, column);
                let field = table
                    .field_by_name_mut(column)
                    .ok_or_else(|| Diagnostic::dangling("comment", qualified))?;
                field.comment = text.clone();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::model::Cardinality;
    use crate::parser::parse_statements;

    fn import(sql: &str, source: Dialect, target: Dialect) -> ImportOutcome {
        let statements = parse_statements(sql, source);
        SchemaImporter::new(source, target).import(&statements).unwrap()
    }

    fn kinds(outcome: &ImportOutcome) -> Vec<DiagnosticKind> {
        outcome.diagnostics.iter().map(Diagnostic::kind).collect()
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let err = SchemaImporter::new(Dialect::MySql, Dialect::MySql)
            .import(&[])
            .unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_nothing_imported_is_rejected() {
        let statements = parse_statements("DROP TABLE users;", Dialect::MySql);
        let err = SchemaImporter::new(Dialect::MySql, Dialect::MySql)
            .import(&statements)
            .unwrap_err();
        match err {
            Error::NothingImported { diagnostics } => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].kind(), DiagnosticKind::UnsupportedStatement);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_tables_keep_source_order() {
        let outcome = import(
            "CREATE TABLE b (id INT); CREATE TABLE a (id INT); CREATE TABLE c (id INT);",
            Dialect::MySql,
            Dialect::MySql,
        );
        let names: Vec<&str> = outcome
            .diagram
            .tables
            .values()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_create_index_after_table() {
        let outcome = import(
            r#"
            CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR(100));
            CREATE UNIQUE INDEX users_email_index ON users (email);
            CREATE INDEX ghosts_name_index ON ghosts (name);
        "#,
            Dialect::Postgres,
            Dialect::Postgres,
        );
        let users = outcome.diagram.table_by_name("users").unwrap();
        assert_eq!(users.indices.len(), 1);
        assert!(users.indices[0].unique);
        assert_eq!(users.indices[0].fields, vec!["email".to_string()]);

        assert_eq!(kinds(&outcome), vec![DiagnosticKind::DanglingReference]);
        assert_eq!(outcome.diagnostics[0].statement(), Some(2));
    }

    #[test]
    fn test_postgres_enum_and_comments() {
        let outcome = import(
            r#"
            CREATE TYPE mood AS ENUM ('happy', 'sad');
            CREATE TABLE people (id INTEGER PRIMARY KEY, feeling mood NOT NULL);
            COMMENT ON TABLE people IS 'everyone';
            COMMENT ON COLUMN people.feeling IS 'right now';
        "#,
            Dialect::Postgres,
            Dialect::Postgres,
        );
        assert_eq!(outcome.diagram.enums.len(), 1);
        let people = outcome.diagram.table_by_name("people").unwrap();
        assert_eq!(people.comment.as_deref(), Some("everyone"));
        let feeling = people.field_by_name("feeling").unwrap();
        assert_eq!(feeling.data_type, "mood");
        assert_eq!(feeling.comment.as_deref(), Some("right now"));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_enum_without_target_support_falls_back() {
        let outcome = import(
            r#"
            CREATE TYPE mood AS ENUM ('happy', 'sad');
            CREATE TABLE people (id INTEGER PRIMARY KEY, feeling mood);
        "#,
            Dialect::Postgres,
            Dialect::Sqlite,
        );
        assert!(outcome.diagram.enums.is_empty());
        let feeling = outcome
            .diagram
            .table_by_name("people")
            .and_then(|t| t.field_by_name("feeling"))
            .unwrap();
        assert_eq!(feeling.data_type, "TEXT");
        assert_eq!(feeling.check.as_deref(), Some("feeling IN ('happy', 'sad')"));
        assert_eq!(
            kinds(&outcome),
            vec![
                DiagnosticKind::UnsupportedStatement,
                DiagnosticKind::UnknownTypeMapping
            ]
        );
    }

    #[test]
    fn test_duplicate_table_is_reported() {
        let outcome = import(
            "CREATE TABLE t (id INT); CREATE TABLE t (other INT);",
            Dialect::MySql,
            Dialect::MySql,
        );
        assert_eq!(outcome.diagram.tables.len(), 1);
        assert_eq!(outcome.diagram.tables[0].fields[0].name, "id");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::DuplicateDefinition]);
    }

    #[test]
    fn test_alter_table_foreign_key_resolves_after_tables() {
        let outcome = import(
            r#"
            ALTER TABLE orders ADD CONSTRAINT fk_orders_user FOREIGN KEY (user_id) REFERENCES users (id);
            CREATE TABLE orders (id INT PRIMARY KEY, user_id INT);
            CREATE TABLE users (id INT PRIMARY KEY);
        "#,
            Dialect::MySql,
            Dialect::MySql,
        );
        assert!(outcome.diagnostics.is_empty());
        let rel = &outcome.diagram.relationships[0];
        assert_eq!(rel.name, "fk_orders_user");
        assert_eq!(rel.cardinality, Cardinality::ManyToOne);
    }
}
