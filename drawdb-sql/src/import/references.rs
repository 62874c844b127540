//! Foreign keys to relationships

use tracing::debug;

use super::{ImportContext, PendingForeignKey};
use crate::diagnostic::Diagnostic;
use crate::model::{Cardinality, FieldId, Relationship, TableId};

/// One resolved column pair of a foreign key
struct Link {
    child_field: FieldId,
    child_name: String,
    parent_field: FieldId,
    one_to_one: bool,
}

impl ImportContext {
    /// Turn every deferred foreign key into relationships, in the order the
    /// constraints appeared
    pub(super) fn resolve_foreign_keys(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for foreign_key in pending {
            let statement = foreign_key.statement;
            match self.links(&foreign_key) {
                Ok((child, parent, links)) => {
                    for link in links {
                        let result = self.add_relationship(&foreign_key, child, parent, link);
                        if let Err(diagnostic) = result {
                            self.push(statement, diagnostic);
                        }
                    }
                }
                Err(diagnostic) => self.push(statement, diagnostic),
            }
        }
    }

    fn links(
        &self,
        foreign_key: &PendingForeignKey,
    ) -> Result<(TableId, TableId, Vec<Link>), Diagnostic> {
        let spec = &foreign_key.spec;
        let context = match &spec.name {
            Some(name) => format!("foreign key `{}`", name),
            None => format!("foreign key on `{}`", foreign_key.table),
        };

        let child = self
            .diagram
            .table_by_name(&foreign_key.table)
            .ok_or_else(|| Diagnostic::dangling(context.clone(), foreign_key.table.clone()))?;
        let parent = self
            .diagram
            .table_by_name(&spec.foreign_table)
            .ok_or_else(|| Diagnostic::dangling(context.clone(), spec.foreign_table.clone()))?;

        let referred: Vec<String> = if spec.referred_columns.is_empty() {
            let keys: Vec<String> = parent
                .primary_fields()
                .iter()
                .map(|f| f.name.clone())
                .collect();
            if keys.is_empty() {
                return Err(Diagnostic::dangling(
                    context,
                    format!("primary key of `{}`", parent.name),
                ));
            }
            keys
        } else {
            spec.referred_columns.clone()
        };

        if spec.columns.len() != referred.len() {
            return Err(Diagnostic::malformed(
                "FOREIGN KEY",
                format!(
                    "{} has {} columns but references {}",
                    context,
                    spec.columns.len(),
                    referred.len()
                ),
            ));
        }

        let mut links = Vec::with_capacity(referred.len());
        for (column, referred_column) in spec.columns.iter().zip(&referred) {
            let child_field = child.field_by_name(column).ok_or_else(|| {
                Diagnostic::dangling(context.clone(), format!("{}.{}", child.name, column))
            })?;
            let parent_field = parent.field_by_name(referred_column).ok_or_else(|| {
                Diagnostic::dangling(
                    context.clone(),
                    format!("{}.{}", parent.name, referred_column),
                )
            })?;
            links.push(Link {
                child_field: child_field.id,
                child_name: child_field.name.clone(),
                parent_field: parent_field.id,
                one_to_one: child.is_unique_field(child_field),
            });
        }

        Ok((child.id, parent.id, links))
    }

    fn add_relationship(
        &mut self,
        foreign_key: &PendingForeignKey,
        child: TableId,
        parent: TableId,
        link: Link,
    ) -> Result<(), Diagnostic> {
        let spec = &foreign_key.spec;
        let name = spec
            .name
            .clone()
            .unwrap_or_else(|| format!("fk_{}_{}", foreign_key.table, link.child_name));

        let duplicate = self.diagram.relationships.iter().any(|r| {
            r.child_and_parent() == ((child, link.child_field), (parent, link.parent_field))
        });
        if duplicate {
            return Err(Diagnostic::DuplicateDefinition {
                statement: None,
                name,
            });
        }

        let cardinality = if link.one_to_one {
            Cardinality::OneToOne
        } else {
            Cardinality::ManyToOne
        };
        debug!("Relationship `{}` ({:?})", name, cardinality);

        let id = self.diagram.next_relationship_id();
        self.diagram.relationships.push(Relationship {
            id,
            name,
            start_table_id: child,
            start_field_id: link.child_field,
            end_table_id: parent,
            end_field_id: link.parent_field,
            cardinality,
            update_constraint: spec.on_update.unwrap_or_default(),
            delete_constraint: spec.on_delete.unwrap_or_default(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostic::DiagnosticKind;
    use crate::dialect::Dialect;
    use crate::import::{ImportOutcome, SchemaImporter};
    use crate::model::{Cardinality, ReferentialAction};
    use crate::parser::parse_statements;

    fn import(sql: &str, dialect: Dialect) -> ImportOutcome {
        let statements = parse_statements(sql, dialect);
        SchemaImporter::new(dialect, dialect).import(&statements).unwrap()
    }

    #[test]
    fn test_foreign_key_defaults() {
        let outcome = import(
            r#"
            CREATE TABLE users (id INT PRIMARY KEY);
            CREATE TABLE posts (
                id INT PRIMARY KEY,
                author_id INT NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users (id) ON DELETE CASCADE
            );
        "#,
            Dialect::MySql,
        );
        let rel = &outcome.diagram.relationships[0];
        assert_eq!(rel.name, "fk_posts_author_id");
        assert_eq!(rel.start_table_id, 1);
        assert_eq!(rel.start_field_id, 1);
        assert_eq!(rel.end_table_id, 0);
        assert_eq!(rel.end_field_id, 0);
        assert_eq!(rel.cardinality, Cardinality::ManyToOne);
        assert_eq!(rel.delete_constraint, ReferentialAction::Cascade);
        assert_eq!(rel.update_constraint, ReferentialAction::NoAction);
    }

    #[test]
    fn test_unique_child_column_is_one_to_one() {
        let outcome = import(
            r#"
            CREATE TABLE users (id INTEGER PRIMARY KEY);
            CREATE TABLE profiles (
                id INTEGER PRIMARY KEY,
                user_id INTEGER UNIQUE REFERENCES users (id)
            );
            CREATE TABLE sessions (
                user_id INTEGER PRIMARY KEY REFERENCES users (id)
            );
        "#,
            Dialect::Postgres,
        );
        let cardinalities: Vec<Cardinality> = outcome
            .diagram
            .relationships
            .iter()
            .map(|r| r.cardinality)
            .collect();
        assert_eq!(cardinalities, vec![Cardinality::OneToOne, Cardinality::OneToOne]);
    }

    #[test]
    fn test_unique_index_created_later_counts() {
        let outcome = import(
            r#"
            CREATE TABLE users (id INTEGER PRIMARY KEY);
            CREATE TABLE avatars (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES users (id));
            CREATE UNIQUE INDEX avatars_user_id_index ON avatars (user_id);
        "#,
            Dialect::Postgres,
        );
        assert_eq!(
            outcome.diagram.relationships[0].cardinality,
            Cardinality::OneToOne
        );
    }

    #[test]
    fn test_references_without_columns_target_primary_key() {
        let outcome = import(
            r#"
            CREATE TABLE users (uid INTEGER PRIMARY KEY, name TEXT);
            CREATE TABLE posts (author INTEGER REFERENCES users);
        "#,
            Dialect::Postgres,
        );
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.diagram.relationships[0].end_field_id, 0);
    }

    #[test]
    fn test_dangling_foreign_key_is_skipped() {
        let outcome = import(
            r#"
            CREATE TABLE users (id INT PRIMARY KEY);
            CREATE TABLE posts (
                id INT PRIMARY KEY,
                user_id INT,
                group_id INT,
                FOREIGN KEY (user_id) REFERENCES users (id),
                FOREIGN KEY (group_id) REFERENCES groups (id)
            );
        "#,
            Dialect::MySql,
        );
        assert_eq!(outcome.diagram.relationships.len(), 1);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            outcome.diagnostics[0].kind(),
            DiagnosticKind::DanglingReference
        );
        assert_eq!(outcome.diagnostics[0].statement(), Some(1));
    }

    #[test]
    fn test_column_count_mismatch_is_malformed() {
        let outcome = import(
            r#"
            CREATE TABLE a (x INT, y INT, PRIMARY KEY (x, y));
            CREATE TABLE b (x INT, FOREIGN KEY (x) REFERENCES a);
        "#,
            Dialect::Sqlite,
        );
        assert!(outcome.diagram.relationships.is_empty());
        assert_eq!(outcome.diagnostics[0].kind(), DiagnosticKind::MalformedAst);
    }

    #[test]
    fn test_composite_foreign_key_yields_one_relationship_per_pair() {
        let outcome = import(
            r#"
            CREATE TABLE a (x INT, y INT, PRIMARY KEY (x, y));
            CREATE TABLE b (ax INT, ay INT, FOREIGN KEY (ax, ay) REFERENCES a (x, y));
        "#,
            Dialect::Sqlite,
        );
        let names: Vec<&str> = outcome
            .diagram
            .relationships
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["fk_b_ax", "fk_b_ay"]);
    }
}
