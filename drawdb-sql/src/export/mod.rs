//! Diagram to dialect-specific DDL
//!
//! Output sections, in order: enum and composite type declarations, one
//! `CREATE TABLE` per table (followed by `COMMENT ON` statements where the
//! dialect uses them), `CREATE INDEX` statements, then foreign keys as
//! `ALTER TABLE ... ADD CONSTRAINT`. Dialects that cannot alter constraints
//! get their foreign keys inside `CREATE TABLE` instead.

pub mod naming;
mod table;
mod types;

use serde::Serialize;
use tracing::info;

use self::naming::{foreign_key_name, index_name, sql_string, NameRegistry};
use crate::diagnostic::Diagnostic;
use crate::dialect::{Dialect, DialectDescriptor, EnumSupport, ForeignKeyPlacement};
use crate::model::{Diagram, ReferentialAction, TableId};

/// Generated SQL and what had to be approximated
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub sql: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders diagrams as DDL for one dialect
#[derive(Debug, Clone, Copy)]
pub struct SchemaExporter {
    target: Dialect,
}

impl SchemaExporter {
    pub fn new(target: Dialect) -> Self {
        Self { target }
    }

    /// Render `diagram`. The same diagram always yields the same text.
    pub fn export(&self, diagram: &Diagram) -> ExportOutcome {
        let mut context = ExportContext {
            target: self.target.descriptor(),
            diagram,
            statements: Vec::new(),
            diagnostics: Vec::new(),
            index_names: NameRegistry::new(),
        };

        let foreign_keys = context.foreign_keys();
        context.type_declarations();
        for table in diagram.tables.values() {
            let inline: Vec<&ForeignKey> = foreign_keys
                .iter()
                .filter(|fk| fk.inline && fk.child == table.id)
                .collect();
            context.create_table(table, &inline);
        }
        context.indices();
        for fk in foreign_keys.iter().filter(|fk| !fk.inline) {
            let statement = format!(
                "ALTER TABLE {} ADD {};",
                context.target.quote_identifier(&fk.child_name),
                fk.clause
            );
            context.statements.push(statement);
        }

        info!(
            "Exported {} statements for {} ({} diagnostics)",
            context.statements.len(),
            self.target,
            context.diagnostics.len()
        );

        let mut sql = context.statements.join("\n\n");
        if !sql.is_empty() {
            sql.push('\n');
        }
        ExportOutcome {
            sql,
            diagnostics: context.diagnostics,
        }
    }
}

/// A rendered `CONSTRAINT ... FOREIGN KEY ...` clause
struct ForeignKey {
    child: TableId,
    child_name: String,
    clause: String,
    inline: bool,
}

/// State of one export call
struct ExportContext<'a> {
    target: &'static DialectDescriptor,
    diagram: &'a Diagram,
    statements: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    index_names: NameRegistry,
}

impl ExportContext<'_> {
    fn unsupported(&mut self, feature: String, fallback: &str) {
        self.diagnostics.push(Diagnostic::UnsupportedDialectFeature {
            dialect: self.target.display_name.to_string(),
            feature,
            fallback: fallback.to_string(),
        });
    }

    fn type_declarations(&mut self) {
        let target = self.target;
        let diagram = self.diagram;
        for item in &diagram.enums {
            match target.enums {
                EnumSupport::Native => {
                    let values: Vec<String> = item.values.iter().map(|v| sql_string(v)).collect();
                    self.statements.push(format!(
                        "CREATE TYPE {} AS ENUM ({});",
                        target.quote_identifier(&item.name),
                        values.join(", ")
                    ));
                }
                EnumSupport::Inline => {}
                EnumSupport::None => {
                    let fallback = format!("{} with CHECK constraint", target.enum_fallback.render());
                    self.unsupported(format!("enum `{}`", item.name), &fallback);
                }
            }
        }

        for item in &diagram.types {
            if target.custom_types {
                let attributes: Vec<String> = item
                    .fields
                    .iter()
                    .map(|f| format!("  {} {}", target.quote_identifier(&f.name), f.data_type))
                    .collect();
                self.statements.push(format!(
                    "CREATE TYPE {} AS (\n{}\n);",
                    target.quote_identifier(&item.name),
                    attributes.join(",\n")
                ));
            } else {
                let fallback = target.json_fallback.render();
                self.unsupported(format!("type `{}`", item.name), &fallback);
            }
        }
    }

    fn indices(&mut self) {
        let target = self.target;
        let diagram = self.diagram;
        // Tables without columns are not created
        for table in diagram.tables.values().filter(|t| !t.fields.is_empty()) {
            for index in &table.indices {
                if let Some(missing) = index.fields.iter().find(|f| table.field_by_name(f).is_none())
                {
                    let context = match &index.name {
                        Some(name) => format!("index `{}`", name),
                        None => format!("index on `{}`", table.name),
                    };
                    self.diagnostics.push(Diagnostic::dangling(
                        context,
                        format!("{}.{}", table.name, missing),
                    ));
                    continue;
                }

                let wanted = match &index.name {
                    Some(name) => name.clone(),
                    None => index_name(&table.name, &index.fields),
                };
                let name = self.index_names.claim(&wanted);
                let columns: Vec<String> = index
                    .fields
                    .iter()
                    .map(|f| target.quote_identifier(f))
                    .collect();
                self.statements.push(format!(
                    "CREATE {}INDEX {} ON {} ({});",
                    if index.unique { "UNIQUE " } else { "" },
                    target.quote_identifier(&name),
                    target.quote_identifier(&table.name),
                    columns.join(", ")
                ));
            }
        }
    }

    /// Resolve and name every relationship, in relationship order
    fn foreign_keys(&mut self) -> Vec<ForeignKey> {
        let target = self.target;
        let diagram = self.diagram;
        let inline = target.foreign_keys == ForeignKeyPlacement::Inline;
        let mut names = NameRegistry::new();
        let mut foreign_keys = Vec::with_capacity(diagram.relationships.len());

        for rel in &diagram.relationships {
            let ((child_id, child_field), (parent_id, parent_field)) = rel.child_and_parent();
            let context = format!("relationship `{}`", rel.name);
            let ends = diagram.table(child_id).zip(diagram.table(parent_id));
            let Some((child, parent)) = ends else {
                let missing = if diagram.table(child_id).is_none() { child_id } else { parent_id };
                self.diagnostics
                    .push(Diagnostic::dangling(context, format!("table #{}", missing)));
                continue;
            };
            let fields = child.field(child_field).zip(parent.field(parent_field));
            let Some((child_field, parent_field)) = fields else {
                self.diagnostics.push(Diagnostic::dangling(
                    context,
                    format!("field of `{}` or `{}`", child.name, parent.name),
                ));
                continue;
            };

            let wanted = if rel.name.is_empty() {
                foreign_key_name(&child.name, &child_field.name)
            } else {
                rel.name.clone()
            };
            let name = names.claim(&wanted);

            let mut clause = format!(
                "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                target.quote_identifier(&name),
                target.quote_identifier(&child_field.name),
                target.quote_identifier(&parent.name),
                target.quote_identifier(&parent_field.name)
            );
            for (keyword, action, accepted) in [
                ("ON UPDATE", rel.update_constraint, target.on_update),
                ("ON DELETE", rel.delete_constraint, target.on_delete),
            ] {
                if action == ReferentialAction::NoAction {
                    continue;
                }
                if accepted.contains(&action) {
                    clause.push_str(&format!(" {} {}", keyword, action));
                } else {
                    self.unsupported(format!("{} {} on `{}`", keyword, action, name), "omitted");
                }
            }

            foreign_keys.push(ForeignKey {
                child: child.id,
                child_name: child.name.clone(),
                clause,
                inline,
            });
        }
        foreign_keys
    }
}
