//! Field types rendered for the target dialect

use tracing::trace;

use super::naming::sql_string;
use super::ExportContext;
use crate::diagnostic::Diagnostic;
use crate::dialect::{resolve_type, EnumSupport, Resolution, TypeCategory};
use crate::model::{Field, Table};

/// SQL type of a column and what it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ColumnType {
    pub sql: String,
    /// CHECK standing in for an enum the dialect cannot declare
    pub check: Option<String>,
    /// The type itself implies auto-increment
    pub increment: bool,
    pub can_increment: bool,
    pub numeric: bool,
}

impl ColumnType {
    fn plain(sql: String) -> Self {
        Self {
            sql,
            check: None,
            increment: false,
            can_increment: false,
            numeric: false,
        }
    }
}

impl ExportContext<'_> {
    pub(super) fn column_type(&mut self, table: &Table, field: &Field) -> ColumnType {
        let target = self.target;

        if let Some(item) = self.diagram.enum_by_name(&field.data_type) {
            return match target.enums {
                EnumSupport::Native => ColumnType::plain(target.quote_identifier(&item.name)),
                EnumSupport::Inline => {
                    let values: Vec<String> = item.values.iter().map(|v| sql_string(v)).collect();
                    ColumnType::plain(format!("ENUM({})", values.join(", ")))
                }
                EnumSupport::None => {
                    let values: Vec<String> = item.values.iter().map(|v| sql_string(v)).collect();
                    ColumnType {
                        check: Some(format!(
                            "{} IN ({})",
                            target.quote_identifier(&field.name),
                            values.join(", ")
                        )),
                        ..ColumnType::plain(target.enum_fallback.render())
                    }
                }
            };
        }

        if let Some(item) = self.diagram.type_by_name(&field.data_type) {
            return if target.custom_types {
                ColumnType::plain(target.quote_identifier(&item.name))
            } else {
                ColumnType::plain(target.json_fallback.render())
            };
        }

        let resolved = resolve_type(target, &field.data_type, field.size.as_deref());
        trace!(
            "Field `{}.{}`: {} -> {} ({:?})",
            table.name,
            field.name,
            field.type_display(),
            resolved.render(),
            resolved.resolution
        );
        if resolved.resolution == Resolution::Fallback {
            self.diagnostics.push(Diagnostic::UnknownTypeMapping {
                statement: None,
                column: format!("{}.{}", table.name, field.name),
                data_type: field.type_display(),
                fallback: resolved.render(),
            });
        }

        let spec = target.type_spec(&resolved.name);
        ColumnType {
            sql: resolved.render(),
            check: None,
            increment: resolved.increment,
            can_increment: spec.map_or(false, |s| s.can_increment),
            numeric: spec.map_or(false, |s| s.category == TypeCategory::Numeric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::export::naming::NameRegistry;
    use crate::model::{Diagram, Enum, Field, Table};

    fn render(diagram: &Diagram, target: Dialect, field: Field) -> (ColumnType, Vec<Diagnostic>) {
        let mut context = ExportContext {
            target: target.descriptor(),
            diagram,
            statements: Vec::new(),
            diagnostics: Vec::new(),
            index_names: NameRegistry::new(),
        };
        let table = Table::new(0, "t");
        let rendered = context.column_type(&table, &field);
        (rendered, context.diagnostics)
    }

    fn with_enum(dialect: Dialect) -> Diagram {
        let mut diagram = Diagram::new(dialect);
        diagram.enums.push(Enum {
            name: "mood".into(),
            values: vec!["happy".into(), "it's fine".into()],
        });
        diagram
    }

    #[test]
    fn test_enum_per_dialect() {
        let field = Field::new(0, "feeling", "mood");

        let (rendered, _) = render(&with_enum(Dialect::Postgres), Dialect::Postgres, field.clone());
        assert_eq!(rendered.sql, "mood");

        let (rendered, _) = render(&with_enum(Dialect::MySql), Dialect::MySql, field.clone());
        assert_eq!(rendered.sql, "ENUM('happy', 'it''s fine')");

        let (rendered, _) = render(&with_enum(Dialect::Sqlite), Dialect::Sqlite, field);
        assert_eq!(rendered.sql, "TEXT");
        assert_eq!(
            rendered.check.as_deref(),
            Some("feeling IN ('happy', 'it''s fine')")
        );
    }

    #[test]
    fn test_sizes_and_fallbacks() {
        let diagram = Diagram::new(Dialect::MySql);

        let (rendered, diagnostics) = render(
            &diagram,
            Dialect::MySql,
            Field::new(0, "price", "DECIMAL").with_size("10,2"),
        );
        assert_eq!(rendered.sql, "DECIMAL(10,2)");
        assert!(rendered.numeric);
        assert!(diagnostics.is_empty());

        let (rendered, diagnostics) =
            render(&diagram, Dialect::Oracle, Field::new(0, "geo", "GEOMETRY"));
        assert_eq!(rendered.sql, "CLOB");
        assert_eq!(diagnostics.len(), 1);

        let (rendered, _) = render(&diagram, Dialect::Sqlite, Field::new(0, "id", "BIGINT"));
        assert_eq!(rendered.sql, "INTEGER");
        assert!(rendered.can_increment);
    }
}
