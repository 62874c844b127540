//! `CREATE TABLE` to [`Table`], including column type mapping

use heck::ToSnakeCase;
use tracing::{debug, trace};

use super::{ImportContext, PendingForeignKey};
use crate::diagnostic::Diagnostic;
use crate::dialect::{resolve_type, source_semantics, split_type, EnumSupport, Resolution};
use crate::model::{Enum, Field, Index, Table};
use crate::parser::{ColumnSpec, ColumnType, ConstraintSpec, CreateTableStmt};

const GRID_COLUMNS: usize = 4;
const GRID_SPACING_X: f64 = 280.0;
const GRID_SPACING_Y: f64 = 320.0;

/// Model type of one column
struct MappedType {
    data_type: String,
    size: Option<String>,
    unsigned: bool,
    increment: bool,
    check: Option<String>,
}

impl MappedType {
    fn named(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            size: None,
            unsigned: false,
            increment: false,
            check: None,
        }
    }
}

/// `col IN ('a', 'b')`
fn membership_check(column: &str, values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect();
    format!("{} IN ({})", column, quoted.join(", "))
}

/// Strip quoting and schema qualification from a user-defined type name
fn bare_type_name(declared: &str) -> &str {
    let last = declared.rsplit('.').next().unwrap_or(declared);
    last.trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'))
}

impl ImportContext {
    pub(super) fn add_table(
        &mut self,
        statement: usize,
        create: &CreateTableStmt,
    ) -> Result<(), Diagnostic> {
        if self.diagram.table_by_name(&create.name).is_some() {
            return Err(Diagnostic::DuplicateDefinition {
                statement: None,
                name: create.name.clone(),
            });
        }

        let position = self.diagram.tables.len();
        let mut table = Table::new(0, create.name.clone());
        table.comment = create.comment.clone();
        table.x = (position % GRID_COLUMNS) as f64 * GRID_SPACING_X;
        table.y = (position / GRID_COLUMNS) as f64 * GRID_SPACING_Y;

        for column in &create.columns {
            if table.field_by_name(&column.name).is_some() {
                self.push(
                    statement,
                    Diagnostic::DuplicateDefinition {
                        statement: None,
                        name: format!("{}.{}", create.name, column.name),
                    },
                );
                continue;
            }
            let field = self.column_field(statement, &create.name, table.next_field_id(), column);
            table.fields.push(field);

            if let Some(reference) = &column.references {
                self.pending.push(PendingForeignKey {
                    statement,
                    table: create.name.clone(),
                    spec: reference.clone(),
                });
            }
        }

        for constraint in &create.constraints {
            if let Err(diagnostic) = self.apply_constraint(statement, &mut table, constraint) {
                self.push(statement, diagnostic);
            }
        }

        debug!(
            "Table `{}` with {} fields and {} indices",
            table.name,
            table.fields.len(),
            table.indices.len()
        );
        self.diagram.add_table(table);
        Ok(())
    }

    fn column_field(
        &mut self,
        statement: usize,
        table: &str,
        id: usize,
        column: &ColumnSpec,
    ) -> Field {
        let mapped = match &column.data_type {
            ColumnType::InlineEnum(values) => self.inline_enum(statement, table, column, values),
            ColumnType::Declared(declared) => self.declared_type(statement, table, column, declared),
        };

        let mut field = Field::new(id, column.name.clone(), mapped.data_type);
        field.size = mapped.size;
        field.unsigned = mapped.unsigned;
        field.primary = column.primary;
        field.unique = column.unique;
        field.not_null = column.not_null;
        field.increment = column.increment || mapped.increment;
        field.default = column.default.clone();
        field.comment = column.comment.clone();
        field.check = match (mapped.check, column.check.clone()) {
            (Some(implied), Some(declared)) => Some(format!("({}) AND ({})", implied, declared)),
            (implied, declared) => implied.or(declared),
        };
        field
    }

    /// MySQL `ENUM(...)` on a column: a named enum when the target can hold
    /// one, otherwise a string column limited by a CHECK
    fn inline_enum(
        &mut self,
        statement: usize,
        table: &str,
        column: &ColumnSpec,
        values: &[String],
    ) -> MappedType {
        if self.target.enums != EnumSupport::None {
            let name = format!("{}_{}", table, column.name).to_snake_case();
            if self.diagram.enum_by_name(&name).is_none() {
                self.diagram.enums.push(Enum {
                    name: name.clone(),
                    values: values.to_vec(),
                });
            }
            return MappedType::named(name);
        }
        self.enum_fallback(statement, table, column, "ENUM", values)
    }

    fn enum_fallback(
        &mut self,
        statement: usize,
        table: &str,
        column: &ColumnSpec,
        declared: &str,
        values: &[String],
    ) -> MappedType {
        let fallback = self.target.enum_fallback;
        self.push(
            statement,
            Diagnostic::UnknownTypeMapping {
                statement: None,
                column: format!("{}.{}", table, column.name),
                data_type: declared.to_string(),
                fallback: format!("{} with CHECK constraint", fallback.render()),
            },
        );
        MappedType {
            data_type: fallback.name.to_string(),
            size: fallback.size.map(str::to_string),
            unsigned: false,
            increment: false,
            check: Some(membership_check(&column.name, values)),
        }
    }

    fn declared_type(
        &mut self,
        statement: usize,
        table: &str,
        column: &ColumnSpec,
        declared: &str,
    ) -> MappedType {
        let bare = bare_type_name(declared);
        if let Some(item) = self.diagram.enum_by_name(bare) {
            return MappedType::named(item.name.clone());
        }
        if let Some(item) = self.diagram.type_by_name(bare) {
            return MappedType::named(item.name.clone());
        }
        if let Some(values) = self.dropped_enums.get(bare).cloned() {
            return self.enum_fallback(statement, table, column, bare, &values);
        }
        if self.dropped_types.iter().any(|t| t.eq_ignore_ascii_case(bare)) {
            let fallback = self.target.json_fallback;
            self.push(
                statement,
                Diagnostic::UnknownTypeMapping {
                    statement: None,
                    column: format!("{}.{}", table, column.name),
                    data_type: bare.to_string(),
                    fallback: fallback.render(),
                },
            );
            return MappedType {
                size: fallback.size.map(str::to_string),
                ..MappedType::named(fallback.name)
            };
        }

        let mut parts = split_type(declared);
        if self.source != self.target.dialect {
            parts = source_semantics(self.source, parts);
        }
        let resolved = resolve_type(self.target, &parts.base, parts.size.as_deref());
        trace!(
            "Column `{}.{}`: {} -> {} ({:?})",
            table,
            column.name,
            declared,
            resolved.render(),
            resolved.resolution
        );
        if resolved.resolution == Resolution::Fallback {
            self.push(
                statement,
                Diagnostic::UnknownTypeMapping {
                    statement: None,
                    column: format!("{}.{}", table, column.name),
                    data_type: declared.to_string(),
                    fallback: resolved.render(),
                },
            );
        }

        MappedType {
            data_type: resolved.name,
            size: resolved.size,
            unsigned: parts.unsigned && self.target.unsigned,
            increment: resolved.increment,
            check: None,
        }
    }

    fn apply_constraint(
        &mut self,
        statement: usize,
        table: &mut Table,
        constraint: &ConstraintSpec,
    ) -> Result<(), Diagnostic> {
        match constraint {
            ConstraintSpec::PrimaryKey { columns } => {
                let names = resolve_columns(table, columns, "primary key")?;
                for name in names {
                    if let Some(field) = table.field_by_name_mut(&name) {
                        field.primary = true;
                    }
                }
            }
            ConstraintSpec::Unique { name, columns } => {
                let context = match name {
                    Some(name) => format!("unique constraint `{}`", name),
                    None => "unique constraint".to_string(),
                };
                let names = resolve_columns(table, columns, &context)?;
                if names.len() == 1 {
                    if let Some(field) = table.field_by_name_mut(&names[0]) {
                        field.unique = true;
                    }
                } else {
                    table.indices.push(Index {
                        name: name.clone(),
                        unique: true,
                        fields: names,
                    });
                }
            }
            ConstraintSpec::Index { name, columns } => {
                let context = match name {
                    Some(name) => format!("index `{}`", name),
                    None => "index".to_string(),
                };
                let fields = resolve_columns(table, columns, &context)?;
                table.indices.push(Index {
                    name: name.clone(),
                    unique: false,
                    fields,
                });
            }
            ConstraintSpec::ForeignKey(spec) => {
                self.pending.push(PendingForeignKey {
                    statement,
                    table: table.name.clone(),
                    spec: spec.clone(),
                });
            }
            ConstraintSpec::Check { name, expr } => {
                let mentioned: Vec<String> = table
                    .fields
                    .iter()
                    .filter(|f| mentions_identifier(expr, &f.name))
                    .map(|f| f.name.clone())
                    .collect();
                match mentioned.as_slice() {
                    [only] => {
                        if let Some(field) = table.field_by_name_mut(only) {
                            field.check = Some(match field.check.take() {
                                Some(existing) => format!("({}) AND ({})", existing, expr),
                                None => expr.clone(),
                            });
                        }
                    }
                    _ => {
                        return Err(Diagnostic::UnsupportedStatement {
                            statement: None,
                            kind: match name {
                                Some(name) => format!("CHECK constraint `{}`", name),
                                None => format!("CHECK ({})", expr),
                            },
                        })
                    }
                }
            }
        }
        Ok(())
    }
}

/// Map constraint columns onto the table's field names
fn resolve_columns(
    table: &Table,
    columns: &[String],
    context: &str,
) -> Result<Vec<String>, Diagnostic> {
    columns
        .iter()
        .map(|column| {
            table
                .field_by_name(column)
                .map(|f| f.name.clone())
                .ok_or_else(|| {
                    Diagnostic::dangling(
                        format!("{} of `{}`", context, table.name),
                        format!("{}.{}", table.name, column),
                    )
                })
        })
        .collect()
}

/// Whether `expr` contains `name` as a whole identifier, outside string literals
fn mentions_identifier(expr: &str, name: &str) -> bool {
    let mut word = String::new();
    let mut in_string = false;
    for c in expr.chars().chain(std::iter::once(' ')) {
        if in_string {
            if c == '\'' {
                in_string = false;
            }
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if word.eq_ignore_ascii_case(name) {
            return true;
        }
        word.clear();
        if c == '\'' {
            in_string = true;
        }
    }
    false
}
