//! sqlparser AST to [`DdlStatement`] adapter

use heck::ToShoutySnakeCase;
use serde_json::Value;
use sqlparser::ast::{
    ColumnDef, ColumnOption, ColumnOptionDef, CreateIndex, CreateTable, DataType, EnumMember,
    Expr, ForeignKeyConstraint, IndexColumn, IndexConstraint, ObjectName, PrimaryKeyConstraint,
    ReferentialAction as SqlAction, Statement, TableConstraint, UniqueConstraint,
};
use tracing::trace;

use super::loose::{
    find_string, ident, idents, object_name, to_json, typed, variant, variant_name,
};
use super::statement::*;
use crate::model::ReferentialAction;

/// Option texts that mark an auto-increment column across dialects
const INCREMENT_MARKERS: &[&str] = &["AUTO_INCREMENT", "AUTOINCREMENT", "IDENTITY"];

/// Keys under which sqlparser stores a table comment
const TABLE_COMMENT_KEYS: &[&str] = &["WithEq", "WithoutEq", "AfterColumnDefsWithoutEq"];

/// Normalize one parsed statement
pub fn normalize(statement: &Statement) -> DdlStatement {
    match statement {
        Statement::CreateTable(create) => create_table(create),
        Statement::CreateIndex(create) => create_index(create),
        Statement::AlterTable { .. } => alter_table(statement),
        Statement::CreateType { .. } => create_type(statement),
        Statement::Comment { .. } => comment_on(statement),
        other => DdlStatement::Unsupported {
            kind: statement_kind(other),
        },
    }
}

fn malformed(kind: &str, reason: impl Into<String>) -> DdlStatement {
    DdlStatement::Malformed {
        kind: kind.to_string(),
        reason: reason.into(),
    }
}

fn create_table(create: &CreateTable) -> DdlStatement {
    const KIND: &str = "CREATE TABLE";

    let name = last_name_part(&create.name);
    if name.is_empty() {
        return malformed(KIND, "missing table name");
    }
    if create.columns.is_empty() {
        return malformed(KIND, format!("table `{}` has no column definitions", name));
    }

    let mut columns = Vec::with_capacity(create.columns.len());
    for col_def in &create.columns {
        match column_spec(col_def) {
            Ok(column) => columns.push(column),
            Err(reason) => return malformed(KIND, format!("table `{}`: {}", name, reason)),
        }
    }

    let mut constraints = Vec::new();
    for constraint in &create.constraints {
        match constraint_spec(constraint) {
            Some(spec) => constraints.push(spec),
            None => trace!("Ignoring constraint `{}` on `{}`", constraint, name),
        }
    }

    let comment =
        to_json(create).and_then(|json| find_string(&json, TABLE_COMMENT_KEYS, &["columns"]));

    DdlStatement::CreateTable(CreateTableStmt {
        name,
        columns,
        constraints,
        comment,
    })
}

fn column_spec(col_def: &ColumnDef) -> Result<ColumnSpec, String> {
    let name = col_def.name.value.clone();
    if name.is_empty() {
        return Err("column without a name".to_string());
    }

    let data_type = match extract_enum_values(&col_def.data_type) {
        Some(values) => ColumnType::InlineEnum(values),
        None => ColumnType::Declared(col_def.data_type.to_string()),
    };
    let mut column = ColumnSpec::new(name, data_type);

    for option in &col_def.options {
        match &option.option {
            ColumnOption::NotNull => column.not_null = true,
            ColumnOption::Null => column.not_null = false,
            ColumnOption::Default(expr) => column.default = Some(expr.to_string()),
            ColumnOption::PrimaryKey(_) => column.primary = true,
            ColumnOption::Unique(_) => column.unique = true,
            ColumnOption::Comment(text) => column.comment = Some(text.clone()),
            ColumnOption::ForeignKey { .. } => {
                column.references = Some(inline_reference(&column.name, option)?);
            }
            ColumnOption::Check { .. } => {
                column.check = Some(check_body(&option.option.to_string()));
            }
            other => {
                let text = other.to_string().to_uppercase();
                if INCREMENT_MARKERS.iter().any(|marker| text.contains(marker)) {
                    column.increment = true;
                } else {
                    trace!("Ignoring column option `{}` on `{}`", other, column.name);
                }
            }
        }
    }

    Ok(column)
}

/// `col INT [CONSTRAINT name] REFERENCES parent (id) ...`
fn inline_reference(column: &str, option: &ColumnOptionDef) -> Result<ForeignKeySpec, String> {
    let json = to_json(&option.option);
    let payload = json.as_ref().and_then(|json| variant(json, "ForeignKey"));
    let foreign_table = payload
        .and_then(|p| object_name(p.get("foreign_table")))
        .ok_or_else(|| format!("column `{}` references no table", column))?;

    let name = option
        .name
        .as_ref()
        .map(|ident| ident.value.clone())
        .or_else(|| payload.and_then(|p| ident(p.get("name"))));

    Ok(ForeignKeySpec {
        name,
        columns: vec![column.to_string()],
        foreign_table,
        referred_columns: idents(payload.and_then(|p| p.get("referred_columns"))),
        on_update: referential_action(payload.and_then(|p| p.get("on_update"))),
        on_delete: referential_action(payload.and_then(|p| p.get("on_delete"))),
    })
}

/// Normalize a table-level constraint; `None` for kinds a diagram cannot hold
fn constraint_spec(constraint: &TableConstraint) -> Option<ConstraintSpec> {
    match constraint {
        TableConstraint::PrimaryKey(PrimaryKeyConstraint { columns, .. }) => {
            Some(ConstraintSpec::PrimaryKey {
                columns: columns.iter().map(index_column_name).collect(),
            })
        }
        TableConstraint::Unique(UniqueConstraint { columns, name, .. }) => {
            // MySQL `UNIQUE KEY idx (col)` names the index, not the constraint
            let index_name = || {
                to_json(constraint)
                    .as_ref()
                    .and_then(|json| variant(json, "Unique"))
                    .and_then(|p| ident(p.get("index_name")))
            };
            Some(ConstraintSpec::Unique {
                name: name.as_ref().map(|ident| ident.value.clone()).or_else(index_name),
                columns: columns.iter().map(index_column_name).collect(),
            })
        }
        TableConstraint::Index(IndexConstraint { columns, name, .. }) => {
            Some(ConstraintSpec::Index {
                name: name.as_ref().map(|ident| ident.value.clone()),
                columns: columns.iter().map(index_column_name).collect(),
            })
        }
        TableConstraint::ForeignKey(ForeignKeyConstraint {
            columns,
            foreign_table,
            referred_columns,
            ..
        }) => {
            let json = to_json(constraint);
            let payload = json.as_ref().and_then(|json| variant(json, "ForeignKey"));
            Some(ConstraintSpec::ForeignKey(ForeignKeySpec {
                name: payload.and_then(|p| ident(p.get("name"))),
                columns: columns.iter().map(|ident| ident.value.clone()).collect(),
                foreign_table: last_name_part(foreign_table),
                referred_columns: referred_columns
                    .iter()
                    .map(|ident| ident.value.clone())
                    .collect(),
                on_update: referential_action(payload.and_then(|p| p.get("on_update"))),
                on_delete: referential_action(payload.and_then(|p| p.get("on_delete"))),
            }))
        }
        TableConstraint::Check { .. } => {
            let json = to_json(constraint);
            Some(ConstraintSpec::Check {
                name: json
                    .as_ref()
                    .and_then(|json| variant(json, "Check"))
                    .and_then(|p| ident(p.get("name"))),
                expr: check_body(&constraint.to_string()),
            })
        }
        _ => None,
    }
}

/// Foreign key stored in the serde form of an `ADD CONSTRAINT` operation
fn foreign_key_from_json(constraint: &Value) -> Option<ForeignKeySpec> {
    let payload = variant(constraint, "ForeignKey")?;
    Some(ForeignKeySpec {
        name: ident(payload.get("name")),
        columns: idents(payload.get("columns")),
        foreign_table: object_name(payload.get("foreign_table"))?,
        referred_columns: idents(payload.get("referred_columns")),
        on_update: referential_action(payload.get("on_update")),
        on_delete: referential_action(payload.get("on_delete")),
    })
}

fn referential_action(value: Option<&Value>) -> Option<ReferentialAction> {
    typed::<SqlAction>(value).and_then(|action| action.to_string().parse().ok())
}

fn alter_table(statement: &Statement) -> DdlStatement {
    const KIND: &str = "ALTER TABLE";

    let Some(json) = to_json(statement) else {
        return malformed(KIND, "statement could not be inspected");
    };
    let Some(payload) = variant(&json, "AlterTable") else {
        return malformed(KIND, "unexpected statement shape");
    };
    let Some(table) = object_name(payload.get("name")) else {
        return malformed(KIND, "missing table name");
    };

    let mut foreign_keys = Vec::new();
    let operations = payload
        .get("operations")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for operation in operations {
        let Some(added) = variant(operation, "AddConstraint") else {
            trace!(
                "Ignoring ALTER TABLE `{}` operation {:?}",
                table,
                variant_name(operation)
            );
            continue;
        };
        // Newer releases wrap the constraint as `{ constraint, not_valid }`
        let constraint = added.get("constraint").unwrap_or(added);
        if let Some(foreign_key) = foreign_key_from_json(constraint) {
            foreign_keys.push(foreign_key);
        }
    }

    if foreign_keys.is_empty() {
        return DdlStatement::Unsupported {
            kind: KIND.to_string(),
        };
    }
    DdlStatement::AddForeignKey {
        table,
        foreign_keys,
    }
}

fn create_index(create: &CreateIndex) -> DdlStatement {
    const KIND: &str = "CREATE INDEX";

    let table = last_name_part(&create.table_name);
    if table.is_empty() {
        return malformed(KIND, "missing table name");
    }
    let columns: Vec<String> = create.columns.iter().map(index_column_name).collect();
    if columns.is_empty() {
        return malformed(KIND, format!("index on `{}` has no columns", table));
    }

    DdlStatement::CreateIndex(CreateIndexStmt {
        name: create.name.as_ref().map(last_name_part),
        table,
        columns,
        unique: create.unique,
    })
}

fn create_type(statement: &Statement) -> DdlStatement {
    const KIND: &str = "CREATE TYPE";

    let json = to_json(statement);
    let Some(payload) = json.as_ref().and_then(|json| variant(json, "CreateType")) else {
        return malformed(KIND, "unexpected statement shape");
    };
    let Some(name) = object_name(payload.get("name")) else {
        return malformed(KIND, "missing type name");
    };
    let representation = payload.get("representation").unwrap_or(&Value::Null);

    if let Some(labels) = variant(representation, "Enum") {
        return DdlStatement::CreateEnum {
            name,
            values: idents(labels.get("labels")),
        };
    }

    if let Some(composite) = variant(representation, "Composite") {
        let attributes = composite
            .get("attributes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut fields = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let field_name = ident(attribute.get("name"));
            let data_type = typed::<DataType>(attribute.get("data_type"));
            match (field_name, data_type) {
                (Some(field_name), Some(data_type)) => {
                    fields.push((field_name, data_type.to_string()))
                }
                _ => return malformed(KIND, format!("attribute of `{}` is incomplete", name)),
            }
        }
        return DdlStatement::CreateCompositeType { name, fields };
    }

    DdlStatement::Unsupported {
        kind: KIND.to_string(),
    }
}

fn comment_on(statement: &Statement) -> DdlStatement {
    const KIND: &str = "COMMENT ON";

    let json = to_json(statement);
    let Some(payload) = json.as_ref().and_then(|json| variant(json, "Comment")) else {
        return malformed(KIND, "unexpected statement shape");
    };
    let Some(object) = typed::<ObjectName>(payload.get("object_name")) else {
        return malformed(KIND, "missing object name");
    };
    let parts: Vec<String> = object
        .0
        .iter()
        .filter_map(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .collect();
    let text = payload
        .get("comment")
        .and_then(Value::as_str)
        .map(str::to_string);

    let target = match (payload.get("object_type").and_then(variant_name), parts.as_slice()) {
        (Some("Table"), [.., table]) => CommentTarget::Table(table.clone()),
        (Some("Column"), [.., table, column]) => CommentTarget::Column {
            table: table.clone(),
            column: column.clone(),
        },
        (Some("Column"), _) => return malformed(KIND, "column comment without a table"),
        _ => {
            return DdlStatement::Unsupported {
                kind: KIND.to_string(),
            }
        }
    };
    DdlStatement::Comment { target, text }
}

/// Upper-case label of a statement's kind, e.g. `CREATE VIEW`
fn statement_kind(statement: &Statement) -> String {
    to_json(statement)
        .as_ref()
        .and_then(variant_name)
        .map(|name| name.to_shouty_snake_case().replace('_', " "))
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Body of a `[CONSTRAINT name] CHECK (expr)` clause without the outer parentheses
fn check_body(clause: &str) -> String {
    let upper = clause.to_ascii_uppercase();
    let keyword = upper.match_indices("CHECK").map(|(at, _)| at).find(|&at| {
        let before = upper[..at].chars().next_back();
        let after = upper[at + "CHECK".len()..].chars().next();
        before.map_or(true, char::is_whitespace)
            && after.map_or(true, |c| c.is_whitespace() || c == '(')
    });
    let body = match keyword {
        Some(at) => clause[at + "CHECK".len()..].trim(),
        None => clause.trim(),
    };
    strip_outer_parens(body).to_string()
}

fn strip_outer_parens(text: &str) -> &str {
    if !(text.starts_with('(') && text.ends_with(')')) {
        return text;
    }
    let mut depth = 0usize;
    for (at, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && at + 1 < text.len() {
                    // first group closes early, as in `(a) OR (b)`
                    return text;
                }
            }
            _ => {}
        }
    }
    text[1..text.len() - 1].trim()
}

/// Enum values of a MySQL `ENUM(...)` column
fn extract_enum_values(data_type: &DataType) -> Option<Vec<String>> {
    match data_type {
        DataType::Enum(members, _) => Some(
            members
                .iter()
                .map(|m| match m {
                    EnumMember::Name(s) => s.clone(),
                    EnumMember::NamedValue(s, _) => s.clone(),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Unqualified name: `shop.users` becomes `users`
pub(super) fn last_name_part(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

fn index_column_name(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => other.to_string(),
    }
}
