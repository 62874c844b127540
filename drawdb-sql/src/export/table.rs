//! `CREATE TABLE` rendering

use tracing::debug;

use super::naming::sql_string;
use super::types::ColumnType;
use super::{ExportContext, ForeignKey};
use crate::dialect::{ClauseOrder, CommentStyle, IncrementStyle};
use crate::model::{Field, Table};

/// One line of a `CREATE TABLE` body
struct Line {
    definition: String,
    comment: Option<String>,
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ExportContext<'_> {
    pub(super) fn create_table(&mut self, table: &Table, foreign_keys: &[&ForeignKey]) {
        let target = self.target;
        if table.fields.is_empty() {
            self.unsupported(format!("table `{}` without columns", table.name), "omitted");
            return;
        }
        let primary: Vec<&Field> = table.primary_fields();
        let sole_primary = primary.len() == 1;
        debug!("Rendering table `{}`", table.name);

        let mut lines = Vec::with_capacity(table.fields.len() + foreign_keys.len() + 1);
        for field in &table.fields {
            let definition = self.column_definition(table, field, sole_primary);
            let comment = match (&field.comment, target.comments) {
                (Some(text), CommentStyle::LineComment) => {
                    self.unsupported(
                        format!("column comment on `{}.{}`", table.name, field.name),
                        "SQL line comment",
                    );
                    Some(single_line(text))
                }
                _ => None,
            };
            lines.push(Line { definition, comment });
        }
        if primary.len() > 1 {
            let columns: Vec<String> = primary
                .iter()
                .map(|f| target.quote_identifier(&f.name))
                .collect();
            lines.push(Line {
                definition: format!("PRIMARY KEY ({})", columns.join(", ")),
                comment: None,
            });
        }
        for fk in foreign_keys {
            lines.push(Line {
                definition: fk.clause.clone(),
                comment: None,
            });
        }

        let last = lines.len().saturating_sub(1);
        let body: Vec<String> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let separator = if i < last { "," } else { "" };
                match line.comment {
                    Some(comment) => format!("  {}{} -- {}", line.definition, separator, comment),
                    None => format!("  {}{}", line.definition, separator),
                }
            })
            .collect();

        let name = target.quote_identifier(&table.name);
        let mut statement = String::new();
        if let (Some(text), CommentStyle::LineComment) = (&table.comment, target.comments) {
            self.unsupported(
                format!("table comment on `{}`", table.name),
                "SQL line comment",
            );
            statement.push_str(&format!("-- {}\n", single_line(text)));
        }
        statement.push_str(&format!("CREATE TABLE {} (\n{}\n)", name, body.join("\n")));
        if let (Some(text), CommentStyle::Inline) = (&table.comment, target.comments) {
            statement.push_str(&format!(" COMMENT={}", sql_string(text)));
        }
        statement.push(';');
        self.statements.push(statement);

        if target.comments == CommentStyle::CommentOn {
            if let Some(text) = &table.comment {
                self.statements.push(format!(
                    "COMMENT ON TABLE {} IS {};",
                    name,
                    sql_string(text)
                ));
            }
            for field in &table.fields {
                if let Some(text) = &field.comment {
                    self.statements.push(format!(
                        "COMMENT ON COLUMN {}.{} IS {};",
                        name,
                        target.quote_identifier(&field.name),
                        sql_string(text)
                    ));
                }
            }
        }
    }

    fn column_definition(&mut self, table: &Table, field: &Field, sole_primary: bool) -> String {
        let target = self.target;
        let column_type = self.column_type(table, field);

        let mut data_type = column_type.sql.clone();
        if field.unsigned {
            if target.unsigned && column_type.numeric {
                data_type.push_str(" UNSIGNED");
            } else if !target.unsigned {
                self.unsupported(
                    format!("UNSIGNED on `{}.{}`", table.name, field.name),
                    "signed type",
                );
            }
        }

        let inline_primary = field.primary && sole_primary;
        let increment = self.increment_clause(table, field, &column_type, inline_primary);
        let primary = match &increment {
            Some(clause) if clause.starts_with("PRIMARY KEY") => None,
            _ if inline_primary => Some("PRIMARY KEY".to_string()),
            _ => None,
        };
        let not_null = field.not_null.then(|| "NOT NULL".to_string());
        let unique = field.unique.then(|| "UNIQUE".to_string());
        let default = field.default.as_ref().map(|d| format!("DEFAULT {}", d));
        let check = match (&column_type.check, &field.check) {
            (Some(implied), Some(own)) => Some(format!("CHECK (({}) AND ({}))", implied, own)),
            (Some(expr), None) | (None, Some(expr)) => Some(format!("CHECK ({})", expr)),
            (None, None) => None,
        };
        let comment = match (&field.comment, target.comments) {
            (Some(text), CommentStyle::Inline) => Some(format!("COMMENT {}", sql_string(text))),
            _ => None,
        };

        let clauses = match target.clause_order {
            ClauseOrder::Standard => [not_null, unique, default, increment, primary, check, comment],
            ClauseOrder::DefaultFirst => {
                [default, increment, not_null, unique, primary, check, comment]
            }
        };

        let mut definition = format!("{} {}", target.quote_identifier(&field.name), data_type);
        for clause in clauses.into_iter().flatten() {
            definition.push(' ');
            definition.push_str(&clause);
        }
        definition
    }

    fn increment_clause(
        &mut self,
        table: &Table,
        field: &Field,
        column_type: &ColumnType,
        inline_primary: bool,
    ) -> Option<String> {
        if !(field.increment || column_type.increment) {
            return None;
        }
        let target = self.target;
        let column = format!("`{}.{}`", table.name, field.name);

        if !column_type.can_increment {
            self.unsupported(
                format!("auto-increment on {} of type {}", column, column_type.sql),
                "omitted",
            );
            return None;
        }
        if target.increment == IncrementStyle::Autoincrement {
            if inline_primary && column_type.sql == "INTEGER" {
                return Some(format!("PRIMARY KEY {}", target.increment.keyword()));
            }
            self.unsupported(
                format!("auto-increment on {} outside a sole INTEGER primary key", column),
                "omitted",
            );
            return None;
        }
        Some(target.increment.keyword().to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostic::DiagnosticKind;
    use crate::dialect::Dialect;
    use crate::export::SchemaExporter;
    use crate::model::{Diagram, Field, Index, Table};

    fn single(table: Table) -> Diagram {
        let mut diagram = Diagram::new(Dialect::MySql);
        diagram.add_table(table);
        diagram
    }

    #[test]
    fn test_composite_primary_key_is_a_table_clause() {
        let mut table = Table::new(0, "memberships");
        table.fields = vec![
            Field::new(0, "user_id", "INT").primary().not_null(),
            Field::new(1, "group_id", "INT").primary().not_null(),
        ];
        let outcome = SchemaExporter::new(Dialect::Postgres).export(&single(table));
        assert_eq!(
            outcome.sql,
            "CREATE TABLE memberships (\n  user_id INTEGER NOT NULL,\n  group_id INTEGER NOT NULL,\n  PRIMARY KEY (user_id, group_id)\n);\n"
        );
    }

    #[test]
    fn test_reserved_and_odd_names_are_quoted() {
        let mut table = Table::new(0, "order");
        table.fields = vec![
            Field::new(0, "key", "INT").primary(),
            Field::new(1, "first name", "TEXT"),
        ];
        let mysql = SchemaExporter::new(Dialect::MySql).export(&single(table.clone()));
        assert!(mysql.sql.starts_with("CREATE TABLE `order` (\n  `key` INT PRIMARY KEY,\n  `first name` TEXT\n);"));

        let mssql = SchemaExporter::new(Dialect::MsSql).export(&single(table));
        assert!(mssql.sql.starts_with("CREATE TABLE [order] (\n  [key] INT PRIMARY KEY,"));
    }

    #[test]
    fn test_comments_per_dialect() {
        let mut table = Table::new(0, "notes");
        table.comment = Some("User notes".into());
        let mut body = Field::new(0, "body", "TEXT");
        body.comment = Some("it's markdown".into());
        table.fields = vec![body];

        let mysql = SchemaExporter::new(Dialect::MySql).export(&single(table.clone()));
        assert_eq!(
            mysql.sql,
            "CREATE TABLE notes (\n  body TEXT COMMENT 'it''s markdown'\n) COMMENT='User notes';\n"
        );

        let postgres = SchemaExporter::new(Dialect::Postgres).export(&single(table.clone()));
        assert_eq!(
            postgres.sql,
            "CREATE TABLE notes (\n  body TEXT\n);\n\nCOMMENT ON TABLE notes IS 'User notes';\n\nCOMMENT ON COLUMN notes.body IS 'it''s markdown';\n"
        );

        let sqlite = SchemaExporter::new(Dialect::Sqlite).export(&single(table));
        assert_eq!(
            sqlite.sql,
            "-- User notes\nCREATE TABLE notes (\n  body TEXT -- it's markdown\n);\n"
        );
        assert_eq!(sqlite.diagnostics.len(), 2);
    }

    #[test]
    fn test_oracle_puts_default_before_not_null() {
        let mut table = Table::new(0, "flags");
        table.fields = vec![Field::new(0, "active", "BOOLEAN").not_null().with_default("1")];
        let outcome = SchemaExporter::new(Dialect::Oracle).export(&single(table));
        assert!(outcome.sql.contains("active NUMBER(1) DEFAULT 1 NOT NULL"));
    }

    #[test]
    fn test_unsupported_increment_is_reported() {
        let mut table = Table::new(0, "events");
        table.fields = vec![
            Field::new(0, "id", "INT").primary(),
            Field::new(1, "seq", "INT").increment(),
        ];
        let outcome = SchemaExporter::new(Dialect::Sqlite).export(&single(table));
        assert!(outcome.sql.contains("  seq INTEGER\n"));
        assert_eq!(
            outcome.diagnostics[0].kind(),
            DiagnosticKind::UnsupportedDialectFeature
        );
    }

    #[test]
    fn test_unsigned_only_where_supported() {
        let mut table = Table::new(0, "counters");
        let mut hits = Field::new(0, "hits", "BIGINT");
        hits.unsigned = true;
        table.fields = vec![hits];

        let mysql = SchemaExporter::new(Dialect::MySql).export(&single(table.clone()));
        assert!(mysql.sql.contains("hits BIGINT UNSIGNED"));

        let postgres = SchemaExporter::new(Dialect::Postgres).export(&single(table));
        assert!(postgres.sql.contains("hits BIGINT\n"));
        assert_eq!(postgres.diagnostics.len(), 1);
    }

    #[test]
    fn test_table_without_columns_is_skipped() {
        let mut empty = Table::new(0, "empty");
        empty.indices.push(Index {
            name: None,
            unique: false,
            fields: Vec::new(),
        });
        let mut diagram = single(empty);
        let mut kept = Table::new(0, "kept");
        kept.fields = vec![Field::new(0, "id", "INT")];
        diagram.add_table(kept);

        let outcome = SchemaExporter::new(Dialect::Postgres).export(&diagram);
        assert_eq!(outcome.sql, "CREATE TABLE kept (\n  id INTEGER\n);\n");
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            outcome.diagnostics[0].to_string(),
            "table `empty` without columns is not supported by PostgreSQL: omitted"
        );
    }
}
