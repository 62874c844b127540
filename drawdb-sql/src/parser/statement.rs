//! Closed set of DDL statements the importer understands

use crate::model::ReferentialAction;

/// One statement of the input, normalized away from the parser's AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdlStatement {
    CreateTable(CreateTableStmt),
    CreateIndex(CreateIndexStmt),
    /// `ALTER TABLE ... ADD [CONSTRAINT name] FOREIGN KEY ...`
    AddForeignKey {
        table: String,
        foreign_keys: Vec<ForeignKeySpec>,
    },
    /// `CREATE TYPE name AS ENUM (...)`
    CreateEnum { name: String, values: Vec<String> },
    /// `CREATE TYPE name AS (attr type, ...)`
    CreateCompositeType {
        name: String,
        fields: Vec<(String, String)>,
    },
    /// `COMMENT ON TABLE/COLUMN ... IS ...`
    Comment {
        target: CommentTarget,
        text: Option<String>,
    },
    /// Parsed, but not something a diagram can hold
    Unsupported { kind: String },
    /// Could not be parsed or lacks required parts
    Malformed { kind: String, reason: String },
}

impl DdlStatement {
    /// Short label for logs, e.g. `CREATE TABLE`
    pub fn label(&self) -> &str {
        match self {
            DdlStatement::CreateTable(_) => "CREATE TABLE",
            DdlStatement::CreateIndex(_) => "CREATE INDEX",
            DdlStatement::AddForeignKey { .. } => "ALTER TABLE",
            DdlStatement::CreateEnum { .. } => "CREATE TYPE AS ENUM",
            DdlStatement::CreateCompositeType { .. } => "CREATE TYPE",
            DdlStatement::Comment { .. } => "COMMENT ON",
            DdlStatement::Unsupported { kind } | DdlStatement::Malformed { kind, .. } => kind,
        }
    }
}

/// Object a `COMMENT ON` statement applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    Table(String),
    Column { table: String, column: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStmt {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub constraints: Vec<ConstraintSpec>,
    pub comment: Option<String>,
}

/// Declared type of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Type as written, e.g. `DECIMAL(10,2)` or `INT UNSIGNED`
    Declared(String),
    /// MySQL `ENUM('a', 'b')`
    InlineEnum(Vec<String>),
}

/// A column definition with its inline constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: ColumnType,
    pub not_null: bool,
    pub primary: bool,
    pub unique: bool,
    pub increment: bool,
    pub default: Option<String>,
    pub check: Option<String>,
    pub comment: Option<String>,
    /// Inline `REFERENCES parent (col)`
    pub references: Option<ForeignKeySpec>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            not_null: false,
            primary: false,
            unique: false,
            increment: false,
            default: None,
            check: None,
            comment: None,
            references: None,
        }
    }
}

/// Table-level constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintSpec {
    PrimaryKey {
        columns: Vec<String>,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    Index {
        name: Option<String>,
        columns: Vec<String>,
    },
    ForeignKey(ForeignKeySpec),
    Check {
        name: Option<String>,
        expr: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeySpec {
    pub name: Option<String>,
    /// Child columns
    pub columns: Vec<String>,
    pub foreign_table: String,
    /// Parent columns; empty means the parent's primary key
    pub referred_columns: Vec<String>,
    pub on_update: Option<ReferentialAction>,
    pub on_delete: Option<ReferentialAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndexStmt {
    pub name: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}
