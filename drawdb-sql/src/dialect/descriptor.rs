//! Static capability descriptors, one per dialect

use super::reserved;
use super::types::{
    TypeSpec, MARIADB_EXTRA_TYPES, MSSQL_TYPES, MYSQL_TYPES, ORACLE_TYPES, POSTGRES_TYPES,
    SQLITE_TYPES,
};
use super::Dialect;
use crate::model::ReferentialAction;

/// How identifiers are quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `` `name` ``
    Backtick,
    /// `"name"`
    DoubleQuote,
    /// `[name]`
    Bracket,
}

impl QuoteStyle {
    fn delimiters(self) -> (char, char) {
        match self {
            QuoteStyle::Backtick => ('`', '`'),
            QuoteStyle::DoubleQuote => ('"', '"'),
            QuoteStyle::Bracket => ('[', ']'),
        }
    }
}

/// How enumerated types are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSupport {
    /// Named type declared once: `CREATE TYPE mood AS ENUM (...)`
    Native,
    /// Written on the column: `ENUM('a', 'b')`
    Inline,
    /// Not available; emitted as a string column with a CHECK constraint
    None,
}

/// How an auto-increment column is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementStyle {
    /// `AUTO_INCREMENT`
    AutoIncrement,
    /// `PRIMARY KEY AUTOINCREMENT`, valid only on a sole `INTEGER` key
    Autoincrement,
    /// `IDENTITY(1,1)`
    Identity,
    /// `GENERATED BY DEFAULT AS IDENTITY`
    GeneratedIdentity,
}

impl IncrementStyle {
    pub fn keyword(self) -> &'static str {
        match self {
            IncrementStyle::AutoIncrement => "AUTO_INCREMENT",
            IncrementStyle::Autoincrement => "AUTOINCREMENT",
            IncrementStyle::Identity => "IDENTITY(1,1)",
            IncrementStyle::GeneratedIdentity => "GENERATED BY DEFAULT AS IDENTITY",
        }
    }
}

/// Where foreign keys are declared on export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyPlacement {
    /// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` after all tables
    AlterTable,
    /// Table-level constraint inside `CREATE TABLE`
    Inline,
}

/// How table and column comments are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `COMMENT 'text'` on the column, `COMMENT='text'` on the table
    Inline,
    /// Separate `COMMENT ON TABLE/COLUMN ... IS 'text'` statements
    CommentOn,
    /// No comment syntax; written as `-- text` lines
    LineComment,
}

/// Order of column clauses after the type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseOrder {
    /// `NOT NULL`, `UNIQUE`, `DEFAULT`, increment, `PRIMARY KEY`
    Standard,
    /// Increment and `DEFAULT` before the nullability constraint
    DefaultFirst,
}

/// Type substituted when nothing native fits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackType {
    pub name: &'static str,
    pub size: Option<&'static str>,
}

impl FallbackType {
    pub fn render(&self) -> String {
        match self.size {
            Some(size) => format!("{}({})", self.name, size),
            None => self.name.to_string(),
        }
    }
}

/// Everything the importer and exporter need to know about a dialect
#[derive(Debug)]
pub struct DialectDescriptor {
    pub dialect: Dialect,
    /// Human readable name used in diagnostics
    pub display_name: &'static str,
    pub quote: QuoteStyle,
    pub enums: EnumSupport,
    /// Supports `CREATE TYPE name AS (...)` composite types
    pub custom_types: bool,
    pub increment: IncrementStyle,
    pub foreign_keys: ForeignKeyPlacement,
    pub comments: CommentStyle,
    pub clause_order: ClauseOrder,
    /// Actions accepted after `ON DELETE`, besides `NO ACTION`
    pub on_delete: &'static [ReferentialAction],
    /// Actions accepted after `ON UPDATE`, besides `NO ACTION`
    pub on_update: &'static [ReferentialAction],
    /// Accepts `UNSIGNED` on numeric columns
    pub unsigned: bool,
    pub types: &'static [&'static [TypeSpec]],
    pub reserved_words: &'static [&'static [&'static str]],
    pub text_fallback: FallbackType,
    pub enum_fallback: FallbackType,
    pub json_fallback: FallbackType,
}

impl DialectDescriptor {
    /// Look up a type by case-insensitive name
    pub fn type_spec(&self, name: &str) -> Option<&'static TypeSpec> {
        let name = name.trim();
        self.types
            .iter()
            .flat_map(|table| table.iter())
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words
            .iter()
            .flat_map(|list| list.iter())
            .any(|reserved| reserved.eq_ignore_ascii_case(word))
    }

    /// Quote `name` when it is reserved or not a plain identifier.
    /// Embedded closing quote characters are doubled.
    pub fn quote_identifier(&self, name: &str) -> String {
        if is_plain_identifier(name) && !self.is_reserved(name) {
            return name.to_string();
        }
        let (open, close) = self.quote.delimiters();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            if c == close {
                quoted.push(close);
            }
            quoted.push(c);
        }
        quoted.push(close);
        quoted
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

const EVERY_ACTION: &[ReferentialAction] = &[
    ReferentialAction::Restrict,
    ReferentialAction::Cascade,
    ReferentialAction::SetNull,
    ReferentialAction::SetDefault,
];

const WITHOUT_RESTRICT: &[ReferentialAction] = &[
    ReferentialAction::Cascade,
    ReferentialAction::SetNull,
    ReferentialAction::SetDefault,
];

const fn fallback(name: &'static str) -> FallbackType {
    FallbackType { name, size: None }
}

const fn fallback_sized(name: &'static str, size: &'static str) -> FallbackType {
    FallbackType {
        name,
        size: Some(size),
    }
}

pub static MYSQL: DialectDescriptor = DialectDescriptor {
    dialect: Dialect::MySql,
    display_name: "MySQL",
    quote: QuoteStyle::Backtick,
    enums: EnumSupport::Inline,
    custom_types: false,
    increment: IncrementStyle::AutoIncrement,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    comments: CommentStyle::Inline,
    clause_order: ClauseOrder::Standard,
    on_delete: EVERY_ACTION,
    on_update: EVERY_ACTION,
    unsigned: true,
    types: &[MYSQL_TYPES],
    reserved_words: &[reserved::COMMON, reserved::MYSQL],
    text_fallback: fallback("TEXT"),
    enum_fallback: fallback_sized("VARCHAR", "255"),
    json_fallback: fallback("JSON"),
};

pub static MARIADB: DialectDescriptor = DialectDescriptor {
    dialect: Dialect::MariaDb,
    display_name: "MariaDB",
    quote: QuoteStyle::Backtick,
    enums: EnumSupport::Inline,
    custom_types: false,
    increment: IncrementStyle::AutoIncrement,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    comments: CommentStyle::Inline,
    clause_order: ClauseOrder::Standard,
    on_delete: EVERY_ACTION,
    on_update: EVERY_ACTION,
    unsigned: true,
    types: &[MYSQL_TYPES, MARIADB_EXTRA_TYPES],
    reserved_words: &[reserved::COMMON, reserved::MYSQL],
    text_fallback: fallback("TEXT"),
    enum_fallback: fallback_sized("VARCHAR", "255"),
    json_fallback: fallback("JSON"),
};

pub static POSTGRES: DialectDescriptor = DialectDescriptor {
    dialect: Dialect::Postgres,
    display_name: "PostgreSQL",
    quote: QuoteStyle::DoubleQuote,
    enums: EnumSupport::Native,
    custom_types: true,
    increment: IncrementStyle::GeneratedIdentity,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    comments: CommentStyle::CommentOn,
    clause_order: ClauseOrder::Standard,
    on_delete: EVERY_ACTION,
    on_update: EVERY_ACTION,
    unsigned: false,
    types: &[POSTGRES_TYPES],
    reserved_words: &[reserved::COMMON, reserved::POSTGRES],
    text_fallback: fallback("TEXT"),
    enum_fallback: fallback("TEXT"),
    json_fallback: fallback("JSONB"),
};

pub static SQLITE: DialectDescriptor = DialectDescriptor {
    dialect: Dialect::Sqlite,
    display_name: "SQLite",
    quote: QuoteStyle::DoubleQuote,
    enums: EnumSupport::None,
    custom_types: false,
    increment: IncrementStyle::Autoincrement,
    foreign_keys: ForeignKeyPlacement::Inline,
    comments: CommentStyle::LineComment,
    clause_order: ClauseOrder::Standard,
    on_delete: EVERY_ACTION,
    on_update: EVERY_ACTION,
    unsigned: false,
    types: &[SQLITE_TYPES],
    reserved_words: &[reserved::COMMON, reserved::SQLITE],
    text_fallback: fallback("TEXT"),
    enum_fallback: fallback("TEXT"),
    json_fallback: fallback("TEXT"),
};

pub static MSSQL: DialectDescriptor = DialectDescriptor {
    dialect: Dialect::MsSql,
    display_name: "SQL Server",
    quote: QuoteStyle::Bracket,
    enums: EnumSupport::None,
    custom_types: false,
    increment: IncrementStyle::Identity,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    comments: CommentStyle::LineComment,
    clause_order: ClauseOrder::Standard,
    on_delete: WITHOUT_RESTRICT,
    on_update: WITHOUT_RESTRICT,
    unsigned: false,
    types: &[MSSQL_TYPES],
    reserved_words: &[reserved::COMMON, reserved::MSSQL],
    text_fallback: fallback_sized("NVARCHAR", "MAX"),
    enum_fallback: fallback_sized("NVARCHAR", "255"),
    json_fallback: fallback_sized("NVARCHAR", "MAX"),
};

pub static ORACLE: DialectDescriptor = DialectDescriptor {
    dialect: Dialect::Oracle,
    display_name: "Oracle",
    quote: QuoteStyle::DoubleQuote,
    enums: EnumSupport::None,
    custom_types: false,
    increment: IncrementStyle::GeneratedIdentity,
    foreign_keys: ForeignKeyPlacement::AlterTable,
    comments: CommentStyle::CommentOn,
    clause_order: ClauseOrder::DefaultFirst,
    on_delete: &[ReferentialAction::Cascade, ReferentialAction::SetNull],
    on_update: &[],
    unsigned: false,
    types: &[ORACLE_TYPES],
    reserved_words: &[reserved::COMMON, reserved::ORACLE],
    text_fallback: fallback("CLOB"),
    enum_fallback: fallback_sized("VARCHAR2", "255"),
    json_fallback: fallback("CLOB"),
};
