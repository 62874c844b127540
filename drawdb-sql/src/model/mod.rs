//! Diagram model shared by the importer and the exporter

mod diagram;

pub use diagram::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Table identifier, unique within a diagram
pub type TableId = usize;

/// Field identifier, unique within a table
pub type FieldId = usize;

/// Default display color of a new table
pub const DEFAULT_TABLE_COLOR: &str = "#175e7a";

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    /// Type name in the diagram's dialect, e.g. `VARCHAR`, or an enum/type name
    #[serde(rename = "type")]
    pub data_type: String,
    /// Length or `precision,scale`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub increment: bool,
    #[serde(default)]
    pub unsigned: bool,
    /// Raw default expression as written in SQL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Field {
    /// Create a field with every flag cleared
    pub fn new(id: FieldId, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            data_type: data_type.into(),
            size: None,
            primary: false,
            unique: false,
            not_null: false,
            increment: false,
            unsigned: false,
            default: None,
            check: None,
            comment: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn increment(mut self) -> Self {
        self.increment = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Type with its size, e.g. `VARCHAR(255)`
    pub fn type_display(&self) -> String {
        match &self.size {
            Some(size) => format!("{}({})", self.data_type, size),
            None => self.data_type.clone(),
        }
    }
}

/// A secondary index; fields are referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub unique: bool,
    pub fields: Vec<String>,
}

/// A table with its layout attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub indices: Vec<Index>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

fn default_color() -> String {
    DEFAULT_TABLE_COLOR.to_string()
}

impl Table {
    pub fn new(id: TableId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: Vec::new(),
            indices: Vec::new(),
            comment: None,
            color: default_color(),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Field lookup by name; SQL identifiers compare case-insensitively
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    pub fn field_by_name_mut(&mut self, name: &str) -> Option<&mut Field> {
        let position = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .or_else(|| self.fields.iter().position(|f| f.name.eq_ignore_ascii_case(name)))?;
        self.fields.get_mut(position)
    }

    /// Id the next appended field receives
    pub fn next_field_id(&self) -> FieldId {
        self.fields.iter().map(|f| f.id + 1).max().unwrap_or(0)
    }

    /// Fields flagged as primary key, in declaration order
    pub fn primary_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.primary).collect()
    }

    /// Whether values of `field` are guaranteed distinct: flagged unique,
    /// the sole primary key, or covered by a single-column unique index
    pub fn is_unique_field(&self, field: &Field) -> bool {
        if field.unique {
            return true;
        }
        if field.primary && self.fields.iter().filter(|f| f.primary).count() == 1 {
            return true;
        }
        self.indices.iter().any(|index| {
            index.unique
                && index.fields.len() == 1
                && index.fields[0].eq_ignore_ascii_case(&field.name)
        })
    }
}

/// Multiplicity of a relationship, read from start to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
}

/// Action taken on the child rows when the parent key changes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ReferentialAction {
    #[default]
    #[serde(rename = "No action")]
    NoAction,
    #[serde(rename = "Restrict")]
    Restrict,
    #[serde(rename = "Cascade")]
    Cascade,
    #[serde(rename = "Set null")]
    SetNull,
    #[serde(rename = "Set default")]
    SetDefault,
}

impl ReferentialAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ReferentialAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<String> = s
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|w| !w.is_empty())
            .map(str::to_uppercase)
            .collect();
        match words.join(" ").as_str() {
            "NO ACTION" => Ok(ReferentialAction::NoAction),
            "RESTRICT" => Ok(ReferentialAction::Restrict),
            "CASCADE" => Ok(ReferentialAction::Cascade),
            "SET NULL" => Ok(ReferentialAction::SetNull),
            "SET DEFAULT" => Ok(ReferentialAction::SetDefault),
            _ => Err(format!("unknown referential action `{}`", s)),
        }
    }
}

/// A foreign key between two fields, referenced by id.
///
/// The child side holds the foreign key: start for `ManyToOne` and
/// `OneToOne`, end for `OneToMany`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: usize,
    pub name: String,
    pub start_table_id: TableId,
    pub start_field_id: FieldId,
    pub end_table_id: TableId,
    pub end_field_id: FieldId,
    pub cardinality: Cardinality,
    #[serde(default)]
    pub update_constraint: ReferentialAction,
    #[serde(default)]
    pub delete_constraint: ReferentialAction,
}

/// Child and parent ends of a relationship as `(table, field)` pairs
pub type RelationshipEnds = ((TableId, FieldId), (TableId, FieldId));

impl Relationship {
    /// `(child, parent)` regardless of which side the cardinality puts first
    pub fn child_and_parent(&self) -> RelationshipEnds {
        let start = (self.start_table_id, self.start_field_id);
        let end = (self.end_table_id, self.end_field_id);
        match self.cardinality {
            Cardinality::OneToMany => (end, start),
            Cardinality::ManyToOne | Cardinality::OneToOne => (start, end),
        }
    }

    pub fn touches_table(&self, table: TableId) -> bool {
        self.start_table_id == table || self.end_table_id == table
    }
}

/// A named enumerated type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<String>,
}

/// Attribute of a composite type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// A named composite type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomType {
    pub name: String,
    pub fields: Vec<TypeField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
