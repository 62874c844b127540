//! The diagram aggregate and its layout-free comparison view

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    Cardinality, CustomType, Enum, Field, Index, ReferentialAction, Relationship, Table, TableId,
};
use crate::dialect::{Dialect, EnumSupport};
use crate::error::Result;

/// Tables, relationships, enums and composite types of one schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub dialect: Dialect,
    /// Keyed by table id, in insertion order
    pub tables: IndexMap<TableId, Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub types: Vec<CustomType>,
}

impl Diagram {
    /// Create an empty diagram
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            tables: IndexMap::new(),
            relationships: Vec::new(),
            enums: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.enums.is_empty() && self.types.is_empty()
    }

    /// Read a diagram saved as JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON in the editor's field naming
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Table lookup by name; exact match first, then case-insensitive
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables
            .values()
            .find(|t| t.name == name)
            .or_else(|| self.tables.values().find(|t| t.name.eq_ignore_ascii_case(name)))
    }

    pub fn table_id_by_name(&self, name: &str) -> Option<TableId> {
        self.table_by_name(name).map(|t| t.id)
    }

    pub fn enum_by_name(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn type_by_name(&self, name: &str) -> Option<&CustomType> {
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Id the next added table receives
    pub fn next_table_id(&self) -> TableId {
        self.tables.keys().map(|id| id + 1).max().unwrap_or(0)
    }

    /// Id the next added relationship receives
    pub fn next_relationship_id(&self) -> usize {
        self.relationships.iter().map(|r| r.id + 1).max().unwrap_or(0)
    }

    /// Add a table under a fresh id and return that id
    pub fn add_table(&mut self, mut table: Table) -> TableId {
        let id = self.next_table_id();
        table.id = id;
        self.tables.insert(id, table);
        id
    }

    /// Append an imported fragment with fresh ids.
    ///
    /// Enums and composite types are kept only when this diagram's dialect
    /// can express them; names already present are not added twice.
    /// Returns the ids the fragment's tables received, in order.
    pub fn merge(&mut self, fragment: Diagram) -> Vec<TableId> {
        let mut remap: HashMap<TableId, TableId> = HashMap::new();
        let mut added = Vec::with_capacity(fragment.tables.len());

        for (old_id, table) in fragment.tables {
            let new_id = self.add_table(table);
            remap.insert(old_id, new_id);
            added.push(new_id);
        }

        for mut relationship in fragment.relationships {
            let (Some(&start), Some(&end)) = (
                remap.get(&relationship.start_table_id),
                remap.get(&relationship.end_table_id),
            ) else {
                continue;
            };
            relationship.id = self.next_relationship_id();
            relationship.start_table_id = start;
            relationship.end_table_id = end;
            self.relationships.push(relationship);
        }

        let descriptor = self.dialect.descriptor();
        if descriptor.enums != EnumSupport::None {
            for item in fragment.enums {
                if self.enum_by_name(&item.name).is_none() {
                    self.enums.push(item);
                }
            }
        }
        if descriptor.custom_types {
            for item in fragment.types {
                if self.type_by_name(&item.name).is_none() {
                    self.types.push(item);
                }
            }
        }

        debug!(
            "Merged {} tables into diagram ({} total)",
            added.len(),
            self.tables.len()
        );
        added
    }

    /// Layout-free view that ignores ids, colors, positions and ordering
    pub fn schema_view(&self) -> SchemaView {
        let mut tables = BTreeMap::new();
        for table in self.tables.values() {
            let fields = table
                .fields
                .iter()
                .map(|f| (f.name.clone(), Field { id: 0, ..f.clone() }))
                .collect();
            let mut indices = table.indices.clone();
            indices.sort_by(|a, b| (&a.fields, a.unique).cmp(&(&b.fields, b.unique)));
            tables.insert(
                table.name.clone(),
                TableView {
                    fields,
                    indices,
                    comment: table.comment.clone(),
                },
            );
        }

        let mut relationships: Vec<RelationshipView> = self
            .relationships
            .iter()
            .filter_map(|rel| self.relationship_view(rel))
            .collect();
        relationships.sort();

        SchemaView {
            tables,
            relationships,
            enums: self
                .enums
                .iter()
                .map(|e| (e.name.clone(), e.values.clone()))
                .collect(),
            types: self
                .types
                .iter()
                .map(|t| {
                    let fields = t
                        .fields
                        .iter()
                        .map(|f| (f.name.clone(), f.data_type.clone()))
                        .collect();
                    (t.name.clone(), fields)
                })
                .collect(),
        }
    }

    fn relationship_view(&self, rel: &Relationship) -> Option<RelationshipView> {
        let ((child_table, child_field), (parent_table, parent_field)) = rel.child_and_parent();
        let child = self.table(child_table)?;
        let parent = self.table(parent_table)?;
        Some(RelationshipView {
            name: rel.name.clone(),
            child_table: child.name.clone(),
            child_field: child.field(child_field)?.name.clone(),
            parent_table: parent.name.clone(),
            parent_field: parent.field(parent_field)?.name.clone(),
            one_to_one: rel.cardinality == Cardinality::OneToOne,
            on_update: rel.update_constraint,
            on_delete: rel.delete_constraint,
        })
    }
}

/// Comparison form of a [`Diagram`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaView {
    pub tables: BTreeMap<String, TableView>,
    pub relationships: Vec<RelationshipView>,
    pub enums: BTreeMap<String, Vec<String>>,
    pub types: BTreeMap<String, Vec<(String, String)>>,
}

/// Comparison form of a [`Table`]; field ids are zeroed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub fields: BTreeMap<String, Field>,
    pub indices: Vec<Index>,
    pub comment: Option<String>,
}

/// A relationship by names, oriented child to parent
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RelationshipView {
    pub name: String,
    pub child_table: String,
    pub child_field: String,
    pub parent_table: String,
    pub parent_field: String,
    pub one_to_one: bool,
    pub on_update: ReferentialAction,
    pub on_delete: ReferentialAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn shop(dialect: Dialect) -> Diagram {
        let mut diagram = Diagram::new(dialect);
        let mut users = Table::new(0, "users");
        users.fields = vec![
            Field::new(0, "id", "INT").primary(),
            Field::new(1, "name", "VARCHAR").with_size("80"),
        ];
        let users = diagram.add_table(users);

        let mut orders = Table::new(0, "orders");
        orders.fields = vec![
            Field::new(0, "id", "INT").primary(),
            Field::new(1, "user_id", "INT").not_null(),
        ];
        let orders = diagram.add_table(orders);

        diagram.relationships.push(Relationship {
            id: 0,
            name: "fk_orders_user_id".into(),
            start_table_id: orders,
            start_field_id: 1,
            end_table_id: users,
            end_field_id: 0,
            cardinality: Cardinality::ManyToOne,
            update_constraint: ReferentialAction::NoAction,
            delete_constraint: ReferentialAction::Cascade,
        });
        diagram.enums.push(Enum {
            name: "status".into(),
            values: vec!["open".into(), "closed".into()],
        });
        diagram
    }

    #[test]
    fn test_add_table_assigns_sequential_ids() {
        let diagram = shop(Dialect::Postgres);
        assert_eq!(diagram.tables.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(diagram.table_id_by_name("ORDERS"), Some(1));
        assert_eq!(diagram.next_table_id(), 2);
    }

    #[test]
    fn test_merge_remaps_ids() {
        let mut live = shop(Dialect::Postgres);
        let added = live.merge(shop(Dialect::Postgres));
        assert_eq!(added, vec![2, 3]);
        assert_eq!(live.tables.len(), 4);
        assert_eq!(live.relationships.len(), 2);

        let merged = &live.relationships[1];
        assert_eq!(merged.id, 1);
        assert_eq!(merged.start_table_id, 3);
        assert_eq!(merged.end_table_id, 2);
        // same enum name is not added twice
        assert_eq!(live.enums.len(), 1);
    }

    #[test]
    fn test_merge_drops_enums_without_dialect_support() {
        let mut live = Diagram::new(Dialect::Sqlite);
        live.merge(shop(Dialect::Postgres));
        assert!(live.enums.is_empty());
        assert_eq!(live.tables.len(), 2);
    }

    #[test]
    fn test_schema_view_ignores_layout_and_order() {
        let a = shop(Dialect::MySql);
        let mut b = shop(Dialect::MySql);

        let users = b.tables.shift_remove(&0).unwrap();
        let mut users = Table {
            color: "#ff0000".into(),
            x: 120.0,
            y: 45.0,
            ..users
        };
        users.fields.reverse();
        b.tables.insert(0, users);

        assert_eq!(a.schema_view(), b.schema_view());

        let mut c = b.clone();
        c.tables.get_mut(&0).unwrap().fields[0].not_null = true;
        assert_ne!(a.schema_view(), c.schema_view());
    }

    #[test]
    fn test_schema_view_orients_relationships() {
        let a = shop(Dialect::MySql);
        let mut b = a.clone();
        let rel = &mut b.relationships[0];
        std::mem::swap(&mut rel.start_table_id, &mut rel.end_table_id);
        std::mem::swap(&mut rel.start_field_id, &mut rel.end_field_id);
        rel.cardinality = Cardinality::OneToMany;
        assert_eq!(a.schema_view(), b.schema_view());
    }

    #[test]
    fn test_json_round_trip_and_rejection() {
        let diagram = shop(Dialect::Postgres);
        let json = diagram.to_json().unwrap();
        assert!(json.contains("\"startTableId\""));
        assert_eq!(Diagram::from_json(&json).unwrap(), diagram);

        assert!(matches!(
            Diagram::from_json("{\"dialect\": \"postgres\"}"),
            Err(Error::Json(_))
        ));
        assert!(matches!(Diagram::from_json("not json"), Err(Error::Json(_))));
    }
}
