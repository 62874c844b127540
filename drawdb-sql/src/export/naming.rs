//! Naming utilities for generated DDL

use std::collections::HashSet;

/// Quote a string literal, doubling embedded single quotes
pub fn sql_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Default name of an index: `<table>_<field>_..._index`
pub fn index_name(table: &str, fields: &[String]) -> String {
    format!("{}_{}_index", table, fields.join("_"))
}

/// Default name of a foreign key constraint: `fk_<child_table>_<child_field>`
pub fn foreign_key_name(child_table: &str, child_field: &str) -> String {
    format!("fk_{}_{}", child_table, child_field)
}

/// Hands out names that are unique within one export, in request order
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `wanted`, or `wanted_2`, `wanted_3`, ... if already taken.
    /// Comparison is case-insensitive since most dialects fold identifiers.
    pub fn claim(&mut self, wanted: &str) -> String {
        let mut candidate = wanted.to_string();
        let mut suffix = 2;
        while !self.taken.insert(candidate.to_lowercase()) {
            candidate = format!("{}_{}", wanted, suffix);
            suffix += 1;
        }
        candidate
    }
}
