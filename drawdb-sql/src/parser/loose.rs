//! Reading AST nodes through their serde form
//!
//! Used where the exact Rust shape of a sqlparser node varies between
//! releases (tuple vs. struct variants); the serialized field names are
//! stable.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlparser::ast::ObjectName;

pub(super) fn to_json<T: Serialize>(node: &T) -> Option<Value> {
    serde_json::to_value(node).ok()
}

/// Payload of an externally tagged enum value `{"Variant": payload}`
pub(super) fn variant<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value.as_object()?.get(name)
}

/// Name of the variant of an externally tagged enum value
pub(super) fn variant_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(unit) => Some(unit),
        Value::Object(map) if map.len() == 1 => map.keys().next().map(String::as_str),
        _ => None,
    }
}

/// Typed view of a sub-node; `None` for null or a mismatched shape
pub(super) fn typed<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value(value.clone()).ok(),
    }
}

/// Text of a serialized `Ident`
pub(super) fn ident(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("value")?.as_str().map(str::to_string),
        _ => None,
    }
}

/// Texts of a serialized `Vec<Ident>`
pub(super) fn idents(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|item| ident(Some(item))).collect())
        .unwrap_or_default()
}

/// Last part of a serialized `ObjectName`
pub(super) fn object_name(value: Option<&Value>) -> Option<String> {
    typed::<ObjectName>(value)
        .map(|name| super::adapter::last_name_part(&name))
        .filter(|name| !name.is_empty())
}

/// Depth-first search for the first string stored under one of `keys`,
/// not descending into `skip` members
pub(super) fn find_string(value: &Value, keys: &[&str], skip: &[&str]) -> Option<String> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if keys.contains(&key.as_str()) {
                    if let Some(text) = child.as_str() {
                        return Some(text.to_string());
                    }
                }
            }
            map.iter()
                .filter(|(key, _)| !skip.contains(&key.as_str()))
                .find_map(|(_, child)| find_string(child, keys, skip))
        }
        Value::Array(items) => items.iter().find_map(|item| find_string(item, keys, skip)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_helpers() {
        let value = json!({"ForeignKey": {"name": {"value": "fk_a", "quote_style": null}}});
        assert_eq!(variant_name(&value), Some("ForeignKey"));
        let payload = variant(&value, "ForeignKey").unwrap();
        assert_eq!(ident(payload.get("name")), Some("fk_a".to_string()));
        assert_eq!(variant_name(&json!("NotNull")), Some("NotNull"));
    }

    #[test]
    fn test_find_string_skips_members() {
        let value = json!({
            "columns": [{"options": {"WithEq": "column text"}}],
            "table_options": {"Plain": [{"Comment": {"WithEq": "table text"}}]}
        });
        assert_eq!(
            find_string(&value, &["WithEq"], &["columns"]),
            Some("table text".to_string())
        );
        assert_eq!(find_string(&value, &["WithoutEq"], &[]), None);
    }

    #[test]
    fn test_typed_rejects_null() {
        assert_eq!(typed::<String>(Some(&Value::Null)), None);
        assert_eq!(typed::<String>(Some(&json!("x"))), Some("x".to_string()));
    }
}
