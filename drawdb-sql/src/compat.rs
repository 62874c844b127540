//! Type compatibility between the two ends of a relationship

use crate::dialect::{split_type, Dialect, TypeCategory};

/// Category of a type name: the dialect's own table first, then the
/// dialect-independent classification
fn category(dialect: Dialect, base: &str) -> TypeCategory {
    dialect
        .descriptor()
        .type_spec(base)
        .map(|spec| spec.category)
        .unwrap_or_else(|| TypeCategory::classify(base))
}

/// Whether a relationship may link a column of type `a` to one of type `b`.
///
/// Identical base types always match. Otherwise both types must fall in the
/// same numeric, string or date/time family. A blank type matches nothing.
/// This is a coarse check, not a full type system.
pub fn are_fields_compatible(dialect: Dialect, a: &str, b: &str) -> bool {
    let left = split_type(a).base;
    let right = split_type(b).base;
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left == right {
        return true;
    }
    match category(dialect, &left) {
        TypeCategory::Other => false,
        family => family == category(dialect, &right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_family_is_compatible() {
        assert!(are_fields_compatible(Dialect::MySql, "INT", "BIGINT"));
        assert!(are_fields_compatible(Dialect::MySql, "DATE", "TIMESTAMP"));
        assert!(are_fields_compatible(Dialect::Postgres, "text", "VARCHAR(40)"));
    }

    #[test]
    fn test_different_family_is_not() {
        assert!(!are_fields_compatible(Dialect::MySql, "VARCHAR", "INT"));
        assert!(!are_fields_compatible(Dialect::Postgres, "UUID", "JSONB"));
    }

    #[test]
    fn test_identical_types_always_match() {
        assert!(are_fields_compatible(Dialect::MySql, "INT", "INT"));
        assert!(are_fields_compatible(Dialect::Postgres, "uuid", "UUID"));
        assert!(are_fields_compatible(Dialect::Sqlite, "mood", "mood"));
    }

    #[test]
    fn test_blank_types_are_incompatible() {
        assert!(!are_fields_compatible(Dialect::MySql, "", ""));
        assert!(!are_fields_compatible(Dialect::MySql, "INT", "  "));
        assert!(!are_fields_compatible(Dialect::Postgres, "", "TEXT"));
    }
}
