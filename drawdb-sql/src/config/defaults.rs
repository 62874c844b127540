//! Default configuration values - single source of truth

use crate::dialect::Dialect;

/// Config file looked up by [`super::ConvertConfig::load`] when none is given
pub const CONFIG_FILE: &str = "drawdb-sql";

/// Prefix of environment overrides, e.g. `DRAWDB_SQL_TARGET_DIALECT`
pub const ENV_PREFIX: &str = "DRAWDB_SQL";

/// Dialect of the input SQL
pub const SOURCE_DIALECT: Dialect = Dialect::MySql;

/// Dialect of the generated SQL
pub const TARGET_DIALECT: Dialect = Dialect::Postgres;

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Whether any diagnostic fails the conversion
pub const STRICT: bool = false;
