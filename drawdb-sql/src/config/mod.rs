//! Conversion settings: TOML file, `DRAWDB_SQL_*` environment and defaults

pub mod defaults;
mod settings;

pub use settings::*;
