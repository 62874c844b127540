//! Configuration settings for a conversion run

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// Settings of one SQL to SQL conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Path to the SQL file to import
    #[serde(default)]
    pub input_file: PathBuf,

    /// Where to write the generated SQL; stdout when absent
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    #[serde(default = "default_source_dialect")]
    pub source_dialect: Dialect,

    #[serde(default = "default_target_dialect")]
    pub target_dialect: Dialect,

    /// Dialect of the intermediate diagram; the target when absent
    #[serde(default)]
    pub model_dialect: Option<Dialect>,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Fail the conversion on any diagnostic
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_source_dialect() -> Dialect {
    defaults::SOURCE_DIALECT
}
fn default_target_dialect() -> Dialect {
    defaults::TARGET_DIALECT
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_strict() -> bool {
    defaults::STRICT
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_file: None,
            source_dialect: default_source_dialect(),
            target_dialect: default_target_dialect(),
            model_dialect: None,
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            strict: default_strict(),
            log_level: None,
        }
    }
}

impl ConvertConfig {
    /// Create a default config reading from `input_file`
    pub fn default_with_input(input_file: PathBuf) -> Self {
        Self {
            input_file,
            ..Default::default()
        }
    }

    /// Dialect the diagram is held in between import and export
    pub fn model_dialect(&self) -> Dialect {
        self.model_dialect.unwrap_or(self.target_dialect)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConvertConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // DRAWDB_SQL_TARGET_DIALECT=oracle overrides target_dialect
        builder = builder.add_source(Environment::with_prefix(defaults::ENV_PREFIX).try_parsing(true));

        let config: ConvertConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(Error::Validation("input_file is required".into()));
        }

        if !self.input_file.exists() {
            return Err(Error::Validation(format!(
                "Input file not found: {}",
                self.input_file.display()
            )));
        }

        if self.output_file.as_deref() == Some(self.input_file.as_path()) {
            return Err(Error::Validation(
                "output_file must differ from input_file".into(),
            ));
        }

        Ok(())
    }
}
