//! SQL dialects and their capability descriptors

mod descriptor;
mod reserved;
mod types;

pub use descriptor::*;
pub use types::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A SQL variant supported by the importer and exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
    MariaDb,
    #[serde(alias = "sqlserver", alias = "transactsql")]
    MsSql,
    #[serde(alias = "oraclesql")]
    Oracle,
}

impl Dialect {
    /// Every supported dialect
    pub const ALL: [Dialect; 6] = [
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Sqlite,
        Dialect::MariaDb,
        Dialect::MsSql,
        Dialect::Oracle,
    ];

    /// Capability descriptor of this dialect
    pub fn descriptor(self) -> &'static DialectDescriptor {
        match self {
            Dialect::MySql => &MYSQL,
            Dialect::Postgres => &POSTGRES,
            Dialect::Sqlite => &SQLITE,
            Dialect::MariaDb => &MARIADB,
            Dialect::MsSql => &MSSQL,
            Dialect::Oracle => &ORACLE,
        }
    }

    /// Identifier used in configuration files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::MariaDb => "mariadb",
            Dialect::MsSql => "mssql",
            Dialect::Oracle => "oracle",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            "mariadb" => Ok(Dialect::MariaDb),
            "mssql" | "sqlserver" | "transactsql" => Ok(Dialect::MsSql),
            "oracle" | "oraclesql" => Ok(Dialect::Oracle),
            other => Err(Error::UnknownDialect(other.to_string())),
        }
    }
}
