//! Per-dialect type tables and type resolution between dialects

use super::{Dialect, DialectDescriptor};

/// Coarse classification of a column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Numeric,
    String,
    DateTime,
    Other,
}

const NUMERIC_TYPES: &[&str] = &[
    "INT",
    "INTEGER",
    "BIGINT",
    "SMALLINT",
    "TINYINT",
    "MEDIUMINT",
    "DECIMAL",
    "NUMERIC",
    "NUMBER",
    "FLOAT",
    "DOUBLE",
    "DOUBLE PRECISION",
    "REAL",
    "SERIAL",
    "BIGSERIAL",
    "SMALLSERIAL",
    "MONEY",
    "SMALLMONEY",
    "BINARY_FLOAT",
    "BINARY_DOUBLE",
];

const STRING_TYPES: &[&str] = &[
    "VARCHAR",
    "CHAR",
    "TEXT",
    "STRING",
    "NVARCHAR",
    "NCHAR",
    "VARCHAR2",
    "NVARCHAR2",
    "CHARACTER",
    "CHARACTER VARYING",
    "TINYTEXT",
    "MEDIUMTEXT",
    "LONGTEXT",
    "NTEXT",
    "CLOB",
    "NCLOB",
];

const DATETIME_TYPES: &[&str] = &[
    "DATE",
    "TIME",
    "DATETIME",
    "DATETIME2",
    "SMALLDATETIME",
    "DATETIMEOFFSET",
    "TIMESTAMP",
    "TIMESTAMPTZ",
    "TIMETZ",
    "TIMESTAMP WITH TIME ZONE",
    "TIMESTAMP WITHOUT TIME ZONE",
    "YEAR",
];

impl TypeCategory {
    /// Classify a base type name (no size) against the fixed category sets
    pub fn classify(base: &str) -> TypeCategory {
        let upper = base.trim().to_uppercase();
        let contains = |set: &[&str]| set.iter().any(|t| *t == upper);
        if contains(NUMERIC_TYPES) {
            TypeCategory::Numeric
        } else if contains(STRING_TYPES) {
            TypeCategory::String
        } else if contains(DATETIME_TYPES) {
            TypeCategory::DateTime
        } else {
            TypeCategory::Other
        }
    }
}

/// A type a dialect accepts, and how it takes arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: &'static str,
    /// Accepts a length, e.g. `VARCHAR(255)`
    pub sized: bool,
    /// Accepts precision and scale, e.g. `DECIMAL(10,2)`
    pub precision: bool,
    /// Can carry an auto-increment / identity clause
    pub can_increment: bool,
    pub default_size: Option<&'static str>,
    pub category: TypeCategory,
}

impl TypeSpec {
    /// Whether this type takes a parenthesized argument
    pub fn takes_size(&self) -> bool {
        self.sized || self.precision
    }
}

const fn plain(name: &'static str, category: TypeCategory) -> TypeSpec {
    TypeSpec {
        name,
        sized: false,
        precision: false,
        can_increment: false,
        default_size: None,
        category,
    }
}

const fn integer(name: &'static str) -> TypeSpec {
    TypeSpec {
        name,
        sized: false,
        precision: false,
        can_increment: true,
        default_size: None,
        category: TypeCategory::Numeric,
    }
}

const fn sized(name: &'static str, default_size: &'static str, category: TypeCategory) -> TypeSpec {
    TypeSpec {
        name,
        sized: true,
        precision: false,
        can_increment: false,
        default_size: Some(default_size),
        category,
    }
}

const fn precise(name: &'static str, category: TypeCategory) -> TypeSpec {
    TypeSpec {
        name,
        sized: false,
        precision: true,
        can_increment: false,
        default_size: None,
        category,
    }
}

use TypeCategory::{DateTime, Numeric, Other, String as Str};

pub(super) const MYSQL_TYPES: &[TypeSpec] = &[
    integer("TINYINT"),
    integer("SMALLINT"),
    integer("MEDIUMINT"),
    integer("INT"),
    integer("BIGINT"),
    precise("DECIMAL", Numeric),
    precise("NUMERIC", Numeric),
    plain("FLOAT", Numeric),
    plain("DOUBLE", Numeric),
    sized("BIT", "1", Other),
    plain("BOOLEAN", Other),
    sized("CHAR", "1", Str),
    sized("VARCHAR", "255", Str),
    sized("BINARY", "1", Other),
    sized("VARBINARY", "255", Other),
    plain("TINYTEXT", Str),
    plain("TEXT", Str),
    plain("MEDIUMTEXT", Str),
    plain("LONGTEXT", Str),
    plain("TINYBLOB", Other),
    plain("BLOB", Other),
    plain("MEDIUMBLOB", Other),
    plain("LONGBLOB", Other),
    plain("DATE", DateTime),
    plain("TIME", DateTime),
    plain("DATETIME", DateTime),
    plain("TIMESTAMP", DateTime),
    plain("YEAR", DateTime),
    plain("JSON", Other),
    plain("GEOMETRY", Other),
    plain("POINT", Other),
    plain("LINESTRING", Other),
    plain("POLYGON", Other),
];

pub(super) const MARIADB_EXTRA_TYPES: &[TypeSpec] = &[
    plain("UUID", Other),
    plain("INET4", Other),
    plain("INET6", Other),
];

pub(super) const POSTGRES_TYPES: &[TypeSpec] = &[
    integer("SMALLINT"),
    integer("INTEGER"),
    integer("BIGINT"),
    precise("DECIMAL", Numeric),
    precise("NUMERIC", Numeric),
    plain("REAL", Numeric),
    plain("DOUBLE PRECISION", Numeric),
    // SERIAL and friends are shorthands resolved through ALIASES into an
    // integer plus the increment flag
    plain("MONEY", Numeric),
    sized("CHAR", "1", Str),
    sized("VARCHAR", "255", Str),
    plain("TEXT", Str),
    plain("BYTEA", Other),
    plain("DATE", DateTime),
    plain("TIME", DateTime),
    plain("TIMETZ", DateTime),
    plain("TIMESTAMP", DateTime),
    plain("TIMESTAMPTZ", DateTime),
    plain("INTERVAL", Other),
    plain("BOOLEAN", Other),
    plain("UUID", Other),
    plain("JSON", Other),
    plain("JSONB", Other),
    plain("XML", Other),
    plain("INET", Other),
    plain("CIDR", Other),
    plain("MACADDR", Other),
    sized("BIT", "1", Other),
    plain("VARBIT", Other),
    plain("POINT", Other),
    plain("LINE", Other),
    plain("POLYGON", Other),
    plain("TSVECTOR", Other),
];

pub(super) const SQLITE_TYPES: &[TypeSpec] = &[
    integer("INTEGER"),
    plain("REAL", Numeric),
    precise("NUMERIC", Numeric),
    precise("DECIMAL", Numeric),
    plain("TEXT", Str),
    sized("VARCHAR", "255", Str),
    sized("CHAR", "1", Str),
    plain("BLOB", Other),
    plain("BOOLEAN", Other),
    plain("DATE", DateTime),
    plain("TIME", DateTime),
    plain("DATETIME", DateTime),
    plain("TIMESTAMP", DateTime),
];

pub(super) const MSSQL_TYPES: &[TypeSpec] = &[
    integer("TINYINT"),
    integer("SMALLINT"),
    integer("INT"),
    integer("BIGINT"),
    plain("BIT", Other),
    precise("DECIMAL", Numeric),
    precise("NUMERIC", Numeric),
    plain("FLOAT", Numeric),
    plain("REAL", Numeric),
    plain("MONEY", Numeric),
    plain("SMALLMONEY", Numeric),
    sized("CHAR", "1", Str),
    sized("VARCHAR", "255", Str),
    plain("TEXT", Str),
    sized("NCHAR", "1", Str),
    sized("NVARCHAR", "255", Str),
    plain("NTEXT", Str),
    sized("BINARY", "1", Other),
    sized("VARBINARY", "255", Other),
    plain("IMAGE", Other),
    plain("DATE", DateTime),
    plain("TIME", DateTime),
    plain("DATETIME", DateTime),
    plain("DATETIME2", DateTime),
    plain("SMALLDATETIME", DateTime),
    plain("DATETIMEOFFSET", DateTime),
    plain("UNIQUEIDENTIFIER", Other),
    plain("XML", Other),
    plain("GEOMETRY", Other),
    plain("GEOGRAPHY", Other),
];

pub(super) const ORACLE_TYPES: &[TypeSpec] = &[
    TypeSpec {
        name: "NUMBER",
        sized: false,
        precision: true,
        can_increment: true,
        default_size: None,
        category: Numeric,
    },
    integer("INTEGER"),
    integer("SMALLINT"),
    plain("FLOAT", Numeric),
    plain("BINARY_FLOAT", Numeric),
    plain("BINARY_DOUBLE", Numeric),
    sized("CHAR", "1", Str),
    sized("VARCHAR2", "255", Str),
    sized("NCHAR", "1", Str),
    sized("NVARCHAR2", "255", Str),
    plain("CLOB", Str),
    plain("NCLOB", Str),
    plain("BLOB", Other),
    sized("RAW", "16", Other),
    plain("DATE", DateTime),
    plain("TIMESTAMP", DateTime),
    plain("TIMESTAMP WITH TIME ZONE", DateTime),
    plain("JSON", Other),
    plain("XMLTYPE", Other),
];

/// Equivalence classes used when a type is not native to the target dialect.
/// Targets are tried in order; a target may pin its own size.
struct TypeAlias {
    names: &'static [&'static str],
    targets: &'static [&'static str],
    increment: bool,
}

const ALIASES: &[TypeAlias] = &[
    TypeAlias {
        names: &["INT", "INTEGER", "INT4", "MEDIUMINT"],
        targets: &["INT", "INTEGER", "NUMBER(10)"],
        increment: false,
    },
    TypeAlias {
        names: &["BIGINT", "INT8"],
        targets: &["BIGINT", "INTEGER", "NUMBER(19)"],
        increment: false,
    },
    TypeAlias {
        names: &["SMALLINT", "INT2", "TINYINT"],
        targets: &["SMALLINT", "INTEGER", "NUMBER(5)"],
        increment: false,
    },
    TypeAlias {
        names: &["SERIAL", "SERIAL4"],
        targets: &["INT", "INTEGER", "NUMBER(10)"],
        increment: true,
    },
    TypeAlias {
        names: &["BIGSERIAL", "SERIAL8"],
        targets: &["BIGINT", "INTEGER", "NUMBER(19)"],
        increment: true,
    },
    TypeAlias {
        names: &["SMALLSERIAL", "SERIAL2"],
        targets: &["SMALLINT", "INTEGER", "NUMBER(5)"],
        increment: true,
    },
    TypeAlias {
        names: &["DECIMAL", "NUMERIC", "NUMBER", "DEC"],
        targets: &["DECIMAL", "NUMERIC", "NUMBER"],
        increment: false,
    },
    TypeAlias {
        names: &["MONEY", "SMALLMONEY"],
        targets: &["MONEY", "DECIMAL(19,4)", "NUMERIC(19,4)", "NUMBER(19,4)"],
        increment: false,
    },
    TypeAlias {
        names: &["DOUBLE", "DOUBLE PRECISION", "FLOAT8", "BINARY_DOUBLE"],
        targets: &["DOUBLE", "DOUBLE PRECISION", "BINARY_DOUBLE", "FLOAT", "REAL"],
        increment: false,
    },
    TypeAlias {
        names: &["REAL", "FLOAT", "FLOAT4", "BINARY_FLOAT"],
        targets: &["REAL", "FLOAT", "BINARY_FLOAT", "DOUBLE"],
        increment: false,
    },
    TypeAlias {
        names: &["BOOLEAN", "BOOL"],
        targets: &["BOOLEAN", "BIT", "NUMBER(1)"],
        increment: false,
    },
    TypeAlias {
        names: &[
            "VARCHAR",
            "CHARACTER VARYING",
            "VARCHAR2",
            "NVARCHAR",
            "NVARCHAR2",
            "STRING",
        ],
        targets: &["VARCHAR", "VARCHAR2", "NVARCHAR", "TEXT"],
        increment: false,
    },
    TypeAlias {
        names: &["CHAR", "CHARACTER", "NCHAR", "BPCHAR"],
        targets: &["CHAR", "NCHAR", "TEXT"],
        increment: false,
    },
    TypeAlias {
        names: &[
            "TEXT",
            "TINYTEXT",
            "MEDIUMTEXT",
            "LONGTEXT",
            "NTEXT",
            "CLOB",
            "NCLOB",
        ],
        targets: &["TEXT", "CLOB", "NVARCHAR(MAX)"],
        increment: false,
    },
    TypeAlias {
        names: &[
            "BLOB",
            "TINYBLOB",
            "MEDIUMBLOB",
            "LONGBLOB",
            "BYTEA",
            "IMAGE",
            "VARBINARY",
            "BINARY",
            "RAW",
        ],
        targets: &["BLOB", "BYTEA", "VARBINARY(MAX)"],
        increment: false,
    },
    TypeAlias {
        names: &["DATETIME", "DATETIME2", "SMALLDATETIME", "TIMESTAMP WITHOUT TIME ZONE"],
        targets: &["DATETIME", "DATETIME2", "TIMESTAMP"],
        increment: false,
    },
    TypeAlias {
        names: &["TIMESTAMP"],
        targets: &["TIMESTAMP", "DATETIME2", "DATETIME"],
        increment: false,
    },
    TypeAlias {
        names: &["TIMESTAMPTZ", "TIMESTAMP WITH TIME ZONE", "DATETIMEOFFSET"],
        targets: &[
            "TIMESTAMPTZ",
            "TIMESTAMP WITH TIME ZONE",
            "DATETIMEOFFSET",
            "TIMESTAMP",
            "DATETIME",
        ],
        increment: false,
    },
    TypeAlias {
        names: &["TIME", "TIMETZ", "TIME WITH TIME ZONE"],
        targets: &["TIME", "TIMESTAMP"],
        increment: false,
    },
    TypeAlias {
        names: &["YEAR"],
        targets: &["YEAR", "SMALLINT", "INTEGER", "NUMBER(4)"],
        increment: false,
    },
    TypeAlias {
        names: &["JSON", "JSONB"],
        targets: &["JSON", "JSONB", "NVARCHAR(MAX)", "TEXT", "CLOB"],
        increment: false,
    },
    TypeAlias {
        names: &["UUID", "UNIQUEIDENTIFIER"],
        targets: &["UUID", "UNIQUEIDENTIFIER", "CHAR(36)"],
        increment: false,
    },
    TypeAlias {
        names: &["XML", "XMLTYPE"],
        targets: &["XML", "XMLTYPE", "TEXT", "CLOB"],
        increment: false,
    },
];

/// A declared column type split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    /// Upper-cased base name with whitespace collapsed, e.g. `DOUBLE PRECISION`
    pub base: String,
    /// Argument text without parentheses or spaces, e.g. `10,2`
    pub size: Option<String>,
    pub unsigned: bool,
}

/// Split a rendered type such as `INT(10) UNSIGNED` or
/// `TIMESTAMP(3) WITH TIME ZONE` into base name, size and signedness
pub fn split_type(declared: &str) -> DeclaredType {
    let mut words: Vec<String> = Vec::new();
    let mut size = None;
    let mut rest = declared.trim();

    if let (Some(open), Some(close)) = (rest.find('('), rest.rfind(')')) {
        if open < close {
            let inner: String = rest[open + 1..close]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if !inner.is_empty() {
                size = Some(inner);
            }
            words.extend(rest[..open].split_whitespace().map(str::to_uppercase));
            rest = &rest[close + 1..];
        }
    }
    words.extend(rest.split_whitespace().map(str::to_uppercase));

    let unsigned = words.iter().any(|w| w == "UNSIGNED");
    words.retain(|w| w != "UNSIGNED" && w != "SIGNED" && w != "ZEROFILL");

    DeclaredType {
        base: words.join(" "),
        size,
        unsigned,
    }
}

/// How a type reached the target dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The type is native to the target
    Exact,
    /// Mapped through an equivalence class
    Alias,
    /// Unknown to the target; replaced by its generic text type
    Fallback,
}

/// A type resolved against a target dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub name: String,
    pub size: Option<String>,
    /// The source type implies auto-increment (`SERIAL` and friends)
    pub increment: bool,
    pub resolution: Resolution,
}

impl ResolvedType {
    /// Render as `NAME` or `NAME(size)`
    pub fn render(&self) -> String {
        match &self.size {
            Some(size) => format!("{}({})", self.name, size),
            None => self.name.clone(),
        }
    }
}

fn keep_size(spec: &TypeSpec, size: Option<&str>) -> Option<String> {
    if spec.takes_size() {
        size.or(spec.default_size).map(str::to_string)
    } else {
        None
    }
}

/// Resolve `base(size)` against `target`: native types pass through, known
/// equivalents are mapped, anything else becomes the target's text type with
/// its size dropped.
pub fn resolve_type(target: &DialectDescriptor, base: &str, size: Option<&str>) -> ResolvedType {
    let base = base.trim().to_uppercase();

    if let Some(spec) = target.type_spec(&base) {
        return ResolvedType {
            name: spec.name.to_string(),
            size: keep_size(spec, size),
            increment: false,
            resolution: Resolution::Exact,
        };
    }

    if let Some(alias) = ALIASES.iter().find(|a| a.names.contains(&base.as_str())) {
        for candidate in alias.targets {
            let pinned = split_type(candidate);
            if let Some(spec) = target.type_spec(&pinned.base) {
                let size = match pinned.size {
                    Some(pinned) => Some(pinned),
                    None => keep_size(spec, size),
                };
                return ResolvedType {
                    name: spec.name.to_string(),
                    size,
                    increment: alias.increment,
                    resolution: Resolution::Alias,
                };
            }
        }
    }

    ResolvedType {
        name: target.text_fallback.name.to_string(),
        size: target.text_fallback.size.map(str::to_string),
        increment: false,
        resolution: Resolution::Fallback,
    }
}

/// Reinterpret dialect-specific spellings before mapping to another dialect,
/// e.g. MySQL `TINYINT(1)` and SQL Server `BIT` are booleans.
pub fn source_semantics(source: Dialect, declared: DeclaredType) -> DeclaredType {
    let boolean = match source {
        Dialect::MySql | Dialect::MariaDb => {
            declared.base == "TINYINT" && declared.size.as_deref() == Some("1")
        }
        Dialect::MsSql => declared.base == "BIT",
        _ => false,
    };
    if boolean {
        DeclaredType {
            base: "BOOLEAN".to_string(),
            size: None,
            unsigned: false,
        }
    } else {
        declared
    }
}
