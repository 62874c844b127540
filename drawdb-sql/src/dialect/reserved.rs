//! Reserved words that force identifier quoting

/// Reserved in every supported dialect
pub(super) const COMMON: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE",
    "EXISTS", "FOR", "FOREIGN", "FROM", "GRANT", "GROUP", "HAVING", "IN", "INDEX", "INNER",
    "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "NOT", "NULL", "ON", "OR", "ORDER",
    "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "UNION", "UNIQUE",
    "UPDATE", "VALUES", "WHEN", "WHERE", "WITH",
];

pub(super) const MYSQL: &[&str] = &[
    "ANALYZE", "CHANGE", "CONDITION", "DATABASE", "DATABASES", "DELAYED", "DESCRIBE", "DIV",
    "DUAL", "EXPLAIN", "FULLTEXT", "GENERATED", "IGNORE", "INTERVAL", "KEYS", "KILL", "LIMIT",
    "LINES", "LOAD", "LOCK", "MATCH", "MOD", "OPTION", "RANGE", "READ", "REGEXP", "RENAME",
    "REPLACE", "REQUIRE", "RLIKE", "SCHEMA", "SHOW", "SPATIAL", "STRAIGHT_JOIN", "TRIGGER",
    "UNSIGNED", "USAGE", "USE", "USING", "WRITE", "XOR", "ZEROFILL",
];

pub(super) const POSTGRES: &[&str] = &[
    "ANALYSE", "ANALYZE", "ANY", "ARRAY", "ASYMMETRIC", "BOTH", "CAST", "COLLATE", "CURRENT_DATE",
    "CURRENT_ROLE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER", "DEFERRABLE", "DO",
    "END", "EXCEPT", "FALSE", "FETCH", "INITIALLY", "INTERSECT", "LATERAL", "LEADING", "LIMIT",
    "LOCALTIME", "LOCALTIMESTAMP", "OFFSET", "ONLY", "PLACING", "RETURNING", "SESSION_USER",
    "SOME", "SYMMETRIC", "TRAILING", "TRUE", "USER", "USING", "VARIADIC", "WINDOW",
];

pub(super) const SQLITE: &[&str] = &[
    "ABORT", "ACTION", "AFTER", "ATTACH", "AUTOINCREMENT", "BEFORE", "BEGIN", "CASCADE",
    "COLLATE", "COMMIT", "CONFLICT", "DEFERRABLE", "DETACH", "EACH", "END", "ESCAPE", "EXCEPT",
    "EXCLUSIVE", "FAIL", "GLOB", "IMMEDIATE", "INDEXED", "INSTEAD", "INTERSECT", "ISNULL",
    "LIMIT", "NOTNULL", "OFFSET", "PLAN", "PRAGMA", "QUERY", "RAISE", "REINDEX", "RELEASE",
    "RENAME", "REPLACE", "ROLLBACK", "ROW", "SAVEPOINT", "TEMP", "TEMPORARY", "TRANSACTION",
    "TRIGGER", "VACUUM", "VIEW", "VIRTUAL",
];

pub(super) const MSSQL: &[&str] = &[
    "BACKUP", "BEGIN", "BREAK", "BROWSE", "BULK", "CASCADE", "CLUSTERED", "COMMIT", "COMPUTE",
    "CONTAINS", "CONTINUE", "CURRENT", "CURSOR", "DATABASE", "DBCC", "DECLARE", "DENY", "DISK",
    "DUMP", "END", "ERRLVL", "ESCAPE", "EXCEPT", "EXEC", "EXECUTE", "EXIT", "FILE", "FILLFACTOR",
    "FUNCTION", "GOTO", "HOLDLOCK", "IDENTITY", "IDENTITY_INSERT", "IF", "INTERSECT", "KILL",
    "LINENO", "MERGE", "NOCHECK", "NONCLUSTERED", "OFF", "OPEN", "OVER", "PERCENT", "PLAN",
    "PRINT", "PROC", "PROCEDURE", "PUBLIC", "RAISERROR", "READ", "RESTORE", "RETURN", "REVOKE",
    "ROLLBACK", "ROWCOUNT", "RULE", "SAVE", "SCHEMA", "SHUTDOWN", "STATISTICS", "TOP", "TRAN",
    "TRANSACTION", "TRIGGER", "TRUNCATE", "USER", "USE", "VIEW", "WAITFOR", "WHILE",
];

pub(super) const ORACLE: &[&str] = &[
    "ACCESS", "AUDIT", "CLUSTER", "COMMENT", "COMPRESS", "CONNECT", "CURRENT", "DATE", "DECIMAL",
    "EXCLUSIVE", "FILE", "FLOAT", "IDENTIFIED", "IMMEDIATE", "INCREMENT", "INITIAL", "INTEGER",
    "INTERSECT", "LEVEL", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MODE", "MODIFY", "NOAUDIT",
    "NOCOMPRESS", "NOWAIT", "NUMBER", "OF", "OFFLINE", "ONLINE", "OPTION", "PCTFREE", "PRIOR",
    "PUBLIC", "RAW", "RENAME", "RESOURCE", "ROW", "ROWID", "ROWNUM", "ROWS", "SESSION", "SHARE",
    "SIZE", "SMALLINT", "START", "SYNONYM", "SYSDATE", "TRIGGER", "UID", "USER", "VALIDATE",
    "VARCHAR", "VARCHAR2", "VIEW", "WHENEVER",
];
