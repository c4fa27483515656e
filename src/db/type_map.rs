// db/type_map.rs
// Maps native column type names to the SqlType tags the renderer dispatches on.

use super::models::SqlType;

/// `data_type` values from PostgreSQL's `information_schema.columns`.
pub fn postgres_type(data_type: &str) -> SqlType {
    let t = data_type.to_lowercase();
    match t.as_str() {
        "integer" | "int" | "int4" | "serial" => SqlType::Integer,
        "bigint" | "int8" | "bigserial" => SqlType::BigInt,
        "smallint" | "int2" | "smallserial" => SqlType::SmallInt,
        "\"char\"" => SqlType::TinyInt,
        // the JDBC driver reports bool columns as BIT
        "boolean" | "bool" => SqlType::Bit,
        "bytea" => SqlType::Binary,
        "timestamp" | "timestamp without time zone" | "timestamp with time zone" | "timestamptz" => {
            SqlType::Timestamp
        }
        "character" | "char" | "bpchar" => SqlType::Char,
        "character varying" | "varchar" | "text" | "name" | "citext" => SqlType::Varchar,
        "date" => SqlType::Date,
        "time" | "time without time zone" | "time with time zone" | "timetz" => SqlType::Time,
        "oid" | "lo" => SqlType::Blob,
        _ => SqlType::Other(data_type.to_string()),
    }
}

/// `data_type` and `column_type` from MySQL's `information_schema.columns`.
/// Unsigned integers are widened and `tinyint(1)` is a bit, the way
/// Connector/J reports them.
pub fn mysql_type(data_type: &str, column_type: &str) -> SqlType {
    let t = data_type.to_lowercase();
    let full = column_type.to_lowercase();
    let unsigned = full.contains("unsigned");
    match t.as_str() {
        "tinyint" if full.starts_with("tinyint(1)") => SqlType::Bit,
        "tinyint" if unsigned => SqlType::SmallInt,
        "smallint" | "mediumint" if unsigned => SqlType::Integer,
        "int" | "integer" if unsigned => SqlType::BigInt,
        "int" | "integer" | "mediumint" => SqlType::Integer,
        "bigint" => SqlType::BigInt,
        "smallint" => SqlType::SmallInt,
        "tinyint" => SqlType::TinyInt,
        "bit" => SqlType::Bit,
        "bool" | "boolean" => SqlType::Boolean,
        "binary" | "varbinary" => SqlType::Binary,
        "timestamp" | "datetime" => SqlType::Timestamp,
        "char" => SqlType::Char,
        "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum" | "set" => SqlType::Varchar,
        "date" => SqlType::Date,
        "time" => SqlType::Time,
        "tinyblob" | "blob" | "mediumblob" | "longblob" => SqlType::Blob,
        _ => SqlType::Other(data_type.to_string()),
    }
}

/// Declared types from `PRAGMA table_info`, which SQLite does not restrict,
/// so matching follows its column affinity rules.
pub fn sqlite_type(declared: &str) -> SqlType {
    let t = declared.to_uppercase();
    if t.is_empty() {
        // no declared type: cells keep whatever storage class they were given
        SqlType::Other(String::new())
    } else if t.contains("INT") {
        if t.starts_with("TINYINT") {
            SqlType::TinyInt
        } else if t.starts_with("SMALLINT") {
            SqlType::SmallInt
        } else {
            SqlType::BigInt
        }
    } else if t.contains("BOOL") {
        SqlType::Boolean
    } else if t.contains("CLOB") {
        SqlType::Clob
    } else if t.contains("CHAR") || t.contains("TEXT") {
        SqlType::Varchar
    } else if t.contains("BLOB") {
        SqlType::Binary
    } else if t.contains("TIMESTAMP") || t.contains("DATETIME") {
        SqlType::Timestamp
    } else if t.contains("DATE") {
        SqlType::Date
    } else if t.contains("TIME") {
        SqlType::Time
    } else {
        SqlType::Other(declared.to_string())
    }
}
