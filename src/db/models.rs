// Data structures for table metadata and cell values

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared SQL type of a column, as reported by the driver metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    Bit,
    Boolean,
    Binary,
    Timestamp,
    Char,
    Varchar,
    Date,
    Time,
    Blob,
    Clob,
    /// Anything the renderer has no rule for; carries the native type name.
    Other(String),
}

impl SqlType {
    /// JDBC (`java.sql.Types`) code for the tag.
    pub fn code(&self) -> i32 {
        match self {
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::SmallInt => 5,
            SqlType::TinyInt => -6,
            SqlType::Bit => -7,
            SqlType::Boolean => 16,
            SqlType::Binary => -2,
            SqlType::Timestamp => 93,
            SqlType::Char => 1,
            SqlType::Varchar => 12,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Other(_) => 1111,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::TinyInt => "TINYINT",
            SqlType::Bit => "BIT",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Binary => "BINARY",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::Other(name) => name,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub sql_type: SqlType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self { name: name.into(), sql_type }
    }
}

/// A decoded cell. The variant follows the column's tag.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i32),
    BigInt(i64),
    SmallInt(i16),
    TinyInt(i8),
    /// Integer from an UNSIGNED column; fits any integer tag.
    Unsigned(u64),
    Bool(bool),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl SqlValue {
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Int(_) => "int",
            SqlValue::BigInt(_) => "bigint",
            SqlValue::SmallInt(_) => "smallint",
            SqlValue::TinyInt(_) => "tinyint",
            SqlValue::Unsigned(_) => "unsigned",
            SqlValue::Bool(_) => "bool",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Text(_) => "text",
        }
    }
}

pub type Row = Vec<SqlValue>;

/// One entry of the catalog listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub schema: Option<String>,
    pub name: String,
    pub kind: String,
}

impl TableEntry {
    pub fn is_table(&self) -> bool {
        self.kind.eq_ignore_ascii_case("TABLE")
    }
}

/// A table ready to be dumped: columns are captured once, before any row.
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Name written into the dump (after case folding).
    pub name: String,
    /// Catalog entry used to query the database.
    pub source: TableEntry,
    pub columns: Vec<ColumnDescriptor>,
    /// Engine-specific statement reading `columns` in order.
    pub select: String,
}
