// dump/render.rs
// Renders one cell as a SQL literal for an INSERT statement.

use crate::db::models::{ColumnDescriptor, SqlType, SqlValue};
use crate::error::{DumpError, Result};
use chrono::{NaiveDateTime, Timelike};

pub const NULL: &str = "NULL";

/// Literal text for `value` in a column declared as `column.sql_type`.
///
/// | tag                          | output                      |
/// |------------------------------|-----------------------------|
/// | any, NULL value              | `NULL`                      |
/// | INTEGER/BIGINT/SMALLINT/TINYINT | decimal digits           |
/// | BIT/BOOLEAN                  | `1` or `0`                  |
/// | BINARY                       | `X'<uppercase hex>'`        |
/// | TIMESTAMP                    | `'YYYY-MM-DD HH:MM:SS.f'`, NULL for non-temporal values |
/// | CHAR/VARCHAR                 | escaped, in double quotes   |
/// | DATE/TIME/BLOB/CLOB          | `NULL`                      |
/// | anything else                | `UnsupportedType` error     |
pub fn render(column: &ColumnDescriptor, value: &SqlValue) -> Result<String> {
    if let SqlValue::Null = value {
        return Ok(NULL.to_string());
    }
    match (&column.sql_type, value) {
        (SqlType::Integer, SqlValue::Int(v)) => Ok(v.to_string()),
        (SqlType::BigInt, SqlValue::BigInt(v)) => Ok(v.to_string()),
        (SqlType::SmallInt, SqlValue::SmallInt(v)) => Ok(v.to_string()),
        (SqlType::TinyInt, SqlValue::TinyInt(v)) => Ok(v.to_string()),
        (SqlType::Integer | SqlType::BigInt | SqlType::SmallInt | SqlType::TinyInt, SqlValue::Unsigned(v)) => {
            Ok(v.to_string())
        }
        (SqlType::Bit | SqlType::Boolean, SqlValue::Bool(b)) => Ok(if *b { "1" } else { "0" }.to_string()),
        (SqlType::Binary, SqlValue::Bytes(bytes)) => Ok(format!("X'{}'", hex::encode_upper(bytes))),
        (SqlType::Timestamp, SqlValue::Timestamp(ts)) => Ok(format!("'{}'", timestamp_text(ts))),
        (SqlType::Timestamp, _) => Ok(NULL.to_string()),
        (SqlType::Char | SqlType::Varchar, SqlValue::Text(s)) => Ok(format!("\"{}\"", escape_string(s))),
        (SqlType::Date | SqlType::Time | SqlType::Blob | SqlType::Clob, _) => Ok(NULL.to_string()),
        (SqlType::Other(type_name), _) => Err(DumpError::UnsupportedType {
            column: column.name.clone(),
            type_name: type_name.to_string(),
            code: column.sql_type.code(),
        }),
        (declared, other) => Err(DumpError::ValueMismatch {
            column: column.name.clone(),
            declared: declared.to_string(),
            found: other.kind().to_string(),
        }),
    }
}

/// `YYYY-MM-DD HH:MM:SS.f`: fractional seconds keep at least one digit
/// and drop trailing zeros.
pub fn timestamp_text(ts: &NaiveDateTime) -> String {
    let nanos = format!("{:09}", ts.nanosecond() % 1_000_000_000);
    let trimmed = nanos.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{}.{}", ts.format("%Y-%m-%d %H:%M:%S"), fraction)
}

/// Escapes text for a double-quoted MySQL string literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{1a}' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out
}
