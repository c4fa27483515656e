// dump/row.rs
// Builds one INSERT statement per row.

use super::render::render;
use crate::db::models::{ColumnDescriptor, SqlValue};
use crate::error::{DumpError, Result};

/// `INSERT INTO <table> (<c1>, <c2>) VALUES (<v1>, <v2>);\n`
///
/// Fails on the first cell that cannot be rendered; nothing partial is returned.
pub fn serialize_row(table: &str, column_list: &str, columns: &[ColumnDescriptor], row: &[SqlValue]) -> Result<String> {
    if row.len() != columns.len() {
        return Err(DumpError::RowFetch {
            table: table.to_string(),
            message: format!("row has {} values for {} columns", row.len(), columns.len()),
        });
    }
    let values = columns
        .iter()
        .zip(row)
        .map(|(column, value)| render(column, value))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({});\n",
        table,
        column_list,
        values.join(", ")
    ))
}

/// Column names joined the way the INSERT statements list them.
pub fn column_list(columns: &[ColumnDescriptor]) -> String {
    columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
}
