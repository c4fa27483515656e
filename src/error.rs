// error.rs
// Error taxonomy shared by the config, db and dump modules.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    /// Missing or invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The database could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The catalog listing query failed.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// No tables matched the catalog/schema filters.
    #[error("no tables matching catalog={catalog:?} schema={schema:?}")]
    CatalogEmpty { catalog: String, schema: String },

    /// A column's declared type has no rendering rule.
    #[error("unsupported type: {column}, {type_name}, {code}")]
    UnsupportedType {
        column: String,
        type_name: String,
        code: i32,
    },

    /// A decoded cell does not match its column's declared type.
    #[error("column {column} declared {declared} holds a {found} value")]
    ValueMismatch {
        column: String,
        declared: String,
        found: String,
    },

    /// The row cursor failed, or a cell could not be decoded/rendered.
    #[error("failed to fetch rows of {table}: {message}")]
    RowFetch { table: String, message: String },

    /// The output sink failed.
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),
}

impl DumpError {
    /// Errors scoped to one table; the walk records them and moves on.
    pub fn is_table_scoped(&self) -> bool {
        matches!(
            self,
            DumpError::UnsupportedType { .. } | DumpError::ValueMismatch { .. } | DumpError::RowFetch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DumpError>;
