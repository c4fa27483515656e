// dump/report.rs
// Structured outcome of one run.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub name: String,
    pub rows: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableError {
    pub table: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DumpReport {
    pub generated_at: String,
    pub finished_at: Option<String>,
    pub output_file: Option<String>,
    pub tables: Vec<TableReport>,
    pub skipped: Vec<String>,
    pub errors: Vec<TableError>,
    pub empty_catalog: bool,
}

impl DumpReport {
    pub fn new(generated_at: String) -> Self {
        Self {
            generated_at,
            ..Default::default()
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
