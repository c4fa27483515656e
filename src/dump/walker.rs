// dump/walker.rs
// Walks the catalog and dumps every retained table in listing order.

use super::report::{DumpReport, TableError, TableReport};
use super::table::dump_table;
use super::writer::DumpWriter;
use crate::config::DumpConfig;
use crate::db::accessors::DatabaseAccessor;
use crate::db::models::TableSpec;
use crate::error::{DumpError, Result};
use std::io::Write;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub tables_to_upper: bool,
    pub tables_to_skip: Vec<String>,
}

impl From<&DumpConfig> for WalkOptions {
    fn from(config: &DumpConfig) -> Self {
        Self {
            catalog: config.catalog().map(str::to_string),
            schema: config.schema().map(str::to_string),
            tables_to_upper: config.tables_to_upper(),
            tables_to_skip: config.tables_to_skip.clone(),
        }
    }
}

impl WalkOptions {
    /// Name as it appears in the dump and in the skip-list comparison.
    pub fn fold(&self, name: &str) -> String {
        if self.tables_to_upper {
            name.to_uppercase()
        } else {
            name.to_string()
        }
    }

    pub fn skips(&self, folded: &str) -> bool {
        self.tables_to_skip.iter().any(|s| s == folded)
    }
}

/// Table-scoped failures are recorded in `report` and the walk goes on;
/// anything else (listing failure, write error) ends it.
pub async fn walk<W: Write>(
    accessor: &dyn DatabaseAccessor,
    options: &WalkOptions,
    out: &mut DumpWriter<W>,
    report: &mut DumpReport,
) -> Result<()> {
    let entries: Vec<_> = accessor
        .list_tables(options.catalog.as_deref(), options.schema.as_deref())
        .await?
        .into_iter()
        .filter(|e| e.is_table())
        .collect();

    if entries.is_empty() {
        let empty = DumpError::CatalogEmpty {
            catalog: options.catalog.clone().unwrap_or_default(),
            schema: options.schema.clone().unwrap_or_default(),
        };
        warn!("{}", empty);
        report.empty_catalog = true;
        return Ok(());
    }

    for entry in entries {
        let name = options.fold(&entry.name);
        if options.skips(&name) {
            info!("Skipping TABLE: {}", name);
            report.skipped.push(name);
            continue;
        }

        info!("Dumping TABLE: {}", name);
        let result = match accessor.columns_of(&entry).await {
            Ok(columns) => {
                let table = TableSpec {
                    select: accessor.select_statement(&entry, &columns),
                    name: name.clone(),
                    source: entry,
                    columns,
                };
                dump_table(accessor, &table, out).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(rows) => {
                info!(table = %name, rows, "table dumped");
                report.tables.push(TableReport { name, rows });
            }
            Err(e) if e.is_table_scoped() => {
                error!("Failed to dump table {}: {}", name, e);
                report.errors.push(TableError {
                    table: name,
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
