// dump/mod.rs
// Turns table contents into TRUNCATE + INSERT statements.

pub mod render;
pub mod report;
pub mod row;
pub mod table;
pub mod walker;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

use crate::db::accessors::DatabaseAccessor;
use crate::error::Result;
use chrono::Local;
use report::DumpReport;
use std::io::Write;
use walker::{walk, WalkOptions};
use writer::{stamp, DumpWriter};

/// Writes the complete dump document: header, every table, footer.
pub async fn run<W: Write>(
    accessor: &dyn DatabaseAccessor,
    options: &WalkOptions,
    out: &mut DumpWriter<W>,
) -> Result<DumpReport> {
    let generated = Local::now();
    out.header(&generated)?;
    let mut report = DumpReport::new(stamp(&generated));

    walk(accessor, options, out, &mut report).await?;

    let done = Local::now();
    out.footer(&done)?;
    report.finished_at = Some(stamp(&done));
    Ok(report)
}
