// export/exporter.rs
// Writes the run report next to the dump, as JSON or YAML.

use crate::dump::report::DumpReport;
use anyhow::{anyhow, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct ReportExporter;

impl ReportExporter {
    pub fn render(&self, report: &DumpReport, format: &str) -> Result<String> {
        Ok(match format {
            "json" => serde_json::to_string_pretty(report)?,
            "yaml" | "yml" => serde_yaml::to_string(report)?,
            _ => return Err(anyhow!("Unsupported report format: '{}'. Supported formats: json, yaml", format)),
        })
    }

    pub fn export_report_to_file(&self, report: &DumpReport, output_file: &Path, format: &str) -> Result<()> {
        let serialized = self.render(report, format)?;
        let mut file = File::create(output_file)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }
}
