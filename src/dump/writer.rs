// dump/writer.rs
// Append-only sink for the dump text, with the header and footer lines.

use crate::error::Result;
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct DumpWriter<W: Write> {
    sink: W,
    bytes: u64,
}

impl DumpWriter<BufWriter<File>> {
    /// Creates (or truncates) the output file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> DumpWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, bytes: 0 }
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.sink.write_all(text.as_bytes())?;
        self.bytes += text.len() as u64;
        Ok(())
    }

    pub fn header<Tz: TimeZone>(&mut self, at: &DateTime<Tz>) -> Result<()>
    where
        Tz::Offset: fmt::Display,
    {
        self.write_str(&format!("-- Generated: {}", stamp(at)))
    }

    pub fn footer<Tz: TimeZone>(&mut self, at: &DateTime<Tz>) -> Result<()>
    where
        Tz::Offset: fmt::Display,
    {
        self.write_str(&format!("\n-- DONE: {}\n", stamp(at)))
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flushes and hands back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// `dd/Mon/yyyy HH:MM:SS.mmm`
pub fn stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%d/%b/%Y %H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn stamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 2, 9, 14, 3, 5).unwrap() + chrono::Duration::milliseconds(7);
        assert_eq!(stamp(&at), "09/Feb/2024 14:03:05.007");
    }

    #[test]
    fn header_and_footer_bracket_the_text() {
        let at = Utc.with_ymd_and_hms(2024, 2, 9, 14, 3, 5).unwrap();
        let mut writer = DumpWriter::new(Vec::new());
        writer.header(&at).unwrap();
        writer.write_str("\n\n-- Data for t\n").unwrap();
        writer.footer(&at).unwrap();
        let written = writer.bytes_written();
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(written as usize, text.len());
        assert_eq!(
            text,
            "-- Generated: 09/Feb/2024 14:03:05.000\n\n-- Data for t\n\n-- DONE: 09/Feb/2024 14:03:05.000\n"
        );
    }

    #[test]
    fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.sql");
        std::fs::write(&path, "stale content from an earlier run").unwrap();
        let mut writer = DumpWriter::create(&path).unwrap();
        writer.write_str("fresh").unwrap();
        writer.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh");
    }
}
