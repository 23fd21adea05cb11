//! CSV file writer
//!
//! Writes a [`Frame`] as CSV: one header row, then one row per record.

use super::columns::Frame;
use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Configuration for the CSV writer
#[derive(Debug, Clone)]
pub struct CsvWriterConfig {
    delimiter: u8,
    include_header: bool,
    create_parent_dirs: bool,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            create_parent_dirs: true,
        }
    }
}

impl CsvWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write or skip the header row
    #[must_use]
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Create missing parent directories before writing a file
    #[must_use]
    pub fn with_create_parent_dirs(mut self, create: bool) -> Self {
        self.create_parent_dirs = create;
        self
    }

    /// Field delimiter
    #[must_use]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Whether a header row is written
    #[must_use]
    pub fn includes_header(&self) -> bool {
        self.include_header
    }
}

/// CSV writer for frames
#[derive(Debug, Clone, Default)]
pub struct CsvWriter {
    config: CsvWriterConfig,
}

impl CsvWriter {
    /// Create a writer with default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom config
    #[must_use]
    pub fn with_config(config: CsvWriterConfig) -> Self {
        Self { config }
    }

    /// Writer config
    pub fn config(&self) -> &CsvWriterConfig {
        &self.config
    }

    /// Write `frame` to any writer
    pub fn write_to<W: Write>(&self, frame: &Frame, out: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .from_writer(out);

        if self.config.include_header {
            writer.write_record(&frame.headers)?;
        }
        for row in &frame.rows {
            writer.write_record(row.iter().map(ToString::to_string))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write `frame` to a file, replacing it if present
    pub fn write_path(&self, frame: &Frame, path: &Path) -> Result<()> {
        if self.config.create_parent_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::output(format!("Failed to create {}: {e}", parent.display()))
                })?;
            }
        }

        let file = File::create(path)
            .map_err(|e| Error::output(format!("Failed to create {}: {e}", path.display())))?;
        self.write_to(frame, file)?;

        tracing::info!(path = %path.display(), rows = frame.len(), "Wrote CSV");
        Ok(())
    }

    /// Render `frame` to a string
    pub fn render(&self, frame: &Frame) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(frame, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::output(format!("CSV is not UTF-8: {e}")))
    }
}

/// `<dir>/YYYY-MM-DD.csv`
pub fn dated_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.csv", date.format("%Y-%m-%d")))
}

/// `<dir>/<today>.csv` in local time
pub fn today_path(dir: &Path) -> PathBuf {
    dated_path(dir, Local::now().date_naive())
}
