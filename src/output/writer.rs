//! CSV file writer
//!
//! Tables are written to a temporary file inside the target directory and
//! renamed into place once complete.

use crate::error::{Error, Result};
use crate::project::Table;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Writes tables as `{output_dir}/{stem}.csv`
#[derive(Debug, Clone)]
pub struct CsvWriter {
    output_dir: PathBuf,
}

impl CsvWriter {
    /// Create a writer targeting `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory files are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a table with this stem would be written to
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.csv"))
    }

    /// Write a table, replacing any existing file.
    ///
    /// Returns `None` without touching the filesystem when the table has
    /// no rows.
    pub fn write(&self, stem: &str, table: &Table) -> Result<Option<PathBuf>> {
        let path = self.path_for(stem);
        if table.is_empty() {
            info!("No rows to write for {}", path.display());
            return Ok(None);
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::output(format!(
                "Failed to create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let mut temp = NamedTempFile::new_in(&self.output_dir)?;
        write_table(temp.as_file_mut(), table)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| {
            Error::output(format!("Failed to move CSV into {}: {}", path.display(), e.error))
        })?;

        info!("Wrote {} rows to {}", table.len(), path.display());
        Ok(Some(path))
    }
}

/// Serialize a table (header first) into any writer
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&table.columns)?;
    for row in &table.rows {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}
