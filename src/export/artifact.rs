use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(anyhow!("Unknown export format '{}'", other)),
        }
    }
}

/// `<base>_<YYYY-MM-DD>.<ext>`
pub fn export_file_name(base_name: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        base_name,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// A finished export, ready to hand to a download surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(base_name: &str, format: ExportFormat, date: NaiveDate, bytes: Vec<u8>) -> Self {
        Self {
            file_name: export_file_name(base_name, format, date),
            format,
            bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Where finished exports go
pub trait DownloadSink {
    /// Deliver the artifact and return where it landed
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<PathBuf>;
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create export directory {}", self.dir.display()))?;

        let target = self.dir.join(&artifact.file_name);
        let partial = PartialFile::new(self.dir.join(format!("{}.part", artifact.file_name)));

        fs::write(partial.path(), &artifact.bytes)
            .with_context(|| format!("Failed to write {}", partial.path().display()))?;
        partial.persist(&target)?;

        info!(
            "Exported {} ({} bytes, {})",
            target.display(),
            artifact.bytes.len(),
            artifact.mime_type()
        );
        Ok(target)
    }
}

/// Transient file that is removed on drop unless persisted
struct PartialFile {
    path: PathBuf,
    persisted: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn persist(mut self, target: &Path) -> Result<()> {
        fs::rename(&self.path, target)
            .with_context(|| format!("Failed to move export into {}", target.display()))?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.persisted || !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed partial export {}", self.path.display()),
            Err(e) => warn!(
                "Could not remove partial export {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
