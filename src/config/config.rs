use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data::data_view::{DEFAULT_PAGE_SIZE, DEFAULT_PLACEHOLDER};
use crate::export::data_exporter::{DataExporter, DEFAULT_TIMESTAMP_FORMAT};
use crate::export::pdf::PdfStyle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table: TableConfig,
    pub export: ExportConfig,
    pub pdf: PdfStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page
    pub page_size: usize,

    /// Text shown in place of rows when the collection is empty
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exports are written; the downloads directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// chrono format for the "Generated:" caption in PDF reports
    pub timestamp_format: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl ExportConfig {
    /// Resolved output directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Config {
    /// Load from the user config file, writing defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config {}", path.display()))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("admin-tables").join("config.toml"))
    }

    /// Exporter carrying this config's PDF style and caption format
    pub fn exporter(&self) -> DataExporter {
        DataExporter::new(self.pdf.clone()).with_timestamp_format(&self.export.timestamp_format)
    }

    pub fn create_default_with_comments() -> String {
        r#"# Admin Tables Configuration File
# Location: ~/.config/admin-tables/config.toml (Linux)
#           ~/Library/Application Support/admin-tables/config.toml (macOS)
#           %APPDATA%\admin-tables\config.toml (Windows)

[table]
# Rows per page
page_size = 10

# Shown across all columns when there is nothing to display
placeholder = "No data available"

[export]
# Directory for exported files (defaults to the Downloads folder)
# output_dir = "/path/to/exports"

# Caption timestamp in PDF reports (chrono strftime syntax)
timestamp_format = "%-m/%-d/%Y, %-I:%M:%S %p"

[pdf]
# Page margin in millimetres
margin_mm = 14.0

# Table font size in points
font_size = 9.0

# Padding inside each table cell, in millimetres
cell_padding_mm = 1.8

# Line spacing multiplier for wrapped cells
line_height = 1.15

# Colours are [r, g, b]
header_fill = [79, 70, 229]
header_text = [255, 255, 255]
body_text = [20, 20, 20]
alternate_row_fill = [245, 247, 250]

[pdf.page]
# A4 portrait
width_mm = 210.0
height_mm = 297.0
"#
        .to_string()
    }
}
