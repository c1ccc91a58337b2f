use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::data::record::Record;
use crate::export::artifact::{ExportArtifact, ExportFormat};
use crate::export::csv_export::{records_to_csv, records_to_csv_with_columns};
use crate::export::pdf::{PdfDocument, PdfStyle, Rgb, StandardFont, TableSpec};
use crate::export::{project_rows, ExportColumn};

/// Caption timestamp layout, e.g. `7/20/2025, 3:04:05 PM`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const MARGIN_X_MM: f64 = 14.0;
const TITLE_SIZE: f64 = 18.0;
const CAPTION_SIZE: f64 = 10.0;

/// Turns record collections into downloadable CSV and PDF artifacts
#[derive(Debug, Clone)]
pub struct DataExporter {
    style: PdfStyle,
    timestamp_format: String,
}

impl Default for DataExporter {
    fn default() -> Self {
        Self::new(PdfStyle::default())
    }
}

impl DataExporter {
    pub fn new(style: PdfStyle) -> Self {
        Self {
            style,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn style(&self) -> &PdfStyle {
        &self.style
    }

    /// `Generated: <local timestamp>`
    pub fn generated_caption(&self, generated_at: DateTime<Local>) -> String {
        format!("Generated: {}", generated_at.format(&self.timestamp_format))
    }

    /// Export every field of every record as CSV
    pub fn export_csv(&self, records: &[Record], base_name: &str, now: DateTime<Local>) -> Result<ExportArtifact> {
        let text = records_to_csv(records).context("Failed to build CSV export")?;
        let artifact = ExportArtifact::new(base_name, ExportFormat::Csv, now.date_naive(), text.into_bytes());
        info!("Prepared {} ({} rows)", artifact.file_name, records.len());
        Ok(artifact)
    }

    /// Render records as a titled table document. The header row comes from
    /// the mapping, so an empty collection still yields title, caption and header.
    pub fn records_to_pdf<'a>(
        &self,
        records: impl IntoIterator<Item = &'a Record>,
        columns: &[ExportColumn],
        title: Option<&str>,
        generated_at: DateTime<Local>,
    ) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(self.style.clone());
        if let Some(title) = title {
            doc = doc.with_title(title);
            doc.text(MARGIN_X_MM, 20.0, TITLE_SIZE, Rgb::gray(40), StandardFont::Helvetica, title);
        }

        let (caption_y, table_y) = if title.is_some() { (30.0, 35.0) } else { (20.0, 25.0) };
        let caption = self.generated_caption(generated_at);
        doc.text(MARGIN_X_MM, caption_y, CAPTION_SIZE, Rgb::gray(100), StandardFont::Helvetica, &caption);

        let spec = TableSpec::new(
            columns.iter().map(|c| c.header.clone()).collect(),
            project_rows(records, columns),
        );
        debug!("Laying out PDF table with {} rows", spec.body.len());
        doc.table(table_y, &spec);

        doc.to_bytes().context("Failed to serialize PDF export")
    }

    /// Export through a column mapping in either format
    pub fn export_records(
        &self,
        records: &[Record],
        columns: &[ExportColumn],
        base_name: &str,
        format: ExportFormat,
        title: Option<&str>,
        now: DateTime<Local>,
    ) -> Result<ExportArtifact> {
        let bytes = match format {
            ExportFormat::Csv => records_to_csv_with_columns(records, columns)
                .context("Failed to build CSV export")?
                .into_bytes(),
            ExportFormat::Pdf => self.records_to_pdf(records, columns, title, now)?,
        };
        let artifact = ExportArtifact::new(base_name, format, now.date_naive(), bytes);
        info!(
            "Prepared {} ({} rows, {} bytes)",
            artifact.file_name,
            records.len(),
            artifact.bytes.len()
        );
        Ok(artifact)
    }
}
