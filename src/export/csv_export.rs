use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::data::record::{FieldValue, Record};
use crate::export::{project_rows, ExportColumn};

/// Field names across all records, in first-seen order
pub fn field_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for name in record.field_names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Serialize records to CSV with a header row of field names.
///
/// Records missing a field get an empty cell, and null values are empty.
/// With no records there are no field names and the output is empty.
pub fn records_to_csv(records: &[Record]) -> Result<String> {
    let headers = field_names(records);
    let rows = records.iter().map(|record| {
        headers
            .iter()
            .map(|name| match record.get(name) {
                None | Some(FieldValue::Null) => String::new(),
                Some(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
    });
    write_csv(&headers, rows)
}

/// Serialize records through an export column mapping. The header comes from
/// the mapping, so an empty record set still yields the header row.
pub fn records_to_csv_with_columns<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    columns: &[ExportColumn],
) -> Result<String> {
    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    write_csv(&headers, project_rows(records, columns))
}

/// Write a header plus rows; quoting follows RFC 4180 (fields with a
/// comma, quote or line break are quoted and quotes doubled)
pub fn write_csv<I>(headers: &[String], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    if headers.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .context("Failed to write CSV header")?;

    let mut count = 0usize;
    for row in rows {
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write CSV row {}", count + 1))?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV output: {}", e.error()))?;
    let text = String::from_utf8(bytes).context("CSV output was not valid UTF-8")?;
    tracing::debug!("Serialized {} rows to CSV", count);
    Ok(text)
}
