//! Export pipeline: CSV and PDF serialization of record collections
//!
//! Both formats take the full collection handed to them (the filtered set,
//! not the visible page) and produce an [`artifact::ExportArtifact`] that a
//! [`artifact::DownloadSink`] delivers.

pub mod artifact;
pub mod controller;
pub mod csv_export;
pub mod data_exporter;
pub mod pdf;
pub mod reports;

use serde::{Deserialize, Serialize};

use crate::data::record::{FieldValue, Record};

/// Header/field pairing for export output, independent of the on-screen columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportColumn {
    pub header: String,
    pub data_key: String,
}

impl ExportColumn {
    pub fn new(header: impl Into<String>, data_key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            data_key: data_key.into(),
        }
    }

    /// Column whose header and data key are the same
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            header: name.clone(),
            data_key: name,
        }
    }

    /// Cell text for this column; missing or null fields give an empty cell
    pub fn cell(&self, record: &Record) -> String {
        match record.get(&self.data_key) {
            None | Some(FieldValue::Null) => String::new(),
            Some(value) => value.to_string(),
        }
    }
}

/// Project each record through the mapping, in mapping order
pub fn project_rows<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    columns: &[ExportColumn],
) -> Vec<Vec<String>> {
    records
        .into_iter()
        .map(|record| columns.iter().map(|c| c.cell(record)).collect())
        .collect()
}
