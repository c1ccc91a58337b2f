//! Field-matching filters used by the dashboard pages
//!
//! The table view never filters; pages run records through a
//! [`RecordFilter`] and hand the matching collection to the view.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::data::record::Record;

/// Current filter inputs keyed by filter name. Empty values are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterValues {
    values: BTreeMap<String, String>,
}

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value for `name`, or `""` when unset
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// True when any filter has a non-empty value
    pub fn is_active(&self) -> bool {
        self.values.values().any(|v| !v.is_empty())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

pub trait RecordFilter {
    fn matches(&self, record: &Record, values: &FilterValues) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring match against any of the fields
    Search { fields: Vec<String> },
    /// Exact match
    Equals { field: String },
    /// Case-sensitive substring match, e.g. "Failed" matches "Failed Login"
    Contains { field: String },
    /// Record date on or after the filter date
    DateFrom { field: String },
    /// Record date on or before the filter date
    DateTo { field: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub name: String,
    pub kind: FilterKind,
}

impl FilterRule {
    pub fn search(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: FilterKind::Search {
                fields: fields.iter().map(|f| f.to_string()).collect(),
            },
        }
    }

    pub fn equals(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FilterKind::Equals {
                field: field.into(),
            },
        }
    }

    pub fn contains(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FilterKind::Contains {
                field: field.into(),
            },
        }
    }

    pub fn date_from(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FilterKind::DateFrom {
                field: field.into(),
            },
        }
    }

    pub fn date_to(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FilterKind::DateTo {
                field: field.into(),
            },
        }
    }

    fn matches(&self, record: &Record, input: &str) -> bool {
        if input.is_empty() {
            return true;
        }

        match &self.kind {
            FilterKind::Search { fields } => {
                let needle = input.to_lowercase();
                fields
                    .iter()
                    .any(|f| record.display_value(f).to_lowercase().contains(&needle))
            }
            FilterKind::Equals { field } => record.display_value(field) == input,
            FilterKind::Contains { field } => record.display_value(field).contains(input),
            FilterKind::DateFrom { field } => {
                match (parse_date(&record.display_value(field)), parse_date(input)) {
                    (Some(date), Some(bound)) => date >= bound,
                    _ => false,
                }
            }
            FilterKind::DateTo { field } => {
                match (parse_date(&record.display_value(field)), parse_date(input)) {
                    (Some(date), Some(bound)) => date <= bound,
                    _ => false,
                }
            }
        }
    }
}

/// Parse `YYYY-MM-DD`, or the date prefix of a timestamp such as
/// `2024-12-23 14:32:10` / `2024-12-23T14:32:10Z`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let prefix = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// The simple field-matching evaluator: every active rule must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    rules: Vec<FilterRule>,
}

impl FieldFilter {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }
}

impl RecordFilter for FieldFilter {
    fn matches(&self, record: &Record, values: &FilterValues) -> bool {
        self.rules
            .iter()
            .all(|rule| rule.matches(record, values.get(&rule.name)))
    }
}

/// Collect the records accepted by `filter`
pub fn apply_filter<F: RecordFilter + ?Sized>(
    records: &[Record],
    filter: &F,
    values: &FilterValues,
) -> Vec<Record> {
    records
        .iter()
        .filter(|record| filter.matches(record, values))
        .cloned()
        .collect()
}
