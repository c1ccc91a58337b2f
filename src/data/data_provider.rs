//! Data provider traits for abstracting data access
//!
//! Datasets are loaded once at startup and handed to pages through this
//! trait, so pages never reach for shared global state.

use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::data::record::Record;
use crate::export::reports::AnalyticsSnapshot;

/// Key of the analytics object in a provider document
pub const ANALYTICS_KEY: &str = "analytics";

/// Read-only access to named record collections
pub trait DataProvider: Send + Sync + Debug {
    /// A named dataset, shared rather than copied
    fn dataset(&self, name: &str) -> Option<Arc<Vec<Record>>>;

    /// Names of every dataset, sorted
    fn dataset_names(&self) -> Vec<String>;

    /// Analytics snapshot, if the provider carries one
    fn analytics(&self) -> Option<&AnalyticsSnapshot> {
        None
    }

    /// Number of records in a dataset, 0 if unknown
    fn record_count(&self, name: &str) -> usize {
        self.dataset(name).map(|d| d.len()).unwrap_or(0)
    }
}

/// In-memory provider, either built directly or loaded from a JSON document
/// shaped like `{ "users": [ {..}, .. ], "analytics": { .. } }`
#[derive(Debug, Clone, Default)]
pub struct StaticDataProvider {
    datasets: BTreeMap<String, Arc<Vec<Record>>>,
    analytics: Option<AnalyticsSnapshot>,
}

impl StaticDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.datasets.insert(name.into(), Arc::new(records));
        self
    }

    pub fn with_analytics(mut self, analytics: AnalyticsSnapshot) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let document: JsonValue =
            serde_json::from_str(contents).context("Failed to parse provider JSON")?;
        Self::from_json_value(document)
    }

    pub fn from_json_value(document: JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = document else {
            return Err(anyhow!("Provider document must be a JSON object"));
        };

        let mut provider = Self::new();
        for (name, value) in map {
            if name == ANALYTICS_KEY {
                let analytics: AnalyticsSnapshot = serde_json::from_value(value)
                    .context("Failed to parse analytics snapshot")?;
                provider.analytics = Some(analytics);
                continue;
            }

            let records: Vec<Record> = serde_json::from_value(value)
                .with_context(|| format!("Dataset '{}' must be an array of objects", name))?;
            debug!("Loaded dataset '{}' with {} records", name, records.len());
            provider.datasets.insert(name, Arc::new(records));
        }

        Ok(provider)
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {}", path.display()))?;
        let provider = Self::from_json_str(&contents)?;
        info!(
            "Loaded {} datasets from {}",
            provider.datasets.len(),
            path.display()
        );
        Ok(provider)
    }
}

impl DataProvider for StaticDataProvider {
    fn dataset(&self, name: &str) -> Option<Arc<Vec<Record>>> {
        self.datasets.get(name).cloned()
    }

    fn dataset_names(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    fn analytics(&self) -> Option<&AnalyticsSnapshot> {
        self.analytics.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "users": [
            {"id": "U001", "name": "Amy", "status": "Active"},
            {"id": "U002", "name": "Bob", "status": "Inactive"}
        ],
        "adminLogs": []
    }"#;

    #[test]
    fn test_load_from_json() {
        let provider = StaticDataProvider::from_json_str(DOCUMENT).unwrap();
        assert_eq!(provider.dataset_names(), vec!["adminLogs", "users"]);
        assert_eq!(provider.record_count("users"), 2);
        assert_eq!(provider.record_count("adminLogs"), 0);
        assert!(provider.dataset("missing").is_none());
        assert!(provider.analytics().is_none());
    }

    #[test]
    fn test_dataset_is_shared_not_copied() {
        let provider = StaticDataProvider::from_json_str(DOCUMENT).unwrap();
        let a = provider.dataset("users").unwrap();
        let b = provider.dataset("users").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_rejects_non_array_dataset() {
        let err = StaticDataProvider::from_json_str(r#"{"users": 5}"#).unwrap_err();
        assert!(err.to_string().contains("users"));
    }
}
