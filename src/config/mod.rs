//! Configuration module
//!
//! Table, export and PDF settings loaded from a TOML file.

pub mod config;

pub use config::{Config, ExportConfig, TableConfig};
