//! Data layer for the table view
//!
//! Records are held in shared, immutable collections. Views derive
//! sorted and paginated projections over them without copying.

pub mod column;
pub mod data_provider;
pub mod data_view;
pub mod filter;
pub mod record;
pub mod value_compare;
