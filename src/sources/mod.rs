//! Read-only collaborators the pipeline draws its inputs from.
//!
//! The pipeline only sees these traits, so snapshots can come from local
//! files, a remote API client or test fixtures alike.

pub mod catalog;
pub mod store;

pub use catalog::{SiteCatalog, SiteIndex};
pub use store::{MeasurementStore, SiteDataStore};
