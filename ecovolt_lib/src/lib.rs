//! Library layer for the EcoVolt storefront catalog: cached product loading,
//! pagination and filter state, and input validation.
//!
//! Wraps the `ecovolt_api` crate with a per-catalog response cache and a
//! single-flight fetch orchestrator whose superseded requests are cancelled.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod validation;

pub use ecovolt_api;
pub use ecovolt_api::types;
pub use ecovolt_api::{CancellationToken, ProductQuery, ProductSortBy, Query, SortOrder};

pub use cache::ResponseCache;
pub use catalog::{CacheInfo, Catalog, FetchOutcome, LoadOptions};
pub use config::{CatalogConfig, Environment};
pub use error::CatalogError;
pub use state::{ActiveFilter, FetchState};
