//! costctl library
//!
//! Instance selection and cost estimation over static cloud catalogs:
//! match a workload's cpu/memory/GPU ask against standard and custom-shape
//! offerings, pick the cheapest, and optionally enrich the quote with a
//! live spot price.

pub mod catalog;
pub mod config;
pub mod custom_shape;
pub mod error;
pub mod gpu;
pub mod matcher;
pub mod pricing;
pub mod provider;
pub mod request;
pub mod selector;
pub mod spot;

// Re-export commonly used types
pub use catalog::{CatalogStore, CustomFamily, InstanceRecord};
pub use provider::CloudProvider;
pub use request::ResourceRequest;
pub use selector::{CostQuote, InstanceSelector};
