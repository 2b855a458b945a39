//! Error types for costctl
//!
//! Library code uses `crate::error::Result<T>` which returns `CostctlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The
//! conversion happens at the CLI boundary using `anyhow::Error::from` to
//! preserve error chains.
//!
//! Configuration problems (unreadable catalog files, a region missing from
//! the catalog) are fatal at startup: a selector is never constructed over
//! a partially loaded catalog. Per-request problems (no matching instance,
//! a malformed GPU spec, a price-store miss, an unknown instance type in an
//! inverse lookup) are not errors at all; they surface as `Option`/degraded
//! values so a batch computation can skip and flag instead of aborting.

use thiserror::Error;

/// Main error type for costctl
#[derive(Error, Debug)]
pub enum CostctlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Price store error: {0}")]
    PriceStore(String),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid cloud provider: {0}")]
    InvalidProvider(String),

    #[error("Catalog file not found: {0}")]
    CatalogNotFound(String),

    #[error("Failed to parse catalog {file}: {reason}")]
    CatalogParse { file: String, reason: String },

    #[error("Region '{region}' not present in the {provider} catalog")]
    UnknownRegion { provider: String, region: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CostctlError>;
