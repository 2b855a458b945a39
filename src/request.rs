//! Workload resource requests
//!
//! The consumed input at the collector boundary: by the time a request
//! reaches the selection engine, cpu is in cores and memory is in GiB.
//! Millicore / byte conversion is the collector's job.

use crate::error::{CostctlError, Result};
use serde::{Deserialize, Serialize};

/// A normalized resource ask for one workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Opaque workload identity, e.g. `namespace/name`.
    pub workload: String,
    /// Cores, fractional allowed. Zero means unconstrained.
    #[serde(default)]
    pub cpu: f64,
    /// GiB. Zero means unconstrained.
    #[serde(default)]
    pub memory: f64,
    /// `"<count> <type>"`, type optional; empty means no GPU requirement.
    #[serde(default)]
    pub gpu_spec: String,
}

impl ResourceRequest {
    /// Workloads that ask for nothing still get a quote (the globally
    /// cheapest instance), but callers flag them as having no resource
    /// spec.
    pub fn has_resource_spec(&self) -> bool {
        self.cpu != 0.0 || self.memory != 0.0
    }

    /// Negative asks are caller bugs, not quotable requests.
    pub fn validate(&self) -> Result<()> {
        if self.cpu < 0.0 {
            return Err(CostctlError::Validation {
                field: "cpu".to_string(),
                reason: format!("must be non-negative, got {}", self.cpu),
            });
        }
        if self.memory < 0.0 {
            return Err(CostctlError::Validation {
                field: "memory".to_string(),
                reason: format!("must be non-negative, got {}", self.memory),
            });
        }
        Ok(())
    }
}
