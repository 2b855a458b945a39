//! Static instance catalogs
//!
//! A catalog is loaded once at startup for a single (provider, region) pair
//! and is immutable for the process lifetime. Standard offerings come from
//! `{provider}_instance_data.json` (region → array of instance objects);
//! custom-shape families come from the optional
//! `{provider}_custom_instance_data.json`. The requested region missing
//! from the standard catalog is a fatal configuration error; a missing
//! custom-family file just means the provider has no custom shapes.

use crate::error::{ConfigError, Result};
use crate::provider::CloudProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// A standard catalog entry: one fixed instance offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(rename = "instanceType")]
    pub instance_type: String,
    /// On-demand hourly price.
    pub price: f64,
    /// vCPU cores offered.
    pub cpu: f64,
    /// Memory offered, GiB.
    pub memory: f64,
    /// Total GPU count across all attachable types.
    #[serde(default)]
    pub gpu: u32,
    #[serde(rename = "supportedGPUTypes", default)]
    pub supported_gpu_types: HashMap<String, u32>,
    #[serde(default)]
    pub burstable: bool,
    /// CPU included in the base price before a burst surcharge applies.
    /// Meaningless unless `burstable`.
    #[serde(default)]
    pub baseline: f64,
}

/// A custom-shape family: arbitrary (cpu, memory) pairs priced linearly
/// per unit instead of from a fixed catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFamily {
    #[serde(rename = "instanceFamily")]
    pub instance_family: String,
    /// Memory granularity, GiB.
    #[serde(rename = "baseMemoryUnit")]
    pub base_memory_unit: f64,
    /// Offered CPU counts, ascending.
    #[serde(rename = "possibleNumberOfCPUs")]
    pub possible_cpu_counts: Vec<f64>,
    #[serde(rename = "minimumMemoryPerCPU")]
    pub minimum_memory_per_cpu: f64,
    #[serde(rename = "maximumMemoryPerCPU")]
    pub maximum_memory_per_cpu: f64,
    #[serde(rename = "pricePerCPU")]
    pub price_per_cpu: f64,
    #[serde(rename = "pricePerGBOfMemory")]
    pub price_per_gb_memory: f64,
    #[serde(rename = "supportedGPUTypes", default)]
    pub supported_gpu_types: HashMap<String, u32>,
}

/// Instance offerings for one (provider, region) pair.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    provider: CloudProvider,
    region: String,
    instances: Vec<InstanceRecord>,
    custom_families: Vec<CustomFamily>,
}

impl CatalogStore {
    /// Load the catalog for `region` from the per-provider JSON files in
    /// `data_dir`. Fails fast on unreadable or malformed files and on a
    /// region missing from the standard catalog.
    pub fn load(data_dir: &Path, provider: CloudProvider, region: &str) -> Result<Self> {
        let instance_file = data_dir.join(format!("{}_instance_data.json", provider));
        let contents = std::fs::read_to_string(&instance_file).map_err(|_| {
            ConfigError::CatalogNotFound(instance_file.display().to_string())
        })?;
        let mut by_region: HashMap<String, Vec<InstanceRecord>> = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::CatalogParse {
                file: instance_file.display().to_string(),
                reason: e.to_string(),
            })?;
        let instances = by_region
            .remove(region)
            .ok_or_else(|| ConfigError::UnknownRegion {
                provider: provider.to_string(),
                region: region.to_string(),
            })?;

        let custom_file = data_dir.join(format!("{}_custom_instance_data.json", provider));
        let custom_families = if custom_file.exists() {
            let contents = std::fs::read_to_string(&custom_file)?;
            let mut by_region: HashMap<String, Vec<CustomFamily>> =
                serde_json::from_str(&contents).map_err(|e| ConfigError::CatalogParse {
                    file: custom_file.display().to_string(),
                    reason: e.to_string(),
                })?;
            by_region.remove(region).unwrap_or_default()
        } else {
            Vec::new()
        };

        info!(
            "loaded {} catalog for {}: {} instances, {} custom families",
            provider,
            region,
            instances.len(),
            custom_families.len()
        );

        Ok(Self {
            provider,
            region: region.to_string(),
            instances,
            custom_families,
        })
    }

    /// Build a store from already-parsed records.
    pub fn from_parts(
        provider: CloudProvider,
        region: &str,
        instances: Vec<InstanceRecord>,
        custom_families: Vec<CustomFamily>,
    ) -> Self {
        Self {
            provider,
            region: region.to_string(),
            instances,
            custom_families,
        }
    }

    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }

    pub fn custom_families(&self) -> &[CustomFamily] {
        &self.custom_families
    }
}
