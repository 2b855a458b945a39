//! Least-cost instance selection
//!
//! Ties the pieces together: build the candidate pool, price every
//! candidate (burst surcharges included), keep the cheapest
//! strictly-positive-price one, and optionally enrich the winner with a
//! live spot price. Also answers the inverse question: the static spec of
//! an instance type that already exists.

use crate::catalog::{CatalogStore, InstanceRecord};
use crate::custom_shape::parse_custom_type;
use crate::gpu;
use crate::matcher;
use crate::pricing;
use crate::spot::SpotPriceResolver;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Appended to the instance type when burst pricing was used, so the
/// quote is recognizable as an unlimited-mode estimate.
const UNLIMITED_SUFFIX: &str = " (unlimited)";

/// A priced answer to "cheapest instance satisfying this request".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostQuote {
    pub instance_type: String,
    pub on_demand_price: f64,
    /// Best observed spot price; equals the on-demand price when no
    /// resolver is configured or the lookup degraded.
    pub spot_price: f64,
    pub burst_surcharge: bool,
}

/// Selection engine over one immutable (provider, region) catalog.
///
/// Holds no mutable state; safe to share across request-handling tasks.
pub struct InstanceSelector {
    catalog: CatalogStore,
    resolver: Option<SpotPriceResolver>,
}

impl InstanceSelector {
    pub fn new(catalog: CatalogStore) -> Self {
        Self { catalog, resolver: None }
    }

    pub fn with_resolver(catalog: CatalogStore, resolver: SpotPriceResolver) -> Self {
        Self { catalog, resolver: Some(resolver) }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Cheapest candidate on on-demand pricing alone. `None` when nothing
    /// in the pool satisfies the request at a strictly positive price.
    ///
    /// Ties break by pool order: standard catalog order first, synthesized
    /// custom shapes after, first seen wins.
    pub fn cheapest_on_demand(
        &self,
        cpu_request: f64,
        memory_request: f64,
        gpu_spec: &str,
    ) -> Option<CostQuote> {
        let gpu_request = gpu::parse_gpu_spec(gpu_spec);
        let pool =
            matcher::matching_instances(&self.catalog, cpu_request, memory_request, &gpu_request);
        debug!(
            "{} candidates for cpu={} memory={} gpu='{}'",
            pool.len(),
            cpu_request,
            memory_request,
            gpu_spec
        );

        let mut best: Option<(f64, bool, &InstanceRecord)> = None;
        for record in &pool {
            let Some((price, surcharged)) =
                pricing::price_for_cpu(self.catalog.provider(), cpu_request, record)
            else {
                continue;
            };
            if price <= 0.0 {
                continue;
            }
            if best.map_or(true, |(lowest, _, _)| price < lowest) {
                best = Some((price, surcharged, record));
            }
        }

        best.map(|(price, surcharged, record)| {
            let mut instance_type = record.instance_type.clone();
            if surcharged {
                instance_type.push_str(UNLIMITED_SUFFIX);
            }
            CostQuote {
                instance_type,
                on_demand_price: price,
                spot_price: price,
                burst_surcharge: surcharged,
            }
        })
    }

    /// Cheapest instance for the request, spot-enriched when a resolver is
    /// configured. The spot price never exceeds the on-demand price.
    pub async fn select_cheapest(
        &self,
        cpu_request: f64,
        memory_request: f64,
        gpu_spec: &str,
    ) -> Option<CostQuote> {
        let mut quote = self.cheapest_on_demand(cpu_request, memory_request, gpu_spec)?;
        if let Some(resolver) = &self.resolver {
            let bare_type = quote
                .instance_type
                .strip_suffix(UNLIMITED_SUFFIX)
                .unwrap_or(&quote.instance_type);
            if let Some(spot) = resolver
                .resolve_spot_price(bare_type, self.catalog.region())
                .await
            {
                quote.spot_price = quote.on_demand_price.min(spot);
            }
        }
        Some(quote)
    }

    /// Static spec of an already-known instance type, used to price
    /// existing infrastructure. Custom machine-type strings are decoded
    /// and re-priced from their family's linear rates; anything else must
    /// match a standard catalog row exactly. `None` is a non-fatal miss:
    /// batch callers skip and flag the entry.
    pub fn spec_for_instance_type(&self, instance_type: &str) -> Option<InstanceRecord> {
        if instance_type.contains("custom") {
            let parsed = parse_custom_type(instance_type)?;
            let family = self
                .catalog
                .custom_families()
                .iter()
                .find(|f| f.instance_family == parsed.family)?;
            let price =
                parsed.cpu * family.price_per_cpu + parsed.memory * family.price_per_gb_memory;
            return Some(InstanceRecord {
                instance_type: instance_type.to_string(),
                price,
                cpu: parsed.cpu,
                memory: parsed.memory,
                gpu: 0,
                supported_gpu_types: HashMap::new(),
                burstable: false,
                baseline: parsed.cpu,
            });
        }
        self.catalog
            .instances()
            .iter()
            .find(|r| r.instance_type == instance_type)
            .cloned()
    }
}
