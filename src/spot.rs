//! Best-effort spot price lookup
//!
//! Live prices live in an external key/value store under
//! `/{namespace}/providers/{provider}/regions/{region}/prices/{type}`,
//! as JSON documents carrying an on-demand price and per-sub-region spot
//! observations. The lookup is strictly best-effort: any timeout, fetch,
//! or decode failure degrades to on-demand-only pricing, never to a
//! failed quote.

use crate::error::{CostctlError, Result};
use crate::provider::CloudProvider;
use async_trait::async_trait;
use redis::AsyncCommands;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Key namespace the price scraper publishes under.
pub const DEFAULT_NAMESPACE: &str = "banzaicloud.com/cloudinfo";

/// Bound on the single store round trip per quote.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(500);

/// Narrow seam over the external key/value store, so the one blocking call
/// in a quote can be timed out and faked in tests independently of the
/// matching and pricing logic.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Raw document stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Redis-backed price store.
pub struct RedisPriceStore {
    client: redis::Client,
}

impl RedisPriceStore {
    /// Lazy client; no connection is made until the first lookup.
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CostctlError::PriceStore(format!("invalid price store url: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PriceStore for RedisPriceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CostctlError::PriceStore(format!("connect failed: {}", e)))?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CostctlError::PriceStore(format!("GET {} failed: {}", key, e)))?;
        Ok(value)
    }
}

/// Stored price document. `spotPrice` maps sub-region to observed price
/// and may be absent or null.
#[derive(Debug, Deserialize)]
struct PriceDocument {
    #[serde(rename = "onDemandPrice")]
    on_demand_price: f64,
    #[serde(rename = "spotPrice", default)]
    spot_price: Option<HashMap<String, f64>>,
}

impl PriceDocument {
    fn lowest_price(&self) -> f64 {
        match &self.spot_price {
            Some(prices) if !prices.is_empty() => {
                prices.values().fold(f64::INFINITY, |min, &p| min.min(p))
            }
            _ => self.on_demand_price,
        }
    }
}

/// Resolves the best observed price for a chosen instance type.
pub struct SpotPriceResolver {
    store: Box<dyn PriceStore>,
    provider: CloudProvider,
    namespace: String,
    timeout: Duration,
}

impl SpotPriceResolver {
    pub fn new(store: Box<dyn PriceStore>, provider: CloudProvider) -> Self {
        Self {
            store,
            provider,
            namespace: DEFAULT_NAMESPACE.to_string(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn key(&self, instance_type: &str, region: &str) -> String {
        format!(
            "/{}/providers/{}/regions/{}/prices/{}",
            self.namespace,
            self.provider.price_store_key(),
            self.provider.normalize_region(region),
            instance_type
        )
    }

    /// Lowest observed spot price for an instance type, falling back to
    /// the stored on-demand price when there are no spot observations.
    /// `None` on any failure; the caller prices on-demand only.
    pub async fn resolve_spot_price(&self, instance_type: &str, region: &str) -> Option<f64> {
        let key = self.key(instance_type, region);
        let value = match tokio::time::timeout(self.timeout, self.store.get(&key)).await {
            Err(_) => {
                warn!("price store lookup timed out for {}", key);
                return None;
            }
            Ok(Err(e)) => {
                warn!("price store lookup failed for {}: {}", key, e);
                return None;
            }
            Ok(Ok(None)) => {
                debug!("no price entry for {}", key);
                return None;
            }
            Ok(Ok(Some(value))) => value,
        };
        match serde_json::from_str::<PriceDocument>(&value) {
            Ok(doc) => Some(doc.lowest_price()),
            Err(e) => {
                warn!("undecodable price entry for {}: {}", key, e);
                None
            }
        }
    }
}
