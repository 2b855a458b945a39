//! Cloud provider identifiers and provider-specific naming rules
//!
//! The provider name appears in three places with three different
//! spellings: catalog file names use the short name (`aws`, `azure`,
//! `gce`), the external price store keys some providers under a different
//! name (`amazon`, `google`), and Azure region display names ("East US 2")
//! must be normalized before they can be used in a price-store key.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported cloud providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gce,
}

impl CloudProvider {
    /// Short name, used in catalog file names and CLI input.
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Gce => "gce",
        }
    }

    /// Provider key as the external price store spells it.
    pub fn price_store_key(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "amazon",
            CloudProvider::Azure => "azure",
            CloudProvider::Gce => "google",
        }
    }

    /// Region string as the price store expects it. Azure regions are
    /// display names with spaces and capitals; everyone else already uses
    /// the canonical form.
    pub fn normalize_region(&self, region: &str) -> String {
        match self {
            CloudProvider::Azure => region.replace(' ', "").to_lowercase(),
            _ => region.to_string(),
        }
    }
}

impl FromStr for CloudProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "azure" => Ok(CloudProvider::Azure),
            "gce" => Ok(CloudProvider::Gce),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_providers() {
        assert_eq!("aws".parse::<CloudProvider>().unwrap(), CloudProvider::Aws);
        assert_eq!("GCE".parse::<CloudProvider>().unwrap(), CloudProvider::Gce);
        assert!("dospace".parse::<CloudProvider>().is_err());
    }

    #[test]
    fn price_store_key_mapping() {
        assert_eq!(CloudProvider::Aws.price_store_key(), "amazon");
        assert_eq!(CloudProvider::Gce.price_store_key(), "google");
        assert_eq!(CloudProvider::Azure.price_store_key(), "azure");
    }

    #[test]
    fn azure_region_normalization() {
        assert_eq!(CloudProvider::Azure.normalize_region("East US 2"), "eastus2");
        assert_eq!(CloudProvider::Aws.normalize_region("us-east-1"), "us-east-1");
    }
}
