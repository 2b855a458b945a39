//! Burstable-instance pricing
//!
//! Burstable instances include a CPU baseline in their catalog price; a
//! sustained ask above the baseline costs extra. Only the AWS
//! "T-unlimited" surcharge model is defined: burstable records from other
//! providers are not priceable above their baseline and drop out of
//! selection.

use crate::catalog::InstanceRecord;
use crate::provider::CloudProvider;

/// AWS T-unlimited surcharge per vCPU-hour above the baseline.
pub const T_UNLIMITED_RATE: f64 = 0.05;

/// Effective hourly price of `record` for a CPU ask, and whether a burst
/// surcharge was applied. `None` means the record cannot be priced for
/// this ask and is ineligible, not that an error occurred.
pub fn price_for_cpu(
    provider: CloudProvider,
    cpu_request: f64,
    record: &InstanceRecord,
) -> Option<(f64, bool)> {
    if !record.burstable || cpu_request <= record.baseline {
        return Some((record.price, false));
    }
    match provider {
        CloudProvider::Aws => {
            let extra = (cpu_request - record.baseline) * T_UNLIMITED_RATE;
            Some((record.price + extra, true))
        }
        _ => None,
    }
}
