//! Candidate pool construction and constraint filtering
//!
//! The pool is the region's standard records plus one synthesized record
//! per custom family that can offer a fitting shape. Candidates are then
//! filtered by memory, cpu, and GPU constraints in that order; a zero cpu
//! or memory request leaves that dimension unconstrained.

use crate::catalog::{CatalogStore, InstanceRecord};
use crate::custom_shape::{self, format_custom_type};
use crate::gpu::GpuRequest;
use tracing::debug;

/// One synthesized record per custom family with a fit for the ask.
///
/// Families with no offered CPU counts or a zero base memory unit are
/// malformed and skipped, not errors. Synthesized records never burst:
/// their baseline is the solved CPU count.
pub fn synthesized_custom_records(
    store: &CatalogStore,
    cpu_request: f64,
    memory_request: f64,
) -> Vec<InstanceRecord> {
    let mut records = Vec::new();
    for family in store.custom_families() {
        if family.base_memory_unit == 0.0 || family.possible_cpu_counts.is_empty() {
            debug!("skipping malformed custom family '{}'", family.instance_family);
            continue;
        }
        let Some(shape) = custom_shape::solve(family, cpu_request, memory_request) else {
            continue;
        };
        let max_gpus = family.supported_gpu_types.values().copied().max().unwrap_or(0);
        records.push(InstanceRecord {
            instance_type: format_custom_type(&family.instance_family, shape.cpu, shape.memory),
            price: shape.price,
            cpu: shape.cpu,
            memory: shape.memory,
            gpu: max_gpus,
            supported_gpu_types: family.supported_gpu_types.clone(),
            burstable: false,
            baseline: shape.cpu,
        });
    }
    records
}

/// Whether a record satisfies a GPU requirement. With no type constraint
/// any GPU counts; with a type, only that type's supported count counts
/// (absent type = 0).
pub fn gpu_matches(request: &GpuRequest, record: &InstanceRecord) -> bool {
    if request.gpu_type.is_empty() {
        return record.gpu >= request.count;
    }
    record
        .supported_gpu_types
        .get(&request.gpu_type)
        .copied()
        .unwrap_or(0)
        >= request.count
}

/// Candidates satisfying the ask, in stable pool order (standard catalog
/// order, then synthesized customs in family order).
pub fn matching_instances(
    store: &CatalogStore,
    cpu_request: f64,
    memory_request: f64,
    gpu_request: &GpuRequest,
) -> Vec<InstanceRecord> {
    let mut pool: Vec<InstanceRecord> = store.instances().to_vec();
    pool.extend(synthesized_custom_records(store, cpu_request, memory_request));
    pool.retain(|r| memory_request == 0.0 || r.memory >= memory_request);
    pool.retain(|r| cpu_request == 0.0 || r.cpu >= cpu_request);
    pool.retain(|r| gpu_matches(gpu_request, r));
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CustomFamily;
    use crate::provider::CloudProvider;
    use std::collections::HashMap;

    fn record(instance_type: &str, cpu: f64, memory: f64, gpu: u32) -> InstanceRecord {
        InstanceRecord {
            instance_type: instance_type.to_string(),
            price: 1.0,
            cpu,
            memory,
            gpu,
            supported_gpu_types: HashMap::new(),
            burstable: false,
            baseline: 0.0,
        }
    }

    fn store(instances: Vec<InstanceRecord>, families: Vec<CustomFamily>) -> CatalogStore {
        CatalogStore::from_parts(CloudProvider::Gce, "us-west1-a", instances, families)
    }

    #[test]
    fn zero_requests_keep_everything() {
        let store = store(
            vec![record("a", 1.0, 1.0, 0), record("b", 96.0, 768.0, 0)],
            vec![],
        );
        let pool = matching_instances(&store, 0.0, 0.0, &GpuRequest::default());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn memory_and_cpu_filters_apply_independently() {
        let store = store(
            vec![
                record("small", 2.0, 4.0, 0),
                record("tall", 2.0, 64.0, 0),
                record("wide", 32.0, 4.0, 0),
            ],
            vec![],
        );
        let pool = matching_instances(&store, 0.0, 16.0, &GpuRequest::default());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].instance_type, "tall");

        let pool = matching_instances(&store, 16.0, 0.0, &GpuRequest::default());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].instance_type, "wide");
    }

    #[test]
    fn typed_gpu_requirement_checks_supported_types() {
        let mut with_p100 = record("gpu-box", 8.0, 64.0, 8);
        with_p100
            .supported_gpu_types
            .insert("nvidia-tesla-p100".to_string(), 4);
        let plain = record("cpu-box", 8.0, 64.0, 8);
        let store = store(vec![with_p100, plain], vec![]);

        let untyped = GpuRequest { count: 2, gpu_type: String::new() };
        assert_eq!(matching_instances(&store, 0.0, 0.0, &untyped).len(), 2);

        let typed = GpuRequest {
            count: 2,
            gpu_type: "nvidia-tesla-p100".to_string(),
        };
        let pool = matching_instances(&store, 0.0, 0.0, &typed);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].instance_type, "gpu-box");
    }

    #[test]
    fn malformed_families_are_skipped() {
        let family = CustomFamily {
            instance_family: "broken".to_string(),
            base_memory_unit: 0.0,
            possible_cpu_counts: vec![1.0],
            minimum_memory_per_cpu: 0.5,
            maximum_memory_per_cpu: 4.0,
            price_per_cpu: 0.1,
            price_per_gb_memory: 0.1,
            supported_gpu_types: HashMap::new(),
        };
        let store = store(vec![], vec![family]);
        assert!(synthesized_custom_records(&store, 1.0, 1.0).is_empty());
    }

    #[test]
    fn synthesized_record_shape() {
        let family = CustomFamily {
            instance_family: "n2".to_string(),
            base_memory_unit: 0.25,
            possible_cpu_counts: vec![2.0, 4.0],
            minimum_memory_per_cpu: 0.5,
            maximum_memory_per_cpu: 8.0,
            price_per_cpu: 0.03,
            price_per_gb_memory: 0.004,
            supported_gpu_types: HashMap::from([("nvidia-tesla-t4".to_string(), 4)]),
        };
        let store = store(vec![], vec![family]);
        let records = synthesized_custom_records(&store, 2.0, 4.0);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.instance_type, "n2-custom-2-4096");
        assert!(!r.burstable);
        assert_eq!(r.baseline, r.cpu);
        assert_eq!(r.gpu, 4);
    }
}
