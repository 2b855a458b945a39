//! Custom-shape solving and the custom machine-type codec
//!
//! A custom family offers arbitrary (cpu, memory) pairs; the solver finds
//! the cheapest concrete shape satisfying an ask. Solved shapes are
//! advertised under a synthetic machine-type string,
//! `{family}-custom-{cpus}-{memory MiB}`, which the inverse lookup parses
//! back apart to price already-running instances.

use crate::catalog::CustomFamily;

/// A concrete shape a custom family can offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomShape {
    pub cpu: f64,
    /// GiB, always a multiple of the family's base memory unit.
    pub memory: f64,
    pub price: f64,
}

fn round_up_to_unit(value: f64, unit: f64) -> f64 {
    (value / unit).ceil() * unit
}

/// Cheapest shape of `family` satisfying the ask, or `None` when no offered
/// CPU count fits.
///
/// Memory is rounded up to the family's granularity, then bumped to the
/// per-CPU minimum where needed and re-rounded, so every priced shape is
/// expressible in catalog units. The scan is ascending in CPU count and the
/// first shape achieving the minimum price wins.
pub fn solve(family: &CustomFamily, cpu_request: f64, memory_request: f64) -> Option<CustomShape> {
    let base_mem_size = round_up_to_unit(memory_request, family.base_memory_unit);
    let mut best: Option<CustomShape> = None;
    for &cpu in &family.possible_cpu_counts {
        if cpu < cpu_request || base_mem_size > family.maximum_memory_per_cpu * cpu {
            continue;
        }
        let mut memory = base_mem_size;
        let minimum = family.minimum_memory_per_cpu * cpu;
        if memory < minimum {
            memory = round_up_to_unit(minimum, family.base_memory_unit);
        }
        let price = memory * family.price_per_gb_memory + cpu * family.price_per_cpu;
        if best.map_or(true, |b| price < b.price) {
            best = Some(CustomShape { cpu, memory, price });
        }
    }
    best
}

/// Synthetic machine-type string for a solved shape. CPU counts are whole
/// numbers in the encoding; memory is encoded in MiB.
pub fn format_custom_type(family: &str, cpu: f64, memory: f64) -> String {
    format!(
        "{}-custom-{}-{}",
        family,
        cpu as u64,
        (memory * 1024.0).round() as u64
    )
}

/// A parsed custom machine-type string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCustomType {
    pub family: String,
    pub cpu: f64,
    /// GiB.
    pub memory: f64,
}

/// Parse a custom machine-type string back into (family, cpu, memory).
///
/// GCE labels n1 customs without the family prefix (e.g. `custom-2-3840`),
/// so a leading `custom` token implies family `n1`. An unparsable string,
/// or one with a zero cpu or memory component, is `None`; callers treat
/// that as a non-fatal lookup miss.
pub fn parse_custom_type(instance_type: &str) -> Option<ParsedCustomType> {
    let parts: Vec<&str> = instance_type.split('-').collect();
    let (family, cpu_str, memory_str) = if instance_type.starts_with("custom") {
        ("n1", *parts.get(1)?, *parts.get(2)?)
    } else {
        if parts.get(1) != Some(&"custom") {
            return None;
        }
        (*parts.first()?, *parts.get(2)?, *parts.get(3)?)
    };
    let cpu: u64 = cpu_str.parse().ok()?;
    let memory_mib: u64 = memory_str.parse().ok()?;
    if cpu == 0 || memory_mib == 0 {
        return None;
    }
    Some(ParsedCustomType {
        family: family.to_string(),
        cpu: cpu as f64,
        memory: memory_mib as f64 / 1024.0,
    })
}
