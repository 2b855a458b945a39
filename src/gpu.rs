//! GPU requirement parsing
//!
//! Workloads encode a GPU ask as `"<count> <type>"`, with the type
//! optional and an empty string meaning no requirement.

use tracing::error;

/// A parsed GPU requirement. The default value requires nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GpuRequest {
    pub count: u32,
    /// Empty means any GPU type is acceptable.
    pub gpu_type: String,
}

/// Parse a GPU spec string. A malformed spec is logged and degrades to no
/// GPU requirement rather than failing the request.
pub fn parse_gpu_spec(gpu_spec: &str) -> GpuRequest {
    if gpu_spec.is_empty() {
        return GpuRequest::default();
    }
    let mut parts = gpu_spec.splitn(2, ' ');
    let count_str = parts.next().unwrap_or("");
    match count_str.parse::<u32>() {
        Ok(count) => GpuRequest {
            count,
            gpu_type: parts.next().unwrap_or("").to_string(),
        },
        Err(e) => {
            error!("invalid GPU spec '{}': {}", gpu_spec, e);
            GpuRequest::default()
        }
    }
}
