use crate::error::{MonitorError, Result};
use serde::Deserialize;

/// JSON shape returned by the metrics endpoint.
///
/// ```json
/// { "rss": 2097152, "cpu_percent": 12.5, "cpu_count": 8,
///   "limits": { "memory": { "rss": 4194304, "warn": 0.5 } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetricsPayload {
    /// Resident set size in bytes.
    #[serde(default)]
    pub rss: Option<u64>,
    /// CPU usage on a 0–100 scale.
    #[serde(default)]
    pub cpu_percent: Option<f64>,
    #[serde(default)]
    pub cpu_count: Option<u32>,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub memory: Option<MemoryLimit>,
    #[serde(default)]
    pub cpu: Option<CpuLimit>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemoryLimit {
    /// Memory limit in bytes.
    pub rss: u64,
    #[serde(default)]
    pub warn: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CpuLimit {
    pub cpu: f64,
    #[serde(default)]
    pub warn: Option<f64>,
}

impl MetricsPayload {
    /// Memory limit in bytes; a zero limit means "no limit".
    #[must_use]
    pub fn memory_limit_bytes(&self) -> Option<u64> {
        self.limits
            .memory
            .as_ref()
            .map(|m| m.rss)
            .filter(|&rss| rss > 0)
    }

    /// CPU limit, or `None` when the server reports none.
    ///
    /// The JupyterLab extension this mirrors substitutes `1` for a missing
    /// limit; here absence stays visible to consumers instead.
    #[must_use]
    pub fn cpu_limit(&self) -> Option<f64> {
        self.limits.cpu.as_ref().map(|c| c.cpu)
    }
}

/// Parse a raw response body.
///
/// A literal `null` body is the server saying "no data" and yields `Ok(None)`.
pub fn parse_payload(body: &str) -> Result<Option<MetricsPayload>> {
    serde_json::from_str::<Option<MetricsPayload>>(body)
        .map_err(|e| MonitorError::Payload(format!("parse metrics: {e}")))
}
