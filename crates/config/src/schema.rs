use serde::{Deserialize, Serialize};
use std::time::Duration;
use sysmon_core::{MonitorError, Result};

/// Root configuration structure parsed from `sysmon.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Interval between metric requests, in milliseconds.
    pub refresh_rate: u64,
    /// Ceiling for the retry delay after consecutive failures, in milliseconds.
    pub max_backoff: u64,
    /// Memory indicator settings.
    pub memory: MemorySettings,
    /// CPU indicator settings.
    pub cpu: CpuSettings,
    /// Where the metrics are served from.
    pub endpoint: EndpointConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_rate: 5_000,
            max_backoff:  30_000,
            memory:       MemorySettings::default(),
            cpu:          CpuSettings::default(),
            endpoint:     EndpointConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_rate)
    }

    /// Backoff ceiling, never shorter than the refresh interval.
    pub fn backoff_ceiling(&self) -> Duration {
        Duration::from_millis(self.max_backoff.max(self.refresh_rate))
    }

    /// Reject settings that can only come from a typo.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_rate == 0 {
            return Err(MonitorError::Config("refresh_rate must be positive".into()));
        }
        for (name, warn) in [("memory", self.memory.warn), ("cpu", self.cpu.warn)] {
            if let Some(warn) = warn {
                // Values above 1 are allowed: they simply never trigger.
                if warn.is_nan() || warn < 0.0 {
                    return Err(MonitorError::Config(format!(
                        "{name}.warn must be a non-negative fraction, got {warn}"
                    )));
                }
            }
        }
        if self.endpoint.timeout_ms == 0 {
            return Err(MonitorError::Config("endpoint.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Memory indicator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Text shown in front of the value.
    pub label: String,
    /// Fraction of the limit above which a warning is raised.
    pub warn: Option<f64>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            label: "Mem: ".to_string(),
            warn:  Some(0.5),
        }
    }
}

/// CPU indicator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSettings {
    pub label: String,
    pub warn:  Option<f64>,
}

impl Default for CpuSettings {
    fn default() -> Self {
        Self {
            label: "CPU: ".to_string(),
            warn:  None,
        }
    }
}

/// Location of the metrics endpoint.
///
/// The path is kept separate from the base URL because servers disagree on
/// whether it is versioned (`api/metrics/v1` vs `metrics`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub path: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url:   "http://localhost:8888/".to_string(),
            path:       "api/metrics/v1".to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl EndpointConfig {
    /// Base URL and path joined with exactly one slash between them.
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
