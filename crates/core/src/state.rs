use serde::Serialize;
use std::fmt;

/// Unit used to report memory usage and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum MemoryUnit {
    #[default]
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
}

impl MemoryUnit {
    /// Every unit, smallest first.
    pub const ALL: [MemoryUnit; 6] = [
        MemoryUnit::B,
        MemoryUnit::KB,
        MemoryUnit::MB,
        MemoryUnit::GB,
        MemoryUnit::TB,
        MemoryUnit::PB,
    ];

    /// Number of bytes in one of this unit.
    #[must_use]
    pub const fn bytes(self) -> u64 {
        match self {
            MemoryUnit::B  => 1,
            MemoryUnit::KB => 1 << 10,
            MemoryUnit::MB => 1 << 20,
            MemoryUnit::GB => 1 << 30,
            MemoryUnit::TB => 1 << 40,
            MemoryUnit::PB => 1 << 50,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MemoryUnit::B  => "B",
            MemoryUnit::KB => "KB",
            MemoryUnit::MB => "MB",
            MemoryUnit::GB => "GB",
            MemoryUnit::TB => "TB",
            MemoryUnit::PB => "PB",
        }
    }
}

impl fmt::Display for MemoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One buffered observation, appended once per successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricSample {
    /// Fraction of the memory limit in use, `None` when no limit is configured.
    pub memory_percent: Option<f64>,
    /// Fraction of CPU in use (0.0 – 1.0), `None` when the metric is missing.
    pub cpu_percent: Option<f64>,
}

impl MetricSample {
    /// The placeholder sample the history is seeded with.
    pub const ZERO: MetricSample = MetricSample {
        memory_percent: Some(0.0),
        cpu_percent:    Some(0.0),
    };
}

/// Snapshot of the values derived from the latest poll outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResourceState {
    /// Whether the last payload carried a resident memory figure.
    pub memory_available: bool,
    /// Whether the last payload carried a CPU percentage.
    pub cpu_available: bool,
    /// Resident memory scaled to `units`.
    pub current_memory: f64,
    /// Memory limit scaled to `units`, if the server reports one.
    pub memory_limit: Option<f64>,
    pub units: MemoryUnit,
    /// CPU usage as a fraction; `0.0` while unavailable.
    pub current_cpu_percent: f64,
    pub cpu_limit: Option<f64>,
}

impl ResourceState {
    /// Single-flag view of availability: `true` if any metric is usable.
    #[must_use]
    pub fn metrics_available(&self) -> bool {
        self.memory_available || self.cpu_available
    }

    /// `current_memory / memory_limit`, clamped to `1.0`.
    #[must_use]
    pub fn memory_fraction(&self) -> Option<f64> {
        match self.memory_limit {
            Some(limit) if limit > 0.0 => Some((self.current_memory / limit).min(1.0)),
            _ => None,
        }
    }
}

/// Consistent read-only view handed to observers: state plus history,
/// captured together so neither can be torn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSnapshot {
    pub state: ResourceState,
    /// Sample history, oldest first.
    pub history: Vec<MetricSample>,
}
