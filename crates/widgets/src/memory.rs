use sysmon_config::MemorySettings;
use sysmon_core::{MemoryUnit, ResourceSnapshot};

/// Displays memory usage as `current / limit UNIT`.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndicator {
    label: String,
}

impl MemoryIndicator {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn from_settings(settings: &MemorySettings) -> Self {
        Self::new(settings.label.clone())
    }

    /// `None` while the memory metric is unavailable.
    pub fn text(&self, snapshot: &ResourceSnapshot) -> Option<String> {
        let state = &snapshot.state;
        if !state.memory_available {
            return None;
        }

        let precision = precision(state.units);
        let current = state.current_memory;
        let text = match state.memory_limit {
            Some(limit) => format!(
                "{}{current:.precision$} / {limit:.precision$} {}",
                self.label, state.units
            ),
            None => format!("{}{current:.precision$} {}", self.label, state.units),
        };
        Some(text)
    }
}

/// KB and MB read fine as whole numbers; bytes and the large units get two decimals.
fn precision(units: MemoryUnit) -> usize {
    match units {
        MemoryUnit::KB | MemoryUnit::MB => 0,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysmon_core::ResourceState;

    fn snapshot(current_memory: f64, memory_limit: Option<f64>, units: MemoryUnit) -> ResourceSnapshot {
        ResourceSnapshot {
            state: ResourceState {
                memory_available: true,
                current_memory,
                memory_limit,
                units,
                ..ResourceState::default()
            },
            history: Vec::new(),
        }
    }

    #[test]
    fn megabytes_without_decimals() {
        let memory = MemoryIndicator::new("Mem: ");
        let text = memory.text(&snapshot(2.0, Some(4.0), MemoryUnit::MB));
        assert_eq!(text.as_deref(), Some("Mem: 2 / 4 MB"));
    }

    #[test]
    fn gigabytes_with_two_decimals() {
        let memory = MemoryIndicator::new("Mem: ");
        let text = memory.text(&snapshot(1.5, None, MemoryUnit::GB));
        assert_eq!(text.as_deref(), Some("Mem: 1.50 GB"));
    }

    #[test]
    fn hidden_when_unavailable() {
        let memory = MemoryIndicator::new("Mem: ");
        let mut unavailable = snapshot(0.0, None, MemoryUnit::B);
        unavailable.state.memory_available = false;
        assert_eq!(memory.text(&unavailable), None);
    }
}
