use sysmon_config::CpuSettings;
use sysmon_core::ResourceSnapshot;

/// Displays process CPU usage as a whole percentage.
#[derive(Debug, Clone, Default)]
pub struct CpuIndicator {
    label: String,
}

impl CpuIndicator {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn from_settings(settings: &CpuSettings) -> Self {
        Self::new(settings.label.clone())
    }

    /// `None` while the CPU metric is unavailable.
    pub fn text(&self, snapshot: &ResourceSnapshot) -> Option<String> {
        let state = &snapshot.state;
        if !state.cpu_available {
            return None;
        }
        Some(format!("{}{:.0}%", self.label, state.current_cpu_percent * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysmon_core::ResourceState;

    fn snapshot(cpu_available: bool, current_cpu_percent: f64) -> ResourceSnapshot {
        ResourceSnapshot {
            state: ResourceState {
                cpu_available,
                current_cpu_percent,
                ..ResourceState::default()
            },
            history: Vec::new(),
        }
    }

    #[test]
    fn renders_rounded_percent() {
        let cpu = CpuIndicator::new("CPU: ");
        assert_eq!(cpu.text(&snapshot(true, 0.426)).as_deref(), Some("CPU: 43%"));
    }

    #[test]
    fn hidden_when_unavailable() {
        assert_eq!(CpuIndicator::new("CPU: ").text(&snapshot(false, 0.0)), None);
    }
}
