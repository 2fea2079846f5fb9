use sysmon_config::MemorySettings;
use sysmon_core::MetricSample;

/// Number of most recent samples that must all exceed the threshold.
pub const WARNING_WINDOW: usize = 5;

/// Raises a warning when memory stays above a threshold.
///
/// Fires once when the last [`WARNING_WINDOW`] samples are all at or above the
/// threshold, then stays quiet until usage drops again. A dismissed watch
/// never fires again.
#[derive(Debug, Clone)]
pub struct HighMemoryWatch {
    threshold: Option<f64>,
    raised:    bool,
    dismissed: bool,
}

impl HighMemoryWatch {
    pub fn new(threshold: Option<f64>) -> Self {
        Self {
            threshold,
            raised: false,
            dismissed: false,
        }
    }

    pub fn from_settings(settings: &MemorySettings) -> Self {
        Self::new(settings.warn)
    }

    /// Feed the current history (oldest first). Returns `true` when the
    /// warning should be shown now.
    pub fn check(&mut self, history: &[MetricSample]) -> bool {
        let high = self.is_high(history);
        let fire = high && !self.raised && !self.dismissed;
        self.raised = high;
        fire
    }

    /// Silence the watch for the rest of the session.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }

    fn is_high(&self, history: &[MetricSample]) -> bool {
        let Some(threshold) = self.threshold else {
            return false;
        };
        if history.len() < WARNING_WINDOW {
            return false;
        }
        history[history.len() - WARNING_WINDOW..]
            .iter()
            .all(|s| s.memory_percent.is_some_and(|p| p >= threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(percents: &[Option<f64>]) -> Vec<MetricSample> {
        let mut samples = vec![MetricSample::ZERO; 20 - percents.len()];
        samples.extend(percents.iter().map(|&memory_percent| MetricSample {
            memory_percent,
            cpu_percent: Some(0.0),
        }));
        samples
    }

    #[test]
    fn fires_after_five_high_samples() {
        let mut watch = HighMemoryWatch::new(Some(0.5));
        assert!(!watch.check(&history(&[Some(0.6); 4])));
        assert!(watch.check(&history(&[Some(0.6); 5])));
    }

    #[test]
    fn fires_once_per_episode() {
        let mut watch = HighMemoryWatch::new(Some(0.5));
        let high = history(&[Some(0.9); 5]);
        assert!(watch.check(&high));
        assert!(!watch.check(&high));

        assert!(!watch.check(&history(&[Some(0.9), Some(0.9), Some(0.9), Some(0.9), Some(0.1)])));
        assert!(watch.check(&high));
    }

    #[test]
    fn missing_percent_never_counts() {
        let mut watch = HighMemoryWatch::new(Some(0.0));
        assert!(!watch.check(&history(&[None; 5])));
    }

    #[test]
    fn dismissed_watch_stays_quiet() {
        let mut watch = HighMemoryWatch::new(Some(0.5));
        watch.dismiss();
        assert!(!watch.check(&history(&[Some(1.0); 5])));
    }

    #[test]
    fn no_threshold_disables_watch() {
        let mut watch = HighMemoryWatch::new(None);
        assert!(!watch.check(&history(&[Some(1.0); 5])));
    }
}
