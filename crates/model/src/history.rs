use std::collections::VecDeque;
use sysmon_core::MetricSample;

/// Number of samples kept in the rolling window.
pub const HISTORY_LEN: usize = 20;

/// Fixed-length rolling window of samples, oldest first.
///
/// Seeded with zero samples so it always holds exactly [`HISTORY_LEN`]
/// entries; every push evicts the oldest one.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleHistory {
    samples: VecDeque<MetricSample>,
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleHistory {
    pub fn new() -> Self {
        let mut samples = VecDeque::with_capacity(HISTORY_LEN);
        samples.extend(std::iter::repeat(MetricSample::ZERO).take(HISTORY_LEN));
        Self { samples }
    }

    /// Append a sample, evicting the oldest.
    pub fn push(&mut self, sample: MetricSample) {
        self.samples.pop_front();
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MetricSample> + ExactSizeIterator {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<MetricSample> {
        self.samples.iter().copied().collect()
    }
}
