//! Bounded simulation history.
//!
//! A ring of [`HistorySample`]s backed by a fixed-capacity
//! [`heapless::Deque`].  The usable capacity is chosen at configure time
//! (at most [`MAX_HISTORY_CAPACITY`]); once full, every push evicts the
//! oldest sample first.  Memory use is independent of run length.

use heapless::Deque;
use serde::{Deserialize, Serialize};

use crate::control::variable::ActionLabel;

/// Hard upper bound on retained samples.
pub const MAX_HISTORY_CAPACITY: usize = 1024;

/// One recorded control tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    /// Simulated seconds since the run started.
    pub time: f64,
    /// Temperature after this tick's plant step.
    pub temperature: f64,
    pub target: f64,
    pub error: f64,
    pub error_rate: f64,
    pub control_output: f64,
    pub control_action: ActionLabel,
    /// Whether passive ambient drift contributed to this tick.
    pub drift_applied: bool,
}

/// Oldest-first evicting ring buffer.
pub struct HistoryRing {
    samples: Box<Deque<HistorySample, MAX_HISTORY_CAPACITY>>,
    capacity: usize,
}

impl HistoryRing {
    /// `capacity` is clamped to `1..=MAX_HISTORY_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Box::default(),
            capacity: capacity.clamp(1, MAX_HISTORY_CAPACITY),
        }
    }

    /// Append a sample, evicting the oldest once at capacity.
    /// Returns the evicted sample, if any.
    pub fn push(&mut self, sample: HistorySample) -> Option<HistorySample> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        let pushed = self.samples.push_back(sample);
        debug_assert!(pushed.is_ok(), "history ring over capacity");
        evicted
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    /// Owned copy, oldest to newest.
    pub fn to_vec(&self) -> Vec<HistorySample> {
        self.samples.iter().cloned().collect()
    }
}
