//! Bounded synchrony time series for live charts.

use std::collections::VecDeque;

/// Samples kept before the oldest roll off.
pub const DEFAULT_ROLLOVER: usize = 200;

/// Width of the visible chart window, in ticks.
pub const DEFAULT_WINDOW: u64 = 100;

/// One `(tick, r)` point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSample {
    pub tick: u64,
    pub order_parameter: f64,
}

/// Rolling window of order-parameter samples.
#[derive(Debug, Clone)]
pub struct SyncHistory {
    samples: VecDeque<SyncSample>,
    capacity: usize,
    window: u64,
}

impl Default for SyncHistory {
    fn default() -> Self {
        Self::new(DEFAULT_ROLLOVER, DEFAULT_WINDOW)
    }
}

impl SyncHistory {
    /// Creates a history keeping at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize, window: u64) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            window: window.max(1),
        }
    }

    /// Appends a sample, dropping the oldest when full.
    pub fn push(&mut self, tick: u64, order_parameter: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(SyncSample {
            tick,
            order_parameter,
        });
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<SyncSample> {
        self.samples.back().copied()
    }

    /// Mean r over the retained samples.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.order_parameter).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Largest retained r.
    pub fn peak(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.order_parameter)
            .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.max(r))))
    }

    /// Visible x range: `(0, window)` until the latest tick passes the
    /// window, then it scrolls to `(tick - window, tick)`.
    pub fn display_window(&self) -> (u64, u64) {
        match self.latest() {
            Some(s) if s.tick > self.window => (s.tick - self.window, s.tick),
            _ => (0, self.window),
        }
    }

    /// Retained samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SyncSample> {
        self.samples.iter()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollover() {
        let mut h = SyncHistory::new(3, 10);
        for t in 0..5 {
            h.push(t, t as f64 / 10.0);
        }

        assert_eq!(h.len(), 3);
        let ticks: Vec<u64> = h.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![2, 3, 4]);
    }

    #[test]
    fn test_display_window_scrolls() {
        let mut h = SyncHistory::default();
        assert_eq!(h.display_window(), (0, 100));

        h.push(100, 0.5);
        assert_eq!(h.display_window(), (0, 100));

        h.push(101, 0.5);
        assert_eq!(h.display_window(), (1, 101));

        h.push(250, 0.5);
        assert_eq!(h.display_window(), (150, 250));
    }

    #[test]
    fn test_mean_and_peak() {
        let mut h = SyncHistory::default();
        assert_eq!(h.mean(), None);
        assert_eq!(h.peak(), None);

        h.push(0, 0.2);
        h.push(1, 0.8);
        h.push(2, 0.5);

        assert!((h.mean().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(h.peak(), Some(0.8));
        assert_eq!(h.latest().unwrap().tick, 2);
    }

    #[test]
    fn test_clear() {
        let mut h = SyncHistory::default();
        h.push(7, 1.0);
        h.clear();

        assert!(h.is_empty());
        assert_eq!(h.display_window(), (0, 100));
    }
}
