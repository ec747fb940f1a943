use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HIT_ERROR_DISPLAY_MS;

/// One timing offset captured from a hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitErrorSample {
    /// Object time the hit belongs to (ms)
    pub time_ms: i32,
    /// Signed offset, negative when early
    pub time_diff_ms: i32,
    pub x: f32,
    pub y: f32,
}

/// Early/late averages and unstable rate over every recorded offset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitErrorStats {
    samples: Vec<i32>,
}

impl HitErrorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, time_diff_ms: i32) {
        self.samples.push(time_diff_ms);
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of the early (negative) offsets, 0 if none
    pub fn early_average(&self) -> f64 {
        mean(self.samples.iter().filter(|&&d| d < 0))
    }

    /// Mean of the late (positive) offsets, 0 if none
    pub fn late_average(&self) -> f64 {
        mean(self.samples.iter().filter(|&&d| d > 0))
    }

    /// Ten times the population standard deviation of all offsets
    pub fn unstable_rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let avg = mean(self.samples.iter());
        let variance = self
            .samples
            .iter()
            .map(|&d| {
                let diff = d as f64 - avg;
                diff * diff
            })
            .sum::<f64>()
            / self.samples.len() as f64;
        variance.sqrt() * 10.0
    }
}

fn mean<'a>(values: impl Iterator<Item = &'a i32>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), &v| (sum + v as f64, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Recent offsets shown on the timing bar.
///
/// Entries leave once their offset falls outside the 50 window or once the
/// display duration has passed since capture. Independent of [`HitErrorStats`].
#[derive(Debug, Clone, PartialEq)]
pub struct HitErrorDisplay {
    entries: VecDeque<HitErrorSample>,
    duration_ms: u32,
}

impl Default for HitErrorDisplay {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_ERROR_DISPLAY_MS)
    }
}

impl HitErrorDisplay {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            entries: VecDeque::new(),
            duration_ms: duration_ms.max(1),
        }
    }

    pub fn push(&mut self, sample: HitErrorSample) {
        self.entries.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries outside `meh_window_ms` or older than the display duration.
    pub fn evict(&mut self, now_ms: i32, meh_window_ms: u32) {
        let duration = self.duration_ms as i64;
        self.entries.retain(|e| {
            e.time_diff_ms.unsigned_abs() <= meh_window_ms
                && (now_ms as i64 - e.time_ms as i64) < duration
        });
    }

    /// Remaining entries with their fade alpha at `now_ms`
    pub fn visible(&self, now_ms: i32) -> impl Iterator<Item = (&HitErrorSample, f32)> + '_ {
        self.entries.iter().map(move |e| (e, self.alpha(e, now_ms)))
    }

    /// `1 - elapsed / duration`, clamped to `[0, 1]`
    pub fn alpha(&self, sample: &HitErrorSample, now_ms: i32) -> f32 {
        let elapsed = (now_ms as i64 - sample.time_ms as i64) as f32;
        (1.0 - elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time_ms: i32, time_diff_ms: i32) -> HitErrorSample {
        HitErrorSample {
            time_ms,
            time_diff_ms,
            x: 0.0,
            y: 0.0,
        }
    }

    #[test]
    fn test_unstable_rate_example() {
        let mut stats = HitErrorStats::new();
        stats.record(-10);
        stats.record(10);
        assert_eq!(stats.early_average(), -10.0);
        assert_eq!(stats.late_average(), 10.0);
        assert!((stats.unstable_rate() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = HitErrorStats::new();
        assert_eq!(stats.early_average(), 0.0);
        assert_eq!(stats.late_average(), 0.0);
        assert_eq!(stats.unstable_rate(), 0.0);
    }

    #[test]
    fn test_zero_offsets_are_neither_early_nor_late() {
        let mut stats = HitErrorStats::new();
        for d in [0, 0, -4, -8] {
            stats.record(d);
        }
        assert_eq!(stats.early_average(), -6.0);
        assert_eq!(stats.late_average(), 0.0);
    }

    #[test]
    fn test_display_evicts_by_window_and_age() {
        let mut display = HitErrorDisplay::new(5000);
        display.push(sample(0, 10));
        display.push(sample(1000, 120));
        display.push(sample(4000, -30));

        display.evict(1000, 100);
        assert_eq!(display.len(), 2);

        display.evict(5000, 100);
        assert_eq!(display.len(), 1);

        display.evict(9000, 100);
        assert!(display.is_empty());
    }

    #[test]
    fn test_display_eviction_keeps_stats() {
        let mut stats = HitErrorStats::new();
        let mut display = HitErrorDisplay::default();
        stats.record(150);
        display.push(sample(0, 150));
        display.evict(0, 100);
        assert!(display.is_empty());
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn test_alpha() {
        let display = HitErrorDisplay::new(5000);
        let s = sample(1000, 0);
        assert_eq!(display.alpha(&s, 1000), 1.0);
        assert_eq!(display.alpha(&s, 3500), 0.5);
        assert_eq!(display.alpha(&s, 7000), 0.0);
    }
}
