//! Hit object metadata and the positional judgments for sliders and spinners.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use tracing::warn;

use crate::judge::HitResult;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "slider")]
    Slider,
    #[strum(serialize = "spinner")]
    Spinner,
}

/// The object a judgment belongs to, as supplied by the chart
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Object start time on the track (ms)
    pub time_ms: i32,
    pub kind: ObjectKind,
    /// Last object before the next new-combo boundary
    #[serde(default)]
    pub combo_end: bool,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl ObjectMeta {
    pub fn new(kind: ObjectKind, time_ms: i32) -> Self {
        Self {
            time_ms,
            kind,
            ..Default::default()
        }
    }

    pub fn circle(time_ms: i32) -> Self {
        Self::new(ObjectKind::Circle, time_ms)
    }

    pub fn slider(time_ms: i32) -> Self {
        Self::new(ObjectKind::Slider, time_ms)
    }

    pub fn spinner(time_ms: i32) -> Self {
        Self::new(ObjectKind::Spinner, time_ms)
    }

    pub fn with_combo_end(mut self, combo_end: bool) -> Self {
        self.combo_end = combo_end;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn is_slider(&self) -> bool {
        self.kind == ObjectKind::Slider
    }
}

/// Final result of a slider from the share of ticks that were held.
///
/// `tick_intervals` counts the slider start, every tick, every repeat and the end.
pub fn slider_result(ticks_hit: u32, tick_intervals: u32) -> HitResult {
    let ratio = ticks_hit as f32 / tick_intervals.max(1) as f32;
    if ratio >= 1.0 {
        HitResult::ThreeHundred
    } else if ratio >= 0.5 {
        HitResult::Hundred
    } else if ratio > 0.0 {
        HitResult::Fifty
    } else {
        HitResult::Miss
    }
}

/// Rotations needed to clear a spinner of the given length
pub fn spinner_rotations_needed(duration_ms: i32, od: f32) -> f32 {
    let od = if od.is_nan() { 0.0 } else { od.clamp(0.0, 10.0) };
    let spins_per_minute = 100.0 + od * 15.0;
    spins_per_minute * duration_ms.max(0) as f32 / 60_000.0
}

/// Most rotation a single `SpinnerTracker::rotate` call may add
pub const MAX_ROTATIONS_PER_CALL: f32 = 64.0;

/// Tracks spinner rotation and turns whole rotations into spin/bonus events.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinnerTracker {
    rotations: f32,
    rotations_needed: f32,
}

impl SpinnerTracker {
    pub fn new(duration_ms: i32, od: f32) -> Self {
        Self {
            rotations: 0.0,
            rotations_needed: spinner_rotations_needed(duration_ms, od),
        }
    }

    pub fn rotations(&self) -> f32 {
        self.rotations
    }

    pub fn rotations_needed(&self) -> f32 {
        self.rotations_needed
    }

    pub fn is_complete(&self) -> bool {
        self.rotations >= self.rotations_needed
    }

    /// Add rotation (radians, either direction).
    ///
    /// Returns one `SpinnerSpin` for each whole rotation completed within the
    /// required count and one `SpinnerBonus` for each one beyond it. A call adds
    /// at most `MAX_ROTATIONS_PER_CALL` rotations.
    pub fn rotate(&mut self, radians: f32) -> Vec<HitResult> {
        if !radians.is_finite() {
            return Vec::new();
        }
        let turns = radians.abs() / TAU;
        if turns > MAX_ROTATIONS_PER_CALL {
            warn!(
                "Spinner rotated {:.1} times in one update, capping at {}",
                turns, MAX_ROTATIONS_PER_CALL
            );
        }
        let before = self.rotations;
        self.rotations += turns.min(MAX_ROTATIONS_PER_CALL);

        let first = before.floor() as u32 + 1;
        let last = self.rotations.floor() as u32;
        (first..=last)
            .map(|n| {
                if n as f32 > self.rotations_needed {
                    HitResult::SpinnerBonus
                } else {
                    HitResult::SpinnerSpin
                }
            })
            .collect()
    }

    /// Final result when the spinner ends.
    ///
    /// `auto_clear` marks a spinner cleared by a mod (Auto, SpunOut).
    pub fn result(&self, auto_clear: bool) -> HitResult {
        if auto_clear || self.rotations_needed <= 0.0 {
            return HitResult::ThreeHundred;
        }
        let ratio = self.rotations / self.rotations_needed;
        if ratio >= 1.0 {
            HitResult::ThreeHundred
        } else if ratio >= 0.8 {
            HitResult::Hundred
        } else if ratio >= 0.5 {
            HitResult::Fifty
        } else {
            HitResult::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_result_ratios() {
        assert_eq!(slider_result(4, 4), HitResult::ThreeHundred);
        assert_eq!(slider_result(2, 4), HitResult::Hundred);
        assert_eq!(slider_result(1, 4), HitResult::Fifty);
        assert_eq!(slider_result(0, 4), HitResult::Miss);
        assert_eq!(slider_result(0, 0), HitResult::Miss);
        assert_eq!(slider_result(1, 0), HitResult::ThreeHundred);
    }

    #[test]
    fn test_rotations_needed() {
        // 175 spins per minute at OD 5, for two seconds
        let needed = spinner_rotations_needed(2000, 5.0);
        assert!((needed - 175.0 * 2.0 / 60.0).abs() < 1e-4);
        assert_eq!(spinner_rotations_needed(-10, 5.0), 0.0);
    }

    #[test]
    fn test_spinner_events() {
        // 100 spins per minute at OD 0: 3 rotations in 1800ms
        let mut spinner = SpinnerTracker::new(1800, 0.0);
        assert!((spinner.rotations_needed() - 3.0).abs() < 1e-4);

        assert!(spinner.rotate(TAU * 0.5).is_empty());
        let events = spinner.rotate(-TAU * 2.0);
        assert_eq!(events, vec![HitResult::SpinnerSpin, HitResult::SpinnerSpin]);
        assert!(!spinner.is_complete());

        let events = spinner.rotate(TAU * 2.0);
        assert_eq!(events, vec![HitResult::SpinnerSpin, HitResult::SpinnerBonus]);
        assert!(spinner.is_complete());
        assert!(spinner.rotate(f32::NAN).is_empty());
    }

    #[test]
    fn test_rotation_per_call_is_capped() {
        let mut spinner = SpinnerTracker::new(1000, 5.0);
        let events = spinner.rotate(TAU * 2e7);
        assert_eq!(events.len(), MAX_ROTATIONS_PER_CALL as usize);
        assert_eq!(spinner.rotations(), MAX_ROTATIONS_PER_CALL);
        assert_eq!(events[0], HitResult::SpinnerSpin);
        assert_eq!(events[63], HitResult::SpinnerBonus);
        assert_eq!(spinner.result(false), HitResult::ThreeHundred);
    }

    #[test]
    fn test_spinner_result() {
        let mut spinner = SpinnerTracker::new(6000, 0.0);
        assert_eq!(spinner.result(false), HitResult::Miss);
        assert_eq!(spinner.result(true), HitResult::ThreeHundred);

        spinner.rotate(TAU * 5.2);
        assert_eq!(spinner.result(false), HitResult::Fifty);
        spinner.rotate(TAU * 3.0);
        assert_eq!(spinner.result(false), HitResult::Hundred);
        spinner.rotate(TAU * 2.0);
        assert_eq!(spinner.result(false), HitResult::ThreeHundred);
    }

    #[test]
    fn test_object_meta_builders() {
        let meta = ObjectMeta::slider(1500).with_combo_end(true).at(10.0, 20.0);
        assert!(meta.is_slider());
        assert!(meta.combo_end);
        assert_eq!(meta.time_ms, 1500);
        assert_eq!((meta.x, meta.y), (10.0, 20.0));
        assert!(!ObjectMeta::circle(0).combo_end);
    }
}
