//! Score accumulation and per-result hit counters.

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::judge::HitResult;

/// Count of every result class, derived Katu/Geki included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitCounts {
    counts: [u32; HitResult::COUNT],
}

impl HitCounts {
    pub fn get(&self, result: HitResult) -> u32 {
        self.counts[result.index()]
    }

    /// Record a final result.
    ///
    /// A promoted Katu/Geki also counts under its timing class so accuracy sees it.
    pub fn record(&mut self, result: HitResult) {
        let base = result.base_class();
        self.increment(base);
        if base != result {
            self.increment(result);
        }
    }

    fn increment(&mut self, result: HitResult) {
        let slot = &mut self.counts[result.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn n300(&self) -> u32 {
        self.get(HitResult::ThreeHundred)
    }

    pub fn n100(&self) -> u32 {
        self.get(HitResult::Hundred)
    }

    pub fn n50(&self) -> u32 {
        self.get(HitResult::Fifty)
    }

    pub fn misses(&self) -> u32 {
        self.get(HitResult::Miss)
    }

    pub fn geki(&self) -> u32 {
        self.get(HitResult::ThreeHundredGeki)
    }

    pub fn katu(&self) -> u32 {
        self.get(HitResult::ThreeHundredKatu) + self.get(HitResult::HundredKatu)
    }

    /// Objects judged by timing class (300 + 100 + 50 + miss)
    pub fn judged_objects(&self) -> u32 {
        self.n300() + self.n100() + self.n50() + self.misses()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HitResult, u32)> + '_ {
        HitResult::iter().map(|r| (r, self.get(r)))
    }
}

/// Points for one result.
///
/// `V + floor(V * combo_mult * difficulty_mult * mod_mult / 25)` with
/// `combo_mult = max(combo_before - 1, 0)`, plus one for sliders.
pub fn score_delta(
    result: HitResult,
    combo_before: u32,
    is_slider: bool,
    difficulty_multiplier: u32,
    mod_multiplier: f32,
) -> u64 {
    let value = result.base_value() as u64;
    if value == 0 {
        return 0;
    }
    let slider_bonus = if is_slider { 1.0 } else { 0.0 };
    let combo_multiplier = combo_before.saturating_sub(1) as f64 + slider_bonus;
    let product = combo_multiplier * difficulty_multiplier as f64 * mod_multiplier as f64;
    if !product.is_finite() || product <= 0.0 {
        return value;
    }
    // float-to-int `as` saturates on overflow
    let bonus = (value as f64 * product / 25.0).floor() as u64;
    value.saturating_add(bonus)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    score: u64,
    hit_counts: HitCounts,
    full_object_count: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn hit_counts(&self) -> &HitCounts {
        &self.hit_counts
    }

    /// Every judged event, sub-events included
    pub fn full_object_count(&self) -> u32 {
        self.full_object_count
    }

    /// Add the score for a result and record it; returns the points added.
    pub fn apply(
        &mut self,
        result: HitResult,
        combo_before: u32,
        is_slider: bool,
        difficulty_multiplier: u32,
        mod_multiplier: f32,
    ) -> u64 {
        let delta = score_delta(
            result,
            combo_before,
            is_slider,
            difficulty_multiplier,
            mod_multiplier,
        );
        self.score = self.score.saturating_add(delta);
        self.hit_counts.record(result);
        self.full_object_count = self.full_object_count.saturating_add(1);
        delta
    }

    /// A slider tick that was not held.
    ///
    /// It counts toward `full_object_count` only; hit counts (and with them
    /// accuracy and grade) see note results alone.
    pub fn record_dropped_tick(&mut self) {
        self.full_object_count = self.full_object_count.saturating_add(1);
    }
}
