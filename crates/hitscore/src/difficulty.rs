//! Beatmap difficulty values and the coarse score difficulty multiplier.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Upper bound for every raw difficulty stat
pub const MAX_STAT: f32 = 10.0;

/// HardRock scales CS/OD/DR by this factor (capped at [`MAX_STAT`])
const HARD_ROCK_FACTOR: f32 = 1.4;

/// Easy scales CS/OD/DR by this factor
const EASY_FACTOR: f32 = 0.5;

/// Raw beatmap difficulty stats (drain rate, circle size, overall difficulty).
///
/// Values are clamped to `[0, 10]` on construction; NaN becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    pub drain_rate: f32,
    pub circle_size: f32,
    pub overall_difficulty: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            drain_rate: 5.0,
            circle_size: 5.0,
            overall_difficulty: 5.0,
        }
    }
}

impl Difficulty {
    pub fn new(drain_rate: f32, circle_size: f32, overall_difficulty: f32) -> Self {
        Self {
            drain_rate: clamp_stat("drain_rate", drain_rate),
            circle_size: clamp_stat("circle_size", circle_size),
            overall_difficulty: clamp_stat("overall_difficulty", overall_difficulty),
        }
    }

    /// Re-clamp values that may have bypassed [`Difficulty::new`] (e.g. deserialized).
    pub fn sanitized(&self) -> Self {
        Self::new(self.drain_rate, self.circle_size, self.overall_difficulty)
    }

    /// Score difficulty multiplier from the summed stats.
    ///
    /// Piecewise constant: sum <= 5 -> 2, <= 12 -> 3, <= 17 -> 4, <= 24 -> 5, else 6.
    pub fn score_multiplier(&self) -> u32 {
        let s = self.sanitized();
        let sum = s.drain_rate + s.circle_size + s.overall_difficulty;
        if sum <= 5.0 {
            2
        } else if sum <= 12.0 {
            3
        } else if sum <= 17.0 {
            4
        } else if sum <= 24.0 {
            5
        } else {
            6
        }
    }

    /// Stats as played under HardRock
    pub fn hard_rock(&self) -> Self {
        self.scaled(HARD_ROCK_FACTOR)
    }

    /// Stats as played under Easy
    pub fn easy(&self) -> Self {
        self.scaled(EASY_FACTOR)
    }

    fn scaled(&self, factor: f32) -> Self {
        let s = self.sanitized();
        Self::new(
            (s.drain_rate * factor).min(MAX_STAT),
            (s.circle_size * factor).min(MAX_STAT),
            (s.overall_difficulty * factor).min(MAX_STAT),
        )
    }
}

fn clamp_stat(name: &str, value: f32) -> f32 {
    if value.is_nan() {
        warn!("Difficulty stat {} is NaN, using 0", name);
        return 0.0;
    }
    if !(0.0..=MAX_STAT).contains(&value) {
        warn!("Difficulty stat {} out of range: {}, clamping", name, value);
    }
    value.clamp(0.0, MAX_STAT)
}
