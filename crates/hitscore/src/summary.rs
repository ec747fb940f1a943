//! End-of-play summary record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mods::ModSet;
use crate::stats::Grade;

/// Final numbers of a play, handed to persistence and exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub timestamp: DateTime<Utc>,
    pub score: u64,
    pub max_combo: u32,
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub misses: u32,
    pub geki: u32,
    pub katu: u32,
    pub full_object_count: u32,
    /// Max combo covers every judged event
    pub perfect: bool,
    pub grade: Grade,
    /// osu! mod bitmask
    pub mods: ModSet,
    pub accuracy: f32,
    pub unstable_rate: f64,
    pub early_average: f64,
    pub late_average: f64,
}

impl ScoreSummary {
    pub fn hit_total(&self) -> u32 {
        self.n300 + self.n100 + self.n50 + self.misses
    }
}
