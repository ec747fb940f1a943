use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::score::HitCounts;

/// Letter grade of a finished (or ongoing) play
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
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum Grade {
    /// Nothing judged yet
    #[default]
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    None,
    #[strum(serialize = "SSH")]
    #[serde(rename = "SSH")]
    SilverSS,
    SS,
    #[strum(serialize = "SH")]
    #[serde(rename = "SH")]
    SilverS,
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn short_name(&self) -> &'static str {
        self.into()
    }

    pub fn is_silver(&self) -> bool {
        matches!(self, Self::SilverSS | Self::SilverS)
    }

    /// Grade from base-class hit counts; the first matching rule wins.
    pub fn from_counts(counts: &HitCounts, silver: bool) -> Self {
        let total = counts.judged_objects();
        if total == 0 {
            return Self::None;
        }

        let percent = accuracy(counts);
        let ratio300 = counts.n300() as f32 * 100.0 / total as f32;
        let ratio50 = counts.n50() as f32 * 100.0 / total as f32;
        let no_miss = counts.misses() == 0;

        if percent >= 100.0 {
            if silver { Self::SilverSS } else { Self::SS }
        } else if ratio300 >= 90.0 && ratio50 < 1.0 && no_miss {
            if silver { Self::SilverS } else { Self::S }
        } else if (ratio300 >= 80.0 && no_miss) || ratio300 >= 90.0 {
            Self::A
        } else if (ratio300 >= 70.0 && no_miss) || ratio300 >= 80.0 {
            Self::B
        } else if ratio300 >= 60.0 {
            Self::C
        } else {
            Self::D
        }
    }
}

/// Accuracy percentage in `[0, 100]`; 0 when nothing has been judged.
pub fn accuracy(counts: &HitCounts) -> f32 {
    let total = counts.judged_objects() as f64;
    if total == 0.0 {
        return 0.0;
    }
    let points = counts.n300() as f64 * 300.0
        + counts.n100() as f64 * 100.0
        + counts.n50() as f64 * 50.0;
    (points / (total * 300.0) * 100.0) as f32
}
