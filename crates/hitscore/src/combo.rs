//! Combo counter and combo-end (Geki/Katu) tracking.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::judge::HitResult;

/// Breaking a combo at least this long plays the combo-break cue
pub const COMBO_BREAK_CUE_MIN: u32 = 20;

bitflags! {
    /// What went wrong so far in the current combo group
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ComboEndFlags: u8 {
        const HAD_NON_300 = 1;
        const HAD_MISS_OR_50 = 1 << 1;
    }
}

/// Effect of a single result on the combo counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboUpdate {
    /// Combo before the result was applied
    pub combo_before: u32,
    /// Set when a combo long enough for the break cue was reset
    pub combo_break: bool,
    /// The counter went to zero (regardless of length)
    pub reset: bool,
    /// Combo milestone reached by this increment
    pub milestone: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComboState {
    current: u32,
    max: u32,
    flags: ComboEndFlags,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn flags(&self) -> ComboEndFlags {
        self.flags
    }

    /// Apply a classified result to the counter and the group flags.
    pub fn apply(&mut self, result: HitResult) -> ComboUpdate {
        let mut update = ComboUpdate {
            combo_before: self.current,
            ..Default::default()
        };

        match result {
            HitResult::Hundred => self.flags |= ComboEndFlags::HAD_NON_300,
            HitResult::Fifty | HitResult::Miss => self.flags |= ComboEndFlags::HAD_MISS_OR_50,
            _ => {}
        }

        if result.breaks_combo() {
            if self.current >= COMBO_BREAK_CUE_MIN {
                debug!("Combo break at {}", self.current);
                update.combo_break = true;
            }
            update.reset = true;
            self.current = 0;
        } else if result.is_successful() {
            self.current = self.current.saturating_add(1);
            self.max = self.max.max(self.current);
            update.milestone = milestone(self.current);
        }

        update
    }

    /// Reclassify the result of a group's last object, then start a new group.
    ///
    /// No flags promotes to Geki. Only `HAD_NON_300` promotes 100/300 to Katu.
    /// A group that saw a 50 or a miss is left as is.
    pub fn finish_group(&mut self, result: HitResult) -> HitResult {
        let flags = std::mem::take(&mut self.flags);
        if flags.is_empty() {
            match result {
                HitResult::ThreeHundred => HitResult::ThreeHundredGeki,
                other => other,
            }
        } else if !flags.contains(ComboEndFlags::HAD_MISS_OR_50) {
            match result {
                HitResult::Hundred => HitResult::HundredKatu,
                HitResult::ThreeHundred => HitResult::ThreeHundredKatu,
                other => other,
            }
        } else {
            result
        }
    }
}

/// Combo values that play a milestone cue: 30, 60, then every 50 from 100
pub fn milestone(combo: u32) -> Option<u32> {
    let hit = combo == 30 || combo == 60 || (combo >= 100 && combo % 50 == 0);
    hit.then_some(combo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(combo: &mut ComboState, results: &[HitResult]) -> HitResult {
        let (last, rest) = results.split_last().unwrap();
        for r in rest {
            combo.apply(*r);
        }
        combo.apply(*last);
        combo.finish_group(*last)
    }

    #[test]
    fn test_increment_and_max() {
        let mut combo = ComboState::new();
        combo.apply(HitResult::ThreeHundred);
        combo.apply(HitResult::SliderTickMinor);
        combo.apply(HitResult::SpinnerSpin);
        assert_eq!(combo.current(), 3);
        assert_eq!(combo.max(), 3);

        let update = combo.apply(HitResult::Miss);
        assert!(update.reset);
        assert!(!update.combo_break);
        assert_eq!(update.combo_before, 3);
        assert_eq!(combo.current(), 0);
        assert_eq!(combo.max(), 3);
    }

    #[test]
    fn test_repeat_extends_combo() {
        let mut combo = ComboState::new();
        combo.apply(HitResult::Fifty);
        let update = combo.apply(HitResult::SliderRepeat);
        assert!(!update.reset);
        assert_eq!(update.combo_before, 1);
        assert_eq!(combo.current(), 2);
        assert_eq!(combo.max(), 2);
    }

    #[test]
    fn test_combo_break_cue_threshold() {
        let mut combo = ComboState::new();
        for _ in 0..19 {
            combo.apply(HitResult::ThreeHundred);
        }
        assert!(!combo.apply(HitResult::Miss).combo_break);

        for _ in 0..20 {
            combo.apply(HitResult::ThreeHundred);
        }
        assert!(combo.apply(HitResult::Miss).combo_break);
    }

    #[test]
    fn test_milestones() {
        assert_eq!(milestone(30), Some(30));
        assert_eq!(milestone(60), Some(60));
        assert_eq!(milestone(50), None);
        assert_eq!(milestone(100), Some(100));
        assert_eq!(milestone(150), Some(150));
        assert_eq!(milestone(175), None);

        let mut combo = ComboState::new();
        let hits: Vec<_> = (0..60)
            .filter_map(|_| combo.apply(HitResult::ThreeHundred).milestone)
            .collect();
        assert_eq!(hits, vec![30, 60]);
    }

    #[test]
    fn test_combo_end_geki() {
        let mut combo = ComboState::new();
        let last = group(&mut combo, &[HitResult::ThreeHundred; 3]);
        assert_eq!(last, HitResult::ThreeHundredGeki);
        assert!(combo.flags().is_empty());
    }

    #[test]
    fn test_combo_end_katu() {
        let mut combo = ComboState::new();
        let last = group(
            &mut combo,
            &[HitResult::ThreeHundred, HitResult::Hundred, HitResult::ThreeHundred],
        );
        assert_eq!(last, HitResult::ThreeHundredKatu);

        let last = group(
            &mut combo,
            &[HitResult::ThreeHundred, HitResult::ThreeHundred, HitResult::Hundred],
        );
        assert_eq!(last, HitResult::HundredKatu);
    }

    #[test]
    fn test_combo_end_no_promotion_after_fifty_or_miss() {
        let mut combo = ComboState::new();
        let last = group(
            &mut combo,
            &[HitResult::ThreeHundred, HitResult::Fifty, HitResult::ThreeHundred],
        );
        assert_eq!(last, HitResult::ThreeHundred);

        let last = group(&mut combo, &[HitResult::Miss; 3]);
        assert_eq!(last, HitResult::Miss);
        assert!(combo.flags().is_empty());
    }

    #[test]
    fn test_flags_cleared_between_groups() {
        let mut combo = ComboState::new();
        group(&mut combo, &[HitResult::Hundred, HitResult::Fifty]);
        let last = group(&mut combo, &[HitResult::ThreeHundred, HitResult::ThreeHundred]);
        assert_eq!(last, HitResult::ThreeHundredGeki);
    }
}
