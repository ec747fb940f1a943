//! Game modifiers and the memoized score multiplier resolver.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, warn};

use crate::difficulty::Difficulty;
use crate::error::{Error, Result};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum GameMod {
    #[strum(serialize = "EZ")]
    #[serde(rename = "EZ")]
    Easy,
    #[strum(serialize = "NF")]
    #[serde(rename = "NF")]
    NoFail,
    #[strum(serialize = "HT")]
    #[serde(rename = "HT")]
    HalfTime,
    #[strum(serialize = "HR")]
    #[serde(rename = "HR")]
    HardRock,
    #[strum(serialize = "SD")]
    #[serde(rename = "SD")]
    SuddenDeath,
    #[strum(serialize = "PF")]
    #[serde(rename = "PF")]
    Perfect,
    #[strum(serialize = "DT")]
    #[serde(rename = "DT")]
    DoubleTime,
    #[strum(serialize = "NC")]
    #[serde(rename = "NC")]
    Nightcore,
    #[strum(serialize = "HD")]
    #[serde(rename = "HD")]
    Hidden,
    #[strum(serialize = "FL")]
    #[serde(rename = "FL")]
    Flashlight,
    #[strum(serialize = "RX")]
    #[serde(rename = "RX")]
    Relax,
    #[strum(serialize = "AP")]
    #[serde(rename = "AP")]
    Autopilot,
    #[strum(serialize = "SO")]
    #[serde(rename = "SO")]
    SpunOut,
    #[strum(serialize = "AT")]
    #[serde(rename = "AT")]
    Auto,
}

impl GameMod {
    /// Bit in the osu! mod bitmask
    pub fn bit(&self) -> u32 {
        match self {
            Self::NoFail => 1,
            Self::Easy => 1 << 1,
            Self::Hidden => 1 << 3,
            Self::HardRock => 1 << 4,
            Self::SuddenDeath => 1 << 5,
            Self::DoubleTime => 1 << 6,
            Self::Relax => 1 << 7,
            Self::HalfTime => 1 << 8,
            Self::Nightcore => 1 << 9,
            Self::Flashlight => 1 << 10,
            Self::Auto => 1 << 11,
            Self::SpunOut => 1 << 12,
            Self::Autopilot => 1 << 13,
            Self::Perfect => 1 << 14,
        }
    }

    pub fn default_score_multiplier(&self) -> f32 {
        match self {
            Self::Easy | Self::NoFail => 0.5,
            Self::HalfTime => 0.3,
            Self::HardRock | Self::Hidden => 1.06,
            Self::DoubleTime | Self::Nightcore | Self::Flashlight => 1.12,
            Self::Relax | Self::Autopilot => 0.0,
            Self::SpunOut => 0.9,
            Self::SuddenDeath | Self::Perfect | Self::Auto => 1.0,
        }
    }

    /// Mods under which the player can never fail
    pub fn suppresses_failure(&self) -> bool {
        matches!(
            self,
            Self::NoFail | Self::Auto | Self::Relax | Self::Autopilot
        )
    }

    /// Mods that award the silver variants of SS and S
    pub fn awards_silver(&self) -> bool {
        matches!(self, Self::Hidden | Self::Flashlight)
    }

    /// Mods turned off when this one is turned on
    fn conflicts(&self) -> &'static [GameMod] {
        match self {
            Self::Easy => &[Self::HardRock],
            Self::HardRock => &[Self::Easy],
            Self::NoFail => &[Self::SuddenDeath, Self::Perfect],
            Self::SuddenDeath => &[Self::NoFail, Self::Perfect],
            Self::Perfect => &[Self::NoFail, Self::SuddenDeath],
            Self::HalfTime => &[Self::DoubleTime, Self::Nightcore],
            Self::DoubleTime => &[Self::HalfTime, Self::Nightcore],
            Self::Nightcore => &[Self::HalfTime, Self::DoubleTime],
            Self::Relax => &[Self::Autopilot],
            Self::Autopilot => &[Self::Relax],
            Self::Auto => &[
                Self::SuddenDeath,
                Self::Perfect,
                Self::SpunOut,
                Self::Relax,
                Self::Autopilot,
            ],
            Self::Hidden | Self::Flashlight | Self::SpunOut => &[],
        }
    }

    /// Mods that cannot be enabled while Auto is active
    fn blocked_by_auto(&self) -> bool {
        matches!(
            self,
            Self::SuddenDeath | Self::Perfect | Self::SpunOut | Self::Relax | Self::Autopilot
        )
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

/// A set of active mods, stored as the osu! bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModSet(u32);

impl ModSet {
    pub fn empty() -> Self {
        Self(0)
    }

    /// Build from a bitmask, dropping bits that do not name a known mod
    pub fn from_bits(bits: u32) -> Self {
        let known = GameMod::iter().fold(0, |acc, m| acc | m.bit());
        if bits & !known != 0 {
            warn!("Ignoring unknown mod bits: {:#x}", bits & !known);
        }
        Self(bits & known)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, m: GameMod) -> bool {
        self.0 & m.bit() != 0
    }

    pub fn insert(&mut self, m: GameMod) {
        self.0 |= m.bit();
    }

    pub fn remove(&mut self, m: GameMod) {
        self.0 &= !m.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = GameMod> + '_ {
        GameMod::iter().filter(move |m| self.contains(*m))
    }

    /// Toggle a mod, enforcing mutual exclusion.
    ///
    /// Returns whether the mod is active afterwards.
    pub fn toggle(&mut self, m: GameMod) -> bool {
        if self.contains(m) {
            self.remove(m);
            return false;
        }

        if m.blocked_by_auto() && self.contains(GameMod::Auto) {
            debug!("{} cannot be enabled while Auto is active", m);
            return false;
        }

        for other in m.conflicts() {
            if self.contains(*other) {
                debug!("Disabling {} (conflicts with {})", other, m);
                self.remove(*other);
            }
        }
        self.insert(m);
        true
    }
}

impl FromIterator<GameMod> for ModSet {
    fn from_iter<I: IntoIterator<Item = GameMod>>(iter: I) -> Self {
        let mut set = Self::empty();
        for m in iter {
            set.insert(m);
        }
        set
    }
}

impl fmt::Display for ModSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let names: Vec<&str> = self.iter().map(|m| m.short_name()).collect();
        write!(f, "{}", names.join(","))
    }
}

impl FromStr for ModSet {
    type Err = Error;

    /// Parse a comma separated list of short names (e.g. `"HD,HR"`)
    fn from_str(s: &str) -> Result<Self> {
        let mut set = Self::empty();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case("none") {
                continue;
            }
            let m = GameMod::from_str(name).map_err(|_| Error::UnknownMod(name.to_string()))?;
            set.insert(m);
        }
        Ok(set)
    }
}

/// Per-mod score multipliers, defaulting to [`GameMod::default_score_multiplier`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModMultipliers {
    values: [f32; GameMod::COUNT],
}

impl Default for ModMultipliers {
    fn default() -> Self {
        let mut values = [1.0; GameMod::COUNT];
        for m in GameMod::iter() {
            values[m as usize] = m.default_score_multiplier();
        }
        Self { values }
    }
}

impl ModMultipliers {
    pub fn from_overrides(overrides: &HashMap<GameMod, f32>) -> Self {
        let mut multipliers = Self::default();
        for (m, value) in overrides {
            multipliers.set(*m, *value);
        }
        multipliers
    }

    pub fn get(&self, m: GameMod) -> f32 {
        self.values[m as usize]
    }

    pub fn set(&mut self, m: GameMod, value: f32) {
        if !value.is_finite() || value < 0.0 {
            warn!("Ignoring invalid multiplier {} for {}", value, m);
            return;
        }
        self.values[m as usize] = value;
    }
}

/// Resolves the active mod set into multipliers and predicates.
///
/// The product of score multipliers is computed lazily and cached until the next
/// change to the active set.
#[derive(Debug, Clone, Default)]
pub struct ModResolver {
    active: ModSet,
    multipliers: ModMultipliers,
    score_multiplier: Cell<Option<f32>>,
}

impl ModResolver {
    pub fn new(active: ModSet, multipliers: ModMultipliers) -> Self {
        Self {
            active,
            multipliers,
            score_multiplier: Cell::new(None),
        }
    }

    pub fn active(&self) -> ModSet {
        self.active
    }

    pub fn is_active(&self, m: GameMod) -> bool {
        self.active.contains(m)
    }

    /// Toggle a mod; the multiplier cache is invalidated before returning.
    pub fn toggle(&mut self, m: GameMod) -> bool {
        let enabled = self.active.toggle(m);
        self.invalidate();
        debug!("Mod {} toggled, active mods: {}", m, self.active);
        enabled
    }

    /// Replace the whole active set
    pub fn set_active(&mut self, active: ModSet) {
        self.active = active;
        self.invalidate();
    }

    pub fn set_multipliers(&mut self, multipliers: ModMultipliers) {
        self.multipliers = multipliers;
        self.invalidate();
    }

    fn invalidate(&self) {
        self.score_multiplier.set(None);
    }

    /// Product of the score multipliers of every active mod
    pub fn score_multiplier(&self) -> f32 {
        if let Some(cached) = self.score_multiplier.get() {
            return cached;
        }
        let value = self
            .active
            .iter()
            .map(|m| self.multipliers.get(m))
            .product::<f32>();
        self.score_multiplier.set(Some(value));
        value
    }

    pub fn suppresses_failure(&self) -> bool {
        self.active.iter().any(|m| m.suppresses_failure())
    }

    pub fn is_silver(&self) -> bool {
        self.active.iter().any(|m| m.awards_silver())
    }

    /// Any combo reset is an instant fail
    pub fn is_sudden_death(&self) -> bool {
        self.is_active(GameMod::SuddenDeath) || self.is_active(GameMod::Perfect)
    }

    /// Difficulty stats as they apply to timing windows and drain
    pub fn adjusted_difficulty(&self, difficulty: Difficulty) -> Difficulty {
        if self.is_active(GameMod::HardRock) {
            difficulty.hard_rock()
        } else if self.is_active(GameMod::Easy) {
            difficulty.easy()
        } else {
            difficulty.sanitized()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_round_trip() {
        let set: ModSet = [GameMod::Hidden, GameMod::HardRock].into_iter().collect();
        assert_eq!(set.bits(), 8 | 16);
        assert_eq!(ModSet::from_bits(24), set);
        assert_eq!(ModSet::from_bits(1 << 30), ModSet::empty());
    }

    #[test]
    fn test_parse_mod_list() {
        let set: ModSet = "hd, HR".parse().unwrap();
        assert!(set.contains(GameMod::Hidden));
        assert!(set.contains(GameMod::HardRock));
        assert_eq!(set.to_string(), "HR,HD");
        assert_eq!("".parse::<ModSet>().unwrap(), ModSet::empty());
        assert!(matches!("XX".parse::<ModSet>(), Err(Error::UnknownMod(_))));
    }

    #[test]
    fn test_toggle_mutual_exclusion() {
        let mut set = ModSet::empty();
        assert!(set.toggle(GameMod::Easy));
        assert!(set.toggle(GameMod::HardRock));
        assert!(!set.contains(GameMod::Easy));

        assert!(set.toggle(GameMod::NoFail));
        assert!(set.toggle(GameMod::SuddenDeath));
        assert!(!set.contains(GameMod::NoFail));

        assert!(!set.toggle(GameMod::HardRock));
        assert!(!set.contains(GameMod::HardRock));
    }

    #[test]
    fn test_auto_blocks_and_clears() {
        let mut set = ModSet::empty();
        set.toggle(GameMod::SpunOut);
        set.toggle(GameMod::SuddenDeath);
        assert!(set.toggle(GameMod::Auto));
        assert!(!set.contains(GameMod::SpunOut));
        assert!(!set.contains(GameMod::SuddenDeath));

        assert!(!set.toggle(GameMod::Relax));
        assert!(!set.contains(GameMod::Relax));
    }

    #[test]
    fn test_score_multiplier_product() {
        let resolver = ModResolver::new(
            [GameMod::Hidden, GameMod::DoubleTime].into_iter().collect(),
            ModMultipliers::default(),
        );
        assert!((resolver.score_multiplier() - 1.06 * 1.12).abs() < 1e-6);

        let none = ModResolver::default();
        assert_eq!(none.score_multiplier(), 1.0);
    }

    #[test]
    fn test_score_multiplier_invalidated_on_toggle() {
        let mut resolver = ModResolver::default();
        assert_eq!(resolver.score_multiplier(), 1.0);

        resolver.toggle(GameMod::Easy);
        assert_eq!(resolver.score_multiplier(), 0.5);

        resolver.toggle(GameMod::HardRock);
        assert!((resolver.score_multiplier() - 1.06).abs() < 1e-6);

        resolver.toggle(GameMod::HardRock);
        assert_eq!(resolver.score_multiplier(), 1.0);
    }

    #[test]
    fn test_multiplier_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(GameMod::Hidden, 1.5);
        overrides.insert(GameMod::Easy, -1.0);
        let multipliers = ModMultipliers::from_overrides(&overrides);
        assert_eq!(multipliers.get(GameMod::Hidden), 1.5);
        assert_eq!(multipliers.get(GameMod::Easy), 0.5);

        let mut resolver = ModResolver::default();
        resolver.set_active([GameMod::Hidden].into_iter().collect());
        assert!((resolver.score_multiplier() - 1.06).abs() < 1e-6);
        resolver.set_multipliers(multipliers);
        assert_eq!(resolver.score_multiplier(), 1.5);
    }

    #[test]
    fn test_predicates() {
        let mut resolver = ModResolver::default();
        assert!(!resolver.suppresses_failure());
        assert!(!resolver.is_silver());

        resolver.toggle(GameMod::Flashlight);
        assert!(resolver.is_silver());

        resolver.toggle(GameMod::Relax);
        assert!(resolver.suppresses_failure());

        resolver.toggle(GameMod::Perfect);
        assert!(resolver.is_sudden_death());
    }

    #[test]
    fn test_adjusted_difficulty() {
        let d = Difficulty::new(5.0, 5.0, 5.0);
        let mut resolver = ModResolver::default();
        assert_eq!(resolver.adjusted_difficulty(d), d);

        resolver.toggle(GameMod::HardRock);
        assert!((resolver.adjusted_difficulty(d).overall_difficulty - 7.0).abs() < 1e-5);

        resolver.toggle(GameMod::Easy);
        assert_eq!(resolver.adjusted_difficulty(d).overall_difficulty, 2.5);
    }
}
