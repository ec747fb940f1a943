use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr};

use crate::error::{Error, Result};

/// Judged result of a hit object or one of its sub-events.
///
/// `HundredKatu`, `ThreeHundredKatu` and `ThreeHundredGeki` are never produced by
/// the timing classifier; they only appear after combo-end reclassification.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum HitResult {
    #[strum(serialize = "MISS")]
    #[serde(rename = "MISS")]
    Miss = 0,
    #[strum(serialize = "50")]
    #[serde(rename = "50")]
    Fifty = 1,
    #[strum(serialize = "100")]
    #[serde(rename = "100")]
    Hundred = 2,
    #[strum(serialize = "300")]
    #[serde(rename = "300")]
    ThreeHundred = 3,
    #[strum(serialize = "100K")]
    #[serde(rename = "100K")]
    HundredKatu = 4,
    #[strum(serialize = "300K")]
    #[serde(rename = "300K")]
    ThreeHundredKatu = 5,
    #[strum(serialize = "300G")]
    #[serde(rename = "300G")]
    ThreeHundredGeki = 6,
    #[strum(serialize = "TICK10")]
    #[serde(rename = "TICK10")]
    SliderTickMinor = 7,
    #[strum(serialize = "TICK30")]
    #[serde(rename = "TICK30")]
    SliderTickMajor = 8,
    #[strum(serialize = "REPEAT")]
    #[serde(rename = "REPEAT")]
    SliderRepeat = 9,
    #[strum(serialize = "SPIN")]
    #[serde(rename = "SPIN")]
    SpinnerSpin = 10,
    #[strum(serialize = "BONUS")]
    #[serde(rename = "BONUS")]
    SpinnerBonus = 11,
}

impl HitResult {
    /// Decode a raw result code, rejecting anything outside the known range.
    pub fn from_u8(value: u8) -> Result<Self> {
        Self::from_repr(value).ok_or(Error::UnknownHitResult(value))
    }

    /// Points awarded before combo, difficulty and mod scaling
    pub fn base_value(&self) -> u32 {
        match self {
            Self::Miss => 0,
            Self::Fifty => 50,
            Self::Hundred => 100,
            Self::ThreeHundred => 300,
            Self::HundredKatu => 100,
            Self::ThreeHundredKatu => 300,
            Self::ThreeHundredGeki => 300,
            Self::SliderTickMinor => 10,
            Self::SliderTickMajor => 30,
            Self::SliderRepeat => 0,
            Self::SpinnerSpin => 100,
            Self::SpinnerBonus => 1100,
        }
    }

    /// A successful hit extends the combo; a repeat edge counts even though it scores nothing
    pub fn is_successful(&self) -> bool {
        self.base_value() > 0 || matches!(self, Self::SliderRepeat)
    }

    pub fn breaks_combo(&self) -> bool {
        matches!(self, Self::Miss)
    }

    /// Katu and Geki results derived at the end of a combo group
    pub fn is_combo_end_bonus(&self) -> bool {
        matches!(
            self,
            Self::HundredKatu | Self::ThreeHundredKatu | Self::ThreeHundredGeki
        )
    }

    /// Results a caller may pass for a slider or spinner sub-event
    pub fn is_sub_event(&self) -> bool {
        matches!(
            self,
            Self::SliderTickMinor
                | Self::SliderTickMajor
                | Self::SliderRepeat
                | Self::SpinnerSpin
                | Self::SpinnerBonus
        )
    }

    /// The timing class a bonus result was promoted from
    pub fn base_class(&self) -> Self {
        match self {
            Self::HundredKatu => Self::Hundred,
            Self::ThreeHundredKatu | Self::ThreeHundredGeki => Self::ThreeHundred,
            other => *other,
        }
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<u8> for HitResult {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value)
    }
}
