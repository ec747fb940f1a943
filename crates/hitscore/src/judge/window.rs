//! Timing windows derived from overall difficulty.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::judge::HitResult;

/// Hit window radii in milliseconds.
///
/// `great_ms` is the 300 window, `good_ms` the 100 window, `meh_ms` the 50 window.
/// `miss_ms` bounds how early a click is still taken as an attempt on the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingWindows {
    pub great_ms: u32,
    pub good_ms: u32,
    pub meh_ms: u32,
    pub miss_ms: u32,
}

impl TimingWindows {
    /// Build windows, checking `miss >= meh > good > great`.
    pub fn new(great_ms: u32, good_ms: u32, meh_ms: u32, miss_ms: u32) -> Result<Self> {
        if !(great_ms < good_ms && good_ms < meh_ms && meh_ms <= miss_ms) {
            return Err(Error::InvalidConfig(format!(
                "timing windows must be ordered: 300={} 100={} 50={} miss={}",
                great_ms, good_ms, meh_ms, miss_ms
            )));
        }
        Ok(Self {
            great_ms,
            good_ms,
            meh_ms,
            miss_ms,
        })
    }

    /// Windows for an overall difficulty value (clamped to `[0, 10]`).
    pub fn from_od(od: f32) -> Self {
        let od = if od.is_nan() { 0.0 } else { od.clamp(0.0, 10.0) };
        Self {
            great_ms: (78.0 - od * 6.0) as u32,
            good_ms: (138.0 - od * 8.0) as u32,
            meh_ms: (198.0 - od * 10.0) as u32,
            miss_ms: (500.0 - od * 10.0) as u32,
        }
    }

    /// Classify a signed timing offset.
    ///
    /// Each window is inclusive at its edge, so a tie goes to the stricter class.
    pub fn classify(&self, offset_ms: i32) -> HitResult {
        let diff = offset_ms.unsigned_abs();
        if diff <= self.great_ms {
            HitResult::ThreeHundred
        } else if diff <= self.good_ms {
            HitResult::Hundred
        } else if diff <= self.meh_ms {
            HitResult::Fifty
        } else {
            HitResult::Miss
        }
    }

    /// Whether a click at this offset counts as an attempt on the object at all
    pub fn accepts(&self, offset_ms: i32) -> bool {
        offset_ms.unsigned_abs() <= self.miss_ms
    }
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self::from_od(5.0)
    }
}
