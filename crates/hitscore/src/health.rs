//! Health bar: per-result deltas, passive drain and failure.

use tracing::warn;

use crate::config::HealthConfig;
use crate::judge::HitResult;

pub const MAX_HEALTH: f32 = 100.0;

/// Health in `[0, 100]`, clamped after every mutation
#[derive(Debug, Clone, PartialEq)]
pub struct HealthState {
    health: f32,
    config: HealthConfig,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new(HealthConfig::default())
    }
}

impl HealthState {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            health: MAX_HEALTH,
            config,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Refill to full, keeping the configuration
    pub fn reset(&mut self) {
        self.health = MAX_HEALTH;
    }

    /// Delta for a final (possibly reclassified) result, with multipliers applied
    pub fn delta_for(&self, result: HitResult) -> f32 {
        let delta = self.config.deltas.get(result);
        if delta <= 0.0 {
            return delta;
        }
        if result.is_combo_end_bonus() {
            delta * self.config.combo_end_multiplier
        } else {
            delta * self.config.normal_multiplier
        }
    }

    pub fn apply(&mut self, result: HitResult) -> f32 {
        let delta = self.delta_for(result);
        self.change(delta);
        self.health
    }

    /// Add a signed amount; NaN is ignored.
    pub fn change(&mut self, delta: f32) {
        if delta.is_nan() {
            warn!("Ignoring NaN health delta");
            return;
        }
        self.health = (self.health + delta).clamp(0.0, MAX_HEALTH);
    }

    /// Passive drain over `elapsed_ms` of play.
    pub fn drain(&mut self, elapsed_ms: f32) {
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            warn!("Ignoring invalid drain interval: {}", elapsed_ms);
            return;
        }
        self.change(-(elapsed_ms * self.config.drain_rate));
    }

    pub fn set_zero(&mut self) {
        self.health = 0.0;
    }

    pub fn is_zero(&self) -> bool {
        self.health <= 0.0
    }

    /// Whether the player is still alive; a failure-suppressing mod keeps them alive at 0.
    pub fn is_alive(&self, suppress_failure: bool) -> bool {
        self.health > 0.0 || suppress_failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_to_range() {
        let mut health = HealthState::default();
        health.apply(HitResult::ThreeHundredGeki);
        assert_eq!(health.health(), MAX_HEALTH);

        for _ in 0..15 {
            health.apply(HitResult::Miss);
        }
        assert_eq!(health.health(), 0.0);
        assert!(!health.is_alive(false));
        assert!(health.is_alive(true));
    }

    #[test]
    fn test_promoted_result_uses_its_own_delta() {
        let mut health = HealthState::default();
        health.change(-50.0);
        health.apply(HitResult::ThreeHundredGeki);
        assert_eq!(health.health(), 65.0);
        health.apply(HitResult::HundredKatu);
        assert_eq!(health.health(), 75.0);
    }

    #[test]
    fn test_multipliers_scale_positive_deltas_only() {
        let config = HealthConfig {
            normal_multiplier: 0.5,
            combo_end_multiplier: 2.0,
            ..Default::default()
        };
        let health = HealthState::new(config);
        assert_eq!(health.delta_for(HitResult::ThreeHundred), 2.5);
        assert_eq!(health.delta_for(HitResult::ThreeHundredKatu), 20.0);
        assert_eq!(health.delta_for(HitResult::Miss), -10.0);
        assert_eq!(health.delta_for(HitResult::Fifty), 0.0);
    }

    #[test]
    fn test_drain() {
        let mut health = HealthState::default();
        health.drain(2000.0);
        assert!((health.health() - 90.0).abs() < 1e-4);

        health.drain(-100.0);
        health.drain(f32::NAN);
        assert!((health.health() - 90.0).abs() < 1e-4);

        health.drain(1_000_000.0);
        assert_eq!(health.health(), 0.0);
    }

    #[test]
    fn test_nan_delta_ignored() {
        let mut health = HealthState::default();
        health.change(-30.0);
        health.change(f32::NAN);
        assert_eq!(health.health(), 70.0);
    }

    #[test]
    fn test_set_zero_and_reset() {
        let mut health = HealthState::default();
        health.set_zero();
        assert!(health.is_zero());
        health.reset();
        assert_eq!(health.health(), MAX_HEALTH);
    }
}
