//! Engine configuration: health deltas, drain, mod multipliers and display timing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::judge::HitResult;
use crate::mods::{GameMod, ModMultipliers};

/// Passive drain per millisecond of play
pub const DEFAULT_DRAIN_RATE: f32 = 1.0 / 200.0;

/// How long a hit error stays on the timing bar (ms)
pub const DEFAULT_HIT_ERROR_DISPLAY_MS: u32 = 5000;

/// Health change applied for each result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthDeltas {
    pub three_hundred: f32,
    pub hundred: f32,
    pub fifty: f32,
    pub miss: f32,
    pub geki: f32,
    pub katu: f32,
    pub tick_major: f32,
    pub tick_minor: f32,
    pub repeat: f32,
    pub spin: f32,
    pub bonus: f32,
}

impl Default for HealthDeltas {
    fn default() -> Self {
        Self {
            three_hundred: 5.0,
            hundred: 2.0,
            fifty: 0.0,
            miss: -10.0,
            geki: 15.0,
            katu: 10.0,
            tick_major: 1.0,
            tick_minor: 0.0,
            repeat: 1.0,
            spin: 1.7,
            bonus: 2.0,
        }
    }
}

impl HealthDeltas {
    pub fn get(&self, result: HitResult) -> f32 {
        match result {
            HitResult::Miss => self.miss,
            HitResult::Fifty => self.fifty,
            HitResult::Hundred => self.hundred,
            HitResult::ThreeHundred => self.three_hundred,
            HitResult::HundredKatu | HitResult::ThreeHundredKatu => self.katu,
            HitResult::ThreeHundredGeki => self.geki,
            HitResult::SliderTickMinor => self.tick_minor,
            HitResult::SliderTickMajor => self.tick_major,
            HitResult::SliderRepeat => self.repeat,
            HitResult::SpinnerSpin => self.spin,
            HitResult::SpinnerBonus => self.bonus,
        }
    }

    fn values(&self) -> [f32; 11] {
        [
            self.three_hundred,
            self.hundred,
            self.fifty,
            self.miss,
            self.geki,
            self.katu,
            self.tick_major,
            self.tick_minor,
            self.repeat,
            self.spin,
            self.bonus,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub deltas: HealthDeltas,
    /// Health lost per millisecond of drain
    pub drain_rate: f32,
    /// Scales positive deltas of ordinary results
    pub normal_multiplier: f32,
    /// Scales Katu/Geki deltas
    pub combo_end_multiplier: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            deltas: HealthDeltas::default(),
            drain_rate: DEFAULT_DRAIN_RATE,
            normal_multiplier: 1.0,
            combo_end_multiplier: 1.0,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub health: HealthConfig,
    /// Score multiplier overrides, keyed by mod short name
    pub mod_multipliers: HashMap<GameMod, f32>,
    pub hit_error_display_ms: Option<u32>,
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) if e.is_not_found() => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        let health = &self.health;
        if !health.drain_rate.is_finite() || health.drain_rate < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "drain rate must be a non-negative number, got {}",
                health.drain_rate
            )));
        }
        for (name, value) in [
            ("normal_multiplier", health.normal_multiplier),
            ("combo_end_multiplier", health.combo_end_multiplier),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if health.deltas.values().iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig(
                "health deltas must be finite".to_string(),
            ));
        }
        for (m, value) in &self.mod_multipliers {
            if !value.is_finite() || *value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "score multiplier for {} must be a non-negative number, got {}",
                    m, value
                )));
            }
        }
        Ok(())
    }

    pub fn multipliers(&self) -> ModMultipliers {
        ModMultipliers::from_overrides(&self.mod_multipliers)
    }

    pub fn hit_error_display_ms(&self) -> u32 {
        self.hit_error_display_ms
            .unwrap_or(DEFAULT_HIT_ERROR_DISPLAY_MS)
    }
}

/// Builder for EngineConfig
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    health: Option<HealthConfig>,
    drain_rate: Option<f32>,
    mod_multipliers: HashMap<GameMod, f32>,
    hit_error_display_ms: Option<u32>,
}

impl EngineConfigBuilder {
    /// Replace the whole health table
    pub fn health(mut self, health: HealthConfig) -> Self {
        self.health = Some(health);
        self
    }

    /// Set the passive drain per millisecond
    pub fn drain_rate(mut self, rate: f32) -> Self {
        self.drain_rate = Some(rate);
        self
    }

    /// Override the score multiplier of one mod
    pub fn mod_multiplier(mut self, m: GameMod, value: f32) -> Self {
        self.mod_multipliers.insert(m, value);
        self
    }

    pub fn hit_error_display_ms(mut self, ms: u32) -> Self {
        self.hit_error_display_ms = Some(ms);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<EngineConfig> {
        let mut health = self.health.unwrap_or_default();
        if let Some(rate) = self.drain_rate {
            health.drain_rate = rate;
        }
        let config = EngineConfig {
            health,
            mod_multipliers: self.mod_multipliers,
            hit_error_display_ms: self.hit_error_display_ms,
        };
        config.validate()?;
        Ok(config)
    }
}
