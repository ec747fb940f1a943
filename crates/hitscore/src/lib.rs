//! # hitscore
//!
//! Judgment, combo, health and scoring engine for a circle-clicking rhythm game.
//!
//! This crate provides:
//! - Timing windows and hit classification (`judge`)
//! - Combo tracking with combo-end Geki/Katu promotion (`combo`)
//! - Health, passive drain and failure (`health`)
//! - Score accumulation with difficulty and mod multipliers (`score`, `mods`)
//! - Accuracy, grade and unstable rate (`stats`)
//! - A [`PlaySession`] that applies every event in a fixed order
//!
//! The engine is single-threaded and does no I/O during play.

pub mod combo;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod export;
pub mod health;
pub mod judge;
pub mod mods;
pub mod prelude;
pub mod score;
pub mod session;
pub mod stats;
pub mod summary;

pub use combo::{ComboEndFlags, ComboState, ComboUpdate};
pub use config::{EngineConfig, EngineConfigBuilder, HealthConfig, HealthDeltas};
pub use difficulty::Difficulty;
pub use error::{Error, Result};
pub use export::{ExportFormat, JsonExporter, TsvExporter, append_summaries};
pub use health::HealthState;
pub use judge::{
    HitResult, ObjectKind, ObjectMeta, SpinnerTracker, TimingWindows, slider_result,
    spinner_rotations_needed,
};
pub use mods::{GameMod, ModMultipliers, ModResolver, ModSet};
pub use score::{HitCounts, ScoreState, score_delta};
pub use session::{JudgeOutcome, PlaySession};
pub use stats::{Grade, HitErrorDisplay, HitErrorSample, HitErrorStats, accuracy};
pub use summary::ScoreSummary;
