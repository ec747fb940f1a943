//! Prelude module for convenient imports
//!
//! ```ignore
//! use hitscore::prelude::*;
//! ```

// Session and configuration
pub use crate::config::EngineConfig;
pub use crate::session::{JudgeOutcome, PlaySession};

// Error handling
pub use crate::error::{Error, Result};

// Chart inputs
pub use crate::difficulty::Difficulty;
pub use crate::judge::{HitResult, ObjectMeta, TimingWindows};
pub use crate::mods::{GameMod, ModSet};

// Results
pub use crate::stats::Grade;
pub use crate::summary::ScoreSummary;

// Export format trait
pub use crate::export::ExportFormat;
