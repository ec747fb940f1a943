//! Event script format read by `hitscore simulate`.

use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hitscore::{
    Difficulty, EngineConfig, GameMod, HitResult, JudgeOutcome, ModSet, ObjectKind, ObjectMeta,
    PlaySession, slider_result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub mods: Vec<GameMod>,
    pub events: Vec<ScriptEvent>,
}

/// Object fields shared by most events
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_time: i32,
    #[serde(default)]
    pub object: ObjectKind,
    #[serde(default)]
    pub combo_end: bool,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl ObjectRef {
    fn meta(&self) -> ObjectMeta {
        ObjectMeta::new(self.object, self.object_time)
            .with_combo_end(self.combo_end)
            .at(self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Click at `offset_ms` from the object time
    Hit {
        offset_ms: i32,
        #[serde(flatten)]
        target: ObjectRef,
    },
    /// Object passed without a click
    Miss {
        #[serde(flatten)]
        target: ObjectRef,
    },
    /// Raw result code
    Result {
        code: u8,
        #[serde(flatten)]
        target: ObjectRef,
    },
    Tick {
        #[serde(default)]
        major: bool,
        #[serde(default = "default_true")]
        held: bool,
        #[serde(flatten)]
        target: ObjectRef,
    },
    Repeat {
        #[serde(flatten)]
        target: ObjectRef,
    },
    SliderEnd {
        ticks_hit: u32,
        tick_intervals: u32,
        #[serde(flatten)]
        target: ObjectRef,
    },
    Spin {
        #[serde(default)]
        bonus: bool,
        #[serde(flatten)]
        target: ObjectRef,
    },
    /// Whole spinner: rotations are fed in one update (capped), then the spinner is judged
    Spinner {
        duration_ms: i32,
        rotations: f32,
        #[serde(flatten)]
        target: ObjectRef,
    },
    Drain {
        elapsed_ms: f32,
    },
}

fn default_true() -> bool {
    true
}

impl Script {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let script = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse script {}", path.display()))?;
        Ok(script)
    }

    pub fn mod_set(&self) -> ModSet {
        let mut set = ModSet::empty();
        for m in &self.mods {
            if !set.toggle(*m) {
                warn!("Mod {} could not be enabled with {}", m, set);
            }
        }
        set
    }

    /// Play every event through a fresh session
    pub fn run(&self, config: &EngineConfig) -> Result<PlaySession> {
        let mods = self.mod_set();
        let mut session = PlaySession::new(self.difficulty, mods, config);
        info!(
            "Simulating {} events (OD {}, mods {})",
            self.events.len(),
            session.adjusted_difficulty().overall_difficulty,
            mods
        );

        for (index, event) in self.events.iter().enumerate() {
            let outcomes = apply_event(&mut session, event)
                .with_context(|| format!("Event {} failed", index))?;
            for outcome in &outcomes {
                log_outcome(index, outcome);
            }
            if !session.is_alive() {
                info!("Failed at event {}", index);
                break;
            }
        }

        Ok(session)
    }
}

fn apply_event(
    session: &mut PlaySession,
    event: &ScriptEvent,
) -> hitscore::Result<Vec<JudgeOutcome>> {
    let outcome = match event {
        ScriptEvent::Hit { offset_ms, target } => {
            let meta = target.meta();
            let now = meta.time_ms + offset_ms;
            session.update_display(now);
            let outcome = match session.judge_hit(*offset_ms, &meta)? {
                Some(outcome) => outcome,
                None => {
                    debug!("Click at {}ms ignored, outside the miss window", offset_ms);
                    return Ok(Vec::new());
                }
            };
            for (sample, alpha) in session.hit_error_display().visible(now) {
                trace!(
                    "Hit error {:+}ms at ({:.0}, {:.0}) alpha={:.2}",
                    sample.time_diff_ms, sample.x, sample.y, alpha
                );
            }
            outcome
        }
        ScriptEvent::Miss { target } => session.judge_expired(&target.meta())?,
        ScriptEvent::Result { code, target } => session.judge_code(*code, &target.meta())?,
        ScriptEvent::Tick {
            major,
            held,
            target,
        } => session.judge_slider_tick(*major, *held, &target.meta())?,
        ScriptEvent::Repeat { target } => session.judge_slider_repeat(&target.meta())?,
        ScriptEvent::SliderEnd {
            ticks_hit,
            tick_intervals,
            target,
        } => {
            let result = slider_result(*ticks_hit, *tick_intervals);
            session.judge(result, &target.meta())?
        }
        ScriptEvent::Spin { bonus, target } => {
            session.judge_spinner_spin(*bonus, &target.meta())?
        }
        ScriptEvent::Spinner {
            duration_ms,
            rotations,
            target,
        } => {
            let meta = target.meta();
            let mut tracker = session.spinner(*duration_ms);
            let mut outcomes = session.spin(&mut tracker, rotations * TAU, &meta)?;
            outcomes.push(session.finish_spinner(&tracker, &meta)?);
            return Ok(outcomes);
        }
        ScriptEvent::Drain { elapsed_ms } => {
            session.drain(*elapsed_ms);
            return Ok(Vec::new());
        }
    };
    Ok(vec![outcome])
}

fn log_outcome(index: usize, outcome: &JudgeOutcome) {
    debug!(
        "[{}] {} +{} combo={} hp={:.1}",
        index, outcome.result, outcome.score_delta, outcome.combo, outcome.health
    );
    if outcome.combo_break {
        info!("[{}] Combo break", index);
    }
    if let Some(combo) = outcome.milestone {
        debug!("[{}] {}x combo", index, combo);
    }
    if outcome.result == HitResult::ThreeHundredGeki {
        debug!("[{}] Geki", index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hitscore::Grade;

    fn parse(json: &str) -> Script {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_events() {
        let script = parse(
            r#"{
                "difficulty": {"drain_rate": 5, "circle_size": 4, "overall_difficulty": 8},
                "mods": ["HD", "HR"],
                "events": [
                    {"kind": "hit", "offset_ms": -12, "object_time": 1000, "object": "circle"},
                    {"kind": "tick", "object_time": 1200, "object": "slider"},
                    {"kind": "slider_end", "ticks_hit": 2, "tick_intervals": 2, "object_time": 1200, "object": "slider", "combo_end": true},
                    {"kind": "drain", "elapsed_ms": 500}
                ]
            }"#,
        );
        assert_eq!(script.events.len(), 4);
        assert_eq!(script.mod_set().bits(), 8 | 16);
        assert!(matches!(
            script.events[1],
            ScriptEvent::Tick {
                held: true,
                major: false,
                ..
            }
        ));
    }

    #[test]
    fn test_run_script() {
        let script = parse(
            r#"{
                "difficulty": {"drain_rate": 5, "circle_size": 4, "overall_difficulty": 8},
                "events": [
                    {"kind": "hit", "offset_ms": 5, "object_time": 0},
                    {"kind": "hit", "offset_ms": -10, "object_time": 500},
                    {"kind": "hit", "offset_ms": 0, "object_time": 1000, "combo_end": true},
                    {"kind": "hit", "offset_ms": -1000, "object_time": 1500},
                    {"kind": "miss", "object_time": 1500, "combo_end": true}
                ]
            }"#,
        );
        let session = script.run(&EngineConfig::default()).unwrap();
        let summary = session.summary();
        assert_eq!(summary.n300, 3);
        assert_eq!(summary.geki, 1);
        assert_eq!(summary.misses, 1);
        assert_eq!(summary.max_combo, 3);
        assert_eq!(summary.grade, Grade::C);
        assert_eq!(session.hit_errors().len(), 3);
    }

    #[test]
    fn test_spinner_event() {
        let script = parse(
            r#"{
                "events": [
                    {"kind": "spinner", "duration_ms": 2000, "rotations": 8.5, "object_time": 0, "object": "spinner", "combo_end": true}
                ]
            }"#,
        );
        let session = script.run(&EngineConfig::default()).unwrap();
        let summary = session.summary();
        assert_eq!(summary.geki, 1);
        assert_eq!(summary.full_object_count, 9);
    }

    #[test]
    fn test_spinner_event_with_huge_rotation_count() {
        let script = parse(
            r#"{
                "events": [
                    {"kind": "spinner", "duration_ms": 1000, "rotations": 1e9, "object_time": 0, "object": "spinner"}
                ]
            }"#,
        );
        let session = script.run(&EngineConfig::default()).unwrap();
        let summary = session.summary();
        // capped spin events plus the spinner itself
        assert_eq!(summary.full_object_count, 65);
        assert_eq!(summary.n300, 1);
    }

    #[test]
    fn test_unknown_code_fails() {
        let script = parse(r#"{"events": [{"kind": "result", "code": 99, "object_time": 0}]}"#);
        assert!(script.run(&EngineConfig::default()).is_err());
    }

    #[test]
    fn test_sudden_death_stops_script() {
        let script = parse(
            r#"{
                "mods": ["SD"],
                "events": [
                    {"kind": "miss", "object_time": 0},
                    {"kind": "hit", "offset_ms": 0, "object_time": 500}
                ]
            }"#,
        );
        let session = script.run(&EngineConfig::default()).unwrap();
        assert_eq!(session.score_state().full_object_count(), 1);
    }

    #[test]
    fn test_conflicting_mods_resolved() {
        let script = parse(r#"{"mods": ["HR", "EZ", "AT", "SD"], "events": []}"#);
        let set = script.mod_set();
        assert!(set.contains(GameMod::Easy));
        assert!(!set.contains(GameMod::HardRock));
        assert!(set.contains(GameMod::Auto));
        assert!(!set.contains(GameMod::SuddenDeath));
    }
}
