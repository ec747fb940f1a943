//! Play session: owns every piece of engine state and applies judgments in order.
//!
//! Every event goes through the same pipeline: combo update, combo-end
//! reclassification, health, score, then statistics.

use chrono::Utc;
use tracing::{debug, info};

use crate::combo::ComboState;
use crate::config::EngineConfig;
use crate::difficulty::Difficulty;
use crate::error::{Error, Result};
use crate::health::HealthState;
use crate::judge::{HitResult, ObjectMeta, SpinnerTracker, TimingWindows};
use crate::mods::{GameMod, ModResolver, ModSet};
use crate::score::ScoreState;
use crate::stats::{Grade, HitErrorDisplay, HitErrorSample, HitErrorStats, accuracy};
use crate::summary::ScoreSummary;

/// What a single judgment did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgeOutcome {
    /// Final result after combo-end reclassification
    pub result: HitResult,
    /// A combo long enough for the break cue was lost
    pub combo_break: bool,
    /// Health is at zero after this judgment
    pub health_zero: bool,
    /// Combo milestone reached
    pub milestone: Option<u32>,
    pub score_delta: u64,
    pub combo: u32,
    pub health: f32,
}

#[derive(Debug, Clone)]
pub struct PlaySession {
    difficulty: Difficulty,
    difficulty_multiplier: u32,
    windows: TimingWindows,
    resolver: ModResolver,
    combo: ComboState,
    health: HealthState,
    score: ScoreState,
    hit_errors: HitErrorStats,
    hit_error_display: HitErrorDisplay,
}

impl PlaySession {
    pub fn new(difficulty: Difficulty, mods: ModSet, config: &EngineConfig) -> Self {
        let difficulty = difficulty.sanitized();
        let resolver = ModResolver::new(mods, config.multipliers());
        let adjusted = resolver.adjusted_difficulty(difficulty);
        let windows = TimingWindows::from_od(adjusted.overall_difficulty);
        Self {
            difficulty,
            difficulty_multiplier: difficulty.score_multiplier(),
            windows,
            resolver,
            combo: ComboState::new(),
            health: HealthState::new(config.health),
            score: ScoreState::new(),
            hit_errors: HitErrorStats::new(),
            hit_error_display: HitErrorDisplay::new(config.hit_error_display_ms()),
        }
    }

    /// Reset all play state for a fresh attempt, keeping chart, mods and config.
    pub fn clear(&mut self) {
        self.combo = ComboState::new();
        self.health.reset();
        self.score = ScoreState::new();
        self.hit_errors = HitErrorStats::new();
        self.hit_error_display.clear();
        debug!("Session cleared");
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Difficulty after HardRock/Easy adjustment
    pub fn adjusted_difficulty(&self) -> Difficulty {
        self.resolver.adjusted_difficulty(self.difficulty)
    }

    pub fn difficulty_multiplier(&self) -> u32 {
        self.difficulty_multiplier
    }

    pub fn windows(&self) -> &TimingWindows {
        &self.windows
    }

    pub fn mods(&self) -> &ModResolver {
        &self.resolver
    }

    /// Toggle a mod; windows follow the new adjusted difficulty.
    pub fn toggle_mod(&mut self, m: GameMod) -> bool {
        let enabled = self.resolver.toggle(m);
        self.windows = TimingWindows::from_od(self.adjusted_difficulty().overall_difficulty);
        enabled
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn combo(&self) -> &ComboState {
        &self.combo
    }

    pub fn health(&self) -> f32 {
        self.health.health()
    }

    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }

    pub fn hit_errors(&self) -> &HitErrorStats {
        &self.hit_errors
    }

    pub fn hit_error_display(&self) -> &HitErrorDisplay {
        &self.hit_error_display
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive(self.resolver.suppresses_failure())
    }

    /// Apply an already classified result for `meta`.
    ///
    /// When `meta.combo_end` is set and the result belongs to the object itself
    /// (not a tick or spin), the result is reclassified to Geki/Katu before
    /// health and score see it.
    pub fn judge(&mut self, result: HitResult, meta: &ObjectMeta) -> Result<JudgeOutcome> {
        self.apply(result, meta, false)
    }

    /// Shared pipeline; `dropped_tick` marks a slider tick miss, which breaks the
    /// combo and costs health but stays out of the hit counts.
    fn apply(
        &mut self,
        result: HitResult,
        meta: &ObjectMeta,
        dropped_tick: bool,
    ) -> Result<JudgeOutcome> {
        if result.is_combo_end_bonus() {
            return Err(Error::DerivedResult(result));
        }

        let update = self.combo.apply(result);

        let terminal = meta.combo_end && !result.is_sub_event();
        let final_result = if terminal {
            self.combo.finish_group(result)
        } else {
            result
        };

        self.health.apply(final_result);
        if update.reset && self.resolver.is_sudden_death() {
            debug!("Combo reset under {}, failing", self.resolver.active());
            self.health.set_zero();
        }
        if self.resolver.is_active(GameMod::Perfect)
            && matches!(final_result.base_class(), HitResult::Hundred | HitResult::Fifty)
        {
            debug!("Non-300 judgment under Perfect, failing");
            self.health.set_zero();
        }

        let score_delta = if dropped_tick {
            self.score.record_dropped_tick();
            0
        } else {
            self.score.apply(
                final_result,
                update.combo_before,
                meta.is_slider(),
                self.difficulty_multiplier,
                self.resolver.score_multiplier(),
            )
        };

        Ok(JudgeOutcome {
            result: final_result,
            combo_break: update.combo_break,
            health_zero: self.health.is_zero(),
            milestone: update.milestone,
            score_delta,
            combo: self.combo.current(),
            health: self.health.health(),
        })
    }

    /// Judge a raw result code
    pub fn judge_code(&mut self, code: u8, meta: &ObjectMeta) -> Result<JudgeOutcome> {
        self.judge(HitResult::from_u8(code)?, meta)
    }

    /// Classify a click `offset_ms` from the object time and judge it.
    ///
    /// Returns `None` when the click is outside the miss window and does not count
    /// as an attempt on the object. Accepted clicks are recorded as hit errors.
    pub fn judge_hit(
        &mut self,
        offset_ms: i32,
        meta: &ObjectMeta,
    ) -> Result<Option<JudgeOutcome>> {
        if !self.windows.accepts(offset_ms) {
            return Ok(None);
        }
        let result = self.windows.classify(offset_ms);
        let outcome = self.judge(result, meta)?;
        self.record_hit_error(offset_ms, meta);
        Ok(Some(outcome))
    }

    /// Judge an object that was never clicked
    pub fn judge_expired(&mut self, meta: &ObjectMeta) -> Result<JudgeOutcome> {
        self.judge(HitResult::Miss, meta)
    }

    /// Slider tick (`major` for start, end and repeat edges).
    ///
    /// A dropped tick is reported as a miss: it resets the combo but is not
    /// counted as a missed note.
    pub fn judge_slider_tick(
        &mut self,
        major: bool,
        held: bool,
        meta: &ObjectMeta,
    ) -> Result<JudgeOutcome> {
        let meta = meta.with_combo_end(false);
        match (held, major) {
            (false, _) => self.apply(HitResult::Miss, &meta, true),
            (true, true) => self.judge(HitResult::SliderTickMajor, &meta),
            (true, false) => self.judge(HitResult::SliderTickMinor, &meta),
        }
    }

    /// Slider repeat arrow passed while holding
    pub fn judge_slider_repeat(&mut self, meta: &ObjectMeta) -> Result<JudgeOutcome> {
        self.judge(HitResult::SliderRepeat, &meta.with_combo_end(false))
    }

    pub fn judge_spinner_spin(&mut self, bonus: bool, meta: &ObjectMeta) -> Result<JudgeOutcome> {
        let result = if bonus {
            HitResult::SpinnerBonus
        } else {
            HitResult::SpinnerSpin
        };
        self.judge(result, &meta.with_combo_end(false))
    }

    /// Start tracking a spinner of the given length at the adjusted OD
    pub fn spinner(&self, duration_ms: i32) -> SpinnerTracker {
        SpinnerTracker::new(duration_ms, self.adjusted_difficulty().overall_difficulty)
    }

    /// Feed spinner rotation and judge every whole rotation it completes
    pub fn spin(
        &mut self,
        tracker: &mut SpinnerTracker,
        radians: f32,
        meta: &ObjectMeta,
    ) -> Result<Vec<JudgeOutcome>> {
        tracker
            .rotate(radians)
            .into_iter()
            .map(|result| self.judge(result, &meta.with_combo_end(false)))
            .collect()
    }

    /// Judge the end of a spinner from the rotations it received
    pub fn finish_spinner(
        &mut self,
        tracker: &SpinnerTracker,
        meta: &ObjectMeta,
    ) -> Result<JudgeOutcome> {
        let auto_clear =
            self.resolver.is_active(GameMod::Auto) || self.resolver.is_active(GameMod::SpunOut);
        self.judge(tracker.result(auto_clear), meta)
    }

    /// Passive health drain for `elapsed_ms` of play (not during breaks)
    pub fn drain(&mut self, elapsed_ms: f32) -> bool {
        self.health.drain(elapsed_ms);
        self.is_alive()
    }

    /// Expire hit-error display entries at track position `now_ms`
    pub fn update_display(&mut self, now_ms: i32) {
        self.hit_error_display.evict(now_ms, self.windows.meh_ms);
    }

    fn record_hit_error(&mut self, offset_ms: i32, meta: &ObjectMeta) {
        self.hit_errors.record(offset_ms);
        self.hit_error_display.push(HitErrorSample {
            time_ms: meta.time_ms,
            time_diff_ms: offset_ms,
            x: meta.x,
            y: meta.y,
        });
    }

    pub fn accuracy(&self) -> f32 {
        accuracy(self.score.hit_counts())
    }

    pub fn grade(&self) -> Grade {
        Grade::from_counts(self.score.hit_counts(), self.resolver.is_silver())
    }

    /// Whether the max combo spans every judged event
    pub fn is_perfect(&self) -> bool {
        let total = self.score.full_object_count();
        total > 0 && self.combo.max() == total
    }

    pub fn summary(&self) -> ScoreSummary {
        let counts = self.score.hit_counts();
        ScoreSummary {
            timestamp: Utc::now(),
            score: self.score.score(),
            max_combo: self.combo.max(),
            n300: counts.n300(),
            n100: counts.n100(),
            n50: counts.n50(),
            misses: counts.misses(),
            geki: counts.geki(),
            katu: counts.katu(),
            full_object_count: self.score.full_object_count(),
            perfect: self.is_perfect(),
            grade: self.grade(),
            mods: self.resolver.active(),
            accuracy: self.accuracy(),
            unstable_rate: self.hit_errors.unstable_rate(),
            early_average: self.hit_errors.early_average(),
            late_average: self.hit_errors.late_average(),
        }
    }

    /// Summary for a play that just ended
    pub fn finish(&self) -> ScoreSummary {
        let summary = self.summary();
        info!(
            "Play finished: score={} combo={}x objects={} acc={:.2}% grade={} mods={}",
            summary.score,
            summary.max_combo,
            summary.hit_total(),
            summary.accuracy,
            summary.grade,
            summary.mods
        );
        summary
    }
}
