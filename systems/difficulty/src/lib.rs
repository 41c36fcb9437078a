#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive pacing for sequence playback.
//!
//! The controller derives the per-action display duration from the current
//! level and the bounded difficulty scalar, and nudges that scalar after
//! every round based on position-wise accuracy. Accuracy above one half
//! speeds future playback up, accuracy below slows it down, and the scalar
//! never leaves the [-1, 1] range.

use std::time::Duration;

use ham_rhythm_core::{Accuracy, Action, Difficulty, Level};

/// Aggregated tuning knobs controlling the pacing curve and feedback loop.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    /// Display duration per action at level 1 with neutral difficulty.
    pub base_step_seconds: f32,
    /// Hard floor the display duration never drops below.
    pub floor_step_seconds: f32,
    /// Seconds shaved off the step per level above the first.
    pub level_acceleration: f32,
    /// Seconds shaved off the step per unit of difficulty.
    pub difficulty_acceleration: f32,
    /// Gain applied to `(accuracy - 0.5)` when updating the scalar.
    pub feedback_gain: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_step_seconds: 1.5,
            floor_step_seconds: 0.5,
            level_acceleration: 0.1,
            difficulty_acceleration: 0.2,
            feedback_gain: 0.4,
        }
    }
}

/// Pure controller that maps rolling accuracy onto playback pacing.
#[derive(Clone, Copy, Debug, Default)]
pub struct DifficultyController {
    tuning: Tuning,
}

impl DifficultyController {
    /// Creates a new controller with the provided tuning surface.
    #[must_use]
    pub const fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    /// Derives the per-action display duration for playback.
    ///
    /// Strictly decreases as level or difficulty rises until it reaches the
    /// configured floor, where it stays clamped. A tuning whose floor is
    /// negative still yields a valid duration of zero.
    #[must_use]
    pub fn playback_step(&self, level: Level, difficulty: Difficulty) -> Duration {
        let seconds = self.tuning.base_step_seconds
            - self.tuning.level_acceleration * (level.get() as f32 - 1.0)
            - self.tuning.difficulty_acceleration * difficulty.get();
        Duration::from_secs_f32(seconds.max(self.tuning.floor_step_seconds).max(0.0))
    }

    /// Applies one round of accuracy feedback to the difficulty scalar.
    ///
    /// Runs exactly once per round at result evaluation, regardless of the
    /// overall pass/fail outcome; clamping is handled by [`Difficulty`].
    #[must_use]
    pub fn adjusted(&self, difficulty: Difficulty, accuracy: Accuracy) -> Difficulty {
        Difficulty::new(difficulty.get() + (accuracy.get() - 0.5) * self.tuning.feedback_gain)
    }
}

/// Computes the fraction of position-wise matches between guess and target.
///
/// A match is `guess[i] == target[i]`; the score is `matches / target.len()`
/// rather than any set-overlap or edit-distance measure. An empty target
/// counts as fully matched.
#[must_use]
pub fn accuracy(guess: &[Action], target: &[Action]) -> Accuracy {
    if target.is_empty() {
        return Accuracy::PERFECT;
    }

    let matches = guess
        .iter()
        .zip(target.iter())
        .filter(|(lhs, rhs)| lhs == rhs)
        .count();
    Accuracy::new(matches as f32 / target.len() as f32)
}
