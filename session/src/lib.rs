#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Ham Rhythm.
//!
//! The session owns every mutable piece of a single player's game: level,
//! lives, round count, the generated sequence, the guess in flight, the
//! difficulty scalar, and the progress record. Adapters mutate it solely by
//! submitting [`Command`] values to [`apply`], a synchronous reducer that is
//! total over all (state, command) pairs: a command that does not apply to
//! the current stage is a silent no-op, never an error.

use chrono::NaiveDate;
use ham_rhythm_core::{
    Accuracy, Action, Command, Difficulty, Event, Level, Stage, LIVES_MAX, ROUNDS_PER_LEVEL,
};
use ham_rhythm_system_difficulty::{self as difficulty, DifficultyController, Tuning};
use ham_rhythm_system_progress::ProgressRecord;
use ham_rhythm_system_sequence::{Config as SequenceConfig, SequenceGenerator};

/// Configuration parameters required to construct a session.
///
/// The behavioural flags exist because the original engine shipped as
/// several near-identical copies that disagreed on exactly these points;
/// the consolidated engine expresses the variance as configuration instead.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Global seed feeding the deterministic sequence generator.
    pub rng_seed: u64,
    /// Tuning surface for playback pacing and difficulty feedback.
    pub difficulty_tuning: Tuning,
    /// Generates a fresh sequence on every round when true; replays the
    /// stored sequence on "next round" when false.
    pub fresh_sequence_each_round: bool,
    /// Emits the click-cue event for each accepted guess when true.
    pub guess_click_cue: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            difficulty_tuning: Tuning::default(),
            fresh_sequence_each_round: true,
            guess_click_cue: true,
        }
    }
}

/// Continuation command the session expects while presenting a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// The round resolved without ending the attempt; awaiting `NextRound`.
    NextRound,
    /// The level cleared below the campaign cap; awaiting `NextLevel`.
    NextLevel,
    /// The attempt ran out of lives; awaiting `Restart`.
    Restart,
}

/// Evaluated outcome of the most recently completed round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    /// Indicates the guess matched the target exactly.
    pub success: bool,
    /// Fraction of position-wise matches against the target.
    pub accuracy: Accuracy,
    /// Order the player was expected to reproduce.
    pub target: Vec<Action>,
}

/// Represents the authoritative state of one player's game.
#[derive(Debug)]
pub struct GameSession {
    level: Level,
    lives: u32,
    round: u32,
    stage: Stage,
    difficulty: Difficulty,
    sequence: Vec<Action>,
    guess: Vec<Action>,
    outcome: Option<RoundOutcome>,
    generator: SequenceGenerator,
    controller: DifficultyController,
    progress: ProgressRecord,
    fresh_sequence_each_round: bool,
    guess_click_cue: bool,
}

impl GameSession {
    /// Creates a new session ready for play, anchored to the provided date.
    #[must_use]
    pub fn new(config: Config, today: NaiveDate) -> Self {
        Self {
            level: Level::FIRST,
            lives: LIVES_MAX,
            round: 0,
            stage: Stage::Start,
            difficulty: Difficulty::NEUTRAL,
            sequence: Vec::new(),
            guess: Vec::new(),
            outcome: None,
            generator: SequenceGenerator::new(SequenceConfig::new(config.rng_seed)),
            controller: DifficultyController::new(config.difficulty_tuning),
            progress: ProgressRecord::new(today),
            fresh_sequence_each_round: config.fresh_sequence_each_round,
            guess_click_cue: config.guess_click_cue,
        }
    }

    fn continuation(&self) -> Option<Continuation> {
        if self.stage != Stage::Result {
            return None;
        }

        if self.lives == 0 {
            Some(Continuation::Restart)
        } else if self.round >= ROUNDS_PER_LEVEL {
            Some(Continuation::NextLevel)
        } else {
            Some(Continuation::NextRound)
        }
    }

    fn begin_round(&mut self, fresh: bool, out_events: &mut Vec<Event>) {
        if fresh || self.sequence.is_empty() {
            self.sequence = self.generator.generate(self.level);
        }
        self.guess.clear();
        self.outcome = None;
        self.stage = Stage::Show;
        out_events.push(Event::PlaybackStarted {
            actions: self.sequence.clone(),
            step: self.controller.playback_step(self.level, self.difficulty),
            reverse: self.level.is_boss(),
        });
    }

    fn accept_guess(&mut self, action: Action, out_events: &mut Vec<Event>) {
        if self.stage != Stage::Guess {
            return;
        }

        // Guarded transition to result keeps the length invariant; a guess
        // arriving at a full attempt should not occur and is dropped.
        if self.guess.len() >= self.sequence.len() {
            return;
        }

        self.guess.push(action);
        if self.guess_click_cue {
            out_events.push(Event::GuessAccepted {
                action,
                position: self.guess.len() - 1,
            });
        }

        if self.guess.len() == self.sequence.len() {
            self.resolve_round(out_events);
        }
    }

    fn resolve_round(&mut self, out_events: &mut Vec<Event>) {
        self.stage = Stage::Result;

        let mut target = self.sequence.clone();
        if self.level.is_boss() {
            target.reverse();
        }

        let success = self.guess == target;
        let accuracy = difficulty::accuracy(&self.guess, &target);
        self.difficulty = self.controller.adjusted(self.difficulty, accuracy);

        if success {
            self.round += 1;
        } else {
            self.lives = self.lives.saturating_sub(1);
        }

        out_events.push(Event::RoundResolved {
            success,
            accuracy,
            target: target.clone(),
        });
        self.outcome = Some(RoundOutcome {
            success,
            accuracy,
            target,
        });

        if !success {
            out_events.push(Event::LifeLost {
                remaining: self.lives,
            });
        }

        if self.lives == 0 {
            out_events.push(Event::GameOver { level: self.level });
            return;
        }

        if success && self.round == ROUNDS_PER_LEVEL {
            let _ = self.progress.record_clear(self.level);
            out_events.push(Event::LevelCleared { level: self.level });
            if let Some(best_today) = self.progress.best_today() {
                out_events.push(Event::RecordsUpdated {
                    best_today,
                    best_all_time: self.progress.best_all_time(),
                });
            }
            if self.level == Level::MAX {
                self.stage = Stage::Complete;
                out_events.push(Event::GameCompleted);
            }
        }
    }

    fn reset_attempt(&mut self) {
        self.lives = LIVES_MAX;
        self.round = 0;
        self.sequence.clear();
        self.guess.clear();
        self.outcome = None;
        self.stage = Stage::Start;
    }
}

/// Applies the provided command to the session, mutating state
/// deterministically and pushing resulting events onto `out_events`.
pub fn apply(session: &mut GameSession, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { today } => {
            if session.progress.observe_date(today) {
                out_events.push(Event::DailyBestReset { date: today });
            }
        }
        Command::Start => {
            if session.stage == Stage::Start {
                session.begin_round(true, out_events);
            }
        }
        Command::FinishPlayback => {
            if session.stage == Stage::Show {
                session.stage = Stage::Guess;
            }
        }
        Command::Guess { action } => {
            session.accept_guess(action, out_events);
        }
        Command::NextRound => {
            if session.continuation() == Some(Continuation::NextRound) {
                let fresh = session.fresh_sequence_each_round;
                session.begin_round(fresh, out_events);
            }
        }
        Command::NextLevel => {
            if session.continuation() == Some(Continuation::NextLevel) {
                if let Some(next) = session.level.successor() {
                    session.level = next;
                }
                session.reset_attempt();
            }
        }
        Command::Restart => {
            if session.continuation() == Some(Continuation::Restart) {
                session.reset_attempt();
            }
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::{Continuation, GameSession, RoundOutcome};
    use ham_rhythm_core::{Action, Difficulty, Level, Stage};
    use ham_rhythm_system_progress::ProgressSnapshot;

    /// Stage the session currently occupies.
    #[must_use]
    pub fn stage(session: &GameSession) -> Stage {
        session.stage
    }

    /// Level the player is currently attempting.
    #[must_use]
    pub fn level(session: &GameSession) -> Level {
        session.level
    }

    /// Lives remaining in the current level attempt.
    #[must_use]
    pub fn lives(session: &GameSession) -> u32 {
        session.lives
    }

    /// Rounds cleared within the current level.
    #[must_use]
    pub fn round(session: &GameSession) -> u32 {
        session.round
    }

    /// Current bounded difficulty scalar.
    #[must_use]
    pub fn difficulty(session: &GameSession) -> Difficulty {
        session.difficulty
    }

    /// Sequence generated for the round in flight, in playback order.
    #[must_use]
    pub fn sequence(session: &GameSession) -> &[Action] {
        &session.sequence
    }

    /// Actions the player has submitted so far this round.
    #[must_use]
    pub fn guess(session: &GameSession) -> &[Action] {
        &session.guess
    }

    /// Outcome of the most recently resolved round, if any.
    #[must_use]
    pub fn outcome(session: &GameSession) -> Option<&RoundOutcome> {
        session.outcome.as_ref()
    }

    /// Continuation command the session expects, if a result is on display.
    #[must_use]
    pub fn continuation(session: &GameSession) -> Option<Continuation> {
        session.continuation()
    }

    /// Reports whether the current level demands reversed reproduction.
    #[must_use]
    pub fn is_boss_level(session: &GameSession) -> bool {
        session.level.is_boss()
    }

    /// Captures a read-only snapshot of the progress record.
    #[must_use]
    pub fn progress(session: &GameSession) -> ProgressSnapshot {
        session.progress.snapshot()
    }
}
