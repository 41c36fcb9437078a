#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ham Rhythm engine.
//!
//! This crate defines the message surface that connects adapters to the
//! authoritative session. Adapters submit [`Command`] values describing
//! player intent, the session executes those commands via its `apply` entry
//! point, and then broadcasts [`Event`] values for adapters to react to
//! deterministically. Adapters render whatever the session exposes through
//! its query surface and respond exclusively with new commands.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Ham Rhythm.";

/// Number of lives a player holds at the start of every level attempt.
pub const LIVES_MAX: u32 = 3;

/// Number of successful rounds required to clear a level.
pub const ROUNDS_PER_LEVEL: u32 = 3;

/// Levels whose number is a multiple of this interval demand reversed input.
pub const BOSS_INTERVAL: u32 = 5;

/// Level at which the advanced action palette becomes available.
pub const ADVANCED_UNLOCK_LEVEL: u32 = 15;

/// Level at which the complete nine-action palette becomes available.
pub const EXPERT_UNLOCK_LEVEL: u32 = 19;

/// Symbolic token the player watches during playback and reproduces by hand.
///
/// Identity only matters for equality comparison; the engine never orders
/// actions relative to one another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// The hamster wakes up.
    Wake,
    /// The hamster walks across the cage.
    Walk,
    /// The hamster eats a seed.
    Eat,
    /// The hamster curls up to sleep.
    Sleep,
    /// The hamster grooms its fur.
    Groom,
    /// The hamster digs through the bedding.
    Dig,
    /// The hamster drinks from the bottle.
    Drink,
    /// The hamster burrows out of sight.
    Burrow,
    /// The hamster spins the exercise wheel.
    Spin,
}

/// Complete palette in unlock order: the first four are always available,
/// the next four unlock at [`ADVANCED_UNLOCK_LEVEL`], and the final action
/// unlocks at [`EXPERT_UNLOCK_LEVEL`].
static PALETTE: [Action; 9] = [
    Action::Wake,
    Action::Walk,
    Action::Eat,
    Action::Sleep,
    Action::Groom,
    Action::Dig,
    Action::Drink,
    Action::Burrow,
    Action::Spin,
];

impl Action {
    /// Returns the palette of actions unlocked at the provided level.
    ///
    /// Four base actions below [`ADVANCED_UNLOCK_LEVEL`], eight from there
    /// up to [`EXPERT_UNLOCK_LEVEL`], and all nine beyond it. Generators must
    /// never draw an action outside this slice for the given level.
    #[must_use]
    pub fn unlocked_at(level: Level) -> &'static [Action] {
        if level.get() >= EXPERT_UNLOCK_LEVEL {
            &PALETTE[..]
        } else if level.get() >= ADVANCED_UNLOCK_LEVEL {
            &PALETTE[..8]
        } else {
            &PALETTE[..4]
        }
    }

    /// Human-readable label adapters may print next to the action.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Wake => "Wake",
            Self::Walk => "Walk",
            Self::Eat => "Eat",
            Self::Sleep => "Sleep",
            Self::Groom => "Groom",
            Self::Dig => "Dig",
            Self::Drink => "Drink",
            Self::Burrow => "Burrow",
            Self::Spin => "Spin",
        }
    }
}

/// Campaign level expressed as a value in the closed range 1..=20.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Level(u32);

impl Level {
    /// Lowest level of the campaign.
    pub const FIRST: Level = Level(1);

    /// Hard cap of the campaign; clearing it completes the game.
    pub const MAX: Level = Level(20);

    /// Creates a new level, clamping the value into the valid 1..=20 range.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value < Self::FIRST.0 {
            Self::FIRST
        } else if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the level demands reversed reproduction.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        self.0 % BOSS_INTERVAL == 0
    }

    /// Returns the next level, or `None` once the campaign cap is reached.
    #[must_use]
    pub const fn successor(&self) -> Option<Level> {
        if self.0 >= Self::MAX.0 {
            None
        } else {
            Some(Level(self.0 + 1))
        }
    }
}

/// Bounded difficulty scalar in the closed range [-1, 1].
///
/// Higher values mean faster playback. Construction clamps, so the range
/// invariant holds for every observable value.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Difficulty(f32);

impl Difficulty {
    /// Neutral difficulty applied to fresh sessions.
    pub const NEUTRAL: Difficulty = Difficulty(0.0);

    /// Creates a difficulty value, clamping into [-1, 1].
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(-1.0, 1.0))
    }

    /// Retrieves the scalar difficulty value.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }
}

/// Fraction of position-wise matches between a guess and its target.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Accuracy(f32);

impl Accuracy {
    /// Accuracy of a guess that matched the target at every position.
    pub const PERFECT: Accuracy = Accuracy(1.0);

    /// Creates an accuracy value, clamping into [0, 1].
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Retrieves the fractional accuracy value.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }
}

/// Stages of the round flow driven by the session reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Awaiting the player's request to begin a round.
    Start,
    /// Playback of the generated sequence is in flight.
    Show,
    /// The player is reproducing the sequence one action at a time.
    Guess,
    /// The round outcome is on display; a continuation command is awaited.
    Result,
    /// The final round of the final level cleared; no transitions remain.
    Complete,
}

/// Commands that express all permissible session mutations.
///
/// Adapters deliver exactly one command per player interaction; debouncing
/// is the adapter's responsibility. A command that does not apply to the
/// current stage is silently ignored, keeping the reducer total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that a new round begin from the start stage.
    Start,
    /// Submits one action of the player's reproduction attempt.
    Guess {
        /// Action the player selected.
        action: Action,
    },
    /// Signals that the hosting adapter finished presenting the sequence.
    FinishPlayback,
    /// Continues to the next round after a non-terminal result.
    NextRound,
    /// Advances to the next level after a level clear.
    NextLevel,
    /// Restarts the current level attempt after a game over.
    Restart,
    /// Forwards the wall-clock date for daily record rollover.
    Tick {
        /// Calendar date observed by the hosting adapter.
        today: NaiveDate,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that sequence playback should begin.
    PlaybackStarted {
        /// Actions to present, in generated order.
        actions: Vec<Action>,
        /// Duration each action stays on display.
        step: Duration,
        /// Indicates the reverse-order banner should be shown.
        reverse: bool,
    },
    /// Confirms that a guessed action was appended to the attempt.
    ///
    /// Doubles as the click-cue signal for the hosting adapter.
    GuessAccepted {
        /// Action the player selected.
        action: Action,
        /// Zero-based position of the action within the attempt.
        position: usize,
    },
    /// Reports the evaluated outcome of a completed round.
    RoundResolved {
        /// Indicates the guess matched the target exactly.
        success: bool,
        /// Fraction of position-wise matches against the target.
        accuracy: Accuracy,
        /// Order the player was expected to reproduce.
        target: Vec<Action>,
    },
    /// Confirms that a failed round consumed one life.
    LifeLost {
        /// Lives remaining after the deduction.
        remaining: u32,
    },
    /// Announces that the level attempt ended with no lives remaining.
    GameOver {
        /// Level at which the attempt ended.
        level: Level,
    },
    /// Announces a cleared level; doubles as the level-up fanfare cue.
    LevelCleared {
        /// Level that was cleared.
        level: Level,
    },
    /// Announces that the final level cleared and the campaign is complete.
    GameCompleted,
    /// Reports that the calendar day rolled over and the daily best reset.
    DailyBestReset {
        /// Date that became current.
        date: NaiveDate,
    },
    /// Reports updated best-level records after a clear.
    RecordsUpdated {
        /// Best level reached during the current calendar day.
        best_today: Level,
        /// Best level reached across the lifetime of the record.
        best_all_time: Level,
    },
}
