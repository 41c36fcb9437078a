#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal adapter that hosts a single Ham Rhythm session.
//!
//! All game logic lives in the session crate; this binary only translates
//! keyboard input into commands, performs the temporal side of playback,
//! and prints the cues the engine emits.

use std::io::{self, BufRead};
use std::thread;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use ham_rhythm_core::{
    Action, Command, Event, Level, Stage, LIVES_MAX, ROUNDS_PER_LEVEL, WELCOME_BANNER,
};
use ham_rhythm_session::{self as session, query, Config, Continuation, GameSession};
use thiserror::Error;

/// Command-line arguments accepted by the Ham Rhythm binary.
#[derive(Debug, Parser)]
#[command(name = "ham-rhythm", about = "Sequence-memory rhythm game in the terminal")]
struct Args {
    /// Seed for deterministic sequence generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Replay the stored sequence on every round of a level instead of
    /// generating a fresh one.
    #[arg(long)]
    replay_rounds: bool,
    /// Skip playback delays; intended for scripted runs.
    #[arg(long)]
    fast: bool,
}

/// Reasons a line of player input could not be translated into a command.
#[derive(Debug, Error)]
enum InputError {
    /// The token does not name an action.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The token does not apply to the current stage.
    #[error("`{0}` does not apply right now")]
    UnknownCommand(String),
}

/// Entry point for the Ham Rhythm command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = Config {
        rng_seed: seed,
        fresh_sequence_each_round: !args.replay_rounds,
        ..Config::default()
    };
    let mut game = GameSession::new(config, Local::now().date_naive());
    println!("{WELCOME_BANNER} (seed {seed})");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut events = Vec::new();

    loop {
        pump(
            &mut game,
            Command::Tick {
                today: Local::now().date_naive(),
            },
            &mut events,
            args.fast,
        );
        if query::stage(&game) == Stage::Complete {
            break;
        }

        render_status(&game);
        print_prompt(&game);

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") {
            break;
        }

        match parse_command(&game, input) {
            Ok(command) => pump(&mut game, command, &mut events, args.fast),
            Err(error) => println!("{error}"),
        }

        if query::stage(&game) == Stage::Complete {
            break;
        }
    }

    Ok(())
}

/// Applies one command, then presents every resulting event, feeding
/// follow-up commands (such as playback completion) back into the session.
fn pump(game: &mut GameSession, command: Command, events: &mut Vec<Event>, fast: bool) {
    session::apply(game, command, events);
    let drained: Vec<Event> = events.drain(..).collect();
    for event in drained {
        if let Some(follow_up) = present(&event, fast) {
            pump(game, follow_up, events, fast);
        }
    }
}

/// Renders a single event to the terminal, returning a follow-up command
/// when the event demands one.
fn present(event: &Event, fast: bool) -> Option<Command> {
    match event {
        Event::PlaybackStarted {
            actions,
            step,
            reverse,
        } => {
            if *reverse {
                println!("Reverse order! Repeat the sequence backwards.");
            }
            println!("Watch closely:");
            for action in actions {
                println!("{}", playback_frame_line(*action));
                if !fast {
                    thread::sleep(*step);
                }
            }
            println!("  (playback finished)");
            Some(Command::FinishPlayback)
        }
        Event::GuessAccepted { action, .. } => {
            println!("*click* {}", action.label());
            None
        }
        Event::RoundResolved {
            success,
            accuracy,
            target,
        } => {
            if *success {
                println!("Round clear!");
            } else {
                println!("Miss! Correct order: {}", join(target));
            }
            println!("Accuracy {:.0}%", accuracy.get() * 100.0);
            None
        }
        Event::LifeLost { remaining } => {
            println!("Life lost; {remaining} remaining.");
            None
        }
        Event::GameOver { level } => {
            println!("Game over at Lv {}.", level.get());
            None
        }
        Event::LevelCleared { level } => {
            println!("Lv {} cleared! *fanfare*", level.get());
            None
        }
        Event::GameCompleted => {
            println!("All {} levels complete. Thanks for playing!", Level::MAX.get());
            None
        }
        Event::DailyBestReset { date } => {
            println!("A new day ({date}); the daily best starts fresh.");
            None
        }
        Event::RecordsUpdated {
            best_today,
            best_all_time,
        } => {
            println!(
                "Records: today Lv {}, all-time Lv {}.",
                best_today.get(),
                best_all_time.get()
            );
            None
        }
    }
}

fn render_status(game: &GameSession) {
    let level = query::level(game);
    let progress = query::progress(game);
    let best_today = progress
        .best_today
        .map_or_else(|| "-".to_owned(), |best| best.get().to_string());
    println!(
        "Lv {:>2} {}  lives {}/{}  round {}/{}  diff {:+.1}{}  best today {} / all-time {}",
        level.get(),
        stars(level),
        query::lives(game),
        LIVES_MAX,
        query::round(game),
        ROUNDS_PER_LEVEL,
        query::difficulty(game).get(),
        if query::is_boss_level(game) {
            "  [reverse]"
        } else {
            ""
        },
        best_today,
        progress.best_all_time.get()
    );
}

fn print_prompt(game: &GameSession) {
    match query::stage(game) {
        Stage::Start => println!("Type `start` to begin the round."),
        Stage::Guess => {
            let palette = Action::unlocked_at(query::level(game));
            let options = join(palette).to_ascii_lowercase();
            println!("Your input so far: {}", join(query::guess(game)));
            println!("Type the next action ({options}).");
        }
        Stage::Result => match query::continuation(game) {
            Some(Continuation::NextRound) => println!("Type `next` for the next round."),
            Some(Continuation::NextLevel) => println!("Type `next` for the next level."),
            Some(Continuation::Restart) => println!("Type `restart` to try the level again."),
            None => {}
        },
        // Playback completes inside `pump`; the campaign end exits the loop.
        Stage::Show | Stage::Complete => {}
    }
}

fn parse_command(game: &GameSession, input: &str) -> Result<Command, InputError> {
    let token = input.to_ascii_lowercase();
    match query::stage(game) {
        Stage::Start => match token.as_str() {
            "start" | "s" => Ok(Command::Start),
            _ => Err(InputError::UnknownCommand(token)),
        },
        Stage::Guess => parse_action(&token).map(|action| Command::Guess { action }),
        Stage::Result => match token.as_str() {
            "next" | "n" => match query::continuation(game) {
                Some(Continuation::NextLevel) => Ok(Command::NextLevel),
                _ => Ok(Command::NextRound),
            },
            "restart" | "r" => Ok(Command::Restart),
            _ => Err(InputError::UnknownCommand(token)),
        },
        Stage::Show | Stage::Complete => Err(InputError::UnknownCommand(token)),
    }
}

fn parse_action(token: &str) -> Result<Action, InputError> {
    match token {
        "wake" => Ok(Action::Wake),
        "walk" => Ok(Action::Walk),
        "eat" => Ok(Action::Eat),
        "sleep" => Ok(Action::Sleep),
        "groom" => Ok(Action::Groom),
        "dig" => Ok(Action::Dig),
        "drink" => Ok(Action::Drink),
        "burrow" => Ok(Action::Burrow),
        "spin" => Ok(Action::Spin),
        other => Err(InputError::UnknownAction(other.to_owned())),
    }
}

/// Line printed for one playback frame; each frame carries the click cue,
/// matching the cue played per accepted guess.
fn playback_frame_line(action: Action) -> String {
    format!("  {} *click*", action.label())
}

fn join(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|action| action.label())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn stars(level: Level) -> String {
    let filled = ((level.get() / 5).max(1) as usize).min(5);
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::{playback_frame_line, stars};
    use ham_rhythm_core::{Action, Level};

    #[test]
    fn playback_frames_carry_the_click_cue() {
        let line = playback_frame_line(Action::Walk);
        assert!(line.contains("Walk"));
        assert!(line.contains("*click*"), "every frame plays the click cue");
    }

    #[test]
    fn star_rank_fills_one_star_per_five_levels() {
        assert_eq!(stars(Level::FIRST), "★☆☆☆☆");
        assert_eq!(stars(Level::new(10)), "★★☆☆☆");
        assert_eq!(stars(Level::MAX), "★★★★☆");
    }
}
