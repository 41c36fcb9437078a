use chrono::NaiveDate;
use ham_rhythm_core::{
    Action, Command, Event, Level, Stage, LIVES_MAX, ROUNDS_PER_LEVEL,
};
use ham_rhythm_session::{self as session, query, Config, Continuation, GameSession};

#[test]
fn correct_first_round_increments_round_and_raises_difficulty() {
    let mut game = new_game(101);
    enter_guess(&mut game);
    assert_eq!(query::sequence(&game).len(), 3);

    let events = submit_correct(&mut game);

    assert_eq!(query::round(&game), 1);
    assert_eq!(query::lives(&game), LIVES_MAX);
    assert!(
        query::difficulty(&game).get() > 0.0,
        "perfect accuracy must raise difficulty"
    );
    assert!(events.iter().any(|event| matches!(
        event,
        Event::RoundResolved { success: true, .. }
    )));
    assert_eq!(query::continuation(&game), Some(Continuation::NextRound));
}

#[test]
fn boss_levels_accept_only_the_reversed_sequence() {
    let mut game = new_game(202);
    for _ in 1..5 {
        clear_current_level(&mut game);
        apply(&mut game, Command::NextLevel);
    }
    assert_eq!(query::level(&game), Level::new(5));
    assert!(query::is_boss_level(&game));

    enter_guess(&mut game);
    let sequence = query::sequence(&game).to_vec();
    let mut reversed = sequence.clone();
    reversed.reverse();

    // Forward-order input must fail whenever it differs from the target.
    if sequence != reversed {
        for action in &sequence {
            apply(&mut game, Command::Guess { action: *action });
        }
        let outcome = query::outcome(&game).expect("resolved round");
        assert!(!outcome.success);
        assert_eq!(outcome.target, reversed);

        apply(&mut game, Command::NextRound);
        apply(&mut game, Command::FinishPlayback);
    }

    let target = expected_target(&game);
    for action in &target {
        apply(&mut game, Command::Guess { action: *action });
    }
    let outcome = query::outcome(&game).expect("resolved round");
    assert!(outcome.success, "reversed input must clear a boss round");
}

#[test]
fn three_failed_rounds_exhaust_lives_and_demand_restart() {
    let mut game = new_game(303);

    enter_guess(&mut game);
    submit_wrong(&mut game);
    assert_eq!(query::lives(&game), 2);

    apply(&mut game, Command::NextRound);
    apply(&mut game, Command::FinishPlayback);
    submit_wrong(&mut game);
    assert_eq!(query::lives(&game), 1);

    apply(&mut game, Command::NextRound);
    apply(&mut game, Command::FinishPlayback);
    let events = submit_wrong(&mut game);

    assert_eq!(query::lives(&game), 0);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::GameOver { .. })));
    assert_eq!(query::continuation(&game), Some(Continuation::Restart));

    // No further guesses are accepted until the attempt restarts.
    let before = query::guess(&game).to_vec();
    apply(
        &mut game,
        Command::Guess {
            action: Action::Wake,
        },
    );
    assert_eq!(query::guess(&game), before.as_slice());
    apply(&mut game, Command::NextRound);
    assert_eq!(query::stage(&game), Stage::Result);

    let level_before = query::level(&game);
    apply(&mut game, Command::Restart);
    assert_eq!(query::stage(&game), Stage::Start);
    assert_eq!(query::lives(&game), LIVES_MAX);
    assert_eq!(query::round(&game), 0);
    assert_eq!(query::level(&game), level_before);
    assert!(query::sequence(&game).is_empty());
}

#[test]
fn clearing_the_final_level_completes_the_campaign() {
    let mut game = new_game(404);

    for value in 1..=20u32 {
        assert_eq!(query::level(&game), Level::new(value));
        let events = clear_current_level(&mut game);

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::LevelCleared { level } if level.get() == value)));

        if value < 20 {
            apply(&mut game, Command::NextLevel);
        } else {
            assert!(events
                .iter()
                .any(|event| matches!(event, Event::GameCompleted)));
        }
    }

    assert_eq!(query::stage(&game), Stage::Complete);
    let progress = query::progress(&game);
    assert_eq!(progress.best_all_time, Level::MAX);
    assert_eq!(progress.best_today, Some(Level::MAX));
    assert!(
        query::difficulty(&game).get() <= 1.0,
        "difficulty must stay bounded through a full campaign"
    );

    // The completed state is terminal; nothing transitions out of it.
    apply(&mut game, Command::NextLevel);
    apply(&mut game, Command::Start);
    apply(&mut game, Command::Restart);
    assert_eq!(query::stage(&game), Stage::Complete);
}

#[test]
fn level_clears_update_records_monotonically() {
    let mut game = new_game(505);

    let first = clear_current_level(&mut game);
    assert!(first.iter().any(|event| matches!(
        event,
        Event::RecordsUpdated { best_today, best_all_time }
            if best_today.get() == 1 && best_all_time.get() == 1
    )));

    apply(&mut game, Command::NextLevel);
    let second = clear_current_level(&mut game);
    assert!(second.iter().any(|event| matches!(
        event,
        Event::RecordsUpdated { best_today, best_all_time }
            if best_today.get() == 2 && best_all_time.get() == 2
    )));

    let progress = query::progress(&game);
    assert!(progress.best_today <= Some(progress.best_all_time));
}

#[test]
fn identical_seeds_replay_identical_campaign_openings() {
    let mut first = new_game(606);
    let mut second = new_game(606);

    for round in 0..ROUNDS_PER_LEVEL {
        let command = if round == 0 {
            Command::Start
        } else {
            Command::NextRound
        };
        let _ = apply(&mut first, command.clone());
        let _ = apply(&mut second, command);
        let _ = apply(&mut first, Command::FinishPlayback);
        let _ = apply(&mut second, Command::FinishPlayback);
        assert!(!query::sequence(&first).is_empty());
        assert_eq!(query::sequence(&first), query::sequence(&second));
        let _ = submit_correct(&mut first);
        let _ = submit_correct(&mut second);
    }

    let _ = apply(&mut first, Command::NextLevel);
    let _ = apply(&mut second, Command::NextLevel);
    let _ = apply(&mut first, Command::Start);
    let _ = apply(&mut second, Command::Start);
    assert_eq!(query::sequence(&first), query::sequence(&second));
}

fn new_game(seed: u64) -> GameSession {
    let config = Config {
        rng_seed: seed,
        ..Config::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid test date");
    GameSession::new(config, today)
}

fn apply(game: &mut GameSession, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    session::apply(game, command, &mut events);
    events
}

fn enter_guess(game: &mut GameSession) {
    let _ = apply(game, Command::Start);
    let _ = apply(game, Command::FinishPlayback);
}

fn expected_target(game: &GameSession) -> Vec<Action> {
    let mut target = query::sequence(game).to_vec();
    if query::is_boss_level(game) {
        target.reverse();
    }
    target
}

fn submit_correct(game: &mut GameSession) -> Vec<Event> {
    let mut events = Vec::new();
    for action in expected_target(game) {
        events.extend(apply(game, Command::Guess { action }));
    }
    events
}

fn submit_wrong(game: &mut GameSession) -> Vec<Event> {
    let mut attempt = expected_target(game);
    let last = attempt.len() - 1;
    let palette = Action::unlocked_at(query::level(game));
    let correct = attempt[last];
    attempt[last] = palette
        .iter()
        .copied()
        .find(|candidate| *candidate != correct)
        .expect("palette holds more than one action");

    let mut events = Vec::new();
    for action in attempt {
        events.extend(apply(game, Command::Guess { action }));
    }
    events
}

fn clear_current_level(game: &mut GameSession) -> Vec<Event> {
    let mut events = Vec::new();
    for round in 0..ROUNDS_PER_LEVEL {
        if round == 0 {
            events.extend(apply(game, Command::Start));
        } else {
            events.extend(apply(game, Command::NextRound));
        }
        events.extend(apply(game, Command::FinishPlayback));
        events.extend(submit_correct(game));
    }
    events
}
