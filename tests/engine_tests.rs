//! Engine behavior tests: spawn, movement, locking, clearing, scoring,
//! game over and seeding.

use tetris_duel::core::{Engine, TickOutcome};
use tetris_duel::net::Message;
use tetris_duel::types::{Rotation, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X};

fn fill_row(engine: &mut Engine, row: i32, value: u8) {
    for col in 0..BOARD_WIDTH as i32 {
        engine.board_mut().set_cell(row, col, value);
    }
}

fn row(engine: &Engine, row: usize) -> [u8; BOARD_WIDTH as usize] {
    engine.board().grid()[row]
}

#[test]
fn test_spawn_is_centered() {
    for seed in [0, 1, 42, 999, u32::MAX] {
        let mut engine = Engine::new(seed);
        let piece = engine.current();
        assert_eq!(piece.x, BOARD_WIDTH as i8 / 2 - 2);
        assert_eq!(piece.x, SPAWN_X);
        assert_eq!(piece.y, 0);
        assert_eq!(piece.rotation, Rotation::North);

        assert!(engine.spawn_piece());
        assert_eq!(engine.current().x, SPAWN_X);
        assert_eq!(engine.current().y, 0);
        assert_eq!(engine.current().rotation, Rotation::North);
    }
}

#[test]
fn test_blocked_move_leaves_state_identical() {
    let mut engine = Engine::new(42);
    while engine.move_piece(-1, 0) {}

    let before = engine.snapshot();
    assert!(!engine.move_piece(-1, 0));
    assert_eq!(engine.snapshot(), before);

    // blocked by a locked cell instead of a wall
    let mut engine = Engine::new(42);
    for (x, y) in engine.current().blocks() {
        engine.board_mut().set_cell(y as i32 + 1, x as i32, 2);
    }
    let before = engine.snapshot();
    assert!(!engine.move_piece(0, 1));
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_four_rotations_return_to_start() {
    for seed in 0..20 {
        let mut engine = Engine::new(seed);
        let start = engine.current();
        for _ in 0..4 {
            assert!(engine.rotate(), "rotation blocked at spawn for seed {}", seed);
        }
        assert_eq!(engine.current(), start);
    }
}

#[test]
fn test_lock_clears_two_bottom_rows_and_shifts() {
    let mut engine = Engine::new(42);
    fill_row(&mut engine, 19, 1);
    fill_row(&mut engine, 18, 4);
    engine.board_mut().set_cell(16, 0, 2);
    engine.board_mut().set_cell(16, 9, 3);
    engine.board_mut().set_cell(17, 4, 5);

    let old16 = row(&engine, 16);
    let old17 = row(&engine, 17);

    let event = engine.lock_piece().expect("engine is live");
    assert_eq!(event.lines(), 2);
    assert_eq!(event.score_delta, 300);

    assert_eq!(row(&engine, 18), old16);
    assert_eq!(row(&engine, 19), old17);
    assert!(engine.board().is_row_empty(0));
    assert!(engine.board().is_row_empty(1));
    // the locked piece moved down with everything else
    assert_eq!(engine.board().filled_count(), 3 + 4);
}

#[test]
fn test_score_table() {
    let expected = [100, 300, 500, 800, 500];
    for (i, &points) in expected.iter().enumerate() {
        let rows = i + 1;
        let mut engine = Engine::new(7);
        for r in 0..rows {
            fill_row(&mut engine, BOARD_HEIGHT as i32 - 1 - r as i32, 1);
        }

        let cleared = engine.check_lines();
        assert_eq!(cleared.len(), rows);
        assert_eq!(engine.score(), points, "{} rows", rows);
        assert_eq!(engine.lines(), rows as u32);
        assert_eq!(engine.board().filled_count(), 0);
    }
}

#[test]
fn test_blocked_spawn_is_game_over_and_board_untouched() {
    let mut engine = Engine::new(3);
    for r in 0..2 {
        for col in 3..=6 {
            engine.board_mut().set_cell(r, col, 6);
        }
    }
    let board_before = engine.board().grid();
    let spawns = engine.spawn_counter();

    assert!(!engine.spawn_piece());
    assert!(engine.is_game_over());
    assert_eq!(engine.board().grid(), board_before);
    assert_eq!(engine.spawn_counter(), spawns);

    // terminal until reset
    assert!(!engine.spawn_piece());
    assert_eq!(engine.tick(), TickOutcome::Ignored);
    assert!(engine.check_lines().is_empty());
}

#[test]
fn test_same_seed_same_sequence() {
    let mut a = Engine::new(1234);
    let mut b = Engine::new(1234);
    for _ in 0..50 {
        assert_eq!(a.next(), b.next());
        assert_eq!(a.current().kind, b.current().kind);
        assert!(a.spawn_piece());
        assert!(b.spawn_piece());
    }
    assert_eq!(a.spawn_counter(), 51);

    let seq = |seed| {
        let mut e = Engine::new(seed);
        (0..50)
            .map(|_| {
                e.spawn_piece();
                e.next()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(seq(77), seq(77));
    assert_ne!(seq(1), seq(2));
}

#[test]
fn test_reset_restores_initial_state() {
    let mut engine = Engine::new(5);
    let fresh = engine.snapshot();

    engine.move_piece(1, 0);
    while !matches!(engine.tick(), TickOutcome::Locked(_)) {}
    assert_ne!(engine.snapshot(), fresh);

    engine.reset(Some(5));
    assert_eq!(engine.snapshot(), fresh);
}

#[test]
fn test_ticks_eventually_end_the_game() {
    let mut engine = Engine::new(11);
    let mut locks = 0;
    for _ in 0..10_000 {
        match engine.tick() {
            TickOutcome::Locked(event) => {
                locks += 1;
                if event.game_over {
                    break;
                }
            }
            TickOutcome::Fell => {}
            TickOutcome::Ignored => panic!("ticked past game over"),
        }
    }
    assert!(engine.is_game_over());
    assert!(locks > 1);
    assert_eq!(engine.spawn_counter(), locks);
}

#[test]
fn test_move_relayed_over_the_wire_keeps_engines_in_step() {
    let mut a = Engine::new(42);
    let mut b = Engine::new(42);

    assert!(a.move_piece(-1, 0));
    let line = Message::move_lr(-1).to_line();
    assert_eq!(line, "MOVE_LR;DIR:-1");

    match Message::parse(&line) {
        Message::MoveLr { dir } => assert!(b.move_piece(dir as i8, 0)),
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(a.current().x, b.current().x);
    assert_eq!(a.current().x, SPAWN_X - 1);
}
