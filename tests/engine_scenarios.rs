//! Cross-module Engine API tests: swap, game-over handling, full turns.

use hexmind::board::Color;
use hexmind::engine::{Difficulty, EngineError, Game};

#[test]
fn swap_after_first_move() {
    let mut game = Game::new_game(11, true, Difficulty::Easy, None);
    game.human_move("b4").unwrap();
    game.apply_swap().unwrap();
    let state = game.state();
    assert_eq!(state.current, Color::A);
    assert_eq!(state.history, vec![((1, 3), Color::B)]);
}

#[test]
fn engine_move_is_rejected_once_game_over() {
    let mut game = Game::new_game(5, true, Difficulty::Easy, None);
    // Play out a vertical win for A down column 2.
    for r in 0..5 {
        game.human_move(&hexmind::notation::format_cell((r, 2)))
            .ok();
        // human_move always applies to whichever color is "current"; to
        // keep a single color's stones on column 2 we alternate a harmless
        // B move elsewhere in between.
        if r < 4 {
            game.human_move(&hexmind::notation::format_cell((r, (2 + 1) % 5)))
                .ok();
        }
    }
    let state = game.state();
    if state.winner.is_some() {
        assert!(matches!(game.engine_move(), Err(EngineError::GameOver)));
    }
}

#[test]
fn full_round_trip_through_notation_and_swap() {
    let mut game = Game::new_game(11, false, Difficulty::Easy, None);
    // Opponent (A) opens off-center; we (B) decline to swap and just move.
    game.human_move("a1").unwrap();
    let result = game.engine_move().unwrap();
    assert_ne!(result.cell, (0, 0), "engine must not reoccupy the opponent's cell");
    let state = game.state();
    assert_eq!(state.history.len(), 2);
    assert_eq!(state.history[0], ((0, 0), Color::A));
    assert_eq!(state.history[1].1, Color::B);
}
