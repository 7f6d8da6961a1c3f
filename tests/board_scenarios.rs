//! Board-level invariant and win-detection tests.

use hexmind::board::{Board, Color};

#[test]
fn empties_consistency_under_random_play() {
    let size = 9;
    let mut board = Board::new(size);
    let mut rng = fastrand::Rng::with_seed(123);
    let mut color = Color::A;
    for _ in 0..(size * size) {
        let Some(cell) = board.sample_empty(&mut rng) else {
            break;
        };
        board.place(cell, color);
        for r in 0..size {
            for c in 0..size {
                let empty_by_grid = board.get((r, c)).is_none();
                let empty_by_set = board.is_valid((r, c));
                assert_eq!(empty_by_grid, empty_by_set);
            }
        }
        color = color.opposite();
        if board.clone().winner().is_some() {
            break;
        }
    }
}

#[test]
fn empty_board_has_no_winner() {
    let mut board = Board::new(11);
    assert_eq!(board.winner(), None);
}

#[test]
fn vertical_win_for_a_with_interleaved_b_stones() {
    let mut board = Board::new(11);
    for r in 0..11 {
        board.place((r, 5), Color::A);
        if r < 10 {
            board.place((r, 9), Color::B);
            assert_eq!(board.winner(), None);
        }
    }
    assert_eq!(board.winner(), Some(Color::A));
}

#[test]
fn horizontal_win_for_b() {
    let mut board = Board::new(11);
    for c in 0..11 {
        board.place((5, c), Color::B);
    }
    assert_eq!(board.winner(), Some(Color::B));
}

#[test]
fn full_board_has_no_draw() {
    let size = 6;
    let mut board = Board::new(size);
    let mut rng = fastrand::Rng::with_seed(7);
    let mut color = Color::A;
    while board.empties_count() > 0 {
        let cell = board.sample_empty(&mut rng).unwrap();
        board.place(cell, color);
        color = color.opposite();
    }
    let a = board.clone().winner() == Some(Color::A);
    let b = board.clone().winner() == Some(Color::B);
    assert!(a ^ b, "full board must have exactly one winner");
}

#[test]
fn monotonicity_winner_never_reverts() {
    let mut board = Board::new(7);
    for r in 0..7 {
        board.place((r, 3), Color::A);
    }
    assert_eq!(board.winner(), Some(Color::A));
    // Further B placements can never make A stop winning.
    for c in [0usize, 1, 2, 4, 5, 6] {
        board.place((0, c), Color::B);
        assert_eq!(board.winner(), Some(Color::A));
    }
}
