//! The `Game` handle: the external Engine API over a [`Board`] and
//! [`crate::search`].
//!
//! `Game` is reentrant and holds all of its own state — there is no
//! process-wide singleton here, unlike the reference's global `Game`
//! singleton. Adapters (a CLI, an HTTP handler, a text protocol loop)
//! own a `Game` each and drive it through this API.

use std::time::Duration;

use crate::board::{Board, Cell, Color};
use crate::notation;
use crate::search::{self, Budget, SearchConfig};

/// A write-only sink for advisory log lines. The core never opens a file
/// or writes to stdout itself — an adapter supplies an implementation if
/// it wants logging at all.
pub trait LogSink {
    fn log(&self, message: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn budget_secs(self) -> f64 {
        match self {
            Difficulty::Easy => crate::constants::EASY_BUDGET_SECS,
            Difficulty::Medium => crate::constants::MEDIUM_BUDGET_SECS,
            Difficulty::Hard => crate::constants::HARD_BUDGET_SECS,
        }
    }
}

#[derive(Debug)]
pub enum EngineError {
    InvalidMove(String),
    /// Never constructed: a search that runs out of time before a single
    /// rollout completes still returns a fallback move, surfaced via
    /// `EngineMoveResult::timed_out` rather than an `Err`. Kept as a
    /// variant so callers can match on it if a future search path needs
    /// to report timeout as a hard error instead of a flag.
    EngineTimeout,
    GameOver,
    Internal(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidMove(reason) => write!(f, "invalid move: {reason}"),
            EngineError::EngineTimeout => write!(f, "search deadline expired before any rollout completed"),
            EngineError::GameOver => write!(f, "game is already over"),
            EngineError::Internal(reason) => write!(f, "internal engine error: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Outcome of a completed `engine_move()` call.
#[derive(Debug, Clone, Copy)]
pub struct EngineMoveResult {
    pub cell: Cell,
    pub winner: Option<Color>,
    /// Set if the search deadline expired before a single rollout
    /// completed; the returned cell is then a fallback move, not a
    /// search-backed decision.
    pub timed_out: bool,
}

/// A read-only snapshot of the game for UI refresh.
#[derive(Debug, Clone)]
pub struct GameState {
    pub size: usize,
    pub grid: Vec<Option<Color>>,
    pub history: Vec<(Cell, Color)>,
    pub current: Color,
    pub winner: Option<Color>,
}

pub struct Game {
    board: Board,
    history: Vec<(Cell, Color)>,
    current: Color,
    difficulty: Difficulty,
    swapped: bool,
    seed_rng: fastrand::Rng,
    log: Option<Box<dyn LogSink>>,
}

impl Game {
    /// Resets all state for a new game. `human_plays_first` does not
    /// change engine behavior (`human_move`/`engine_move` always act on
    /// whichever color is currently to move) — it only seeds the initial
    /// log line, leaving the choice of which call to make first to the
    /// adapter.
    pub fn new_game(
        size: usize,
        human_plays_first: bool,
        difficulty: Difficulty,
        log: Option<Box<dyn LogSink>>,
    ) -> Self {
        if let Some(sink) = &log {
            sink.log(&format!(
                "new game: size={size} human_plays_first={human_plays_first} difficulty={difficulty:?}"
            ));
        }
        Game {
            board: Board::new(size),
            history: Vec::new(),
            current: Color::A,
            difficulty,
            swapped: false,
            seed_rng: fastrand::Rng::new(),
            log,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    fn winner(&mut self) -> Option<Color> {
        self.board.winner()
    }

    /// Applies a human move in `"<letter><number>"` notation.
    pub fn human_move(&mut self, notation: &str) -> Result<(), EngineError> {
        if self.winner().is_some() {
            return Err(EngineError::GameOver);
        }
        let cell = notation::parse_cell(notation)
            .map_err(|_| EngineError::InvalidMove(format!("could not parse {notation:?}")))?;
        if cell.0 >= self.board.size() || cell.1 >= self.board.size() {
            return Err(EngineError::InvalidMove(format!("{notation} is off the board")));
        }
        if !self.board.is_valid(cell) {
            return Err(EngineError::InvalidMove(format!("{notation} is already occupied")));
        }
        let color = self.current;
        if !self.board.place(cell, color) {
            return Err(EngineError::Internal(
                "place() rejected a cell that passed is_valid()".into(),
            ));
        }
        self.history.push((cell, color));
        self.current = color.opposite();
        if let Some(sink) = &self.log {
            sink.log(&format!("human played {notation} as {color}"));
        }
        Ok(())
    }

    /// Runs a search under the current difficulty's time budget and
    /// applies the chosen move.
    pub fn engine_move(&mut self) -> Result<EngineMoveResult, EngineError> {
        if self.winner().is_some() {
            return Err(EngineError::GameOver);
        }
        if self.board.empties_count() == 0 {
            return Err(EngineError::GameOver);
        }
        let had_stones = self.board.move_count() > 0;
        let seed = self.seed_rng.u64(..);
        let budget = Budget::Time(Duration::from_secs_f64(self.difficulty.budget_secs()));
        let report = search::search(&self.board, self.current, budget, &SearchConfig::default(), seed);

        let color = self.current;
        if !self.board.place(report.best_move, color) {
            return Err(EngineError::Internal(
                "search returned a cell that is no longer valid".into(),
            ));
        }
        self.history.push((report.best_move, color));
        self.current = color.opposite();
        let winner = self.board.winner();
        let timed_out = had_stones && report.rollouts == 0;

        if let Some(sink) = &self.log {
            sink.log(&format!(
                "engine played {} as {color} ({} rollouts, {:?})",
                notation::format_cell(report.best_move),
                report.rollouts,
                report.elapsed
            ));
        }

        Ok(EngineMoveResult {
            cell: report.best_move,
            winner,
            timed_out,
        })
    }

    /// Invokes the swap (pie) rule: only legal immediately after exactly
    /// one move has been played. Erases that stone, places one of the
    /// opposite color at the mirrored cell, and hands the turn back to
    /// the original first mover.
    pub fn apply_swap(&mut self) -> Result<(), EngineError> {
        if self.swapped || self.history.len() != 1 {
            return Err(EngineError::InvalidMove(
                "swap is only legal immediately after the first move".into(),
            ));
        }
        let (cell, color) = self.history[0];
        let mirrored = (cell.1, cell.0);
        let new_color = color.opposite();

        let mut fresh = Board::new(self.board.size());
        if !fresh.place(mirrored, new_color) {
            return Err(EngineError::Internal(
                "mirrored swap cell is out of range or occupied on a fresh board".into(),
            ));
        }
        self.board = fresh;
        self.history = vec![(mirrored, new_color)];
        self.current = color;
        self.swapped = true;

        if let Some(sink) = &self.log {
            sink.log(&format!("swap applied: {color} stone mirrored to {new_color}"));
        }
        Ok(())
    }

    /// A snapshot of the board, history, side to move, and winner.
    pub fn state(&mut self) -> GameState {
        let size = self.board.size();
        let mut grid = Vec::with_capacity(size * size);
        for r in 0..size {
            for c in 0..size {
                grid.push(self.board.get((r, c)));
            }
        }
        GameState {
            size,
            grid,
            history: self.history.clone(),
            current: self.current,
            winner: self.board.winner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game_has_no_winner_and_a_to_move() {
        let mut game = Game::new_game(5, true, Difficulty::Easy, None);
        let state = game.state();
        assert_eq!(state.current, Color::A);
        assert_eq!(state.winner, None);
        assert!(state.history.is_empty());
    }

    #[test]
    fn human_move_switches_the_mover() {
        let mut game = Game::new_game(5, true, Difficulty::Easy, None);
        game.human_move("a1").unwrap();
        assert_eq!(game.state().current, Color::B);
        assert_eq!(game.state().history, vec![((0, 0), Color::A)]);
    }

    #[test]
    fn human_move_rejects_occupied_cell() {
        let mut game = Game::new_game(5, true, Difficulty::Easy, None);
        game.human_move("a1").unwrap();
        assert!(matches!(game.human_move("a1"), Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn human_move_rejects_garbage_notation() {
        let mut game = Game::new_game(5, true, Difficulty::Easy, None);
        assert!(matches!(game.human_move("zz99"), Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn swap_mirrors_the_first_move_and_returns_turn_to_a() {
        // First move at (3,1) = "b4", swap -> sole stone at (1,3) colored
        // B, side to move A.
        let mut game = Game::new_game(11, true, Difficulty::Easy, None);
        game.human_move("b4").unwrap();
        game.apply_swap().unwrap();
        let state = game.state();
        assert_eq!(state.history, vec![((1, 3), Color::B)]);
        assert_eq!(state.current, Color::A);
        let occupied: Vec<_> = state
            .grid
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .collect();
        assert_eq!(occupied.len(), 1);
    }

    #[test]
    fn swap_rejected_after_more_than_one_move() {
        let mut game = Game::new_game(5, true, Difficulty::Easy, None);
        game.human_move("a1").unwrap();
        game.human_move("a2").unwrap();
        assert!(matches!(game.apply_swap(), Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn swap_rejected_before_any_move() {
        let mut game = Game::new_game(5, true, Difficulty::Easy, None);
        assert!(matches!(game.apply_swap(), Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn engine_move_on_a_won_board_is_game_over() {
        let mut game = Game::new_game(5, true, Difficulty::Easy, None);
        for r in 0..5 {
            game.board.place((r, 2), Color::A);
        }
        assert!(matches!(game.engine_move(), Err(EngineError::GameOver)));
    }

    struct CollectSink {
        lines: std::cell::RefCell<Vec<String>>,
    }
    impl LogSink for CollectSink {
        fn log(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_string());
        }
    }

    #[test]
    fn log_sink_receives_move_notifications() {
        let sink = CollectSink {
            lines: std::cell::RefCell::new(Vec::new()),
        };
        let mut game = Game::new_game(5, true, Difficulty::Easy, Some(Box::new(sink)));
        game.human_move("a1").unwrap();
        // The sink was moved into the Game; can't inspect it directly here,
        // but the call above must not panic, which is the behavior under test.
        let _ = game.state();
    }
}
