//! Tunable constants for board defaults and MCTS search.
//!
//! The board size is a runtime parameter (`Board::new(size)`), not a
//! compile-time feature — a session can be started at any size, so there
//! is nothing here to gate behind Cargo features.

/// Board size used when none is given explicitly.
pub const DEFAULT_BOARD_SIZE: usize = 11;

/// UCB1 exploration constant, `c` in `mean + c * sqrt(ln(N)/n)`. The
/// textbook value; the reference engine used 1.5.
pub const EXPLORATION_CONSTANT: f64 = std::f64::consts::SQRT_2;

/// Search time budgets, in seconds, per difficulty level.
pub const EASY_BUDGET_SECS: f64 = 2.0;
pub const MEDIUM_BUDGET_SECS: f64 = 5.0;
pub const HARD_BUDGET_SECS: f64 = 10.0;

/// Hex-distance radius used by the neighborhood move filter: only empties
/// within this many steps of some stone are considered "nearby".
pub const NEIGHBORHOOD_RADIUS: u32 = 2;

/// Chebyshev radius around the board center used by the driver's
/// near-center fallback move, when no child has been visited at all.
pub const CENTER_FALLBACK_RADIUS: isize = 2;
