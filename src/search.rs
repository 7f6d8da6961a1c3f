//! UCB1 Monte Carlo tree search over a [`Board`].
//!
//! The tree is an arena (`Vec<Node>`) addressed by [`NodeId`], with each
//! node holding a parent index rather than a shared owning pointer — this
//! sidesteps the ownership cycles a naive `Rc<RefCell<_>>` tree would
//! need. A tree is built fresh for every call to [`search`] and discarded
//! when it returns; nothing is carried over between moves.

use std::time::{Duration, Instant};

use crate::board::{Board, Cell, Color};
use crate::constants::{CENTER_FALLBACK_RADIUS, EXPLORATION_CONSTANT, NEIGHBORHOOD_RADIUS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Clone, Debug)]
struct Node {
    board: Board,
    mover: Color,
    parent: Option<NodeId>,
    #[allow(dead_code)]
    move_in: Option<Cell>,
    visits: u64,
    reward: f64,
    untried: Vec<Cell>,
    children: Vec<(Cell, NodeId)>,
}

/// How long a [`search`] call is allowed to run.
#[derive(Clone, Copy, Debug)]
pub enum Budget {
    /// Run until the wall-clock deadline. Not reproducible across runs
    /// with differing machine speed — see `Budget::Rollouts`.
    Time(Duration),
    /// Run exactly this many rollouts. Combined with a fixed seed, this
    /// is the only budget form that guarantees a deterministic result.
    Rollouts(u32),
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// `c` in the UCB1 formula. Defaults to `sqrt(2)`.
    pub exploration_c: f64,
    /// Restrict expansion/simulation candidates to cells near existing
    /// stones, falling back to all empties when that set is empty.
    pub use_neighborhood_filter: bool,
    /// If the root board is empty, return the center cell without
    /// running any rollouts.
    pub first_move_bias: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration_c: EXPLORATION_CONSTANT,
            use_neighborhood_filter: true,
            first_move_bias: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SearchReport {
    pub best_move: Cell,
    pub root_visits: u64,
    pub rollouts: u32,
    pub elapsed: Duration,
}

/// Hex-grid distance between two cells, using the fact that the board's
/// six-neighbor adjacency is the standard axial-coordinate layout.
fn hex_distance(a: Cell, b: Cell) -> i64 {
    let dr = b.0 as i64 - a.0 as i64;
    let dc = b.1 as i64 - a.1 as i64;
    (dr.abs() + dc.abs() + (dr + dc).abs()) / 2
}

/// Candidate moves for a node: all empties, or — when filtering is on and
/// at least one stone is already on the board — empties within
/// [`NEIGHBORHOOD_RADIUS`] of some stone, falling back to all empties if
/// that set is empty. Never excludes the only legal moves left.
fn candidate_moves(board: &Board, use_filter: bool) -> Vec<Cell> {
    let all: Vec<Cell> = board.empties_view().collect();
    if !use_filter || board.move_count() == 0 {
        return all;
    }
    let size = board.size();
    let stones: Vec<Cell> = (0..size)
        .flat_map(|r| (0..size).map(move |c| (r, c)))
        .filter(|&cell| board.get(cell).is_some())
        .collect();
    let radius = NEIGHBORHOOD_RADIUS as i64;
    let filtered: Vec<Cell> = all
        .iter()
        .copied()
        .filter(|&e| stones.iter().any(|&s| hex_distance(e, s) <= radius))
        .collect();
    if filtered.is_empty() {
        all
    } else {
        filtered
    }
}

struct Tree {
    arena: Vec<Node>,
    rng: fastrand::Rng,
    config: SearchConfig,
    root_player: Color,
}

impl Tree {
    /// Descends from the root, stopping at a terminal node, a node with
    /// untried moves remaining, or an unvisited child (picked outright to
    /// avoid a divide-by-zero in UCB1).
    fn select(&mut self) -> NodeId {
        let mut current = NodeId::ROOT;
        loop {
            if self.arena[current.0].board.is_terminal() {
                return current;
            }
            if !self.arena[current.0].untried.is_empty() {
                return current;
            }
            let parent_visits = self.arena[current.0].visits;
            let mut unvisited: Option<NodeId> = None;
            let mut best: Option<(NodeId, f64)> = None;
            for &(_, child_id) in &self.arena[current.0].children {
                let child = &self.arena[child_id.0];
                if child.visits == 0 {
                    unvisited = Some(child_id);
                    break;
                }
                let mean = child.reward / child.visits as f64;
                let score = mean
                    + self.config.exploration_c
                        * ((parent_visits as f64).ln() / child.visits as f64).sqrt();
                if best.map(|(_, s)| score > s).unwrap_or(true) {
                    best = Some((child_id, score));
                }
            }
            current = unvisited
                .or_else(|| best.map(|(id, _)| id))
                .expect("non-terminal node with no untried moves must have children");
        }
    }

    fn expand(&mut self, node_id: NodeId) -> NodeId {
        let idx = self.rng.usize(0..self.arena[node_id.0].untried.len());
        let mv = self.arena[node_id.0].untried.swap_remove(idx);
        let mover = self.arena[node_id.0].mover;
        let mut child_board = self.arena[node_id.0].board.clone();
        child_board.place(mv, mover);
        let child_untried = candidate_moves(&child_board, self.config.use_neighborhood_filter);
        let child = Node {
            board: child_board,
            mover: mover.opposite(),
            parent: Some(node_id),
            move_in: Some(mv),
            visits: 0,
            reward: 0.0,
            untried: child_untried,
            children: Vec::new(),
        };
        let child_id = NodeId(self.arena.len());
        self.arena.push(child);
        self.arena[node_id.0].children.push((mv, child_id));
        child_id
    }

    fn simulate(&mut self, node_id: NodeId) -> f64 {
        let mut board = self.arena[node_id.0].board.clone();
        let mut mover = self.arena[node_id.0].mover;
        loop {
            if let Some(winner) = board.winner() {
                return if winner == self.root_player { 1.0 } else { -1.0 };
            }
            let candidates = candidate_moves(&board, self.config.use_neighborhood_filter);
            match candidates.is_empty() {
                true => return 0.0,
                false => {
                    let cell = candidates[self.rng.usize(0..candidates.len())];
                    board.place(cell, mover);
                    mover = mover.opposite();
                }
            }
        }
    }

    fn backpropagate(&mut self, mut node_id: NodeId, reward: f64) {
        loop {
            let node = &mut self.arena[node_id.0];
            node.visits += 1;
            node.reward += reward;
            match node.parent {
                Some(p) => node_id = p,
                None => break,
            }
        }
    }

    fn run_one_rollout(&mut self) {
        let leaf = self.select();
        let sim_node = if self.arena[leaf.0].board.is_terminal() {
            leaf
        } else {
            self.expand(leaf)
        };
        let reward = self.simulate(sim_node);
        self.backpropagate(sim_node, reward);
    }

    /// The root's child with the highest mean reward among those visited
    /// at least once. Ties keep the first encountered, matching insertion
    /// order of `children`.
    fn best_child_move(&self) -> Option<Cell> {
        let mut best: Option<(Cell, f64)> = None;
        for &(mv, child_id) in &self.arena[NodeId::ROOT.0].children {
            let child = &self.arena[child_id.0];
            if child.visits == 0 {
                continue;
            }
            let mean = child.reward / child.visits as f64;
            if best.map(|(_, s)| mean > s).unwrap_or(true) {
                best = Some((mv, mean));
            }
        }
        best.map(|(mv, _)| mv)
    }

    fn fallback_move(&mut self, board: &Board) -> Cell {
        let size = board.size() as isize;
        let center = size / 2;
        let mut near: Vec<Cell> = board
            .empties_view()
            .filter(|&(r, c)| {
                (r as isize - center).abs() <= CENTER_FALLBACK_RADIUS
                    && (c as isize - center).abs() <= CENTER_FALLBACK_RADIUS
            })
            .collect();
        if near.is_empty() {
            near = board.empties_view().collect();
        }
        let idx = self.rng.usize(0..near.len());
        near[idx]
    }
}

/// Runs a UCB1 MCTS search from `board` with `mover` to play, under
/// `budget`, and returns the chosen move plus telemetry. Builds a fresh
/// tree every call; nothing is reused across invocations.
///
/// Panics if `board` is already terminal or has no empty cells — callers
/// must check `is_terminal()` before asking for a move.
pub fn search(board: &Board, mover: Color, budget: Budget, config: &SearchConfig, seed: u64) -> SearchReport {
    let start = Instant::now();

    if config.first_move_bias && board.move_count() == 0 {
        let center = board.size() / 2;
        if board.is_valid((center, center)) {
            return SearchReport {
                best_move: (center, center),
                root_visits: 0,
                rollouts: 0,
                elapsed: start.elapsed(),
            };
        }
    }

    let rng = fastrand::Rng::with_seed(seed);
    let root_untried = candidate_moves(board, config.use_neighborhood_filter);
    let root = Node {
        board: board.clone(),
        mover,
        parent: None,
        move_in: None,
        visits: 0,
        reward: 0.0,
        untried: root_untried,
        children: Vec::new(),
    };
    let mut tree = Tree {
        arena: vec![root],
        rng,
        config: config.clone(),
        root_player: mover,
    };

    let mut rollouts = 0u32;
    match budget {
        Budget::Time(duration) => {
            let deadline = start + duration;
            while Instant::now() < deadline {
                tree.run_one_rollout();
                rollouts += 1;
            }
        }
        Budget::Rollouts(n) => {
            for _ in 0..n {
                tree.run_one_rollout();
                rollouts += 1;
            }
        }
    }

    let best_move = tree
        .best_child_move()
        .unwrap_or_else(|| tree.fallback_move(board));

    SearchReport {
        best_move,
        root_visits: tree.arena[NodeId::ROOT.0].visits,
        rollouts,
        elapsed: start.elapsed(),
    }
}
