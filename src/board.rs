//! The Hex position: grid, empties, and one union-find per color.
//!
//! A fresh `Board` is empty; `place` is the only mutator and it is
//! monotone — once `winner()` reports a color, it reports that color
//! forever, since union-find components only ever merge.

use crate::union_find::UnionFind;

/// One of the two players. `A` owns the top/bottom edges (rows),
/// `B` owns the left/right edges (columns). `A` moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    A,
    B,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::A => Color::B,
            Color::B => Color::A,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::A => write!(f, "A"),
            Color::B => write!(f, "B"),
        }
    }
}

/// A board coordinate, `0 <= row, col < size`.
pub type Cell = (usize, usize);

const NEIGHBOR_DELTAS: [(isize, isize); 6] =
    [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0)];

/// The set of empty cells: supports O(1) membership and O(1) uniform
/// sampling via a vector-plus-index-map with swap-removal.
#[derive(Clone, Debug)]
struct EmptySet {
    cells: Vec<Cell>,
    // position of each cell's node-id within `cells`, or None if occupied.
    index: Vec<Option<u32>>,
}

impl EmptySet {
    fn new(size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        let mut index = vec![None; size * size];
        for r in 0..size {
            for c in 0..size {
                let id = r * size + c;
                index[id] = Some(cells.len() as u32);
                cells.push((r, c));
            }
        }
        EmptySet { cells, index }
    }

    fn contains(&self, id: usize) -> bool {
        self.index[id].is_some()
    }

    fn remove(&mut self, id: usize, size: usize) {
        let pos = self.index[id].expect("removing a cell that is not empty") as usize;
        let last = self.cells.len() - 1;
        self.cells.swap(pos, last);
        self.cells.pop();
        self.index[id] = None;
        if pos < self.cells.len() {
            let moved = self.cells[pos];
            self.index[moved.0 * size + moved.1] = Some(pos as u32);
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn sample(&self, rng: &mut fastrand::Rng) -> Option<Cell> {
        if self.cells.is_empty() {
            None
        } else {
            let i = rng.usize(0..self.cells.len());
            Some(self.cells[i])
        }
    }

    fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}

/// A Hex position of fixed size, with incremental per-color connectivity.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    grid: Vec<Option<Color>>,
    empties: EmptySet,
    uf_a: UnionFind,
    uf_b: UnionFind,
    move_count: usize,
}

impl Board {
    /// A fresh, empty board of `size * size` cells.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        Board {
            size,
            grid: vec![None; size * size],
            empties: EmptySet::new(size),
            uf_a: UnionFind::new(size * size + 2),
            uf_b: UnionFind::new(size * size + 2),
            move_count: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    fn node_id(&self, cell: Cell) -> usize {
        cell.0 * self.size + cell.1
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.0 < self.size && cell.1 < self.size
    }

    /// The color occupying `cell`, if any. Panics on an out-of-range cell.
    pub fn get(&self, cell: Cell) -> Option<Color> {
        assert!(self.in_bounds(cell), "cell out of range: {cell:?}");
        self.grid[self.node_id(cell)]
    }

    /// True iff `cell` is in-range and empty.
    pub fn is_valid(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.empties.contains(self.node_id(cell))
    }

    /// The (up to six) in-bounds neighbors of `cell`.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let (r, c) = cell;
        let s = self.size as isize;
        NEIGHBOR_DELTAS.into_iter().filter_map(move |(dr, dc)| {
            let nr = r as isize + dr;
            let nc = c as isize + dc;
            if nr >= 0 && nr < s && nc >= 0 && nc < s {
                Some((nr as usize, nc as usize))
            } else {
                None
            }
        })
    }

    /// Places `color` at `cell`. Returns `false` and does nothing if the
    /// cell is out of range or already occupied. Never rejects on shape
    /// grounds — Hex has none.
    pub fn place(&mut self, cell: Cell, color: Color) -> bool {
        if !self.is_valid(cell) {
            return false;
        }
        let id = self.node_id(cell);
        self.grid[id] = Some(color);
        self.empties.remove(id, self.size);
        self.move_count += 1;

        let virtual1 = self.size * self.size;
        let virtual2 = virtual1 + 1;
        {
            let uf = match color {
                Color::A => &mut self.uf_a,
                Color::B => &mut self.uf_b,
            };
            match color {
                Color::A => {
                    if cell.0 == 0 {
                        uf.union(id, virtual1);
                    }
                    if cell.0 == self.size - 1 {
                        uf.union(id, virtual2);
                    }
                }
                Color::B => {
                    if cell.1 == 0 {
                        uf.union(id, virtual1);
                    }
                    if cell.1 == self.size - 1 {
                        uf.union(id, virtual2);
                    }
                }
            }
        }
        for n in self.neighbors(cell) {
            if self.grid[self.node_id(n)] == Some(color) {
                let nid = self.node_id(n);
                let uf = match color {
                    Color::A => &mut self.uf_a,
                    Color::B => &mut self.uf_b,
                };
                uf.union(id, nid);
            }
        }
        true
    }

    /// `Some(A)` / `Some(B)` if that color's two borders are connected,
    /// else `None`. Checks A before B; the two cannot both legitimately
    /// hold, so the order has no bearing on correct play.
    pub fn winner(&mut self) -> Option<Color> {
        let virtual1 = self.size * self.size;
        let virtual2 = virtual1 + 1;
        if self.uf_a.connected(virtual1, virtual2) {
            Some(Color::A)
        } else if self.uf_b.connected(virtual1, virtual2) {
            Some(Color::B)
        } else {
            None
        }
    }

    pub fn is_terminal(&mut self) -> bool {
        self.winner().is_some()
    }

    pub fn empties_count(&self) -> usize {
        self.empties.len()
    }

    pub fn empties_view(&self) -> impl Iterator<Item = Cell> + '_ {
        self.empties.iter()
    }

    pub fn sample_empty(&self, rng: &mut fastrand::Rng) -> Option<Cell> {
        self.empties.sample(rng)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.size {
            write!(f, "{}", " ".repeat(r))?;
            for c in 0..self.size {
                let ch = match self.get((r, c)) {
                    None => '.',
                    Some(Color::A) => 'a',
                    Some(Color::B) => 'b',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
