use super::grid::coords;
use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;

/// The four edges of a cell a line can leave through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
        }
    }
}

const NO_EDGES: [bool; 4] = [false; 4];

/// The edges used by each value of the path-segment encoding, indexed
/// Up/Right/Down/Left:
///
/// `0` empty, `1` ⌞, `2` │, `3` ⌜, `4` ⌟, `5` ─, `6` ⌝.
///
/// Every nonzero segment covers exactly two edges, so a junction of three
/// lines cannot even be written down.
pub fn segment_edges(value: i32) -> [bool; 4] {
    match value {
        1 => [true, true, false, false],
        2 => [true, false, true, false],
        3 => [false, true, true, false],
        4 => [true, false, false, true],
        5 => [false, true, false, true],
        6 => [false, false, true, true],
        _ => NO_EDGES,
    }
}

fn has_edge(value: i32, dir: Dir) -> bool {
    segment_edges(value)[dir as usize]
}

fn neighbour(cell: usize, dir: Dir, width: usize, height: usize) -> Option<usize> {
    let (x, y) = coords(cell, width);
    match dir {
        Dir::Up => (y > 0).then(|| cell - width),
        Dir::Right => (x + 1 < width).then(|| cell + 1),
        Dir::Down => (y + 1 < height).then(|| cell + width),
        Dir::Left => (x > 0).then(|| cell - 1),
    }
}

/// Propagates what a committed segment demands of its neighbours. Errors if
/// the segment points off the grid or at a committed cell that refuses it.
fn constrain_neighbours(
    state: &mut PuzzleState,
    cell: usize,
    value: i32,
    width: usize,
    height: usize,
) -> Result<(), ()> {
    for dir in Dir::ALL {
        let runs = has_edge(value, dir);
        match neighbour(cell, dir, width, height) {
            None => {
                if runs {
                    return Err(());
                }
            }
            Some(next) => match state.value(next) {
                Some(w) => {
                    if has_edge(w, dir.opposite()) != runs {
                        return Err(());
                    }
                }
                None => {
                    state.mark_impossible_where(next, |w| has_edge(w, dir.opposite()) != runs);
                }
            },
        }
    }
    Ok(())
}

/// Line segments must continue into each other: an edge drawn toward a
/// neighbour needs the matching edge drawn back, and no edge may point off
/// the board.
///
/// This is the local half of every path-genre puzzle; pair it with
/// [`SingleLoop`] when the lines must also close into one loop.
#[derive(Debug, Clone)]
pub struct Path {
    width: usize,
    height: usize,
}

impl Path {
    pub fn new(width: usize, height: usize) -> Path {
        Path { width, height }
    }
}

impl Constraint for Path {
    fn name(&self) -> &'static str {
        "Path"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        match state.last_placed() {
            Some((cell, value)) => {
                if constrain_neighbours(state, cell, value, self.width, self.height).is_err() {
                    return ConstraintResult::Violation;
                }
            }
            None => {
                for cell in 0..self.width * self.height {
                    // Keep segments off the border.
                    state.mark_impossible_where(cell, |v| {
                        Dir::ALL.iter().any(|&dir| {
                            has_edge(v, dir) && neighbour(cell, dir, self.width, self.height).is_none()
                        })
                    });
                }
                for cell in 0..self.width * self.height {
                    if let Some(value) = state.value(cell) {
                        if constrain_neighbours(state, cell, value, self.width, self.height)
                            .is_err()
                        {
                            return ConstraintResult::Violation;
                        }
                    }
                }
            }
        }
        ConstraintResult::Stands
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> UnionFind {
        UnionFind {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Returns false if the two were already connected.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}

/// The committed segments must end up forming one closed loop.
///
/// Realised connections (both cells committed, edges matching) feed a
/// union-find. Joining two cells that are already connected closes a loop;
/// the first closure must swallow every segment on the board, and the rest
/// of the board is forced empty. A second closure, or a segment stranded
/// outside the closed loop, kills the branch. Edge mismatches and
/// off-board edges are rejected here too, so the constraint stands on its
/// own.
#[derive(Debug, Clone)]
pub struct SingleLoop {
    width: usize,
    height: usize,
}

impl SingleLoop {
    pub fn new(width: usize, height: usize) -> SingleLoop {
        SingleLoop { width, height }
    }
}

impl Constraint for SingleLoop {
    fn name(&self) -> &'static str {
        "SingleLoop"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let num_cells = self.width * self.height;
        let mut components = UnionFind::new(num_cells);
        let mut closures = 0;
        let mut loop_cell = 0;

        for cell in 0..num_cells {
            let Some(value) = state.value(cell) else {
                continue;
            };
            if segment_edges(value) == NO_EDGES {
                continue;
            }
            for dir in Dir::ALL {
                let runs = has_edge(value, dir);
                match neighbour(cell, dir, self.width, self.height) {
                    None => {
                        if runs {
                            return ConstraintResult::Violation;
                        }
                    }
                    Some(next) => match state.value(next) {
                        Some(w) => {
                            if has_edge(w, dir.opposite()) != runs {
                                return ConstraintResult::Violation;
                            }
                            // Count each realised connection once.
                            if runs && matches!(dir, Dir::Right | Dir::Down) {
                                if !components.union(cell, next) {
                                    closures += 1;
                                    loop_cell = cell;
                                }
                            }
                        }
                        None => {
                            state.mark_impossible_where(next, |w| {
                                has_edge(w, dir.opposite()) != runs
                            });
                        }
                    },
                }
            }
        }

        if closures > 1 {
            return ConstraintResult::Violation;
        }
        if closures == 1 {
            // One loop closed; it must be the whole story.
            let root = components.find(loop_cell);
            for cell in 0..num_cells {
                match state.value(cell) {
                    Some(value) if segment_edges(value) != NO_EDGES => {
                        if components.find(cell) != root {
                            return ConstraintResult::Violation;
                        }
                    }
                    Some(_) => {}
                    None => {
                        state.mark_impossible_where(cell, |v| segment_edges(v) != NO_EDGES);
                    }
                }
            }
        }

        if (0..num_cells).all(|cell| state.value(cell).is_some()) {
            return ConstraintResult::satisfied();
        }
        ConstraintResult::Stands
    }
}
