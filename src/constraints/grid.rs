use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;

// Row-major grid arithmetic shared by the rectangular-board constraints.

pub(crate) fn cell_at(x: usize, y: usize, width: usize) -> usize {
    y * width + x
}

pub(crate) fn coords(cell: usize, width: usize) -> (usize, usize) {
    (cell % width, cell / width)
}

fn offset_neighbours(
    cell: usize,
    width: usize,
    height: usize,
    offsets: &'static [(i32, i32)],
) -> impl Iterator<Item = usize> {
    let (x, y) = coords(cell, width);
    offsets.iter().filter_map(move |&(dx, dy)| {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height {
            Some(cell_at(nx as usize, ny as usize, width))
        } else {
            None
        }
    })
}

const ORTHOGONAL: &[(i32, i32)] = &[(0, -1), (1, 0), (0, 1), (-1, 0)];

const KING: &[(i32, i32)] = &[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const KNIGHT: &[(i32, i32)] = &[
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) fn orthogonal_neighbours(
    cell: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = usize> {
    offset_neighbours(cell, width, height, ORTHOGONAL)
}

/// Eliminates `value` from the cells `offsets` away from every fixed
/// occurrence of it. The shape all the "don't repeat near yourself" rules
/// share; they differ only in the offset table and in whether one value or
/// all values are watched.
fn eliminate_around(
    state: &mut PuzzleState,
    width: usize,
    height: usize,
    offsets: &'static [(i32, i32)],
    watched: Option<i32>,
) {
    let placements: Vec<(usize, i32)> = match state.last_placed() {
        Some((cell, value)) => vec![(cell, value)],
        None => (0..width * height)
            .filter_map(|cell| state.value(cell).map(|v| (cell, v)))
            .collect(),
    };
    for (cell, value) in placements {
        if watched.is_some_and(|w| w != value) {
            continue;
        }
        for neighbour in offset_neighbours(cell, width, height, offsets) {
            state.mark_impossible(neighbour, value);
        }
    }
}

/// No two orthogonally adjacent cells both hold `value`.
///
/// The Akari/Yin-Yang flavour of adjacency rule: one value is radioactive,
/// everything else may touch freely.
#[derive(Debug, Clone)]
pub struct NoAdjacent {
    width: usize,
    height: usize,
    value: i32,
}

impl NoAdjacent {
    pub fn new(width: usize, height: usize, value: i32) -> NoAdjacent {
        NoAdjacent {
            width,
            height,
            value,
        }
    }
}

impl Constraint for NoAdjacent {
    fn name(&self) -> &'static str {
        "NoAdjacent"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        eliminate_around(state, self.width, self.height, ORTHOGONAL, Some(self.value));
        ConstraintResult::Stands
    }
}

/// `value` may not appear in two cells that touch orthogonally or
/// diagonally.
#[derive(Debug, Clone)]
pub struct NoTouch {
    width: usize,
    height: usize,
    value: i32,
}

impl NoTouch {
    pub fn new(width: usize, height: usize, value: i32) -> NoTouch {
        NoTouch {
            width,
            height,
            value,
        }
    }
}

impl Constraint for NoTouch {
    fn name(&self) -> &'static str {
        "NoTouch"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        eliminate_around(state, self.width, self.height, KING, Some(self.value));
        ConstraintResult::Stands
    }
}

/// No cell shares its value with a cell a king's move away.
#[derive(Debug, Clone)]
pub struct AntiKing {
    width: usize,
    height: usize,
}

impl AntiKing {
    pub fn new(width: usize, height: usize) -> AntiKing {
        AntiKing { width, height }
    }
}

impl Constraint for AntiKing {
    fn name(&self) -> &'static str {
        "AntiKing"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        eliminate_around(state, self.width, self.height, KING, None);
        ConstraintResult::Stands
    }
}

/// No cell shares its value with a cell a knight's move away.
#[derive(Debug, Clone)]
pub struct AntiKnight {
    width: usize,
    height: usize,
}

impl AntiKnight {
    pub fn new(width: usize, height: usize) -> AntiKnight {
        AntiKnight { width, height }
    }
}

impl Constraint for AntiKnight {
    fn name(&self) -> &'static str {
        "AntiKnight"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        eliminate_around(state, self.width, self.height, KNIGHT, None);
        ConstraintResult::Stands
    }
}

/// No 2×2 block is uniformly `value` — the Heyawake/Yin-Yang "no pools"
/// rule. Three corners filled in means the fourth stays out.
#[derive(Debug, Clone)]
pub struct No2x2s {
    width: usize,
    height: usize,
    value: i32,
}

impl No2x2s {
    pub fn new(width: usize, height: usize, value: i32) -> No2x2s {
        No2x2s {
            width,
            height,
            value,
        }
    }

    /// Handles the 2×2 block whose top-left corner is `(x, y)`.
    fn check_block(&self, state: &mut PuzzleState, x: usize, y: usize) -> Result<(), ()> {
        let block = [
            cell_at(x, y, self.width),
            cell_at(x + 1, y, self.width),
            cell_at(x, y + 1, self.width),
            cell_at(x + 1, y + 1, self.width),
        ];
        let filled = block
            .iter()
            .filter(|&&cell| state.value(cell) == Some(self.value))
            .count();
        if filled == 4 {
            return Err(());
        }
        if filled == 3 {
            for &cell in &block {
                if state.value(cell) != Some(self.value) {
                    state.mark_impossible(cell, self.value);
                }
            }
        }
        Ok(())
    }

    fn blocks_to_check(&self, state: &PuzzleState) -> Vec<(usize, usize)> {
        if self.width < 2 || self.height < 2 {
            return Vec::new();
        }
        match state.last_placed_cell() {
            Some(cell) => {
                let (x, y) = coords(cell, self.width);
                let mut blocks = Vec::with_capacity(4);
                for bx in x.saturating_sub(1)..=x.min(self.width.saturating_sub(2)) {
                    for by in y.saturating_sub(1)..=y.min(self.height.saturating_sub(2)) {
                        blocks.push((bx, by));
                    }
                }
                blocks
            }
            None => {
                let mut blocks = Vec::new();
                for y in 0..self.height.saturating_sub(1) {
                    for x in 0..self.width.saturating_sub(1) {
                        blocks.push((x, y));
                    }
                }
                blocks
            }
        }
    }
}

impl Constraint for No2x2s {
    fn name(&self) -> &'static str {
        "No2x2s"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        for (x, y) in self.blocks_to_check(state) {
            if self.check_block(state, x, y).is_err() {
                return ConstraintResult::Violation;
            }
        }
        ConstraintResult::Stands
    }
}
