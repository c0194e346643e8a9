use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;

/// No two of the watched cells may hold the same value.
///
/// This is the row/column/box rule of every Sudoku variant. Propagation is
/// deliberately minimal: a placed value is removed from the other cells in
/// the set, and the engine's singleton promotion does the rest. Anything
/// fancier (hidden singles, naked pairs) belongs to the search, not here.
#[derive(Debug, Clone)]
pub struct Uniqueness {
    cells: Vec<usize>,
}

impl Uniqueness {
    pub fn new(cells: impl IntoIterator<Item = usize>) -> Uniqueness {
        Uniqueness {
            cells: cells.into_iter().collect(),
        }
    }

    fn eliminate_from_peers(&self, state: &mut PuzzleState, placed: usize, value: i32) {
        for &cell in &self.cells {
            if cell != placed {
                state.mark_impossible(cell, value);
            }
        }
    }
}

impl Constraint for Uniqueness {
    fn name(&self) -> &'static str {
        "Uniqueness"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        match state.last_placed() {
            Some((placed, value)) if self.cells.contains(&placed) => {
                self.eliminate_from_peers(state, placed, value);
            }
            Some(_) => {}
            None => {
                for &cell in &self.cells {
                    if let Some(value) = state.value(cell) {
                        self.eliminate_from_peers(state, cell, value);
                    }
                }
            }
        }
        ConstraintResult::Stands
    }
}
