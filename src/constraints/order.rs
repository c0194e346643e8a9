use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;

/// The watched cells strictly increase along the chain — the Thermometer
/// rule.
///
/// Equivalent to a [`Combinations`](super::Combinations) over all strictly
/// increasing tuples, but propagated directly: a forward sweep raises each
/// cell's lower bound past the smallest candidate of its predecessor, and a
/// backward sweep lowers each upper bound below the largest candidate of its
/// successor.
#[derive(Debug, Clone)]
pub struct LessThan {
    cells: Vec<usize>,
}

impl LessThan {
    pub fn new(cells: impl IntoIterator<Item = usize>) -> LessThan {
        LessThan {
            cells: cells.into_iter().collect(),
        }
    }
}

impl Constraint for LessThan {
    fn name(&self) -> &'static str {
        "LessThan"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        if self.cells.len() < 2 {
            return ConstraintResult::satisfied();
        }

        for k in 1..self.cells.len() {
            let Some(prev_min) = state.possible_set(self.cells[k - 1]).smallest() else {
                return ConstraintResult::Stands;
            };
            state.mark_impossible_where(self.cells[k], |v| v <= prev_min);
        }
        for k in (0..self.cells.len() - 1).rev() {
            let Some(next_max) = state.possible_set(self.cells[k + 1]).largest() else {
                return ConstraintResult::Stands;
            };
            state.mark_impossible_where(self.cells[k], |v| v >= next_max);
        }

        let values: Option<Vec<i32>> = self.cells.iter().map(|&c| state.value(c)).collect();
        if let Some(values) = values {
            return if values.windows(2).all(|w| w[0] < w[1]) {
                ConstraintResult::satisfied()
            } else {
                ConstraintResult::Violation
            };
        }
        ConstraintResult::Stands
    }
}
