use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;

/// At most `limit` of the watched cells may hold `value`.
///
/// Once the quota is spent, the value disappears from every still-open cell
/// in the set.
#[derive(Debug, Clone)]
pub struct MaximumCount {
    value: i32,
    limit: usize,
    cells: Vec<usize>,
}

impl MaximumCount {
    pub fn new(value: i32, limit: usize, cells: impl IntoIterator<Item = usize>) -> MaximumCount {
        MaximumCount {
            value,
            limit,
            cells: cells.into_iter().collect(),
        }
    }
}

impl Constraint for MaximumCount {
    fn name(&self) -> &'static str {
        "MaximumCount"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let spent = self
            .cells
            .iter()
            .filter(|&&cell| state.value(cell) == Some(self.value))
            .count();
        if spent > self.limit {
            return ConstraintResult::Violation;
        }
        if spent == self.limit {
            for &cell in &self.cells {
                if state.value(cell).is_none() {
                    state.mark_impossible(cell, self.value);
                }
            }
        }
        if self.cells.iter().all(|&cell| state.value(cell).is_some()) {
            return ConstraintResult::satisfied();
        }
        ConstraintResult::Stands
    }
}
