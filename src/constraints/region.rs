use super::grid::orthogonal_neighbours;
use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;
use std::collections::VecDeque;

/// The cells holding one of `values` form a single orthogonally connected
/// region, if there are any.
///
/// The check floods from one committed in-region cell across everything
/// that might still join the region; a committed in-region cell the flood
/// cannot reach can never be connected, so the branch dies. How much the
/// open cells in between help is decided entirely by their current domains.
#[derive(Debug, Clone)]
pub struct ContiguousArea {
    width: usize,
    height: usize,
    values: Vec<i32>,
}

impl ContiguousArea {
    pub fn new(width: usize, height: usize, values: impl IntoIterator<Item = i32>) -> ContiguousArea {
        ContiguousArea {
            width,
            height,
            values: values.into_iter().collect(),
        }
    }

    fn committed_in_region(&self, state: &PuzzleState, cell: usize) -> bool {
        state
            .value(cell)
            .is_some_and(|v| self.values.contains(&v))
    }

    fn may_join_region(&self, state: &PuzzleState, cell: usize) -> bool {
        match state.value(cell) {
            Some(v) => self.values.contains(&v),
            None => self.values.iter().any(|&v| state.is_possible(cell, v)),
        }
    }
}

impl Constraint for ContiguousArea {
    fn name(&self) -> &'static str {
        "ContiguousArea"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let num_cells = self.width * self.height;
        let seeds: Vec<usize> = (0..num_cells)
            .filter(|&cell| self.committed_in_region(state, cell))
            .collect();
        if seeds.len() < 2 {
            return ConstraintResult::Stands;
        }

        let mut reached = vec![false; num_cells];
        let mut queue = VecDeque::new();
        reached[seeds[0]] = true;
        queue.push_back(seeds[0]);
        while let Some(cell) = queue.pop_front() {
            for neighbour in orthogonal_neighbours(cell, self.width, self.height) {
                if !reached[neighbour] && self.may_join_region(state, neighbour) {
                    reached[neighbour] = true;
                    queue.push_back(neighbour);
                }
            }
        }

        if seeds.iter().any(|&seed| !reached[seed]) {
            return ConstraintResult::Violation;
        }
        ConstraintResult::Stands
    }
}
