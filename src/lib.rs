//! A constraint-propagation solver for cell-placement puzzles: Sudoku and
//! its many variants, Binairo, Akari, Heyawake, loop puzzles, and anything
//! else you can phrase as "fill these cells from this range so that every
//! rule holds".
//!
//! A puzzle is a flat array of cells, all drawing from one small integer
//! range, plus a list of [constraints](constraints). Solving interleaves
//! two moves: constraints narrow each cell's candidate set (and may replace
//! themselves with simpler constraints as they get pinned down), and a
//! backtracking search branches on the most constrained open cell whenever
//! narrowing stalls. Solutions come out of a lazy iterator, so asking for
//! the first one, the first two ("is it unique?"), or all of them costs
//! exactly as much search as it needs to.
//!
//! ## Solving a 4×4 Sudoku
//!
//! Cells are indexed row-major; rows, columns and boxes are just cell
//! lists handed to [`Uniqueness`](constraints::Uniqueness):
//!
//! ```
//! use cellmate::constraints::Uniqueness;
//! use cellmate::Puzzle;
//!
//! let mut puzzle = Puzzle::new(16, 1, 4).unwrap();
//!
//! // Rows and columns.
//! for row in 0..4 {
//!     puzzle.add_constraint(Uniqueness::new(4 * row..4 * row + 4)).unwrap();
//! }
//! for col in 0..4 {
//!     puzzle.add_constraint(Uniqueness::new((0..4).map(|row| 4 * row + col))).unwrap();
//! }
//!
//! // The four 2x2 boxes.
//! for box_y in 0..2 {
//!     for box_x in 0..2 {
//!         let mut cells = Vec::new();
//!         for y in 0..2 {
//!             for x in 0..2 {
//!                 cells.push((2 * box_y + y) * 4 + 2 * box_x + x);
//!             }
//!         }
//!         puzzle.add_constraint(Uniqueness::new(cells)).unwrap();
//!     }
//! }
//!
//! // The clues, row-major, `.` for blanks.
//! puzzle.add_givens("123..41.2..3.32.").unwrap();
//!
//! let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
//! assert_eq!(solutions.len(), 1);
//! assert_eq!(
//!     solutions[0],
//!     vec![1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1],
//! );
//! ```
//!
//! Variant rules are more constraints on the same board: killer cages are
//! [`Sum`](constraints::Sum)s, thermometers are
//! [`LessThan`](constraints::LessThan) chains, clue rows with precomputed
//! candidate tuples are [`Combinations`](constraints::Combinations), and
//! one-off rules fit a [`CellPred`](constraints::CellPred). Constraints
//! never carry search state, so writing a new one is a single `process`
//! method; see the [`constraints`] module docs for the contract.

pub mod constraints;
mod domain;
mod error;
pub mod parse;
mod solver;
mod state;

pub use domain::{ValueSet, MAX_WIDTH};
pub use error::{Error, Result};
pub use solver::{SolverInstructions, Solutions};
pub use state::PuzzleState;

use constraints::{Constraint, ConstraintRef, Given};
use std::collections::HashMap;
use std::sync::Arc;

/// A puzzle description: how many cells, what range they draw from, and the
/// rules. Build it once, then [`solve`](Puzzle::solve) as often as you
/// like; solving never mutates the puzzle.
#[derive(Debug, Clone)]
pub struct Puzzle {
    num_cells: usize,
    min_value: i32,
    max_value: i32,
    constraints: Vec<ConstraintRef>,
    colors: HashMap<usize, u8>,
}

impl Puzzle {
    /// A puzzle of `num_cells` cells, each holding a value in
    /// `min_value..=max_value`.
    pub fn new(num_cells: usize, min_value: i32, max_value: i32) -> Result<Puzzle> {
        if min_value > max_value {
            return Err(Error::InvalidRange);
        }
        if (max_value - min_value) as usize >= MAX_WIDTH {
            return Err(Error::RangeTooWide);
        }
        Ok(Puzzle {
            num_cells,
            min_value,
            max_value,
            constraints: Vec::new(),
            colors: HashMap::new(),
        })
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn min_value(&self) -> i32 {
        self.min_value
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    /// Adds one rule. Errors if the constraint watches a cell the puzzle
    /// does not have.
    pub fn add_constraint(&mut self, constraint: impl Constraint) -> Result<()> {
        self.add_constraint_ref(Arc::new(constraint))
    }

    /// Adds an already-shared rule.
    pub fn add_constraint_ref(&mut self, constraint: ConstraintRef) -> Result<()> {
        if let Some(cells) = constraint.cells() {
            for &cell in cells {
                if cell >= self.num_cells {
                    return Err(Error::CellOutOfBounds(cell));
                }
            }
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// Adds a batch of rules of one kind.
    pub fn add_constraints<C: Constraint>(
        &mut self,
        constraints: impl IntoIterator<Item = C>,
    ) -> Result<()> {
        for constraint in constraints {
            self.add_constraint(constraint)?;
        }
        Ok(())
    }

    /// Applies a givens string (see [`parse::givens`]): one character per
    /// cell, `1`-`9` for a clue, `.` or `0` for a blank.
    pub fn add_givens(&mut self, givens: &str) -> Result<()> {
        let values = parse::givens(givens)?;
        if values.len() != self.num_cells {
            return Err(Error::WrongLength {
                expected: self.num_cells,
                actual: values.len(),
            });
        }
        for (cell, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                self.add_constraint(Given::new(cell, value))?;
            }
        }
        Ok(())
    }

    /// Tags a cell with a colour for display helpers. The solver ignores
    /// it.
    pub fn set_color(&mut self, cell: usize, color: u8) -> Result<()> {
        if cell >= self.num_cells {
            return Err(Error::CellOutOfBounds(cell));
        }
        let _ = self.colors.insert(cell, color);
        Ok(())
    }

    pub fn color(&self, cell: usize) -> Option<u8> {
        self.colors.get(&cell).copied()
    }

    pub(crate) fn constraint_refs(&self) -> &[ConstraintRef] {
        &self.constraints
    }

    /// All solutions, lazily, in the canonical deterministic order.
    pub fn solve(&self) -> Solutions {
        self.solve_with(SolverInstructions::default())
    }

    /// All solutions, lazily, honouring `instructions`.
    pub fn solve_with(&self, instructions: SolverInstructions) -> Solutions {
        Solutions::new(self, instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints::Uniqueness;

    #[test]
    fn test_construction_errors() {
        assert_eq!(Puzzle::new(4, 5, 3).unwrap_err(), Error::InvalidRange);
        assert_eq!(Puzzle::new(4, 0, 40).unwrap_err(), Error::RangeTooWide);

        let mut puzzle = Puzzle::new(4, 1, 4).unwrap();
        assert_eq!(
            puzzle.add_constraint(Uniqueness::new([0, 4])).unwrap_err(),
            Error::CellOutOfBounds(4)
        );
        assert_eq!(
            puzzle.add_givens("123").unwrap_err(),
            Error::WrongLength {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            puzzle.set_color(9, 1).unwrap_err(),
            Error::CellOutOfBounds(9)
        );
    }

    #[test]
    fn test_colors_are_inert_metadata() {
        let mut puzzle = Puzzle::new(2, 1, 1).unwrap();
        puzzle.set_color(0, 3).unwrap();
        assert_eq!(puzzle.color(0), Some(3));
        assert_eq!(puzzle.color(1), None);
        assert_eq!(puzzle.solve().count(), 1);
    }
}
