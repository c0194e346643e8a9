//! The constraint protocol and the library of reusable constraints.
//!
//! A constraint watches some cells (or the whole board) and, each time the
//! engine asks, narrows the remaining candidates, swaps itself for simpler
//! constraints, or declares the current branch dead. Most puzzle rules are
//! assembled from the types in this module rather than written from scratch.

mod combinations;
mod count;
mod grid;
mod order;
mod parity;
mod path;
mod pred;
mod region;
mod sum;
mod uniqueness;

pub use combinations::Combinations;
pub use count::MaximumCount;
pub use grid::{AntiKing, AntiKnight, No2x2s, NoAdjacent, NoTouch};
pub use order::LessThan;
pub use parity::{ParityEvenness, ParityNoTriplets, ParityUniqueRowsColumns};
pub use path::{segment_edges, Dir, Path, SingleLoop};
pub use pred::{CellPred, LineRule};
pub use region::ContiguousArea;
pub use sum::{EqualSums, MaxSum, MinSum, Sum, SumAlternative};
pub use uniqueness::Uniqueness;

use crate::state::PuzzleState;
use std::fmt;
use std::sync::Arc;

/// Constraints are shared between search frames; the active list clones the
/// `Arc`s, never the constraints.
pub type ConstraintRef = Arc<dyn Constraint>;

/// What one call to [`Constraint::process`] concluded.
#[derive(Debug)]
pub enum ConstraintResult {
    /// The constraint stays in force. It may still have narrowed domains.
    Stands,
    /// The constraint is spent: remove it and enforce these instead. An
    /// empty list means it is fully satisfied.
    Replace(Vec<ConstraintRef>),
    /// The current partial assignment cannot be completed.
    Violation,
}

impl ConstraintResult {
    /// Shorthand for "satisfied, nothing left to enforce".
    pub fn satisfied() -> ConstraintResult {
        ConstraintResult::Replace(Vec::new())
    }

    /// Shorthand for dissolving into a single simpler constraint.
    pub fn replace_with(constraint: impl Constraint) -> ConstraintResult {
        ConstraintResult::Replace(vec![Arc::new(constraint)])
    }
}

/// One rule of a puzzle.
///
/// `process` must be a pure function of the state plus fields fixed at
/// construction; per-search scratch state is not allowed, because the same
/// constraint object is shared by every branch of the search. All narrowing
/// goes through the `&mut PuzzleState`.
///
/// The engine calls `process` with no last-placed cell on the opening round
/// ("propagate from scratch") and with a specific cell after each placement.
/// A constraint may be called any number of times per placement as other
/// constraints cascade, so everything it does must be idempotent.
pub trait Constraint: fmt::Debug + Send + Sync + 'static {
    /// Short name used by logs and debug reports.
    fn name(&self) -> &'static str;

    /// The cells whose values this constraint reads, in a stable order.
    /// `None` means "any cell": the engine re-runs the constraint on every
    /// placement. The default is `None`; grid-wide rules keep it.
    fn cells(&self) -> Option<&[usize]> {
        None
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult;
}

/// A value the puzzle author supplies up front. Forces the cell and
/// dissolves.
#[derive(Debug, Clone)]
pub struct Given {
    cell: [usize; 1],
    value: i32,
}

impl Given {
    pub fn new(cell: usize, value: i32) -> Given {
        Given {
            cell: [cell],
            value,
        }
    }
}

impl Constraint for Given {
    fn name(&self) -> &'static str {
        "Given"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cell)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        if !state.is_possible(self.cell[0], self.value) {
            return ConstraintResult::Violation;
        }
        state.must_be(self.cell[0], self.value);
        ConstraintResult::satisfied()
    }
}

/// Constrains nothing. Useful as an anchor for display metadata on cells
/// that no real constraint touches.
#[derive(Debug, Clone, Default)]
pub struct AlwaysTrue;

impl Constraint for AlwaysTrue {
    fn name(&self) -> &'static str {
        "AlwaysTrue"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&[])
    }

    fn process(&self, _state: &mut PuzzleState) -> ConstraintResult {
        ConstraintResult::Stands
    }
}
