use super::{Constraint, ConstraintRef, ConstraintResult, Given};
use crate::domain::ValueSet;
use crate::error::{Error, Result};
use crate::state::PuzzleState;
use bitvec::bitvec;
use bitvec::vec::BitVec;
use std::sync::Arc;

/// The watched cells spell out one of an explicit list of tuples.
///
/// Each tuple slot is either a concrete value or a wildcard (`None`). This
/// is the workhorse behind clue-style rules — sandwich, frame-sum,
/// skyscraper, nonogram rows — which all precompute their tuple set and hand
/// it here.
///
/// Every call filters the tuple list against the current domains and narrows
/// each cell to the values surviving tuples still use in that slot. The
/// constraint then shrinks itself through replacement: fewer tuples, or
/// per-cell [`Given`]s once a single tuple remains. Large tuple sets pay for
/// themselves by dissolving early.
#[derive(Debug, Clone)]
pub struct Combinations {
    cells: Vec<usize>,
    tuples: Vec<Box<[Option<i32>]>>,
}

impl Combinations {
    /// Tuples with optional wildcard slots. Errors if a tuple's length does
    /// not match the cell list, or if there are no tuples at all.
    pub fn new(
        cells: impl IntoIterator<Item = usize>,
        tuples: impl IntoIterator<Item = Vec<Option<i32>>>,
    ) -> Result<Combinations> {
        let cells: Vec<usize> = cells.into_iter().collect();
        let mut packed = Vec::new();
        for tuple in tuples {
            if tuple.len() != cells.len() {
                return Err(Error::WrongLength {
                    expected: cells.len(),
                    actual: tuple.len(),
                });
            }
            packed.push(tuple.into_boxed_slice());
        }
        if packed.is_empty() {
            return Err(Error::EmptyConstraint);
        }
        Ok(Combinations {
            cells,
            tuples: packed,
        })
    }

    /// Fully concrete tuples.
    pub fn exact(
        cells: impl IntoIterator<Item = usize>,
        tuples: impl IntoIterator<Item = Vec<i32>>,
    ) -> Result<Combinations> {
        Combinations::new(
            cells,
            tuples
                .into_iter()
                .map(|t| t.into_iter().map(Some).collect::<Vec<_>>()),
        )
    }

    /// All distinct orderings of `values` across the cells. The tuple set
    /// for "these cells are exactly this multiset in some order".
    pub fn permutations(
        cells: impl IntoIterator<Item = usize>,
        mut values: Vec<i32>,
    ) -> Result<Combinations> {
        values.sort_unstable();
        let mut tuples = Vec::new();
        let mut current = Vec::with_capacity(values.len());
        distinct_permutations(&mut values, &mut current, &mut tuples);
        Combinations::exact(cells, tuples)
    }

    fn survivors(&self, state: &PuzzleState) -> BitVec {
        let mut alive = bitvec![0; self.tuples.len()];
        for (i, tuple) in self.tuples.iter().enumerate() {
            let fits = tuple
                .iter()
                .zip(&self.cells)
                .all(|(slot, &cell)| slot.map_or(true, |v| state.is_possible(cell, v)));
            if fits {
                alive.set(i, true);
            }
        }
        alive
    }
}

fn distinct_permutations(pool: &mut Vec<i32>, current: &mut Vec<i32>, out: &mut Vec<Vec<i32>>) {
    if pool.is_empty() {
        out.push(current.clone());
        return;
    }
    let mut last = None;
    for i in 0..pool.len() {
        // The pool stays sorted, so equal values are adjacent; skip repeats.
        if last == Some(pool[i]) {
            continue;
        }
        last = Some(pool[i]);
        let value = pool.remove(i);
        current.push(value);
        distinct_permutations(pool, current, out);
        current.pop();
        pool.insert(i, value);
    }
}

impl Constraint for Combinations {
    fn name(&self) -> &'static str {
        "Combinations"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let alive = self.survivors(state);
        let alive_count = alive.count_ones();
        if alive_count == 0 {
            return ConstraintResult::Violation;
        }
        if alive_count == 1 {
            let tuple = &self.tuples[alive.first_one().unwrap_or(0)];
            let givens: Vec<ConstraintRef> = tuple
                .iter()
                .zip(&self.cells)
                .filter_map(|(slot, &cell)| {
                    slot.map(|v| Arc::new(Given::new(cell, v)) as ConstraintRef)
                })
                .collect();
            return ConstraintResult::Replace(givens);
        }

        // Narrow each slot to the union of what surviving tuples put there.
        // A wildcard in any survivor leaves that slot unrestricted.
        for (k, &cell) in self.cells.iter().enumerate() {
            let mut union = ValueSet::empty(state.min_value());
            let mut restricted = true;
            for i in alive.iter_ones() {
                match self.tuples[i][k] {
                    Some(v) => union.insert(v),
                    None => {
                        restricted = false;
                        break;
                    }
                }
            }
            if restricted {
                state.mark_impossible_where(cell, |v| !union.contains(v));
            }
        }

        if alive_count < self.tuples.len() {
            let remaining = Combinations {
                cells: self.cells.clone(),
                tuples: alive.iter_ones().map(|i| self.tuples[i].clone()).collect(),
            };
            return ConstraintResult::replace_with(remaining);
        }
        ConstraintResult::Stands
    }
}
