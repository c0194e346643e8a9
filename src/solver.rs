use crate::constraints::{Constraint, ConstraintRef, ConstraintResult};
use crate::state::PuzzleState;
use crate::Puzzle;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Knobs for one `solve` call. All optional; the default is the canonical
/// deterministic search.
#[derive(Default)]
pub struct SolverInstructions {
    /// Randomise cell and value order, deterministically from this seed.
    pub randomizer: Option<u64>,
    /// Cells to prefer when the branching heuristic has a tie. Soft: it
    /// never overrides the smallest-domain rule.
    pub cell_priority: Vec<usize>,
    /// A value to try first in every cell. Ignored under a randomizer.
    pub value_priority: Option<i32>,
    /// Debug: print the partial board after each branch, up to this many
    /// levels deep.
    pub show_continuous_progress: Option<usize>,
    /// Debug: a solution believed correct. Any constraint that rules out
    /// one of its values is reported on stderr.
    pub intended_solution: Option<Vec<i32>>,
    /// Debug: restricts the `intended_solution` audit to constraints whose
    /// name passes this filter.
    pub examine_constraint: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
    /// Debug: append one line per constraint invocation to this file.
    pub bulk_logging_file: Option<PathBuf>,
}

impl fmt::Debug for SolverInstructions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SolverInstructions")
            .field("randomizer", &self.randomizer)
            .field("cell_priority", &self.cell_priority)
            .field("value_priority", &self.value_priority)
            .field("show_continuous_progress", &self.show_continuous_progress)
            .field("intended_solution", &self.intended_solution)
            .field("bulk_logging_file", &self.bulk_logging_file)
            .finish_non_exhaustive()
    }
}

/// One suspended branch point: a snapshot of the board plus the values of
/// the chosen cell not yet tried.
struct Frame {
    state: PuzzleState,
    active: Vec<ConstraintRef>,
    cell: usize,
    values: std::vec::IntoIter<i32>,
}

/// The lazy stream of solutions.
///
/// Nothing is searched until the first pull, and the search stops wherever
/// the caller stops pulling; `take(2)` is how you ask "is it unique?".
/// Dropping the iterator abandons the search. With no randomizer the order
/// of solutions is fully deterministic; with one it is deterministic per
/// seed.
pub struct Solutions {
    start: Option<(PuzzleState, Vec<ConstraintRef>)>,
    stack: Vec<Frame>,
    instructions: SolverInstructions,
    rng: Option<ChaCha8Rng>,
    trace: Option<BufWriter<File>>,
}

impl Solutions {
    pub(crate) fn new(puzzle: &Puzzle, instructions: SolverInstructions) -> Solutions {
        let state = PuzzleState::new(puzzle.num_cells(), puzzle.min_value(), puzzle.max_value());
        let active = puzzle.constraint_refs().to_vec();
        let rng = instructions.randomizer.map(ChaCha8Rng::seed_from_u64);
        let trace = instructions.bulk_logging_file.as_ref().and_then(|path| {
            match File::create(path) {
                Ok(file) => Some(BufWriter::new(file)),
                Err(err) => {
                    eprintln!("cannot open bulk logging file {:?}: {}", path, err);
                    None
                }
            }
        });
        Solutions {
            start: Some((state, active)),
            stack: Vec::new(),
            instructions,
            rng,
            trace,
        }
    }

    /// Runs constraints to fixpoint, starting from `placed` (or from
    /// scratch). Singleton domains are committed lowest-index-first, each
    /// commitment feeding the next round. `Err` means this branch is dead.
    fn propagate(
        &mut self,
        state: &mut PuzzleState,
        active: &mut Vec<ConstraintRef>,
        mut placed: Option<(usize, i32)>,
    ) -> Result<(), ()> {
        loop {
            state.set_last_placed(placed);
            let mut replaced = false;
            let current = std::mem::take(active);
            let mut kept: Vec<ConstraintRef> = Vec::with_capacity(current.len());
            for constraint in current {
                let applies = match (constraint.cells(), placed) {
                    (None, _) => true,
                    (Some(_), None) => true,
                    (Some(cells), Some((cell, _))) => cells.contains(&cell),
                };
                if !applies {
                    kept.push(constraint);
                    continue;
                }
                let audit = self.audit_before(state, constraint.as_ref());
                let result = constraint.process(state);
                self.audit_after(state, audit, constraint.as_ref());
                self.trace_step(constraint.as_ref(), state, &result);
                match result {
                    ConstraintResult::Stands => kept.push(constraint),
                    ConstraintResult::Replace(replacements) => {
                        // Replacements join the active set but are not
                        // visited until the next pass.
                        replaced = true;
                        kept.extend(replacements);
                    }
                    ConstraintResult::Violation => {
                        *active = kept;
                        return Err(());
                    }
                }
                if state.emptied().is_some() {
                    *active = kept;
                    return Err(());
                }
            }
            *active = kept;

            let changed = state.take_changed() || replaced;
            if let Some(promotion) = state.promote_next_singleton() {
                placed = Some(promotion);
                continue;
            }
            if !changed {
                return Ok(());
            }
            // Domains moved but nothing new was committed; give every
            // constraint a fresh look.
            placed = None;
        }
    }

    /// Most-constrained cell first; ties go to the instruction's preferred
    /// cells, then the lowest index, or a seeded pick.
    fn choose_cell(&mut self, state: &PuzzleState) -> usize {
        let mut best_len = usize::MAX;
        let mut candidates: Vec<usize> = Vec::new();
        for cell in state.open_cells() {
            let len = state.possible_set(cell).len();
            if len < best_len {
                best_len = len;
                candidates.clear();
            }
            if len == best_len {
                candidates.push(cell);
            }
        }
        for &preferred in &self.instructions.cell_priority {
            if candidates.contains(&preferred) {
                return preferred;
            }
        }
        if let Some(rng) = &mut self.rng {
            if let Some(&cell) = candidates.choose(rng) {
                return cell;
            }
        }
        candidates.first().copied().unwrap_or(0)
    }

    fn order_values(&mut self, state: &PuzzleState, cell: usize) -> Vec<i32> {
        let mut values: Vec<i32> = state.possible(cell).collect();
        if let Some(rng) = &mut self.rng {
            values.shuffle(rng);
        } else if let Some(first) = self.instructions.value_priority {
            if let Some(position) = values.iter().position(|&v| v == first) {
                values.remove(position);
                values.insert(0, first);
            }
        }
        values
    }

    fn push_branch(&mut self, state: PuzzleState, active: Vec<ConstraintRef>) {
        let cell = self.choose_cell(&state);
        let values = self.order_values(&state, cell);
        self.stack.push(Frame {
            state,
            active,
            cell,
            values: values.into_iter(),
        });
    }

    fn audit_applies(&self, constraint: &dyn Constraint) -> bool {
        self.instructions.intended_solution.is_some()
            && self
                .instructions
                .examine_constraint
                .as_ref()
                .map_or(true, |filter| filter(constraint.name()))
    }

    /// Which cells still admit the intended solution, before a constraint
    /// runs.
    fn audit_before(&self, state: &PuzzleState, constraint: &dyn Constraint) -> Option<Vec<bool>> {
        if !self.audit_applies(constraint) {
            return None;
        }
        let intended = self.instructions.intended_solution.as_ref()?;
        Some(
            (0..state.num_cells())
                .map(|cell| {
                    intended
                        .get(cell)
                        .map_or(false, |&v| state.is_possible(cell, v))
                })
                .collect(),
        )
    }

    fn audit_after(
        &self,
        state: &PuzzleState,
        before: Option<Vec<bool>>,
        constraint: &dyn Constraint,
    ) {
        let Some(before) = before else { return };
        let Some(intended) = self.instructions.intended_solution.as_ref() else {
            return;
        };
        for cell in 0..state.num_cells().min(intended.len()) {
            if before[cell] && !state.is_possible(cell, intended[cell]) {
                eprintln!(
                    "{} ruled out intended value {} for cell {}",
                    constraint.name(),
                    intended[cell],
                    cell
                );
            }
        }
    }

    fn trace_step(
        &mut self,
        constraint: &dyn Constraint,
        state: &PuzzleState,
        result: &ConstraintResult,
    ) {
        let Some(trace) = &mut self.trace else { return };
        let verdict = match result {
            ConstraintResult::Stands => "stands",
            ConstraintResult::Replace(list) if list.is_empty() => "satisfied",
            ConstraintResult::Replace(_) => "replaced",
            ConstraintResult::Violation => "violation",
        };
        let _ = writeln!(
            trace,
            "{} after {:?}: {}",
            constraint.name(),
            state.last_placed(),
            verdict
        );
    }

    fn show_progress(&self, state: &PuzzleState) {
        let Some(depth) = self.instructions.show_continuous_progress else {
            return;
        };
        if self.stack.len() >= depth {
            return;
        }
        let board = (0..state.num_cells())
            .map(|cell| match state.value(cell) {
                Some(v) => v.to_string(),
                None => String::from("."),
            })
            .collect::<Vec<_>>()
            .join(",");
        eprintln!("{:indent$}[{}]", "", board, indent = self.stack.len());
    }
}

impl Iterator for Solutions {
    type Item = Vec<i32>;

    fn next(&mut self) -> Option<Vec<i32>> {
        if let Some((mut state, mut active)) = self.start.take() {
            if self.propagate(&mut state, &mut active, None).is_ok() {
                if state.is_complete() {
                    return Some(state.solution());
                }
                self.push_branch(state, active);
            }
        }

        loop {
            // Pull the next untried value off the top frame, along with a
            // snapshot to try it on.
            let work = match self.stack.last_mut() {
                None => return None,
                Some(frame) => frame
                    .values
                    .next()
                    .map(|value| (frame.cell, value, frame.state.clone(), frame.active.clone())),
            };
            let Some((cell, value, mut state, mut active)) = work else {
                self.stack.pop();
                continue;
            };

            state.must_be(cell, value);
            let _ = state.take_changed();
            if state.emptied().is_some() {
                continue;
            }
            state.place(cell, value);
            self.show_progress(&state);
            if self.propagate(&mut state, &mut active, Some((cell, value))).is_err() {
                continue;
            }
            if state.is_complete() {
                return Some(state.solution());
            }
            self.push_branch(state, active);
        }
    }
}
