mod classify;
mod constraints;
mod enumerate;
mod partition;
#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use classify::{find_dual_outcomes, DualOutcomeGroup};
pub use constraints::{build_constraints, Constraint};
pub use enumerate::{solve_component, ComponentSolution, PairCounts, SearchBudget};
pub use partition::{partition, Component};

use crate::{Board, Cell, EngineError, Position, Probability};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Tunables for one engine invocation. The engine holds no state between
/// calls; everything configurable travels through here.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Components at or below this many cells are enumerated exhaustively;
    /// larger ones go through budgeted backtracking.
    pub exhaustive_limit: usize,
    /// Search nodes allowed per component before it turns Indeterminate.
    pub step_budget: u64,
    /// Wall-clock allowance per component.
    pub time_budget: Duration,
    /// Solve components on a rayon pool instead of in sequence.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exhaustive_limit: 24,
            step_budget: 2_000_000,
            time_budget: Duration::from_millis(200),
            parallel: true,
        }
    }
}

/// Result of one engine query.
///
/// `unresolved` holds hidden cells the engine could not assign a probability
/// to: components whose search budget ran out or whose constraints admit no
/// solution, plus unconstrained cells on boards without a total mine count.
/// An empty `groups` with an empty `unresolved` means "no 50/50 exists";
/// a non-empty `unresolved` means "could not determine". The two are
/// different answers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub probabilities: HashMap<Position, Probability>,
    pub groups: Vec<DualOutcomeGroup>,
    pub unresolved: BTreeSet<Position>,
}

impl Analysis {
    /// Cells that are mines in zero valid assignments.
    pub fn certain_safe(&self) -> Vec<Position> {
        self.sorted_where(Probability::is_zero)
    }

    /// Cells that are mines in every valid assignment.
    pub fn certain_mines(&self) -> Vec<Position> {
        self.sorted_where(Probability::is_one)
    }

    fn sorted_where(&self, pred: impl Fn(&Probability) -> bool) -> Vec<Position> {
        let mut cells: Vec<Position> = self
            .probabilities
            .iter()
            .filter(|(_, p)| pred(p))
            .map(|(&pos, _)| pos)
            .collect();
        cells.sort();
        cells
    }
}

/// Computes the mine probability of every constrained hidden cell and the
/// genuine dual-outcome pairs of the given snapshot.
///
/// Pure and idempotent: the same snapshot always produces the same
/// `Analysis`. Board-level contradictions abort with an error before any
/// solving; component-local failures degrade only that component's cells
/// into `unresolved` while the rest of the board still resolves.
pub fn analyze(board: &Board, config: &EngineConfig) -> Result<Analysis, EngineError> {
    let constraints = build_constraints(board)?;

    let hidden_count = board.hidden_count();
    let remaining_mines = match board.total_mines() {
        Some(total) => {
            let flagged = board.flagged_count();
            if flagged > total || total - flagged > hidden_count {
                return Err(EngineError::MineCountConflict {
                    total,
                    flagged,
                    hidden: hidden_count,
                });
            }
            Some(total - flagged)
        }
        None => None,
    };

    // No constraints and no mine total: a normal empty result, not an
    // error. With a total known, the density pass below still applies to
    // every hidden cell even when flags answered all the numbers.
    if constraints.is_empty() && remaining_mines.is_none() {
        return Ok(Analysis::default());
    }

    let components = partition(&constraints);

    let outcomes: Vec<Result<ComponentSolution, EngineError>> = if config.parallel {
        components
            .par_iter()
            .map(|component| solve_with_fresh_budget(component, config))
            .collect()
    } else {
        components
            .iter()
            .map(|component| solve_with_fresh_budget(component, config))
            .collect()
    };

    let mut analysis = Analysis::default();
    for (component, outcome) in components.iter().zip(outcomes) {
        match outcome {
            Ok(solution) => {
                for (var, &pos) in solution.cells().iter().enumerate() {
                    analysis.probabilities.insert(pos, solution.marginal(var));
                }
                analysis.groups.extend(find_dual_outcomes(&solution));
            }
            Err(EngineError::UnsatisfiableConstraints)
            | Err(EngineError::SearchBudgetExceeded) => {
                analysis.unresolved.extend(component.cells.iter().copied());
            }
            Err(other) => return Err(other),
        }
    }
    analysis.groups.sort();

    // Hidden cells no constraint touches: global density when the mine
    // total is known, otherwise undetermined
    let constrained: BTreeSet<Position> = components
        .iter()
        .flat_map(|component| component.cells.iter().copied())
        .collect();
    for pos in board.iter_positions() {
        if board.get(pos) == Some(Cell::Hidden) && !constrained.contains(&pos) {
            match remaining_mines {
                Some(remaining) => {
                    analysis
                        .probabilities
                        .insert(pos, Probability::new(remaining as u64, hidden_count as u64));
                }
                None => {
                    analysis.unresolved.insert(pos);
                }
            }
        }
    }

    Ok(analysis)
}

fn solve_with_fresh_budget(
    component: &Component,
    config: &EngineConfig,
) -> Result<ComponentSolution, EngineError> {
    let mut budget = SearchBudget::new(config.step_budget, config.time_budget);
    solve_component(component, config.exhaustive_limit, &mut budget)
}
