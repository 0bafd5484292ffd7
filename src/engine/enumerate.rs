use super::partition::Component;
use crate::{EngineError, Position, Probability};
use std::time::{Duration, Instant};

/// Joint statistics for one unordered pair of cells, accumulated over every
/// valid assignment of their component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairCounts {
    pub both_mines: u64,
    pub exactly_one: u64,
}

/// Exact counting result for one component: how many valid assignments
/// exist, in how many each cell is a mine, and the per-pair joint counts the
/// classifier needs. All integers; probabilities are derived ratios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSolution {
    cells: Vec<Position>,
    total: u64,
    mine_counts: Vec<u64>,
    pair_counts: Vec<PairCounts>,
}

impl ComponentSolution {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn mine_count(&self, var: usize) -> u64 {
        self.mine_counts[var]
    }

    pub fn marginal(&self, var: usize) -> Probability {
        Probability::new(self.mine_counts[var], self.total)
    }

    /// Joint counts for an unordered pair of variable indices.
    pub fn pair(&self, a: usize, b: usize) -> PairCounts {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        self.pair_counts[self.pair_index(i, j)]
    }

    pub fn both_safe(&self, a: usize, b: usize) -> u64 {
        let counts = self.pair(a, b);
        self.total - counts.both_mines - counts.exactly_one
    }

    fn pair_index(&self, i: usize, j: usize) -> usize {
        let n = self.cells.len();
        i * n - i * (i + 1) / 2 + (j - i - 1)
    }
}

/// Step and wall-clock limits for one component's search. Exhausting either
/// turns the component's result into `SearchBudgetExceeded`, which the
/// orchestrator reports as unresolved cells; siblings are unaffected.
#[derive(Debug)]
pub struct SearchBudget {
    steps_left: u64,
    deadline: Instant,
    steps_since_clock: u32,
}

impl SearchBudget {
    const CLOCK_CHECK_INTERVAL: u32 = 4096;

    pub fn new(steps: u64, duration: Duration) -> Self {
        Self {
            steps_left: steps,
            deadline: Instant::now() + duration,
            steps_since_clock: 0,
        }
    }

    fn spend(&mut self) -> Result<(), EngineError> {
        if self.steps_left == 0 {
            return Err(EngineError::SearchBudgetExceeded);
        }
        self.steps_left -= 1;

        self.steps_since_clock += 1;
        if self.steps_since_clock >= Self::CLOCK_CHECK_INTERVAL {
            self.steps_since_clock = 0;
            if Instant::now() >= self.deadline {
                return Err(EngineError::SearchBudgetExceeded);
            }
        }
        Ok(())
    }
}

/// Counts every mine assignment of the component that satisfies all of its
/// constraints exactly. Small components go through full bitmask
/// enumeration; larger ones through pruned backtracking under `budget`.
pub fn solve_component(
    component: &Component,
    exhaustive_limit: usize,
    budget: &mut SearchBudget,
) -> Result<ComponentSolution, EngineError> {
    let n = component.cells.len();

    // Constraint membership translated to variable indices once up front
    let var_sets: Vec<Vec<usize>> = component
        .constraints
        .iter()
        .map(|constraint| {
            constraint
                .cells
                .iter()
                .map(|pos| {
                    component
                        .cells
                        .binary_search(pos)
                        .expect("constraint cell missing from component")
                })
                .collect()
        })
        .collect();
    let targets: Vec<u8> = component.constraints.iter().map(|c| c.mines).collect();

    let mut solution = ComponentSolution {
        cells: component.cells.clone(),
        total: 0,
        mine_counts: vec![0; n],
        pair_counts: vec![PairCounts::default(); n * n.saturating_sub(1) / 2],
    };

    // Bitmask enumeration is only addressable up to the mask width
    if n <= exhaustive_limit.min(62) {
        enumerate_exhaustive(n, &var_sets, &targets, &mut solution);
    } else {
        backtrack(n, &var_sets, &targets, budget, &mut solution)?;
    }

    if solution.total == 0 {
        return Err(EngineError::UnsatisfiableConstraints);
    }
    Ok(solution)
}

fn enumerate_exhaustive(
    n: usize,
    var_sets: &[Vec<usize>],
    targets: &[u8],
    solution: &mut ComponentSolution,
) {
    let masks: Vec<u64> = var_sets
        .iter()
        .map(|vars| vars.iter().fold(0u64, |mask, &v| mask | (1 << v)))
        .collect();

    for assignment in 0u64..(1u64 << n) {
        let valid = masks
            .iter()
            .zip(targets)
            .all(|(&mask, &target)| (assignment & mask).count_ones() == target as u32);
        if valid {
            record_assignment_mask(assignment, n, solution);
        }
    }
}

fn record_assignment_mask(assignment: u64, n: usize, solution: &mut ComponentSolution) {
    solution.total += 1;
    let mut pair_idx = 0;
    for i in 0..n {
        let i_mine = assignment & (1 << i) != 0;
        if i_mine {
            solution.mine_counts[i] += 1;
        }
        for j in (i + 1)..n {
            let j_mine = assignment & (1 << j) != 0;
            if i_mine && j_mine {
                solution.pair_counts[pair_idx].both_mines += 1;
            } else if i_mine != j_mine {
                solution.pair_counts[pair_idx].exactly_one += 1;
            }
            pair_idx += 1;
        }
    }
}

/// Bookkeeping for one constraint during backtracking.
#[derive(Debug, Clone, Copy)]
struct ConstraintState {
    mines: u8,
    unassigned: u8,
    target: u8,
}

impl ConstraintState {
    /// A branch dies as soon as a constraint is overfull, or cannot reach
    /// its target even if every remaining free cell were a mine.
    fn feasible(&self) -> bool {
        self.mines <= self.target && self.mines + self.unassigned >= self.target
    }
}

fn backtrack(
    n: usize,
    var_sets: &[Vec<usize>],
    targets: &[u8],
    budget: &mut SearchBudget,
    solution: &mut ComponentSolution,
) -> Result<(), EngineError> {
    // Per-variable list of the constraints it participates in
    let mut memberships: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (cidx, vars) in var_sets.iter().enumerate() {
        for &v in vars {
            memberships[v].push(cidx);
        }
    }

    // Assign the most constrained variables first so pruning bites early;
    // ties break on variable index, which keeps the search deterministic.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&v| (std::cmp::Reverse(memberships[v].len()), v));

    let mut states: Vec<ConstraintState> = var_sets
        .iter()
        .zip(targets)
        .map(|(vars, &target)| ConstraintState {
            mines: 0,
            unassigned: vars.len() as u8,
            target,
        })
        .collect();

    let mut assignment = vec![false; n];

    fn descend(
        depth: usize,
        order: &[usize],
        memberships: &[Vec<usize>],
        states: &mut [ConstraintState],
        assignment: &mut [bool],
        budget: &mut SearchBudget,
        solution: &mut ComponentSolution,
    ) -> Result<(), EngineError> {
        budget.spend()?;

        if depth == order.len() {
            record_assignment_slice(assignment, solution);
            return Ok(());
        }

        let var = order[depth];
        for &is_mine in &[false, true] {
            assignment[var] = is_mine;
            let mut feasible = true;
            for &cidx in &memberships[var] {
                let state = &mut states[cidx];
                state.unassigned -= 1;
                if is_mine {
                    state.mines += 1;
                }
                if !state.feasible() {
                    feasible = false;
                }
            }

            // A single infeasible constraint kills the whole branch, but
            // every touched state still needs unwinding below
            let result = if feasible {
                descend(
                    depth + 1,
                    order,
                    memberships,
                    states,
                    assignment,
                    budget,
                    solution,
                )
            } else {
                Ok(())
            };

            for &cidx in &memberships[var] {
                let state = &mut states[cidx];
                state.unassigned += 1;
                if is_mine {
                    state.mines -= 1;
                }
            }
            result?;
        }
        Ok(())
    }

    descend(
        0,
        &order,
        &memberships,
        &mut states,
        &mut assignment,
        budget,
        solution,
    )
}

fn record_assignment_slice(assignment: &[bool], solution: &mut ComponentSolution) {
    solution.total += 1;
    let n = assignment.len();
    let mut pair_idx = 0;
    for i in 0..n {
        if assignment[i] {
            solution.mine_counts[i] += 1;
        }
        for j in (i + 1)..n {
            if assignment[i] && assignment[j] {
                solution.pair_counts[pair_idx].both_mines += 1;
            } else if assignment[i] != assignment[j] {
                solution.pair_counts[pair_idx].exactly_one += 1;
            }
            pair_idx += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::constraints::Constraint;
    use crate::engine::partition::partition;

    fn budget() -> SearchBudget {
        SearchBudget::new(1_000_000, Duration::from_secs(5))
    }

    fn component(specs: &[(&[(i32, i32)], u8)]) -> Component {
        let constraints: Vec<Constraint> = specs
            .iter()
            .map(|(cells, mines)| {
                Constraint::new(cells.iter().map(|&(r, c)| Position::new(r, c)), *mines)
            })
            .collect();
        let mut components = partition(&constraints);
        assert_eq!(components.len(), 1, "test fixture must be one component");
        components.remove(0)
    }

    #[test]
    fn test_one_of_two() {
        let component = component(&[(&[(0, 0), (0, 1)], 1)]);
        let solution = solve_component(&component, 24, &mut budget()).unwrap();

        assert_eq!(solution.total(), 2);
        assert!(solution.marginal(0).is_half());
        assert!(solution.marginal(1).is_half());
        assert_eq!(
            solution.pair(0, 1),
            PairCounts {
                both_mines: 0,
                exactly_one: 2
            }
        );
    }

    #[test]
    fn test_symmetric_k_of_n() {
        // 2 of 4 with no other constraints: every marginal is exactly 2/4
        let component = component(&[(&[(0, 0), (0, 1), (0, 2), (0, 3)], 2)]);
        let solution = solve_component(&component, 24, &mut budget()).unwrap();

        assert_eq!(solution.total(), 6);
        for var in 0..4 {
            assert_eq!(solution.marginal(var), Probability::new(2, 4));
        }
    }

    #[test]
    fn test_overlapping_constraints_narrow_the_count() {
        // a+b = 1, b+c = 1 over cells a,b,c: valid worlds are {a,c} and {b}
        let component = component(&[(&[(0, 0), (0, 1)], 1), (&[(0, 1), (0, 2)], 1)]);
        let solution = solve_component(&component, 24, &mut budget()).unwrap();

        assert_eq!(solution.total(), 2);
        assert!(solution.marginal(0).is_half());
        assert!(solution.marginal(1).is_half());
        assert!(solution.marginal(2).is_half());
        // a and c always agree, so their exactly-one count is zero
        assert_eq!(
            solution.pair(0, 2),
            PairCounts {
                both_mines: 1,
                exactly_one: 0
            }
        );
        // a and b always disagree
        assert_eq!(solution.pair(0, 1).exactly_one, 2);
    }

    #[test]
    fn test_forced_cells() {
        // a+b = 2 forces both mines; c stays free through its own 0-of-1
        let component = component(&[(&[(0, 0), (0, 1)], 2), (&[(0, 1), (0, 2)], 1)]);
        let solution = solve_component(&component, 24, &mut budget()).unwrap();

        assert_eq!(solution.total(), 1);
        assert!(solution.marginal(0).is_one());
        assert!(solution.marginal(1).is_one());
        assert!(solution.marginal(2).is_zero());
    }

    #[test]
    fn test_unsatisfiable_component() {
        // a+b = 0 but a+b = 1 elsewhere: zero valid worlds
        let component = component(&[(&[(0, 0), (0, 1)], 0), (&[(0, 0), (0, 1)], 1)]);
        assert_eq!(
            solve_component(&component, 24, &mut budget()),
            Err(EngineError::UnsatisfiableConstraints)
        );
    }

    #[test]
    fn test_backtracking_matches_exhaustive() {
        // Same component solved both ways must produce identical counts
        let component = component(&[
            (&[(0, 0), (0, 1), (0, 2)], 1),
            (&[(0, 2), (0, 3), (0, 4)], 2),
            (&[(0, 4), (0, 5)], 1),
        ]);

        let exhaustive = solve_component(&component, 24, &mut budget()).unwrap();
        // Forcing the limit below the component size exercises the search path
        let searched = solve_component(&component, 0, &mut budget()).unwrap();

        assert_eq!(exhaustive.total(), searched.total());
        for var in 0..component.cells.len() {
            assert_eq!(exhaustive.mine_count(var), searched.mine_count(var));
        }
        for i in 0..component.cells.len() {
            for j in (i + 1)..component.cells.len() {
                assert_eq!(exhaustive.pair(i, j), searched.pair(i, j));
            }
        }
    }

    #[test]
    fn test_step_budget_exhaustion() {
        let component = component(&[
            (&[(0, 0), (0, 1), (0, 2)], 1),
            (&[(0, 2), (0, 3), (0, 4)], 2),
        ]);
        let mut tiny = SearchBudget::new(3, Duration::from_secs(5));
        assert_eq!(
            solve_component(&component, 0, &mut tiny),
            Err(EngineError::SearchBudgetExceeded)
        );
    }

    #[test]
    fn test_both_safe_derivation() {
        let component = component(&[(&[(0, 0), (0, 1), (0, 2)], 1)]);
        let solution = solve_component(&component, 24, &mut budget()).unwrap();

        assert_eq!(solution.total(), 3);
        // In 1 of the 3 worlds neither of the first two cells is a mine
        assert_eq!(solution.both_safe(0, 1), 1);
        assert_eq!(solution.pair(0, 1).exactly_one, 2);
        assert_eq!(solution.pair(0, 1).both_mines, 0);
    }
}
