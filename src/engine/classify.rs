use super::enumerate::ComponentSolution;
use crate::Position;
use itertools::Itertools;

/// A genuine 50/50: two cells holding exactly one mine between them in every
/// valid assignment of their component. Ordered so `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DualOutcomeGroup {
    pub first: Position,
    pub second: Position,
}

impl DualOutcomeGroup {
    pub fn new(a: Position, b: Position) -> Self {
        if a < b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }
}

/// Finds the dual-outcome pairs of one solved component.
///
/// Candidate cells must carry marginal probability exactly 1/2, and the pair
/// qualifies only when its exactly-one joint count equals the component's
/// total assignment count: every valid world disagrees between the two. Two
/// cells that each read 0.5 but admit a both-mine or both-safe world are not
/// a pair, no matter how alike their marginals look.
pub fn find_dual_outcomes(solution: &ComponentSolution) -> Vec<DualOutcomeGroup> {
    let halves: Vec<usize> = (0..solution.cells().len())
        .filter(|&var| solution.marginal(var).is_half())
        .collect();

    halves
        .into_iter()
        .tuple_combinations()
        .filter(|&(a, b)| solution.pair(a, b).exactly_one == solution.total())
        .map(|(a, b)| DualOutcomeGroup::new(solution.cells()[a], solution.cells()[b]))
        .sorted()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::constraints::Constraint;
    use crate::engine::enumerate::{solve_component, SearchBudget};
    use crate::engine::partition::partition;
    use std::time::Duration;

    fn solve(specs: &[(&[(i32, i32)], u8)]) -> ComponentSolution {
        let constraints: Vec<Constraint> = specs
            .iter()
            .map(|(cells, mines)| {
                Constraint::new(cells.iter().map(|&(r, c)| Position::new(r, c)), *mines)
            })
            .collect();
        let mut components = partition(&constraints);
        assert_eq!(components.len(), 1);
        let mut budget = SearchBudget::new(1_000_000, Duration::from_secs(5));
        solve_component(&components.remove(0), 24, &mut budget).unwrap()
    }

    #[test]
    fn test_forced_pair_is_reported() {
        let solution = solve(&[(&[(0, 0), (0, 2)], 1)]);
        let groups = find_dual_outcomes(&solution);

        assert_eq!(
            groups,
            vec![DualOutcomeGroup::new(
                Position::new(0, 0),
                Position::new(0, 2)
            )]
        );
    }

    #[test]
    fn test_correlated_chain_pairs() {
        // a+b = 1, b+c = 1: a/b and b/c are forced pairs, a/c always agree
        let solution = solve(&[(&[(0, 0), (0, 1)], 1), (&[(0, 1), (0, 2)], 1)]);
        let groups = find_dual_outcomes(&solution);

        assert_eq!(groups.len(), 2);
        assert!(groups.contains(&DualOutcomeGroup::new(
            Position::new(0, 0),
            Position::new(0, 1)
        )));
        assert!(groups.contains(&DualOutcomeGroup::new(
            Position::new(0, 1),
            Position::new(0, 2)
        )));
        // The positively correlated pair must not appear
        assert!(!groups.contains(&DualOutcomeGroup::new(
            Position::new(0, 0),
            Position::new(0, 2)
        )));
    }

    #[test]
    fn test_half_marginals_without_anticorrelation_rejected() {
        // 2 of 4: every cell reads 2/4 = 1/2 but any two admit both-mine
        // and both-safe worlds, so nothing qualifies
        let solution = solve(&[(&[(0, 0), (0, 1), (0, 2), (0, 3)], 2)]);
        assert!(solution.marginal(0).is_half());
        assert!(find_dual_outcomes(&solution).is_empty());
    }

    #[test]
    fn test_non_half_cells_never_candidates() {
        // 1 of 3: marginals are 1/3, exactly-one counts are irrelevant
        let solution = solve(&[(&[(0, 0), (0, 1), (0, 2)], 1)]);
        assert!(find_dual_outcomes(&solution).is_empty());
    }

    #[test]
    fn test_group_ordering() {
        let group = DualOutcomeGroup::new(Position::new(3, 1), Position::new(0, 9));
        assert_eq!(group.first, Position::new(0, 9));
        assert_eq!(group.second, Position::new(3, 1));
    }
}
