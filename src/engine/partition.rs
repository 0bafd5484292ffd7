use super::constraints::Constraint;
use crate::Position;
use std::collections::{BTreeSet, HashMap};

/// Maximal group of constraints linked by shared hidden cells, together with
/// every cell those constraints reference. Cells in different components are
/// probabilistically independent, so each component can be solved on its own.
#[derive(Debug, Clone)]
pub struct Component {
    /// Sorted, deduplicated. Index into this list is the variable index used
    /// by the enumerator.
    pub cells: Vec<Position>,
    pub constraints: Vec<Constraint>,
}

impl Component {
    pub fn smallest_cell(&self) -> Position {
        // Components are never built empty: every constraint kept by the
        // builder references at least one cell.
        self.cells[0]
    }
}

/// Partitions constraints into connected components via union-find on
/// constraint indices. Output ordering is deterministic: components sorted
/// by their smallest contained position.
pub fn partition(constraints: &[Constraint]) -> Vec<Component> {
    let mut parents: Vec<usize> = (0..constraints.len()).collect();

    fn find(parents: &mut Vec<usize>, i: usize) -> usize {
        if parents[i] != i {
            let root = find(parents, parents[i]);
            parents[i] = root;
        }
        parents[i]
    }

    // Two constraints sharing any cell belong to the same component
    let mut cell_owner: HashMap<Position, usize> = HashMap::new();
    for (idx, constraint) in constraints.iter().enumerate() {
        for &pos in &constraint.cells {
            match cell_owner.get(&pos) {
                Some(&owner) => {
                    let a = find(&mut parents, owner);
                    let b = find(&mut parents, idx);
                    if a != b {
                        parents[b] = a;
                    }
                }
                None => {
                    cell_owner.insert(pos, idx);
                }
            }
        }
    }

    let mut grouped: HashMap<usize, Vec<usize>> = HashMap::new();
    for idx in 0..constraints.len() {
        let root = find(&mut parents, idx);
        grouped.entry(root).or_default().push(idx);
    }

    let mut components: Vec<Component> = grouped
        .into_values()
        .map(|indices| {
            let mut cells = BTreeSet::new();
            let mut members = Vec::with_capacity(indices.len());
            for idx in indices {
                cells.extend(constraints[idx].cells.iter().copied());
                members.push(constraints[idx].clone());
            }
            // Constraints keep builder order (row-major) within a component
            members.sort_by_key(|c| *c.cells.first().expect("constraints are never empty"));
            Component {
                cells: cells.into_iter().collect(),
                constraints: members,
            }
        })
        .collect();

    components.sort_by_key(Component::smallest_cell);
    components
}
