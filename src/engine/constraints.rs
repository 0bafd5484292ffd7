use crate::{Board, Cell, EngineError, Position};
use std::collections::BTreeSet;

/// "Exactly `mines` of `cells` are mines", derived from one revealed
/// numbered cell. Flagged neighbors are already subtracted from the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub cells: BTreeSet<Position>,
    pub mines: u8,
}

impl Constraint {
    pub fn new(cells: impl IntoIterator<Item = Position>, mines: u8) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            mines,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Derives one constraint per revealed numbered cell that still has hidden
/// neighbors. A revealed 0 yields a trivial K=0 constraint, which pins all
/// its hidden neighbors safe.
///
/// Fails with `InconsistentBoard` when a cell's adjusted requirement cannot
/// be met: more adjacent flags than its count allows, or a requirement
/// larger than its hidden neighborhood.
pub fn build_constraints(board: &Board) -> Result<Vec<Constraint>, EngineError> {
    let mut constraints = Vec::new();

    for pos in board.iter_positions() {
        let count = match board.get(pos) {
            Some(Cell::Revealed(count)) => count,
            _ => continue,
        };

        let mut hidden = BTreeSet::new();
        let mut flagged = 0u8;

        for npos in board.neighbors(pos) {
            match board.get(npos) {
                Some(Cell::Hidden) => {
                    hidden.insert(npos);
                }
                Some(Cell::Flagged) => flagged += 1,
                _ => {}
            }
        }

        let required = count as i32 - flagged as i32;
        if required < 0 || required as usize > hidden.len() {
            return Err(EngineError::InconsistentBoard {
                pos,
                required,
                available: hidden.len(),
            });
        }

        if !hidden.is_empty() {
            constraints.push(Constraint {
                cells: hidden,
                mines: required as u8,
            });
        }
    }

    Ok(constraints)
}
