use crate::{Analysis, Board, Position};
use rand::prelude::*;
use std::collections::HashSet;

/// Configuration for random snapshot generation
#[derive(Debug, Clone)]
pub struct TestBoardConfig {
    pub width: u32,
    pub height: u32,
    pub mine_density: f64,
    pub revealed_percentage: f64,
    /// Chance that any given mine is already flagged in the snapshot
    pub flag_density: f64,
}

impl Default for TestBoardConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            mine_density: 0.15,
            revealed_percentage: 0.3,
            flag_density: 0.2,
        }
    }
}

/// Generates board snapshots with a known mine layout. The layout itself is
/// the oracle: it is one valid assignment of every constraint the snapshot
/// produces, so engine claims can be checked against it directly.
pub struct TestBoardGenerator {
    config: TestBoardConfig,
    rng: StdRng,
}

impl TestBoardGenerator {
    pub fn new(config: TestBoardConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(config: TestBoardConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produces a snapshot and the mine layout it was revealed from.
    pub fn generate(&mut self) -> (Board, HashSet<Position>) {
        let width = self.config.width;
        let height = self.config.height;
        let mine_target = (width as f64 * height as f64 * self.config.mine_density) as usize;

        let mut mines = HashSet::new();
        while mines.len() < mine_target {
            let pos = Position::new(
                self.rng.gen_range(0..height) as i32,
                self.rng.gen_range(0..width) as i32,
            );
            mines.insert(pos);
        }

        let mut board = Board::new(width, height).unwrap();

        for &pos in &mines {
            if self.rng.gen_bool(self.config.flag_density) {
                board.flag(pos).unwrap();
            }
        }

        let reveal_target =
            (width as f64 * height as f64 * self.config.revealed_percentage) as usize;
        let mut revealed = HashSet::new();
        let mut attempts = 0;
        while revealed.len() < reveal_target && attempts < reveal_target * 20 {
            attempts += 1;
            let pos = Position::new(
                self.rng.gen_range(0..height) as i32,
                self.rng.gen_range(0..width) as i32,
            );
            if !mines.contains(&pos) && revealed.insert(pos) {
                let count = board.neighbors(pos).filter(|p| mines.contains(p)).count() as u8;
                board.reveal(pos, count).unwrap();
            }
        }

        let board = board.with_total_mines(mines.len() as u32);
        (board, mines)
    }

    pub fn generate_batch(&mut self, count: usize) -> Vec<(Board, HashSet<Position>)> {
        (0..count).map(|_| self.generate()).collect()
    }
}

/// Checks an analysis against the mine layout the snapshot came from.
///
/// The layout is one valid world, so every certainty claim must hold in it:
/// probability-0 cells cannot be mines, probability-1 cells must be, and an
/// emitted dual-outcome pair must contain exactly one mine.
pub fn validate_against_layout(analysis: &Analysis, mines: &HashSet<Position>) -> bool {
    for (pos, p) in &analysis.probabilities {
        if p.mine_count() > p.total_count() {
            println!("probability above 1 at {pos:?}: {p}");
            return false;
        }
        if p.is_zero() && mines.contains(pos) {
            println!("cell {pos:?} reported safe but holds a mine");
            return false;
        }
        if p.is_one() && !mines.contains(pos) {
            println!("cell {pos:?} reported certain mine but is safe");
            return false;
        }
    }

    for group in &analysis.groups {
        let mine_count =
            mines.contains(&group.first) as usize + mines.contains(&group.second) as usize;
        if mine_count != 1 {
            println!("dual-outcome group {group:?} holds {mine_count} mines, expected exactly 1");
            return false;
        }
    }

    true
}
