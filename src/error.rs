use crate::Position;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Board dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Position {0:?} is out of bounds")]
    OutOfBounds(Position),
    #[error("Cell at {pos:?} has adjacent mine count {count}, maximum is 8")]
    CountOutOfRange { pos: Position, count: u8 },
    #[error(
        "Revealed cell at {pos:?} requires {required} mines among {available} hidden neighbors"
    )]
    InconsistentBoard {
        pos: Position,
        required: i32,
        available: usize,
    },
    #[error("Mine totals conflict: {flagged} flags with {total} mines in play, {hidden} hidden cells")]
    MineCountConflict { total: u32, flagged: u32, hidden: u32 },
    #[error("No mine assignment satisfies the constraints")]
    UnsatisfiableConstraints,
    #[error("Search budget exhausted before the component was counted")]
    SearchBudgetExceeded,
}
