pub mod board;
pub mod engine;
pub mod error;
pub mod position;
pub mod probability;

pub use board::{Board, Cell};
pub use engine::{analyze, Analysis, DualOutcomeGroup, EngineConfig};
pub use error::EngineError;
pub use position::Position;
pub use probability::Probability;
