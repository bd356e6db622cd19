pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use data::VectorRegistry;
pub use engines::evaluation::{top_signals, FitnessEvaluator};
pub use engines::generation::{explore, EvolutionEngine, ExprNode};
pub use error::{Result, SigcomboError};
pub use types::{BooleanSequence, Distance, Operator, SearchOutcome, SignalScore};
