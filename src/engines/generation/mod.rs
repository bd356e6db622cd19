pub mod ast;
pub mod best_so_far;
pub mod evolution_engine;
pub mod generator;
pub mod operators;
pub mod progress;

pub use ast::{extract_signal_names, ExprNode, Individual};
pub use best_so_far::BestSoFar;
pub use evolution_engine::{explore, EvolutionEngine};
pub use generator::TreeGenerator;
pub use operators::{crossover, mutate, tournament_selection, ScoredIndividual};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, GenerationReport, ProgressCallback,
    ProgressMessage, SilentProgressCallback,
};
