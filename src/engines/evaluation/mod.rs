pub mod fitness;

pub use fitness::{hamming_distance, top_signals, FitnessEvaluator};
