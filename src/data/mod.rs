pub mod loader;
pub mod registry;

pub use loader::{load_explanations, ProblemFile};
pub use registry::VectorRegistry;
