use super::traits::ConfigSection;
use crate::error::SigcomboError;
use serde::{Deserialize, Serialize};

/// Parameters of one search run; fixed for the duration of the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: usize,
    pub generations: usize,
    pub pop_size: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Distinct-name budget checked by mutation; `None` means every name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_elements: Option<usize>,
    pub tournament_size: usize,
    /// Random source seed; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Build offspring on the rayon pool
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            generations: 100,
            pop_size: 50,
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            max_elements: None,
            tournament_size: 3,
            seed: None,
            parallel: false,
        }
    }
}

impl SearchConfig {
    /// `max_elements`, defaulting to the number of available names
    pub fn effective_max_elements(&self, name_count: usize) -> usize {
        self.max_elements.unwrap_or(name_count)
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), SigcomboError> {
        if self.max_depth == 0 {
            return Err(SigcomboError::Configuration(
                "Max depth must be at least 1".to_string(),
            ));
        }
        if self.pop_size == 0 {
            return Err(SigcomboError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(SigcomboError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(SigcomboError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SigcomboError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.max_elements == Some(0) {
            return Err(SigcomboError::Configuration(
                "Max elements must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
