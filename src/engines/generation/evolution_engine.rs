use crate::config::{ConfigSection, SearchConfig};
use crate::data::VectorRegistry;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    ast::Individual,
    best_so_far::BestSoFar,
    generator::TreeGenerator,
    operators::{crossover, mutate, tournament_selection, ScoredIndividual},
    progress::{ConsoleProgressCallback, GenerationReport, ProgressCallback},
};
use crate::error::Result;
use crate::types::{BooleanSequence, SearchOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owns the population and runs the fixed-length generation loop
pub struct EvolutionEngine {
    config: SearchConfig,
    evaluator: FitnessEvaluator,
    generator: TreeGenerator,
    max_elements: usize,
    rng: StdRng,
    cancel_flag: Arc<AtomicBool>,
}

/// Read-only view used to build one offspring
struct Breeder<'a> {
    config: &'a SearchConfig,
    generator: &'a TreeGenerator,
    names: &'a [String],
    max_elements: usize,
}

impl Breeder<'_> {
    /// Select, cross over, then mutate with a child-local random source
    fn breed(&self, population: &[ScoredIndividual], seed: u64) -> Individual {
        let mut rng = StdRng::seed_from_u64(seed);
        let parent1 = tournament_selection(population, self.config.tournament_size, &mut rng);
        let parent2 = tournament_selection(population, self.config.tournament_size, &mut rng);
        let child = crossover(parent1, parent2, self.config.crossover_rate, &mut rng);
        mutate(
            child,
            self.generator,
            self.names,
            self.max_elements,
            self.config.mutation_rate,
            &mut rng,
        )
    }
}

impl EvolutionEngine {
    pub fn new(registry: Arc<VectorRegistry>, config: SearchConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let max_elements = config.effective_max_elements(registry.len());
        if max_elements > registry.len() {
            log::warn!(
                "max_elements {} exceeds the {} available signals",
                max_elements,
                registry.len()
            );
        }

        Ok(Self {
            generator: TreeGenerator::new(config.max_depth),
            evaluator: FitnessEvaluator::new(registry),
            max_elements,
            config,
            rng,
            cancel_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Setting the flag stops the run at the next generation boundary
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_flag)
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search and return the best expression seen in any generation
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<SearchOutcome> {
        log::info!(
            "Starting search: {} signals, length {}, population {}, generations {}",
            self.evaluator.registry().len(),
            self.evaluator.registry().sequence_len(),
            self.config.pop_size,
            self.config.generations
        );

        let initial = self.initialize_population();
        let mut scored = self.score_population(initial)?;

        let mut best = BestSoFar::new();
        best.offer_population(&scored);

        for generation in 0..self.config.generations {
            if self.cancel_flag.load(Ordering::Relaxed) {
                log::warn!("Search cancelled after {} generations", generation);
                break;
            }

            callback.on_generation_start(generation);

            let offspring = self.create_next_generation(&scored);
            scored = self.score_population(offspring)?;

            let generation_best = best.offer_population(&scored);
            let report = GenerationReport {
                generation,
                total_generations: self.config.generations,
                generation_best,
                best_distance: best.distance(),
                best_expression: best.expression(),
                valid_individuals: scored.iter().filter(|(ind, _)| ind.is_some()).count(),
            };
            callback.on_generation_complete(&report);
        }

        let outcome = best.into_outcome(&self.evaluator)?;
        callback.on_search_complete(&outcome);
        Ok(outcome)
    }

    fn initialize_population(&mut self) -> Vec<Individual> {
        let names = self.evaluator.registry().names();
        (0..self.config.pop_size)
            .map(|_| self.generator.generate(names, &mut self.rng))
            .collect()
    }

    fn score_population(&self, population: Vec<Individual>) -> Result<Vec<ScoredIndividual>> {
        let evaluator = &self.evaluator;
        let score = |individual: Individual| -> Result<ScoredIndividual> {
            let distance = evaluator.distance(individual.as_ref())?;
            Ok((individual, distance))
        };

        if self.config.parallel {
            population.into_par_iter().map(score).collect()
        } else {
            population.into_iter().map(score).collect()
        }
    }

    /// One child per slot, each from its own seed drawn in slot order, so
    /// sequential and parallel runs produce the same population.
    fn create_next_generation(&mut self, population: &[ScoredIndividual]) -> Vec<Individual> {
        let seeds: Vec<u64> = (0..self.config.pop_size).map(|_| self.rng.gen()).collect();

        let breeder = Breeder {
            config: &self.config,
            generator: &self.generator,
            names: self.evaluator.registry().names(),
            max_elements: self.max_elements,
        };

        if self.config.parallel {
            seeds
                .par_iter()
                .map(|&seed| breeder.breed(population, seed))
                .collect()
        } else {
            seeds
                .iter()
                .map(|&seed| breeder.breed(population, seed))
                .collect()
        }
    }
}

/// One-call search over in-memory inputs
pub fn explore(
    vectors: BTreeMap<String, BooleanSequence>,
    target: BooleanSequence,
    config: SearchConfig,
) -> Result<SearchOutcome> {
    let registry = Arc::new(VectorRegistry::new(vectors, target)?);
    let mut engine = EvolutionEngine::new(registry, config)?;
    engine.run(ConsoleProgressCallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::progress::SilentProgressCallback;
    use crate::types::Distance;

    fn registry() -> Arc<VectorRegistry> {
        Arc::new(
            VectorRegistry::from_pairs(
                vec![
                    ("A", vec![1, 1, 0, 0, 1, 0]),
                    ("B", vec![0, 1, 1, 0, 0, 0]),
                    ("C", vec![0, 0, 0, 1, 1, 1]),
                    ("D", vec![1, 0, 1, 0, 1, 0]),
                ],
                vec![1, 1, 1, 0, 1, 0],
            )
            .unwrap(),
        )
    }

    fn config(seed: u64) -> SearchConfig {
        SearchConfig {
            max_depth: 3,
            generations: 15,
            pop_size: 20,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = EvolutionEngine::new(
            registry(),
            SearchConfig {
                pop_size: 0,
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_outcome_is_consistent() {
        let mut engine = EvolutionEngine::new(registry(), config(1)).unwrap();
        let outcome = engine.run(SilentProgressCallback).unwrap();

        let evaluator = engine.evaluator();
        assert_eq!(outcome.result_sequence.len(), 6);
        let expected = crate::engines::evaluation::hamming_distance(
            &outcome.result_sequence,
            evaluator.registry().target(),
        );
        assert_eq!(outcome.hamming_distance, Distance::Finite(expected));
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let mut sequential = EvolutionEngine::new(registry(), config(42)).unwrap();
        let mut parallel = EvolutionEngine::new(
            registry(),
            SearchConfig {
                parallel: true,
                ..config(42)
            },
        )
        .unwrap();

        assert_eq!(
            sequential.run(SilentProgressCallback).unwrap(),
            parallel.run(SilentProgressCallback).unwrap()
        );
    }

    #[test]
    fn test_cancel_before_first_generation() {
        let mut engine = EvolutionEngine::new(
            registry(),
            SearchConfig {
                generations: 1_000_000,
                ..config(3)
            },
        )
        .unwrap();
        engine.cancel_handle().store(true, Ordering::Relaxed);

        // Returns the best of the initial population instead of looping
        let outcome = engine.run(SilentProgressCallback).unwrap();
        assert!(outcome.is_solution());
    }
}
