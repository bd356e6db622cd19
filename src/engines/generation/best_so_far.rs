use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::ast::ExprNode;
use crate::engines::generation::operators::ScoredIndividual;
use crate::error::Result;
use crate::types::{Distance, SearchOutcome};

/// Best individual seen across all generations.
///
/// Holds its own copy of the tree; population members are discarded every
/// generation while this snapshot survives.
#[derive(Debug, Clone)]
pub struct BestSoFar {
    tree: Option<ExprNode>,
    distance: Distance,
}

impl Default for BestSoFar {
    fn default() -> Self {
        Self {
            tree: None,
            distance: Distance::Infinite,
        }
    }
}

impl BestSoFar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> Option<&ExprNode> {
        self.tree.as_ref()
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn expression(&self) -> Option<String> {
        self.tree.as_ref().map(ToString::to_string)
    }

    /// Capture a copy of `candidate` if it is strictly closer
    pub fn offer(&mut self, candidate: &ExprNode, distance: Distance) -> bool {
        if distance < self.distance {
            self.tree = Some(candidate.clone());
            self.distance = distance;
            true
        } else {
            false
        }
    }

    /// Offer the closest valid member of a scored population.
    ///
    /// Returns that member's distance, or `None` when the population holds
    /// no valid individual.
    pub fn offer_population(&mut self, population: &[ScoredIndividual]) -> Option<Distance> {
        let (tree, distance) = population
            .iter()
            .filter_map(|(individual, distance)| individual.as_ref().map(|tree| (tree, *distance)))
            .min_by_key(|(_, distance)| *distance)?;
        self.offer(tree, distance);
        Some(distance)
    }

    /// Final answer, or the no-solution sentinel
    pub fn into_outcome(self, evaluator: &FitnessEvaluator) -> Result<SearchOutcome> {
        match self.tree {
            Some(tree) => Ok(SearchOutcome {
                expression: tree.to_string(),
                result_sequence: evaluator.evaluate(&tree)?,
                hamming_distance: self.distance,
                signals: tree.leaf_names().into_iter().map(String::from).collect(),
            }),
            None => Ok(SearchOutcome::no_solution(
                evaluator.registry().sequence_len(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::VectorRegistry;
    use std::sync::Arc;

    #[test]
    fn test_only_strict_improvements_are_captured() {
        let mut best = BestSoFar::new();
        assert_eq!(best.distance(), Distance::Infinite);

        assert!(best.offer(&ExprNode::leaf("A"), Distance::Finite(3)));
        assert!(!best.offer(&ExprNode::leaf("B"), Distance::Finite(3)));
        assert!(best.offer(&ExprNode::leaf("C"), Distance::Finite(1)));
        assert!(!best.offer(&ExprNode::leaf("D"), Distance::Infinite));

        assert_eq!(best.expression().as_deref(), Some("C"));
        assert_eq!(best.distance(), Distance::Finite(1));
    }

    #[test]
    fn test_offer_population_ignores_invalid() {
        let mut best = BestSoFar::new();
        let population: Vec<ScoredIndividual> = vec![(None, Distance::Infinite); 3];
        assert_eq!(best.offer_population(&population), None);
        assert!(best.tree().is_none());

        let population: Vec<ScoredIndividual> = vec![
            (None, Distance::Infinite),
            (Some(ExprNode::leaf("A")), Distance::Finite(2)),
            (Some(ExprNode::leaf("B")), Distance::Finite(2)),
        ];
        assert_eq!(best.offer_population(&population), Some(Distance::Finite(2)));
        // First seen wins the tie
        assert_eq!(best.expression().as_deref(), Some("A"));
    }

    #[test]
    fn test_into_outcome() {
        let registry =
            Arc::new(VectorRegistry::from_pairs(vec![("X", vec![1, 0, 1])], vec![1, 0, 0]).unwrap());
        let evaluator = FitnessEvaluator::new(registry);

        let outcome = BestSoFar::new().into_outcome(&evaluator).unwrap();
        assert_eq!(outcome, SearchOutcome::no_solution(3));

        let mut best = BestSoFar::new();
        best.offer(&ExprNode::leaf("X"), Distance::Finite(1));
        let outcome = best.into_outcome(&evaluator).unwrap();
        assert_eq!(outcome.expression, "X");
        assert_eq!(outcome.result_sequence, vec![1, 0, 1]);
        assert_eq!(outcome.hamming_distance, Distance::Finite(1));
        assert_eq!(outcome.signals, vec!["X".to_string()]);
    }

    #[test]
    fn test_outcome_keeps_names_with_spaces() {
        let registry = Arc::new(
            VectorRegistry::from_pairs(
                vec![("Close above MA", vec![1, 0, 1]), ("Volume up", vec![0, 1, 0])],
                vec![1, 1, 1],
            )
            .unwrap(),
        );
        let evaluator = FitnessEvaluator::new(registry);

        let mut best = BestSoFar::new();
        best.offer(
            &ExprNode::or(ExprNode::leaf("Close above MA"), ExprNode::leaf("Volume up")),
            Distance::Finite(0),
        );
        let outcome = best.into_outcome(&evaluator).unwrap();
        assert_eq!(outcome.expression, "(Close above MA OR Volume up)");
        assert_eq!(
            outcome.signals,
            vec!["Close above MA".to_string(), "Volume up".to_string()]
        );
    }
}
