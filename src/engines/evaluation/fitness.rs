use crate::data::VectorRegistry;
use crate::engines::generation::ast::ExprNode;
use crate::error::{Result, SigcomboError};
use crate::types::{BooleanSequence, Distance, SignalScore};
use std::sync::Arc;

/// Reduces expression trees to sequences and scores them against the target
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    registry: Arc<VectorRegistry>,
}

impl FitnessEvaluator {
    pub fn new(registry: Arc<VectorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &VectorRegistry {
        &self.registry
    }

    /// Elementwise AND/OR down the tree
    pub fn evaluate(&self, node: &ExprNode) -> Result<BooleanSequence> {
        match node {
            ExprNode::Leaf { name } => self
                .registry
                .get(name)
                .cloned()
                .ok_or_else(|| SigcomboError::UnknownSignal(name.clone())),
            ExprNode::Op {
                operator,
                left,
                right,
            } => {
                let mut values = self.evaluate(left)?;
                let right_values = self.evaluate(right)?;
                for (value, other) in values.iter_mut().zip(right_values) {
                    *value = operator.apply(*value, other);
                }
                Ok(values)
            }
        }
    }

    /// Distance to the target together with the produced sequence.
    ///
    /// A missing individual scores `Infinite` with an all-zero sequence.
    pub fn fitness(&self, individual: Option<&ExprNode>) -> Result<(Distance, BooleanSequence)> {
        match individual {
            Some(node) => {
                let values = self.evaluate(node)?;
                let distance = hamming_distance(&values, self.registry.target());
                Ok((Distance::Finite(distance), values))
            }
            None => Ok((
                Distance::Infinite,
                vec![0; self.registry.sequence_len()],
            )),
        }
    }

    pub fn distance(&self, individual: Option<&ExprNode>) -> Result<Distance> {
        Ok(self.fitness(individual)?.0)
    }
}

/// Number of positions where the two sequences differ
pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// The `n` signals closest to the target on their own.
///
/// Ties keep registry name order.
pub fn top_signals(registry: &VectorRegistry, n: usize) -> Vec<SignalScore> {
    let mut scores: Vec<SignalScore> = registry
        .names()
        .iter()
        .filter_map(|name| {
            registry.get(name).map(|values| SignalScore {
                name: name.clone(),
                distance: hamming_distance(values, registry.target()),
            })
        })
        .collect();
    scores.sort_by_key(|score| score.distance);
    scores.truncate(n);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> FitnessEvaluator {
        let registry = VectorRegistry::from_pairs(
            vec![
                ("A", vec![1, 1, 0, 0]),
                ("B", vec![0, 1, 1, 0]),
                ("C", vec![0, 0, 0, 1]),
            ],
            vec![1, 1, 1, 0],
        )
        .unwrap();
        FitnessEvaluator::new(Arc::new(registry))
    }

    #[test]
    fn test_evaluate_leaf_and_ops() {
        let eval = evaluator();
        assert_eq!(eval.evaluate(&ExprNode::leaf("A")).unwrap(), vec![1, 1, 0, 0]);
        assert_eq!(
            eval.evaluate(&ExprNode::and(ExprNode::leaf("A"), ExprNode::leaf("B")))
                .unwrap(),
            vec![0, 1, 0, 0]
        );
        assert_eq!(
            eval.evaluate(&ExprNode::or(ExprNode::leaf("A"), ExprNode::leaf("B")))
                .unwrap(),
            vec![1, 1, 1, 0]
        );
    }

    #[test]
    fn test_fitness_matches_hamming_definition() {
        let eval = evaluator();
        let tree = ExprNode::or(
            ExprNode::leaf("C"),
            ExprNode::and(ExprNode::leaf("A"), ExprNode::leaf("B")),
        );
        let (distance, values) = eval.fitness(Some(&tree)).unwrap();
        assert_eq!(values, vec![0, 1, 0, 1]);
        let expected = values
            .iter()
            .zip(eval.registry().target())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(distance, Distance::Finite(expected));
        assert_eq!(distance, Distance::Finite(3));
    }

    #[test]
    fn test_perfect_match_scores_zero() {
        let eval = evaluator();
        let tree = ExprNode::or(ExprNode::leaf("A"), ExprNode::leaf("B"));
        assert_eq!(eval.distance(Some(&tree)).unwrap(), Distance::Finite(0));
    }

    #[test]
    fn test_missing_individual_is_worst() {
        let eval = evaluator();
        let (distance, values) = eval.fitness(None).unwrap();
        assert_eq!(distance, Distance::Infinite);
        assert_eq!(values, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_top_signals_ranks_by_distance() {
        let eval = evaluator();
        // A and B both miss one position, C misses all four
        let top = top_signals(eval.registry(), 2);
        assert_eq!(
            top,
            vec![
                SignalScore {
                    name: "A".to_string(),
                    distance: 1
                },
                SignalScore {
                    name: "B".to_string(),
                    distance: 1
                },
            ]
        );

        let all = top_signals(eval.registry(), 10);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].name, "C");
        assert_eq!(all[2].distance, 4);
        assert!(top_signals(eval.registry(), 0).is_empty());
    }

    #[test]
    fn test_unknown_signal() {
        let eval = evaluator();
        let result = eval.evaluate(&ExprNode::leaf("Q"));
        assert!(matches!(result, Err(SigcomboError::UnknownSignal(name)) if name == "Q"));
    }
}
