use crate::engines::generation::ast::ExprNode;
use crate::types::Operator;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds random expression trees that reference each name at most once.
///
/// Names are partitioned between the two children of every operator node,
/// which is what keeps a tree free of duplicate leaves. The distinct-leaf
/// budget (`max_elements`) is not checked here; only mutation gates on it.
#[derive(Debug, Clone)]
pub struct TreeGenerator {
    max_depth: usize,
}

impl TreeGenerator {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Top-level generation over `available` names
    pub fn generate<R: Rng + ?Sized>(&self, available: &[String], rng: &mut R) -> Option<ExprNode> {
        self.generate_at(0, available, rng)
    }

    /// Returns `None` only when `available` is empty
    pub fn generate_at<R: Rng + ?Sized>(
        &self,
        depth: usize,
        available: &[String],
        rng: &mut R,
    ) -> Option<ExprNode> {
        if depth >= self.max_depth || available.is_empty() {
            return Self::random_leaf(available, rng);
        }

        if depth + 1 == self.max_depth || rng.gen::<f64>() < self.leaf_probability(depth) {
            return Self::random_leaf(available, rng);
        }

        let operator = Operator::ALL[rng.gen_range(0..Operator::ALL.len())];

        let mut shuffled = available.to_vec();
        shuffled.shuffle(rng);
        let split = if shuffled.len() > 1 {
            rng.gen_range(1..shuffled.len())
        } else {
            1
        };
        let (left_names, right_names) = shuffled.split_at(split);

        let left = self.generate_at(depth + 1, left_names, rng);
        let right = self.generate_at(depth + 1, right_names, rng);

        match (left, right) {
            (Some(left), Some(right)) => Some(ExprNode::op(operator, left, right)),
            (Some(child), None) | (None, Some(child)) => Some(child),
            (None, None) => Self::random_leaf(available, rng),
        }
    }

    /// Chance of stopping early; shrinks to 0 as depth approaches the limit
    fn leaf_probability(&self, depth: usize) -> f64 {
        0.5 * (1.0 - depth as f64 / self.max_depth as f64)
    }

    fn random_leaf<R: Rng + ?Sized>(available: &[String], rng: &mut R) -> Option<ExprNode> {
        available.choose(rng).map(|name| ExprNode::leaf(name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("S{}", i)).collect()
    }

    #[test]
    fn test_empty_names_yield_none() {
        let generator = TreeGenerator::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generator.generate(&[], &mut rng).is_none());
    }

    #[test]
    fn test_single_name_yields_leaf() {
        let generator = TreeGenerator::new(4);
        let mut rng = StdRng::seed_from_u64(2);
        let available = vec!["X".to_string()];
        for _ in 0..50 {
            let tree = generator.generate(&available, &mut rng).unwrap();
            assert_eq!(tree, ExprNode::leaf("X"));
        }
    }

    #[test]
    fn test_zero_depth_is_always_leaf() {
        let generator = TreeGenerator::new(0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(generator.generate(&names(5), &mut rng).unwrap().is_leaf());
        }
    }

    #[test]
    fn test_generated_trees_respect_depth_and_uniqueness() {
        let available = names(12);
        let mut rng = StdRng::seed_from_u64(4);

        for max_depth in 1..6 {
            let generator = TreeGenerator::new(max_depth);
            for _ in 0..200 {
                let tree = generator.generate(&available, &mut rng).unwrap();
                assert!(tree.has_unique_names(), "duplicate leaf in {}", tree);
                // The last level before max_depth always produces a leaf
                assert!(tree.depth() < max_depth, "{} too deep for {}", tree, max_depth);
                assert!(tree
                    .used_names()
                    .iter()
                    .all(|name| available.iter().any(|a| a == name)));
            }
        }
    }

    #[test]
    fn test_operator_nodes_are_produced() {
        let generator = TreeGenerator::new(3);
        let mut rng = StdRng::seed_from_u64(5);
        let trees: Vec<_> = (0..100)
            .filter_map(|_| generator.generate(&names(6), &mut rng))
            .collect();
        assert!(trees.iter().any(|t| !t.is_leaf()));
        assert!(trees.iter().any(|t| t.is_leaf()));
    }

    #[test]
    fn test_generation_is_reproducible() {
        let generator = TreeGenerator::new(4);
        let available = names(8);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(
                generator.generate(&available, &mut a),
                generator.generate(&available, &mut b)
            );
        }
    }
}
