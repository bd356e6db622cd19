use crate::engines::generation::ast::{ExprNode, Individual};
use crate::engines::generation::generator::TreeGenerator;
use crate::types::Distance;
use rand::seq::index;
use rand::Rng;

/// An individual paired with its distance, scored once per generation
pub type ScoredIndividual = (Individual, Distance);

static NO_INDIVIDUAL: Individual = None;

/// Tournament selection: draw K distinct candidates, keep the closest.
///
/// K is clamped to the population size. Ties go to the first drawn.
pub fn tournament_selection<'a, R: Rng + ?Sized>(
    population: &'a [ScoredIndividual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual {
    if population.is_empty() {
        return &NO_INDIVIDUAL;
    }

    let k = tournament_size.clamp(1, population.len());
    let picks = index::sample(rng, population.len(), k);
    picks
        .iter()
        .map(|i| &population[i])
        .min_by_key(|(_, distance)| *distance)
        .map(|(individual, _)| individual)
        .unwrap_or(&NO_INDIVIDUAL)
}

/// Root-level splice crossover.
///
/// With probability `crossover_rate`, and when both parents exist, tries to
/// replace one immediate operator child of `parent1` with a copy of
/// `parent2`. Otherwise returns a copy of `parent1`.
pub fn crossover<R: Rng + ?Sized>(
    parent1: &Individual,
    parent2: &Individual,
    crossover_rate: f64,
    rng: &mut R,
) -> Individual {
    let roll = rng.gen::<f64>();
    match (parent1, parent2) {
        (Some(first), Some(second)) if roll < crossover_rate => Some(splice_at_root(first, second)),
        _ => parent1.clone(),
    }
}

/// Replace the left (else right) child of `parent1` with `parent2`.
///
/// A child qualifies when it is an operator node, its names are disjoint
/// from `parent2`, and the sibling that stays is disjoint from `parent2` as
/// well, so the result never references a name twice.
pub fn splice_at_root(parent1: &ExprNode, parent2: &ExprNode) -> ExprNode {
    if let ExprNode::Op {
        operator,
        left,
        right,
    } = parent1
    {
        let donor = parent2.used_names();
        let fits = |replaced: &ExprNode, kept: &ExprNode| {
            !replaced.is_leaf()
                && replaced.used_names().is_disjoint(&donor)
                && kept.used_names().is_disjoint(&donor)
        };

        if fits(left, right) {
            return ExprNode::Op {
                operator: *operator,
                left: Box::new(parent2.clone()),
                right: right.clone(),
            };
        }
        if fits(right, left) {
            return ExprNode::Op {
                operator: *operator,
                left: left.clone(),
                right: Box::new(parent2.clone()),
            };
        }
    }

    parent1.clone()
}

/// Whole-tree replacement mutation.
///
/// With probability `mutation_rate`, and while the tree uses fewer than
/// `max_elements` names and unused names remain, the tree is replaced by a
/// fresh one built only from the unused names. A replacement that would
/// exceed `max_elements` distinct names is discarded.
pub fn mutate<R: Rng + ?Sized>(
    tree: Individual,
    generator: &TreeGenerator,
    all_names: &[String],
    max_elements: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Individual {
    let roll = rng.gen::<f64>();
    let node = match tree {
        Some(node) if roll < mutation_rate => node,
        other => return other,
    };

    let (used_count, available) = {
        let used = node.used_names();
        let available: Vec<String> = all_names
            .iter()
            .filter(|name| !used.contains(name.as_str()))
            .cloned()
            .collect();
        (used.len(), available)
    };

    if available.is_empty() || used_count >= max_elements {
        return Some(node);
    }

    match generator.generate(&available, rng) {
        Some(fresh) if fresh.used_names().len() <= max_elements => Some(fresh),
        _ => Some(node),
    }
}
