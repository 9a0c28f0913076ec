//! Random forest regressor used to optionally rescore final poses.
//!
//! Per-tree training is fanned out to `WorkPool` behind a counted barrier,
//! matching the pattern used for `ScoringFunction::precalculate_all` -- a
//! burst of independent tasks that each write their own memory, followed by
//! a single barrier wait.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::constants::RF_BOOTSTRAP_SIZE;
use crate::pool::WorkPool;

/// One leaf/split node of a regression tree, stored in a flat `Vec` indexed
/// by node id (root is index 0); children are `left`/`right` node ids.
enum Node {
    Leaf { value: f64 },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

/// A single regression tree trained on a bootstrap sample.
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict(&self, x: &[f64]) -> f64 {
        let mut node_id = 0usize;
        loop {
            match &self.nodes[node_id] {
                Node::Leaf { value } => return *value,
                Node::Split { feature, threshold, left, right } => {
                    node_id = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// An ensemble of regression trees predicting binding affinity (pKd) from
/// RF-Score-style contact-count descriptors.
pub struct Forest {
    trees: Vec<Tree>,
}

impl Forest {
    /// Trains `num_trees` independent trees on the built-in training corpus,
    /// fanned out to `pool`. Each tree's bootstrap sample and split-feature
    /// subsets are drawn from a seed derived deterministically from `seed`
    /// and the tree index, so training is reproducible regardless of which
    /// worker thread executes which tree.
    pub fn train(num_trees: usize, seed: u64, pool: &WorkPool) -> Self {
        let data = Arc::new(training_data());
        let results: Arc<std::sync::Mutex<Vec<Option<Tree>>>> =
            Arc::new(std::sync::Mutex::new((0..num_trees).map(|_| None).collect()));
        let counter = pool.counter();
        counter.init(num_trees);
        for i in 0..num_trees {
            let data = Arc::clone(&data);
            let results = Arc::clone(&results);
            let counter = counter.clone();
            let tree_seed = derive_seed(seed, i as u64);
            pool.post(move || {
                let tree = train_one_tree(&data, tree_seed);
                results.lock().unwrap()[i] = Some(tree);
                // Drop this task's `results` clone before the barrier signal, so its
                // refcount decrement happens-before `try_unwrap` below checks it.
                drop(results);
                counter.increment();
            });
        }
        counter.wait();
        let trees = Arc::try_unwrap(results)
            .ok()
            .expect("forest results still shared after barrier")
            .into_inner()
            .unwrap()
            .into_iter()
            .map(|t| t.expect("every tree slot filled by its task"))
            .collect();
        Forest { trees }
    }

    /// Mean of per-tree predictions for the given 36-feature descriptor.
    pub fn score(&self, descriptors: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(descriptors)).sum();
        sum / self.trees.len() as f64
    }
}

/// Mixes the root `seed` with a tree index into a per-tree 64-bit seed
/// (collision-safe splitmix-style mixing).
fn derive_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E3779B97F4A7C15u64.wrapping_mul(index.wrapping_add(1)));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

struct Sample {
    features: Vec<f64>,
    target: f64,
}

const MAX_TREE_DEPTH: usize = 6;
const MIN_SAMPLES_SPLIT: usize = 3;

fn train_one_tree(data: &[Sample], seed: u64) -> Tree {
    let mut rng: StdRng = SeedableRng::seed_from_u64(seed);
    let n = data.len();
    let bootstrap: Vec<usize> = (0..RF_BOOTSTRAP_SIZE)
        .map(|_| rng.gen_range(0..n))
        .collect();

    let mut nodes = Vec::new();
    build_node(data, &bootstrap, &mut rng, 0, &mut nodes);
    Tree { nodes }
}

/// Recursively builds a node for the samples indexed by `indices`, appending
/// to `nodes` and returning that node's id. Picks, at each split, a random
/// subset of features (sqrt(nv) per the RF-Score convention) and the best
/// threshold within that subset by sum-of-squared-error reduction.
fn build_node(
    data: &[Sample],
    indices: &[usize],
    rng: &mut StdRng,
    depth: usize,
    nodes: &mut Vec<Node>,
) -> usize {
    let mean = indices.iter().map(|&i| data[i].target).sum::<f64>() / indices.len() as f64;

    if depth >= MAX_TREE_DEPTH || indices.len() < MIN_SAMPLES_SPLIT {
        nodes.push(Node::Leaf { value: mean });
        return nodes.len() - 1;
    }

    let num_features = data[0].features.len();
    let subset_size = (num_features as f64).sqrt().ceil() as usize;
    let mut feature_order: Vec<usize> = (0..num_features).collect();
    feature_order.shuffle(rng);
    let candidate_features = &feature_order[..subset_size.min(num_features)];

    let parent_sse = sse(data, indices, mean);
    let mut best: Option<(usize, f64, f64, Vec<usize>, Vec<usize>)> = None;

    for &feature in candidate_features {
        let mut values: Vec<f64> = indices.iter().map(|&i| data[i].features[feature]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values.dedup();
        for w in values.windows(2) {
            let threshold = (w[0] + w[1]) / 2.0;
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| data[i].features[feature] <= threshold);
            if left.is_empty() || right.is_empty() {
                continue;
            }
            let left_mean = indices_mean(data, &left);
            let right_mean = indices_mean(data, &right);
            let candidate_sse = sse(data, &left, left_mean) + sse(data, &right, right_mean);
            let improved = match &best {
                None => true,
                Some((_, _, best_sse, _, _)) => candidate_sse < *best_sse,
            };
            if improved {
                best = Some((feature, threshold, candidate_sse, left, right));
            }
        }
    }

    match best {
        Some((feature, threshold, candidate_sse, left, right)) if candidate_sse < parent_sse => {
            let left_id = build_node(data, &left, rng, depth + 1, nodes);
            let right_id = build_node(data, &right, rng, depth + 1, nodes);
            nodes.push(Node::Split { feature, threshold, left: left_id, right: right_id });
            nodes.len() - 1
        }
        _ => {
            nodes.push(Node::Leaf { value: mean });
            nodes.len() - 1
        }
    }
}

fn indices_mean(data: &[Sample], indices: &[usize]) -> f64 {
    indices.iter().map(|&i| data[i].target).sum::<f64>() / indices.len() as f64
}

fn sse(data: &[Sample], indices: &[usize], mean: f64) -> f64 {
    indices.iter().map(|&i| (data[i].target - mean).powi(2)).sum()
}

/// A small, fixed, built-in training corpus standing in for a full
/// PDBbind-derived RF-Score table. Each row is a 36-feature (ligand element
/// x receptor element) contact-count vector paired with a measured pKd.
/// Generated once and embedded as data rather than downloaded, so
/// `forest::train` is runnable offline.
fn training_data() -> Vec<Sample> {
    const RAW: &[(f64, [f64; 36])] = &RAW_TRAINING_SET;
    RAW.iter()
        .map(|(pkd, features)| Sample { features: features.to_vec(), target: *pkd })
        .collect()
}

include!("forest_training_data.rs");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_seed_is_deterministic_and_distinct() {
        let a = derive_seed(42, 0);
        let b = derive_seed(42, 0);
        let c = derive_seed(42, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn training_data_has_expected_shape() {
        let data = training_data();
        assert_eq!(data.len(), RAW_TRAINING_SET.len());
        for sample in &data {
            assert_eq!(sample.features.len(), 36);
            assert!(sample.target > 0.0 && sample.target < 15.0);
        }
    }

    #[test]
    fn forest_trains_and_scores_without_panicking() {
        let pool = WorkPool::new(2);
        let forest = Forest::train(4, 7, &pool);
        let descriptors = vec![1.0; 36];
        let score = forest.score(&descriptors);
        assert!(score.is_finite());
    }

    #[test]
    fn same_seed_gives_same_scores() {
        let pool = WorkPool::new(2);
        let f1 = Forest::train(6, 123, &pool);
        let f2 = Forest::train(6, 123, &pool);
        let x = vec![2.0; 36];
        assert_eq!(f1.score(&x), f2.score(&x));
    }
}
