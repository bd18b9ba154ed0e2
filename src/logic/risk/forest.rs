//! Isolation Forest
//!
//! Unsupervised outlier model. Điểm càng dễ bị cô lập (path ngắn) càng bất thường.
//!
//! - `score`: 2^(-E[h(x)] / c(ψ)), higher = more anomalous
//! - `decision_function`: threshold - score, negative = outlier
//!
//! Trees are stored as flat node arenas.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::rules::MIN_TRAINING_SAMPLES;
use super::strategy::ForestParams;
use crate::error::{EngineError, EngineResult};

const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn build(data: &Array2<f64>, rows: Vec<usize>, height_limit: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(data, rows, 0, height_limit, rng);
        tree
    }

    /// Returns the index of the node just created
    fn grow(
        &mut self,
        data: &Array2<f64>,
        rows: Vec<usize>,
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> usize {
        let idx = self.nodes.len();

        if depth >= height_limit || rows.len() <= 1 {
            self.nodes.push(Node::Leaf { size: rows.len() });
            return idx;
        }

        // Only features that still vary can split
        let mut candidates = Vec::with_capacity(data.ncols());
        for f in 0..data.ncols() {
            let (lo, hi) = column_range(data, &rows, f);
            if lo < hi {
                candidates.push((f, lo, hi));
            }
        }
        if candidates.is_empty() {
            self.nodes.push(Node::Leaf { size: rows.len() });
            return idx;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(lo..hi);

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| data[[r, feature]] < threshold);

        // Placeholder, patched once children exist
        self.nodes.push(Node::Leaf { size: 0 });
        let left = self.grow(data, left_rows, depth + 1, height_limit, rng);
        let right = self.grow(data, right_rows, depth + 1, height_limit, rng);
        self.nodes[idx] = Node::Split { feature, threshold, left, right };
        idx
    }

    fn path_length(&self, x: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] < *threshold { *left } else { *right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn column_range(data: &Array2<f64>, rows: &[usize], feature: usize) -> (f64, f64) {
    rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
        let v = data[[r, feature]];
        (lo.min(v), hi.max(v))
    })
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    /// Score at the (1 - contamination) quantile of training scores
    threshold: f64,
}

impl IsolationForest {
    pub fn fit(data: &Array2<f64>, params: &ForestParams) -> EngineResult<Self> {
        let n = data.nrows();
        if n < MIN_TRAINING_SAMPLES {
            return Err(EngineError::InsufficientData(format!(
                "isolation forest needs at least {} samples, got {}",
                MIN_TRAINING_SAMPLES, n
            )));
        }

        let sample_size = params.sample_size.min(n);
        let height_limit = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let trees = (0..params.n_trees)
            .map(|_| {
                let rows = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                IsolationTree::build(data, rows, height_limit, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            threshold: 0.0,
        };

        let mut training: Vec<f64> = data.rows().into_iter().map(|r| forest.score(r)).collect();
        forest.threshold = quantile(&mut training, 1.0 - params.contamination);
        Ok(forest)
    }

    /// Anomaly score in (0, 1], higher = more anomalous
    pub fn score(&self, x: ArrayView1<f64>) -> f64 {
        let mean_path =
            self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64;
        let c = average_path_length(self.sample_size);
        if c <= 0.0 {
            return 0.5;
        }
        2f64.powf(-mean_path / c)
    }

    /// Positive = inlier, negative = outlier
    pub fn decision_function(&self, x: ArrayView1<f64>) -> f64 {
        self.threshold - self.score(x)
    }

    pub fn is_outlier(&self, x: ArrayView1<f64>) -> bool {
        self.decision_function(x) < 0.0
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Linear-interpolated quantile (sorts in place)
fn quantile(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pos = q.clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
}
