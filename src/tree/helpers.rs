//! Helper functions for regression tree building.
//!
//! Internal split-search and sampling routines used by the decision tree
//! and ensemble regressors.

use super::{RegressionLeaf, RegressionNode, RegressionTreeNode};
use crate::primitives::Matrix;
use rand::{Rng, SeedableRng};

/// Draws a bootstrap sample of indices (with replacement).
pub(super) fn bootstrap_sample(n_samples: usize, seed: Option<u64>) -> Vec<usize> {
    match seed {
        Some(s) => {
            let mut rng = rand::rngs::StdRng::seed_from_u64(s);
            (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
        }
        None => {
            let mut rng = rand::thread_rng();
            (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
        }
    }
}

/// Sum of squared deviations from the mean.
///
/// f64 accumulators: the corpus targets reach the hundreds, and squared
/// sums over a thousand samples exceed f32 integer resolution.
pub(super) fn sum_squared_error(y: &[f32]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let n = y.len() as f64;
    let sum: f64 = y.iter().map(|&v| f64::from(v)).sum();
    let ssq: f64 = y.iter().map(|&v| f64::from(v) * f64::from(v)).sum();
    ssq - sum * sum / n
}

/// Finds the threshold minimizing post-split squared error for one feature.
///
/// Scans split positions over the value-sorted samples with running sums,
/// so each candidate threshold is evaluated in constant time.
fn best_split_for_feature(values: &[f32], y: &[f32], min_samples_leaf: usize) -> Option<(f32, f64)> {
    let n = values.len();
    if n < 2 * min_samples_leaf {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_sum: f64 = y.iter().map(|&v| f64::from(v)).sum();
    let total_ssq: f64 = y.iter().map(|&v| f64::from(v) * f64::from(v)).sum();

    let mut left_sum = 0.0f64;
    let mut left_ssq = 0.0f64;
    let mut best: Option<(f32, f64)> = None;

    for k in 1..n {
        let prev = order[k - 1];
        left_sum += f64::from(y[prev]);
        left_ssq += f64::from(y[prev]) * f64::from(y[prev]);

        // Only split between distinct feature values
        if values[order[k]] <= values[prev] {
            continue;
        }
        if k < min_samples_leaf || n - k < min_samples_leaf {
            continue;
        }

        let right_sum = total_sum - left_sum;
        let right_ssq = total_ssq - left_ssq;
        let sse_left = left_ssq - left_sum * left_sum / k as f64;
        let sse_right = right_ssq - right_sum * right_sum / (n - k) as f64;
        let sse = sse_left + sse_right;

        if best.map_or(true, |(_, b)| sse < b) {
            let threshold = (values[prev] + values[order[k]]) / 2.0;
            best = Some((threshold, sse));
        }
    }

    best
}

/// Finds the best split across all features, if any reduces squared error.
pub(super) fn find_best_regression_split(
    x: &Matrix<f32>,
    y: &[f32],
    min_samples_leaf: usize,
) -> Option<(usize, f32)> {
    let (n_samples, n_features) = x.shape();
    if n_samples < 2 {
        return None;
    }

    let parent_sse = sum_squared_error(y);
    let mut best_sse = parent_sse;
    let mut best_split = None;

    for feature_idx in 0..n_features {
        let mut feature_values = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            feature_values.push(x.get(row, feature_idx));
        }

        if let Some((threshold, sse)) = best_split_for_feature(&feature_values, y, min_samples_leaf)
        {
            if sse < best_sse {
                best_sse = sse;
                best_split = Some((feature_idx, threshold));
            }
        }
    }

    best_split
}

/// Partitions sample indices by a feature threshold.
fn split_indices_by_threshold(
    x: &Matrix<f32>,
    feature_idx: usize,
    threshold: f32,
) -> (Vec<usize>, Vec<usize>) {
    let n_samples = x.shape().0;
    let mut left = Vec::new();
    let mut right = Vec::new();
    for row in 0..n_samples {
        if x.get(row, feature_idx) <= threshold {
            left.push(row);
        } else {
            right.push(row);
        }
    }
    (left, right)
}

/// Extracts the sub-dataset at the given indices.
fn subset(x: &Matrix<f32>, y: &[f32], indices: &[usize]) -> (Matrix<f32>, Vec<f32>) {
    let n_cols = x.shape().1;
    let mut data = Vec::with_capacity(indices.len() * n_cols);
    let mut targets = Vec::with_capacity(indices.len());

    for &idx in indices {
        for col in 0..n_cols {
            data.push(x.get(idx, col));
        }
        targets.push(y[idx]);
    }

    let matrix = Matrix::from_vec(indices.len(), n_cols, data)
        .expect("subset dimensions are consistent by construction");
    (matrix, targets)
}

fn mean(y: &[f32]) -> f32 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().sum::<f32>() / y.len() as f32
}

/// Builds a regression tree recursively.
pub(super) fn build_regression_tree(
    x: &Matrix<f32>,
    y: &[f32],
    depth: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
) -> RegressionTreeNode {
    let n_samples = y.len();

    let at_max_depth = max_depth.is_some_and(|max_d| depth >= max_d);
    if n_samples < min_samples_split || at_max_depth {
        return RegressionTreeNode::Leaf(RegressionLeaf {
            value: mean(y),
            n_samples,
        });
    }

    let Some((feature_idx, threshold)) = find_best_regression_split(x, y, min_samples_leaf) else {
        return RegressionTreeNode::Leaf(RegressionLeaf {
            value: mean(y),
            n_samples,
        });
    };

    let (left_indices, right_indices) = split_indices_by_threshold(x, feature_idx, threshold);
    if left_indices.is_empty() || right_indices.is_empty() {
        return RegressionTreeNode::Leaf(RegressionLeaf {
            value: mean(y),
            n_samples,
        });
    }

    let (left_x, left_y) = subset(x, y, &left_indices);
    let (right_x, right_y) = subset(x, y, &right_indices);

    let left = build_regression_tree(
        &left_x,
        &left_y,
        depth + 1,
        max_depth,
        min_samples_split,
        min_samples_leaf,
    );
    let right = build_regression_tree(
        &right_x,
        &right_y,
        depth + 1,
        max_depth,
        min_samples_split,
        min_samples_leaf,
    );

    RegressionTreeNode::Node(RegressionNode {
        feature_idx,
        threshold,
        left: Box::new(left),
        right: Box::new(right),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_sample_length_and_bounds() {
        let indices = bootstrap_sample(10, Some(42));
        assert_eq!(indices.len(), 10);
        assert!(indices.iter().all(|&i| i < 10));
    }

    #[test]
    fn test_bootstrap_sample_reproducible() {
        assert_eq!(bootstrap_sample(20, Some(7)), bootstrap_sample(20, Some(7)));
    }

    #[test]
    fn test_sum_squared_error_constant_is_zero() {
        assert!(sum_squared_error(&[3.0, 3.0, 3.0]).abs() < 1e-9);
    }

    #[test]
    fn test_sum_squared_error_known_value() {
        // mean = 2, deviations -1, 0, 1 -> sse = 2
        assert!((sum_squared_error(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_find_best_split_separates_clusters() {
        let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).expect("valid");
        let y = [1.0, 1.0, 1.0, 9.0, 9.0, 9.0];
        let (feature_idx, threshold) =
            find_best_regression_split(&x, &y, 1).expect("split should exist");
        assert_eq!(feature_idx, 0);
        assert!(threshold > 3.0 && threshold < 10.0);
    }

    #[test]
    fn test_find_best_split_none_for_constant_target() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("valid");
        let y = [5.0, 5.0, 5.0, 5.0];
        assert!(find_best_regression_split(&x, &y, 1).is_none());
    }

    #[test]
    fn test_find_best_split_respects_min_leaf() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("valid");
        let y = [1.0, 1.0, 1.0, 10.0];
        // min_samples_leaf = 2 forbids the 3/1 split that isolates 10.0
        if let Some((_, threshold)) = find_best_regression_split(&x, &y, 2) {
            assert!(threshold < 3.0);
        }
    }
}
