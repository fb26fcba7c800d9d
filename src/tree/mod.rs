//! Tree-based regressors.
//!
//! `DecisionTreeRegressor` implements CART with variance-reduction splits.
//! `RandomForestRegressor` (bagged trees) and `GradientBoostingRegressor`
//! (sequential residual fitting) provide the two non-linear model families
//! used by the prediction targets and the temperature ensemble.

mod helpers;

use crate::error::Result;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use helpers::{bootstrap_sample, build_regression_tree};
use serde::{Deserialize, Serialize};

/// Leaf node in a regression tree.
///
/// Contains the predicted value (mean of training samples) and the number
/// of training samples that reached this leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf (mean of y values)
    pub value: f32,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }
}

/// Decision tree regressor using the CART algorithm.
///
/// Splits minimize the post-split sum of squared errors; leaf nodes predict
/// the mean of their training targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionTreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
}

impl DecisionTreeRegressor {
    /// Creates a new decision tree regressor with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    /// Sets the maximum depth of the tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split an internal node.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Sets the minimum number of samples required at a leaf node.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Predicts the value for a single sample.
    fn predict_one(&self, x: &[f32]) -> f32 {
        let tree = self.tree.as_ref().expect("Model not fitted");

        let mut node = tree;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    if x[internal.feature_idx] <= internal.threshold {
                        node = &internal.left;
                    } else {
                        node = &internal.right;
                    }
                }
            }
        }
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for DecisionTreeRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_rows, _n_cols) = x.shape();
        if n_rows != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_rows == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.tree = Some(build_regression_tree(
            x,
            y.as_slice(),
            0,
            self.max_depth,
            self.min_samples_split,
            self.min_samples_leaf,
        ));
        Ok(())
    }

    /// Predicts target values for samples.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit`.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let (n_samples, n_features) = x.shape();
        let mut predictions = Vec::with_capacity(n_samples);

        for row in 0..n_samples {
            let mut sample = Vec::with_capacity(n_features);
            for col in 0..n_features {
                sample.push(x.get(row, col));
            }
            predictions.push(self.predict_one(&sample));
        }

        Vector::from_vec(predictions)
    }
}

/// Random Forest regressor.
///
/// Ensemble of decision trees trained on bootstrap samples; predictions are
/// averaged across trees to reduce variance.
///
/// # Examples
///
/// ```
/// use cultivar::prelude::*;
///
/// let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);
///
/// let mut rf = RandomForestRegressor::new(10).with_max_depth(5).with_random_state(42);
/// rf.fit(&x, &y).unwrap();
/// let predictions = rf.predict(&x);
/// assert_eq!(predictions.len(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
}

impl RandomForestRegressor {
    /// Creates a new Random Forest regressor with `n_estimators` trees.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the random state for reproducible bootstrap sampling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Returns the number of fitted trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Estimator for RandomForestRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.trees = Vec::with_capacity(self.n_estimators);

        for i in 0..self.n_estimators {
            // Offset per-tree seeds so trees differ but the forest is reproducible
            let seed = self.random_state.map(|s| s + i as u64);
            let bootstrap_indices = bootstrap_sample(n_samples, seed);

            let mut bootstrap_x_data = Vec::with_capacity(n_samples * n_features);
            let mut bootstrap_y_data = Vec::with_capacity(n_samples);
            for &idx in &bootstrap_indices {
                for j in 0..n_features {
                    bootstrap_x_data.push(x.get(idx, j));
                }
                bootstrap_y_data.push(y.as_slice()[idx]);
            }

            let bootstrap_x = Matrix::from_vec(n_samples, n_features, bootstrap_x_data)
                .map_err(|_| "Failed to create bootstrap matrix")?;
            let bootstrap_y = Vector::from_vec(bootstrap_y_data);

            let mut tree = if let Some(max_depth) = self.max_depth {
                DecisionTreeRegressor::new().with_max_depth(max_depth)
            } else {
                DecisionTreeRegressor::new()
            };

            tree.fit(&bootstrap_x, &bootstrap_y)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predicts by averaging over all trees.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit`.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        assert!(
            !self.trees.is_empty(),
            "Cannot predict with an unfitted Random Forest. Call fit() first."
        );

        let n_samples = x.shape().0;
        let mut predictions = vec![0.0; n_samples];

        for tree in &self.trees {
            let tree_preds = tree.predict(x);
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += tree_pred;
            }
        }

        let n_trees = self.trees.len() as f32;
        for pred in &mut predictions {
            *pred /= n_trees;
        }

        Vector::from_vec(predictions)
    }
}

/// Gradient Boosting regressor.
///
/// Builds trees sequentially, each fit to the residuals of the running
/// prediction, scaled by a shrinkage factor.
///
/// # Algorithm
///
/// 1. Initialize with the mean of the targets
/// 2. For each boosting iteration:
///    - Compute residuals `y - F(x)`
///    - Fit a small regression tree to the residuals
///    - Update `F(x) += learning_rate * tree(x)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    /// Number of boosting iterations (trees)
    n_estimators: usize,
    /// Learning rate (shrinkage parameter)
    learning_rate: f32,
    /// Maximum depth of each tree
    max_depth: usize,
    /// Initial prediction (mean of training targets)
    init_prediction: f32,
    /// Ensemble of fitted trees
    estimators: Vec<DecisionTreeRegressor>,
}

impl GradientBoostingRegressor {
    /// Creates a new Gradient Boosting regressor.
    ///
    /// # Default Parameters
    ///
    /// - `n_estimators`: 100
    /// - `learning_rate`: 0.1
    /// - `max_depth`: 3
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            init_prediction: 0.0,
            estimators: Vec::new(),
        }
    }

    /// Sets the number of boosting iterations (trees).
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the learning rate (shrinkage parameter).
    ///
    /// Lower values require more trees but often generalize better.
    /// Typical values: 0.01 - 0.3
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum depth of each tree.
    ///
    /// Smaller depths prevent overfitting. Typical values: 3-8
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the number of fitted estimators.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.estimators.len()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.estimators.is_empty()
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for GradientBoostingRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let n_samples = x.n_rows();
        if n_samples != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.init_prediction = y.mean();
        let mut current = vec![self.init_prediction; n_samples];
        self.estimators = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            let residuals: Vec<f32> = y
                .as_slice()
                .iter()
                .zip(current.iter())
                .map(|(&yi, &fi)| yi - fi)
                .collect();

            let mut tree = DecisionTreeRegressor::new().with_max_depth(self.max_depth);
            tree.fit(x, &Vector::from_vec(residuals))?;

            let tree_preds = tree.predict(x);
            for (fi, &delta) in current.iter_mut().zip(tree_preds.as_slice().iter()) {
                *fi += self.learning_rate * delta;
            }

            self.estimators.push(tree);
        }

        Ok(())
    }

    /// Predicts by summing shrunken tree contributions over the initial mean.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit`.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        assert!(
            !self.estimators.is_empty(),
            "Cannot predict with an unfitted Gradient Boosting model. Call fit() first."
        );

        let n_samples = x.n_rows();
        let mut predictions = vec![self.init_prediction; n_samples];

        for tree in &self.estimators {
            let tree_preds = tree.predict(x);
            for (pred, &delta) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += self.learning_rate * delta;
            }
        }

        Vector::from_vec(predictions)
    }
}
