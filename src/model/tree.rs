//! Gradient-boosted tree ensemble
//!
//! Trees are stored as flat node arrays (node 0 is the root), the layout
//! LightGBM and XGBoost dumps convert to without loss. A row goes left when
//! `x[feature] <= threshold`; missing values (NaN) follow `default_left`.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::{Classifier, ModelError};

/// Tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
        /// Training samples (or hessian sum) reaching this node
        cover: f64,
    },
    Leaf {
        value: f64,
        cover: f64,
    },
}

impl Node {
    pub fn cover(&self) -> f64 {
        match self {
            Node::Split { cover, .. } | Node::Leaf { cover, .. } => *cover,
        }
    }
}

/// Routing decision for one split
pub(crate) fn goes_left(value: f64, threshold: f64, default_left: bool) -> bool {
    if value.is_nan() {
        default_left
    } else {
        value <= threshold
    }
}

/// Single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Leaf-only tree
    pub fn constant(value: f64) -> Self {
        Self {
            nodes: vec![Node::Leaf { value, cover: 1.0 }],
        }
    }

    fn validate(&self, index: usize, n_features: usize) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::InvalidTree { tree: index, reason };

        if self.nodes.is_empty() {
            return Err(invalid("tree has no nodes".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let cover = node.cover();
            if !cover.is_finite() || cover <= 0.0 {
                return Err(invalid(format!("node {} has non-positive cover {}", i, cover)));
            }

            match node {
                Node::Split { feature, threshold, left, right, .. } => {
                    if *feature >= n_features {
                        return Err(invalid(format!(
                            "node {} splits on feature {} but only {} features exist",
                            i, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(invalid(format!("node {} has a NaN threshold", i)));
                    }
                    // Children after their parent keeps every path finite
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(invalid(format!("node {} has invalid child {}", i, child)));
                        }
                    }
                }
                Node::Leaf { value, .. } => {
                    if !value.is_finite() {
                        return Err(invalid(format!("leaf {} has non-finite value", i)));
                    }
                }
            }
        }

        Ok(())
    }

    /// Value of the leaf reached by `x`
    pub fn leaf_value(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value, .. } => return Ok(*value),
                Node::Split { feature, threshold, left, right, default_left, .. } => {
                    let value = *x.get(*feature).ok_or(ModelError::FeatureOutOfRange {
                        index: *feature,
                        len: x.len(),
                    })?;
                    index = if goes_left(value, *threshold, *default_left) { *left } else { *right };
                }
            }
        }
    }

    /// Cover-weighted mean of the leaves, i.e. the tree output expected over
    /// the training distribution
    pub fn expected_value(&self) -> f64 {
        self.node_expectation(0)
    }

    fn node_expectation(&self, index: usize) -> f64 {
        match &self.nodes[index] {
            Node::Leaf { value, .. } => *value,
            Node::Split { left, right, .. } => {
                let left_cover = self.nodes[*left].cover();
                let right_cover = self.nodes[*right].cover();
                (left_cover * self.node_expectation(*left) + right_cover * self.node_expectation(*right))
                    / (left_cover + right_cover)
            }
        }
    }
}

/// Additive ensemble of trees on the log-odds scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Initial raw score added to every prediction
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if !self.base_score.is_finite() {
            return Err(ModelError::NonFiniteParameter("base_score"));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, n_features)?;
        }
        Ok(())
    }

    /// Expected raw margin (the TreeSHAP baseline)
    pub fn expected_margin(&self) -> f64 {
        self.base_score + self.trees.iter().map(Tree::expected_value).sum::<f64>()
    }
}

impl Classifier for TreeEnsemble {
    fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.leaf_value(x)?;
        }
        Ok(margin)
    }
}
