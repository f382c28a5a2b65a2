//! Exact path-dependent TreeSHAP (Lundberg et al., Algorithm 2)
//!
//! Runs in O(leaves · depth²) per tree. Contributions are on the raw margin
//! (log-odds) scale; the baseline is the cover-weighted expected margin, so
//! `base + Σ φ` equals the ensemble's decision value for the sample.

use ndarray::ArrayView1;

use super::types::ClassOutput;
use super::ExplainError;
use crate::model::tree::goes_left;
use crate::model::{ModelError, Node, Tree, TreeEnsemble};

#[derive(Debug, Clone, Copy)]
struct PathElement {
    /// Split feature, `None` for the root placeholder
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

impl Default for PathElement {
    fn default() -> Self {
        Self { feature: None, zero_fraction: 0.0, one_fraction: 0.0, pweight: 0.0 }
    }
}

/// Explain one sample against the whole ensemble
pub fn tree_shap(ensemble: &TreeEnsemble, x: ArrayView1<f64>) -> Result<ClassOutput, ExplainError> {
    let mut phi = vec![0.0; x.len()];
    for tree in &ensemble.trees {
        let mut walker = TreeWalker { tree, x, phi: &mut phi };
        walker.recurse(0, &[], 0, 1.0, 1.0, None)?;
    }

    Ok(ClassOutput::Single {
        values: phi,
        base: ensemble.expected_margin(),
    })
}

struct TreeWalker<'a, 'x> {
    tree: &'a Tree,
    x: ArrayView1<'x, f64>,
    phi: &'a mut Vec<f64>,
}

impl TreeWalker<'_, '_> {
    fn recurse(
        &mut self,
        node_index: usize,
        parent_path: &[PathElement],
        mut unique_depth: usize,
        zero_fraction: f64,
        one_fraction: f64,
        feature: Option<usize>,
    ) -> Result<(), ExplainError> {
        let mut path = Vec::with_capacity(unique_depth + 2);
        path.extend_from_slice(&parent_path[..unique_depth]);
        path.push(PathElement::default());
        extend_path(&mut path, unique_depth, zero_fraction, one_fraction, feature);

        let tree = self.tree;
        match &tree.nodes[node_index] {
            Node::Leaf { value, .. } => {
                for i in 1..=unique_depth {
                    let weight = unwound_path_sum(&path, unique_depth, i);
                    let element = path[i];
                    if let Some(f) = element.feature {
                        self.phi[f] += weight * (element.one_fraction - element.zero_fraction) * value;
                    }
                }
                Ok(())
            }
            Node::Split { feature: split, threshold, left, right, default_left, .. } => {
                let split = *split;
                let value = *self.x.get(split).ok_or(ModelError::FeatureOutOfRange {
                    index: split,
                    len: self.x.len(),
                })?;
                let (hot, cold) = if goes_left(value, *threshold, *default_left) {
                    (*left, *right)
                } else {
                    (*right, *left)
                };

                let hot_cover = tree.nodes[hot].cover();
                let cold_cover = tree.nodes[cold].cover();
                let total_cover = hot_cover + cold_cover;

                let mut incoming_zero = 1.0;
                let mut incoming_one = 1.0;

                // A feature already on the path is unwound before re-entering
                if let Some(k) = (0..=unique_depth).find(|&k| path[k].feature == Some(split)) {
                    incoming_zero = path[k].zero_fraction;
                    incoming_one = path[k].one_fraction;
                    unwind_path(&mut path, unique_depth, k);
                    unique_depth -= 1;
                }

                self.recurse(
                    hot,
                    &path,
                    unique_depth + 1,
                    hot_cover / total_cover * incoming_zero,
                    incoming_one,
                    Some(split),
                )?;
                self.recurse(
                    cold,
                    &path,
                    unique_depth + 1,
                    cold_cover / total_cover * incoming_zero,
                    0.0,
                    Some(split),
                )
            }
        }
    }
}

fn extend_path(
    path: &mut [PathElement],
    unique_depth: usize,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    path[unique_depth] = PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if unique_depth == 0 { 1.0 } else { 0.0 },
    };

    let depth = unique_depth as f64;
    for i in (0..unique_depth).rev() {
        let fi = i as f64;
        path[i + 1].pweight += one_fraction * path[i].pweight * (fi + 1.0) / (depth + 1.0);
        path[i].pweight = zero_fraction * path[i].pweight * (depth - fi) / (depth + 1.0);
    }
}

fn unwind_path(path: &mut [PathElement], unique_depth: usize, path_index: usize) {
    let one_fraction = path[path_index].one_fraction;
    let zero_fraction = path[path_index].zero_fraction;
    let mut next_one_portion = path[unique_depth].pweight;

    let depth = unique_depth as f64;
    for i in (0..unique_depth).rev() {
        let fi = i as f64;
        if one_fraction != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one_portion * (depth + 1.0) / ((fi + 1.0) * one_fraction);
            next_one_portion = tmp - path[i].pweight * zero_fraction * (depth - fi) / (depth + 1.0);
        } else {
            path[i].pweight = path[i].pweight * (depth + 1.0) / (zero_fraction * (depth - fi));
        }
    }

    for i in path_index..unique_depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
}

fn unwound_path_sum(path: &[PathElement], unique_depth: usize, path_index: usize) -> f64 {
    let one_fraction = path[path_index].one_fraction;
    let zero_fraction = path[path_index].zero_fraction;
    let mut next_one_portion = path[unique_depth].pweight;
    let mut total = 0.0;

    let depth = unique_depth as f64;
    for i in (0..unique_depth).rev() {
        let fi = i as f64;
        if one_fraction != 0.0 {
            let tmp = next_one_portion * (depth + 1.0) / ((fi + 1.0) * one_fraction);
            total += tmp;
            next_one_portion = path[i].pweight - tmp * zero_fraction * ((depth - fi) / (depth + 1.0));
        } else if zero_fraction != 0.0 {
            total += (path[i].pweight / zero_fraction) / ((depth - fi) / (depth + 1.0));
        }
    }

    total
}
