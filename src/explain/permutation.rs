//! Model-agnostic Shapley values by permutation sampling
//!
//! Each sampled feature ordering walks from the background point to the
//! sample one feature at a time; the change in each class probability is
//! credited to the feature just switched. Every ordering is paired with its
//! reverse. Per-ordering credits telescope, so `base + Σ φ` reproduces the
//! sample's probability exactly whatever the number of orderings.

use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::types::ClassOutput;
use super::ExplainError;
use crate::model::Classifier;

/// Orderings sampled per explanation when not configured
pub const DEFAULT_PERMUTATIONS: usize = 10;

#[derive(Debug, Clone)]
pub struct PermutationExplainer {
    background: Array1<f64>,
    permutations: usize,
    seed: Option<u64>,
}

impl PermutationExplainer {
    pub fn new(background: Array1<f64>, permutations: usize, seed: Option<u64>) -> Self {
        Self {
            background,
            permutations: permutations.max(1),
            seed,
        }
    }

    /// Per-class contributions `[reliable, risky]` for one sample
    pub fn explain<C: Classifier>(&self, model: &C, x: ArrayView1<f64>) -> Result<ClassOutput, ExplainError> {
        let n = x.len();
        if n != self.background.len() {
            return Err(ExplainError::ShapeMismatch {
                expected: self.background.len(),
                got: n,
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let base = model.predict_proba(self.background.view())?;
        let mut phi = [vec![0.0; n], vec![0.0; n]];
        let mut order: Vec<usize> = (0..n).collect();

        for _ in 0..self.permutations {
            order.shuffle(&mut rng);
            self.accumulate(model, x, order.iter().copied(), base, &mut phi)?;
            self.accumulate(model, x, order.iter().rev().copied(), base, &mut phi)?;
        }

        let passes = (2 * self.permutations) as f64;
        let [reliable, risky] = phi;
        Ok(ClassOutput::PerClass {
            values: vec![
                reliable.into_iter().map(|v| v / passes).collect(),
                risky.into_iter().map(|v| v / passes).collect(),
            ],
            base: base.to_vec(),
        })
    }

    fn accumulate<C: Classifier>(
        &self,
        model: &C,
        x: ArrayView1<f64>,
        order: impl Iterator<Item = usize>,
        base: [f64; 2],
        phi: &mut [Vec<f64>; 2],
    ) -> Result<(), ExplainError> {
        let mut z = self.background.clone();
        let mut previous = base;

        for feature in order {
            z[feature] = x[feature];
            let current = model.predict_proba(z.view())?;
            for class in 0..2 {
                phi[class][feature] += current[class] - previous[class];
            }
            previous = current;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogisticModel, RISKY_CLASS};
    use ndarray::array;

    fn model() -> LogisticModel {
        LogisticModel { coefficients: vec![1.5, -2.0, 0.0], intercept: -0.25 }
    }

    fn risky(output: ClassOutput) -> (Vec<f64>, f64) {
        output.select(RISKY_CLASS).unwrap()
    }

    #[test]
    fn test_efficiency() {
        let explainer = PermutationExplainer::new(array![0.1, 0.2, 0.3], 4, None);
        let x = array![1.0, -0.5, 7.0];

        let (phi, base) = risky(explainer.explain(&model(), x.view()).unwrap());
        let p = model().predict_proba(x.view()).unwrap()[RISKY_CLASS];

        assert!((base + phi.iter().sum::<f64>() - p).abs() < 1e-12);
        // A zero-weight feature never moves the output
        assert!(phi[2].abs() < 1e-15);
    }

    #[test]
    fn test_classes_mirror_each_other() {
        let explainer = PermutationExplainer::new(Array1::zeros(3), 3, Some(7));
        let output = explainer.explain(&model(), array![0.4, 0.9, 1.0].view()).unwrap();

        match output {
            ClassOutput::PerClass { values, base } => {
                assert!((base[0] + base[1] - 1.0).abs() < 1e-12);
                for (a, b) in values[0].iter().zip(&values[1]) {
                    assert!((a + b).abs() < 1e-12);
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let explainer = PermutationExplainer::new(Array1::zeros(3), 2, Some(42));
        let x = array![2.0, 1.0, -1.0];
        assert_eq!(
            explainer.explain(&model(), x.view()).unwrap(),
            explainer.explain(&model(), x.view()).unwrap()
        );
    }

    #[test]
    fn test_two_features_are_exact() {
        // With two features an ordering and its reverse cover every coalition
        let model = LogisticModel { coefficients: vec![1.0, 1.0], intercept: 0.0 };
        let explainer = PermutationExplainer::new(Array1::zeros(2), 1, Some(1));
        let (phi, _) = risky(explainer.explain(&model, array![2.0, 2.0].view()).unwrap());
        assert!((phi[0] - phi[1]).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_length() {
        let explainer = PermutationExplainer::new(Array1::zeros(2), 1, None);
        assert!(matches!(
            explainer.explain(&model(), array![1.0, 2.0, 3.0].view()),
            Err(ExplainError::ShapeMismatch { expected: 2, got: 3 })
        ));
    }
}
