use serde::{Deserialize, Serialize};

use super::ExplainError;

/// Attribution method behind an explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplainerKind {
    /// Exact path-dependent TreeSHAP, log-odds scale
    Tree,
    /// Sampled permutation Shapley values, probability scale
    Permutation,
}

/// Raw explainer output, before the risky class is selected
#[derive(Debug, Clone, PartialEq)]
pub enum ClassOutput {
    Single { values: Vec<f64>, base: f64 },
    PerClass { values: Vec<Vec<f64>>, base: Vec<f64> },
}

impl ClassOutput {
    /// Keep the contributions of one class
    pub fn select(self, class: usize) -> Result<(Vec<f64>, f64), ExplainError> {
        match self {
            ClassOutput::Single { values, base } => Ok((values, base)),
            ClassOutput::PerClass { mut values, base } => {
                let available = values.len().min(base.len());
                if class >= available {
                    return Err(ExplainError::MissingClass { class, available });
                }
                Ok((values.swap_remove(class), base[class]))
            }
        }
    }
}

/// Local explanation of one sample, aligned with the feature list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub values: Vec<f64>,
    pub base_value: f64,
    pub sample: Vec<f64>,
    pub method: ExplainerKind,
}

impl Attribution {
    /// Model output reconstructed from the baseline and contributions
    pub fn output(&self) -> f64 {
        self.base_value + self.values.iter().sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_risky_class() {
        let output = ClassOutput::PerClass {
            values: vec![vec![-0.1, 0.2], vec![0.1, -0.2]],
            base: vec![0.7, 0.3],
        };
        let (values, base) = output.select(1).unwrap();
        assert_eq!(values, vec![0.1, -0.2]);
        assert_eq!(base, 0.3);
    }

    #[test]
    fn test_single_output_passes_through() {
        let output = ClassOutput::Single { values: vec![1.0], base: -2.0 };
        assert_eq!(output.select(1).unwrap(), (vec![1.0], -2.0));
    }

    #[test]
    fn test_missing_class() {
        let output = ClassOutput::PerClass { values: vec![vec![0.0]], base: vec![0.5] };
        assert!(matches!(
            output.select(1),
            Err(ExplainError::MissingClass { class: 1, available: 1 })
        ));
    }
}
