//! Policy/value oracles consulted by the tree search.
//!
//! In AlphaZero-style training this is a neural network; the network itself
//! lives outside this crate. The search only needs something that maps an
//! encoded position onto a move distribution and a value.

use crate::dataset::Dataset;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// Errors raised by an evaluator or by validating its output.
#[derive(Debug, Error, PartialEq)]
pub enum EvaluatorError {
    #[error("policy has {actual} entries, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("evaluator returned a non-finite number")]
    NonFinite,

    #[error("value {0} is outside [-1, 1]")]
    ValueOutOfRange(f32),

    #[error("policy entry {index} is negative ({probability})")]
    NegativeProbability { index: usize, probability: f32 },

    #[error("position is not in the table")]
    UnknownPosition,
}

/// Output of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// One probability per policy index. Illegal moves may carry mass; the
    /// search discards it and rescales the rest.
    pub policy: Vec<f32>,

    /// Expected result for the side to move, in `[-1, 1]`.
    pub value: f32,
}

impl Evaluation {
    /// Rejects output the search must never act on.
    pub fn validate(&self, actions: usize) -> Result<(), EvaluatorError> {
        if self.policy.len() != actions {
            return Err(EvaluatorError::WrongLength {
                expected: actions,
                actual: self.policy.len(),
            });
        }
        if !self.value.is_finite() || self.policy.iter().any(|p| !p.is_finite()) {
            return Err(EvaluatorError::NonFinite);
        }
        if !(-1.0..=1.0).contains(&self.value) {
            return Err(EvaluatorError::ValueOutOfRange(self.value));
        }
        if let Some((index, &probability)) =
            self.policy.iter().enumerate().find(|(_, p)| **p < 0.0)
        {
            return Err(EvaluatorError::NegativeProbability { index, probability });
        }
        Ok(())
    }
}

/// Trait for position evaluators.
///
/// Implementations must be deterministic for a fixed input.
pub trait Evaluator<F> {
    fn evaluate(&self, features: &F) -> Result<Evaluation, EvaluatorError>;
}

impl<F, E: Evaluator<F> + ?Sized> Evaluator<F> for &E {
    fn evaluate(&self, features: &F) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(features)
    }
}

/// Spreads the policy evenly over the whole action space and calls every position even.
#[derive(Debug, Clone, Copy)]
pub struct UniformEvaluator {
    actions: usize,
}

impl UniformEvaluator {
    pub fn new(actions: usize) -> Self {
        Self { actions }
    }
}

impl<F> Evaluator<F> for UniformEvaluator {
    fn evaluate(&self, _features: &F) -> Result<Evaluation, EvaluatorError> {
        let p = 1.0 / self.actions as f32;
        Ok(Evaluation {
            policy: vec![p; self.actions],
            value: 0.0,
        })
    }
}

/// Answers from a solved dataset, such as the one [`crate::negamax`] produces.
///
/// This is what a network trained to memorise every position converges to.
#[derive(Debug, Clone)]
pub struct TablebaseEvaluator<F: Eq + Hash> {
    entries: HashMap<F, Evaluation>,
}

impl<F: Clone + Eq + Hash> TablebaseEvaluator<F> {
    /// Indexes a dataset by position. The first example seen for a position wins.
    pub fn from_dataset(dataset: &Dataset<F>) -> Self {
        let mut entries = HashMap::with_capacity(dataset.len());
        for (position, policy, value) in dataset.iter() {
            entries
                .entry(position.clone())
                .or_insert_with(|| Evaluation {
                    policy: policy.to_vec(),
                    value,
                });
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: Eq + Hash> Evaluator<F> for TablebaseEvaluator<F> {
    fn evaluate(&self, features: &F) -> Result<Evaluation, EvaluatorError> {
        self.entries
            .get(features)
            .cloned()
            .ok_or(EvaluatorError::UnknownPosition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_evaluator_spreads_mass_evenly() {
        let eval = UniformEvaluator::new(4);
        let result = eval.evaluate(&[0u8; 18]).unwrap();

        assert_eq!(result.policy.len(), 4);
        for p in &result.policy {
            assert!((p - 0.25).abs() < 1e-6);
        }
        assert!(result.value.abs() < 1e-6);
        assert_eq!(result.validate(4), Ok(()));
    }

    #[test]
    fn validate_rejects_wrong_length() {
        let eval = Evaluation {
            policy: vec![0.5, 0.5],
            value: 0.0,
        };
        assert_eq!(
            eval.validate(3),
            Err(EvaluatorError::WrongLength {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn validate_rejects_non_finite_output() {
        let nan_policy = Evaluation {
            policy: vec![f32::NAN, 1.0],
            value: 0.0,
        };
        let infinite_value = Evaluation {
            policy: vec![0.5, 0.5],
            value: f32::INFINITY,
        };
        assert_eq!(nan_policy.validate(2), Err(EvaluatorError::NonFinite));
        assert_eq!(infinite_value.validate(2), Err(EvaluatorError::NonFinite));
    }

    #[test]
    fn validate_rejects_out_of_range_output() {
        let big_value = Evaluation {
            policy: vec![0.5, 0.5],
            value: 1.5,
        };
        let negative = Evaluation {
            policy: vec![1.5, -0.5],
            value: 0.0,
        };
        assert_eq!(
            big_value.validate(2),
            Err(EvaluatorError::ValueOutOfRange(1.5))
        );
        assert_eq!(
            negative.validate(2),
            Err(EvaluatorError::NegativeProbability {
                index: 1,
                probability: -0.5
            })
        );
    }

    #[test]
    fn tablebase_answers_known_positions_only() {
        // arrange
        let mut dataset = Dataset::new();
        dataset.push([1u8, 0], vec![0.0, 1.0], -1.0);
        dataset.push([1u8, 0], vec![1.0, 0.0], 1.0);
        let table = TablebaseEvaluator::from_dataset(&dataset);

        // act
        let known = table.evaluate(&[1u8, 0]);
        let unknown = table.evaluate(&[0u8, 1]);

        // assert
        assert_eq!(table.len(), 1);
        assert_eq!(
            known,
            Ok(Evaluation {
                policy: vec![0.0, 1.0],
                value: -1.0
            })
        );
        assert_eq!(unknown, Err(EvaluatorError::UnknownPosition));
    }
}
