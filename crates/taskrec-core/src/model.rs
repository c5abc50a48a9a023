//! Optional completion-probability model.
//!
//! The ranker only asks one question of a model: "given these features, what
//! is the probability the task gets completed?" A model may decline to
//! answer (e.g. it was fitted on a single class), in which case ranking
//! proceeds without it.

use serde::{Deserialize, Serialize};

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 4;

/// Model inputs, in the order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionFeatures {
    pub perf_score: f64,
    pub hour_of_day: u32,
    pub difficulty: u8,
    /// Category completion when training; goal score when ranking
    pub category_signal: f64,
}

impl CompletionFeatures {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.perf_score,
            f64::from(self.hour_of_day),
            f64::from(self.difficulty),
            self.category_signal,
        ]
    }
}

/// Answer from a completion model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    /// Probability of the "completed" class, 0.0..=1.0
    Probability(f64),
    /// The model cannot tell completed from not completed
    Unavailable,
}

impl Prediction {
    pub fn probability(self) -> Option<f64> {
        match self {
            Prediction::Probability(p) => Some(p),
            Prediction::Unavailable => None,
        }
    }
}

/// A binary classifier estimating task completion.
pub trait CompletionModel {
    fn predict(&self, features: &CompletionFeatures) -> Prediction;
}

impl<M: CompletionModel + ?Sized> CompletionModel for &M {
    fn predict(&self, features: &CompletionFeatures) -> Prediction {
        (**self).predict(features)
    }
}

impl<M: CompletionModel + ?Sized> CompletionModel for Box<M> {
    fn predict(&self, features: &CompletionFeatures) -> Prediction {
        (**self).predict(features)
    }
}
