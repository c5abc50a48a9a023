//! Offline training of the completion model.
//!
//! Pipeline over [`TaskEvent`]s:
//! 1. balance classes by down-sampling the majority (seeded, reproducible)
//! 2. temporal split 70/15/15 on `started_at`
//! 3. fit on train, report validation AUC
//! 4. refit on train + validation, report test AUC
//!
//! The model is a small logistic regression over standardized features,
//! fitted by full-batch gradient descent so results are deterministic.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{CoreError, ModelError};
use crate::features::TaskEvent;
use crate::model::{CompletionFeatures, CompletionModel, Prediction, FEATURE_COUNT};

/// Fitting parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub iterations: usize,
    pub learning_rate: f64,
    /// L2 penalty on weights (not the bias)
    pub l2: f64,
    /// Seed for class balancing
    pub seed: u64,
    /// Upper quantile of `started_at` kept for training
    pub train_quantile: f64,
    /// Upper quantile kept for validation
    pub validation_quantile: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            learning_rate: 0.1,
            l2: 0.01,
            seed: 42,
            train_quantile: 0.70,
            validation_quantile: 0.85,
        }
    }
}

/// Down-sample the majority class so both classes have the same size.
///
/// Returns the input unchanged when either class is empty. Sampled
/// positives come first, then sampled negatives.
pub fn balance_classes(events: &[TaskEvent], seed: u64) -> Vec<TaskEvent> {
    let (pos, neg): (Vec<&TaskEvent>, Vec<&TaskEvent>) = events.iter().partition(|e| e.completed);
    if pos.is_empty() || neg.is_empty() {
        return events.to_vec();
    }

    let n = pos.len().min(neg.len());
    let mut rng = Mcg128Xsl64::seed_from_u64(seed);
    let mut sample = |group: &[&TaskEvent]| -> Vec<TaskEvent> {
        let mut picked: Vec<usize> = (0..group.len()).choose_multiple(&mut rng, n);
        picked.sort_unstable();
        picked.into_iter().map(|i| group[i].clone()).collect()
    };

    let mut balanced = sample(&pos);
    balanced.extend(sample(&neg));
    balanced
}

/// Linear-interpolated quantile of event start times (epoch seconds).
fn start_quantile(sorted_secs: &[i64], q: f64) -> f64 {
    let last = sorted_secs.len() - 1;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted_secs[lo] as f64 + (sorted_secs[hi] - sorted_secs[lo]) as f64 * frac
}

/// Events partitioned by start time.
#[derive(Debug, Clone, Default)]
pub struct TemporalSplit {
    pub train: Vec<TaskEvent>,
    pub validation: Vec<TaskEvent>,
    pub test: Vec<TaskEvent>,
}

/// Split on start-time quantiles: `<= q_train`, `(q_train, q_valid]`, `> q_valid`.
pub fn temporal_split(events: &[TaskEvent], train_quantile: f64, validation_quantile: f64) -> TemporalSplit {
    if events.is_empty() {
        return TemporalSplit::default();
    }

    let mut secs: Vec<i64> = events.iter().map(|e| e.started_at.timestamp()).collect();
    secs.sort_unstable();
    let cut_train = start_quantile(&secs, train_quantile);
    let cut_valid = start_quantile(&secs, validation_quantile);

    let mut split = TemporalSplit::default();
    for event in events {
        let t = event.started_at.timestamp() as f64;
        if t <= cut_train {
            split.train.push(event.clone());
        } else if t <= cut_valid {
            split.validation.push(event.clone());
        } else {
            split.test.push(event.clone());
        }
    }
    split
}

/// Area under the ROC curve, or `None` unless both classes are present.
///
/// Uses the rank-sum formulation; tied scores share their average rank.
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Option<f64> {
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 || labels.len() != scores.len() {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // ranks are 1-based
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(l, _)| **l)
        .map(|(_, r)| r)
        .sum();
    let p = positives as f64;
    let n = negatives as f64;
    Some((pos_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Logistic-regression completion model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
    weights: [f64; FEATURE_COUNT],
    bias: f64,
    /// Set when every training row had the same label
    single_class: Option<bool>,
}

impl LogisticModel {
    /// Fit on `(features, completed)` rows.
    ///
    /// # Errors
    /// Fails on an empty training set. A single-class set fits fine but the
    /// model then answers [`Prediction::Unavailable`].
    pub fn fit(rows: &[(CompletionFeatures, bool)], config: &TrainingConfig) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let n = rows.len() as f64;
        let xs: Vec<[f64; FEATURE_COUNT]> = rows.iter().map(|(f, _)| f.to_array()).collect();
        let ys: Vec<f64> = rows.iter().map(|(_, y)| if *y { 1.0 } else { 0.0 }).collect();

        let mut means = [0.0; FEATURE_COUNT];
        let mut scales = [1.0; FEATURE_COUNT];
        for k in 0..FEATURE_COUNT {
            means[k] = xs.iter().map(|x| x[k]).sum::<f64>() / n;
            let var = xs.iter().map(|x| (x[k] - means[k]).powi(2)).sum::<f64>() / n;
            if var > 0.0 {
                scales[k] = var.sqrt();
            }
        }

        let first = rows[0].1;
        let single_class = rows.iter().all(|(_, y)| *y == first).then_some(first);
        if single_class.is_some() {
            warn!(rows = rows.len(), "training set has a single class; model will not score");
        }

        let standardized: Vec<[f64; FEATURE_COUNT]> = xs
            .iter()
            .map(|x| {
                let mut z = [0.0; FEATURE_COUNT];
                for k in 0..FEATURE_COUNT {
                    z[k] = (x[k] - means[k]) / scales[k];
                }
                z
            })
            .collect();

        let mut weights = [0.0; FEATURE_COUNT];
        let mut bias = 0.0;
        for _ in 0..config.iterations {
            let mut grad_w = [0.0; FEATURE_COUNT];
            let mut grad_b = 0.0;
            for (z, y) in standardized.iter().zip(&ys) {
                let p = sigmoid(bias + (0..FEATURE_COUNT).map(|k| weights[k] * z[k]).sum::<f64>());
                let err = p - y;
                for k in 0..FEATURE_COUNT {
                    grad_w[k] += err * z[k];
                }
                grad_b += err;
            }
            for k in 0..FEATURE_COUNT {
                weights[k] -= config.learning_rate * (grad_w[k] / n + config.l2 * weights[k]);
            }
            bias -= config.learning_rate * grad_b / n;
        }

        debug!(rows = rows.len(), ?weights, bias, "fitted completion model");
        Ok(Self {
            means,
            scales,
            weights,
            bias,
            single_class,
        })
    }

    /// Whether the model distinguishes both classes.
    pub fn is_usable(&self) -> bool {
        self.single_class.is_none()
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl CompletionModel for LogisticModel {
    fn predict(&self, features: &CompletionFeatures) -> Prediction {
        if !self.is_usable() {
            return Prediction::Unavailable;
        }
        let x = features.to_array();
        let z: f64 = (0..FEATURE_COUNT)
            .map(|k| self.weights[k] * (x[k] - self.means[k]) / self.scales[k])
            .sum();
        Prediction::Probability(sigmoid(self.bias + z))
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub events: usize,
    pub balanced_events: usize,
    pub train_rows: usize,
    pub validation_rows: usize,
    pub test_rows: usize,
    /// `None` when the slice is missing a class
    pub validation_auc: Option<f64>,
    pub test_auc: Option<f64>,
}

fn rows(events: &[TaskEvent]) -> Vec<(CompletionFeatures, bool)> {
    events.iter().map(|e| (e.features(), e.completed)).collect()
}

/// Score a slice; an unusable model scores every row 0.
fn evaluate(model: &LogisticModel, events: &[TaskEvent]) -> Option<f64> {
    let labels: Vec<bool> = events.iter().map(|e| e.completed).collect();
    let scores: Vec<f64> = events
        .iter()
        .map(|e| model.predict(&e.features()).probability().unwrap_or(0.0))
        .collect();
    roc_auc(&labels, &scores)
}

/// Run the full pipeline and return the model refitted on train + validation.
pub fn train_completion_model(
    events: &[TaskEvent],
    config: &TrainingConfig,
) -> Result<(LogisticModel, TrainingReport), ModelError> {
    let balanced = balance_classes(events, config.seed);
    let split = temporal_split(&balanced, config.train_quantile, config.validation_quantile);

    let model = LogisticModel::fit(&rows(&split.train), config)?;
    let validation_auc = evaluate(&model, &split.validation);

    let mut combined = split.train.clone();
    combined.extend(split.validation.iter().cloned());
    let model = LogisticModel::fit(&rows(&combined), config)?;
    let test_auc = evaluate(&model, &split.test);

    let report = TrainingReport {
        events: events.len(),
        balanced_events: balanced.len(),
        train_rows: split.train.len(),
        validation_rows: split.validation.len(),
        test_rows: split.test.len(),
        validation_auc,
        test_auc,
    };
    Ok((model, report))
}
