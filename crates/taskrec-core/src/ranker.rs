//! Task ranking.
//!
//! Every catalog task gets a priority score from the current performance
//! score and its category's goal score, optionally scaled by a completion
//! model. Output is sorted descending; equal scores keep catalog order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{TaskCatalog, TaskDefinition};
use crate::error::ConfigError;
use crate::model::{CompletionFeatures, CompletionModel, Prediction};
use crate::storage::RankingConfig;

/// Goal score for categories without a tracked goal.
pub const DEFAULT_GOAL_SCORE: f64 = 0.5;

/// Performance/goal weights. Always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    performance: f64,
    goal: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            performance: 0.4,
            goal: 0.6,
        }
    }
}

impl RankingWeights {
    /// Normalize two non-negative weights to sum to 1.
    pub fn normalized(performance: f64, goal: f64) -> Result<Self, ConfigError> {
        let total = performance + goal;
        if performance < 0.0 || goal < 0.0 || !total.is_finite() || total <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "ranking".to_string(),
                message: format!("cannot normalize weights {performance} and {goal}"),
            });
        }
        Ok(Self {
            performance: performance / total,
            goal: goal / total,
        })
    }

    pub fn from_config(config: &RankingConfig) -> Result<Self, ConfigError> {
        Self::normalized(config.performance_weight, config.goal_weight)
    }

    pub fn performance(&self) -> f64 {
        self.performance
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }
}

/// A ranked task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub task_name: String,
    pub category: String,
    pub difficulty: u8,
    /// Hours
    pub estimated_duration: f64,
    pub priority_score: f64,
    pub reasoning: String,
    /// Model probability when one was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_probability: Option<f64>,
}

/// Difficulty multiplier: easier tasks get a boost when performance is low.
pub fn difficulty_adjustment(perf_score: f64, difficulty: u8) -> f64 {
    if perf_score < 0.5 {
        1.3 - 0.1 * f64::from(difficulty)
    } else {
        1.0
    }
}

fn reasoning(perf_score: f64, goal_score: f64, task: &TaskDefinition) -> Vec<String> {
    let mut reasons = Vec::with_capacity(4);

    reasons.push(
        if perf_score >= 0.8 {
            "You're performing well recently"
        } else if perf_score >= 0.5 {
            "Your recent performance is okay"
        } else {
            "You're behind on recent daily targets"
        }
        .to_string(),
    );

    let category = &task.category;
    reasons.push(if goal_score >= 0.8 {
        format!("{category} is a high priority this week")
    } else if goal_score >= 0.5 {
        format!("{category} needs attention this week")
    } else {
        format!("{category} goal is on track")
    });

    if task.difficulty <= 2 && perf_score < 0.5 {
        reasons.push("Easy task good for low-energy periods".to_string());
    } else if task.difficulty >= 4 && perf_score >= 0.8 {
        reasons.push("Challenging task while you're on a roll".to_string());
    }

    reasons
}

/// Scores and orders catalog tasks.
#[derive(Debug, Clone, Default)]
pub struct PriorityRanker {
    weights: RankingWeights,
}

impl PriorityRanker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> RankingWeights {
        self.weights
    }

    /// Replace the weights, normalized.
    pub fn update_weights(&mut self, performance: f64, goal: f64) -> Result<(), ConfigError> {
        self.weights = RankingWeights::normalized(performance, goal)?;
        Ok(())
    }

    /// One recommendation per catalog task, best first.
    pub fn rank(
        &self,
        perf_score: f64,
        goal_scores: &IndexMap<String, f64>,
        catalog: &TaskCatalog,
        model: Option<&dyn CompletionModel>,
        hour_now: u32,
    ) -> Vec<Recommendation> {
        let mut unavailable_logged = false;

        let mut ranked: Vec<Recommendation> = catalog
            .all()
            .map(|task| {
                let goal_score = goal_scores
                    .get(&task.category)
                    .copied()
                    .unwrap_or(DEFAULT_GOAL_SCORE);
                let base = (self.weights.performance * perf_score + self.weights.goal * goal_score)
                    * difficulty_adjustment(perf_score, task.difficulty);

                let mut reasons = reasoning(perf_score, goal_score, task);
                let prediction = match model {
                    Some(m) => m.predict(&CompletionFeatures {
                        perf_score,
                        hour_of_day: hour_now,
                        difficulty: task.difficulty,
                        category_signal: goal_score,
                    }),
                    None => Prediction::Unavailable,
                };

                let (priority_score, model_probability) = match prediction {
                    Prediction::Probability(p) => {
                        reasons.push(format!("{:.0}% predicted completion", p * 100.0));
                        (base * p, Some(p))
                    }
                    Prediction::Unavailable => {
                        if model.is_some() {
                            if !unavailable_logged {
                                warn!("completion model cannot score; ranking unscaled");
                                unavailable_logged = true;
                            }
                            reasons.push("Completion model untrained; score not adjusted".to_string());
                        } else {
                            reasons.push("No completion model; score not adjusted".to_string());
                        }
                        (base, None)
                    }
                };

                Recommendation {
                    task_name: task.name.clone(),
                    category: task.category.clone(),
                    difficulty: task.difficulty,
                    estimated_duration: task.estimated_duration,
                    priority_score,
                    reasoning: reasons.join(" • "),
                    model_probability,
                }
            })
            .collect();

        // sort_by is stable, so ties stay in catalog order
        ranked.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

        debug!(
            tasks = ranked.len(),
            perf_score,
            top = ranked.first().map(|r| r.task_name.as_str()),
            "ranked tasks"
        );
        ranked
    }

    /// The first `limit` recommendations.
    pub fn top(
        &self,
        perf_score: f64,
        goal_scores: &IndexMap<String, f64>,
        catalog: &TaskCatalog,
        model: Option<&dyn CompletionModel>,
        hour_now: u32,
        limit: usize,
    ) -> Vec<Recommendation> {
        let mut ranked = self.rank(perf_score, goal_scores, catalog, model, hour_now);
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Prediction);

    impl CompletionModel for Fixed {
        fn predict(&self, _: &CompletionFeatures) -> Prediction {
            self.0
        }
    }

    /// Scores by difficulty so the model can reorder tasks.
    struct PrefersEasy;

    impl CompletionModel for PrefersEasy {
        fn predict(&self, f: &CompletionFeatures) -> Prediction {
            Prediction::Probability(1.0 - f64::from(f.difficulty) / 10.0)
        }
    }

    fn catalog() -> TaskCatalog {
        TaskCatalog::from_tasks([
            TaskDefinition::new("Leetcode", "Coding", 2, 1.0),
            TaskDefinition::new("Paper", "Research", 4, 2.0),
            TaskDefinition::new("Run", "Fitness", 3, 0.5),
        ])
        .unwrap()
    }

    fn goal_scores() -> IndexMap<String, f64> {
        IndexMap::from([("Coding".to_string(), 0.96), ("Research".to_string(), 0.2)])
    }

    #[test]
    fn high_performer_scenario_scores_0936() {
        let ranked = PriorityRanker::default().rank(0.9, &goal_scores(), &catalog(), None, 10);
        let top = &ranked[0];
        assert_eq!(top.task_name, "Leetcode");
        assert!((top.priority_score - 0.936).abs() < 1e-12);
        assert_eq!(top.model_probability, None);
        assert!(top.reasoning.starts_with("You're performing well recently • Coding is a high priority this week"));
        assert!(top.reasoning.contains("No completion model"));
    }

    #[test]
    fn unknown_category_uses_neutral_goal() {
        let ranked = PriorityRanker::default().rank(0.9, &goal_scores(), &catalog(), None, 10);
        let run = ranked.iter().find(|r| r.task_name == "Run").unwrap();
        assert!((run.priority_score - (0.4 * 0.9 + 0.6 * 0.5)).abs() < 1e-12);
        assert!(run.reasoning.contains("Fitness needs attention this week"));
    }

    #[test]
    fn low_performance_favours_easy_tasks() {
        assert!((difficulty_adjustment(0.3, 1) - 1.2).abs() < 1e-12);
        assert!((difficulty_adjustment(0.3, 5) - 0.8).abs() < 1e-12);
        assert_eq!(difficulty_adjustment(0.5, 5), 1.0);

        let ranked = PriorityRanker::default().rank(0.2, &IndexMap::new(), &catalog(), None, 10);
        let names: Vec<_> = ranked.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names, vec!["Leetcode", "Run", "Paper"]);
        assert!(ranked[0].reasoning.contains("Easy task good for low-energy periods"));
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = TaskCatalog::from_tasks([
            TaskDefinition::new("B", "X", 3, 1.0),
            TaskDefinition::new("A", "X", 3, 1.0),
            TaskDefinition::new("C", "X", 3, 1.0),
        ])
        .unwrap();
        let ranked = PriorityRanker::default().rank(0.7, &IndexMap::new(), &catalog, None, 10);
        let names: Vec<_> = ranked.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn ranking_is_deterministic() {
        let ranker = PriorityRanker::default();
        let a = ranker.rank(0.65, &goal_scores(), &catalog(), Some(&PrefersEasy), 14);
        let b = ranker.rank(0.65, &goal_scores(), &catalog(), Some(&PrefersEasy), 14);
        assert_eq!(a, b);
    }

    #[test]
    fn model_probability_scales_score() {
        let model = Fixed(Prediction::Probability(0.5));
        let ranked = PriorityRanker::default().rank(0.9, &goal_scores(), &catalog(), Some(&model), 10);
        assert!((ranked[0].priority_score - 0.468).abs() < 1e-12);
        assert_eq!(ranked[0].model_probability, Some(0.5));
        assert!(ranked[0].reasoning.contains("50% predicted completion"));
    }

    #[test]
    fn untrained_model_leaves_scores_unscaled() {
        let model = Fixed(Prediction::Unavailable);
        let with = PriorityRanker::default().rank(0.9, &goal_scores(), &catalog(), Some(&model), 10);
        let without = PriorityRanker::default().rank(0.9, &goal_scores(), &catalog(), None, 10);
        for (a, b) in with.iter().zip(&without) {
            assert_eq!(a.priority_score, b.priority_score);
            assert!(a.reasoning.contains("Completion model untrained"));
        }
    }

    #[test]
    fn weights_are_normalized() {
        let w = RankingWeights::normalized(2.0, 2.0).unwrap();
        assert_eq!((w.performance(), w.goal()), (0.5, 0.5));
        assert!(RankingWeights::normalized(0.0, 0.0).is_err());
        assert!(RankingWeights::normalized(-1.0, 2.0).is_err());

        let mut ranker = PriorityRanker::default();
        ranker.update_weights(1.0, 0.0).unwrap();
        let ranked = ranker.rank(0.9, &goal_scores(), &catalog(), None, 10);
        assert!(ranked.iter().all(|r| (r.priority_score - 0.9).abs() < 1e-12));
    }

    #[test]
    fn top_truncates() {
        let top = PriorityRanker::default().top(0.9, &goal_scores(), &catalog(), None, 10, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].task_name, "Leetcode");
    }
}
