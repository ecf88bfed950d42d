use serde::{Deserialize, Serialize};
use tracing::debug;

use taixiu_core::models::Slot;
use taixiu_core::scoreboard::{Scoreboard, ScoreboardStats};

use crate::config::EngineConfig;

use super::predict_history;

/// Précision d'un prédicteur (heuristique × fenêtre) sur tout le backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorScore {
    pub label: String,
    pub name: String,
    pub correct: usize,
    pub total: usize,
}

impl PredictorScore {
    pub fn hit_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Manches prédites et comparées au résultat réel.
    pub evaluated: usize,
    /// Verdict indéterminé ou résultat réel inconnu.
    pub skipped: usize,
    pub stats: ScoreboardStats,
    /// (indice de manche, taux de réussite cumulé en %) après chaque manche évaluée.
    pub rolling: Vec<(usize, f64)>,
    pub predictors: Vec<PredictorScore>,
}

/// Nombre de manches que le backtest va parcourir.
pub fn step_count(history: &[Slot], config: &EngineConfig) -> usize {
    history.len().saturating_sub(config.min_history)
}

pub fn backtest(history: &[Slot], config: &EngineConfig) -> BacktestReport {
    backtest_with_progress(history, config, |_| {})
}

/// Walk-forward : pour chaque manche t ≥ min_history, on prédit avec `history[..t]` seulement
/// puis on compare à `history[t]`. Aucune donnée future n'entre dans la prédiction.
pub fn backtest_with_progress(
    history: &[Slot],
    config: &EngineConfig,
    mut on_step: impl FnMut(usize),
) -> BacktestReport {
    let scoreboard = Scoreboard::new(config.scoreboard_capacity);
    let mut skipped = 0usize;
    let mut rolling = Vec::new();
    let mut predictors: Vec<PredictorScore> = Vec::new();

    for t in config.min_history..history.len() {
        let result = predict_history(&history[..t], config);
        on_step(t);

        let Some(actual) = history[t] else {
            skipped += 1;
            continue;
        };

        if predictors.is_empty() {
            predictors = result
                .votes
                .iter()
                .map(|v| PredictorScore { label: v.label.clone(), name: v.name.clone(), correct: 0, total: 0 })
                .collect();
        }
        for (score, vote) in predictors.iter_mut().zip(&result.votes) {
            score.total += 1;
            if vote.outcome == actual {
                score.correct += 1;
            }
        }

        let Some(predicted) = result.verdict.outcome() else {
            skipped += 1;
            continue;
        };

        scoreboard.record(&t.to_string(), predicted, actual, result.confidence);
        let stats = scoreboard.stats();
        let rate = if stats.total_predictions == 0 {
            0.0
        } else {
            stats.correct_predictions as f64 * 100.0 / stats.total_predictions as f64
        };
        rolling.push((t, rate));
    }

    let stats = scoreboard.stats();
    debug!(evaluated = stats.total_predictions, skipped, win_rate = %stats.win_rate_percent, "backtest terminé");

    BacktestReport {
        evaluated: stats.total_predictions as usize,
        skipped,
        stats,
        rolling,
        predictors,
    }
}
