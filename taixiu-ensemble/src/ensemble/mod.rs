pub mod backtest;
pub mod explain;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use taixiu_core::models::{tail, Outcome, PatternSample, Slot, Verdict};
use taixiu_core::normalize::normalize_history;

use crate::config::EngineConfig;
use crate::models::{all_heuristics, Heuristic};
use crate::patterns;

/// Vote d'une heuristique sur une fenêtre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVote {
    pub name: String,
    /// "3-S" = heuristique 3 sur la fenêtre courte, "3-L" sur la longue.
    pub label: String,
    pub outcome: Outcome,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub verdict: Verdict,
    pub confidence: u8,
    pub votes_high: usize,
    pub votes_low: usize,
    pub summary: String,
    pub rationale: String,
    pub votes: Vec<ModelVote>,
    pub samples: Vec<PatternSample>,
}

impl EnsembleResult {
    /// Résultat sentinelle quand l'historique est trop court.
    pub fn no_data(min_history: usize) -> Self {
        Self {
            verdict: Verdict::NoData,
            confidence: 0,
            votes_high: 0,
            votes_low: 0,
            summary: format!("Historique insuffisant (au moins {min_history} manches nécessaires)."),
            rationale: format!(
                "Le système a besoin d'au moins {min_history} manches d'historique pour analyser les motifs et faire voter l'ensemble."
            ),
            votes: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn confidence_label(&self) -> String {
        format!("{}%", self.confidence)
    }

    pub fn total_votes(&self) -> usize {
        self.votes.len()
    }
}

/// Point d'entrée : normalise le payload brut puis prédit.
pub fn predict(raw: &Value, config: &EngineConfig) -> EnsembleResult {
    predict_history(&normalize_history(raw), config)
}

pub fn predict_history(history: &[Slot], config: &EngineConfig) -> EnsembleResult {
    if history.len() < config.min_history {
        debug!(len = history.len(), min = config.min_history, "historique insuffisant");
        return EnsembleResult::no_data(config.min_history);
    }

    let short = tail(history, config.short_window);
    let long = {
        let slice = tail(history, config.long_window);
        if slice.len() >= config.min_history { slice } else { history }
    };

    let samples = patterns::mine(history, config.sample_count);
    let heuristics = all_heuristics();
    let votes = run_votes(&heuristics, short, long, &samples);

    let votes_high = votes.iter().filter(|v| v.outcome == Outcome::High).count();
    let votes_low = votes.len() - votes_high;
    let verdict = tally(votes_high, votes_low);
    let confidence = confidence(votes_high.max(votes_low), votes.len());

    info!(%verdict, confidence, votes_high, votes_low, "verdict de l'ensemble");

    let summary = explain::summary(samples.len(), votes.len(), votes_high, votes_low, verdict);
    let rationale = explain::rationale(&explain::RationaleInput {
        verdict,
        confidence,
        votes_high,
        votes_low,
        samples: &samples,
        votes: &votes,
        history,
    });

    EnsembleResult { verdict, confidence, votes_high, votes_low, summary, rationale, votes, samples }
}

/// Heuristique 1..5, chacune sur la fenêtre courte puis la longue.
fn run_votes(
    heuristics: &[Box<dyn Heuristic>],
    short: &[Slot],
    long: &[Slot],
    samples: &[PatternSample],
) -> Vec<ModelVote> {
    let mut votes = Vec::with_capacity(heuristics.len() * 2);
    for (i, heuristic) in heuristics.iter().enumerate() {
        for (suffix, window) in [("S", short), ("L", long)] {
            let label = format!("{}-{suffix}", i + 1);
            let pred = heuristic.predict(window, samples, &label);
            debug!(heuristic = heuristic.name(), %label, outcome = %pred.outcome, "vote");
            votes.push(ModelVote {
                name: heuristic.name().to_string(),
                label,
                outcome: pred.outcome,
                rationale: pred.rationale,
            });
        }
    }
    votes
}

pub fn tally(votes_high: usize, votes_low: usize) -> Verdict {
    match votes_high.cmp(&votes_low) {
        std::cmp::Ordering::Greater => Verdict::High,
        std::cmp::Ordering::Less => Verdict::Low,
        std::cmp::Ordering::Equal => Verdict::Undetermined,
    }
}

/// round(100 × max / total), 0 sans vote.
pub fn confidence(max_votes: usize, total_votes: usize) -> u8 {
    if total_votes == 0 {
        return 0;
    }
    (max_votes as f64 * 100.0 / total_votes as f64).round().min(100.0) as u8
}
