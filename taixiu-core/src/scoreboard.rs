use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::Outcome;

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    pub session_id: String,
    pub predicted: Outcome,
    pub actual: Outcome,
    pub was_correct: bool,
    pub confidence: u8,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardStats {
    pub total_predictions: u64,
    pub correct_predictions: u64,
    pub incorrect_predictions: u64,
    pub win_rate_percent: String,
}

/// Taux de réussite à deux décimales, suffixé par `%`.
pub fn win_rate(correct: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", correct as f64 * 100.0 / total as f64)
}

#[derive(Debug)]
struct Inner {
    entries: VecDeque<ScoreboardEntry>,
    total: u64,
    correct: u64,
}

/// Tableau des scores en mémoire : anneau borné (plus récent en tête)
/// et compteurs cumulés, mis à jour sous un seul verrou.
/// Rien n'est persisté ; une nouvelle instance repart de zéro.
#[derive(Debug)]
pub struct Scoreboard {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Scoreboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                entries: VecDeque::with_capacity(capacity.max(1)),
                total: 0,
                correct: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Un thread qui a paniqué ne laisse jamais l'état à moitié écrit : on récupère.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enregistre une prédiction et son résultat réel.
    /// Aucune déduplication par session : l'appelant doit n'enregistrer qu'une fois.
    pub fn record(
        &self,
        session_id: &str,
        predicted: Outcome,
        actual: Outcome,
        confidence: u8,
    ) -> ScoreboardEntry {
        let entry = ScoreboardEntry {
            session_id: session_id.to_string(),
            predicted,
            actual,
            was_correct: predicted == actual,
            confidence,
            recorded_at: Utc::now(),
        };

        let mut inner = self.lock();
        inner.total += 1;
        if entry.was_correct {
            inner.correct += 1;
        }
        inner.entries.push_front(entry.clone());
        while inner.entries.len() > self.capacity {
            inner.entries.pop_back();
        }
        let rate = win_rate(inner.correct, inner.total);
        drop(inner);

        info!(
            session = %entry.session_id,
            predicted = %entry.predicted,
            actual = %entry.actual,
            correct = entry.was_correct,
            win_rate = %rate,
            "prédiction enregistrée"
        );
        entry
    }

    /// Entrées courantes, plus récente en premier.
    pub fn entries(&self) -> Vec<ScoreboardEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    pub fn stats(&self) -> ScoreboardStats {
        let inner = self.lock();
        ScoreboardStats {
            total_predictions: inner.total,
            correct_predictions: inner.correct,
            incorrect_predictions: inner.total - inner.correct,
            win_rate_percent: win_rate(inner.correct, inner.total),
        }
    }
}
