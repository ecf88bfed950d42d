use taixiu_core::models::{same, Outcome, Slot};

use taixiu_core::models::Outcome::{High as T, Low as X};

/// Série maximale (≥ 3) de résultats identiques.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub start: usize,
    pub length: usize,
    pub outcome: Outcome,
    /// Résultat qui a suivi la série, ou l'inverse si la série termine l'historique.
    pub next: Outcome,
}

pub const MIN_RUN: usize = 3;

/// Séries de longueur ≥ 3, triées par longueur décroissante (tri stable).
/// Une case inconnue interrompt toujours une série.
pub fn detect_runs(history: &[Slot]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < history.len() {
        let mut j = i + 1;
        while j < history.len() && same(history[j], history[i]) {
            j += 1;
        }
        if let Some(outcome) = history[i] {
            let length = j - i;
            if length >= MIN_RUN {
                let next = history.get(j).copied().flatten().unwrap_or(outcome.opposite());
                runs.push(Run { start: i, length, outcome, next });
            }
        }
        i = j;
    }
    runs.sort_by(|a, b| b.length.cmp(&a.length));
    runs
}

impl Run {
    pub fn pattern(&self) -> Vec<Slot> {
        vec![Some(self.outcome); self.length]
    }
}

/// Fenêtre a-b-a-b (a ≠ b) et sa prédiction : l'inverse du dernier élément.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternation {
    pub index: usize,
    pub pattern: [Outcome; 4],
    pub next: Outcome,
}

pub fn detect_alternations(history: &[Slot]) -> Vec<Alternation> {
    history
        .windows(4)
        .enumerate()
        .filter_map(|(index, w)| {
            let (a, b) = (w[0]?, w[1]?);
            let alternating = a != b && same(w[2], w[0]) && same(w[3], w[1]);
            alternating.then(|| Alternation {
                index,
                pattern: [a, b, a, b],
                next: b.opposite(),
            })
        })
        .collect()
}

/// Motifs de référence (1-1, 2-2, 3-1, 1-2-1 / 2-1-2) utilisés pour compléter.
pub const CANONICAL: [([Outcome; 4], Outcome); 8] = [
    ([T, X, T, X], T),
    ([X, T, X, T], X),
    ([T, T, X, X], T),
    ([X, X, T, T], X),
    ([T, T, T, X], X),
    ([X, X, X, T], T),
    ([T, X, X, T], X),
    ([X, T, T, X], T),
];
