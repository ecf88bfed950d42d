use taixiu_core::models::{format_outcomes, format_slots, samples_leading_high, tail, PatternSample, Slot};

use crate::patterns::windows::{known_window, ngram_index, NextCounts};

use super::{sample_majority, with_sample_support, Heuristic, Prediction};

/// Suffixe de longueur `n` recherché dans l'index des n-grammes de la fenêtre.
pub struct NgramMatching;

fn lookup(window: &[Slot], n: usize) -> Option<(String, NextCounts)> {
    let suffix = known_window(window, window.len().checked_sub(n)?, n)?;
    let counts = ngram_index(window, n).remove(&suffix)?;
    Some((format_outcomes(&suffix), counts))
}

impl Heuristic for NgramMatching {
    fn name(&self) -> &str {
        "N-gramme"
    }

    fn predict(&self, window: &[Slot], samples: &[PatternSample], id: &str) -> Prediction {
        let n = window.len().saturating_sub(1).clamp(3, 4);
        let mut rationale = format!(
            "Modèle {id} (N-gramme) : recherche de la séquence de longueur {n} \"{}\". ",
            format_slots(tail(window, n))
        );

        let outcome = if let Some((_, counts)) = lookup(window, n) {
            let outcome = counts.majority();
            rationale.push_str(&format!(
                "{} occurrence(s) : Tài={}, Xỉu={}. Prédiction {outcome}.",
                counts.total, counts.high, counts.low
            ));
            outcome
        } else if let Some((key, counts)) = (n > 3).then(|| lookup(window, 3)).flatten() {
            let outcome = counts.majority();
            rationale.push_str(&format!(
                "Pas de correspondance exacte, repli sur \"{key}\" : Tài={}, Xỉu={} → {outcome}.",
                counts.high, counts.low
            ));
            outcome
        } else {
            let outcome = sample_majority(samples);
            rationale.push_str(&format!(
                "Aucune correspondance n-gramme. Échantillons : {}/{} mènent à Tài → {outcome}.",
                samples_leading_high(samples),
                samples.len()
            ));
            outcome
        };

        Prediction { outcome, rationale: with_sample_support(rationale, samples) }
    }
}
