use taixiu_core::models::{contains_sequence, format_slots, samples_leading_high, tail, Outcome, PatternSample, Slot};
use taixiu_core::models::Outcome::{High as T, Low as X};

use super::{sample_majority, with_sample_support, Heuristic, Prediction};

const LOOKBACK: usize = 6;

/// Reconnaît les "cầu" classiques dans les 6 derniers résultats,
/// du motif le plus spécifique au plus générique.
pub struct PatternAnalysis;

impl Heuristic for PatternAnalysis {
    fn name(&self) -> &str {
        "Analyse de motifs"
    }

    fn predict(&self, window: &[Slot], samples: &[PatternSample], id: &str) -> Prediction {
        let recent = tail(window, LOOKBACK);
        let key = format_slots(recent);
        let last = recent.last().copied().flatten();
        let opposite_of_last = if last == Some(T) { X } else { T };

        let (outcome, rationale) = if contains_sequence(recent, &[T, X, T, X]) {
            (
                opposite_of_last,
                format!("Modèle {id} (Motifs) : cầu 1-1 détecté dans \"{key}\". Alternance attendue → {opposite_of_last}."),
            )
        } else if contains_sequence(recent, &[T, X, X, T]) {
            (X, format!("Modèle {id} (Motifs) : motif 1-2-1 dans \"{key}\", cassure attendue → {X}."))
        } else if contains_sequence(recent, &[X, T, T, X]) {
            (T, format!("Modèle {id} (Motifs) : motif 2-1-2, tendance suivante → {T}."))
        } else if let Some(run) = run_outcome(recent) {
            let outcome = last.unwrap_or(run);
            (
                outcome,
                format!("Modèle {id} (Motifs) : bệt ≥ 3 dans \"{key}\". Continuation prévue : {outcome}, cassure possible si la série s'allonge."),
            )
        } else if contains_sequence(recent, &[T, T, X, X]) {
            (
                opposite_of_last,
                format!("Modèle {id} (Motifs) : cầu 2-2 dans \"{key}\", inversion après le bloc → {opposite_of_last}."),
            )
        } else {
            let outcome = sample_majority(samples);
            (
                outcome,
                format!(
                    "Modèle {id} (Motifs) : aucun cầu reconnu dans \"{key}\". Sur {} motifs, {} mènent à Tài → {outcome}.",
                    samples.len(),
                    samples_leading_high(samples)
                ),
            )
        };

        Prediction { outcome, rationale: with_sample_support(rationale, samples) }
    }
}

fn run_outcome(recent: &[Slot]) -> Option<Outcome> {
    if contains_sequence(recent, &[T, T, T]) {
        Some(T)
    } else if contains_sequence(recent, &[X, X, X]) {
        Some(X)
    } else {
        None
    }
}
