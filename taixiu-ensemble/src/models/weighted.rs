use taixiu_core::models::{count_outcome, Outcome, PatternSample, Slot};

use crate::patterns::windows::known_window;

use super::markov::Transitions;
use super::{sample_high_fraction, with_sample_support, Heuristic, Prediction};

const PATTERN_WEIGHT: f64 = 0.4;
const MARKOV_WEIGHT: f64 = 0.3;
const FREQUENCY_WEIGHT: f64 = 0.2;
const NGRAM_WEIGHT: f64 = 0.1;

/// Score composite : motifs 40 %, Markov 30 %, fréquence 20 %, 4-gramme 10 %.
/// Tài seulement si le score dépasse strictement 0.5.
pub struct WeightedHeuristic;

/// Composantes du score, toutes dans [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    pub pattern: f64,
    pub markov: f64,
    pub frequency: f64,
    pub ngram: f64,
}

impl WeightedScore {
    pub fn compute(window: &[Slot], samples: &[PatternSample]) -> Self {
        let t = Transitions::count(window);
        let markov = (t.p_high_high() - (1.0 - t.p_low_low())) / 2.0 + 0.5;
        let frequency = if window.is_empty() {
            0.5
        } else {
            count_outcome(window, Outcome::High) as f64 / window.len() as f64
        };
        Self {
            pattern: sample_high_fraction(samples),
            markov,
            frequency,
            ngram: ngram_favor(window),
        }
    }

    pub fn total(&self) -> f64 {
        PATTERN_WEIGHT * self.pattern
            + MARKOV_WEIGHT * self.markov
            + FREQUENCY_WEIGHT * self.frequency
            + NGRAM_WEIGHT * self.ngram
    }
}

/// Premier 4-gramme égal au suffixe : 1 si suivi de Tài, 0 sinon, 0.5 sans correspondance.
fn ngram_favor(window: &[Slot]) -> f64 {
    let Some(suffix) = window.len().checked_sub(4).and_then(|s| known_window(window, s, 4)) else {
        return 0.5;
    };
    (0..window.len().saturating_sub(4))
        .find(|&i| known_window(window, i, 4).as_ref() == Some(&suffix))
        .map(|i| if window[i + 4] == Some(Outcome::High) { 1.0 } else { 0.0 })
        .unwrap_or(0.5)
}

fn pct(x: f64) -> f64 {
    (x * 100.0).round()
}

impl Heuristic for WeightedHeuristic {
    fn name(&self) -> &str {
        "Heuristique pondérée"
    }

    fn predict(&self, window: &[Slot], samples: &[PatternSample], id: &str) -> Prediction {
        let score = WeightedScore::compute(window, samples);
        let total = score.total();
        let outcome = if total > 0.5 { Outcome::High } else { Outcome::Low };
        let rationale = format!(
            "Modèle {id} (Pondéré) : Motifs 40% ({}%), Markov 30% ({}%), Fréquence 20% ({}%), N-gramme 10% ({}%). Score Tài : {}% → prédiction {outcome}.",
            pct(score.pattern),
            pct(score.markov),
            pct(score.frequency),
            pct(score.ngram),
            pct(total),
        );

        Prediction { outcome, rationale: with_sample_support(rationale, samples) }
    }
}
