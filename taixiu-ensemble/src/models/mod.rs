pub mod frequency;
pub mod markov;
pub mod ngram;
pub mod pattern;
pub mod weighted;

use serde::{Deserialize, Serialize};
use taixiu_core::models::{samples_leading_high, Outcome, PatternSample, Slot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub outcome: Outcome,
    pub rationale: String,
}

pub trait Heuristic: Send + Sync {
    fn name(&self) -> &str;
    /// window[0] = résultat le plus ancien. `id` étiquette la variante (ex. "3-S", "3-L").
    /// Fonction pure : mêmes entrées, même prédiction.
    fn predict(&self, window: &[Slot], samples: &[PatternSample], id: &str) -> Prediction;
}

pub fn all_heuristics() -> Vec<Box<dyn Heuristic>> {
    vec![
        Box::new(pattern::PatternAnalysis),
        Box::new(frequency::RollingFrequency),
        Box::new(markov::MarkovChain),
        Box::new(ngram::NgramMatching),
        Box::new(weighted::WeightedHeuristic),
    ]
}

/// Part des échantillons qui mènent à Tài (0.5 sans échantillon).
pub fn sample_high_fraction(samples: &[PatternSample]) -> f64 {
    if samples.is_empty() {
        return 0.5;
    }
    samples_leading_high(samples) as f64 / samples.len() as f64
}

pub fn sample_support_pct(samples: &[PatternSample]) -> u32 {
    (sample_high_fraction(samples) * 100.0).round() as u32
}

/// Vote majoritaire des échantillons ; égalité → Tài.
pub fn sample_majority(samples: &[PatternSample]) -> Outcome {
    if 2 * samples_leading_high(samples) >= samples.len() {
        Outcome::High
    } else {
        Outcome::Low
    }
}

/// Note de transparence ajoutée à toutes les justifications.
pub(crate) fn with_sample_support(mut rationale: String, samples: &[PatternSample]) -> String {
    rationale.push_str(&format!(
        " Soutien des motifs : {}% mènent à Tài.",
        sample_support_pct(samples)
    ));
    rationale
}
