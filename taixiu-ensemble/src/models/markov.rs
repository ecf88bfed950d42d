use taixiu_core::models::{last_known, Outcome, PatternSample, Slot};

use super::{with_sample_support, Heuristic, Prediction};

/// Comptes de transitions d'ordre 1. Seules les paires de cases connues sont comptées.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transitions {
    pub hh: usize,
    pub hl: usize,
    pub lh: usize,
    pub ll: usize,
}

impl Transitions {
    pub fn count(window: &[Slot]) -> Self {
        let mut t = Self::default();
        for pair in window.windows(2) {
            match (pair[0], pair[1]) {
                (Some(Outcome::High), Some(Outcome::High)) => t.hh += 1,
                (Some(Outcome::High), Some(Outcome::Low)) => t.hl += 1,
                (Some(Outcome::Low), Some(Outcome::High)) => t.lh += 1,
                (Some(Outcome::Low), Some(Outcome::Low)) => t.ll += 1,
                _ => {}
            }
        }
        t
    }

    /// P(Tài | Tài), 0.5 si Tài n'a jamais été suivi.
    pub fn p_high_high(&self) -> f64 {
        ratio(self.hh, self.hh + self.hl)
    }

    /// P(Xỉu | Xỉu), 0.5 si Xỉu n'a jamais été suivi.
    pub fn p_low_low(&self) -> f64 {
        ratio(self.ll, self.ll + self.lh)
    }

    /// Continue l'état courant si sa probabilité de maintien est ≥ 0.5, sinon bascule.
    pub fn next_from(&self, current: Outcome) -> Outcome {
        let stay = match current {
            Outcome::High => self.p_high_high(),
            Outcome::Low => self.p_low_low(),
        };
        if stay >= 0.5 {
            current
        } else {
            current.opposite()
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.5
    } else {
        num as f64 / den as f64
    }
}

pub struct MarkovChain;

impl Heuristic for MarkovChain {
    fn name(&self) -> &str {
        "Chaîne de Markov"
    }

    fn predict(&self, window: &[Slot], samples: &[PatternSample], id: &str) -> Prediction {
        if window.len() < 2 {
            let rationale = format!(
                "Modèle {id} (Markov) : pas assez de données pour estimer la matrice de transition."
            );
            return Prediction {
                outcome: Outcome::High,
                rationale: with_sample_support(rationale, samples),
            };
        }

        let t = Transitions::count(window);
        let current = last_known(window);
        let outcome = current.map(|c| t.next_from(c)).unwrap_or(Outcome::High);
        let rationale = format!(
            "Modèle {id} (Markov) : P(T→T)={}%, P(X→X)={}%. Résultat courant \"{}\" → prédiction {outcome}.",
            (t.p_high_high() * 100.0).round(),
            (t.p_low_low() * 100.0).round(),
            current.map(|c| c.label()).unwrap_or("?"),
        );

        Prediction { outcome, rationale: with_sample_support(rationale, samples) }
    }
}
