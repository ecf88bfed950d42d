use taixiu_core::models::{count_outcome, Outcome, PatternSample, Slot};

use super::{with_sample_support, Heuristic, Prediction};

/// Retour à l'équilibre sur la proportion de Tài dans la fenêtre.
pub struct RollingFrequency;

/// Pourcentage entier de Tài (arrondi), les cases inconnues comptent au dénominateur.
pub fn high_pct(window: &[Slot]) -> u32 {
    if window.is_empty() {
        return 0;
    }
    (count_outcome(window, Outcome::High) as f64 * 100.0 / window.len() as f64).round() as u32
}

/// Table des seuils. La bande médiane est asymétrique : [45, 50) → Xỉu, [50, 55] → Tài.
fn balance(pct: u32) -> Outcome {
    if pct >= 70 {
        Outcome::Low
    } else if pct <= 30 {
        Outcome::High
    } else if pct > 55 {
        Outcome::Low
    } else if pct < 45 {
        Outcome::High
    } else if pct >= 50 {
        Outcome::High
    } else {
        Outcome::Low
    }
}

impl Heuristic for RollingFrequency {
    fn name(&self) -> &str {
        "Fréquence glissante"
    }

    fn predict(&self, window: &[Slot], samples: &[PatternSample], id: &str) -> Prediction {
        if window.is_empty() {
            let rationale = format!("Modèle {id} (Fréquence) : aucune donnée.");
            return Prediction {
                outcome: Outcome::High,
                rationale: with_sample_support(rationale, samples),
            };
        }

        let pct = high_pct(window);
        let outcome = balance(pct);
        let mut rationale = format!(
            "Modèle {id} (Fréquence) : sur les {} dernières manches, Tài = {pct}%. ",
            window.len()
        );
        if pct >= 70 {
            rationale.push_str("Tài ≥ 70 % → rééquilibrage attendu vers Xỉu.");
        } else if pct <= 30 {
            rationale.push_str("Tài ≤ 30 % → compensation attendue vers Tài.");
        } else {
            rationale.push_str(&format!("Zone intermédiaire → équilibrage/continuation : {outcome}."));
        }

        Prediction { outcome, rationale: with_sample_support(rationale, samples) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use taixiu_core::normalize::parse_compact as slots;

    #[test]
    fn test_balance_table_verbatim() {
        let expected = [
            (100, Outcome::Low),
            (70, Outcome::Low),
            (69, Outcome::Low),
            (56, Outcome::Low),
            (55, Outcome::High),
            (50, Outcome::High),
            (49, Outcome::Low),
            (45, Outcome::Low),
            (44, Outcome::High),
            (31, Outcome::High),
            (30, Outcome::High),
            (0, Outcome::High),
        ];
        for (pct, outcome) in expected {
            assert_eq!(balance(pct), outcome, "pct = {pct}");
        }
    }

    #[test]
    fn test_all_high_predicts_low() {
        let window = slots(&"T".repeat(20));
        let pred = RollingFrequency.predict(&window, &fixtures::samples(10, 10), "2-S");
        assert_eq!(pred.outcome, Outcome::Low);
        assert!(pred.rationale.contains("Tài = 100%"));
    }

    #[test]
    fn test_empty_window_defaults_to_high() {
        let pred = RollingFrequency.predict(&[], &fixtures::samples(0, 20), "2-L");
        assert_eq!(pred.outcome, Outcome::High);
        assert!(pred.rationale.contains("aucune donnée"));
    }

    #[test]
    fn test_unknown_slots_dilute_percentage() {
        // 9 Tài sur 20 cases : 45 % → Xỉu
        let window = slots("TTTTTTTTTXXXXXXXXX??");
        assert_eq!(high_pct(&window), 45);
        let pred = RollingFrequency.predict(&window, &fixtures::samples(10, 10), "2-S");
        assert_eq!(pred.outcome, Outcome::Low);
    }
}
