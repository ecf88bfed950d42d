pub mod motifs;
pub mod windows;

use tracing::debug;

use taixiu_core::models::{samples_leading_high, tail, Outcome, PatternSample, SampleKind, Slot};

use motifs::{detect_alternations, detect_runs, CANONICAL};
use windows::ranked_windows;

pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Nombre de résultats récents sur lesquels glisse le remplissage final.
const PAD_SPAN: usize = 20;
const PAD_WIDTH: usize = 4;

/// Quotas par étape, en pourcentage de `sample_count` (arrondi inférieur).
const WINDOW_SHARE: usize = 60;
const RUN_SHARE: usize = 15;
const ALTERNATION_SHARE: usize = 10;

/// Extrait exactement `sample_count` échantillons de l'historique complet,
/// dans l'ordre des étapes : fenêtres, séries, alternances, motifs canoniques, remplissage.
/// L'appelant garantit au moins 20 cases ; en dessous, le résultat peut être plus court.
pub fn mine(history: &[Slot], sample_count: usize) -> Vec<PatternSample> {
    let mut samples: Vec<PatternSample> = Vec::with_capacity(sample_count);

    // 1. Fenêtres fréquentes et décisives
    let window_quota = sample_count * WINDOW_SHARE / 100;
    for stat in ranked_windows(history).into_iter().take(window_quota) {
        let next = stat.counts.majority();
        samples.push(PatternSample::new(SampleKind::WindowMatch, stat.pattern, next));
    }

    // 2. Séries (bệt)
    let run_quota = sample_count * RUN_SHARE / 100;
    for run in detect_runs(history).into_iter().take(run_quota) {
        samples.push(PatternSample::new(SampleKind::Run, run.pattern(), run.next));
    }

    // 3. Alternances 1-1
    let alternation_quota = sample_count * ALTERNATION_SHARE / 100;
    for alt in detect_alternations(history).into_iter().take(alternation_quota) {
        let pattern = alt.pattern.iter().copied().map(Some).collect();
        samples.push(PatternSample::new(SampleKind::Alternation, pattern, alt.next));
    }

    // 4. Motifs canoniques
    for (pattern, next) in CANONICAL {
        if samples.len() >= sample_count {
            break;
        }
        let pattern = pattern.iter().copied().map(Some).collect();
        samples.push(PatternSample::new(SampleKind::Canonical, pattern, next));
    }

    // 5. Remplissage sur les 20 derniers résultats
    let recent = tail(history, PAD_SPAN);
    let pad_positions = recent.len().saturating_sub(PAD_WIDTH - 1).max(1);
    let mut idx = 0;
    while samples.len() < sample_count && idx < pad_positions {
        let start = idx.min(recent.len());
        let end = (idx + PAD_WIDTH).min(recent.len());
        let follower = match recent.get(idx + PAD_WIDTH) {
            Some(Some(outcome)) => Some(*outcome),
            _ => recent.last().copied().flatten(),
        };
        let next = if follower == Some(Outcome::High) { Outcome::High } else { Outcome::Low };
        samples.push(PatternSample::new(SampleKind::Pad, recent[start..end].to_vec(), next));
        idx += 1;
    }

    samples.truncate(sample_count);

    let high = samples_leading_high(&samples);
    debug!(
        samples = samples.len(),
        high,
        low = samples.len() - high,
        "échantillons de motifs générés"
    );
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use taixiu_core::normalize::parse_compact as slots;

    use taixiu_core::models::Outcome::{High as H, Low as L};

    fn kinds(samples: &[PatternSample]) -> Vec<SampleKind> {
        samples.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_mine_exact_count() {
        let history = slots("TXXTTTXTXXTXTTXXXTXT");
        assert_eq!(mine(&history, 20).len(), 20);
        assert_eq!(mine(&history, 7).len(), 7);
        assert_eq!(mine(&history, 30).len(), 30);
    }

    #[test]
    fn test_mine_constant_history() {
        // 20 × Tài : 3 fenêtres (5, 4, 3), 1 série, 0 alternance, 8 canoniques, 8 remplissages
        let history = slots(&"T".repeat(20));
        let samples = mine(&history, 20);
        assert_eq!(samples.len(), 20);

        let k = kinds(&samples);
        assert_eq!(&k[..3], &[SampleKind::WindowMatch; 3]);
        assert_eq!(k[3], SampleKind::Run);
        assert_eq!(&k[4..12], &[SampleKind::Canonical; 8]);
        assert_eq!(&k[12..], &[SampleKind::Pad; 8]);

        // Fenêtres : toujours suivies de Tài
        assert!(samples[..3].iter().all(|s| s.next == H));
        // Série terminale : on parie sur la cassure
        assert_eq!(samples[3].next, L);
        assert_eq!(samples[3].pattern.len(), 20);
        // Remplissage : 4 positions plus loin → Tài
        assert!(samples[12..].iter().all(|s| s.next == H && s.pattern.len() == 4));
    }

    #[test]
    fn test_mine_stage_order_preserved() {
        let history = slots("TTTTXXXXTXTXTTXXTXTXXXTTTXTX");
        let samples = mine(&history, 20);
        let k = kinds(&samples);
        let rank = |kind: &SampleKind| match kind {
            SampleKind::WindowMatch => 0,
            SampleKind::Run => 1,
            SampleKind::Alternation => 2,
            SampleKind::Canonical => 3,
            SampleKind::Pad => 4,
        };
        for pair in k.windows(2) {
            assert!(rank(&pair[0]) <= rank(&pair[1]), "ordre des étapes : {:?}", k);
        }
        assert_eq!(k.iter().filter(|&&s| s == SampleKind::WindowMatch).count(), 12);
        assert!(k.iter().filter(|&&s| s == SampleKind::Run).count() <= 3);
        assert!(k.iter().filter(|&&s| s == SampleKind::Alternation).count() <= 2);
    }

    #[test]
    fn test_mine_is_deterministic() {
        let history = slots("TXXTTTXTXXTXTTXXXTXTTXTTX");
        assert_eq!(mine(&history, 20), mine(&history, 20));
    }

    #[test]
    fn test_pad_uses_last_element_past_the_end() {
        // 3 fenêtres, 1 série, 8 canoniques : le remplissage va jusqu'au bout des 20
        let history = slots(&"X".repeat(20));
        let samples = mine(&history, 40);
        let pads: Vec<_> = samples.iter().filter(|s| s.kind == SampleKind::Pad).collect();
        assert_eq!(pads.len(), 17);
        assert!(pads.iter().all(|s| s.next == L));
        assert_eq!(pads.last().unwrap().pattern.len(), 4);
    }

    #[test]
    fn test_pad_unknown_follower_falls_back_to_last() {
        fn first_pad(history: &[Slot]) -> PatternSample {
            mine(history, 100)
                .into_iter()
                .find(|s| s.kind == SampleKind::Pad)
                .unwrap()
        }

        // Suivant inconnu, dernier résultat Xỉu
        let pad = first_pad(&slots(&format!("TTTT?{}X", "T".repeat(14))));
        assert_eq!(pad.pattern, slots("TTTT"));
        assert_eq!(pad.next, L);

        // Suivant et dernier résultat inconnus
        let pad = first_pad(&slots(&format!("TTTT?{}?", "T".repeat(14))));
        assert_eq!(pad.next, L);

        // Suivant inconnu, dernier résultat Tài
        let pad = first_pad(&slots(&format!("XXXX?{}T", "X".repeat(14))));
        assert_eq!(pad.next, H);
    }

    #[test]
    fn test_mine_keeps_windows_with_unknown_slot() {
        // T-T-T, T-T-T-T, T-T-T-T-T puis ?-T-T-T-T, ?-T-T-T, ?-T-T (total 1, score 1)
        let mut history = vec![None];
        history.extend(slots(&"T".repeat(19)));
        let samples = mine(&history, 20);
        let windows: Vec<_> = samples.iter().filter(|s| s.kind == SampleKind::WindowMatch).collect();
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[0].key(), "Tài-Tài-Tài");
        assert_eq!(windows[3].key(), "?-Tài-Tài-Tài-Tài");
        assert_eq!(windows[5].key(), "?-Tài-Tài");
        assert!(windows.iter().all(|s| s.next == H));
    }

    #[test]
    fn test_mine_short_history_does_not_panic() {
        assert!(mine(&[], 20).len() <= 20);
        assert!(mine(&slots("TX"), 20).len() <= 20);
    }
}
