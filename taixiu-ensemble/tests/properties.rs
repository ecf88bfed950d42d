use proptest::prelude::*;

use taixiu_core::models::{Outcome, Slot, Verdict};
use taixiu_core::scoreboard::Scoreboard;
use taixiu_core::source::{DataSource, StaticSource};
use taixiu_ensemble::config::EngineConfig;
use taixiu_ensemble::ensemble::{predict, predict_history};
use taixiu_ensemble::models::markov::{MarkovChain, Transitions};
use taixiu_ensemble::models::Heuristic;
use taixiu_ensemble::patterns::mine;

fn slot() -> impl Strategy<Value = Slot> {
    prop::option::weighted(0.9, prop_oneof![Just(Outcome::High), Just(Outcome::Low)])
}

fn history(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<Slot>> {
    prop::collection::vec(slot(), len)
}

proptest! {
    #[test]
    fn short_history_is_no_data(h in history(0..20)) {
        let result = predict_history(&h, &EngineConfig::default());
        prop_assert_eq!(result.verdict, Verdict::NoData);
        prop_assert_eq!(result.confidence_label(), "0%");
        prop_assert!(result.votes.is_empty());
        prop_assert!(result.samples.is_empty());
    }

    #[test]
    fn full_history_yields_ten_votes(h in history(20..120)) {
        let result = predict_history(&h, &EngineConfig::default());
        prop_assert!(matches!(result.verdict, Verdict::High | Verdict::Low | Verdict::Undetermined));
        prop_assert_eq!(result.votes.len(), 10);
        prop_assert_eq!(result.votes_high + result.votes_low, 10);

        let max = result.votes_high.max(result.votes_low) as f64;
        let expected = (100.0 * max / 10.0).round() as u8;
        prop_assert_eq!(result.confidence, expected);
        prop_assert!(result.confidence <= 100);

        if result.verdict == Verdict::Undetermined {
            prop_assert_eq!(result.votes_high, result.votes_low);
            prop_assert_eq!(result.confidence, 50);
        }
    }

    // Canoniques (8) + remplissage (17) couvrent toujours jusqu'à 25 échantillons
    #[test]
    fn mine_returns_exact_count(h in history(20..150), n in 1usize..=25) {
        prop_assert_eq!(mine(&h, n).len(), n);
    }

    #[test]
    fn predict_is_deterministic(h in history(0..100)) {
        let raw = StaticSource::from_slots(&h).fetch().unwrap();
        let config = EngineConfig::default();
        prop_assert_eq!(predict(&raw, &config), predict(&raw, &config));
    }

    #[test]
    fn markov_constant_high(len in 1usize..60) {
        let window = vec![Some(Outcome::High); len];
        let t = Transitions::count(&window);
        let expected = if len >= 2 { 1.0 } else { 0.5 };
        prop_assert_eq!(t.p_high_high(), expected);
        let pred = MarkovChain.predict(&window, &[], "3-S");
        prop_assert_eq!(pred.outcome, Outcome::High);
    }

    #[test]
    fn scoreboard_counters_stay_consistent(
        records in prop::collection::vec((any::<bool>(), any::<bool>()), 0..250),
        capacity in 1usize..120,
    ) {
        let board = Scoreboard::new(capacity);
        let to_outcome = |b: bool| if b { Outcome::High } else { Outcome::Low };
        for (i, (p, a)) in records.iter().enumerate() {
            board.record(&i.to_string(), to_outcome(*p), to_outcome(*a), 60);
        }
        let stats = board.stats();
        prop_assert_eq!(stats.total_predictions as usize, records.len());
        prop_assert_eq!(stats.correct_predictions + stats.incorrect_predictions, stats.total_predictions);
        prop_assert!(stats.win_rate_percent.ends_with('%'));

        let entries = board.entries();
        prop_assert_eq!(entries.len(), records.len().min(capacity));
        if let Some(first) = entries.first() {
            prop_assert_eq!(&first.session_id, &(records.len() - 1).to_string());
        }
    }
}
