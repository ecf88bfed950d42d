use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use taixiu_core::error::SourceError;
use taixiu_core::models::RoundSnapshot;
use taixiu_core::normalize::extract_snapshot;
use taixiu_core::scoreboard::{Scoreboard, ScoreboardEntry};
use taixiu_core::source::DataSource;

use crate::config::EngineConfig;
use crate::ensemble::{predict, EnsembleResult};

/// Réponse d'un appel : manche courante, prédiction, et entrée du tableau des scores si enregistrée.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub snapshot: RoundSnapshot,
    pub result: EnsembleResult,
    pub recorded: Option<ScoreboardEntry>,
}

/// Relie la source, l'ensemble et le tableau des scores partagé.
pub struct PredictionService {
    config: EngineConfig,
    scoreboard: Arc<Scoreboard>,
}

impl PredictionService {
    pub fn new(config: EngineConfig) -> Self {
        let scoreboard = Arc::new(Scoreboard::new(config.scoreboard_capacity));
        Self { config, scoreboard }
    }

    pub fn with_scoreboard(config: EngineConfig, scoreboard: Arc<Scoreboard>) -> Self {
        Self { config, scoreboard }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scoreboard(&self) -> &Arc<Scoreboard> {
        &self.scoreboard
    }

    /// Prédit puis, seulement ensuite, enregistre la manche si la session,
    /// le résultat réel et un verdict tranché sont tous présents.
    /// Pas de déduplication : la même session interrogée deux fois compte deux fois.
    pub fn handle(&self, raw: &Value) -> PredictionReport {
        let snapshot = extract_snapshot(raw);
        let result = predict(raw, &self.config);

        let recorded = match (snapshot.session_id(), snapshot.actual(), result.verdict.outcome()) {
            (Some(session), Some(actual), Some(predicted)) => {
                Some(self.scoreboard.record(&session, predicted, actual, result.confidence))
            }
            _ => {
                debug!(verdict = %result.verdict, "manche non enregistrée");
                None
            }
        };

        PredictionReport { snapshot, result, recorded }
    }

    pub fn fetch_and_handle(&self, source: &dyn DataSource) -> Result<PredictionReport, SourceError> {
        let raw = source.fetch().map_err(|e| {
            warn!(source = %source.describe(), error = %e, "aucune prédiction possible");
            e
        })?;
        Ok(self.handle(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taixiu_core::models::{Outcome, Verdict};

    struct FixedSource(Value);

    impl DataSource for FixedSource {
        fn describe(&self) -> String {
            "fixe".to_string()
        }

        fn fetch(&self) -> Result<Value, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl DataSource for FailingSource {
        fn describe(&self) -> String {
            "en panne".to_string()
        }

        fn fetch(&self) -> Result<Value, SourceError> {
            Err(SourceError::Status(503))
        }
    }

    /// `len` manches toutes Tài (verdict Tài à 80 %) et manche courante.
    fn payload(len: usize, session: Option<u64>, result: Option<&str>) -> Value {
        let records: Vec<Value> = (0..len)
            .map(|i| json!({"Phien": i + 1, "Ket_qua": "Tài"}))
            .collect();
        let mut raw = json!({ "Lich_su_phien": records });
        if let Some(s) = session {
            raw["Phien"] = json!(s);
        }
        if let Some(r) = result {
            raw["Ket_qua"] = json!(r);
        }
        raw
    }

    #[test]
    fn test_records_when_session_and_result_present() {
        let service = PredictionService::new(EngineConfig::default());
        let report = service.handle(&payload(30, Some(1030), Some("Xỉu")));
        assert_eq!(report.result.verdict, Verdict::High);
        assert_eq!(report.result.confidence, 80);

        let entry = report.recorded.expect("entrée enregistrée");
        assert_eq!(entry.session_id, "1030");
        assert_eq!(entry.predicted, Outcome::High);
        assert_eq!(entry.actual, Outcome::Low);
        assert!(!entry.was_correct);
        assert_eq!(entry.confidence, 80);
        assert_eq!(service.scoreboard().stats().total_predictions, 1);
        assert_eq!(report.snapshot.next_session, Some(1031));
    }

    #[test]
    fn test_no_record_without_session_or_result() {
        let service = PredictionService::new(EngineConfig::default());
        assert!(service.handle(&payload(30, None, Some("Tài"))).recorded.is_none());
        assert!(service.handle(&payload(30, Some(5), None)).recorded.is_none());
        assert!(service.handle(&payload(30, Some(5), Some("Bão"))).recorded.is_none());
        assert_eq!(service.scoreboard().stats().total_predictions, 0);
    }

    #[test]
    fn test_no_record_on_insufficient_history() {
        let service = PredictionService::new(EngineConfig::default());
        let report = service.handle(&payload(19, Some(19), Some("Xỉu")));
        assert_eq!(report.result.verdict, Verdict::NoData);
        assert!(report.recorded.is_none());
    }

    #[test]
    fn test_same_session_counted_twice() {
        let service = PredictionService::new(EngineConfig::default());
        let raw = payload(40, Some(40), Some("Xỉu"));
        service.handle(&raw);
        service.handle(&raw);
        let stats = service.scoreboard().stats();
        assert_eq!(stats.total_predictions, 2);
        assert_eq!(stats.win_rate_percent, "0.00%");
    }

    #[test]
    fn test_fetch_failure_is_propagated() {
        let service = PredictionService::new(EngineConfig::default());
        let err = service.fetch_and_handle(&FailingSource).unwrap_err();
        assert!(matches!(err, SourceError::Status(503)));
        assert_eq!(service.scoreboard().stats().total_predictions, 0);
    }

    #[test]
    fn test_fetch_and_handle_shares_scoreboard() {
        let scoreboard = Arc::new(Scoreboard::new(5));
        let service = PredictionService::with_scoreboard(EngineConfig::default(), Arc::clone(&scoreboard));
        let source = FixedSource(payload(25, Some(25), Some("Tài")));
        let report = service.fetch_and_handle(&source).unwrap();
        assert!(report.recorded.is_some());
        assert_eq!(scoreboard.stats().correct_predictions, 1);
        assert_eq!(scoreboard.entries()[0].session_id, "25");
    }
}
