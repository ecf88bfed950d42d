use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::models::Slot;

/// Fournisseur du payload brut. Un échec est terminal pour la requête :
/// aucune prédiction ne doit être produite à partir d'un payload partiel.
pub trait DataSource: Send + Sync {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<Value, SourceError>;
}

pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self { url: url.into(), timeout }
    }
}

impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Value, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        debug!(url = %self.url, "récupération du flux");
        let resp = client.get(&self.url).send().map_err(|e| {
            warn!(url = %self.url, error = %e, "échec de la requête");
            SourceError::Http(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %self.url, %status, "statut inattendu");
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = resp.text()?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(value)
    }
}

/// Fichier local : JSON tel que servi par l'API, ou CSV `session;result`.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Value, SourceError> {
        if self.is_csv() {
            return read_csv_payload(&self.path);
        }
        let text = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(value)
    }
}

/// Convertit un CSV `session;result` (en-tête obligatoire, plus ancien en premier)
/// en payload au format de l'API. La dernière ligne devient la manche courante
/// et n'entre pas dans l'historique : son résultat ne sert qu'au tableau des scores.
pub fn read_csv_payload(path: &Path) -> Result<Value, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let session = record.get(0).map(str::trim).unwrap_or_default();
        let result = record.get(1).map(str::trim).unwrap_or_default();

        let session_value = session
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(session));
        records.push(json!({ "Phien": session_value, "Ket_qua": result }));
    }

    let mut payload = Map::new();
    if let Some(Value::Object(current)) = records.pop() {
        payload.extend(current);
    }
    payload.insert("Lich_su_phien".to_string(), Value::Array(records));
    Ok(Value::Object(payload))
}

/// Payload déjà en mémoire (séquence saisie à la main, tests).
pub struct StaticSource {
    payload: Value,
}

impl StaticSource {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Historique au format de l'API ; les cases inconnues deviennent un libellé vide.
    pub fn from_slots(history: &[Slot]) -> Self {
        let records: Vec<Value> = history
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let label = slot.map(|o| o.label()).unwrap_or_default();
                json!({ "Phien": i + 1, "Ket_qua": label })
            })
            .collect();
        Self::new(json!({ "Lich_su_phien": records }))
    }
}

impl DataSource for StaticSource {
    fn describe(&self) -> String {
        "séquence en mémoire".to_string()
    }

    fn fetch(&self) -> Result<Value, SourceError> {
        Ok(self.payload.clone())
    }
}
