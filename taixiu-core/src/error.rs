use thiserror::Error;

/// Échec de récupération du flux d'observations. Aucune de ces erreurs
/// n'est rattrapable localement : l'appelant ne doit pas prédire.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("requête HTTP échouée : {0}")]
    Http(#[from] reqwest::Error),

    #[error("la source a répondu avec le statut {0}")]
    Status(u16),

    #[error("payload illisible : {0}")]
    Decode(String),

    #[error("lecture impossible de {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV invalide : {0}")]
    Csv(#[from] csv::Error),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Decode(e.to_string())
    }
}
