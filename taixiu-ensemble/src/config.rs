use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nombre d'échantillons produits par le mineur de motifs.
    pub sample_count: usize,
    /// En dessous, aucune heuristique n'est exécutée.
    pub min_history: usize,
    pub short_window: usize,
    pub long_window: usize,
    pub scoreboard_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_count: 20,
            min_history: 20,
            short_window: 20,
            long_window: 50,
            scoreboard_capacity: taixiu_core::scoreboard::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl SourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), timeout_secs: 10 }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn save_config(config: &EngineConfig, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let json = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&json)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_count, 20);
        assert_eq!(config.min_history, 20);
        assert_eq!(config.short_window, 20);
        assert_eq!(config.long_window, 50);
        assert_eq!(config.scoreboard_capacity, 100);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"sample_count": 30}"#).unwrap();
        assert_eq!(config.sample_count, 30);
        assert_eq!(config.long_window, 50);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let mut path = std::env::temp_dir();
        path.push(format!("taixiu-config-{}.json", std::process::id()));
        let config = EngineConfig { long_window: 80, ..Default::default() };
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_source_timeout() {
        assert_eq!(SourceConfig::new("http://x").timeout(), Duration::from_secs(10));
    }
}
