//! AI configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::eval::EvalWeights;

/// Search settings for one AI player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Search depth in plies
    pub depth: u32,
    /// Evaluation weights
    pub weights: EvalWeights,
    /// Threads for the root fan-out (None = one per core)
    pub threads: Option<usize>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            weights: EvalWeights::default(),
            threads: None,
        }
    }
}

impl AiConfig {
    /// Create config for alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Set custom weights
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Load from JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.depth, 3);
        assert_eq!(config.threads, None);
        assert_eq!(config.weights, EvalWeights::default());
    }

    #[test]
    fn test_ai_config_builders() {
        let config = AiConfig::alpha_beta(5).with_threads(2);
        assert_eq!(config.depth, 5);
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AiConfig = serde_json::from_str(r#"{ "depth": 4 }"#).unwrap();
        assert_eq!(config.depth, 4);
        assert_eq!(config.weights.control_diff, 10);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("dvonn-config-{}.json", std::process::id()));
        let config = AiConfig::alpha_beta(2).with_weights(EvalWeights {
            proximity: 1,
            ..Default::default()
        });
        config.save(&path).unwrap();
        let loaded = AiConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
