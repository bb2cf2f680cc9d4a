use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{attention::AttentionConfig, error::AttentionError, utils::io};

/// One side of the attention: a sentence and the vectors that embed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceConfig {
    pub sentence: String,
    /// Word vectors file; seeded random vectors are used when absent
    #[serde(default)]
    pub embeddings: Option<PathBuf>,
}

/// Configuration for a cross-lingual attention run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    // --- Inputs ---
    #[serde(default = "default_queries")]
    pub queries: SentenceConfig, // rows of the weight matrix
    #[serde(default = "default_keys")]
    pub keys: SentenceConfig,    // columns, also used as values

    // --- Attention ---
    #[serde(default)]
    pub attention: AttentionConfig,

    // --- Random vectors ---
    #[serde(default = "default_random_dim")]
    pub random_dim: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

// Default values for optional fields
fn default_queries() -> SentenceConfig {
    SentenceConfig {
        sentence: "L'accord sur la zone économique européenne a été signé en août 1992.".to_string(),
        embeddings: None,
    }
}
fn default_keys() -> SentenceConfig {
    SentenceConfig {
        sentence: "The agreement on the European Economic Area was signed in August 1992.".to_string(),
        embeddings: None,
    }
}
fn default_random_dim() -> usize { 300 }
fn default_seed() -> u64 { 42 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queries: default_queries(),
            keys: default_keys(),
            attention: AttentionConfig::default(),
            random_dim: default_random_dim(),
            seed: default_seed(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AttentionError> {
        let config: PipelineConfig = io::read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AttentionError> {
        for (side, sentence) in [("queries", &self.queries), ("keys", &self.keys)] {
            if sentence.sentence.split_whitespace().next().is_none() {
                return Err(AttentionError::Config(format!("{side} sentence is empty")));
            }
        }

        let needs_random = self.queries.embeddings.is_none() || self.keys.embeddings.is_none();
        if needs_random && self.random_dim == 0 {
            return Err(AttentionError::Config(
                "random_dim must be positive when an embeddings file is missing".to_string(),
            ));
        }

        let tolerance = self.attention.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(AttentionError::Config(format!(
                "tolerance must be a positive number, got {tolerance}"
            )));
        }

        Ok(())
    }
}
