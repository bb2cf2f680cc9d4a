//! Tokenize, embed and attend one sentence over another

use ndarray::Array2;
use tracing::{debug, info};

use crate::{
    attention::{Attention, ScaledDotProductAttention},
    config::PipelineConfig,
    embedding::{EmbeddedSentence, WordVectors},
    error::AttentionError,
    tokenizer::OOV_TOKEN,
};

/// Result of attending a query sentence over a key sentence
#[derive(Debug, Clone)]
pub struct Alignment {
    pub query_words: Vec<String>,
    pub key_words: Vec<String>,
    /// Shape: [query_words.len(), key_words.len()]
    pub weights: Array2<f64>,
    /// Shape: [query_words.len(), embed_dim]
    pub output: Array2<f64>,
}

/// Attention between sentences embedded with two sets of word vectors
pub struct CrossAttention {
    queries: WordVectors,
    keys: WordVectors,
    attention: Box<dyn Attention>,
}

impl CrossAttention {
    pub fn new(queries: WordVectors, keys: WordVectors, attention: Box<dyn Attention>) -> Self {
        Self {
            queries,
            keys,
            attention,
        }
    }

    /// Loads the configured word vectors
    ///
    /// A side without an embeddings file gets seeded random vectors over its
    /// sentence's words, sized to match the other side when that one is loaded.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, AttentionError> {
        config.validate()?;

        let loaded_queries = match &config.queries.embeddings {
            Some(path) => Some(WordVectors::load(path)?),
            None => None,
        };
        let loaded_keys = match &config.keys.embeddings {
            Some(path) => Some(WordVectors::load(path)?),
            None => None,
        };

        let random_dim = loaded_queries
            .as_ref()
            .or(loaded_keys.as_ref())
            .map(WordVectors::embed_dim)
            .unwrap_or(config.random_dim);

        let queries = match loaded_queries {
            Some(vectors) => vectors,
            None => random_vectors(&config.queries.sentence, random_dim, config.seed)?,
        };
        let keys = match loaded_keys {
            Some(vectors) => vectors,
            None => random_vectors(&config.keys.sentence, random_dim, config.seed.wrapping_add(1))?,
        };

        let attention = ScaledDotProductAttention::new(config.attention.clone());
        Ok(Self::new(queries, keys, Box::new(attention)))
    }

    /// Attends every query word over the key words, using the key embeddings as values
    pub fn align(&self, query_sentence: &str, key_sentence: &str) -> Result<Alignment, AttentionError> {
        let queries = self.queries.embed_sentence(query_sentence)?;
        let keys = self.keys.embed_sentence(key_sentence)?;
        log_sentence("queries", &queries);
        log_sentence("keys", &keys);

        let attended = self.attention.attend(
            queries.embeddings.view(),
            keys.embeddings.view(),
            keys.embeddings.view(),
        )?;

        info!(
            weights = ?attended.weights.dim(),
            output = ?attended.output.dim(),
            "computed attention"
        );

        Ok(Alignment {
            query_words: queries.words,
            key_words: keys.words,
            weights: attended.weights,
            output: attended.output,
        })
    }
}

fn random_vectors(sentence: &str, embed_dim: usize, seed: u64) -> Result<WordVectors, AttentionError> {
    let words = sentence.split_whitespace().map(str::to_lowercase);
    WordVectors::random(words, embed_dim, seed)
}

fn log_sentence(side: &str, sentence: &EmbeddedSentence) {
    let oov = sentence.tokens.iter().filter(|&&id| id == OOV_TOKEN).count();
    debug!(
        side,
        words = sentence.words.len(),
        oov,
        shape = ?sentence.embeddings.dim(),
        "embedded sentence"
    );
}
