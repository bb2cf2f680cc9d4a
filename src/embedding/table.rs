use ndarray::{Array2, ArrayView2};
use ndarray_rand::RandomExt;
use rand::{rngs::SmallRng, SeedableRng};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::{
    error::AttentionError,
    tokenizer::{TokenId, OOV_TOKEN},
};

/// Token embedding lookup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingTable {
    weight: Array2<f64>, // Shape: [vocab_size, embed_dim]
}

impl EmbeddingTable {
    pub fn new(weight: Array2<f64>) -> Self {
        Self { weight }
    }

    /// Creates a table of standard normal vectors from a fixed seed
    pub fn random(vocab_size: usize, embed_dim: usize, seed: u64) -> Result<Self, AttentionError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).map_err(|e| AttentionError::Config(e.to_string()))?;

        Ok(Self {
            weight: Array2::random_using((vocab_size, embed_dim), normal, &mut rng),
        })
    }

    pub fn vocab_size(&self) -> usize {
        self.weight.nrows()
    }

    pub fn embed_dim(&self) -> usize {
        self.weight.ncols()
    }

    pub fn weight(&self) -> ArrayView2<'_, f64> {
        self.weight.view()
    }

    /// Maps tokens to rows of the table: input [seq_len], output [seq_len, embed_dim]
    ///
    /// [`OOV_TOKEN`] becomes an all-zero row so positions stay aligned with words.
    pub fn embed(&self, tokens: &[TokenId]) -> Result<Array2<f64>, AttentionError> {
        let mut output = Array2::zeros((tokens.len(), self.embed_dim()));

        for (t, &token_id) in tokens.iter().enumerate() {
            if token_id == OOV_TOKEN {
                continue;
            }
            let row = usize::try_from(token_id)
                .ok()
                .filter(|&idx| idx < self.vocab_size())
                .ok_or(AttentionError::InvalidTokenId(token_id))?;
            output.row_mut(t).assign(&self.weight.row(row));
        }

        Ok(output)
    }
}
