use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{error::AttentionError, utils::SoftmaxKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionConfig {
    #[serde(default)]
    pub softmax: SoftmaxKind,
    /// Allowed deviation of a weight row sum from 1
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 { 1e-6 }

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            softmax: SoftmaxKind::default(),
            tolerance: default_tolerance(),
        }
    }
}

/// Weight matrix together with the aggregated values
#[derive(Debug, Clone)]
pub struct AttentionOutput {
    /// Shape: [query_count, key_count]
    pub weights: Array2<f64>,
    /// Shape: [query_count, value_dim]
    pub output: Array2<f64>,
}

/// Attention over a set of queries, keys and values
pub trait Attention {
    /// Row-normalized relevance of every key to every query
    fn weights(
        &self,
        queries: ArrayView2<f64>,
        keys: ArrayView2<f64>,
    ) -> Result<Array2<f64>, AttentionError>;

    /// Computes the weights and applies them to `values`
    fn attend(
        &self,
        queries: ArrayView2<f64>,
        keys: ArrayView2<f64>,
        values: ArrayView2<f64>,
    ) -> Result<AttentionOutput, AttentionError> {
        if keys.nrows() != values.nrows() {
            return Err(AttentionError::shape_mismatch(
                "value row count",
                keys.nrows(),
                values.nrows(),
            ));
        }

        let weights = self.weights(queries, keys)?;
        let output = weights.dot(&values);

        Ok(AttentionOutput { weights, output })
    }

    /// Attention output only, shape [query_count, value_dim]
    fn forward(
        &self,
        queries: ArrayView2<f64>,
        keys: ArrayView2<f64>,
        values: ArrayView2<f64>,
    ) -> Result<Array2<f64>, AttentionError> {
        self.attend(queries, keys, values).map(|attended| attended.output)
    }
}
