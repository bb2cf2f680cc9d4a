use ndarray::{Array2, ArrayView2, Axis};
use tracing::warn;

use crate::{
    attention::{Attention, AttentionConfig},
    error::AttentionError,
    utils::{is_row_stochastic, softmax_with},
};

/// softmax(Q · Kᵀ / sqrt(d)) attention
#[derive(Debug, Clone, Default)]
pub struct ScaledDotProductAttention {
    pub config: AttentionConfig,
}

impl ScaledDotProductAttention {
    pub fn new(config: AttentionConfig) -> Self {
        Self { config }
    }
}

impl Attention for ScaledDotProductAttention {
    fn weights(
        &self,
        queries: ArrayView2<f64>,
        keys: ArrayView2<f64>,
    ) -> Result<Array2<f64>, AttentionError> {
        let embed_dim = queries.ncols();
        if keys.ncols() != embed_dim {
            return Err(AttentionError::shape_mismatch(
                "key embedding dimension",
                embed_dim,
                keys.ncols(),
            ));
        }
        if embed_dim == 0 {
            return Err(AttentionError::ShapeMismatch(
                "embedding dimension must be non-zero".to_string(),
            ));
        }

        // Scores = Q * K^T / sqrt(d)
        let scores = queries.dot(&keys.t()) / (embed_dim as f64).sqrt();

        // Each query row becomes a distribution over the keys
        let weights = softmax_with(scores.view(), Axis(1), self.config.softmax);

        if !is_row_stochastic(weights.view(), self.config.tolerance) {
            warn!(
                queries = queries.nrows(),
                keys = keys.nrows(),
                softmax = ?self.config.softmax,
                "attention weight rows do not sum to 1"
            );
        }

        Ok(weights)
    }
}

/// Computes attention weights with the default configuration
/// # Arguments
/// * `queries` - [query_count, embed_dim]
/// * `keys` - [key_count, embed_dim]
pub fn calculate_weights(
    queries: ArrayView2<f64>,
    keys: ArrayView2<f64>,
) -> Result<Array2<f64>, AttentionError> {
    ScaledDotProductAttention::default().weights(queries, keys)
}

/// Computes the attention output `weights · values` with the default configuration
/// # Arguments
/// * `queries` - [query_count, embed_dim]
/// * `keys` - [key_count, embed_dim]
/// * `values` - [key_count, value_dim]
pub fn attention_qkv(
    queries: ArrayView2<f64>,
    keys: ArrayView2<f64>,
    values: ArrayView2<f64>,
) -> Result<Array2<f64>, AttentionError> {
    ScaledDotProductAttention::default().forward(queries, keys, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{softmax, SoftmaxKind};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use ndarray_rand::RandomExt;
    use rand::{rngs::SmallRng, SeedableRng};
    use rand_distr::Normal;

    fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Array2::random_using((rows, cols), Normal::new(0.0, 1.0).unwrap(), &mut rng)
    }

    #[test]
    fn test_weight_rows_sum_to_one() -> Result<(), AttentionError> {
        let queries = random_matrix(14, 300, 1);
        let keys = random_matrix(10, 300, 2);

        let weights = calculate_weights(queries.view(), keys.view())?;

        assert_eq!(weights.dim(), (14, 10));
        for row in weights.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-6);
        }
        assert!(weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
        Ok(())
    }

    #[test]
    fn test_single_row_self_attention() -> Result<(), AttentionError> {
        let x = array![[0.4, -1.3, 2.2]];
        let weights = calculate_weights(x.view(), x.view())?;

        assert_eq!(weights, array![[1.0]]);
        Ok(())
    }

    #[test]
    fn test_known_weights_and_output() -> Result<(), AttentionError> {
        let queries = array![[1.0, 0.0]];
        let keys = array![[1.0, 0.0], [0.0, 1.0]];
        let values = array![[1.0, 2.0], [3.0, 4.0]];

        let attended = ScaledDotProductAttention::default().attend(
            queries.view(),
            keys.view(),
            values.view(),
        )?;

        // Scores are [1/sqrt(2), 0]
        let s = 1.0 / 2f64.sqrt();
        let w0 = s.exp() / (s.exp() + 1.0);
        let w1 = 1.0 - w0;
        assert_abs_diff_eq!(attended.weights[[0, 0]], w0, epsilon = 1e-12);
        assert_abs_diff_eq!(attended.weights[[0, 1]], w1, epsilon = 1e-12);
        assert_abs_diff_eq!(attended.output[[0, 0]], w0 * 1.0 + w1 * 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(attended.output[[0, 1]], w0 * 2.0 + w1 * 4.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_output_shape() -> Result<(), AttentionError> {
        let queries = random_matrix(14, 300, 3);
        let keys = random_matrix(10, 300, 4);
        let values = random_matrix(10, 300, 5);

        let output = attention_qkv(queries.view(), keys.view(), values.view())?;
        assert_eq!(output.dim(), (14, 300));

        // Values may be narrower than queries and keys
        let narrow = random_matrix(10, 7, 6);
        let output = attention_qkv(queries.view(), keys.view(), narrow.view())?;
        assert_eq!(output.dim(), (14, 7));
        Ok(())
    }

    #[test]
    fn test_embedding_dimension_mismatch() {
        let queries = Array2::<f64>::ones((3, 4));
        let keys = Array2::<f64>::ones((3, 5));

        let result = calculate_weights(queries.view(), keys.view());
        assert!(matches!(result, Err(AttentionError::ShapeMismatch(_))));
    }

    #[test]
    fn test_zero_embedding_dimension() {
        let queries = Array2::<f64>::zeros((2, 0));
        let keys = Array2::<f64>::zeros((3, 0));

        let result = calculate_weights(queries.view(), keys.view());
        assert!(matches!(result, Err(AttentionError::ShapeMismatch(_))));
    }

    #[test]
    fn test_value_row_mismatch() {
        let queries = Array2::<f64>::ones((2, 4));
        let keys = Array2::<f64>::ones((3, 4));
        let values = Array2::<f64>::ones((4, 4));

        let result = attention_qkv(queries.view(), keys.view(), values.view());
        assert!(matches!(result, Err(AttentionError::ShapeMismatch(_))));
    }

    #[test]
    fn test_deterministic() -> Result<(), AttentionError> {
        let queries = random_matrix(5, 16, 7);
        let keys = random_matrix(6, 16, 8);
        let values = random_matrix(6, 3, 9);

        let first = attention_qkv(queries.view(), keys.view(), values.view())?;
        let second = attention_qkv(queries.view(), keys.view(), values.view())?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_scaling_keys_sharpens_predictably() -> Result<(), AttentionError> {
        let queries = random_matrix(4, 8, 10);
        let keys = random_matrix(5, 8, 11);
        let c = 3.0;
        let scaled_keys = &keys * c;

        let base = calculate_weights(queries.view(), keys.view())?;
        let scaled = calculate_weights(queries.view(), scaled_keys.view())?;
        assert_ne!(base, scaled);

        // Scaling the keys by c scales every score by c
        let scores = queries.dot(&keys.t()) / 8f64.sqrt() * c;
        let expected = softmax(scores.view(), Axis(1));
        for (got, want) in scaled.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }

        let again = calculate_weights(queries.view(), scaled_keys.view())?;
        assert_eq!(scaled, again);
        Ok(())
    }

    #[test]
    fn test_naive_softmax_config() -> Result<(), AttentionError> {
        let attention = ScaledDotProductAttention::new(AttentionConfig {
            softmax: SoftmaxKind::Naive,
            ..AttentionConfig::default()
        });
        let queries = random_matrix(3, 4, 12);
        let keys = random_matrix(3, 4, 13);

        let naive = attention.weights(queries.view(), keys.view())?;
        let stable = calculate_weights(queries.view(), keys.view())?;
        for (n, s) in naive.iter().zip(stable.iter()) {
            assert_abs_diff_eq!(*n, *s, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_inputs_untouched() -> Result<(), AttentionError> {
        let queries = array![[1.0, 2.0]];
        let keys = array![[3.0, 4.0], [5.0, 6.0]];
        let values = keys.clone();

        let _ = attention_qkv(queries.view(), keys.view(), values.view())?;
        assert_eq!(queries, array![[1.0, 2.0]]);
        assert_eq!(keys, values);
        Ok(())
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_entries(len: usize) -> impl Strategy<Value = Vec<f64>> {
            proptest::collection::vec(-5.0f64..5.0, len)
        }

        prop_compose! {
            fn arb_qkv()(
                q_len in 1_usize..=16,
                k_len in 1_usize..=16,
                embed_dim in 1_usize..=16,
                value_dim in 1_usize..=16,
            )(
                q in arb_entries(q_len * embed_dim),
                k in arb_entries(k_len * embed_dim),
                v in arb_entries(k_len * value_dim),
                q_len in Just(q_len),
                k_len in Just(k_len),
                embed_dim in Just(embed_dim),
                value_dim in Just(value_dim),
            ) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
                (
                    Array2::from_shape_vec((q_len, embed_dim), q).unwrap(),
                    Array2::from_shape_vec((k_len, embed_dim), k).unwrap(),
                    Array2::from_shape_vec((k_len, value_dim), v).unwrap(),
                )
            }
        }

        proptest! {
            #[test]
            fn prop_weight_rows_sum_to_one((queries, keys, _values) in arb_qkv()) {
                let weights = calculate_weights(queries.view(), keys.view()).unwrap();
                prop_assert_eq!(weights.dim(), (queries.nrows(), keys.nrows()));
                for row in weights.rows() {
                    prop_assert!((row.sum() - 1.0).abs() < 1e-6, "row sum = {}", row.sum());
                }
            }

            #[test]
            fn prop_weight_entries_in_unit_range((queries, keys, _values) in arb_qkv()) {
                let weights = calculate_weights(queries.view(), keys.view()).unwrap();
                for &w in weights.iter() {
                    prop_assert!((0.0..=1.0).contains(&w), "weight = {}", w);
                }
            }

            #[test]
            fn prop_output_shape((queries, keys, values) in arb_qkv()) {
                let output = attention_qkv(queries.view(), keys.view(), values.view()).unwrap();
                prop_assert_eq!(output.dim(), (queries.nrows(), values.ncols()));
            }
        }
    }
}
