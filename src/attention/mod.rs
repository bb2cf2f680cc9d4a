//! Scaled dot-product (QKV) attention
mod attention;
pub use attention::{Attention, AttentionConfig, AttentionOutput};

mod scaled;
pub use scaled::{attention_qkv, calculate_weights, ScaledDotProductAttention};
