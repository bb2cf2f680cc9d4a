pub mod attention;
pub use attention::{attention_qkv, calculate_weights, Attention, AttentionConfig, ScaledDotProductAttention};

pub mod config;
pub use config::{PipelineConfig, SentenceConfig};

pub mod embedding;
pub use embedding::{EmbeddingTable, WordVectors};

pub mod pipeline;
pub use pipeline::{Alignment, CrossAttention};

pub mod report;

pub mod tokenizer;
pub use tokenizer::{TokenId, Tokenizer, WordTokenizer, OOV_TOKEN};

pub mod utils;
pub use utils::{softmax, softmax_with, SoftmaxKind};

pub mod error;
pub use error::AttentionError;
