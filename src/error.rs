// error.rs
use thiserror::Error;

use crate::tokenizer::TokenizerError;
use crate::utils::io::IoError;

#[derive(Error, Debug)]
pub enum AttentionError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid token ID: {0}")]
    InvalidTokenId(i64),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AttentionError {
    pub fn shape_mismatch(what: &str, expected: usize, found: usize) -> Self {
        AttentionError::ShapeMismatch(format!("{what}: expected {expected}, got {found}"))
    }
}
