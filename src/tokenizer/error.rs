use std::fmt;
use thiserror::Error;

use crate::utils::io::IoError;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid token ID: {0}")]
    InvalidTokenId(i64),

    #[error("Index {0} is assigned to more than one word")]
    DuplicateIndex(usize),
}

impl TokenizerError {
    pub fn serialization(e: impl fmt::Display) -> Self {
        TokenizerError::Serialization(e.to_string())
    }
}
