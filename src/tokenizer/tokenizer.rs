use std::path::Path;

use crate::tokenizer::TokenizerError;

/// Row index into an embedding matrix, or [`OOV_TOKEN`]
pub type TokenId = i64;

/// Token emitted for words missing from the vocabulary
pub const OOV_TOKEN: TokenId = -1;

/// Text decoded for [`OOV_TOKEN`]
pub const UNK_WORD: &str = "[UNK]";

/// Trait that all tokenizers must implement
pub trait Tokenizer {
    /// Encodes text into tokens, one per word
    fn encode(&self, text: &str) -> Vec<TokenId>;

    /// Decodes tokens back into words
    fn decode(&self, tokens: &[TokenId]) -> Result<Vec<String>, TokenizerError>;

    /// Gets the vocabulary size
    fn vocab_size(&self) -> usize;

    /// Saves the tokenizer to disk
    fn save(&self, path: &Path) -> Result<(), TokenizerError>;
}
