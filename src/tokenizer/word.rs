use super::{TokenId, Tokenizer, TokenizerError, OOV_TOKEN, UNK_WORD};
use serde::{Deserialize, Serialize};
use crate::utils::io;
use std::collections::HashMap;
use std::path::Path;

/// Whitespace word-level tokenizer over a fixed vocabulary
///
/// Serializes as a plain `{"word": index}` map, the same layout the JSON
/// vocabulary files use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, usize>",
    into = "HashMap<String, usize>"
)]
pub struct WordTokenizer {
    stoi: HashMap<String, usize>,
    itos: HashMap<usize, String>,
}

impl WordTokenizer {
    /// Creates a tokenizer from a word-to-index mapping
    pub fn from_vocab(stoi: HashMap<String, usize>) -> Result<Self, TokenizerError> {
        let mut itos = HashMap::with_capacity(stoi.len());
        for (word, &id) in &stoi {
            if itos.insert(id, word.clone()).is_some() {
                return Err(TokenizerError::DuplicateIndex(id));
            }
        }

        Ok(Self { stoi, itos })
    }

    /// Creates a tokenizer indexing words in order of first appearance
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stoi = HashMap::new();
        let mut itos = HashMap::new();

        for word in words {
            let word = word.into();
            if stoi.contains_key(&word) {
                continue;
            }
            let id = stoi.len();
            itos.insert(id, word.clone());
            stoi.insert(word, id);
        }

        Self { stoi, itos }
    }

    /// Loads a JSON `{"word": index}` vocabulary
    pub fn load(path: &Path) -> Result<Self, TokenizerError> {
        let contents = io::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(TokenizerError::serialization)
    }

    /// Splits text into lower-cased words
    pub fn words(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }

    /// Gets the index of a word, if it is in the vocabulary
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.stoi.get(word).copied()
    }

    /// Largest index in the vocabulary
    pub fn max_index(&self) -> Option<usize> {
        self.itos.keys().max().copied()
    }
}

impl TryFrom<HashMap<String, usize>> for WordTokenizer {
    type Error = TokenizerError;

    fn try_from(stoi: HashMap<String, usize>) -> Result<Self, Self::Error> {
        Self::from_vocab(stoi)
    }
}

impl From<WordTokenizer> for HashMap<String, usize> {
    fn from(tokenizer: WordTokenizer) -> Self {
        tokenizer.stoi
    }
}

impl Tokenizer for WordTokenizer {
    fn encode(&self, text: &str) -> Vec<TokenId> {
        self.words(text)
            .iter()
            .map(|word| {
                self.index_of(word)
                    .map(|id| id as TokenId)
                    .unwrap_or(OOV_TOKEN)
            })
            .collect()
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<Vec<String>, TokenizerError> {
        tokens
            .iter()
            .map(|&id| {
                if id == OOV_TOKEN {
                    return Ok(UNK_WORD.to_string());
                }
                usize::try_from(id)
                    .ok()
                    .and_then(|idx| self.itos.get(&idx))
                    .cloned()
                    .ok_or(TokenizerError::InvalidTokenId(id))
            })
            .collect()
    }

    fn vocab_size(&self) -> usize {
        self.stoi.len()
    }

    fn save(&self, path: &Path) -> Result<(), TokenizerError> {
        let serialized = serde_json::to_string(self).map_err(TokenizerError::serialization)?;
        io::write_string(path, serialized)?;
        Ok(())
    }
}
