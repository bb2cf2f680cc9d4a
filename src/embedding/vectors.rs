use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::{
    embedding::EmbeddingTable,
    error::AttentionError,
    tokenizer::{TokenId, Tokenizer, WordTokenizer},
    utils::io::{self, IoError},
};

/// A sentence after tokenization and embedding
#[derive(Debug, Clone)]
pub struct EmbeddedSentence {
    pub words: Vec<String>,
    pub tokens: Vec<TokenId>,
    /// Shape: [words.len(), embed_dim]
    pub embeddings: Array2<f64>,
}

/// Pre-trained word vectors: a vocabulary and the table it indexes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordVectors {
    tokenizer: WordTokenizer,
    table: EmbeddingTable,
}

impl WordVectors {
    /// Pairs a vocabulary with a table, checking every index has a row
    pub fn new(tokenizer: WordTokenizer, table: EmbeddingTable) -> Result<Self, AttentionError> {
        let rows = table.vocab_size();
        if let Some(max_id) = tokenizer.max_index() {
            if max_id >= rows {
                return Err(AttentionError::ShapeMismatch(format!(
                    "vocabulary index {max_id} out of range for {rows} embedding rows"
                )));
            }
        }

        Ok(Self { tokenizer, table })
    }

    /// Seeded random vectors for the given words, in order of first appearance
    pub fn random<I, S>(words: I, embed_dim: usize, seed: u64) -> Result<Self, AttentionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokenizer = WordTokenizer::from_words(words);
        let table = EmbeddingTable::random(tokenizer.vocab_size(), embed_dim, seed)?;
        Self::new(tokenizer, table)
    }

    /// Parses the whitespace-separated text format, one `word v1 ... vD` per line
    ///
    /// A leading `count dim` header line, as word2vec writes, is skipped.
    pub fn from_text(text: &str) -> Result<Self, AttentionError> {
        let mut words = Vec::new();
        let mut values = Vec::new();
        let mut embed_dim = None;
        let mut header_count = None;
        let lines: Vec<&str> = text.lines().collect();

        for (line_no, line) in lines.iter().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let fields: Vec<&str> = fields.collect();

            if line_no == 0 {
                if let Some(count) = word2vec_header(word, &fields, &lines[1..]) {
                    debug!(header = *line, "skipping word2vec header");
                    header_count = Some(count);
                    continue;
                }
            }

            let row = fields
                .iter()
                .map(|f| f.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| invalid_format(line_no, format!("bad value for '{word}': {e}")))?;

            match embed_dim {
                None if row.is_empty() => {
                    return Err(invalid_format(line_no, format!("no values for '{word}'")));
                }
                None => embed_dim = Some(row.len()),
                Some(dim) if dim != row.len() => {
                    return Err(invalid_format(
                        line_no,
                        format!("'{word}' has {} values, expected {dim}", row.len()),
                    ));
                }
                Some(_) => {}
            }

            words.push(word.to_string());
            values.extend(row);
        }

        let embed_dim = embed_dim.unwrap_or(0);
        let vocab_size = words.len();
        if let Some(count) = header_count {
            if count != vocab_size {
                return Err(AttentionError::Io(IoError::InvalidFormat(format!(
                    "header announces {count} words, found {vocab_size}"
                ))));
            }
        }
        let tokenizer = WordTokenizer::from_words(words);
        if tokenizer.vocab_size() != vocab_size {
            return Err(AttentionError::Io(IoError::InvalidFormat(
                "duplicate word in embeddings file".to_string(),
            )));
        }

        let weight = Array2::from_shape_vec((vocab_size, embed_dim), values)
            .map_err(|e| AttentionError::ShapeMismatch(e.to_string()))?;

        Self::new(tokenizer, EmbeddingTable::new(weight))
    }

    /// Loads word vectors, bincode for `.bin` files and the text format otherwise
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AttentionError> {
        let path = path.as_ref();
        let vectors = match path.extension().and_then(|ext| ext.to_str()) {
            Some("bin") => {
                let loaded: WordVectors = io::deserialize_from_file(path)?;
                Self::new(loaded.tokenizer, loaded.table)?
            }
            _ => Self::from_text(&io::read_to_string(path)?)?,
        };

        info!(
            path = %path.display(),
            words = vectors.tokenizer.vocab_size(),
            embed_dim = vectors.embed_dim(),
            "loaded word vectors"
        );
        Ok(vectors)
    }

    /// Saves the vectors as bincode
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AttentionError> {
        io::serialize_to_file(path, self)?;
        Ok(())
    }

    pub fn tokenizer(&self) -> &WordTokenizer {
        &self.tokenizer
    }

    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }

    pub fn embed_dim(&self) -> usize {
        self.table.embed_dim()
    }

    /// Tokenizes and embeds a sentence
    pub fn embed_sentence(&self, sentence: &str) -> Result<EmbeddedSentence, AttentionError> {
        let words = self.tokenizer.words(sentence);
        let tokens = self.tokenizer.encode(sentence);
        let embeddings = self.table.embed(&tokens)?;

        Ok(EmbeddedSentence {
            words,
            tokens,
            embeddings,
        })
    }
}

/// Word count of a `count dim` header line
///
/// Two integers only count as a header when `dim` matches the number of
/// values on the next non-blank line; otherwise they are a one-value row.
fn word2vec_header(first: &str, rest: &[&str], following: &[&str]) -> Option<usize> {
    let [dim] = rest else {
        return None;
    };
    let count = first.parse::<usize>().ok()?;
    let dim = dim.parse::<usize>().ok()?;

    let next_dim = following
        .iter()
        .map(|line| line.split_whitespace().count())
        .find(|&fields| fields > 0)?
        - 1;

    (next_dim == dim).then_some(count)
}

fn invalid_format(line_no: usize, message: String) -> AttentionError {
    AttentionError::Io(IoError::InvalidFormat(format!(
        "line {}: {}",
        line_no + 1,
        message
    )))
}
