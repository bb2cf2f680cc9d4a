//! Word embeddings: lookup tables and the vocabularies that index them
mod table;
mod vectors;

pub use table::EmbeddingTable;
pub use vectors::{EmbeddedSentence, WordVectors};
