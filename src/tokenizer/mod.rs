mod error;
mod tokenizer;
mod word;

pub use error::TokenizerError;
pub use tokenizer::{TokenId, Tokenizer, OOV_TOKEN, UNK_WORD};
pub use word::WordTokenizer;
