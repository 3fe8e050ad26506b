//! CSS tokenizer module.

/// Restartable token ranges consumed by the selector parser.
pub mod range;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
pub mod tokenizer;

pub use range::TokenRange;
pub use token::{CSSToken, HashType, NumericSign, NumericType};
pub use tokenizer::CSSTokenizer;
