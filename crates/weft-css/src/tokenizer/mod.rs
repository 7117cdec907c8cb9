//! CSS tokenizer module.
//!
//! ```
//! use weft_css::tokenizer::{CssToken, CssTokenizer, CssTokenizerOptions};
//!
//! let mut tokenizer = CssTokenizer::streaming(CssTokenizerOptions::default());
//! tokenizer.feed("a { col")?;
//! tokenizer.feed("or: red }")?;
//! tokenizer.end()?;
//! assert_eq!(tokenizer.tokens()[4], CssToken::ident("color"));
//! # Ok::<(), weft_common::Status>(())
//! ```

/// Token serialization per [CSS Syntax Level 3 § 9](https://www.w3.org/TR/css-syntax-3/#serialization).
pub mod serialize;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use serialize::{serialize_identifier, serialize_string, serialize_token, token_to_string};
pub use token::{CssToken, HashType, NumericType};
pub use tokenizer::{
    CssTokenizer, CssTokenizerError, CssTokenizerOptions, PullSource, tokenize, tokenize_with_spans,
};
