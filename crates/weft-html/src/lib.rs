//! Incremental HTML parsing per the [WHATWG HTML Living Standard](https://html.spec.whatwg.org/multipage/parsing.html).
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data, CDATA and PLAINTEXT
//!   - Named and numeric character references
//!   - Input in arbitrary chunks, as text or as bytes in any WHATWG encoding
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes and the stack of template insertion modes
//!   - Foster parenting, the adoption agency algorithm, foreign content
//!   - Quirks-mode detection from the DOCTYPE
//!
//! Nodes are owned by a [`TreeSink`]; `weft-dom` provides one.
//!
//! # Not Implemented
//!
//! - Fragment parsing
//! - Script execution and `document.write`
//! - Encoding changes requested by `<meta charset>`

/// The tokenizer and tree builder joined together.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;
/// Tree construction from tokens.
pub mod tree_builder;

pub use parser::{HtmlParser, ParsedDocument, parse_document};
pub use tokenizer::{Token, Tokenizer, TokenizerError, TokenizerOptions};
pub use tree_builder::{
    InsertionMode, Namespace, NodeOrText, QuirksMode, TreeBuilder, TreeBuilderError,
    TreeBuilderOptions, TreeSink,
};
