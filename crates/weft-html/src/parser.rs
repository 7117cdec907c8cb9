//! The HTML parser: the tokenizer feeding the tree builder.
//!
//! [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
//!
//! ```
//! # use weft_html::parser::HtmlParser;
//! # fn run<S: weft_html::TreeSink>(sink: S) -> weft_common::Result<()> {
//! let mut parser = HtmlParser::new(sink);
//! parser.feed_str("<p>Hello")?;
//! parser.feed_str(", world</p>")?;
//! let document = parser.finish()?;
//! assert!(document.tree_errors.iter().any(|e| e.code.to_string() == "unexpected-token-in-initial-mode"));
//! # Ok(())
//! # }
//! ```

use weft_common::{ParseError, Result};

use crate::tokenizer::{Tokenizer, TokenizerError, TokenizerOptions};
use crate::tree_builder::{QuirksMode, TreeBuilder, TreeBuilderError, TreeBuilderOptions, TreeSink};

/// What parsing a document produced.
#[derive(Debug)]
pub struct ParsedDocument<S> {
    /// The sink holding the tree.
    pub sink: S,
    /// The document mode the DOCTYPE selected.
    pub quirks_mode: QuirksMode,
    /// Tokenization parse errors, in input order.
    pub tokenizer_errors: Vec<ParseError<TokenizerError>>,
    /// Tree-construction parse errors, in input order.
    pub tree_errors: Vec<ParseError<TreeBuilderError>>,
}

/// An incremental HTML parser building a tree in `S`.
///
/// Chunks may be fed as `&str` or as bytes in the configured encoding; the
/// resulting tree and errors do not depend on where chunks are split.
pub struct HtmlParser<S: TreeSink> {
    tokenizer: Tokenizer<TreeBuilder<S>>,
}

impl<S: TreeSink> HtmlParser<S> {
    /// A parser with default options.
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, TokenizerOptions::default(), TreeBuilderOptions::default())
    }

    /// A parser with explicit tokenizer and tree builder options.
    pub fn with_options(
        sink: S,
        tokenizer_options: TokenizerOptions,
        tree_builder_options: TreeBuilderOptions,
    ) -> Self {
        let tree_builder = TreeBuilder::new(sink, tree_builder_options);
        Self {
            tokenizer: Tokenizer::with_options(tree_builder, tokenizer_options),
        }
    }

    /// Parse a chunk of decoded text.
    ///
    /// # Errors
    /// Whatever the tokenizer or the sink reports; parsing stops at the first
    /// error.
    pub fn feed_str(&mut self, chunk: &str) -> Result<()> {
        self.tokenizer.feed_str(chunk)
    }

    /// Parse a chunk of bytes in the tokenizer's encoding.
    ///
    /// # Errors
    /// As for [`HtmlParser::feed_str`].
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Result<()> {
        self.tokenizer.feed_bytes(chunk)
    }

    /// Signal the end of input.
    ///
    /// # Errors
    /// As for [`HtmlParser::feed_str`].
    pub fn end(&mut self) -> Result<()> {
        self.tokenizer.end()
    }

    /// The tree builder, for inspecting the insertion mode or the sink.
    pub const fn tree_builder(&self) -> &TreeBuilder<S> {
        self.tokenizer.sink()
    }

    /// Tokenization parse errors recorded so far.
    pub fn tokenizer_errors(&self) -> &[ParseError<TokenizerError>] {
        self.tokenizer.errors()
    }

    /// Tree-construction parse errors recorded so far.
    pub fn tree_errors(&self) -> &[ParseError<TreeBuilderError>] {
        self.tokenizer.sink().errors()
    }

    /// End the input if that has not happened yet and hand back the tree.
    ///
    /// # Errors
    /// As for [`HtmlParser::end`].
    pub fn finish(mut self) -> Result<ParsedDocument<S>> {
        if !self.tokenizer.is_finished() {
            self.tokenizer.end()?;
        }
        let tokenizer_errors = self.tokenizer.errors().to_vec();
        let tree_builder = self.tokenizer.into_sink();
        let tree_errors = tree_builder.errors().to_vec();
        let quirks_mode = tree_builder.quirks_mode();
        Ok(ParsedDocument {
            sink: tree_builder.into_sink(),
            quirks_mode,
            tokenizer_errors,
            tree_errors,
        })
    }
}

/// Parse a complete document into `sink`.
///
/// # Errors
/// Whatever the sink reports.
pub fn parse_document<S: TreeSink>(sink: S, input: &str) -> Result<ParsedDocument<S>> {
    let mut parser = HtmlParser::new(sink);
    parser.feed_str(input)?;
    parser.finish()
}
