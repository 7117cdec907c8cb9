//! CSS tokenizer, rule-grammar engine and selector parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Whole-input, push (chunked) and pull (on-demand) input
//!   - Serialization back to CSS per [§ 9](https://www.w3.org/TR/css-syntax-3/#serialization)
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - A grammar engine driven by consumer traits, one per grammar production
//!   - Stylesheets, declaration lists and component value lists
//!   - Nested style rules ([CSS Nesting](https://www.w3.org/TR/css-nesting-1/))
//!   - The An+B microsyntax
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, ID, class and attribute selectors, with namespaces
//!   - Pseudo-classes, pseudo-elements and functional pseudo-classes
//!     (`:is`, `:where`, `:not`, `:has`, `:nth-*` with `of S`)
//!   - Forgiving and relative selector lists
//!   - Specificity calculation and serialization
//!
//! Recovered problems are recorded in a [`CssLog`].
//!
//! # Not Implemented
//!
//! - Selector matching and the cascade
//! - Property value grammars
//! - The nesting selector `&`

/// Structured diagnostics.
pub mod log;
/// CSS selector parsing per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Stylesheet object model.
pub mod stylesheet;
/// CSS parsing per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod syntax;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

pub use log::{CssLog, CssLogKind, CssLogMessage};
pub use selector::{SelectorParser, Selectors, Specificity};
pub use stylesheet::{
    AtRule, AtRuleBlock, Declaration, Rule, StyleRule, Stylesheet, StylesheetBuilder,
    StylesheetParser, parse_declarations, parse_stylesheet,
};
pub use syntax::{ComponentValue, RuleParser, parse_component_values};
pub use tokenizer::{CssToken, CssTokenizer, CssTokenizerOptions, tokenize};
