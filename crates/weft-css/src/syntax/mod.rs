//! CSS syntax: component values, the rule-grammar engine and the An+B
//! microsyntax.
//!
//! [CSS Syntax Module Level 3 § 5](https://www.w3.org/TR/css-syntax-3/#parsing)

/// An+B parsing per [§ 6](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax).
pub mod anb;
/// The rule-grammar engine and its consumer traits.
pub mod parser;
/// Component values and the token cursor.
pub mod values;

pub use anb::{AnB, parse_anb};
pub use parser::{
    AtRuleConsumer, AtRulePrelude, BlockConsumer, BlockContent, DeclarationsConsumer,
    ListRulesConsumer, QualifiedRuleConsumer, RuleConsumer, RuleParser, RuleStream,
};
pub use values::{
    ComponentValue, TokenCursor, consume_component_value, consume_component_values_until,
    parse_component_values, serialize_component_values, skip_component_value,
};
