//! Stylesheet object model built from the grammar engine.
//!
//! [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
//! [CSS Nesting § 2](https://www.w3.org/TR/css-nesting-1/#nesting)
//!
//! [`StylesheetBuilder`] is one consumer of [`RuleParser`]: style rule
//! preludes go to the [`SelectorParser`], declarations are collected per
//! block and at-rule blocks are read as rules, declarations or raw
//! component values depending on the at-rule's name.

use log::debug;
use serde::Serialize;
use weft_common::{Result, Span, Status};

use crate::log::CssLog;
use crate::selector::{SelectorParser, Selectors};
use crate::syntax::{
    AtRuleConsumer, AtRulePrelude, BlockConsumer, BlockContent, ComponentValue,
    DeclarationsConsumer, ListRulesConsumer, QualifiedRuleConsumer, RuleParser,
};
use crate::tokenizer::{CssToken, tokenize_with_spans};

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// The property name.
    pub name: String,
    /// The property value as component values, without `!important`.
    pub value: Vec<ComponentValue>,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

/// A CSS style rule (selectors + declarations).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    /// The parsed selector list of the prelude.
    pub selectors: Selectors,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
    /// Style and conditional rules nested in the block.
    pub nested_rules: Vec<Rule>,
}

/// Contents of an at-rule's `{}` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtRuleBlock {
    /// A list of rules, as in `@media`.
    Rules(Vec<Rule>),
    /// Declarations and any nested rules, as in `@font-face` or `@media`
    /// nested in a style rule.
    Declarations {
        /// The declarations in source order.
        declarations: Vec<Declaration>,
        /// Nested rules in source order.
        rules: Vec<Rule>,
    },
    /// Unparsed component values.
    Values(Vec<ComponentValue>),
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
///
/// A CSS at-rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRule {
    /// The at-keyword name (without the `@`), lowercased.
    pub name: String,
    /// The prelude component values.
    pub prelude: Vec<ComponentValue>,
    /// The block, if the rule has one.
    pub block: Option<AtRuleBlock>,
}

/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

impl Rule {
    /// Move out the rules nested in this one.
    fn take_nested(&mut self) -> Vec<Self> {
        match self {
            Self::Style(style) => std::mem::take(&mut style.nested_rules),
            Self::At(AtRule {
                block:
                    Some(AtRuleBlock::Rules(rules) | AtRuleBlock::Declarations { rules, .. }),
                ..
            }) => std::mem::take(rules),
            Self::At(_) => Vec::new(),
        }
    }
}

impl Drop for Rule {
    /// Nested rules are released from a flat list, so dropping deeply
    /// nested blocks does not recurse once per level.
    fn drop(&mut self) {
        let mut pending = self.take_nested();
        while let Some(mut rule) = pending.pop() {
            pending.append(&mut rule.take_nested());
        }
    }
}

/// A parsed CSS stylesheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
}

/// Which grammar an at-rule's block uses.
///
/// Conditional group rules nested in a style rule hold declarations
/// ([CSS Nesting § 3.2](https://www.w3.org/TR/css-nesting-1/#conditionals)).
fn block_content(name: &str, in_style_rule: bool) -> BlockContent {
    match name {
        "media" | "supports" | "container" | "layer" | "scope" | "starting-style"
            if in_style_rule =>
        {
            BlockContent::Declarations
        }
        "media" | "supports" | "container" | "layer" | "scope" | "starting-style"
        | "document" | "-moz-document" => BlockContent::Rules,
        "font-face" | "page" | "property" | "counter-style" | "font-palette-values"
        | "viewport" | "-ms-viewport" | "position-try" => BlockContent::Declarations,
        _ => BlockContent::ComponentValues,
    }
}

/// An open rule whose block is still being read.
#[derive(Debug)]
enum Open {
    Root {
        rules: Vec<Rule>,
        declarations: Vec<Declaration>,
    },
    Style(StyleRule),
    At {
        rule: AtRule,
        content: BlockContent,
        rules: Vec<Rule>,
        declarations: Vec<Declaration>,
    },
}

impl Open {
    fn add_rule(&mut self, rule: Rule) {
        match self {
            Self::Root { rules, .. } | Self::At { rules, .. } => rules.push(rule),
            Self::Style(style) => style.nested_rules.push(rule),
        }
    }

    fn add_declaration(&mut self, declaration: Declaration) {
        match self {
            Self::Root { declarations, .. } | Self::At { declarations, .. } => {
                declarations.push(declaration);
            }
            Self::Style(style) => style.declarations.push(declaration),
        }
    }
}

/// [`RuleParser`] consumer that builds a [`Stylesheet`].
#[derive(Debug)]
pub struct StylesheetBuilder {
    stack: Vec<Open>,
    pending: Option<Declaration>,
    selectors: SelectorParser,
    log: CssLog,
}

impl Default for StylesheetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StylesheetBuilder {
    /// Create a builder with an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Open::Root {
                rules: Vec::new(),
                declarations: Vec::new(),
            }],
            pending: None,
            selectors: SelectorParser::new(),
            log: CssLog::new(),
        }
    }

    fn top(&mut self) -> Result<&mut Open> {
        self.stack.last_mut().ok_or(Status::Failed)
    }

    /// Close rules left open by a stopped parse, then hand back the root
    /// contents and the selector diagnostics.
    fn finish(mut self) -> Result<(Vec<Rule>, Vec<Declaration>, CssLog)> {
        while self.stack.len() > 1 {
            self.close()?;
        }
        match self.stack.pop() {
            Some(Open::Root {
                rules,
                declarations,
            }) => Ok((rules, declarations, self.log)),
            _ => Err(Status::Failed),
        }
    }

    /// The stylesheet built so far, with rules still open closed, and the
    /// selector diagnostics.
    ///
    /// # Errors
    /// [`Status::Failed`] if the rule stack lost its root.
    pub fn into_stylesheet(self) -> Result<(Stylesheet, CssLog)> {
        let (rules, _, log) = self.finish()?;
        Ok((Stylesheet { rules }, log))
    }

    /// Pop the top rule and attach it to its parent.
    fn close(&mut self) -> Result<()> {
        let rule = match self.stack.pop() {
            Some(Open::Style(style)) => Rule::Style(style),
            Some(Open::At {
                mut rule,
                content,
                rules,
                declarations,
            }) => {
                rule.block = match content {
                    BlockContent::Rules => Some(AtRuleBlock::Rules(rules)),
                    BlockContent::Declarations => Some(AtRuleBlock::Declarations {
                        declarations,
                        rules,
                    }),
                    // Filled by `block`.
                    BlockContent::ComponentValues | BlockContent::Ignore => rule.block,
                };
                Rule::At(rule)
            }
            Some(root @ Open::Root { .. }) => {
                self.stack.push(root);
                return Err(Status::Failed);
            }
            None => return Err(Status::Failed),
        };
        self.top()?.add_rule(rule);
        Ok(())
    }

    fn in_style_rule(&self) -> bool {
        matches!(self.stack.last(), Some(Open::Style(_)))
    }
}

impl ListRulesConsumer for StylesheetBuilder {}

impl AtRuleConsumer for StylesheetBuilder {
    fn at_rule_prelude(&mut self, prelude: AtRulePrelude<'_>) -> Result<BlockContent> {
        let name = prelude.name.to_ascii_lowercase();
        let content = if prelude.has_block {
            block_content(&name, self.in_style_rule())
        } else {
            BlockContent::Ignore
        };
        debug!(target: "css.syntax", "@{name} ({content:?})");

        Status::reserve(&mut self.stack, 1)?;
        self.stack.push(Open::At {
            rule: AtRule {
                name,
                prelude: prelude.prelude.to_vec(),
                block: None,
            },
            content,
            rules: Vec::new(),
            declarations: Vec::new(),
        });
        Ok(content)
    }

    fn at_rule_end(&mut self) -> Result<()> {
        self.close()
    }
}

impl QualifiedRuleConsumer for StylesheetBuilder {
    fn qualified_rule_prelude(
        &mut self,
        prelude: &[CssToken],
        spans: &[Span],
        nested: bool,
    ) -> Result<bool> {
        // [CSS Nesting § 2](https://www.w3.org/TR/css-nesting-1/#syntax)
        // "The prelude of the qualified rule is parsed as a <relative-selector-list>."
        let selectors = match self.selectors.parse_tokens(prelude, spans, nested) {
            Ok(selectors) => selectors,
            Err(Status::UnexpectedData) => {
                debug!(target: "css.syntax", "dropping style rule with invalid selector");
                self.move_selector_log()?;
                return Ok(false);
            }
            Err(status) => return Err(status),
        };
        self.move_selector_log()?;

        Status::reserve(&mut self.stack, 1)?;
        self.stack.push(Open::Style(StyleRule {
            selectors,
            declarations: Vec::new(),
            nested_rules: Vec::new(),
        }));
        Ok(true)
    }

    fn qualified_rule_end(&mut self) -> Result<()> {
        self.close()
    }
}

impl StylesheetBuilder {
    fn move_selector_log(&mut self) -> Result<()> {
        if self.selectors.log().is_empty() {
            return Ok(());
        }
        let log = self.selectors.log().clone();
        self.selectors.clear_log();
        self.log.merge(log)
    }
}

impl BlockConsumer for StylesheetBuilder {
    fn block(&mut self, value: Vec<ComponentValue>) -> Result<()> {
        if let Open::At { rule, .. } = self.top()? {
            rule.block = Some(AtRuleBlock::Values(value));
        }
        Ok(())
    }
}

impl DeclarationsConsumer for StylesheetBuilder {
    fn declaration_name(&mut self, name: &str, _span: Span) -> Result<()> {
        self.pending = Some(Declaration {
            name: name.to_string(),
            value: Vec::new(),
            important: false,
        });
        Ok(())
    }

    fn declaration_value(&mut self, value: Vec<ComponentValue>) -> Result<()> {
        if let Some(declaration) = &mut self.pending {
            declaration.value = value;
        }
        Ok(())
    }

    fn declaration_end(&mut self, important: bool) -> Result<()> {
        let Some(mut declaration) = self.pending.take() else {
            return Ok(());
        };
        declaration.important = important;
        self.top()?.add_declaration(declaration);
        Ok(())
    }
}

/// Parses stylesheets and declaration lists, keeping the diagnostics of
/// the last parse.
#[derive(Debug, Default)]
pub struct StylesheetParser {
    log: CssLog,
}

impl StylesheetParser {
    /// Create a parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { log: CssLog::new() }
    }

    /// Diagnostics of the last parse: grammar and selector problems, in
    /// source order.
    #[must_use]
    pub const fn log(&self) -> &CssLog {
        &self.log
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// # Errors
    /// [`Status::MemoryAllocation`] if memory runs out.
    pub fn parse(&mut self, css: &str) -> Result<Stylesheet> {
        let (tokens, spans) = tokenize_with_spans(css);
        let mut parser = RuleParser::new(&tokens, &spans, StylesheetBuilder::new());
        parser.parse_stylesheet()?;
        let (rules, _) = self.finish(parser)?;
        Ok(Stylesheet { rules })
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// For the contents of a `style` attribute.
    ///
    /// # Errors
    /// [`Status::MemoryAllocation`] if memory runs out.
    pub fn parse_declarations(&mut self, css: &str) -> Result<Vec<Declaration>> {
        let (tokens, spans) = tokenize_with_spans(css);
        let mut parser = RuleParser::new(&tokens, &spans, StylesheetBuilder::new());
        parser.parse_declarations()?;
        let (_, declarations) = self.finish(parser)?;
        Ok(declarations)
    }

    fn finish(
        &mut self,
        parser: RuleParser<'_, StylesheetBuilder>,
    ) -> Result<(Vec<Rule>, Vec<Declaration>)> {
        let (builder, mut log) = parser.into_parts();
        let (rules, declarations, selector_log) = builder.finish()?;
        log.merge(selector_log)?;
        self.log = log;
        Ok((rules, declarations))
    }
}

/// Parse a stylesheet, discarding diagnostics.
///
/// # Errors
/// [`Status::MemoryAllocation`] if memory runs out.
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet> {
    StylesheetParser::new().parse(css)
}

/// Parse a declaration list such as a `style` attribute, discarding
/// diagnostics.
///
/// # Errors
/// [`Status::MemoryAllocation`] if memory runs out.
pub fn parse_declarations(css: &str) -> Result<Vec<Declaration>> {
    StylesheetParser::new().parse_declarations(css)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_content_by_name() {
        assert_eq!(block_content("media", false), BlockContent::Rules);
        assert_eq!(block_content("media", true), BlockContent::Declarations);
        assert_eq!(block_content("font-face", false), BlockContent::Declarations);
        assert_eq!(block_content("keyframes", false), BlockContent::ComponentValues);
    }

    #[test]
    fn test_style_rule() {
        let sheet = parse_stylesheet("h1, .title { color: red; margin: 0 !important }").unwrap();
        let [Rule::Style(rule)] = sheet.rules.as_slice() else {
            panic!("Expected one style rule, got {:?}", sheet.rules);
        };
        assert_eq!(rule.selectors.len(), 2);
        assert_eq!(rule.declarations.len(), 2);
        assert!(!rule.declarations[0].important);
        assert!(rule.declarations[1].important);
        assert_eq!(rule.declarations[1].name, "margin");
    }

    #[test]
    fn test_invalid_selector_drops_rule() {
        let mut parser = StylesheetParser::new();
        let sheet = parser.parse("a:unknown { x: y } b { x: y }").unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(parser.log().len(), 1);
    }

    #[test]
    fn test_stopped_parse_closes_open_rules() {
        let mut builder = StylesheetBuilder::new();
        builder.stack.push(Open::Style(StyleRule {
            selectors: SelectorParser::new().parse_list("a").unwrap(),
            declarations: Vec::new(),
            nested_rules: Vec::new(),
        }));
        let (rules, _, _) = builder.finish().unwrap();
        assert_eq!(rules.len(), 1);
    }
}
