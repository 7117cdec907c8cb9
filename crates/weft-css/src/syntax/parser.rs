//! The rule-grammar engine.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
//!
//! "The input to the parsing stage is a stream or list of tokens from the
//! tokenization stage. The output depends on how the parser is invoked."
//!
//! The engine walks the grammar with an explicit stack of [`Frame`]s, one
//! per open rule list or declaration block, so nesting depth costs heap
//! memory rather than native stack. What gets built is decided entirely by
//! the consumer: each grammar production reports to one of the consumer
//! traits below, and every hook has a default that accepts and discards.
//!
//! A hook returning [`Status::Stopped`] ends the parse early without error;
//! the consumer keeps whatever it built so far. Any other error status is
//! returned to the caller unchanged.
//!
//! [`RuleStream`] runs the same engine over tokens that arrive in pieces.
//! A step only runs once every token it reads is buffered; otherwise the
//! engine returns with its stack intact and continues on the next feed.

use log::debug;
use weft_common::{Result, Span, Status};

use super::values::{
    ComponentValue, TokenCursor, consume_component_value, consume_component_values_until,
    skip_component_value,
};
use crate::log::{CssLog, CssLogKind};
use crate::tokenizer::CssToken;

/// Module name used in diagnostics.
const MODULE: &str = "Syntax";

/// How the engine reads the `{}` block of an at-rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContent {
    /// A list of rules, as in `@media`.
    Rules,
    /// Declarations, possibly mixed with nested rules, as in `@font-face`.
    Declarations,
    /// Raw component values handed to [`BlockConsumer::block`].
    ComponentValues,
    /// Skip the block.
    Ignore,
}

/// The prelude of an at-rule.
#[derive(Debug, Clone, Copy)]
pub struct AtRulePrelude<'a> {
    /// Name without the `@`.
    pub name: &'a str,
    /// Component values between the name and the `{` or `;`.
    pub prelude: &'a [ComponentValue],
    /// Source span from the at-keyword to the end of the prelude.
    pub span: Span,
    /// A `{}` block follows.
    pub has_block: bool,
    /// The rule appears inside a block rather than at the top level.
    pub nested: bool,
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
pub trait ListRulesConsumer {
    /// A rule of the current list is about to be consumed.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn next_rule(&mut self) -> Result<()> {
        Ok(())
    }

    /// The current list of rules ended.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn list_rules_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
pub trait AtRuleConsumer {
    /// The prelude of an at-rule is complete. The answer says how to read
    /// its block; it is ignored when there is no block.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn at_rule_prelude(&mut self, prelude: AtRulePrelude<'_>) -> Result<BlockContent> {
        let _ = prelude;
        Ok(BlockContent::Ignore)
    }

    /// The at-rule, including its block, is complete.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn at_rule_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
pub trait QualifiedRuleConsumer {
    /// The prelude tokens of a qualified rule, up to its `{`. Returning
    /// `false` drops the rule and its block.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn qualified_rule_prelude(
        &mut self,
        prelude: &[CssToken],
        spans: &[Span],
        nested: bool,
    ) -> Result<bool> {
        let _ = (prelude, spans, nested);
        Ok(false)
    }

    /// A qualified rule had no block and was dropped.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn qualified_rule_failed(&mut self, offset: usize) -> Result<()> {
        let _ = offset;
        Ok(())
    }

    /// The block of an accepted qualified rule is complete.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn qualified_rule_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
pub trait BlockConsumer {
    /// Contents of an at-rule block read as [`BlockContent::ComponentValues`].
    ///
    /// # Errors
    /// Any status ends the parse.
    fn block(&mut self, value: Vec<ComponentValue>) -> Result<()> {
        let _ = value;
        Ok(())
    }
}

/// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
pub trait DeclarationsConsumer {
    /// A declaration starts.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn declaration_name(&mut self, name: &str, span: Span) -> Result<()> {
        let _ = (name, span);
        Ok(())
    }

    /// The declaration's value, with `!important` and surrounding
    /// whitespace removed.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn declaration_value(&mut self, value: Vec<ComponentValue>) -> Result<()> {
        let _ = value;
        Ok(())
    }

    /// The declaration is complete.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn declaration_end(&mut self, important: bool) -> Result<()> {
        let _ = important;
        Ok(())
    }

    /// Something that is neither a declaration nor a rule was skipped.
    ///
    /// # Errors
    /// Any status ends the parse.
    fn declaration_failed(&mut self, offset: usize) -> Result<()> {
        let _ = offset;
        Ok(())
    }
}

/// Everything the engine reports to.
pub trait RuleConsumer:
    ListRulesConsumer + AtRuleConsumer + QualifiedRuleConsumer + BlockConsumer + DeclarationsConsumer
{
}

impl<T> RuleConsumer for T where
    T: ListRulesConsumer
        + AtRuleConsumer
        + QualifiedRuleConsumer
        + BlockConsumer
        + DeclarationsConsumer
{
}

/// Who a frame's closing brace (or EOF) is reported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    /// The input itself.
    Root,
    AtRule,
    QualifiedRule,
    /// A rule the consumer rejected; its end is not reported.
    Dropped,
}

/// Where a qualified rule appears; decides which tokens end it early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleContext {
    TopLevel,
    /// The block of a rule-list at-rule such as `@media`.
    RuleBlock,
    /// A style block or other declaration block.
    StyleBlock,
}

/// One open production on the engine stack.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Rules { top_level: bool, owner: Owner },
    Declarations { owner: Owner },
    /// A block read one component value at a time, kept for
    /// [`BlockConsumer::block`] or skipped.
    Block { owner: Owner, keep: bool },
}

/// How much input the next step reads.
#[derive(Debug, Clone, Copy)]
enum Need {
    /// The next token.
    Token,
    /// One component value.
    Value,
    /// Everything up to a top-level stop token.
    Until {
        semicolon: bool,
        left_brace: bool,
        right_brace: bool,
    },
}

impl Need {
    const fn until(semicolon: bool, left_brace: bool, right_brace: bool) -> Self {
        Self::Until {
            semicolon,
            left_brace,
            right_brace,
        }
    }

    const fn stops_at(self, token: &CssToken) -> bool {
        match self {
            Self::Until {
                semicolon,
                left_brace,
                right_brace,
            } => match token {
                CssToken::Semicolon => semicolon,
                CssToken::LeftBrace => left_brace,
                CssToken::RightBrace => right_brace,
                _ => false,
            },
            Self::Token | Self::Value => false,
        }
    }
}

/// How far a step waiting for tokens has scanned, so the next feed
/// continues from there.
#[derive(Debug)]
struct Lookahead {
    from: usize,
    to: usize,
    closers: Vec<CssToken>,
}

/// Grammar engine over a token list, reporting to `C`.
pub struct RuleParser<'t, C> {
    cursor: TokenCursor<'t>,
    consumer: C,
    stack: Vec<Frame>,
    log: CssLog,
    stopped: bool,
    /// More tokens may follow the buffer.
    partial: bool,
    lookahead: Option<Lookahead>,
    /// Contents of the open [`Frame::Block`] that is kept.
    block: Vec<ComponentValue>,
}

impl<'t, C: RuleConsumer> RuleParser<'t, C> {
    /// Create an engine over `tokens`; `spans` is parallel to `tokens` or empty.
    pub fn new(tokens: &'t [CssToken], spans: &'t [Span], consumer: C) -> Self {
        Self {
            cursor: TokenCursor::new(tokens, spans),
            consumer,
            stack: Vec::new(),
            log: CssLog::new(),
            stopped: false,
            partial: false,
            lookahead: None,
            block: Vec::new(),
        }
    }

    /// The same engine state over another buffer, resuming at `position`.
    fn rebind<'u>(
        self,
        tokens: &'u [CssToken],
        spans: &'u [Span],
        position: usize,
    ) -> RuleParser<'u, C> {
        RuleParser {
            cursor: TokenCursor::starting_at(tokens, spans, position),
            consumer: self.consumer,
            stack: self.stack,
            log: self.log,
            stopped: self.stopped,
            partial: self.partial,
            lookahead: self.lookahead,
            block: self.block,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// "Consume a list of rules from input, with the top-level flag set."
    ///
    /// # Errors
    /// The first non-stop error a consumer hook returns.
    pub fn parse_stylesheet(&mut self) -> Result<()> {
        self.stack.push(Frame::Rules {
            top_level: true,
            owner: Owner::Root,
        });
        self.run()
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// "Consume a list of declarations from input, and return the result."
    ///
    /// # Errors
    /// The first non-stop error a consumer hook returns.
    pub fn parse_declarations(&mut self) -> Result<()> {
        self.stack.push(Frame::Declarations { owner: Owner::Root });
        self.run()
    }

    /// The consumer.
    pub const fn consumer(&self) -> &C {
        &self.consumer
    }

    /// Diagnostics recorded by the engine.
    pub const fn log(&self) -> &CssLog {
        &self.log
    }

    /// Whether a hook stopped the parse.
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Hand back the consumer and the diagnostics.
    pub fn into_parts(self) -> (C, CssLog) {
        (self.consumer, self.log)
    }

    fn run(&mut self) -> Result<()> {
        while let Some(&frame) = self.stack.last() {
            if self.partial && !self.ready(frame) {
                debug!(target: "css.syntax", "waiting for tokens at {}", self.cursor.offset());
                return Ok(());
            }
            let step = match frame {
                Frame::Rules { top_level, owner } => self.step_rules(top_level, owner),
                Frame::Declarations { owner } => self.step_declarations(owner),
                Frame::Block { keep, .. } => self.step_block(keep),
            };
            match step {
                Ok(()) => {}
                Err(Status::Stopped) => {
                    debug!(target: "css.syntax", "parse stopped by consumer at {}", self.cursor.offset());
                    self.stopped = true;
                    self.stack.clear();
                }
                Err(status) => return Err(status),
            }
        }
        Ok(())
    }

    /// What the next step of `frame` reads.
    fn need(&self, frame: Frame) -> Need {
        let token = self.cursor.peek();
        match frame {
            Frame::Rules { top_level, .. } => match token {
                CssToken::Whitespace | CssToken::Eof => Need::Token,
                CssToken::RightBrace if !top_level => Need::Token,
                CssToken::Cdo | CssToken::Cdc if top_level => Need::Token,
                CssToken::AtKeyword(_) => Need::until(true, true, !top_level),
                _ => Need::until(false, true, !top_level),
            },
            Frame::Declarations { owner } => match token {
                CssToken::Whitespace
                | CssToken::Semicolon
                | CssToken::Eof
                | CssToken::RightBrace => Need::Token,
                CssToken::AtKeyword(_) => Need::until(true, true, true),
                _ if owner == Owner::Root => Need::until(true, false, false),
                // A custom property value may hold `{}` blocks.
                CssToken::Ident(name) if name.starts_with("--") => Need::until(true, false, true),
                _ => Need::until(true, true, true),
            },
            Frame::Block { .. } => match token {
                CssToken::RightBrace | CssToken::Eof => Need::Token,
                _ => Need::Value,
            },
        }
    }

    /// Whether the buffer holds every token the next step of `frame` reads.
    fn ready(&mut self, frame: Frame) -> bool {
        let start = self.cursor.position();
        if self.cursor.get(start).is_none() {
            return false;
        }
        let need = self.need(frame);
        let (mut at, mut closers) = match self.lookahead.take() {
            Some(lookahead) if lookahead.from == start => (lookahead.to, lookahead.closers),
            _ => (start, Vec::new()),
        };

        while let Some(token) = self.cursor.get(at) {
            at += 1;
            if token.is_eof() || matches!(need, Need::Token) {
                return true;
            }
            if closers.is_empty() && need.stops_at(token) {
                return true;
            }
            if closers.last() == Some(token) {
                let _ = closers.pop();
            } else if let Some(closer) = token.mirror() {
                closers.push(closer);
            }
            if matches!(need, Need::Value) && closers.is_empty() {
                return true;
            }
        }

        self.lookahead = Some(Lookahead {
            from: start,
            to: at,
            closers,
        });
        false
    }

    fn syntax_error(&mut self, text: &str) -> Result<()> {
        let offset = self.cursor.offset();
        debug!(target: "css.syntax", "{text} at {offset}");
        self.log.push(CssLogKind::Syntax, MODULE, text, offset)
    }

    fn unexpected_token(&mut self) -> Result<()> {
        let offset = self.cursor.offset();
        let token = self.cursor.peek();
        debug!(target: "css.syntax", "unexpected {token} at {offset}");
        self.log.unexpected_token(MODULE, token, offset)
    }

    /// Pop the top frame and report its end.
    fn close_frame(&mut self) -> Result<()> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        let owner = match frame {
            Frame::Rules { owner, .. } => {
                self.consumer.list_rules_end()?;
                owner
            }
            Frame::Declarations { owner } => owner,
            Frame::Block { owner, keep } => {
                if keep {
                    let value = std::mem::take(&mut self.block);
                    self.consumer.block(value)?;
                }
                owner
            }
        };
        match owner {
            Owner::Root | Owner::Dropped => Ok(()),
            Owner::AtRule => self.consumer.at_rule_end(),
            Owner::QualifiedRule => self.consumer.qualified_rule_end(),
        }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn step_rules(&mut self, top_level: bool, owner: Owner) -> Result<()> {
        match self.cursor.peek() {
            // "<whitespace-token>"
            // "Do nothing."
            CssToken::Whitespace => {
                let _ = self.cursor.advance();
                Ok(())
            }

            // "<EOF-token>"
            // "Return the list of rules."
            CssToken::Eof => {
                if owner != Owner::Root {
                    self.syntax_error("Unexpected end of input inside a block")?;
                }
                self.close_frame()
            }

            // The closing brace of an at-rule's block.
            CssToken::RightBrace if !top_level => {
                let _ = self.cursor.advance();
                self.close_frame()
            }

            // "<CDO-token>" or "<CDC-token>"
            // "If the top-level flag is set, do nothing."
            CssToken::Cdo | CssToken::Cdc if top_level => {
                let _ = self.cursor.advance();
                Ok(())
            }

            // "<at-keyword-token>"
            // "Reconsume the current input token. Consume an at-rule, and append
            // the returned value to the list of rules."
            CssToken::AtKeyword(_) => {
                self.consumer.next_rule()?;
                self.consume_at_rule(!top_level)
            }

            // "anything else"
            // "Reconsume the current input token. Consume a qualified rule. If
            // anything is returned, append it to the list of rules."
            _ => {
                self.consumer.next_rule()?;
                let context = if top_level {
                    RuleContext::TopLevel
                } else {
                    RuleContext::RuleBlock
                };
                self.consume_qualified_rule(context)
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self, nested: bool) -> Result<()> {
        let start = self.cursor.offset();
        // "Consume the next input token."
        let CssToken::AtKeyword(name) = self.cursor.advance() else {
            return Ok(());
        };

        // "Create a new at-rule with its name set to the value of the current input
        // token, its prelude initially set to an empty list, and its value initially
        // set to nothing."
        let prelude = consume_component_values_until(&mut self.cursor, |token| {
            matches!(token, CssToken::Semicolon | CssToken::LeftBrace)
                || (nested && matches!(token, CssToken::RightBrace))
        });
        let span = Span::new(start, self.cursor.offset());
        let mut at_rule = AtRulePrelude {
            name,
            prelude: &prelude,
            span,
            has_block: false,
            nested,
        };

        match self.cursor.peek() {
            // "<semicolon-token>"
            // "Return the at-rule."
            CssToken::Semicolon => {
                let _ = self.cursor.advance();
                let _ = self.consumer.at_rule_prelude(at_rule)?;
                self.consumer.at_rule_end()
            }

            // "<{-token>"
            // "Consume a simple block and assign it to the at-rule's block.
            // Return the at-rule."
            CssToken::LeftBrace => {
                let _ = self.cursor.advance();
                at_rule.has_block = true;
                match self.consumer.at_rule_prelude(at_rule)? {
                    BlockContent::Rules => {
                        self.stack.push(Frame::Rules {
                            top_level: false,
                            owner: Owner::AtRule,
                        });
                        Ok(())
                    }
                    BlockContent::Declarations => {
                        self.stack.push(Frame::Declarations {
                            owner: Owner::AtRule,
                        });
                        Ok(())
                    }
                    content @ (BlockContent::ComponentValues | BlockContent::Ignore) => {
                        self.block.clear();
                        self.stack.push(Frame::Block {
                            owner: Owner::AtRule,
                            keep: content == BlockContent::ComponentValues,
                        });
                        Ok(())
                    }
                }
            }

            // "<EOF-token>"
            // "This is a parse error. Return the at-rule."
            _ => {
                self.unexpected_token()?;
                let _ = self.consumer.at_rule_prelude(at_rule)?;
                self.consumer.at_rule_end()
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self, context: RuleContext) -> Result<()> {
        let start = self.cursor.position();
        let start_offset = self.cursor.offset();
        let mut closers: Vec<CssToken> = Vec::new();

        loop {
            let token = self.cursor.peek();
            if token.is_eof() {
                // "<EOF-token>"
                // "This is a parse error. Return nothing."
                self.syntax_error("Unexpected end of input in rule prelude")?;
                return self.consumer.qualified_rule_failed(start_offset);
            }
            if closers.is_empty() {
                match (token, context) {
                    // "<{-token>"
                    (CssToken::LeftBrace, _) => break,
                    // "<}-token>": "This is a parse error. If nested is true,
                    // return nothing."
                    (CssToken::RightBrace, RuleContext::RuleBlock | RuleContext::StyleBlock) => {
                        self.unexpected_token()?;
                        return self.consumer.qualified_rule_failed(start_offset);
                    }
                    // "<semicolon-token>": "If nested is true, return nothing."
                    (CssToken::Semicolon, RuleContext::StyleBlock) => {
                        self.unexpected_token()?;
                        let _ = self.cursor.advance();
                        return self.consumer.qualified_rule_failed(start_offset);
                    }
                    _ => {}
                }
            }
            // "anything else"
            // "Consume a component value and append the result to the rule's prelude."
            let token = self.cursor.advance();
            if closers.last() == Some(token) {
                let _ = closers.pop();
            } else if let Some(closer) = token.mirror() {
                closers.push(closer);
            }
        }

        let end = self.cursor.position();
        let _ = self.cursor.advance(); // {
        let prelude = self.cursor.slice(start, end);
        let spans = self.cursor.span_slice(start, end);
        let nested = context == RuleContext::StyleBlock;

        if self.consumer.qualified_rule_prelude(prelude, spans, nested)? {
            self.stack.push(Frame::Declarations {
                owner: Owner::QualifiedRule,
            });
            Ok(())
        } else {
            self.stack.push(Frame::Block {
                owner: Owner::Dropped,
                keep: false,
            });
            Ok(())
        }
    }

    /// [§ 5.4.4 Consume a style block's contents](https://www.w3.org/TR/css-syntax-3/#consume-style-block)
    fn step_declarations(&mut self, owner: Owner) -> Result<()> {
        match self.cursor.peek() {
            // "<whitespace-token>" or "<semicolon-token>"
            // "Do nothing."
            CssToken::Whitespace | CssToken::Semicolon => {
                let _ = self.cursor.advance();
                Ok(())
            }

            // "<EOF-token>"
            // "Return the list of declarations."
            CssToken::Eof => {
                if owner != Owner::Root {
                    self.syntax_error("Unexpected end of input inside a block")?;
                }
                self.close_frame()
            }

            CssToken::RightBrace => {
                if owner == Owner::Root {
                    self.unexpected_token()?;
                    let _ = self.cursor.advance();
                    Ok(())
                } else {
                    let _ = self.cursor.advance();
                    self.close_frame()
                }
            }

            // "<at-keyword-token>"
            // "Reconsume the current input token. Consume an at-rule. Append the
            // returned rule to the list of declarations."
            CssToken::AtKeyword(_) => self.consume_at_rule(true),

            // "<ident-token>"
            // "Consume a declaration. If anything was returned, append it to
            // the list of declarations."
            CssToken::Ident(_) => self.consume_declaration(owner),

            // "anything else"
            _ if owner == Owner::Root => {
                // "This is a parse error. Reconsume the current input token. As long as
                // the next input token is anything other than a <semicolon-token> or
                // <EOF-token>, consume a component value and throw away the returned value."
                let offset = self.cursor.offset();
                self.unexpected_token()?;
                let _ = consume_component_values_until(&mut self.cursor, |token| {
                    matches!(token, CssToken::Semicolon)
                });
                self.consumer.declaration_failed(offset)
            }

            // A nested style rule such as `&:hover { ... }` or `> p { ... }`.
            _ => self.consume_qualified_rule(RuleContext::StyleBlock),
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// Inside a block, input that turns out not to be a declaration is
    /// consumed again as a nested qualified rule.
    fn consume_declaration(&mut self, owner: Owner) -> Result<()> {
        let start = self.cursor.position();
        let start_offset = self.cursor.offset();

        // "Consume the next input token."
        let CssToken::Ident(name) = self.cursor.advance() else {
            return Ok(());
        };

        // "While the next input token is a <whitespace-token>, consume the next input token."
        self.cursor.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is a parse error.
        // Return nothing."
        if !matches!(self.cursor.peek(), CssToken::Colon) {
            if owner == Owner::Root {
                self.unexpected_token()?;
                let _ = consume_component_values_until(&mut self.cursor, |token| {
                    matches!(token, CssToken::Semicolon)
                });
                return self.consumer.declaration_failed(start_offset);
            }
            self.cursor.rewind(start);
            return self.consume_qualified_rule(RuleContext::StyleBlock);
        }
        let _ = self.cursor.advance(); // :

        // "While the next input token is a <whitespace-token>, consume the next input token."
        self.cursor.skip_whitespace();

        // "As long as the next input token is anything other than an <EOF-token>, consume a
        // component value and append it to the declaration's value."
        let mut value = consume_component_values_until(&mut self.cursor, |token| {
            matches!(token, CssToken::Semicolon | CssToken::RightBrace)
        });

        // A property value never holds a top-level `{}` block; this is a
        // nested rule such as `a:hover { ... }`.
        if owner != Owner::Root
            && !name.starts_with("--")
            && value.iter().any(ComponentValue::is_curly_block)
        {
            self.cursor.rewind(start);
            return self.consume_qualified_rule(RuleContext::StyleBlock);
        }

        let important = take_important(&mut value);
        let span = Span::new(start_offset, self.cursor.offset());
        self.consumer.declaration_name(name, span)?;
        self.consumer.declaration_value(value)?;
        self.consumer.declaration_end(important)
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// One component value of a block that is kept or skipped whole.
    fn step_block(&mut self, keep: bool) -> Result<()> {
        match self.cursor.peek() {
            // "ending token": "Return the block."
            CssToken::RightBrace => {
                let _ = self.cursor.advance();
                self.close_frame()
            }
            // "<EOF-token>": "This is a parse error. Return the block."
            CssToken::Eof => {
                self.syntax_error("Unexpected end of input inside a block")?;
                self.close_frame()
            }
            _ if keep => {
                let value = consume_component_value(&mut self.cursor);
                Status::reserve(&mut self.block, 1)?;
                self.block.push(value);
                Ok(())
            }
            _ => {
                skip_component_value(&mut self.cursor);
                Ok(())
            }
        }
    }
}

/// [`RuleParser`] over tokens that arrive in pieces.
///
/// Each [`RuleStream::feed`] runs the engine as far as the buffered tokens
/// allow. A production reaches the consumer only once all of its tokens
/// are buffered, so the consumer sees the same calls as for the whole
/// input at once. [`RuleStream::finish`] ends the input.
pub struct RuleStream<C> {
    tokens: Vec<CssToken>,
    spans: Vec<Span>,
    position: usize,
    parser: Option<RuleParser<'static, C>>,
}

impl<C: RuleConsumer> RuleStream<C> {
    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    #[must_use]
    pub fn stylesheet(consumer: C) -> Self {
        Self::with_frame(
            consumer,
            Frame::Rules {
                top_level: true,
                owner: Owner::Root,
            },
        )
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    #[must_use]
    pub fn declarations(consumer: C) -> Self {
        Self::with_frame(consumer, Frame::Declarations { owner: Owner::Root })
    }

    fn with_frame(consumer: C, frame: Frame) -> Self {
        let mut parser = RuleParser::new(&[], &[], consumer);
        parser.partial = true;
        parser.stack.push(frame);
        Self {
            tokens: Vec::new(),
            spans: Vec::new(),
            position: 0,
            parser: Some(parser),
        }
    }

    /// Append tokens and parse as far as they allow. `spans` is parallel
    /// to `tokens`, or empty on every call.
    ///
    /// # Errors
    /// The first non-stop error a consumer hook returns, or
    /// [`Status::MemoryAllocation`].
    pub fn feed(&mut self, tokens: &[CssToken], spans: &[Span]) -> Result<()> {
        Status::reserve(&mut self.tokens, tokens.len())?;
        self.tokens.extend_from_slice(tokens);
        if spans.len() == tokens.len() {
            Status::reserve(&mut self.spans, spans.len())?;
            self.spans.extend_from_slice(spans);
        }
        self.run()
    }

    /// End the input and hand back the consumer and the diagnostics.
    ///
    /// # Errors
    /// The first non-stop error a consumer hook returns.
    pub fn finish(mut self) -> Result<(C, CssLog)> {
        if !self.tokens.last().is_some_and(CssToken::is_eof) {
            let end = self.spans.last().map_or(0, |span| span.end);
            self.tokens.push(CssToken::Eof);
            if !self.spans.is_empty() {
                self.spans.push(Span::new(end, end));
            }
        }
        if let Some(parser) = &mut self.parser {
            parser.partial = false;
        }
        self.run()?;
        self.parser
            .take()
            .map(RuleParser::into_parts)
            .ok_or(Status::Failed)
    }

    /// The consumer.
    ///
    /// # Errors
    /// [`Status::Failed`] after a feed returned an error.
    pub fn consumer(&self) -> Result<&C> {
        self.parser.as_ref().map(RuleParser::consumer).ok_or(Status::Failed)
    }

    /// Whether a hook stopped the parse.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.parser.as_ref().is_some_and(RuleParser::is_stopped)
    }

    fn run(&mut self) -> Result<()> {
        let parser = self.parser.take().ok_or(Status::Failed)?;
        let mut parser = parser.rebind(&self.tokens, &self.spans, self.position);
        let result = parser.run();
        self.position = parser.cursor.position();
        self.parser = Some(parser.rebind(&[], &[], 0));
        result
    }
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
///
/// Removes the annotation and trailing whitespace from `value` and reports
/// whether it was present.
fn take_important(value: &mut Vec<ComponentValue>) -> bool {
    // STEP 1: Remove trailing whitespace.
    trim_trailing_whitespace(value);

    // STEP 2: Look back past the "important" ident and any whitespace for "!".
    let Some(ComponentValue::Token(CssToken::Ident(last))) = value.last() else {
        return false;
    };
    if !last.eq_ignore_ascii_case("important") {
        return false;
    }
    let Some(bang) = value[..value.len() - 1]
        .iter()
        .rposition(|v| !v.is_whitespace())
    else {
        return false;
    };
    if value[bang] != ComponentValue::Token(CssToken::Delim('!')) {
        return false;
    }

    // STEP 3: Drop "!", "important" and the whitespace before them.
    value.truncate(bang);
    trim_trailing_whitespace(value);
    true
}

fn trim_trailing_whitespace(value: &mut Vec<ComponentValue>) {
    while value.last().is_some_and(ComponentValue::is_whitespace) {
        let _ = value.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_component_values;

    #[test]
    fn test_take_important() {
        let mut value = parse_component_values("red ! IMPORTANT ");
        assert!(take_important(&mut value));
        assert_eq!(value, parse_component_values("red"));

        let mut value = parse_component_values("important");
        assert!(!take_important(&mut value));
        assert_eq!(value.len(), 1);
    }

    /// Records hook calls as text.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl ListRulesConsumer for Trace {}
    impl BlockConsumer for Trace {}

    impl AtRuleConsumer for Trace {
        fn at_rule_prelude(&mut self, prelude: AtRulePrelude<'_>) -> Result<BlockContent> {
            self.0.push(format!("@{}", prelude.name));
            Ok(if prelude.name == "media" {
                BlockContent::Rules
            } else {
                BlockContent::Ignore
            })
        }

        fn at_rule_end(&mut self) -> Result<()> {
            self.0.push("@end".to_string());
            Ok(())
        }
    }

    impl QualifiedRuleConsumer for Trace {
        fn qualified_rule_prelude(&mut self, prelude: &[CssToken], _: &[Span], _: bool) -> Result<bool> {
            if prelude.first() == Some(&CssToken::ident("stop")) {
                return Err(Status::Stopped);
            }
            self.0.push(format!("rule {}", prelude.len()));
            Ok(true)
        }

        fn qualified_rule_end(&mut self) -> Result<()> {
            self.0.push("end".to_string());
            Ok(())
        }
    }

    impl DeclarationsConsumer for Trace {
        fn declaration_name(&mut self, name: &str, _: Span) -> Result<()> {
            self.0.push(name.to_string());
            Ok(())
        }
    }

    fn trace(css: &str) -> (Vec<String>, bool) {
        let (tokens, spans) = crate::tokenizer::tokenize_with_spans(css);
        let mut parser = RuleParser::new(&tokens, &spans, Trace::default());
        parser.parse_stylesheet().unwrap();
        let stopped = parser.is_stopped();
        (parser.into_parts().0.0, stopped)
    }

    #[test]
    fn test_hook_order() {
        let (calls, stopped) = trace("@media x { a { b: c } } @import y;");
        assert!(!stopped);
        assert_eq!(calls, ["@media", "rule 2", "b", "end", "@end", "@import", "@end"]);
    }

    #[test]
    fn test_stream_token_by_token() {
        let css = "@media x { a { b: c } } @font-face { x: y } e { } stop { } d { }";
        let (tokens, spans) = crate::tokenizer::tokenize_with_spans(css);
        let mut stream = RuleStream::stylesheet(Trace::default());
        for (token, span) in tokens.iter().zip(&spans) {
            stream
                .feed(std::slice::from_ref(token), std::slice::from_ref(span))
                .unwrap();
        }
        assert!(stream.is_stopped());
        let (calls, _) = stream.finish().unwrap();
        assert_eq!(calls.0, trace(css).0);
    }

    #[test]
    fn test_stream_keeps_frames_between_feeds() {
        let (tokens, spans) = crate::tokenizer::tokenize_with_spans("@media x { a { b: c } }");
        let brace = tokens.iter().rposition(|t| *t == CssToken::RightBrace).unwrap();
        let mut stream = RuleStream::stylesheet(Trace::default());
        stream.feed(&tokens[..brace], &spans[..brace]).unwrap();
        assert_eq!(stream.consumer().unwrap().0, ["@media", "rule 2", "b", "end"]);

        stream.feed(&tokens[brace..], &spans[brace..]).unwrap();
        let (calls, log) = stream.finish().unwrap();
        assert_eq!(calls.0, ["@media", "rule 2", "b", "end", "@end"]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_stop_keeps_partial_result() {
        let (calls, stopped) = trace("a { x: y } stop { } b { }");
        assert!(stopped);
        assert_eq!(calls, ["rule 2", "x", "end"]);
    }
}
