//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token")
//! - Attribute and end tag helpers

use log::trace;
use weft_common::{Span, Status};

use super::sink::{TokenSink, TokenSinkResult};
use super::state::TokenizerState;
use super::token::{Attribute, Tag, TextKind, Token};
use super::{TagKind, Tokenizer, TokenizerError};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next iteration of the
    /// main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// Reconsume in a state that looks ahead rather than consuming: step
    /// back so the current character is the next input character again.
    pub(super) const fn rewind_into(&mut self, new_state: TokenizerState) {
        if self.current_input_character.is_some() {
            self.pos -= 1;
        }
        self.state = new_state;
    }

    /// Stay in the current state and see the current character again once
    /// more input has arrived.
    pub(super) const fn suspend(&mut self) {
        self.reconsume = true;
        self.suspended = true;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// "Consume the next input character"
    ///
    /// Returns false when the input is exhausted but more may follow.
    pub(super) fn consume_next_input_character(&mut self) -> bool {
        if self.reconsume {
            self.reconsume = false;
            return true;
        }
        if let Some(c) = self.input.get(self.pos) {
            self.pos += 1;
            if self.pos > self.checked {
                self.checked = self.pos;
                self.check_input_character(c);
            }
            self.current_input_character = Some(c);
            true
        } else if self.at_eof {
            self.current_input_character = None;
            true
        } else {
            false
        }
    }

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Any occurrences of noncharacters in the input stream are
    /// noncharacter-in-input-stream parse errors and any occurrences of
    /// controls other than ASCII whitespace and U+0000 NULL characters are
    /// control-character-in-input-stream parse errors."
    fn check_input_character(&mut self, c: char) {
        if is_noncharacter(u32::from(c)) {
            self.parse_error(TokenizerError::NoncharacterInInputStream);
        } else if c.is_control() && !matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ' | '\0') {
            self.parse_error(TokenizerError::ControlCharacterInInputStream);
        }
    }

    /// "If the next few characters are ..."
    ///
    /// Checks the characters from the next input character onward.
    /// `None` means the input ended before a decision could be made and
    /// more is still to come.
    pub(super) fn next_few_characters_are(&self, target: &str, ignore_case: bool) -> Option<bool> {
        self.lookahead_from(self.pos, target, ignore_case)
    }

    /// [`Self::next_few_characters_are`] starting at `pos`. Once the input
    /// has ended, running out of characters is a mismatch.
    pub(super) fn lookahead_from(&self, pos: usize, target: &str, ignore_case: bool) -> Option<bool> {
        match self.input.starts_with(pos, target, ignore_case) {
            None if self.at_eof => Some(false),
            result => result,
        }
    }

    /// Consume `count` characters already inspected by lookahead.
    pub(super) fn consume_characters(&mut self, count: usize) {
        self.pos += count;
        if self.pos > self.checked {
            for pos in self.checked..self.pos {
                if let Some(c) = self.input.get(pos) {
                    self.check_input_character(c);
                }
            }
            self.checked = self.pos;
        }
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Record an error at the current input character.
    pub(super) fn parse_error(&mut self, code: TokenizerError) {
        let position = self.pos.saturating_sub(1);
        self.errors.push(code, position);
    }

    /// Record an error for an unexpected end of input.
    pub(super) fn eof_error(&mut self, code: TokenizerError) {
        self.errors.push(code, self.pos);
    }
}

/// [§ 4.5 Code points](https://infra.spec.whatwg.org/#noncharacter)
///
/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ..., U+10FFFE, or
/// U+10FFFF."
pub(super) const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code & 0xFFFE) == 0xFFFE
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// The tokenizer's whitespace set: tab, LF, FF and space. CR never reaches
/// the states because preprocessing turns it into LF.
pub(super) const fn is_whitespace_char(input_char: char) -> bool {
    matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// The kind of text the current state produces.
    const fn text_kind(&self) -> TextKind {
        let state = if matches!(
            self.state,
            TokenizerState::CharacterReference
                | TokenizerState::NamedCharacterReference
                | TokenizerState::AmbiguousAmpersand
                | TokenizerState::NumericCharacterReference
                | TokenizerState::HexadecimalCharacterReferenceStart
                | TokenizerState::DecimalCharacterReferenceStart
                | TokenizerState::HexadecimalCharacterReference
                | TokenizerState::DecimalCharacterReference
                | TokenizerState::NumericCharacterReferenceEnd
        ) {
            self.return_state
        } else {
            self.state
        };
        match state {
            TokenizerState::Rcdata
            | TokenizerState::RcdataLessThanSign
            | TokenizerState::RcdataEndTagOpen
            | TokenizerState::RcdataEndTagName => TextKind::Rcdata,
            TokenizerState::Rawtext
            | TokenizerState::RawtextLessThanSign
            | TokenizerState::RawtextEndTagOpen
            | TokenizerState::RawtextEndTagName => TextKind::Rawtext,
            TokenizerState::ScriptData
            | TokenizerState::ScriptDataLessThanSign
            | TokenizerState::ScriptDataEndTagOpen
            | TokenizerState::ScriptDataEndTagName
            | TokenizerState::ScriptDataEscapeStart
            | TokenizerState::ScriptDataEscapeStartDash
            | TokenizerState::ScriptDataEscaped
            | TokenizerState::ScriptDataEscapedDash
            | TokenizerState::ScriptDataEscapedDashDash
            | TokenizerState::ScriptDataEscapedLessThanSign
            | TokenizerState::ScriptDataEscapedEndTagOpen
            | TokenizerState::ScriptDataEscapedEndTagName
            | TokenizerState::ScriptDataDoubleEscapeStart
            | TokenizerState::ScriptDataDoubleEscaped
            | TokenizerState::ScriptDataDoubleEscapedDash
            | TokenizerState::ScriptDataDoubleEscapedDashDash
            | TokenizerState::ScriptDataDoubleEscapedLessThanSign
            | TokenizerState::ScriptDataDoubleEscapeEnd => TextKind::ScriptData,
            TokenizerState::Plaintext => TextKind::Plaintext,
            TokenizerState::CdataSection
            | TokenizerState::CdataSectionBracket
            | TokenizerState::CdataSectionEnd => TextKind::Cdata,
            _ => TextKind::Data,
        }
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        let kind = self.text_kind();
        if !self.text.data.is_empty() && self.text.kind != kind {
            self.flush_text(self.pos.saturating_sub(1));
        }
        if self.text.data.is_empty() {
            self.text.kind = kind;
        }
        if Status::reserve_str(&mut self.text.data, c.len_utf8()).is_err() {
            self.halted = Some(Status::MemoryAllocation);
            return;
        }
        self.text.has_null |= c == '\0';
        self.text.data.push(c);
    }

    /// Emit each character of `s` as a character token.
    pub(super) fn emit_characters(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_character_token(c);
        }
    }

    /// Deliver pending character tokens as one run ending at `end`.
    pub(super) fn flush_text(&mut self, end: usize) {
        if !self.text.data.is_empty() {
            let mut text = std::mem::take(&mut self.text);
            text.span = Span::new(self.last_emit_end, end.max(self.last_emit_end));
            self.deliver(Token::Text(text));
        }
        self.last_emit_end = self.last_emit_end.max(end);
    }

    /// Hand a token to the sink and apply its answer.
    fn deliver(&mut self, token: Token) {
        if self.halted.is_some() {
            return;
        }
        trace!(target: "html.tokenizer", "emit {token:?}");
        match self.sink.process_token(token) {
            Ok(TokenSinkResult::Continue) => {}
            Ok(TokenSinkResult::SwitchTo(state)) => {
                trace!(target: "html.tokenizer", "sink switched state to {state}");
                self.state = state;
            }
            Ok(TokenSinkResult::Stop) => self.halted = Some(Status::Stopped),
            Err(status) => self.halted = Some(status),
        }
    }

    /// Deliver a non-character token that started at `token_start`.
    fn emit_markup_token(&mut self, token: Token) {
        self.flush_text(self.token_start);
        self.deliver(token);
        self.last_emit_end = self.pos;
    }

    /// "Emit the current tag token."
    pub(super) fn emit_current_tag_token(&mut self) {
        self.finish_attribute();
        let mut tag = std::mem::take(&mut self.tag);
        tag.span = Span::new(self.token_start, self.pos);
        let token = match self.tag_kind {
            TagKind::Start => {
                self.last_start_tag_name = Some(tag.name.clone());
                Token::StartTag(tag)
            }
            TagKind::End => {
                // [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
                // "When an end tag token is emitted with attributes, that is an
                // end-tag-with-attributes parse error. When an end tag token is emitted
                // with its self-closing flag set, that is an end-tag-with-trailing-solidus
                // parse error."
                if !tag.attributes.is_empty() {
                    self.parse_error(TokenizerError::EndTagWithAttributes);
                }
                if tag.self_closing {
                    self.parse_error(TokenizerError::EndTagWithTrailingSolidus);
                }
                Token::EndTag(tag)
            }
        };
        self.emit_markup_token(token);
    }

    /// "Emit the current comment token."
    pub(super) fn emit_current_comment_token(&mut self) {
        let data = std::mem::take(&mut self.comment);
        let span = Span::new(self.token_start, self.pos);
        self.emit_markup_token(Token::Comment { data, span });
    }

    /// "Emit the current DOCTYPE token."
    pub(super) fn emit_current_doctype_token(&mut self) {
        let mut doctype = std::mem::take(&mut self.doctype);
        doctype.span = Span::new(self.token_start, self.pos);
        self.emit_markup_token(Token::Doctype(doctype));
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.flush_text(self.pos);
        self.deliver(Token::EndOfFile { position: self.pos });
        self.finished = true;
    }
}

// =============================================================================
// Tag and Attribute Helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// "Create a new start tag token, set its tag name to the empty string."
    pub(super) fn create_tag_token(&mut self, kind: TagKind) {
        self.tag_kind = kind;
        self.tag = Tag::default();
        self.attribute = None;
        self.attribute_is_duplicate = false;
    }

    /// "Append the current input character to the current tag token's tag
    /// name", lowercasing ASCII upper alpha.
    pub(super) fn append_to_tag_name(&mut self, c: char) {
        self.tag.name.push(c.to_ascii_lowercase());
    }

    /// "Start a new attribute in the current tag token. Set that
    /// attribute's name and value to the empty string."
    pub(super) fn start_new_attribute(&mut self) {
        self.finish_attribute();
        let at = self.pos.saturating_sub(1);
        self.attribute = Some(Attribute {
            name: String::new(),
            value: String::new(),
            name_span: Span::empty(at),
            value_span: Span::empty(at),
        });
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        let end = self.pos;
        if let Some(attribute) = self.attribute.as_mut() {
            attribute.name.push(c.to_ascii_lowercase());
            attribute.name_span.end = end;
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before
    /// emitting the tag token, if appropriate), the complete attribute's
    /// name must be compared to the other attributes on the same token; if
    /// there is already an attribute on the token with the exact same name,
    /// then this is a duplicate-attribute parse error and the new attribute
    /// must be removed from the token."
    pub(super) fn leave_attribute_name(&mut self) {
        let Some(attribute) = self.attribute.as_ref() else {
            return;
        };
        if self
            .tag
            .attributes
            .iter()
            .any(|existing| existing.name == attribute.name)
        {
            self.parse_error(TokenizerError::DuplicateAttribute);
            self.attribute_is_duplicate = true;
        }
    }

    /// Mark the start of the current attribute's value.
    pub(super) fn begin_attribute_value(&mut self, start: usize) {
        if let Some(attribute) = self.attribute.as_mut() {
            attribute.value_span = Span::empty(start);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        let end = self.pos;
        if let Some(attribute) = self.attribute.as_mut() {
            attribute.value.push(c);
            attribute.value_span.end = end;
        }
    }

    /// Move the attribute being built onto the tag, unless it repeats a name.
    pub(super) fn finish_attribute(&mut self) {
        let duplicate = std::mem::take(&mut self.attribute_is_duplicate);
        if let Some(attribute) = self.attribute.take() {
            if !duplicate {
                self.tag.attributes.push(attribute);
            }
        }
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-end-tag-token)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted from
    /// this tokenizer, if any. If no start tag has been emitted from this
    /// tokenizer, then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        self.tag_kind == TagKind::End
            && self
                .last_start_tag_name
                .as_deref()
                .is_some_and(|name| name == self.tag.name)
    }

    /// The shared "end tag name" state of RCDATA, RAWTEXT, script data and
    /// script data escaped. `text_state` is where to go when the name turns
    /// out not to close the element.
    pub(super) fn handle_raw_end_tag_name(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab)"
            // "U+000A LINE FEED (LF)"
            // "U+000C FORM FEED (FF)"
            // "U+0020 SPACE"
            // "If the current end tag token is an appropriate end tag token, then
            // switch to the before attribute name state. Otherwise, treat it as per
            // the "anything else" entry below."
            Some(c) if is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/)"
            // "If the current end tag token is an appropriate end tag token, then
            // switch to the self-closing start tag state."
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "If the current end tag token is an appropriate end tag token, then
            // switch to the data state and emit the current tag token."
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag_token();
            }
            // "ASCII upper alpha"
            // "Append the lowercase version of the current input character to the
            // current tag token's tag name. Append the current input character to
            // the temporary buffer."
            // "ASCII lower alpha"
            // "Append the current input character to the current tag token's tag
            // name. Append the current input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                self.append_to_tag_name(c);
                self.temporary_buffer.push(c);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
            // character token, and a character token for each of the characters in
            // the temporary buffer (in the order they were added to the buffer).
            // Reconsume in the X state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                let buffer = std::mem::take(&mut self.temporary_buffer);
                self.emit_characters(&buffer);
                self.reconsume_in(text_state);
            }
        }
    }
}
