//! Markup declaration and comment states.

use super::sink::TokenSink;
use super::state::TokenizerState;
use super::{Tokenizer, TokenizerError};

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Runs without consuming: the `!` was consumed by the tag open state
    /// and the keywords are matched by lookahead. If a keyword could still
    /// match once more input arrives, the state is re-entered then.
    pub(super) fn handle_markup_declaration_open_state(&mut self) {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters (-),
        // consume those two characters, create a comment token whose data is the
        // empty string, and switch to the comment start state."
        match self.next_few_characters_are("--", false) {
            Some(true) => {
                self.consume_characters(2);
                self.comment.clear();
                self.switch_to(TokenizerState::CommentStart);
                return;
            }
            None => {
                self.suspended = true;
                return;
            }
            Some(false) => {}
        }

        // "Otherwise, if the next seven characters are an ASCII case-insensitive match
        // for the word "DOCTYPE", then consume those characters and switch to the
        // DOCTYPE state."
        match self.next_few_characters_are("DOCTYPE", true) {
            Some(true) => {
                self.consume_characters(7);
                self.switch_to(TokenizerState::Doctype);
                return;
            }
            None => {
                self.suspended = true;
                return;
            }
            Some(false) => {}
        }

        match self.next_few_characters_are("[CDATA[", false) {
            // "Otherwise, if there is an adjusted current node and it is not an element in
            // the HTML namespace and the next seven characters are a case-sensitive match
            // for the string "[CDATA[" (the five uppercase letters "CDATA" with a U+005B
            // LEFT SQUARE BRACKET character before and after), then consume those
            // characters and switch to the CDATA section state."
            Some(true) if self.sink.adjusted_current_node_is_foreign() => {
                self.consume_characters(7);
                self.flush_text(self.token_start);
                self.last_emit_end = self.pos;
                self.switch_to(TokenizerState::CdataSection);
            }
            // "Otherwise, if the next seven characters are a case-sensitive match for the
            // string "[CDATA[", then this is a cdata-in-html-content parse error. Consume
            // those characters. Create a comment token whose data is the "[CDATA[" string.
            // Switch to the bogus comment state."
            Some(true) => {
                self.consume_characters(7);
                self.parse_error(TokenizerError::CdataInHtmlContent);
                self.comment.clear();
                self.comment.push_str("[CDATA[");
                self.switch_to(TokenizerState::BogusComment);
            }
            None => self.suspended = true,
            // "Otherwise, this is an incorrectly-opened-comment parse error. Create a
            // comment token whose data is the empty string. Switch to the bogus comment
            // state (don't consume anything in the current state)."
            Some(false) => {
                self.errors
                    .push(TokenizerError::IncorrectlyOpenedComment, self.pos);
                self.comment.clear();
                self.switch_to(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    pub(super) fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment_token();
            }
            // "EOF - Emit the comment. Emit an end-of-file token."
            None => {
                self.emit_current_comment_token();
                self.emit_eof_token();
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER character to the comment token's data."
            Some('\0') => {
                self.parse_error(TokenizerError::UnexpectedNullCharacter);
                self.comment.push('\u{FFFD}');
            }
            // "Anything else - Append the current input character to the comment token's data."
            Some(c) => self.comment.push(c),
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment start dash state."
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "U+003E GREATER-THAN SIGN (>) - This is an abrupt-closing-of-empty-comment
            // parse error. Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(TokenizerError::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment_token();
            }
            // "Anything else - Reconsume in the comment state."
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment end state."
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            // "U+003E GREATER-THAN SIGN (>) - This is an abrupt-closing-of-empty-comment
            // parse error. Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(TokenizerError::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment_token();
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current comment token.
            // Emit an end-of-file token."
            None => self.eof_in_comment(),
            // "Anything else - Append a U+002D HYPHEN-MINUS character (-) to the comment
            // token's data. Reconsume in the comment state."
            Some(_) => {
                self.comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<) - Append the current input character to the
            // comment token's data. Switch to the comment less-than sign state."
            Some('<') => {
                self.comment.push('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment end dash state."
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            // "U+0000 NULL - This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER character to the comment token's data."
            Some('\0') => {
                self.parse_error(TokenizerError::UnexpectedNullCharacter);
                self.comment.push('\u{FFFD}');
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current comment token.
            // Emit an end-of-file token."
            None => self.eof_in_comment(),
            // "Anything else - Append the current input character to the comment token's data."
            Some(c) => self.comment.push(c),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Append the current input character to the
            // comment token's data. Switch to the comment less-than sign bang state."
            Some('!') => {
                self.comment.push('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            // "U+003C LESS-THAN SIGN (<) - Append the current input character to the
            // comment token's data."
            Some('<') => self.comment.push('<'),
            // "Anything else - Reconsume in the comment state."
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDash),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDashDash),
            _ => self.reconsume_in(TokenizerState::CommentEndDash),
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>), EOF - Reconsume in the comment end state."
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            // "Anything else - This is a nested-comment parse error. Reconsume in the
            // comment end state."
            Some(_) => {
                self.parse_error(TokenizerError::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment end state."
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            // "EOF - This is an eof-in-comment parse error. Emit the current comment token.
            // Emit an end-of-file token."
            None => self.eof_in_comment(),
            // "Anything else - Append a U+002D HYPHEN-MINUS character (-) to the comment
            // token's data. Reconsume in the comment state."
            Some(_) => {
                self.comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment_token();
            }
            // "U+0021 EXCLAMATION MARK (!) - Switch to the comment end bang state."
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            // "U+002D HYPHEN-MINUS (-) - Append a U+002D HYPHEN-MINUS character (-) to
            // the comment token's data."
            Some('-') => self.comment.push('-'),
            // "EOF - This is an eof-in-comment parse error. Emit the current comment token.
            // Emit an end-of-file token."
            None => self.eof_in_comment(),
            // "Anything else - Append two U+002D HYPHEN-MINUS characters (-) to the
            // comment token's data. Reconsume in the comment state."
            Some(_) => {
                self.comment.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Append two U+002D HYPHEN-MINUS characters (-)
            // and a U+0021 EXCLAMATION MARK character (!) to the comment token's data.
            // Switch to the comment end dash state."
            Some('-') => {
                self.comment.push_str("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an incorrectly-closed-comment parse
            // error. Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(TokenizerError::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment_token();
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current comment token.
            // Emit an end-of-file token."
            None => self.eof_in_comment(),
            // "Anything else - Append two U+002D HYPHEN-MINUS characters (-) and a U+0021
            // EXCLAMATION MARK character (!) to the comment token's data. Reconsume in the
            // comment state."
            Some(_) => {
                self.comment.push_str("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    fn eof_in_comment(&mut self) {
        self.eof_error(TokenizerError::EofInComment);
        self.emit_current_comment_token();
        self.emit_eof_token();
    }
}
