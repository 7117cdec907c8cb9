//! DOCTYPE states.
//!
//! The public and system identifier states mirror each other; they share
//! one handler taking `public: bool`.

use super::helpers::is_whitespace_char;
use super::sink::TokenSink;
use super::state::TokenizerState;
use super::{Tokenizer, TokenizerError};

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Switch to the before DOCTYPE name state."
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeName);
            }
            // "U+003E GREATER-THAN SIGN (>) - Reconsume in the before DOCTYPE name state."
            Some('>') => self.reconsume_in(TokenizerState::BeforeDoctypeName),
            // "EOF - This is an eof-in-doctype parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Emit the current token. Emit an end-of-file token."
            None => self.eof_in_doctype(),
            // "Anything else - This is a missing-whitespace-before-doctype-name parse error.
            // Reconsume in the before DOCTYPE name state."
            Some(_) => {
                self.parse_error(TokenizerError::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDoctypeName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            // "U+0000 NULL - This is an unexpected-null-character parse error. Create a new
            // DOCTYPE token. Set the token's name to a U+FFFD REPLACEMENT CHARACTER character.
            // Switch to the DOCTYPE name state."
            Some('\0') => {
                self.parse_error(TokenizerError::UnexpectedNullCharacter);
                self.doctype.name = Some(String::from('\u{FFFD}'));
                self.switch_to(TokenizerState::DoctypeName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-doctype-name parse error.
            // Create a new DOCTYPE token. Set its force-quirks flag to on. Switch to the data
            // state. Emit the current token."
            Some('>') => {
                self.parse_error(TokenizerError::MissingDoctypeName);
                self.doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            None => self.eof_in_doctype(),
            // "ASCII upper alpha - Create a new DOCTYPE token. Set the token's name to the
            // lowercase version of the current input character. Switch to the DOCTYPE name state."
            // "Anything else - Create a new DOCTYPE token. Set the token's name to the current
            // input character. Switch to the DOCTYPE name state."
            Some(c) => {
                self.doctype.name = Some(String::from(c.to_ascii_lowercase()));
                self.switch_to(TokenizerState::DoctypeName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDoctypeName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            Some('\0') => {
                self.parse_error(TokenizerError::UnexpectedNullCharacter);
                self.doctype.name.get_or_insert_with(String::new).push('\u{FFFD}');
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                self.doctype
                    .name
                    .get_or_insert_with(String::new)
                    .push(c.to_ascii_lowercase());
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                // "If the six characters starting from the current input character are an
                // ASCII case-insensitive match for the word "PUBLIC", then consume those
                // characters and switch to the after DOCTYPE public keyword state."
                // "Otherwise, if the six characters starting from the current input character
                // are an ASCII case-insensitive match for the word "SYSTEM", then consume those
                // characters and switch to the after DOCTYPE system keyword state."
                let current = self.pos - 1;
                let public = self.lookahead_from(current, "PUBLIC", true);
                let system = self.lookahead_from(current, "SYSTEM", true);
                match (public, system) {
                    (Some(true), _) => {
                        self.consume_characters(5);
                        self.switch_to(TokenizerState::AfterDoctypePublicKeyword);
                    }
                    (_, Some(true)) => {
                        self.consume_characters(5);
                        self.switch_to(TokenizerState::AfterDoctypeSystemKeyword);
                    }
                    (None, _) | (_, None) => self.suspend(),
                    // "Otherwise, this is an invalid-character-sequence-after-doctype-name parse
                    // error. Set the current DOCTYPE token's force-quirks flag to on. Reconsume in
                    // the bogus DOCTYPE state."
                    (Some(false), Some(false)) => {
                        self.parse_error(TokenizerError::InvalidCharacterSequenceAfterDoctypeName);
                        self.doctype.force_quirks = true;
                        self.reconsume_in(TokenizerState::BogusDoctype);
                    }
                }
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_keyword_state(&mut self, public: bool) {
        match self.current_input_character {
            // "Switch to the before DOCTYPE public identifier state."
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(if public {
                    TokenizerState::BeforeDoctypePublicIdentifier
                } else {
                    TokenizerState::BeforeDoctypeSystemIdentifier
                });
            }
            // "U+0022 QUOTATION MARK (\") - This is a
            // missing-whitespace-after-doctype-public-keyword parse error. Set the current
            // DOCTYPE token's public identifier to the empty string (not missing), then switch
            // to the DOCTYPE public identifier (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(if public {
                    TokenizerError::MissingWhitespaceAfterDoctypePublicKeyword
                } else {
                    TokenizerError::MissingWhitespaceAfterDoctypeSystemKeyword
                });
                self.begin_doctype_identifier(public, quote);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-doctype-public-identifier
            // parse error. Set the current DOCTYPE token's force-quirks flag to on. Switch to
            // the data state. Emit the current DOCTYPE token."
            Some('>') => self.missing_doctype_identifier(public),
            None => self.eof_in_doctype(),
            // "Anything else - This is a missing-quote-before-doctype-public-identifier parse
            // error. Set the current DOCTYPE token's force-quirks flag to on. Reconsume in the
            // bogus DOCTYPE state."
            Some(_) => self.missing_quote_before_doctype_identifier(public),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_identifier_state(&mut self, public: bool) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_doctype_identifier(public, quote),
            Some('>') => self.missing_doctype_identifier(public),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(public),
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and its single-quoted and system identifier siblings.
    pub(super) fn handle_doctype_identifier_quoted_state(&mut self, public: bool, quote: char) {
        match self.current_input_character {
            // "Switch to the after DOCTYPE public identifier state."
            Some(c) if c == quote => {
                self.switch_to(if public {
                    TokenizerState::AfterDoctypePublicIdentifier
                } else {
                    TokenizerState::AfterDoctypeSystemIdentifier
                });
            }
            Some('\0') => {
                self.parse_error(TokenizerError::UnexpectedNullCharacter);
                self.doctype_identifier(public).push('\u{FFFD}');
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an abrupt-doctype-public-identifier
            // parse error. Set the current DOCTYPE token's force-quirks flag to on. Switch to
            // the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(if public {
                    TokenizerError::AbruptDoctypePublicIdentifier
                } else {
                    TokenizerError::AbruptDoctypeSystemIdentifier
                });
                self.doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            None => self.eof_in_doctype(),
            Some(c) => self.doctype_identifier(public).push(c),
        }
    }

    /// [§ 13.2.5.60 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            // "U+0022 QUOTATION MARK (\") - This is a
            // missing-whitespace-between-doctype-public-and-system-identifiers parse error.
            // Set the current DOCTYPE token's system identifier to the empty string (not
            // missing), then switch to the DOCTYPE system identifier (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    TokenizerError::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.begin_doctype_identifier(false, quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(false),
        }
    }

    /// [§ 13.2.5.61 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            Some(quote @ ('"' | '\'')) => self.begin_doctype_identifier(false, quote),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(false),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            None => self.eof_in_doctype(),
            // "Anything else - This is an unexpected-character-after-doctype-system-identifier
            // parse error. Reconsume in the bogus DOCTYPE state. (This does not set the
            // current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(TokenizerError::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype_token();
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error. Ignore the character."
            Some('\0') => self.parse_error(TokenizerError::UnexpectedNullCharacter),
            // "EOF - Emit the DOCTYPE token. Emit an end-of-file token."
            None => {
                self.emit_current_doctype_token();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.eof_error(TokenizerError::EofInDoctype);
        self.doctype.force_quirks = true;
        self.emit_current_doctype_token();
        self.emit_eof_token();
    }

    fn doctype_identifier(&mut self, public: bool) -> &mut String {
        let identifier = if public {
            &mut self.doctype.public_identifier
        } else {
            &mut self.doctype.system_identifier
        };
        identifier.get_or_insert_with(String::new)
    }

    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing), then switch to the DOCTYPE public identifier
    /// (double-quoted) state."
    fn begin_doctype_identifier(&mut self, public: bool, quote: char) {
        self.doctype_identifier(public).clear();
        self.switch_to(match (public, quote) {
            (true, '"') => TokenizerState::DoctypePublicIdentifierDoubleQuoted,
            (true, _) => TokenizerState::DoctypePublicIdentifierSingleQuoted,
            (false, '"') => TokenizerState::DoctypeSystemIdentifierDoubleQuoted,
            (false, _) => TokenizerState::DoctypeSystemIdentifierSingleQuoted,
        });
    }

    fn missing_doctype_identifier(&mut self, public: bool) {
        self.parse_error(if public {
            TokenizerError::MissingDoctypePublicIdentifier
        } else {
            TokenizerError::MissingDoctypeSystemIdentifier
        });
        self.doctype.force_quirks = true;
        self.switch_to(TokenizerState::Data);
        self.emit_current_doctype_token();
    }

    fn missing_quote_before_doctype_identifier(&mut self, public: bool) {
        self.parse_error(if public {
            TokenizerError::MissingQuoteBeforeDoctypePublicIdentifier
        } else {
            TokenizerError::MissingQuoteBeforeDoctypeSystemIdentifier
        });
        self.doctype.force_quirks = true;
        self.reconsume_in(TokenizerState::BogusDoctype);
    }
}
