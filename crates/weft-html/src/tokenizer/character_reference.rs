//! Character reference states.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//! and the states that follow it. All of them return to `return_state`,
//! which is a text state or one of the attribute value states.

use super::named_character_references::{self, LONGEST_NAME};
use super::sink::TokenSink;
use super::state::TokenizerState;
use super::{Tokenizer, TokenizerError};

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026 AMPERSAND (&)
        // character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');
        match self.current_input_character {
            // "ASCII alphanumeric - Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.rewind_into(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#) - Append the current input character to the temporary
            // buffer. Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else - Flush code points consumed as a character reference.
            // Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(self.return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// Runs by lookahead from the next input character. When the buffered
    /// input ends while a longer name could still match, the state waits for
    /// more input without consuming anything.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        // "Consume the maximum number of characters possible, where the consumed
        // characters are one of the identifiers in the first column of the named
        // character references table."
        let mut candidate = String::new();
        let mut longest: Option<(usize, &'static str)> = None;
        let mut offset = 0;
        while offset < LONGEST_NAME {
            let Some(c) = self.input.get(self.pos + offset) else {
                if !self.at_eof {
                    self.suspended = true;
                    return;
                }
                break;
            };
            candidate.push(c);
            if !named_character_references::has_prefix(&candidate) {
                break;
            }
            offset += 1;
            if let Some(value) = named_character_references::lookup(&candidate) {
                longest = Some((offset, value));
            }
        }

        let Some((length, value)) = longest else {
            // "Otherwise - Flush code points consumed as a character reference. Switch to
            // the ambiguous ampersand state."
            self.flush_code_points_consumed_as_character_reference();
            self.switch_to(TokenizerState::AmbiguousAmpersand);
            return;
        };

        let name_end = self.pos + length;
        let ends_with_semicolon = self.input.get(name_end - 1) == Some(';');
        // "If the character reference was consumed as part of an attribute, and the last
        // character matched is not a U+003B SEMICOLON character (;), and the next input
        // character is either a U+003D EQUALS SIGN character (=) or an ASCII alphanumeric,
        // then, for historical reasons, flush code points consumed as a character
        // reference and switch to the return state."
        if self.return_state.is_attribute_value() && !ends_with_semicolon {
            let next = self.input.get(name_end);
            if next.is_none() && !self.at_eof {
                self.suspended = true;
                return;
            }
            if next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
                for pos in self.pos..name_end {
                    if let Some(c) = self.input.get(pos) {
                        self.temporary_buffer.push(c);
                    }
                }
                self.consume_characters(length);
                self.flush_code_points_consumed_as_character_reference();
                self.switch_to(self.return_state);
                return;
            }
        }

        self.consume_characters(length);
        // "If the last character matched is not a U+003B SEMICOLON character (;), then
        // this is a missing-semicolon-after-character-reference parse error."
        if !ends_with_semicolon {
            self.parse_error(TokenizerError::MissingSemicolonAfterCharacterReference);
        }
        // "Set the temporary buffer to the empty string. Append one or two characters
        // corresponding to the character reference name (as given by the second column
        // of the named character references table) to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(value);
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to(self.return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            // "ASCII alphanumeric - If the character reference was consumed as part of an
            // attribute, then append the current input character to the current attribute's
            // value. Otherwise, emit the current input character as a character token."
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.return_state.is_attribute_value() {
                    self.append_to_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            // "U+003B SEMICOLON (;) - This is an unknown-named-character-reference parse
            // error. Reconsume in the return state."
            Some(';') => {
                self.parse_error(TokenizerError::UnknownNamedCharacterReference);
                self.reconsume_in(self.return_state);
            }
            // "Anything else - Reconsume in the return state."
            _ => self.reconsume_in(self.return_state),
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X, U+0058 LATIN CAPITAL LETTER X - Append the current
            // input character to the temporary buffer. Switch to the hexadecimal character
            // reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            // "Anything else - Reconsume in the decimal character reference start state."
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        match self.current_input_character.and_then(|c| c.to_digit(16)) {
            // "Multiply the character reference code by 16. Add a numeric version of the
            // current input character to the character reference code."
            Some(digit) => self.accumulate_reference_digit(16, digit),
            None => self.end_reference_digits(),
        }
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        match self.current_input_character.and_then(|c| c.to_digit(10)) {
            Some(digit) => self.accumulate_reference_digit(10, digit),
            None => self.end_reference_digits(),
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// Consumes nothing. A pending reconsume carries over to the return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let code = self.character_reference_code;
        let replacement = match code {
            // "If the number is 0x00, then this is a null-character-reference parse error.
            // Set the character reference code to 0xFFFD."
            0 => {
                self.parse_error(TokenizerError::NullCharacterReference);
                0xFFFD
            }
            // "If the number is greater than 0x10FFFF, then this is a
            // character-reference-outside-unicode-range parse error. Set the character
            // reference code to 0xFFFD."
            0x0011_0000.. => {
                self.parse_error(TokenizerError::CharacterReferenceOutsideUnicodeRange);
                0xFFFD
            }
            // "If the number is a surrogate, then this is a surrogate-character-reference
            // parse error. Set the character reference code to 0xFFFD."
            0xD800..=0xDFFF => {
                self.parse_error(TokenizerError::SurrogateCharacterReference);
                0xFFFD
            }
            // "If the number is a noncharacter, then this is a
            // noncharacter-character-reference parse error."
            _ if super::helpers::is_noncharacter(code) => {
                self.parse_error(TokenizerError::NoncharacterCharacterReference);
                code
            }
            // "If the number is 0x0D, or a control that's not ASCII whitespace, then this is
            // a control-character-reference parse error. If the number is one of the numbers
            // in the first column of the following table, then find the row with that number
            // in the first column, and set the character reference code to the number in the
            // second column of that row."
            0x0D | 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F => {
                self.parse_error(TokenizerError::ControlCharacterReference);
                c1_replacement(code).unwrap_or(code)
            }
            _ => code,
        };
        // "Set the temporary buffer to the empty string. Append a code point equal to the
        // character reference code to the temporary buffer. Flush code points consumed as a
        // character reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer
            .push(char::from_u32(replacement).unwrap_or('\u{FFFD}'));
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to(self.return_state);
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#flush-code-points-consumed-as-a-character-reference)
    ///
    /// "When a state says to flush code points consumed as a character
    /// reference, it means that for each code point in the temporary buffer
    /// (in the order they were added to the buffer) user agent must append the
    /// code point from the buffer to the current attribute's value if the
    /// character reference was consumed as part of an attribute, or emit the
    /// code point as a character token otherwise."
    fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.return_state.is_attribute_value() {
            for c in buffer.chars() {
                self.append_to_attribute_value(c);
            }
        } else {
            self.emit_characters(&buffer);
        }
    }

    /// "This is an absence-of-digits-in-numeric-character-reference parse
    /// error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn absence_of_digits(&mut self) {
        self.parse_error(TokenizerError::AbsenceOfDigitsInNumericCharacterReference);
        self.flush_code_points_consumed_as_character_reference();
        self.reconsume_in(self.return_state);
    }

    /// Saturates above U+10FFFF so long digit runs cannot overflow.
    const fn accumulate_reference_digit(&mut self, radix: u32, digit: u32) {
        let code = self.character_reference_code.saturating_mul(radix).saturating_add(digit);
        self.character_reference_code = if code > 0x0010_FFFF { 0x0011_0000 } else { code };
    }

    fn end_reference_digits(&mut self) {
        match self.current_input_character {
            // "U+003B SEMICOLON - Switch to the numeric character reference end state."
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            // "Anything else - This is a missing-semicolon-after-character-reference parse
            // error. Reconsume in the numeric character reference end state."
            Some(_) => {
                self.parse_error(TokenizerError::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
            None => {
                self.eof_error(TokenizerError::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }
}

/// The replacement table of the numeric character reference end state,
/// mapping C1 controls to their windows-1252 characters.
const fn c1_replacement(code: u32) -> Option<u32> {
    let replacement = match code {
        0x80 => 0x20AC,
        0x82 => 0x201A,
        0x83 => 0x0192,
        0x84 => 0x201E,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02C6,
        0x89 => 0x2030,
        0x8A => 0x0160,
        0x8B => 0x2039,
        0x8C => 0x0152,
        0x8E => 0x017D,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201C,
        0x94 => 0x201D,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02DC,
        0x99 => 0x2122,
        0x9A => 0x0161,
        0x9B => 0x203A,
        0x9C => 0x0153,
        0x9E => 0x017E,
        0x9F => 0x0178,
        _ => return None,
    };
    Some(replacement)
}
