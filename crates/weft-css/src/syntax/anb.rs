//! [§ 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
//!
//! "Several things in CSS, such as the :nth-child() pseudoclass, need to
//! indicate indexes in a list. The An+B microsyntax is useful for this,
//! allowing an author to easily indicate single elements or all elements at
//! regularly-spaced intervals in a list."

use std::fmt;

use serde::Serialize;

use super::values::TokenCursor;
use crate::tokenizer::{CssToken, NumericType};

/// A parsed `An+B` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnB {
    /// Step.
    pub a: i64,
    /// Offset.
    pub b: i64,
}

impl AnB {
    /// "The odd keyword represents every odd index, i.e. 2n+1."
    pub const ODD: Self = Self { a: 2, b: 1 };

    /// "The even keyword represents every even index, i.e. 2n."
    pub const EVEN: Self = Self { a: 2, b: 0 };

    /// Create a new `An+B`.
    #[must_use]
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Whether the 1-based `index` is one of the represented indexes.
    ///
    /// "The An+B notation defines an integer step (A) and offset (B), and
    /// represents the Nth elements in a list, for every positive integer or
    /// zero value of n, with the first element in the list having index 1."
    #[must_use]
    pub const fn matches(self, index: i64) -> bool {
        let offset = index - self.b;
        if self.a == 0 {
            return offset == 0;
        }
        offset % self.a == 0 && offset / self.a >= 0
    }
}

impl fmt::Display for AnB {
    /// [CSSOM § 6.7.3](https://drafts.csswg.org/cssom/#serialize-a-selector)
    /// with the `odd` and `even` keywords kept as keywords.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (2, 1) => f.write_str("odd"),
            (2, 0) => f.write_str("even"),
            (0, b) => write!(f, "{b}"),
            (a, b) => {
                match a {
                    1 => f.write_str("n")?,
                    -1 => f.write_str("-n")?,
                    a => write!(f, "{a}n")?,
                }
                match b {
                    0 => Ok(()),
                    b if b > 0 => write!(f, "+{b}"),
                    b => write!(f, "{b}"),
                }
            }
        }
    }
}

/// [§ 6.2 Parsing An+B](https://www.w3.org/TR/css-syntax-3/#anb-syntax)
///
/// Consume an `An+B` value from the cursor. Leading whitespace must already
/// be skipped. Returns `None` if the tokens do not form a valid value; the
/// cursor is then left somewhere inside the bad input.
pub fn parse_anb(cursor: &mut TokenCursor<'_>) -> Option<AnB> {
    match cursor.advance() {
        // "odd | even"
        CssToken::Ident(name) if name.eq_ignore_ascii_case("odd") => Some(AnB::ODD),
        CssToken::Ident(name) if name.eq_ignore_ascii_case("even") => Some(AnB::EVEN),

        // "<integer>"
        token @ CssToken::Number { .. } => integer(token).map(|b| AnB::new(0, b)),

        // "<n-dimension>", "<ndash-dimension>", "<ndashdigit-dimension>"
        CssToken::Dimension {
            int_value: Some(a),
            numeric_type: NumericType::Integer,
            unit,
            ..
        } => n_tail(cursor, *a, unit),

        // "-n", "-n-", "-n-<digits>" and the same without the dash
        CssToken::Ident(name) => match name.strip_prefix('-') {
            Some(rest) => n_tail(cursor, -1, rest),
            None => n_tail(cursor, 1, name),
        },

        // "'+'? n": the plus must be immediately followed by the ident.
        CssToken::Delim('+') => match cursor.advance() {
            CssToken::Ident(name) if !name.starts_with('-') => n_tail(cursor, 1, name),
            _ => None,
        },

        _ => None,
    }
}

/// The value of an `<integer>` token.
const fn integer(token: &CssToken) -> Option<i64> {
    match token {
        CssToken::Number {
            int_value: Some(value),
            numeric_type: NumericType::Integer,
            ..
        } => Some(*value),
        _ => None,
    }
}

/// Whether `token` is a `<signed-integer>`: an integer written with its sign.
const fn signed_integer(token: &CssToken) -> Option<i64> {
    match token {
        CssToken::Number { signed: true, .. } => integer(token),
        _ => None,
    }
}

/// Whether `token` is a `<signless-integer>`.
const fn signless_integer(token: &CssToken) -> Option<i64> {
    match token {
        CssToken::Number { signed: false, .. } => integer(token),
        _ => None,
    }
}

/// Finish parsing after the `A` part; `rest` is the text that followed the
/// number or sign (`n`, `n-` or `n-<digits>`).
fn n_tail(cursor: &mut TokenCursor<'_>, a: i64, rest: &str) -> Option<AnB> {
    let rest = rest.to_ascii_lowercase();
    let after_n = rest.strip_prefix('n')?;

    match after_n {
        // "<n-dimension> ['+' | '-'] <signless-integer>" and friends
        "" => Some(AnB::new(a, b_tail(cursor)?)),

        // "<ndash-dimension> <signless-integer>"
        "-" => {
            cursor.skip_whitespace();
            let b = signless_integer(cursor.advance())?;
            Some(AnB::new(a, -b))
        }

        // "<ndashdigit-dimension>": "a dimension token with its type flag set to
        // integer, and a unit that is an ASCII case-insensitive match for "n-*",
        // where "*" is a series of one or more digits"
        digits => {
            let digits = digits.strip_prefix('-')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let b: i64 = digits.parse().unwrap_or(i64::MAX);
            Some(AnB::new(a, -b))
        }
    }
}

/// The optional `B` after a bare `n`. Missing `B` leaves the cursor on the
/// token after `n`.
fn b_tail(cursor: &mut TokenCursor<'_>) -> Option<i64> {
    let start = cursor.position();
    cursor.skip_whitespace();

    let token = cursor.peek();
    // "<n-dimension> <signed-integer>"
    if let Some(b) = signed_integer(token) {
        let _ = cursor.advance();
        return Some(b);
    }

    // "<n-dimension> ['+' | '-'] <signless-integer>"
    let sign = match token {
        CssToken::Delim('+') => 1,
        CssToken::Delim('-') => -1,
        _ => {
            cursor.rewind(start);
            return Some(0);
        }
    };
    let _ = cursor.advance();
    cursor.skip_whitespace();
    let b = signless_integer(cursor.advance())?;
    Some(sign * b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_with_spans;

    fn parse(css: &str) -> Option<AnB> {
        let (tokens, spans) = tokenize_with_spans(css);
        let mut cursor = TokenCursor::new(&tokens, &spans);
        let anb = parse_anb(&mut cursor)?;
        cursor.skip_whitespace();
        cursor.at_eof().then_some(anb)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse("odd"), Some(AnB::ODD));
        assert_eq!(parse("EVEN"), Some(AnB::EVEN));
    }

    #[test]
    fn test_forms() {
        assert_eq!(parse("5"), Some(AnB::new(0, 5)));
        assert_eq!(parse("-5"), Some(AnB::new(0, -5)));
        assert_eq!(parse("2n"), Some(AnB::new(2, 0)));
        assert_eq!(parse("2n+1"), Some(AnB::new(2, 1)));
        assert_eq!(parse("2n-1"), Some(AnB::new(2, -1)));
        assert_eq!(parse("2n - 1"), Some(AnB::new(2, -1)));
        assert_eq!(parse("2n- 1"), Some(AnB::new(2, -1)));
        assert_eq!(parse("-n+3"), Some(AnB::new(-1, 3)));
        assert_eq!(parse("+n"), Some(AnB::new(1, 0)));
        assert_eq!(parse("n-7"), Some(AnB::new(1, -7)));
        assert_eq!(parse("-n- 2"), Some(AnB::new(-1, -2)));
        assert_eq!(parse("3N + 0"), Some(AnB::new(3, 0)));
    }

    #[test]
    fn test_invalid_forms() {
        assert_eq!(parse("+ n"), None);
        assert_eq!(parse("2n + -1"), None);
        assert_eq!(parse("2n 1"), None);
        assert_eq!(parse("1.5n"), None);
        assert_eq!(parse("m"), None);
        assert_eq!(parse("+-n"), None);
    }

    #[test]
    fn test_matches() {
        assert!(AnB::ODD.matches(1));
        assert!(!AnB::ODD.matches(2));
        assert!(AnB::new(0, 3).matches(3));
        assert!(AnB::new(-1, 3).matches(1));
        assert!(!AnB::new(-1, 3).matches(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(AnB::new(2, 1).to_string(), "odd");
        assert_eq!(AnB::new(-1, 3).to_string(), "-n+3");
        assert_eq!(AnB::new(3, -2).to_string(), "3n-2");
        assert_eq!(AnB::new(0, 4).to_string(), "4");
        assert_eq!(AnB::new(1, 0).to_string(), "n");
    }
}
