//! Token serialization per [CSS Syntax § 9](https://www.w3.org/TR/css-syntax-3/#serialization)
//! and the [CSSOM § 2.1 Common serializing idioms](https://www.w3.org/TR/cssom-1/#common-serializing-idioms).
//!
//! Re-tokenizing the text written for a token yields a token of the same
//! type with an equal value.

use weft_common::{Result, Write};

use super::token::{CssToken, HashType, NumericType};

/// Write the source form of `token` to `out`.
///
/// # Errors
/// Propagates errors from the write callback.
pub fn serialize_token(token: &CssToken, out: &mut dyn Write) -> Result<()> {
    match token {
        CssToken::Ident(value) => serialize_identifier(value, out),
        CssToken::Function(name) => {
            serialize_identifier(name, out)?;
            out.write("(")
        }
        CssToken::AtKeyword(value) => {
            out.write("@")?;
            serialize_identifier(value, out)
        }
        CssToken::Hash { value, hash_type } => {
            out.write("#")?;
            match hash_type {
                HashType::Id => serialize_identifier(value, out),
                HashType::Unrestricted => serialize_name(value, out),
            }
        }
        CssToken::String(value) => serialize_string(value, out),
        // "\n" after an open quote is the only way to spell a bad string.
        CssToken::BadString => out.write("\"\n"),
        CssToken::Url(value) => serialize_url(value, out),
        CssToken::BadUrl => out.write("url(()"),
        // A lone backslash would start an escape.
        CssToken::Delim('\\') => out.write("\\\n"),
        CssToken::Delim(c) => out.write_char(*c),
        CssToken::Number {
            value,
            int_value,
            numeric_type,
            signed,
        } => write_number(*value, *int_value, *numeric_type, *signed, out),
        CssToken::Percentage {
            value,
            int_value,
            numeric_type,
        } => {
            write_number(*value, *int_value, *numeric_type, false, out)?;
            out.write("%")
        }
        CssToken::Dimension {
            value,
            int_value,
            numeric_type,
            unit,
        } => {
            write_number(*value, *int_value, *numeric_type, false, out)?;
            serialize_unit(unit, out)
        }
        CssToken::Whitespace => out.write(" "),
        CssToken::Cdo => out.write("<!--"),
        CssToken::Cdc => out.write("-->"),
        CssToken::Colon => out.write(":"),
        CssToken::Semicolon => out.write(";"),
        CssToken::Comma => out.write(","),
        CssToken::LeftBracket => out.write("["),
        CssToken::RightBracket => out.write("]"),
        CssToken::LeftParen => out.write("("),
        CssToken::RightParen => out.write(")"),
        CssToken::LeftBrace => out.write("{"),
        CssToken::RightBrace => out.write("}"),
        CssToken::Comment(text) => {
            out.write("/*")?;
            out.write(text)?;
            out.write("*/")
        }
        CssToken::Eof => Ok(()),
    }
}

/// Source form of `token` as a `String`.
///
/// # Errors
/// Returns [`weft_common::Status::MemoryAllocation`] if the buffer cannot grow.
pub fn token_to_string(token: &CssToken) -> Result<String> {
    weft_common::to_string_with(|out| serialize_token(token, out))
}

/// [CSSOM § 2.1](https://www.w3.org/TR/cssom-1/#serialize-an-identifier)
///
/// "To serialize an identifier means to create a string represented by the
/// concatenation of, for each character of the identifier: ..."
///
/// # Errors
/// Propagates errors from the write callback.
pub fn serialize_identifier(ident: &str, out: &mut dyn Write) -> Result<()> {
    let first = ident.chars().next();
    let only_char = ident.chars().count() == 1;

    for (index, c) in ident.chars().enumerate() {
        match c {
            // "If the character is NULL (U+0000), then the REPLACEMENT CHARACTER (U+FFFD)."
            '\0' => out.write_char('\u{FFFD}')?,
            // "If the character is in the range [\1-\1f] (U+0001 to U+001F) or
            // is U+007F, then the character escaped as code point."
            '\u{1}'..='\u{1F}' | '\u{7F}' => escape_code_point(c, out)?,
            // "If the character is the first character and is in the range
            // [0-9] (U+0030 to U+0039), then the character escaped as code point."
            '0'..='9' if index == 0 => escape_code_point(c, out)?,
            // "If the character is the second character and is in the range
            // [0-9] and the first character is a "-", then the character
            // escaped as code point."
            '0'..='9' if index == 1 && first == Some('-') => escape_code_point(c, out)?,
            // "If the character is the first character and is a "-", and there
            // is no second character, then the escaped character."
            '-' if index == 0 && only_char => out.write("\\-")?,
            // "If the character is not handled by one of the above rules and is
            // greater than or equal to U+0080, is "-", "_", or in one of the
            // ranges [0-9], [A-Z], or [a-z], then the character itself."
            c if !c.is_ascii() || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.write_char(c)?;
            }
            // "Otherwise, the escaped character."
            c => {
                out.write("\\")?;
                out.write_char(c)?;
            }
        }
    }
    Ok(())
}

/// Serialize a hash value that need not be a valid identifier: only code
/// points outside the ident code point set are escaped.
fn serialize_name(name: &str, out: &mut dyn Write) -> Result<()> {
    for c in name.chars() {
        match c {
            '\0' => out.write_char('\u{FFFD}')?,
            '\u{1}'..='\u{1F}' | '\u{7F}' => escape_code_point(c, out)?,
            c if !c.is_ascii() || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.write_char(c)?;
            }
            c => {
                out.write("\\")?;
                out.write_char(c)?;
            }
        }
    }
    Ok(())
}

/// [CSSOM § 2.1](https://www.w3.org/TR/cssom-1/#serialize-a-string)
///
/// "To serialize a string means to create a string represented by '"'
/// (U+0022), followed by the result of applying the rules below to each
/// character of the given string, followed by '"' (U+0022)"
///
/// # Errors
/// Propagates errors from the write callback.
pub fn serialize_string(value: &str, out: &mut dyn Write) -> Result<()> {
    out.write("\"")?;
    for c in value.chars() {
        match c {
            // "If the character is NULL (U+0000), then the REPLACEMENT CHARACTER (U+FFFD)."
            '\0' => out.write_char('\u{FFFD}')?,
            // "If the character is in the range [\1-\1f] (U+0001 to U+001F) or
            // is U+007F, the character escaped as code point."
            '\u{1}'..='\u{1F}' | '\u{7F}' => escape_code_point(c, out)?,
            // "If the character is '"' (U+0022) or "\" (U+005C), the escaped character."
            '"' | '\\' => {
                out.write("\\")?;
                out.write_char(c)?;
            }
            // "Otherwise, the character itself."
            c => out.write_char(c)?,
        }
    }
    out.write("\"")
}

/// Serialize a `<url-token>` in its unquoted form.
///
/// # Errors
/// Propagates errors from the write callback.
pub fn serialize_url(value: &str, out: &mut dyn Write) -> Result<()> {
    out.write("url(")?;
    for c in value.chars() {
        match c {
            '\0' => out.write_char('\u{FFFD}')?,
            c if c.is_ascii_control() || c == ' ' => escape_code_point(c, out)?,
            '"' | '\'' | '(' | ')' | '\\' => {
                out.write("\\")?;
                out.write_char(c)?;
            }
            c => out.write_char(c)?,
        }
    }
    out.write(")")
}

/// A dimension's unit must not read back as the exponent of its number.
fn serialize_unit(unit: &str, out: &mut dyn Write) -> Result<()> {
    let mut chars = unit.chars();
    match (chars.next(), chars.next()) {
        (Some(e @ ('e' | 'E')), Some(next)) if next.is_ascii_digit() || next == '-' || next == '+' => {
            escape_code_point(e, out)?;
            // The rest continues an identifier already started.
            serialize_name(&unit[1..], out)
        }
        _ => serialize_identifier(unit, out),
    }
}

/// "To escape a character as code point means to create a string of "\"
/// (U+005C), followed by the Unicode code point as the smallest possible
/// number of hexadecimal digits in the range 0-9 a-f (U+0030 to U+0039 and
/// U+0061 to U+0066) to represent the code point in base 16, followed by a
/// single SPACE (U+0020)."
fn escape_code_point(c: char, out: &mut dyn Write) -> Result<()> {
    let mut buf = [0u8; 12];
    let text = format_hex(c as u32, &mut buf);
    out.write("\\")?;
    out.write(text)?;
    out.write(" ")
}

/// Lowercase hex digits of `value` without allocation.
fn format_hex(mut value: u32, buf: &mut [u8; 12]) -> &str {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = DIGITS[(value & 0xF) as usize];
        value >>= 4;
        if value == 0 {
            break;
        }
    }
    std::str::from_utf8(&buf[start..]).unwrap_or("0")
}

/// Write a numeric value so that it reads back with the same type flag.
fn write_number(
    value: f64,
    int_value: Option<i64>,
    numeric_type: NumericType,
    signed: bool,
    out: &mut dyn Write,
) -> Result<()> {
    match (numeric_type, int_value) {
        (NumericType::Integer, Some(int)) => {
            if int == 0 && value.is_sign_negative() {
                out.write("-0")
            } else if signed && int >= 0 {
                out.write(&format!("+{int}"))
            } else {
                out.write(&int.to_string())
            }
        }
        (NumericType::Integer, None) => out.write(&format!("{value}")),
        (NumericType::Number, _) => {
            let mut text = format!("{value}");
            if signed && value.is_sign_positive() {
                text.insert(0, '+');
            }
            if !text.contains('.') {
                text.push_str(".0");
            }
            out.write(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::to_string_with;

    fn ident(value: &str) -> String {
        to_string_with(|out| serialize_identifier(value, out)).unwrap()
    }

    #[test]
    fn test_identifier_escapes() {
        assert_eq!(ident("abc"), "abc");
        assert_eq!(ident("1a"), "\\31 a");
        assert_eq!(ident("-1"), "-\\31 ");
        assert_eq!(ident("-"), "\\-");
        assert_eq!(ident("a b"), "a\\ b");
        assert_eq!(ident("\u{7}x"), "\\7 x");
    }

    #[test]
    fn test_string_escapes() {
        let text = to_string_with(|out| serialize_string("a\"b\\c", out)).unwrap();
        assert_eq!(text, r#""a\"b\\c""#);
    }

    #[test]
    fn test_number_keeps_type_flag() {
        assert_eq!(token_to_string(&CssToken::number(1.0)).unwrap(), "1.0");
        assert_eq!(token_to_string(&CssToken::integer(12)).unwrap(), "12");
        assert_eq!(
            token_to_string(&CssToken::dimension(1.0, Some(1), "e3")).unwrap(),
            "1\\65 3"
        );
        assert_eq!(
            token_to_string(&CssToken::dimension(2.0, Some(2), "e-1x")).unwrap(),
            "2\\65 -1x"
        );
        assert_eq!(
            token_to_string(&CssToken::dimension(2.0, Some(2), "em")).unwrap(),
            "2em"
        );
    }
}
