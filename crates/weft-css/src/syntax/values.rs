//! Component values and the token cursor the grammar engine walks.

use serde::Serialize;
use weft_common::{Result, Span, Write};

use crate::tokenizer::{CssToken, serialize_identifier, serialize_token};

static EOF_TOKEN: CssToken = CssToken::Eof;

/// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-a-component-value)
///
/// "A component value is one of the preserved tokens, a function, or a simple block."
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentValue {
    /// A preserved token.
    Token(CssToken),
    /// A function with its contents.
    Function {
        /// The function name.
        name: String,
        /// The function arguments.
        value: Vec<ComponentValue>,
    },
    /// A simple block.
    Block {
        /// The opening token character.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    /// Whether this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Token(CssToken::Whitespace))
    }

    /// Whether this is a `{}` block.
    #[must_use]
    pub const fn is_curly_block(&self) -> bool {
        matches!(self, Self::Block { token: '{', .. })
    }
}

impl Drop for ComponentValue {
    /// Nested values are released from a flat list, so dropping deeply
    /// nested input does not recurse once per level.
    fn drop(&mut self) {
        let mut pending = match self {
            Self::Function { value, .. } | Self::Block { value, .. } => std::mem::take(value),
            Self::Token(_) => return,
        };
        while let Some(mut child) = pending.pop() {
            if let Self::Function { value, .. } | Self::Block { value, .. } = &mut child {
                pending.append(value);
            }
        }
    }
}

/// Write component values back as CSS text.
///
/// # Errors
/// Propagates errors from the write callback.
pub fn serialize_component_values(values: &[ComponentValue], out: &mut dyn Write) -> Result<()> {
    // (remaining siblings, closing text)
    let mut stack: Vec<(std::slice::Iter<'_, ComponentValue>, &'static str)> =
        vec![(values.iter(), "")];
    while let Some((iter, _)) = stack.last_mut() {
        let Some(value) = iter.next() else {
            if let Some((_, close)) = stack.pop() {
                out.write(close)?;
            }
            continue;
        };
        match value {
            ComponentValue::Token(token) => serialize_token(token, out)?,
            ComponentValue::Function { name, value } => {
                serialize_identifier(name, out)?;
                out.write("(")?;
                stack.push((value.iter(), ")"));
            }
            ComponentValue::Block { token, value } => {
                out.write_char(*token)?;
                let close = match token {
                    '{' => "}",
                    '[' => "]",
                    _ => ")",
                };
                stack.push((value.iter(), close));
            }
        }
    }
    Ok(())
}

/// A read position over a token list. Comment tokens are skipped; reading
/// past the end yields `<EOF-token>` forever.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [CssToken],
    spans: &'a [Span],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    /// Cursor over `tokens`. `spans` is parallel to `tokens` or empty.
    #[must_use]
    pub fn new(tokens: &'a [CssToken], spans: &'a [Span]) -> Self {
        let mut cursor = Self {
            tokens,
            spans,
            position: 0,
        };
        cursor.skip_comments();
        cursor
    }

    /// Cursor over `tokens` resuming at `position`.
    #[must_use]
    pub fn starting_at(tokens: &'a [CssToken], spans: &'a [Span], position: usize) -> Self {
        let mut cursor = Self {
            tokens,
            spans,
            position,
        };
        cursor.skip_comments();
        cursor
    }

    fn skip_comments(&mut self) {
        while self.tokens.get(self.position).is_some_and(CssToken::is_comment) {
            self.position += 1;
        }
    }

    /// The next token, without consuming it.
    #[must_use]
    pub fn peek(&self) -> &'a CssToken {
        self.tokens.get(self.position).unwrap_or(&EOF_TOKEN)
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> &'a CssToken {
        let token = self.peek();
        if self.position < self.tokens.len() {
            self.position += 1;
            self.skip_comments();
        }
        token
    }

    /// The token at `position`, comments included; `None` past the end.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'a CssToken> {
        self.tokens.get(position)
    }

    /// Whether only `<EOF-token>` remains.
    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// Consume whitespace tokens.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            let _ = self.advance();
        }
    }

    /// Index of the next token; pass it to [`TokenCursor::rewind`] to come back.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Return to a position saved with [`TokenCursor::position`].
    pub const fn rewind(&mut self, position: usize) {
        self.position = position;
    }

    /// Source offset of the next token.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset_at(self.position)
    }

    /// Source offset of the token at `position`.
    #[must_use]
    pub fn offset_at(&self, position: usize) -> usize {
        match self.spans.get(position) {
            Some(span) => span.start,
            None => self.spans.last().map_or(position, |span| span.end),
        }
    }

    /// Tokens between two positions.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a [CssToken] {
        self.tokens.get(start..end).unwrap_or(&[])
    }

    /// Spans between two positions, empty if the cursor has none.
    #[must_use]
    pub fn span_slice(&self, start: usize, end: usize) -> &'a [Span] {
        self.spans.get(start..end).unwrap_or(&[])
    }
}

/// What closes an open function or block.
fn closing_token(token: &CssToken) -> Option<CssToken> {
    token.mirror()
}

/// One function or simple block whose contents are still being read.
struct Open {
    opener: CssToken,
    closer: CssToken,
    value: Vec<ComponentValue>,
}

impl Open {
    fn finish(self) -> ComponentValue {
        match self.opener {
            CssToken::Function(name) => ComponentValue::Function {
                name,
                value: self.value,
            },
            CssToken::LeftBracket => ComponentValue::Block {
                token: '[',
                value: self.value,
            },
            CssToken::LeftParen => ComponentValue::Block {
                token: '(',
                value: self.value,
            },
            _ => ComponentValue::Block {
                token: '{',
                value: self.value,
            },
        }
    }
}

/// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
///
/// Nested functions and blocks are tracked on an explicit stack. At EOF
/// every open function and block is closed.
pub fn consume_component_value(cursor: &mut TokenCursor<'_>) -> ComponentValue {
    let first = cursor.advance().clone();
    let Some(closer) = closing_token(&first) else {
        // "Otherwise, return the current input token."
        return ComponentValue::Token(first);
    };

    let mut stack = vec![Open {
        opener: first,
        closer,
        value: Vec::new(),
    }];

    loop {
        let token = cursor.peek();
        let finished = if token.is_eof() {
            // "<EOF-token>": "This is a parse error. Return the block."
            stack.pop()
        } else if stack.last().is_some_and(|open| open.closer == *token) {
            // "ending token": "Return the block."
            let _ = cursor.advance();
            stack.pop()
        } else if let Some(closer) = closing_token(token) {
            let opener = cursor.advance().clone();
            stack.push(Open {
                opener,
                closer,
                value: Vec::new(),
            });
            continue;
        } else {
            let token = cursor.advance().clone();
            if let Some(open) = stack.last_mut() {
                open.value.push(ComponentValue::Token(token));
            }
            continue;
        };

        let Some(open) = finished else {
            return ComponentValue::Token(CssToken::Eof);
        };
        let value = open.finish();
        match stack.last_mut() {
            Some(parent) => parent.value.push(value),
            None => return value,
        }
    }
}

/// Consume component values until `stop` matches a top-level token (left
/// unconsumed) or EOF.
pub fn consume_component_values_until(
    cursor: &mut TokenCursor<'_>,
    stop: impl Fn(&CssToken) -> bool,
) -> Vec<ComponentValue> {
    let mut values = Vec::new();
    while !cursor.at_eof() && !stop(cursor.peek()) {
        values.push(consume_component_value(cursor));
    }
    values
}

/// Skip one component value without building it.
pub fn skip_component_value(cursor: &mut TokenCursor<'_>) {
    let mut closers = Vec::new();
    loop {
        let token = cursor.advance();
        if token.is_eof() {
            return;
        }
        if closers.last() == Some(token) {
            let _ = closers.pop();
        } else if let Some(closer) = closing_token(token) {
            closers.push(closer);
        }
        if closers.is_empty() {
            return;
        }
    }
}

/// [§ 5.3.10 Parse a list of component values](https://www.w3.org/TR/css-syntax-3/#parse-list-of-component-values)
///
/// "Repeatedly consume a component value from input until an <EOF-token> is
/// returned, appending the returned values (except the final <EOF-token>)
/// into a list. Return the list."
#[must_use]
pub fn parse_component_values(css: &str) -> Vec<ComponentValue> {
    let (tokens, spans) = crate::tokenizer::tokenize_with_spans(css);
    let mut cursor = TokenCursor::new(&tokens, &spans);
    consume_component_values_until(&mut cursor, |_| false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::to_string_with;

    #[test]
    fn test_nested_blocks_close_at_eof() {
        let values = parse_component_values("f(a [b (c");
        assert_eq!(values.len(), 1);
        let ComponentValue::Function { name, value } = &values[0] else {
            panic!("Expected function, got {:?}", values[0]);
        };
        assert_eq!(name, "f");
        assert!(matches!(value.last(), Some(ComponentValue::Block { token: '[', .. })));
    }

    #[test]
    fn test_mismatched_closer_is_a_plain_token() {
        let values = parse_component_values("(a])");
        let ComponentValue::Block { token: '(', value } = &values[0] else {
            panic!("Expected block");
        };
        assert_eq!(value[1], ComponentValue::Token(CssToken::RightBracket));
    }

    #[test]
    fn test_serialize_component_values() {
        let values = parse_component_values("rgb(1, 2) [x] {a:b}");
        let text = to_string_with(|out| serialize_component_values(&values, out)).unwrap();
        assert_eq!(text, "rgb(1, 2) [x] {a:b}");
    }

    #[test]
    fn test_deep_nesting_is_iterative() {
        let css = "(".repeat(20_000);
        let mut tokens = crate::tokenizer::tokenize(&css);
        let _ = tokens.pop();
        let mut cursor = TokenCursor::new(&tokens, &[]);
        skip_component_value(&mut cursor);
        assert!(cursor.at_eof());
    }
}
