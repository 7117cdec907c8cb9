use std::cell::Cell;

use log::{debug, trace};
use strum_macros::{Display, IntoStaticStr};
use weft_common::{ParseError, ParseErrors, Result, Span, Status};

use super::token::{CssToken, HashType, NumericType};

/// Consumed input kept before the buffer is compacted in streaming modes.
const COMPACT_THRESHOLD: usize = 4096;

/// [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// Parse errors the tokenizer records while still producing a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CssTokenizerError {
    /// Input ends inside `/* ... */`.
    EofInComment,
    /// Input ends inside a quoted string.
    EofInString,
    /// A newline inside a quoted string; a `<bad-string-token>` is produced.
    NewlineInString,
    /// Input ends inside an unquoted `url(`.
    EofInUrl,
    /// A quote, `(`, stray whitespace or non-printable code point inside an
    /// unquoted `url(`; a `<bad-url-token>` is produced.
    BadUrl,
    /// `\` followed by a newline outside a string.
    InvalidEscape,
    /// Input ends right after `\`.
    EofInEscape,
}

/// Tokenizer configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssTokenizerOptions {
    /// Emit [`CssToken::Comment`] instead of dropping comments.
    pub keep_comments: bool,
}

impl CssTokenizerOptions {
    /// Emit comment tokens.
    #[must_use]
    pub const fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }
}

/// The kind of token that ran into the end of the input, judged from its
/// first code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// `/*`, ended only by `*/`.
    Comment,
    /// A quoted string, ended by its quote or a newline.
    String(char),
    /// An unquoted `url(`, ended by `)`.
    Url,
    /// An ident, hash, at-keyword or number, ended by a code point that is
    /// not an ident code point.
    Name,
    /// A whitespace run.
    Whitespace,
    /// A short token that needs one or two more code points.
    Other,
}

impl Pending {
    /// Whether `c` cannot end the token.
    const fn continues(self, c: char) -> bool {
        match self {
            Self::Comment => c != '/',
            Self::String(quote) => c != quote && c != '\n',
            Self::Url => !matches!(c, ')' | '"' | '\''),
            Self::Name => is_ident_code_point(c),
            Self::Whitespace => is_whitespace(c),
            Self::Other => false,
        }
    }
}

/// A token rewound for lack of input.
#[derive(Debug, Clone, Copy)]
struct Wait {
    kind: Pending,
    /// Code points after the token start already scanned.
    scanned: usize,
}

/// Callback that supplies the next chunk of input in pull mode, or `None`
/// once the input is exhausted.
pub type PullSource = Box<dyn FnMut() -> Result<Option<String>>>;

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification.
///
/// Input reaches the tokenizer in one of three ways, all of which drive the
/// same [`CssTokenizer::next_token`] core:
/// - whole: [`CssTokenizer::new`] then [`CssTokenizer::run`]
/// - pull: [`CssTokenizer::with_pull`] then [`CssTokenizer::run`]; the
///   callback is asked for more text whenever a token needs it
/// - push: [`CssTokenizer::streaming`], then [`CssTokenizer::begin`],
///   any number of [`CssTokenizer::feed`] calls and [`CssTokenizer::end`]
///
/// When a token runs into the end of the text received so far and more may
/// follow, the tokenizer rewinds to the start of that token and waits. It is
/// scanned again only once new text holds a code point that can end it, so
/// a long token arriving in many small chunks is not rescanned per chunk.
/// Completed tokens and comments are never scanned again.
pub struct CssTokenizer {
    options: CssTokenizerOptions,
    pull: Option<PullSource>,

    /// Preprocessed input not yet released.
    input: Vec<char>,
    /// Current position in `input`
    position: usize,
    /// Absolute position of `input[0]`.
    base: usize,
    /// No more input will arrive.
    eof: bool,
    /// The last input chunk ended with CR; a leading LF in the next one is
    /// part of the same newline.
    pending_cr: bool,
    /// A lookahead read past the end of `input`.
    starved: Cell<bool>,
    /// The `<EOF-token>` has been produced.
    finished: bool,

    /// Collected tokens
    tokens: Vec<CssToken>,
    spans: Vec<Span>,
    /// Where the token being consumed starts, after leading comments.
    token_start: usize,
    /// Errors of the token being consumed; dropped if it is rewound.
    pending_errors: Vec<(CssTokenizerError, usize)>,
    errors: ParseErrors<CssTokenizerError>,
    /// The token at `position` is waiting for input.
    wait: Option<Wait>,
}

impl CssTokenizer {
    /// Create a CSS tokenizer over the whole of `input`.
    pub fn new(input: impl Into<String>) -> Self {
        Self::with_options(input, CssTokenizerOptions::default())
    }

    /// Create a CSS tokenizer over the whole of `input` with options.
    pub fn with_options(input: impl Into<String>, options: CssTokenizerOptions) -> Self {
        let mut tokenizer = Self::streaming(options);
        tokenizer.append(&input.into());
        tokenizer.eof = true;
        tokenizer
    }

    /// Create a tokenizer that asks `source` for input as it needs it.
    pub fn with_pull<F>(options: CssTokenizerOptions, source: F) -> Self
    where
        F: FnMut() -> Result<Option<String>> + 'static,
    {
        let mut tokenizer = Self::streaming(options);
        tokenizer.pull = Some(Box::new(source));
        tokenizer
    }

    /// Create a tokenizer for push mode. Call [`CssTokenizer::begin`] (optional
    /// for the first session), [`CssTokenizer::feed`] and [`CssTokenizer::end`].
    #[must_use]
    pub fn streaming(options: CssTokenizerOptions) -> Self {
        Self {
            options,
            pull: None,
            input: Vec::new(),
            position: 0,
            base: 0,
            eof: false,
            pending_cr: false,
            starved: Cell::new(false),
            finished: false,
            tokens: Vec::new(),
            spans: Vec::new(),
            token_start: 0,
            pending_errors: Vec::new(),
            errors: ParseErrors::new(),
            wait: None,
        }
    }

    /// Reset for a new push session, keeping the options.
    pub fn begin(&mut self) {
        self.input.clear();
        self.position = 0;
        self.base = 0;
        self.eof = false;
        self.pending_cr = false;
        self.starved.set(false);
        self.finished = false;
        self.tokens.clear();
        self.spans.clear();
        self.token_start = 0;
        self.pending_errors.clear();
        self.errors.clear();
        self.wait = None;
    }

    /// Push the next chunk and tokenize as far as it allows.
    ///
    /// # Errors
    /// [`Status::Failed`] after [`CssTokenizer::end`];
    /// [`Status::MemoryAllocation`] if the buffer cannot grow.
    pub fn feed(&mut self, chunk: &str) -> Result<()> {
        if self.eof {
            return Err(Status::Failed);
        }
        Status::reserve(&mut self.input, chunk.len())?;
        self.append(chunk);
        while let Some(token) = self.next_token()? {
            self.push_token(token)?;
        }
        Ok(())
    }

    /// Mark the end of input and tokenize what remains, up to and including
    /// the `<EOF-token>`.
    ///
    /// # Errors
    /// [`Status::MemoryAllocation`] if the token list cannot grow.
    pub fn end(&mut self) -> Result<()> {
        self.eof = true;
        self.run()
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "This section describes how to consume a token from a stream of code points.
    /// It will return a single token of any type."
    ///
    /// Collects every remaining token, including the `<EOF-token>`.
    ///
    /// # Errors
    /// [`Status::MemoryAllocation`], or the error of a pull callback.
    pub fn run(&mut self) -> Result<()> {
        while !self.finished {
            match self.next_token()? {
                Some(token) => self.push_token(token)?,
                // Push mode without `end()`.
                None => break,
            }
        }
        Ok(())
    }

    /// Consume one token.
    ///
    /// Returns `None` when the token cannot be completed until more input is
    /// fed. After the `<EOF-token>` every call returns it again.
    ///
    /// # Errors
    /// The error of a pull callback.
    pub fn next_token(&mut self) -> Result<Option<(CssToken, Span)>> {
        loop {
            if self.finished {
                let at = self.base + self.position;
                return Ok(Some((CssToken::Eof, Span::empty(at))));
            }
            if let Some(wait) = self.wait.take()
                && !self.eof
                && !self.may_finish(wait)
            {
                self.wait = Some(Wait {
                    kind: wait.kind,
                    scanned: self.input.len() - self.position,
                });
                if !self.refill()? {
                    return Ok(None);
                }
                continue;
            }
            self.compact();

            let mut start = self.position;
            self.starved.set(false);
            self.pending_errors.clear();
            if !self.options.keep_comments {
                // "Consume comments." Finished ones are not rescanned.
                while self.consume_comment().is_some() && !self.starved.get() {
                    start = self.position;
                }
            }
            let token = self.consume_token();

            if self.starved.get() && !self.eof {
                // "Rewind" to the start of this token and wait for input.
                self.position = start;
                self.pending_errors.clear();
                self.wait = Some(Wait {
                    kind: self.pending_kind(),
                    scanned: self.input.len() - start,
                });
                if !self.refill()? {
                    trace!(target: "css.syntax", "tokenizer suspended at {}", self.base + start);
                    return Ok(None);
                }
                continue;
            }

            for (code, position) in self.pending_errors.drain(..) {
                debug!(target: "css.syntax", "tokenizer parse error {code} at {position}");
                self.errors.push(code, position);
            }
            if token.is_eof() {
                self.finished = true;
            }
            let span = Span::new(self.base + self.token_start, self.base + self.position);
            return Ok(Some((token, span)));
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<CssToken> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[CssToken] {
        &self.tokens
    }

    /// Source span of each collected token, parallel to [`CssTokenizer::tokens`].
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Collected tokens and their spans.
    #[must_use]
    pub fn into_parts(self) -> (Vec<CssToken>, Vec<Span>) {
        (self.tokens, self.spans)
    }

    /// Parse errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError<CssTokenizerError>] {
        self.errors.as_slice()
    }

    /// Whether the `<EOF-token>` has been produced.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    fn push_token(&mut self, (token, span): (CssToken, Span)) -> Result<()> {
        Status::reserve(&mut self.tokens, 1)?;
        Status::reserve(&mut self.spans, 1)?;
        self.tokens.push(token);
        self.spans.push(span);
        Ok(())
    }

    /// Ask the pull source for more input. Returns whether tokenizing can go on.
    fn refill(&mut self) -> Result<bool> {
        let Some(pull) = self.pull.as_mut() else {
            return Ok(false);
        };
        match pull()? {
            Some(chunk) => {
                Status::reserve(&mut self.input, chunk.len())?;
                self.append(&chunk);
            }
            None => self.eof = true,
        }
        Ok(true)
    }

    /// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
    fn append(&mut self, chunk: &str) {
        for c in chunk.chars() {
            if std::mem::take(&mut self.pending_cr) && c == '\n' {
                continue;
            }
            match c {
                // "Replace any U+000D CARRIAGE RETURN (CR) code points, U+000C FORM FEED (FF)
                // code points, or pairs of U+000D CARRIAGE RETURN (CR) followed by U+000A
                // LINE FEED (LF) in input by a single U+000A LINE FEED (LF) code point."
                '\r' => {
                    self.input.push('\n');
                    self.pending_cr = true;
                }
                '\x0C' => self.input.push('\n'),
                // "Replace any U+0000 NULL or surrogate code points in input with
                // U+FFFD REPLACEMENT CHARACTER."
                '\0' => self.input.push('\u{FFFD}'),
                c => self.input.push(c),
            }
        }
    }

    /// What kind of token starts at `position`.
    fn pending_kind(&self) -> Pending {
        let rest = &self.input[self.position..];
        match rest {
            ['/', '*', ..] => Pending::Comment,
            [quote @ ('"' | '\''), ..] => Pending::String(*quote),
            [u, r, l, '(', ..]
                if u.eq_ignore_ascii_case(&'u')
                    && r.eq_ignore_ascii_case(&'r')
                    && l.eq_ignore_ascii_case(&'l') =>
            {
                Pending::Url
            }
            [c, ..] if is_whitespace(*c) => Pending::Whitespace,
            [c, ..] if is_ident_code_point(*c) || matches!(*c, '#' | '@' | '\\') => Pending::Name,
            _ => Pending::Other,
        }
    }

    /// Whether text received since `wait` was recorded can end the waiting
    /// token.
    fn may_finish(&self, wait: Wait) -> bool {
        let from = self.position + wait.scanned;
        if wait.kind == Pending::Comment {
            // "*/", possibly split across chunks.
            let tail = self.input.get(from.saturating_sub(1)..).unwrap_or_default();
            return tail.windows(2).any(|pair| pair == ['*', '/']);
        }
        self.input
            .get(from..)
            .unwrap_or_default()
            .iter()
            .any(|&c| !wait.kind.continues(c))
    }

    /// Release consumed input in streaming modes.
    fn compact(&mut self) {
        if self.position >= COMPACT_THRESHOLD {
            let _ = self.input.drain(..self.position);
            self.base += self.position;
            self.position = 0;
        }
    }

    fn error(&mut self, code: CssTokenizerError) {
        self.pending_errors.push((code, self.base + self.position));
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CssToken {
        if self.options.keep_comments {
            self.token_start = self.position;
            if let Some(comment) = self.consume_comment() {
                return comment;
            }
        } else {
            // "Consume comments."
            self.consume_comments();
        }
        self.token_start = self.position;

        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return CssToken::Eof;
        };

        match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CssToken::Whitespace
            }

            // "U+0022 QUOTATION MARK (")"
            // "Consume a string token and return it."
            '"' => self.consume_string_token('"'),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "Create a <hash-token>."
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type =
                        if would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2)) {
                            HashType::Id
                        } else {
                            HashType::Unrestricted
                        };

                    // "Consume an ident sequence, and set the <hash-token>'s value
                    // to the returned string."
                    let value = self.consume_ident_sequence();

                    CssToken::Hash { value, hash_type }
                } else {
                    // "Otherwise, return a <delim-token> with its value set to the
                    // current input code point."
                    CssToken::Delim('#')
                }
            }

            // "U+0027 APOSTROPHE (')"
            // "Consume a string token and return it."
            '\'' => self.consume_string_token('\''),

            // "U+0028 LEFT PARENTHESIS (()"
            // "Return a <(-token>."
            '(' => CssToken::LeftParen,

            // "U+0029 RIGHT PARENTHESIS ())"
            // "Return a <)-token>."
            ')' => CssToken::RightParen,

            // "U+002B PLUS SIGN (+)"
            '+' => {
                // "If the input stream starts with a number..."
                if would_start_number(Some('+'), self.peek(), self.peek_at(1)) {
                    // "Reconsume the current input code point."
                    self.reconsume();
                    // "Consume a numeric token and return it."
                    self.consume_numeric_token()
                } else {
                    CssToken::Delim('+')
                }
            }

            // "U+002C COMMA (,)"
            // "Return a <comma-token>."
            ',' => CssToken::Comma,

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                // "If the input stream starts with a number..."
                if would_start_number(Some('-'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_numeric_token()
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    let _ = self.consume(); // -
                    let _ = self.consume(); // >
                    CssToken::Cdc
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if would_start_ident_sequence(Some('-'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CssToken::Delim('-')
                }
            }

            // "U+002E FULL STOP (.)"
            '.' => {
                // "If the input stream starts with a number..."
                if would_start_number(Some('.'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CssToken::Delim('.')
                }
            }

            // "U+003A COLON (:)"
            // "Return a <colon-token>."
            ':' => CssToken::Colon,

            // "U+003B SEMICOLON (;)"
            // "Return a <semicolon-token>."
            ';' => CssToken::Semicolon,

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                // "If the next 3 input code points are U+0021 U+002D U+002D (!--)..."
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    let _ = self.consume(); // !
                    let _ = self.consume(); // -
                    let _ = self.consume(); // -
                    CssToken::Cdo
                } else {
                    CssToken::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                // "If the next 3 input code points would start an ident sequence..."
                if would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2)) {
                    // "Consume an ident sequence, create an <at-keyword-token> with
                    // its value set to the returned value, and return it."
                    let value = self.consume_ident_sequence();
                    CssToken::AtKeyword(value)
                } else {
                    CssToken::Delim('@')
                }
            }

            // "U+005B LEFT SQUARE BRACKET ([)"
            // "Return a <[-token>."
            '[' => CssToken::LeftBracket,

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                // "If the input stream starts with a valid escape..."
                if is_valid_escape(Some('\\'), self.peek()) {
                    // "Reconsume the current input code point."
                    self.reconsume();
                    // "Consume an ident-like token and return it."
                    self.consume_ident_like_token()
                } else {
                    // "This is a parse error."
                    self.error(CssTokenizerError::InvalidEscape);
                    // "Return a <delim-token> with its value set to the current input code point."
                    CssToken::Delim('\\')
                }
            }

            // "U+005D RIGHT SQUARE BRACKET (])"
            // "Return a <]-token>."
            ']' => CssToken::RightBracket,

            // "U+007B LEFT CURLY BRACKET ({)"
            // "Return a <{-token>."
            '{' => CssToken::LeftBrace,

            // "U+007D RIGHT CURLY BRACKET (})"
            // "Return a <}-token>."
            '}' => CssToken::RightBrace,

            // "digit"
            // "Reconsume the current input code point. Consume a numeric token and return it."
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "ident-start code point"
            // "Reconsume the current input code point. Consume an ident-like token and return it."
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            // "Return a <delim-token> with its value set to the current input code point."
            c => CssToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// "If the next two input code points are U+002F SOLIDUS (/) followed by
    /// U+002A ASTERISK (*), consume them and all following code points up to
    /// and including the first U+002A ASTERISK (*) followed by U+002F SOLIDUS (/),
    /// or up to an EOF code point."
    fn consume_comments(&mut self) {
        while self.consume_comment().is_some() {}
    }

    /// Consume one comment, if the input starts with one, and return it as a token.
    fn consume_comment(&mut self) -> Option<CssToken> {
        if self.peek() != Some('/') || self.peek_at(1) != Some('*') {
            return None;
        }
        let _ = self.consume(); // /
        let _ = self.consume(); // *

        let mut text = String::new();
        loop {
            match self.consume() {
                Some('*') if self.peek() == Some('/') => {
                    let _ = self.consume(); // /
                    break;
                }
                Some(c) => text.push(c),
                // "If the preceding paragraph ended by consuming an EOF code point,
                // this is a parse error."
                None => {
                    self.error(CssTokenizerError::EofInComment);
                    break;
                }
            }
        }
        Some(CssToken::Comment(text))
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> CssToken {
        // "Initially create a <string-token> with its value set to the empty string."
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point"
                // "Return the <string-token>."
                Some(c) if c == ending_code_point => {
                    return CssToken::String(value);
                }

                // "EOF"
                // "This is a parse error. Return the <string-token>."
                None => {
                    self.error(CssTokenizerError::EofInString);
                    return CssToken::String(value);
                }

                // "newline"
                // "This is a parse error. Reconsume the current input code point,
                // create a <bad-string-token>, and return it."
                Some('\n') => {
                    self.error(CssTokenizerError::NewlineInString);
                    self.reconsume();
                    return CssToken::BadString;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    None => {}
                    // "Otherwise, if the next input code point is a newline,
                    // consume it."
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    // "Otherwise, (the stream starts with a valid escape)
                    // consume an escaped code point and append the returned
                    // code point to the <string-token>'s value."
                    Some(_) => {
                        let c = self.consume_escaped_code_point();
                        value.push(c);
                    }
                },

                // "anything else"
                // "Append the current input code point to the <string-token>'s value."
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CssToken {
        // "Consume a number and let number be the result."
        let (value, int_value, numeric_type, signed) = self.consume_number();

        // "If the next 3 input code points would start an ident sequence..."
        if would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2)) {
            // "Create a <dimension-token> with the same value and type flag as number,
            // and a unit set initially to the empty string."
            // "Consume an ident sequence. Set the <dimension-token>'s unit to the
            // returned value."
            let unit = self.consume_ident_sequence();
            CssToken::Dimension {
                value,
                int_value,
                numeric_type,
                unit,
            }
        }
        // "Otherwise, if the next input code point is U+0025 PERCENTAGE SIGN (%)..."
        else if self.peek() == Some('%') {
            let _ = self.consume();
            CssToken::Percentage {
                value,
                int_value,
                numeric_type,
            }
        }
        // "Otherwise, create a <number-token> with the same value and type flag as number,
        // and return it."
        else {
            CssToken::Number {
                value,
                int_value,
                numeric_type,
                signed,
            }
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CssToken {
        // "Consume an ident sequence, and let string be the result."
        let string = self.consume_ident_sequence();

        // "If string's value is an ASCII case-insensitive match for 'url',
        // and the next input code point is U+0028 LEFT PARENTHESIS (()"
        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            let _ = self.consume(); // (

            // "While the next two input code points are whitespace, consume the
            // next input code point."
            while self.peek().is_some_and(is_whitespace)
                && self.peek_at(1).is_some_and(is_whitespace)
            {
                let _ = self.consume();
            }

            // "If the next one or two input code points are U+0022 QUOTATION MARK,
            // U+0027 APOSTROPHE, or whitespace followed by U+0022 QUOTATION MARK or
            // U+0027 APOSTROPHE..."
            let quoted = match self.peek() {
                Some('"' | '\'') => true,
                Some(c) if is_whitespace(c) => matches!(self.peek_at(1), Some('"' | '\'')),
                _ => false,
            };
            if quoted {
                // "return a <function-token> with its value set to string"
                CssToken::Function(string)
            } else {
                // "Otherwise, consume a url token, and return it."
                self.consume_url_token()
            }
        }
        // "Otherwise, if the next input code point is U+0028 LEFT PARENTHESIS (()"
        else if self.peek() == Some('(') {
            let _ = self.consume();
            // "Return a <function-token> with its value set to string."
            CssToken::Function(string)
        }
        // "Otherwise, return an <ident-token> with its value set to string."
        else {
            CssToken::Ident(string)
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CssToken {
        // "Initially create a <url-token> with its value set to the empty string."
        let mut value = String::new();

        // "Consume as much whitespace as possible."
        self.consume_whitespace();

        loop {
            match self.consume() {
                // "U+0029 RIGHT PARENTHESIS ())"
                // "Return the <url-token>."
                Some(')') => return CssToken::Url(value),

                // "EOF"
                // "This is a parse error. Return the <url-token>."
                None => {
                    self.error(CssTokenizerError::EofInUrl);
                    return CssToken::Url(value);
                }

                // "whitespace"
                Some(c) if is_whitespace(c) => {
                    // "Consume as much whitespace as possible."
                    self.consume_whitespace();
                    match self.peek() {
                        // "If the next input code point is U+0029 RIGHT PARENTHESIS ())
                        // or EOF, consume it and return the <url-token>"
                        Some(')') => {
                            let _ = self.consume();
                            return CssToken::Url(value);
                        }
                        None => {
                            self.error(CssTokenizerError::EofInUrl);
                            return CssToken::Url(value);
                        }
                        // "otherwise, consume the remnants of a bad url, create a
                        // <bad-url-token>, and return it."
                        _ => {
                            self.error(CssTokenizerError::BadUrl);
                            self.consume_bad_url_remnants();
                            return CssToken::BadUrl;
                        }
                    }
                }

                // "U+0022 QUOTATION MARK (")", U+0027 APOSTROPHE ('), U+0028 LEFT PARENTHESIS (()
                // or non-printable code point"
                // "This is a parse error. Consume the remnants of a bad url, create a
                // <bad-url-token>, and return it."
                Some(c) if matches!(c, '"' | '\'' | '(') || is_non_printable(c) => {
                    self.error(CssTokenizerError::BadUrl);
                    self.consume_bad_url_remnants();
                    return CssToken::BadUrl;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => {
                    // "If the stream starts with a valid escape, consume an escaped
                    // code point and append the returned code point to the
                    // <url-token>'s value."
                    if is_valid_escape(Some('\\'), self.peek()) {
                        let c = self.consume_escaped_code_point();
                        value.push(c);
                    } else {
                        // "Otherwise, this is a parse error."
                        self.error(CssTokenizerError::BadUrl);
                        self.consume_bad_url_remnants();
                        return CssToken::BadUrl;
                    }
                }

                // "anything else"
                // "Append the current input code point to the <url-token>'s value."
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        let _ = self.consume_escaped_code_point();
                    }
                }
                _ => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        // "Let result initially be an empty string."
        let mut result = String::new();

        loop {
            match self.consume() {
                // "ident code point"
                // "Append the code point to result."
                Some(c) if is_ident_code_point(c) => result.push(c),

                // "the stream starts with a valid escape"
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    // "Consume an escaped code point. Append the returned code point to result."
                    let c = self.consume_escaped_code_point();
                    result.push(c);
                }

                // "anything else"
                // "Reconsume the current input code point. Return result."
                Some(_) => {
                    self.reconsume();
                    return result;
                }

                None => return result,
            }
        }
    }

    /// Consume ASCII digits into `repr`.
    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            let _ = self.consume();
            repr.push(c);
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> (f64, Option<i64>, NumericType, bool) {
        // "Initially set type to 'integer'. Let repr be the empty string."
        let mut numeric_type = NumericType::Integer;
        let mut repr = String::new();
        let mut signed = false;

        // "If the next input code point is U+002B PLUS SIGN (+) or U+002D HYPHEN-MINUS (-),
        // consume it and append it to repr."
        if let Some(sign @ ('+' | '-')) = self.peek() {
            let _ = self.consume();
            repr.push(sign);
            signed = true;
        }

        // "While the next input code point is a digit, consume it and append it to repr."
        self.consume_digits(&mut repr);

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            // "Consume them. Append them to repr. Set type to 'number'."
            let _ = self.consume();
            repr.push('.');
            numeric_type = NumericType::Number;

            // "While the next input code point is a digit, consume it and append it to repr."
            self.consume_digits(&mut repr);
        }

        // "If the next 2 or 3 input code points are U+0045 LATIN CAPITAL LETTER E (E)
        // or U+0065 LATIN SMALL LETTER E (e), optionally followed by U+002D HYPHEN-MINUS (-)
        // or U+002B PLUS SIGN (+), followed by a digit..."
        if let Some(e @ ('e' | 'E')) = self.peek() {
            let sign = self.peek_at(1).filter(|c| matches!(c, '+' | '-'));
            let digit_pos = if sign.is_some() { 2 } else { 1 };

            if self.peek_at(digit_pos).is_some_and(|c| c.is_ascii_digit()) {
                let _ = self.consume();
                repr.push(e);
                if let Some(sign) = sign {
                    let _ = self.consume();
                    repr.push(sign);
                }
                numeric_type = NumericType::Number;
                self.consume_digits(&mut repr);
            }
        }

        // "Convert repr to a number, and set the value to the returned value."
        // Out-of-range values clamp to the largest finite magnitude.
        let value = repr
            .parse::<f64>()
            .map_or(0.0, |v| v.clamp(-f64::MAX, f64::MAX));
        let int_value = if numeric_type == NumericType::Integer {
            repr.parse().ok()
        } else {
            None
        };

        (value, int_value, numeric_type, signed)
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            // "hex digit"
            Some(c) if c.is_ascii_hexdigit() => {
                let mut code_point = c.to_digit(16).unwrap_or(0);
                // "Consume as many hex digits as possible, but no more than 5."
                for _ in 0..5 {
                    let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) else {
                        break;
                    };
                    let _ = self.consume();
                    code_point = code_point * 16 + digit;
                }
                // "If the next input code point is whitespace, consume it."
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                // "If this number is zero, or is for a surrogate, or is greater than the
                // maximum allowed code point, return U+FFFD REPLACEMENT CHARACTER."
                if code_point == 0 {
                    '\u{FFFD}'
                } else {
                    char::from_u32(code_point).unwrap_or('\u{FFFD}')
                }
            }
            // "EOF"
            // "This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => {
                self.error(CssTokenizerError::EofInEscape);
                '\u{FFFD}'
            }
            // "anything else"
            // "Return the current input code point."
            Some(c) => c,
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    /// Put back the last consumed character.
    const fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position. Looking past
    /// the received input marks the current token as starved.
    fn peek_at(&self, offset: usize) -> Option<char> {
        let c = self.input.get(self.position + offset).copied();
        if c.is_none() {
            self.starved.set(true);
        }
        c
    }
}

/// Tokenize a complete stylesheet, dropping comments.
#[must_use]
pub fn tokenize(input: &str) -> Vec<CssToken> {
    let mut tokenizer = CssTokenizer::new(input);
    // Whole-input tokenizing only fails on allocation; keep what was produced.
    let _ = tokenizer.run();
    tokenizer.into_tokens()
}

/// Tokenize a complete stylesheet and keep each token's source span.
#[must_use]
pub fn tokenize_with_spans(input: &str) -> (Vec<CssToken>, Vec<Span>) {
    let mut tokenizer = CssTokenizer::new(input);
    let _ = tokenizer.run();
    tokenizer.into_parts()
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    // "If the first code point is not U+005C REVERSE SOLIDUS (\), return false."
    // "Otherwise, if the second code point is a newline, return false."
    // "Otherwise, return true."
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn would_start_ident_sequence(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        // "U+002D HYPHEN-MINUS"
        // "If the second code point is an ident-start code point or a U+002D HYPHEN-MINUS,
        // or the second and third code points are a valid escape, return true."
        Some('-') => {
            second.is_some_and(is_ident_start_code_point)
                || second == Some('-')
                || is_valid_escape(second, third)
        }
        // "ident-start code point"
        Some(c) if is_ident_start_code_point(c) => true,
        // "U+005C REVERSE SOLIDUS (\)"
        Some('\\') => is_valid_escape(first, second),
        // "anything else"
        _ => false,
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn would_start_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        // "U+002B PLUS SIGN (+)" or "U+002D HYPHEN-MINUS (-)"
        // "If the second code point is a digit, return true. Otherwise, if the
        // second code point is a U+002E FULL STOP (.) and the third code point
        // is a digit, return true."
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        // "U+002E FULL STOP (.)"
        Some('.') => is_digit(second),
        // "digit"
        c => is_digit(c),
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 Definitions - non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
const fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{E}'..='\u{1F}' | '\u{7F}')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_would_start_ident_sequence() {
        assert!(would_start_ident_sequence(Some('-'), Some('-'), None));
        assert!(would_start_ident_sequence(Some('-'), Some('a'), None));
        assert!(would_start_ident_sequence(Some('-'), Some('\\'), Some('x')));
        assert!(!would_start_ident_sequence(Some('-'), Some('1'), None));
        assert!(!would_start_ident_sequence(Some('\\'), Some('\n'), None));
    }

    #[test]
    fn test_would_start_number() {
        assert!(would_start_number(Some('+'), Some('.'), Some('5')));
        assert!(!would_start_number(Some('+'), Some('.'), Some('a')));
        assert!(would_start_number(Some('.'), Some('5'), None));
        assert!(would_start_number(Some('7'), None, None));
    }

    #[test]
    fn test_starved_token_waits_for_more_input() {
        let mut tokenizer = CssTokenizer::streaming(CssTokenizerOptions::default());
        tokenizer.feed("colo").unwrap();
        assert!(tokenizer.tokens().is_empty());
        tokenizer.feed("r: re").unwrap();
        assert_eq!(
            tokenizer.tokens(),
            &[CssToken::ident("color"), CssToken::Colon, CssToken::Whitespace]
        );
        tokenizer.end().unwrap();
        assert_eq!(tokenizer.tokens()[3], CssToken::ident("re"));
        assert!(tokenizer.tokens()[4].is_eof());
    }

    #[test]
    fn test_comment_end_split_across_chunks() {
        let options = CssTokenizerOptions::default().with_comments(true);
        let mut tokenizer = CssTokenizer::streaming(options);
        tokenizer.feed("/* a / b *").unwrap();
        assert!(tokenizer.tokens().is_empty());
        assert_eq!(tokenizer.wait.map(|wait| wait.kind), Some(Pending::Comment));

        tokenizer.feed("/;").unwrap();
        assert_eq!(
            tokenizer.tokens(),
            &[CssToken::Comment(" a / b ".to_string()), CssToken::Semicolon]
        );
    }

    #[test]
    fn test_pending_kind() {
        let kind = |input: &str| {
            let tokenizer = CssTokenizer::new(input);
            tokenizer.pending_kind()
        };
        assert_eq!(kind("/* x"), Pending::Comment);
        assert_eq!(kind("'x"), Pending::String('\''));
        assert_eq!(kind("URL(x"), Pending::Url);
        assert_eq!(kind("#abc"), Pending::Name);
        assert_eq!(kind("12"), Pending::Name);
        assert_eq!(kind("  "), Pending::Whitespace);
        assert_eq!(kind("<!-"), Pending::Other);
    }

    #[test]
    fn test_rewound_token_does_not_repeat_errors() {
        let mut tokenizer = CssTokenizer::streaming(CssTokenizerOptions::default());
        tokenizer.feed("\"ab").unwrap();
        tokenizer.feed("c").unwrap();
        tokenizer.end().unwrap();
        let codes: Vec<_> = tokenizer.errors().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![CssTokenizerError::EofInString]);
    }
}
