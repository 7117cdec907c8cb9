//! HTML tokenizer.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard as a resumable state machine.
//!
//! Input may arrive in chunks of any size. All state lives in the
//! [`Tokenizer`] value, so a chunk boundary can fall anywhere (inside a tag
//! name, a character reference, `<!DOCTYPE` ...) and the resulting tokens
//! and parse errors are the same as for the whole input at once.
//!
//! ```
//! use weft_html::tokenizer::{Token, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new(Vec::new());
//! for chunk in ["<ti", "tle>HTML chun", "ks parsing</", "title>"] {
//!     tokenizer.feed_str(chunk)?;
//! }
//! tokenizer.end()?;
//! let tokens = tokenizer.into_sink();
//! assert!(matches!(&tokens[1], Token::Text(text) if text.data == "HTML chunks parsing"));
//! # Ok::<(), weft_common::Status>(())
//! ```

mod character_reference;
mod comment;
mod data;
mod doctype;
/// Tokenizer parse error codes.
pub mod error;
mod helpers;
/// Input buffer chain.
pub mod input;
mod named_character_references;
/// Token consumer trait.
pub mod sink;
/// Tokenizer states.
pub mod state;
mod tag;
/// Token types produced by the tokenizer.
pub mod token;

pub use error::TokenizerError;
pub use input::InputChain;
pub use sink::{TokenSink, TokenSinkResult};
pub use state::TokenizerState;
pub use token::{Attribute, Doctype, Tag, Text, TextKind, Token};

use log::trace;
use weft_common::{ParseError, ParseErrors, Result, Span, Status};
use weft_encoding::{Decoder, Encoding};

/// Tokenizer configuration.
#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    /// State to start in. Tokenizer tests start in RCDATA, RAWTEXT and so
    /// on; documents start in the data state.
    pub initial_state: TokenizerState,
    /// Name of the last start tag, as if it had been emitted before the
    /// input began. Needed together with `initial_state` to recognize an
    /// "appropriate end tag token".
    pub last_start_tag: Option<String>,
    /// Keep every input chunk for the whole session so that
    /// [`Tokenizer::source_text`] works for any emitted span. Otherwise
    /// chunks are released once the tokenizer has moved past them.
    pub keep_text_spans: bool,
    /// Encoding used by [`Tokenizer::feed_bytes`].
    pub encoding: Encoding,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            initial_state: TokenizerState::Data,
            last_start_tag: None,
            keep_text_spans: false,
            encoding: Encoding::Utf8,
        }
    }
}

impl TokenizerOptions {
    /// Start in `state`.
    #[must_use]
    pub fn with_initial_state(mut self, state: TokenizerState) -> Self {
        self.initial_state = state;
        self
    }

    /// Pretend `name` was the last start tag emitted.
    #[must_use]
    pub fn with_last_start_tag(mut self, name: &str) -> Self {
        self.last_start_tag = Some(name.to_ascii_lowercase());
        self
    }

    /// Keep all input for [`Tokenizer::source_text`].
    #[must_use]
    pub const fn with_text_spans(mut self, keep: bool) -> Self {
        self.keep_text_spans = keep;
        self
    }

    /// Decode bytes with `encoding`.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TagKind {
    #[default]
    Start,
    End,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// Tokens are delivered to the sink `S` as soon as they are complete,
/// except character tokens, which are gathered into one [`Text`] run until
/// the next non-character token or the end of input.
pub struct Tokenizer<S> {
    sink: S,
    options: TokenizerOptions,
    input: InputChain,
    decoder: Option<Decoder>,

    /// Position of the next input character.
    pos: usize,
    /// Positions below this have been checked for control and
    /// noncharacter code points.
    checked: usize,

    state: TokenizerState,
    /// "the return state", used by the character reference states.
    return_state: TokenizerState,
    /// "The current input character is the last character to have been consumed."
    /// `None` is EOF.
    current_input_character: Option<char>,
    // When true, the next iteration of the main loop will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    /// A state ran out of input and must be re-entered once more arrives.
    suspended: bool,
    /// [`Tokenizer::end`] was called.
    at_eof: bool,
    /// The end-of-file token has been emitted.
    finished: bool,
    /// A sink error or stop request. Sticky until [`Tokenizer::begin`].
    halted: Option<Status>,

    tag_kind: TagKind,
    /// "the current tag token"
    tag: Tag,
    /// The attribute being built; it joins `tag.attributes` when complete.
    attribute: Option<Attribute>,
    /// The attribute being built repeats an earlier name and will be dropped.
    attribute_is_duplicate: bool,
    /// "the current comment token"
    comment: String,
    /// "the current DOCTYPE token"
    doctype: Doctype,
    /// Where the tag, comment or DOCTYPE being built started.
    token_start: usize,
    /// Pending character tokens.
    text: Text,
    /// End of the last token delivered; the next text run starts here.
    last_emit_end: usize,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    temporary_buffer: String,
    /// "the character reference code"
    character_reference_code: u32,

    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    last_start_tag_name: Option<String>,

    errors: ParseErrors<TokenizerError>,
}

impl<S: TokenSink> Tokenizer<S> {
    /// Create a tokenizer with default options.
    ///
    /// "The initial state is the data state."
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, TokenizerOptions::default())
    }

    /// Create a tokenizer with the given options.
    pub fn with_options(sink: S, options: TokenizerOptions) -> Self {
        let mut tokenizer = Self {
            sink,
            input: InputChain::new(),
            decoder: None,
            pos: 0,
            checked: 0,
            state: options.initial_state,
            return_state: TokenizerState::Data,
            current_input_character: None,
            reconsume: false,
            suspended: false,
            at_eof: false,
            finished: false,
            halted: None,
            tag_kind: TagKind::Start,
            tag: Tag::default(),
            attribute: None,
            attribute_is_duplicate: false,
            comment: String::new(),
            doctype: Doctype::default(),
            token_start: 0,
            text: Text::default(),
            last_emit_end: 0,
            temporary_buffer: String::new(),
            character_reference_code: 0,
            last_start_tag_name: options.last_start_tag.clone(),
            errors: ParseErrors::new(),
            options,
        };
        tokenizer.begin();
        tokenizer
    }

    /// Prepare for a new parse: forget all input, partial tokens and
    /// errors, keep the sink and the options.
    pub fn begin(&mut self) {
        self.input.clear();
        self.decoder = None;
        self.pos = 0;
        self.checked = 0;
        self.state = self.options.initial_state;
        self.return_state = TokenizerState::Data;
        self.current_input_character = None;
        self.reconsume = false;
        self.suspended = false;
        self.at_eof = false;
        self.finished = false;
        self.halted = None;
        self.tag = Tag::default();
        self.attribute = None;
        self.attribute_is_duplicate = false;
        self.comment.clear();
        self.doctype = Doctype::default();
        self.token_start = 0;
        self.text = Text::default();
        self.last_emit_end = 0;
        self.temporary_buffer.clear();
        self.character_reference_code = 0;
        self.last_start_tag_name.clone_from(&self.options.last_start_tag);
        self.errors.clear();
    }

    /// Append already-decoded text and tokenize as far as it allows.
    ///
    /// # Errors
    /// [`Status::Failed`] after [`Tokenizer::end`], [`Status::Stopped`]
    /// once the sink asked to stop, [`Status::MemoryAllocation`] if the
    /// chunk cannot be stored, or whatever error the sink returned.
    pub fn feed_str(&mut self, chunk: &str) -> Result<()> {
        self.check_accepting()?;
        self.input.push_str(chunk)?;
        self.run()
    }

    /// Decode `chunk` with the configured encoding, then tokenize.
    ///
    /// A multi-byte sequence split across two calls is decoded once the
    /// second half arrives.
    ///
    /// # Errors
    /// As for [`Tokenizer::feed_str`].
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Result<()> {
        self.check_accepting()?;
        let encoding = self.options.encoding;
        let decoder = self.decoder.get_or_insert_with(|| encoding.new_decoder());
        let mut decoded = String::new();
        Status::reserve_str(&mut decoded, chunk.len())?;
        let _ = decoder.decode_into(chunk, false, &mut decoded);
        self.input.push_str(&decoded)?;
        self.run()
    }

    /// Signal the end of input and tokenize to the end-of-file token.
    ///
    /// # Errors
    /// As for [`Tokenizer::feed_str`].
    pub fn end(&mut self) -> Result<()> {
        self.check_accepting()?;
        if let Some(mut decoder) = self.decoder.take() {
            let mut decoded = String::new();
            let _ = decoder.decode_into(&[], true, &mut decoded);
            self.input.push_str(&decoded)?;
        }
        self.at_eof = true;
        self.run()
    }

    /// The sink tokens were delivered to.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink.
    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Give up the tokenizer and keep the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Parse errors recorded so far, in input order.
    pub fn errors(&self) -> &[ParseError<TokenizerError>] {
        self.errors.as_slice()
    }

    /// The current state.
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Whether the end-of-file token has been emitted.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The input text covered by `span`.
    ///
    /// Returns `None` if that input was already released; construct the
    /// tokenizer with [`TokenizerOptions::with_text_spans`] to keep it.
    pub fn source_text(&self, span: Span) -> Option<String> {
        self.input.text(span)
    }

    fn check_accepting(&self) -> Result<()> {
        if let Some(status) = self.halted {
            return Err(status);
        }
        if self.at_eof {
            return Err(Status::Failed);
        }
        Ok(())
    }

    /// Drive the state machine until it needs more input, emits the
    /// end-of-file token, or the sink halts it.
    fn run(&mut self) -> Result<()> {
        while !self.finished {
            match self.state {
                // These states look ahead or act without consuming a character.
                TokenizerState::MarkupDeclarationOpen => {
                    self.handle_markup_declaration_open_state();
                }
                TokenizerState::NamedCharacterReference => {
                    self.handle_named_character_reference_state();
                }
                TokenizerState::NumericCharacterReferenceEnd => {
                    self.handle_numeric_character_reference_end_state();
                }
                _ => {
                    if !self.consume_next_input_character() {
                        break;
                    }
                    self.dispatch();
                }
            }
            if let Some(status) = self.halted {
                return Err(status);
            }
            if std::mem::take(&mut self.suspended) {
                break;
            }
        }
        if !self.finished {
            trace!(target: "html.tokenizer", "suspended in {} at {}", self.state, self.pos);
        }
        if !self.options.keep_text_spans {
            self.input.release_before(self.pos.saturating_sub(1));
        }
        Ok(())
    }

    fn dispatch(&mut self) {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::Rcdata => self.handle_rcdata_state(),
            TokenizerState::Rawtext => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::Plaintext => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RcdataLessThanSign => self.handle_rcdata_less_than_sign_state(),
            TokenizerState::RcdataEndTagOpen => self.handle_rcdata_end_tag_open_state(),
            TokenizerState::RcdataEndTagName => self.handle_rcdata_end_tag_name_state(),
            TokenizerState::RawtextLessThanSign => self.handle_rawtext_less_than_sign_state(),
            TokenizerState::RawtextEndTagOpen => self.handle_rawtext_end_tag_open_state(),
            TokenizerState::RawtextEndTagName => self.handle_rawtext_end_tag_name_state(),
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state();
            }
            TokenizerState::ScriptDataEndTagOpen => self.handle_script_data_end_tag_open_state(),
            TokenizerState::ScriptDataEndTagName => self.handle_script_data_end_tag_name_state(),
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(),
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_dash_state();
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_script_data_escaped_end_tag_open_state();
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_script_data_escaped_end_tag_name_state();
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_script_data_double_escape_start_state();
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_script_data_double_escape_end_state();
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => {
                self.handle_attribute_value_unquoted_state();
            }
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state();
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state();
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state();
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::Doctype => self.handle_doctype_state(),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDoctypePublicKeyword => {
                self.handle_after_doctype_keyword_state(true);
            }
            TokenizerState::BeforeDoctypePublicIdentifier => {
                self.handle_before_doctype_identifier_state(true);
            }
            TokenizerState::DoctypePublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '"');
            }
            TokenizerState::DoctypePublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '\'');
            }
            TokenizerState::AfterDoctypePublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state();
            }
            TokenizerState::AfterDoctypeSystemKeyword => {
                self.handle_after_doctype_keyword_state(false);
            }
            TokenizerState::BeforeDoctypeSystemIdentifier => {
                self.handle_before_doctype_identifier_state(false);
            }
            TokenizerState::DoctypeSystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '"');
            }
            TokenizerState::DoctypeSystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '\'');
            }
            TokenizerState::AfterDoctypeSystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDoctype => self.handle_bogus_doctype_state(),
            TokenizerState::CdataSection => self.handle_cdata_section_state(),
            TokenizerState::CdataSectionBracket => self.handle_cdata_section_bracket_state(),
            TokenizerState::CdataSectionEnd => self.handle_cdata_section_end_state(),
            TokenizerState::CharacterReference => self.handle_character_reference_state(),
            TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(),
            TokenizerState::NumericCharacterReference => {
                self.handle_numeric_character_reference_state();
            }
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.handle_hexadecimal_character_reference_start_state();
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.handle_decimal_character_reference_start_state();
            }
            TokenizerState::HexadecimalCharacterReference => {
                self.handle_hexadecimal_character_reference_state();
            }
            TokenizerState::DecimalCharacterReference => {
                self.handle_decimal_character_reference_state();
            }
            // Handled in `run` without consuming a character.
            TokenizerState::MarkupDeclarationOpen
            | TokenizerState::NamedCharacterReference
            | TokenizerState::NumericCharacterReferenceEnd => {}
        }
    }
}

/// Tokenize a complete document, returning every token and parse error.
///
/// # Errors
/// Returns [`Status::MemoryAllocation`] if storage cannot be obtained.
pub fn tokenize(input: &str) -> Result<(Vec<Token>, Vec<ParseError<TokenizerError>>)> {
    let mut tokenizer = Tokenizer::new(Vec::new());
    tokenizer.feed_str(input)?;
    tokenizer.end()?;
    let errors = tokenizer.errors().to_vec();
    Ok((tokenizer.into_sink(), errors))
}
