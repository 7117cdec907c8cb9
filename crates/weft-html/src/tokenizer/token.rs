//! Tokens produced by the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "The output of the tokenization step is a series of zero or more of the
//! following tokens: DOCTYPE, start tag, end tag, comment, character,
//! end-of-file."
//!
//! Consecutive character tokens are delivered as one [`Text`] run. A run
//! never spans a tag, comment or DOCTYPE, so the tree builder sees the same
//! boundaries it would see with single characters.

use weft_common::{Result, Span, Write};

/// An attribute on a start or end tag token.
///
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
    /// Where the name appeared in the input.
    pub name_span: Span,
    /// Where the value appeared in the input, quotes excluded. Empty when
    /// the attribute had no value.
    pub value_span: Span,
}

impl Attribute {
    /// Create an attribute with no source position, as the tree builder
    /// does for synthetic tags.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            name_span: Span::default(),
            value_span: Span::default(),
        }
    }
}

/// "Start and end tag tokens have a tag name, a self-closing flag, and a
/// list of attributes."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// "a tag name", ASCII-lowercased by the tokenizer.
    pub name: String,
    /// "a self-closing flag"
    pub self_closing: bool,
    /// "a list of attributes"
    pub attributes: Vec<Attribute>,
    /// From the `<` to one past the `>`.
    pub span: Span,
}

impl Tag {
    /// A synthetic tag with the given name and no attributes.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Value of the attribute called `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// "DOCTYPE tokens have a name, a public identifier, a system identifier,
/// and a force-quirks flag. When a DOCTYPE token is created, its name,
/// public identifier, and system identifier must be marked as missing
/// (which is a distinct state from the empty string), and the force-quirks
/// flag must be set to off (its other state is on)."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    /// "a name"
    pub name: Option<String>,
    /// "a public identifier"
    pub public_identifier: Option<String>,
    /// "a system identifier"
    pub system_identifier: Option<String>,
    /// "a force-quirks flag"
    pub force_quirks: bool,
    /// From the `<!` to one past the `>`.
    pub span: Span,
}

/// Which tokenizer state produced a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TextKind {
    /// Data state, character references resolved.
    #[default]
    Data,
    /// RCDATA state (`<title>`, `<textarea>`), character references resolved.
    Rcdata,
    /// RAWTEXT state (`<style>`, `<xmp>`, ...), verbatim.
    Rawtext,
    /// Script data states, verbatim.
    ScriptData,
    /// PLAINTEXT state, verbatim to the end of input.
    Plaintext,
    /// Inside `<![CDATA[ ... ]]>` in foreign content.
    Cdata,
}

/// A run of character tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    /// The characters, after character reference resolution.
    pub data: String,
    /// The state the characters were emitted from.
    pub kind: TextKind,
    /// Whether `data` contains U+0000, which only the data and CDATA
    /// states pass through unchanged.
    pub has_null: bool,
    /// Source range the run was produced from.
    pub span: Span,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer emits tokens of these types to the tree construction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// DOCTYPE token.
    Doctype(Doctype),
    /// Start tag token.
    StartTag(Tag),
    /// End tag token. Attributes are kept so consumers can report them,
    /// but they carry no meaning.
    EndTag(Tag),
    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
        /// From the `<!` to one past the closing `>`.
        span: Span,
    },
    /// Consecutive character tokens.
    Text(Text),
    /// End-of-file token.
    EndOfFile {
        /// Number of code points in the whole input.
        position: usize,
    },
}

impl Token {
    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile { .. })
    }

    /// Source range of the token.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Doctype(doctype) => doctype.span,
            Self::StartTag(tag) | Self::EndTag(tag) => tag.span,
            Self::Comment { span, .. } => *span,
            Self::Text(text) => text.span,
            Self::EndOfFile { position } => Span::empty(*position),
        }
    }

    /// Write the token back out as markup.
    ///
    /// The output is normalized: names are lowercase, attribute values are
    /// double-quoted and text is escaped only where the result would
    /// otherwise tokenize differently.
    ///
    /// # Errors
    /// Propagates the first error returned by `out`.
    pub fn serialize(&self, out: &mut dyn Write) -> Result<()> {
        match self {
            Self::Doctype(doctype) => {
                out.write("<!DOCTYPE")?;
                if let Some(name) = &doctype.name {
                    out.write(" ")?;
                    out.write(name)?;
                }
                match (&doctype.public_identifier, &doctype.system_identifier) {
                    (Some(public), Some(system)) => {
                        write_quoted(out, " PUBLIC ", public)?;
                        write_quoted(out, " ", system)?;
                    }
                    (Some(public), None) => write_quoted(out, " PUBLIC ", public)?,
                    (None, Some(system)) => write_quoted(out, " SYSTEM ", system)?,
                    (None, None) => {}
                }
                out.write(">")
            }
            Self::StartTag(tag) => {
                out.write("<")?;
                out.write(&tag.name)?;
                for attr in &tag.attributes {
                    out.write(" ")?;
                    out.write(&attr.name)?;
                    if !attr.value.is_empty() {
                        out.write("=\"")?;
                        write_escaped(out, &attr.value, true)?;
                        out.write("\"")?;
                    }
                }
                out.write(if tag.self_closing { "/>" } else { ">" })
            }
            Self::EndTag(tag) => {
                out.write("</")?;
                out.write(&tag.name)?;
                out.write(">")
            }
            Self::Comment { data, .. } => {
                out.write("<!--")?;
                out.write(data)?;
                out.write("-->")
            }
            Self::Text(text) => match text.kind {
                TextKind::Data | TextKind::Rcdata => write_escaped(out, &text.data, false),
                TextKind::Cdata => {
                    out.write("<![CDATA[")?;
                    out.write(&text.data)?;
                    out.write("]]>")
                }
                TextKind::Rawtext | TextKind::ScriptData | TextKind::Plaintext => {
                    out.write(&text.data)
                }
            },
            Self::EndOfFile { .. } => Ok(()),
        }
    }
}

fn write_quoted(out: &mut dyn Write, prefix: &str, value: &str) -> Result<()> {
    out.write(prefix)?;
    let quote = if value.contains('"') { "'" } else { "\"" };
    out.write(quote)?;
    out.write(value)?;
    out.write(quote)
}

/// [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;".
/// Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;". If the algorithm was invoked in attribute mode, replace
/// any occurrences of the """ character by the string "&quot;". If the
/// algorithm was not invoked in attribute mode, replace any occurrences of
/// the "<" character by the string "&lt;", and any occurrences of the ">"
/// character by the string "&gt;"."
pub(crate) fn write_escaped(out: &mut dyn Write, text: &str, attribute_mode: bool) -> Result<()> {
    let mut last = 0;
    for (index, c) in text.char_indices() {
        let replacement = match c {
            '&' => "&amp;",
            '\u{A0}' => "&nbsp;",
            '"' if attribute_mode => "&quot;",
            '<' if !attribute_mode => "&lt;",
            '>' if !attribute_mode => "&gt;",
            _ => continue,
        };
        out.write(&text[last..index])?;
        out.write(replacement)?;
        last = index + c.len_utf8();
    }
    out.write(&text[last..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::to_string_with;

    #[test]
    fn test_start_tag_serializes_normalized() {
        let mut tag = Tag::named("a");
        tag.attributes.push(Attribute::new("href", "x?a=1&b=\"2\""));
        tag.attributes.push(Attribute::new("hidden", ""));
        let text = to_string_with(|w| Token::StartTag(tag).serialize(w));
        assert_eq!(
            text.as_deref(),
            Ok("<a href=\"x?a=1&amp;b=&quot;2&quot;\" hidden>")
        );
    }

    #[test]
    fn test_text_escaping_depends_on_kind() {
        let data = Token::Text(Text {
            data: "a < b & c".to_string(),
            ..Text::default()
        });
        let script = Token::Text(Text {
            data: "a < b & c".to_string(),
            kind: TextKind::ScriptData,
            ..Text::default()
        });
        assert_eq!(
            to_string_with(|w| data.serialize(w)).as_deref(),
            Ok("a &lt; b &amp; c")
        );
        assert_eq!(
            to_string_with(|w| script.serialize(w)).as_deref(),
            Ok("a < b & c")
        );
    }

    #[test]
    fn test_doctype_serialization() {
        let doctype = Token::Doctype(Doctype {
            name: Some("html".to_string()),
            public_identifier: Some("-//W3C//DTD HTML 4.01//EN".to_string()),
            system_identifier: None,
            ..Doctype::default()
        });
        assert_eq!(
            to_string_with(|w| doctype.serialize(w)).as_deref(),
            Ok("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\">")
        );
    }
}
