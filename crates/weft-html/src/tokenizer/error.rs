//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! Tokenizer error codes, spelled as the standard names them.

use strum_macros::{Display, IntoStaticStr};

/// A parse error detected during tokenization or input preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenizerError {
    /// `<!-->` or `<!--->`
    AbruptClosingOfEmptyComment,
    /// `>` inside a DOCTYPE public identifier.
    AbruptDoctypePublicIdentifier,
    /// `>` inside a DOCTYPE system identifier.
    AbruptDoctypeSystemIdentifier,
    /// `&#` or `&#x` not followed by digits.
    AbsenceOfDigitsInNumericCharacterReference,
    /// `<![CDATA[` outside foreign content.
    CdataInHtmlContent,
    /// Numeric reference above U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// Control code point in the input stream.
    ControlCharacterInInputStream,
    /// Numeric reference to a control code point.
    ControlCharacterReference,
    /// Attribute name already present on the tag.
    DuplicateAttribute,
    /// End tag carrying attributes.
    EndTagWithAttributes,
    /// `</br/>`
    EndTagWithTrailingSolidus,
    /// Input ends right after `<` or `</`.
    EofBeforeTagName,
    /// Input ends inside a CDATA section.
    EofInCdata,
    /// Input ends inside a comment.
    EofInComment,
    /// Input ends inside a DOCTYPE.
    EofInDoctype,
    /// Input ends inside `<!--` in script data.
    EofInScriptHtmlCommentLikeText,
    /// Input ends inside a tag.
    EofInTag,
    /// `--!>`
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, `DOCTYPE` or `[CDATA[`.
    IncorrectlyOpenedComment,
    /// Neither `PUBLIC` nor `SYSTEM` after the DOCTYPE name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by something that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `name=` directly followed by `>`.
    MissingAttributeValue,
    /// `<!DOCTYPE>`
    MissingDoctypeName,
    /// `PUBLIC` with no identifier.
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` with no identifier.
    MissingDoctypeSystemIdentifier,
    /// `</>`
    MissingEndTagName,
    /// Unquoted DOCTYPE public identifier.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// Unquoted DOCTYPE system identifier.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// Named reference without its `;`.
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"`
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"`
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`
    MissingWhitespaceBeforeDoctypeName,
    /// `a="1"b="2"`
    MissingWhitespaceBetweenAttributes,
    /// Two DOCTYPE identifiers with nothing between them.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment.
    NestedComment,
    /// Numeric reference to a noncharacter.
    NoncharacterCharacterReference,
    /// Noncharacter in the input stream.
    NoncharacterInInputStream,
    /// `&#0;`
    NullCharacterReference,
    /// Numeric reference to a surrogate.
    SurrogateCharacterReference,
    /// Garbage after the DOCTYPE system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `=` where an attribute name should start.
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 where it is not allowed.
    UnexpectedNullCharacter,
    /// `<?`
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` in a tag not followed by `>`.
    UnexpectedSolidusInTag,
    /// `&name;` that is not in the table.
    UnknownNamedCharacterReference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_use_standard_spelling() {
        assert_eq!(TokenizerError::EofInDoctype.to_string(), "eof-in-doctype");
        let code: &'static str = TokenizerError::UnexpectedNullCharacter.into();
        assert_eq!(code, "unexpected-null-character");
        assert_eq!(
            TokenizerError::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers.to_string(),
            "missing-whitespace-between-doctype-public-and-system-identifiers"
        );
    }
}
