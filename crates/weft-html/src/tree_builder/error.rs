//! Tree-construction parse errors.
//!
//! The standard names tokenizer errors but leaves tree-construction errors
//! as plain "parse error". These codes say which rule fired.

use strum_macros::{Display, IntoStaticStr};

/// A parse error detected during tree construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TreeBuilderError {
    /// A token the current insertion mode does not accept.
    UnexpectedToken,
    /// An end tag the current insertion mode does not accept.
    UnexpectedClosedToken,
    /// Characters where only whitespace is allowed.
    UnexpectedCharacterToken,
    /// U+0000 in character data.
    NullCharacter,
    /// No DOCTYPE before the first real token.
    UnexpectedTokenInInitialMode,
    /// A DOCTYPE that is not `<!DOCTYPE html>` or a known legacy form.
    BadDoctypeTokenInInitialMode,
    /// A DOCTYPE after the initial insertion mode.
    DoctypeTokenInWrongMode,
    /// `</x>` before `<html>` where x is not head, body, html or br.
    UnexpectedClosedTokenInBeforeHtmlMode,
    /// `</x>` before `<head>` where x is not head, body, html or br.
    UnexpectedClosedTokenInBeforeHeadMode,
    /// Unexpected end tag in the "in head" insertion mode.
    UnexpectedClosedTokenInHeadMode,
    /// A second `<head>`.
    HeadTokenInHeadMode,
    /// `<head>` after the head element was closed.
    HeadTokenAfterHeadMode,
    /// `</template>` with no open template.
    TemplateClosedTokenWithoutOpening,
    /// `</template>` while the current node is another element.
    TemplateElementIsNotCurrent,
    /// `<div/>` and friends: the solidus is ignored on non-void elements.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// Input ended with elements that need an end tag still open.
    UnexpectedEndOfFile,
    /// An end tag whose element is not open.
    MissingElementInOpenElementsStack,
    /// An end tag whose element is open but not in scope.
    MissingElementInScope,
    /// Closing an element while the current node is a different one.
    UnexpectedElementInOpenElementsStack,
    /// An element open at `</body>` or `</html>` that should have been closed.
    OpenElementsIsWrong,
    /// `</body>` or `</html>` with no body element in scope.
    NoBodyElementInScope,
    /// A nested `<select>` or `<input>` inside `<select>`.
    SelectInScope,
    /// A formatting element that is open but not in the list of active
    /// formatting elements, or the reverse.
    UnexpectedElementInActiveFormattingStack,
    /// Non-whitespace text in a table, moved in front of it.
    CharacterInTableText,
    /// `<frameset>` after content that rules it out.
    FramesetNotAllowed,
    /// `<form>` while a form element is already open.
    NestedForm,
    /// `<a>` while another `a` is active; the adoption agency closes it.
    NestedAnchor,
    /// `<nobr>` while another `nobr` is in scope.
    NestedNobr,
    /// `<button>` while another `button` is in scope.
    NestedButton,
    /// `<image>` is treated as `<img>`.
    ImageTagRenamed,
    /// A start tag that breaks out of foreign content.
    HtmlStartTagInForeignContent,
    /// `</br>` is treated as `<br>`.
    EndTagBr,
    /// `</p>` with no p element in button scope.
    EndTagPWithoutP,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_kebab_case() {
        assert_eq!(
            TreeBuilderError::UnexpectedTokenInInitialMode.to_string(),
            "unexpected-token-in-initial-mode"
        );
        let code: &'static str = TreeBuilderError::CharacterInTableText.into();
        assert_eq!(code, "character-in-table-text");
    }
}
