//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

use weft_common::Result;

use super::foreign_content::is_breakout_start_tag;
use super::{Namespace, TreeBuilder, TreeBuilderError, TreeSink, is_whitespace};
use crate::tokenizer::{Tag, Token};

impl<S: TreeSink> TreeBuilder<S> {
    pub(super) fn handle_in_foreign_content(&mut self, token: &Token) -> Result<()> {
        match token {
            Token::Text(text) => {
                // "A character token that is U+0000 NULL"
                // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
                let data = if text.has_null {
                    self.parse_error(TreeBuilderError::NullCharacter);
                    text.data.replace('\0', "\u{FFFD}")
                } else {
                    text.data.clone()
                };
                // "Any other character token"
                // "Insert the token's character."
                // "Set the frameset-ok flag to "not ok"." (unless whitespace)
                if text.data.chars().any(|c| c != '\0' && !is_whitespace(c)) {
                    self.frameset_ok = false;
                }
                self.insert_text(&data)
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data, .. } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype(_) => {
                self.parse_error(TreeBuilderError::DoctypeTokenInWrongMode);
                Ok(())
            }

            // "A start tag whose tag name is one of: "b", "big", "blockquote", ..."
            // "An end tag whose tag name is "br", "p""
            Token::StartTag(tag) if is_breakout_start_tag(tag) => self.break_out_of_foreign(token),
            Token::EndTag(tag) if matches!(tag.name.as_str(), "br" | "p") => {
                self.break_out_of_foreign(token)
            }

            Token::StartTag(tag) => self.foreign_start_tag(tag),

            // "An end tag whose tag name is "script", if the current node is an SVG
            // script element"
            // "Pop the current element off the stack of open elements." Scripts are
            // never run.
            Token::EndTag(tag)
                if tag.name == "script"
                    && self.current_node().is_some_and(|current| {
                        current.namespace == Namespace::Svg && current.name == "script"
                    }) =>
            {
                let _ = self.pop();
                Ok(())
            }

            Token::EndTag(tag) => self.foreign_end_tag(tag, token),

            // The dispatcher sends end-of-file to the insertion mode.
            Token::EndOfFile { .. } => self.process_using(self.mode, token),
        }
    }

    /// "Parse error."
    /// "While the current node is not a MathML text integration point, an HTML
    /// integration point, or an element in the HTML namespace, pop elements
    /// from the stack of open elements."
    /// "Reprocess the token according to the rules given in the section
    /// corresponding to the current insertion mode in HTML content."
    fn break_out_of_foreign(&mut self, token: &Token) -> Result<()> {
        self.parse_error(TreeBuilderError::HtmlStartTagInForeignContent);
        while let Some(current) = self.current_node() {
            if current.namespace == Namespace::Html
                || current.html_integration_point
                || current.is_mathml_text_integration_point()
            {
                break;
            }
            let _ = self.pop();
        }
        self.process_using(self.mode, token)
    }

    /// "Any other start tag"
    fn foreign_start_tag(&mut self, tag: &Tag) -> Result<()> {
        // "If the adjusted current node is an element in the MathML namespace, adjust
        // MathML attributes for the token."
        // "If the adjusted current node is an element in the SVG namespace, and the
        // token's tag name is one of the ones in the first column of the following
        // table, change the tag name to the name given in the corresponding cell in the
        // second column."
        // "If the adjusted current node is an element in the SVG namespace, adjust SVG
        // attributes for the token."
        // "Adjust foreign attributes for the token."
        // "Insert a foreign element for the token, with adjusted current node's
        // namespace and false."
        let namespace = self
            .current_node()
            .map_or(Namespace::Html, |current| current.namespace);
        // "If the token has its self-closing flag set, then run the appropriate steps
        // from the following list": pop the current node off the stack of open
        // elements and acknowledge the token's self-closing flag.
        self.insert_foreign_start_tag(tag, namespace)
    }

    /// "Any other end tag"
    fn foreign_end_tag(&mut self, tag: &Tag, token: &Token) -> Result<()> {
        let Some(mut index) = self.open_elements.len().checked_sub(1) else {
            return Ok(());
        };
        // STEP 1: "Initialize node to be the current node (the bottommost node of the
        // stack)."
        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the same as
        // the tag name of the token, then this is a parse error."
        if !self.open_elements[index].name.eq_ignore_ascii_case(&tag.name) {
            self.parse_error(TreeBuilderError::UnexpectedClosedToken);
        }
        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of open
            // elements, then return. (fragment case)"
            if index == 0 {
                return Ok(());
            }
            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the same as
            // the tag name of the token, pop elements from the stack of open elements
            // until node has been popped from the stack, and then return."
            if self.open_elements[index].name.eq_ignore_ascii_case(&tag.name) {
                self.open_elements.truncate(index);
                return Ok(());
            }
            // STEP 5: "Set node to the previous entry in the stack of open elements."
            index -= 1;
            // STEP 6: "If node is not an element in the HTML namespace, return to the
            // step labeled loop."
            // STEP 7: "Otherwise, process the token according to the rules given in the
            // section corresponding to the current insertion mode in HTML content."
            if self.open_elements[index].namespace == Namespace::Html {
                return self.process_using(self.mode, token);
            }
        }
    }
}
