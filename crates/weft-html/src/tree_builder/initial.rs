//! The insertion modes before `<head>`.

use log::debug;
use weft_common::Result;

use super::quirks::{is_bad_doctype, quirks_mode_for};
use super::{InsertionMode, QuirksMode, TreeBuilder, TreeBuilderError, TreeSink, is_all_whitespace};
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE
            // FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020
            // SPACE"
            // "Ignore the token."
            Token::Text(text) if is_all_whitespace(&text.data) => Ok(()),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data, .. } => self.append_comment_to_document(data),

            // "A DOCTYPE token"
            Token::Doctype(doctype) => {
                if is_bad_doctype(doctype) {
                    self.parse_error(TreeBuilderError::BadDoctypeTokenInInitialMode);
                }
                // "Append a DocumentType node to the Document node"
                if !self.options.drop_doctype {
                    self.sink.append_doctype(
                        doctype.name.as_deref().unwrap_or_default(),
                        doctype.public_identifier.as_deref().unwrap_or_default(),
                        doctype.system_identifier.as_deref().unwrap_or_default(),
                    )?;
                }
                let mode = self
                    .options
                    .quirks_mode
                    .unwrap_or_else(|| quirks_mode_for(doctype, self.options.iframe_srcdoc));
                self.set_quirks_mode(mode);
                // "Then, switch the insertion mode to "before html"."
                self.mode = InsertionMode::BeforeHtml;
                Ok(())
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a parse
            // error; if the parser cannot change the mode flag is false, set the
            // Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then reprocess
            // the token."
            _ => {
                if !self.options.iframe_srcdoc {
                    self.parse_error(TreeBuilderError::UnexpectedTokenInInitialMode);
                }
                let mode = self.options.quirks_mode.unwrap_or(if self.options.iframe_srcdoc {
                    QuirksMode::NoQuirks
                } else {
                    QuirksMode::Quirks
                });
                self.set_quirks_mode(mode);
                self.reprocess_in(InsertionMode::BeforeHtml, token)
            }
        }
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        debug!(target: "html.tree", "document mode: {mode}");
        self.quirks_mode = mode;
        self.sink.set_quirks_mode(mode);
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype(_) => {
                self.parse_error(TreeBuilderError::DoctypeTokenInWrongMode);
                Ok(())
            }

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data, .. } => self.append_comment_to_document(data),

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            Token::Text(text) if is_all_whitespace(&text.data) => Ok(()),

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the Document
            // as the intended parent. Append it to the Document object. Put this element
            // in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag(tag) if tag.name == "html" => {
                let _ = self.insert_html_element(tag)?;
                self.mode = InsertionMode::BeforeHead;
                Ok(())
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag(tag) if matches!(tag.name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_html_anything_else(token)
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag(_) => {
                self.parse_error(TreeBuilderError::UnexpectedClosedTokenInBeforeHtmlMode);
                Ok(())
            }

            _ => self.before_html_anything_else(token),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess the
    /// token."
    fn before_html_anything_else(&mut self, token: &Token) -> Result<()> {
        let _ = self.insert_html_element_named("html")?;
        self.reprocess_in(InsertionMode::BeforeHead, token)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(super) fn handle_before_head_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            Token::Text(text) if is_all_whitespace(&text.data) => Ok(()),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data, .. } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype(_) => {
                self.parse_error(TreeBuilderError::DoctypeTokenInWrongMode);
                Ok(())
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag(tag) if tag.name == "html" => {
                self.process_using(InsertionMode::InBody, token)
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag(tag) if tag.name == "head" => {
                let head = self.insert_html_element(tag)?;
                self.head_element = Some(head);
                self.mode = InsertionMode::InHead;
                Ok(())
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag(tag) if matches!(tag.name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_head_anything_else(token)
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag(_) => {
                self.parse_error(TreeBuilderError::UnexpectedClosedTokenInBeforeHeadMode);
                Ok(())
            }

            _ => self.before_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no attributes.
    /// Set the head element pointer to the newly created head element. Switch
    /// the insertion mode to "in head". Reprocess the current token."
    fn before_head_anything_else(&mut self, token: &Token) -> Result<()> {
        let head = self.insert_html_element_named("head")?;
        self.head_element = Some(head);
        self.reprocess_in(InsertionMode::InHead, token)
    }
}
