//! The frameset insertion modes and the modes after `</body>` and
//! `</html>`.

use weft_common::Result;

use super::{InsertionMode, TreeBuilder, TreeBuilderError, TreeSink, is_all_whitespace, is_whitespace};
use crate::tokenizer::{Text, Token};

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(super) fn handle_after_body_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Text(text) if is_all_whitespace(&text.data) => {
                self.process_using(InsertionMode::InBody, token)
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the stack of
            // open elements (the html element)."
            Token::Comment { data, .. } => self.append_comment_to_html(data),

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

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after body"."
            Token::EndTag(tag) if tag.name == "html" => {
                self.mode = InsertionMode::AfterAfterBody;
                Ok(())
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile { .. } => {
                self.stop_parsing();
                Ok(())
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the
            // token."
            _ => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                self.reprocess_in(InsertionMode::InBody, token)
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(super) fn handle_in_frameset_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            Token::Text(text) => self.insert_frameset_whitespace(text),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data, .. } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype(_) => {
                self.parse_error(TreeBuilderError::DoctypeTokenInWrongMode);
                Ok(())
            }

            Token::StartTag(tag) => match tag.name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.process_using(InsertionMode::InBody, token),

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                "frameset" => {
                    let _ = self.insert_html_element(tag)?;
                    Ok(())
                }

                // "A start tag whose tag name is "frame""
                // "Insert an HTML element for the token. Immediately pop the current node
                // off the stack of open elements."
                "frame" => {
                    let _ = self.insert_html_element(tag)?;
                    let _ = self.pop();
                    Ok(())
                }

                // "A start tag whose tag name is "noframes""
                // "Process the token using the rules for the "in head" insertion mode."
                "noframes" => self.process_using(InsertionMode::InHead, token),

                _ => {
                    self.parse_error(TreeBuilderError::UnexpectedToken);
                    Ok(())
                }
            },

            // "An end tag whose tag name is "frameset""
            Token::EndTag(tag) if tag.name == "frameset" => {
                // "If the current node is the root html element, then this is a parse
                // error; ignore the token. (fragment case)"
                if self.open_elements.len() <= 1 {
                    self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                    return Ok(());
                }
                // "Otherwise, pop the current node from the stack of open elements."
                let _ = self.pop();
                // "If the parser was not created as part of the HTML fragment parsing
                // algorithm (fragment case), and the current node is no longer a
                // frameset element, then switch the insertion mode to "after frameset"."
                if !self.current_node_is("frameset") {
                    self.mode = InsertionMode::AfterFrameset;
                }
                Ok(())
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a parse
            // error."
            // "Stop parsing."
            Token::EndOfFile { .. } => {
                if self.open_elements.len() > 1 {
                    self.parse_error(TreeBuilderError::UnexpectedEndOfFile);
                }
                self.stop_parsing();
                Ok(())
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            Token::EndTag(_) => {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(super) fn handle_after_frameset_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            Token::Text(text) => self.insert_frameset_whitespace(text),

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

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag(tag) if tag.name == "html" => {
                self.mode = InsertionMode::AfterAfterFrameset;
                Ok(())
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag(tag) if tag.name == "noframes" => {
                self.process_using(InsertionMode::InHead, token)
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile { .. } => {
                self.stop_parsing();
                Ok(())
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                Ok(())
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(super) fn handle_after_after_body_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data, .. } => self.append_comment_to_document(data),

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype(_) => self.process_using(InsertionMode::InBody, token),
            Token::Text(text) if is_all_whitespace(&text.data) => {
                self.process_using(InsertionMode::InBody, token)
            }
            Token::StartTag(tag) if tag.name == "html" => {
                self.process_using(InsertionMode::InBody, token)
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile { .. } => {
                self.stop_parsing();
                Ok(())
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the
            // token."
            _ => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                self.reprocess_in(InsertionMode::InBody, token)
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(super) fn handle_after_after_frameset_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data, .. } => self.append_comment_to_document(data),

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype(_) => self.process_using(InsertionMode::InBody, token),
            Token::Text(text) => {
                let whitespace: String = text.data.chars().filter(|&c| is_whitespace(c)).collect();
                if whitespace.len() != text.data.len() {
                    self.parse_error(TreeBuilderError::UnexpectedCharacterToken);
                }
                if whitespace.is_empty() {
                    return Ok(());
                }
                let text = Token::Text(Text {
                    data: whitespace,
                    ..text.clone()
                });
                self.process_using(InsertionMode::InBody, &text)
            }
            Token::StartTag(tag) if tag.name == "html" => {
                self.process_using(InsertionMode::InBody, token)
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile { .. } => {
                self.stop_parsing();
                Ok(())
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag(tag) if tag.name == "noframes" => {
                self.process_using(InsertionMode::InHead, token)
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                Ok(())
            }
        }
    }

    /// "A character token that is one of U+0009 CHARACTER TABULATION, ...":
    /// "Insert the character." Every other character is a parse error and is
    /// ignored.
    fn insert_frameset_whitespace(&mut self, text: &Text) -> Result<()> {
        let whitespace: String = text.data.chars().filter(|&c| is_whitespace(c)).collect();
        if whitespace.len() != text.data.len() {
            self.parse_error(TreeBuilderError::UnexpectedCharacterToken);
        }
        self.insert_text(&whitespace)
    }
}
