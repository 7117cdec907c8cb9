//! The "in head", "in head noscript", "after head" and "text" insertion modes.

use weft_common::Result;

use super::{
    InsertionMode, Namespace, OpenElement, TreeBuilder, TreeBuilderError, TreeSink,
    is_all_whitespace,
};
use crate::tokenizer::{Tag, Token, TokenizerState};

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Text(text) if is_all_whitespace(&text.data) => self.insert_text(&text.data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data, .. } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype(_) => {
                self.parse_error(TreeBuilderError::DoctypeTokenInWrongMode);
                Ok(())
            }

            Token::StartTag(tag) => self.in_head_start_tag(tag, token),

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the stack of
            // open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag(tag) if tag.name == "head" => {
                let _ = self.pop();
                self.mode = InsertionMode::AfterHead;
                Ok(())
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag(tag) if matches!(tag.name.as_str(), "body" | "html" | "br") => {
                self.in_head_anything_else(token)
            }

            // "An end tag whose tag name is "template""
            Token::EndTag(tag) if tag.name == "template" => {
                self.close_template();
                Ok(())
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag(_) => {
                self.parse_error(TreeBuilderError::UnexpectedClosedTokenInHeadMode);
                Ok(())
            }

            _ => self.in_head_anything_else(token),
        }
    }

    fn in_head_start_tag(&mut self, tag: &Tag, token: &Token) -> Result<()> {
        match tag.name.as_str() {
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            "html" => self.process_using(InsertionMode::InBody, token),

            // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the current node off
            // the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "A start tag whose tag name is "meta"" does the same; the charset is
            // already decided by then.
            "base" | "basefont" | "bgsound" | "link" | "meta" => {
                let _ = self.insert_html_element(tag)?;
                let _ = self.pop();
                Ok(())
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            "title" => self.parse_text_element(tag, TokenizerState::Rcdata),

            // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            "noscript" if self.options.scripting => {
                self.parse_text_element(tag, TokenizerState::Rawtext)
            }
            "noframes" | "style" => self.parse_text_element(tag, TokenizerState::Rawtext),

            // "A start tag whose tag name is "noscript", if the scripting flag is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            "noscript" => {
                let _ = self.insert_html_element(tag)?;
                self.mode = InsertionMode::InHeadNoscript;
                Ok(())
            }

            // "A start tag whose tag name is "script""
            // "Insert the newly created element at the adjusted insertion location."
            // "Push the element onto the stack of open elements so that it is the new
            // current node."
            // "Switch the tokenizer to the script data state."
            // "Let the original insertion mode be the current insertion mode."
            // "Switch the insertion mode to "text"."
            "script" => self.parse_text_element(tag, TokenizerState::ScriptData),

            // "A start tag whose tag name is "template""
            "template" => {
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(tag)?;
                // "Insert a marker at the end of the list of active formatting elements."
                self.push_formatting_marker();
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "Switch the insertion mode to "in template"."
                self.mode = InsertionMode::InTemplate;
                // "Push "in template" onto the stack of template insertion modes so that
                // it is the new current template insertion mode."
                self.template_modes.push(InsertionMode::InTemplate);
                Ok(())
            }

            // "A start tag whose tag name is "head""
            // "Parse error. Ignore the token."
            "head" => {
                self.parse_error(TreeBuilderError::HeadTokenInHeadMode);
                Ok(())
            }

            _ => self.in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self, token: &Token) -> Result<()> {
        let _ = self.pop();
        self.reprocess_in(InsertionMode::AfterHead, token)
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "An end tag whose tag name is "template""
    pub(super) fn close_template(&mut self) {
        // "If there is no template element on the stack of open elements, then this
        // is a parse error; ignore the token."
        if !self.stack_contains("template") {
            self.parse_error(TreeBuilderError::TemplateClosedTokenWithoutOpening);
            return;
        }
        // "Generate all implied end tags thoroughly."
        self.generate_implied_end_tags_thoroughly();
        // "If the current node is not a template element, then this is a parse error."
        if !self.current_node_is("template") {
            self.parse_error(TreeBuilderError::TemplateElementIsNotCurrent);
        }
        // "Pop elements from the stack of open elements until a template element has
        // been popped from the stack."
        self.pop_until_named("template");
        // "Clear the list of active formatting elements up to the last marker."
        self.clear_active_formatting_to_last_marker();
        // "Pop the current template insertion mode off the stack of template
        // insertion modes."
        let _ = self.template_modes.pop();
        // "Reset the insertion mode appropriately."
        self.reset_insertion_mode();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(super) fn handle_in_head_noscript_mode(&mut self, token: &Token) -> Result<()> {
        match token {
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

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the stack of
            // open elements; the new current node will be a head element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag(tag) if tag.name == "noscript" => {
                let _ = self.pop();
                self.mode = InsertionMode::InHead;
                Ok(())
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound", "link",
            // "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Text(text) if is_all_whitespace(&text.data) => {
                self.process_using(InsertionMode::InHead, token)
            }
            Token::Comment { .. } => self.process_using(InsertionMode::InHead, token),
            Token::StartTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.process_using(InsertionMode::InHead, token)
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag(tag) if tag.name == "br" => self.in_head_noscript_anything_else(token),

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag(tag) if matches!(tag.name.as_str(), "head" | "noscript") => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                Ok(())
            }
            Token::EndTag(_) => {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) -> Result<()> {
        self.parse_error(TreeBuilderError::UnexpectedToken);
        let _ = self.pop();
        self.reprocess_in(InsertionMode::InHead, token)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Text(text) if is_all_whitespace(&text.data) => self.insert_text(&text.data),

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

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                // "Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(tag)?;
                    self.frameset_ok = false;
                    self.mode = InsertionMode::InBody;
                    Ok(())
                }

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(tag)?;
                    self.mode = InsertionMode::InFrameset;
                    Ok(())
                }

                // "A start tag whose tag name is one of: "base", "basefont", "bgsound",
                // "link", "meta", "noframes", "script", "style", "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    // "Parse error."
                    self.parse_error(TreeBuilderError::HeadTokenAfterHeadMode);
                    // "Push the node pointed to by the head element pointer onto the stack
                    // of open elements."
                    let Some(head) = self.head_element.clone() else {
                        return self.process_using(InsertionMode::InHead, token);
                    };
                    self.open_elements.push(OpenElement {
                        handle: head.clone(),
                        namespace: Namespace::Html,
                        name: "head".to_string(),
                        html_integration_point: false,
                    });
                    // "Process the token using the rules for the "in head" insertion mode."
                    self.process_using(InsertionMode::InHead, token)?;
                    // "Remove the node pointed to by the head element pointer from the
                    // stack of open elements. (It might not be the current node at this
                    // point.)"
                    self.remove_from_stack(&head);
                    Ok(())
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.parse_error(TreeBuilderError::HeadTokenAfterHeadMode);
                    Ok(())
                }

                _ => self.after_head_anything_else(token),
            },

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag(tag) if tag.name == "template" => {
                self.process_using(InsertionMode::InHead, token)
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag(tag) if matches!(tag.name.as_str(), "body" | "html" | "br") => {
                self.after_head_anything_else(token)
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag(_) => {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            _ => self.after_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no attributes.
    /// Switch the insertion mode to "in body". Reprocess the current token."
    fn after_head_anything_else(&mut self, token: &Token) -> Result<()> {
        let _ = self.insert_html_element_named("body")?;
        self.reprocess_in(InsertionMode::InBody, token)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Text(text) => self.insert_text(&text.data),

            // "An end-of-file token"
            // "Parse error."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and reprocess the
            // token."
            Token::EndOfFile { .. } => {
                self.parse_error(TreeBuilderError::UnexpectedEndOfFile);
                let _ = self.pop();
                self.reprocess_in(self.original_mode, token)
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            // Scripts are never run, so both entries do the same.
            Token::EndTag(tag) => {
                if tag.name == "script" {
                    weft_common::warn_once("HTML", "script execution is not supported");
                }
                let _ = self.pop();
                self.mode = self.original_mode;
                Ok(())
            }

            // The tokenizer only emits text, end tags and EOF in the text states.
            _ => Ok(()),
        }
    }
}
