//! The "in select", "in select in table" and "in template" insertion modes.

use weft_common::Result;

use super::stack::Scope;
use super::{InsertionMode, TreeBuilder, TreeBuilderError, TreeSink};
use crate::tokenizer::{Tag, Token};

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn handle_in_select_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            // "Any other character token"
            // "Insert the token's character."
            Token::Text(text) => {
                if text.has_null {
                    self.parse_error(TreeBuilderError::NullCharacter);
                    return self.insert_text(&text.data.replace('\0', ""));
                }
                self.insert_text(&text.data)
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

            Token::StartTag(tag) => self.in_select_start_tag(tag, token),
            Token::EndTag(tag) => self.in_select_end_tag(tag, token),

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile { .. } => self.process_using(InsertionMode::InBody, token),
        }
    }

    fn in_select_start_tag(&mut self, tag: &Tag, token: &Token) -> Result<()> {
        match tag.name.as_str() {
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            "html" => self.process_using(InsertionMode::InBody, token),

            // "A start tag whose tag name is "option""
            // "If the current node is an option element, pop that node from the stack of
            // open elements."
            // "Insert an HTML element for the token."
            "option" => {
                self.pop_if_current("option");
                let _ = self.insert_html_element(tag)?;
                Ok(())
            }

            // "A start tag whose tag name is "optgroup""
            // "A start tag whose tag name is "hr""
            // "If the current node is an option element, pop that node from the stack of
            // open elements."
            // "If the current node is an optgroup element, pop that node from the stack
            // of open elements."
            // "Insert an HTML element for the token."
            "optgroup" | "hr" => {
                self.pop_if_current("option");
                self.pop_if_current("optgroup");
                let _ = self.insert_html_element(tag)?;
                // For hr: "Immediately pop the current node off the stack of open
                // elements."
                if tag.name == "hr" {
                    let _ = self.pop();
                }
                Ok(())
            }

            // "A start tag whose tag name is "select""
            "select" => {
                // "Parse error."
                self.parse_error(TreeBuilderError::SelectInScope);
                // "If the stack of open elements does not have a select element in select
                // scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until a select
                // element has been popped from the stack. Reset the insertion mode
                // appropriately."
                if self.in_scope("select", Scope::Select) {
                    self.pop_until_named("select");
                    self.reset_insertion_mode();
                }
                Ok(())
            }

            // "A start tag whose tag name is one of: "input", "keygen", "textarea""
            "input" | "keygen" | "textarea" => {
                // "Parse error."
                self.parse_error(TreeBuilderError::UnexpectedToken);
                // "If the stack of open elements does not have a select element in select
                // scope, ignore the token. (fragment case)"
                if !self.in_scope("select", Scope::Select) {
                    return Ok(());
                }
                // "Pop elements from the stack of open elements until a select element
                // has been popped from the stack."
                // "Reset the insertion mode appropriately."
                // "Reprocess the token."
                self.pop_until_named("select");
                self.reset_insertion_mode();
                self.process(token)
            }

            // "A start tag whose tag name is one of: "script", "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "script" | "template" => self.process_using(InsertionMode::InHead, token),

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                Ok(())
            }
        }
    }

    fn in_select_end_tag(&mut self, tag: &Tag, token: &Token) -> Result<()> {
        match tag.name.as_str() {
            // "An end tag whose tag name is "optgroup""
            "optgroup" => {
                // "First, if the current node is an option element, and the node
                // immediately before it in the stack of open elements is an optgroup
                // element, then pop the current node from the stack of open elements."
                let len = self.open_elements.len();
                if self.current_node_is("option")
                    && len >= 2
                    && self.open_elements[len - 2].is("optgroup")
                {
                    let _ = self.pop();
                }
                // "If the current node is an optgroup element, then pop that node from
                // the stack of open elements. Otherwise, this is a parse error; ignore
                // the token."
                if self.current_node_is("optgroup") {
                    let _ = self.pop();
                } else {
                    self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                }
                Ok(())
            }

            // "An end tag whose tag name is "option""
            // "If the current node is an option element, then pop that node from the
            // stack of open elements. Otherwise, this is a parse error; ignore the
            // token."
            "option" => {
                if self.current_node_is("option") {
                    let _ = self.pop();
                } else {
                    self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                }
                Ok(())
            }

            // "An end tag whose tag name is "select""
            "select" => {
                // "If the stack of open elements does not have a select element in select
                // scope, this is a parse error; ignore the token. (fragment case)"
                if !self.in_scope("select", Scope::Select) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "Otherwise: Pop elements from the stack of open elements until a select
                // element has been popped from the stack. Reset the insertion mode
                // appropriately."
                self.pop_until_named("select");
                self.reset_insertion_mode();
                Ok(())
            }

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => self.process_using(InsertionMode::InHead, token),

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }
        }
    }

    fn pop_if_current(&mut self, name: &str) {
        if self.current_node_is(name) {
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(super) fn handle_in_select_in_table_mode(&mut self, token: &Token) -> Result<()> {
        const TABLE_TAGS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];
        match token {
            // "A start tag whose tag name is one of: "caption", "table", "tbody",
            // "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select element has
            // been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag(tag) if TABLE_TAGS.contains(&tag.name.as_str()) => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                self.pop_until_named("select");
                self.reset_insertion_mode();
                self.process(token)
            }

            // "An end tag whose tag name is one of: "caption", "table", "tbody",
            // "tfoot", "thead", "tr", "td", "th""
            Token::EndTag(tag) if TABLE_TAGS.contains(&tag.name.as_str()) => {
                // "Parse error."
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                // "If the stack of open elements does not have an element in table scope
                // that is an HTML element with the same tag name as that of the token,
                // then ignore the token."
                if !self.in_scope(&tag.name, Scope::Table) {
                    return Ok(());
                }
                self.pop_until_named("select");
                self.reset_insertion_mode();
                self.process(token)
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => self.process_using(InsertionMode::InSelect, token),
        }
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(super) fn handle_in_template_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token"
            // "A comment token"
            // "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Text(_) | Token::Comment { .. } | Token::Doctype(_) => {
                self.process_using(InsertionMode::InBody, token)
            }

            Token::StartTag(tag) => {
                let mode = match tag.name.as_str() {
                    // "A start tag whose tag name is one of: "base", "basefont",
                    // "bgsound", "link", "meta", "noframes", "script", "style",
                    // "template", "title""
                    // "Process the token using the rules for the "in head" insertion
                    // mode."
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes"
                    | "script" | "style" | "template" | "title" => {
                        return self.process_using(InsertionMode::InHead, token);
                    }
                    // "A start tag whose tag name is one of: "caption", "colgroup",
                    // "tbody", "tfoot", "thead""
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
                    // "A start tag whose tag name is "col""
                    "col" => InsertionMode::InColumnGroup,
                    // "A start tag whose tag name is "tr""
                    "tr" => InsertionMode::InTableBody,
                    // "A start tag whose tag name is one of: "td", "th""
                    "td" | "th" => InsertionMode::InRow,
                    // "Any other start tag"
                    _ => InsertionMode::InBody,
                };
                // "Pop the current template insertion mode off the stack of template
                // insertion modes."
                // "Push X onto the stack of template insertion modes so that it is the new
                // current template insertion mode."
                // "Switch the insertion mode to X, and reprocess the token."
                let _ = self.template_modes.pop();
                self.template_modes.push(mode);
                self.reprocess_in(mode, token)
            }

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag(tag) if tag.name == "template" => {
                self.process_using(InsertionMode::InHead, token)
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag(_) => {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            // "An end-of-file token"
            Token::EndOfFile { .. } => {
                // "If there is no template element on the stack of open elements, then
                // stop parsing. (fragment case)"
                if !self.stack_contains("template") {
                    self.stop_parsing();
                    return Ok(());
                }
                // "Otherwise, this is a parse error."
                self.parse_error(TreeBuilderError::UnexpectedEndOfFile);
                // "Pop elements from the stack of open elements until a template element
                // has been popped from the stack."
                self.pop_until_named("template");
                // "Clear the list of active formatting elements up to the last marker."
                self.clear_active_formatting_to_last_marker();
                // "Pop the current template insertion mode off the stack of template
                // insertion modes."
                let _ = self.template_modes.pop();
                // "Reset the insertion mode appropriately."
                self.reset_insertion_mode();
                // "Reprocess the token."
                self.process(token)
            }
        }
    }
}
