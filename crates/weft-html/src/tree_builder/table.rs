//! The table insertion modes: "in table", "in table text", "in caption",
//! "in column group", "in table body", "in row" and "in cell".

use weft_common::Result;

use super::stack::Scope;
use super::{InsertionMode, TreeBuilder, TreeBuilderError, TreeSink, is_all_whitespace};
use crate::tokenizer::{Tag, Text, Token};

/// "Clear the stack back to a table context": "table", "template", or "html".
const TABLE_CONTEXT: &[&str] = &["table"];

/// "Clear the stack back to a table body context": "tbody", "tfoot",
/// "thead", "template", or "html".
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead"];

/// "Clear the stack back to a table row context": "tr", "template", or "html".
const TABLE_ROW_CONTEXT: &[&str] = &["tr"];

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn handle_in_table_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A character token, if the current node is table, tbody, template, tfoot,
            // thead, or tr element"
            // "Let the pending table character tokens be an empty list of tokens."
            // "Let the original insertion mode be the current insertion mode."
            // "Switch the insertion mode to "in table text" and reprocess the token."
            Token::Text(_)
                if self.current_node().is_some_and(|current| {
                    current.is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"])
                }) =>
            {
                self.pending_table_text.clear();
                self.original_mode = self.mode;
                self.reprocess_in(InsertionMode::InTableText, token)
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

            Token::StartTag(tag) => self.in_table_start_tag(tag, token),

            // "An end tag whose tag name is "table""
            Token::EndTag(tag) if tag.name == "table" => {
                // "If the stack of open elements does not have a table element in table
                // scope, this is a parse error; ignore the token."
                if !self.in_scope("table", Scope::Table) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "Pop elements from this stack until a table element has been popped
                // from the stack."
                self.pop_until_named("table");
                // "Reset the insertion mode appropriately."
                self.reset_insertion_mode();
                Ok(())
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                        | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag(tag) if tag.name == "template" => {
                self.process_using(InsertionMode::InHead, token)
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile { .. } => self.process_using(InsertionMode::InBody, token),

            _ => self.in_table_anything_else(token),
        }
    }

    fn in_table_start_tag(&mut self, tag: &Tag, token: &Token) -> Result<()> {
        match tag.name.as_str() {
            // "A start tag whose tag name is "caption""
            "caption" => {
                // "Clear the stack back to a table context."
                self.clear_stack_back_to(TABLE_CONTEXT);
                // "Insert a marker at the end of the list of active formatting elements."
                self.push_formatting_marker();
                // "Insert an HTML element for the token, then switch the insertion mode
                // to "in caption"."
                let _ = self.insert_html_element(tag)?;
                self.mode = InsertionMode::InCaption;
                Ok(())
            }

            // "A start tag whose tag name is "colgroup""
            "colgroup" => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(tag)?;
                self.mode = InsertionMode::InColumnGroup;
                Ok(())
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for a "colgroup" start tag token with no
            // attributes, then switch the insertion mode to "in column group"."
            // "Reprocess the current token."
            "col" => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element_named("colgroup")?;
                self.reprocess_in(InsertionMode::InColumnGroup, token)
            }

            // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
            "tbody" | "tfoot" | "thead" => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(tag)?;
                self.mode = InsertionMode::InTableBody;
                Ok(())
            }

            // "A start tag whose tag name is one of: "td", "th", "tr""
            // "Insert an HTML element for a "tbody" start tag token with no attributes,
            // then switch the insertion mode to "in table body"."
            // "Reprocess the current token."
            "td" | "th" | "tr" => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element_named("tbody")?;
                self.reprocess_in(InsertionMode::InTableBody, token)
            }

            // "A start tag whose tag name is "table""
            "table" => {
                // "Parse error."
                self.parse_error(TreeBuilderError::UnexpectedToken);
                // "If the stack of open elements does not have a table element in table
                // scope, ignore the token."
                if !self.in_scope("table", Scope::Table) {
                    return Ok(());
                }
                // "Otherwise: Pop elements from this stack until a table element has
                // been popped from the stack. Reset the insertion mode appropriately.
                // Reprocess the token."
                self.pop_until_named("table");
                self.reset_insertion_mode();
                self.process(token)
            }

            // "A start tag whose tag name is one of: "style", "script", "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "style" | "script" | "template" => self.process_using(InsertionMode::InHead, token),

            // "A start tag whose tag name is "input""
            // "If the token does not have an attribute with the name "type", or if it
            // does, but that attribute's value is not an ASCII case-insensitive match for
            // the string "hidden", then: act as described in the "anything else" entry
            // below."
            "input"
                if tag
                    .attribute("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden")) =>
            {
                // "Otherwise: Parse error. Insert an HTML element for the token. Pop that
                // input element off the stack of open elements. Acknowledge the token's
                // self-closing flag, if it is set."
                self.parse_error(TreeBuilderError::UnexpectedToken);
                let _ = self.insert_html_element(tag)?;
                let _ = self.pop();
                Ok(())
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "Parse error."
                self.parse_error(TreeBuilderError::UnexpectedToken);
                // "If there is a template element on the stack of open elements, or if
                // the form element pointer is not null, ignore the token."
                if self.stack_contains("template") || self.form_element.is_some() {
                    return Ok(());
                }
                // "Otherwise: Insert an HTML element for the token, and set the form
                // element pointer to point to the element created. Pop that form element
                // off the stack of open elements."
                let form = self.insert_html_element(tag)?;
                self.form_element = Some(form);
                let _ = self.pop();
                Ok(())
            }

            _ => self.in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) -> Result<()> {
        self.parse_error(TreeBuilderError::UnexpectedToken);
        self.foster_parenting = true;
        let result = self.process_using(InsertionMode::InBody, token);
        self.foster_parenting = false;
        result
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: &Token) -> Result<()> {
        if let Token::Text(text) = token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            if text.has_null {
                self.parse_error(TreeBuilderError::NullCharacter);
                self.pending_table_text.extend(text.data.chars().filter(|&c| c != '\0'));
            } else {
                // "Append the character token to the pending table character tokens list."
                self.pending_table_text.push_str(&text.data);
            }
            return Ok(());
        }

        // "Anything else"
        let pending = std::mem::take(&mut self.pending_table_text);
        if !is_all_whitespace(&pending) {
            // "If any of the tokens in the pending table character tokens list are
            // character tokens that are not ASCII whitespace, then this is a parse
            // error: reprocess the character tokens in the pending table character
            // tokens list using the rules given in the "anything else" entry in the
            // "in table" insertion mode."
            self.parse_error(TreeBuilderError::CharacterInTableText);
            let text = Token::Text(Text {
                data: pending,
                ..Text::default()
            });
            self.foster_parenting = true;
            let result = self.process_using(InsertionMode::InBody, &text);
            self.foster_parenting = false;
            result?;
        } else {
            // "Otherwise, insert the characters given by the pending table character
            // tokens list."
            self.insert_text(&pending)?;
        }
        // "Switch the insertion mode to the original insertion mode and reprocess the
        // token."
        self.reprocess_in(self.original_mode, token)
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag(tag) if tag.name == "caption" => {
                let _ = self.close_caption();
                Ok(())
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if self.close_caption() {
                    self.process(token)
                } else {
                    Ok(())
                }
            }
            Token::EndTag(tag) if tag.name == "table" => {
                if self.close_caption() {
                    self.process(token)
                } else {
                    Ok(())
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup", "html",
            // "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.process_using(InsertionMode::InBody, token),
        }
    }

    /// Close the caption element. Returns `false` when there was none in
    /// table scope and the token is ignored.
    fn close_caption(&mut self) -> bool {
        // "If the stack of open elements does not have a caption element in table
        // scope, this is a parse error; ignore the token."
        if !self.in_scope("caption", Scope::Table) {
            self.parse_error(TreeBuilderError::MissingElementInScope);
            return false;
        }
        // "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // "Now, if the current node is not a caption element, then this is a parse
        // error."
        if !self.current_node_is("caption") {
            self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
        }
        // "Pop elements from this stack until a caption element has been popped from
        // the stack."
        self.pop_until_named("caption");
        // "Clear the list of active formatting elements up to the last marker."
        self.clear_active_formatting_to_last_marker();
        // "Switch the insertion mode to "in table"."
        self.mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: &Token) -> Result<()> {
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

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag(tag) if tag.name == "html" => {
                self.process_using(InsertionMode::InBody, token)
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the current node
            // off the stack of open elements."
            Token::StartTag(tag) if tag.name == "col" => {
                let _ = self.insert_html_element(tag)?;
                let _ = self.pop();
                Ok(())
            }

            // "An end tag whose tag name is "colgroup""
            Token::EndTag(tag) if tag.name == "colgroup" => {
                // "If the current node is not a colgroup element, then this is a parse
                // error; ignore the token."
                if !self.current_node_is("colgroup") {
                    self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                    return Ok(());
                }
                // "Otherwise, pop the current node from the stack of open elements.
                // Switch the insertion mode to "in table"."
                let _ = self.pop();
                self.mode = InsertionMode::InTable;
                Ok(())
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag(tag) if tag.name == "col" => {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag(tag) | Token::EndTag(tag) if tag.name == "template" => {
                self.process_using(InsertionMode::InHead, token)
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile { .. } => self.process_using(InsertionMode::InBody, token),

            // "Anything else"
            _ => {
                // "If the current node is not a colgroup element, then this is a parse
                // error; ignore the token."
                if !self.current_node_is("colgroup") {
                    self.parse_error(TreeBuilderError::UnexpectedToken);
                    return Ok(());
                }
                // "Otherwise, pop the current node from the stack of open elements."
                // "Switch the insertion mode to "in table"."
                // "Reprocess the token."
                let _ = self.pop();
                self.reprocess_in(InsertionMode::InTable, token)
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for the token, then switch the insertion mode to
            // "in row"."
            Token::StartTag(tag) if tag.name == "tr" => {
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element(tag)?;
                self.mode = InsertionMode::InRow;
                Ok(())
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error."
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for a "tr" start tag token with no attributes, then
            // switch the insertion mode to "in row"."
            // "Reprocess the current token."
            Token::StartTag(tag) if matches!(tag.name.as_str(), "th" | "td") => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element_named("tr")?;
                self.reprocess_in(InsertionMode::InRow, token)
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag(tag) if TABLE_SECTIONS.contains(&tag.name.as_str()) => {
                // "If the stack of open elements does not have an element in table scope
                // that is an HTML element with the same tag name as the token, this is a
                // parse error; ignore the token."
                if !self.in_scope(&tag.name, Scope::Table) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "Otherwise: Clear the stack back to a table body context. Pop the
                // current node from the stack of open elements. Switch the insertion mode
                // to "in table"."
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.pop();
                self.mode = InsertionMode::InTable;
                Ok(())
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            Token::StartTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.leave_table_body(token)
            }
            Token::EndTag(tag) if tag.name == "table" => self.leave_table_body(token),

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_using(InsertionMode::InTable, token),
        }
    }

    fn leave_table_body(&mut self, token: &Token) -> Result<()> {
        // "If the stack of open elements does not have a tbody, thead, or tfoot
        // element in table scope, this is a parse error; ignore the token."
        if !self.any_in_scope(TABLE_SECTIONS, Scope::Table) {
            self.parse_error(TreeBuilderError::MissingElementInScope);
            return Ok(());
        }
        // "Otherwise: Clear the stack back to a table body context. Pop the current
        // node from the stack of open elements. Switch the insertion mode to "in
        // table". Reprocess the token."
        self.clear_stack_back_to(TABLE_BODY_CONTEXT);
        let _ = self.pop();
        self.reprocess_in(InsertionMode::InTable, token)
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(super) fn handle_in_row_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context."
            // "Insert an HTML element for the token, then switch the insertion mode to
            // "in cell"."
            // "Insert a marker at the end of the list of active formatting elements."
            Token::StartTag(tag) if matches!(tag.name.as_str(), "th" | "td") => {
                self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                let _ = self.insert_html_element(tag)?;
                self.mode = InsertionMode::InCell;
                self.push_formatting_marker();
                Ok(())
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag(tag) if tag.name == "tr" => {
                let _ = self.close_row();
                Ok(())
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if self.close_row() {
                    self.process(token)
                } else {
                    Ok(())
                }
            }
            Token::EndTag(tag) if tag.name == "table" => {
                if self.close_row() {
                    self.process(token)
                } else {
                    Ok(())
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag(tag) if TABLE_SECTIONS.contains(&tag.name.as_str()) => {
                // "If the stack of open elements does not have an element in table scope
                // that is an HTML element with the same tag name as the token, this is a
                // parse error; ignore the token."
                if !self.in_scope(&tag.name, Scope::Table) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "If the stack of open elements does not have a tr element in table
                // scope, ignore the token."
                if self.close_row() {
                    self.process(token)
                } else {
                    Ok(())
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            // "Parse error. Ignore the token."
            Token::EndTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_using(InsertionMode::InTable, token),
        }
    }

    /// Close the current row. Returns `false` when there was no `tr` in table
    /// scope and the token is ignored.
    fn close_row(&mut self) -> bool {
        // "If the stack of open elements does not have a tr element in table scope,
        // this is a parse error; ignore the token."
        if !self.in_scope("tr", Scope::Table) {
            self.parse_error(TreeBuilderError::MissingElementInScope);
            return false;
        }
        // "Clear the stack back to a table row context."
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        // "Pop the current node (which will be a tr element) from the stack of open
        // elements. Switch the insertion mode to "in table body"."
        let _ = self.pop();
        self.mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(super) fn handle_in_cell_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag(tag) if matches!(tag.name.as_str(), "td" | "th") => {
                let name = tag.name.as_str();
                // "If the stack of open elements does not have an element in table scope
                // that is an HTML element with the same tag name as that of the token,
                // then this is a parse error; ignore the token."
                if !self.in_scope(name, Scope::Table) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "Generate implied end tags."
                self.generate_implied_end_tags(None);
                // "Now, if the current node is not an HTML element with the same tag name
                // as the token, then this is a parse error."
                if !self.current_node_is(name) {
                    self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                }
                // "Pop elements from the stack of open elements stack until an HTML
                // element with the same tag name as the token has been popped from the
                // stack."
                self.pop_until_named(name);
                // "Clear the list of active formatting elements up to the last marker."
                self.clear_active_formatting_to_last_marker();
                // "Switch the insertion mode to "in row"."
                self.mode = InsertionMode::InRow;
                Ok(())
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "td", "tfoot", "th", "thead", "tr""
            Token::StartTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                // "Assert: The stack of open elements has a td or th element in table
                // scope."
                if !self.any_in_scope(&["td", "th"], Scope::Table) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "Close the cell (see below) and reprocess the token."
                self.close_cell();
                self.process(token)
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html"
                ) =>
            {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                Ok(())
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot", "thead",
            // "tr""
            Token::EndTag(tag)
                if matches!(
                    tag.name.as_str(),
                    "table" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                // "If the stack of open elements does not have an element in table scope
                // that is an HTML element with the same tag name as that of the token,
                // then this is a parse error; ignore the token."
                if !self.in_scope(&tag.name, Scope::Table) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "Otherwise, close the cell (see below) and reprocess the token."
                self.close_cell();
                self.process(token)
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.process_using(InsertionMode::InBody, token),
        }
    }
}
