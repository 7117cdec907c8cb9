//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use weft_common::Result;

use super::stack::{Scope, is_formatting, is_special};
use super::{
    ElementAttribute, FormattingEntry, InsertionMode, Namespace, QuirksMode, TreeBuilder,
    TreeBuilderError, TreeSink, is_whitespace,
};
use crate::tokenizer::{Tag, Text, Token, TokenizerState};

/// "A start tag whose tag name is one of: "address", "article", "aside",
/// "blockquote", "center", "details", "dialog", "dir", "div", "dl",
/// "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main",
/// "menu", "nav", "ol", "p", "search", "section", "summary", "ul""
const BLOCK_START_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu",
    "nav", "ol", "p", "search", "section", "summary", "ul",
];

/// "An end tag whose tag name is one of: "address", "article", "aside",
/// "blockquote", "button", "center", "details", "dialog", "dir", "div",
/// "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup",
/// "listing", "main", "menu", "nav", "ol", "pre", "search", "section",
/// "summary", "ul""
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog",
    "dir", "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup",
    "listing", "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that may stay open at the end of the body without a parse error.
const CLOSABLE_AT_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
    "tfoot", "th", "thead", "tr", "body", "html",
];

/// Copy a token's attributes for the sink.
pub(super) fn element_attributes(tag: &Tag) -> Vec<ElementAttribute> {
    tag.attributes
        .iter()
        .map(|attr| ElementAttribute::new(attr.name.clone(), attr.value.clone()))
        .collect()
}

impl<S: TreeSink> TreeBuilder<S> {
    pub(super) fn handle_in_body_mode(&mut self, token: &Token) -> Result<()> {
        match token {
            Token::Text(text) => self.in_body_text(text),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data, .. } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype(_) => {
                self.parse_error(TreeBuilderError::DoctypeTokenInWrongMode);
                Ok(())
            }

            Token::StartTag(tag) => self.in_body_start_tag(tag, token),
            Token::EndTag(tag) => self.in_body_end_tag(tag, token),

            // "An end-of-file token"
            Token::EndOfFile { .. } => {
                // "If the stack of template insertion modes is not empty, then process
                // the token using the rules for the "in template" insertion mode."
                if !self.template_modes.is_empty() {
                    return self.process_using(InsertionMode::InTemplate, token);
                }
                // "Otherwise, follow these steps: If there is a node in the stack of open
                // elements that is not either a dd element, a dt element, ... then this
                // is a parse error."
                self.check_unclosed_elements();
                // "Stop parsing."
                self.stop_parsing();
                Ok(())
            }
        }
    }

    fn in_body_text(&mut self, text: &Text) -> Result<()> {
        // "A character token that is U+0000 NULL"
        // "Parse error. Ignore the token."
        let data = if text.has_null {
            self.parse_error(TreeBuilderError::NullCharacter);
            text.data.replace('\0', "")
        } else {
            text.data.clone()
        };
        if data.is_empty() {
            return Ok(());
        }
        // "Reconstruct the active formatting elements, if any."
        self.reconstruct_active_formatting()?;
        // "Insert the token's character."
        self.insert_text(&data)?;
        // "Set the frameset-ok flag to "not ok"." (for anything but whitespace)
        if !data.chars().all(is_whitespace) {
            self.frameset_ok = false;
        }
        Ok(())
    }

    /// "If there is a node in the stack of open elements that is not either a
    /// dd element, a dt element, an li element, an optgroup element, an option
    /// element, a p element, an rb element, an rp element, an rt element, an
    /// rtc element, a tbody element, a td element, a tfoot element, a th
    /// element, a thead element, a tr element, the body element, or the html
    /// element, then this is a parse error."
    pub(super) fn check_unclosed_elements(&mut self) {
        if self
            .open_elements
            .iter()
            .any(|e| !e.is_one_of(CLOSABLE_AT_END))
        {
            self.parse_error(TreeBuilderError::UnexpectedEndOfFile);
        }
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        self.open_elements.clear();
        self.active_formatting.clear();
    }

    /// Insert a start tag in `namespace`, popping it again when self-closing.
    pub(super) fn insert_foreign_start_tag(&mut self, tag: &Tag, namespace: Namespace) -> Result<()> {
        let _ = self.insert_element(tag, namespace)?;
        // "If the token has its self-closing flag set, pop the current node off the
        // stack of open elements and acknowledge the token's self-closing flag."
        if tag.self_closing {
            let _ = self.pop();
        }
        Ok(())
    }

    /// Insert an element that is popped right away.
    fn insert_void_element(&mut self, tag: &Tag) -> Result<()> {
        let _ = self.insert_html_element(tag)?;
        let _ = self.pop();
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_start_tag(&mut self, tag: &Tag, token: &Token) -> Result<()> {
        let name = tag.name.as_str();
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.parse_error(TreeBuilderError::UnexpectedToken);
                // "If there is a template element on the stack of open elements, then
                // ignore the token."
                if self.stack_contains("template") {
                    return Ok(());
                }
                // "Otherwise, for each attribute on the token, check to see if the
                // attribute is already present on the top element of the stack of open
                // elements. If it is not, add the attribute and its corresponding value
                // to that element."
                if let Some(html) = self.open_elements.first().map(|e| e.handle.clone()) {
                    self.sink.add_attributes_if_missing(&html, element_attributes(tag))?;
                }
                Ok(())
            }

            // "A start tag whose tag name is one of: "base", "basefont", "bgsound",
            // "link", "meta", "noframes", "script", "style", "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "template" | "title" => self.process_using(InsertionMode::InHead, token),

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.parse_error(TreeBuilderError::UnexpectedToken);
                // "If the stack of open elements has only one node on it, if the second
                // element on the stack of open elements is not a body element, or if
                // there is a template element on the stack of open elements, then ignore
                // the token."
                let body = match self.open_elements.get(1) {
                    Some(second) if second.is("body") && !self.stack_contains("template") => {
                        second.handle.clone()
                    }
                    _ => return Ok(()),
                };
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for each
                // attribute on the token, check to see if the attribute is already
                // present on the body element (the second element) on the stack of open
                // elements, and if it is not, add the attribute and its corresponding
                // value to that element."
                self.frameset_ok = false;
                self.sink.add_attributes_if_missing(&body, element_attributes(tag))
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.parse_error(TreeBuilderError::UnexpectedToken);
                // "If the stack of open elements has only one node on it, or if the
                // second element on the stack of open elements is not a body element,
                // then ignore the token."
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let body = match self.open_elements.get(1) {
                    Some(second) if second.is("body") && self.frameset_ok => second.handle.clone(),
                    _ => {
                        self.parse_error(TreeBuilderError::FramesetNotAllowed);
                        return Ok(());
                    }
                };
                // "Remove the second element on the stack of open elements from its
                // parent node, if it has one."
                self.sink.remove_from_parent(&body)?;
                // "Pop all the nodes from the bottom of the stack of open elements, from
                // the current node up to, but not including, the root html element."
                self.open_elements.truncate(1);
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(tag)?;
                // "Switch the insertion mode to "in frameset"."
                self.mode = InsertionMode::InFrameset;
                Ok(())
            }

            // "If the stack of open elements has a p element in button scope, then close
            // a p element."
            // "Insert an HTML element for the token."
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag)?;
                Ok(())
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of "h1",
                // "h2", "h3", "h4", "h5", or "h6", then this is a parse error; pop the
                // current node off the stack of open elements."
                if self
                    .current_node()
                    .is_some_and(|current| current.is_one_of(HEADINGS))
                {
                    self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                    let _ = self.pop();
                }
                let _ = self.insert_html_element(tag)?;
                Ok(())
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag)?;
                // "If the next token is a U+000A LINE FEED (LF) character token, then
                // ignore that token and move on to the next one."
                self.ignore_next_line_feed = true;
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                Ok(())
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no template
                // element on the stack of open elements, then this is a parse error;
                // ignore the token."
                let in_template = self.stack_contains("template");
                if self.form_element.is_some() && !in_template {
                    self.parse_error(TreeBuilderError::NestedForm);
                    return Ok(());
                }
                self.close_p_element_in_button_scope();
                // "Insert an HTML element for the token, and, if there is no template
                // element on the stack of open elements, set the form element pointer to
                // point to the element created."
                let form = self.insert_html_element(tag)?;
                if !in_template {
                    self.form_element = Some(form);
                }
                Ok(())
            }

            // "A start tag whose tag name is "li""
            // "A start tag whose tag name is one of: "dd", "dt""
            "li" | "dd" | "dt" => {
                // STEP 1: "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                let closes: &[&str] = if name == "li" { &["li"] } else { &["dd", "dt"] };
                // STEP 2-5: "Loop": walk down from the current node.
                let mut close = None;
                for element in self.open_elements.iter().rev() {
                    if element.is_one_of(closes) {
                        close = Some(element.name.clone());
                        break;
                    }
                    // "If node is in the special category, but is not an address, div,
                    // or p element, then jump to the step labeled done below."
                    if is_special(element) && !element.is_one_of(&["address", "div", "p"]) {
                        break;
                    }
                }
                if let Some(close) = close {
                    // "Generate implied end tags, except for li elements."
                    self.generate_implied_end_tags(Some(&close));
                    // "If the current node is not an li element, then this is a parse
                    // error."
                    if !self.current_node_is(&close) {
                        self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                    }
                    // "Pop elements from the stack of open elements until an li element
                    // has been popped from the stack."
                    self.pop_until_named(&close);
                }
                // STEP 6: "Done: If the stack of open elements has a p element in button
                // scope, then close a p element."
                self.close_p_element_in_button_scope();
                // STEP 7: "Finally, insert an HTML element for the token."
                let _ = self.insert_html_element(tag)?;
                Ok(())
            }

            // "A start tag whose tag name is "plaintext""
            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag)?;
                // "Switch the tokenizer to the PLAINTEXT state."
                self.next_tokenizer_state = Some(TokenizerState::Plaintext);
                Ok(())
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "If the stack of open elements has a button element in scope, then run
                // these substeps: Parse error. Generate implied end tags. Pop elements
                // from the stack of open elements until a button element has been popped
                // from the stack."
                if self.in_scope("button", Scope::Default) {
                    self.parse_error(TreeBuilderError::NestedButton);
                    self.generate_implied_end_tags(None);
                    self.pop_until_named("button");
                }
                self.reconstruct_active_formatting()?;
                let _ = self.insert_html_element(tag)?;
                self.frameset_ok = false;
                Ok(())
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a element
                // between the end of the list and the last marker on the list (or the
                // start of the list if there is no marker on the list), then this is a
                // parse error; run the adoption agency algorithm for the token, then
                // remove that element from the list of active formatting elements and
                // the stack of open elements if the adoption agency algorithm didn't
                // already remove it"
                if let Some(index) = self.formatting_element_after_marker("a") {
                    self.parse_error(TreeBuilderError::NestedAnchor);
                    let previous = match &self.active_formatting[index] {
                        FormattingEntry::Element { handle, .. } => Some(handle.clone()),
                        FormattingEntry::Marker => None,
                    };
                    if !self.run_adoption_agency("a")? {
                        self.any_other_end_tag("a");
                    }
                    if let Some(previous) = previous {
                        self.remove_from_formatting(&previous);
                        self.remove_from_stack(&previous);
                    }
                }
                self.insert_formatting_element(tag)
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em", "font",
            // "i", "s", "small", "strike", "strong", "tt", "u""
            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike" | "strong"
            | "tt" | "u" => self.insert_formatting_element(tag),

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                self.reconstruct_active_formatting()?;
                // "If the stack of open elements has a nobr element in scope, then this
                // is a parse error; run the adoption agency algorithm for the token, then
                // once again reconstruct the active formatting elements, if any."
                if self.in_scope("nobr", Scope::Default) {
                    self.parse_error(TreeBuilderError::NestedNobr);
                    if !self.run_adoption_agency("nobr")? {
                        self.any_other_end_tag("nobr");
                    }
                }
                self.insert_formatting_element(tag)
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting()?;
                let _ = self.insert_html_element(tag)?;
                // "Insert a marker at the end of the list of active formatting elements."
                self.push_formatting_marker();
                self.frameset_ok = false;
                Ok(())
            }

            // "A start tag whose tag name is "table""
            "table" => {
                // "If the Document is not set to quirks mode, and the stack of open
                // elements has a p element in button scope, then close a p element."
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(tag)?;
                self.frameset_ok = false;
                // "Switch the insertion mode to "in table"."
                self.mode = InsertionMode::InTable;
                Ok(())
            }

            // "A start tag whose tag name is one of: "area", "br", "embed", "img",
            // "keygen", "wbr""
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting()?;
                self.insert_void_element(tag)?;
                self.frameset_ok = false;
                Ok(())
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.reconstruct_active_formatting()?;
                self.insert_void_element(tag)?;
                // "If the token does not have an attribute with the name "type", or if it
                // does, but that attribute's value is not an ASCII case-insensitive match
                // for the string "hidden", then: set the frameset-ok flag to "not ok"."
                if !tag
                    .attribute("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
                {
                    self.frameset_ok = false;
                }
                Ok(())
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            "param" | "source" | "track" => self.insert_void_element(tag),

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_element_in_button_scope();
                self.insert_void_element(tag)?;
                self.frameset_ok = false;
                Ok(())
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess it.
            // (Don't ask.)"
            "image" => {
                self.parse_error(TreeBuilderError::ImageTagRenamed);
                let mut renamed = tag.clone();
                renamed.name = "img".to_string();
                self.process(&Token::StartTag(renamed))
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                let _ = self.insert_html_element(tag)?;
                // "If the next token is a U+000A LINE FEED (LF) character token, then
                // ignore that token and move on to the next one."
                self.ignore_next_line_feed = true;
                // "Switch the tokenizer to the RCDATA state."
                self.next_tokenizer_state = Some(TokenizerState::Rcdata);
                self.original_mode = self.mode;
                self.frameset_ok = false;
                self.mode = InsertionMode::Text;
                Ok(())
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting()?;
                self.frameset_ok = false;
                self.parse_text_element(tag, TokenizerState::Rawtext)
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(tag, TokenizerState::Rawtext)
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
            "noembed" => self.parse_text_element(tag, TokenizerState::Rawtext),
            "noscript" if self.options.scripting => {
                self.parse_text_element(tag, TokenizerState::Rawtext)
            }

            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting()?;
                let _ = self.insert_html_element(tag)?;
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in table
                // body", "in row", or "in cell", then switch the insertion mode to "in
                // select in table". Otherwise, switch the insertion mode to "in select"."
                self.mode = match self.mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                Ok(())
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            "optgroup" | "option" => {
                // "If the current node is an option element, then pop the current node
                // off the stack of open elements."
                if self.current_node_is("option") {
                    let _ = self.pop();
                }
                self.reconstruct_active_formatting()?;
                let _ = self.insert_html_element(tag)?;
                Ok(())
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "A start tag whose tag name is one of: "rp", "rt""
            "rb" | "rtc" | "rp" | "rt" => {
                let nested = matches!(name, "rp" | "rt");
                // "If the stack of open elements has a ruby element in scope, then
                // generate implied end tags (except for rtc elements, for rp and rt)."
                if self.in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(if nested { Some("rtc") } else { None });
                    // "If the current node is not now a ruby element (or an rtc element,
                    // for rp and rt), this is a parse error."
                    let ok = self.current_node().is_some_and(|current| {
                        current.is("ruby") || (nested && current.is("rtc"))
                    });
                    if !ok {
                        self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                    }
                }
                let _ = self.insert_html_element(tag)?;
                Ok(())
            }

            // "A start tag whose tag name is "math""
            // "A start tag whose tag name is "svg""
            // "Reconstruct the active formatting elements, if any."
            // "Adjust MathML attributes for the token. (This fixes the case of MathML
            // attributes that are not all lowercase.)"
            // "Adjust foreign attributes for the token."
            // "Insert a foreign element for the token, with MathML namespace and false."
            "math" | "svg" => {
                self.reconstruct_active_formatting()?;
                let namespace = if name == "math" {
                    Namespace::MathMl
                } else {
                    Namespace::Svg
                };
                self.insert_foreign_start_tag(tag, namespace)
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => {
                self.parse_error(TreeBuilderError::UnexpectedToken);
                Ok(())
            }

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting()?;
                let _ = self.insert_html_element(tag)?;
                Ok(())
            }
        }
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, tag: &Tag) -> Result<()> {
        self.reconstruct_active_formatting()?;
        let handle = self.insert_html_element(tag)?;
        self.push_formatting_element(handle, tag);
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_end_tag(&mut self, tag: &Tag, token: &Token) -> Result<()> {
        let name = tag.name.as_str();
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => self.process_using(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body""
            // "An end tag whose tag name is "html""
            "body" | "html" => {
                // "If the stack of open elements does not have a body element in scope,
                // this is a parse error; ignore the token."
                if !self.in_scope("body", Scope::Default) {
                    self.parse_error(TreeBuilderError::NoBodyElementInScope);
                    return Ok(());
                }
                self.check_unclosed_elements_in_body();
                // "Switch the insertion mode to "after body"."
                self.mode = InsertionMode::AfterBody;
                // For </html>: "Reprocess the token."
                if name == "html" {
                    return self.process(token);
                }
                Ok(())
            }

            _ if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope that
                // is an HTML element with the same tag name as that of the token, then
                // this is a parse error; ignore the token."
                if !self.in_scope(name, Scope::Default) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                self.close_element_in_scope(name);
                Ok(())
            }

            // "An end tag whose tag name is "form""
            "form" => {
                if self.stack_contains("template") {
                    // "If the stack of open elements does not have a form element in
                    // scope, then this is a parse error; return and ignore the token."
                    if !self.in_scope("form", Scope::Default) {
                        self.parse_error(TreeBuilderError::MissingElementInScope);
                        return Ok(());
                    }
                    self.close_element_in_scope("form");
                    return Ok(());
                }
                // "Let node be the element that the form element pointer is set to, or
                // null if it is not set to an element."
                // "Set the form element pointer to null."
                let node = self.form_element.take();
                // "If node is null or if the stack of open elements does not have node in
                // scope, then this is a parse error; return and ignore the token."
                let Some(node) = node.filter(|node| self.handle_in_scope(node)) else {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                };
                // "Generate implied end tags."
                self.generate_implied_end_tags(None);
                // "If the current node is not node, then this is a parse error."
                if self.current_node().is_none_or(|current| current.handle != node) {
                    self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                }
                // "Remove node from the stack of open elements."
                self.remove_from_stack(&node);
                Ok(())
            }

            // "An end tag whose tag name is "p""
            "p" => {
                // "If the stack of open elements does not have a p element in button
                // scope, then this is a parse error; insert an HTML element for a "p"
                // start tag token with no attributes."
                if !self.in_scope("p", Scope::Button) {
                    self.parse_error(TreeBuilderError::EndTagPWithoutP);
                    let _ = self.insert_html_element_named("p")?;
                }
                // "Close a p element."
                self.close_p_element();
                Ok(())
            }

            // "An end tag whose tag name is "li""
            // "An end tag whose tag name is one of: "dd", "dt""
            "li" | "dd" | "dt" => {
                let scope = if name == "li" {
                    Scope::ListItem
                } else {
                    Scope::Default
                };
                if !self.in_scope(name, scope) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                // "Generate implied end tags, except for li elements."
                self.generate_implied_end_tags(Some(name));
                if !self.current_node_is(name) {
                    self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                }
                self.pop_until_named(name);
                Ok(())
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope that
                // is an HTML element and whose tag name is one of "h1", "h2", "h3", "h4",
                // "h5", or "h6", then this is a parse error; ignore the token."
                if !self.any_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                }
                // "Pop elements from the stack of open elements until an HTML element
                // whose tag name is one of "h1", "h2", "h3", "h4", "h5", or "h6" has been
                // popped from the stack."
                self.pop_until_one_of(HEADINGS);
                Ok(())
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code", "em",
            // "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if is_formatting(name) => {
                if !self.run_adoption_agency(name)? {
                    self.any_other_end_tag(name);
                }
                Ok(())
            }

            // "An end tag token whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                if !self.in_scope(name, Scope::Default) {
                    self.parse_error(TreeBuilderError::MissingElementInScope);
                    return Ok(());
                }
                self.close_element_in_scope(name);
                // "Clear the list of active formatting elements up to the last marker."
                self.clear_active_formatting_to_last_marker();
                Ok(())
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as described in
            // the next entry; i.e. act as if this was a "br" start tag token with no
            // attributes, rather than the end tag token that it actually is."
            "br" => {
                self.parse_error(TreeBuilderError::EndTagBr);
                self.reconstruct_active_formatting()?;
                self.insert_void_element(&Tag::named("br"))?;
                self.frameset_ok = false;
                Ok(())
            }

            // "Any other end tag"
            _ => {
                self.any_other_end_tag(name);
                Ok(())
            }
        }
    }

    /// "Generate implied end tags. If the current node is not an HTML element
    /// with the same tag name as that of the token, then this is a parse error.
    /// Pop elements from the stack of open elements until an HTML element with
    /// the same tag name as the token has been popped from the stack."
    fn close_element_in_scope(&mut self, name: &str) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is(name) {
            self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
        }
        self.pop_until_named(name);
    }

    /// "Otherwise, if there is a node in the stack of open elements that is
    /// not either a dd element, ..., then this is a parse error."
    fn check_unclosed_elements_in_body(&mut self) {
        if self
            .open_elements
            .iter()
            .any(|e| !e.is_one_of(CLOSABLE_AT_END))
        {
            self.parse_error(TreeBuilderError::OpenElementsIsWrong);
        }
    }
}
