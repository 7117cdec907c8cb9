//! The stack of open elements and the list of active formatting elements.
//!
//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)

use weft_common::Result;

use super::{
    FormattingEntry, InsertionMode, Namespace, NodeOrText, OpenElement, TreeBuilder,
    TreeBuilderError, TreeSink,
};
use crate::tokenizer::Tag;

/// [§ 13.2.4.3 Element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// Each variant names the set of elements that bound the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope"
    ListItem,
    /// "has an element in button scope"
    Button,
    /// "has an element in table scope"
    Table,
    /// "has an element in select scope"
    Select,
}

impl Scope {
    /// Whether `element` ends a search in this scope.
    fn is_boundary<H>(self, element: &OpenElement<H>) -> bool {
        match self {
            Self::Default => is_default_scope_boundary(element),
            Self::ListItem => {
                is_default_scope_boundary(element) || element.is_one_of(&["ol", "ul"])
            }
            Self::Button => is_default_scope_boundary(element) || element.is("button"),
            Self::Table => element.is_one_of(&["html", "table", "template"]),
            // "the element type in select scope ... consists of all element types
            // except the following: optgroup in the HTML namespace, option in the
            // HTML namespace"
            Self::Select => !element.is_one_of(&["optgroup", "option"]),
        }
    }
}

/// "The stack of open elements is said to have a particular element in scope
/// when it has that element in the specific scope consisting of the following
/// element types: applet, caption, html, table, td, th, marquee, object,
/// template, MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, MathML
/// annotation-xml, SVG foreignObject, SVG desc, SVG title"
fn is_default_scope_boundary<H>(element: &OpenElement<H>) -> bool {
    match element.namespace {
        Namespace::Html => matches!(
            element.name.as_str(),
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object" | "template"
        ),
        Namespace::MathMl => matches!(
            element.name.as_str(),
            "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
        ),
        Namespace::Svg => matches!(element.name.as_str(), "foreignObject" | "desc" | "title"),
    }
}

/// [§ 13.2.4.3 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
pub(super) fn is_special<H>(element: &OpenElement<H>) -> bool {
    match element.namespace {
        Namespace::Html => matches!(
            element.name.as_str(),
            "address" | "applet" | "area" | "article" | "aside" | "base" | "basefont"
                | "bgsound" | "blockquote" | "body" | "br" | "button" | "caption" | "center"
                | "col" | "colgroup" | "dd" | "details" | "dir" | "div" | "dl" | "dt"
                | "embed" | "fieldset" | "figcaption" | "figure" | "footer" | "form"
                | "frame" | "frameset" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head"
                | "header" | "hgroup" | "hr" | "html" | "iframe" | "img" | "input"
                | "keygen" | "li" | "link" | "listing" | "main" | "marquee" | "menu"
                | "meta" | "nav" | "noembed" | "noframes" | "noscript" | "object" | "ol"
                | "p" | "param" | "plaintext" | "pre" | "script" | "search" | "section"
                | "select" | "source" | "style" | "summary" | "table" | "tbody" | "td"
                | "template" | "textarea" | "tfoot" | "th" | "thead" | "title" | "tr"
                | "track" | "ul" | "wbr" | "xmp"
        ),
        Namespace::MathMl => matches!(
            element.name.as_str(),
            "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
        ),
        Namespace::Svg => matches!(element.name.as_str(), "foreignObject" | "desc" | "title"),
    }
}

/// [§ 13.2.4.3 Formatting](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "The following HTML elements are those that end up in the list of active
/// formatting elements: a, b, big, code, em, font, i, nobr, s, small, strike,
/// strong, tt, and u."
pub(super) fn is_formatting(name: &str) -> bool {
    matches!(
        name,
        "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr" | "s" | "small" | "strike"
            | "strong" | "tt" | "u"
    )
}

/// "Generate implied end tags" element names.
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "Generate all implied end tags thoroughly" element names.
const IMPLIED_END_TAGS_THOROUGH: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt",
    "rtc", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// The adoption agency gives up after this many outer-loop iterations.
const ADOPTION_OUTER_LOOP_LIMIT: usize = 8;

/// Past this many inner-loop iterations, nodes are dropped from the list of
/// active formatting elements instead of being cloned.
const ADOPTION_INNER_LOOP_LIMIT: usize = 3;

/// "Noah's Ark" clause: at most this many identical formatting elements
/// after the last marker.
const NOAHS_ARK_LIMIT: usize = 3;

impl<S: TreeSink> TreeBuilder<S> {
    // ===== Stack of open elements =====

    /// [§ 13.2.4.3 Has an element in the specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// Walks down from the current node; true when `matches` holds before a
    /// boundary of `scope` is reached.
    pub(super) fn in_scope_where(
        &self,
        scope: Scope,
        matches: impl Fn(&OpenElement<S::Handle>) -> bool,
    ) -> bool {
        for element in self.open_elements.iter().rev() {
            // STEP 2: "If node is the target node, terminate in a match state."
            if matches(element) {
                return true;
            }
            // STEP 3: "Otherwise, if node is one of the element types in list,
            // terminate in a failure state."
            if scope.is_boundary(element) {
                return false;
            }
        }
        false
    }

    /// Whether an HTML element called `name` is in `scope`.
    pub(super) fn in_scope(&self, name: &str, scope: Scope) -> bool {
        self.in_scope_where(scope, |e| e.is(name))
    }

    /// Whether an HTML element with one of `names` is in `scope`.
    pub(super) fn any_in_scope(&self, names: &[&str], scope: Scope) -> bool {
        self.in_scope_where(scope, |e| e.is_one_of(names))
    }

    /// Whether `handle` is in the default scope.
    pub(super) fn handle_in_scope(&self, handle: &S::Handle) -> bool {
        self.in_scope_where(Scope::Default, |e| e.handle == *handle)
    }

    /// Whether an HTML element called `name` is anywhere on the stack.
    pub(super) fn stack_contains(&self, name: &str) -> bool {
        self.open_elements.iter().any(|e| e.is(name))
    }

    /// Index of `handle` in the stack of open elements.
    pub(super) fn stack_position(&self, handle: &S::Handle) -> Option<usize> {
        self.open_elements.iter().rposition(|e| e.handle == *handle)
    }

    /// Remove `handle` from the stack of open elements, wherever it is.
    pub(super) fn remove_from_stack(&mut self, handle: &S::Handle) {
        if let Some(index) = self.stack_position(handle) {
            let _ = self.open_elements.remove(index);
        }
    }

    /// Pop the current node.
    pub(super) fn pop(&mut self) -> Option<OpenElement<S::Handle>> {
        self.open_elements.pop()
    }

    /// Pop elements until one matching `matches` has been popped.
    pub(super) fn pop_until_where(&mut self, matches: impl Fn(&OpenElement<S::Handle>) -> bool) {
        while let Some(element) = self.open_elements.pop() {
            if matches(&element) {
                break;
            }
        }
    }

    /// "Pop elements from the stack of open elements until an HTML element
    /// with the same tag name as the token has been popped from the stack."
    pub(super) fn pop_until_named(&mut self, name: &str) {
        self.pop_until_where(|e| e.is(name));
    }

    /// Pop elements until one with any of `names` has been popped.
    pub(super) fn pop_until_one_of(&mut self, names: &[&str]) {
        self.pop_until_where(|e| e.is_one_of(names));
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// "If a step requires the UA to generate implied end tags but lists an
    /// element to exclude from the process, then the UA must perform the above
    /// steps as if that element was not in the above list."
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(current) = self.current_node() {
            if !current.is_one_of(IMPLIED_END_TAGS) || except.is_some_and(|name| current.is(name))
            {
                break;
            }
            let _ = self.pop();
        }
    }

    /// "Generate all implied end tags thoroughly"
    pub(super) fn generate_implied_end_tags_thoroughly(&mut self) {
        while self
            .current_node()
            .is_some_and(|current| current.is_one_of(IMPLIED_END_TAGS_THOROUGH))
        {
            let _ = self.pop();
        }
    }

    /// "Clear the stack back to a ... context": pop until the current node is
    /// one of `names` (or `html`, or `template`).
    pub(super) fn clear_stack_back_to(&mut self, names: &[&str]) {
        while let Some(current) = self.current_node() {
            if current.is_one_of(names) || current.is_one_of(&["html", "template"]) {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.7 "in body"](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the stack."
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
        }
        self.pop_until_named("p");
    }

    /// Close a `p` element if one is in button scope. Many start tags in body
    /// begin with this.
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self.in_scope("p", Scope::Button) {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.15 Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(super) fn close_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // STEP 2: "If the current node is not now a td element or a th element, then
        // this is a parse error."
        if !self
            .current_node()
            .is_some_and(|current| current.is_one_of(&["td", "th"]))
        {
            self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a td
        // element or a th element has been popped from the stack."
        self.pop_until_one_of(&["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last marker."
        self.clear_active_formatting_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        self.mode = InsertionMode::InRow;
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode(&mut self) {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for index in (0..self.open_elements.len()).rev() {
            // STEP 3: "Loop: If node is the first node in the stack of open elements,
            // then set last to true"
            let last = index == 0;
            let node = &self.open_elements[index];
            if node.namespace != Namespace::Html {
                if last {
                    break;
                }
                continue;
            }
            let mode = match node.name.as_str() {
                // STEP 4: "If node is a select element"
                "select" => {
                    // "If last is true, jump to the step below labeled done."
                    // "Loop: If ancestor is the first node in the stack of open elements,
                    // jump to the step below labeled done. Let ancestor be the node before
                    // ancestor in the stack of open elements. If ancestor is a template
                    // node, jump to the step below labeled done. If ancestor is a table
                    // node, switch the insertion mode to "in select in table" and return."
                    let in_table = self.open_elements[..index]
                        .iter()
                        .rev()
                        .take_while(|ancestor| !ancestor.is("template"))
                        .any(|ancestor| ancestor.is("table"));
                    if in_table {
                        InsertionMode::InSelectInTable
                    } else {
                        InsertionMode::InSelect
                    }
                }
                // STEP 5: "If node is a td or th element and last is false, then switch
                // the insertion mode to "in cell" and return."
                "td" | "th" if !last => InsertionMode::InCell,
                // STEP 6: "If node is a tr element"
                "tr" => InsertionMode::InRow,
                // STEP 7: "If node is a tbody, thead, or tfoot element"
                "tbody" | "thead" | "tfoot" => InsertionMode::InTableBody,
                // STEP 8: "If node is a caption element"
                "caption" => InsertionMode::InCaption,
                // STEP 9: "If node is a colgroup element"
                "colgroup" => InsertionMode::InColumnGroup,
                // STEP 10: "If node is a table element"
                "table" => InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the insertion mode
                // to the current template insertion mode and return."
                "template" => match self.template_modes.last() {
                    Some(&mode) => mode,
                    None => InsertionMode::InBody,
                },
                // STEP 12: "If node is a head element and last is false, then switch the
                // insertion mode to "in head" and return."
                "head" if !last => InsertionMode::InHead,
                // STEP 13: "If node is a body element"
                "body" => InsertionMode::InBody,
                // STEP 14: "If node is a frameset element"
                "frameset" => InsertionMode::InFrameset,
                // STEP 15: "If node is an html element"
                "html" => {
                    if self.head_element.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    }
                }
                _ => {
                    // STEP 16: "If last is true, then switch the insertion mode to "in
                    // body" and return."
                    if last {
                        break;
                    }
                    continue;
                }
            };
            self.mode = mode;
            return;
        }
        self.mode = InsertionMode::InBody;
    }

    // ===== List of active formatting elements =====

    /// Index of `handle` in the list of active formatting elements.
    pub(super) fn formatting_position(&self, handle: &S::Handle) -> Option<usize> {
        self.active_formatting.iter().rposition(|entry| {
            matches!(entry, FormattingEntry::Element { handle: h, .. } if h == handle)
        })
    }

    /// The last formatting element called `name` after the last marker.
    pub(super) fn formatting_element_after_marker(&self, name: &str) -> Option<usize> {
        for (index, entry) in self.active_formatting.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { tag, .. } if tag.name == name => return Some(index),
                FormattingEntry::Element { .. } => {}
            }
        }
        None
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub(super) fn push_formatting_marker(&mut self) {
        self.active_formatting.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    pub(super) fn push_formatting_element(&mut self, handle: S::Handle, tag: &Tag) {
        // STEP 1: "If there are already three elements in the list of active
        // formatting elements after the last marker, if any, or anywhere in the list
        // if there are no markers, that have the same tag name, namespace, and
        // attributes as element, then remove the earliest such element from the list
        // of active formatting elements."
        let mut same = Vec::new();
        for (index, entry) in self.active_formatting.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element { tag: other, .. } => {
                    if other.name == tag.name && same_attributes(other, tag) {
                        same.push(index);
                    }
                }
            }
        }
        if same.len() >= NOAHS_ARK_LIMIT
            && let Some(&earliest) = same.last()
        {
            let _ = self.active_formatting.remove(earliest);
        }
        // STEP 2: "Add element to the list of active formatting elements."
        self.active_formatting.push(FormattingEntry::Element {
            handle,
            tag: tag.clone(),
        });
    }

    /// Remove `handle` from the list of active formatting elements.
    pub(super) fn remove_from_formatting(&mut self, handle: &S::Handle) {
        if let Some(index) = self.formatting_position(handle) {
            let _ = self.active_formatting.remove(index);
        }
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_active_formatting_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(super) fn reconstruct_active_formatting(&mut self) -> Result<()> {
        // STEP 1: "If there are no entries in the list of active formatting elements,
        // then there is nothing to reconstruct; stop this algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of active
        // formatting elements is a marker, or if it is an element that is in the
        // stack of open elements, then there is nothing to reconstruct"
        let is_open = |entry: &FormattingEntry<S::Handle>| match entry {
            FormattingEntry::Marker => true,
            FormattingEntry::Element { handle, .. } => self.stack_position(handle).is_some(),
        };
        match self.active_formatting.last() {
            None => return Ok(()),
            Some(entry) if is_open(entry) => return Ok(()),
            Some(_) => {}
        }

        // STEP 4-6 "Rewind": step back while the entry before is neither a marker
        // nor an open element.
        let mut index = self.active_formatting.len() - 1;
        while index > 0 && !is_open(&self.active_formatting[index - 1]) {
            index -= 1;
        }

        // STEP 7-10 "Advance" / "Create": recreate each entry from there on.
        for entry_index in index..self.active_formatting.len() {
            let FormattingEntry::Element { tag, .. } = &self.active_formatting[entry_index] else {
                continue;
            };
            let tag = tag.clone();
            // STEP 8: "Create: Insert an HTML element for the token for which the
            // element entry was created, to obtain new element."
            let handle = self.insert_html_element(&tag)?;
            // STEP 9: "Replace the entry for entry in the list with an entry for new
            // element."
            self.active_formatting[entry_index] = FormattingEntry::Element { handle, tag };
        }
        Ok(())
    }

    // ===== Adoption agency =====

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Returns `false` when the caller should "act as described in the "any
    /// other end tag" entry".
    pub(super) fn run_adoption_agency(&mut self, subject: &str) -> Result<bool> {
        // STEP 2: "If the current node is an HTML element whose tag name is subject,
        // and the current node is not in the list of active formatting elements,
        // then pop the current node off the stack of open elements and return."
        if let Some(current) = self.current_node()
            && current.is(subject)
            && self.formatting_position(&current.handle).is_none()
        {
            let _ = self.pop();
            return Ok(true);
        }

        // STEP 3: "Let outer loop counter be 0."
        // STEP 4: "While true:"
        for _ in 0..ADOPTION_OUTER_LOOP_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the list of
            // active formatting elements that: is between the end of the list and the
            // last marker in the list, if any, or the start of the list otherwise,
            // and has the tag name subject."
            // "If there is no such element, then return and instead act as described
            // in the "any other end tag" entry above."
            let Some(formatting_index) = self.formatting_element_after_marker(subject) else {
                return Ok(false);
            };
            let FormattingEntry::Element {
                handle: formatting_handle,
                tag: formatting_tag,
            } = self.active_formatting[formatting_index].clone()
            else {
                return Ok(false);
            };

            // STEP 4.4: "If formatting element is not in the stack of open elements,
            // then this is a parse error; remove the element from the list, and return."
            let Some(formatting_stack_index) = self.stack_position(&formatting_handle) else {
                self.parse_error(TreeBuilderError::MissingElementInOpenElementsStack);
                let _ = self.active_formatting.remove(formatting_index);
                return Ok(true);
            };

            // STEP 4.5: "If formatting element is in the stack of open elements, but
            // the element is not in scope, then this is a parse error; return."
            if !self.handle_in_scope(&formatting_handle) {
                self.parse_error(TreeBuilderError::MissingElementInScope);
                return Ok(true);
            }

            // STEP 4.6: "If formatting element is not the current node, this is a
            // parse error. (But do not return.)"
            if formatting_stack_index + 1 != self.open_elements.len() {
                self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of open
            // elements that is lower in the stack than formatting element, and is an
            // element in the special category."
            let furthest_index = (formatting_stack_index + 1..self.open_elements.len())
                .find(|&index| is_special(&self.open_elements[index]));

            // STEP 4.8: "If there is no furthest block, then the UA must first pop all
            // the nodes from the bottom of the stack of open elements, from the current
            // node up to and including formatting element, then remove formatting
            // element from the list of active formatting elements, and finally return."
            let Some(furthest_index) = furthest_index else {
                self.open_elements.truncate(formatting_stack_index);
                let _ = self.active_formatting.remove(formatting_index);
                return Ok(true);
            };
            let furthest_block = self.open_elements[furthest_index].handle.clone();

            // STEP 4.9: "Let common ancestor be the element immediately above
            // formatting element in the stack of open elements."
            let common_ancestor_index = formatting_stack_index.saturating_sub(1);

            // STEP 4.10: "Let a bookmark note the position of formatting element in
            // the list of active formatting elements relative to the elements on
            // either side of it in the list."
            let mut bookmark = formatting_index;

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = furthest_index;
            let mut last_node = furthest_block.clone();

            // STEP 4.13: "Inner loop"
            let mut inner_loop_counter = 0;
            loop {
                // STEP 4.13.1: "Increment inner loop counter by 1."
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node in the
                // stack of open elements, or if node is no longer in the stack of open
                // elements (e.g. because it got removed by this algorithm), the element
                // that was immediately above node in the stack of open elements before
                // node was removed."
                node_index -= 1;
                let node = self.open_elements[node_index].handle.clone();

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_handle {
                    break;
                }

                // STEP 4.13.4: "If inner loop counter is greater than 3 and node is in
                // the list of active formatting elements, then remove node from the
                // list of active formatting elements."
                if inner_loop_counter > ADOPTION_INNER_LOOP_LIMIT
                    && let Some(index) = self.formatting_position(&node)
                {
                    let _ = self.active_formatting.remove(index);
                    if bookmark > index {
                        bookmark -= 1;
                    }
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                // elements, then remove node from the stack of open elements and
                // continue."
                let Some(node_formatting_index) = self.formatting_position(&node) else {
                    let _ = self.open_elements.remove(node_index);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the element
                // node was created, in the HTML namespace, with common ancestor as the
                // intended parent; replace the entry for node in the list of active
                // formatting elements with an entry for the new element, replace the
                // entry for node in the stack of open elements with an entry for the
                // new element, and let node be the new element."
                let FormattingEntry::Element { tag, .. } =
                    self.active_formatting[node_formatting_index].clone()
                else {
                    continue;
                };
                let element = self.create_element_for(&tag, Namespace::Html)?;
                let new_node = element.handle.clone();
                self.active_formatting[node_formatting_index] = FormattingEntry::Element {
                    handle: new_node.clone(),
                    tag,
                };
                self.open_elements[node_index] = element;

                // STEP 4.13.7: "If last node is furthest block, then move the
                // aforementioned bookmark to be immediately after the new node in the
                // list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_formatting_index + 1;
                }

                // STEP 4.13.8: "Append last node to node."
                self.sink.remove_from_parent(&last_node)?;
                self.sink.append(&new_node, NodeOrText::Node(last_node.clone()))?;

                // STEP 4.13.9: "Set last node to node."
                last_node = new_node;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the previous
            // step at the appropriate place for inserting a node, but using common
            // ancestor as the override target."
            self.sink.remove_from_parent(&last_node)?;
            let place = self.appropriate_place(Some(common_ancestor_index));
            self.insert_at(place, NodeOrText::Node(last_node))?;

            // STEP 4.15: "Create an element for the token for which formatting
            // element was created, in the HTML namespace, with furthest block as the
            // intended parent."
            let element = self.create_element_for(&formatting_tag, Namespace::Html)?;
            let new_element = element.handle.clone();

            // STEP 4.16: "Take all of the child nodes of furthest block and append
            // them to the element created in the last step."
            self.sink.reparent_children(&furthest_block, &new_element)?;

            // STEP 4.17: "Append that new element to furthest block."
            self.sink
                .append(&furthest_block, NodeOrText::Node(new_element.clone()))?;

            // STEP 4.18: "Remove formatting element from the list of active formatting
            // elements, and insert the new element into the list of active formatting
            // elements at the position of the aforementioned bookmark."
            if let Some(index) = self.formatting_position(&formatting_handle) {
                let _ = self.active_formatting.remove(index);
                if bookmark > index {
                    bookmark -= 1;
                }
            }
            let bookmark = bookmark.min(self.active_formatting.len());
            self.active_formatting.insert(
                bookmark,
                FormattingEntry::Element {
                    handle: new_element,
                    tag: formatting_tag,
                },
            );

            // STEP 4.19: "Remove formatting element from the stack of open elements,
            // and insert the new element into the stack of open elements immediately
            // below the position of furthest block in that stack."
            self.remove_from_stack(&formatting_handle);
            if let Some(position) = self.stack_position(&furthest_block) {
                self.open_elements.insert(position + 1, element);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.7 "in body"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    pub(super) fn any_other_end_tag(&mut self, name: &str) {
        // STEP 1: "Initialize node to be the current node (the bottommost node of the
        // stack)."
        for index in (0..self.open_elements.len()).rev() {
            let node = &self.open_elements[index];
            // STEP 2: "Loop: If node is an HTML element with the same tag name as the
            // token, then:"
            if node.is(name) {
                // "Generate implied end tags, except for HTML elements with the same
                // tag name as the token."
                self.generate_implied_end_tags(Some(name));
                // "If node is not the current node, then this is a parse error."
                if self.open_elements.len() != index + 1 {
                    self.parse_error(TreeBuilderError::UnexpectedElementInOpenElementsStack);
                }
                // "Pop all the nodes from the current node up to node, including node,
                // then stop these steps."
                self.open_elements.truncate(index);
                return;
            }
            // STEP 3: "Otherwise, if node is in the special category, then this is a
            // parse error; ignore the token, and return."
            if is_special(node) {
                self.parse_error(TreeBuilderError::UnexpectedClosedToken);
                return;
            }
        }
    }
}

/// "the same tag name, namespace, and attributes": attribute order does not
/// matter.
fn same_attributes(a: &Tag, b: &Tag) -> bool {
    a.attributes.len() == b.attributes.len()
        && a
            .attributes
            .iter()
            .all(|attr| b.attribute(&attr.name) == Some(attr.value.as_str()))
}
