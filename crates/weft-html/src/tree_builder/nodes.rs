//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use log::debug;
use weft_common::Result;

use super::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
    adjust_svg_tag_name,
};
use super::{
    ElementAttribute, InsertionPoint, Namespace, NodeOrText, OpenElement, TreeBuilder,
    TreeBuilderError, TreeSink,
};
use crate::tokenizer::Tag;

impl<S: TreeSink> TreeBuilder<S> {
    /// Record a parse error at the current token.
    pub(super) fn parse_error(&mut self, code: TreeBuilderError) {
        debug!(target: "html.tree", "parse error {code} at {} in {}", self.position, self.mode);
        self.errors.push(code, self.position);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<&OpenElement<S::Handle>> {
        self.open_elements.last()
    }

    /// Whether the current node is the HTML element `name`.
    pub(super) fn current_node_is(&self, name: &str) -> bool {
        self.current_node().is_some_and(|node| node.is(name))
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// `override_target` is an index into the stack of open elements.
    pub(super) fn appropriate_place(&self, override_target: Option<usize>) -> InsertionPoint<S::Handle> {
        // STEP 1: "If there was an override target specified, then let target be the
        // override target. Otherwise, let target be the current node."
        let Some(target_index) = override_target.or_else(|| self.open_elements.len().checked_sub(1))
        else {
            return InsertionPoint::AppendTo(self.sink.document());
        };
        let target = &self.open_elements[target_index];

        // STEP 2: "If foster parenting is enabled and target is a table, tbody, tfoot,
        // thead, or tr element"
        let place = if self.foster_parenting
            && target.is_one_of(&["table", "tbody", "tfoot", "thead", "tr"])
        {
            self.foster_parent_place()
        } else {
            // "Otherwise: Let adjusted insertion location be inside target, after its
            // last child (if any)."
            InsertionPoint::AppendTo(target.handle.clone())
        };

        // STEP 3: "If the adjusted insertion location is inside a template element,
        // let it instead be inside the template element's template contents, after
        // its last child (if any)."
        match place {
            InsertionPoint::AppendTo(parent) if self.is_template(&parent) => {
                InsertionPoint::AppendTo(self.sink.template_contents(&parent))
            }
            other => other,
        }
    }

    /// The foster-parenting branch of the appropriate place.
    fn foster_parent_place(&self) -> InsertionPoint<S::Handle> {
        // "Let last template be the last template element in the stack of open
        // elements, if any."
        let last_template = self.open_elements.iter().rposition(|e| e.is("template"));
        // "Let last table be the last table element in the stack of open elements,
        // if any."
        let last_table = self.open_elements.iter().rposition(|e| e.is("table"));

        match (last_template, last_table) {
            // "If there is a last template and either there is no last table, or
            // there is one, but last template is lower (more recently added) than
            // last table in the stack of open elements, then: let adjusted insertion
            // location be inside last template's template contents"
            (Some(template), table) if table.is_none_or(|table| template > table) => {
                InsertionPoint::AppendTo(self.open_elements[template].handle.clone())
            }
            // "If there is no last table, then let adjusted insertion location be
            // inside the first element in the stack of open elements (the html
            // element), after its last child (if any)"
            (_, None) => InsertionPoint::AppendTo(self.open_elements[0].handle.clone()),
            (_, Some(table)) => {
                let table_handle = &self.open_elements[table].handle;
                // "If last table has a parent node, then let adjusted insertion
                // location be inside last table's parent node, immediately before
                // last table"
                if self.sink.parent(table_handle).is_some() {
                    InsertionPoint::Before(table_handle.clone())
                } else {
                    // "Let previous element be the element immediately above last
                    // table in the stack of open elements."
                    let previous = &self.open_elements[table.saturating_sub(1)];
                    InsertionPoint::AppendTo(previous.handle.clone())
                }
            }
        }
    }

    fn is_template(&self, handle: &S::Handle) -> bool {
        self.open_elements
            .iter()
            .rev()
            .any(|e| e.handle == *handle && e.is("template"))
    }

    /// Put a node or text at an insertion point.
    pub(super) fn insert_at(
        &mut self,
        place: InsertionPoint<S::Handle>,
        child: NodeOrText<S::Handle>,
    ) -> Result<()> {
        match place {
            InsertionPoint::AppendTo(parent) => self.sink.append(&parent, child),
            InsertionPoint::Before(sibling) => self.sink.insert_before(&sibling, child),
        }
    }

    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Applies the SVG and MathML name adjustments, then asks the sink for
    /// the node. The element is not inserted.
    pub(super) fn create_element_for(
        &mut self,
        tag: &Tag,
        namespace: Namespace,
    ) -> Result<OpenElement<S::Handle>> {
        let mut attributes: Vec<ElementAttribute> = tag
            .attributes
            .iter()
            .map(|attr| ElementAttribute::new(attr.name.clone(), attr.value.clone()))
            .collect();
        let mut name = tag.name.clone();
        match namespace {
            Namespace::Html => {}
            Namespace::MathMl => {
                adjust_mathml_attributes(&mut attributes);
                adjust_foreign_attributes(&mut attributes);
            }
            Namespace::Svg => {
                if let Some(adjusted) = adjust_svg_tag_name(&name) {
                    name = adjusted.to_string();
                }
                adjust_svg_attributes(&mut attributes);
                adjust_foreign_attributes(&mut attributes);
            }
        }

        // [§ 13.2.6.2 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
        let html_integration_point = match namespace {
            Namespace::Html => false,
            // "A MathML annotation-xml element whose start tag token had an attribute
            // with the name "encoding" whose value was an ASCII case-insensitive match
            // for the string "text/html" / "application/xhtml+xml""
            Namespace::MathMl => {
                name == "annotation-xml"
                    && tag.attribute("encoding").is_some_and(|encoding| {
                        encoding.eq_ignore_ascii_case("text/html")
                            || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                    })
            }
            // "An SVG foreignObject element", "An SVG desc element", "An SVG title element"
            Namespace::Svg => matches!(name.as_str(), "foreignObject" | "desc" | "title"),
        };

        let handle = self.sink.create_element(namespace, &name, attributes)?;
        Ok(OpenElement {
            handle,
            namespace,
            name,
            html_integration_point,
        })
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// Creates the element, inserts it at the appropriate place and pushes
    /// it onto the stack of open elements.
    pub(super) fn insert_element(&mut self, tag: &Tag, namespace: Namespace) -> Result<S::Handle> {
        // STEP 1: "Let the adjusted insertion location be the appropriate place for
        // inserting a node."
        let place = self.appropriate_place(None);
        // STEP 2: "Let element be the result of creating an element for the token"
        let element = self.create_element_for(tag, namespace)?;
        let handle = element.handle.clone();
        // STEP 3: "If it is possible to insert element at the adjusted insertion
        // location, then insert element at the adjusted insertion location."
        self.insert_at(place, NodeOrText::Node(handle.clone()))?;
        // STEP 4: "Push element onto the stack of open elements so that it is the
        // new current node."
        self.open_elements.push(element);
        Ok(handle)
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(super) fn insert_html_element(&mut self, tag: &Tag) -> Result<S::Handle> {
        self.insert_element(tag, Namespace::Html)
    }

    /// Insert a synthetic HTML element with no attributes, as for an implied
    /// `<head>` or `<tbody>`.
    pub(super) fn insert_html_element_named(&mut self, name: &str) -> Result<S::Handle> {
        self.insert_element(&Tag::named(name), Namespace::Html)
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_text(&mut self, data: &str) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        // STEP 2: "Let the adjusted insertion location be the appropriate place for
        // inserting a node."
        let place = self.appropriate_place(None);
        // STEP 3: "If the adjusted insertion location is in a Document node, then
        // return."
        if place == InsertionPoint::AppendTo(self.sink.document()) {
            return Ok(());
        }
        self.insert_at(place, NodeOrText::Text(data.to_string()))
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(super) fn insert_comment(&mut self, data: &str) -> Result<()> {
        let place = self.appropriate_place(None);
        let comment = self.sink.create_comment(data)?;
        self.insert_at(place, NodeOrText::Node(comment))
    }

    /// "Insert a comment as the last child of" `parent`.
    pub(super) fn append_comment_to(&mut self, parent: &S::Handle, data: &str) -> Result<()> {
        let comment = self.sink.create_comment(data)?;
        self.sink.append(parent, NodeOrText::Node(comment))
    }

    /// Insert a comment as the last child of the Document.
    pub(super) fn append_comment_to_document(&mut self, data: &str) -> Result<()> {
        let document = self.sink.document();
        self.append_comment_to(&document, data)
    }

    /// Insert a comment as the last child of the `html` element.
    pub(super) fn append_comment_to_html(&mut self, data: &str) -> Result<()> {
        match self.open_elements.first().map(|e| e.handle.clone()) {
            Some(html) => self.append_comment_to(&html, data),
            None => self.append_comment_to_document(data),
        }
    }

    /// [§ 13.2.6.2 Generic raw text / RCDATA element parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "Insert an HTML element for the token. If the algorithm that was invoked
    /// is the generic raw text element parsing algorithm, switch the tokenizer
    /// to the RAWTEXT state; otherwise the algorithm invoked was the generic
    /// RCDATA element parsing algorithm, switch the tokenizer to the RCDATA
    /// state. Let the original insertion mode be the current insertion mode.
    /// Then, switch the insertion mode to "text"."
    pub(super) fn parse_text_element(
        &mut self,
        tag: &Tag,
        state: crate::tokenizer::TokenizerState,
    ) -> Result<()> {
        let _ = self.insert_html_element(tag)?;
        self.next_tokenizer_state = Some(state);
        self.original_mode = self.mode;
        self.mode = super::InsertionMode::Text;
        Ok(())
    }
}
