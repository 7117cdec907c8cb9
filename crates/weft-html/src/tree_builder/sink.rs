//! The tree collaborator the tree builder drives.
//!
//! The tree builder decides *what* to create and where; a [`TreeSink`]
//! owns the nodes. `weft-dom` provides an arena implementation.

use strum_macros::{Display, IntoStaticStr};
use weft_common::Result;

/// [§ 2.1.3 Namespaces](https://infra.spec.whatwg.org/#namespaces)
///
/// Element namespaces the HTML parser can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Namespace {
    /// "The HTML namespace is "http://www.w3.org/1999/xhtml"."
    #[strum(serialize = "html")]
    Html,
    /// "The MathML namespace is "http://www.w3.org/1998/Math/MathML"."
    #[strum(serialize = "math")]
    MathMl,
    /// "The SVG namespace is "http://www.w3.org/2000/svg"."
    #[strum(serialize = "svg")]
    Svg,
}

impl Namespace {
    /// The namespace URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::Svg => "http://www.w3.org/2000/svg",
        }
    }
}

/// Namespaces of the attributes "adjust foreign attributes" produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum AttributeNamespace {
    /// "http://www.w3.org/1999/xlink", prefix `xlink`.
    XLink,
    /// "http://www.w3.org/XML/1998/namespace", prefix `xml`.
    Xml,
    /// "http://www.w3.org/2000/xmlns/", prefix `xmlns`.
    Xmlns,
}

/// An attribute as stored on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAttribute {
    /// `None` for attributes in no namespace, which is all HTML attributes.
    pub namespace: Option<AttributeNamespace>,
    /// The local name, with SVG and MathML case adjustments applied.
    pub name: String,
    /// The value.
    pub value: String,
}

impl ElementAttribute {
    /// An attribute in no namespace.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// The document mode the DOCTYPE selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum QuirksMode {
    /// "no-quirks mode"
    #[default]
    NoQuirks,
    /// "limited-quirks mode"
    LimitedQuirks,
    /// "quirks mode"
    Quirks,
}

/// A child to insert: a node the sink created, or text to merge into an
/// adjacent text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrText<H> {
    /// An element or comment.
    Node(H),
    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data." Otherwise a new
    /// Text node is created.
    Text(String),
}

/// Node storage and mutation, as the tree-construction rules need it.
///
/// Every mutating call may fail with [`weft_common::Status::MemoryAllocation`];
/// the tree builder stops at the first error and returns it.
pub trait TreeSink {
    /// A reference to a node. Compared to find elements in the parser's
    /// stacks.
    type Handle: Clone + PartialEq;

    /// The Document node.
    fn document(&self) -> Self::Handle;

    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// A `template` element in the HTML namespace gets its template contents
    /// fragment here.
    ///
    /// # Errors
    /// If the node cannot be stored.
    fn create_element(
        &mut self,
        namespace: Namespace,
        name: &str,
        attributes: Vec<ElementAttribute>,
    ) -> Result<Self::Handle>;

    /// Create a Comment node.
    ///
    /// # Errors
    /// If the node cannot be stored.
    fn create_comment(&mut self, data: &str) -> Result<Self::Handle>;

    /// "Append a DocumentType node to the Document node, with its name set to
    /// the name given in the DOCTYPE token, or the empty string if the name
    /// was missing; its public ID set to the public identifier given in the
    /// DOCTYPE token, or the empty string if the public identifier was
    /// missing; and its system ID set to the system identifier given in the
    /// DOCTYPE token, or the empty string if the system identifier was
    /// missing."
    ///
    /// # Errors
    /// If the node cannot be stored.
    fn append_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> Result<()>;

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    /// If the node cannot be stored.
    fn append(&mut self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) -> Result<()>;

    /// Insert `child` immediately before `sibling`, which has a parent.
    ///
    /// # Errors
    /// If the node cannot be stored.
    fn insert_before(
        &mut self,
        sibling: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) -> Result<()>;

    /// The parent of `node`, if it has one.
    fn parent(&self, node: &Self::Handle) -> Option<Self::Handle>;

    /// The template contents of a `template` element.
    fn template_contents(&self, template: &Self::Handle) -> Self::Handle;

    /// Add each attribute whose name `target` does not already carry.
    ///
    /// # Errors
    /// If the attributes cannot be stored.
    fn add_attributes_if_missing(
        &mut self,
        target: &Self::Handle,
        attributes: Vec<ElementAttribute>,
    ) -> Result<()>;

    /// Detach `target` from its parent, if any.
    ///
    /// # Errors
    /// Sinks that cannot fail return `Ok`.
    fn remove_from_parent(&mut self, target: &Self::Handle) -> Result<()>;

    /// Move all children of `node` to the end of `new_parent`.
    ///
    /// # Errors
    /// Sinks that cannot fail return `Ok`.
    fn reparent_children(&mut self, node: &Self::Handle, new_parent: &Self::Handle)
    -> Result<()>;

    /// "Set the Document to quirks mode" and friends.
    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        let _ = mode;
    }
}
