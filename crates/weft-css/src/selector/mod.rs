//! CSS selector parsing and serialization.
//!
//! This module implements selector parsing per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! A parse produces [`Selectors`]: an arena of [`SelectorList`]s. The
//! top-level list is [`Selectors::root`]; lists nested in functional
//! pseudo-classes such as `:is()` are referenced by [`ListId`]. Nested lists
//! are always stored before the list that refers to them, so the arena can
//! be walked bottom-up without recursion however deep the nesting goes.
//!
//! ```
//! use weft_css::selector::{SelectorParser, Specificity};
//!
//! let mut parser = SelectorParser::new();
//! let selectors = parser.parse_list(":is(div, 1%, span) > a")?;
//! assert_eq!(selectors.to_css()?, ":is(div, span) > a");
//! assert_eq!(selectors.specificities(), [Specificity(0, 0, 2)]);
//! assert_eq!(parser.log().len(), 1);
//! # Ok::<(), weft_common::Status>(())
//! ```

/// Selector parser.
pub mod parser;
/// Pseudo-class and pseudo-element tables.
pub mod pseudo;
/// Selector serialization.
pub mod serialize;
/// Specificity calculation.
pub mod specificity;

use serde::Serialize;

pub use parser::SelectorParser;
pub use pseudo::{FunctionArgument, PseudoClass, PseudoClassFunction, PseudoElement};
pub use serialize::serialize_selectors;
pub use specificity::Specificity;

use crate::syntax::AnB;

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
///
/// Each [`Component`] carries the combinator that links it to the
/// component before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two compound selectors."
    Descendant,
    /// No combinator: both simple selectors belong to the same compound
    /// selector, as in `a.b`.
    Close,
    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators) `>`
    Child,
    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators) `+`
    NextSibling,
    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators) `~`
    SubsequentSibling,
    /// [§ 17.1](https://www.w3.org/TR/selectors-4/#the-column-combinator) `||`
    Column,
}

/// [§ 6.1.1 Namespaces](https://www.w3.org/TR/selectors-4/#type-nmsp)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NsPrefix {
    /// `*|`: "elements in any namespace, including elements without a namespace".
    Any,
    /// `|`: "elements without a namespace".
    None,
    /// `ns|`: elements in the namespace bound to the prefix.
    Named(String),
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeOperator {
    /// `[att=val]`: "whose value is exactly 'val'".
    Equal,
    /// `[att~=val]`: "a whitespace-separated list of words, one of which is exactly 'val'".
    Include,
    /// `[att|=val]`: "either being exactly 'val' or beginning with 'val' immediately followed by '-'".
    Dash,
    /// `[att^=val]`: "begins with the prefix 'val'".
    Prefix,
    /// `[att$=val]`: "ends with the suffix 'val'".
    Suffix,
    /// `[att*=val]`: "contains at least one instance of the substring 'val'".
    Substring,
}

impl AttributeOperator {
    /// The operator as written in CSS.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::Include => "~=",
            Self::Dash => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// [§ 6.5 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeModifier {
    /// No flag given.
    #[default]
    Unset,
    /// `i`: match the value ASCII case-insensitively.
    CaseInsensitive,
    /// `s`: match the value case-sensitively.
    CaseSensitive,
}

/// An attribute selector such as `[ns|lang|="en" i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeSelector {
    /// Namespace prefix, if one was written.
    pub ns: Option<NsPrefix>,
    /// Attribute name.
    pub name: String,
    /// Operator and value; `None` for `[att]`.
    pub value: Option<(AttributeOperator, String)>,
    /// Case-sensitivity flag.
    pub modifier: AttributeModifier,
}

/// Handle of a [`SelectorList`] inside [`Selectors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ListId(pub(crate) usize);

impl ListId {
    /// Position of the list in [`Selectors::lists`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Argument of a functional pseudo-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PseudoArgument {
    /// A selector list, as in `:is(a, b)`.
    List(ListId),
    /// `An+B`, optionally with `of S`.
    AnB {
        /// The index pattern.
        anb: AnB,
        /// The `of` selector list.
        of: Option<ListId>,
    },
}

/// [§ 4.1 Simple selectors](https://www.w3.org/TR/selectors-4/#simple)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimpleSelector {
    /// [§ 5.2](https://www.w3.org/TR/selectors-4/#the-universal-selector) `*`, `ns|*`
    Universal {
        /// Namespace prefix, if one was written.
        ns: Option<NsPrefix>,
    },
    /// [§ 5.1](https://www.w3.org/TR/selectors-4/#type-selectors) `div`, `ns|div`
    Type {
        /// Namespace prefix, if one was written.
        ns: Option<NsPrefix>,
        /// Element name.
        name: String,
    },
    /// [§ 6.7](https://www.w3.org/TR/selectors-4/#id-selectors) `#id`
    Id(String),
    /// [§ 6.6](https://www.w3.org/TR/selectors-4/#class-html) `.class`
    Class(String),
    /// [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors) `[att=val]`
    Attribute(AttributeSelector),
    /// `:hover`
    PseudoClass(PseudoClass),
    /// `:is(...)`, `:nth-child(...)`
    PseudoClassFunction {
        /// Which function.
        function: PseudoClassFunction,
        /// Its parsed argument.
        argument: PseudoArgument,
    },
    /// `::before`
    PseudoElement(PseudoElement),
}

/// A simple selector and the combinator linking it to the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Component {
    /// Relation to the previous component, or the leading combinator for
    /// the first component of a relative selector.
    pub combinator: Combinator,
    /// The simple selector.
    pub simple: SimpleSelector,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a sequence of one or more compound selectors
/// separated by combinators."
///
/// Components are stored left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ComplexSelector {
    /// Simple selectors with their combinators.
    pub components: Vec<Component>,
}

impl ComplexSelector {
    /// The compound selectors, left to right.
    pub fn compounds(&self) -> impl Iterator<Item = &[Component]> {
        self.components
            .chunk_by(|_, next| next.combinator == Combinator::Close)
    }

    /// [§ 4.3](https://www.w3.org/TR/selectors-4/#complex)
    /// "The elements represented by a complex selector are the elements
    /// matched by the last compound selector in the complex selector."
    #[must_use]
    pub fn subject(&self) -> &[Component] {
        self.compounds().last().unwrap_or(&[])
    }
}

/// [§ 4.4 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SelectorList {
    /// Members in source order.
    pub selectors: Vec<ComplexSelector>,
    /// Whether the members are relative selectors (`> a`, `+ b`).
    pub relative: bool,
}

/// Result of a selector parse: the top-level list plus every nested list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selectors {
    lists: Vec<SelectorList>,
    root: ListId,
}

impl Selectors {
    pub(crate) const fn new(lists: Vec<SelectorList>, root: ListId) -> Self {
        Self { lists, root }
    }

    /// The top-level selector list.
    #[must_use]
    pub fn root(&self) -> &SelectorList {
        &self.lists[self.root.0]
    }

    /// A nested list.
    ///
    /// # Panics
    ///
    /// Panics if `id` comes from a different [`Selectors`].
    #[must_use]
    pub fn list(&self, id: ListId) -> &SelectorList {
        &self.lists[id.0]
    }

    /// Every list, nested lists first.
    #[must_use]
    pub fn lists(&self) -> &[SelectorList] {
        &self.lists
    }

    /// Number of top-level complex selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root().selectors.len()
    }

    /// Whether the top-level list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root().selectors.is_empty()
    }
}
