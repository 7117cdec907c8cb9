//! HTML tree construction.
//!
//! Implements [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction):
//! the insertion-mode dispatcher, the stack of open elements, the list of
//! active formatting elements, foster parenting and foreign content.
//!
//! The builder never owns nodes. It tells a [`TreeSink`] what to create and
//! where to put it, and keeps only handles plus the element names and
//! namespaces its rules need.

mod after;
mod body;
/// Tree-construction parse error codes.
pub mod error;
/// SVG and MathML adjustments.
pub mod foreign_content;
mod foreign;
mod head;
mod initial;
mod nodes;
mod quirks;
mod select;
/// The tree collaborator trait.
pub mod sink;
mod stack;
mod table;

pub use error::TreeBuilderError;
pub use sink::{AttributeNamespace, ElementAttribute, Namespace, NodeOrText, QuirksMode, TreeSink};

use log::trace;
use strum_macros::Display;
use weft_common::{ParseError, ParseErrors, Result};

use crate::tokenizer::{Tag, Text, Token, TokenSink, TokenSinkResult, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// Tree builder configuration.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilderOptions {
    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise." It decides whether `<noscript>`
    /// content is raw text.
    pub scripting: bool,
    /// The document is an `iframe` `srcdoc` document: a missing DOCTYPE is
    /// not an error and never selects quirks mode.
    pub iframe_srcdoc: bool,
    /// Use this document mode regardless of the DOCTYPE.
    pub quirks_mode: Option<QuirksMode>,
    /// Do not append DOCTYPE nodes to the document.
    pub drop_doctype: bool,
}

impl TreeBuilderOptions {
    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Parse as an `iframe` `srcdoc` document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self, srcdoc: bool) -> Self {
        self.iframe_srcdoc = srcdoc;
        self
    }

    /// Force a document mode.
    #[must_use]
    pub const fn with_quirks_mode(mut self, mode: QuirksMode) -> Self {
        self.quirks_mode = Some(mode);
        self
    }

    /// Leave DOCTYPE nodes out of the tree.
    #[must_use]
    pub const fn with_drop_doctype(mut self, drop: bool) -> Self {
        self.drop_doctype = drop;
        self
    }
}

/// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
///
/// An entry of the stack: the sink's handle plus what the rules ask about
/// the element.
#[derive(Debug, Clone)]
struct OpenElement<H> {
    handle: H,
    namespace: Namespace,
    /// Local name, with SVG case adjustments applied.
    name: String,
    /// [§ 13.2.6.2 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    ///
    /// Set for SVG `foreignObject`, `desc` and `title`, and for MathML
    /// `annotation-xml` with an HTML `encoding`.
    html_integration_point: bool,
}

impl<H> OpenElement<H> {
    /// An HTML element called `name`.
    fn is(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }

    /// An HTML element with one of `names`.
    fn is_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.name.as_str())
    }

    /// [§ 13.2.6.2 MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
    fn is_mathml_text_integration_point(&self) -> bool {
        self.namespace == Namespace::MathMl && foreign_content::is_text_integration_point(&self.name)
    }
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
#[derive(Debug, Clone)]
enum FormattingEntry<H> {
    /// "A marker is an entry in the list of active formatting elements that
    /// is distinct from any element."
    Marker,
    /// A formatting element and the token it was created for, kept to
    /// recreate it.
    Element { handle: H, tag: Tag },
}

/// Where a node goes: appended to a parent, or in front of a sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InsertionPoint<H> {
    AppendTo(H),
    Before(H),
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Consumes tokens (it is the tokenizer's [`TokenSink`]) and drives a
/// [`TreeSink`].
pub struct TreeBuilder<S: TreeSink> {
    sink: S,
    options: TreeBuilderOptions,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    mode: InsertionMode,
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode"
    original_mode: InsertionMode,
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    /// "the stack of template insertion modes"
    template_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    open_elements: Vec<OpenElement<S::Handle>>,
    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    active_formatting: Vec<FormattingEntry<S::Handle>>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element: Option<S::Handle>,
    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    form_element: Option<S::Handle>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    frameset_ok: bool,
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    foster_parenting: bool,
    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "the pending table character tokens list"
    pending_table_text: String,
    /// A `<pre>`, `<listing>` or `<textarea>` start tag was just inserted;
    /// a line feed right after it is dropped.
    ignore_next_line_feed: bool,
    quirks_mode: QuirksMode,

    /// A tokenizer state change requested by the last token.
    next_tokenizer_state: Option<TokenizerState>,
    /// Source position of the token being processed.
    position: usize,
    errors: ParseErrors<TreeBuilderError>,
}

impl<S: TreeSink> TreeBuilder<S> {
    /// Create a tree builder in the initial insertion mode.
    pub fn new(sink: S, options: TreeBuilderOptions) -> Self {
        Self {
            sink,
            options,
            mode: InsertionMode::Initial,
            original_mode: InsertionMode::Initial,
            template_modes: Vec::new(),
            open_elements: Vec::new(),
            active_formatting: Vec::new(),
            head_element: None,
            form_element: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_text: String::new(),
            ignore_next_line_feed: false,
            quirks_mode: QuirksMode::NoQuirks,
            next_tokenizer_state: None,
            position: 0,
            errors: ParseErrors::new(),
        }
    }

    /// The sink the tree was built in.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Give up the builder and keep the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Tree-construction errors recorded so far.
    pub fn errors(&self) -> &[ParseError<TreeBuilderError>] {
        self.errors.as_slice()
    }

    /// The current insertion mode.
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.mode
    }

    /// The document mode chosen by the DOCTYPE (or the override).
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the
    /// tree construction dispatcher"
    fn process(&mut self, token: &Token) -> Result<()> {
        if let Token::Text(text) = token {
            if self.mode_splits_whitespace() && !self.uses_foreign_rules(token) {
                if let Some((whitespace, rest)) = split_leading_whitespace(text) {
                    self.process(&whitespace)?;
                    return self.process(&rest);
                }
            }
        }
        if self.uses_foreign_rules(token) {
            self.handle_in_foreign_content(token)
        } else {
            self.process_using(self.mode, token)
        }
    }

    /// "Process the token using the rules for the X insertion mode", without
    /// changing the insertion mode.
    fn process_using(&mut self, mode: InsertionMode, token: &Token) -> Result<()> {
        trace!(target: "html.tree", "{mode}: {token:?}");
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// "Switch the insertion mode to X and reprocess the token."
    fn reprocess_in(&mut self, mode: InsertionMode, token: &Token) -> Result<()> {
        self.mode = mode;
        self.process(token)
    }

    /// Modes whose rules treat leading whitespace differently from other
    /// characters. Text runs are split there so each rule sees one kind.
    const fn mode_splits_whitespace(&self) -> bool {
        matches!(
            self.mode,
            InsertionMode::Initial
                | InsertionMode::BeforeHtml
                | InsertionMode::BeforeHead
                | InsertionMode::InHead
                | InsertionMode::InHeadNoscript
                | InsertionMode::AfterHead
                | InsertionMode::InColumnGroup
                | InsertionMode::AfterBody
                | InsertionMode::AfterAfterBody
        )
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Whether the token is processed "according to the rules given in the
    /// section for parsing tokens in foreign content".
    fn uses_foreign_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        // "If the adjusted current node is an element in the HTML namespace"
        let Some(node) = self.open_elements.last() else {
            return false;
        };
        if node.namespace == Namespace::Html {
            return false;
        }
        match token {
            // "If the adjusted current node is a MathML text integration point and the
            // token is a start tag whose tag name is neither "mglyph" nor "malignmark""
            // "If the adjusted current node is an HTML integration point and the token is
            // a start tag"
            Token::StartTag(tag) => {
                if node.is_mathml_text_integration_point()
                    && tag.name != "mglyph"
                    && tag.name != "malignmark"
                {
                    return false;
                }
                // "If the adjusted current node is a MathML annotation-xml element and the
                // token is a start tag whose tag name is "svg""
                if node.namespace == Namespace::MathMl
                    && node.name == "annotation-xml"
                    && tag.name == "svg"
                {
                    return false;
                }
                !node.html_integration_point
            }
            // "If the adjusted current node is a MathML text integration point and the
            // token is a character token"
            // "If the adjusted current node is an HTML integration point and the token is
            // a character token"
            Token::Text(_) => {
                !(node.is_mathml_text_integration_point() || node.html_integration_point)
            }
            // "If the token is an end-of-file token"
            Token::EndOfFile { .. } => false,
            _ => true,
        }
    }
}

impl<S: TreeSink> TokenSink for TreeBuilder<S> {
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult> {
        self.position = token.span().start;
        let token = match token {
            // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "If the next token is a U+000A LINE FEED (LF) character token, then ignore
            // that token and move on to the next one."
            Token::Text(mut text) if std::mem::take(&mut self.ignore_next_line_feed) => {
                if text.data.starts_with('\n') {
                    let _ = text.data.remove(0);
                    text.span.start += 1;
                }
                if text.data.is_empty() {
                    return Ok(TokenSinkResult::Continue);
                }
                Token::Text(text)
            }
            other => {
                self.ignore_next_line_feed = false;
                other
            }
        };
        // [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
        // A self-closing flag that is never acknowledged is a parse error.
        if let Token::StartTag(tag) = &token
            && tag.self_closing
            && !is_void_element(&tag.name)
            && !matches!(tag.name.as_str(), "svg" | "math")
            && !self.uses_foreign_rules(&token)
        {
            self.parse_error(TreeBuilderError::NonVoidHtmlElementStartTagWithTrailingSolidus);
        }
        self.process(&token)?;
        Ok(self
            .next_tokenizer_state
            .take()
            .map_or(TokenSinkResult::Continue, TokenSinkResult::SwitchTo))
    }

    fn adjusted_current_node_is_foreign(&self) -> bool {
        self.open_elements
            .last()
            .is_some_and(|node| node.namespace != Namespace::Html)
    }
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// The tree builder's whitespace set includes CR, which can only arrive
/// through character references.
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// [§ 13.1.2 Void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// Plus the obsolete elements the tree builder also pops immediately.
fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area" | "base" | "basefont" | "bgsound" | "br" | "col" | "embed" | "frame" | "hr"
            | "image" | "img" | "input" | "keygen" | "link" | "meta" | "param" | "source"
            | "track" | "wbr"
    )
}

fn is_all_whitespace(text: &str) -> bool {
    text.chars().all(is_whitespace)
}

/// Split a text token into its leading whitespace and the rest, when it
/// has both.
fn split_leading_whitespace(text: &Text) -> Option<(Token, Token)> {
    let split = text.data.find(|c| !is_whitespace(c))?;
    if split == 0 {
        return None;
    }
    let (whitespace, rest) = text.data.split_at(split);
    let mut head = text.clone();
    head.data = whitespace.to_string();
    head.span.end = head.span.start + split;
    let mut tail = text.clone();
    tail.data = rest.to_string();
    tail.span.start += split;
    Some((Token::Text(head), Token::Text(tail)))
}
