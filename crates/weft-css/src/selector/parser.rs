//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! ```text
//! <complex-selector-list>  = <complex-selector>#
//! <relative-selector-list> = <relative-selector>#
//! <complex-selector>       = <compound-selector> [ <combinator>? <compound-selector> ]*
//! <relative-selector>      = <combinator>? <complex-selector>
//! <compound-selector>      = [ <type-selector>? <subclass-selector>*
//!                              [ <pseudo-element-selector> <pseudo-class-selector>* ]* ]!
//! ```
//!
//! Functional pseudo-classes that take selector lists are handled with an
//! explicit stack of [`Frame`]s, one per open list, so nesting depth is
//! bounded by memory rather than by the native stack.
//!
//! Error recovery: when a member of a list fails, everything built for that
//! member is discarded. In a forgiving list (`:is()`, `:where()`, `:has()`)
//! parsing resumes at the next top-level `,`. In any other list the failure
//! spreads to the enclosing selector, up to the top-level list, whose
//! failure fails the whole parse.

use log::{debug, trace};
use weft_common::{Result, Span, Status};

use super::pseudo::{self, FunctionArgument, Lookup};
use super::{
    AttributeModifier, AttributeOperator, AttributeSelector, Combinator, ComplexSelector,
    Component, ListId, NsPrefix, PseudoArgument, PseudoClassFunction, SelectorList, Selectors,
    SimpleSelector,
};
use crate::log::{CssLog, CssLogKind};
use crate::syntax::{AnB, TokenCursor, parse_anb, skip_component_value};
use crate::tokenizer::{CssToken, HashType, tokenize_with_spans};

/// Module name used in diagnostics.
const MODULE: &str = "Selectors";

/// The functional pseudo-class a nested list belongs to.
#[derive(Debug, Clone, Copy)]
struct Owner {
    function: PseudoClassFunction,
    /// Combinator for the function in the enclosing selector.
    combinator: Combinator,
    /// The enclosing compound already had a pseudo-element.
    after_pseudo_element: bool,
    anb: Option<AnB>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before a member of the list.
    ComplexStart,
    /// Before the first simple selector of a compound.
    CompoundStart,
    /// Inside a compound, after at least one simple selector.
    Compound { after_pseudo_element: bool },
    /// After a compound: a combinator, `,`, or the end of the list.
    AfterCompound,
    /// At the `)` (or end of input) closing the list.
    Close,
}

/// One selector list being built.
#[derive(Debug)]
struct Frame {
    owner: Option<Owner>,
    selectors: Vec<ComplexSelector>,
    current: Vec<Component>,
    relative: bool,
    forgiving: bool,
    /// Combinator for the first compound when none is written.
    leading: Combinator,
    /// Combinator for the next simple selector.
    combinator: Combinator,
    /// Arena length when the current member started.
    mark: usize,
    state: State,
}

impl Frame {
    const fn new(owner: Option<Owner>, relative: bool, forgiving: bool, leading: Combinator) -> Self {
        Self {
            owner,
            selectors: Vec::new(),
            current: Vec::new(),
            relative,
            forgiving,
            leading,
            combinator: leading,
            mark: 0,
            state: State::ComplexStart,
        }
    }

    fn push(&mut self, simple: SimpleSelector) {
        self.current.push(Component {
            combinator: self.combinator,
            simple,
        });
        self.combinator = Combinator::Close;
    }

    fn finish_complex(&mut self) {
        let components = std::mem::take(&mut self.current);
        self.selectors.push(ComplexSelector { components });
    }
}

/// Outcome of reading one simple selector.
enum Simple {
    /// A simple selector was appended.
    Done,
    /// A nested list was opened.
    Opened,
    /// The token does not start a simple selector of the requested kind.
    NotHere,
    /// A diagnostic was logged; the current member fails.
    Failed,
}

/// Parser for selector lists.
///
/// The parser keeps a diagnostic log across parses; [`SelectorParser::log`]
/// lists recovered problems as well as the reason a parse failed.
#[derive(Debug, Default)]
pub struct SelectorParser {
    log: CssLog,
}

impl SelectorParser {
    /// Create a parser with an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { log: CssLog::new() }
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub const fn log(&self) -> &CssLog {
        &self.log
    }

    /// Forget recorded diagnostics.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// [§ 18 `<complex-selector-list>`](https://www.w3.org/TR/selectors-4/#typedef-complex-selector-list)
    ///
    /// # Errors
    /// [`Status::UnexpectedData`] if the list is invalid; the log says why.
    pub fn parse_list(&mut self, css: &str) -> Result<Selectors> {
        let (tokens, spans) = tokenize_with_spans(css);
        self.parse_tokens(&tokens, &spans, false)
    }

    /// [§ 18 `<relative-selector-list>`](https://www.w3.org/TR/selectors-4/#typedef-relative-selector-list)
    ///
    /// # Errors
    /// [`Status::UnexpectedData`] if the list is invalid; the log says why.
    pub fn parse_relative_list(&mut self, css: &str) -> Result<Selectors> {
        let (tokens, spans) = tokenize_with_spans(css);
        self.parse_tokens(&tokens, &spans, true)
    }

    /// Parse already tokenized input such as a qualified rule's prelude.
    ///
    /// # Errors
    /// [`Status::UnexpectedData`] if the list is invalid, or
    /// [`Status::MemoryAllocation`] if the log cannot grow.
    pub fn parse_tokens(
        &mut self,
        tokens: &[CssToken],
        spans: &[Span],
        relative: bool,
    ) -> Result<Selectors> {
        let mut run = Run {
            cursor: TokenCursor::new(tokens, spans),
            log: &mut self.log,
            lists: Vec::new(),
            stack: vec![Frame::new(None, relative, false, Combinator::Descendant)],
        };
        run.run()
    }
}

/// State of one parse.
struct Run<'t, 'l> {
    cursor: TokenCursor<'t>,
    log: &'l mut CssLog,
    lists: Vec<SelectorList>,
    stack: Vec<Frame>,
}

impl Run<'_, '_> {
    fn run(&mut self) -> Result<Selectors> {
        loop {
            let Some(frame) = self.stack.last() else {
                return Err(Status::Failed);
            };
            let state = frame.state;
            trace!(target: "css.selectors", "{state:?} at depth {}", self.stack.len());
            let ok = match state {
                State::ComplexStart => self.complex_start()?,
                State::CompoundStart => self.compound_start()?,
                State::Compound {
                    after_pseudo_element,
                } => self.compound(after_pseudo_element)?,
                State::AfterCompound => self.after_compound()?,
                State::Close => {
                    if let Some(root) = self.close()? {
                        return Ok(Selectors::new(std::mem::take(&mut self.lists), root));
                    }
                    true
                }
            };
            if !ok {
                self.fail()?;
            }
        }
    }

    fn top(&mut self) -> Result<&mut Frame> {
        self.stack.last_mut().ok_or(Status::Failed)
    }

    fn unexpected(&mut self) -> Result<()> {
        let offset = self.cursor.offset();
        let token = self.cursor.peek();
        debug!(target: "css.selectors", "unexpected {token} at {offset}");
        self.log.unexpected_token(MODULE, token, offset)
    }

    fn report(&mut self, kind: CssLogKind, text: String, offset: usize) -> Result<()> {
        debug!(target: "css.selectors", "{kind}: {text} at {offset}");
        if kind == CssLogKind::NotSupported {
            weft_common::warn_once("CSS", &format!("{text} is not supported"));
        }
        self.log.push(kind, MODULE, text, offset)
    }

    /// Start of a list member.
    fn complex_start(&mut self) -> Result<bool> {
        self.cursor.skip_whitespace();
        let token = self.cursor.peek();
        let lists = self.lists.len();
        let frame = self.top()?;

        match token {
            CssToken::Comma if frame.forgiving => {
                let _ = self.cursor.advance();
                let offset = self.cursor.offset();
                self.report(CssLogKind::Syntax, "Empty selector in list".to_string(), offset)?;
                Ok(true)
            }
            CssToken::RightParen | CssToken::Eof
                if (frame.owner.is_some() || token.is_eof())
                    && (frame.forgiving || frame.selectors.is_empty()) =>
            {
                frame.state = State::Close;
                Ok(true)
            }
            _ => {
                frame.mark = lists;
                frame.current.clear();
                frame.combinator = frame.leading;
                frame.state = State::CompoundStart;
                if frame.relative {
                    if let Some(combinator) = self.explicit_combinator() {
                        let frame = self.top()?;
                        frame.combinator = combinator;
                    }
                }
                Ok(true)
            }
        }
    }

    /// Consume `>`, `+`, `~` or `||` if one is next.
    fn explicit_combinator(&mut self) -> Option<Combinator> {
        let combinator = match self.cursor.peek() {
            CssToken::Delim('>') => Combinator::Child,
            CssToken::Delim('+') => Combinator::NextSibling,
            CssToken::Delim('~') => Combinator::SubsequentSibling,
            CssToken::Delim('|') => {
                let start = self.cursor.position();
                let _ = self.cursor.advance();
                if !self.cursor.peek().is_delim('|') {
                    self.cursor.rewind(start);
                    return None;
                }
                Combinator::Column
            }
            _ => return None,
        };
        let _ = self.cursor.advance();
        Some(combinator)
    }

    /// First simple selector of a compound: a type selector or any subclass.
    fn compound_start(&mut self) -> Result<bool> {
        self.cursor.skip_whitespace();
        let outcome = match self.type_selector()? {
            Simple::NotHere => self.subclass(false)?,
            outcome => outcome,
        };
        match outcome {
            Simple::Done => {
                let state = match self.top()?.current.last() {
                    Some(Component {
                        simple: SimpleSelector::PseudoElement(_),
                        ..
                    }) => State::Compound {
                        after_pseudo_element: true,
                    },
                    _ => State::Compound {
                        after_pseudo_element: false,
                    },
                };
                self.top()?.state = state;
                Ok(true)
            }
            Simple::Opened => Ok(true),
            Simple::NotHere => self.unexpected().map(|()| false),
            Simple::Failed => Ok(false),
        }
    }

    /// Further simple selectors of a compound.
    fn compound(&mut self, after_pseudo_element: bool) -> Result<bool> {
        match self.subclass(after_pseudo_element)? {
            Simple::Done => {
                if let Some(Component {
                    simple: SimpleSelector::PseudoElement(_),
                    ..
                }) = self.top()?.current.last()
                {
                    self.top()?.state = State::Compound {
                        after_pseudo_element: true,
                    };
                }
                Ok(true)
            }
            Simple::Opened => Ok(true),
            Simple::NotHere => {
                self.top()?.state = State::AfterCompound;
                Ok(true)
            }
            Simple::Failed => Ok(false),
        }
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators), or the end of a member.
    fn after_compound(&mut self) -> Result<bool> {
        let whitespace = self.cursor.peek().is_whitespace();
        self.cursor.skip_whitespace();

        if let Some(combinator) = self.explicit_combinator() {
            let frame = self.top()?;
            frame.combinator = combinator;
            frame.state = State::CompoundStart;
            return Ok(true);
        }

        let token = self.cursor.peek();
        let Some(frame) = self.stack.last_mut() else {
            return Err(Status::Failed);
        };
        match token {
            CssToken::Comma => {
                let _ = self.cursor.advance();
                frame.finish_complex();
                frame.state = State::ComplexStart;
                Ok(true)
            }
            CssToken::RightParen if frame.owner.is_some() => {
                frame.finish_complex();
                frame.state = State::Close;
                Ok(true)
            }
            CssToken::Eof => {
                frame.finish_complex();
                frame.state = State::Close;
                Ok(true)
            }
            // "A descendant combinator is whitespace that separates two compound selectors."
            _ if whitespace => {
                frame.combinator = Combinator::Descendant;
                frame.state = State::CompoundStart;
                Ok(true)
            }
            _ => self.unexpected().map(|()| false),
        }
    }

    /// Close the top list. Returns the root list once the outermost closes.
    fn close(&mut self) -> Result<Option<ListId>> {
        let Some(frame) = self.stack.pop() else {
            return Err(Status::Failed);
        };

        if let Some(owner) = frame.owner {
            if self.cursor.peek().is_eof() {
                let offset = self.cursor.offset();
                self.report(
                    CssLogKind::Syntax,
                    "End of input in pseudo function".to_string(),
                    offset,
                )?;
            } else {
                let _ = self.cursor.advance(); // )
            }

            // A forgiving list may end up empty: `:is()` matches nothing.
            if frame.selectors.is_empty() && !frame.forgiving {
                let offset = self.cursor.offset();
                self.report(
                    CssLogKind::Syntax,
                    format!("Pseudo function can't be empty: {}()", owner.function),
                    offset,
                )?;
                self.fail()?;
                return Ok(None);
            }
        } else if frame.selectors.is_empty() {
            self.unexpected()?;
            return Err(Status::UnexpectedData);
        }

        let id = ListId(self.lists.len());
        Status::reserve(&mut self.lists, 1)?;
        self.lists.push(SelectorList {
            selectors: frame.selectors,
            relative: frame.relative,
        });

        let Some(owner) = frame.owner else {
            return Ok(Some(id));
        };
        let argument = match owner.anb {
            Some(anb) => PseudoArgument::AnB { anb, of: Some(id) },
            None => PseudoArgument::List(id),
        };
        let parent = self.top()?;
        parent.current.push(Component {
            combinator: owner.combinator,
            simple: SimpleSelector::PseudoClassFunction {
                function: owner.function,
                argument,
            },
        });
        parent.combinator = Combinator::Close;
        parent.state = State::Compound {
            after_pseudo_element: owner.after_pseudo_element,
        };
        Ok(None)
    }

    /// The current member of the top list failed; a diagnostic is already
    /// logged and the cursor is at the top list's nesting level.
    fn fail(&mut self) -> Result<()> {
        loop {
            let lists = &mut self.lists;
            let Some(frame) = self.stack.last_mut() else {
                return Err(Status::Failed);
            };
            lists.truncate(frame.mark);
            frame.current.clear();

            if frame.forgiving {
                skip_to_list_boundary(&mut self.cursor);
                if matches!(self.cursor.peek(), CssToken::Comma) {
                    let _ = self.cursor.advance();
                    frame.state = State::ComplexStart;
                } else {
                    frame.state = State::Close;
                }
                return Ok(());
            }

            if frame.owner.is_none() {
                debug!(target: "css.selectors", "selector list failed");
                return Err(Status::UnexpectedData);
            }

            skip_function_rest(&mut self.cursor);
            let _ = self.stack.pop();
        }
    }

    /// `<type-selector>`: `div`, `*`, `ns|div`, `*|*`, `|div`.
    fn type_selector(&mut self) -> Result<Simple> {
        let ns_or_name = match self.cursor.peek() {
            CssToken::Ident(name) => Some(name.as_str()),
            CssToken::Delim('*') => None,
            CssToken::Delim('|') => {
                // "|div": no namespace.
                let start = self.cursor.position();
                let _ = self.cursor.advance();
                return match self.element_name()? {
                    Some(simple) => {
                        let simple = with_ns(simple, NsPrefix::None);
                        self.top()?.push(simple);
                        Ok(Simple::Done)
                    }
                    None => {
                        self.cursor.rewind(start);
                        Ok(Simple::NotHere)
                    }
                };
            }
            _ => return Ok(Simple::NotHere),
        };
        let _ = self.cursor.advance();

        // "ns|name" where the "|" is not the start of "||" or "|=".
        let start = self.cursor.position();
        if self.cursor.peek().is_delim('|') {
            let _ = self.cursor.advance();
            if let Some(simple) = self.element_name()? {
                let ns = ns_or_name.map_or(NsPrefix::Any, |prefix| NsPrefix::Named(prefix.to_string()));
                self.top()?.push(with_ns(simple, ns));
                return Ok(Simple::Done);
            }
            self.cursor.rewind(start);
        }

        let simple = match ns_or_name {
            Some(name) => SimpleSelector::Type {
                ns: None,
                name: name.to_string(),
            },
            None => SimpleSelector::Universal { ns: None },
        };
        self.top()?.push(simple);
        Ok(Simple::Done)
    }

    /// The name part after a namespace prefix.
    fn element_name(&mut self) -> Result<Option<SimpleSelector>> {
        let simple = match self.cursor.peek() {
            CssToken::Ident(name) => SimpleSelector::Type {
                ns: None,
                name: name.clone(),
            },
            CssToken::Delim('*') => SimpleSelector::Universal { ns: None },
            _ => return Ok(None),
        };
        let _ = self.cursor.advance();
        Ok(Some(simple))
    }

    /// `<subclass-selector>` or a pseudo-element. After a pseudo-element
    /// only pseudo-classes may follow.
    fn subclass(&mut self, after_pseudo_element: bool) -> Result<Simple> {
        let token = self.cursor.peek();
        if after_pseudo_element && !matches!(token, CssToken::Colon) {
            return Ok(Simple::NotHere);
        }

        match token {
            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            // "<id-selector> = <hash-token>" with the "id" type flag.
            CssToken::Hash { value, hash_type } => {
                if *hash_type != HashType::Id {
                    self.unexpected()?;
                    return Ok(Simple::Failed);
                }
                let _ = self.cursor.advance();
                self.top()?.push(SimpleSelector::Id(value.clone()));
                Ok(Simple::Done)
            }

            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            // "<class-selector> = '.' <ident-token>"
            CssToken::Delim('.') => {
                let _ = self.cursor.advance();
                let CssToken::Ident(name) = self.cursor.peek() else {
                    self.unexpected()?;
                    return Ok(Simple::Failed);
                };
                let _ = self.cursor.advance();
                self.top()?.push(SimpleSelector::Class(name.clone()));
                Ok(Simple::Done)
            }

            CssToken::LeftBracket => {
                let _ = self.cursor.advance();
                self.attribute()
            }

            CssToken::Colon => {
                let _ = self.cursor.advance();
                self.pseudo(after_pseudo_element)
            }

            _ => Ok(Simple::NotHere),
        }
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// ```text
    /// <attribute-selector> = '[' <wq-name> ']' |
    ///                        '[' <wq-name> <attr-matcher> [ <string-token> | <ident-token> ] <attr-modifier>? ']'
    /// ```
    ///
    /// The `[` is already consumed. On failure the rest of the block is skipped.
    fn attribute(&mut self) -> Result<Simple> {
        match self.attribute_inner() {
            Some(attribute) => {
                self.top()?.push(SimpleSelector::Attribute(attribute));
                Ok(Simple::Done)
            }
            None => {
                self.unexpected()?;
                skip_block_rest(&mut self.cursor, &CssToken::RightBracket);
                Ok(Simple::Failed)
            }
        }
    }

    fn attribute_inner(&mut self) -> Option<AttributeSelector> {
        let cursor = &mut self.cursor;
        cursor.skip_whitespace();

        // <wq-name> = <ns-prefix>? <ident-token>
        let (ns, name) = match cursor.peek() {
            CssToken::Delim('|') => {
                let _ = cursor.advance();
                (Some(NsPrefix::None), ident(cursor)?)
            }
            CssToken::Delim('*') => {
                let _ = cursor.advance();
                if !cursor.advance().is_delim('|') {
                    return None;
                }
                (Some(NsPrefix::Any), ident(cursor)?)
            }
            CssToken::Ident(first) => {
                let _ = cursor.advance();
                let start = cursor.position();
                if cursor.advance().is_delim('|') {
                    if let CssToken::Ident(name) = cursor.peek() {
                        let _ = cursor.advance();
                        (Some(NsPrefix::Named(first.clone())), name.clone())
                    } else {
                        cursor.rewind(start);
                        (None, first.clone())
                    }
                } else {
                    cursor.rewind(start);
                    (None, first.clone())
                }
            }
            _ => return None,
        };
        cursor.skip_whitespace();

        // <attr-matcher> = [ '~' | '|' | '^' | '$' | '*' ]? '='
        let operator = match cursor.advance() {
            CssToken::RightBracket => {
                return Some(AttributeSelector {
                    ns,
                    name,
                    value: None,
                    modifier: AttributeModifier::Unset,
                });
            }
            CssToken::Delim('=') => AttributeOperator::Equal,
            CssToken::Delim(c) => {
                let operator = match c {
                    '~' => AttributeOperator::Include,
                    '|' => AttributeOperator::Dash,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    '*' => AttributeOperator::Substring,
                    _ => return None,
                };
                if !cursor.advance().is_delim('=') {
                    return None;
                }
                operator
            }
            _ => return None,
        };
        cursor.skip_whitespace();

        let value = match cursor.advance() {
            CssToken::String(value) | CssToken::Ident(value) => value.clone(),
            _ => return None,
        };
        cursor.skip_whitespace();

        // <attr-modifier> = i | s
        let modifier = match cursor.advance() {
            CssToken::RightBracket => AttributeModifier::Unset,
            CssToken::Ident(flag) => {
                let modifier = if flag.eq_ignore_ascii_case("i") {
                    AttributeModifier::CaseInsensitive
                } else if flag.eq_ignore_ascii_case("s") {
                    AttributeModifier::CaseSensitive
                } else {
                    return None;
                };
                cursor.skip_whitespace();
                if !matches!(cursor.advance(), CssToken::RightBracket) {
                    return None;
                }
                modifier
            }
            _ => return None,
        };

        Some(AttributeSelector {
            ns,
            name,
            value: Some((operator, value)),
            modifier,
        })
    }

    /// Pseudo-classes and pseudo-elements; the first `:` is consumed.
    fn pseudo(&mut self, after_pseudo_element: bool) -> Result<Simple> {
        let offset = self.cursor.offset();
        match self.cursor.peek() {
            // [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
            CssToken::Ident(name) => {
                let _ = self.cursor.advance();
                match pseudo::pseudo_class(name) {
                    Lookup::Supported(pc) => {
                        self.top()?.push(SimpleSelector::PseudoClass(pc));
                        Ok(Simple::Done)
                    }
                    Lookup::NotSupported(pc) => {
                        self.report(CssLogKind::NotSupported, format!("Pseudo-class: :{pc}"), offset)?;
                        Ok(Simple::Failed)
                    }
                    Lookup::Unknown => {
                        self.report(CssLogKind::Unknown, format!("Pseudo-class: :{name}"), offset)?;
                        Ok(Simple::Failed)
                    }
                }
            }

            CssToken::Function(name) => {
                let _ = self.cursor.advance();
                match pseudo::pseudo_class_function(name) {
                    Lookup::Supported(function) => self.open_function(function, after_pseudo_element),
                    Lookup::NotSupported(function) => {
                        skip_function_rest(&mut self.cursor);
                        self.report(
                            CssLogKind::NotSupported,
                            format!("Pseudo-class function: :{function}()"),
                            offset,
                        )?;
                        Ok(Simple::Failed)
                    }
                    Lookup::Unknown => {
                        skip_function_rest(&mut self.cursor);
                        self.report(
                            CssLogKind::Unknown,
                            format!("Pseudo-class function: :{name}()"),
                            offset,
                        )?;
                        Ok(Simple::Failed)
                    }
                }
            }

            // [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
            CssToken::Colon => {
                let _ = self.cursor.advance();
                match self.cursor.peek() {
                    CssToken::Ident(name) => {
                        let _ = self.cursor.advance();
                        match pseudo::pseudo_element(name) {
                            Lookup::Supported(pe) => {
                                self.top()?.push(SimpleSelector::PseudoElement(pe));
                                Ok(Simple::Done)
                            }
                            Lookup::NotSupported(pe) => {
                                self.report(
                                    CssLogKind::NotSupported,
                                    format!("Pseudo-element: ::{pe}"),
                                    offset,
                                )?;
                                Ok(Simple::Failed)
                            }
                            Lookup::Unknown => {
                                self.report(
                                    CssLogKind::Unknown,
                                    format!("Pseudo-element: ::{name}"),
                                    offset,
                                )?;
                                Ok(Simple::Failed)
                            }
                        }
                    }
                    // No functional pseudo-elements are known.
                    CssToken::Function(name) => {
                        let _ = self.cursor.advance();
                        skip_function_rest(&mut self.cursor);
                        self.report(
                            CssLogKind::Unknown,
                            format!("Pseudo-element function: ::{name}()"),
                            offset,
                        )?;
                        Ok(Simple::Failed)
                    }
                    _ => {
                        self.unexpected()?;
                        Ok(Simple::Failed)
                    }
                }
            }

            _ => {
                self.unexpected()?;
                Ok(Simple::Failed)
            }
        }
    }

    /// Read or open the argument of a functional pseudo-class whose
    /// function token is consumed.
    fn open_function(
        &mut self,
        function: PseudoClassFunction,
        after_pseudo_element: bool,
    ) -> Result<Simple> {
        let combinator = self.top()?.combinator;
        let mut owner = Owner {
            function,
            combinator,
            after_pseudo_element,
            anb: None,
        };

        let (relative, forgiving) = match function.argument() {
            FunctionArgument::ComplexList { forgiving } => (false, forgiving),
            FunctionArgument::RelativeList => (true, true),
            FunctionArgument::AnB { of } => {
                // [§ 14.4 Child-indexed Pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
                // ":nth-child(An+B [of S]? )"
                self.cursor.skip_whitespace();
                let Some(anb) = parse_anb(&mut self.cursor) else {
                    self.unexpected()?;
                    skip_function_rest(&mut self.cursor);
                    return Ok(Simple::Failed);
                };
                self.cursor.skip_whitespace();

                let of = of && matches!(self.cursor.peek(), CssToken::Ident(name) if name.eq_ignore_ascii_case("of"));
                if !of {
                    match self.cursor.peek() {
                        CssToken::RightParen => {
                            let _ = self.cursor.advance();
                        }
                        CssToken::Eof => {
                            let offset = self.cursor.offset();
                            self.report(
                                CssLogKind::Syntax,
                                "End of input in pseudo function".to_string(),
                                offset,
                            )?;
                        }
                        _ => {
                            self.unexpected()?;
                            skip_function_rest(&mut self.cursor);
                            return Ok(Simple::Failed);
                        }
                    }
                    self.top()?.push(SimpleSelector::PseudoClassFunction {
                        function,
                        argument: PseudoArgument::AnB { anb, of: None },
                    });
                    return Ok(Simple::Done);
                }

                let _ = self.cursor.advance(); // of
                owner.anb = Some(anb);
                (false, false)
            }
            FunctionArgument::Unsupported => {
                skip_function_rest(&mut self.cursor);
                return Ok(Simple::Failed);
            }
        };

        Status::reserve(&mut self.stack, 1)?;
        self.stack.push(Frame::new(
            Some(owner),
            relative,
            forgiving,
            function.default_combinator(),
        ));
        Ok(Simple::Opened)
    }
}

/// Put a namespace prefix on a type or universal selector.
fn with_ns(simple: SimpleSelector, prefix: NsPrefix) -> SimpleSelector {
    match simple {
        SimpleSelector::Type { name, .. } => SimpleSelector::Type {
            ns: Some(prefix),
            name,
        },
        SimpleSelector::Universal { .. } => SimpleSelector::Universal { ns: Some(prefix) },
        other => other,
    }
}

fn ident(cursor: &mut TokenCursor<'_>) -> Option<String> {
    match cursor.advance() {
        CssToken::Ident(name) => Some(name.clone()),
        _ => None,
    }
}

/// Skip to the next `,` or `)` of the current list, leaving it unconsumed.
fn skip_to_list_boundary(cursor: &mut TokenCursor<'_>) {
    while !matches!(
        cursor.peek(),
        CssToken::Comma | CssToken::RightParen | CssToken::Eof
    ) {
        skip_component_value(cursor);
    }
}

/// Skip past the `)` closing the current function.
fn skip_function_rest(cursor: &mut TokenCursor<'_>) {
    skip_block_rest(cursor, &CssToken::RightParen);
}

/// Skip past `closer`, stepping over nested blocks whole.
fn skip_block_rest(cursor: &mut TokenCursor<'_>, closer: &CssToken) {
    loop {
        let token = cursor.peek();
        if token.is_eof() {
            return;
        }
        if token == closer {
            let _ = cursor.advance();
            return;
        }
        skip_component_value(cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_layout() {
        let mut parser = SelectorParser::new();
        let selectors = parser.parse_list("a.b > c").unwrap();
        let components = &selectors.root().selectors[0].components;
        let combinators: Vec<_> = components.iter().map(|c| c.combinator).collect();
        assert_eq!(
            combinators,
            [Combinator::Descendant, Combinator::Close, Combinator::Child]
        );
    }

    #[test]
    fn test_failed_member_leaves_no_orphan_lists() {
        let mut parser = SelectorParser::new();
        let selectors = parser.parse_list(":is(:not(a) 1%, b)").unwrap();
        assert_eq!(selectors.lists().len(), 2);
    }

    #[test]
    fn test_column_combinator_versus_namespace() {
        let mut parser = SelectorParser::new();
        let selectors = parser.parse_list("col||td").unwrap();
        let components = &selectors.root().selectors[0].components;
        assert_eq!(components[1].combinator, Combinator::Column);

        let selectors = parser.parse_list("svg|rect").unwrap();
        assert_eq!(
            selectors.root().selectors[0].components[0].simple,
            SimpleSelector::Type {
                ns: Some(NsPrefix::Named("svg".to_string())),
                name: "rect".to_string()
            }
        );
    }

    #[test]
    fn test_root_failure() {
        let mut parser = SelectorParser::new();
        assert_eq!(parser.parse_list("div,"), Err(Status::UnexpectedData));
        assert_eq!(parser.parse_list(""), Err(Status::UnexpectedData));
        assert_eq!(parser.parse_list("a )"), Err(Status::UnexpectedData));
    }
}
