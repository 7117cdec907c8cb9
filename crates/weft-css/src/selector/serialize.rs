//! [CSSOM § 6.7.2 Serializing Selectors](https://www.w3.org/TR/cssom-1/#serializing-selectors)

use weft_common::{Result, Write};

use super::{
    AttributeModifier, AttributeSelector, Combinator, NsPrefix, PseudoArgument, Selectors,
    SimpleSelector,
};
use crate::tokenizer::{serialize_identifier, serialize_string};

impl Selectors {
    /// Serialize the top-level list back to CSS.
    ///
    /// # Errors
    /// Propagates allocation failure.
    pub fn to_css(&self) -> Result<String> {
        weft_common::to_string_with(|out| serialize_selectors(self, out))
    }
}

/// Where serialization is within one list.
struct Position {
    list: usize,
    complex: usize,
    component: usize,
}

/// [CSSOM § 6.7.2](https://www.w3.org/TR/cssom-1/#serialize-a-selector-list)
///
/// "To serialize a group of selectors serialize each selector in the group
/// of selectors and then serialize a comma-separated list of these
/// serializations."
///
/// Nested lists are written with an explicit stack.
///
/// # Errors
/// Propagates errors from `out`.
pub fn serialize_selectors(selectors: &Selectors, out: &mut dyn Write) -> Result<()> {
    let lists = selectors.lists();
    let mut stack = vec![Position {
        list: selectors.root.index(),
        complex: 0,
        component: 0,
    }];

    while let Some(top) = stack.last_mut() {
        let list = &lists[top.list];

        let Some(complex) = list.selectors.get(top.complex) else {
            let _ = stack.pop();
            if !stack.is_empty() {
                out.write(")")?;
            }
            continue;
        };

        let index = top.component;
        let Some(component) = complex.components.get(index) else {
            top.complex += 1;
            top.component = 0;
            if top.complex < list.selectors.len() {
                out.write(", ")?;
            }
            continue;
        };
        top.component += 1;

        write_combinator(component.combinator, index == 0, list.relative, out)?;

        let SimpleSelector::PseudoClassFunction { function, argument } = &component.simple else {
            write_simple(&component.simple, out)?;
            continue;
        };

        out.write(":")?;
        out.write((*function).into())?;
        out.write("(")?;
        let nested = match argument {
            PseudoArgument::List(id) => Some(*id),
            PseudoArgument::AnB { anb, of } => {
                out.write(&anb.to_string())?;
                if of.is_some() {
                    out.write(" of ")?;
                } else {
                    out.write(")")?;
                }
                *of
            }
        };
        if let Some(id) = nested {
            stack.push(Position {
                list: id.index(),
                complex: 0,
                component: 0,
            });
        }
    }
    Ok(())
}

fn write_combinator(
    combinator: Combinator,
    first: bool,
    relative: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if first {
        if !relative {
            return Ok(());
        }
        return match combinator {
            Combinator::Descendant | Combinator::Close => Ok(()),
            Combinator::Child => out.write("> "),
            Combinator::NextSibling => out.write("+ "),
            Combinator::SubsequentSibling => out.write("~ "),
            Combinator::Column => out.write("|| "),
        };
    }
    match combinator {
        Combinator::Close => Ok(()),
        Combinator::Descendant => out.write(" "),
        Combinator::Child => out.write(" > "),
        Combinator::NextSibling => out.write(" + "),
        Combinator::SubsequentSibling => out.write(" ~ "),
        Combinator::Column => out.write(" || "),
    }
}

fn write_ns(ns: Option<&NsPrefix>, out: &mut dyn Write) -> Result<()> {
    match ns {
        None => Ok(()),
        Some(NsPrefix::Any) => out.write("*|"),
        Some(NsPrefix::None) => out.write("|"),
        Some(NsPrefix::Named(prefix)) => {
            serialize_identifier(prefix, out)?;
            out.write("|")
        }
    }
}

/// [CSSOM § 6.7.2](https://www.w3.org/TR/cssom-1/#serialize-a-simple-selector)
fn write_simple(simple: &SimpleSelector, out: &mut dyn Write) -> Result<()> {
    match simple {
        SimpleSelector::Universal { ns } => {
            write_ns(ns.as_ref(), out)?;
            out.write("*")
        }
        SimpleSelector::Type { ns, name } => {
            write_ns(ns.as_ref(), out)?;
            serialize_identifier(name, out)
        }
        // "Append a "#" (U+0023), followed by the result of serializing the ID as an identifier"
        SimpleSelector::Id(id) => {
            out.write("#")?;
            serialize_identifier(id, out)
        }
        // "Append a "." (U+002E), followed by the result of serializing the class name as an identifier"
        SimpleSelector::Class(class) => {
            out.write(".")?;
            serialize_identifier(class, out)
        }
        SimpleSelector::Attribute(attribute) => write_attribute(attribute, out),
        SimpleSelector::PseudoClass(pc) => {
            out.write(":")?;
            out.write((*pc).into())
        }
        SimpleSelector::PseudoElement(pe) => {
            out.write("::")?;
            out.write((*pe).into())
        }
        SimpleSelector::PseudoClassFunction { .. } => Ok(()),
    }
}

fn write_attribute(attribute: &AttributeSelector, out: &mut dyn Write) -> Result<()> {
    // "Append "[" (U+005B) to s."
    out.write("[")?;
    write_ns(attribute.ns.as_ref(), out)?;
    serialize_identifier(&attribute.name, out)?;

    if let Some((operator, value)) = &attribute.value {
        // "Append the relevant attribute selector operator, then the result
        // of serializing the value as a string."
        out.write(operator.as_str())?;
        serialize_string(value, out)?;
    }

    // "If the attribute selector has the case-insensitivity flag present,
    // append " i" (U+0020 U+0069) to s."
    match attribute.modifier {
        AttributeModifier::Unset => {}
        AttributeModifier::CaseInsensitive => out.write(" i")?,
        AttributeModifier::CaseSensitive => out.write(" s")?,
    }
    out.write("]")
}

#[cfg(test)]
mod tests {
    use crate::selector::SelectorParser;

    fn round_trip(css: &str) -> String {
        let mut parser = SelectorParser::new();
        parser.parse_list(css).unwrap().to_css().unwrap()
    }

    #[test]
    fn test_combinators_and_compounds() {
        assert_eq!(round_trip("a.b>c  +d~e"), "a.b > c + d ~ e");
        assert_eq!(round_trip("col || td"), "col || td");
        assert_eq!(round_trip("a , b"), "a, b");
    }

    #[test]
    fn test_namespaces_and_attributes() {
        assert_eq!(round_trip("svg|rect, *|*, |p"), "svg|rect, *|*, |p");
        assert_eq!(round_trip("[ lang |= en ]"), "[lang|=\"en\"]");
        assert_eq!(round_trip("[*|href^='http' I]"), "[*|href^=\"http\" i]");
        assert_eq!(round_trip("[|title]"), "[|title]");
    }

    #[test]
    fn test_pseudo_functions() {
        assert_eq!(round_trip("a:has(>img, +b)"), "a:has(> img, + b)");
        assert_eq!(round_trip("li:NTH-CHILD( 2n + 1 of .x )"), "li:nth-child(odd of .x)");
        assert_eq!(round_trip(":not(:is(a,b))::before"), ":not(:is(a, b))::before");
        assert_eq!(round_trip(":nth-of-type(-n+3)"), ":nth-of-type(-n+3)");
    }

    #[test]
    fn test_identifiers_are_escaped() {
        assert_eq!(round_trip(".\\31 0"), ".\\31 0");
        assert_eq!(round_trip("#a\\.b"), "#a\\.b");
    }
}
