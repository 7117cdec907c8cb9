//! Integration tests for CSS selector parsing.

use weft_common::Status;
use weft_css::log::CssLogKind;
use weft_css::selector::{
    AttributeModifier, AttributeOperator, AttributeSelector, Combinator, NsPrefix, PseudoArgument,
    PseudoClass, PseudoClassFunction, PseudoElement, SelectorParser, Selectors, SimpleSelector,
    Specificity,
};
use weft_css::syntax::AnB;

fn parse(css: &str) -> Selectors {
    SelectorParser::new()
        .parse_list(css)
        .unwrap_or_else(|status| panic!("{css:?} failed: {status}"))
}

fn round_trip(css: &str) -> String {
    parse(css).to_css().unwrap()
}

/// The single simple selector of a one-component selector.
fn only_simple(selectors: &Selectors) -> &SimpleSelector {
    let components = &selectors.root().selectors[0].components;
    assert_eq!(components.len(), 1, "{components:?}");
    &components[0].simple
}

// ========== Simple selectors ==========

#[test]
fn test_type_and_universal_selectors() {
    assert_eq!(
        *only_simple(&parse("body")),
        SimpleSelector::Type {
            ns: None,
            name: "body".to_string()
        }
    );
    assert_eq!(*only_simple(&parse("*")), SimpleSelector::Universal { ns: None });
}

#[test]
fn test_namespace_prefixes_are_distinct() {
    assert_eq!(
        *only_simple(&parse("|div")),
        SimpleSelector::Type {
            ns: Some(NsPrefix::None),
            name: "div".to_string()
        }
    );
    assert_eq!(
        *only_simple(&parse("*|div")),
        SimpleSelector::Type {
            ns: Some(NsPrefix::Any),
            name: "div".to_string()
        }
    );
    assert_eq!(
        *only_simple(&parse("svg|*")),
        SimpleSelector::Universal {
            ns: Some(NsPrefix::Named("svg".to_string()))
        }
    );
}

#[test]
fn test_id_and_class_selectors() {
    let selectors = parse("p#main.note");
    let simples: Vec<_> = selectors.root().selectors[0]
        .components
        .iter()
        .map(|c| c.simple.clone())
        .collect();
    assert_eq!(
        simples,
        vec![
            SimpleSelector::Type {
                ns: None,
                name: "p".to_string()
            },
            SimpleSelector::Id("main".to_string()),
            SimpleSelector::Class("note".to_string()),
        ]
    );
}

#[test]
fn test_unrestricted_hash_is_not_an_id() {
    let mut parser = SelectorParser::new();
    assert_eq!(parser.parse_list("#123"), Err(Status::UnexpectedData));
    assert_eq!(parser.log().of_kind(CssLogKind::Syntax).count(), 1);
}

// ========== Attribute selectors ==========

#[test]
fn test_attribute_forms() {
    let cases = [
        ("[title]", None, None, AttributeModifier::Unset),
        (
            "[lang|=en]",
            None,
            Some((AttributeOperator::Dash, "en")),
            AttributeModifier::Unset,
        ),
        (
            "[ class ~= 'a b' ]",
            None,
            Some((AttributeOperator::Include, "a b")),
            AttributeModifier::Unset,
        ),
        (
            "[href^=\"http\" i]",
            None,
            Some((AttributeOperator::Prefix, "http")),
            AttributeModifier::CaseInsensitive,
        ),
        (
            "[src$=png S]",
            None,
            Some((AttributeOperator::Suffix, "png")),
            AttributeModifier::CaseSensitive,
        ),
        (
            "[|data*=x]",
            Some(NsPrefix::None),
            Some((AttributeOperator::Substring, "x")),
            AttributeModifier::Unset,
        ),
        (
            "[*|alt=y]",
            Some(NsPrefix::Any),
            Some((AttributeOperator::Equal, "y")),
            AttributeModifier::Unset,
        ),
        (
            "[xlink|href]",
            Some(NsPrefix::Named("xlink".to_string())),
            None,
            AttributeModifier::Unset,
        ),
    ];

    for (css, ns, value, modifier) in cases {
        let selectors = parse(css);
        let SimpleSelector::Attribute(attribute) = only_simple(&selectors) else {
            panic!("{css:?} is not an attribute selector");
        };
        let name = match css {
            "[title]" => "title",
            "[lang|=en]" => "lang",
            "[ class ~= 'a b' ]" => "class",
            "[href^=\"http\" i]" | "[xlink|href]" => "href",
            "[src$=png S]" => "src",
            "[|data*=x]" => "data",
            _ => "alt",
        };
        assert_eq!(
            *attribute,
            AttributeSelector {
                ns,
                name: name.to_string(),
                value: value.map(|(op, v)| (op, v.to_string())),
                modifier,
            },
            "{css:?}"
        );
    }
}

#[test]
fn test_invalid_attribute_selectors() {
    for css in ["[]", "[a=]", "[a=1]", "[a==b]", "[a=b x]", "[a=b ii]", "[a"] {
        let mut parser = SelectorParser::new();
        assert_eq!(parser.parse_list(css), Err(Status::UnexpectedData), "{css:?}");
        assert!(!parser.log().is_empty(), "{css:?}");
    }
}

// ========== Combinators ==========

#[test]
fn test_combinators() {
    let selectors = parse("a b > c + d ~ e || f");
    let combinators: Vec<_> = selectors.root().selectors[0]
        .components
        .iter()
        .map(|c| c.combinator)
        .collect();
    assert_eq!(
        combinators,
        vec![
            Combinator::Descendant,
            Combinator::Descendant,
            Combinator::Child,
            Combinator::NextSibling,
            Combinator::SubsequentSibling,
            Combinator::Column,
        ]
    );
}

#[test]
fn test_compounds_and_subject() {
    let selectors = parse("ul.menu > li:hover");
    let complex = &selectors.root().selectors[0];
    assert_eq!(complex.compounds().count(), 2);
    assert_eq!(complex.subject().len(), 2);
    assert_eq!(
        complex.subject()[1].simple,
        SimpleSelector::PseudoClass(PseudoClass::Hover)
    );
}

#[test]
fn test_trailing_combinator_fails() {
    let mut parser = SelectorParser::new();
    assert_eq!(parser.parse_list("a >"), Err(Status::UnexpectedData));
    assert_eq!(parser.parse_list("> a"), Err(Status::UnexpectedData));
}

#[test]
fn test_relative_list() {
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_relative_list("> a, + b, c").unwrap();
    assert!(selectors.root().relative);
    let leading: Vec<_> = selectors
        .root()
        .selectors
        .iter()
        .map(|s| s.components[0].combinator)
        .collect();
    assert_eq!(
        leading,
        vec![Combinator::Child, Combinator::NextSibling, Combinator::Descendant]
    );
    assert_eq!(selectors.to_css().unwrap(), "> a, + b, c");
}

// ========== Pseudo-classes and pseudo-elements ==========

#[test]
fn test_pseudo_elements() {
    let selectors = parse("p::first-line:hover");
    let components = &selectors.root().selectors[0].components;
    assert_eq!(
        components[1].simple,
        SimpleSelector::PseudoElement(PseudoElement::FirstLine)
    );
    assert_eq!(components[2].combinator, Combinator::Close);

    let mut parser = SelectorParser::new();
    assert_eq!(parser.parse_list("p::before.x"), Err(Status::UnexpectedData));
}

#[test]
fn test_not_supported_versus_unknown() {
    let mut parser = SelectorParser::new();
    assert_eq!(parser.parse_list("a:visited"), Err(Status::UnexpectedData));
    assert_eq!(parser.parse_list("a:frobnicate"), Err(Status::UnexpectedData));
    assert_eq!(parser.parse_list(":lang(en)"), Err(Status::UnexpectedData));
    assert_eq!(parser.parse_list("::spelling-error"), Err(Status::UnexpectedData));
    assert_eq!(parser.parse_list("::nope"), Err(Status::UnexpectedData));

    let messages: Vec<String> = parser.log().messages().iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "Selectors. Not supported: Pseudo-class: :visited",
            "Selectors. Unknown: Pseudo-class: :frobnicate",
            "Selectors. Not supported: Pseudo-class function: :lang()",
            "Selectors. Not supported: Pseudo-element: ::spelling-error",
            "Selectors. Unknown: Pseudo-element: ::nope",
        ]
    );
}

#[test]
fn test_pseudo_names_are_case_insensitive() {
    assert_eq!(round_trip("A:HOVER::BEFORE"), "A:hover::before");
}

// ========== Functional pseudo-classes ==========

#[test]
fn test_forgiving_is_drops_bad_members() {
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list(":is(div, 1%, span) > a").unwrap();
    assert_eq!(selectors.lists().len(), 2);
    let SimpleSelector::PseudoClassFunction {
        function: PseudoClassFunction::Is,
        argument: PseudoArgument::List(id),
    } = &selectors.root().selectors[0].components[0].simple
    else {
        panic!("Expected :is()");
    };
    assert_eq!(selectors.list(*id).selectors.len(), 2);
    assert_eq!(parser.log().len(), 1);
    assert_eq!(
        parser.log().messages()[0].to_string(),
        "Syntax error. Selectors. Unexpected token: 1%"
    );
}

#[test]
fn test_forgiving_list_of_only_bad_members_is_empty() {
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list(":where(1%)").unwrap();
    assert_eq!(selectors.to_css().unwrap(), ":where()");
    assert_eq!(selectors.specificities(), vec![Specificity(0, 0, 0)]);
    assert_eq!(parser.log().len(), 1);

    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list("a, :is(1%, 2%) b").unwrap();
    assert_eq!(selectors.len(), 2);
    assert_eq!(selectors.to_css().unwrap(), "a, :is() b");
    assert_eq!(parser.log().len(), 2);
    assert!(
        parser
            .log()
            .messages()
            .iter()
            .all(|m| m.text.starts_with("Unexpected token"))
    );
}

#[test]
fn test_empty_forgiving_function_is_accepted() {
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list("p:is(), :has()").unwrap();
    assert_eq!(selectors.to_css().unwrap(), "p:is(), :has()");
    assert!(parser.log().is_empty());
}

#[test]
fn test_not_is_unforgiving() {
    let mut parser = SelectorParser::new();
    assert_eq!(parser.parse_list(":not(a, 1%)"), Err(Status::UnexpectedData));
    assert_eq!(parser.parse_list(":not()"), Err(Status::UnexpectedData));
}

#[test]
fn test_unforgiving_failure_spreads_to_forgiving_parent() {
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list(":is(:not(1%), b)").unwrap();
    assert_eq!(selectors.to_css().unwrap(), ":is(b)");
}

#[test]
fn test_has_is_relative_and_forgiving() {
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list("section:has(> h1, img, + 1%, ~ p)").unwrap();
    assert_eq!(selectors.to_css().unwrap(), "section:has(> h1, img, ~ p)");
    assert_eq!(parser.log().len(), 1);

    let has_list = selectors
        .lists()
        .iter()
        .find(|list| list.relative)
        .unwrap();
    assert_eq!(has_list.selectors[1].components[0].combinator, Combinator::Descendant);
}

#[test]
fn test_is_inside_compound_uses_close_combinator() {
    let selectors = parse("a:is(.x .y)");
    let components = &selectors.root().selectors[0].components;
    assert_eq!(components[1].combinator, Combinator::Close);
    let PseudoArgument::List(id) = (match &components[1].simple {
        SimpleSelector::PseudoClassFunction { argument, .. } => *argument,
        other => panic!("Expected function, got {other:?}"),
    }) else {
        panic!("Expected a list argument");
    };
    let inner = &selectors.list(id).selectors[0].components;
    assert_eq!(inner[0].combinator, Combinator::Close);
    assert_eq!(inner[1].combinator, Combinator::Descendant);
}

#[test]
fn test_nth_child_with_of() {
    let selectors = parse("li:nth-child(2n+1 of .item, #x)");
    let components = &selectors.root().selectors[0].components;
    let SimpleSelector::PseudoClassFunction {
        function: PseudoClassFunction::NthChild,
        argument: PseudoArgument::AnB { anb, of: Some(id) },
    } = components[1].simple
    else {
        panic!("Expected :nth-child() with of");
    };
    assert_eq!(anb, AnB::ODD);
    assert_eq!(selectors.list(id).selectors.len(), 2);
    assert_eq!(selectors.to_css().unwrap(), "li:nth-child(odd of .item, #x)");
}

#[test]
fn test_nth_of_type_rejects_of() {
    let mut parser = SelectorParser::new();
    assert_eq!(parser.parse_list(":nth-of-type(2 of a)"), Err(Status::UnexpectedData));
    assert_eq!(parser.parse_list(":nth-child(foo)"), Err(Status::UnexpectedData));
}

#[test]
fn test_unclosed_function_closes_at_end_of_input() {
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list("a:is(b, c").unwrap();
    assert_eq!(selectors.to_css().unwrap(), "a:is(b, c)");
    assert_eq!(
        parser.log().messages()[0].text,
        "End of input in pseudo function"
    );

    let selectors = parser.parse_list(":nth-child(3").unwrap();
    assert_eq!(selectors.to_css().unwrap(), ":nth-child(3)");
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 4096;
    let css = format!("{}a{}", ":not(".repeat(depth), ")".repeat(depth));
    let mut parser = SelectorParser::new();
    let selectors = parser.parse_list(&css).unwrap();
    assert_eq!(selectors.lists().len(), depth + 1);
    assert_eq!(selectors.specificities(), [Specificity(0, 0, 1)]);
    assert_eq!(selectors.to_css().unwrap(), css);
}

// ========== Specificity ==========

#[test]
fn test_specificity_list() {
    let selectors = parse("#a, .b, c, *, :where(#d), :is(#e, f) g");
    assert_eq!(
        selectors.specificities(),
        [
            Specificity(1, 0, 0),
            Specificity(0, 1, 0),
            Specificity(0, 0, 1),
            Specificity(0, 0, 0),
            Specificity(0, 0, 0),
            Specificity(1, 0, 1),
        ]
    );
}

// ========== Serialization ==========

#[test]
fn test_serialization_normalizes_whitespace() {
    assert_eq!(round_trip("  a  >b,c~d  "), "a > b, c ~ d");
    assert_eq!(round_trip("[a='x\"y']"), "[a=\"x\\\"y\"]");
}

#[test]
fn test_serde_json() {
    let value = serde_json::to_value(parse("a.b")).unwrap();
    let components = &value["lists"][0]["selectors"][0]["components"];
    assert_eq!(components[0]["combinator"], "descendant");
    assert_eq!(components[1]["simple"]["class"], "b");
}
