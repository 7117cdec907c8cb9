//! Foreign content support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::{adjust_mathml_attributes, is_text_integration_point};
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use super::sink::{AttributeNamespace, ElementAttribute};
use crate::tokenizer::Tag;

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string in the second column, the local
/// name being the string in the third column, and the namespace being the
/// namespace in the fourth column."
///
/// Format: (`attribute_name`, `local_name`, namespace). The prefix is the
/// namespace's conventional one.
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str, AttributeNamespace)] = &[
    ("xlink:actuate", "actuate", AttributeNamespace::XLink),
    ("xlink:arcrole", "arcrole", AttributeNamespace::XLink),
    ("xlink:href", "href", AttributeNamespace::XLink),
    ("xlink:role", "role", AttributeNamespace::XLink),
    ("xlink:show", "show", AttributeNamespace::XLink),
    ("xlink:title", "title", AttributeNamespace::XLink),
    ("xlink:type", "type", AttributeNamespace::XLink),
    ("xml:lang", "lang", AttributeNamespace::Xml),
    ("xml:space", "space", AttributeNamespace::Xml),
    ("xmlns", "xmlns", AttributeNamespace::Xmlns),
    ("xmlns:xlink", "xlink", AttributeNamespace::Xmlns),
];

/// Give `xlink:`, `xml:` and `xmlns` attributes their namespace.
pub fn adjust_foreign_attributes(attributes: &mut [ElementAttribute]) {
    for attribute in attributes.iter_mut() {
        if let Some(&(_, local_name, namespace)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|(from, _, _)| *from == attribute.name)
        {
            attribute.namespace = Some(namespace);
            attribute.name = local_name.to_string();
        }
    }
}

/// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1",
/// "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
/// "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span",
/// "strong", "strike", "sub", "sup", "table", "tt", "u", "ul", "var"
/// A start tag whose tag name is "font", if the token has any attributes
/// named "color", "face", or "size""
pub fn is_breakout_start_tag(tag: &Tag) -> bool {
    match tag.name.as_str() {
        "b" | "big" | "blockquote" | "body" | "br" | "center" | "code" | "dd" | "div" | "dl"
        | "dt" | "em" | "embed" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head" | "hr"
        | "i" | "img" | "li" | "listing" | "menu" | "meta" | "nobr" | "ol" | "p" | "pre"
        | "ruby" | "s" | "small" | "span" | "strong" | "strike" | "sub" | "sup" | "table"
        | "tt" | "u" | "ul" | "var" => true,
        "font" => tag
            .attributes
            .iter()
            .any(|a| matches!(a.name.as_str(), "color" | "face" | "size")),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Attribute;

    #[test]
    fn test_foreign_attributes_get_namespaces() {
        let mut attributes = vec![
            ElementAttribute::new("xlink:href", "#a"),
            ElementAttribute::new("xmlns", "http://www.w3.org/2000/svg"),
            ElementAttribute::new("href", "#b"),
        ];
        adjust_foreign_attributes(&mut attributes);
        assert_eq!(attributes[0].namespace, Some(AttributeNamespace::XLink));
        assert_eq!(attributes[0].name, "href");
        assert_eq!(attributes[1].namespace, Some(AttributeNamespace::Xmlns));
        assert_eq!(attributes[2].namespace, None);
    }

    #[test]
    fn test_font_breaks_out_only_with_presentational_attributes() {
        let mut font = Tag::named("font");
        assert!(!is_breakout_start_tag(&font));
        font.attributes.push(Attribute::new("color", "red"));
        assert!(is_breakout_start_tag(&font));
        assert!(is_breakout_start_tag(&Tag::named("p")));
    }
}
