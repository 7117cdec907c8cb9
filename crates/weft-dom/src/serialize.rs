//! Tree serialization.
//!
//! [`serialize_html`] implements the
//! [HTML fragment serialization algorithm](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments).
//! [`dump`] writes the indented `| <tag>` format used by the html5lib
//! tree-construction tests.

use weft_common::{Result, Write, to_string_with};
use weft_html::tree_builder::{AttributeNamespace, ElementAttribute, Namespace};

use crate::{DomTree, ElementData, NodeId, NodeType};

/// Elements whose end tag is never serialized.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Parents whose text children are written without escaping.
const RAW_TEXT_PARENTS: &[&str] = &[
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
];

/// [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// Serialize the children of `node`, or of its template contents if it is a
/// `template` element.
///
/// # Errors
/// The first error `out` returns.
pub fn serialize_html(tree: &DomTree, node: NodeId, out: &mut dyn Write) -> Result<()> {
    let node = tree
        .as_element(node)
        .and_then(|element| element.template_contents)
        .unwrap_or(node);
    for &child in tree.children(node) {
        serialize_node(tree, child, out)?;
    }
    Ok(())
}

/// [`serialize_html`] collected into a `String`.
///
/// # Errors
/// [`weft_common::Status::MemoryAllocation`] if the buffer cannot grow.
pub fn to_html(tree: &DomTree, node: NodeId) -> Result<String> {
    to_string_with(|out| serialize_html(tree, node, out))
}

fn serialize_node(tree: &DomTree, id: NodeId, out: &mut dyn Write) -> Result<()> {
    let Some(node) = tree.get(id) else {
        return Ok(());
    };
    match &node.node_type {
        // "If current node is an Element"
        NodeType::Element(element) => {
            // "Append a U+003C LESS-THAN SIGN character (<), followed by tagname."
            out.write("<")?;
            out.write(&element.local_name)?;
            // "For each attribute that the element has, append a U+0020 SPACE
            // character, the attribute's serialized name as described below, a
            // U+003D EQUALS SIGN character (=), a U+0022 QUOTATION MARK character
            // ("), the attribute's value, escaped as described below in attribute
            // mode, and a second U+0022 QUOTATION MARK character (")."
            for attribute in &element.attributes {
                out.write(" ")?;
                write_attribute_name(attribute, out)?;
                out.write("=\"")?;
                escape(&attribute.value, true, out)?;
                out.write("\"")?;
            }
            out.write(">")?;
            // "If current node serializes as void, then continue on to the next
            // child node at this point."
            if element.namespace == Namespace::Html
                && VOID_ELEMENTS.contains(&element.local_name.as_str())
            {
                return Ok(());
            }
            // "Append the value of running the HTML fragment serialization
            // algorithm on the current node element"
            serialize_html(tree, id, out)?;
            out.write("</")?;
            out.write(&element.local_name)?;
            out.write(">")
        }

        // "If current node is a Text node"
        // "If the parent of current node is a style, script, xmp, iframe,
        // noembed, noframes, or plaintext element, ... then append the value of
        // current node's data IDL attribute literally."
        // "Otherwise, append the value of current node's data IDL attribute,
        // escaped as described below."
        NodeType::Text(data) => {
            let raw = node
                .parent
                .and_then(|parent| tree.as_element(parent))
                .is_some_and(|parent| {
                    parent.namespace == Namespace::Html
                        && RAW_TEXT_PARENTS.contains(&parent.local_name.as_str())
                });
            if raw { out.write(data) } else { escape(data, false, out) }
        }

        // "If current node is a Comment"
        NodeType::Comment(data) => {
            out.write("<!--")?;
            out.write(data)?;
            out.write("-->")
        }

        // "If current node is a DocumentType"
        NodeType::Doctype { name, .. } => {
            out.write("<!DOCTYPE ")?;
            out.write(name)?;
            out.write(">")
        }

        NodeType::Document | NodeType::DocumentFragment => serialize_html(tree, id, out),
    }
}

/// "Attribute's serialized name"
fn write_attribute_name(attribute: &ElementAttribute, out: &mut dyn Write) -> Result<()> {
    match attribute.namespace {
        // "If the attribute has no namespace: The attribute's serialized name is
        // the attribute's local name."
        None => out.write(&attribute.name),
        // "If the attribute is in the XML namespace: The attribute's serialized
        // name is the string "xml:" followed by the attribute's local name."
        Some(AttributeNamespace::Xml) => {
            out.write("xml:")?;
            out.write(&attribute.name)
        }
        // "If the attribute is in the XMLNS namespace and the attribute's local
        // name is xmlns: The attribute's serialized name is the string "xmlns"."
        Some(AttributeNamespace::Xmlns) if attribute.name == "xmlns" => out.write("xmlns"),
        Some(AttributeNamespace::Xmlns) => {
            out.write("xmlns:")?;
            out.write(&attribute.name)
        }
        Some(AttributeNamespace::XLink) => {
            out.write("xlink:")?;
            out.write(&attribute.name)
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;"."
/// "Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;"."
/// "Replace any occurrences of the "<" character by the string "&lt;"."
/// "Replace any occurrences of the ">" character by the string "&gt;"."
/// In attribute mode, `"` becomes `&quot;` and `<` `>` are left alone.
fn escape(text: &str, attribute_mode: bool, out: &mut dyn Write) -> Result<()> {
    let mut start = 0;
    for (index, c) in text.char_indices() {
        let replacement = match c {
            '&' => "&amp;",
            '\u{A0}' => "&nbsp;",
            '"' if attribute_mode => "&quot;",
            '<' if !attribute_mode => "&lt;",
            '>' if !attribute_mode => "&gt;",
            _ => continue,
        };
        out.write(&text[start..index])?;
        out.write(replacement)?;
        start = index + c.len_utf8();
    }
    out.write(&text[start..])
}

// =============================================================================
// html5lib tree dump
// =============================================================================

/// Write the children of `node` in the html5lib test format:
///
/// ```text
/// | <!DOCTYPE html>
/// | <html>
/// |   <head>
/// |   <body>
/// |     <svg svg>
/// |       viewBox="0 0 1 1"
/// ```
///
/// Attributes are sorted by serialized name; template contents appear under
/// a `content` line.
///
/// # Errors
/// The first error `out` returns.
pub fn dump(tree: &DomTree, node: NodeId, out: &mut dyn Write) -> Result<()> {
    for &child in tree.children(node) {
        dump_node(tree, child, 0, out)?;
    }
    Ok(())
}

/// [`dump`] collected into a `String`, each line terminated by `\n`.
///
/// # Errors
/// [`weft_common::Status::MemoryAllocation`] if the buffer cannot grow.
pub fn to_dump(tree: &DomTree) -> Result<String> {
    to_string_with(|out| dump(tree, tree.root(), out))
}

fn dump_line_start(depth: usize, out: &mut dyn Write) -> Result<()> {
    out.write("| ")?;
    for _ in 0..depth {
        out.write("  ")?;
    }
    Ok(())
}

fn dump_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut dyn Write) -> Result<()> {
    let Some(node) = tree.get(id) else {
        return Ok(());
    };
    dump_line_start(depth, out)?;
    match &node.node_type {
        NodeType::Doctype {
            name,
            public_id,
            system_id,
        } => {
            out.write("<!DOCTYPE ")?;
            out.write(name)?;
            if !public_id.is_empty() || !system_id.is_empty() {
                out.write(" \"")?;
                out.write(public_id)?;
                out.write("\" \"")?;
                out.write(system_id)?;
                out.write("\"")?;
            }
            out.write(">\n")
        }
        NodeType::Comment(data) => {
            out.write("<!-- ")?;
            out.write(data)?;
            out.write(" -->\n")
        }
        NodeType::Text(data) => {
            out.write("\"")?;
            out.write(data)?;
            out.write("\"\n")
        }
        NodeType::Element(element) => dump_element(tree, id, element, depth, out),
        NodeType::Document | NodeType::DocumentFragment => {
            out.write("#document\n")?;
            for &child in tree.children(id) {
                dump_node(tree, child, depth + 1, out)?;
            }
            Ok(())
        }
    }
}

fn dump_element(
    tree: &DomTree,
    id: NodeId,
    element: &ElementData,
    depth: usize,
    out: &mut dyn Write,
) -> Result<()> {
    out.write("<")?;
    if element.namespace != Namespace::Html {
        let prefix: &'static str = element.namespace.into();
        out.write(prefix)?;
        out.write(" ")?;
    }
    out.write(&element.local_name)?;
    out.write(">\n")?;

    let mut attributes: Vec<(String, &str)> = element
        .attributes
        .iter()
        .map(|attribute| {
            let name = match attribute.namespace {
                Some(namespace) => format!("{namespace} {}", attribute.name),
                None => attribute.name.clone(),
            };
            (name, attribute.value.as_str())
        })
        .collect();
    attributes.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in attributes {
        dump_line_start(depth + 1, out)?;
        out.write(&name)?;
        out.write("=\"")?;
        out.write(value)?;
        out.write("\"\n")?;
    }

    if let Some(contents) = element.template_contents {
        dump_line_start(depth + 1, out)?;
        out.write("content\n")?;
        for &child in tree.children(contents) {
            dump_node(tree, child, depth + 2, out)?;
        }
    }
    for &child in tree.children(id) {
        dump_node(tree, child, depth + 1, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_html;

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let tree = parse_html("<p title='a\"&b'>x &lt; y\u{A0}</p>").unwrap();
        let body = tree.body().unwrap();
        assert_eq!(
            to_html(&tree, body).unwrap(),
            "<p title=\"a&quot;&amp;b\">x &lt; y&nbsp;</p>"
        );
    }

    #[test]
    fn test_serialize_raw_text_and_void_elements() {
        let tree = parse_html("<script>a<b</script><br><img src=x>").unwrap();
        let html = to_html(&tree, tree.root()).unwrap();
        assert_eq!(
            html,
            "<html><head><script>a<b</script></head><body><br><img src=\"x\"></body></html>"
        );
    }

    #[test]
    fn test_dump_namespaced_attributes_are_prefixed() {
        let tree = parse_html("<svg xlink:href=a viewbox=b></svg>").unwrap();
        let dumped = to_dump(&tree).unwrap();
        assert!(dumped.contains("|     <svg svg>\n"));
        assert!(dumped.contains("|       viewBox=\"b\"\n"));
        assert!(dumped.contains("|       xlink href=\"a\"\n"));
    }
}
