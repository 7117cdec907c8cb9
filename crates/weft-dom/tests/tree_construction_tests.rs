//! Tree construction tests in the html5lib dump format.

use weft_dom::serialize::to_dump;
use weft_dom::{DomTree, NodeType, parse_html};
use weft_html::{HtmlParser, QuirksMode, TreeBuilderError};

/// Helper to parse HTML and return the dump with the `| ` prefixes.
fn dump(html: &str) -> String {
    to_dump(&parse_html(html).unwrap()).unwrap()
}

/// Helper to join expected dump lines.
fn lines(expected: &[&str]) -> String {
    let mut out = String::new();
    for line in expected {
        out.push_str(line);
        out.push('\n');
    }
    out
}

// ========== implied structure ==========

#[test_log::test]
fn test_implied_html_head_body() {
    assert_eq!(
        dump("Hello"),
        lines(&["| <html>", "|   <head>", "|   <body>", "|     \"Hello\""])
    );
}

#[test]
fn test_doctype_with_identifiers() {
    let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><p>x"#;
    let tree = parse_html(html).unwrap();
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    assert_eq!(
        to_dump(&tree).unwrap(),
        lines(&[
            "| <!DOCTYPE html \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"x\"",
        ])
    );
}

#[test]
fn test_unclosed_paragraphs_are_siblings() {
    assert_eq!(
        dump("<p>One<p>Two"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"One\"",
            "|     <p>",
            "|       \"Two\"",
        ])
    );
}

#[test]
fn test_adjacent_text_is_merged() {
    let tree = parse_html("a&amp;b<!---->c").unwrap();
    let body = tree.body().unwrap();
    let children = tree.children(body);
    assert_eq!(children.len(), 3);
    assert_eq!(tree.as_text(children[0]), Some("a&b"));
    assert!(matches!(
        tree.get(children[1]).unwrap().node_type,
        NodeType::Comment(_)
    ));
    assert_eq!(tree.as_text(children[2]), Some("c"));
}

// ========== adoption agency ==========

#[test]
fn test_adoption_agency_misnested_inline() {
    assert_eq!(
        dump("<p>1<b>2<i>3</b>4</i>5</p>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"1\"",
            "|       <b>",
            "|         \"2\"",
            "|         <i>",
            "|           \"3\"",
            "|       <i>",
            "|         \"4\"",
            "|       \"5\"",
        ])
    );
}

#[test]
fn test_adoption_agency_block_inside_formatting() {
    assert_eq!(
        dump("<b>1<p>2</b>3</p>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"1\"",
            "|     <p>",
            "|       <b>",
            "|         \"2\"",
            "|       \"3\"",
        ])
    );
}

#[test]
fn test_noahs_ark_limits_identical_entries() {
    let tree = parse_html("<p><b><b><b><b>x</p>y").unwrap();
    // The fourth <b> pushes the first out of the list of active formatting
    // elements, so reconstruction after </p> clones only three.
    let bs = tree.get_elements_by_tag_name(tree.root(), "b");
    assert_eq!(bs.len(), 4 + 3);
}

// ========== tables ==========

#[test]
fn test_foster_parenting_text_before_table() {
    assert_eq!(
        dump("<table>A<tr><td>B</td></tr></table>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     \"A\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"B\"",
        ])
    );
}

#[test]
fn test_table_closes_paragraph_only_outside_quirks() {
    let standard = dump("<!DOCTYPE html><p><table></table>");
    assert!(standard.contains("|     <p>\n|     <table>\n"));

    let quirks = dump("<p><table></table>");
    assert!(quirks.contains("|     <p>\n|       <table>\n"));
}

// ========== templates ==========

#[test]
fn test_template_contents_fragment() {
    assert_eq!(
        dump("<template><div>x</div></template>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|     <template>",
            "|       content",
            "|         <div>",
            "|           \"x\"",
            "|   <body>",
        ])
    );
}

#[test]
fn test_template_cells_without_table() {
    assert_eq!(
        dump("<template><td>a</td></template>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|     <template>",
            "|       content",
            "|         <td>",
            "|           \"a\"",
            "|   <body>",
        ])
    );
}

// ========== foreign content ==========

#[test]
fn test_svg_integration_point_holds_html() {
    assert_eq!(
        dump("<svg><foreignObject><p>hi</p></foreignObject></svg>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       <svg foreignObject>",
            "|         <p>",
            "|           \"hi\"",
        ])
    );
}

#[test]
fn test_html_tag_breaks_out_of_svg() {
    let tree = parse_html("<svg><b>x</b></svg>").unwrap();
    assert_eq!(
        to_dump(&tree).unwrap(),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|     <b>",
            "|       \"x\"",
        ])
    );
}

#[test]
fn test_math_annotation_xml_html_encoding() {
    let tree = parse_html(r#"<math><annotation-xml encoding="text/html"><div>x</div></annotation-xml></math>"#)
        .unwrap();
    let div = tree.get_elements_by_tag_name(tree.root(), "div");
    assert_eq!(div.len(), 1);
    let parent = tree.parent(div[0]).unwrap();
    assert_eq!(tree.as_element(parent).unwrap().local_name, "annotation-xml");
}

#[test]
fn test_cdata_in_svg_is_text() {
    let tree = parse_html("<svg><![CDATA[a<b]]></svg>").unwrap();
    let svg = tree.get_elements_by_tag_name(tree.root(), "svg")[0];
    assert_eq!(tree.text_content(svg), "a<b");
}

// ========== quirks ==========

#[test]
fn test_quirks_mode_selection() {
    let cases = [
        ("<p>", QuirksMode::Quirks),
        ("<!DOCTYPE html>", QuirksMode::NoQuirks),
        (
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#,
            QuirksMode::Quirks,
        ),
        (
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#,
            QuirksMode::LimitedQuirks,
        ),
        (
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "">"#,
            QuirksMode::LimitedQuirks,
        ),
    ];
    for (html, expected) in cases {
        assert_eq!(parse_html(html).unwrap().quirks_mode(), expected, "{html}");
    }
}

// ========== errors and chunking ==========

#[test]
fn test_tree_errors_are_reported() {
    let mut parser = HtmlParser::new(DomTree::new());
    parser.feed_str("<!DOCTYPE html><p></b>").unwrap();
    let document = parser.finish().unwrap();
    assert!(document.tokenizer_errors.is_empty());
    // </b> with no open b falls through to "any other end tag" and stops at
    // the special p element.
    assert_eq!(
        document.tree_errors.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![TreeBuilderError::UnexpectedClosedToken]
    );
}

#[test]
fn test_tree_is_independent_of_chunking() {
    let input = "<!DOCTYPE html><table><tr><td>a&amp;b</td></tr>x</table>\
                 <svg viewbox='0 0 1 1'><path/></svg><p>1<b>2<i>3</b>4</i>5";
    let expected = dump(input);
    for split in 1..input.len() {
        let mut parser = HtmlParser::new(DomTree::new());
        parser.feed_str(&input[..split]).unwrap();
        parser.feed_str(&input[split..]).unwrap();
        let document = parser.finish().unwrap();
        assert_eq!(to_dump(&document.sink).unwrap(), expected, "split at {split}");
    }
}
