//! Integration tests for stylesheet, declaration list and component value
//! parsing.

use weft_common::{Result, Span, Status};
use weft_css::log::CssLogKind;
use weft_css::stylesheet::{
    AtRuleBlock, Rule, StylesheetBuilder, StylesheetParser, parse_declarations, parse_stylesheet,
};
use weft_css::syntax::{
    AtRuleConsumer, AtRulePrelude, BlockConsumer, BlockContent, ComponentValue,
    DeclarationsConsumer, ListRulesConsumer, QualifiedRuleConsumer, RuleParser, RuleStream,
    parse_component_values, serialize_component_values,
};
use weft_css::tokenizer::{CssToken, tokenize_with_spans};

fn values_to_css(values: &[ComponentValue]) -> String {
    weft_common::to_string_with(|out| serialize_component_values(values, out)).unwrap()
}

// ========== Stylesheets ==========

#[test_log::test]
fn test_style_rules_and_declarations() {
    let sheet = parse_stylesheet(
        "body { margin: 0; color: red !important }\n\
         h1, h2 { font: bold 2em/1.2 serif; }",
    )
    .unwrap();
    assert_eq!(sheet.rules.len(), 2);

    let Rule::Style(body) = &sheet.rules[0] else {
        panic!("Expected style rule, got {:?}", sheet.rules[0]);
    };
    assert_eq!(body.selectors.to_css().unwrap(), "body");
    assert_eq!(body.declarations[0].name, "margin");
    assert_eq!(values_to_css(&body.declarations[0].value), "0");
    assert!(body.declarations[1].important);
    assert_eq!(values_to_css(&body.declarations[1].value), "red");

    let Rule::Style(headings) = &sheet.rules[1] else {
        panic!("Expected style rule");
    };
    assert_eq!(headings.selectors.len(), 2);
    assert_eq!(values_to_css(&headings.declarations[0].value), "bold 2em/1.2 serif");
}

#[test_log::test]
fn test_at_rule_blocks() {
    let sheet = parse_stylesheet(
        "@import url(a.css) screen;\
         @media (min-width: 600px) { p { color: blue } }\
         @font-face { font-family: X; src: url(x.woff) }\
         @keyframes spin { from { opacity: 0 } }",
    )
    .unwrap();
    let names: Vec<&str> = sheet
        .rules
        .iter()
        .map(|rule| match rule {
            Rule::At(at) => at.name.as_str(),
            Rule::Style(_) => "style",
        })
        .collect();
    assert_eq!(names, ["import", "media", "font-face", "keyframes"]);

    let Rule::At(import) = &sheet.rules[0] else { unreachable!() };
    assert!(import.block.is_none());
    assert_eq!(values_to_css(&import.prelude), " url(a.css) screen");

    let Rule::At(media) = &sheet.rules[1] else { unreachable!() };
    assert!(matches!(&media.block, Some(AtRuleBlock::Rules(rules)) if rules.len() == 1));

    let Rule::At(font_face) = &sheet.rules[2] else { unreachable!() };
    let Some(AtRuleBlock::Declarations { declarations, rules }) = &font_face.block else {
        panic!("Expected declarations, got {:?}", font_face.block);
    };
    assert_eq!(declarations.len(), 2);
    assert!(rules.is_empty());

    let Rule::At(keyframes) = &sheet.rules[3] else { unreachable!() };
    assert!(matches!(&keyframes.block, Some(AtRuleBlock::Values(_))));
}

#[test_log::test]
fn test_nested_style_rules() {
    let sheet = parse_stylesheet(
        ".card { padding: 1em; > h2 { margin: 0 } a:hover { color: red } \
         @media print { display: none } }",
    )
    .unwrap();
    let Rule::Style(card) = &sheet.rules[0] else {
        panic!("Expected style rule");
    };
    assert_eq!(card.declarations.len(), 1);
    assert_eq!(card.nested_rules.len(), 3);

    let Rule::Style(h2) = &card.nested_rules[0] else {
        panic!("Expected nested style rule");
    };
    assert!(h2.selectors.root().relative);
    assert_eq!(h2.selectors.to_css().unwrap(), "> h2");

    let Rule::Style(link) = &card.nested_rules[1] else {
        panic!("Expected nested style rule");
    };
    assert_eq!(link.selectors.to_css().unwrap(), "a:hover");

    let Rule::At(media) = &card.nested_rules[2] else {
        panic!("Expected nested @media");
    };
    assert!(matches!(
        &media.block,
        Some(AtRuleBlock::Declarations { declarations, .. }) if declarations[0].name == "display"
    ));
}

#[test_log::test]
fn test_bad_selectors_drop_only_their_rule() {
    let mut parser = StylesheetParser::new();
    let sheet = parser
        .parse("a:visited { color: red } p, { x: y } q { x: y }")
        .unwrap();
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(parser.log().of_kind(CssLogKind::NotSupported).count(), 1);
    assert_eq!(parser.log().of_kind(CssLogKind::Syntax).count(), 1);
}

#[test_log::test]
fn test_unclosed_block_is_kept() {
    let mut parser = StylesheetParser::new();
    let sheet = parser.parse("a { color: red").unwrap();
    let Rule::Style(rule) = &sheet.rules[0] else {
        panic!("Expected style rule");
    };
    assert_eq!(rule.declarations.len(), 1);
    assert_eq!(
        parser.log().messages()[0].text,
        "Unexpected end of input inside a block"
    );
}

#[test]
fn test_deeply_nested_rules_drop() {
    let depth = 200_000;
    let sheet = parse_stylesheet(&"@media x{".repeat(depth)).unwrap();
    let mut level = 0;
    let mut rules = &sheet.rules;
    while let [Rule::At(media)] = rules.as_slice() {
        let Some(AtRuleBlock::Rules(nested)) = &media.block else {
            break;
        };
        level += 1;
        rules = nested;
    }
    assert_eq!(level, depth);
    drop(sheet);
}

#[test]
fn test_stylesheet_serializes_to_json() {
    let sheet = parse_stylesheet("a { b: c }").unwrap();
    let json = serde_json::to_value(&sheet).unwrap();
    let declaration = &json["rules"][0]["style"]["declarations"][0];
    assert_eq!(declaration["name"], "b");
    assert_eq!(declaration["important"], false);
    assert_eq!(declaration["value"][0]["token"]["ident"], "c");
}

#[test]
fn test_token_json_uses_kebab_case() {
    let json = serde_json::to_value(weft_css::tokenize("url(x) ")).unwrap();
    assert_eq!(json[0]["url"], "x");
    assert_eq!(json[1], "whitespace");
    assert_eq!(json[2], "eof");
    let json = serde_json::to_value(CssToken::BadUrl).unwrap();
    assert_eq!(json, "bad-url");
}

// ========== Declaration lists ==========

#[test_log::test]
fn test_style_attribute_declarations() {
    let declarations =
        parse_declarations("color: red; ; background : url(x.png) no-repeat !IMPORTANT;").unwrap();
    assert_eq!(declarations.len(), 2);
    assert_eq!(declarations[1].name, "background");
    assert!(declarations[1].important);
    assert_eq!(values_to_css(&declarations[1].value), "url(x.png) no-repeat");
}

#[test_log::test]
fn test_bad_declarations_are_skipped() {
    let mut parser = StylesheetParser::new();
    let declarations = parser.parse_declarations("1px; color red; width: 2px").unwrap();
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].name, "width");
    assert_eq!(parser.log().len(), 2);
}

#[test]
fn test_custom_property_keeps_blocks() {
    let declarations = parse_declarations("--x: { a: b }").unwrap();
    assert_eq!(declarations[0].name, "--x");
    assert!(declarations[0].value.iter().any(ComponentValue::is_curly_block));
}

// ========== Component values ==========

#[test]
fn test_component_values() {
    let values = parse_component_values("a(b [c]) {d}");
    assert_eq!(values.len(), 3);
    assert!(matches!(&values[0], ComponentValue::Function { name, value } if name == "a" && value.len() == 3));
    assert!(values[2].is_curly_block());
    assert_eq!(values_to_css(&values), "a(b [c]) {d}");
}

#[test]
fn test_deep_component_values() {
    let depth = 10_000;
    let css = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let values = parse_component_values(&css);
    assert_eq!(values.len(), 1);
    assert_eq!(values_to_css(&values), css);
}

// ========== Custom consumers ==========

/// Counts rules and stops at the first `@stop`.
#[derive(Default)]
struct Counter {
    rules: usize,
    declarations: usize,
}

impl ListRulesConsumer for Counter {
    fn next_rule(&mut self) -> Result<()> {
        self.rules += 1;
        Ok(())
    }
}

impl AtRuleConsumer for Counter {
    fn at_rule_prelude(&mut self, prelude: AtRulePrelude<'_>) -> Result<BlockContent> {
        if prelude.name == "stop" {
            return Err(Status::Stopped);
        }
        Ok(BlockContent::Rules)
    }
}

impl QualifiedRuleConsumer for Counter {
    fn qualified_rule_prelude(&mut self, _: &[CssToken], _: &[Span], _: bool) -> Result<bool> {
        Ok(true)
    }
}

impl BlockConsumer for Counter {}

impl DeclarationsConsumer for Counter {
    fn declaration_end(&mut self, _: bool) -> Result<()> {
        self.declarations += 1;
        Ok(())
    }
}

#[test_log::test]
fn test_custom_consumer_and_stop() {
    let (tokens, spans) = tokenize_with_spans("a { b: c } @x { d { e: f; g: h } } @stop; i { j: k }");
    let mut parser = RuleParser::new(&tokens, &spans, Counter::default());
    parser.parse_stylesheet().unwrap();
    assert!(parser.is_stopped());
    let (counter, _) = parser.into_parts();
    assert_eq!(counter.rules, 4);
    assert_eq!(counter.declarations, 3);
}

#[test]
fn test_consumer_errors_are_returned() {
    struct Failing;
    impl ListRulesConsumer for Failing {}
    impl AtRuleConsumer for Failing {}
    impl BlockConsumer for Failing {}
    impl DeclarationsConsumer for Failing {}
    impl QualifiedRuleConsumer for Failing {
        fn qualified_rule_prelude(&mut self, _: &[CssToken], _: &[Span], _: bool) -> Result<bool> {
            Err(Status::MemoryAllocation)
        }
    }

    let (tokens, spans) = tokenize_with_spans("a {}");
    let mut parser = RuleParser::new(&tokens, &spans, Failing);
    assert_eq!(parser.parse_stylesheet(), Err(Status::MemoryAllocation));
    assert!(!parser.is_stopped());
}

// ========== Streaming ==========

#[test_log::test]
fn test_rule_stream_matches_whole_parse() {
    let css = "@media screen { a > b { color: red; --x: { y: z } } } \
               @font-face { src: url(x.woff) } @keyframes k { from { top: 0 } } \
               p:is(.a, 1%) { margin: 0 !important } q { r { s: t } } @import u;";
    let whole = parse_stylesheet(css).unwrap();
    let (tokens, spans) = tokenize_with_spans(css);

    for size in [1, 2, 3, 7, 64] {
        let mut stream = RuleStream::stylesheet(StylesheetBuilder::new());
        for (tokens, spans) in tokens.chunks(size).zip(spans.chunks(size)) {
            stream.feed(tokens, spans).unwrap();
        }
        let (builder, _) = stream.finish().unwrap();
        let (sheet, _) = builder.into_stylesheet().unwrap();
        assert_eq!(sheet, whole, "chunks of {size}");
    }
}

#[test]
fn test_rule_stream_waits_for_whole_declarations() {
    let (tokens, spans) = tokenize_with_spans("a { b: c; d: e }");
    let semicolon = tokens.iter().position(|t| *t == CssToken::Semicolon).unwrap();
    let mut stream = RuleStream::stylesheet(Counter::default());
    stream.feed(&tokens[..semicolon], &spans[..semicolon]).unwrap();
    assert_eq!(stream.consumer().unwrap().rules, 1);
    assert_eq!(stream.consumer().unwrap().declarations, 0);

    stream.feed(&tokens[semicolon..], &spans[semicolon..]).unwrap();
    let (counter, log) = stream.finish().unwrap();
    assert_eq!(counter.declarations, 2);
    assert!(log.is_empty());
}
