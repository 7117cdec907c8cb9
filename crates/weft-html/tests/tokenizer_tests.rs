//! Integration tests for the HTML tokenizer.

use weft_common::{ParseError, Status};
use weft_encoding::Encoding;
use weft_html::tokenizer::{
    TextKind, Token, Tokenizer, TokenizerError, TokenizerOptions, TokenizerState, tokenize,
};

/// Helper to tokenize with options and return tokens and error codes.
fn tokenize_with(input: &str, options: TokenizerOptions) -> (Vec<Token>, Vec<TokenizerError>) {
    let mut tokenizer = Tokenizer::with_options(Vec::new(), options);
    tokenizer.feed_str(input).unwrap();
    tokenizer.end().unwrap();
    let errors = tokenizer.errors().iter().map(|e| e.code).collect();
    (tokenizer.into_sink(), errors)
}

/// Helper to tokenize a complete input and return tokens and error codes.
fn tokenize_codes(input: &str) -> (Vec<Token>, Vec<TokenizerError>) {
    let (tokens, errors) = tokenize(input).unwrap();
    (tokens, errors.iter().map(|e| e.code).collect())
}

/// Helper to collect the data of all text tokens.
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Text(text) => Some(text.data.as_str()),
            _ => None,
        })
        .collect()
}

// ========== basic tokens ==========

#[test]
fn test_text_run_is_one_token() {
    let (tokens, errors) = tokenize_codes("Hello");
    assert_eq!(tokens.len(), 2); // text + EOF
    assert!(matches!(&tokens[0], Token::Text(text) if text.data == "Hello" && text.kind == TextKind::Data));
    assert!(tokens[1].is_eof());
    assert!(errors.is_empty());
}

#[test]
fn test_start_tag_with_attributes() {
    let (tokens, errors) = tokenize_codes(r#"<DIV Class="a" id=b data-x='c' hidden/>"#);
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token, got {:?}", tokens[0]);
    };
    assert_eq!(tag.name, "div");
    assert!(tag.self_closing);
    assert_eq!(tag.attribute("class"), Some("a"));
    assert_eq!(tag.attribute("id"), Some("b"));
    assert_eq!(tag.attribute("data-x"), Some("c"));
    assert_eq!(tag.attribute("hidden"), Some(""));
    assert!(errors.is_empty());
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let (tokens, errors) = tokenize_codes("<a href=1 href=2>");
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(tag.attributes.len(), 1);
    assert_eq!(tag.attribute("href"), Some("1"));
    assert_eq!(errors, vec![TokenizerError::DuplicateAttribute]);
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    let (tokens, errors) = tokenize_codes("</p class=x>");
    assert!(matches!(&tokens[0], Token::EndTag(tag) if tag.name == "p"));
    assert_eq!(errors, vec![TokenizerError::EndTagWithAttributes]);
}

#[test]
fn test_comments() {
    let (tokens, errors) = tokenize_codes("<!-- a -- b --><!---->");
    assert!(matches!(&tokens[0], Token::Comment { data, .. } if data == " a -- b "));
    assert!(matches!(&tokens[1], Token::Comment { data, .. } if data.is_empty()));
    assert!(errors.is_empty());

    let (tokens, errors) = tokenize_codes("<!-->");
    assert!(matches!(&tokens[0], Token::Comment { data, .. } if data.is_empty()));
    assert_eq!(errors, vec![TokenizerError::AbruptClosingOfEmptyComment]);
}

#[test]
fn test_cdata_outside_foreign_content_is_bogus_comment() {
    let (tokens, errors) = tokenize_codes("<![CDATA[x]]>");
    assert!(matches!(&tokens[0], Token::Comment { data, .. } if data == "[CDATA[x]]"));
    assert_eq!(errors, vec![TokenizerError::CdataInHtmlContent]);
}

// ========== DOCTYPE ==========

#[test]
fn test_doctype() {
    let (tokens, errors) = tokenize_codes("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    let Token::Doctype(doctype) = &tokens[0] else {
        panic!("Expected DOCTYPE token");
    };
    assert_eq!(doctype.name.as_deref(), Some("html"));
    assert!(!doctype.force_quirks);
    assert!(errors.is_empty());
}

#[test]
fn test_doctype_identifiers() {
    let (tokens, _) = tokenize_codes(
        r#"<!doctype HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#,
    );
    let Token::Doctype(doctype) = &tokens[0] else {
        panic!("Expected DOCTYPE token");
    };
    assert_eq!(doctype.name.as_deref(), Some("html"));
    assert_eq!(
        doctype.public_identifier.as_deref(),
        Some("-//W3C//DTD HTML 4.01//EN")
    );
    assert_eq!(
        doctype.system_identifier.as_deref(),
        Some("http://www.w3.org/TR/html4/strict.dtd")
    );
}

#[test]
fn test_doctype_at_eof_forces_quirks() {
    let (tokens, errors) = tokenize_codes("<!DOCTYPE html");
    assert_eq!(tokens.len(), 2);
    let Token::Doctype(doctype) = &tokens[0] else {
        panic!("Expected DOCTYPE token");
    };
    assert!(doctype.force_quirks);
    assert_eq!(errors, vec![TokenizerError::EofInDoctype]);
}

// ========== text states ==========

#[test]
fn test_script_end_tag_needs_exact_name() {
    let options = TokenizerOptions::default()
        .with_initial_state(TokenizerState::ScriptData)
        .with_last_start_tag("script");
    let (tokens, errors) = tokenize_with("a</scriptx>b</script>", options);
    assert!(matches!(&tokens[0], Token::Text(text)
        if text.data == "a</scriptx>b" && text.kind == TextKind::ScriptData));
    assert!(matches!(&tokens[1], Token::EndTag(tag) if tag.name == "script"));
    assert!(errors.is_empty());
}

#[test]
fn test_rcdata_resolves_references_rawtext_does_not() {
    let options = TokenizerOptions::default()
        .with_initial_state(TokenizerState::Rcdata)
        .with_last_start_tag("title");
    let (tokens, _) = tokenize_with("a&amp;b<b></title>", options);
    assert_eq!(text_of(&tokens), "a&b<b>");

    let options = TokenizerOptions::default()
        .with_initial_state(TokenizerState::Rawtext)
        .with_last_start_tag("style");
    let (tokens, _) = tokenize_with("a&amp;b</style>", options);
    assert_eq!(text_of(&tokens), "a&amp;b");
}

#[test]
fn test_plaintext_runs_to_eof() {
    let options = TokenizerOptions::default().with_initial_state(TokenizerState::Plaintext);
    let (tokens, errors) = tokenize_with("</plaintext><b>", options);
    assert_eq!(tokens.len(), 2);
    assert_eq!(text_of(&tokens), "</plaintext><b>");
    assert!(errors.is_empty());
}

// ========== character references ==========

#[test]
fn test_named_character_references() {
    let (tokens, errors) = tokenize_codes("&lt;&amp;&notin;&NotEqualTilde;");
    assert_eq!(text_of(&tokens), "<&\u{2209}\u{2242}\u{338}");
    assert!(errors.is_empty());
}

#[test]
fn test_legacy_reference_without_semicolon() {
    let (tokens, errors) = tokenize_codes("&notit;");
    assert_eq!(text_of(&tokens), "\u{AC}it;");
    assert_eq!(
        errors,
        vec![TokenizerError::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_reference_in_attribute_followed_by_alphanumeric_is_literal() {
    let (tokens, errors) = tokenize_codes("<a href='?a=1&copy=2'>");
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(tag.attribute("href"), Some("?a=1&copy=2"));
    assert!(errors.is_empty());
}

#[test]
fn test_numeric_character_references() {
    let (tokens, errors) = tokenize_codes("&#65;&#x42;&#x80;&#0;&#xD800;&#x110000;");
    assert_eq!(
        text_of(&tokens),
        "AB\u{20AC}\u{FFFD}\u{FFFD}\u{FFFD}"
    );
    assert_eq!(
        errors,
        vec![
            TokenizerError::ControlCharacterReference,
            TokenizerError::NullCharacterReference,
            TokenizerError::SurrogateCharacterReference,
            TokenizerError::CharacterReferenceOutsideUnicodeRange,
        ]
    );
}

#[test]
fn test_unknown_named_reference() {
    let (tokens, errors) = tokenize_codes("&foo;");
    assert_eq!(text_of(&tokens), "&foo;");
    assert_eq!(errors, vec![TokenizerError::UnknownNamedCharacterReference]);
}

// ========== input preprocessing ==========

#[test]
fn test_newlines_are_normalized() {
    let (tokens, _) = tokenize_codes("a\r\nb\rc\n");
    assert_eq!(text_of(&tokens), "a\nb\nc\n");
}

#[test]
fn test_null_in_data_is_passed_through_with_error() {
    let (tokens, errors) = tokenize_codes("a\0b");
    assert!(matches!(&tokens[0], Token::Text(text) if text.data == "a\0b" && text.has_null));
    assert_eq!(errors, vec![TokenizerError::UnexpectedNullCharacter]);
}

#[test]
fn test_error_positions_are_code_point_offsets() {
    let (_, errors) = tokenize("é\0").unwrap();
    assert_eq!(
        errors,
        vec![ParseError {
            code: TokenizerError::UnexpectedNullCharacter,
            position: 1,
        }]
    );
}

// ========== session lifecycle ==========

#[test]
fn test_feeding_after_end_fails() {
    let mut tokenizer = Tokenizer::new(Vec::new());
    tokenizer.feed_str("<p>").unwrap();
    tokenizer.end().unwrap();
    assert!(tokenizer.is_finished());
    assert_eq!(tokenizer.feed_str("x"), Err(Status::Failed));
}

#[test]
fn test_begin_resets_the_session() {
    let mut tokenizer = Tokenizer::new(Vec::new());
    tokenizer.feed_str("<!DOCTYPE").unwrap();
    tokenizer.end().unwrap();
    assert_eq!(tokenizer.errors().len(), 1);

    tokenizer.begin();
    tokenizer.feed_str("<p>").unwrap();
    tokenizer.end().unwrap();
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_source_text_with_kept_spans() {
    let options = TokenizerOptions::default().with_text_spans(true);
    let mut tokenizer = Tokenizer::with_options(Vec::new(), options);
    tokenizer.feed_str("<p class=x>hi</p>").unwrap();
    tokenizer.end().unwrap();
    let spans: Vec<_> = tokenizer.sink().iter().map(Token::span).collect();
    assert_eq!(tokenizer.source_text(spans[0]).as_deref(), Some("<p class=x>"));
    assert_eq!(tokenizer.source_text(spans[1]).as_deref(), Some("hi"));
    assert_eq!(tokenizer.source_text(spans[2]).as_deref(), Some("</p>"));
}

#[test]
fn test_feed_bytes_decodes_with_configured_encoding() {
    let options = TokenizerOptions::default().with_encoding(Encoding::Windows1252);
    let mut tokenizer = Tokenizer::with_options(Vec::new(), options);
    tokenizer.feed_bytes(b"<p>caf\xE9 \x80").unwrap();
    tokenizer.end().unwrap();
    assert_eq!(text_of(tokenizer.sink()), "caf\u{E9} \u{20AC}");
}
