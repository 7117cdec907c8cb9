//! Integration tests for the CSS tokenizer: input modes, serialization and
//! parse errors.

use weft_common::Span;
use weft_css::tokenizer::{
    CssToken, CssTokenizer, CssTokenizerError, CssTokenizerOptions, token_to_string, tokenize,
    tokenize_with_spans,
};

const STYLESHEETS: &[&str] = &[
    "a { color: #fff; width: calc(100% - 2px) }",
    "@media (min-width: 600px) { .x > y ~ z { margin: -1.5e3px +.5em } }",
    "url( img.png ) url(bad url) 'str\\'ing' \"a\\\nb\"",
    "/* comment */ <!-- --> u+10?? \\31 23 --custom: {a}; !important",
    "a\r\nb\rc\u{c}d\0e 'unterminated",
];

/// Tokenize `input` pushed in the given chunks.
fn tokenize_chunks(chunks: &[&str]) -> (Vec<CssToken>, Vec<Span>) {
    let mut tokenizer = CssTokenizer::streaming(CssTokenizerOptions::default());
    for chunk in chunks {
        tokenizer.feed(chunk).unwrap();
    }
    tokenizer.end().unwrap();
    tokenizer.into_parts()
}

// ========== Input modes ==========

#[test]
fn test_whole_input_ends_with_eof() {
    let tokens = tokenize("a:b");
    assert_eq!(
        tokens,
        vec![
            CssToken::ident("a"),
            CssToken::Colon,
            CssToken::ident("b"),
            CssToken::Eof
        ]
    );
}

#[test]
fn test_every_split_point_matches_whole_input() {
    for css in STYLESHEETS {
        let expected = tokenize_with_spans(css);
        let boundaries: Vec<usize> = css.char_indices().map(|(index, _)| index).skip(1).collect();
        for split in boundaries {
            let actual = tokenize_chunks(&[&css[..split], &css[split..]]);
            assert_eq!(actual, expected, "{css:?} split at {split}");
        }
    }
}

#[test]
fn test_one_code_point_per_chunk() {
    for css in STYLESHEETS {
        let chunks: Vec<String> = css.chars().map(String::from).collect();
        let chunks: Vec<&str> = chunks.iter().map(String::as_str).collect();
        assert_eq!(tokenize_chunks(&chunks), tokenize_with_spans(css), "{css:?}");
    }
}

#[test]
fn test_long_tokens_in_small_chunks() {
    let body = "x/".repeat(100_000);
    let inputs = [
        format!("/*{body}*/a"),
        format!("a{{b:'{body}'}}"),
        format!("--{}: 1", "n".repeat(200_000)),
        format!("url({body})"),
    ];
    for css in &inputs {
        let chunks: Vec<&str> = css
            .as_bytes()
            .chunks(200)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect();
        assert_eq!(tokenize_chunks(&chunks), tokenize_with_spans(css));
    }
}

#[test]
fn test_pull_mode_matches_whole_input() {
    for css in STYLESHEETS {
        let mut chunks = css
            .chars()
            .collect::<Vec<_>>()
            .chunks(3)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
            .into_iter();
        let mut tokenizer =
            CssTokenizer::with_pull(CssTokenizerOptions::default(), move || Ok(chunks.next()));
        tokenizer.run().unwrap();
        assert_eq!(tokenizer.into_parts(), tokenize_with_spans(css), "{css:?}");
    }
}

#[test]
fn test_pull_errors_are_returned() {
    let mut calls = 0;
    let mut tokenizer = CssTokenizer::with_pull(CssTokenizerOptions::default(), move || {
        calls += 1;
        if calls == 1 {
            Ok(Some("abc".to_string()))
        } else {
            Err(weft_common::Status::Stopped)
        }
    });
    assert_eq!(tokenizer.run(), Err(weft_common::Status::Stopped));
}

#[test]
fn test_feed_after_end_fails() {
    let mut tokenizer = CssTokenizer::streaming(CssTokenizerOptions::default());
    tokenizer.feed("a").unwrap();
    tokenizer.end().unwrap();
    assert_eq!(tokenizer.feed("b"), Err(weft_common::Status::Failed));

    tokenizer.begin();
    tokenizer.feed("b").unwrap();
    tokenizer.end().unwrap();
    assert_eq!(tokenizer.tokens(), &[CssToken::ident("b"), CssToken::Eof]);
}

// ========== Token kinds ==========

#[test]
fn test_numeric_tokens() {
    let tokens = tokenize("12 -3.5 50% 2em +.5");
    assert_eq!(tokens[0], CssToken::integer(12));
    assert!(matches!(tokens[2], CssToken::Number { value, signed: true, int_value: None, .. } if value == -3.5));
    assert_eq!(tokens[4], CssToken::percentage(50.0, Some(50)));
    assert_eq!(tokens[6], CssToken::dimension(2.0, Some(2), "em"));
    assert!(matches!(tokens[8], CssToken::Number { signed: true, .. }));
}

#[test]
fn test_url_tokens() {
    let tokens = tokenize("url( a.png ) url(\"b.png\") url(c d)");
    assert_eq!(tokens[0], CssToken::Url("a.png".to_string()));
    assert_eq!(tokens[2], CssToken::function("url"));
    assert_eq!(tokens[3], CssToken::string("b.png"));
    assert_eq!(tokens[6], CssToken::BadUrl);
}

#[test]
fn test_comments_kept_on_request() {
    let mut tokenizer = CssTokenizer::with_options(
        "a/* x */b",
        CssTokenizerOptions::default().with_comments(true),
    );
    tokenizer.run().unwrap();
    assert_eq!(
        tokenizer.tokens(),
        &[
            CssToken::ident("a"),
            CssToken::Comment(" x ".to_string()),
            CssToken::ident("b"),
            CssToken::Eof
        ]
    );
    assert_eq!(tokenize("a/* x */b").len(), 3);
}

#[test]
fn test_spans_cover_source() {
    let css = "a { b: c }";
    let (tokens, spans) = tokenize_with_spans(css);
    assert_eq!(tokens.len(), spans.len());
    assert_eq!(spans[0], Span::new(0, 1));
    assert_eq!(spans[2], Span::new(2, 3));
    assert_eq!(spans.last().map(|span| span.start), Some(css.len()));
}

// ========== Parse errors ==========

#[test]
fn test_parse_error_codes() {
    let mut tokenizer = CssTokenizer::new("'a\nb /* c");
    tokenizer.run().unwrap();
    let codes: Vec<CssTokenizerError> = tokenizer.errors().iter().map(|e| e.code).collect();
    assert_eq!(
        codes,
        vec![CssTokenizerError::NewlineInString, CssTokenizerError::EofInComment]
    );
    assert_eq!(tokenizer.tokens()[0], CssToken::BadString);
    assert_eq!(CssTokenizerError::EofInComment.to_string(), "eof-in-comment");
}

// ========== Serialization ==========

#[test]
fn test_serialized_tokens_retokenize_equal() {
    for css in [
        "a { color: #fff; width: calc(100% - 2px) }",
        "@import url(x.png) 'q\"uote' screen",
        ".\\31 0 #\\@x --var 1.5 -7 [x=y]",
    ] {
        let tokens = tokenize(css);
        let mut text = String::new();
        for token in &tokens {
            text.push_str(&token_to_string(token).unwrap());
        }
        assert_eq!(tokenize(&text), tokens, "{css:?} -> {text:?}");
    }
}
