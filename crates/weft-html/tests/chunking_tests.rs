//! Chunk-boundary invariance: any split of the input yields the same tokens
//! and the same parse errors as feeding it whole.

use weft_common::ParseError;
use weft_encoding::Encoding;
use weft_html::tokenizer::{Token, Tokenizer, TokenizerError, TokenizerOptions, tokenize};

const DOCUMENTS: &[&str] = &[
    "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\"><html lang=en>",
    "<title>HTML chunks parsing</title><p class='a b' data-x=\"&amp;\">x &notin; y &notit; z</p>",
    "<!-- comment -- here --><!---><?pi?><![CDATA[x]]></br/>",
    "a\r\nb\rc\0d &#x80; &#65 &NotEqualTilde; &bogus; </>",
    "<a href=x&copy=y b='&lt;' c = d e/ f>text",
    "<!DOCTYPE html",
];

/// Helper to tokenize `input` fed as the given chunks.
fn tokenize_chunks(chunks: &[&str]) -> (Vec<Token>, Vec<ParseError<TokenizerError>>) {
    let mut tokenizer = Tokenizer::new(Vec::new());
    for chunk in chunks {
        tokenizer.feed_str(chunk).unwrap();
    }
    tokenizer.end().unwrap();
    let errors = tokenizer.errors().to_vec();
    (tokenizer.into_sink(), errors)
}

#[test]
fn test_title_in_four_chunks() {
    let (tokens, errors) = tokenize_chunks(&["<ti", "tle>HTML chun", "ks parsing</", "title>"]);
    assert!(errors.is_empty());
    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[0], Token::StartTag(tag) if tag.name == "title"));
    assert!(matches!(&tokens[1], Token::Text(text) if text.data == "HTML chunks parsing"));
    assert!(matches!(&tokens[2], Token::EndTag(tag) if tag.name == "title"));
    assert!(tokens[3].is_eof());
}

#[test]
fn test_every_split_point_matches_whole_input() {
    for document in DOCUMENTS {
        let expected = tokenize(document).unwrap();
        let boundaries: Vec<usize> = document
            .char_indices()
            .map(|(index, _)| index)
            .skip(1)
            .collect();
        for split in boundaries {
            let actual = tokenize_chunks(&[&document[..split], &document[split..]]);
            assert_eq!(actual, expected, "{document:?} split at {split}");
        }
    }
}

#[test]
fn test_one_character_at_a_time() {
    for document in DOCUMENTS {
        let expected = tokenize(document).unwrap();
        let pieces: Vec<String> = document.chars().map(String::from).collect();
        let chunks: Vec<&str> = pieces.iter().map(String::as_str).collect();
        assert_eq!(tokenize_chunks(&chunks), expected, "{document:?}");
    }
}

#[test]
fn test_cr_lf_split_across_chunks() {
    let (tokens, _) = tokenize_chunks(&["a\r", "\nb"]);
    assert!(matches!(&tokens[0], Token::Text(text) if text.data == "a\nb"));
}

#[test]
fn test_multibyte_sequence_split_across_byte_chunks() {
    let bytes = "<p>\u{4E2D}\u{6587}</p>".as_bytes();
    let expected = tokenize("<p>\u{4E2D}\u{6587}</p>").unwrap().0;
    for split in 1..bytes.len() {
        let options = TokenizerOptions::default().with_encoding(Encoding::Utf8);
        let mut tokenizer = Tokenizer::with_options(Vec::new(), options);
        tokenizer.feed_bytes(&bytes[..split]).unwrap();
        tokenizer.feed_bytes(&bytes[split..]).unwrap();
        tokenizer.end().unwrap();
        assert!(tokenizer.errors().is_empty(), "split at {split}");
        assert_eq!(tokenizer.into_sink(), expected, "split at {split}");
    }
}
