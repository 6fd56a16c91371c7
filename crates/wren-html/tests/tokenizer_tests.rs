//! Integration tests for the HTML tokenizer.

use wren_common::ParseErrorList;
use wren_html::{CharacterReader, Token, Tokenizer};

/// Helper to tokenize a string and return the tokens, ending with EOF
fn tokenize(input: &str) -> Vec<Token> {
    tokenize_with_errors(input).0
}

fn tokenize_with_errors(input: &str) -> (Vec<Token>, ParseErrorList) {
    let mut tokenizer = Tokenizer::new(CharacterReader::new(input), ParseErrorList::tracking(16));
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.read();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    (tokens, tokenizer.into_errors())
}

fn text(token: &Token) -> &str {
    match token {
        Token::Character { data } => data,
        other => panic!("Expected character token, got {other:?}"),
    }
}

#[test]
fn test_plain_text_is_one_run() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 2);
    assert_eq!(text(&tokens[0]), "Hello");
    assert!(tokens[1].is_eof());
}

#[test]
fn test_read_after_eof_keeps_returning_eof() {
    let mut tokenizer = Tokenizer::new(CharacterReader::new(""), ParseErrorList::no_tracking());
    assert!(tokenizer.read().is_eof());
    assert!(tokenizer.read().is_eof());
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name,
            pub_sys_key,
            force_quirks,
            ..
        } => {
            assert_eq!(name, "html");
            assert!(pub_sys_key.is_none());
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">",
    );
    match &tokens[0] {
        Token::Doctype {
            pub_sys_key,
            public_id,
            system_id,
            force_quirks,
            ..
        } => {
            assert_eq!(pub_sys_key.as_deref(), Some("PUBLIC"));
            assert_eq!(public_id, "-//W3C//DTD HTML 4.01//EN");
            assert_eq!(system_id, "http://www.w3.org/TR/html4/strict.dtd");
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_tag_name_case_is_kept_but_normal_name_folds() {
    let tokens = tokenize("<DiV></DIV>");
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "DiV"));
    assert_eq!(tokens[0].normal_name().as_deref(), Some("div"));
    assert_eq!(tokens[1].normal_name().as_deref(), Some("div"));
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</p>");
    assert!(matches!(&tokens[0], Token::EndTag { name } if name == "p"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert!(matches!(
        &tokens[0],
        Token::Comment { data, bogus: false } if data == " hello "
    ));
}

#[test]
fn test_question_mark_opens_bogus_comment() {
    let tokens = tokenize("<?xml version=\"1.0\"?>");
    assert!(matches!(
        &tokens[0],
        Token::Comment { data, bogus: true } if data == "?xml version=\"1.0\"?"
    ));
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize("<a href=\"/one\" title='two' rel=three hidden>");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(attributes.get("href"), Some("/one"));
    assert_eq!(attributes.get("title"), Some("two"));
    assert_eq!(attributes.get("rel"), Some("three"));
    assert_eq!(attributes.get("hidden"), Some(""));
    assert_eq!(attributes.len(), 4);
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let (tokens, errors) = tokenize_with_errors("<p id=one ID=two>");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes.get("id"), Some("one"));
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi there</p>");
    assert_eq!(tokens.len(), 4);
    assert_eq!(text(&tokens[1]), "Hi there");
    assert!(matches!(&tokens[2], Token::EndTag { name } if name == "p"));
}

#[test]
fn test_less_than_before_non_letter_is_text() {
    let (tokens, errors) = tokenize_with_errors("a <3 b");
    assert_eq!(tokens.len(), 2);
    assert_eq!(text(&tokens[0]), "a <3 b");
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_unclosed_tag_at_eof_is_dropped() {
    let (tokens, errors) = tokenize_with_errors("text<div class");
    assert_eq!(tokens.len(), 2);
    assert_eq!(text(&tokens[0]), "text");
    assert!(!errors.is_empty());
}

#[test]
fn test_cdata_section() {
    let tokens = tokenize("<![CDATA[x < y]]>");
    assert!(matches!(&tokens[0], Token::CData { data } if data == "x < y"));
}

// ========== character references ==========

#[test]
fn test_named_character_references() {
    let tokens = tokenize("a &amp; b &lt;c&gt;");
    assert_eq!(text(&tokens[0]), "a & b <c>");
}

#[test]
fn test_legacy_reference_without_semicolon() {
    let (tokens, errors) = tokenize_with_errors("&copy 2024");
    assert_eq!(text(&tokens[0]), "\u{a9} 2024");
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_unknown_reference_is_literal() {
    let tokens = tokenize("&nosuchthing; & done");
    assert_eq!(text(&tokens[0]), "&nosuchthing; & done");
}

#[test]
fn test_numeric_references() {
    let tokens = tokenize("&#65;&#x42;&#X43;&#128;");
    assert_eq!(text(&tokens[0]), "ABC\u{20ac}");
}

#[test]
fn test_null_numeric_reference_becomes_replacement() {
    let tokens = tokenize("&#0;");
    assert_eq!(text(&tokens[0]), "\u{fffd}");
}

#[test]
fn test_reference_in_attribute_value() {
    let tokens = tokenize("<a title=\"&lt;b&gt;\" href=\"?a=1&copy=2\">");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(attributes.get("title"), Some("<b>"));
    assert_eq!(attributes.get("href"), Some("?a=1&copy=2"));
}

#[test]
fn test_errors_are_capped() {
    let mut tokenizer = Tokenizer::new(
        CharacterReader::new("<3 <3 <3 <3 <3"),
        ParseErrorList::tracking(2),
    );
    while !tokenizer.read().is_eof() {}
    assert_eq!(tokenizer.errors().len(), 2);
}
