use jsser_core::{tokenize, Error, Token};

fn num(raw: &str) -> Token {
    Token::Number(raw.to_string())
}

fn string(s: &str) -> Token {
    Token::String(s.to_string())
}

// ============================================================================
// Structural tokens and keywords
// ============================================================================

#[test]
fn tokenize_empty_input() {
    assert_eq!(tokenize("").unwrap(), vec![]);
    assert_eq!(tokenize("  \n\t ").unwrap(), vec![]);
}

#[test]
fn tokenize_structural_characters() {
    assert_eq!(
        tokenize("[ ] { } , :").unwrap(),
        vec![
            Token::ArrayStart,
            Token::ArrayEnd,
            Token::ObjectStart,
            Token::ObjectEnd,
            Token::Comma,
            Token::Colon,
        ]
    );
}

#[test]
fn tokenize_keywords() {
    assert_eq!(
        tokenize("[true,false,null]").unwrap(),
        vec![
            Token::ArrayStart,
            Token::Bool(true),
            Token::Comma,
            Token::Bool(false),
            Token::Comma,
            Token::Null,
            Token::ArrayEnd,
        ]
    );
}

#[test]
fn tokenize_keywords_case_insensitive() {
    assert_eq!(
        tokenize("[TRUE,False]").unwrap(),
        vec![
            Token::ArrayStart,
            Token::Bool(true),
            Token::Comma,
            Token::Bool(false),
            Token::ArrayEnd,
        ]
    );
}

#[test]
fn tokenize_keywords_skip_fixed_length_without_validation() {
    // "txyz" is read as true: only the first letter is looked at.
    assert_eq!(
        tokenize("[txyz,nope]").unwrap(),
        vec![
            Token::ArrayStart,
            Token::Bool(true),
            Token::Comma,
            Token::Null,
            Token::ArrayEnd,
        ]
    );
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn tokenize_numbers_keep_raw_text() {
    assert_eq!(
        tokenize("[1,-7,3.14,1.5E+20]").unwrap(),
        vec![
            Token::ArrayStart,
            num("1"),
            Token::Comma,
            num("-7"),
            Token::Comma,
            num("3.14"),
            Token::Comma,
            num("1.5E+20"),
            Token::ArrayEnd,
        ]
    );
}

#[test]
fn tokenize_number_trailing_whitespace_trimmed() {
    assert_eq!(
        tokenize("[ 1 , 634 ]").unwrap(),
        vec![
            Token::ArrayStart,
            num("1"),
            Token::Comma,
            num("634"),
            Token::ArrayEnd,
        ]
    );
}

#[test]
fn tokenize_number_not_validated() {
    assert_eq!(tokenize("12abc").unwrap(), vec![num("12abc")]);
}

#[test]
fn tokenize_root_number_reads_to_end() {
    assert_eq!(tokenize("42").unwrap(), vec![num("42")]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn tokenize_plain_string() {
    assert_eq!(tokenize(r#""hello world""#).unwrap(), vec![string("hello world")]);
}

#[test]
fn tokenize_string_with_escaped_quote() {
    assert_eq!(
        tokenize(r#""say \"hi\"""#).unwrap(),
        vec![string(r#"say "hi""#)]
    );
}

#[test]
fn tokenize_string_other_escapes_kept_verbatim() {
    assert_eq!(tokenize(r#""a\nb\\c""#).unwrap(), vec![string(r"a\nb\\c")]);
}

#[test]
fn tokenize_string_with_structural_characters() {
    assert_eq!(tokenize(r#""[a,b]:{}""#).unwrap(), vec![string("[a,b]:{}")]);
}

#[test]
fn tokenize_unicode_string() {
    assert_eq!(tokenize(r#""café ☕""#).unwrap(), vec![string("café ☕")]);
}

#[test]
fn tokenize_object() {
    assert_eq!(
        tokenize(r#"{"a": 1, "b": "x"}"#).unwrap(),
        vec![
            Token::ObjectStart,
            string("a"),
            Token::Colon,
            num("1"),
            Token::Comma,
            string("b"),
            Token::Colon,
            string("x"),
            Token::ObjectEnd,
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn tokenize_unterminated_string_fails() {
    let err = tokenize(r#"["abc"#).unwrap_err();
    assert!(
        matches!(err, Error::Tokenize { position: 1, .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn tokenize_string_ending_in_escaped_quote_is_unterminated() {
    assert!(matches!(
        tokenize(r#""abc\""#),
        Err(Error::Tokenize { .. })
    ));
}
