/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::io;

use serde_json::{self, json, Value};

use super::{
    tokenize, ParseError, ParseErrorKind, Source, SourceLocation, SourcePosition,
    StrSource, ToCss, Token, TokenKind, Tokenizer, Utf16Source,
};
use crate::cursor::Cursor;

fn almost_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (&Value::Number(ref a), &Value::Number(ref b)) => {
            let a = a.as_f64().unwrap();
            let b = b.as_f64().unwrap();
            (a - b).abs() <= a.abs() * 1e-6
        }

        (&Value::Bool(a), &Value::Bool(b)) => a == b,
        (&Value::String(ref a), &Value::String(ref b)) => a == b,
        (&Value::Array(ref a), &Value::Array(ref b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(ref a, ref b)| almost_equals(*a, *b))
        }
        (&Value::Object(_), &Value::Object(_)) => panic!("Not implemented"),
        (&Value::Null, &Value::Null) => true,
        _ => false,
    }
}

fn assert_json_eq(results: Value, expected: Value, message: &str) {
    if !almost_equals(&results, &expected) {
        println!(
            "{}",
            ::difference::Changeset::new(
                &serde_json::to_string_pretty(&results).unwrap(),
                &serde_json::to_string_pretty(&expected).unwrap(),
                "\n",
            )
        );
        panic!("{:?}", message)
    }
}

fn run_raw_json_tests<F: Fn(Value, Value) -> ()>(json_data: &str, run: F) {
    let items = match serde_json::from_str(json_data) {
        Ok(Value::Array(items)) => items,
        other => panic!("Invalid JSON: {:?}", other),
    };
    assert!(items.len() % 2 == 0);
    let mut input = None;
    for item in items.into_iter() {
        match (&input, item) {
            (&None, json_obj) => input = Some(json_obj),
            (&Some(_), expected) => {
                let input = input.take().unwrap();
                run(input, expected)
            }
        };
    }
}

fn run_json_tests<F: Fn(&str) -> Value>(json_data: &str, parse: F) {
    run_raw_json_tests(json_data, |input, expected| match input {
        Value::String(input) => {
            let result = parse(&input);
            assert_json_eq(result, expected, &input);
        }
        _ => panic!("Unexpected JSON"),
    });
}

fn token_to_json(token: &Token) -> Value {
    fn numeric(token: &Token) -> Vec<Value> {
        let numeric = token.numeric.as_ref().unwrap();
        vec![
            token.value.clone().into(),
            numeric.value.into(),
            (if numeric.is_integer { "integer" } else { "number" }).into(),
        ]
    }

    match token.kind {
        TokenKind::Hash => json!([
            "hash",
            token.value,
            if token.is_id_like { "id" } else { "unrestricted" }
        ]),
        TokenKind::Number | TokenKind::Percentage => {
            let mut values = vec![token.kind.name().into()];
            values.extend(numeric(token));
            Value::Array(values)
        }
        TokenKind::Dimension => {
            let mut values = vec![token.kind.name().into()];
            values.extend(numeric(token));
            values.push(token.numeric.as_ref().unwrap().unit.clone().into());
            Value::Array(values)
        }
        TokenKind::Cdo
        | TokenKind::Cdc
        | TokenKind::Colon
        | TokenKind::Semicolon
        | TokenKind::Comma
        | TokenKind::LeftSquareBracket
        | TokenKind::RightSquareBracket
        | TokenKind::LeftParen
        | TokenKind::RightParen
        | TokenKind::LeftBrace
        | TokenKind::RightBrace => token.value.clone().into(),
        _ => json!([token.kind.name(), token.value]),
    }
}

fn tokens_to_json(input: &str) -> Value {
    let tokens = tokenize(input);
    let (last, tokens) = tokens.split_last().unwrap();
    assert_eq!(last.kind, TokenKind::EndOfInput);
    Value::Array(tokens.iter().map(token_to_json).collect())
}

/// The normalized form of `input`, as read back from the tokens' representations.
fn normalize(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\x0C', "\n")
        .replace('\0', "\u{FFFD}")
}

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).iter().map(|t| t.kind).collect()
}

#[test]
fn token_list() {
    run_json_tests(include_str!("css-parsing-tests/tokens.json"), |input| {
        tokens_to_json(input)
    });
}

#[test]
fn fixture_kind_names() {
    run_raw_json_tests(include_str!("css-parsing-tests/tokens.json"), |_, expected| {
        for token in expected.as_array().unwrap() {
            if let Some(name) = token.get(0).and_then(Value::as_str) {
                assert!(TokenKind::from_name(name).is_some(), "{}", name);
            }
        }
    });
}

#[test]
fn representations_cover_the_input() {
    run_raw_json_tests(include_str!("css-parsing-tests/tokens.json"), |input, _| {
        let input = input.as_str().unwrap();
        let joined: String = tokenize(input)
            .iter()
            .map(|t| &*t.representation)
            .collect();
        assert_eq!(joined, normalize(input), "{:?}", input);
    });
}

#[test]
fn numeric_payload() {
    let tokens = tokenize("-7 +3.5% 2.5e1em 1E2");
    let number = tokens[0].numeric.as_ref().unwrap();
    assert_eq!(number.value, -7.);
    assert!(number.is_integer && number.has_sign);
    assert_eq!(number.int_value(), Some(-7));
    assert_eq!(number.unit, None);

    let percentage = tokens[2].numeric.as_ref().unwrap();
    assert_eq!(tokens[2].kind, TokenKind::Percentage);
    assert_eq!(tokens[2].value, "+3.5%");
    assert!(!percentage.is_integer && percentage.has_sign);
    assert_eq!(percentage.int_value(), None);
    assert_eq!(percentage.unit_value(), 0.035);

    let dimension = tokens[4].numeric.as_ref().unwrap();
    assert_eq!(tokens[4].kind, TokenKind::Dimension);
    assert_eq!(dimension.value, 25.);
    assert!(!dimension.is_integer && !dimension.has_sign);
    assert_eq!(dimension.unit.as_deref(), Some("em"));

    let exponent = tokens[6].numeric.as_ref().unwrap();
    assert_eq!(tokens[6].kind, TokenKind::Number);
    assert_eq!(exponent.value, 100.);
    assert!(!exponent.is_integer);

    assert!(tokens.iter().all(|t| match t.kind {
        TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension => t.numeric.is_some(),
        _ => t.numeric.is_none(),
    }));
}

#[test]
fn int_value_is_clamped() {
    let tokens = tokenize("99999999999 -99999999999");
    assert_eq!(tokens[0].numeric.as_ref().unwrap().int_value(), Some(i32::MAX));
    assert_eq!(tokens[2].numeric.as_ref().unwrap().int_value(), Some(i32::MIN));
    assert_eq!(tokens[0].numeric.as_ref().unwrap().value, 99999999999.);
}

#[test]
fn brackets_and_cdo() {
    assert_eq!(
        kinds("[a](b){c}<!---->"),
        [
            TokenKind::LeftSquareBracket,
            TokenKind::Ident,
            TokenKind::RightSquareBracket,
            TokenKind::LeftParen,
            TokenKind::Ident,
            TokenKind::RightParen,
            TokenKind::LeftBrace,
            TokenKind::Ident,
            TokenKind::RightBrace,
            TokenKind::Cdo,
            TokenKind::Cdc,
            TokenKind::EndOfInput,
        ]
    );
}

#[test]
fn end_of_input_repeats() {
    let mut tokenizer = Tokenizer::for_str("a");
    assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Ident);
    for _ in 0..3 {
        let token = tokenizer.next_token().unwrap();
        assert!(token.is_end_of_input());
        assert_eq!(token.value, "");
        assert_eq!(token.representation, "");
        assert_eq!(token.offset(), 1);
    }
}

#[test]
fn iterator_stops_after_end_of_input() {
    let tokens: Vec<_> = Tokenizer::for_str("a b")
        .collect::<io::Result<_>>()
        .unwrap();
    assert_eq!(tokens.len(), 4);
    assert!(tokens[3].is_end_of_input());
    assert_eq!(tokenize("").len(), 1);
}

#[test]
fn bad_tokens_are_parse_errors() {
    let tokens = tokenize("\"a\nurl(b c)");
    assert_eq!(tokens[0].kind, TokenKind::BadString);
    assert!(tokens[0].is_parse_error());
    assert!(!tokens[1].is_parse_error());
    assert_eq!(tokens[2].kind, TokenKind::BadUrl);
    assert!(tokens[2].is_parse_error());
    assert_eq!(tokens[2].value, "b c");
    assert_eq!(tokens[2].representation, "url(b c)");
}

#[test]
fn unquoted_url_needs_closing_paren_after_whitespace() {
    let tokens = tokenize("url(a ");
    assert_eq!(tokens[0].kind, TokenKind::BadUrl);
    assert_eq!(tokens[0].value, "a ");
    assert_eq!(tokens[0].representation, "url(a ");
    assert_eq!(tokens[1].kind, TokenKind::EndOfInput);

    let tokens = tokenize("url(a )");
    assert_eq!(tokens[0].kind, TokenKind::Url);
    assert_eq!(tokens[0].value, "a");
}

#[test]
fn unterminated_comment_is_reported() {
    let mut errors = Vec::new();
    {
        let mut tokenizer = Tokenizer::with_reporter(StrSource::new("a\n /* x"), &mut errors);
        while !tokenizer.next_token().unwrap().is_end_of_input() {}
    }
    assert_eq!(
        errors,
        [ParseError {
            kind: ParseErrorKind::UnterminatedComment,
            location: SourceLocation { line: 2, column: 2 },
            position: SourcePosition(3),
        }]
    );
    assert_eq!(errors[0].to_string(), "end of input in comment at 2:2");
}

#[test]
fn unterminated_strings_are_reported() {
    let mut tokenizer = Tokenizer::with_reporter(StrSource::new("'a' \"b"), Vec::new());
    let tokens: Vec<_> = tokenizer.by_ref().collect::<io::Result<_>>().unwrap();
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "b");
    assert_eq!(tokenizer.reporter().len(), 1);
    let errors = tokenizer.into_reporter();
    assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedString);
    assert_eq!(errors[0].position.offset(), 4);
}

#[test]
fn bad_string_is_not_reported() {
    let mut tokenizer = Tokenizer::with_reporter(StrSource::new("'a\n'"), Vec::new());
    let kinds: Vec<_> = tokenizer.by_ref().map(|t| t.unwrap().kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::BadString,
            TokenKind::Whitespace,
            TokenKind::String,
            TokenKind::EndOfInput,
        ]
    );
    // Only the trailing quote, which opens a string that never ends.
    let errors = tokenizer.into_reporter();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].location, SourceLocation { line: 2, column: 1 });
}

#[test]
fn errors_can_be_discarded() {
    let mut tokenizer = Tokenizer::with_reporter(StrSource::new("/*"), ());
    assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Comment);
}

#[test]
fn line_numbers() {
    let tokens = tokenize("foo bar\nbaz\r\n\n\"a\\\r\nb\"");
    let locations: Vec<_> = tokens
        .iter()
        .map(|t| (t.kind, t.location.line, t.location.column, t.offset()))
        .collect();
    assert_eq!(
        locations,
        [
            (TokenKind::Ident, 1, 1, 0),
            (TokenKind::Whitespace, 1, 4, 3),
            (TokenKind::Ident, 1, 5, 4),
            (TokenKind::Whitespace, 1, 8, 7),
            (TokenKind::Ident, 2, 1, 8),
            (TokenKind::Whitespace, 2, 4, 11),
            (TokenKind::String, 4, 1, 13),
            (TokenKind::EndOfInput, 5, 3, 19),
        ]
    );
    assert_eq!(tokens[6].value, "ab");
    assert_eq!(tokens[6].representation, "\"a\\\nb\"");
    assert_eq!(tokens[6].line(), 4);
    assert_eq!(tokens[6].location.to_string(), "4:1");
}

#[test]
fn columns_count_code_points() {
    let tokens = tokenize("é😀 x");
    assert_eq!(tokens[2].location, SourceLocation { line: 1, column: 4 });
    assert_eq!(tokens[2].offset(), 3);
}

#[test]
fn kind_names() {
    let all = [
        TokenKind::Comment,
        TokenKind::Ident,
        TokenKind::Function,
        TokenKind::AtKeyword,
        TokenKind::Hash,
        TokenKind::String,
        TokenKind::BadString,
        TokenKind::Url,
        TokenKind::BadUrl,
        TokenKind::Delim,
        TokenKind::Number,
        TokenKind::Percentage,
        TokenKind::Dimension,
        TokenKind::Whitespace,
        TokenKind::Cdo,
        TokenKind::Cdc,
        TokenKind::Colon,
        TokenKind::Semicolon,
        TokenKind::Comma,
        TokenKind::LeftSquareBracket,
        TokenKind::RightSquareBracket,
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::EndOfInput,
    ];
    for &kind in all.iter() {
        assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
        assert_eq!(kind.to_string(), kind.name());
    }
    assert_eq!(TokenKind::from_name("Bad-URL"), Some(TokenKind::BadUrl));
    assert_eq!(TokenKind::from_name("AT-KEYWORD"), Some(TokenKind::AtKeyword));
    assert_eq!(TokenKind::from_name("unicode-range"), None);
    assert_eq!(TokenKind::from_name("a-name-longer-than-any-kind-name"), None);
    assert_eq!(TokenKind::from_name("é"), None);
}

#[test]
fn match_ignore_ascii_case() {
    fn is_url(name: &str) -> bool {
        match_ignore_ascii_case! { name,
            "url" | "url-prefix" => true,
            _ => false,
        }
    }
    assert!(is_url("url"));
    assert!(is_url("URL"));
    assert!(is_url("Url-Prefix"));
    assert!(!is_url("urls"));
    assert!(!is_url("a-much-longer-name"));
    assert!(!is_url("ürl"));
}

#[test]
fn utf16_input() {
    let units: Vec<u16> = "a😀 b".encode_utf16().collect();
    let tokens: Vec<_> = Tokenizer::new(Utf16Source::new(units))
        .collect::<io::Result<_>>()
        .unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].value, "a😀");
    assert_eq!(tokens[2].location.column, 4);

    let lone = [0x61, 0xDC00, 0x62];
    let tokens: Vec<_> = Tokenizer::new(Utf16Source::new(lone.iter().cloned()))
        .collect::<io::Result<_>>()
        .unwrap();
    assert_eq!(tokens[0].value, "a\u{FFFD}b");
    assert_eq!(tokens.len(), 2);
}

#[test]
fn decoded_bytes() {
    let (css, _, had_errors) =
        encoding_rs::WINDOWS_1252.decode(b"p { content: \"caf\xe9\" }");
    assert!(!had_errors);
    let tokens = tokenize(&css);
    let string = tokens
        .iter()
        .find(|t| t.kind == TokenKind::String)
        .unwrap();
    assert_eq!(string.value, "café");

    let (css, had_errors) = encoding_rs::UTF_8.decode_without_bom_handling(b"a\xffb");
    assert!(had_errors);
    assert_eq!(tokenize(&css)[0].value, "a\u{FFFD}b");
}

/// Hands out a few code points, then fails.
struct Disconnected {
    remaining: Vec<u32>,
}

impl Source for Disconnected {
    fn read_unit(&mut self) -> io::Result<Option<u32>> {
        if self.remaining.is_empty() {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "disconnected"))
        } else {
            Ok(Some(self.remaining.remove(0)))
        }
    }
}

#[test]
fn source_errors_are_propagated() {
    let source = Disconnected {
        remaining: vec!['a' as u32, ' ' as u32, 'b' as u32],
    };
    let mut tokenizer = Tokenizer::with_reporter(source, Vec::new());
    assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Ident);
    assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Whitespace);
    let error = tokenizer.next_token().unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::ConnectionReset);
    assert!(tokenizer.into_reporter().is_empty());

    let source = Disconnected {
        remaining: vec!['x' as u32],
    };
    let results: Vec<_> = Tokenizer::new(source).collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}

#[test]
fn into_source() {
    let tokenizer = Tokenizer::for_str("abc");
    let mut source = tokenizer.into_source();
    assert_eq!(source.read_unit().unwrap(), Some('a' as u32));
}

#[test]
fn cursor_push_back_and_peek() {
    let mut cursor = Cursor::new(StrSource::new("ab😀c"));
    assert_eq!(cursor.advance().unwrap(), Some('a'));
    assert_eq!(cursor.advance().unwrap(), Some('b'));
    assert_eq!(cursor.consumed(), "ab");
    cursor.push_back(Some('b'));
    assert_eq!(cursor.consumed(), "a");
    assert_eq!(cursor.peek().unwrap(), Some('b'));
    assert_eq!(cursor.peek3().unwrap(), [Some('b'), Some('😀'), Some('c')]);
    assert_eq!(cursor.consumed(), "a");
    for &c in ['b', '😀', 'c'].iter() {
        assert_eq!(cursor.advance().unwrap(), Some(c));
    }
    assert_eq!(cursor.peek3().unwrap(), [None, None, None]);
    assert_eq!(cursor.advance().unwrap(), None);
    cursor.push_back(None);
    assert_eq!(cursor.consumed(), "ab😀c");
    let (position, location) = cursor.start_token();
    assert_eq!(position.offset(), 4);
    assert_eq!(location, SourceLocation { line: 1, column: 5 });
    assert_eq!(cursor.consumed(), "");
}

#[test]
fn cursor_tracks_lines() {
    let mut cursor = Cursor::new(StrSource::new("a\r\nbc"));
    cursor.advance().unwrap();
    cursor.advance().unwrap();
    let (position, location) = cursor.start_token();
    assert_eq!(position.offset(), 2);
    assert_eq!(location, SourceLocation { line: 2, column: 1 });
    // Pushed back code points are not committed.
    cursor.advance().unwrap();
    let c = cursor.advance().unwrap();
    cursor.push_back(c);
    let (position, location) = cursor.start_token();
    assert_eq!(position.offset(), 3);
    assert_eq!(location, SourceLocation { line: 2, column: 2 });
    assert_eq!(cursor.advance().unwrap(), Some('c'));
}

#[test]
fn serializer() {
    fn serialized(input: &str) -> String {
        tokenize(input).iter().map(|t| t.to_css_string()).collect()
    }
    assert_eq!(serialized("a\\ b"), "a\\ b");
    assert_eq!(serialized("\\31 a"), "\\31 a");
    assert_eq!(serialized("-\\31 a"), "-\\31 a");
    assert_eq!(serialized("--\\31 a"), "--1a");
    assert_eq!(serialized("\\-"), "\\-");
    assert_eq!(serialized("#foo #1a2b #\\31 x"), "#foo #1a2b #\\31 x");
    assert_eq!(serialized("@media"), "@media");
    assert_eq!(serialized("rgb("), "rgb(");
    assert_eq!(serialized("'a\"b'"), "\"a\\\"b\"");
    assert_eq!(serialized("\"a\\\\b\""), "\"a\\\\b\"");
    assert_eq!(serialized("url(a\\ b)"), "url(a\\20 b)");
    assert_eq!(serialized("url(a\\)b)"), "url(a\\)b)");
    assert_eq!(serialized("\"abc\n"), "\"abc\n");
    assert_eq!(serialized("/* x */"), "/* x */");
    assert_eq!(serialized("12 +4.01 -0.5 10px 50% +7"), "12 +4.01 -0.5 10px 50% +7");
    assert_eq!(serialized("1\\65 "), "1\\65 ");
    assert_eq!(serialized("-0"), "-0");
    assert_eq!(serialized("<!-- : ; , [ ] ( ) { } -->"), "<!-- : ; , [ ] ( ) { } -->");
    assert_eq!(serialized("!"), "!");
}

#[test]
fn serialized_tokens_relex() {
    let input = "a\\ b #\\31 x @\\@ url(a\\ b) 'x\\'y' 1e3 -2.5e-1 .5em 1\\65  \
                 2e5x 10% --\\31  \\-- \\0  /*c*/ é😀";
    for token in tokenize(input) {
        if token.is_end_of_input() || token.kind == TokenKind::Whitespace {
            continue;
        }
        let serialized = token.to_css_string();
        let relexed = tokenize(&serialized);
        assert_eq!(relexed.len(), 2, "{:?} => {:?}", token, serialized);
        let relexed = &relexed[0];
        assert_eq!(relexed.kind, token.kind, "{:?}", serialized);
        assert_eq!(relexed.is_id_like, token.is_id_like, "{:?}", serialized);
        match (&relexed.numeric, &token.numeric) {
            (Some(a), Some(b)) => {
                assert!((a.value - b.value).abs() <= b.value.abs() * 1e-6, "{:?}", serialized);
                assert_eq!(a.unit, b.unit);
            }
            (None, None) => assert_eq!(relexed.value, token.value),
            _ => panic!("{:?}", serialized),
        }
    }
}

#[cfg(not(feature = "skip_long_tests"))]
mod properties {
    use proptest::prelude::*;

    use super::normalize;
    use crate::{tokenize, TokenKind};

    const ALPHABET: &[char] = &[
        'a', 'u', 'r', 'l', 'U', 'R', 'L', 'e', 'E', 'x', '0', '1', '9', '(', ')', '"', '\'',
        '\\', '\n', '\r', '\x0C', '\0', ' ', '\t', '-', '+', '.', '%', '#', '@', '<', '!', '>',
        '/', '*', ',', ':', ';', '{', '}', '[', ']', 'é', '😀', '\x7F',
    ];

    fn css_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(ALPHABET), 0..40)
            .prop_map(|chars| chars.into_iter().collect::<String>())
    }

    fn is_url_function(name: &str) -> bool {
        match_ignore_ascii_case! { name, "url" => true, _ => false }
    }

    proptest! {
        #[test]
        fn representations_concatenate_to_normalized_input(input in css_text()) {
            let tokens = tokenize(&input);
            let joined: String = tokens.iter().map(|t| &*t.representation).collect();
            prop_assert_eq!(joined, normalize(&input));
            prop_assert!(tokens.last().unwrap().is_end_of_input());
            prop_assert_eq!(
                tokens.iter().filter(|t| t.is_end_of_input()).count(),
                1
            );
            prop_assert!(tokens[..tokens.len() - 1].iter().all(|t| !t.representation.is_empty()));
        }

        #[test]
        fn positions_are_increasing(input in css_text()) {
            let tokens = tokenize(&input);
            let mut offset = 0;
            for token in &tokens {
                prop_assert_eq!(token.offset(), offset);
                offset += token.representation.chars().count() as u32;
            }
        }

        #[test]
        fn tokens_relex_alone(input in css_text()) {
            for token in tokenize(&input) {
                if token.is_end_of_input()
                    || token.kind == TokenKind::BadString
                    || (token.kind == TokenKind::Function && is_url_function(&token.value))
                {
                    continue;
                }
                let relexed = tokenize(&token.representation);
                prop_assert_eq!(relexed.len(), 2, "{:?}", token);
                prop_assert_eq!(relexed[0].kind, token.kind);
                prop_assert_eq!(&relexed[0].value, &token.value);
                prop_assert_eq!(&relexed[0].representation, &token.representation);
            }
        }
    }
}
