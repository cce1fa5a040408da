/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

// https://drafts.csswg.org/css-syntax/#tokenization

use std::borrow::Cow;
use std::io;

use crate::cursor::Cursor;
use crate::error::{LogReporter, ParseError, ParseErrorKind, ParseErrorReporter};
use crate::preprocessor::REPLACEMENT_CHAR;
use crate::source::{Source, StrSource};
use crate::token::{NumericValue, SourceLocation, SourcePosition, Token, TokenKind};

/// Three code points of lookahead. `None` is the end of the input.
type Lookahead = [Option<char>; 3];

/// Breaks a `Source` into CSS tokens, one at a time.
///
/// Tokens are produced on demand in a single forward pass.
/// Parse errors never stop tokenization:
/// they turn into `BadString` or `BadUrl` tokens, U+FFFD REPLACEMENT CHARACTER,
/// or truncated tokens reported to the `ParseErrorReporter`.
pub struct Tokenizer<S, R = LogReporter> {
    cursor: Cursor<S>,
    reporter: R,
    token_start: (SourcePosition, SourceLocation),
    /// Set once `EndOfInput` or an I/O error has been yielded by the `Iterator` impl.
    finished: bool,
}

impl<'a> Tokenizer<StrSource<'a>> {
    /// Tokenize an in-memory string.
    #[inline]
    pub fn for_str(input: &'a str) -> Tokenizer<StrSource<'a>> {
        Tokenizer::new(StrSource::new(input))
    }
}

impl<S: Source> Tokenizer<S> {
    /// Tokenize `source`, logging parse errors.
    #[inline]
    pub fn new(source: S) -> Tokenizer<S> {
        Tokenizer::with_reporter(source, LogReporter)
    }
}

impl<S: Source, R: ParseErrorReporter> Tokenizer<S, R> {
    /// Tokenize `source`, sending parse errors to `reporter`.
    pub fn with_reporter(source: S, reporter: R) -> Tokenizer<S, R> {
        Tokenizer {
            cursor: Cursor::new(source),
            reporter,
            token_start: (
                SourcePosition(0),
                SourceLocation { line: 1, column: 1 },
            ),
            finished: false,
        }
    }

    /// Read the next token.
    ///
    /// Once the input is exhausted this returns an `EndOfInput` token,
    /// and keeps doing so if called again.
    /// An `Err` comes from the underlying source; the token being read is lost.
    pub fn next_token(&mut self) -> io::Result<Token> {
        self.token_start = self.cursor.start_token();
        let token = consume_token(self)?;
        tracing::trace!(
            kind = %token.kind,
            line = token.location.line,
            column = token.location.column,
            "token"
        );
        Ok(token)
    }

    /// The reporter parse errors are sent to.
    #[inline]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Release the tokenizer, keeping the reporter.
    #[inline]
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Release the tokenizer, giving back the underlying source.
    #[inline]
    pub fn into_source(self) -> S {
        self.cursor.into_source()
    }

    #[inline]
    fn advance(&mut self) -> io::Result<Option<char>> {
        self.cursor.advance()
    }

    #[inline]
    fn push_back(&mut self, c: Option<char>) {
        self.cursor.push_back(c)
    }

    #[inline]
    fn peek(&mut self) -> io::Result<Option<char>> {
        self.cursor.peek()
    }

    #[inline]
    fn peek3(&mut self) -> io::Result<Lookahead> {
        self.cursor.peek3()
    }

    fn token(&self, kind: TokenKind, value: String) -> Token {
        let (position, location) = self.token_start;
        Token {
            kind,
            value,
            representation: self.cursor.consumed().to_owned(),
            position,
            location,
            numeric: None,
            is_id_like: false,
        }
    }

    #[inline]
    fn delim(&self, c: char) -> Token {
        self.token(TokenKind::Delim, c.to_string())
    }

    fn report(&mut self, kind: ParseErrorKind) {
        let (position, location) = self.token_start;
        self.reporter.report_error(ParseError {
            kind,
            location,
            position,
        })
    }
}

impl<S: Source, R: ParseErrorReporter> Iterator for Tokenizer<S, R> {
    type Item = io::Result<Token>;

    /// Yields every token up to and including `EndOfInput`, then stops.
    fn next(&mut self) -> Option<io::Result<Token>> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        self.finished = match result {
            Ok(ref token) => token.is_end_of_input(),
            Err(_) => true,
        };
        Some(result)
    }
}

/// Tokenize an in-memory string, up to and including the `EndOfInput` token.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::for_str(input)
        .map(|result| match result {
            Ok(token) => token,
            Err(_) => unreachable!("reading from a string cannot fail"),
        })
        .collect()
}

fn consume_token<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
) -> io::Result<Token> {
    let c = match tokenizer.advance()? {
        Some(c) => c,
        None => return Ok(tokenizer.token(TokenKind::EndOfInput, String::new())),
    };
    let token = match c {
        '/' => {
            let next = tokenizer.advance()?;
            if next == Some('*') {
                consume_comment(tokenizer)?
            } else {
                tokenizer.push_back(next);
                tokenizer.delim(c)
            }
        }
        ' ' | '\t' | '\n' => {
            let mut value = c.to_string();
            consume_whitespace(tokenizer, &mut value)?;
            tokenizer.token(TokenKind::Whitespace, value)
        }
        '"' | '\'' => consume_string(tokenizer, c)?,
        '#' => {
            let next = tokenizer.peek3()?;
            if next[0].map_or(false, is_name_code_point) || is_valid_escape(next[0], next[1]) {
                let is_id_like = would_start_identifier(next);
                let name = consume_name(tokenizer)?;
                let mut token = tokenizer.token(TokenKind::Hash, name);
                token.is_id_like = is_id_like;
                token
            } else {
                tokenizer.delim(c)
            }
        }
        '+' => {
            let next = tokenizer.peek3()?;
            if would_start_number([Some(c), next[0], next[1]]) {
                tokenizer.push_back(Some(c));
                consume_numeric(tokenizer)?
            } else {
                tokenizer.delim(c)
            }
        }
        '-' => {
            let next = tokenizer.peek3()?;
            let lookahead = [Some(c), next[0], next[1]];
            if would_start_number(lookahead) {
                tokenizer.push_back(Some(c));
                consume_numeric(tokenizer)?
            } else if next[0] == Some('-') && next[1] == Some('>') {
                tokenizer.advance()?;
                tokenizer.advance()?;
                tokenizer.token(TokenKind::Cdc, "-->".to_owned())
            } else if would_start_identifier(lookahead) {
                tokenizer.push_back(Some(c));
                consume_ident_like(tokenizer)?
            } else {
                tokenizer.delim(c)
            }
        }
        '.' => {
            if is_digit(tokenizer.peek()?) {
                tokenizer.push_back(Some(c));
                consume_numeric(tokenizer)?
            } else {
                tokenizer.delim(c)
            }
        }
        '0'..='9' => {
            tokenizer.push_back(Some(c));
            consume_numeric(tokenizer)?
        }
        ',' => tokenizer.token(TokenKind::Comma, c.to_string()),
        ':' => tokenizer.token(TokenKind::Colon, c.to_string()),
        ';' => tokenizer.token(TokenKind::Semicolon, c.to_string()),
        '<' => {
            if tokenizer.peek3()? == [Some('!'), Some('-'), Some('-')] {
                tokenizer.advance()?;
                tokenizer.advance()?;
                tokenizer.advance()?;
                tokenizer.token(TokenKind::Cdo, "<!--".to_owned())
            } else {
                tokenizer.delim(c)
            }
        }
        '@' => {
            if would_start_identifier(tokenizer.peek3()?) {
                let name = consume_name(tokenizer)?;
                tokenizer.token(TokenKind::AtKeyword, name)
            } else {
                tokenizer.delim(c)
            }
        }
        '\\' => {
            if is_valid_escape(Some(c), tokenizer.peek()?) {
                tokenizer.push_back(Some(c));
                consume_ident_like(tokenizer)?
            } else {
                // Parse error
                tokenizer.delim(c)
            }
        }
        '[' => tokenizer.token(TokenKind::LeftSquareBracket, c.to_string()),
        ']' => tokenizer.token(TokenKind::RightSquareBracket, c.to_string()),
        '(' => tokenizer.token(TokenKind::LeftParen, c.to_string()),
        ')' => tokenizer.token(TokenKind::RightParen, c.to_string()),
        '{' => tokenizer.token(TokenKind::LeftBrace, c.to_string()),
        '}' => tokenizer.token(TokenKind::RightBrace, c.to_string()),
        c if is_name_start_code_point(c) => {
            tokenizer.push_back(Some(c));
            consume_ident_like(tokenizer)?
        }
        _ => tokenizer.delim(c),
    };
    Ok(token)
}

#[inline]
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

#[inline]
fn is_digit(c: Option<char>) -> bool {
    matches!(c, Some('0'..='9'))
}

#[inline]
fn is_name_start_code_point(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_') || !c.is_ascii()
}

#[inline]
fn is_name_code_point(c: char) -> bool {
    is_name_start_code_point(c) || matches!(c, '0'..='9' | '-')
}

#[inline]
fn is_non_printable(c: char) -> bool {
    matches!(c, '\x00'..='\x08' | '\x0B' | '\x0E'..='\x1F' | '\x7F')
}

// https://drafts.csswg.org/css-syntax/#starts-with-a-valid-escape
#[inline]
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && !matches!(second, None | Some('\n'))
}

// https://drafts.csswg.org/css-syntax/#would-start-an-identifier
fn would_start_identifier(next: Lookahead) -> bool {
    match next[0] {
        Some('-') => {
            next[1] == Some('-')
                || next[1].map_or(false, is_name_start_code_point)
                || is_valid_escape(next[1], next[2])
        }
        Some('\\') => is_valid_escape(next[0], next[1]),
        Some(c) => is_name_start_code_point(c),
        None => false,
    }
}

// https://drafts.csswg.org/css-syntax/#starts-with-a-number
fn would_start_number(next: Lookahead) -> bool {
    match next[0] {
        Some('+') | Some('-') => {
            is_digit(next[1]) || (next[1] == Some('.') && is_digit(next[2]))
        }
        Some('.') => is_digit(next[1]),
        c => is_digit(c),
    }
}

/// Append whitespace code points to `value` up to the first other code point.
fn consume_whitespace<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
    value: &mut String,
) -> io::Result<()> {
    loop {
        match tokenizer.advance()? {
            Some(c) if is_whitespace(c) => value.push(c),
            other => {
                tokenizer.push_back(other);
                return Ok(());
            }
        }
    }
}

// The leading "/*" has already been consumed.
fn consume_comment<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
) -> io::Result<Token> {
    let mut value = String::new();
    let mut previous_star = false;
    loop {
        let c = match tokenizer.advance()? {
            Some(c) => c,
            None => {
                tokenizer.report(ParseErrorKind::UnterminatedComment);
                return Ok(tokenizer.token(TokenKind::Comment, value));
            }
        };
        if c == '/' && previous_star {
            value.pop();
            return Ok(tokenizer.token(TokenKind::Comment, value));
        }
        previous_star = c == '*';
        value.push(c);
    }
}

// The opening quote has already been consumed.
fn consume_string<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
    quote: char,
) -> io::Result<Token> {
    let mut value = String::new();
    loop {
        match tokenizer.advance()? {
            None => {
                tokenizer.report(ParseErrorKind::UnterminatedString);
                return Ok(tokenizer.token(TokenKind::String, value));
            }
            Some(c) if c == quote => return Ok(tokenizer.token(TokenKind::String, value)),
            Some('\n') => {
                // The newline is not part of this token.
                tokenizer.push_back(Some('\n'));
                return Ok(tokenizer.token(TokenKind::BadString, value));
            }
            Some('\\') => match tokenizer.peek()? {
                // Escaped EOF, do nothing.
                None => {}
                // Escaped newline, line continuation.
                Some('\n') => {
                    tokenizer.advance()?;
                }
                Some(_) => value.push(consume_escape(tokenizer)?),
            },
            Some(c) => value.push(c),
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-name
fn consume_name<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
) -> io::Result<String> {
    let mut value = String::new();
    loop {
        let c = tokenizer.advance()?;
        match c {
            Some(c) if is_name_code_point(c) => value.push(c),
            Some('\\') if is_valid_escape(c, tokenizer.peek()?) => {
                value.push(consume_escape(tokenizer)?)
            }
            _ => {
                tokenizer.push_back(c);
                return Ok(value);
            }
        }
    }
}

fn consume_digits<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
    literal: &mut String,
) -> io::Result<()> {
    loop {
        match tokenizer.advance()? {
            Some(c @ '0'..='9') => literal.push(c),
            other => {
                tokenizer.push_back(other);
                return Ok(());
            }
        }
    }
}

fn consume_numeric<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
) -> io::Result<Token> {
    // Parse [+-]?\d*(\.\d+)?([eE][+-]?\d+)?
    // But this is always called so that there is at least one digit in \d*(\.\d+)?
    let mut literal = String::new();
    let mut is_integer = true;
    let first = tokenizer.advance()?;
    let has_sign = match first {
        Some(sign @ '+') | Some(sign @ '-') => {
            literal.push(sign);
            true
        }
        _ => {
            tokenizer.push_back(first);
            false
        }
    };
    consume_digits(tokenizer, &mut literal)?;

    let next = tokenizer.peek3()?;
    if next[0] == Some('.') && is_digit(next[1]) {
        is_integer = false;
        tokenizer.advance()?;
        literal.push('.');
        consume_digits(tokenizer, &mut literal)?;
    }

    let next = tokenizer.peek3()?;
    if let Some(e @ 'e') | Some(e @ 'E') = next[0] {
        let exponent_sign = match next[1] {
            Some(sign @ '+') | Some(sign @ '-') if is_digit(next[2]) => Some(sign),
            _ => None,
        };
        if exponent_sign.is_some() || is_digit(next[1]) {
            is_integer = false;
            tokenizer.advance()?;
            literal.push(e);
            if let Some(sign) = exponent_sign {
                tokenizer.advance()?;
                literal.push(sign);
            }
            consume_digits(tokenizer, &mut literal)?;
        }
    }

    let value = parse_number(&literal);
    let next = tokenizer.peek3()?;
    let (kind, unit) = if next[0] == Some('%') {
        tokenizer.advance()?;
        literal.push('%');
        (TokenKind::Percentage, None)
    } else if would_start_identifier(next) {
        let unit = consume_name(tokenizer)?;
        literal.push_str(&unit);
        (TokenKind::Dimension, Some(unit))
    } else {
        (TokenKind::Number, None)
    };
    let mut token = tokenizer.token(kind, literal);
    token.numeric = Some(NumericValue {
        value,
        is_integer,
        has_sign,
        unit,
    });
    Ok(token)
}

/// Convert a literal matched by `consume_numeric` (without unit) to its value.
fn parse_number(literal: &str) -> f64 {
    // Canonical forms: `.5` → `0.5`, `-.5` → `-0.5`.
    let canonical: Cow<str> = match literal.as_bytes() {
        [b'.', ..] => format!("0{}", literal).into(),
        [b'+', b'.', ..] | [b'-', b'.', ..] => {
            format!("{}0{}", &literal[..1], &literal[1..]).into()
        }
        _ => literal.into(),
    };
    match canonical.parse() {
        Ok(value) => value,
        Err(_) => unreachable!("malformed number literal {:?}", literal),
    }
}

// https://drafts.csswg.org/css-syntax/#consume-ident-like-token
fn consume_ident_like<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
) -> io::Result<Token> {
    let name = consume_name(tokenizer)?;
    let next = tokenizer.advance()?;
    if next != Some('(') {
        tokenizer.push_back(next);
        return Ok(tokenizer.token(TokenKind::Ident, name));
    }
    let is_url = match_ignore_ascii_case! { &name, "url" => true, _ => false };
    if !is_url {
        return Ok(tokenizer.token(TokenKind::Function, name));
    }

    let mut whitespace = String::new();
    consume_whitespace(tokenizer, &mut whitespace)?;
    match tokenizer.peek()? {
        Some('"') | Some('\'') => {
            // `url("…")` is a function with a string argument:
            // leave the whitespace for its own token.
            for c in whitespace.chars().rev() {
                tokenizer.push_back(Some(c));
            }
            Ok(tokenizer.token(TokenKind::Function, name))
        }
        _ => consume_unquoted_url(tokenizer),
    }
}

// https://drafts.csswg.org/css-syntax/#consume-url-token
// "url(" and any leading whitespace have already been consumed.
fn consume_unquoted_url<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
) -> io::Result<Token> {
    let mut value = String::new();
    loop {
        let c = match tokenizer.advance()? {
            Some(c) => c,
            // Parse error
            None => return Ok(tokenizer.token(TokenKind::Url, value)),
        };
        match c {
            ' ' | '\t' | '\n' => {
                let mut whitespace = c.to_string();
                consume_whitespace(tokenizer, &mut whitespace)?;
                let next = tokenizer.advance()?;
                if next == Some(')') {
                    return Ok(tokenizer.token(TokenKind::Url, value));
                }
                tokenizer.push_back(next);
                value.push_str(&whitespace);
                return consume_bad_url(tokenizer, value);
            }
            ')' => return Ok(tokenizer.token(TokenKind::Url, value)),
            '"' | '\'' | '(' => {
                value.push(c);
                return consume_bad_url(tokenizer, value);
            }
            c if is_non_printable(c) => {
                value.push(c);
                return consume_bad_url(tokenizer, value);
            }
            '\\' => {
                if is_valid_escape(Some(c), tokenizer.peek()?) {
                    value.push(consume_escape(tokenizer)?);
                } else {
                    tokenizer.push_back(Some(c));
                    return consume_bad_url(tokenizer, value);
                }
            }
            c => value.push(c),
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-remnants-of-bad-url
fn consume_bad_url<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
    mut value: String,
) -> io::Result<Token> {
    loop {
        match tokenizer.advance()? {
            None | Some(')') => return Ok(tokenizer.token(TokenKind::BadUrl, value)),
            Some('\\') => match tokenizer.peek()? {
                Some('\n') => value.push('\\'),
                Some(_) => value.push(consume_escape(tokenizer)?),
                None => {}
            },
            Some(c) => value.push(c),
        }
    }
}

// Assumes that the U+005C REVERSE SOLIDUS (\) has already been consumed
// and that the next code point has already been verified
// to not be a newline or the end of the input.
fn consume_escape<S: Source, R: ParseErrorReporter>(
    tokenizer: &mut Tokenizer<S, R>,
) -> io::Result<char> {
    let c = match tokenizer.advance()? {
        Some(c) if c != '\n' => c,
        _ => unreachable!("escape sequence of length zero"),
    };
    let mut value = match c.to_digit(16) {
        Some(digit) => digit,
        None => return Ok(c),
    };
    let mut digits = 1;
    loop {
        let next = tokenizer.advance()?;
        match next {
            Some(c) if digits < 6 && c.is_ascii_hexdigit() => {
                value = value * 16 + c.to_digit(16).unwrap_or(0);
                digits += 1;
            }
            // A single whitespace ending a short escape belongs to the escape.
            Some(c) if digits < 6 && is_whitespace(c) => break,
            _ => {
                tokenizer.push_back(next);
                break;
            }
        }
    }
    Ok(if value == 0 {
        REPLACEMENT_CHAR
    } else {
        char::from_u32(value).unwrap_or(REPLACEMENT_CHAR)
    })
}
