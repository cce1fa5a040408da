/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt;

/// The kind of one of the pieces the CSS input is broken into.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// A comment.
    ///
    /// The CSS Syntax spec does not generate tokens for comments,
    /// but we do so that the concatenated representations cover the whole input.
    ///
    /// The value does not include the `/*` `*/` markers.
    Comment,

    /// A [`<ident-token>`](https://drafts.csswg.org/css-syntax/#ident-token-diagram)
    Ident,

    /// A [`<function-token>`](https://drafts.csswg.org/css-syntax/#function-token-diagram)
    ///
    /// The value (name) does not include the `(` marker.
    Function,

    /// A [`<at-keyword-token>`](https://drafts.csswg.org/css-syntax/#at-keyword-token-diagram)
    ///
    /// The value does not include the `@` marker.
    AtKeyword,

    /// A [`<hash-token>`](https://drafts.csswg.org/css-syntax/#hash-token-diagram)
    ///
    /// The value does not include the `#` marker.
    /// See `Token::is_id_like` for the type flag.
    Hash,

    /// A [`<string-token>`](https://drafts.csswg.org/css-syntax/#string-token-diagram)
    ///
    /// The value does not include the quotes.
    String,

    /// A `<bad-string-token>`
    ///
    /// This token always indicates a parse error.
    /// The value is the content read up to the unescaped newline.
    BadString,

    /// A [`<url-token>`](https://drafts.csswg.org/css-syntax/#url-token-diagram)
    ///
    /// The value does not include the `url(` `)` markers.
    Url,

    /// A `<bad-url-token>`
    ///
    /// This token always indicates a parse error.
    BadUrl,

    /// A `<delim-token>`
    Delim,

    /// A [`<number-token>`](https://drafts.csswg.org/css-syntax/#number-token-diagram)
    Number,

    /// A [`<percentage-token>`](https://drafts.csswg.org/css-syntax/#percentage-token-diagram)
    Percentage,

    /// A [`<dimension-token>`](https://drafts.csswg.org/css-syntax/#dimension-token-diagram)
    Dimension,

    /// A [`<whitespace-token>`](https://drafts.csswg.org/css-syntax/#whitespace-token-diagram)
    Whitespace,

    /// A `<!--` [`<CDO-token>`](https://drafts.csswg.org/css-syntax/#CDO-token-diagram)
    Cdo,

    /// A `-->` [`<CDC-token>`](https://drafts.csswg.org/css-syntax/#CDC-token-diagram)
    Cdc,

    /// A `:` `<colon-token>`
    Colon,

    /// A `;` `<semicolon-token>`
    Semicolon,

    /// A `,` `<comma-token>`
    Comma,

    /// A `<[-token>`
    LeftSquareBracket,

    /// A `<]-token>`
    RightSquareBracket,

    /// A `<(-token>`
    LeftParen,

    /// A `<)-token>`
    RightParen,

    /// A `<{-token>`
    LeftBrace,

    /// A `<}-token>`
    RightBrace,

    /// The end of the input. Always the last token of a stream.
    EndOfInput,
}

impl TokenKind {
    /// The name of this kind, as used in the CSS Syntax specification
    /// (lower case, words separated with hyphens).
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Ident => "ident",
            TokenKind::Function => "function",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::Hash => "hash",
            TokenKind::String => "string",
            TokenKind::BadString => "bad-string",
            TokenKind::Url => "url",
            TokenKind::BadUrl => "bad-url",
            TokenKind::Delim => "delim",
            TokenKind::Number => "number",
            TokenKind::Percentage => "percentage",
            TokenKind::Dimension => "dimension",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Cdo => "cdo",
            TokenKind::Cdc => "cdc",
            TokenKind::Colon => "colon",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Comma => "comma",
            TokenKind::LeftSquareBracket => "[",
            TokenKind::RightSquareBracket => "]",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::EndOfInput => "end-of-input",
        }
    }

    /// The kind named `name` (see `TokenKind::name`), matched case-insensitively.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        ascii_case_insensitive_phf_map! {
            kind_by_name -> TokenKind = {
                "comment" => TokenKind::Comment,
                "ident" => TokenKind::Ident,
                "function" => TokenKind::Function,
                "at-keyword" => TokenKind::AtKeyword,
                "hash" => TokenKind::Hash,
                "string" => TokenKind::String,
                "bad-string" => TokenKind::BadString,
                "url" => TokenKind::Url,
                "bad-url" => TokenKind::BadUrl,
                "delim" => TokenKind::Delim,
                "number" => TokenKind::Number,
                "percentage" => TokenKind::Percentage,
                "dimension" => TokenKind::Dimension,
                "whitespace" => TokenKind::Whitespace,
                "cdo" => TokenKind::Cdo,
                "cdc" => TokenKind::Cdc,
                "colon" => TokenKind::Colon,
                "semicolon" => TokenKind::Semicolon,
                "comma" => TokenKind::Comma,
                "[" => TokenKind::LeftSquareBracket,
                "]" => TokenKind::RightSquareBracket,
                "(" => TokenKind::LeftParen,
                ")" => TokenKind::RightParen,
                "{" => TokenKind::LeftBrace,
                "}" => TokenKind::RightBrace,
                "end-of-input" => TokenKind::EndOfInput,
            }
        }
        kind_by_name(name).copied()
    }

    /// Whether this kind always indicates a parse error.
    #[inline]
    pub fn is_parse_error(self) -> bool {
        matches!(self, TokenKind::BadString | TokenKind::BadUrl)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The numeric payload of `Number`, `Percentage` and `Dimension` tokens.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericValue {
    /// The nearest `f64` to the value as written.
    /// The exact literal is kept in `Token::value`.
    ///
    /// For percentages this is **not** divided by 100: `50%` has a value of 50.
    pub value: f64,

    /// Whether the source had neither a fractional part nor an exponent.
    pub is_integer: bool,

    /// Whether the number had a `+` or `-` sign.
    ///
    /// This is used is some cases like the <An+B> micro syntax.
    pub has_sign: bool,

    /// The unit of a dimension, with escapes resolved.
    pub unit: Option<String>,
}

impl NumericValue {
    /// If the source did not include a fractional part or an exponent,
    /// the value as an integer, clamped to the `i32` range.
    pub fn int_value(&self) -> Option<i32> {
        if !self.is_integer {
            return None;
        }
        Some(if self.value >= i32::MAX as f64 {
            i32::MAX
        } else if self.value <= i32::MIN as f64 {
            i32::MIN
        } else {
            self.value as i32
        })
    }

    /// The value divided by 100, so that the nominal range of a percentage is 0.0 to 1.0.
    #[inline]
    pub fn unit_value(&self) -> f64 {
        self.value / 100.
    }
}

/// A position from the start of the input, counted in code points of the normalized input.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePosition(pub(crate) u32);

impl SourcePosition {
    /// The offset, starting at 0 for the first code point of the input.
    #[inline]
    pub fn offset(self) -> u32 {
        self.0
    }
}

/// The line and column number for a given position within the input.
#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    /// The line number, starting at 1 for the first line.
    pub line: u32,

    /// The column number within a line, starting at 1 for first the character of the line.
    /// Column numbers are counted in code points.
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One of the pieces the CSS input is broken into.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// What this token is.
    pub kind: TokenKind,

    /// The decoded text: escapes resolved,
    /// quotes and markers stripped where the grammar strips them.
    pub value: String,

    /// The exact text of the normalized input this token was read from.
    ///
    /// Concatenating the representations of every token of an input,
    /// up to and including `EndOfInput`, gives back the normalized input.
    pub representation: String,

    /// Where the first code point of this token is.
    pub position: SourcePosition,

    /// The line and column of the first code point of this token.
    pub location: SourceLocation,

    /// Present for `Number`, `Percentage` and `Dimension` tokens only.
    pub numeric: Option<NumericValue>,

    /// For `Hash` tokens, whether the name would also start an identifier:
    /// the [type flag](https://drafts.csswg.org/css-syntax/#hash-token-diagram) is "id"
    /// and the token can be used as an ID selector.
    ///
    /// Always false for other kinds.
    pub is_id_like: bool,
}

impl Token {
    /// Whether this token always indicates a parse error.
    #[inline]
    pub fn is_parse_error(&self) -> bool {
        self.kind.is_parse_error()
    }

    /// Whether this is the last token of the stream.
    #[inline]
    pub fn is_end_of_input(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    /// The line of the first code point of this token, starting at 1.
    #[inline]
    pub fn line(&self) -> u32 {
        self.location.line
    }

    /// The offset in code points of the first code point of this token, starting at 0.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.position.offset()
    }
}
