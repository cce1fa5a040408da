/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt::{self, Write};

use dtoa_short::{self, Notation};

use crate::token::{NumericValue, Token, TokenKind};

/// Trait for things that can serialize themselves in CSS syntax.
pub trait ToCss {
    /// Serialize `self` in CSS syntax, writing to `dest`.
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write;

    /// Serialize `self` in CSS syntax and return a string.
    ///
    /// (This is a convenience wrapper for `to_css` and probably should not be overridden.)
    #[inline]
    fn to_css_string(&self) -> String {
        let mut s = String::new();
        self.to_css(&mut s).unwrap();
        s
    }
}

/// Serialize a token from its decoded value rather than from its representation.
///
/// Re-tokenizing the result gives back a token of the same kind
/// with the same value or numeric payload,
/// except for `BadString` and `BadUrl` which have no faithful serialization.
impl ToCss for Token {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match self.kind {
            TokenKind::Ident => serialize_identifier(&self.value, dest)?,
            TokenKind::Function => {
                serialize_identifier(&self.value, dest)?;
                dest.write_char('(')?;
            }
            TokenKind::AtKeyword => {
                dest.write_char('@')?;
                serialize_identifier(&self.value, dest)?;
            }
            TokenKind::Hash => {
                dest.write_char('#')?;
                if self.is_id_like {
                    serialize_identifier(&self.value, dest)?;
                } else {
                    serialize_name(&self.value, dest)?;
                }
            }
            TokenKind::String => serialize_string(&self.value, dest)?,
            TokenKind::BadString => {
                // The token ended just before an unescaped newline
                // (which is in a separate Whitespace token),
                // and therefore does not have a closing quote.
                dest.write_char('"')?;
                CssStringWriter::new(dest).write_str(&self.value)?;
            }
            TokenKind::Url => {
                dest.write_str("url(")?;
                serialize_unquoted_url(&self.value, dest)?;
                dest.write_char(')')?;
            }
            TokenKind::BadUrl => {
                dest.write_str("url(")?;
                dest.write_str(&self.value)?;
                dest.write_char(')')?;
            }
            TokenKind::Comment => {
                dest.write_str("/*")?;
                dest.write_str(&self.value)?;
                dest.write_str("*/")?;
            }
            TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension => {
                match self.numeric {
                    Some(ref numeric) => write_numeric_token(self.kind, numeric, dest)?,
                    None => dest.write_str(&self.value)?,
                }
            }
            TokenKind::EndOfInput => {}
            TokenKind::Delim
            | TokenKind::Whitespace
            | TokenKind::Cdo
            | TokenKind::Cdc
            | TokenKind::Colon
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::LeftSquareBracket
            | TokenKind::RightSquareBracket
            | TokenKind::LeftParen
            | TokenKind::RightParen
            | TokenKind::LeftBrace
            | TokenKind::RightBrace => dest.write_str(&self.value)?,
        }
        Ok(())
    }
}

fn write_numeric_token<W>(kind: TokenKind, numeric: &NumericValue, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    write_numeric(numeric, dest)?;
    match (kind, numeric.unit.as_deref()) {
        (TokenKind::Percentage, _) => dest.write_char('%'),
        (TokenKind::Dimension, Some(unit)) => {
            // Disambiguate with scientific notation.
            if matches!(
                unit.as_bytes(),
                [b'e'] | [b'E'] | [b'e', b'-', ..] | [b'E', b'-', ..] | [b'e', b'0'..=b'9', ..] | [b'E', b'0'..=b'9', ..]
            ) {
                dest.write_str("\\65 ")?;
                serialize_name(&unit[1..], dest)
            } else {
                serialize_identifier(unit, dest)
            }
        }
        _ => Ok(()),
    }
}

fn write_numeric<W>(numeric: &NumericValue, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    let value = numeric.value;
    // `value >= 0` is true for negative 0.
    if numeric.has_sign && value.is_sign_positive() {
        dest.write_str("+")?;
    }

    if let Some(int_value) = numeric.int_value() {
        if value.is_sign_negative() && int_value == 0 {
            dest.write_str("-")?;
        }
        return dest.write_str(itoa::Buffer::new().format(int_value));
    }

    let notation = if value == 0.0 && value.is_sign_negative() {
        dest.write_str("-0")?;
        Notation {
            decimal_point: false,
            scientific: false,
        }
    } else {
        dtoa_short::write(dest, value)?
    };

    if value.fract() == 0. && !notation.decimal_point && !notation.scientific {
        dest.write_str(".0")?;
    }
    Ok(())
}

/// Write a CSS identifier, escaping characters as necessary.
pub fn serialize_identifier<W>(mut value: &str, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    if value.is_empty() {
        return Ok(());
    }

    if let Some(rest) = value.strip_prefix("--") {
        dest.write_str("--")?;
        serialize_name(rest, dest)
    } else if value == "-" {
        dest.write_str("\\-")
    } else {
        if let Some(rest) = value.strip_prefix('-') {
            dest.write_char('-')?;
            value = rest;
        }
        if let digit @ b'0'..=b'9' = value.as_bytes()[0] {
            hex_escape(digit, dest)?;
            value = &value[1..];
        }
        serialize_name(value, dest)
    }
}

/// Write a CSS name, like a custom property name.
///
/// You should only use this when you know what you're doing, when in doubt,
/// consider using `serialize_identifier`.
pub fn serialize_name<W>(value: &str, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    let mut chunk_start = 0;
    for (i, b) in value.bytes().enumerate() {
        match b {
            b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'_' | b'-' => continue,
            _ if !b.is_ascii() => continue,
            _ => {}
        }
        dest.write_str(&value[chunk_start..i])?;
        if b <= b'\x1F' || b == b'\x7F' {
            hex_escape(b, dest)?;
        } else {
            char_escape(b, dest)?;
        }
        chunk_start = i + 1;
    }
    dest.write_str(&value[chunk_start..])
}

/// Write the contents of an unquoted `url( … )` token, escaping as necessary.
pub fn serialize_unquoted_url<W>(value: &str, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    let mut chunk_start = 0;
    for (i, b) in value.bytes().enumerate() {
        let hex = match b {
            b'\0'..=b' ' | b'\x7F' => true,
            b'(' | b')' | b'"' | b'\'' | b'\\' => false,
            _ => continue,
        };
        dest.write_str(&value[chunk_start..i])?;
        if hex {
            hex_escape(b, dest)?;
        } else {
            char_escape(b, dest)?;
        }
        chunk_start = i + 1;
    }
    dest.write_str(&value[chunk_start..])
}

/// Write a double-quoted CSS string token, escaping content as necessary.
pub fn serialize_string<W>(value: &str, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    dest.write_char('"')?;
    CssStringWriter::new(dest).write_str(value)?;
    dest.write_char('"')?;
    Ok(())
}

/// A `fmt::Write` adapter that escapes text for writing as a double-quoted CSS string.
/// Quotes are not included.
///
/// Typical usage:
///
/// ```rust
/// use std::fmt::{self, Write};
/// use csslexer::CssStringWriter;
///
/// fn write_foo<W>(foo: &str, dest: &mut W) -> fmt::Result where W: fmt::Write {
///     dest.write_str("\"")?;
///     {
///         let mut string_dest = CssStringWriter::new(dest);
///         write!(string_dest, "{} \"quoted\"", foo)?;
///     }
///     dest.write_str("\"")?;
///     Ok(())
/// }
/// ```
pub struct CssStringWriter<'a, W> {
    inner: &'a mut W,
}

impl<'a, W> CssStringWriter<'a, W>
where
    W: fmt::Write,
{
    /// Wrap a text writer to create a `CssStringWriter`.
    pub fn new(inner: &'a mut W) -> CssStringWriter<'a, W> {
        CssStringWriter { inner }
    }
}

impl<'a, W> fmt::Write for CssStringWriter<'a, W>
where
    W: fmt::Write,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut chunk_start = 0;
        for (i, b) in s.bytes().enumerate() {
            let escaped = match b {
                b'"' => Some("\\\""),
                b'\\' => Some("\\\\"),
                b'\0' => Some("\u{FFFD}"),
                b'\x01'..=b'\x1F' | b'\x7F' => None,
                _ => continue,
            };
            self.inner.write_str(&s[chunk_start..i])?;
            match escaped {
                Some(x) => self.inner.write_str(x)?,
                None => hex_escape(b, self.inner)?,
            };
            chunk_start = i + 1;
        }
        self.inner.write_str(&s[chunk_start..])
    }
}

fn hex_escape<W>(ascii_byte: u8, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    write!(dest, "\\{:x} ", ascii_byte)
}

fn char_escape<W>(ascii_byte: u8, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    dest.write_char('\\')?;
    dest.write_char(ascii_byte as char)
}
