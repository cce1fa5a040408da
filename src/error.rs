/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::error::Error;
use std::fmt;

use crate::token::{SourceLocation, SourcePosition};

/// The kinds of parse errors that are reported out of band.
///
/// Every other malformed input is recovered from with a `BadString` or `BadUrl` token
/// or with U+FFFD REPLACEMENT CHARACTER, without a report.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParseErrorKind {
    /// The input ended inside a `/* ... */` comment.
    UnterminatedComment,
    /// The input ended inside a quoted string.
    UnterminatedString,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseErrorKind::UnterminatedComment => f.write_str("end of input in comment"),
            ParseErrorKind::UnterminatedString => f.write_str("end of input in string"),
        }
    }
}

/// A non-fatal tokenization error.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where the token containing the error starts.
    pub location: SourceLocation,
    /// The offset of the token containing the error.
    pub position: SourcePosition,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

impl Error for ParseError {}

/// Receives the parse errors the tokenizer recovers from.
pub trait ParseErrorReporter {
    /// Called once per error, before the token that contains it is returned.
    fn report_error(&mut self, error: ParseError);
}

/// Logs every parse error as a `tracing` warning.
///
/// This is the reporter used when none is given.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl ParseErrorReporter for LogReporter {
    fn report_error(&mut self, error: ParseError) {
        tracing::warn!(
            line = error.location.line,
            column = error.location.column,
            offset = error.position.offset(),
            "{}",
            error.kind
        );
    }
}

/// Discards parse errors.
impl ParseErrorReporter for () {
    #[inline]
    fn report_error(&mut self, _: ParseError) {}
}

/// Collects parse errors.
impl ParseErrorReporter for Vec<ParseError> {
    #[inline]
    fn report_error(&mut self, error: ParseError) {
        self.push(error)
    }
}

impl<'a, R: ParseErrorReporter + ?Sized> ParseErrorReporter for &'a mut R {
    #[inline]
    fn report_error(&mut self, error: ParseError) {
        (**self).report_error(error)
    }
}
