/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::io;

use smallvec::SmallVec;

use crate::preprocessor::Preprocessor;
use crate::source::Source;
use crate::token::{SourceLocation, SourcePosition};

/// Backtracking reader over the normalized code point stream.
///
/// Everything consumed since the last `start_token` is kept in `consumed`,
/// minus whatever was pushed back since.
pub(crate) struct Cursor<S> {
    input: Preprocessor<S>,
    /// LIFO: the last code point pushed back is the next one read.
    pushed_back: SmallVec<[char; 4]>,
    consumed: String,
    /// Offset, in code points, of the first code point of `consumed`.
    position: u32,
    line: u32,
    column: u32,
}

impl<S: Source> Cursor<S> {
    pub fn new(source: S) -> Cursor<S> {
        Cursor {
            input: Preprocessor::new(source),
            pushed_back: SmallVec::new(),
            consumed: String::new(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn into_source(self) -> S {
        self.input.into_inner()
    }

    /// Commit the text consumed so far and start accumulating a new token.
    ///
    /// Returns the position of the code point that will be read next.
    pub fn start_token(&mut self) -> (SourcePosition, SourceLocation) {
        for c in self.consumed.chars() {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.consumed.clear();
        (
            SourcePosition(self.position),
            SourceLocation {
                line: self.line,
                column: self.column,
            },
        )
    }

    /// The raw text consumed since the last `start_token`.
    #[inline]
    pub fn consumed(&self) -> &str {
        &self.consumed
    }

    pub fn advance(&mut self) -> io::Result<Option<char>> {
        let next = match self.pushed_back.pop() {
            Some(c) => Some(c),
            None => self.input.read()?,
        };
        if let Some(c) = next {
            self.consumed.push(c);
        }
        Ok(next)
    }

    pub fn push_back(&mut self, c: Option<char>) {
        if let Some(c) = c {
            let popped = self.consumed.pop();
            debug_assert_eq!(popped, Some(c), "pushed back a code point that was not consumed");
            self.pushed_back.push(c);
        }
    }

    pub fn peek(&mut self) -> io::Result<Option<char>> {
        let c = self.advance()?;
        self.push_back(c);
        Ok(c)
    }

    pub fn peek3(&mut self) -> io::Result<[Option<char>; 3]> {
        let c1 = self.advance()?;
        let c2 = self.advance()?;
        let c3 = self.advance()?;
        self.push_back(c3);
        self.push_back(c2);
        self.push_back(c1);
        Ok([c1, c2, c3])
    }
}
