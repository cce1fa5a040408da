/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

// https://drafts.csswg.org/css-syntax/#input-preprocessing

use std::io;

use crate::source::Source;

pub(crate) const REPLACEMENT_CHAR: char = '\u{FFFD}';

const CARRIAGE_RETURN: u32 = 0x0D;
const LINE_FEED: u32 = 0x0A;
const FORM_FEED: u32 = 0x0C;

/// Filters a `Source` into the normalized code point stream the tokenizer consumes.
///
/// * NUL, unpaired surrogates and out-of-range units become U+FFFD REPLACEMENT CHARACTER.
/// * A high surrogate followed by a low surrogate becomes one supplementary code point.
/// * CR, CR LF and FF become a single LF.
///
/// Malformed input never makes reading fail: only the underlying source can.
#[derive(Debug)]
pub struct Preprocessor<S> {
    source: S,
    /// A unit read ahead of time (the second half of a failed surrogate pair,
    /// or whatever followed a CR) that the next read processes first.
    reused: Option<u32>,
}

impl<S: Source> Preprocessor<S> {
    /// Normalize the units of `source`.
    pub fn new(source: S) -> Preprocessor<S> {
        Preprocessor {
            source,
            reused: None,
        }
    }

    /// Give back the wrapped source.
    ///
    /// A unit held for reuse, if any, is lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    #[inline]
    fn read_unit(&mut self) -> io::Result<Option<u32>> {
        match self.reused.take() {
            Some(unit) => Ok(Some(unit)),
            None => self.source.read_unit(),
        }
    }

    /// Read the next normalized code point, or `None` at the end of the input.
    pub fn read(&mut self) -> io::Result<Option<char>> {
        let unit = match self.read_unit()? {
            Some(unit) => unit,
            None => return Ok(None),
        };
        let c = match unit {
            0 => REPLACEMENT_CHAR,
            0xD800..=0xDBFF => match self.source.read_unit()? {
                Some(low @ 0xDC00..=0xDFFF) => {
                    let scalar = 0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(scalar).unwrap_or(REPLACEMENT_CHAR)
                }
                Some(other) => {
                    self.reused = Some(other);
                    REPLACEMENT_CHAR
                }
                None => REPLACEMENT_CHAR,
            },
            0xDC00..=0xDFFF => REPLACEMENT_CHAR,
            CARRIAGE_RETURN => {
                match self.source.read_unit()? {
                    Some(LINE_FEED) | None => {}
                    Some(other) => self.reused = Some(other),
                }
                '\n'
            }
            FORM_FEED => '\n',
            _ => char::from_u32(unit).unwrap_or(REPLACEMENT_CHAR),
        };
        Ok(Some(c))
    }
}
