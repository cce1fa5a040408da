/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::io;
use std::iter::Fuse;
use std::str::Chars;

/// A sequential supplier of decoded text, one unit at a time.
///
/// A unit is either a UTF-16 code unit (possibly an unpaired surrogate)
/// or a full Unicode scalar value.
/// Decoding bytes into such units is the responsibility of the implementor;
/// see `encoding_rs` for a way to get there from a byte stream.
pub trait Source {
    /// Read the next unit, or `None` at the end of the input.
    ///
    /// Once `None` has been returned, every later call must return `None` too.
    /// An `Err` is a hard failure of the underlying input
    /// and is propagated unchanged out of the tokenizer.
    fn read_unit(&mut self) -> io::Result<Option<u32>>;
}

impl<'a, S: Source + ?Sized> Source for &'a mut S {
    #[inline]
    fn read_unit(&mut self) -> io::Result<Option<u32>> {
        (**self).read_unit()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    #[inline]
    fn read_unit(&mut self) -> io::Result<Option<u32>> {
        (**self).read_unit()
    }
}

/// The scalar values of an in-memory string.
#[derive(Clone, Debug)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    /// Read from `input`.
    #[inline]
    pub fn new(input: &'a str) -> StrSource<'a> {
        StrSource { chars: input.chars() }
    }
}

impl<'a> Source for StrSource<'a> {
    #[inline]
    fn read_unit(&mut self) -> io::Result<Option<u32>> {
        Ok(self.chars.next().map(u32::from))
    }
}

/// Raw UTF-16 code units, as produced by `str::encode_utf16`
/// or by a platform API that does not validate surrogate pairs.
#[derive(Clone, Debug)]
pub struct Utf16Source<I> {
    units: Fuse<I>,
}

impl<I: Iterator<Item = u16>> Utf16Source<I> {
    /// Read from an iterator of code units.
    #[inline]
    pub fn new<T: IntoIterator<IntoIter = I, Item = u16>>(units: T) -> Utf16Source<I> {
        Utf16Source { units: units.into_iter().fuse() }
    }
}

impl<I: Iterator<Item = u16>> Source for Utf16Source<I> {
    #[inline]
    fn read_unit(&mut self) -> io::Result<Option<u32>> {
        Ok(self.units.next().map(u32::from))
    }
}
