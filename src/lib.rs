/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![deny(missing_docs)]

/*!

Implementation of the tokenization stage of
[CSS Syntax Module Level 3](https://drafts.csswg.org/css-syntax/) for Rust.

# Input

Tokenizers read from a `Source`: anything that hands out
UTF-16 code units or Unicode scalar values one at a time.
`StrSource` reads a `&str` and `Utf16Source` reads raw code units.
If you have bytes (from a file, the network, or something),
decode them first, for example with `encoding_rs`.

The input is [preprocessed](https://drafts.csswg.org/css-syntax/#input-preprocessing)
on the fly: line endings are folded to `\n`,
NUL and unpaired surrogates become U+FFFD REPLACEMENT CHARACTER.

# Output

`Tokenizer::next_token` returns one `Token` per call, ending with `EndOfInput`.
Each token carries its decoded `value` and its `representation`,
the exact normalized text it was read from:

```rust
use csslexer::{tokenize, TokenKind};

let tokens = tokenize("a { width: 10px }");
let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
assert_eq!(kinds, [
    TokenKind::Ident, TokenKind::Whitespace, TokenKind::LeftBrace, TokenKind::Whitespace,
    TokenKind::Ident, TokenKind::Colon, TokenKind::Whitespace, TokenKind::Dimension,
    TokenKind::Whitespace, TokenKind::RightBrace, TokenKind::EndOfInput,
]);
let source: String = tokens.iter().map(|t| &*t.representation).collect();
assert_eq!(source, "a { width: 10px }");
```

# Errors

Malformed CSS is never an error: the tokenizer recovers the way CSS Syntax mandates,
with `BadString` and `BadUrl` tokens or replacement characters.
The end of the input inside a comment or a string
is additionally reported to a `ParseErrorReporter`.
Only failures of the underlying `Source` surface as `io::Error`.

*/

#[doc(hidden)]
pub use csslexer_macros::*;
#[doc(hidden)]
pub use phf as _csslexer_internal_phf;

pub use crate::error::{LogReporter, ParseError, ParseErrorKind, ParseErrorReporter};
#[doc(hidden)]
pub use crate::macros::_internal__to_lowercase;
pub use crate::preprocessor::Preprocessor;
pub use crate::serializer::{
    serialize_identifier, serialize_name, serialize_string, serialize_unquoted_url,
    CssStringWriter, ToCss,
};
pub use crate::source::{Source, StrSource, Utf16Source};
pub use crate::token::{NumericValue, SourceLocation, SourcePosition, Token, TokenKind};
pub use crate::tokenizer::{tokenize, Tokenizer};

#[macro_use]
mod macros;

mod cursor;
mod error;
mod preprocessor;
mod serializer;
mod source;
mod token;
mod tokenizer;

#[cfg(test)]
mod tests;
