/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

/// Expands to a `match` expression with string patterns,
/// matching case-insensitively in the ASCII range.
///
/// The patterns must not contain ASCII upper case letters. (They must be already be lower-cased.)
///
/// # Example
///
/// ```rust
/// #[macro_use] extern crate csslexer;
///
/// # fn main() {}  // Make doctest not wrap everything in its own main
/// # fn dummy(function_name: &String) { let _ =
/// match_ignore_ascii_case! { &function_name,
///     "url" => parse_url(..),
///     "var" | "env" => parse_reference(..),
///     _ => Err("unknown function")
/// }
/// # ;}
/// # use std::ops::RangeFull;
/// # fn parse_url(_: RangeFull) -> Result<(), &'static str> { Err("") }
/// # fn parse_reference(_: RangeFull) -> Result<(), &'static str> { Err("") }
/// ```
#[macro_export]
macro_rules! match_ignore_ascii_case {
    ( $input:expr, $( $( $pattern: pat )|+ => $then: expr ),+ $(,)? ) => {
        {
            // Proc macros cannot expand to statements,
            // so the generated constant lives in an item context.
            mod csslexer_internal {
                $crate::csslexer_internal__assert_ascii_lowercase__max_len! {
                    match x { $( $( $pattern )|+ => (), )+ }
                }
            }
            $crate::_csslexer_internal__to_lowercase!($input, csslexer_internal::MAX_LENGTH => lowercase);
            // "A" cannot equal any pattern: none of them contain ASCII upper case letters.
            match lowercase.unwrap_or("A") {
                $(
                    $( $pattern )|+ => $then,
                )+
            }
        }
    };
}

/// Define a function `$name(&str) -> Option<&'static $ValueType>`
///
/// The function finds a match for the input string
/// in a [`phf` map](https://github.com/sfackler/rust-phf)
/// and returns a reference to the corresponding value.
/// Matching is case-insensitive in the ASCII range.
///
/// Keys must be given in ASCII lower case.
///
/// ## Example:
///
/// ```rust
/// #[macro_use] extern crate csslexer;
///
/// # fn main() {}  // Make doctest not wrap everything in its own main
///
/// fn quote_char(input: &str) -> Option<char> {
///     ascii_case_insensitive_phf_map! {
///         quote -> char = {
///             "apostrophe" => '\'',
///             "quotation-mark" => '"',
///         }
///     }
///     quote(input).cloned()
/// }
/// ```
#[macro_export]
macro_rules! ascii_case_insensitive_phf_map {
    ($name: ident -> $ValueType: ty = { $( $key: tt => $value: expr ),+ }) => {
        ascii_case_insensitive_phf_map!($name -> $ValueType = { $( $key => $value, )+ })
    };
    ($name: ident -> $ValueType: ty = { $( $key: tt => $value: expr, )+ }) => {
        fn $name(input: &str) -> Option<&'static $ValueType> {
            mod csslexer_internal {
                $crate::csslexer_internal__max_len! {
                    $( $key )+
                }
            }
            use $crate::_csslexer_internal_phf as phf;
            static MAP: phf::Map<&'static str, $ValueType> = phf::phf_map! {
                $(
                    $key => $value,
                )+
            };
            $crate::_csslexer_internal__to_lowercase!(input, csslexer_internal::MAX_LENGTH => lowercase);
            lowercase.and_then(|s| MAP.get(s))
        }
    }
}

/// Implementation detail of match_ignore_ascii_case! and ascii_case_insensitive_phf_map! macros.
///
/// **This macro is not part of the public API. It can change or be removed between any versions.**
///
/// Define a local variable named `$output`
/// to the result of calling `_internal__to_lowercase`
/// with a stack-allocated buffer of `$BUFFER_SIZE` bytes.
#[macro_export]
#[doc(hidden)]
macro_rules! _csslexer_internal__to_lowercase {
    ($input: expr, $BUFFER_SIZE: expr => $output: ident) => {
        let mut buffer = [0_u8; $BUFFER_SIZE];
        let input: &str = $input;
        let $output = $crate::_internal__to_lowercase(&mut buffer, input);
    };
}

/// Implementation detail of match_ignore_ascii_case! and ascii_case_insensitive_phf_map! macros.
///
/// **This function is not part of the public API. It can change or be removed between any verisons.**
///
/// Return `input`, lower-cased, unless larger than `buffer`
/// which is used temporary space for lower-casing a copy of `input` if necessary.
#[doc(hidden)]
#[allow(non_snake_case)]
pub fn _internal__to_lowercase<'a>(buffer: &'a mut [u8], input: &'a str) -> Option<&'a str> {
    let buffer = buffer.get_mut(..input.len())?;
    match input.bytes().position(|byte| byte.is_ascii_uppercase()) {
        Some(first_uppercase) => {
            buffer.copy_from_slice(input.as_bytes());
            buffer[first_uppercase..].make_ascii_lowercase();
            // ASCII lower-casing preserves UTF-8 well-formedness.
            std::str::from_utf8(buffer).ok()
        }
        // Input is already lower-case
        None => Some(input),
    }
}
