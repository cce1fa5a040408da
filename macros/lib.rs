/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

extern crate proc_macro;

use proc_macro::TokenStream;

/// Input: a `match` expression.
///
/// Output: a `MAX_LENGTH` constant with the length of the longest string pattern.
///
/// Panic if the arms contain non-string patterns,
/// or string patterns that contains ASCII uppercase letters.
#[allow(non_snake_case)]
#[proc_macro]
pub fn csslexer_internal__assert_ascii_lowercase__max_len(input: TokenStream) -> TokenStream {
    let expr: syn::ExprMatch = syn::parse_macro_input!(input);
    let strings = expr
        .arms
        .iter()
        .flat_map(|arm| match arm.pat {
            syn::Pat::Or(ref p) => p.cases.iter().collect(),
            ref p => vec![p],
        })
        .filter_map(|pattern| {
            let expr = match pattern {
                syn::Pat::Lit(expr) => expr,
                syn::Pat::Wild(_) => return None,
                _ => panic!("expected string or wildcard pattern, got {:?}", pattern),
            };
            match expr.lit {
                syn::Lit::Str(ref lit) => {
                    assert_eq!(
                        lit.value(),
                        lit.value().to_ascii_lowercase(),
                        "string patterns must be given in ASCII lowercase"
                    );
                    Some(lit)
                }
                _ => panic!("expected string pattern, got {:?}", expr),
            }
        });
    max_len(strings)
}

/// Input: string literals with no separator
///
/// Output: a `MAX_LENGTH` constant with the length of the longest string.
///
/// Panic if a literal contains ASCII uppercase letters,
/// since phf map keys are looked up after lower-casing the input.
#[allow(non_snake_case)]
#[proc_macro]
pub fn csslexer_internal__max_len(input: TokenStream) -> TokenStream {
    struct Input(Vec<syn::LitStr>);

    impl syn::parse::Parse for Input {
        fn parse(input: syn::parse::ParseStream) -> syn::parse::Result<Self> {
            let mut strings = Vec::new();
            while !input.is_empty() {
                strings.push(input.parse()?)
            }
            Ok(Self(strings))
        }
    }

    let strings: Input = syn::parse_macro_input!(input);
    for s in &strings.0 {
        assert_eq!(
            s.value(),
            s.value().to_ascii_lowercase(),
            "map keys must be given in ASCII lowercase"
        );
    }
    max_len(strings.0.iter())
}

fn max_len<'a, I: Iterator<Item = &'a syn::LitStr>>(strings: I) -> TokenStream {
    let max_length = strings
        .map(|s| s.value().len())
        .max()
        .expect("expected at least one string");
    quote::quote!( pub(super) const MAX_LENGTH: usize = #max_length; ).into()
}
