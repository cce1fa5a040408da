#![no_main]

use csslexer::*;

const DEBUG: bool = false;

fn normalize(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\x0C', "\n")
        .replace('\0', "\u{FFFD}")
}

fn fuzz(data: &str) {
    let tokens = tokenize(data);
    if DEBUG {
        for token in &tokens {
            println!("{:?}", token);
        }
    }
    let representation: String = tokens.iter().map(|t| &*t.representation).collect();
    assert_eq!(representation, normalize(data), "Representations should cover the input");
    assert!(tokens.last().map_or(false, Token::is_end_of_input));

    let mut serialization = String::new();
    for token in &tokens {
        if token.is_parse_error() {
            return;
        }
        token.to_css(&mut serialization).unwrap();
    }
    tokenize(&serialization);
}

libfuzzer_sys::fuzz_target!(|data: &str| {
    fuzz(data);
});
