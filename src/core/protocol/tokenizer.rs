// src/core/protocol/tokenizer.rs

//! Splits a command line into whitespace-separated tokens, keeping
//! double-quoted spans together as a single token.

/// Tokenizes one line of client input.
///
/// Tokens are separated by runs of spaces or tabs. A double-quoted span is one
/// token with the quotes removed, so `create-playlist "rock forever"` yields
/// two tokens. An unterminated quote runs to the end of the line. Any trailing
/// line terminator is ignored rather than becoming part of the last token.
pub fn tokenize(line: &str) -> Vec<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    // Distinguishes `""` (an empty token) from no token at all.
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            ' ' | '\t' if !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            _ => {
                current.push(ch);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}
