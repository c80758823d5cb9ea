// tests/property/tokenizer_test.rs

//! Properties of command-line tokenization.

use proptest::prelude::*;
use tunecast::core::Command;
use tunecast::core::protocol::tokenize;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_plain_words_survive_any_spacing(
        words in prop::collection::vec("[a-zA-Z0-9@._-]{1,12}", 1..8),
        gaps in prop::collection::vec("[ \t]{1,4}", 8),
        terminator in prop::sample::select(vec!["", "\n", "\r\n"]),
    ) {
        let mut line = String::new();
        for (word, gap) in words.iter().zip(gaps.iter()) {
            line.push_str(gap);
            line.push_str(word);
        }
        line.push_str(terminator);

        prop_assert_eq!(tokenize(&line), words);
    }

    #[test]
    fn test_quoted_argument_is_one_token(
        name in "[a-z-]{1,10}",
        arg in "[^\"\r\n]{0,30}",
        tail in "[a-z]{1,10}",
    ) {
        let line = format!("{name} \"{arg}\" {tail}");
        let command = Command::from_line(&line);

        prop_assert_eq!(command.name(), name.as_str());
        prop_assert_eq!(command.args(), &[arg, tail][..]);
    }

    #[test]
    fn test_tokens_never_contain_terminators(line in "\\PC{0,80}") {
        for token in tokenize(&format!("{line}\r\n")) {
            prop_assert!(!token.ends_with('\n'));
            prop_assert!(!token.ends_with('\r'));
        }
    }
}
