//! Integration tests for path assembly.

use parley_foundation::{Token, query_path, rule_path, word_split};

#[test]
fn full_rule_path_shape() {
    let path = rule_path("HOW ARE YOU", "I AM FINE", "SMALLTALK", "alice");

    let rendered: Vec<&str> = path.iter().map(Token::as_text).collect();
    assert_eq!(
        rendered,
        vec![
            "HOW", "ARE", "YOU", "<that>", "I", "AM", "FINE", "<topic>", "SMALLTALK", "<botid>",
            "alice",
        ]
    );
}

#[test]
fn empty_parts_become_catch_all_tokens() {
    let path = rule_path("", "", "", "alice");
    let rendered: Vec<&str> = path.iter().map(Token::as_text).collect();
    assert_eq!(
        rendered,
        vec!["*", "<that>", "*", "<topic>", "*", "<botid>", "alice"]
    );
}

#[test]
fn wildcards_in_rule_text_become_wildcard_tokens() {
    let path = rule_path("_ LIKES *", "*", "*", "alice");
    assert_eq!(path[0], Token::Underscore);
    assert_eq!(path[2], Token::Star);
}

#[test]
fn query_and_rule_paths_are_interchangeable() {
    let rule = rule_path("GOOD MORNING", "", "WEATHER", "b1");
    let query = query_path(&["GOOD", "MORNING"], &[], &["WEATHER"], "b1");
    assert_eq!(rule, query);
}

#[test]
fn word_split_handles_tabs_and_newlines() {
    assert_eq!(word_split("A\tB\nC"), vec!["A", "B", "C"]);
}
