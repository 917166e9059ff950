//! Integration tests for matching precedence and captures.

use std::time::Duration;

use parley_foundation::GraphSettings;
use parley_graph::RuleGraph;

const TIMEOUT: Duration = Duration::from_millis(1000);

fn graph() -> RuleGraph {
    RuleGraph::new(GraphSettings::default())
}

#[test]
fn stored_rule_is_found() {
    let mut g = graph();
    g.add_rule("HELLO", "*", "*", "T", "b1", "a.xml").unwrap();

    let found = g.match_words(&["HELLO"], &[], &[], "b1", TIMEOUT).unwrap();
    assert_eq!(&*found.template, "T");
}

#[test]
fn literal_rule_beats_wildcard_rule() {
    let mut g = graph();
    g.add_rule("A B", "*", "*", "literal", "b1", "a.xml").unwrap();
    g.add_rule("A *", "*", "*", "wild", "b1", "a.xml").unwrap();

    let found = g
        .match_words(&["A", "B"], &[], &[], "b1", TIMEOUT)
        .unwrap();
    assert_eq!(&*found.template, "literal");

    // The wildcard rule still serves everything else.
    let other = g
        .match_words(&["A", "C"], &[], &[], "b1", TIMEOUT)
        .unwrap();
    assert_eq!(&*other.template, "wild");
}

#[test]
fn underscore_rule_beats_star_rule() {
    let mut g = graph();
    g.add_rule("* CATS", "*", "*", "star", "b1", "a.xml").unwrap();
    g.add_rule("_ CATS", "*", "*", "under", "b1", "a.xml").unwrap();

    let found = g
        .match_words(&["LOVELY", "CATS"], &[], &[], "b1", TIMEOUT)
        .unwrap();
    assert_eq!(&*found.template, "under");
}

#[test]
fn lone_star_absorbs_whole_input() {
    let mut g = graph();
    g.add_rule("*", "*", "*", "caught", "b1", "a.xml").unwrap();

    let found = g
        .match_words(&["X", "Y", "Z"], &[], &[], "b1", TIMEOUT)
        .unwrap();
    assert_eq!(found.input_stars, vec!["X Y Z".to_string()]);
}

#[test]
fn captures_split_across_segments() {
    let mut g = graph();
    g.add_rule("I SAID *", "YOU ASKED *", "*", "echo", "b1", "a.xml")
        .unwrap();

    let found = g
        .match_words(
            &["I", "SAID", "NOTHING", "MUCH"],
            &["YOU", "ASKED", "SOMETHING"],
            &["ANY", "TOPIC"],
            "b1",
            TIMEOUT,
        )
        .unwrap();

    assert_eq!(found.input_stars, vec!["NOTHING MUCH".to_string()]);
    assert_eq!(found.that_stars, vec!["SOMETHING".to_string()]);
    assert_eq!(found.topic_stars, vec!["ANY TOPIC".to_string()]);
    assert_eq!(found.matched_pattern, "I SAID *");
    assert_eq!(found.matched_that, "YOU ASKED *");
    assert_eq!(found.matched_topic, "*");
    assert_eq!(found.matched_bot_id, "b1");
}

#[test]
fn expired_deadline_yields_no_match_despite_matching_rule() {
    let mut g = graph();
    g.add_rule("HELLO", "*", "*", "T", "b1", "a.xml").unwrap();

    let err = g
        .match_words(&["HELLO"], &[], &[], "b1", Duration::ZERO)
        .unwrap_err();
    assert!(err.is_no_match());
}

#[test]
fn rules_are_partitioned_by_bot() {
    let mut g = graph();
    g.add_rule("HELLO", "*", "*", "from-b1", "b1", "a.xml").unwrap();
    g.add_rule("HELLO", "*", "*", "from-b2", "b2", "a.xml").unwrap();

    let b1 = g.match_words(&["HELLO"], &[], &[], "b1", TIMEOUT).unwrap();
    let b2 = g.match_words(&["HELLO"], &[], &[], "b2", TIMEOUT).unwrap();
    assert_eq!(&*b1.template, "from-b1");
    assert_eq!(&*b2.template, "from-b2");

    // Both rules count: the paths differ in their bot-id word.
    assert_eq!(g.stats().total_rules, 2);
}

#[test]
fn longer_patterns_prune_short_inputs() {
    let mut g = graph();
    g.add_rule("ONE TWO THREE FOUR FIVE", "*", "*", "long", "b1", "a.xml")
        .unwrap();

    let err = g
        .match_words(&["ONE", "TWO"], &[], &[], "b1", TIMEOUT)
        .unwrap_err();
    assert!(err.is_no_match());
}

#[test]
fn wildcard_cannot_cross_segment_boundary() {
    // A trailing pattern wildcard must not swallow the that-words.
    let mut g = graph();
    g.add_rule("SAY *", "PROMPT", "*", "scoped", "b1", "a.xml")
        .unwrap();

    let found = g
        .match_words(&["SAY", "CHEESE", "PLEASE"], &["PROMPT"], &[], "b1", TIMEOUT)
        .unwrap();
    assert_eq!(found.input_stars, vec!["CHEESE PLEASE".to_string()]);
    assert_eq!(found.that_stars, Vec::<String>::new());

    // With a different that, the rule is unreachable: the pattern star
    // cannot absorb its way across the boundary.
    let err = g
        .match_words(
            &["SAY", "CHEESE", "PLEASE"],
            &["OTHER", "PROMPT"],
            &[],
            "b1",
            TIMEOUT,
        )
        .unwrap_err();
    assert!(err.is_no_match());
}
