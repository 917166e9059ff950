//! A small end-to-end dialogue scenario.

use std::time::Duration;

use parley::foundation::{GraphSettings, MergePolicy};
use parley::graph::{RuleGraph, SharedRuleGraph};
use parley::markup::Fragment;

const TIMEOUT: Duration = Duration::from_millis(1000);

/// Loads a small rule pack resembling a real bot's greeting file.
fn load_greetings(graph: &mut RuleGraph, bot: &str) {
    let rules = [
        ("HELLO", "*", "*", "Hi there!"),
        ("HELLO *", "*", "*", "Well hello. No need for the rest."),
        ("MY NAME IS *", "*", "*", r#"Nice to meet you, <star/>."#),
        ("YES", "DO YOU LIKE *", "*", r#"Glad you like <thatstar/>."#),
        ("*", "*", "*", "I am not sure I follow."),
    ];
    for (pattern, that, topic, template) in rules {
        graph
            .add_rule(pattern, that, topic, template, bot, "greetings.xml")
            .unwrap();
    }
}

#[test]
fn a_short_conversation() {
    let mut graph = RuleGraph::new(GraphSettings::default());
    load_greetings(&mut graph, "alice");

    // Turn 1: exact greeting.
    let turn = graph.match_input("HELLO", "", "", "alice").unwrap();
    assert_eq!(&*turn.template, "Hi there!");

    // Turn 2: greeting with extra words goes to the wildcard variant.
    let turn = graph
        .match_input("HELLO MY OLD FRIEND", "", "", "alice")
        .unwrap();
    assert_eq!(&*turn.template, "Well hello. No need for the rest.");
    assert_eq!(turn.input_stars, vec!["MY OLD FRIEND".to_string()]);

    // Turn 3: the capture feeds the template executor.
    let turn = graph
        .match_input("MY NAME IS MARVIN", "", "", "alice")
        .unwrap();
    assert_eq!(turn.input_stars, vec!["MARVIN".to_string()]);
    assert!(Fragment::parse(&turn.template).is_ok());

    // Turn 4: the previous bot response steers matching.
    let turn = graph
        .match_input("YES", "DO YOU LIKE TEA", "", "alice")
        .unwrap();
    assert_eq!(turn.that_stars, vec!["TEA".to_string()]);

    // Turn 5: anything else lands on the catch-all.
    let turn = graph
        .match_input("COMPLETE GIBBERISH HERE", "", "", "alice")
        .unwrap();
    assert_eq!(&*turn.template, "I am not sure I follow.");
}

#[test]
fn pack_reload_swaps_responses() {
    let mut graph = RuleGraph::new(GraphSettings::default());
    load_greetings(&mut graph, "alice");
    let before = graph.stats().total_rules;

    // Reload: drop the pack, load a revised one under the same source id.
    graph.unload("greetings.xml").unwrap();
    assert_eq!(graph.stats().total_rules, 0);
    graph
        .add_rule("HELLO", "*", "*", "Greetings, v2.", "alice", "greetings.xml")
        .unwrap();

    let turn = graph.match_input("HELLO", "", "", "alice").unwrap();
    assert_eq!(&*turn.template, "Greetings, v2.");
    assert!(before > 1);
}

#[test]
fn two_bots_share_one_graph() {
    let mut graph = RuleGraph::new(GraphSettings::default());
    load_greetings(&mut graph, "alice");
    load_greetings(&mut graph, "bob");

    // Same source file, two bot identities, fully independent paths.
    assert_eq!(graph.stats().total_rules, 10);
    assert!(graph.match_input("HELLO", "", "", "alice").is_ok());
    assert!(graph.match_input("HELLO", "", "", "bob").is_ok());

    // Unloading the shared source takes down both bots' rules.
    graph.unload("greetings.xml").unwrap();
    assert_eq!(graph.stats().total_rules, 0);
}

#[test]
fn combine_policy_accumulates_variants_across_packs() {
    let mut graph = RuleGraph::new(
        GraphSettings::new()
            .with_merge_policy(MergePolicy::Combine)
            .with_markup_namespace(""),
    );
    graph
        .add_rule("HELLO", "*", "*", "Hi!", "alice", "base.xml")
        .unwrap();
    graph
        .add_rule("HELLO", "*", "*", "Hey!", "alice", "extra.xml")
        .unwrap();

    let turn = graph
        .match_words(&["HELLO"], &[], &[], "alice", TIMEOUT)
        .unwrap();
    assert_eq!(
        &*turn.template,
        r#"<random synthetic="yes"><li>Hi!</li><li>Hey!</li></random>"#
    );
    assert_eq!(turn.sources.len(), 2);
}

#[test]
fn shared_graph_serves_dialogue_while_loading() {
    let shared = SharedRuleGraph::new(GraphSettings::default());
    {
        let mut graph = shared.write();
        load_greetings(&mut graph, "alice");
    }

    let loader = {
        let shared = shared.clone();
        std::thread::spawn(move || {
            for i in 0..100 {
                let pattern = format!("FACT NUMBER {i}");
                shared
                    .add_rule(&pattern, "*", "*", "Noted.", "alice", "facts.xml")
                    .unwrap();
            }
        })
    };

    for _ in 0..200 {
        let turn = shared.match_input("HELLO", "", "", "alice").unwrap();
        assert_eq!(&*turn.template, "Hi there!");
    }
    loader.join().unwrap();

    assert_eq!(shared.stats().total_rules, 105);
}
