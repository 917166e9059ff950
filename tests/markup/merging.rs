//! Integration tests for template merging.

use parley_markup::{Fragment, MarkupNode, RANDOM_TAG, SYNTHETIC_ATTRIBUTE, TemplateCombiner};

fn combiner() -> TemplateCombiner {
    TemplateCombiner::new("", " ")
}

#[test]
fn repeated_combines_stay_flat() {
    let c = combiner();
    let mut stored = "Alternative 0.".to_string();
    for i in 1..=3 {
        stored = c.combine(&stored, &format!("Alternative {i}."));
    }

    let fragment = Fragment::parse(&stored).unwrap();
    assert_eq!(fragment.nodes.len(), 1);
    let MarkupNode::Element(container) = &fragment.nodes[0] else {
        panic!("expected a container element");
    };
    assert_eq!(container.name, RANDOM_TAG);
    assert_eq!(container.attribute(SYNTHETIC_ATTRIBUTE), Some("yes"));
    // Three combines produce four flat branches, no nesting.
    assert_eq!(container.children.len(), 4);
    for child in &container.children {
        let MarkupNode::Element(branch) = child else {
            panic!("expected a choice branch");
        };
        assert_eq!(branch.name, "li");
    }
}

#[test]
fn combine_preserves_rich_content() {
    let merged = combiner().combine(
        r#"<srai>GREET</srai>"#,
        r#"Well hello! <get name="username"/>"#,
    );
    assert_eq!(
        merged,
        r#"<random synthetic="yes"><li><srai>GREET</srai></li><li>Well hello! <get name="username"/></li></random>"#
    );
}

#[test]
fn malformed_new_template_never_corrupts_stored_one() {
    let c = combiner();
    let stored = r#"<random synthetic="yes"><li>A</li><li>B</li></random>"#;

    for bad in ["<broken", "a & b", "<a></b>"] {
        let result = c.combine(stored, bad);
        // Byte-for-byte identical, not merely equivalent.
        assert_eq!(result, stored);
    }
}

#[test]
fn append_chains_templates() {
    let c = combiner();
    let once = c.append("One.", "Two.");
    let twice = c.append(&once, "Three.");
    assert_eq!(twice, "One. Two. Three.");
}

#[test]
fn append_failure_keeps_existing() {
    let c = combiner();
    assert_eq!(c.append("Kept.", "<nope"), "Kept.");
}

#[test]
fn namespaced_container() {
    let c = TemplateCombiner::new("http://alicebot.org/2001/AIML-1.0.1", " ");
    let merged = c.combine("A", "B");
    assert!(merged.starts_with(r#"<random xmlns="http://alicebot.org/2001/AIML-1.0.1""#));

    // Extending the container must not add a second namespace declaration.
    let again = c.combine(&merged, "C");
    assert_eq!(again.matches("xmlns").count(), 1);
}
