//! Integration tests for word interning.

use parley_foundation::WordTable;

#[test]
fn interned_ids_are_stable() {
    let mut table = WordTable::new();
    let first = table.intern("HELLO");

    for _ in 0..10 {
        assert_eq!(table.intern("HELLO"), first);
    }
    assert_eq!(table.len(), 1);
}

#[test]
fn lookup_never_grows_the_table() {
    let mut table = WordTable::new();
    table.intern("KNOWN");

    for word in ["UNKNOWN", "ALSO-UNKNOWN", "known"] {
        assert!(table.lookup(word).is_none());
    }
    assert_eq!(table.len(), 1);
}

#[test]
fn ids_resolve_after_many_inserts() {
    let mut table = WordTable::new();
    let ids: Vec<_> = (0..500)
        .map(|i| (format!("WORD{i}"), table.intern(&format!("WORD{i}"))))
        .collect();

    for (word, id) in ids {
        assert_eq!(table.resolve(id), Some(word.as_str()));
    }
}
