mod common;

use common::*;

#[test]
fn exact_match_outranks_more_frequent_variants() {
    let f = open_index();
    // "invoices" appears in three documents, "invoice" in one
    f.index
        .add_or_update_document(&doc(1, "single", "the invoice arrived"), &[])
        .unwrap();
    for id in 2..=4 {
        f.index
            .add_or_update_document(&doc(id, "plural", "several invoices arrived"), &[])
            .unwrap();
    }

    let suggestions = f.index.autocomplete("invoice", 10, None).unwrap();
    assert_eq!(suggestions[0], "invoice");
    assert!(suggestions.contains(&"invoices".to_string()));
}

#[test]
fn candidates_are_ranked_by_document_frequency() {
    let f = open_index();
    for id in 1..=3 {
        f.index
            .add_or_update_document(&doc(id, "common", "alpha particles"), &[])
            .unwrap();
    }
    f.index
        .add_or_update_document(&doc(4, "rare", "alphabet soup"), &[])
        .unwrap();

    let suggestions = f.index.autocomplete("alph", 10, None).unwrap();
    assert_eq!(suggestions, vec!["alpha", "alphabet"]);
}

#[test]
fn prefix_without_exact_match_keeps_frequency_order() {
    let f = open_index();
    f.index
        .add_or_update_document(&doc(1, "single", "the invoice arrived"), &[])
        .unwrap();
    for id in 2..=4 {
        f.index
            .add_or_update_document(&doc(id, "plural", "several invoices arrived"), &[])
            .unwrap();
    }

    let suggestions = f.index.autocomplete("invoic", 10, None).unwrap();
    assert_eq!(suggestions, vec!["invoices", "invoice"]);
}

#[test]
fn limit_is_respected() {
    let f = open_index();
    for (id, word) in ["alpha", "alphabet", "alphanumeric"].iter().enumerate() {
        f.index
            .add_or_update_document(&doc(id as u64 + 1, "doc", word), &[])
            .unwrap();
    }

    let suggestions = f.index.autocomplete("alph", 2, None).unwrap();
    assert_eq!(suggestions.len(), 2);
}

#[test]
fn unmatched_prefix_yields_nothing() {
    let f = open_index();
    f.index
        .add_or_update_document(&doc(1, "doc", "ordinary words"), &[])
        .unwrap();

    assert!(f.index.autocomplete("zzzz", 10, None).unwrap().is_empty());
}

#[test]
fn suggestions_come_from_unstemmed_surface_forms() {
    let f = open_index();
    // the stemmer would collapse "running" to "run"; the suggestion keeps
    // the form that was actually written
    f.index
        .add_or_update_document(&doc(1, "doc", "running totals"), &[])
        .unwrap();

    let suggestions = f.index.autocomplete("runn", 10, None).unwrap();
    assert_eq!(suggestions, vec!["running"]);
}
