/*!
 * Tests for flattening and source/target alignment
 */

use anyhow::Result;
use serde_json::json;
use tmxalign::memory::Aligner;
use tmxalign::{Diagnostic, DocumentError};
use crate::common;

/// Test the colon-list example with matching counts
#[test]
fn test_align_withMatchingSegmentCounts_shouldEmitOneRecordPerSegment() -> Result<()> {
    let source = common::document_at("en/q.json", json!({ "q": "A: 1. X" }));
    let target = common::document_at("fr/q.json", json!({ "q": "Q: 1. Y" }));

    let alignment = Aligner::align(&source, &target, true)?;
    assert!(alignment.diagnostics.is_empty());
    assert_eq!(alignment.records.len(), 2);

    let first = &alignment.records[0];
    assert_eq!((first.source_text.as_str(), first.target_text.as_str()), ("A:", "Q:"));
    assert_eq!((first.segment_index, first.total_segments), (Some(0), Some(2)));

    let second = &alignment.records[1];
    assert_eq!((second.source_text.as_str(), second.target_text.as_str()), ("1. X", "1. Y"));
    assert_eq!((second.segment_index, second.total_segments), (Some(1), Some(2)));
    assert!(alignment.records.iter().all(|r| r.key_path == "q" && r.source_document == "en/q.json"));
    Ok(())
}

/// Test the fallback when sentence counts differ
#[test]
fn test_align_withMismatchedSegmentCounts_shouldFallBackToWholeValue() -> Result<()> {
    let source = common::document_at("en/q.json", json!({ "q": "A: 1. X" }));
    let target = common::document_at("fr/q.json", json!({ "q": "Q sans liste" }));

    let alignment = Aligner::align(&source, &target, true)?;
    assert_eq!(alignment.records.len(), 1);
    assert_eq!(alignment.records[0].source_text, "A: 1. X");
    assert_eq!(alignment.records[0].target_text, "Q sans liste");
    assert!(!alignment.records[0].is_segment());
    assert_eq!(
        alignment.diagnostics,
        vec![Diagnostic::SegmentMismatch {
            key_path: "q".to_string(),
            source_document: "en/q.json".to_string(),
            source_segments: 2,
            target_segments: 1,
        }]
    );
    Ok(())
}

/// Test that disabled segmentation never splits
#[test]
fn test_align_withSegmentationDisabled_shouldKeepValuesWhole() -> Result<()> {
    let source = common::document_at("en/a.json", json!({ "text": "One. Two. Three." }));
    let target = common::document_at("de/a.json", json!({ "text": "Eins. Zwei. Drei." }));

    let alignment = Aligner::align(&source, &target, false)?;
    assert_eq!(alignment.records.len(), 1);
    assert_eq!(alignment.records[0].target_text, "Eins. Zwei. Drei.");
    assert!(!alignment.records[0].is_segment());
    Ok(())
}

/// Test that a single-sentence source is never segmented
#[test]
fn test_align_withSingleSentenceSource_shouldNotSegmentTarget() -> Result<()> {
    let source = common::document_at("en/a.json", json!({ "t": "Hello there." }));
    let target = common::document_at("fr/a.json", json!({ "t": "Salut. Ça va." }));

    let alignment = Aligner::align(&source, &target, true)?;
    assert_eq!(alignment.records.len(), 1);
    assert!(alignment.diagnostics.is_empty());
    assert_eq!(alignment.records[0].target_text, "Salut. Ça va.");
    Ok(())
}

/// Test missing keys in the target
#[test]
fn test_align_withMissingTargetKey_shouldEmitEmptyTargetAndDiagnostic() -> Result<()> {
    let source = common::document_at("en/a.json", json!({ "a": "First. Second.", "b": "Kept" }));
    let target = common::document_at("fr/a.json", json!({ "b": "Gardé" }));

    let alignment = Aligner::align(&source, &target, true)?;
    assert_eq!(alignment.missing_keys, vec!["a".to_string()]);
    assert_eq!(alignment.records.len(), 2);
    assert_eq!(alignment.records[0].key_path, "a");
    assert_eq!(alignment.records[0].target_text, "");
    assert!(!alignment.records[0].is_segment());
    assert_eq!(
        alignment.diagnostics,
        vec![Diagnostic::MissingKey {
            key_path: "a".to_string(),
            target_document: "fr/a.json".to_string(),
        }]
    );
    Ok(())
}

/// Test that record order follows source document order
#[test]
fn test_align_withNestedContent_shouldFollowSourceOrder() -> Result<()> {
    let source = common::document_at(
        "en/nav.json",
        json!({ "z": "Last", "menu": { "items": ["Home", "About"], "count": 2 }, "a": "First" }),
    );
    let target = common::document_at(
        "fr/nav.json",
        json!({ "a": "Premier", "menu": { "items": ["Accueil", "À propos"] }, "z": "Dernier", "extra": "x" }),
    );

    let alignment = Aligner::align(&source, &target, false)?;
    let keys: Vec<&str> = alignment.records.iter().map(|r| r.key_path.as_str()).collect();
    assert_eq!(keys, vec!["z", "menu.items[0]", "menu.items[1]", "a"]);
    assert_eq!(alignment.records[2].target_text, "À propos");
    assert!(alignment.missing_keys.is_empty());
    Ok(())
}

/// Test that a scalar root is reported as an error
#[test]
fn test_align_withScalarTargetRoot_shouldFail() {
    let source = common::document_at("en/a.json", json!({ "t": "x" }));
    let target = common::document_at("fr/a.json", json!(42));

    let err = Aligner::align(&source, &target, false).unwrap_err();
    assert_eq!(
        err,
        DocumentError::UnsupportedRoot { name: "fr/a.json".to_string(), kind: "number" }
    );
}

/// Test that containers without string leaves add no entries
#[test]
fn test_flatten_withEmptyContainers_shouldProduceNothing() -> Result<()> {
    let flat = Aligner::flatten("empty.json", &json!({ "a": {}, "b": [], "c": [null, 1, false] }))?;
    assert!(flat.is_empty());
    assert_eq!(flat.len(), 0);
    Ok(())
}

/// Test that keys iterate in insertion order
#[test]
fn test_flatten_keys_shouldFollowDocumentOrder() -> Result<()> {
    let flat = Aligner::flatten("k.json", &json!({ "b": "2", "a": { "c": "3" }, "d": ["4"] }))?;
    let keys: Vec<&str> = flat.keys().collect();
    assert_eq!(keys, vec!["b", "a.c", "d[0]"]);
    Ok(())
}
