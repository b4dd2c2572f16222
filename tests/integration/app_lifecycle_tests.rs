/*!
 * Integration tests for the controller lifecycle
 */

use anyhow::Result;
use serde_json::json;
use tmxalign::app_config::Config;
use tmxalign::{Controller, Diagnostic, Document, Severity};
use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config(), &Config::default());
    Ok(())
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.output.extension = "t m x".to_string();
    assert!(Controller::with_config(config).is_err());
}

/// Test a run without documents
#[test]
fn test_run_withNoDocuments_shouldReportNoSourceDocuments() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let output = controller.run(&[]);
    assert!(output.files.is_empty());
    assert_eq!(output.diagnostics, vec![Diagnostic::NoSourceDocuments]);
    assert_eq!(output.diagnostics[0].severity(), Severity::Error);
    Ok(())
}

/// Test in-memory documents identified by name only
#[test]
fn test_run_withNamedDocuments_shouldUsePlainPrefix() -> Result<()> {
    let documents = vec![
        Document::new("en.json", json!({ "greeting": "Hello" })),
        Document::new("es.json", json!({ "greeting": "Hola" })),
    ];

    let controller = Controller::with_config(Config::default())?;
    let output = controller.run(&documents);

    assert_eq!(output.files.len(), 1);
    let file = &output.files[0];
    assert_eq!(file.file_name, "translation_memory_en_es.tmx");
    assert_eq!(file.source_language.as_str(), "en");
    assert_eq!(file.target_language.as_str(), "es");
    assert_eq!(file.record_count, 1);
    assert!(output.diagnostics.is_empty());
    Ok(())
}

/// Test that a pair whose target cannot be flattened is skipped
#[test]
fn test_run_withScalarTarget_shouldSkipPairWithError() -> Result<()> {
    let documents = vec![
        common::document_at("en/a.json", json!({ "t": "Hi" })),
        common::document_at("fr/a.json", json!("not an object")),
        common::document_at("de/a.json", json!({ "t": "Hallo" })),
    ];

    let controller = Controller::with_config(Config::default())?;
    let output = controller.run(&documents);

    assert_eq!(output.files.len(), 1);
    assert_eq!(output.files[0].target_language.as_str(), "de");
    assert_eq!(output.error_count(), 1);
    assert!(matches!(
        &output.diagnostics[0],
        Diagnostic::MalformedContent { document, .. } if document == "fr/a.json"
    ));
    Ok(())
}

/// Test the display preview of a produced file
#[test]
fn test_preview_withInlineMarkup_shouldUseBraceNotation() -> Result<()> {
    let documents = vec![
        common::document_at("en/a.json", json!({ "t": "Click <a href=\"#\">here</a>", "u": "Line<br/>break" })),
        common::document_at("fr/a.json", json!({ "t": "Cliquez <a href=\"#\">ici</a>", "u": "Ligne<br/>suivante" })),
    ];

    let controller = Controller::with_config(Config::default())?;
    let output = controller.run(&documents);
    let preview = controller.preview(&output.files[0], 1);

    assert_eq!(preview, vec!["Click {1}here{/1}", "Cliquez {1}ici{/1}"]);
    assert_eq!(controller.preview(&output.files[0], 5).len(), 4);
    Ok(())
}

/// Test that distinct groups whose sanitized names collide get a numeric suffix
#[test]
fn test_run_withCollidingGroupNames_shouldAddSuffix() -> Result<()> {
    let documents = vec![
        common::document_at("a/b/en/x.json", json!({ "t": "One" })),
        common::document_at("a/b/fr/x.json", json!({ "t": "Un" })),
        common::document_at("a_b/en/x.json", json!({ "t": "Two" })),
        common::document_at("a_b/fr/x.json", json!({ "t": "Deux" })),
    ];

    let controller = Controller::with_config(Config::default())?;
    let output = controller.run(&documents);

    let names: Vec<&str> = output.files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["translation_memory_a_b_x_en_fr.tmx", "translation_memory_a_b_x_2_en_fr.tmx"]
    );
    Ok(())
}
