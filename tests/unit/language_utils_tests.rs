/*!
 * Tests for language detection and document pairing
 */

use anyhow::Result;
use serde_json::json;
use tmxalign::language_utils::{DetectionOrigin, LanguageCode, LanguageResolver};
use tmxalign::{Diagnostic, Document, get_language_name, language_codes_match};
use crate::common;

fn code(s: &str) -> LanguageCode {
    LanguageCode::parse(s).unwrap()
}

/// Test path detection prefers region-qualified segments
#[test]
fn test_detectFromPath_withRegionalAndBareSegments_shouldPreferRegional() {
    assert_eq!(LanguageResolver::detect_from_path("en-GB/app/en/home.json"), Some(code("en-GB")));
    assert_eq!(LanguageResolver::detect_from_path("locales/fr/home.json"), Some(code("fr")));
    assert_eq!(LanguageResolver::detect_from_path("de/app/fr/home.json"), Some(code("fr")));
}

/// Test that the file name itself is not a path segment
#[test]
fn test_detectFromPath_withLanguageOnlyInFileName_shouldReturnNone() {
    assert_eq!(LanguageResolver::detect_from_path("locales/fr.json"), None);
    assert_eq!(LanguageResolver::detect_from_path("home.json"), None);
}

/// Test the three file name shapes
#[test]
fn test_detectFromFilename_withSupportedShapes_shouldDetect() {
    assert_eq!(LanguageResolver::detect_from_filename("fr.json"), Some(code("fr")));
    assert_eq!(LanguageResolver::detect_from_filename("pt_BR.json"), Some(code("pt-BR")));
    assert_eq!(LanguageResolver::detect_from_filename("home_fr.json"), Some(code("fr")));
    assert_eq!(LanguageResolver::detect_from_filename("home.en-US.json"), Some(code("en-US")));
    assert_eq!(LanguageResolver::detect_from_filename("de-home.json"), Some(code("de")));
    assert_eq!(LanguageResolver::detect_from_filename("home.json"), None);
}

/// Test metadata detection at the top level and inside metadata blocks
#[test]
fn test_detectFromMetadata_withDeclaredFields_shouldDetect() {
    assert_eq!(LanguageResolver::detect_from_metadata(&json!({ "language": "es" })), Some(code("es")));
    assert_eq!(
        LanguageResolver::detect_from_metadata(&json!({ "language": "en", "locale": "en_GB" })),
        Some(code("en-GB"))
    );
    assert_eq!(
        LanguageResolver::detect_from_metadata(&json!({ "@metadata": { "locale": "nl" }, "x": "y" })),
        Some(code("nl"))
    );
    assert_eq!(
        LanguageResolver::detect_from_metadata(&json!({ "meta": { "language": "it-IT" } })),
        Some(code("it-IT"))
    );
    assert_eq!(LanguageResolver::detect_from_metadata(&json!({ "language": 3 })), None);
    assert_eq!(LanguageResolver::detect_from_metadata(&json!(["en"])), None);
}

/// Test that a more specific path code beats a bare filename code
#[test]
fn test_resolveForDocument_withRegionalPathAndBareFilename_shouldPickPath() {
    let doc = common::document_at("en-GB/home_fr.json", json!({}));
    let detection = LanguageResolver::resolve_for_document(&doc).unwrap();
    assert_eq!(detection.code, code("en-GB"));
    assert_eq!(detection.origin, DetectionOrigin::Path);
}

/// Test that a more specific filename code beats a bare path code
#[test]
fn test_resolveForDocument_withBarePathAndRegionalFilename_shouldPickFilename() {
    let doc = common::document_at("en/home_fr-CA.json", json!({}));
    let detection = LanguageResolver::resolve_for_document(&doc).unwrap();
    assert_eq!(detection.code, code("fr-CA"));
    assert_eq!(detection.origin, DetectionOrigin::Filename);
}

/// Test tie-breaking on equal specificity: path > filename > metadata
#[test]
fn test_resolveForDocument_withEqualSpecificity_shouldFollowSourcePriority() {
    let doc = common::document_at("de/home_fr.json", json!({ "language": "es" }));
    assert_eq!(LanguageResolver::resolve_for_document(&doc).unwrap().code, code("de"));

    let doc = Document::new("home_fr.json", json!({ "language": "es" }));
    assert_eq!(LanguageResolver::resolve_for_document(&doc).unwrap().code, code("fr"));

    let doc = Document::new("home.json", json!({ "language": "es" }));
    let detection = LanguageResolver::resolve_for_document(&doc).unwrap();
    assert_eq!(detection.code, code("es"));
    assert_eq!(detection.origin, DetectionOrigin::Metadata);
}

/// Test that agreeing sources are reported as multiple
#[test]
fn test_resolveForDocument_withAgreeingSources_shouldReportMultiple() {
    let doc = common::document_at("fr/fr.json", json!({ "language": "fr" }));
    let detection = LanguageResolver::resolve_for_document(&doc).unwrap();
    assert_eq!(detection.code, code("fr"));
    assert_eq!(detection.origin, DetectionOrigin::Multiple);
}

/// Test that an undetectable document yields nothing
#[test]
fn test_resolveForDocument_withoutAnyMarker_shouldReturnNone() {
    let doc = common::document_at("misc/home.json", json!({ "title": "Home" }));
    assert!(LanguageResolver::resolve_for_document(&doc).is_none());
}

/// Test base identifier derivation for common layouts
#[test]
fn test_stripLanguageMarkers_withCommonLayouts_shouldShareBase() {
    assert_eq!(LanguageResolver::strip_language_markers("en/home.json"), "home");
    assert_eq!(LanguageResolver::strip_language_markers("fr/home.json"), "home");
    assert_eq!(LanguageResolver::strip_language_markers("app/home_fr.json"), "app/home");
    assert_eq!(LanguageResolver::strip_language_markers("app/home.en-GB.json"), "app/home");
    assert_eq!(LanguageResolver::strip_language_markers("app/de_home.json"), "app/home");
    assert_eq!(LanguageResolver::strip_language_markers("app\\fr\\home.json"), "app/home");
}

/// Test that stripping is idempotent
#[test]
fn test_stripLanguageMarkers_appliedTwice_shouldBeStable() {
    let identifiers = [
        "en/home.json",
        "locales/fr-CA/home_fr.json",
        "home.en.fr.json",
        "app/en_fr.json",
        "x/y.json.json",
        "fr.json",
        "plain",
    ];
    for identifier in identifiers {
        let once = LanguageResolver::strip_language_markers(identifier);
        assert_eq!(LanguageResolver::strip_language_markers(&once), once, "identifier: {}", identifier);
    }
}

/// Test pairing of one source with several targets
#[test]
fn test_resolvePairs_withEnglishSource_shouldPairEveryOtherLanguage() {
    let documents = vec![
        common::document_at("fr/home.json", json!({ "t": "Bonjour" })),
        common::document_at("en/home.json", json!({ "t": "Hello" })),
        common::document_at("de/home.json", json!({ "t": "Hallo" })),
    ];

    let outcome = LanguageResolver::resolve_pairs(&documents, None);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.pairs.len(), 2);
    for pair in &outcome.pairs {
        assert_eq!(pair.source_language, code("en"));
        assert_eq!(pair.source.identifier(), "en/home.json");
        assert_eq!(pair.base_identifier, "home");
    }
    let targets: Vec<&str> = outcome.pairs.iter().map(|p| p.target_language.as_str()).collect();
    assert_eq!(targets, vec!["fr", "de"]);
}

/// Test that regional variants of the source language are never targets
#[test]
fn test_resolvePairs_withRegionalVariantsOfSource_shouldSkipThem() {
    let documents = vec![
        common::document_at("en-GB/home.json", json!({ "t": "Colour" })),
        common::document_at("en-US/home.json", json!({ "t": "Color" })),
        common::document_at("fr/home.json", json!({ "t": "Couleur" })),
    ];

    let outcome = LanguageResolver::resolve_pairs(&documents, None);
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].source_language, code("en-GB"));
    assert_eq!(outcome.pairs[0].target_language, code("fr"));
}

/// Test the preferred source language option
#[test]
fn test_resolvePairs_withPreferredSource_shouldUseIt() {
    let documents = vec![
        common::document_at("en/home.json", json!({ "t": "Hello" })),
        common::document_at("fr-FR/home.json", json!({ "t": "Bonjour" })),
    ];

    let preferred = code("fr");
    let outcome = LanguageResolver::resolve_pairs(&documents, Some(&preferred));
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.pairs[0].source_language, code("fr-FR"));
    assert_eq!(outcome.pairs[0].target_language, code("en"));
}

/// Test groups without a usable source or target
#[test]
fn test_resolvePairs_withIncompleteGroups_shouldReportDiagnostics() {
    let documents = vec![
        common::document_at("fr/about.json", json!({ "t": "À propos" })),
        common::document_at("en/faq.json", json!({ "t": "FAQ" })),
        common::document_at("misc/readme.json", json!({ "t": "?" })),
    ];

    let outcome = LanguageResolver::resolve_pairs(&documents, None);
    assert!(outcome.pairs.is_empty());
    assert_eq!(
        outcome.diagnostics,
        vec![
            Diagnostic::UndetectedLanguage { document: "misc/readme.json".to_string() },
            Diagnostic::NoLanguagePair { base_identifier: "about".to_string() },
            Diagnostic::NoTargetDocument {
                source_document: "en/faq.json".to_string(),
                language: "en".to_string(),
            },
        ]
    );
}

/// Test language names and loose code matching
#[test]
fn test_getLanguageName_withValidCodes_shouldReturnEnglishName() -> Result<()> {
    assert_eq!(get_language_name("fr")?, "French");
    assert_eq!(get_language_name("pt-BR")?, "Portuguese");
    assert!(get_language_name("zz").is_err());
    assert!(get_language_name("english").is_err());
    Ok(())
}

/// Test region-insensitive matching
#[test]
fn test_languageCodesMatch_shouldIgnoreRegion() {
    assert!(language_codes_match("en", "en-GB"));
    assert!(language_codes_match("FR_ca", "fr"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "eng"));
}

/// Test that a two-letter name in front of a code is not read as a region
#[test]
fn test_detectFromFilename_withTwoLetterBaseName_shouldUseSuffixCode() {
    assert_eq!(LanguageResolver::detect_from_filename("ui_en.json"), Some(code("en")));
    assert_eq!(LanguageResolver::detect_from_filename("ui_fr.json"), Some(code("fr")));
    assert_eq!(LanguageResolver::detect_from_filename("main_ui_en.json"), Some(code("en")));
    assert_eq!(LanguageResolver::detect_from_filename("en_GB.json"), Some(code("en-GB")));
    assert_eq!(LanguageResolver::strip_language_markers("ui_en.json"), "ui");
    assert_eq!(LanguageResolver::strip_language_markers("app/main_ui_fr.json"), "app/main_ui");
}

/// Test that `ui_en.json` and `ui_fr.json` form their own group
#[test]
fn test_resolvePairs_withTwoLetterBaseNames_shouldPairThem() {
    let documents = vec![
        Document::new("ui_en.json", json!({ "a": "Open" })),
        Document::new("ui_fr.json", json!({ "a": "Ouvrir" })),
        Document::new("en.json", json!({ "b": "Close" })),
        Document::new("fr.json", json!({ "b": "Fermer" })),
    ];

    let outcome = LanguageResolver::resolve_pairs(&documents, None);
    assert!(outcome.diagnostics.is_empty());
    let pairs: Vec<(&str, &str, &str)> = outcome
        .pairs
        .iter()
        .map(|p| (p.base_identifier.as_str(), p.source.name.as_str(), p.target.name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("ui", "ui_en.json", "ui_fr.json"), ("", "en.json", "fr.json")]);
}
