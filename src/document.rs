/*!
 * Core data model for bilingual alignment.
 *
 * Documents are read once and never mutated. Pairing produces
 * `LanguagePair`s that borrow the documents, and alignment produces
 * owned `AlignedRecord`s which are the only input to TMX serialization.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::language_utils::LanguageCode;

/// A named localization file with its parsed content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// File name, e.g. `home_fr.json`
    pub name: String,

    /// Storage path relative to the input root, e.g. `locales/fr/home.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Nested string/number/array/object values
    pub content: Value,
}

impl Document {
    /// Create a document without a storage path.
    pub fn new(name: impl Into<String>, content: Value) -> Self {
        Self {
            name: name.into(),
            path: None,
            content,
        }
    }

    /// Set the storage path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Identifier used for grouping and diagnostics: the storage path when
    /// known, the name otherwise.
    pub fn identifier(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

/// A resolved source/target pairing of two documents.
#[derive(Debug, Clone)]
pub struct LanguagePair<'a> {
    pub source_language: LanguageCode,
    pub target_language: LanguageCode,
    pub source: &'a Document,
    pub target: &'a Document,
    /// Language-stripped identifier shared by both documents
    pub base_identifier: String,
}

/// One matched source/target string, optionally a single sentence of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub source_text: String,
    pub target_text: String,
    pub key_path: String,
    pub source_document: String,

    /// Zero-based sentence index when the value was split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_index: Option<usize>,

    /// Number of sentences produced on each side when the value was split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<usize>,
}

impl AlignedRecord {
    /// Create an unsegmented record.
    pub fn new(
        key_path: impl Into<String>,
        source_text: impl Into<String>,
        target_text: impl Into<String>,
        source_document: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            target_text: target_text.into(),
            key_path: key_path.into(),
            source_document: source_document.into(),
            segment_index: None,
            total_segments: None,
        }
    }

    /// Mark the record as sentence `index` of `total`.
    pub fn with_segment(mut self, index: usize, total: usize) -> Self {
        self.segment_index = Some(index);
        self.total_segments = Some(total);
        self
    }

    /// Whether this record is one slice of a split value.
    pub fn is_segment(&self) -> bool {
        self.segment_index.is_some()
    }
}
