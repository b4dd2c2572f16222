/*!
 * Error types for the tmxalign application.
 *
 * Hard failures use the thiserror enums below. Everything that the alignment
 * run survives (missing keys, unpaired documents, segmentation mismatches) is
 * reported as a `Diagnostic` value and returned alongside the results.
 */

use thiserror::Error;

/// Errors raised while turning a file into a `Document` or walking its content
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// The file is not valid JSON
    #[error("Invalid JSON in '{name}': {message}")]
    InvalidJson {
        /// Document identifier
        name: String,
        /// Parser message
        message: String,
    },

    /// The top-level value is neither an object nor an array
    #[error("Unsupported root value in '{name}': expected object or array, found {kind}")]
    UnsupportedRoot {
        /// Document identifier
        name: String,
        /// JSON kind of the root value
        kind: &'static str,
    },

    /// Content is nested deeper than the flattener accepts
    #[error("Content of '{name}' is nested deeper than {depth} levels")]
    NestingTooDeep {
        /// Document identifier
        name: String,
        /// Depth limit that was hit
        depth: usize,
    },

    /// The file could not be read
    #[error("Failed to read '{path}': {message}")]
    Io {
        /// File path
        path: String,
        /// OS error message
        message: String,
    },
}

impl DocumentError {
    /// Identifier of the document the error is about
    pub fn document(&self) -> &str {
        match self {
            Self::InvalidJson { name, .. }
            | Self::UnsupportedRoot { name, .. }
            | Self::NestingTooDeep { name, .. } => name,
            Self::Io { path, .. } => path,
        }
    }
}

/// Configuration problems detected by `Config::validate`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Preferred source language is not a usable language code
    #[error("Invalid preferred source language: {0}")]
    InvalidLanguage(String),

    /// Output file prefix is empty
    #[error("Output file prefix must not be empty")]
    EmptyPrefix,

    /// Output extension contains unsupported characters
    #[error("Invalid output extension: {0}")]
    InvalidExtension(String),

    /// Entity decoding needs at least one pass
    #[error("max_entity_passes must be at least 1")]
    NoEntityPasses,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document loading
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// How loudly a diagnostic should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Non-fatal findings collected during a run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A source document was resolved but nothing in its group can be its target
    #[error("No target document found for source '{source_document}' ({language})")]
    NoTargetDocument {
        source_document: String,
        language: String,
    },

    /// The target document has no string at this key path
    #[error("Missing key '{key_path}' in '{target_document}'")]
    MissingKey {
        key_path: String,
        target_document: String,
    },

    /// Source and target split into a different number of sentences
    #[error(
        "Segment count mismatch for '{key_path}' in '{source_document}': source {source_segments}, target {target_segments}"
    )]
    SegmentMismatch {
        key_path: String,
        source_document: String,
        source_segments: usize,
        target_segments: usize,
    },

    /// No source document could be chosen for a group of related documents
    #[error("No language pair could be resolved for '{base_identifier}'")]
    NoLanguagePair { base_identifier: String },

    /// A document could not be detected as any language
    #[error("Could not detect a language for '{document}'")]
    UndetectedLanguage { document: String },

    /// A document could not be read, parsed or flattened and was skipped
    #[error("Skipped '{document}': {message}")]
    MalformedContent { document: String, message: String },

    /// The run was started without any documents
    #[error("No source documents were provided")]
    NoSourceDocuments,
}

impl Diagnostic {
    /// Severity used for logging and for the CLI summary
    pub fn severity(&self) -> Severity {
        match self {
            Self::MalformedContent { .. } | Self::NoSourceDocuments => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Build a `MalformedContent` diagnostic from a document error
    pub fn malformed(document: &str, error: &DocumentError) -> Self {
        Self::MalformedContent {
            document: document.to_string(),
            message: error.to_string(),
        }
    }
}
