use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::errors::{Diagnostic, DocumentError};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Parse one JSON file into a `Document`.
    ///
    /// `relative_path` becomes the document's storage path, with `/` separators.
    pub fn load_document(file: &Path, relative_path: &Path) -> Result<Document, DocumentError> {
        let storage_path = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| storage_path.clone());

        let text = fs::read_to_string(file).map_err(|e| DocumentError::Io {
            path: storage_path.clone(),
            message: e.to_string(),
        })?;

        let content = serde_json::from_str(text.trim_start_matches('\u{FEFF}'))
            .map_err(|e| DocumentError::InvalidJson {
                name: storage_path.clone(),
                message: e.to_string(),
            })?;

        Ok(Document::new(name, content).with_path(storage_path))
    }

    /// Load every `*.json` file under `dir`.
    ///
    /// Files that cannot be read or parsed are skipped and reported as
    /// diagnostics; only a failure to walk the directory is an error.
    pub fn load_documents<P: AsRef<Path>>(dir: P) -> Result<(Vec<Document>, Vec<Diagnostic>)> {
        let dir = dir.as_ref();
        let files = Self::find_files(dir, "json")
            .with_context(|| format!("Failed to scan directory: {:?}", dir))?;

        let mut documents = Vec::with_capacity(files.len());
        let mut diagnostics = Vec::new();

        for file in files {
            let relative = file.strip_prefix(dir).unwrap_or(&file);
            match Self::load_document(&file, relative) {
                Ok(document) => {
                    debug!("Loaded {}", document.identifier());
                    documents.push(document);
                }
                Err(e) => {
                    warn!("{}", e);
                    diagnostics.push(Diagnostic::malformed(&relative.to_string_lossy(), &e));
                }
            }
        }

        Ok((documents, diagnostics))
    }
}
