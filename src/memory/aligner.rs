/*!
 * Key-path flattening and source/target alignment.
 *
 * Both documents are flattened to `key.path[0]` → string maps; the key path
 * is the only join key. With segmentation enabled, a multi-sentence value
 * is split into per-sentence records only when both sides produce the same
 * number of sentences.
 */

use std::collections::HashMap;

use log::{debug, trace};
use serde_json::Value;

use crate::document::{AlignedRecord, Document};
use crate::errors::{Diagnostic, DocumentError};
use crate::text::Segmenter;

/// Nesting depth accepted by `flatten`
pub const MAX_NESTING_DEPTH: usize = 128;

/// Ordered key path → string mapping of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatContent {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl FlatContent {
    fn insert(&mut self, key: String, value: String) {
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Look up the string stored at `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&position| self.entries[position].1.as_str())
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of aligning one source document with one target document
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    pub records: Vec<AlignedRecord>,
    /// Key paths present in the source but not in the target
    pub missing_keys: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Flattens documents and matches their values by key path
pub struct Aligner;

impl Aligner {
    /// Flatten nested content into key paths. Objects become `a.b`, arrays
    /// become `a[0]`; only string leaves are kept.
    pub fn flatten(name: &str, content: &Value) -> Result<FlatContent, DocumentError> {
        match content {
            Value::Object(_) | Value::Array(_) => {}
            other => {
                return Err(DocumentError::UnsupportedRoot {
                    name: name.to_string(),
                    kind: json_kind(other),
                });
            }
        }

        let mut flat = FlatContent::default();
        Self::walk(name, content, String::new(), 0, &mut flat)?;
        Ok(flat)
    }

    fn walk(
        name: &str,
        value: &Value,
        path: String,
        depth: usize,
        flat: &mut FlatContent,
    ) -> Result<(), DocumentError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DocumentError::NestingTooDeep {
                name: name.to_string(),
                depth: MAX_NESTING_DEPTH,
            });
        }

        match value {
            Value::String(text) => flat.insert(path, text.clone()),
            Value::Object(map) => {
                for (key, child) in map {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    Self::walk(name, child, child_path, depth + 1, flat)?;
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    Self::walk(name, child, format!("{}[{}]", path, i), depth + 1, flat)?;
                }
            }
            // Numbers, booleans and null carry nothing to translate
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }

        Ok(())
    }

    /// Match every source key path against the target.
    pub fn align(
        source: &Document,
        target: &Document,
        segmentation: bool,
    ) -> Result<Alignment, DocumentError> {
        let source_flat = Self::flatten(source.identifier(), &source.content)?;
        let target_flat = Self::flatten(target.identifier(), &target.content)?;
        let source_id = source.identifier();

        let mut alignment = Alignment::default();

        for (key, source_text) in source_flat.iter() {
            let target_text = match target_flat.get(key) {
                Some(text) => text,
                None => {
                    trace!("Missing key {} in {}", key, target.identifier());
                    alignment.missing_keys.push(key.to_string());
                    alignment.diagnostics.push(Diagnostic::MissingKey {
                        key_path: key.to_string(),
                        target_document: target.identifier().to_string(),
                    });
                    alignment
                        .records
                        .push(AlignedRecord::new(key, source_text, "", source_id));
                    continue;
                }
            };

            if !segmentation {
                alignment
                    .records
                    .push(AlignedRecord::new(key, source_text, target_text, source_id));
                continue;
            }

            let source_segments = Segmenter::segment(source_text);
            if source_segments.len() <= 1 {
                alignment
                    .records
                    .push(AlignedRecord::new(key, source_text, target_text, source_id));
                continue;
            }

            let target_segments = Segmenter::segment(target_text);
            if target_segments.len() != source_segments.len() {
                debug!(
                    "Segment mismatch at {}: {} vs {}",
                    key,
                    source_segments.len(),
                    target_segments.len()
                );
                alignment.diagnostics.push(Diagnostic::SegmentMismatch {
                    key_path: key.to_string(),
                    source_document: source_id.to_string(),
                    source_segments: source_segments.len(),
                    target_segments: target_segments.len(),
                });
                alignment
                    .records
                    .push(AlignedRecord::new(key, source_text, target_text, source_id));
                continue;
            }

            let total = source_segments.len();
            alignment.records.extend(
                source_segments
                    .into_iter()
                    .zip(target_segments)
                    .enumerate()
                    .map(|(index, (source_segment, target_segment))| {
                        AlignedRecord::new(key, source_segment, target_segment, source_id)
                            .with_segment(index, total)
                    }),
            );
        }

        debug!(
            "Aligned {} -> {}: {} records, {} missing keys",
            source_id,
            target.identifier(),
            alignment.records.len(),
            alignment.missing_keys.len()
        );

        Ok(alignment)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
