use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Config;
use crate::document::{AlignedRecord, Document};
use crate::errors::{Diagnostic, Severity};
use crate::file_utils::FileManager;
use crate::language_utils::{LanguageCode, LanguageResolver};
use crate::memory::{Aligner, TmxWriter, suggested_file_name};
use crate::text::InlineTagConverter;

// @module: Application controller for bilingual alignment

static SEG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<seg>(.*?)</seg>").expect("Invalid seg regex")
});

/// One serialized translation memory ready to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFile {
    /// Suggested file name
    pub file_name: String,
    pub source_language: LanguageCode,
    pub target_language: LanguageCode,
    pub record_count: usize,
    /// TMX document text
    pub content: String,
}

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub files: Vec<MemoryFile>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunOutput {
    /// Number of diagnostics with error severity
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Error)
            .count()
    }
}

/// Records gathered for one output file before serialization
struct PendingMemory {
    name_prefix: String,
    source_language: LanguageCode,
    target_language: LanguageCode,
    records: Vec<AlignedRecord>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: TMX writer built from the config
    writer: TmxWriter,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let writer = TmxWriter::new()
            .with_creation_tool(config.output.creation_tool.clone())
            .with_max_entity_passes(config.alignment.max_entity_passes);

        Ok(Self { config, writer })
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pair, align and serialize `documents`.
    ///
    /// Never fails: documents and groups that cannot be processed are
    /// skipped and reported in `RunOutput::diagnostics`.
    pub fn run(&self, documents: &[Document]) -> RunOutput {
        let mut output = RunOutput::default();

        if documents.is_empty() {
            error!("No source documents were provided");
            output.diagnostics.push(Diagnostic::NoSourceDocuments);
            return output;
        }

        let preferred = self.config.alignment.preferred_source();
        let pairing = LanguageResolver::resolve_pairs(documents, preferred.as_ref());
        output.diagnostics.extend(pairing.diagnostics);
        info!("Resolved {} language pair(s) from {} document(s)", pairing.pairs.len(), documents.len());

        let mut pending: Vec<PendingMemory> = Vec::new();

        for pair in &pairing.pairs {
            let alignment = match Aligner::align(pair.source, pair.target, self.config.alignment.segmentation) {
                Ok(alignment) => alignment,
                Err(e) => {
                    error!("Skipping {} -> {}: {}", pair.source.identifier(), pair.target.identifier(), e);
                    output.diagnostics.push(Diagnostic::malformed(e.document(), &e));
                    continue;
                }
            };

            if !alignment.missing_keys.is_empty() {
                warn!(
                    "{} key(s) missing in {}",
                    alignment.missing_keys.len(),
                    pair.target.identifier()
                );
            }
            output.diagnostics.extend(alignment.diagnostics);

            let combined = self.config.alignment.combine_by_target_language.then(|| {
                pending.iter_mut().find(|p| {
                    p.source_language == pair.source_language && p.target_language == pair.target_language
                })
            });

            match combined.flatten() {
                Some(existing) => existing.records.extend(alignment.records),
                None => pending.push(PendingMemory {
                    name_prefix: self.name_prefix(&pair.base_identifier),
                    source_language: pair.source_language.clone(),
                    target_language: pair.target_language.clone(),
                    records: alignment.records,
                }),
            }
        }

        let mut used_names = HashSet::new();
        for memory in pending {
            let content = self.writer.serialize(&memory.records, &memory.source_language, &memory.target_language);
            let file_name = self.unique_file_name(&memory, &mut used_names);
            debug!("{}: {} record(s)", file_name, memory.records.len());

            output.files.push(MemoryFile {
                file_name,
                source_language: memory.source_language,
                target_language: memory.target_language,
                record_count: memory.records.len(),
                content,
            });
        }

        output
    }

    /// Load every JSON document under `input_dir`, run the alignment and
    /// write the resulting files into `output_dir`.
    pub fn run_folder(&self, input_dir: &Path, output_dir: &Path, force_overwrite: bool) -> Result<RunOutput> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let (documents, load_diagnostics) = FileManager::load_documents(input_dir)?;
        info!("Loaded {} document(s) from {:?}", documents.len(), input_dir);

        let mut output = self.run(&documents);
        output.diagnostics.splice(0..0, load_diagnostics);

        FileManager::ensure_dir(output_dir)?;
        for file in &output.files {
            let path = output_dir.join(&file.file_name);
            if path.exists() && !force_overwrite {
                warn!("Skipping {:?}, file already exists (use -f to force overwrite)", path);
                continue;
            }
            FileManager::write_to_file(&path, &file.content)?;
            info!("Wrote {} record(s) to {:?}", file.record_count, path);
        }

        Ok(output)
    }

    /// Source and target text of the first `limit` units, alternating, in
    /// `{1}…{/1}` notation
    pub fn preview(&self, file: &MemoryFile, limit: usize) -> Vec<String> {
        SEG_REGEX
            .captures_iter(&file.content)
            .take(limit * 2)
            .map(|caps| InlineTagConverter::to_display_notation(&caps[1]))
            .collect()
    }

    // Combined output uses the bare prefix; otherwise the whole base
    // identifier is appended with `/` turned into `_`
    fn name_prefix(&self, base_identifier: &str) -> String {
        let prefix = &self.config.output.file_prefix;
        if self.config.alignment.combine_by_target_language {
            return prefix.clone();
        }

        let group = base_identifier
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment
                    .chars()
                    .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("_");

        if group.is_empty() {
            prefix.clone()
        } else {
            format!("{}_{}", prefix, group)
        }
    }

    // Groups whose sanitized names still collide get a numeric suffix
    fn unique_file_name(&self, memory: &PendingMemory, used_names: &mut HashSet<String>) -> String {
        let extension = &self.config.output.extension;
        let mut file_name = suggested_file_name(
            &memory.name_prefix,
            &memory.source_language,
            &memory.target_language,
            extension,
        );

        let mut counter = 2;
        while used_names.contains(&file_name) {
            warn!("File name {} is already used in this run, adding suffix {}", file_name, counter);
            file_name = suggested_file_name(
                &format!("{}_{}", memory.name_prefix, counter),
                &memory.source_language,
                &memory.target_language,
                extension,
            );
            counter += 1;
        }

        used_names.insert(file_name.clone());
        file_name
    }
}
