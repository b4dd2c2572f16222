use std::collections::HashMap;
use std::fmt;

use anyhow::{Result, anyhow};
use isolang::Language;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::document::{Document, LanguagePair};
use crate::errors::Diagnostic;

/// Language utilities for localization file pairing
///
/// This module detects `xx` / `xx-YY` language codes from storage paths,
/// file names and declared metadata, derives language-free base identifiers,
/// and groups documents into source/target pairs.

static CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{2})(?:[-_]([A-Za-z]{2}))?$").expect("Invalid language code regex")
});

static FILENAME_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[._-]([A-Za-z]{2})(?:[-_]([A-Za-z]{2}))?\.[A-Za-z0-9]+$")
        .expect("Invalid filename suffix regex")
});

static FILENAME_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{2})(?:[-_]([A-Za-z]{2}))?[._-]").expect("Invalid filename prefix regex")
});

static STEM_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[._-]([A-Za-z]{2})(?:[-_]([A-Za-z]{2}))?$").expect("Invalid stem suffix regex")
});

/// Extensions removed when deriving a base identifier
const KNOWN_EXTENSIONS: &[&str] = &[
    "json", "json5", "jsonc", "yaml", "yml", "arb", "js", "ts", "txt", "xml", "strings", "properties",
];

/// Metadata objects searched when the top level declares no language
const METADATA_BLOCKS: &[&str] = &["@metadata", "meta"];

/// A normalized `xx` or `xx-YY` language code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse `en`, `EN`, `en-gb`, `en_GB` and similar into a normalized code.
    pub fn parse(code: &str) -> Option<Self> {
        let caps = CODE_REGEX.captures(code.trim())?;
        let language = caps[1].to_ascii_lowercase();
        Some(match caps.get(2) {
            Some(region) => Self(format!("{}-{}", language, region.as_str().to_ascii_uppercase())),
            None => Self(language),
        })
    }

    /// Two-letter language part
    pub fn base(&self) -> &str {
        &self.0[..2]
    }

    /// Region part, if any
    pub fn region(&self) -> Option<&str> {
        self.0.get(3..)
    }

    /// Whether the language part is an ISO 639-1 code
    pub fn is_known_language(&self) -> bool {
        Language::from_639_1(self.base()).is_some()
    }

    pub fn is_regional(&self) -> bool {
        self.0.len() > 2
    }

    /// 2 for `xx-YY`, 1 for `xx`
    pub fn specificity(&self) -> u8 {
        if self.is_regional() { 2 } else { 1 }
    }

    /// Same language, ignoring region
    pub fn same_base(&self, other: &LanguageCode) -> bool {
        self.base() == other.base()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a detected language came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionOrigin {
    Path,
    Filename,
    Metadata,
    /// The winning code was reported by more than one source
    Multiple,
}

impl DetectionOrigin {
    // Lower wins on equal specificity
    fn priority(self) -> u8 {
        match self {
            Self::Path => 0,
            Self::Filename => 1,
            Self::Metadata => 2,
            Self::Multiple => 3,
        }
    }
}

/// A language code together with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub code: LanguageCode,
    pub origin: DetectionOrigin,
}

/// Source/target pairs plus everything that could not be paired
#[derive(Debug, Default)]
pub struct PairingOutcome<'a> {
    pub pairs: Vec<LanguagePair<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A whole path segment or stem read as a language marker
fn whole_marker(text: &str) -> Option<LanguageCode> {
    LanguageCode::parse(text).filter(LanguageCode::is_known_language)
}

/// `xx` or `xx-YY` from separately captured parts, known languages only
fn marker_code(language: &str, region: Option<&str>) -> Option<LanguageCode> {
    let code = match region {
        Some(region) => LanguageCode::parse(&format!("{}-{}", language, region)),
        None => LanguageCode::parse(language),
    };
    code.filter(LanguageCode::is_known_language)
}

/// Language detection and document pairing
pub struct LanguageResolver;

impl LanguageResolver {
    /// Detect a language from the directory segments of a storage path.
    ///
    /// Region-qualified segments win over bare ones; among equals the
    /// deepest segment wins.
    pub fn detect_from_path(path: &str) -> Option<LanguageCode> {
        let segments: Vec<&str> = path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
        let directories = segments.split_last().map(|(_, dirs)| dirs).unwrap_or_default();

        let codes: Vec<LanguageCode> = directories
            .iter()
            .rev()
            .filter_map(|segment| whole_marker(segment))
            .collect();

        codes
            .iter()
            .find(|code| code.is_regional())
            .or_else(|| codes.first())
            .cloned()
    }

    /// Detect a language from a file name: whole stem, then suffix
    /// (`home_fr.json`), then prefix (`fr_home.json`).
    pub fn detect_from_filename(name: &str) -> Option<LanguageCode> {
        let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let stem = file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(file_name);

        if let Some(code) = whole_marker(stem) {
            return Some(code);
        }

        // `ui_en.json`: `ui` is part of the name, `en` is the marker
        if let Some(caps) = FILENAME_SUFFIX_REGEX.captures(file_name) {
            let region = caps.get(2).map(|m| m.as_str());
            if let Some(code) = marker_code(&caps[1], region).or_else(|| region.and_then(whole_marker)) {
                return Some(code);
            }
        }

        FILENAME_PREFIX_REGEX.captures(file_name).and_then(|caps| {
            marker_code(&caps[1], caps.get(2).map(|m| m.as_str())).or_else(|| whole_marker(&caps[1]))
        })
    }

    /// Detect a language from `language` / `locale` fields declared in the
    /// content, at the top level or inside a metadata block.
    pub fn detect_from_metadata(content: &Value) -> Option<LanguageCode> {
        Self::declared_language(content).or_else(|| {
            METADATA_BLOCKS
                .iter()
                .filter_map(|block| content.get(*block))
                .find_map(Self::declared_language)
        })
    }

    fn declared_language(object: &Value) -> Option<LanguageCode> {
        let language = object.get("language").and_then(Value::as_str);
        let locale = object.get("locale").and_then(Value::as_str);

        let language_code = language.and_then(LanguageCode::parse);
        let locale_code = locale.and_then(LanguageCode::parse);

        match (language_code, locale_code) {
            (Some(lang), Some(loc)) => {
                if loc.is_regional() {
                    Some(loc)
                } else if lang.is_regional() {
                    Some(lang)
                } else if lang == loc {
                    Some(lang)
                } else {
                    // `language: en`, `locale: GB` reads as a region
                    LanguageCode::parse(&format!("{}-{}", lang.base(), loc.base()))
                }
            }
            (Some(code), None) | (None, Some(code)) => Some(code),
            (None, None) => None,
        }
    }

    /// Pick the most specific detection; ties go path > filename > metadata.
    pub fn resolve_for_document(document: &Document) -> Option<Detection> {
        let mut detections = Vec::with_capacity(3);
        if let Some(code) = document.path.as_deref().and_then(Self::detect_from_path) {
            detections.push(Detection { code, origin: DetectionOrigin::Path });
        }
        if let Some(code) = Self::detect_from_filename(&document.name) {
            detections.push(Detection { code, origin: DetectionOrigin::Filename });
        }
        if let Some(code) = Self::detect_from_metadata(&document.content) {
            detections.push(Detection { code, origin: DetectionOrigin::Metadata });
        }

        let winner = detections
            .iter()
            .min_by_key(|d| (std::cmp::Reverse(d.code.specificity()), d.origin.priority()))?
            .clone();

        let agreeing = detections.iter().filter(|d| d.code == winner.code).count();
        if agreeing > 1 {
            return Some(Detection { code: winner.code, origin: DetectionOrigin::Multiple });
        }

        Some(winner)
    }

    /// Remove language markers and the extension from a document identifier.
    ///
    /// Applied until nothing changes, so the result is a fixed point.
    pub fn strip_language_markers(identifier: &str) -> String {
        let mut current = identifier.replace('\\', "/");
        loop {
            let next = Self::strip_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn strip_once(identifier: &str) -> String {
        let mut segments: Vec<&str> = identifier.split('/').collect();
        let file_name = segments.pop().unwrap_or_default();

        let directories: Vec<&str> = segments
            .into_iter()
            .filter(|segment| whole_marker(segment).is_none())
            .collect();

        let stem = match file_name.rsplit_once('.') {
            Some((stem, extension))
                if KNOWN_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) =>
            {
                stem
            }
            _ => file_name,
        };

        let stem = if whole_marker(stem).is_some() {
            ""
        } else if let Some(end) = Self::suffix_marker_start(stem) {
            &stem[..end]
        } else if let Some(start) = Self::prefix_marker_end(stem) {
            &stem[start..]
        } else {
            stem
        };

        let mut parts = directories;
        parts.push(stem);
        parts.join("/")
    }

    // Byte offset where a trailing language marker begins, separator included
    fn suffix_marker_start(stem: &str) -> Option<usize> {
        let caps = STEM_SUFFIX_REGEX.captures(stem)?;
        let whole = caps.get(0)?;
        match caps.get(2) {
            Some(region) if marker_code(&caps[1], Some(region.as_str())).is_some() => Some(whole.start()),
            Some(region) => whole_marker(region.as_str()).map(|_| region.start() - 1),
            None => marker_code(&caps[1], None).map(|_| whole.start()),
        }
    }

    // Byte offset just past a leading language marker and its separator
    fn prefix_marker_end(stem: &str) -> Option<usize> {
        let caps = FILENAME_PREFIX_REGEX.captures(stem)?;
        let language = caps.get(1)?;
        match caps.get(2) {
            Some(region) if marker_code(language.as_str(), Some(region.as_str())).is_some() => {
                caps.get(0).map(|m| m.end())
            }
            _ => whole_marker(language.as_str()).map(|_| language.end() + 1),
        }
    }

    /// Group documents by base identifier and pair each group's source
    /// document with every document in a different language.
    pub fn resolve_pairs<'a>(
        documents: &'a [Document],
        preferred_source: Option<&LanguageCode>,
    ) -> PairingOutcome<'a> {
        let mut outcome = PairingOutcome::default();

        let mut group_order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<(&'a Document, Detection)>> = HashMap::new();

        for document in documents {
            let Some(detection) = Self::resolve_for_document(document) else {
                debug!("No language detected for {}", document.identifier());
                outcome.diagnostics.push(Diagnostic::UndetectedLanguage {
                    document: document.identifier().to_string(),
                });
                continue;
            };

            let base = Self::strip_language_markers(document.identifier());
            debug!(
                "{} -> {} ({:?}), base '{}'",
                document.identifier(),
                detection.code,
                detection.origin,
                base
            );

            if !groups.contains_key(&base) {
                group_order.push(base.clone());
            }
            groups.entry(base).or_default().push((document, detection));
        }

        for base in group_order {
            let Some(members) = groups.get(&base) else { continue };

            let Some(source_index) = Self::select_source(members, preferred_source) else {
                warn!("No source document for '{}'", base);
                outcome.diagnostics.push(Diagnostic::NoLanguagePair { base_identifier: base.clone() });
                continue;
            };

            let (source, source_detection) = (members[source_index].0, &members[source_index].1);
            let before = outcome.pairs.len();

            for (index, (target, target_detection)) in members.iter().enumerate() {
                if index == source_index || target_detection.code.same_base(&source_detection.code) {
                    continue;
                }
                let target = *target;
                outcome.pairs.push(LanguagePair {
                    source_language: source_detection.code.clone(),
                    target_language: target_detection.code.clone(),
                    source,
                    target,
                    base_identifier: base.clone(),
                });
            }

            if outcome.pairs.len() == before {
                warn!("No target document for '{}'", source.identifier());
                outcome.diagnostics.push(Diagnostic::NoTargetDocument {
                    source_document: source.identifier().to_string(),
                    language: source_detection.code.to_string(),
                });
            }
        }

        outcome
    }

    /// Source codes to try, in order: the preferred code, its regional
    /// variants, then its bare form.
    pub fn source_priority(
        preferred: Option<&LanguageCode>,
        available: &[LanguageCode],
    ) -> Vec<LanguageCode> {
        let preferred = preferred.cloned().unwrap_or_else(|| LanguageCode("en".to_string()));
        let bare = LanguageCode(preferred.base().to_string());

        let mut priority = vec![preferred.clone()];
        if bare.as_str() == "en" {
            priority.push(LanguageCode("en-GB".to_string()));
            priority.push(LanguageCode("en-US".to_string()));
        }
        for code in available {
            if code.is_regional() && code.same_base(&preferred) {
                priority.push(code.clone());
            }
        }
        priority.push(bare);

        let mut seen = Vec::with_capacity(priority.len());
        priority.retain(|code| {
            if seen.contains(code) {
                false
            } else {
                seen.push(code.clone());
                true
            }
        });
        priority
    }

    fn select_source(
        members: &[(&Document, Detection)],
        preferred: Option<&LanguageCode>,
    ) -> Option<usize> {
        let available: Vec<LanguageCode> = members.iter().map(|(_, d)| d.code.clone()).collect();
        Self::source_priority(preferred, &available)
            .iter()
            .find_map(|candidate| available.iter().position(|code| code == candidate))
    }
}

/// Get the English language name for a two-letter code, e.g. `fr-CA` -> `French`
pub fn get_language_name(code: &str) -> Result<String> {
    let parsed = LanguageCode::parse(code)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    let lang = Language::from_639_1(parsed.base())
        .ok_or_else(|| anyhow!("Unknown ISO 639-1 language: {}", parsed.base()))?;

    Ok(lang.to_name().to_string())
}

/// Check if two codes name the same language, ignoring region
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (LanguageCode::parse(code1), LanguageCode::parse(code2)) {
        (Some(a), Some(b)) => a.same_base(&b),
        _ => false,
    }
}
