/*!
 * TMX 1.4 serialization of aligned records.
 *
 * Every text field is decoded, converted to inline elements and escaped
 * before it is embedded, so markup in the source strings survives as
 * `<bpt>/<ept>/<ph>` structure rather than as escaped noise.
 */

use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

use crate::document::AlignedRecord;
use crate::language_utils::LanguageCode;
use crate::text::{EntityDecoder, InlineTagConverter, escape_xml};

/// TMX format version written in the envelope
pub const TMX_VERSION: &str = "1.4";

/// Length of a translation unit id
pub const TU_ID_LENGTH: usize = 16;

/// Writer for TMX translation-memory documents
#[derive(Debug, Clone)]
pub struct TmxWriter {
    creation_tool: String,
    creation_tool_version: String,
    max_entity_passes: usize,
}

impl Default for TmxWriter {
    fn default() -> Self {
        Self {
            creation_tool: env!("CARGO_PKG_NAME").to_string(),
            creation_tool_version: env!("CARGO_PKG_VERSION").to_string(),
            max_entity_passes: EntityDecoder::DEFAULT_MAX_PASSES,
        }
    }
}

impl TmxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name written to the `creationtool` header attribute.
    pub fn with_creation_tool(mut self, name: impl Into<String>) -> Self {
        self.creation_tool = name.into();
        self
    }

    /// Pass limit handed to the entity decoder.
    pub fn with_max_entity_passes(mut self, passes: usize) -> Self {
        self.max_entity_passes = passes;
        self
    }

    /// Render `records` as a complete TMX document.
    pub fn serialize(
        &self,
        records: &[AlignedRecord],
        source_language: &LanguageCode,
        target_language: &LanguageCode,
    ) -> String {
        let mut out = String::with_capacity(256 + records.len() * 320);

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(out, "<tmx version=\"{}\">", TMX_VERSION);
        let _ = writeln!(
            out,
            "  <header creationtool=\"{}\" creationtoolversion=\"{}\" segtype=\"sentence\" o-tmf=\"json\" adminlang=\"en\" srclang=\"{}\" datatype=\"plaintext\"/>",
            escape_xml(&self.creation_tool),
            escape_xml(&self.creation_tool_version),
            source_language
        );
        out.push_str("  <body>\n");

        for record in records {
            self.write_unit(&mut out, record, source_language, target_language);
        }

        out.push_str("  </body>\n");
        out.push_str("</tmx>\n");
        out
    }

    fn write_unit(
        &self,
        out: &mut String,
        record: &AlignedRecord,
        source_language: &LanguageCode,
        target_language: &LanguageCode,
    ) {
        let _ = writeln!(out, "    <tu tuid=\"{}\">", compute_id(record));
        let _ = writeln!(out, "      <note>{}</note>", self.prepare(&annotation(record)));
        let _ = writeln!(
            out,
            "      <tuv xml:lang=\"{}\"><seg>{}</seg></tuv>",
            source_language,
            self.prepare(&record.source_text)
        );
        let _ = writeln!(
            out,
            "      <tuv xml:lang=\"{}\"><seg>{}</seg></tuv>",
            target_language,
            self.prepare(&record.target_text)
        );
        out.push_str("    </tu>\n");
    }

    /// Decode references, convert tags to inline elements, escape the rest.
    pub fn prepare(&self, text: &str) -> String {
        let decoded = EntityDecoder::decode_with_max_passes(text, self.max_entity_passes);
        let inline = InlineTagConverter::to_inline(&decoded);
        InlineTagConverter::escape_keeping_inline(&inline)
    }
}

/// Note text for a record: key path, segment position and source file.
pub fn annotation(record: &AlignedRecord) -> String {
    let mut note = format!("Key: {}", record.key_path);
    if let (Some(index), Some(total)) = (record.segment_index, record.total_segments) {
        let _ = write!(note, " | Segment: {}/{}", index + 1, total);
    }
    let _ = write!(note, " | File: {}", record.source_document);
    note
}

/// Stable 16-character translation unit id derived from the key path,
/// segment index and source text.
pub fn compute_id(record: &AlignedRecord) -> String {
    let segment = record
        .segment_index
        .map(|index| index.to_string())
        .unwrap_or_default();
    let joined = format!("{}|{}|{}", record.key_path, segment, record.source_text);

    let digest = Sha256::digest(joined.as_bytes());
    STANDARD
        .encode(digest)
        .chars()
        .filter(|c| !matches!(c, '=' | '/' | '+'))
        .take(TU_ID_LENGTH)
        .collect()
}

/// Suggested file name: `<prefix>_<source>_<target>.<extension>`.
pub fn suggested_file_name(
    prefix: &str,
    source_language: &LanguageCode,
    target_language: &LanguageCode,
    extension: &str,
) -> String {
    format!("{}_{}_{}.{}", prefix, source_language, target_language, extension)
}
