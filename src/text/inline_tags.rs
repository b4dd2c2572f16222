/*!
 * Conversion of embedded markup into TMX inline elements.
 *
 * Every tag found in a string is replaced by a `<bpt>`, `<ept>` or `<ph>`
 * element that carries the escaped original tag. Paired elements share an
 * `i` attribute so a CAT tool can keep the tag structure intact.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"</?([A-Za-z][A-Za-z0-9:_-]*)(?:\s+[^<>]*?)?\s*/?>"#).expect("Invalid tag regex")
});

static INLINE_ELEMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(bpt|ept|ph) (?:i|x)="\d+">[^<]*</(?:bpt|ept|ph)>"#)
        .expect("Invalid inline element regex")
});

static DISPLAY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(bpt|ept|ph) (?:i|x)="(\d+)">[^<]*</(?:bpt|ept|ph)>"#)
        .expect("Invalid display regex")
});

static PROTECTED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x{E010}(\d+)\x{E011}").expect("Invalid protected element regex")
});

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// How a tag occurrence is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Opening tag with a matching closer
    PairedOpen,
    /// Closing tag with a matching opener
    PairedClose,
    /// Self-closing, void, orphaned or unclosed tag
    Standalone,
}

/// One tag occurrence found in a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    pub start: usize,
    pub end: usize,
    pub name: String,
    pub kind: TagKind,
    pub id: usize,
}

/// Converter between raw markup and TMX inline elements
pub struct InlineTagConverter;

impl InlineTagConverter {
    /// Scan `text` for tags and classify each one.
    pub fn scan(text: &str) -> Vec<TagMatch> {
        let mut matches: Vec<TagMatch> = Vec::new();
        // (tag name, index into `matches`)
        let mut open_stack: Vec<(String, usize)> = Vec::new();
        let mut next_id = 1;

        for caps in TAG_REGEX.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let tag = whole.as_str();
            let name = caps[1].to_ascii_lowercase();

            let mut tag_match = TagMatch {
                start: whole.start(),
                end: whole.end(),
                name: name.clone(),
                kind: TagKind::Standalone,
                id: 0,
            };

            if tag.ends_with("/>") {
                tag_match.id = next_id;
                next_id += 1;
            } else if tag.starts_with("</") {
                // Most recently opened tag with the same name, wherever it sits
                match open_stack.iter().rposition(|(open_name, _)| *open_name == name) {
                    Some(position) => {
                        let (_, opener) = open_stack.remove(position);
                        tag_match.kind = TagKind::PairedClose;
                        tag_match.id = matches[opener].id;
                    }
                    None => {
                        tag_match.id = next_id;
                        next_id += 1;
                    }
                }
            } else if VOID_ELEMENTS.contains(&name.as_str()) {
                tag_match.id = next_id;
                next_id += 1;
            } else {
                tag_match.kind = TagKind::PairedOpen;
                tag_match.id = next_id;
                next_id += 1;
                open_stack.push((name, matches.len()));
            }

            matches.push(tag_match);
        }

        // Openers that never saw a closer
        for (_, index) in open_stack {
            matches[index].kind = TagKind::Standalone;
        }

        matches
    }

    /// Replace every tag in `text` with its TMX inline element.
    pub fn to_inline(text: &str) -> String {
        let matches = Self::scan(text);
        if matches.is_empty() {
            return text.to_string();
        }

        let mut result = text.to_string();
        for tag in matches.iter().rev() {
            let original = escape_xml(&text[tag.start..tag.end]);
            let element = match tag.kind {
                TagKind::PairedOpen => format!(r#"<bpt i="{}">{}</bpt>"#, tag.id, original),
                TagKind::PairedClose => format!(r#"<ept i="{}">{}</ept>"#, tag.id, original),
                TagKind::Standalone => format!(r#"<ph x="{}">{}</ph>"#, tag.id, original),
            };
            result.replace_range(tag.start..tag.end, &element);
        }

        result
    }

    /// Escape markup-reserved characters everywhere except inside inline
    /// elements produced by `to_inline`, which are kept verbatim.
    pub fn escape_keeping_inline(text: &str) -> String {
        let mut elements: Vec<String> = Vec::new();
        let protected = INLINE_ELEMENT_REGEX.replace_all(text, |caps: &Captures| {
            elements.push(caps[0].to_string());
            format!("\u{E010}{}\u{E011}", elements.len() - 1)
        });

        let escaped = escape_xml(&protected);
        if elements.is_empty() {
            return escaped;
        }

        PROTECTED_REGEX
            .replace_all(&escaped, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| elements.get(index).cloned())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Render inline elements as `{1}…{/1}` / `{2}` for previews.
    pub fn to_display_notation(text: &str) -> String {
        DISPLAY_REGEX
            .replace_all(text, |caps: &Captures| match &caps[1] {
                "ept" => format!("{{/{}}}", &caps[2]),
                _ => format!("{{{}}}", &caps[2]),
            })
            .into_owned()
    }
}

/// Escape the five XML-reserved characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
