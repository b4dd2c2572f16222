/*!
 * Sentence-level segmentation of localization strings.
 *
 * The segmenter is heuristic: it protects decimals and common abbreviations,
 * forces boundaries before list items, then splits after sentence-ending
 * punctuation. Source and target strings go through the same steps so their
 * segment counts can be compared.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Stands in for a dot between two digits, or for an enumerator dot
const DOT_SENTINEL: char = '\u{E002}';

/// Forced segment boundary
const BOUNDARY_SENTINEL: char = '\u{E003}';

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

const BULLET_GLYPHS: &[char] = &['•', '*', '-', '–', '—'];

/// Characters that may trail a terminator and still belong to the sentence
const CLOSING_CHARS: &[char] = &['"', '\'', '”', '’', '»', '›', ')', ']', '}'];

/// Characters removed outright during normalization
const INVISIBLE_CHARS: &[char] = &[
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // zero width no-break space / BOM
    '\u{FFFC}', // object replacement character
];

/// Characters turned into an ordinary space during normalization
const SPACE_LIKE_CHARS: &[char] = &['\u{00A0}', '\u{202F}', '\u{2007}'];

static HORIZONTAL_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\S\n]+").expect("Invalid horizontal whitespace regex")
});

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" ?\n[\n ]*").expect("Invalid line break regex")
});

static ABBREVIATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    let abbreviations = [
        // Titles
        "Mr", "Mrs", "Ms", "Dr", "Prof", "Sr", "Jr", "St", "Mt", "Rev", "Hon", "Gen", "Col",
        "Capt", "Lt", "Sgt",
        // Latin and general
        "etc", r"i\.e", r"e\.g", "vs", "cf", "approx", "Inc", "Ltd", "Corp", "Co", "No", "Fig",
        // Countries and time
        r"U\.S", r"U\.K", r"E\.U", r"U\.N", r"a\.m", r"p\.m", r"A\.M", r"P\.M",
    ];
    Regex::new(&format!(r"\b(?:{})\.", abbreviations.join("|")))
        .expect("Invalid abbreviation regex")
});

static LIST_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|\n)[ \t]*(\d+[.\x{E002}]|[•*\-–—])([ \t]+)").expect("Invalid list marker regex")
});

static COLON_LIST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":(\s+)(\x{E003}?)(\d+[.\x{E002}]|[•*\-–—])(\s)").expect("Invalid colon list regex")
});

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x{E000}(\d+)\x{E001}").expect("Invalid placeholder regex")
});

/// Whitespace and invisible-character cleanup applied before segmentation
pub struct TextNormalizer;

impl TextNormalizer {
    /// Remove invisible characters, turn no-break spaces into spaces, collapse
    /// horizontal whitespace to one space and line-break runs to one `\n`,
    /// then trim.
    pub fn normalize(text: &str) -> String {
        let cleaned: String = text
            .chars()
            .filter(|c| !INVISIBLE_CHARS.contains(c))
            .map(|c| match c {
                '\r' => '\n',
                c if SPACE_LIKE_CHARS.contains(&c) => ' ',
                c => c,
            })
            .collect();

        let collapsed = HORIZONTAL_SPACE_REGEX.replace_all(&cleaned, " ");
        let collapsed = LINE_BREAK_REGEX.replace_all(&collapsed, "\n");
        collapsed.trim().to_string()
    }
}

/// Heuristic sentence splitter
pub struct Segmenter;

impl Segmenter {
    /// Split `text` into sentence-like segments.
    ///
    /// Never returns an empty vector: text without boundaries comes back as
    /// one normalized segment, and text that normalizes to nothing comes back
    /// unchanged.
    pub fn segment(text: &str) -> Vec<String> {
        let normalized = TextNormalizer::normalize(text);
        if normalized.is_empty() {
            return vec![text.to_string()];
        }

        let protected = Self::protect_decimals(&normalized);
        let (protected, originals) = Self::protect_abbreviations(&protected);
        let marked = Self::mark_list_items(&protected);
        let marked = Self::mark_colon_lists(&marked);

        let segments: Vec<String> = marked
            .split(BOUNDARY_SENTINEL)
            .flat_map(Self::split_sentences)
            .map(|segment| Self::restore(&segment, &originals))
            .map(|segment| Self::clean_segment(&segment))
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            return vec![normalized];
        }

        segments
    }

    /// Number of segments `text` splits into.
    pub fn count(text: &str) -> usize {
        Self::segment(text).len()
    }

    // A dot with a digit on both sides is never a terminator
    fn protect_decimals(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());

        for (i, &c) in chars.iter().enumerate() {
            let between_digits = c == '.'
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            out.push(if between_digits { DOT_SENTINEL } else { c });
        }

        out
    }

    fn protect_abbreviations(text: &str) -> (String, Vec<String>) {
        let mut originals = Vec::new();
        let replaced = ABBREVIATION_REGEX.replace_all(text, |caps: &Captures| {
            originals.push(caps[0].to_string());
            format!("{}{}{}", PLACEHOLDER_OPEN, originals.len() - 1, PLACEHOLDER_CLOSE)
        });
        (replaced.into_owned(), originals)
    }

    fn mark_list_items(text: &str) -> String {
        LIST_MARKER_REGEX
            .replace_all(text, |caps: &Captures| {
                format!(
                    "{}{}{}{}",
                    &caps[1],
                    BOUNDARY_SENTINEL,
                    Self::protect_enumerator(&caps[2]),
                    &caps[3]
                )
            })
            .into_owned()
    }

    fn mark_colon_lists(text: &str) -> String {
        COLON_LIST_REGEX
            .replace_all(text, |caps: &Captures| {
                format!(
                    ":{}{}{}{}",
                    BOUNDARY_SENTINEL,
                    &caps[1],
                    Self::protect_enumerator(&caps[3]),
                    &caps[4]
                )
            })
            .into_owned()
    }

    fn protect_enumerator(marker: &str) -> String {
        marker.replace('.', &DOT_SENTINEL.to_string())
    }

    /// Split after `…`, `...` and `. ! ?` when followed by whitespace, end of
    /// text, an opening tag or closing punctuation.
    fn split_sentences(chunk: &str) -> Vec<String> {
        let chars: Vec<char> = chunk.chars().collect();
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            current.push(c);
            i += 1;

            if !Self::is_terminator(c) {
                continue;
            }

            while i < chars.len() && Self::is_terminator(chars[i]) {
                current.push(chars[i]);
                i += 1;
            }

            let mut end = i;
            while end < chars.len() && CLOSING_CHARS.contains(&chars[end]) {
                end += 1;
            }
            let absorbed_closer = end > i;

            let boundary = match chars.get(end) {
                None => true,
                Some(next) if next.is_whitespace() => true,
                Some('<') => chars.get(end + 1).is_some_and(|n| n.is_ascii_alphabetic()),
                Some(_) => absorbed_closer,
            };

            if boundary {
                current.extend(&chars[i..end]);
                i = end;
                segments.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }

    fn is_terminator(c: char) -> bool {
        matches!(c, '.' | '!' | '?' | '…')
    }

    fn restore(segment: &str, originals: &[String]) -> String {
        let restored = PLACEHOLDER_REGEX.replace_all(segment, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| originals.get(index).cloned())
                .unwrap_or_else(|| caps[0].to_string())
        });
        restored.replace(DOT_SENTINEL, ".")
    }

    fn clean_segment(segment: &str) -> String {
        let flattened = segment.replace('\n', " ");
        let trimmed = flattened.trim();

        let without_bullet = match trimmed.chars().next() {
            Some(first) if BULLET_GLYPHS.contains(&first) => {
                let rest = &trimmed[first.len_utf8()..];
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    rest.trim_start()
                } else {
                    trimmed
                }
            }
            _ => trimmed,
        };

        without_bullet.to_string()
    }
}
