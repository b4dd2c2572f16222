/*!
 * Markup character reference decoding.
 *
 * Localization strings are often HTML-escaped once, sometimes twice
 * (`&amp;rsquo;`). The decoder applies the named, decimal and hexadecimal
 * rules repeatedly until the text stops changing.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NAMED_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("Invalid named reference regex")
});

static DECIMAL_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#([0-9]+);").expect("Invalid decimal reference regex")
});

static HEX_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#[xX]([0-9A-Fa-f]+);").expect("Invalid hex reference regex")
});

/// Named references that are decoded. Anything not listed is left as-is.
static NAMED_ENTITIES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    let entries: &[(&str, char)] = &[
        // Markup-reserved
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        // Latin accented letters
        ("Agrave", 'À'), ("Aacute", 'Á'), ("Acirc", 'Â'), ("Atilde", 'Ã'), ("Auml", 'Ä'),
        ("Aring", 'Å'), ("AElig", 'Æ'), ("Ccedil", 'Ç'), ("Egrave", 'È'), ("Eacute", 'É'),
        ("Ecirc", 'Ê'), ("Euml", 'Ë'), ("Igrave", 'Ì'), ("Iacute", 'Í'), ("Icirc", 'Î'),
        ("Iuml", 'Ï'), ("ETH", 'Ð'), ("Ntilde", 'Ñ'), ("Ograve", 'Ò'), ("Oacute", 'Ó'),
        ("Ocirc", 'Ô'), ("Otilde", 'Õ'), ("Ouml", 'Ö'), ("Oslash", 'Ø'), ("Ugrave", 'Ù'),
        ("Uacute", 'Ú'), ("Ucirc", 'Û'), ("Uuml", 'Ü'), ("Yacute", 'Ý'), ("THORN", 'Þ'),
        ("szlig", 'ß'), ("agrave", 'à'), ("aacute", 'á'), ("acirc", 'â'), ("atilde", 'ã'),
        ("auml", 'ä'), ("aring", 'å'), ("aelig", 'æ'), ("ccedil", 'ç'), ("egrave", 'è'),
        ("eacute", 'é'), ("ecirc", 'ê'), ("euml", 'ë'), ("igrave", 'ì'), ("iacute", 'í'),
        ("icirc", 'î'), ("iuml", 'ï'), ("eth", 'ð'), ("ntilde", 'ñ'), ("ograve", 'ò'),
        ("oacute", 'ó'), ("ocirc", 'ô'), ("otilde", 'õ'), ("ouml", 'ö'), ("oslash", 'ø'),
        ("ugrave", 'ù'), ("uacute", 'ú'), ("ucirc", 'û'), ("uuml", 'ü'), ("yacute", 'ý'),
        ("thorn", 'þ'), ("yuml", 'ÿ'), ("OElig", 'Œ'), ("oelig", 'œ'), ("Scaron", 'Š'),
        ("scaron", 'š'), ("Yuml", 'Ÿ'),
        // Quotation and punctuation
        ("lsquo", '\u{2018}'), ("rsquo", '\u{2019}'), ("sbquo", '\u{201A}'),
        ("ldquo", '\u{201C}'), ("rdquo", '\u{201D}'), ("bdquo", '\u{201E}'),
        ("laquo", '«'), ("raquo", '»'), ("lsaquo", '\u{2039}'), ("rsaquo", '\u{203A}'),
        ("ndash", '\u{2013}'), ("mdash", '\u{2014}'), ("hellip", '\u{2026}'),
        ("bull", '\u{2022}'), ("middot", '·'), ("nbsp", '\u{A0}'), ("shy", '\u{AD}'),
        ("iexcl", '¡'), ("iquest", '¿'), ("dagger", '\u{2020}'), ("Dagger", '\u{2021}'),
        ("permil", '\u{2030}'), ("prime", '\u{2032}'), ("Prime", '\u{2033}'),
        ("ensp", '\u{2002}'), ("emsp", '\u{2003}'), ("thinsp", '\u{2009}'),
        // Common symbols
        ("copy", '©'), ("reg", '®'), ("trade", '\u{2122}'), ("deg", '°'), ("plusmn", '±'),
        ("times", '×'), ("divide", '÷'), ("euro", '\u{20AC}'), ("pound", '£'), ("yen", '¥'),
        ("cent", '¢'), ("curren", '¤'), ("sect", '§'), ("para", '¶'), ("micro", 'µ'),
        ("frac14", '¼'), ("frac12", '½'), ("frac34", '¾'), ("sup1", '¹'), ("sup2", '²'),
        ("sup3", '³'), ("ordf", 'ª'), ("ordm", 'º'), ("not", '¬'), ("brvbar", '¦'),
        ("uml", '¨'), ("macr", '¯'), ("acute", '´'), ("cedil", '¸'),
        // Greek letters and math
        ("Alpha", 'Α'), ("Beta", 'Β'), ("Gamma", 'Γ'), ("Delta", 'Δ'), ("Theta", 'Θ'),
        ("Lambda", 'Λ'), ("Pi", 'Π'), ("Sigma", 'Σ'), ("Phi", 'Φ'), ("Psi", 'Ψ'),
        ("Omega", 'Ω'), ("alpha", 'α'), ("beta", 'β'), ("gamma", 'γ'), ("delta", 'δ'),
        ("epsilon", 'ε'), ("zeta", 'ζ'), ("eta", 'η'), ("theta", 'θ'), ("iota", 'ι'),
        ("kappa", 'κ'), ("lambda", 'λ'), ("mu", 'μ'), ("nu", 'ν'), ("xi", 'ξ'),
        ("omicron", 'ο'), ("pi", 'π'), ("rho", 'ρ'), ("sigma", 'σ'), ("tau", 'τ'),
        ("upsilon", 'υ'), ("phi", 'φ'), ("chi", 'χ'), ("psi", 'ψ'), ("omega", 'ω'),
        ("infin", '\u{221E}'), ("ne", '\u{2260}'), ("le", '\u{2264}'), ("ge", '\u{2265}'),
        ("asymp", '\u{2248}'), ("equiv", '\u{2261}'), ("sum", '\u{2211}'), ("prod", '\u{220F}'),
        ("minus", '\u{2212}'), ("radic", '\u{221A}'), ("part", '\u{2202}'), ("int", '\u{222B}'),
        ("larr", '\u{2190}'), ("uarr", '\u{2191}'), ("rarr", '\u{2192}'), ("darr", '\u{2193}'),
        ("harr", '\u{2194}'),
    ];
    entries.iter().copied().collect()
});

/// Decoder for named and numeric character references
pub struct EntityDecoder;

impl EntityDecoder {
    /// Pass limit used by `decode`
    pub const DEFAULT_MAX_PASSES: usize = 5;

    /// Decode references with the default pass limit.
    pub fn decode(text: &str) -> String {
        Self::decode_with_max_passes(text, Self::DEFAULT_MAX_PASSES)
    }

    /// Decode references, feeding each pass's output into the next until a
    /// pass changes nothing or `max_passes` is reached.
    pub fn decode_with_max_passes(text: &str, max_passes: usize) -> String {
        let mut current = text.to_string();
        if !current.contains('&') {
            return current;
        }

        for _ in 0..max_passes {
            let next = Self::decode_pass(&current);
            if next == current {
                break;
            }
            current = next;
        }

        current
    }

    /// Look up a named reference without the surrounding `&` and `;`.
    pub fn named_entity(name: &str) -> Option<char> {
        NAMED_ENTITIES.get(name).copied()
    }

    fn decode_pass(text: &str) -> String {
        let named = NAMED_REFERENCE_REGEX.replace_all(text, |caps: &Captures| {
            match Self::named_entity(&caps[1]) {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        });

        let decimal = DECIMAL_REFERENCE_REGEX.replace_all(&named, |caps: &Captures| {
            Self::code_point_char(caps[1].parse::<u32>().ok())
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        });

        let hex = HEX_REFERENCE_REGEX.replace_all(&decimal, |caps: &Captures| {
            Self::code_point_char(u32::from_str_radix(&caps[1], 16).ok())
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        });

        hex.into_owned()
    }

    // Code point 0, surrogates and out-of-range values stay encoded
    fn code_point_char(code_point: Option<u32>) -> Option<char> {
        code_point
            .filter(|cp| *cp != 0)
            .and_then(char::from_u32)
    }
}
