/*!
 * Text transformations applied to localization strings.
 *
 * - `entities`: named and numeric character reference decoding
 * - `segmenter`: whitespace normalization and sentence splitting
 * - `inline_tags`: markup to TMX inline element conversion and escaping
 */

pub mod entities;
pub mod inline_tags;
pub mod segmenter;

pub use entities::EntityDecoder;
pub use inline_tags::{InlineTagConverter, TagKind, TagMatch, escape_xml};
pub use segmenter::{Segmenter, TextNormalizer};
