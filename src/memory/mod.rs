/*!
 * Translation memory construction.
 *
 * - `aligner`: key-path flattening and source/target matching
 * - `tmx`: TMX document rendering
 */

pub mod aligner;
pub mod tmx;

pub use aligner::{Aligner, Alignment, FlatContent};
pub use tmx::{TmxWriter, compute_id, suggested_file_name};
