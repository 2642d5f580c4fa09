//! waycode-analysis: language classification, coarse complexity metrics,
//! and diff rendering.
//!
//! Everything in here is intentionally naive text processing. Language
//! detection is an extension lookup and the complexity metrics are simple
//! line/character scans, not parsing.

pub mod diff;
pub mod language;

pub use diff::{apply_patch, side_by_side, unified_diff, PatchError};
pub use language::{complexity, detect_language, ComplexityReport};
