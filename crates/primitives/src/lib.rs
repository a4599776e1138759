//! Core types for multi-range editing: positions, ranges, edits, and the
//! rope helpers that resolve them against document text.

/// Text edit types and edit provenance.
pub mod edit;
/// Error type for unresolvable positions and edits.
pub mod error;
/// Line/character positions and ranges.
pub mod position;
/// Rope utilities: position/offset conversion and edit application.
pub mod rope;
/// Range helpers for cursor positions and selections.
pub mod selection;

pub use edit::{EditOrigin, TextEdit};
pub use error::PositionError;
pub use position::{Position, Range, end_of_insert};
pub use ropey::{Rope, RopeSlice};
