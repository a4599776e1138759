use tandem_primitives::PositionError;
use thiserror::Error;

use crate::host::HostError;

/// Errors surfaced to callers of the cursors API.
#[derive(Debug, Error)]
pub enum CursorsError {
	/// The host failed to apply a session batch.
	#[error(transparent)]
	Host(#[from] HostError),
	/// A linked-range word pattern is not a valid regex.
	#[error("invalid word pattern: {0}")]
	InvalidPattern(#[from] regex::Error),
}

/// Why an edit could not be replicated safely.
///
/// Never returned to callers: every refusal ends the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum Refusal {
	/// A whole-replica replacement is neither a wrap nor a trim of the old text.
	#[error("replacement of {old:?} with {new:?} is neither a wrap nor a trim")]
	IrreconcilableReplacement { old: String, new: String },
	/// A reconstructed elementary edit crosses or introduces a line break.
	#[error("composed edit spans multiple lines")]
	MultiLine,
	/// The number of elementary edits fits neither one nor two per replica.
	#[error("{edits} elementary edits do not fit {replicas} replicas")]
	CountMismatch { edits: usize, replicas: usize },
	/// An elementary edit falls outside the replica it was matched with.
	#[error("elementary edit {index} lies outside its replica")]
	OutsideReplica { index: usize },
	/// Elementary edits differ in removed or inserted length.
	#[error("elementary edit {index} differs in shape from the previous one")]
	UnequalShape { index: usize },
	/// A begin/end edit pair does not wrap or unwrap its replica.
	#[error("edit pair {index} does not wrap or unwrap its replica")]
	UnpairedBoundary { index: usize },
	/// A replica no longer matches the linked-editing word pattern.
	#[error("replica text {text:?} no longer matches the word pattern")]
	PatternMismatch { text: String },
	/// The change could not be resolved against the pre-edit document.
	#[error(transparent)]
	Position(#[from] PositionError),
}
