//! Synchronized multi-range editing.
//!
//! A [`Session`] keeps several single-line spans of one buffer (replicas)
//! textually identical while the user edits any of them. Every document
//! change is classified against the replicas: changes outside them only move
//! them, changes inside one replica are replayed onto all of them, and
//! changes spanning several replicas are split back into elementary edits
//! with a character diff. Anything that cannot be replayed unambiguously
//! ends the session instead of guessing.
//!
//! The host editor is reached only through the [`Host`] trait, and every
//! reaction to one change goes out as a single [`Batch`]. [`Cursors`] keeps
//! one session per buffer.

/// Change classification against replica spans.
pub mod classify;
mod compose;
/// Session configuration.
pub mod config;
/// Character diffing behind a narrow trait.
pub mod diff;
mod error;
/// The host editor seam.
pub mod host;
/// Per-buffer session bookkeeping.
pub mod manager;
/// Replicas and their ordered arena.
pub mod replica;
mod replicate;
/// Editing sessions.
pub mod session;
#[cfg(test)]
mod test_support;

pub use classify::Classification;
pub use config::{ConfigError, CursorsConfig};
pub use diff::{CharDiffer, DiffOp, Differ};
pub use error::CursorsError;
pub use host::{Batch, BufferId, DocumentChange, EDIT_ORIGIN, Host, HostCall, HostError, KeyAction};
pub use manager::{Cursors, Select};
pub use replica::{Replica, ReplicaId, ReplicaSet};
pub use session::{LinkedRanges, Phase, Session};
