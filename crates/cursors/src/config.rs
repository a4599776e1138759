//! Session configuration.

use serde::Deserialize;
use thiserror::Error;

/// Configuration shared by every cursor session.
///
/// Deserialized from a TOML table with kebab-case keys; missing keys fall
/// back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CursorsConfig {
	/// Buffer-local key that cancels the session.
	pub cancel_key: String,
	/// Buffer-local key that jumps to the next replica.
	pub next_key: String,
	/// Buffer-local key that jumps to the previous replica.
	pub previous_key: String,
	/// Highlight group used to draw replicas.
	pub highlight_group: String,
	/// Highlight namespace owned by the sessions.
	pub namespace: String,
}

impl Default for CursorsConfig {
	fn default() -> Self {
		Self {
			cancel_key: "<esc>".to_string(),
			next_key: "<C-n>".to_string(),
			previous_key: "<C-p>".to_string(),
			highlight_group: "CursorRange".to_string(),
			namespace: "cursors".to_string(),
		}
	}
}

impl CursorsConfig {
	/// Parses a configuration table.
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML source is malformed or has unexpected keys.
	#[error("invalid cursors config: {0}")]
	Toml(#[from] toml::de::Error),
}
