use std::path::PathBuf;

/// Library-level structured errors for rewire.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RewireError {
	#[error("Rules directory not found: {path}")]
	RulesDirNotFound { path: PathBuf },

	#[error("Failed to read rules directory: {path}")]
	RulesDirReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read ruleset file: {path}")]
	RulesetReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse ruleset file: {path}")]
	RulesetParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in ruleset {ruleset:?}: {pattern}")]
	InvalidRegex {
		ruleset: String,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to resolve config directory")]
	ConfigDirectoryNotFound,
}

/// Result type alias using RewireError.
pub type Result<T> = std::result::Result<T, RewireError>;
