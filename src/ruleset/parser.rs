use crate::error::{Result, RewireError};
use crate::ruleset::types::{RulesetFile, RulesetRecord};
use std::path::Path;

/// Parse a ruleset file from the given path.
pub fn parse_ruleset_file(path: &Path) -> Result<RulesetRecord> {
	let content = std::fs::read_to_string(path).map_err(|source| RewireError::RulesetReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_ruleset_str(&content, path)
}

/// Parse a ruleset from a string (useful for testing).
pub fn parse_ruleset_str(content: &str, path: &Path) -> Result<RulesetRecord> {
	let file: RulesetFile =
		toml::from_str(content).map_err(|source| RewireError::RulesetParseError {
			path: path.to_path_buf(),
			source,
		})?;

	Ok(file.into())
}
