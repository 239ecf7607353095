use crate::error::{Result, RewireError};
use crate::rules::RulesetStore;
use crate::ruleset::parser::parse_ruleset_file;
use crate::ruleset::types::RulesetRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Environment variable holding a path list of rules directories.
pub const RULES_PATH_ENV_VAR: &str = "REWIRE_RULES_PATH";

/// List the ruleset files in a rules directory.
///
/// Only `*.toml` files directly inside `dir` are returned, sorted by file
/// name so that later files deterministically win name collisions.
pub fn discover_ruleset_files(dir: &Path) -> Result<Vec<PathBuf>> {
	if !dir.is_dir() {
		return Err(RewireError::RulesDirNotFound {
			path: dir.to_path_buf(),
		});
	}

	let entries = std::fs::read_dir(dir).map_err(|source| RewireError::RulesDirReadError {
		path: dir.to_path_buf(),
		source,
	})?;

	let mut files = Vec::new();
	for entry in entries {
		let entry = entry.map_err(|source| RewireError::RulesDirReadError {
			path: dir.to_path_buf(),
			source,
		})?;
		let path = entry.path();
		if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Parse every ruleset file in a rules directory, in file name order.
pub fn load_ruleset_dir(dir: &Path) -> Result<Vec<RulesetRecord>> {
	discover_ruleset_files(dir)?
		.iter()
		.map(|path| {
			trace!(path = %path.display(), "parsing ruleset file");
			parse_ruleset_file(path)
		})
		.collect()
}

/// Load rules directories, layered in order, into a fresh store.
///
/// A ruleset in a later directory replaces an earlier one with the same name.
pub fn load_ruleset_dirs(dirs: &[PathBuf]) -> Result<RulesetStore> {
	let mut store = RulesetStore::new();

	for dir in dirs {
		let records = load_ruleset_dir(dir)?;
		let file_count = records.len();
		store.load_into(records)?;
		info!(
			dir = %dir.display(),
			files = file_count,
			rulesets = store.len(),
			"loaded rules directory"
		);
	}

	Ok(store)
}

/// Work out which rules directories to load.
///
/// Explicit directories win, then `REWIRE_RULES_PATH`, then the default
/// rules directory under the user's config dir. A missing default
/// directory yields no directories rather than an error.
pub fn resolve_rules_dirs(explicit: &[PathBuf]) -> Result<Vec<PathBuf>> {
	if !explicit.is_empty() {
		return Ok(explicit.to_vec());
	}

	if let Some(dirs) = rules_dirs_from_env(RULES_PATH_ENV_VAR) {
		debug!(count = dirs.len(), "using rules directories from {RULES_PATH_ENV_VAR}");
		return Ok(dirs);
	}

	let default_dir = default_rules_dir()?;
	if default_dir.is_dir() {
		Ok(vec![default_dir])
	} else {
		debug!(path = %default_dir.display(), "default rules directory does not exist");
		Ok(Vec::new())
	}
}

/// Read a path list from an environment variable, ignoring empty entries.
fn rules_dirs_from_env(var_name: &str) -> Option<Vec<PathBuf>> {
	let value = std::env::var_os(var_name)?;
	let dirs: Vec<PathBuf> = std::env::split_paths(&value)
		.filter(|p| !p.as_os_str().is_empty())
		.collect();

	if dirs.is_empty() { None } else { Some(dirs) }
}

/// Get the path to the user's default rules directory.
pub fn default_rules_dir() -> Result<PathBuf> {
	let config_dir = dirs::config_dir().ok_or(RewireError::ConfigDirectoryNotFound)?;
	Ok(config_dir.join("rewire").join("rules"))
}
