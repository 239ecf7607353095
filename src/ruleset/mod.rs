//! Ruleset file loading for rewire.
//!
//! This module handles:
//! - TOML ruleset file parsing
//! - Rules directory discovery and layering
//! - Resolving which rules directories to use

pub mod loader;
pub mod parser;
pub mod types;

pub use loader::{
	RULES_PATH_ENV_VAR, default_rules_dir, discover_ruleset_files, load_ruleset_dir,
	load_ruleset_dirs, resolve_rules_dirs,
};
pub use parser::{parse_ruleset_file, parse_ruleset_str};
pub use types::{RuleRecord, RulesetFile, RulesetRecord};
