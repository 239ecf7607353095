use serde::Deserialize;

/// Top-level contents of a ruleset `.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RulesetFile {
	/// Ruleset name. Only used to order rulesets against each other.
	#[serde(default)]
	pub name: String,

	/// Reason the ruleset is disabled. Presence alone disables it.
	#[serde(default)]
	pub default_off: Option<String>,

	/// Hostnames this ruleset applies to. `*` stands for one whole label.
	#[serde(default)]
	pub target: Vec<String>,

	/// Regex patterns that veto this ruleset for a matching URL.
	#[serde(default)]
	pub exclusion: Vec<String>,

	/// Rewrite rules, tried in file order.
	#[serde(default)]
	pub rule: Vec<RuleRecord>,
}

/// A single `from`/`to` rewrite pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleRecord {
	/// Regex matched against the normalized URL.
	pub from: String,

	/// Replacement template. `$1`, `$2`, ... refer to capture groups of `from`.
	pub to: String,
}

/// A parsed ruleset, ready to be compiled into a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesetRecord {
	pub name: String,
	pub disabled: bool,
	pub targets: Vec<String>,
	pub exclusions: Vec<String>,
	pub rules: Vec<RuleRecord>,
}

impl RuleRecord {
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		RuleRecord {
			from: from.into(),
			to: to.into(),
		}
	}
}

impl From<RulesetFile> for RulesetRecord {
	fn from(file: RulesetFile) -> Self {
		RulesetRecord {
			name: file.name,
			disabled: file.default_off.is_some(),
			targets: file.target,
			exclusions: file.exclusion,
			rules: file.rule,
		}
	}
}
