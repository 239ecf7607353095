use crate::error::Result;
use crate::rules::rewriter::{RewriteRule, compile_pattern};
use crate::rules::target::TargetPattern;
use crate::ruleset::types::RulesetRecord;
use regex::Regex;
use tracing::debug;

/// A compiled ruleset ready for matching.
#[derive(Debug, Clone)]
pub struct Ruleset {
	/// Ruleset name, used as the evaluation order key.
	pub name: String,

	/// Host patterns; any one matching is enough.
	pub targets: Vec<TargetPattern>,

	/// Case-insensitive patterns that veto this ruleset.
	pub exclusions: Vec<Regex>,

	/// Rewrite rules in declaration order.
	pub rules: Vec<RewriteRule>,
}

impl Ruleset {
	/// Compile a ruleset record. Every pattern is compiled up front.
	pub fn from_record(record: &RulesetRecord) -> Result<Self> {
		let name = record.name.as_str();

		let exclusions = record
			.exclusions
			.iter()
			.map(|p| compile_pattern(name, p))
			.collect::<Result<Vec<_>>>()?;

		let rules = record
			.rules
			.iter()
			.map(|r| RewriteRule::new(name, &r.from, &r.to))
			.collect::<Result<Vec<_>>>()?;

		Ok(Ruleset {
			name: record.name.clone(),
			targets: record.targets.iter().map(|t| TargetPattern::new(t)).collect(),
			exclusions,
			rules,
		})
	}

	/// Check if any target pattern matches the split host.
	pub fn targets_host(&self, host_labels: &[String]) -> bool {
		self.targets.iter().any(|t| t.matches(host_labels))
	}

	/// Check if any exclusion pattern occurs anywhere in `url`.
	pub fn is_excluded(&self, url: &str) -> bool {
		self.exclusions.iter().any(|e| e.is_match(url))
	}

	/// Run target, exclusion and rule checks against a normalized URL.
	///
	/// Returns the output of the first rule that matches, or `None` if
	/// this ruleset does not rewrite the URL.
	pub fn rewrite(&self, url: &str, host_labels: &[String]) -> Option<String> {
		if !self.targets_host(host_labels) {
			return None;
		}

		if self.is_excluded(url) {
			debug!(ruleset = %self.name, url, "excluded");
			return None;
		}

		self.rules.iter().find_map(|rule| rule.apply(url))
	}
}
