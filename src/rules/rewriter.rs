use crate::error::{Result, RewireError};
use regex::{NoExpand, Regex, RegexBuilder};

/// A compiled `from`/`to` rewrite rule.
#[derive(Debug, Clone)]
pub struct RewriteRule {
	/// Case-insensitive pattern matched against the working URL.
	pub from: Regex,

	/// Replacement template with `$N` capture placeholders.
	pub to: String,
}

impl RewriteRule {
	/// Compile a rule belonging to `ruleset`.
	pub fn new(ruleset: &str, from: &str, to: &str) -> Result<Self> {
		Ok(RewriteRule {
			from: compile_pattern(ruleset, from)?,
			to: to.to_string(),
		})
	}

	/// Apply this rule to `url`, or return `None` if `from` does not match.
	///
	/// The first match of `from` is replaced by the literal `to` template.
	/// Then each participating capture group, in order, replaces every
	/// `$N` in the result. Groups that did not participate leave their
	/// placeholder untouched.
	pub fn apply(&self, url: &str) -> Option<String> {
		let captures = self.from.captures(url)?;
		let mut rewritten = self.from.replacen(url, 1, NoExpand(&self.to)).into_owned();

		for (index, group) in captures.iter().enumerate().skip(1) {
			if let Some(group) = group {
				rewritten = rewritten.replace(&format!("${index}"), group.as_str());
			}
		}

		Some(rewritten)
	}
}

/// Compile a case-insensitive pattern, tagging failures with the ruleset name.
pub fn compile_pattern(ruleset: &str, pattern: &str) -> Result<Regex> {
	RegexBuilder::new(pattern)
		.case_insensitive(true)
		.build()
		.map_err(|source| RewireError::InvalidRegex {
			ruleset: ruleset.to_string(),
			pattern: pattern.to_string(),
			source,
		})
}
