/// Label that matches any single host label.
pub const WILDCARD: &str = "*";

/// A `target` host pattern, split into lower-cased labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPattern {
	labels: Vec<String>,
}

impl TargetPattern {
	pub fn new(host: &str) -> Self {
		TargetPattern {
			labels: split_host(host),
		}
	}

	pub fn labels(&self) -> &[String] {
		&self.labels
	}

	/// Check this pattern against an already split, lower-cased host.
	///
	/// Label counts must be equal; a wildcard never spans more than one
	/// label, so `*.example.com` does not match `example.com` or
	/// `a.b.example.com`. Labels are compared from the TLD leftwards.
	pub fn matches(&self, host_labels: &[String]) -> bool {
		if self.labels.len() != host_labels.len() {
			return false;
		}

		self.labels
			.iter()
			.zip(host_labels)
			.rev()
			.all(|(pattern, label)| pattern == WILDCARD || pattern == label)
	}
}

/// Split a hostname into lower-cased labels on `.`.
pub fn split_host(host: &str) -> Vec<String> {
	host.to_lowercase().split('.').map(str::to_string).collect()
}
