use crate::rules::store::RulesetStore;
use crate::rules::target::split_host;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `http://[userinfo@]host[/path]`, scheme matched case-insensitively.
static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?is)^http://(?:[^/@]*@)?([^/@]+)(/.*)?$").expect("URL gate pattern is valid")
});

/// The normalized form of an `http://` URL that rulesets are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingUrl {
	/// Lower-cased host, without userinfo.
	pub host: String,

	/// Path and everything after it, `/` when the URL has none.
	pub uri: String,

	/// `http://` + host + uri.
	pub url: String,

	/// Host split into labels.
	pub labels: Vec<String>,
}

impl WorkingUrl {
	/// Normalize `url`, or return `None` if it is not a plain `http://` URL.
	pub fn parse(url: &str) -> Option<Self> {
		let captures = HTTP_URL.captures(url)?;
		let host = captures.get(1)?.as_str().to_lowercase();
		let uri = captures
			.get(2)
			.map_or_else(|| "/".to_string(), |m| m.as_str().to_string());

		Some(WorkingUrl {
			url: format!("http://{host}{uri}"),
			labels: split_host(&host),
			host,
			uri,
		})
	}
}

/// Rewrite `url` with the first ruleset in `store` that applies to it.
///
/// Rulesets are tried in ascending name order, so when two rulesets could
/// both rewrite a URL the one whose name sorts first wins. Anything that is
/// not an `http://` URL, or that no ruleset rewrites, is returned exactly as
/// given.
pub fn convert(store: &RulesetStore, url: &str) -> String {
	let Some(working) = WorkingUrl::parse(url) else {
		debug!(url, "not an http URL, passing through");
		return url.to_string();
	};

	for ruleset in store.iter() {
		if let Some(rewritten) = ruleset.rewrite(&working.url, &working.labels) {
			debug!(ruleset = %ruleset.name, from = url, to = %rewritten, "rewrote URL");
			return rewritten;
		}
	}

	debug!(url, "no ruleset applied");
	url.to_string()
}
