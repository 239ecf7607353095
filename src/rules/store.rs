use crate::error::Result;
use crate::rules::engine;
use crate::rules::matcher::Ruleset;
use crate::ruleset::types::RulesetRecord;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// An immutable collection of compiled rulesets, keyed by name.
///
/// Rulesets are kept in a `BTreeMap`, so iteration is in ascending
/// lexicographic name order. That order is the evaluation order used by
/// [`RulesetStore::convert`] and decides which of two overlapping rulesets
/// wins.
#[derive(Debug, Clone, Default)]
pub struct RulesetStore {
	rulesets: BTreeMap<String, Ruleset>,
}

impl RulesetStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Compile `records` into a new store.
	///
	/// Disabled records are skipped. A later record replaces an earlier one
	/// with the same name. Any invalid pattern fails the whole build.
	pub fn build(records: impl IntoIterator<Item = RulesetRecord>) -> Result<Self> {
		let mut store = Self::new();
		store.load_into(records)?;
		Ok(store)
	}

	/// Clear the store and load `records` into it.
	///
	/// On error the store keeps its previous contents.
	pub fn replace(&mut self, records: impl IntoIterator<Item = RulesetRecord>) -> Result<()> {
		*self = Self::build(records)?;
		Ok(())
	}

	/// Add `records` to the store without clearing it first.
	///
	/// Every record is compiled before anything is inserted, so on error the
	/// store keeps its previous contents.
	pub fn load_into(&mut self, records: impl IntoIterator<Item = RulesetRecord>) -> Result<()> {
		let compiled = compile_records(records)?;

		for ruleset in compiled {
			if let Some(previous) = self.rulesets.insert(ruleset.name.clone(), ruleset) {
				debug!(ruleset = %previous.name, "ruleset redefined, keeping the later one");
			}
		}

		Ok(())
	}

	/// Rewrite `url` with the first applicable ruleset. See [`engine::convert`].
	pub fn convert(&self, url: &str) -> String {
		engine::convert(self, url)
	}

	/// Look up a ruleset by name.
	pub fn get(&self, name: &str) -> Option<&Ruleset> {
		self.rulesets.get(name)
	}

	/// Iterate rulesets in evaluation order.
	pub fn iter(&self) -> impl Iterator<Item = &Ruleset> {
		self.rulesets.values()
	}

	pub fn len(&self) -> usize {
		self.rulesets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rulesets.is_empty()
	}
}

fn compile_records(records: impl IntoIterator<Item = RulesetRecord>) -> Result<Vec<Ruleset>> {
	let mut compiled = Vec::new();
	let mut skipped = 0usize;

	for record in records {
		if record.disabled {
			debug!(ruleset = %record.name, "skipping disabled ruleset");
			skipped += 1;
			continue;
		}
		compiled.push(Ruleset::from_record(&record)?);
	}

	info!(compiled = compiled.len(), skipped, "compiled rulesets");
	Ok(compiled)
}

/// A shareable handle to the current store.
///
/// Readers take a snapshot and convert without holding any lock. Reloading
/// builds a complete new store first and then publishes it in one swap, so
/// readers only ever see a whole store.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
	current: Arc<RwLock<Arc<RulesetStore>>>,
}

impl SharedStore {
	pub fn new(store: RulesetStore) -> Self {
		SharedStore {
			current: Arc::new(RwLock::new(Arc::new(store))),
		}
	}

	/// The store currently published.
	pub fn snapshot(&self) -> Arc<RulesetStore> {
		let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
		Arc::clone(&*guard)
	}

	/// Install `store` as the current store, returning the previous one.
	pub fn publish(&self, store: RulesetStore) -> Arc<RulesetStore> {
		let next = Arc::new(store);
		let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
		std::mem::replace(&mut *guard, next)
	}

	/// Build a store from `records` and publish it.
	///
	/// If building fails nothing is published.
	pub fn reload(&self, records: impl IntoIterator<Item = RulesetRecord>) -> Result<()> {
		let store = RulesetStore::build(records)?;
		self.publish(store);
		Ok(())
	}

	pub fn convert(&self, url: &str) -> String {
		self.snapshot().convert(url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RewireError;
	use crate::ruleset::types::RuleRecord;

	fn record(name: &str, host: &str, to: &str) -> RulesetRecord {
		RulesetRecord {
			name: name.to_string(),
			disabled: false,
			targets: vec![host.to_string()],
			exclusions: Vec::new(),
			rules: vec![RuleRecord::new("^http://[^/]+/", to)],
		}
	}

	fn bad_record(name: &str) -> RulesetRecord {
		RulesetRecord {
			name: name.to_string(),
			rules: vec![RuleRecord::new("[bad", "https://")],
			..Default::default()
		}
	}

	#[test]
	fn test_build_skips_disabled_records() {
		let mut off = record("Off", "off.com", "https://off.com/");
		off.disabled = true;

		let store = RulesetStore::build([record("On", "on.com", "https://on.com/"), off]).unwrap();

		assert_eq!(store.len(), 1);
		assert!(store.get("On").is_some());
		assert!(store.get("Off").is_none());
	}

	#[test]
	fn test_build_later_record_wins() {
		let store = RulesetStore::build([
			record("Same", "example.com", "https://first.example.com/"),
			record("Same", "example.com", "https://second.example.com/"),
		])
		.unwrap();

		assert_eq!(store.len(), 1);
		assert_eq!(
			store.convert("http://example.com/a"),
			"https://second.example.com/a"
		);
	}

	#[test]
	fn test_iter_is_sorted_by_name() {
		let store = RulesetStore::build([
			record("beta", "b.com", "https://b.com/"),
			record("Alpha", "a.com", "https://a.com/"),
			record("", "e.com", "https://e.com/"),
			record("alpha", "c.com", "https://c.com/"),
		])
		.unwrap();

		let names: Vec<_> = store.iter().map(|r| r.name.as_str()).collect();
		assert_eq!(names, vec!["", "Alpha", "alpha", "beta"]);
	}

	#[test]
	fn test_replace_clears_previous_entries() {
		let mut store = RulesetStore::build([record("Old", "old.com", "https://old.com/")]).unwrap();
		store
			.replace([record("New", "new.com", "https://new.com/")])
			.unwrap();

		assert!(store.get("Old").is_none());
		assert!(store.get("New").is_some());
		assert_eq!(store.convert("http://old.com/"), "http://old.com/");
	}

	#[test]
	fn test_load_into_is_additive() {
		let mut store = RulesetStore::build([record("Old", "old.com", "https://old.com/")]).unwrap();
		store
			.load_into([record("New", "new.com", "https://new.com/")])
			.unwrap();

		assert_eq!(store.len(), 2);
		assert_eq!(store.convert("http://old.com/x"), "https://old.com/x");
		assert_eq!(store.convert("http://new.com/x"), "https://new.com/x");
	}

	#[test]
	fn test_failed_batch_leaves_store_unchanged() {
		let mut store = RulesetStore::build([record("Kept", "kept.com", "https://kept.com/")]).unwrap();

		let result = store.load_into([record("Fine", "fine.com", "https://fine.com/"), bad_record("Bad")]);
		assert!(matches!(
			result.unwrap_err(),
			RewireError::InvalidRegex { ref ruleset, .. } if ruleset == "Bad"
		));
		assert_eq!(store.len(), 1);
		assert!(store.get("Fine").is_none());

		assert!(store.replace([bad_record("Bad")]).is_err());
		assert!(store.get("Kept").is_some());
	}

	#[test]
	fn test_shared_store_publish_swaps_whole_store() {
		let shared = SharedStore::new(RulesetStore::build([record("A", "a.com", "https://a.com/")]).unwrap());
		let before = shared.snapshot();

		let previous = shared.publish(RulesetStore::build([record("B", "b.com", "https://b.com/")]).unwrap());

		assert!(Arc::ptr_eq(&before, &previous));
		assert_eq!(before.convert("http://a.com/"), "https://a.com/");
		assert_eq!(shared.convert("http://a.com/"), "http://a.com/");
		assert_eq!(shared.convert("http://b.com/"), "https://b.com/");
	}

	#[test]
	fn test_shared_store_failed_reload_keeps_current() {
		let shared = SharedStore::new(RulesetStore::build([record("A", "a.com", "https://a.com/")]).unwrap());

		assert!(shared.reload([bad_record("Bad")]).is_err());
		assert_eq!(shared.convert("http://a.com/"), "https://a.com/");

		shared.reload([record("B", "b.com", "https://b.com/")]).unwrap();
		assert_eq!(shared.convert("http://a.com/"), "http://a.com/");
	}

	#[test]
	fn test_shared_store_concurrent_readers() {
		let shared = SharedStore::new(RulesetStore::build([record("A", "a.com", "https://a.com/")]).unwrap());

		std::thread::scope(|scope| {
			for _ in 0..4 {
				let reader = shared.clone();
				scope.spawn(move || {
					for _ in 0..200 {
						let out = reader.convert("http://a.com/x");
						assert!(out == "https://a.com/x" || out == "https://a2.com/x");
					}
				});
			}

			for _ in 0..20 {
				shared.publish(RulesetStore::build([record("A", "a.com", "https://a2.com/")]).unwrap());
			}
		});

		assert_eq!(shared.convert("http://a.com/x"), "https://a2.com/x");
	}
}
