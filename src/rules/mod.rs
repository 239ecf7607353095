//! Ruleset matching and URL rewriting for rewire.
//!
//! This module handles:
//! - Target host patterns with single-label wildcards
//! - Compiled rulesets with exclusions and ordered rewrite rules
//! - The ruleset store and the `convert` engine over it

pub mod engine;
pub mod matcher;
pub mod rewriter;
pub mod store;
pub mod target;

pub use engine::{WorkingUrl, convert};
pub use matcher::Ruleset;
pub use rewriter::{RewriteRule, compile_pattern};
pub use store::{RulesetStore, SharedStore};
pub use target::{TargetPattern, split_host};
