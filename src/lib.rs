//! Rewire - rewrites HTTP URLs to HTTPS using declarative rulesets.
//!
//! This library provides the core functionality for rewire, including:
//! - Ruleset file parsing and rules directory discovery
//! - Target host matching, exclusion filtering and rule application
//! - An immutable ruleset store with a shared handle for atomic reloads
//!
//! # Example
//!
//! ```no_run
//! use rewire_cli::ruleset::{load_ruleset_dirs, resolve_rules_dirs};
//!
//! let dirs = resolve_rules_dirs(&[]).unwrap();
//! let store = load_ruleset_dirs(&dirs).unwrap();
//!
//! let converted = store.convert("http://example.com/path?q=1");
//! println!("{converted}");
//! ```

pub mod error;
pub mod rules;
pub mod ruleset;

pub use error::{Result, RewireError};
