use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rewire_cli::rules::RulesetStore;
use rewire_cli::ruleset::{load_ruleset_dirs, resolve_rules_dirs};

#[derive(Parser)]
#[command(name = "rewire")]
#[command(
	author,
	version,
	about = "Rewrites HTTP URLs to HTTPS using declarative rulesets"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Rules directory to load; repeat to layer several, later ones win
	#[arg(long = "rules", value_name = "DIR", global = true)]
	rules: Vec<PathBuf>,

	/// Log matching decisions to stderr
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Rewrite URLs given as arguments, or one per line on stdin
	Convert {
		/// URLs to rewrite
		urls: Vec<String>,
	},
	/// Ruleset inspection commands
	Rulesets {
		#[command(subcommand)]
		action: RulesetsAction,
	},
	/// Print an annotated sample ruleset file
	Template,
}

#[derive(Subcommand)]
enum RulesetsAction {
	/// List enabled rulesets in evaluation order
	List,
	/// Load and compile all rulesets without converting anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Commands::Convert { urls } => handle_convert(&cli.rules, &urls),
		Commands::Rulesets { action } => match action {
			RulesetsAction::List => handle_rulesets_list(&cli.rules),
			RulesetsAction::Validate => handle_rulesets_validate(&cli.rules),
		},
		Commands::Template => {
			print!("{}", ruleset_template());
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn init_tracing(verbose: bool) {
	let default_filter = if verbose { "debug" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
		)
		.with_writer(std::io::stderr)
		.init();
}

fn load_store(explicit_dirs: &[PathBuf]) -> Result<RulesetStore> {
	let dirs = resolve_rules_dirs(explicit_dirs).context("Failed to resolve rules directories")?;
	load_ruleset_dirs(&dirs).context("Failed to load rulesets")
}

fn handle_convert(explicit_dirs: &[PathBuf], urls: &[String]) -> Result<ExitCode> {
	let store = load_store(explicit_dirs)?;
	let stdout = std::io::stdout();
	let mut out = stdout.lock();

	if urls.is_empty() {
		for line in std::io::stdin().lock().lines() {
			let url = line.context("Failed to read URL from stdin")?;
			writeln!(out, "{}", store.convert(&url)).context("Failed to write output")?;
		}
	} else {
		for url in urls {
			writeln!(out, "{}", store.convert(url)).context("Failed to write output")?;
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_rulesets_list(explicit_dirs: &[PathBuf]) -> Result<ExitCode> {
	let store = load_store(explicit_dirs)?;

	if store.is_empty() {
		println!("No rulesets loaded.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Rulesets (in evaluation order):\n");
	for ruleset in store.iter() {
		let name = if ruleset.name.is_empty() {
			"<unnamed>"
		} else {
			ruleset.name.as_str()
		};
		println!(
			"  {} ({} targets, {} exclusions, {} rules)",
			name,
			ruleset.targets.len(),
			ruleset.exclusions.len(),
			ruleset.rules.len()
		);
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_rulesets_validate(explicit_dirs: &[PathBuf]) -> Result<ExitCode> {
	let dirs = resolve_rules_dirs(explicit_dirs).context("Failed to resolve rules directories")?;

	if dirs.is_empty() {
		println!("No rules directories found.");
		return Ok(ExitCode::SUCCESS);
	}

	match load_ruleset_dirs(&dirs) {
		Ok(store) => {
			println!("All rulesets are valid:");
			for dir in &dirs {
				println!("  {}", dir.display());
			}
			println!("{} enabled rulesets", store.len());
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Ruleset error: {:#}", anyhow::Error::from(e));
			Ok(ExitCode::FAILURE)
		}
	}
}

fn ruleset_template() -> &'static str {
	r#"# Sample rewire ruleset. Save as <name>.toml in a rules directory.

# Rulesets are tried in ascending name order; the first one that rewrites wins.
name = "Example"

# Uncomment to disable this ruleset without deleting it.
# default-off = "reason"

# Hosts this ruleset applies to. "*" matches exactly one label.
target = ["example.com", "*.example.com"]

# URLs matching any of these patterns are left alone.
exclusion = ['^http://example\.com/plain/']

# Rules are tried in order; $1, $2, ... insert capture groups.
[[rule]]
from = '^http://(www\.)?example\.com/'
to = "https://www.example.com/"

[[rule]]
from = '^http://([^/:@]+)\.example\.com/'
to = "https://$1.example.com/"
"#
}
