use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Regenerate derived source files from an interface description.",
	long_about = "facer keeps generated regions of source files synchronized with a single \
	              interface description.\n\nIt parses the ordered feature list from an .iface \
	              file, rebuilds every derived artifact (message ids, enumerations, constants, \
	              call wrappers), and patches the marked regions of the configured target files \
	              in place. Files whose content has not changed are never rewritten.\n\nQuick \
	              start:\n  facer check   Verify all targets are up to date\n  facer update  \
	              Regenerate stale targets\n  facer list    Summarize the parsed interface"
)]
pub struct FacerCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory containing facer.toml.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Check that every target file is up to date.
	///
	/// Regenerates all artifacts in memory and compares them against the
	/// configured target files. Exits with a non-zero status code when any
	/// target is stale or any artifact fails to generate, so it slots
	/// directly into CI pipelines.
	Check {
		/// Show a unified diff for each stale target, highlighting the
		/// differences between current and expected content.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Regenerate all stale target files in place.
	///
	/// Reads the interface description, rebuilds every artifact, and
	/// replaces the marked regions of each configured target. Targets whose
	/// content has not changed are left untouched, so repeated runs are
	/// silent no-ops. Use `--dry-run` to preview which files would change.
	Update {
		/// Preview changes without writing files. Prints which targets
		/// would be modified.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Summarize the parsed interface description.
	///
	/// Prints feature counts per kind, the declared enumerations with
	/// their member prefixes, and the size of the alias table. Useful for
	/// auditing an interface file after editing it.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each stale entry includes
	/// the target path; failures carry the error message.
	Json,
}
