use std::path::PathBuf;
use std::process;

use clap::Parser;
use facer_cli::Commands;
use facer_cli::FacerCli;
use facer_cli::OutputFormat;
use facer_core::CheckReport;
use facer_core::FacerConfig;
use facer_core::FeatureType;
use facer_core::TargetFailure;
use facer_core::check_targets;
use facer_core::load_face;
use facer_core::regenerate_all;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = FacerCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	if args.verbose {
		tracing_subscriber::fmt()
			.with_env_filter(
				tracing_subscriber::EnvFilter::try_from_default_env()
					.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("facer_core=debug")),
			)
			.with_writer(std::io::stderr)
			.init();
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::Update { dry_run }) => run_update(&args, dry_run),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `facer --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render through miette for rich diagnostics with help text and
		// error codes.
		match e.downcast::<facer_core::FacerError>() {
			Ok(facer_err) => {
				let report: miette::Report = (*facer_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &FacerCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_check(
	args: &FacerCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = FacerConfig::load(&root)?;
	let result = check_targets(&root, &config)?;

	if result.is_ok() {
		match format {
			OutputFormat::Json => println!("{{\"ok\":true,\"stale\":[],\"failures\":[]}}"),
			OutputFormat::Text => println!("Check passed: all targets are up to date."),
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let stale_entries: Vec<serde_json::Value> = result
				.stale
				.iter()
				.map(|entry| serde_json::json!({ "path": entry.path.display().to_string() }))
				.collect();
			let failure_entries: Vec<serde_json::Value> = result
				.failures
				.iter()
				.map(|failure| {
					serde_json::json!({
						"path": failure.path.display().to_string(),
						"message": failure.error.to_string(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"stale": stale_entries,
				"failures": failure_entries,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!("  generation failures: {}", result.failures.len());
			eprintln!("  stale targets: {}", result.stale.len());

			print_failures(&result.failures);

			if !result.stale.is_empty() {
				eprintln!();
				eprintln!("Stale targets:");
				for entry in &result.stale {
					eprintln!("  {}", entry.path.display());
					if show_diff {
						print_diff(&entry.current, &entry.expected);
					}
				}
			}

			eprintln!();
			eprintln!("{}", check_summary(&result));
		}
	}

	process::exit(1)
}

fn check_summary(result: &CheckReport) -> String {
	let mut parts = Vec::new();
	if !result.failures.is_empty() {
		parts.push(format!("{} generation failure(s)", result.failures.len()));
	}
	if !result.stale.is_empty() {
		parts.push(format!("{} target(s) are out of date", result.stale.len()));
	}
	format!("{}. Run `facer update` to fix.", parts.join(" and "))
}

fn run_update(args: &FacerCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = FacerConfig::load(&root)?;

	if dry_run {
		let result = check_targets(&root, &config)?;
		print_failures(&result.failures);
		if result.stale.is_empty() {
			println!("All targets are already up to date.");
		} else {
			println!("Dry run: would update {} target(s):", result.stale.len());
			for entry in &result.stale {
				println!("  {}", entry.path.display());
			}
		}
		if !result.failures.is_empty() {
			process::exit(1);
		}
		return Ok(());
	}

	let report = regenerate_all(&root, &config)?;
	print_failures(&report.failures);

	if report.changed.is_empty() {
		println!("All targets are already up to date.");
	} else {
		println!("Updated {} target(s).", report.changed.len());
		for path in &report.changed {
			println!("  {}", path.display());
		}
	}

	if !report.is_ok() {
		process::exit(1);
	}
	Ok(())
}

fn run_list(args: &FacerCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = FacerConfig::load(&root)?;
	let face = load_face(&root, &config)?;

	let count = |kind: FeatureType| {
		face.features()
			.iter()
			.filter(|feature| feature.feature_type == kind)
			.count()
	};

	println!("{}", colored!("Interface:", bold));
	println!("  functions     {}", count(FeatureType::Function));
	println!("  getters       {}", count(FeatureType::Getter));
	println!("  setters       {}", count(FeatureType::Setter));
	println!("  values        {}", count(FeatureType::Value));
	println!("  events        {}", count(FeatureType::Event));
	println!("  aliases       {}", face.alias_count());

	let enumerations: Vec<_> = face
		.features()
		.iter()
		.filter(|feature| feature.feature_type == FeatureType::Enumeration)
		.collect();
	if !enumerations.is_empty() {
		println!();
		println!("{}", colored!("Enumerations:", bold));
		for feature in enumerations {
			println!("  {} = {}", feature.name, feature.value);
		}
	}

	let deprecated = face
		.features()
		.iter()
		.filter(|feature| feature.is_deprecated())
		.count();
	println!();
	println!(
		"{} feature(s), {} deprecated",
		face.features().len(),
		deprecated
	);

	Ok(())
}

fn print_failures(failures: &[TargetFailure]) {
	for failure in failures {
		eprintln!(
			"{} {}: {}",
			colored!("error:", red),
			failure.path.display(),
			failure.error
		);
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
