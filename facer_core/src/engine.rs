//! The orchestrator: loads the interface model once, builds every artifact
//! block fresh, and feeds the patcher for each configured target. Failures
//! are accumulated per target instead of aborting the run, so one bad
//! record does not mask other, unrelated problems.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::FacerError;
use crate::FacerResult;
use crate::config::FacerConfig;
use crate::config::TargetConfig;
use crate::emit;
use crate::face::Face;
use crate::patcher;
use crate::patcher::WriteOutcome;
use crate::types::TypeMap;

/// A target that could not be generated or patched.
#[derive(Debug)]
pub struct TargetFailure {
	pub path: PathBuf,
	pub error: FacerError,
}

/// Result of regenerating all configured targets.
#[derive(Debug, Default)]
pub struct RunReport {
	/// Targets whose content changed (rewritten or newly created).
	pub changed: Vec<PathBuf>,
	/// Targets already up to date; no filesystem write occurred.
	pub unchanged: Vec<PathBuf>,
	/// Per-target failures, accumulated across the whole run.
	pub failures: Vec<TargetFailure>,
}

impl RunReport {
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}
}

/// A target whose on-disk content differs from the freshly generated one.
#[derive(Debug)]
pub struct StaleTarget {
	pub path: PathBuf,
	pub current: String,
	pub expected: String,
}

/// Result of checking all configured targets without writing.
#[derive(Debug, Default)]
pub struct CheckReport {
	pub stale: Vec<StaleTarget>,
	pub failures: Vec<TargetFailure>,
}

impl CheckReport {
	/// True when every target is up to date and nothing failed.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty() && self.failures.is_empty()
	}
}

/// Build the named artifact block from the model.
fn artifact_lines(block: &str, face: &Face, types: &TypeMap) -> FacerResult<Vec<String>> {
	match block {
		"messages" => Ok(emit::messages(face)),
		"enumerations" => Ok(emit::enumerations(face)),
		"constants" => Ok(emit::constants(face)),
		"declarations" => emit::declarations(face, types),
		"definitions" => emit::definitions(face, types),
		other => Err(FacerError::UnknownBlock(other.to_string())),
	}
}

/// All blocks a target declares, keyed by their marker identifier.
fn target_blocks(
	target: &TargetConfig,
	face: &Face,
	types: &TypeMap,
) -> FacerResult<HashMap<String, Vec<String>>> {
	let mut blocks = HashMap::new();
	for name in &target.blocks {
		blocks.insert(name.clone(), artifact_lines(name, face, types)?);
	}
	Ok(blocks)
}

/// Compute a target's updated content without touching the filesystem
/// beyond reads. Returns the current on-disk content of the output path
/// (empty when it does not yet exist) and the expected content.
fn compute_target(
	root: &Path,
	target: &TargetConfig,
	face: &Face,
	types: &TypeMap,
) -> FacerResult<(String, String)> {
	let out_path = root.join(&target.path);
	let blocks = target_blocks(target, face, types)?;

	let source_path = match &target.template {
		Some(template) => root.join(template),
		None => out_path.clone(),
	};
	let source = fs::read_to_string(&source_path)?;
	let expected = patcher::replace_regions(
		&source,
		&target.leader,
		&blocks,
		&source_path.display().to_string(),
	)?;

	let current = match &target.template {
		Some(_) => fs::read_to_string(&out_path).unwrap_or_default(),
		None => source,
	};

	Ok((current, expected))
}

/// Load the interface model for a configured project.
pub fn load_face(root: &Path, config: &FacerConfig) -> FacerResult<Face> {
	Face::read_from_file(&root.join(&config.interface.path))
}

/// Check every configured target against freshly generated content.
/// Per-target failures are collected rather than aborting, so the check
/// reports all problems in a single pass. A model load failure is fatal —
/// nothing can be generated without it.
pub fn check_targets(root: &Path, config: &FacerConfig) -> FacerResult<CheckReport> {
	let face = load_face(root, config)?;
	let types = TypeMap::editor_defaults();
	let mut report = CheckReport::default();

	for target in &config.targets {
		match compute_target(root, target, &face, &types) {
			Ok((current, expected)) => {
				if current != expected {
					report.stale.push(StaleTarget {
						path: target.path.clone(),
						current,
						expected,
					});
				} else {
					debug!(path = %target.path.display(), "up to date");
				}
			}
			Err(error) => {
				report.failures.push(TargetFailure {
					path: target.path.clone(),
					error,
				});
			}
		}
	}

	Ok(report)
}

/// Regenerate every configured target in declaration order, writing only
/// the ones whose content changed.
pub fn regenerate_all(root: &Path, config: &FacerConfig) -> FacerResult<RunReport> {
	let face = load_face(root, config)?;
	let types = TypeMap::editor_defaults();
	let mut report = RunReport::default();

	for target in &config.targets {
		let outcome = target_blocks(target, &face, &types).and_then(|blocks| {
			let out_path = root.join(&target.path);
			match &target.template {
				Some(template) => {
					patcher::generate(&root.join(template), &out_path, &target.leader, &blocks)
				}
				None => patcher::regenerate(&out_path, &target.leader, &blocks),
			}
		});
		match outcome {
			Ok(WriteOutcome::Unchanged) => report.unchanged.push(target.path.clone()),
			Ok(_) => report.changed.push(target.path.clone()),
			Err(error) => {
				report.failures.push(TargetFailure {
					path: target.path.clone(),
					error,
				});
			}
		}
	}

	Ok(report)
}
