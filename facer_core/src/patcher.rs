//! Marked-region file patching. A target file carries one or more regions
//! bounded by sentinel delimiter lines; the patcher replaces each region's
//! contents with a freshly generated block and writes the file back only
//! when the result differs byte-for-byte from what is on disk. Everything
//! outside marked regions is preserved exactly, trailing whitespace and
//! line endings included.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;
use tracing::info;

use crate::FacerError;
use crate::FacerResult;

/// Sentinel substring opening a marked region, directly after the comment
/// leader: `//++Autogenerated <id>`.
pub const START_SENTINEL: &str = "++Autogenerated";

/// Sentinel substring closing a marked region: `//--Autogenerated <id>`.
pub const END_SENTINEL: &str = "--Autogenerated";

/// What a write operation did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
	/// Content was identical; no filesystem write occurred.
	Unchanged,
	/// The file existed and was rewritten.
	Changed,
	/// The file did not exist and was created.
	Created,
}

impl WriteOutcome {
	pub fn wrote(self) -> bool {
		!matches!(self, Self::Unchanged)
	}
}

/// Write `updated` to `path` only if it differs from the current contents.
/// Repeated runs with unchanged inputs are silent no-ops.
pub fn update_file(path: &Path, updated: &str) -> FacerResult<WriteOutcome> {
	match fs::read_to_string(path) {
		Ok(original) if original == updated => {
			debug!(path = %path.display(), "unchanged");
			Ok(WriteOutcome::Unchanged)
		}
		Ok(_) => {
			fs::write(path, updated)?;
			info!(path = %path.display(), "changed");
			Ok(WriteOutcome::Changed)
		}
		Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
			fs::write(path, updated)?;
			info!(path = %path.display(), "created");
			Ok(WriteOutcome::Created)
		}
		Err(error) => Err(error.into()),
	}
}

/// Resolve every marked region in `content`, replacing the contents of
/// regions whose identifier has a supplied block and copying the rest
/// through untouched. Pure function; the caller decides whether to write.
pub fn replace_regions(
	content: &str,
	leader: &str,
	blocks: &HashMap<String, Vec<String>>,
	file: &str,
) -> FacerResult<String> {
	struct OpenRegion {
		id: String,
		/// Line terminator of the start delimiter line, reused for the
		/// replacement block.
		eol: &'static str,
		/// Original region content, kept when no block is supplied for the
		/// identifier.
		kept: String,
	}

	let mut out = String::with_capacity(content.len());
	let mut open: Option<OpenRegion> = None;

	for line in content.split_inclusive('\n') {
		let logical = line.strip_suffix('\n').unwrap_or(line);
		let logical = logical.strip_suffix('\r').unwrap_or(logical);
		let stripped = logical.trim_start();

		if let Some(mut region) = open.take() {
			if let Some(id) = marker_id(stripped, leader, END_SENTINEL, file)? {
				if id != region.id {
					return Err(FacerError::UnmatchedEndMarker {
						id,
						file: file.to_string(),
					});
				}
				match blocks.get(&id) {
					Some(lines) => {
						for generated in lines {
							out.push_str(generated);
							out.push_str(region.eol);
						}
					}
					None => out.push_str(&region.kept),
				}
				out.push_str(line);
			} else if marker_id(stripped, leader, START_SENTINEL, file)?.is_some() {
				return Err(FacerError::UnmatchedStartMarker {
					id: region.id,
					file: file.to_string(),
				});
			} else {
				region.kept.push_str(line);
				open = Some(region);
			}
			continue;
		}

		if let Some(id) = marker_id(stripped, leader, START_SENTINEL, file)? {
			out.push_str(line);
			open = Some(OpenRegion {
				id,
				eol: if line.ends_with("\r\n") { "\r\n" } else { "\n" },
				kept: String::new(),
			});
			continue;
		}
		if let Some(id) = marker_id(stripped, leader, END_SENTINEL, file)? {
			return Err(FacerError::UnmatchedEndMarker {
				id,
				file: file.to_string(),
			});
		}

		out.push_str(line);
	}

	if let Some(region) = open {
		return Err(FacerError::UnmatchedStartMarker {
			id: region.id,
			file: file.to_string(),
		});
	}

	Ok(out)
}

/// Regenerate the marked regions of a file in place.
pub fn regenerate(
	path: &Path,
	leader: &str,
	blocks: &HashMap<String, Vec<String>>,
) -> FacerResult<WriteOutcome> {
	let original = fs::read_to_string(path)?;
	let updated = replace_regions(&original, leader, blocks, &path.display().to_string())?;
	update_file(path, &updated)
}

/// Out-of-place variant for targets that cannot carry comments: resolve the
/// marked regions of a template file and write the result elsewhere.
pub fn generate(
	template: &Path,
	out_path: &Path,
	leader: &str,
	blocks: &HashMap<String, Vec<String>>,
) -> FacerResult<WriteOutcome> {
	let source = fs::read_to_string(template)?;
	let updated = replace_regions(&source, leader, blocks, &template.display().to_string())?;
	update_file(out_path, &updated)
}

/// Replace the first line whose stripped content starts with `prefix`.
/// Every other byte of the file is left untouched.
pub fn update_line_in_file(
	path: &Path,
	prefix: &str,
	replacement: &str,
) -> FacerResult<WriteOutcome> {
	let original = fs::read_to_string(path)?;
	let mut out = String::with_capacity(original.len());
	let mut replaced = false;

	for line in original.split_inclusive('\n') {
		let logical = line.strip_suffix('\n').unwrap_or(line);
		let logical = logical.strip_suffix('\r').unwrap_or(logical);
		if !replaced && logical.trim().starts_with(prefix) {
			out.push_str(replacement);
			out.push_str(&line[logical.len()..]);
			replaced = true;
		} else {
			out.push_str(line);
		}
	}

	update_file(path, &out)
}

/// Substitute a regular expression in a whole file. A `limit` of zero
/// replaces every match; any other value bounds the number of
/// replacements.
pub fn replace_re_in_file(
	path: &Path,
	pattern: &str,
	replacement: &str,
	limit: usize,
) -> FacerResult<WriteOutcome> {
	let re = regex::Regex::new(pattern)?;
	let original = fs::read_to_string(path)?;
	let updated = re.replacen(&original, limit, replacement);
	update_file(path, updated.as_ref())
}

/// Extract the block identifier from a delimiter line, or `None` when the
/// line is not a delimiter for this sentinel. The identifier is the first
/// token after the sentinel; any trailing prose (or an HTML comment close)
/// is ignored. A delimiter without an identifier is malformed.
fn marker_id(
	stripped: &str,
	leader: &str,
	sentinel: &str,
	file: &str,
) -> FacerResult<Option<String>> {
	let Some(rest) = stripped
		.strip_prefix(leader)
		.and_then(|rest| rest.strip_prefix(sentinel))
	else {
		return Ok(None);
	};
	let rest = rest.trim();
	let rest = rest.strip_suffix("-->").unwrap_or(rest).trim_end();
	match rest.split_whitespace().next() {
		Some(id) => Ok(Some(id.to_string())),
		None => Err(FacerError::MarkerWithoutId {
			file: file.to_string(),
		}),
	}
}
