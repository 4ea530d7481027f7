use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum FacerError {
	#[error(transparent)]
	#[diagnostic(code(facer::io_error))]
	Io(#[from] std::io::Error),

	#[error("malformed interface record at line {line}: {message}")]
	#[diagnostic(
		code(facer::parse),
		help("records look like `fun void AddText=2001(position length, string text)`")
	)]
	Parse { line: usize, message: String },

	#[error("feature `{name}` redefined with a different shape at line {line}")]
	#[diagnostic(
		code(facer::duplicate_feature),
		help("a redefinition may update fields but must keep the original feature type")
	)]
	DuplicateFeature { name: String, line: usize },

	#[error("start marker `{id}` in {file} has no matching end marker")]
	#[diagnostic(
		code(facer::unmatched_start_marker),
		help("close the region with a `--Autogenerated {id}` line")
	)]
	UnmatchedStartMarker { id: String, file: String },

	#[error("end marker `{id}` in {file} has no open start marker")]
	#[diagnostic(
		code(facer::unmatched_end_marker),
		help("open the region with a `++Autogenerated {id}` line before it")
	)]
	UnmatchedEndMarker { id: String, file: String },

	#[error("marker in {file} carries no block identifier")]
	#[diagnostic(
		code(facer::marker_without_id),
		help("name the region after the sentinel, e.g. `//++Autogenerated messages`")
	)]
	MarkerWithoutId { file: String },

	#[error("type `{name}` has no mapping and is not a primitive target type")]
	#[diagnostic(
		code(facer::unmapped_type),
		help("add the type to the interface type table instead of letting it default silently")
	)]
	UnmappedType { name: String },

	#[error("unknown artifact block `{0}`")]
	#[diagnostic(
		code(facer::unknown_block),
		help("available blocks: messages, enumerations, constants, declarations, definitions")
	)]
	UnknownBlock(String),

	#[error("invalid substitution pattern: {0}")]
	#[diagnostic(code(facer::bad_pattern))]
	BadPattern(#[from] regex::Error),

	#[error("failed to load config: {0}")]
	#[diagnostic(
		code(facer::config),
		help("facer.toml needs an [interface] path and at least one [[target]] table")
	)]
	Config(String),
}

pub type FacerResult<T> = Result<T, FacerError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
