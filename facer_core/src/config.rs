use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::FacerError;
use crate::FacerResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["facer.toml", ".facer.toml"];

/// Configuration loaded from a `facer.toml` file.
///
/// ```toml
/// [interface]
/// path = "include/Editor.iface"
///
/// [[target]]
/// path = "src/EditorMessages.h"
/// blocks = ["messages"]
///
/// [[target]]
/// path = "src/EditorTypes.h"
/// blocks = ["enumerations", "constants"]
///
/// [[target]]
/// path = "win32/editor.mak"
/// template = "win32/editor.mak.in"
/// leader = "#"
/// blocks = ["messages"]
/// ```
#[derive(Debug, Deserialize)]
pub struct FacerConfig {
	/// The interface description driving every artifact.
	pub interface: InterfaceConfig,
	/// Target files, patched in declaration order.
	#[serde(rename = "target", default)]
	pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Deserialize)]
pub struct InterfaceConfig {
	/// Path of the `.iface` file, relative to the project root.
	pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
	/// The file to write, relative to the project root.
	pub path: PathBuf,
	/// Comment leader of the target's language, prepended to the marker
	/// sentinels.
	#[serde(default = "default_leader")]
	pub leader: String,
	/// Artifact blocks available to this target's marked regions:
	/// `messages`, `enumerations`, `constants`, `declarations`,
	/// `definitions`.
	pub blocks: Vec<String>,
	/// When set, marked regions are read from this template instead of the
	/// target itself and the result is written out-of-place. For targets
	/// whose format cannot retain comments.
	#[serde(default)]
	pub template: Option<PathBuf>,
}

fn default_leader() -> String {
	"//".to_string()
}

impl FacerConfig {
	/// Load configuration from the first candidate found under `root`.
	pub fn load(root: &Path) -> FacerResult<Self> {
		for candidate in CONFIG_FILE_CANDIDATES {
			let path = root.join(candidate);
			if !path.is_file() {
				continue;
			}
			let text = std::fs::read_to_string(&path)?;
			return toml::from_str(&text).map_err(|error| FacerError::Config(error.to_string()));
		}
		Err(FacerError::Config(format!(
			"no facer.toml found in {}",
			root.display()
		)))
	}
}
