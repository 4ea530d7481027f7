use std::collections::BTreeMap;

use crate::FacerError;
use crate::FacerResult;

/// The secondary prefix removed from enumeration member and constant names
/// after the primary prefix strip.
pub const SECONDARY_PREFIX: &str = "SC_";

/// Maps interface-level type tokens to target type tokens. Built once per
/// run and passed explicitly into the emitters.
#[derive(Debug, Clone)]
pub struct TypeMap {
	aliases: BTreeMap<&'static str, &'static str>,
	basic: Vec<&'static str>,
	namespace: &'static str,
}

impl Default for TypeMap {
	fn default() -> Self {
		Self::editor_defaults()
	}
}

impl TypeMap {
	/// The fixed table for the editor's call surface: interface tokens on
	/// the left, target tokens on the right. `bool` and `void` pass through
	/// unchanged.
	pub fn editor_defaults() -> Self {
		let aliases = BTreeMap::from([
			("cells", "const char *"),
			("colour", "Colour"),
			("findtext", "void *"),
			("formatrange", "void *"),
			("int", "int"),
			("keymod", "int"),
			("line", "Line"),
			("pointer", "void *"),
			("position", "Position"),
			("string", "const char *"),
			("stringresult", "char *"),
			("textrange", "void *"),
		]);
		let basic = vec![
			"bool",
			"char *",
			"Colour",
			"const char *",
			"int",
			"intptr_t",
			"Line",
			"Position",
			"void",
			"void *",
		];

		Self {
			aliases,
			basic,
			namespace: "API::",
		}
	}

	/// Map an interface type token to its target token. Unknown tokens pass
	/// through unchanged — enumeration names are already target-shaped.
	pub fn map_type<'a>(&self, token: &'a str) -> &'a str {
		match self.aliases.get(token) {
			Some(&mapped) => mapped,
			None => token,
		}
	}

	/// Whether a target token is one of the primitive target types.
	pub fn is_basic(&self, token: &str) -> bool {
		self.basic.iter().any(|basic| *basic == token)
	}

	/// Reject a type token that has no mapping, is not a primitive target
	/// type, and is not enumeration-shaped. Empty tokens denote an absent
	/// slot and are accepted.
	pub fn check_type(&self, token: &str) -> FacerResult<()> {
		if token.is_empty() || self.aliases.contains_key(token) {
			return Ok(());
		}
		let target = self.map_type(token);
		if self.is_basic(target) || is_enumeration(target) {
			return Ok(());
		}
		Err(FacerError::UnmappedType {
			name: token.to_string(),
		})
	}

	/// The namespace qualifier prepended to enumeration-typed tokens.
	pub fn namespace(&self) -> &str {
		self.namespace
	}
}

/// Whether a target type name denotes an enumeration. This is a coarse
/// first-letter heuristic over the target name, kept exactly as observed:
/// a non-enumeration type starting with an upper-case letter would be
/// misclassified.
pub fn is_enumeration(name: &str) -> bool {
	if matches!(name, "Position" | "Line" | "Colour") {
		return false;
	}
	name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Display-case an identifier: capitalize the first letter of each
/// alphanumeric word, then remove `_` separators except one sitting
/// directly between two digits. The final character is never removed.
///
/// `FOLD_COMMENT` becomes `FoldComment`; `ISO_8859_15` keeps the separator
/// between its digit groups and becomes `Iso8859_15`.
pub fn pascal_case(identifier: &str) -> String {
	let titled = title_case(identifier);
	let chars: Vec<char> = titled.chars().collect();
	let mut out = String::with_capacity(chars.len());

	for (index, &character) in chars.iter().enumerate() {
		if character == '_' && index + 1 < chars.len() {
			let previous_is_digit = index > 0 && chars[index - 1].is_ascii_digit();
			let next_is_digit = chars[index + 1].is_ascii_digit();
			if !(previous_is_digit && next_is_digit) {
				continue;
			}
		}
		out.push(character);
	}

	out
}

/// Capitalize the first letter of each word, where a word boundary is any
/// non-letter character (digits included), and lower-case the rest.
fn title_case(identifier: &str) -> String {
	let mut out = String::with_capacity(identifier.len());
	let mut previous_is_letter = false;

	for character in identifier.chars() {
		if character.is_ascii_alphabetic() {
			if previous_is_letter {
				out.push(character.to_ascii_lowercase());
			} else {
				out.push(character.to_ascii_uppercase());
			}
			previous_is_letter = true;
		} else {
			out.push(character);
			previous_is_letter = false;
		}
	}

	out
}

/// Strip the longest matching candidate prefix from an identifier. When the
/// whole identifier would be removed, it is kept unchanged; otherwise a
/// remainder still starting with [`SECONDARY_PREFIX`] loses that too.
pub fn strip_known_prefix<'a, I>(identifier: &str, candidates: I) -> String
where
	I: IntoIterator<Item = &'a str>,
{
	let mut longest: Option<&str> = None;
	for candidate in candidates {
		if candidate.is_empty() || !identifier.starts_with(candidate) {
			continue;
		}
		if longest.is_none_or(|best| candidate.len() > best.len()) {
			longest = Some(candidate);
		}
	}

	let Some(prefix) = longest else {
		return identifier.to_string();
	};
	let stripped = &identifier[prefix.len()..];
	if stripped.is_empty() {
		return identifier.to_string();
	}
	stripped
		.strip_prefix(SECONDARY_PREFIX)
		.unwrap_or(stripped)
		.to_string()
}
