use std::collections::HashMap;
use std::path::Path;

use crate::FacerError;
use crate::FacerResult;
use crate::lexer::Record;
use crate::lexer::Token;
use crate::lexer::TokenCursor;
use crate::lexer::tokenize;

/// The category tag that excludes a feature from all generated output.
pub const DEPRECATED_CATEGORY: &str = "Deprecated";

/// The closed set of feature kinds an interface description can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeatureType {
	/// `fun` — a plain function.
	Function,
	/// `get` — a property getter.
	Getter,
	/// `set` — a property setter.
	Setter,
	/// `enu` — an enumeration whose value field lists member name prefixes.
	Enumeration,
	/// `val` — a named constant.
	Value,
	/// `evt` — a notification event.
	Event,
	/// `ali` — a deprecated alias record feeding the alias table.
	DeprecatedAlias,
	/// `dep` — an explicitly deprecated feature, never emitted.
	Deprecated,
}

impl FeatureType {
	fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"fun" => Some(Self::Function),
			"get" => Some(Self::Getter),
			"set" => Some(Self::Setter),
			"enu" => Some(Self::Enumeration),
			"val" => Some(Self::Value),
			"evt" => Some(Self::Event),
			"ali" => Some(Self::DeprecatedAlias),
			"dep" => Some(Self::Deprecated),
			_ => None,
		}
	}

	/// Functions, getters and setters share the message-call shape.
	pub fn is_message(self) -> bool {
		matches!(self, Self::Function | Self::Getter | Self::Setter)
	}
}

/// One typed parameter slot of a function-shaped feature. An empty type
/// means the slot is not present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSlot {
	pub param_type: String,
	pub name: String,
}

impl ParamSlot {
	pub fn is_empty(&self) -> bool {
		self.param_type.is_empty()
	}
}

/// One entry of the interface description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
	pub name: String,
	pub feature_type: FeatureType,
	pub return_type: String,
	pub param1: ParamSlot,
	pub param2: ParamSlot,
	/// A numeric literal (kept verbatim) for function-shaped, value and
	/// event features; a space-separated prefix list for enumerations.
	pub value: String,
	pub category: String,
	/// 1-indexed line of the feature's (first) definition.
	pub line: usize,
}

impl Feature {
	/// Deprecated features are excluded from every emitter's output.
	pub fn is_deprecated(&self) -> bool {
		self.category == DEPRECATED_CATEGORY || self.feature_type == FeatureType::Deprecated
	}
}

/// The parsed interface model: an ordered feature sequence with name lookup
/// and the alias table. Immutable once loaded; emission order everywhere is
/// the order of first definition.
#[derive(Debug, Default)]
pub struct Face {
	features: Vec<Feature>,
	index: HashMap<String, usize>,
	aliases: HashMap<String, String>,
}

impl Face {
	pub fn read_from_file(path: &Path) -> FacerResult<Self> {
		let source = std::fs::read_to_string(path)?;
		Self::parse(&source)
	}

	pub fn parse(source: &str) -> FacerResult<Self> {
		let records = tokenize(source)?;
		let mut face = Self::default();
		let mut category = String::new();

		for record in &records {
			let mut cursor = TokenCursor::new(record);
			let tag = cursor.expect_ident("a feature type tag")?;

			if tag == "cat" {
				category = cursor.expect_ident("a category name")?;
				cursor.expect_end()?;
				continue;
			}

			let Some(feature_type) = FeatureType::from_tag(&tag) else {
				return Err(cursor.error(format!("unknown feature type tag `{tag}`")));
			};

			match feature_type {
				FeatureType::Function | FeatureType::Getter | FeatureType::Setter => {
					let feature = parse_signature(&mut cursor, feature_type, &category, record)?;
					face.insert(feature)?;
				}
				FeatureType::Event => {
					let feature = parse_event(&mut cursor, &category, record)?;
					face.insert(feature)?;
				}
				FeatureType::Enumeration => {
					let feature = parse_enumeration(&mut cursor, &category, record)?;
					face.insert(feature)?;
				}
				FeatureType::Value | FeatureType::Deprecated => {
					let name = cursor.expect_ident("a constant name")?;
					cursor.expect(&Token::Equals, "`=`")?;
					let value = cursor.expect_number("a numeric value")?;
					cursor.expect_end()?;
					face.insert(Feature {
						name,
						feature_type,
						return_type: String::new(),
						param1: ParamSlot::default(),
						param2: ParamSlot::default(),
						value,
						category: category.clone(),
						line: record.line,
					})?;
				}
				FeatureType::DeprecatedAlias => {
					let name = cursor.expect_ident("an aliased name")?;
					cursor.expect(&Token::Equals, "`=`")?;
					let short = cursor.expect_ident("a short name")?;
					cursor.expect_end()?;
					face.aliases.insert(name, short);
				}
			}
		}

		Ok(face)
	}

	/// The ordered feature sequence, in order of first definition.
	pub fn features(&self) -> &[Feature] {
		&self.features
	}

	pub fn by_name(&self, name: &str) -> Option<&Feature> {
		self.index.get(name).map(|&slot| &self.features[slot])
	}

	/// The literal short name to use for an enumeration member instead of
	/// its computed prefix-stripped name.
	pub fn alias(&self, name: &str) -> Option<&str> {
		self.aliases.get(name).map(String::as_str)
	}

	pub fn alias_count(&self) -> usize {
		self.aliases.len()
	}

	/// Insert or redefine a feature. A redefinition replaces the earlier
	/// entry's fields but keeps its original position in the sequence;
	/// changing the feature type is an error.
	fn insert(&mut self, feature: Feature) -> FacerResult<()> {
		if let Some(&slot) = self.index.get(&feature.name) {
			if self.features[slot].feature_type != feature.feature_type {
				return Err(FacerError::DuplicateFeature {
					name: feature.name,
					line: feature.line,
				});
			}
			let line = self.features[slot].line;
			self.features[slot] = Feature { line, ..feature };
		} else {
			self.index.insert(feature.name.clone(), self.features.len());
			self.features.push(feature);
		}
		Ok(())
	}
}

/// `<ret> <Name>=<value>(<param1>,<param2>)`
fn parse_signature(
	cursor: &mut TokenCursor<'_>,
	feature_type: FeatureType,
	category: &str,
	record: &Record,
) -> FacerResult<Feature> {
	let return_type = cursor.expect_ident("a return type")?;
	let name = cursor.expect_ident("a feature name")?;
	cursor.expect(&Token::Equals, "`=`")?;
	let value = cursor.expect_number("a numeric value")?;
	cursor.expect(&Token::ParenOpen, "`(`")?;
	let param1 = parse_param(cursor)?;
	let param2 = match cursor.next() {
		Some(Token::Comma) => {
			let slot = parse_param(cursor)?;
			cursor.expect(&Token::ParenClose, "`)`")?;
			slot
		}
		Some(Token::ParenClose) => ParamSlot::default(),
		_ => return Err(cursor.error("expected `,` or `)`")),
	};
	cursor.expect_end()?;

	Ok(Feature {
		name,
		feature_type,
		return_type,
		param1,
		param2,
		value,
		category: category.to_string(),
		line: record.line,
	})
}

/// `<ret> <Name>=<value>(...)` — event parameter lists carry notification
/// fields of any arity and are not part of the call surface, so everything
/// inside the parentheses is accepted and discarded.
fn parse_event(
	cursor: &mut TokenCursor<'_>,
	category: &str,
	record: &Record,
) -> FacerResult<Feature> {
	let return_type = cursor.expect_ident("a return type")?;
	let name = cursor.expect_ident("an event name")?;
	cursor.expect(&Token::Equals, "`=`")?;
	let value = cursor.expect_number("a numeric value")?;
	cursor.expect(&Token::ParenOpen, "`(`")?;
	let mut depth = 1usize;
	while depth > 0 {
		match cursor.next() {
			Some(Token::ParenOpen) => depth += 1,
			Some(Token::ParenClose) => depth -= 1,
			Some(_) => {}
			None => return Err(cursor.error("expected `)`")),
		}
	}
	cursor.expect_end()?;

	Ok(Feature {
		name,
		feature_type: FeatureType::Event,
		return_type,
		param1: ParamSlot::default(),
		param2: ParamSlot::default(),
		value,
		category: category.to_string(),
		line: record.line,
	})
}

/// `<Name>=<prefix> [<prefix> ...]` — the value field is the space-joined
/// prefix list.
fn parse_enumeration(
	cursor: &mut TokenCursor<'_>,
	category: &str,
	record: &Record,
) -> FacerResult<Feature> {
	let name = cursor.expect_ident("an enumeration name")?;
	cursor.expect(&Token::Equals, "`=`")?;
	let mut prefixes = vec![cursor.expect_ident("a member name prefix")?];
	while !cursor.is_done() {
		prefixes.push(cursor.expect_ident("a member name prefix")?);
	}

	Ok(Feature {
		name,
		feature_type: FeatureType::Enumeration,
		return_type: String::new(),
		param1: ParamSlot::default(),
		param2: ParamSlot::default(),
		value: prefixes.join(" "),
		category: category.to_string(),
		line: record.line,
	})
}

/// A parameter slot is `<type> <name>` or empty.
fn parse_param(cursor: &mut TokenCursor<'_>) -> FacerResult<ParamSlot> {
	match cursor.peek() {
		Some(Token::Ident(_)) => {}
		_ => return Ok(ParamSlot::default()),
	}
	let param_type = cursor.expect_ident("a parameter type")?;
	let name = cursor.expect_ident("a parameter name")?;
	Ok(ParamSlot { param_type, name })
}
