//! Artifact emitters. Each one walks the ordered feature sequence, skips
//! deprecated entries, and produces the line block for one marked region.
//! All of them are deterministic functions of the interface model.

use crate::FacerResult;
use crate::face::Face;
use crate::face::Feature;
use crate::face::FeatureType;
use crate::types::SECONDARY_PREFIX;
use crate::types::TypeMap;
use crate::types::is_enumeration;
use crate::types::pascal_case;
use crate::types::strip_known_prefix;

/// The enumeration reserved for the non-portable legacy lexer selection;
/// it is not part of the generated API surface.
const LEGACY_ENUMERATION: &str = "Lexer";

/// Prefixes whose constants are allocated elsewhere (lexical styles,
/// message numbers, command notifications) and never become plain
/// constants.
const BUILTIN_PREFIXES: [&str; 3] = ["SCE_", "SCI_", "SCEN_"];

/// The generated wrapper class that carries the accessor definitions.
const CALL_CLASS: &str = "EditorCall";

/// One line per function, getter and setter, in encounter order. Ordinal
/// values pass through verbatim: gaps and non-monotonic values in the
/// source are preserved.
pub fn messages(face: &Face) -> Vec<String> {
	let mut out = vec!["enum class Message {".to_string()];
	for feature in live(face) {
		if feature.feature_type.is_message() {
			out.push(format!("\t{} = {},", feature.name, feature.value));
		}
	}
	out.push("};".to_string());
	out
}

/// One `enum class` block per enumeration plus the trailing notification
/// block for events. Members are the value features captured by the
/// enumeration's declared prefixes; when a name matches several prefixes
/// the last one in declaration order wins.
pub fn enumerations(face: &Face) -> Vec<String> {
	let mut out = Vec::new();

	for feature in live(face) {
		if feature.feature_type != FeatureType::Enumeration || feature.name == LEGACY_ENUMERATION {
			continue;
		}
		let prefixes: Vec<&str> = feature.value.split_whitespace().collect();

		out.push(String::new());
		out.push(format!("enum class {} {{", feature.name));
		for member in live(face) {
			if member.feature_type != FeatureType::Value {
				continue;
			}
			let Some(matched) = last_matching_prefix(&member.name, &prefixes) else {
				continue;
			};
			let member_name = match face.alias(&member.name) {
				Some(short) => short.to_string(),
				None => strip_known_prefix(&member.name, [matched]),
			};
			out.push(format!(
				"\t{} = {},",
				pascal_case(&member_name),
				member.value
			));
		}
		out.push("};".to_string());
	}

	out.push(String::new());
	out.push("enum class Notification {".to_string());
	for feature in live(face) {
		if feature.feature_type == FeatureType::Event {
			out.push(format!("\t{} = {},", feature.name, feature.value));
		}
	}
	out.push("};".to_string());

	out
}

/// The global secondary block: constants not captured by any enumeration's
/// prefix set nor by the built-in prefixes.
pub fn constants(face: &Face) -> Vec<String> {
	let mut all_prefixes: Vec<&str> = BUILTIN_PREFIXES.to_vec();
	for feature in live(face) {
		if feature.feature_type == FeatureType::Enumeration {
			all_prefixes.extend(feature.value.split_whitespace());
		}
	}

	let mut out = Vec::new();
	for feature in live(face) {
		if feature.feature_type != FeatureType::Value {
			continue;
		}
		if all_prefixes
			.iter()
			.any(|prefix| feature.name.starts_with(prefix))
		{
			continue;
		}
		let name = feature
			.name
			.strip_prefix(SECONDARY_PREFIX)
			.unwrap_or(&feature.name);
		if name.trim_end_matches('_').is_empty() {
			continue;
		}
		out.push(format!(
			"constexpr int {} = {};",
			pascal_case(name),
			feature.value
		));
	}
	out
}

/// Accessor-method declarations: one per function, getter and setter, with
/// the extra owned-text overload for `stringresult` calls.
pub fn declarations(face: &Face, types: &TypeMap) -> FacerResult<Vec<String>> {
	let mut out = Vec::new();
	for feature in live(face) {
		if !feature.feature_type.is_message() {
			continue;
		}
		check_feature_types(feature, types)?;
		let name = method_name(feature);

		let mut ret_type = types.map_type(&feature.return_type).to_string();
		if is_enumeration(&ret_type) {
			ret_type = format!("{}{ret_type}", types.namespace());
		}
		let shape = call_shape(feature, types);

		out.push(format!(
			"\t{}({});",
			join_type_and_identifier(&ret_type, name),
			shape.parameters
		));

		if feature.param2.param_type == "stringresult" {
			out.push(format!(
				"\t{}({});",
				join_type_and_identifier("std::string", name),
				except_last(&shape.parameters)
			));
		}
	}
	Ok(out)
}

/// Accessor-method definitions: full bodies marshalling every call through
/// one of the generic call primitives, with the owned-text overload routed
/// through the text-result primitive.
pub fn definitions(face: &Face, types: &TypeMap) -> FacerResult<Vec<String>> {
	let mut out = Vec::new();
	for feature in live(face) {
		if !feature.feature_type.is_message() {
			continue;
		}
		check_feature_types(feature, types)?;
		let message_name = format!("Message::{}", feature.name);
		let name = method_name(feature);

		let ret_type = types.map_type(&feature.return_type).to_string();
		let shape = call_shape(feature, types);
		let return_if_needed = if ret_type == "void" { "" } else { "return " };

		out.push(format!(
			"{}({}) {{",
			join_type_and_identifier(&ret_type, &format!("{CALL_CLASS}::{name}")),
			shape.parameters
		));

		let (ret_cast, ret_cast_end) = return_casts(&ret_type, types);
		out.push(format!(
			"\t{return_if_needed}{ret_cast}{}({message_name}{}){ret_cast_end};",
			shape.call_name, shape.args
		));
		out.push("}".to_string());
		out.push(String::new());

		if feature.param2.param_type == "stringresult" {
			out.push(format!(
				"{}({}) {{",
				join_type_and_identifier("std::string", &format!("{CALL_CLASS}::{name}")),
				except_last(&shape.parameters)
			));
			out.push(format!(
				"\treturn CallReturnString({message_name}{});",
				except_last(&shape.args)
			));
			out.push("}".to_string());
			out.push(String::new());
		}
	}
	Ok(out)
}

/// The declaration parameter list, call-site argument list and generic call
/// primitive chosen for one feature.
struct CallShape {
	parameters: String,
	/// Includes the leading `", "` separator when any argument is present,
	/// so it splices directly after the message name.
	args: String,
	call_name: &'static str,
}

/// Build the parameter and argument lists for a feature's up-to-two slots.
/// Pointer-shaped first arguments are reinterpreted to the primitive's
/// unsigned word, non-primitive ones narrowed; second arguments select the
/// primitive (`Call` / `CallPointer` / `CallString`) and pointer values
/// pass through raw. An absent first argument becomes a literal `0`
/// placeholder when a second argument exists.
fn call_shape(feature: &Feature, types: &TypeMap) -> CallShape {
	let mut parameters = String::new();
	let mut args = String::new();
	let mut call_name = "Call";

	let param1 = &feature.param1;
	let param1_type = types.map_type(&param1.param_type);
	if !param1_type.is_empty() {
		let mut cast_name = param1.name.clone();
		if param1_type.ends_with('*') {
			cast_name = format!("reinterpret_cast<uintptr_t>({})", param1.name);
		} else if !types.is_basic(param1_type) {
			cast_name = format!("static_cast<uintptr_t>({})", param1.name);
		}
		let param1_type = qualify(param1_type, &param1.param_type, types);
		parameters = join_type_and_identifier(&param1_type, &param1.name);
		args = cast_name;
	}

	let param2 = &feature.param2;
	let param2_type = types.map_type(&param2.param_type);
	if !param2_type.is_empty() {
		let mut cast_name = param2.name.clone();
		if param2_type.ends_with('*') {
			call_name = if param2_type == "const char *" {
				"CallString"
			} else {
				"CallPointer"
			};
		} else if !types.is_basic(param2_type) {
			cast_name = format!("static_cast<intptr_t>({})", param2.name);
		}
		let param2_type = qualify(param2_type, &param2.param_type, types);
		let param2_arg = join_type_and_identifier(&param2_type, &param2.name);
		if !parameters.is_empty() {
			parameters.push_str(", ");
		}
		parameters.push_str(&param2_arg);
		if args.is_empty() {
			args.push('0');
		}
		args.push_str(", ");
		args.push_str(&cast_name);
	}

	if !args.is_empty() {
		args = format!(", {args}");
	}

	CallShape {
		parameters,
		args,
		call_name,
	}
}

/// Qualify an enumeration-typed token with the API namespace. The heuristic
/// looks at the interface-level token so mapped primitives like `position`
/// stay unqualified.
fn qualify(target: &str, base: &str, types: &TypeMap) -> String {
	if is_enumeration(base) {
		format!("{}{target}", types.namespace())
	} else {
		target.to_string()
	}
}

/// Getter names drop their leading `Get` in the method name; the underlying
/// message keeps the full feature name.
fn method_name(feature: &Feature) -> &str {
	if feature.feature_type == FeatureType::Getter {
		feature.name.strip_prefix("Get").unwrap_or(&feature.name)
	} else {
		&feature.name
	}
}

/// Cast the primitive's return word back to the declared return type:
/// reinterpreting for pointer-shaped returns, narrowing otherwise.
fn return_casts(ret_type: &str, types: &TypeMap) -> (String, &'static str) {
	if !types.is_basic(ret_type) || ret_type == "int" || ret_type == "Colour" {
		let qualified = if is_enumeration(ret_type) {
			format!("{}{ret_type}", types.namespace())
		} else {
			ret_type.to_string()
		};
		(format!("static_cast<{qualified}>("), ")")
	} else if ret_type == "void *" {
		(format!("reinterpret_cast<{ret_type}>("), ")")
	} else {
		(String::new(), "")
	}
}

/// Add a space between type and identifier unless the type is a pointer.
fn join_type_and_identifier(type_name: &str, identifier: &str) -> String {
	if type_name.ends_with('*') {
		format!("{type_name}{identifier}")
	} else {
		format!("{type_name} {identifier}")
	}
}

/// Drop everything from the last comma on — used to remove the trailing
/// `stringresult` parameter from the overload's lists.
fn except_last(list: &str) -> &str {
	match list.rfind(',') {
		Some(index) => &list[..index],
		None => "",
	}
}

/// Surface unmapped type tokens instead of letting them corrupt generated
/// signatures.
fn check_feature_types(feature: &Feature, types: &TypeMap) -> FacerResult<()> {
	types.check_type(&feature.return_type)?;
	types.check_type(&feature.param1.param_type)?;
	types.check_type(&feature.param2.param_type)?;
	Ok(())
}

/// The last prefix in declaration order that matches, reproducing the
/// observed tie-break for overlapping prefixes.
fn last_matching_prefix<'a>(name: &str, prefixes: &[&'a str]) -> Option<&'a str> {
	let mut matched = None;
	for prefix in prefixes {
		if name.starts_with(prefix) {
			matched = Some(*prefix);
		}
	}
	matched
}

/// Non-deprecated features in order of first definition.
fn live(face: &Face) -> impl Iterator<Item = &Feature> {
	face.features()
		.iter()
		.filter(|feature| !feature.is_deprecated())
}
