use std::collections::HashMap;
use std::path::PathBuf;

use rstest::rstest;
use similar_asserts::assert_eq;

use super::__fixtures::*;
use super::*;
use crate::emit;

fn lines(parts: &[&str]) -> Vec<String> {
	parts.iter().map(|part| (*part).to_string()).collect()
}

// --- Lexer and interface model tests ---

#[test]
fn parse_sample_preserves_order() {
	let face = sample_face();
	let names: Vec<&str> = face
		.features()
		.iter()
		.map(|feature| feature.name.as_str())
		.collect();
	assert_eq!(
		names,
		vec![
			"AddText",
			"GetLength",
			"SetReadOnly",
			"GetText",
			"GetCaretFore",
			"SetFoldLevel",
			"StyleNeeded",
			"WhiteSpace",
			"SCWS_INVISIBLE",
			"SCWS_VISIBLEALWAYS",
			"SCWS_OLDVISIBLE",
			"FindOption",
			"SCFIND_WHOLEWORD",
			"SCFIND_MATCHCASE",
			"SCFIND_FULL_WORD",
			"Lexer",
			"SCLEX_CONTAINER",
			"SC_CURSORNORMAL",
			"INVALID_POSITION",
			"SetStyleBytes",
		]
	);
}

#[test]
fn parse_feature_fields() {
	let face = sample_face();

	let add_text = face.by_name("AddText").expect("AddText parsed");
	assert_eq!(add_text.feature_type, FeatureType::Function);
	assert_eq!(add_text.return_type, "void");
	assert_eq!(add_text.value, "2001");
	assert_eq!(add_text.param1.param_type, "position");
	assert_eq!(add_text.param1.name, "length");
	assert_eq!(add_text.param2.param_type, "string");
	assert_eq!(add_text.param2.name, "text");
	assert_eq!(add_text.category, "Basics");

	let get_length = face.by_name("GetLength").expect("GetLength parsed");
	assert!(get_length.param1.is_empty());
	assert!(get_length.param2.is_empty());

	let find_option = face.by_name("FindOption").expect("FindOption parsed");
	assert_eq!(find_option.feature_type, FeatureType::Enumeration);
	assert_eq!(find_option.value, "SCFIND_ SCFIND_FULL_");

	let deprecated = face.by_name("SetStyleBytes").expect("SetStyleBytes parsed");
	assert!(deprecated.is_deprecated());

	assert_eq!(face.alias("SCFIND_MATCHCASE"), Some("Sensitive"));
	assert_eq!(face.alias("SCFIND_WHOLEWORD"), None);
	assert_eq!(face.alias_count(), 1);
}

#[test]
fn parse_continuation_line() -> FacerResult<()> {
	let face = Face::parse("fun void InsertText=2003(position pos,\n\tstring text)\n")?;
	let feature = face.by_name("InsertText").expect("InsertText parsed");
	assert_eq!(feature.param1.param_type, "position");
	assert_eq!(feature.param2.param_type, "string");
	assert_eq!(feature.param2.name, "text");

	Ok(())
}

#[test]
fn parse_value_spelling_is_verbatim() -> FacerResult<()> {
	let face = Face::parse("val SC_MASK_FOLDERS=0xFE000000\nval INVALID_POSITION=-1\n")?;
	assert_eq!(
		face.by_name("SC_MASK_FOLDERS").map(|f| f.value.as_str()),
		Some("0xFE000000")
	);
	assert_eq!(
		face.by_name("INVALID_POSITION").map(|f| f.value.as_str()),
		Some("-1")
	);

	Ok(())
}

#[test]
fn redefinition_keeps_position_and_updates_fields() -> FacerResult<()> {
	let face = Face::parse("val SCWS_INVISIBLE=0\nval SCWS_VISIBLEALWAYS=1\nval SCWS_INVISIBLE=7\n")?;
	let names: Vec<&str> = face
		.features()
		.iter()
		.map(|feature| feature.name.as_str())
		.collect();
	assert_eq!(names, vec!["SCWS_INVISIBLE", "SCWS_VISIBLEALWAYS"]);
	assert_eq!(
		face.by_name("SCWS_INVISIBLE").map(|f| f.value.as_str()),
		Some("7")
	);

	Ok(())
}

#[test]
fn redefinition_with_different_shape_errors() {
	let result = Face::parse("val STATUS=1\nfun void STATUS=2(,)\n");
	assert!(matches!(
		result,
		Err(FacerError::DuplicateFeature { ref name, line: 2 }) if name == "STATUS"
	));
}

#[rstest]
#[case::unknown_tag("wat void X=1(,)\n")]
#[case::missing_name("fun void =1(,)\n")]
#[case::missing_value("val NAME=abc\n")]
#[case::missing_paren("fun void Broken=12\n")]
#[case::unterminated_params("fun void Broken=12(position pos,\n")]
#[case::stray_input("val NAME=1 !\n")]
fn parse_errors(#[case] source: &str) {
	let result = Face::parse(source);
	assert!(matches!(result, Err(FacerError::Parse { .. })));
}

// --- Type and name mapper tests ---

#[rstest]
#[case("FOLD_COMMENT", "FoldComment")]
#[case("ISO_8859_15", "Iso8859_15")]
#[case("UTF_8", "Utf8")]
#[case("UTF8PROC", "Utf8Proc")]
#[case("fold_comment", "FoldComment")]
#[case("COMMENT", "Comment")]
#[case("X", "X")]
fn pascal_case_transform(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(pascal_case(input), expected);
}

#[rstest]
#[case("SCE_C_COMMENT", &["SCE_C_"], "COMMENT")]
#[case("SC_X", &["SC_X"], "SC_X")]
#[case("SCFIND_FULL_WORD", &["SCFIND_", "SCFIND_FULL_"], "WORD")]
#[case("PREFIX_SC_MAX", &["PREFIX_"], "MAX")]
#[case("FOO", &["BAR_"], "FOO")]
fn strip_known_prefix_cases(
	#[case] identifier: &str,
	#[case] candidates: &[&str],
	#[case] expected: &str,
) {
	assert_eq!(
		strip_known_prefix(identifier, candidates.iter().copied()),
		expected
	);
}

#[rstest]
#[case("FoldLevel", true)]
#[case("Position", false)]
#[case("Line", false)]
#[case("Colour", false)]
#[case("int", false)]
#[case("", false)]
fn enumeration_heuristic(#[case] name: &str, #[case] expected: bool) {
	assert_eq!(is_enumeration(name), expected);
}

#[test]
fn map_type_table_and_fallback() {
	let types = TypeMap::editor_defaults();
	assert_eq!(types.map_type("position"), "Position");
	assert_eq!(types.map_type("stringresult"), "char *");
	assert_eq!(types.map_type("string"), "const char *");
	assert_eq!(types.map_type("FoldLevel"), "FoldLevel");
	assert!(types.is_basic("void *"));
	assert!(!types.is_basic("FoldLevel"));
}

#[test]
fn unmapped_type_is_surfaced() {
	let types = TypeMap::editor_defaults();
	assert!(types.check_type("position").is_ok());
	assert!(types.check_type("FoldLevel").is_ok());
	assert!(types.check_type("").is_ok());
	assert!(matches!(
		types.check_type("mystery"),
		Err(FacerError::UnmappedType { ref name }) if name == "mystery"
	));
}

// --- Emitter tests ---

#[test]
fn messages_emitter() {
	let face = sample_face();
	assert_eq!(
		emit::messages(&face),
		lines(&[
			"enum class Message {",
			"\tAddText = 2001,",
			"\tGetLength = 2006,",
			"\tSetReadOnly = 2171,",
			"\tGetText = 2182,",
			"\tGetCaretFore = 2138,",
			"\tSetFoldLevel = 2222,",
			"};",
		])
	);
}

#[test]
fn enumerations_emitter() {
	let face = sample_face();
	assert_eq!(
		emit::enumerations(&face),
		lines(&[
			"",
			"enum class WhiteSpace {",
			"\tInvisible = 0,",
			"\tVisiblealways = 1,",
			"};",
			"",
			"enum class FindOption {",
			"\tWholeword = 2,",
			"\tSensitive = 4,",
			"\tWord = 8,",
			"};",
			"",
			"enum class Notification {",
			"\tStyleNeeded = 2000,",
			"};",
		])
	);
}

#[test]
fn constants_emitter() {
	let face = sample_face();
	assert_eq!(
		emit::constants(&face),
		lines(&[
			"constexpr int Cursornormal = -1;",
			"constexpr int InvalidPosition = -1;",
		])
	);
}

#[test]
fn declarations_emitter() -> FacerResult<()> {
	let face = sample_face();
	let types = TypeMap::editor_defaults();
	assert_eq!(
		emit::declarations(&face, &types)?,
		lines(&[
			"\tvoid AddText(Position length, const char *text);",
			"\tPosition Length();",
			"\tvoid SetReadOnly(bool readOnly);",
			"\tint Text(Position length, char *text);",
			"\tstd::string Text(Position length);",
			"\tColour CaretFore();",
			"\tvoid SetFoldLevel(Line line, API::FoldLevel level);",
		])
	);

	Ok(())
}

#[test]
fn definitions_emitter() -> FacerResult<()> {
	let face = sample_face();
	let types = TypeMap::editor_defaults();
	assert_eq!(
		emit::definitions(&face, &types)?,
		lines(&[
			"void EditorCall::AddText(Position length, const char *text) {",
			"\tCallString(Message::AddText, length, text);",
			"}",
			"",
			"Position EditorCall::Length() {",
			"\treturn Call(Message::GetLength);",
			"}",
			"",
			"void EditorCall::SetReadOnly(bool readOnly) {",
			"\tCall(Message::SetReadOnly, readOnly);",
			"}",
			"",
			"int EditorCall::Text(Position length, char *text) {",
			"\treturn static_cast<int>(CallPointer(Message::GetText, length, text));",
			"}",
			"",
			"std::string EditorCall::Text(Position length) {",
			"\treturn CallReturnString(Message::GetText, length);",
			"}",
			"",
			"Colour EditorCall::CaretFore() {",
			"\treturn static_cast<Colour>(Call(Message::GetCaretFore));",
			"}",
			"",
			"void EditorCall::SetFoldLevel(Line line, API::FoldLevel level) {",
			"\tCall(Message::SetFoldLevel, line, static_cast<intptr_t>(level));",
			"}",
			"",
		])
	);

	Ok(())
}

#[test]
fn stringresult_call_scenario() -> FacerResult<()> {
	let face = Face::parse("fun int SCI_GETTEXT=2182(int length, stringresult text)\n")?;
	let types = TypeMap::editor_defaults();

	assert_eq!(
		emit::declarations(&face, &types)?,
		lines(&[
			"\tint SCI_GETTEXT(int length, char *text);",
			"\tstd::string SCI_GETTEXT(int length);",
		])
	);
	assert_eq!(
		emit::definitions(&face, &types)?,
		lines(&[
			"int EditorCall::SCI_GETTEXT(int length, char *text) {",
			"\treturn static_cast<int>(CallPointer(Message::SCI_GETTEXT, length, text));",
			"}",
			"",
			"std::string EditorCall::SCI_GETTEXT(int length) {",
			"\treturn CallReturnString(Message::SCI_GETTEXT, length);",
			"}",
			"",
		])
	);

	Ok(())
}

#[test]
fn deprecated_features_never_emitted() -> FacerResult<()> {
	let face = sample_face();
	let types = TypeMap::editor_defaults();

	let everything = [
		emit::messages(&face),
		emit::enumerations(&face),
		emit::constants(&face),
		emit::declarations(&face, &types)?,
		emit::definitions(&face, &types)?,
	]
	.concat()
	.join("\n");

	assert!(!everything.contains("SetStyleBytes"));
	// Deprecated even though SCWS_ is in WhiteSpace's prefix list.
	assert!(!everything.contains("Oldvisible"));

	Ok(())
}

#[test]
fn unmapped_parameter_type_fails_generation() -> FacerResult<()> {
	let face = Face::parse("fun void Store=900(mystery thing,)\n")?;
	let types = TypeMap::editor_defaults();
	assert!(matches!(
		emit::declarations(&face, &types),
		Err(FacerError::UnmappedType { ref name }) if name == "mystery"
	));
	assert!(matches!(
		emit::definitions(&face, &types),
		Err(FacerError::UnmappedType { .. })
	));

	Ok(())
}

// --- Patcher tests ---

fn messages_blocks() -> HashMap<String, Vec<String>> {
	HashMap::from([(
		"messages".to_string(),
		lines(&["enum class Message {", "\tFoo = 1,", "};"]),
	)])
}

#[test]
fn replace_regions_isolates_marked_content() -> FacerResult<()> {
	let updated = replace_regions(MESSAGES_TARGET, "//", &messages_blocks(), "test.h")?;
	assert_eq!(
		updated,
		"// Hand-written header  \t\n\
		 #pragma once\n\
		 \n\
		 //++Autogenerated messages\n\
		 enum class Message {\n\
		 \tFoo = 1,\n\
		 };\n\
		 //--Autogenerated messages\n\
		 \n\
		 // Hand-written footer\t \n"
	);

	Ok(())
}

#[test]
fn replace_regions_resolves_multiple_ids_independently() -> FacerResult<()> {
	let content = "\
//++Autogenerated alpha
old a
//--Autogenerated alpha
middle
//++Autogenerated beta
old b
//--Autogenerated beta
";
	let blocks = HashMap::from([
		("alpha".to_string(), lines(&["new a"])),
		("beta".to_string(), lines(&["new b1", "new b2"])),
	]);
	let updated = replace_regions(content, "//", &blocks, "test.h")?;
	assert_eq!(
		updated,
		"\
//++Autogenerated alpha
new a
//--Autogenerated alpha
middle
//++Autogenerated beta
new b1
new b2
//--Autogenerated beta
"
	);

	Ok(())
}

#[test]
fn replace_regions_keeps_region_without_supplied_block() -> FacerResult<()> {
	let content = "//++Autogenerated other\nkept as is\n//--Autogenerated other\n";
	let updated = replace_regions(content, "//", &HashMap::new(), "test.h")?;
	assert_eq!(updated, content);

	Ok(())
}

#[test]
fn replace_regions_reuses_crlf_line_endings() -> FacerResult<()> {
	let content = "top\r\n//++Autogenerated ids\r\nold\r\n//--Autogenerated ids\r\nbottom\r\n";
	let blocks = HashMap::from([("ids".to_string(), lines(&["a", "b"]))]);
	let updated = replace_regions(content, "//", &blocks, "test.h")?;
	assert_eq!(
		updated,
		"top\r\n//++Autogenerated ids\r\na\r\nb\r\n//--Autogenerated ids\r\nbottom\r\n"
	);

	Ok(())
}

#[test]
fn replace_regions_accepts_trailing_prose_and_html_leaders() -> FacerResult<()> {
	let content = "\
<!--++Autogenerated props -- regenerated, do not edit -->
old
<!----Autogenerated props -->
";
	let blocks = HashMap::from([("props".to_string(), lines(&["<tr><td>x</td></tr>"]))]);
	let updated = replace_regions(content, "<!--", &blocks, "doc.html")?;
	assert_eq!(
		updated,
		"\
<!--++Autogenerated props -- regenerated, do not edit -->
<tr><td>x</td></tr>
<!----Autogenerated props -->
"
	);

	Ok(())
}

#[rstest]
#[case::start_without_end("//++Autogenerated a\ncontent\n")]
#[case::nested_start("//++Autogenerated a\n//++Autogenerated b\n//--Autogenerated a\n")]
fn unmatched_start_marker_errors(#[case] content: &str) {
	let result = replace_regions(content, "//", &HashMap::new(), "test.h");
	assert!(matches!(
		result,
		Err(FacerError::UnmatchedStartMarker { .. })
	));
}

#[rstest]
#[case::end_without_start("//--Autogenerated a\n")]
#[case::mismatched_end("//++Autogenerated a\n//--Autogenerated b\n")]
fn unmatched_end_marker_errors(#[case] content: &str) {
	let result = replace_regions(content, "//", &HashMap::new(), "test.h");
	assert!(matches!(result, Err(FacerError::UnmatchedEndMarker { .. })));
}

#[test]
fn marker_without_identifier_errors() {
	let result = replace_regions(
		"//++Autogenerated\n//--Autogenerated\n",
		"//",
		&HashMap::new(),
		"test.h",
	);
	assert!(matches!(result, Err(FacerError::MarkerWithoutId { .. })));
}

#[test]
fn update_file_suppresses_no_op_writes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("out.h");

	assert_eq!(update_file(&path, "content\n")?, WriteOutcome::Created);
	assert_eq!(update_file(&path, "content\n")?, WriteOutcome::Unchanged);
	assert_eq!(update_file(&path, "changed\n")?, WriteOutcome::Changed);
	assert_eq!(std::fs::read_to_string(&path)?, "changed\n");

	Ok(())
}

#[test]
fn regenerate_is_idempotent() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("messages.h");
	std::fs::write(&path, MESSAGES_TARGET)?;

	let first = regenerate(&path, "//", &messages_blocks())?;
	assert_eq!(first, WriteOutcome::Changed);
	let second = regenerate(&path, "//", &messages_blocks())?;
	assert_eq!(second, WriteOutcome::Unchanged);

	Ok(())
}

#[test]
fn update_line_replaces_first_match_only() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("version.h");
	std::fs::write(
		&path,
		"#define VERSION \"1.0\"\n#define VERSION_WORDS 1, 0\n#define VERSION \"1.0\"\n",
	)?;

	let outcome = update_line_in_file(&path, "#define VERSION ", "#define VERSION \"2.0\"")?;
	assert_eq!(outcome, WriteOutcome::Changed);
	assert_eq!(
		std::fs::read_to_string(&path)?,
		"#define VERSION \"2.0\"\n#define VERSION_WORDS 1, 0\n#define VERSION \"1.0\"\n"
	);

	let outcome = update_line_in_file(&path, "#define VERSION ", "#define VERSION \"2.0\"")?;
	assert_eq!(outcome, WriteOutcome::Unchanged);

	Ok(())
}

#[test]
fn replace_re_bounds_replacements() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("download.html");
	std::fs::write(&path, "editor100.zip and editor100.tgz\n")?;

	let outcome = replace_re_in_file(&path, r"editor\d+", "editor200", 1)?;
	assert_eq!(outcome, WriteOutcome::Changed);
	assert_eq!(
		std::fs::read_to_string(&path)?,
		"editor200.zip and editor100.tgz\n"
	);

	let outcome = replace_re_in_file(&path, r"editor\d+", "editor200", 0)?;
	assert_eq!(outcome, WriteOutcome::Changed);
	assert_eq!(
		std::fs::read_to_string(&path)?,
		"editor200.zip and editor200.tgz\n"
	);

	let outcome = replace_re_in_file(&path, r"editor\d+", "editor200", 0)?;
	assert_eq!(outcome, WriteOutcome::Unchanged);

	Ok(())
}

#[test]
fn replace_re_rejects_bad_pattern() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("any.txt");
	std::fs::write(&path, "content\n")?;

	let result = replace_re_in_file(&path, "(", "x", 1);
	assert!(matches!(result, Err(FacerError::BadPattern(_))));

	Ok(())
}

// --- Engine tests ---

fn sample_config() -> FacerConfig {
	FacerConfig {
		interface: InterfaceConfig {
			path: PathBuf::from("editor.iface"),
		},
		targets: vec![TargetConfig {
			path: PathBuf::from("EditorMessages.h"),
			leader: "//".to_string(),
			blocks: vec!["messages".to_string()],
			template: None,
		}],
	}
}

#[test]
fn engine_check_then_regenerate_then_idempotent() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("editor.iface"), SAMPLE_IFACE)?;
	std::fs::write(tmp.path().join("EditorMessages.h"), MESSAGES_TARGET)?;
	let config = sample_config();

	let check = check_targets(tmp.path(), &config)?;
	assert_eq!(check.stale.len(), 1);
	assert!(!check.is_ok());

	let report = regenerate_all(tmp.path(), &config)?;
	assert_eq!(report.changed, vec![PathBuf::from("EditorMessages.h")]);
	assert!(report.is_ok());

	let second = regenerate_all(tmp.path(), &config)?;
	assert!(second.changed.is_empty());
	assert_eq!(second.unchanged, vec![PathBuf::from("EditorMessages.h")]);

	let check = check_targets(tmp.path(), &config)?;
	assert!(check.is_ok());

	let written = std::fs::read_to_string(tmp.path().join("EditorMessages.h"))?;
	assert!(written.starts_with("// Hand-written header  \t\n"));
	assert!(written.ends_with("// Hand-written footer\t \n"));
	assert!(written.contains("\tSetFoldLevel = 2222,"));

	Ok(())
}

#[test]
fn engine_accumulates_failures_and_continues() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("editor.iface"), SAMPLE_IFACE)?;
	std::fs::write(tmp.path().join("EditorMessages.h"), MESSAGES_TARGET)?;

	let mut config = sample_config();
	config.targets.insert(
		0,
		TargetConfig {
			path: PathBuf::from("Bogus.h"),
			leader: "//".to_string(),
			blocks: vec!["bogus".to_string()],
			template: None,
		},
	);
	config.targets.push(TargetConfig {
		path: PathBuf::from("Missing.h"),
		leader: "//".to_string(),
		blocks: vec!["messages".to_string()],
		template: None,
	});

	let report = regenerate_all(tmp.path(), &config)?;
	assert_eq!(report.failures.len(), 2);
	assert!(matches!(
		report.failures[0].error,
		FacerError::UnknownBlock(_)
	));
	assert!(matches!(report.failures[1].error, FacerError::Io(_)));
	assert_eq!(report.changed, vec![PathBuf::from("EditorMessages.h")]);

	Ok(())
}

#[test]
fn engine_generates_template_targets_out_of_place() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("editor.iface"), SAMPLE_IFACE)?;
	std::fs::write(
		tmp.path().join("editor.mak.in"),
		"#++Autogenerated messages\n#--Autogenerated messages\n",
	)?;

	let config = FacerConfig {
		interface: InterfaceConfig {
			path: PathBuf::from("editor.iface"),
		},
		targets: vec![TargetConfig {
			path: PathBuf::from("editor.mak"),
			leader: "#".to_string(),
			blocks: vec!["messages".to_string()],
			template: Some(PathBuf::from("editor.mak.in")),
		}],
	};

	let check = check_targets(tmp.path(), &config)?;
	assert_eq!(check.stale.len(), 1);

	let report = regenerate_all(tmp.path(), &config)?;
	assert_eq!(report.changed, vec![PathBuf::from("editor.mak")]);
	let written = std::fs::read_to_string(tmp.path().join("editor.mak"))?;
	assert!(written.contains("enum class Message {"));

	let check = check_targets(tmp.path(), &config)?;
	assert!(check.is_ok());

	Ok(())
}

// --- Config tests ---

#[test]
fn config_loads_from_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("facer.toml"),
		"\
[interface]
path = \"editor.iface\"

[[target]]
path = \"src/EditorMessages.h\"
blocks = [\"messages\"]

[[target]]
path = \"src/EditorTypes.h\"
leader = \"//\"
blocks = [\"enumerations\", \"constants\"]
",
	)?;

	let config = FacerConfig::load(tmp.path())?;
	assert_eq!(config.interface.path, PathBuf::from("editor.iface"));
	assert_eq!(config.targets.len(), 2);
	assert_eq!(config.targets[0].leader, "//");
	assert_eq!(
		config.targets[1].blocks,
		vec!["enumerations".to_string(), "constants".to_string()]
	);

	Ok(())
}

#[test]
fn config_missing_is_an_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let result = FacerConfig::load(tmp.path());
	assert!(matches!(result, Err(FacerError::Config(_))));

	Ok(())
}
