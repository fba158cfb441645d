use splice_compose::headless::StaticContributor;
use splice_compose::{ContributorId, ItemSnapshot};
use splice_descriptor::ContainerDecl;

use crate::common::{Engine, assert_mirrored, engine, is_pristine};

const SHELL: &str = r#"{
	"kind": "gui",
	"children": [
		{ "type": "container", "kind": "menu", "identity": "file", "children": [
			{ "type": "entry", "name": "open" },
			{ "type": "merge", "name": "plugins" },
			{ "type": "separator" },
			{ "type": "entry", "name": "quit" }
		] },
		{ "type": "container", "kind": "menu", "identity": "edit", "children": [
			{ "type": "entry", "name": "undo" },
			{ "type": "define_group", "name": "clipboard" },
			{ "type": "entry", "name": "redo" }
		] },
		{ "type": "merge" }
	]
}"#;

const EXPORTER: &str = r#"{
	"kind": "gui",
	"children": [
		{ "type": "container", "kind": "menu", "identity": "file", "children": [
			{ "type": "merge", "name": "plugins" },
			{ "type": "entry", "name": "export_pdf" },
			{ "type": "entry", "name": "export_png" }
		] },
		{ "type": "container", "kind": "menu", "identity": "edit", "children": [
			{ "type": "entry", "name": "copy_as", "group": "clipboard" }
		] },
		{ "type": "container", "kind": "menu", "identity": "export", "children": [
			{ "type": "entry", "name": "settings" }
		] }
	]
}"#;

const SPELL: &str = r#"{
	"kind": "gui",
	"children": [
		{ "type": "container", "kind": "menu", "identity": "tools", "children": [
			{ "type": "entry", "name": "spellcheck" },
			{ "type": "action_list", "name": "dictionaries" }
		] }
	]
}"#;

fn load(id: &str, json: &str) -> StaticContributor {
	let descriptor: ContainerDecl = serde_json::from_str(json).expect("descriptor parses");
	assert!(descriptor.problems().is_empty(), "{id} descriptor has problems");
	StaticContributor::new(id, descriptor)
}

fn names<'a>(engine: &'a Engine, identity: &str) -> Vec<&'a str> {
	let handle = engine.find_container(identity, None).expect("container exists");
	engine.builder().entry_names(handle)
}

fn top_level(engine: &Engine) -> Vec<String> {
	engine
		.snapshot()
		.root
		.items
		.iter()
		.filter_map(|item| match item {
			ItemSnapshot::Container { identity, .. } => identity.clone(),
			_ => None,
		})
		.collect()
}

#[test]
fn shell_outline_is_stable() {
	let shell = load("shell", SHELL);
	let mut engine = engine();
	engine.add_contributor(&shell);

	let expected = [
		"root next=2 merge:<default>@2",
		"  menu[file] next=3 owner=shell merge:plugins@1",
		"    - open (shell)",
		"    --- (shell)",
		"    - quit (shell)",
		"  menu[edit] next=2 owner=shell group:clipboard@1",
		"    - undo (shell)",
		"    - redo (shell)",
		"",
	]
	.join("\n");
	pretty_assertions::assert_eq!(engine.snapshot().to_string(), expected);
}

#[test]
fn plugins_merge_into_the_shell_and_leave_it_intact() {
	let shell = load("shell", SHELL);
	let exporter = load("exporter", EXPORTER);
	let spell = load("spell", SPELL);
	let mut engine = engine();

	engine.add_contributor(&shell);
	engine.add_contributor(&exporter);
	engine.add_contributor(&spell);
	engine
		.plug_action_list(&ContributorId::new("spell"), "dictionaries", vec!["en".into(), "de".into()])
		.expect("spell is attached");

	assert_eq!(names(&engine, "file"), ["open", "export_pdf", "export_png", "quit"]);
	assert_eq!(names(&engine, "edit"), ["undo", "copy_as", "redo"]);
	assert_eq!(names(&engine, "export"), ["settings"]);
	assert_eq!(names(&engine, "tools"), ["spellcheck", "en", "de"]);
	assert_eq!(top_level(&engine), ["file", "edit", "export", "tools"]);
	assert_mirrored(&engine);
	engine.validate().expect("tree is consistent");

	engine.remove_contributor(&exporter);
	assert_eq!(names(&engine, "file"), ["open", "quit"]);
	assert_eq!(names(&engine, "edit"), ["undo", "redo"]);
	assert_eq!(engine.find_container("export", None), None);
	assert_eq!(top_level(&engine), ["file", "edit", "tools"]);

	let json = serde_json::to_value(engine.snapshot()).expect("snapshot serializes");
	assert_eq!(json["root"]["markers"]["merge:<default>"]["value"], 3);
	assert_eq!(json["root"]["children"][0]["markers"]["merge:plugins"]["value"], 1);
	assert_eq!(json["root"]["children"][1]["markers"]["group:clipboard"]["value"], 1);
	assert_mirrored(&engine);

	engine.remove_contributor(&shell);
	assert_eq!(top_level(&engine), ["tools"]);
	assert!(engine.snapshot().root.markers.is_empty());

	engine.remove_contributor(&spell);
	assert!(is_pristine(&engine));
	assert_mirrored(&engine);
}

#[test]
fn late_plugin_matches_early_plugin_layout() {
	let shell = load("shell", SHELL);
	let exporter = load("exporter", EXPORTER);
	let spell = load("spell", SPELL);

	let mut direct = engine();
	direct.add_contributor(&shell);
	direct.add_contributor(&spell);

	let mut detour = engine();
	detour.add_contributor(&shell);
	detour.add_contributor(&exporter);
	detour.add_contributor(&spell);
	detour.remove_contributor(&exporter);

	pretty_assertions::assert_eq!(detour.snapshot(), direct.snapshot());
}

#[test]
fn malformed_descriptors_are_reported_and_tolerated() {
	let broken = load(
		"broken",
		r#"{ "kind": "gui", "children": [ { "type": "container", "kind": "menu", "identity": "file", "children": [] } ] }"#,
	);
	let descriptor: ContainerDecl = serde_json::from_str(
		r#"{ "kind": "gui", "children": [ { "type": "container", "kind": "menu", "identity": "file", "children": [
			{ "type": "define_group" },
			{ "type": "entry", "name": "open" }
		] } ] }"#,
	)
	.expect("descriptor parses");
	let problems: Vec<String> = descriptor.problems().iter().map(ToString::to_string).collect();
	assert_eq!(problems, ["gui/menu[file]/0: cannot define group without name"]);

	let sloppy = StaticContributor::new("sloppy", descriptor);
	let mut engine = engine();
	engine.add_contributor(&broken);
	engine.add_contributor(&sloppy);
	assert_eq!(names(&engine, "file"), ["open"]);

	engine.remove_contributor(&sloppy);
	engine.remove_contributor(&broken);
	assert!(is_pristine(&engine));
}
