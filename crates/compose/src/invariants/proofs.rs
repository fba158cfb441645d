use splice_descriptor::{ContainerDecl, DescriptorNode};

use crate::headless::{HeadlessBuilder, StaticContributor};
use crate::{CompositionEngine, ContributorId};

fn engine() -> CompositionEngine<HeadlessBuilder> {
	CompositionEngine::new(HeadlessBuilder::new(), HeadlessBuilder::ROOT)
}

fn menu(identity: &str, children: impl IntoIterator<Item = DescriptorNode>) -> ContainerDecl {
	ContainerDecl::new("menu").with_identity(identity).children_from(children)
}

fn gui(children: impl IntoIterator<Item = ContainerDecl>) -> ContainerDecl {
	ContainerDecl::new("gui").children_from(children.into_iter().map(DescriptorNode::from))
}

fn shell() -> StaticContributor {
	StaticContributor::new(
		"shell",
		gui([
			menu(
				"file",
				[
					DescriptorNode::entry("open"),
					DescriptorNode::merge_named("plugins"),
					DescriptorNode::separator(),
					DescriptorNode::entry("quit"),
				],
			),
			menu("help", [DescriptorNode::merge(), DescriptorNode::entry("about")]),
		]),
	)
}

fn plugin() -> StaticContributor {
	StaticContributor::new(
		"plugin",
		gui([
			menu("file", [DescriptorNode::merge_named("plugins"), DescriptorNode::entry("export"), DescriptorNode::entry("print")]),
			menu("tools", [DescriptorNode::entry("lint"), DescriptorNode::separator()]),
			menu("help", [DescriptorNode::entry("plugin_help")]),
		]),
	)
}

/// Must restore the exact prior tree when a contributor is attached and detached again.
///
/// * Enforced in: `Composer::place_entry`, `Decomposer::decompose_node`, `ContainerNode::adjust_indices`
/// * Failure symptom: markers drift or stray items remain after a plugin is unloaded.
#[cfg_attr(test, test)]
pub(crate) fn test_remove_restores_prior_tree() {
	let shell = shell();
	let plugin = plugin();
	let mut engine = engine();
	engine.add_contributor(&shell);
	let before = engine.snapshot();

	engine.add_contributor(&plugin);
	assert_ne!(engine.snapshot(), before);
	engine.remove_contributor(&plugin);

	pretty_assertions::assert_eq!(engine.snapshot(), before);
	assert!(engine.validate().is_ok());
}

/// Must keep each contributor's records equal to the items it physically owns.
///
/// * Enforced in: `ContainerNode::record_mut`, `action_list::plug`, `Decomposer::decompose_node`
/// * Failure symptom: detaching leaves items behind or removes another contributor's items.
#[cfg_attr(test, test)]
pub(crate) fn test_records_match_physical_items() {
	let shell = shell();
	let plugin = plugin().with_unresolved(["print"]);
	let mut engine = engine();
	engine.add_contributor(&shell);
	engine.add_contributor(&plugin);
	engine
		.plug_action_list(&ContributorId::new("plugin"), "missing", vec!["x".into()])
		.expect("plugin is attached");

	assert!(engine.validate().is_ok());
	let snapshot = engine.snapshot();
	let file = snapshot.node(&["menu[file]"]).expect("file menu exists");
	assert_eq!(file.entry_names(), ["open", "export", "quit"]);
}

/// Must treat removal of a contributor that was never attached as a no-op.
///
/// * Enforced in: `CompositionEngine::remove_contributor`
/// * Failure symptom: removing an unknown plugin tears down containers it merely names.
#[cfg_attr(test, test)]
pub(crate) fn test_removing_unattached_contributor_is_noop() {
	let shell = shell();
	let mut engine = engine();
	engine.add_contributor(&shell);
	let before = engine.snapshot();

	engine.remove_contributor(&plugin());
	assert_eq!(engine.snapshot(), before);
	assert_eq!(engine.builder().len(), 3);
}

/// Must keep unmarked entries of one contributor in descriptor order.
///
/// * Enforced in: `Composer::placement`
/// * Failure symptom: menu entries of a single plugin appear shuffled.
#[cfg_attr(test, test)]
pub(crate) fn test_unmarked_entries_keep_descriptor_order() {
	let first = StaticContributor::new(
		"first",
		gui([menu("view", ["zoom_in", "zoom_out", "reset"].map(DescriptorNode::entry))]),
	);
	let second = StaticContributor::new("second", gui([menu("view", ["split", "close"].map(DescriptorNode::entry))]));
	let mut engine = engine();
	engine.add_contributor(&first);
	engine.add_contributor(&second);

	let view = engine.find_container("view", None).expect("view menu exists");
	assert_eq!(engine.builder().entry_names(view), ["zoom_in", "zoom_out", "reset", "split", "close"]);
}

/// Must land repeated insertions at one marker contiguously, in declaration order.
///
/// * Enforced in: `MarkerTable::shift` (consumed marker travels with the insertion)
/// * Failure symptom: plugin entries interleave in reverse or split around host entries.
#[cfg_attr(test, test)]
pub(crate) fn test_marker_insertions_are_contiguous() {
	let shell = shell();
	let plugin = plugin();
	let mut engine = engine();
	engine.add_contributor(&shell);
	engine.add_contributor(&plugin);

	let snapshot = engine.snapshot();
	let file = snapshot.node(&["menu[file]"]).expect("file menu exists");
	assert_eq!(file.entry_names(), ["open", "export", "print", "quit"]);
	assert_eq!(file.marker("merge:plugins"), Some(3));
	assert_eq!(file.next_index, 5);
}
