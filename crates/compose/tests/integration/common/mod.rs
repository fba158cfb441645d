//! Common utilities for composition integration tests.

use splice_compose::headless::{HeadlessBuilder, Slot};
use splice_compose::{ComposeConfig, CompositionEngine, Item};

pub type Engine = CompositionEngine<HeadlessBuilder>;

/// Engine over a fresh headless backend with invariant verification on.
pub fn engine() -> Engine {
	let _ = tracing_subscriber::fmt::try_init();
	let config = ComposeConfig {
		verify_invariants: true,
		..ComposeConfig::default()
	};
	CompositionEngine::with_config(HeadlessBuilder::new(), HeadlessBuilder::ROOT, config)
}

/// Panics unless the backend holds exactly the engine's physical items.
pub fn assert_mirrored(engine: &Engine) {
	let tree = engine.tree();
	for id in tree.preorder() {
		let node = &tree[id];
		let expected: Vec<Slot> = node
			.items()
			.iter()
			.map(|item| match item {
				Item::Entry { handle, .. } => Slot::Entry(handle.clone()),
				Item::Separator { id, .. } => Slot::Separator(*id),
				Item::Container(child) => Slot::Container(tree[*child].handle()),
			})
			.collect();
		let container = engine.builder().container(node.handle()).expect("backend container for node");
		assert_eq!(container.slots, expected, "slots of {}", node.label());
	}
	assert_eq!(engine.builder().len(), tree.len(), "backend container count");
}

/// True when nothing but an empty root is left.
pub fn is_pristine(engine: &Engine) -> bool {
	let tree = engine.tree();
	let root = &tree[tree.root()];
	tree.len() == 1 && root.items().is_empty() && root.markers().is_empty() && root.next_index() == 0
}
