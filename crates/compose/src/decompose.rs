//! Taking one contributor's footprint back out of the composition tree.

use tracing::{debug, trace};

use crate::builder::Builder;
use crate::config::ComposeConfig;
use crate::contributor::{Contributor, state_key};
use crate::ids::{ContributorId, NodeId};
use crate::tree::{CompositionTree, Item};

/// Counters reported once a contributor is decomposed.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DecomposeReport {
	pub containers_destroyed: usize,
	pub items_removed: usize,
	pub markers_dropped: usize,
}

pub(crate) struct Decomposer<'a, B: Builder> {
	tree: &'a mut CompositionTree,
	builder: &'a mut B,
	config: &'a ComposeConfig,
	/// Receives state of destroyed containers. Absent when the engine tears
	/// down without the contributor at hand.
	state_sink: Option<&'a dyn Contributor>,
	id: ContributorId,
	report: DecomposeReport,
}

impl<'a, B: Builder> Decomposer<'a, B> {
	pub(crate) fn new(
		tree: &'a mut CompositionTree,
		builder: &'a mut B,
		config: &'a ComposeConfig,
		id: ContributorId,
		state_sink: Option<&'a dyn Contributor>,
	) -> Self {
		Self {
			tree,
			builder,
			config,
			state_sink,
			id,
			report: DecomposeReport::default(),
		}
	}

	pub(crate) fn run(mut self) -> DecomposeReport {
		let root = self.tree.root();
		self.decompose_node(root);
		self.report
	}

	/// Removes the contributor from `node` and its subtree. Returns true when
	/// `node` should be destroyed by its parent.
	fn decompose_node(&mut self, node: NodeId) -> bool {
		let children = self.tree[node].children().to_vec();
		for child in children {
			if self.decompose_node(child) {
				self.destroy(node, child);
			}
		}

		let target = &mut self.tree[node];
		let parent_handle = target.handle();
		let positions = target.item_positions(|item| item.contributor() == Some(&self.id));
		for pos in positions.into_iter().rev() {
			let item = target.remove_item(pos);
			target.adjust_indices(pos, -1, None);
			trace!(node = %target.label(), pos, "removed item");
			match item {
				Item::Entry { handle, .. } => self.builder.unplug_entry(parent_handle, pos, &handle),
				Item::Separator { id, .. } => self.builder.remove_separator(parent_handle, id),
				Item::Container(_) => {}
			}
			self.report.items_removed += 1;
		}

		target.drop_records(&self.id, |_| true);
		self.report.markers_dropped += target.markers_mut().remove_owned_by(&self.id);
		debug_assert!(
			target.clients().iter().map(|record| record.item_count()).sum::<usize>()
				== target.items().iter().filter(|item| item.contributor().is_some()).count(),
			"records of {} out of sync with its items",
			target.label()
		);

		if target.parent().is_none() {
			return false;
		}
		let empty = target.clients().is_empty() && target.children().is_empty();
		match target.owner() {
			Some(owner) if *owner == self.id => {
				if !empty {
					trace!(node = %target.label(), "owner left, node kept by remaining content");
					target.clear_owner();
				}
				empty
			}
			None => empty,
			Some(_) => false,
		}
	}

	fn destroy(&mut self, parent: NodeId, child: NodeId) {
		let Some((position, node)) = self.tree.detach(child) else {
			return;
		};
		let parent_node = &mut self.tree[parent];
		parent_node.adjust_indices(position, -1, None);

		let blob = self.builder.destroy_container(node.handle(), parent_node.handle(), node.container_id());
		debug!(contributor = %self.id, container = %node.label(), position, "destroyed container");
		self.report.containers_destroyed += 1;

		if !self.config.persist_state || blob.is_empty() || node.owner() != Some(&self.id) {
			return;
		}
		if let Some(sink) = self.state_sink {
			sink.store_state(&state_key(node.kind(), node.identity()), blob);
		}
	}
}
