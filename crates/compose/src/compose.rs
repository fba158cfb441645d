//! Merging one contributor's descriptor into the composition tree.

use splice_descriptor::{ContainerDecl, DescriptorNode, EntryDecl, MergeDecl, SeparatorDecl};
use tracing::{debug, trace, warn};

use crate::builder::Builder;
use crate::config::ComposeConfig;
use crate::contributor::{Contributor, state_key};
use crate::ids::{ContributorId, NodeId};
use crate::marker::MarkerKey;
use crate::tree::{CompositionTree, ContainerNode, Item};

/// Counters reported once a contributor is composed.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ComposeReport {
	pub containers_created: usize,
	pub containers_matched: usize,
	pub entries: usize,
	pub separators: usize,
	pub skipped: usize,
}

/// Where the following siblings of one level are placed.
#[derive(Debug, Default)]
struct LevelCursor {
	/// A marker owned by another contributor that a `merge` node selected.
	explicit: Option<MarkerKey>,
	/// Set right after the contributor declared a marker of its own, so its
	/// own following siblings append instead of being redirected.
	suppressed: bool,
}

pub(crate) struct Composer<'a, B: Builder> {
	tree: &'a mut CompositionTree,
	builder: &'a mut B,
	config: &'a ComposeConfig,
	contributor: &'a dyn Contributor,
	id: ContributorId,
	report: ComposeReport,
}

impl<'a, B: Builder> Composer<'a, B> {
	pub(crate) fn new(
		tree: &'a mut CompositionTree,
		builder: &'a mut B,
		config: &'a ComposeConfig,
		contributor: &'a dyn Contributor,
	) -> Self {
		Self {
			tree,
			builder,
			config,
			id: contributor.id(),
			contributor,
			report: ComposeReport::default(),
		}
	}

	pub(crate) fn run(mut self) -> ComposeReport {
		let contributor = self.contributor;
		let root = self.tree.root();
		self.compose_level(root, contributor.descriptor_tree());
		self.report
	}

	fn compose_level(&mut self, node: NodeId, decl: &'a ContainerDecl) {
		let mut cursor = LevelCursor::default();
		let mut claimed = Vec::new();

		for child in decl.children() {
			match child {
				DescriptorNode::Merge(merge) => self.declare_merge(node, merge, &mut cursor),
				DescriptorNode::DefineGroup { name } => self.declare_slot(node, name, MarkerKey::Group, &cursor),
				DescriptorNode::ActionList { name } => self.declare_slot(node, name, MarkerKey::ActionList, &cursor),
				DescriptorNode::Entry(entry) => self.place_entry(node, entry, &cursor),
				DescriptorNode::Separator(separator) => self.place_separator(node, separator, &cursor),
				DescriptorNode::Container(inner) => self.place_container(node, inner, &cursor, &mut claimed),
			}
		}
	}

	fn declare_merge(&mut self, node: NodeId, merge: &MergeDecl, cursor: &mut LevelCursor) {
		let name = merge.name().unwrap_or(self.config.default_marker.as_str());
		let key = MarkerKey::Merge(name.to_owned());
		let target = &mut self.tree[node];

		match target.markers().get(&key) {
			Some(existing) if *existing.owner() != self.id => {
				trace!(node = %target.label(), marker = %key, owner = %existing.owner(), "selected foreign marker");
				cursor.explicit = Some(key);
				cursor.suppressed = false;
			}
			_ => {
				let at = target.next_index();
				trace!(node = %target.label(), marker = %key, at, "declared marker");
				target.markers_mut().define(key, at, self.id.clone());
				cursor.explicit = None;
				cursor.suppressed = true;
			}
		}
	}

	fn declare_slot(&mut self, node: NodeId, name: &str, key: fn(String) -> MarkerKey, cursor: &LevelCursor) {
		if name.is_empty() {
			let label = self.tree[node].label();
			warn!(contributor = %self.id, node = %label, "slot declared without a name, skipping");
			self.report.skipped += 1;
			return;
		}

		let key = key(name.to_owned());
		let (at, _) = self.placement(node, None, cursor);
		let target = &mut self.tree[node];
		if let Some(existing) = target.markers().get(&key)
			&& *existing.owner() != self.id
		{
			debug!(node = %target.label(), slot = %key, owner = %existing.owner(), "slot already declared by another contributor");
			return;
		}
		trace!(node = %target.label(), slot = %key, at, "declared slot");
		target.markers_mut().define(key, at, self.id.clone());
	}

	/// Insertion index for an item of `group` at `node`, plus the marker it
	/// was taken from.
	fn placement(&self, node: NodeId, group: Option<&str>, cursor: &LevelCursor) -> (usize, Option<MarkerKey>) {
		let target = &self.tree[node];
		let append = (target.next_index(), None);

		// A group without a declared slot falls through to the merge markers.
		if let Some(group) = group {
			let key = MarkerKey::Group(group.to_owned());
			if let Some(at) = target.markers().value(&key) {
				return (at, Some(key));
			}
		}
		if cursor.suppressed {
			return append;
		}

		let candidates = cursor.explicit.iter().cloned().chain([
			MarkerKey::Merge(self.id.as_str().to_owned()),
			MarkerKey::Merge(self.config.default_marker.clone()),
		]);
		for key in candidates {
			if let Some(at) = target.markers().value(&key) {
				return (at, Some(key));
			}
		}
		append
	}

	fn place_entry(&mut self, node: NodeId, entry: &EntryDecl, cursor: &LevelCursor) {
		let Some(handle) = self.contributor.resolve_entry(entry) else {
			debug!(contributor = %self.id, entry = entry.name(), "entry did not resolve, skipping");
			self.report.skipped += 1;
			return;
		};

		let (idx, marker) = self.placement(node, entry.group(), cursor);
		let target = &mut self.tree[node];
		trace!(node = %target.label(), entry = %handle, idx, "inserting entry");
		target.insert_item(
			idx,
			Item::Entry {
				contributor: self.id.clone(),
				handle: handle.clone(),
				list: None,
			},
		);
		target.adjust_indices(idx, 1, marker.as_ref());
		let record = target.record_mut(&self.id, entry.group());
		record.push_entry(handle.clone());
		record.note_marker(marker.as_ref());

		self.builder.plug_entry(target.handle(), idx, &handle);
		self.report.entries += 1;
	}

	fn place_separator(&mut self, node: NodeId, separator: &SeparatorDecl, cursor: &LevelCursor) {
		let (idx, marker) = self.placement(node, separator.group(), cursor);
		let target = &mut self.tree[node];
		let id = self.builder.insert_separator(target.handle(), idx);
		trace!(node = %target.label(), idx, "inserting separator");
		target.insert_item(
			idx,
			Item::Separator {
				contributor: self.id.clone(),
				id,
			},
		);
		target.adjust_indices(idx, 1, marker.as_ref());
		let record = target.record_mut(&self.id, separator.group());
		record.push_separator(id);
		record.note_marker(marker.as_ref());
		self.report.separators += 1;
	}

	fn place_container(&mut self, node: NodeId, decl: &'a ContainerDecl, cursor: &LevelCursor, claimed: &mut Vec<NodeId>) {
		if let Some(existing) = self.tree.match_child(node, decl, &self.id, claimed.as_slice()) {
			claimed.push(existing);
			self.report.containers_matched += 1;
			self.compose_level(existing, decl);
			return;
		}

		let (idx, marker) = self.placement(node, decl.group(), cursor);
		let key = state_key(decl.kind(), decl.identity());
		let restored = if self.config.persist_state {
			self.contributor.take_state(&key)
		} else {
			None
		};

		let parent_handle = self.tree[node].handle();
		let Some((handle, container_id)) = self.builder.create_container(parent_handle, idx, decl, restored.as_ref()) else {
			if let Some(blob) = restored {
				self.contributor.store_state(&key, blob);
			}
			debug!(contributor = %self.id, container = %decl.label(), "builder declined container, skipping subtree");
			self.report.skipped += 1;
			return;
		};

		debug!(
			contributor = %self.id,
			container = %decl.label(),
			idx,
			restored = restored.is_some(),
			"created container"
		);
		let created = ContainerNode::new(decl.kind(), decl.identity(), Some(self.id.clone()), handle, container_id);
		let child = self.tree.insert_child(node, created, idx);
		self.tree[node].adjust_indices(idx, 1, marker.as_ref());
		claimed.push(child);
		self.report.containers_created += 1;
		self.compose_level(child, decl);
	}
}
