//! The composition tree: an arena of container nodes owned by the engine.

use std::ops::{Index, IndexMut};

use indexmap::IndexMap;
use slab::Slab;

use crate::ids::{ContainerHandle, ContainerId, ContributorId, EntryHandle, NodeId, SeparatorId};
use crate::marker::{MarkerKey, MarkerTable};

mod matching;


/// One physical item of a container, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
	/// A resolved entry. `list` names the action list it was plugged through.
	Entry {
		contributor: ContributorId,
		handle: EntryHandle,
		list: Option<String>,
	},
	Separator {
		contributor: ContributorId,
		id: SeparatorId,
	},
	/// Slot taken by a child container.
	Container(NodeId),
}

impl Item {
	/// Contributor of an entry or separator. Container slots have none.
	pub fn contributor(&self) -> Option<&ContributorId> {
		match self {
			Self::Entry { contributor, .. } | Self::Separator { contributor, .. } => Some(contributor),
			Self::Container(_) => None,
		}
	}
}

/// One contributor's footprint inside one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRecord {
	contributor: ContributorId,
	group: Option<String>,
	marker: Option<MarkerKey>,
	entries: Vec<EntryHandle>,
	separators: Vec<SeparatorId>,
	action_lists: IndexMap<String, Vec<EntryHandle>>,
}

impl ContributionRecord {
	fn new(contributor: ContributorId, group: Option<&str>) -> Self {
		Self {
			contributor,
			group: group.map(str::to_owned),
			marker: None,
			entries: Vec::new(),
			separators: Vec::new(),
			action_lists: IndexMap::new(),
		}
	}

	pub fn contributor(&self) -> &ContributorId {
		&self.contributor
	}

	pub fn group(&self) -> Option<&str> {
		self.group.as_deref()
	}

	/// Marker this record's items were inserted at, if any.
	pub fn marker(&self) -> Option<&MarkerKey> {
		self.marker.as_ref()
	}

	pub fn used_marker(&self) -> bool {
		self.marker.is_some()
	}

	/// Declared entries, in insertion order.
	pub fn entries(&self) -> &[EntryHandle] {
		&self.entries
	}

	pub fn separators(&self) -> &[SeparatorId] {
		&self.separators
	}

	/// Entries plugged through action lists, keyed by list name.
	pub fn action_lists(&self) -> impl Iterator<Item = (&str, &[EntryHandle])> {
		self.action_lists.iter().map(|(name, entries)| (name.as_str(), entries.as_slice()))
	}

	/// Number of physical items this record accounts for.
	pub fn item_count(&self) -> usize {
		self.entries.len() + self.separators.len() + self.action_lists.values().map(Vec::len).sum::<usize>()
	}

	pub fn is_empty(&self) -> bool {
		self.item_count() == 0
	}

	pub(crate) fn note_marker(&mut self, marker: Option<&MarkerKey>) {
		if self.marker.is_none() {
			self.marker = marker.cloned();
		}
	}

	pub(crate) fn push_entry(&mut self, handle: EntryHandle) {
		self.entries.push(handle);
	}

	pub(crate) fn push_separator(&mut self, id: SeparatorId) {
		self.separators.push(id);
	}

	pub(crate) fn set_action_list(&mut self, name: &str, entries: Vec<EntryHandle>) {
		self.action_lists.insert(name.to_owned(), entries);
	}

	pub(crate) fn take_action_list(&mut self, name: &str) -> Option<Vec<EntryHandle>> {
		self.action_lists.shift_remove(name)
	}
}

/// One named or anonymous slot of the shared tree.
#[derive(Debug, Clone)]
pub struct ContainerNode {
	kind: String,
	identity: Option<String>,
	owner: Option<ContributorId>,
	parent: Option<NodeId>,
	handle: ContainerHandle,
	container_id: ContainerId,
	next_index: usize,
	markers: MarkerTable,
	clients: Vec<ContributionRecord>,
	children: Vec<NodeId>,
	items: Vec<Item>,
}

impl ContainerNode {
	pub(crate) fn new(
		kind: &str,
		identity: Option<&str>,
		owner: Option<ContributorId>,
		handle: ContainerHandle,
		container_id: ContainerId,
	) -> Self {
		Self {
			kind: kind.to_owned(),
			identity: identity.map(str::to_owned),
			owner,
			parent: None,
			handle,
			container_id,
			next_index: 0,
			markers: MarkerTable::default(),
			clients: Vec::new(),
			children: Vec::new(),
			items: Vec::new(),
		}
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	pub fn identity(&self) -> Option<&str> {
		self.identity.as_deref()
	}

	/// Contributor whose declaration created the node. Cleared when that
	/// contributor leaves while others still have content here.
	pub fn owner(&self) -> Option<&ContributorId> {
		self.owner.as_ref()
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn handle(&self) -> ContainerHandle {
		self.handle
	}

	pub fn container_id(&self) -> ContainerId {
		self.container_id
	}

	/// Next append position; equals the number of live items.
	pub fn next_index(&self) -> usize {
		self.next_index
	}

	pub fn markers(&self) -> &MarkerTable {
		&self.markers
	}

	pub fn clients(&self) -> &[ContributionRecord] {
		&self.clients
	}

	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	pub fn items(&self) -> &[Item] {
		&self.items
	}

	/// `kind[identity]`, or the bare kind for anonymous nodes.
	pub fn label(&self) -> String {
		match &self.identity {
			Some(identity) => format!("{}[{identity}]", self.kind),
			None => self.kind.clone(),
		}
	}

	pub(crate) fn markers_mut(&mut self) -> &mut MarkerTable {
		&mut self.markers
	}

	pub(crate) fn clear_owner(&mut self) {
		self.owner = None;
	}

	/// Shifts markers around an insertion (`delta > 0`) or removal
	/// (`delta < 0`) at `idx`, then moves the append position.
	pub(crate) fn adjust_indices(&mut self, idx: usize, delta: isize, exempt: Option<&MarkerKey>) {
		self.markers.shift(idx, delta, exempt);
		debug_assert!(self.next_index.checked_add_signed(delta).is_some(), "next_index below zero");
		self.next_index = self.next_index.saturating_add_signed(delta);
	}

	pub(crate) fn insert_item(&mut self, idx: usize, item: Item) {
		self.items.insert(idx, item);
	}

	pub(crate) fn remove_item(&mut self, idx: usize) -> Item {
		self.items.remove(idx)
	}

	/// Positions of items matching `pred`, ascending.
	pub(crate) fn item_positions(&self, mut pred: impl FnMut(&Item) -> bool) -> Vec<usize> {
		self.items
			.iter()
			.enumerate()
			.filter(|(_, item)| pred(item))
			.map(|(pos, _)| pos)
			.collect()
	}

	/// Record for `contributor` (and `group`, when given), created on demand.
	///
	/// An ungrouped lookup reuses whichever record the contributor already has.
	pub(crate) fn record_mut(&mut self, contributor: &ContributorId, group: Option<&str>) -> &mut ContributionRecord {
		let found = self
			.clients
			.iter()
			.position(|record| record.contributor == *contributor && (group.is_none() || record.group() == group));
		let idx = match found {
			Some(idx) => idx,
			None => {
				self.clients.push(ContributionRecord::new(contributor.clone(), group));
				self.clients.len() - 1
			}
		};
		&mut self.clients[idx]
	}

	pub(crate) fn records_of_mut<'a>(
		&'a mut self,
		contributor: &'a ContributorId,
	) -> impl Iterator<Item = &'a mut ContributionRecord> + 'a {
		self.clients.iter_mut().filter(move |record| record.contributor == *contributor)
	}

	/// Drops records of `contributor` that matches `pred`; returns how many.
	pub(crate) fn drop_records(&mut self, contributor: &ContributorId, mut pred: impl FnMut(&ContributionRecord) -> bool) -> usize {
		let before = self.clients.len();
		self.clients.retain(|record| !(record.contributor == *contributor && pred(record)));
		before - self.clients.len()
	}
}

/// Arena holding every container node, addressed by [`NodeId`].
#[derive(Debug, Clone)]
pub struct CompositionTree {
	nodes: Slab<ContainerNode>,
	root: NodeId,
}

impl CompositionTree {
	/// Creates a tree whose root maps to the builder's top-level container.
	pub fn new(root_handle: ContainerHandle) -> Self {
		let mut nodes = Slab::new();
		let root = NodeId(nodes.insert(ContainerNode::new("root", None, None, root_handle, ContainerId::ROOT)));
		Self { nodes, root }
	}

	pub fn root(&self) -> NodeId {
		self.root
	}

	pub fn get(&self, id: NodeId) -> Option<&ContainerNode> {
		self.nodes.get(id.0)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Every live node, parents before children, siblings in child order.
	pub fn preorder(&self) -> Vec<NodeId> {
		let mut out = Vec::with_capacity(self.nodes.len());
		let mut stack = vec![self.root];
		while let Some(id) = stack.pop() {
			out.push(id);
			stack.extend(self[id].children.iter().rev().copied());
		}
		out
	}

	/// First node in pre-order with `identity`, optionally restricted to nodes
	/// owned by `owner`.
	pub fn find_by_identity(&self, identity: &str, owner: Option<&ContributorId>) -> Option<NodeId> {
		self.preorder()
			.into_iter()
			.find(|&id| self[id].identity() == Some(identity) && owner.is_none_or(|owner| self[id].owner() == Some(owner)))
	}

	/// Same as [`Self::find_by_identity`], matching on kind instead.
	pub fn find_by_kind(&self, kind: &str, owner: Option<&ContributorId>) -> Option<NodeId> {
		self.preorder()
			.into_iter()
			.filter(|&id| id != self.root)
			.find(|&id| self[id].kind() == kind && owner.is_none_or(|owner| self[id].owner() == Some(owner)))
	}

	/// Links a new node under `parent`, taking the item slot at `idx`.
	///
	/// The caller adjusts the parent's indices.
	pub(crate) fn insert_child(&mut self, parent: NodeId, mut node: ContainerNode, idx: usize) -> NodeId {
		node.parent = Some(parent);
		let id = NodeId(self.nodes.insert(node));
		let parent_node = &mut self[parent];
		parent_node.children.push(id);
		parent_node.items.insert(idx, Item::Container(id));
		id
	}

	/// Unlinks `id` from its parent and drops it together with its subtree.
	///
	/// Returns the item position the node occupied in its parent along with
	/// the node itself. The caller adjusts the parent's indices.
	pub(crate) fn detach(&mut self, id: NodeId) -> Option<(usize, ContainerNode)> {
		let parent = self.nodes.get(id.0)?.parent?;
		let parent_node = self.nodes.get_mut(parent.0)?;
		let position = parent_node
			.items
			.iter()
			.position(|item| matches!(item, Item::Container(child) if *child == id))?;
		parent_node.items.remove(position);
		parent_node.children.retain(|&child| child != id);

		let node = self.nodes.remove(id.0);
		let mut orphans = node.children.clone();
		while let Some(orphan) = orphans.pop() {
			if let Some(removed) = self.nodes.try_remove(orphan.0) {
				orphans.extend(removed.children);
			}
		}
		Some((position, node))
	}
}

impl Index<NodeId> for CompositionTree {
	type Output = ContainerNode;

	fn index(&self, id: NodeId) -> &ContainerNode {
		&self.nodes[id.0]
	}
}

impl IndexMut<NodeId> for CompositionTree {
	fn index_mut(&mut self, id: NodeId) -> &mut ContainerNode {
		&mut self.nodes[id.0]
	}
}
