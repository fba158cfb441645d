//! In-memory backend and contributor for composing without a toolkit.
//!
//! [`HeadlessBuilder`] mirrors every call it receives into a plain slot tree,
//! which makes it a faithful observer of the index arguments the engine
//! passes. [`StaticContributor`] serves a fixed descriptor.

use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};
use splice_descriptor::{ContainerDecl, EntryDecl};
use tracing::warn;

use crate::builder::Builder;
use crate::contributor::Contributor;
use crate::ids::{ContainerHandle, ContainerId, ContributorId, EntryHandle, SeparatorId, StateBlob};

/// One physical slot of a headless container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
	Entry(EntryHandle),
	Separator(SeparatorId),
	Container(ContainerHandle),
}

#[derive(Debug, Clone)]
pub struct HeadlessContainer {
	pub kind: String,
	pub identity: Option<String>,
	pub parent: Option<ContainerHandle>,
	pub slots: Vec<Slot>,
}

/// A [`Builder`] that keeps its containers in a hash map.
#[derive(Debug, Clone)]
pub struct HeadlessBuilder {
	containers: FxHashMap<ContainerHandle, HeadlessContainer>,
	leaf_kinds: FxHashSet<String>,
	states: FxHashMap<ContainerHandle, StateBlob>,
	restored: Vec<(String, StateBlob)>,
	finalized: Vec<ContributorId>,
	next_handle: u64,
	next_separator: u64,
}

impl Default for HeadlessBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl HeadlessBuilder {
	/// Handle of the pre-existing top-level container.
	pub const ROOT: ContainerHandle = ContainerHandle(0);

	pub fn new() -> Self {
		let mut containers = FxHashMap::default();
		containers.insert(
			Self::ROOT,
			HeadlessContainer {
				kind: "root".to_owned(),
				identity: None,
				parent: None,
				slots: Vec::new(),
			},
		);
		Self {
			containers,
			leaf_kinds: FxHashSet::default(),
			states: FxHashMap::default(),
			restored: Vec::new(),
			finalized: Vec::new(),
			next_handle: 1,
			next_separator: 1,
		}
	}

	/// Declines container declarations of `kind`.
	pub fn with_leaf_kind(mut self, kind: impl Into<String>) -> Self {
		self.leaf_kinds.insert(kind.into());
		self
	}

	pub fn container(&self, handle: ContainerHandle) -> Option<&HeadlessContainer> {
		self.containers.get(&handle)
	}

	/// Live containers, the root included.
	pub fn len(&self) -> usize {
		self.containers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.containers.is_empty()
	}

	/// Entry names of `handle` in slot order.
	pub fn entry_names(&self, handle: ContainerHandle) -> Vec<&str> {
		self.containers
			.get(&handle)
			.map(|container| {
				container
					.slots
					.iter()
					.filter_map(|slot| match slot {
						Slot::Entry(entry) => Some(entry.as_str()),
						_ => None,
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// State `handle` reports when it is destroyed.
	pub fn set_state(&mut self, handle: ContainerHandle, blob: impl Into<StateBlob>) {
		self.states.insert(handle, blob.into());
	}

	/// Container labels and the blobs they were re-created with, in order.
	pub fn restored(&self) -> &[(String, StateBlob)] {
		&self.restored
	}

	pub fn finalized(&self) -> &[ContributorId] {
		&self.finalized
	}

	/// Drops `handle` and its subtree behind the engine's back, the way a
	/// toolkit disposes of a container it owns.
	pub fn dispose(&mut self, handle: ContainerHandle) -> bool {
		let Some(container) = self.containers.remove(&handle) else {
			return false;
		};
		if let Some(parent) = container.parent.and_then(|parent| self.containers.get_mut(&parent)) {
			parent.slots.retain(|slot| *slot != Slot::Container(handle));
		}
		let mut pending: Vec<_> = container.slots.into_iter().collect();
		while let Some(slot) = pending.pop() {
			if let Slot::Container(child) = slot
				&& let Some(removed) = self.containers.remove(&child)
			{
				self.states.remove(&child);
				pending.extend(removed.slots);
			}
		}
		self.states.remove(&handle);
		true
	}

	fn slots_mut(&mut self, handle: ContainerHandle) -> Option<&mut Vec<Slot>> {
		self.containers.get_mut(&handle).map(|container| &mut container.slots)
	}
}

fn insert_clamped(slots: &mut Vec<Slot>, index: usize, slot: Slot) {
	let at = index.min(slots.len());
	if at != index {
		warn!(index, len = slots.len(), "insertion index past the end, clamping");
	}
	slots.insert(at, slot);
}

impl Builder for HeadlessBuilder {
	fn create_container(
		&mut self,
		parent: ContainerHandle,
		index: usize,
		decl: &ContainerDecl,
		restored: Option<&StateBlob>,
	) -> Option<(ContainerHandle, ContainerId)> {
		if self.leaf_kinds.contains(decl.kind()) || !self.containers.contains_key(&parent) {
			return None;
		}
		let handle = ContainerHandle(self.next_handle);
		self.next_handle += 1;

		insert_clamped(self.slots_mut(parent)?, index, Slot::Container(handle));
		self.containers.insert(
			handle,
			HeadlessContainer {
				kind: decl.kind().to_owned(),
				identity: decl.identity().map(str::to_owned),
				parent: Some(parent),
				slots: Vec::new(),
			},
		);
		if let Some(blob) = restored {
			self.restored.push((decl.label(), blob.clone()));
			self.states.insert(handle, blob.clone());
		}
		Some((handle, ContainerId(handle.0)))
	}

	fn destroy_container(&mut self, handle: ContainerHandle, parent: ContainerHandle, _id: ContainerId) -> StateBlob {
		if let Some(slots) = self.slots_mut(parent) {
			slots.retain(|slot| *slot != Slot::Container(handle));
		}
		if let Some(container) = self.containers.remove(&handle)
			&& !container.slots.is_empty()
		{
			warn!(handle = handle.0, slots = container.slots.len(), "destroyed container still had content");
		}
		self.states.remove(&handle).unwrap_or_default()
	}

	fn insert_separator(&mut self, parent: ContainerHandle, index: usize) -> SeparatorId {
		let id = SeparatorId(self.next_separator);
		self.next_separator += 1;
		if let Some(slots) = self.slots_mut(parent) {
			insert_clamped(slots, index, Slot::Separator(id));
		}
		id
	}

	fn remove_separator(&mut self, parent: ContainerHandle, id: SeparatorId) {
		if let Some(slots) = self.slots_mut(parent) {
			slots.retain(|slot| *slot != Slot::Separator(id));
		}
	}

	fn plug_entry(&mut self, parent: ContainerHandle, index: usize, entry: &EntryHandle) {
		if let Some(slots) = self.slots_mut(parent) {
			insert_clamped(slots, index, Slot::Entry(entry.clone()));
		}
	}

	fn unplug_entry(&mut self, parent: ContainerHandle, index: usize, entry: &EntryHandle) {
		let Some(slots) = self.slots_mut(parent) else {
			return;
		};
		let expected = Slot::Entry(entry.clone());
		if slots.get(index) == Some(&expected) {
			slots.remove(index);
		} else if let Some(pos) = slots.iter().position(|slot| *slot == expected) {
			warn!(index, found = pos, entry = %entry, "entry not at the expected index");
			slots.remove(pos);
		}
	}

	fn finalize(&mut self, contributor: &ContributorId) {
		self.finalized.push(contributor.clone());
	}
}

/// A contributor serving a fixed descriptor.
///
/// Every entry resolves to a handle named after it unless listed as
/// unresolved. Stored state lives in memory until taken back.
#[derive(Debug)]
pub struct StaticContributor {
	id: ContributorId,
	descriptor: ContainerDecl,
	unresolved: FxHashSet<String>,
	states: RefCell<FxHashMap<String, StateBlob>>,
	children: Vec<StaticContributor>,
}

impl StaticContributor {
	pub fn new(id: impl Into<ContributorId>, descriptor: ContainerDecl) -> Self {
		Self {
			id: id.into(),
			descriptor,
			unresolved: FxHashSet::default(),
			states: RefCell::default(),
			children: Vec::new(),
		}
	}

	pub fn with_unresolved<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.unresolved.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn with_child(mut self, child: StaticContributor) -> Self {
		self.children.push(child);
		self
	}

	/// State stored under `key`, left in place.
	pub fn stored_state(&self, key: &str) -> Option<StateBlob> {
		self.states.borrow().get(key).cloned()
	}
}

impl Contributor for StaticContributor {
	fn id(&self) -> ContributorId {
		self.id.clone()
	}

	fn descriptor_tree(&self) -> &ContainerDecl {
		&self.descriptor
	}

	fn resolve_entry(&self, entry: &EntryDecl) -> Option<EntryHandle> {
		if entry.name().is_empty() || self.unresolved.contains(entry.name()) {
			return None;
		}
		Some(EntryHandle::new(entry.name()))
	}

	fn take_state(&self, key: &str) -> Option<StateBlob> {
		self.states.borrow_mut().remove(key)
	}

	fn store_state(&self, key: &str, blob: StateBlob) {
		self.states.borrow_mut().insert(key.to_owned(), blob);
	}

	fn child_contributors(&self) -> Vec<&dyn Contributor> {
		self.children.iter().map(|child| child as &dyn Contributor).collect()
	}
}
