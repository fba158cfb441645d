//! Capability interface towards the concrete container backend.

use splice_descriptor::ContainerDecl;

use crate::ids::{ContainerHandle, ContainerId, ContributorId, EntryHandle, SeparatorId, StateBlob};

/// Creates and destroys the concrete representation of the composed tree.
///
/// Indices are positions in the parent's physical item sequence at the time
/// of the call, counting entries, separators and child containers.
pub trait Builder {
	/// Creates a container at `index` of `parent`.
	///
	/// Returns `None` when `decl` does not describe something this builder
	/// treats as a container; the engine then skips the declaration and its
	/// whole subtree.
	fn create_container(
		&mut self,
		parent: ContainerHandle,
		index: usize,
		decl: &ContainerDecl,
		restored: Option<&StateBlob>,
	) -> Option<(ContainerHandle, ContainerId)>;

	/// Destroys a container and returns whatever state should survive until
	/// the container is created again. An empty blob is not persisted.
	fn destroy_container(&mut self, handle: ContainerHandle, parent: ContainerHandle, id: ContainerId) -> StateBlob;

	fn insert_separator(&mut self, parent: ContainerHandle, index: usize) -> SeparatorId;

	fn remove_separator(&mut self, parent: ContainerHandle, id: SeparatorId);

	/// Places a resolved entry at `index` of `parent`.
	fn plug_entry(&mut self, _parent: ContainerHandle, _index: usize, _entry: &EntryHandle) {}

	/// Takes the entry at `index` of `parent` out again.
	fn unplug_entry(&mut self, _parent: ContainerHandle, _index: usize, _entry: &EntryHandle) {}

	/// Called once a contributor's descriptor has been fully composed.
	fn finalize(&mut self, _contributor: &ContributorId) {}
}
