//! The composition engine: one shared tree, any number of contributors.

use indexmap::IndexSet;
use tracing::{debug, error};

use crate::builder::Builder;
use crate::compose::Composer;
use crate::config::ComposeConfig;
use crate::contributor::Contributor;
use crate::decompose::Decomposer;
use crate::error::{ComposeError, Result};
use crate::ids::{ContainerHandle, ContributorId, EntryHandle};
use crate::snapshot::TreeSnapshot;
use crate::tree::CompositionTree;
use crate::{action_list, invariants};


/// Merges contributor descriptors into a shared container tree and takes
/// them out again.
///
/// Attaching composes the contributor's descriptor into the tree through the
/// [`Builder`]; detaching removes exactly what it added, leaving the tree as
/// if it had never been attached. All calls are synchronous and the engine
/// is not shared between threads; wrap it in a lock if it has to be.
#[derive(Debug)]
pub struct CompositionEngine<B: Builder> {
	tree: CompositionTree,
	builder: B,
	config: ComposeConfig,
	attached: IndexSet<ContributorId>,
}

impl<B: Builder> CompositionEngine<B> {
	/// Creates an engine composing into the builder's container `root`.
	pub fn new(builder: B, root: ContainerHandle) -> Self {
		Self::with_config(builder, root, ComposeConfig::default())
	}

	pub fn with_config(builder: B, root: ContainerHandle, config: ComposeConfig) -> Self {
		Self {
			tree: CompositionTree::new(root),
			builder,
			config,
			attached: IndexSet::new(),
		}
	}

	pub fn builder(&self) -> &B {
		&self.builder
	}

	pub fn builder_mut(&mut self) -> &mut B {
		&mut self.builder
	}

	pub fn tree(&self) -> &CompositionTree {
		&self.tree
	}

	pub fn config(&self) -> &ComposeConfig {
		&self.config
	}

	/// Attaches `contributor`, then its child contributors.
	///
	/// A contributor that is already attached is detached first.
	pub fn add_contributor(&mut self, contributor: &dyn Contributor) {
		let id = contributor.id();
		if self.attached.contains(&id) {
			debug!(contributor = %id, "already attached, re-attaching");
			self.remove_contributor(contributor);
		}

		self.attached.insert(id.clone());
		let report = Composer::new(&mut self.tree, &mut self.builder, &self.config, contributor).run();
		self.builder.finalize(&id);
		debug!(
			contributor = %id,
			created = report.containers_created,
			matched = report.containers_matched,
			entries = report.entries,
			separators = report.separators,
			skipped = report.skipped,
			"contributor attached"
		);

		for child in contributor.child_contributors() {
			self.add_contributor(child);
		}
		self.verify();
	}

	/// Detaches `contributor`'s child contributors, then `contributor`.
	///
	/// Does nothing for a contributor that is not attached.
	pub fn remove_contributor(&mut self, contributor: &dyn Contributor) {
		let id = contributor.id();
		if !self.attached.contains(&id) {
			return;
		}

		for child in contributor.child_contributors().into_iter().rev() {
			self.remove_contributor(child);
		}
		self.detach(id, Some(contributor));
		self.verify();
	}

	fn detach(&mut self, id: ContributorId, state_sink: Option<&dyn Contributor>) {
		self.attached.shift_remove(&id);
		let report = Decomposer::new(&mut self.tree, &mut self.builder, &self.config, id.clone(), state_sink).run();
		debug!(
			contributor = %id,
			destroyed = report.containers_destroyed,
			items = report.items_removed,
			markers = report.markers_dropped,
			"contributor detached"
		);
	}

	/// Handle of the first container carrying `identity`, in pre-order.
	///
	/// With `owner`, only containers created by that contributor count.
	pub fn find_container(&self, identity: &str, owner: Option<&ContributorId>) -> Option<ContainerHandle> {
		self.tree.find_by_identity(identity, owner).map(|node| self.tree[node].handle())
	}

	pub fn find_container_by_kind(&self, kind: &str, owner: Option<&ContributorId>) -> Option<ContainerHandle> {
		self.tree.find_by_kind(kind, owner).map(|node| self.tree[node].handle())
	}

	/// Every container of `kind`, in pre-order.
	pub fn containers(&self, kind: &str) -> Vec<ContainerHandle> {
		let root = self.tree.root();
		self.tree
			.preorder()
			.into_iter()
			.filter(|&node| node != root && self.tree[node].kind() == kind)
			.map(|node| self.tree[node].handle())
			.collect()
	}

	/// Attached contributors, in attach order.
	pub fn contributors(&self) -> impl Iterator<Item = &ContributorId> {
		self.attached.iter()
	}

	pub fn is_attached(&self, id: &ContributorId) -> bool {
		self.attached.contains(id)
	}

	/// Plugs `entries` into every `action_list` slot named `name` declared by
	/// `contributor`, replacing whatever was plugged there before.
	///
	/// Returns the number of items inserted.
	pub fn plug_action_list(&mut self, contributor: &ContributorId, name: &str, entries: Vec<EntryHandle>) -> Result<usize> {
		if !self.attached.contains(contributor) {
			return Err(ComposeError::NotAttached(contributor.clone()));
		}
		action_list::unplug(&mut self.tree, &mut self.builder, contributor, name);
		let inserted = action_list::plug(&mut self.tree, &mut self.builder, contributor, name, &entries);
		debug!(contributor = %contributor, list = name, inserted, "plugged action list");
		self.verify();
		Ok(inserted)
	}

	/// Removes the entries plugged into `contributor`'s `name` slots.
	///
	/// Returns the number of items removed.
	pub fn unplug_action_list(&mut self, contributor: &ContributorId, name: &str) -> Result<usize> {
		if !self.attached.contains(contributor) {
			return Err(ComposeError::NotAttached(contributor.clone()));
		}
		let removed = action_list::unplug(&mut self.tree, &mut self.builder, contributor, name);
		debug!(contributor = %contributor, list = name, removed, "unplugged action list");
		self.verify();
		Ok(removed)
	}

	/// Detaches every contributor, newest first, destroying all containers
	/// through the builder.
	///
	/// Contributors are not at hand here, so destroyed containers' state is
	/// dropped rather than stored.
	pub fn reset(&mut self) {
		while let Some(id) = self.attached.last().cloned() {
			self.detach(id, None);
		}
		debug_assert_eq!(self.tree.len(), 1, "containers left after reset");
		self.verify();
	}

	/// Forgets the subtree rooted at the container carrying `identity`
	/// without calling the builder.
	///
	/// For backends that disposed of the container themselves.
	pub fn reset_container(&mut self, identity: &str) -> Result<()> {
		let root = self.tree.root();
		let node = self
			.tree
			.find_by_identity(identity, None)
			.filter(|&node| node != root)
			.ok_or_else(|| ComposeError::UnknownContainer(identity.to_owned()))?;
		let parent = self.tree[node].parent().ok_or_else(|| ComposeError::UnknownContainer(identity.to_owned()))?;

		if let Some((position, _)) = self.tree.detach(node) {
			self.tree[parent].adjust_indices(position, -1, None);
			debug!(container = identity, position, "forgot container");
		}
		self.verify();
		Ok(())
	}

	pub fn snapshot(&self) -> TreeSnapshot {
		TreeSnapshot::capture(&self.tree)
	}

	/// Checks every tree invariant.
	pub fn validate(&self) -> Result<()> {
		invariants::check(&self.tree).map_err(ComposeError::Invariants)
	}

	fn verify(&self) {
		if !self.config.verify_invariants {
			return;
		}
		if let Err(violations) = invariants::check(&self.tree) {
			for violation in &violations {
				error!(%violation, "composition invariant violated");
			}
		}
	}
}
