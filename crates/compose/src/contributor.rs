//! Capability interface consumed from contributors.

use splice_descriptor::{ContainerDecl, EntryDecl};

use crate::ids::{ContributorId, EntryHandle, StateBlob};

/// A source of descriptor content merged into the shared tree.
///
/// Every method takes `&self`: the engine only borrows a contributor for the
/// duration of one attach or detach call. Implementations that persist state
/// blobs use interior mutability for the store.
pub trait Contributor {
	/// Identity of this contributor, stable across attach/detach cycles.
	fn id(&self) -> ContributorId;

	/// Root of the contributor's descriptor. Its children are composed into the
	/// engine's root container; the root's own kind and identity are ignored.
	fn descriptor_tree(&self) -> &ContainerDecl;

	/// Resolves an entry declaration. `None` silently skips the declaration.
	fn resolve_entry(&self, entry: &EntryDecl) -> Option<EntryHandle>;

	/// Takes back state stored for a container key, if any.
	fn take_state(&self, _key: &str) -> Option<StateBlob> {
		None
	}

	/// Keeps builder state of a destroyed container under `key`.
	fn store_state(&self, _key: &str, _blob: StateBlob) {}

	/// Contributors attached after, and detached before, this one.
	fn child_contributors(&self) -> Vec<&dyn Contributor> {
		Vec::new()
	}
}

/// State persistence key of a container: its kind and identity joined by `:`.
pub fn state_key(kind: &str, identity: Option<&str>) -> String {
	format!("{kind}:{}", identity.unwrap_or_default())
}
