//! Identifier and handle types shared between the engine and its collaborators.

use std::fmt;
use std::sync::Arc;

/// Stable identity of a contributor.
///
/// Doubles as the name looked up when a container carries a merge marker
/// dedicated to this contributor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContributorId(Arc<str>);

impl ContributorId {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ContributorId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ContributorId {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for ContributorId {
	fn from(name: String) -> Self {
		Self::new(name)
	}
}

/// Builder-side handle of a concrete container instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerHandle(pub u64);

/// Builder-assigned id of a container within its parent.
///
/// The root container is never created by a builder and uses
/// [`ContainerId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

impl ContainerId {
	pub const ROOT: Self = Self(0);
}

/// Builder-assigned id of a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeparatorId(pub u64);

/// A resolved entry, as produced by [`crate::Contributor::resolve_entry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(Arc<str>);

impl EntryHandle {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EntryHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for EntryHandle {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

/// Opaque per-container state captured by the builder when a container is
/// destroyed, handed back when the same container is created again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateBlob(Vec<u8>);

impl StateBlob {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for StateBlob {
	fn from(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}
}

impl From<&[u8]> for StateBlob {
	fn from(bytes: &[u8]) -> Self {
		Self(bytes.to_vec())
	}
}

/// Index of a node in the composition tree arena.
///
/// Only valid for the tree that issued it, and only until that node is
/// destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);
