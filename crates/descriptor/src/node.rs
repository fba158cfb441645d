//! Descriptor tree node types.

use serde::{Deserialize, Serialize};

/// One node of a contribution descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DescriptorNode {
	/// A container that merges into an existing node or creates a new one.
	Container(ContainerDecl),
	/// A leaf entry, resolved through the contributor.
	Entry(EntryDecl),
	/// A separator created by the builder.
	Separator(SeparatorDecl),
	/// A merge marker. Content from other contributors lands here instead of
	/// being appended.
	Merge(MergeDecl),
	/// Declares a named group slot that grouped items are inserted at.
	DefineGroup {
		#[serde(default)]
		name: String,
	},
	/// Declares a named slot for an entry list plugged in at runtime.
	ActionList {
		#[serde(default)]
		name: String,
	},
}

impl DescriptorNode {
	pub fn entry(name: impl Into<String>) -> Self {
		Self::Entry(EntryDecl::new(name))
	}

	pub fn separator() -> Self {
		Self::Separator(SeparatorDecl::default())
	}

	/// An unnamed merge marker; the engine files it under its default name.
	pub fn merge() -> Self {
		Self::Merge(MergeDecl::default())
	}

	pub fn merge_named(name: impl Into<String>) -> Self {
		Self::Merge(MergeDecl::named(name))
	}

	pub fn define_group(name: impl Into<String>) -> Self {
		Self::DefineGroup { name: name.into() }
	}

	pub fn action_list(name: impl Into<String>) -> Self {
		Self::ActionList { name: name.into() }
	}
}

impl From<ContainerDecl> for DescriptorNode {
	fn from(decl: ContainerDecl) -> Self {
		Self::Container(decl)
	}
}

impl From<EntryDecl> for DescriptorNode {
	fn from(decl: EntryDecl) -> Self {
		Self::Entry(decl)
	}
}

impl From<SeparatorDecl> for DescriptorNode {
	fn from(decl: SeparatorDecl) -> Self {
		Self::Separator(decl)
	}
}

impl From<MergeDecl> for DescriptorNode {
	fn from(decl: MergeDecl) -> Self {
		Self::Merge(decl)
	}
}

/// A container declaration.
///
/// `kind` is the builder-facing type tag (`menu`, `toolbar`, ...). An
/// `identity` makes the container addressable across contributors: two
/// contributors declaring the same identity under the same parent share one
/// node. Without an identity the container only ever merges with containers
/// of the same kind created by the same contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDecl {
	kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	identity: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	group: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	children: Vec<DescriptorNode>,
}

impl ContainerDecl {
	pub fn new(kind: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			..Self::default()
		}
	}

	pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
		self.identity = Some(identity.into());
		self
	}

	/// Places the container at the named group slot of its parent.
	pub fn in_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	pub fn child(mut self, node: impl Into<DescriptorNode>) -> Self {
		self.children.push(node.into());
		self
	}

	pub fn children_from(mut self, nodes: impl IntoIterator<Item = DescriptorNode>) -> Self {
		self.children.extend(nodes);
		self
	}

	pub fn push(&mut self, node: impl Into<DescriptorNode>) {
		self.children.push(node.into());
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	/// Identity used for cross-contributor matching. Blank names count as
	/// absent.
	pub fn identity(&self) -> Option<&str> {
		non_empty(self.identity.as_deref())
	}

	pub(crate) fn has_blank_identity(&self) -> bool {
		self.identity.as_deref().is_some_and(|identity| identity.trim().is_empty())
	}

	pub fn group(&self) -> Option<&str> {
		non_empty(self.group.as_deref())
	}

	pub fn children(&self) -> &[DescriptorNode] {
		&self.children
	}

	/// Human readable `kind[identity]` label.
	pub fn label(&self) -> String {
		match self.identity() {
			Some(identity) => format!("{}[{identity}]", self.kind),
			None => self.kind.clone(),
		}
	}
}

/// An entry declaration, naming something the contributor can resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDecl {
	name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	group: Option<String>,
}

impl EntryDecl {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn in_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn group(&self) -> Option<&str> {
		non_empty(self.group.as_deref())
	}
}

/// A separator declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorDecl {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	group: Option<String>,
}

impl SeparatorDecl {
	pub fn in_group(group: impl Into<String>) -> Self {
		Self { group: Some(group.into()) }
	}

	pub fn group(&self) -> Option<&str> {
		non_empty(self.group.as_deref())
	}
}

/// A merge marker declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeDecl {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	name: Option<String>,
}

impl MergeDecl {
	pub fn named(name: impl Into<String>) -> Self {
		Self { name: Some(name.into()) }
	}

	/// Explicit marker name; `None` selects the engine's default marker.
	pub fn name(&self) -> Option<&str> {
		non_empty(self.name.as_deref())
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.trim().is_empty())
}
