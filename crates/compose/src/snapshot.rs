//! Deterministic, backend-independent picture of a composition tree.
//!
//! Snapshots leave out builder handles and separator ids, so two trees that
//! hold the same content in the same order compare equal even when their
//! concrete containers were created at different times.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ids::NodeId;
use crate::tree::{CompositionTree, ContributionRecord, Item};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
	pub root: NodeSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
	pub kind: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub identity: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owner: Option<String>,
	pub next_index: usize,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub markers: BTreeMap<String, MarkerSnapshot>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub items: Vec<ItemSnapshot>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub records: Vec<RecordSnapshot>,
	/// Child nodes in physical order.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerSnapshot {
	pub value: usize,
	pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemSnapshot {
	Entry {
		contributor: String,
		handle: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		list: Option<String>,
	},
	Separator {
		contributor: String,
	},
	Container {
		kind: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		identity: Option<String>,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSnapshot {
	pub contributor: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub group: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub marker: Option<String>,
	pub entries: Vec<String>,
	pub separators: usize,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub action_lists: BTreeMap<String, Vec<String>>,
}

impl TreeSnapshot {
	pub fn capture(tree: &CompositionTree) -> Self {
		Self {
			root: NodeSnapshot::capture(tree, tree.root()),
		}
	}

	/// Node reached by following `labels` from the root, matching each step
	/// against [`NodeSnapshot::label`].
	pub fn node(&self, labels: &[&str]) -> Option<&NodeSnapshot> {
		labels.iter().try_fold(&self.root, |node, label| node.children.iter().find(|child| child.label() == *label))
	}
}

impl NodeSnapshot {
	fn capture(tree: &CompositionTree, id: NodeId) -> Self {
		let node = &tree[id];
		let mut children = Vec::new();
		let items = node
			.items()
			.iter()
			.map(|item| match item {
				Item::Entry { contributor, handle, list } => ItemSnapshot::Entry {
					contributor: contributor.to_string(),
					handle: handle.to_string(),
					list: list.clone(),
				},
				Item::Separator { contributor, .. } => ItemSnapshot::Separator {
					contributor: contributor.to_string(),
				},
				Item::Container(child) => {
					children.push(Self::capture(tree, *child));
					ItemSnapshot::Container {
						kind: tree[*child].kind().to_owned(),
						identity: tree[*child].identity().map(str::to_owned),
					}
				}
			})
			.collect();

		Self {
			kind: node.kind().to_owned(),
			identity: node.identity().map(str::to_owned),
			owner: node.owner().map(ToString::to_string),
			next_index: node.next_index(),
			markers: node
				.markers()
				.iter()
				.map(|(key, marker)| {
					(
						key.to_string(),
						MarkerSnapshot {
							value: marker.value(),
							owner: marker.owner().to_string(),
						},
					)
				})
				.collect(),
			items,
			records: node.clients().iter().map(RecordSnapshot::capture).collect(),
			children,
		}
	}

	pub fn label(&self) -> String {
		match &self.identity {
			Some(identity) => format!("{}[{identity}]", self.kind),
			None => self.kind.clone(),
		}
	}

	/// Entry handles in physical order.
	pub fn entry_names(&self) -> Vec<&str> {
		self.items
			.iter()
			.filter_map(|item| match item {
				ItemSnapshot::Entry { handle, .. } => Some(handle.as_str()),
				_ => None,
			})
			.collect()
	}

	pub fn marker(&self, key: &str) -> Option<usize> {
		self.markers.get(key).map(|marker| marker.value)
	}

	fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
		let indent = "  ".repeat(depth);
		write!(f, "{indent}{} next={}", self.label(), self.next_index)?;
		if let Some(owner) = &self.owner {
			write!(f, " owner={owner}")?;
		}
		for (key, marker) in &self.markers {
			write!(f, " {key}@{}", marker.value)?;
		}
		writeln!(f)?;

		let mut children = self.children.iter();
		for item in &self.items {
			match item {
				ItemSnapshot::Entry { contributor, handle, list } => match list {
					Some(list) => writeln!(f, "{indent}  - {handle} ({contributor}, list {list})")?,
					None => writeln!(f, "{indent}  - {handle} ({contributor})")?,
				},
				ItemSnapshot::Separator { contributor } => writeln!(f, "{indent}  --- ({contributor})")?,
				ItemSnapshot::Container { .. } => {
					if let Some(child) = children.next() {
						child.write_outline(f, depth + 1)?;
					}
				}
			}
		}
		Ok(())
	}
}

impl RecordSnapshot {
	fn capture(record: &ContributionRecord) -> Self {
		Self {
			contributor: record.contributor().to_string(),
			group: record.group().map(str::to_owned),
			marker: record.marker().map(ToString::to_string),
			entries: record.entries().iter().map(ToString::to_string).collect(),
			separators: record.separators().len(),
			action_lists: record
				.action_lists()
				.map(|(name, entries)| (name.to_owned(), entries.iter().map(ToString::to_string).collect()))
				.collect(),
		}
	}
}

impl fmt::Display for TreeSnapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.root.write_outline(f, 0)
	}
}
