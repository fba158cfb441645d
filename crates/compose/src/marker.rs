//! Named insertion cursors kept per container node.

use std::fmt;

use indexmap::IndexMap;

use crate::ids::ContributorId;


/// Identifies a marker within one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKey {
	/// Declared by a `merge` node; unnamed ones use the configured default name.
	Merge(String),
	/// Declared by `define_group`.
	Group(String),
	/// Declared by `action_list`.
	ActionList(String),
}

impl MarkerKey {
	pub fn name(&self) -> &str {
		match self {
			Self::Merge(name) | Self::Group(name) | Self::ActionList(name) => name,
		}
	}
}

impl fmt::Display for MarkerKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Merge(name) => write!(f, "merge:{name}"),
			Self::Group(name) => write!(f, "group:{name}"),
			Self::ActionList(name) => write!(f, "action_list:{name}"),
		}
	}
}

/// Insertion position plus the contributor that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
	value: usize,
	owner: ContributorId,
}

impl Marker {
	pub fn value(&self) -> usize {
		self.value
	}

	pub fn owner(&self) -> &ContributorId {
		&self.owner
	}
}

/// Markers of one node, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerTable {
	entries: IndexMap<MarkerKey, Marker>,
}

impl MarkerTable {
	pub fn get(&self, key: &MarkerKey) -> Option<&Marker> {
		self.entries.get(key)
	}

	pub fn value(&self, key: &MarkerKey) -> Option<usize> {
		self.entries.get(key).map(Marker::value)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&MarkerKey, &Marker)> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Declares `key` at `value`, moving it if it already exists.
	pub(crate) fn define(&mut self, key: MarkerKey, value: usize, owner: ContributorId) {
		self.entries.insert(key, Marker { value, owner });
	}

	/// Moves every marker positioned after `idx`, plus `exempt`, by `delta`.
	///
	/// `exempt` is the marker an insertion was made at: it sits exactly at
	/// `idx` and has to travel with the inserted item so the next insertion at
	/// the same marker lands behind it.
	pub(crate) fn shift(&mut self, idx: usize, delta: isize, exempt: Option<&MarkerKey>) {
		for (key, marker) in self.entries.iter_mut() {
			if marker.value > idx || exempt == Some(key) {
				debug_assert!(
					marker.value.checked_add_signed(delta).is_some(),
					"marker {key} would move below zero"
				);
				marker.value = marker.value.saturating_add_signed(delta);
			}
		}
	}

	/// Drops every marker declared by `owner`; returns how many went.
	pub(crate) fn remove_owned_by(&mut self, owner: &ContributorId) -> usize {
		let before = self.entries.len();
		self.entries.retain(|_, marker| marker.owner != *owner);
		before - self.entries.len()
	}
}
