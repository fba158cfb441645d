//! Machine-checkable bookkeeping invariants of the composition tree.
//!
//! [`check`] walks every node and reports each broken invariant. The engine
//! runs it after every attach and detach when
//! [`crate::ComposeConfig::verify_invariants`] is set; the catalog in
//! `proofs` pins the algebraic laws that keep it green.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::InvariantViolation;
use crate::ids::{ContributorId, NodeId};
use crate::tree::{CompositionTree, ContainerNode, Item};

#[cfg(test)]
mod proofs;

/// Checks every node of `tree`.
pub fn check(tree: &CompositionTree) -> Result<(), Vec<InvariantViolation>> {
	let mut violations = Vec::new();
	for id in tree.preorder() {
		check_node(tree, id, &mut violations);
	}
	if violations.is_empty() { Ok(()) } else { Err(violations) }
}

fn check_node(tree: &CompositionTree, id: NodeId, out: &mut Vec<InvariantViolation>) {
	let node = &tree[id];
	let label = node.label();

	if node.next_index() != node.items().len() {
		out.push(InvariantViolation::IndexMismatch {
			node: label.clone(),
			next_index: node.next_index(),
			items: node.items().len(),
		});
	}

	for (key, marker) in node.markers().iter() {
		if marker.value() > node.next_index() {
			out.push(InvariantViolation::MarkerOutOfRange {
				node: label.clone(),
				marker: key.to_string(),
				value: marker.value(),
				next_index: node.next_index(),
			});
		}
	}

	check_records(node, &label, out);

	let slots: Vec<_> = node
		.items()
		.iter()
		.filter_map(|item| match item {
			Item::Container(child) => Some(*child),
			_ => None,
		})
		.collect();
	let mut linked = node.children().to_vec();
	let mut slotted = slots.clone();
	linked.sort_unstable();
	slotted.sort_unstable();
	let parents_ok = slots.iter().all(|&child| tree.get(child).and_then(ContainerNode::parent) == Some(id));
	if linked != slotted || !parents_ok {
		out.push(InvariantViolation::ChildMismatch { node: label.clone() });
	}

	let mut identities = FxHashSet::default();
	for &child in &slots {
		if let Some(identity) = tree.get(child).and_then(ContainerNode::identity)
			&& !identities.insert(identity)
		{
			out.push(InvariantViolation::DuplicateIdentity {
				node: label.clone(),
				identity: identity.to_owned(),
			});
		}
	}
}

/// Per contributor, the records must account for exactly the physical items.
fn check_records(node: &ContainerNode, label: &str, out: &mut Vec<InvariantViolation>) {
	#[derive(Default)]
	struct Tally {
		entries: FxHashMap<String, isize>,
		separators: FxHashMap<u64, isize>,
	}

	let mut tallies: FxHashMap<&ContributorId, Tally> = FxHashMap::default();
	for item in node.items() {
		match item {
			Item::Entry { contributor, handle, .. } => {
				*tallies.entry(contributor).or_default().entries.entry(handle.to_string()).or_default() += 1;
			}
			Item::Separator { contributor, id } => {
				*tallies.entry(contributor).or_default().separators.entry(id.0).or_default() += 1;
			}
			Item::Container(_) => {}
		}
	}

	for record in node.clients() {
		if record.is_empty() {
			out.push(InvariantViolation::EmptyRecord {
				node: label.to_owned(),
				contributor: record.contributor().clone(),
			});
		}
		let tally = tallies.entry(record.contributor()).or_default();
		let listed = record.entries().iter().chain(record.action_lists().flat_map(|(_, entries)| entries));
		for handle in listed {
			*tally.entries.entry(handle.to_string()).or_default() -= 1;
		}
		for id in record.separators() {
			*tally.separators.entry(id.0).or_default() -= 1;
		}
	}

	let mut broken: Vec<_> = tallies
		.into_iter()
		.filter(|(_, tally)| tally.entries.values().chain(tally.separators.values()).any(|&count| count != 0))
		.map(|(contributor, _)| contributor.clone())
		.collect();
	broken.sort();
	out.extend(broken.into_iter().map(|contributor| InvariantViolation::RecordMismatch {
		node: label.to_owned(),
		contributor,
	}));
}
