//! Runtime entry lists plugged into `action_list` slots.

use tracing::trace;

use crate::builder::Builder;
use crate::ids::{ContributorId, EntryHandle};
use crate::marker::MarkerKey;
use crate::tree::{CompositionTree, Item};

/// Inserts `entries` contiguously at every `name` slot `contributor` owns.
///
/// Returns the number of items inserted across all slots.
pub(crate) fn plug(
	tree: &mut CompositionTree,
	builder: &mut impl Builder,
	contributor: &ContributorId,
	name: &str,
	entries: &[EntryHandle],
) -> usize {
	if entries.is_empty() {
		return 0;
	}
	let key = MarkerKey::ActionList(name.to_owned());
	let mut inserted = 0;

	for node in tree.preorder() {
		let target = &mut tree[node];
		let Some(slot) = target.markers().get(&key) else {
			continue;
		};
		if slot.owner() != contributor {
			continue;
		}

		let handle = target.handle();
		for entry in entries {
			let Some(idx) = target.markers().value(&key) else {
				break;
			};
			trace!(node = %target.label(), list = name, entry = %entry, idx, "plugging entry");
			target.insert_item(
				idx,
				Item::Entry {
					contributor: contributor.clone(),
					handle: entry.clone(),
					list: Some(name.to_owned()),
				},
			);
			target.adjust_indices(idx, 1, Some(&key));
			builder.plug_entry(handle, idx, entry);
			inserted += 1;
		}
		target.record_mut(contributor, None).set_action_list(name, entries.to_vec());
	}
	inserted
}

/// Removes whatever `contributor` plugged into its `name` slots.
///
/// Returns the number of items removed.
pub(crate) fn unplug(tree: &mut CompositionTree, builder: &mut impl Builder, contributor: &ContributorId, name: &str) -> usize {
	let mut removed = 0;

	for node in tree.preorder() {
		let target = &mut tree[node];
		let handle = target.handle();
		let positions = target.item_positions(|item| {
			matches!(item, Item::Entry { contributor: owner, list: Some(list), .. } if owner == contributor && list == name)
		});
		if positions.is_empty() {
			continue;
		}

		for pos in positions.into_iter().rev() {
			if let Item::Entry { handle: entry, .. } = target.remove_item(pos) {
				target.adjust_indices(pos, -1, None);
				builder.unplug_entry(handle, pos, &entry);
				removed += 1;
			}
		}
		for record in target.records_of_mut(contributor) {
			record.take_action_list(name);
		}
		target.drop_records(contributor, |record| record.is_empty());
	}
	removed
}
