use splice_descriptor::ContainerDecl;

use super::{CompositionTree, Item};
use crate::ids::{ContributorId, NodeId};

impl CompositionTree {
	/// Finds the existing child of `parent` that `decl` refers to.
	///
	/// A declaration with an identity matches the sibling carrying that
	/// identity, whoever owns it. An anonymous declaration only matches an
	/// anonymous sibling of the same kind owned by `contributor` that is not in
	/// `claimed` yet, so repeated anonymous declarations in one pass bind to
	/// distinct nodes.
	pub(crate) fn match_child(
		&self,
		parent: NodeId,
		decl: &ContainerDecl,
		contributor: &ContributorId,
		claimed: &[NodeId],
	) -> Option<NodeId> {
		let mut siblings = self[parent].items().iter().filter_map(|item| match item {
			Item::Container(child) => Some(*child),
			_ => None,
		});

		match decl.identity() {
			Some(identity) => siblings.find(|&child| self[child].identity() == Some(identity)),
			None => siblings.find(|&child| {
				let node = &self[child];
				node.identity().is_none()
					&& node.kind() == decl.kind()
					&& node.owner() == Some(contributor)
					&& !claimed.contains(&child)
			}),
		}
	}
}
