//! Structural lint for descriptors.
//!
//! The engine tolerates every problem reported here (the offending node is
//! skipped or treated as anonymous), so this pass exists to diagnose a
//! contributor before it is attached.

use std::fmt;

use crate::{ContainerDecl, DescriptorNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
	/// `define_group` without a name; ignored by the engine.
	UnnamedGroup,
	/// `action_list` without a name; ignored by the engine.
	UnnamedActionList,
	/// Container with an empty kind tag.
	EmptyKind,
	/// Container whose identity is present but blank.
	EmptyIdentity,
	/// Entry with an empty name.
	EmptyEntryName,
}

impl ProblemKind {
	pub fn message(self) -> &'static str {
		match self {
			Self::UnnamedGroup => "cannot define group without name",
			Self::UnnamedActionList => "cannot define action list without name",
			Self::EmptyKind => "container has no kind",
			Self::EmptyIdentity => "container identity is blank",
			Self::EmptyEntryName => "entry has no name",
		}
	}
}

/// A problem found at `path`, a `/`-separated trail of container labels
/// ending in the child position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorProblem {
	pub path: String,
	pub kind: ProblemKind,
}

impl fmt::Display for DescriptorProblem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.path, self.kind.message())
	}
}

impl ContainerDecl {
	/// Walks the descriptor and reports structural problems in document order.
	pub fn problems(&self) -> Vec<DescriptorProblem> {
		let mut out = Vec::new();
		collect(self, &self.label(), &mut out);
		out
	}
}

fn collect(decl: &ContainerDecl, path: &str, out: &mut Vec<DescriptorProblem>) {
	for (pos, child) in decl.children().iter().enumerate() {
		let here = format!("{path}/{pos}");
		let mut push = |kind| {
			out.push(DescriptorProblem {
				path: here.clone(),
				kind,
			})
		};
		match child {
			DescriptorNode::DefineGroup { name } if name.is_empty() => push(ProblemKind::UnnamedGroup),
			DescriptorNode::ActionList { name } if name.is_empty() => push(ProblemKind::UnnamedActionList),
			DescriptorNode::Entry(entry) if entry.name().is_empty() => push(ProblemKind::EmptyEntryName),
			DescriptorNode::Container(inner) => {
				if inner.kind().is_empty() {
					push(ProblemKind::EmptyKind);
				}
				if inner.has_blank_identity() {
					push(ProblemKind::EmptyIdentity);
				}
				collect(inner, &format!("{path}/{}", inner.label()), out);
			}
			_ => {}
		}
	}
}
