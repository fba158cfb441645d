//! Contribution descriptors.
//!
//! A descriptor is the already-parsed document a contributor hands to the
//! composition engine: an ordered tree of containers, entries, separators and
//! slot markers. This crate only models that tree. Turning a concrete document
//! format into it is the caller's job; every type here is `serde`
//! (de)serializable so any format with a serde backend can produce one.
//!
//! ```
//! use splice_descriptor::{ContainerDecl, DescriptorNode};
//!
//! let gui = ContainerDecl::new("gui").child(
//! 	ContainerDecl::new("menu")
//! 		.with_identity("file")
//! 		.child(DescriptorNode::entry("file_open"))
//! 		.child(DescriptorNode::merge())
//! 		.child(DescriptorNode::separator())
//! 		.child(DescriptorNode::entry("file_quit")),
//! );
//! assert!(gui.problems().is_empty());
//! ```

mod node;
mod problems;

pub use node::{ContainerDecl, DescriptorNode, EntryDecl, MergeDecl, SeparatorDecl};
pub use problems::{DescriptorProblem, ProblemKind};
