//! Contribution composition.
//!
//! Independently loaded contributors describe pieces of one shared tree of
//! containers in a [`splice_descriptor`] document. The [`CompositionEngine`]
//! merges those pieces into a single tree, asking a [`Builder`] to create the
//! concrete containers, and can later take any one contributor back out
//! without disturbing the others or their relative order.
//!
//! Merge markers declared in a descriptor act as named insertion cursors:
//! content from other contributors lands at the marker instead of being
//! appended.
//!
//! ```
//! use splice_compose::headless::{HeadlessBuilder, StaticContributor};
//! use splice_compose::CompositionEngine;
//! use splice_descriptor::{ContainerDecl, DescriptorNode};
//!
//! let shell = StaticContributor::new(
//! 	"shell",
//! 	ContainerDecl::new("gui").child(
//! 		ContainerDecl::new("menu")
//! 			.with_identity("file")
//! 			.child(DescriptorNode::entry("open"))
//! 			.child(DescriptorNode::merge())
//! 			.child(DescriptorNode::entry("quit")),
//! 	),
//! );
//! let plugin = StaticContributor::new(
//! 	"plugin",
//! 	ContainerDecl::new("gui").child(ContainerDecl::new("menu").with_identity("file").child(DescriptorNode::entry("export"))),
//! );
//!
//! let mut engine = CompositionEngine::new(HeadlessBuilder::new(), HeadlessBuilder::ROOT);
//! engine.add_contributor(&shell);
//! engine.add_contributor(&plugin);
//!
//! let file = engine.find_container("file", None).unwrap();
//! assert_eq!(engine.builder().entry_names(file), ["open", "export", "quit"]);
//!
//! engine.remove_contributor(&plugin);
//! assert_eq!(engine.builder().entry_names(file), ["open", "quit"]);
//! ```

mod action_list;
mod builder;
mod compose;
mod config;
mod contributor;
mod decompose;
mod engine;
mod error;
pub mod headless;
mod ids;
pub mod invariants;
mod marker;
mod snapshot;
mod tree;

pub use builder::Builder;
pub use config::{ComposeConfig, DEFAULT_MARKER};
pub use contributor::{Contributor, state_key};
pub use engine::CompositionEngine;
pub use error::{ComposeError, InvariantViolation, Result};
pub use ids::{ContainerHandle, ContainerId, ContributorId, EntryHandle, NodeId, SeparatorId, StateBlob};
pub use marker::{Marker, MarkerKey, MarkerTable};
pub use snapshot::{ItemSnapshot, MarkerSnapshot, NodeSnapshot, RecordSnapshot, TreeSnapshot};
pub use tree::{CompositionTree, ContainerNode, ContributionRecord, Item};
