//! Error types for the fallible parts of the engine surface.

use thiserror::Error;

use crate::ids::ContributorId;

/// Errors returned by the engine.
///
/// Composing and decomposing never fail; these cover configuration and the
/// maintenance operations that name something which may not exist.
#[derive(Debug, Error)]
pub enum ComposeError {
	/// Error parsing TOML configuration.
	#[error("config parse error: {0}")]
	ConfigParse(#[from] toml::de::Error),

	/// The contributor is not attached to the engine.
	#[error("contributor '{0}' is not attached")]
	NotAttached(ContributorId),

	/// No container carries the given identity.
	#[error("no container with identity '{0}'")]
	UnknownContainer(String),

	/// Tree bookkeeping is inconsistent.
	#[error("{} composition invariant(s) violated: {}", .0.len(), .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
	Invariants(Vec<InvariantViolation>),
}

/// A single broken tree invariant. Nodes are named by their label,
/// `kind[identity]` or the bare kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
	#[error("{node}: next_index {next_index} but {items} live item(s)")]
	IndexMismatch { node: String, next_index: usize, items: usize },

	#[error("{node}: marker {marker} at {value} is past next_index {next_index}")]
	MarkerOutOfRange {
		node: String,
		marker: String,
		value: usize,
		next_index: usize,
	},

	/// Records and physical items disagree about what `contributor` put here.
	#[error("{node}: records of '{contributor}' do not match the physical items")]
	RecordMismatch { node: String, contributor: ContributorId },

	#[error("{node}: empty record kept for '{contributor}'")]
	EmptyRecord { node: String, contributor: ContributorId },

	/// Child links and container item slots disagree.
	#[error("{node}: child list does not match container slots")]
	ChildMismatch { node: String },

	#[error("{node}: identity '{identity}' used by more than one child")]
	DuplicateIdentity { node: String, identity: String },
}

pub type Result<T> = std::result::Result<T, ComposeError>;
