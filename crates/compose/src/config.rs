//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name unnamed merge markers are filed under.
pub const DEFAULT_MARKER: &str = "<default>";

/// Tunables of a [`crate::CompositionEngine`].
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```
/// use splice_compose::ComposeConfig;
///
/// let config = ComposeConfig::from_toml_str("persist_state = false").unwrap();
/// assert!(!config.persist_state);
/// assert_eq!(config.default_marker, "<default>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
	/// Marker name used by `merge` declarations that carry no name.
	pub default_marker: String,
	/// Hands builder state of destroyed containers to the owning contributor
	/// and back on re-creation.
	pub persist_state: bool,
	/// Re-checks every tree invariant after each attach and detach and logs
	/// the violations.
	pub verify_invariants: bool,
}

impl Default for ComposeConfig {
	fn default() -> Self {
		Self {
			default_marker: DEFAULT_MARKER.to_owned(),
			persist_state: true,
			verify_invariants: cfg!(debug_assertions),
		}
	}
}

impl ComposeConfig {
	pub fn from_toml_str(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}
}
