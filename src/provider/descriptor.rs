//! Provider descriptor data structures shared by the identity-provider clients.
//!
//! The module exposes validated metadata and the supporting builder so a user pool can be
//! described in a transport-agnostic way.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Immutable provider descriptor consumed by identity-provider clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	/// Region hosting the user pool (e.g. `us-east-1`).
	pub region: String,
	/// JSON RPC endpoint receiving every user-pool action.
	pub endpoint: Url,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided region.
	pub fn builder(region: impl Into<String>) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(region)
	}
}
