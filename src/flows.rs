//! Registration flow orchestrators: sign-up, confirmation, and password sign-in.
//!
//! [`RegistrationFlow`] owns the identity-provider handle and the [`SecretBinder`] so the
//! individual operations only validate their payload, bind a fresh secret hash, and forward
//! the call. The flow keeps no state between calls; the identity lifecycle
//! (`PendingConfirmation` → `Confirmed`) lives entirely in the provider.

pub mod common;

mod confirm;
mod sign_in;
mod sign_up;

pub use common::*;
pub use confirm::*;
pub use sign_in::*;
pub use sign_up::*;

// self
use crate::{_prelude::*, auth::SecretBinder, idp::IdentityProviderClient};
#[cfg(feature = "reqwest")] use crate::idp::ReqwestCognitoClient;

#[cfg(feature = "reqwest")]
/// Flow specialized for the crate's default reqwest-backed Cognito client.
pub type ReqwestRegistrationFlow = RegistrationFlow<ReqwestCognitoClient>;

/// Coordinates the three-step registration protocol against a single identity provider.
///
/// Cloning is cheap: the provider sits behind an [`Arc`] and the binder only holds the keyed
/// MAC state, so one flow can be shared by every concurrent request handler.
pub struct RegistrationFlow<P>
where
	P: ?Sized + IdentityProviderClient,
{
	/// Identity provider receiving every remote call.
	pub provider: Arc<P>,
	/// Binder computing the per-call secret hash.
	pub binder: SecretBinder,
}
impl<P> RegistrationFlow<P>
where
	P: ?Sized + IdentityProviderClient,
{
	/// Creates a flow over `provider`, binding every call with `binder`.
	pub fn new(provider: impl Into<Arc<P>>, binder: SecretBinder) -> Self {
		Self { provider: provider.into(), binder }
	}
}
impl<P> Clone for RegistrationFlow<P>
where
	P: ?Sized + IdentityProviderClient,
{
	fn clone(&self) -> Self {
		Self { provider: self.provider.clone(), binder: self.binder.clone() }
	}
}
impl<P> Debug for RegistrationFlow<P>
where
	P: ?Sized + IdentityProviderClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegistrationFlow").field("binder", &self.binder).finish_non_exhaustive()
	}
}
