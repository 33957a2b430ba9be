//! Identity registration.
//!
//! [`RegistrationFlow::sign_up`] validates the payload locally, binds a fresh secret hash,
//! and forwards the attributes to the provider. A successful call leaves the identity in
//! `PendingConfirmation` unless the pool confirms automatically.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	flows::{RegistrationFlow, common::{self, FlowReply}},
	idp::{IdentityProviderClient, SignUpOutput, UserAttribute},
	obs::FlowKind,
};

/// Reply message for a successful registration.
pub const SIGN_UP_MESSAGE: &str = "User signed up successfully";

/// Registration payload; absent fields deserialize as empty and fail validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrationRequest {
	/// Desired username.
	pub username: String,
	/// Initial password, checked against the pool's policy by the provider.
	pub password: Secret,
	/// Email attribute; receives the confirmation code.
	pub email: String,
	/// Free-text gender attribute, sent only when non-empty.
	pub gender: String,
}

impl<P> RegistrationFlow<P>
where
	P: ?Sized + IdentityProviderClient,
{
	/// Registers a new identity.
	pub async fn sign_up(&self, request: RegistrationRequest) -> Result<FlowReply<SignUpOutput>> {
		common::observe(FlowKind::SignUp, "sign_up", self.sign_up_now(request)).await
	}

	async fn sign_up_now(&self, request: RegistrationRequest) -> Result<FlowReply<SignUpOutput>> {
		let username = common::require_username(&request.username)?;
		let password = common::require_secret("password", &request.password)?;
		let email = common::require_text("email", &request.email)?;
		let attributes = registration_attributes(email, &request.gender);
		let secret_hash = self.binder.compute_tag(&username);
		let output = self.provider.register(&username, password, &attributes, &secret_hash).await?;

		#[cfg(feature = "tracing")]
		tracing::info!(username = %username, state = ?output.state(), "Identity registered.");

		Ok(FlowReply::new(SIGN_UP_MESSAGE, output))
	}
}

fn registration_attributes(email: &str, gender: &str) -> Vec<UserAttribute> {
	let mut attributes = vec![UserAttribute::new("email", email)];

	if !gender.is_empty() {
		attributes.push(UserAttribute::new("gender", gender));
	}

	attributes
}
