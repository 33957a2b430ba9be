//! Identity-provider capability and the payloads it exchanges.
//!
//! [`IdentityProviderClient`] is the only seam between the registration flow and the
//! external user pool. Each method is a single round trip with no local retry; the
//! [`CognitoClient`] speaks the user-pool JSON protocol over any [`ProviderHttpClient`]
//! while [`MemoryIdentityProvider`] keeps a pool in-process for tests and demos.
//!
//! [`ProviderHttpClient`]: crate::http::ProviderHttpClient

pub mod cognito;
pub mod memory;

pub use cognito::*;
pub use memory::*;

// self
use crate::{
	_prelude::*,
	auth::{Secret, SecretHash, Username},
};

/// Future returned by every [`IdentityProviderClient`] call.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Remote operations offered by the identity provider.
pub trait IdentityProviderClient
where
	Self: 'static + Send + Sync,
{
	/// Requests creation of a new identity carrying `attributes`.
	fn register<'a>(
		&'a self,
		username: &'a Username,
		password: &'a Secret,
		attributes: &'a [UserAttribute],
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, SignUpOutput>;

	/// Finalizes a pending identity with its out-of-band confirmation code.
	fn confirm<'a>(
		&'a self,
		username: &'a Username,
		code: &'a str,
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, ConfirmSignUpOutput>;

	/// Exchanges a password for session tokens.
	fn authenticate<'a>(
		&'a self,
		username: &'a Username,
		password: &'a Secret,
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, InitiateAuthOutput>;
}

/// Named user attribute sent during registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
	/// Attribute name (`email`, `gender`, ...).
	pub name: String,
	/// Attribute value.
	pub value: String,
}
impl UserAttribute {
	/// Creates a new attribute pair.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self { name: name.into(), value: value.into() }
	}
}

/// Lifecycle state of an identity as reported by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityState {
	/// Registered, waiting for the confirmation code.
	PendingConfirmation,
	/// Confirmed and allowed to authenticate.
	Confirmed,
}

/// Where the provider sent the confirmation code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CodeDeliveryDetails {
	/// Masked destination (e.g. `a***@e***.com`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub destination: Option<String>,
	/// Delivery medium (`EMAIL`, `SMS`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_medium: Option<String>,
	/// Attribute the code verifies.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attribute_name: Option<String>,
}

/// Successful registration payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SignUpOutput {
	/// Whether the identity is already confirmed (auto-confirm pools).
	pub user_confirmed: bool,
	/// Provider-assigned subject identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_sub: Option<String>,
	/// Confirmation code delivery details.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code_delivery_details: Option<CodeDeliveryDetails>,
}
impl SignUpOutput {
	/// Lifecycle state after registration.
	pub fn state(&self) -> IdentityState {
		if self.user_confirmed { IdentityState::Confirmed } else { IdentityState::PendingConfirmation }
	}
}

/// Successful confirmation payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfirmSignUpOutput {
	/// Session usable for a follow-up passwordless sign-in, when the pool issues one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session: Option<String>,
}

/// Token block of a successful authentication.
///
/// Every field is optional on the wire; the flow decides which absences are protocol faults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthenticationResult {
	/// Access token.
	pub access_token: Option<Secret>,
	/// Identity token.
	pub id_token: Option<Secret>,
	/// Refresh token.
	pub refresh_token: Option<Secret>,
	/// Access-token lifetime in seconds.
	pub expires_in: Option<i64>,
	/// Token type (`Bearer`).
	pub token_type: Option<String>,
}

/// Successful authentication payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InitiateAuthOutput {
	/// Issued tokens; absent when the provider answers with a challenge instead.
	pub authentication_result: Option<AuthenticationResult>,
	/// Challenge requested before tokens can be issued.
	pub challenge_name: Option<String>,
	/// Session for answering the challenge.
	pub session: Option<String>,
	/// Challenge parameters.
	pub challenge_parameters: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sign_up_output_reads_provider_shape() {
		let output: SignUpOutput = serde_json::from_str(
			r#"{"UserConfirmed":false,"UserSub":"5f1c-sub","CodeDeliveryDetails":{"Destination":"a***@e***.com","DeliveryMedium":"EMAIL","AttributeName":"email"}}"#,
		)
		.expect("SignUp output should deserialize.");

		assert_eq!(output.state(), IdentityState::PendingConfirmation);
		assert_eq!(output.user_sub.as_deref(), Some("5f1c-sub"));
		assert_eq!(
			output.code_delivery_details.and_then(|details| details.delivery_medium).as_deref(),
			Some("EMAIL")
		);
	}

	#[test]
	fn initiate_auth_tolerates_missing_blocks() {
		let output: InitiateAuthOutput =
			serde_json::from_str(r#"{"ChallengeParameters":{}}"#).expect("Output should deserialize.");

		assert!(output.authentication_result.is_none());
		assert!(output.challenge_name.is_none());
	}
}
