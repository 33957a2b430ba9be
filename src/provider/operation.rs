//! User-pool actions driven by the gateway.

// self
use crate::_prelude::*;

/// Remote operations exposed by the identity provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
	/// Create a pending identity.
	Register,
	/// Finalize a pending identity with its confirmation code.
	Confirm,
	/// Exchange a password for session tokens.
	Authenticate,
}
impl ProviderOperation {
	const TARGET_PREFIX: &'static str = "AWSCognitoIdentityProviderService";

	/// Returns a stable label for logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderOperation::Register => "register",
			ProviderOperation::Confirm => "confirm",
			ProviderOperation::Authenticate => "authenticate",
		}
	}

	/// User-pool API action name.
	pub const fn action(self) -> &'static str {
		match self {
			ProviderOperation::Register => "SignUp",
			ProviderOperation::Confirm => "ConfirmSignUp",
			ProviderOperation::Authenticate => "InitiateAuth",
		}
	}

	/// Value of the `X-Amz-Target` header selecting the action.
	pub fn target(self) -> String {
		format!("{}.{}", Self::TARGET_PREFIX, self.action())
	}
}
impl Display for ProviderOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
