//! Confirmation-code submission.

// self
use crate::{
	_prelude::*,
	flows::{RegistrationFlow, common::{self, FlowReply}},
	idp::{ConfirmSignUpOutput, IdentityProviderClient},
	obs::FlowKind,
};

/// Reply message for a successful confirmation.
pub const CONFIRM_MESSAGE: &str = "User confirmed successfully";

/// Confirmation payload; the code travels as `code` on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfirmationRequest {
	/// Username awaiting confirmation.
	pub username: String,
	/// Code delivered out-of-band.
	#[serde(rename = "code")]
	pub confirmation_code: String,
}

impl<P> RegistrationFlow<P>
where
	P: ?Sized + IdentityProviderClient,
{
	/// Moves a pending identity to `Confirmed`.
	pub async fn confirm(
		&self,
		request: ConfirmationRequest,
	) -> Result<FlowReply<ConfirmSignUpOutput>> {
		common::observe(FlowKind::Confirm, "confirm", self.confirm_now(request)).await
	}

	async fn confirm_now(&self, request: ConfirmationRequest) -> Result<FlowReply<ConfirmSignUpOutput>> {
		let username = common::require_username(&request.username)?;
		let code = common::require_text("code", &request.confirmation_code)?;
		let secret_hash = self.binder.compute_tag(&username);
		let output = self.provider.confirm(&username, code, &secret_hash).await?;

		Ok(FlowReply::new(CONFIRM_MESSAGE, output))
	}
}
