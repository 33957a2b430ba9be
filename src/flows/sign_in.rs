//! Password sign-in (`USER_PASSWORD_AUTH`).
//!
//! Only a confirmed identity receives tokens. A provider answer that carries no
//! `AuthenticationResult`, lacks one of the three tokens, or asks for a further challenge is a
//! [`ProtocolError`], never a partially populated session.

// self
use crate::{
	_prelude::*,
	auth::{AuthSession, Secret},
	error::ProtocolError,
	flows::{RegistrationFlow, common},
	idp::{IdentityProviderClient, InitiateAuthOutput},
	obs::FlowKind,
};

/// Reply message for a successful sign-in.
pub const SIGN_IN_MESSAGE: &str = "Sign-in successful";

/// Sign-in payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
	/// Username of a confirmed identity.
	pub username: String,
	/// Current password.
	pub password: Secret,
}

/// Success envelope for sign-in: the message plus the flattened session tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignInReply {
	/// Human-readable summary.
	pub message: &'static str,
	/// Issued session tokens.
	#[serde(flatten)]
	pub session: AuthSession,
}

impl<P> RegistrationFlow<P>
where
	P: ?Sized + IdentityProviderClient,
{
	/// Exchanges a password for session tokens.
	pub async fn sign_in(&self, request: SignInRequest) -> Result<SignInReply> {
		common::observe(FlowKind::SignIn, "sign_in", self.sign_in_now(request)).await
	}

	async fn sign_in_now(&self, request: SignInRequest) -> Result<SignInReply> {
		let username = common::require_username(&request.username)?;
		let password = common::require_secret("password", &request.password)?;
		let secret_hash = self.binder.compute_tag(&username);
		let output = self.provider.authenticate(&username, password, &secret_hash).await?;
		let session = extract_session(output)?;

		Ok(SignInReply { message: SIGN_IN_MESSAGE, session })
	}
}

fn extract_session(output: InitiateAuthOutput) -> Result<AuthSession, ProtocolError> {
	let Some(result) = output.authentication_result else {
		return Err(match output.challenge_name {
			Some(challenge) => ProtocolError::UnexpectedChallenge { challenge },
			None => ProtocolError::MissingAuthenticationResult,
		});
	};
	let access_token = require_token(result.access_token, "AccessToken")?;
	let id_token = require_token(result.id_token, "IdToken")?;
	let refresh_token = require_token(result.refresh_token, "RefreshToken")?;

	Ok(AuthSession { access_token, id_token, refresh_token })
}

fn require_token(token: Option<Secret>, field: &'static str) -> Result<Secret, ProtocolError> {
	token.filter(|token| !token.is_empty()).ok_or(ProtocolError::MissingToken { field })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::idp::AuthenticationResult;

	fn tokens(access: Option<&str>, id: Option<&str>, refresh: Option<&str>) -> InitiateAuthOutput {
		InitiateAuthOutput {
			authentication_result: Some(AuthenticationResult {
				access_token: access.map(Secret::new),
				id_token: id.map(Secret::new),
				refresh_token: refresh.map(Secret::new),
				..AuthenticationResult::default()
			}),
			..InitiateAuthOutput::default()
		}
	}

	#[test]
	fn complete_result_becomes_session() {
		let session = extract_session(tokens(Some("a"), Some("b"), Some("c")))
			.expect("Complete token block should convert.");

		assert_eq!(session.access_token.expose(), "a");
		assert_eq!(session.id_token.expose(), "b");
		assert_eq!(session.refresh_token.expose(), "c");
	}

	#[test]
	fn missing_or_blank_tokens_are_protocol_errors() {
		assert!(matches!(
			extract_session(tokens(Some("a"), None, Some("c"))),
			Err(ProtocolError::MissingToken { field: "IdToken" })
		));
		assert!(matches!(
			extract_session(tokens(Some("a"), Some("b"), Some(""))),
			Err(ProtocolError::MissingToken { field: "RefreshToken" })
		));
		assert!(matches!(
			extract_session(InitiateAuthOutput::default()),
			Err(ProtocolError::MissingAuthenticationResult)
		));
	}

	#[test]
	fn challenges_are_reported_by_name() {
		let output = InitiateAuthOutput {
			challenge_name: Some("NEW_PASSWORD_REQUIRED".into()),
			session: Some("opaque".into()),
			..InitiateAuthOutput::default()
		};

		assert!(matches!(
			extract_session(output),
			Err(ProtocolError::UnexpectedChallenge { challenge }) if challenge == "NEW_PASSWORD_REQUIRED"
		));
	}

	#[test]
	fn reply_flattens_tokens() {
		let reply = SignInReply {
			message: SIGN_IN_MESSAGE,
			session: AuthSession {
				access_token: Secret::new("a"),
				id_token: Secret::new("b"),
				refresh_token: Secret::new("c"),
			},
		};

		assert_eq!(
			serde_json::to_value(&reply).expect("Reply should serialize."),
			serde_json::json!({
				"message": "Sign-in successful",
				"accessToken": "a",
				"idToken": "b",
				"refreshToken": "c",
			})
		);
	}
}
