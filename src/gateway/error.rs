//! Client-facing error envelope for gateway routes.

// crates.io
use axum::{
	Json,
	http::{HeaderValue, StatusCode, header::RETRY_AFTER},
	response::{IntoResponse, Response},
};
// self
use crate::{_prelude::*, error::TransientError};

/// Failure returned by a gateway route; renders as `{"error": message}`.
#[derive(Debug, ThisError)]
pub enum GatewayError {
	/// Request body could not be decoded.
	#[error("{0}")]
	Body(String),
	/// Flow failure.
	#[error(transparent)]
	Flow(#[from] Error),
}
impl GatewayError {
	/// HTTP status for this failure.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Body(_) => StatusCode::BAD_REQUEST,
			Self::Flow(err) => match err {
				Error::Validation(_) | Error::ProviderRejected { .. } => StatusCode::BAD_REQUEST,
				Error::Transient(_) | Error::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
				Error::Protocol(_) => StatusCode::BAD_GATEWAY,
				Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
			},
		}
	}

	/// Message placed in the `error` field.
	pub fn message(&self) -> String {
		match self {
			Self::Flow(Error::Config(_)) => "Gateway is misconfigured.".into(),
			other => other.to_string(),
		}
	}

	/// Logs the failure for `operation` and hands it back.
	pub(crate) fn logged(self, operation: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			if self.status().is_server_error() {
				tracing::error!(operation, error = ?self, "Request failed.");
			} else {
				tracing::warn!(operation, error = %self, "Request rejected.");
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = operation;
		}

		self
	}

	fn retry_after(&self) -> Option<HeaderValue> {
		let Self::Flow(Error::Transient(TransientError::ProviderEndpoint { retry_after, .. })) = self
		else {
			return None;
		};
		let seconds = retry_after.filter(|delay| delay.is_positive())?.whole_seconds();

		HeaderValue::from_str(&seconds.max(1).to_string()).ok()
	}
}
impl IntoResponse for GatewayError {
	fn into_response(self) -> Response {
		#[derive(Serialize)]
		struct ErrorBody {
			error: String,
		}

		let status = self.status();
		let retry_after = self.retry_after();
		let mut response = (status, Json(ErrorBody { error: self.message() })).into_response();

		if let Some(value) = retry_after {
			response.headers_mut().insert(RETRY_AFTER, value);
		}

		response
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		error::{ConfigError, ProtocolError, ValidationError},
		provider::ProviderErrorKind,
	};

	#[test]
	fn statuses_follow_error_class() {
		let cases = [
			(GatewayError::Body("bad json".into()), StatusCode::BAD_REQUEST),
			(
				Error::from(ValidationError::MissingField { field: "email" }).into(),
				StatusCode::BAD_REQUEST,
			),
			(
				Error::rejected(ProviderErrorKind::NotConfirmed, "User is not confirmed.").into(),
				StatusCode::BAD_REQUEST,
			),
			(Error::from(ProtocolError::MissingAuthenticationResult).into(), StatusCode::BAD_GATEWAY),
			(
				Error::from(TransientError::ProviderEndpoint {
					message: "throttled".into(),
					status: Some(429),
					retry_after: None,
				})
				.into(),
				StatusCode::SERVICE_UNAVAILABLE,
			),
			(
				Error::from(ConfigError::MissingValue { name: "client_secret" }).into(),
				StatusCode::INTERNAL_SERVER_ERROR,
			),
		];

		for (err, expected) in cases {
			assert_eq!(err.status(), expected, "{err:?} should map to {expected}.");
		}
	}

	#[test]
	fn config_details_stay_private() {
		let err = GatewayError::from(Error::from(ConfigError::MissingValue { name: "client_secret" }));

		assert_eq!(err.message(), "Gateway is misconfigured.");
	}

	#[test]
	fn retry_hint_becomes_header() {
		let err = GatewayError::from(Error::from(TransientError::ProviderEndpoint {
			message: "slow down".into(),
			status: Some(429),
			retry_after: Some(Duration::seconds(7)),
		}));
		let response = err.into_response();

		assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()), Some("7"));
	}
}
