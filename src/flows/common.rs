//! Shared helpers for flow implementations (payload validation, reply envelopes, outcome
//! recording).

// self
use crate::{
	_prelude::*,
	auth::{Secret, Username},
	error::ValidationError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Success envelope returned by sign-up and confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlowReply<T> {
	/// Human-readable summary.
	pub message: &'static str,
	/// Provider payload, passed through unchanged.
	pub result: T,
}
impl<T> FlowReply<T> {
	/// Wraps `result` with `message`.
	pub fn new(message: &'static str, result: T) -> Self {
		Self { message, result }
	}
}

/// Requires a non-empty text field.
pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::MissingField { field });
	}

	Ok(value)
}

/// Requires a non-empty secret field.
pub fn require_secret<'a>(field: &'static str, value: &'a Secret) -> Result<&'a Secret, ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::MissingField { field });
	}

	Ok(value)
}

/// Parses the `username` field into a validated [`Username`].
pub fn require_username(value: &str) -> Result<Username, ValidationError> {
	const FIELD: &str = "username";

	require_text(FIELD, value)?;

	Username::new(value)
		.map_err(|err| ValidationError::InvalidField { field: FIELD, reason: err.to_string() })
}

/// Runs `fut` inside a flow span and records attempt/success/failure counters.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	obs::record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
	}

	result
}
