//! Provider strategy hooks that classify identity-provider failures.
//!
//! Implementations normalize error mapping without tying clients to any particular HTTP
//! stack.

// self
use crate::{_prelude::*, provider::ProviderOperation};

/// Strategy hook that maps provider failures into the gateway taxonomy.
///
/// Implementors are required to be `Send + Sync`, and the hook intentionally uses
/// crate-owned data types so downstream crates never depend on reqwest-specific
/// structures.
pub trait ProviderStrategy: Send + Sync {
	/// Classifies a failed user-pool call.
	fn classify_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
	/// Password policy, duplicate username, or malformed attribute.
	InvalidRequest,
	/// Confirmation code is wrong or expired.
	InvalidCode,
	/// Username is unknown, or has nothing left to confirm.
	NotFound,
	/// Username/password pair was refused.
	InvalidCredentials,
	/// Identity has not completed confirmation yet.
	NotConfirmed,
	/// App client is unknown or the secret hash did not verify.
	InvalidClient,
	/// Any other structured refusal.
	Rejected,
	/// Failure is temporary and should be retried.
	Transient,
}
impl ProviderErrorKind {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderErrorKind::InvalidRequest => "invalid_request",
			ProviderErrorKind::InvalidCode => "invalid_code",
			ProviderErrorKind::NotFound => "not_found",
			ProviderErrorKind::InvalidCredentials => "invalid_credentials",
			ProviderErrorKind::NotConfirmed => "not_confirmed",
			ProviderErrorKind::InvalidClient => "invalid_client",
			ProviderErrorKind::Rejected => "rejected",
			ProviderErrorKind::Transient => "transient",
		}
	}
}
impl Display for ProviderErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Context passed to provider strategies when classifying failures.
///
/// The struct keeps only primitive data (status codes, exception name, message, body
/// preview) so strategies stay decoupled from any HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Operation associated with the failing request.
	pub operation: ProviderOperation,
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Exception name (`__type` without its namespace).
	pub error_type: Option<String>,
	/// Provider-supplied message.
	pub message: Option<String>,
	/// Preview of the response body for payloads that are not structured errors.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context scoped to the provided operation.
	pub fn new(operation: ProviderOperation) -> Self {
		Self { operation, http_status: None, error_type: None, message: None, body_preview: None }
	}

	/// Adds an HTTP status code (e.g., 400, 429, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the exception name, stripping any `namespace#` prefix or `:` suffix.
	pub fn with_error_type(mut self, error_type: impl AsRef<str>) -> Self {
		let name = normalize_error_type(error_type.as_ref());

		if !name.is_empty() {
			self.error_type = Some(name.to_owned());
		}

		self
	}

	/// Adds the provider message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());

		self
	}

	/// Adds a body preview for responses that are not structured errors; blank bodies are
	/// ignored.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		let body = body.into();

		if !body.trim().is_empty() {
			self.body_preview = Some(truncate_preview(body));
		}

		self
	}

	/// Message to surface to the caller, falling back to the exception name or the body.
	pub fn display_message(&self) -> String {
		self.message
			.clone()
			.or_else(|| self.error_type.clone())
			.or_else(|| self.body_preview.clone())
			.unwrap_or_else(|| match self.http_status {
				Some(status) => format!("Identity provider returned HTTP {status}."),
				None => "Identity provider request failed.".into(),
			})
	}
}

/// Default strategy for Cognito user pools.
///
/// It prioritizes the exception name, then the message for secret-hash failures, and
/// finally the HTTP status code.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if let Some(kind) = classify_error_type(ctx) {
			return kind;
		}

		classify_status(ctx.http_status)
	}
}

fn normalize_error_type(raw: &str) -> &str {
	let name = raw.rsplit('#').next().unwrap_or(raw);

	name.split(':').next().unwrap_or(name).trim()
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ProviderErrorContext::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

fn classify_error_type(ctx: &ProviderErrorContext) -> Option<ProviderErrorKind> {
	let kind = match ctx.error_type.as_deref()? {
		"UsernameExistsException"
		| "InvalidPasswordException"
		| "InvalidParameterException"
		| "CodeDeliveryFailureException"
		| "AliasExistsException" => ProviderErrorKind::InvalidRequest,
		"CodeMismatchException" | "ExpiredCodeException" => ProviderErrorKind::InvalidCode,
		"UserNotFoundException" => ProviderErrorKind::NotFound,
		"UserNotConfirmedException" => ProviderErrorKind::NotConfirmed,
		"ResourceNotFoundException" => ProviderErrorKind::InvalidClient,
		"NotAuthorizedException" if mentions_secret_hash(ctx.message.as_deref()) =>
			ProviderErrorKind::InvalidClient,
		"NotAuthorizedException" if ctx.operation == ProviderOperation::Confirm =>
			ProviderErrorKind::NotFound,
		"NotAuthorizedException" | "PasswordResetRequiredException" =>
			ProviderErrorKind::InvalidCredentials,
		"TooManyFailedAttemptsException" if ctx.operation == ProviderOperation::Confirm =>
			ProviderErrorKind::InvalidCode,
		"TooManyFailedAttemptsException" => ProviderErrorKind::Rejected,
		"TooManyRequestsException" | "LimitExceededException" | "InternalErrorException" =>
			ProviderErrorKind::Transient,
		_ => return None,
	};

	Some(kind)
}

fn mentions_secret_hash(message: Option<&str>) -> bool {
	message.is_some_and(|text| text.to_ascii_lowercase().contains("secret hash"))
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(429) => ProviderErrorKind::Transient,
		Some(code) if code >= 500 => ProviderErrorKind::Transient,
		Some(code) if (400..500).contains(&code) => ProviderErrorKind::Rejected,
		_ => ProviderErrorKind::Transient,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn classify(ctx: ProviderErrorContext) -> ProviderErrorKind {
		DefaultProviderStrategy.classify_error(&ctx)
	}

	#[test]
	fn exception_names_drive_classification() {
		let cases = [
			("UsernameExistsException", ProviderErrorKind::InvalidRequest),
			("InvalidPasswordException", ProviderErrorKind::InvalidRequest),
			("CodeMismatchException", ProviderErrorKind::InvalidCode),
			("ExpiredCodeException", ProviderErrorKind::InvalidCode),
			("UserNotFoundException", ProviderErrorKind::NotFound),
			("UserNotConfirmedException", ProviderErrorKind::NotConfirmed),
			("TooManyRequestsException", ProviderErrorKind::Transient),
			("TooManyFailedAttemptsException", ProviderErrorKind::Rejected),
		];

		for (name, expected) in cases {
			let ctx = ProviderErrorContext::new(ProviderOperation::Authenticate)
				.with_http_status(400)
				.with_error_type(name);

			assert_eq!(classify(ctx), expected, "{name} should classify as {expected}.");
		}
	}

	#[test]
	fn error_type_namespace_and_header_suffix_are_stripped() {
		let namespaced = ProviderErrorContext::new(ProviderOperation::Register)
			.with_error_type("com.amazonaws.cognito.identity.idp.model#UsernameExistsException");
		let header = ProviderErrorContext::new(ProviderOperation::Register)
			.with_error_type("UsernameExistsException:http://internal.amazon.com/coral/");

		assert_eq!(namespaced.error_type.as_deref(), Some("UsernameExistsException"));
		assert_eq!(header.error_type.as_deref(), Some("UsernameExistsException"));
	}

	#[test]
	fn not_authorized_depends_on_operation_and_message() {
		let sign_in = ProviderErrorContext::new(ProviderOperation::Authenticate)
			.with_error_type("NotAuthorizedException")
			.with_message("Incorrect username or password.");
		let confirm = ProviderErrorContext::new(ProviderOperation::Confirm)
			.with_error_type("NotAuthorizedException")
			.with_message("User cannot be confirmed. Current status is CONFIRMED");
		let bad_hash = ProviderErrorContext::new(ProviderOperation::Authenticate)
			.with_error_type("NotAuthorizedException")
			.with_message("Unable to verify secret hash for client 7d9sl2hq4jv0r1example");

		assert_eq!(classify(sign_in), ProviderErrorKind::InvalidCredentials);
		assert_eq!(classify(confirm), ProviderErrorKind::NotFound);
		assert_eq!(classify(bad_hash), ProviderErrorKind::InvalidClient);
	}

	#[test]
	fn failed_attempt_lockout_is_not_retryable() {
		let sign_in = ProviderErrorContext::new(ProviderOperation::Authenticate)
			.with_http_status(400)
			.with_error_type("TooManyFailedAttemptsException");
		let confirm = ProviderErrorContext::new(ProviderOperation::Confirm)
			.with_http_status(400)
			.with_error_type("TooManyFailedAttemptsException");

		assert_eq!(classify(sign_in), ProviderErrorKind::Rejected);
		assert_eq!(classify(confirm), ProviderErrorKind::InvalidCode);
	}

	#[test]
	fn falls_back_to_status() {
		let unknown_4xx = ProviderErrorContext::new(ProviderOperation::Register)
			.with_http_status(400)
			.with_error_type("BrandNewException");
		let throttled = ProviderErrorContext::new(ProviderOperation::Register).with_http_status(429);
		let server = ProviderErrorContext::new(ProviderOperation::Register).with_http_status(503);

		assert_eq!(classify(unknown_4xx), ProviderErrorKind::Rejected);
		assert_eq!(classify(throttled), ProviderErrorKind::Transient);
		assert_eq!(classify(server), ProviderErrorKind::Transient);
	}

	#[test]
	fn display_message_prefers_provider_text() {
		let ctx = ProviderErrorContext::new(ProviderOperation::Authenticate)
			.with_error_type("UserNotConfirmedException")
			.with_message("User is not confirmed.");

		assert_eq!(ctx.display_message(), "User is not confirmed.");

		let bare = ProviderErrorContext::new(ProviderOperation::Authenticate).with_http_status(418);

		assert_eq!(bare.display_message(), "Identity provider returned HTTP 418.");

		let long = ProviderErrorContext::new(ProviderOperation::Register).with_body_preview("x".repeat(300));

		assert!(long.body_preview.as_deref().is_some_and(|preview| preview.ends_with('…')));
	}
}
