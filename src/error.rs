//! Gateway-level error types shared across flows, providers, and transports.

// self
use crate::{_prelude::*, provider::ProviderErrorKind};

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request failed local validation and never reached the provider.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered successfully but the payload broke the expected contract.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),

	/// Provider returned a structured failure; `message` is surfaced verbatim.
	#[error("{message}")]
	ProviderRejected {
		/// Classified failure kind.
		kind: ProviderErrorKind,
		/// Provider-supplied message.
		message: String,
	},
}
impl Error {
	/// Builds a [`Error::ProviderRejected`] value.
	pub fn rejected(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
		Self::ProviderRejected { kind, message: message.into() }
	}

	/// Returns the rejection kind when the provider refused the call.
	pub fn rejection_kind(&self) -> Option<ProviderErrorKind> {
		match self {
			Self::ProviderRejected { kind, .. } => Some(*kind),
			_ => None,
		}
	}

	/// Whether the provider could not be reached or asked the caller to back off.
	pub fn is_provider_unavailable(&self) -> bool {
		matches!(self, Self::Transient(_) | Self::Transport(_))
	}
}

/// Configuration and validation failures raised while wiring the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required configuration value is missing or blank.
	#[error("Configuration value `{name}` is required.")]
	MissingValue {
		/// Name of the missing value.
		name: &'static str,
	},
	/// A configuration value failed validation.
	#[error("Configuration value `{name}` is invalid: {reason}.")]
	InvalidValue {
		/// Name of the invalid value.
		name: &'static str,
		/// Human-readable reason.
		reason: String,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Outbound request body could not be serialized.
	#[error("Provider request could not be serialized.")]
	RequestEncode(#[source] serde_json::Error),
	/// Secret binder could not be keyed with the configured client secret.
	#[error("Client secret cannot key the secret hash.")]
	InvalidSecretKey,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Locally detected request problems.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was absent or empty.
	#[error("Missing required field: {field}.")]
	MissingField {
		/// Client-facing field name.
		field: &'static str,
	},
	/// A field was present but malformed.
	#[error("Invalid field {field}: {reason}")]
	InvalidField {
		/// Client-facing field name.
		field: &'static str,
		/// Human-readable reason.
		reason: String,
	},
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider signalled throttling or an internal fault.
	#[error("Identity provider is temporarily unavailable: {message}")]
	ProviderEndpoint {
		/// Provider- or gateway-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Provider responded successfully but the payload does not match the expected contract.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Success body could not be parsed into the expected shape.
	#[error("Identity provider returned a malformed {operation} response.")]
	MalformedResponse {
		/// Operation label.
		operation: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Sign-in succeeded without an `AuthenticationResult` block.
	#[error("Identity provider response is missing AuthenticationResult.")]
	MissingAuthenticationResult,
	/// `AuthenticationResult` lacks one of the session tokens.
	#[error("Identity provider response is missing {field}.")]
	MissingToken {
		/// Provider field name.
		field: &'static str,
	},
	/// Provider asked for an additional challenge instead of issuing tokens.
	#[error("Identity provider requested an unsupported {challenge} challenge.")]
	UnexpectedChallenge {
		/// Challenge name reported by the provider.
		challenge: String,
	},
}
