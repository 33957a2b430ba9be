//! Cognito user-pool client speaking the JSON RPC protocol.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, Secret, SecretHash, Username},
	error::{ConfigError, ProtocolError, TransientError, TransportError},
	http::{ProviderHttpClient, ProviderRequest, ProviderResponse, ResponseMetadata, ResponseMetadataSlot},
	idp::{
		ConfirmSignUpOutput, IdentityProviderClient, InitiateAuthOutput, ProviderFuture,
		SignUpOutput, UserAttribute,
	},
	provider::{
		ProviderDescriptor, ProviderErrorContext, ProviderErrorKind, ProviderOperation,
		ProviderStrategy,
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Cognito client specialized for the crate's default reqwest transport stack.
pub type ReqwestCognitoClient = CognitoClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Maps HTTP transport failures into gateway [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an error emitted by the transport into a gateway error.
	fn map_transport_error(
		&self,
		operation: ProviderOperation,
		metadata: Option<&ResponseMetadata>,
		error: E,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: ProviderOperation,
		meta: Option<&ResponseMetadata>,
		err: ReqwestError,
	) -> Error {
		if err.is_builder() {
			return ConfigError::from(err).into();
		}
		if err.is_timeout() {
			return TransientError::ProviderEndpoint {
				message: format!("Request timed out during {operation}."),
				status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
				retry_after: meta_retry_after(meta),
			}
			.into();
		}

		TransportError::from(err).into()
	}
}

/// Identity-provider client for a single Cognito app client.
///
/// The client owns the HTTP transport, descriptor, and strategy references; every call is
/// one round trip with no retry. The app client identifier travels in each request body,
/// while the secret hash is supplied per call by the flow.
pub struct CognitoClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider descriptor that defines the user-pool endpoint.
	pub descriptor: ProviderDescriptor,
	/// Strategy responsible for classifying provider failures.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// App client identifier sent with every action.
	pub client_id: ClientId,
}
impl<C, M> CognitoClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		client_id: ClientId,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			strategy,
			client_id,
		}
	}

	async fn call<B, T>(&self, operation: ProviderOperation, body: &B) -> Result<T>
	where
		B: Serialize + Sync,
		T: DeserializeOwned,
	{
		let request = ProviderRequest {
			endpoint: self.descriptor.endpoint.clone(),
			target: operation.target(),
			body: serde_json::to_vec(body).map_err(ConfigError::RequestEncode)?,
		};
		let slot = ResponseMetadataSlot::default();
		let response = self.http_client.execute(request, slot.clone()).await.map_err(|err| {
			self.transport_mapper.map_transport_error(operation, slot.take().as_ref(), err)
		})?;
		let meta = slot.take();

		if !response.is_success() {
			return Err(map_failure_response(
				self.strategy.as_ref(),
				operation,
				&response,
				meta.as_ref(),
			));
		}

		parse_success(operation, &response)
	}
}
#[cfg(feature = "reqwest")]
impl CognitoClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by the default reqwest transport.
	pub fn new(
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		client_id: ClientId,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self::with_http_client(
			descriptor,
			strategy,
			client_id,
			http_client,
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> IdentityProviderClient for CognitoClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn register<'a>(
		&'a self,
		username: &'a Username,
		password: &'a Secret,
		attributes: &'a [UserAttribute],
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, SignUpOutput> {
		Box::pin(async move {
			let body = SignUpRequest {
				client_id: &self.client_id,
				username,
				password: password.expose(),
				secret_hash: secret_hash.as_str(),
				user_attributes: attributes,
			};

			self.call(ProviderOperation::Register, &body).await
		})
	}

	fn confirm<'a>(
		&'a self,
		username: &'a Username,
		code: &'a str,
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, ConfirmSignUpOutput> {
		Box::pin(async move {
			let body = ConfirmSignUpRequest {
				client_id: &self.client_id,
				username,
				confirmation_code: code,
				secret_hash: secret_hash.as_str(),
			};

			self.call(ProviderOperation::Confirm, &body).await
		})
	}

	fn authenticate<'a>(
		&'a self,
		username: &'a Username,
		password: &'a Secret,
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, InitiateAuthOutput> {
		Box::pin(async move {
			let body = InitiateAuthRequest {
				auth_flow: USER_PASSWORD_AUTH,
				client_id: &self.client_id,
				auth_parameters: AuthParameters {
					username,
					password: password.expose(),
					secret_hash: secret_hash.as_str(),
				},
			};

			self.call(ProviderOperation::Authenticate, &body).await
		})
	}
}
impl<C, M> Debug for CognitoClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CognitoClient")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.finish()
	}
}

const USER_PASSWORD_AUTH: &str = "USER_PASSWORD_AUTH";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpRequest<'a> {
	client_id: &'a str,
	username: &'a str,
	password: &'a str,
	secret_hash: &'a str,
	user_attributes: &'a [UserAttribute],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmSignUpRequest<'a> {
	client_id: &'a str,
	username: &'a str,
	confirmation_code: &'a str,
	secret_hash: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
	auth_flow: &'static str,
	client_id: &'a str,
	auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct AuthParameters<'a> {
	username: &'a str,
	password: &'a str,
	secret_hash: &'a str,
}

#[derive(Default, Deserialize)]
struct ErrorBody {
	#[serde(rename = "__type")]
	error_type: Option<String>,
	#[serde(alias = "Message")]
	message: Option<String>,
}

fn parse_success<T>(operation: ProviderOperation, response: &ProviderResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) { b"{}" } else { &response.body };
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		ProtocolError::MalformedResponse {
			operation: operation.as_str(),
			source,
			status: Some(response.status),
		}
		.into()
	})
}

fn map_failure_response(
	strategy: &dyn ProviderStrategy,
	operation: ProviderOperation,
	response: &ProviderResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let mut ctx = ProviderErrorContext::new(operation).with_http_status(response.status);

	match serde_json::from_slice::<ErrorBody>(&response.body) {
		Ok(body) => {
			if let Some(error_type) = body.error_type.or_else(|| response.error_type.clone()) {
				ctx = ctx.with_error_type(error_type);
			}
			if let Some(message) = body.message {
				ctx = ctx.with_message(message);
			}
		},
		Err(_) => {
			if let Some(error_type) = &response.error_type {
				ctx = ctx.with_error_type(error_type);
			}

			ctx = ctx.with_body_preview(String::from_utf8_lossy(&response.body).into_owned());
		},
	}

	let message = ctx.display_message();

	match strategy.classify_error(&ctx) {
		ProviderErrorKind::Transient => TransientError::ProviderEndpoint {
			message,
			status: meta_status(meta).or(Some(response.status)),
			retry_after: meta_retry_after(meta),
		}
		.into(),
		kind => Error::rejected(kind, message),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::DefaultProviderStrategy;

	fn response(status: u16, body: &str) -> ProviderResponse {
		ProviderResponse { status, error_type: None, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn initiate_auth_body_matches_wire_shape() {
		let body = InitiateAuthRequest {
			auth_flow: USER_PASSWORD_AUTH,
			client_id: "client-123",
			auth_parameters: AuthParameters {
				username: "alice",
				password: "hunter2",
				secret_hash: "tag=",
			},
		};
		let value = serde_json::to_value(&body).expect("Request should serialize.");

		assert_eq!(
			value,
			serde_json::json!({
				"AuthFlow": "USER_PASSWORD_AUTH",
				"ClientId": "client-123",
				"AuthParameters": { "USERNAME": "alice", "PASSWORD": "hunter2", "SECRET_HASH": "tag=" }
			})
		);
	}

	#[test]
	fn failure_body_maps_to_rejection_with_verbatim_message() {
		let err = map_failure_response(
			&DefaultProviderStrategy,
			ProviderOperation::Register,
			&response(400, r#"{"__type":"UsernameExistsException","message":"User already exists"}"#),
			None,
		);

		assert_eq!(err.rejection_kind(), Some(ProviderErrorKind::InvalidRequest));
		assert_eq!(err.to_string(), "User already exists");
	}

	#[test]
	fn header_error_type_is_used_when_body_is_opaque() {
		let mut raw = response(400, "<html>nope</html>");

		raw.error_type = Some("UserNotConfirmedException:http://internal.amazon.com/".into());

		let err = map_failure_response(
			&DefaultProviderStrategy,
			ProviderOperation::Authenticate,
			&raw,
			None,
		);

		assert_eq!(err.rejection_kind(), Some(ProviderErrorKind::NotConfirmed));
		assert_eq!(err.to_string(), "UserNotConfirmedException");
	}

	#[test]
	fn throttling_becomes_transient_with_retry_hint() {
		let meta = ResponseMetadata { status: Some(400), retry_after: Some(Duration::seconds(3)) };
		let err = map_failure_response(
			&DefaultProviderStrategy,
			ProviderOperation::Authenticate,
			&response(400, r#"{"__type":"TooManyRequestsException","message":"Rate exceeded"}"#),
			Some(&meta),
		);

		assert!(matches!(
			err,
			Error::Transient(TransientError::ProviderEndpoint { ref message, status: Some(400), retry_after: Some(_) })
				if message == "Rate exceeded"
		));
	}

	#[test]
	fn empty_success_body_reads_as_empty_object() {
		let output: ConfirmSignUpOutput = parse_success(ProviderOperation::Confirm, &response(200, ""))
			.expect("Empty success body should parse.");

		assert_eq!(output, ConfirmSignUpOutput::default());

		let err = parse_success::<SignUpOutput>(ProviderOperation::Register, &response(200, "[1,2]"))
			.expect_err("Unexpected shapes must not parse.");

		assert!(matches!(err, Error::Protocol(ProtocolError::MalformedResponse { operation: "register", .. })));
	}
}
