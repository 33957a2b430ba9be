//! Transport primitives for identity-provider calls.
//!
//! The module exposes [`ProviderHttpClient`] alongside [`ResponseMetadata`] and
//! [`ResponseMetadataSlot`] so downstream crates can plug in custom HTTP clients without
//! losing the gateway's error classification. Implementations call
//! [`ResponseMetadataSlot::take`] before dispatching a request and
//! [`ResponseMetadataSlot::store`] once an HTTP status or retry hint is known, so failures
//! that happen after the headers arrive (body reads, timeouts) are still classified with
//! consistent metadata.

// std
#[cfg(feature = "reqwest")] use std::time::Duration as StdDuration;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Content type spoken by the user-pool JSON RPC endpoint.
pub const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";
/// Header selecting the user-pool action.
pub const AMZ_TARGET_HEADER: &str = "x-amz-target";
/// Header that may carry the exception name of a failed call.
pub const AMZ_ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Future returned by [`ProviderHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ProviderResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing user-pool actions.
///
/// The trait acts as the gateway's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so they can be shared across concurrent requests without
/// additional wrappers, and the futures they return must be `Send` so the gateway can run
/// them on a multi-threaded executor.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and records response metadata in `slot`.
	///
	/// # Metadata Contract
	///
	/// - Call [`ResponseMetadataSlot::take`] before submitting the HTTP request so stale
	///   information never leaks across calls.
	/// - Once the response headers are available, save them with
	///   [`ResponseMetadataSlot::store`], even if reading the body fails afterwards.
	/// - Any HTTP status is a successful transport outcome; only network-level failures map to
	///   `Err`.
	fn execute(
		&self,
		request: ProviderRequest,
		slot: ResponseMetadataSlot,
	) -> HttpFuture<'_, Self::TransportError>;
}

/// One JSON RPC call against the user-pool endpoint.
#[derive(Clone, Debug)]
pub struct ProviderRequest {
	/// Endpoint receiving the call.
	pub endpoint: Url,
	/// `X-Amz-Target` header value.
	pub target: String,
	/// Serialized JSON body.
	pub body: Vec<u8>,
}

/// Raw response handed back to the identity-provider client.
#[derive(Clone, Debug, Default)]
pub struct ProviderResponse {
	/// HTTP status code.
	pub status: u16,
	/// Exception name advertised through the `x-amzn-ErrorType` header.
	pub error_type: Option<String>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ProviderResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Captures metadata from the most recent HTTP response for downstream error mapping.
///
/// Additional metadata fields may be added in future releases, so downstream code
/// should construct values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the provider, if available.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
///
/// The client creates a fresh slot for each call and reads the captured metadata
/// immediately after the transport resolves.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	///
	/// Custom HTTP clients should invoke this helper before performing a request to
	/// ensure traces from prior attempts never leak into the new invocation.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// User-pool actions never redirect; clients built through
/// [`with_timeout`](ReqwestHttpClient::with_timeout) disable redirect following and bound
/// each call so a stalled provider surfaces as unavailable instead of hanging the request.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with a per-call timeout and redirects disabled.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(
		&self,
		request: ProviderRequest,
		slot: ResponseMetadataSlot,
	) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			slot.take();

			let response = client
				.post(request.endpoint)
				.header(CONTENT_TYPE, AMZ_JSON_CONTENT_TYPE)
				.header(AMZ_TARGET_HEADER, request.target)
				.body(request.body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let headers = response.headers();
			let retry_after = parse_retry_after(headers);
			let error_type = headers
				.get(AMZ_ERROR_TYPE_HEADER)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);

			slot.store(ResponseMetadata { status: Some(status), retry_after });

			let body = response.bytes().await?.to_vec();

			Ok(ProviderResponse { status, error_type, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(secs as i64));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_ignores_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(7)));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
	}

	#[test]
	fn metadata_slot_is_consumed_on_take() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(429), retry_after: None });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(429));
		assert!(slot.take().is_none());
	}

	#[test]
	fn success_range() {
		let ok = ProviderResponse { status: 200, ..ProviderResponse::default() };
		let bad = ProviderResponse { status: 400, ..ProviderResponse::default() };

		assert!(ok.is_success());
		assert!(!bad.is_success());
	}
}
