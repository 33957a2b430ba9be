//! Request body extractor accepting JSON or URL-encoded forms.

// crates.io
use axum::{
	Form, Json,
	body::Bytes,
	extract::{FromRequest, Request},
	http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, gateway::GatewayError};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decoded request body.
///
/// URL-encoded bodies are read as forms; anything else is parsed as JSON regardless of the
/// declared content type. An empty body decodes as `{}` so missing fields surface as
/// validation errors.
#[derive(Clone, Debug)]
pub struct Payload<T>(pub T);
impl<S, T> FromRequest<S> for Payload<T>
where
	S: Send + Sync,
	T: DeserializeOwned + Send,
{
	type Rejection = GatewayError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		if is_form(&req) {
			let Form(value) = Form::<T>::from_request(req, state)
				.await
				.map_err(|rejection| GatewayError::Body(rejection.body_text()))?;

			return Ok(Self(value));
		}

		let bytes = Bytes::from_request(req, state)
			.await
			.map_err(|rejection| GatewayError::Body(rejection.body_text()))?;
		let bytes = if bytes.iter().all(u8::is_ascii_whitespace) { Bytes::from_static(b"{}") } else { bytes };
		let Json(value) =
			Json::<T>::from_bytes(&bytes).map_err(|rejection| GatewayError::Body(rejection.body_text()))?;

		Ok(Self(value))
	}
}

fn is_form(req: &Request) -> bool {
	req.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}
