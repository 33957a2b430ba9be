//! HTTP boundary exposing the registration flow.
//!
//! Three `POST` routes mount under a configurable prefix:
//!
//! | Route | Body | Success |
//! |---|---|---|
//! | `/signup` | `{username, password, email, gender}` | `{message, result}` |
//! | `/confirm` | `{username, code}` | `{message, result}` |
//! | `/signin` | `{username, password}` | `{message, accessToken, idToken, refreshToken}` |
//!
//! Every failure renders as `{"error": message}` with the status chosen by [`GatewayError`].

mod error;
mod payload;

pub use error::*;
pub use payload::*;

// crates.io
use axum::{Json, Router, extract::State, routing::post};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
// self
use crate::{
	_prelude::*,
	flows::{
		ConfirmationRequest, FlowReply, RegistrationFlow, RegistrationRequest, SignInReply,
		SignInRequest,
	},
	idp::{ConfirmSignUpOutput, IdentityProviderClient, SignUpOutput},
};

/// Builds the gateway router with tracing and permissive CORS.
///
/// `prefix` is expected in normalized form (`/auth`, or empty for the root), as produced by
/// [`GatewayConfig::normalized_route_prefix`](crate::config::GatewayConfig::normalized_route_prefix).
pub fn router<P>(flow: RegistrationFlow<P>, prefix: &str) -> Router
where
	P: ?Sized + IdentityProviderClient,
{
	let routes = Router::new()
		.route("/signup", post(sign_up::<P>))
		.route("/confirm", post(confirm::<P>))
		.route("/signin", post(sign_in::<P>))
		.with_state(flow);
	let app = if prefix.is_empty() { routes } else { Router::new().nest(prefix, routes) };

	app.layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive())
}

/// Serves `app` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("Shutdown signal received."),
		Err(e) => {
			tracing::error!(error = %e, "Failed to install the Ctrl-C handler.");

			std::future::pending::<()>().await;
		},
	}
}

async fn sign_up<P>(
	State(flow): State<RegistrationFlow<P>>,
	Payload(request): Payload<RegistrationRequest>,
) -> Result<Json<FlowReply<SignUpOutput>>, GatewayError>
where
	P: ?Sized + IdentityProviderClient,
{
	flow.sign_up(request).await.map(Json).map_err(|e| GatewayError::from(e).logged("signup"))
}

async fn confirm<P>(
	State(flow): State<RegistrationFlow<P>>,
	Payload(request): Payload<ConfirmationRequest>,
) -> Result<Json<FlowReply<ConfirmSignUpOutput>>, GatewayError>
where
	P: ?Sized + IdentityProviderClient,
{
	flow.confirm(request).await.map(Json).map_err(|e| GatewayError::from(e).logged("confirm"))
}

async fn sign_in<P>(
	State(flow): State<RegistrationFlow<P>>,
	Payload(request): Payload<SignInRequest>,
) -> Result<Json<SignInReply>, GatewayError>
where
	P: ?Sized + IdentityProviderClient,
{
	flow.sign_in(request).await.map(Json).map_err(|e| GatewayError::from(e).logged("signin"))
}
