#![cfg(feature = "server")]

// crates.io
use axum::{
	Router,
	body::{Body, to_bytes},
	http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use tower::ServiceExt;
// self
use cognito_gateway::{_preludet::*, gateway, idp::MemoryIdentityProvider};

fn app() -> (Router, Arc<MemoryIdentityProvider>) {
	let (flow, pool) = build_memory_flow();

	(gateway::router(flow, "/auth"), pool)
}

async fn send(app: &Router, path: &str, content_type: &str, body: impl Into<Body>) -> (StatusCode, Value) {
	let request = Request::post(path)
		.header(CONTENT_TYPE, content_type)
		.body(body.into())
		.expect("Request should build.");
	let response = app.clone().oneshot(request).await.expect("Router should respond.");
	let status = response.status();
	let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Body should be readable.");
	let value = serde_json::from_slice(&bytes).expect("Response body should be JSON.");

	(status, value)
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
	send(app, path, "application/json", body.to_string()).await
}

#[tokio::test]
async fn full_registration_round() {
	let (app, pool) = app();
	let (status, body) = post_json(
		&app,
		"/auth/signup",
		json!({ "username": "alice", "password": "correct-horse", "email": "alice@example.com", "gender": "female" }),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["message"], "User signed up successfully");
	assert_eq!(body["result"]["UserConfirmed"], false);
	assert_eq!(body["result"]["CodeDeliveryDetails"]["Destination"], "a***@e***");

	let (status, body) =
		post_json(&app, "/auth/signin", json!({ "username": "alice", "password": "correct-horse" })).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body, json!({ "error": "User is not confirmed." }));

	let code = pool.pending_code("alice").expect("Pending identity should have a code.");
	let (status, body) =
		post_json(&app, "/auth/confirm", json!({ "username": "alice", "code": code })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["message"], "User confirmed successfully");

	let (status, body) =
		post_json(&app, "/auth/signin", json!({ "username": "alice", "password": "correct-horse" })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["message"], "Sign-in successful");

	for field in ["accessToken", "idToken", "refreshToken"] {
		assert!(body[field].as_str().is_some_and(|token| !token.is_empty()), "{field} should be set.");
	}
}

#[tokio::test]
async fn validation_errors_are_client_errors() {
	let (app, pool) = app();
	let (status, body) = post_json(
		&app,
		"/auth/signup",
		json!({ "username": "alice", "password": "correct-horse", "gender": "female" }),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body, json!({ "error": "Missing required field: email." }));
	assert_eq!(pool.calls(cognito_gateway::provider::ProviderOperation::Register), 0);
}

#[tokio::test]
async fn wrong_password_passes_provider_message_through() {
	let (app, _pool) = app();
	let (status, body) =
		post_json(&app, "/auth/signin", json!({ "username": "ghost", "password": "whatever-pw" })).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body, json!({ "error": "Incorrect username or password." }));
}

#[tokio::test]
async fn form_bodies_are_accepted() {
	let (app, pool) = app();
	let (status, _body) = send(
		&app,
		"/auth/signup",
		"application/x-www-form-urlencoded",
		"username=bob&password=correct-horse&email=bob%40example.com",
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		pool.attributes("bob").map(|attributes| attributes.len()),
		Some(1),
		"Gender should be omitted when blank."
	);
}

#[tokio::test]
async fn broken_bodies_are_rejected_with_error_envelope() {
	let (app, _pool) = app();
	let (status, body) = send(&app, "/auth/confirm", "application/json", "{not json").await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["error"].as_str().is_some_and(|message| !message.is_empty()));

	let (status, body) = send(&app, "/auth/confirm", "application/json", "").await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body, json!({ "error": "Missing required field: username." }));
}

#[tokio::test]
async fn root_prefix_mounts_routes_at_top_level() {
	let (flow, _pool) = build_memory_flow();
	let app = gateway::router(flow, "");
	let (status, body) =
		post_json(&app, "/signin", json!({ "username": "ghost", "password": "whatever-pw" })).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "Incorrect username or password.");
}
