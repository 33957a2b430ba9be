//! Stateless HTTP gateway for Cognito user pools: sign-up, confirmation, and password sign-in
//! with a per-call secret-hash binding and a stable client-facing error contract.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod idp;
pub mod obs;
pub mod provider;
#[cfg(feature = "server")] pub mod cli;
#[cfg(feature = "server")] pub mod gateway;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by the integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientId, Secret, SecretBinder},
		flows::RegistrationFlow,
		http::ReqwestHttpClient,
		idp::{CognitoClient, IdentityProviderClient, MemoryIdentityProvider, ReqwestCognitoClient},
		provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderStrategy},
	};

	/// Client identifier shared by test fixtures.
	pub const TEST_CLIENT_ID: &str = "7d9sl2hq4jv0r1example";
	/// Client secret shared by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "s3cr3t-client-secret";

	/// Cognito client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ReqwestCognitoClient;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Secret binder seeded with the shared test credentials.
	pub fn test_binder() -> SecretBinder {
		let client_id = ClientId::new(TEST_CLIENT_ID).expect("Test client identifier should be valid.");

		SecretBinder::new(client_id, Secret::new(TEST_CLIENT_SECRET))
			.expect("Test secret binder should build.")
	}

	/// Constructs a Cognito client that talks to the provided mock endpoint.
	pub fn build_reqwest_test_client(endpoint: &str) -> ReqwestTestClient {
		let descriptor = ProviderDescriptor::builder("us-east-1")
			.endpoint(Url::parse(endpoint).expect("Mock endpoint should parse."))
			.build()
			.expect("Mock descriptor should build.");
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);
		let client_id = ClientId::new(TEST_CLIENT_ID).expect("Test client identifier should be valid.");

		CognitoClient::new(descriptor, strategy, client_id, test_reqwest_http_client())
	}

	/// Wraps any provider double inside a [`RegistrationFlow`] using the test credentials.
	pub fn build_test_flow<P>(provider: Arc<P>) -> RegistrationFlow<P>
	where
		P: ?Sized + IdentityProviderClient,
	{
		RegistrationFlow::new(provider, test_binder())
	}

	/// In-memory pool plus a flow bound to it.
	pub fn build_memory_flow() -> (RegistrationFlow<MemoryIdentityProvider>, Arc<MemoryIdentityProvider>)
	{
		let pool = Arc::new(MemoryIdentityProvider::new(test_binder()));

		(build_test_flow(pool.clone()), pool)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _, tower as _};
