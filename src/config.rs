//! Process-wide gateway configuration validated once at startup.
//!
//! Every value the flow needs (region, endpoint, app client credentials, access
//! credentials) is checked here before the server binds, so a missing value stops the
//! process instead of failing each request.

// std
use std::{net::SocketAddr, time::Duration as StdDuration};
// self
use crate::{
	_prelude::*,
	auth::{ClientId, Secret, SecretBinder},
	error::ConfigError,
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")]
use crate::{
	flows::ReqwestRegistrationFlow,
	http::ReqwestHttpClient,
	idp::CognitoClient,
	provider::{DefaultProviderStrategy, ProviderStrategy},
};

/// AWS access credentials held for the provider account.
///
/// User-pool registration and password sign-in are not request-signed, so the pair is only
/// validated; it never leaves the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessCredentials {
	/// Access key identifier.
	pub access_key: String,
	/// Secret access key.
	pub secret_key: Secret,
}

/// Validated settings for one gateway process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
	/// Interface to bind.
	pub host: String,
	/// Port to bind.
	pub port: u16,
	/// Region hosting the user pool.
	pub region: String,
	/// Optional endpoint override.
	pub endpoint: Option<Url>,
	/// App client identifier.
	pub client_id: String,
	/// App client secret.
	pub client_secret: Secret,
	/// Provider access credentials.
	pub access: AccessCredentials,
	/// Path prefix the routes mount under.
	pub route_prefix: String,
	/// Upper bound for each provider call.
	pub timeout: StdDuration,
}
impl GatewayConfig {
	/// Default bind interface.
	pub const DEFAULT_HOST: &'static str = "0.0.0.0";
	/// Default bind port.
	pub const DEFAULT_PORT: u16 = 5555;
	/// Default route prefix.
	pub const DEFAULT_ROUTE_PREFIX: &'static str = "/auth";
	/// Default provider call timeout.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Creates a configuration with defaults for everything except the required values.
	pub fn new(
		region: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		access: AccessCredentials,
	) -> Self {
		Self {
			host: Self::DEFAULT_HOST.into(),
			port: Self::DEFAULT_PORT,
			region: region.into(),
			endpoint: None,
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			access,
			route_prefix: Self::DEFAULT_ROUTE_PREFIX.into(),
			timeout: Self::DEFAULT_TIMEOUT,
		}
	}

	/// Overrides the provider endpoint.
	pub fn with_endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = Some(endpoint);

		self
	}

	/// Overrides the route prefix.
	pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.route_prefix = prefix.into();

		self
	}

	/// Rejects blank required values and malformed settings.
	pub fn validate(&self) -> Result<(), ConfigError> {
		require("host", &self.host)?;
		require("region", &self.region)?;
		require("client_id", &self.client_id)?;
		require("client_secret", self.client_secret.expose())?;
		require("access_key", &self.access.access_key)?;
		require("secret_key", self.access.secret_key.expose())?;

		if self.timeout.is_zero() {
			return Err(ConfigError::InvalidValue {
				name: "timeout",
				reason: "must be greater than zero".into(),
			});
		}
		if self.route_prefix.chars().any(|ch| ch.is_whitespace() || matches!(ch, '?' | '#' | '{' | '}'))
			|| self.route_prefix.split('/').any(|segment| segment.starts_with(['*', ':']))
		{
			return Err(ConfigError::InvalidValue {
				name: "route_prefix",
				reason: format!("`{}` is not a plain path", self.route_prefix),
			});
		}

		self.descriptor()?;
		self.binder()?;

		Ok(())
	}

	/// Socket address to bind.
	pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
		format!("{}:{}", self.host, self.port).parse().map_err(|_| ConfigError::InvalidValue {
			name: "host",
			reason: format!("`{}` is not an IP address", self.host),
		})
	}

	/// Route prefix with a leading slash and no trailing slash; empty for the root.
	pub fn normalized_route_prefix(&self) -> String {
		let trimmed = self.route_prefix.trim_matches('/');

		if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
	}

	/// Validated app client identifier.
	pub fn client_id(&self) -> Result<ClientId, ConfigError> {
		ClientId::new(&self.client_id)
			.map_err(|err| ConfigError::InvalidValue { name: "client_id", reason: err.to_string() })
	}

	/// Descriptor for the configured user pool.
	pub fn descriptor(&self) -> Result<ProviderDescriptor, ConfigError> {
		let mut builder = ProviderDescriptor::builder(self.region.as_str());

		if let Some(endpoint) = &self.endpoint {
			builder = builder.endpoint(endpoint.clone());
		}

		Ok(builder.build()?)
	}

	/// Secret binder keyed with the app client credentials.
	pub fn binder(&self) -> Result<SecretBinder, ConfigError> {
		SecretBinder::new(self.client_id()?, self.client_secret.clone())
	}

	/// Wires the reqwest-backed Cognito client and registration flow.
	#[cfg(feature = "reqwest")]
	pub fn build_flow(&self) -> Result<ReqwestRegistrationFlow, ConfigError> {
		self.validate()?;

		let http_client = ReqwestHttpClient::with_timeout(self.timeout)?;
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);
		let client = CognitoClient::new(self.descriptor()?, strategy, self.client_id()?, http_client);

		Ok(ReqwestRegistrationFlow::new(client, self.binder()?))
	}
}

fn require(name: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() {
		return Err(ConfigError::MissingValue { name });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::ProviderDescriptorError;

	fn config() -> GatewayConfig {
		GatewayConfig::new("us-east-1", "client-123", "secret-xyz", AccessCredentials {
			access_key: "AKIAEXAMPLE".into(),
			secret_key: Secret::new("wJalrXUtnFEMI"),
		})
	}

	#[test]
	fn complete_config_validates() {
		let config = config();

		config.validate().expect("Complete configuration should validate.");

		assert_eq!(
			config.descriptor().expect("Descriptor should build.").endpoint.as_str(),
			"https://cognito-idp.us-east-1.amazonaws.com/"
		);
		assert_eq!(config.socket_addr().expect("Default bind should parse.").port(), 5555);
	}

	#[test]
	fn each_required_value_is_enforced() {
		let mut missing_secret = config();

		missing_secret.client_secret = Secret::default();

		assert!(matches!(
			missing_secret.validate(),
			Err(ConfigError::MissingValue { name: "client_secret" })
		));

		let mut missing_access = config();

		missing_access.access.secret_key = Secret::new("  ");

		assert!(matches!(
			missing_access.validate(),
			Err(ConfigError::MissingValue { name: "secret_key" })
		));

		let mut missing_region = config();

		missing_region.region.clear();

		assert!(matches!(missing_region.validate(), Err(ConfigError::MissingValue { name: "region" })));
	}

	#[test]
	fn insecure_remote_endpoint_is_rejected() {
		let config = config()
			.with_endpoint(Url::parse("http://cognito.example.com/").expect("URL fixture should parse."));

		assert!(matches!(
			config.validate(),
			Err(ConfigError::InvalidDescriptor(ProviderDescriptorError::InsecureEndpoint { .. }))
		));
	}

	#[test]
	fn route_prefix_is_normalized() {
		assert_eq!(config().normalized_route_prefix(), "/auth");
		assert_eq!(config().with_route_prefix("api/auth/").normalized_route_prefix(), "/api/auth");
		assert_eq!(config().with_route_prefix("/").normalized_route_prefix(), "");
		assert!(config().with_route_prefix("/a b").validate().is_err());

		for prefix in ["/*rest", "/:tenant", "api/*", "/auth/:x/more"] {
			assert!(
				config().with_route_prefix(prefix).validate().is_err(),
				"{prefix} should be refused before the router is built."
			);
		}

		config().with_route_prefix("/a:b/c*").validate().expect("Inner markers stay literal.");
	}
}
