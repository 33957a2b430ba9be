// std
use std::net::IpAddr;
// self
use crate::{_prelude::*, provider::ProviderDescriptor};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Region is required to derive the default endpoint.
	#[error("Missing provider region.")]
	MissingRegion,
	/// Region contains characters outside `[a-z0-9-]`.
	#[error("Provider region `{region}` is invalid.")]
	InvalidRegion {
		/// Region that failed validation.
		region: String,
	},
	/// Derived endpoint could not be parsed.
	#[error("Endpoint derived from region `{region}` is not a valid URL.")]
	InvalidEndpoint {
		/// Region used for the derivation.
		region: String,
	},
	/// Endpoints must use HTTPS unless they target a loopback host.
	#[error("The provider endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Region hosting the user pool.
	pub region: String,
	/// Optional endpoint override; derived from the region when unset.
	pub endpoint: Option<Url>,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided region.
	pub fn new(region: impl Into<String>) -> Self {
		Self { region: region.into(), endpoint: None }
	}

	/// Overrides the endpoint (local emulators, VPC endpoints, tests).
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		validate_region(&self.region)?;

		let endpoint = match self.endpoint {
			Some(url) => url,
			None => default_endpoint(&self.region)?,
		};
		let descriptor = ProviderDescriptor { region: self.region, endpoint };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint(&self.endpoint)
	}
}

fn default_endpoint(region: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(&format!("https://cognito-idp.{region}.amazonaws.com/"))
		.map_err(|_| ProviderDescriptorError::InvalidEndpoint { region: region.to_owned() })
}

fn validate_region(region: &str) -> Result<(), ProviderDescriptorError> {
	if region.is_empty() {
		return Err(ProviderDescriptorError::MissingRegion);
	}
	if !region.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
		return Err(ProviderDescriptorError::InvalidRegion { region: region.to_owned() });
	}

	Ok(())
}

fn validate_endpoint(url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InsecureEndpoint { url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.map(|ip| ip.is_loopback())
			.unwrap_or(false),
		None => false,
	}
}
