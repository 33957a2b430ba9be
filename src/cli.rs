//! Command-line entry point: argument parsing, log setup, and the serve loop.

// std
use std::time::Duration as StdDuration;
// crates.io
use clap::{ArgAction, Parser};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::{AccessCredentials, GatewayConfig},
	gateway,
};

/// Gateway settings; every flag can also come from the environment.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Args {
	/// Interface to bind.
	#[arg(long, env = "HOST", default_value = GatewayConfig::DEFAULT_HOST)]
	pub host: String,
	/// Port to bind.
	#[arg(long, env = "PORT", default_value_t = GatewayConfig::DEFAULT_PORT)]
	pub port: u16,
	/// Region hosting the user pool.
	#[arg(long, env = "AWS_REGION")]
	pub region: String,
	/// User-pool endpoint override (defaults to the regional endpoint).
	#[arg(long, env = "COGNITO_ENDPOINT")]
	pub endpoint: Option<Url>,
	/// App client identifier.
	#[arg(long, env = "COGNITO_CLIENT_ID")]
	pub client_id: String,
	/// App client secret.
	#[arg(long, env = "COGNITO_CLIENT_SECRET", hide_env_values = true)]
	pub client_secret: String,
	/// AWS access key identifier.
	#[arg(long, env = "AWS_ACCESS_KEY")]
	pub access_key: String,
	/// AWS secret access key.
	#[arg(long, env = "AWS_SECRET_KEY", hide_env_values = true)]
	pub secret_key: String,
	/// Path prefix for the routes.
	#[arg(long, env = "ROUTE_PREFIX", default_value = GatewayConfig::DEFAULT_ROUTE_PREFIX)]
	pub route_prefix: String,
	/// Per-call provider timeout in seconds.
	#[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value_t = 10)]
	pub timeout_secs: u64,
	/// Log verbosity (-v warn, -vv info, -vvv debug, -vvvv trace).
	#[arg(short, long, action = ArgAction::Count)]
	pub verbose: u8,
}
impl Args {
	/// Converts the parsed arguments into a gateway configuration.
	pub fn into_config(self) -> GatewayConfig {
		let access =
			AccessCredentials { access_key: self.access_key, secret_key: Secret::new(self.secret_key) };
		let mut config = GatewayConfig::new(self.region, self.client_id, self.client_secret, access)
			.with_route_prefix(self.route_prefix);

		config.host = self.host;
		config.port = self.port;
		config.endpoint = self.endpoint;
		config.timeout = StdDuration::from_secs(self.timeout_secs);

		config
	}
}

/// Installs the global `fmt` subscriber; `RUST_LOG` overrides the verbosity flag.
pub fn init_tracing(verbose: u8) -> color_eyre::Result<()> {
	let level = match verbose {
		0 => LevelFilter::ERROR,
		1 => LevelFilter::WARN,
		2 => LevelFilter::INFO,
		3 => LevelFilter::DEBUG,
		_ => LevelFilter::TRACE,
	};
	let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.try_init()
		.map_err(|e| color_eyre::eyre::eyre!("Failed to install the log subscriber: {e}"))?;

	Ok(())
}

/// Parses arguments, validates configuration, and serves until Ctrl-C.
pub async fn run() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	init_tracing(args.verbose)?;

	let config = args.into_config();
	let flow = config.build_flow()?;
	let addr = config.socket_addr()?;
	let app = gateway::router(flow, &config.normalized_route_prefix());
	let listener = TcpListener::bind(addr).await?;

	tracing::info!(%addr, prefix = %config.normalized_route_prefix(), region = %config.region, "Gateway listening.");

	gateway::serve(listener, app).await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const REQUIRED: [&str; 11] = [
		"cognito-gateway",
		"--region",
		"eu-west-1",
		"--client-id",
		"client-123",
		"--client-secret",
		"secret-xyz",
		"--access-key",
		"AKIAEXAMPLE",
		"--secret-key",
		"wJalrXUtnFEMI",
	];

	#[test]
	fn defaults_fill_optional_flags() {
		let config = Args::try_parse_from(REQUIRED).expect("Required flags should parse.").into_config();

		assert_eq!(config.region, "eu-west-1");
		assert_eq!(config.client_secret.expose(), "secret-xyz");
		assert_eq!(config.timeout, StdDuration::from_secs(10));
		config.validate().expect("Parsed configuration should validate.");
	}

	#[test]
	fn overrides_and_verbosity_are_read() {
		let args = Args::try_parse_from(REQUIRED.into_iter().chain([
			"--port",
			"8080",
			"--route-prefix",
			"/",
			"--endpoint",
			"http://127.0.0.1:9229/",
			"-vv",
		]))
		.expect("Overrides should parse.");

		assert_eq!(args.verbose, 2);

		let config = args.into_config();

		assert_eq!(config.port, 8080);
		assert_eq!(config.normalized_route_prefix(), "");
		assert_eq!(config.endpoint.as_ref().map(Url::as_str), Some("http://127.0.0.1:9229/"));
		config.validate().expect("Loopback endpoint should validate.");
	}
}
