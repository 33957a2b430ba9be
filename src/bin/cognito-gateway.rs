//! Cognito registration gateway server.

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	cognito_gateway::cli::run().await
}
