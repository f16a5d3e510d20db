use gambit_server::GambitServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr = std::env::var("GAMBIT_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = GambitServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(%addr, "gambit server listening");
    server.run().await?;
    Ok(())
}
