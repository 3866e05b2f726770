use clap::Parser;

use pairing_relay::{server, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pairing_relay=info".into()),
        )
        .init();

    let config = Config::parse();

    if let Err(e) = server::run(config).await {
        tracing::error!(error = %e, "pairing-relay failed");
        std::process::exit(1);
    }
}
