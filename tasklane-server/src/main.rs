use tasklane::Config;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tasklane=info,tasklane_server=info,tower_http=info"));
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    tasklane_server::run(config).await
}
