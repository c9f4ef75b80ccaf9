use clap::Parser;
use park_http::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Parking session service
#[derive(Parser, Debug)]
#[command(name = "park", version, about)]
struct Args {
    /// Address to bind the HTTP server on
    #[arg(long, default_value = "127.0.0.1:3000")]
    address: String,

    /// Public base URL used to render plate photo links
    #[arg(long)]
    public_url: Option<String>,

    /// Billing rate per parked minute
    #[arg(long, default_value_t = 10.0)]
    rate: f64,

    /// Capacity of the notification publish queue
    #[arg(long, default_value_t = 64)]
    queue_capacity: usize,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("park=info,park_core=info,park_http=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("logging initialized");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = ServerConfig::new(args.address)
        .with_rate_per_minute(args.rate)
        .with_queue_capacity(args.queue_capacity);
    if let Some(public_url) = args.public_url {
        config = config.with_public_url(public_url);
    }

    park_http::start_server(config).await
}
