mod args;

pub use args::Cli;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use atc_feeds::{HostProbe, IssueTracker};
use atc_hub::{Hub, Poller};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(&cli.log_level);

    let hub = Hub::new(cli.mode);

    let issues = IssueTracker::new(
        cli.owner,
        cli.repo,
        std::env::var("ATC_GITHUB_TOKEN").ok(),
    );
    let hosts = HostProbe::from_env()?;
    tokio::spawn(Poller::new(hub.clone(), issues, hosts).run());

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    // Failing to bind is the one fatal startup condition
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    atc_server::serve(listener, hub).await
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
