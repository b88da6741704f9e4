mod config;
mod monitor;
mod providers;
mod report;

pub const USER_AGENT: &str = concat!("brand-radar/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use config::Credentials;
use monitor::Monitor;
use tracing::info;

/// Aggregate brand mentions from web search, news, and social platforms
/// into a single plain-text report.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Brand or topic to search for (e.g. "Acme Corp")
    query: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("brand_radar=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let query = cli.query.trim();
    if query.is_empty() {
        return Err("query must not be empty".into());
    }

    info!("starting brand mention aggregation");

    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let monitor = Monitor::new(http, Credentials::from_env());

    let report = monitor.aggregate(query).await;
    println!("{}", report.render());

    Ok(())
}
