#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dataprobe::analyzer::Analyzer;
use dataprobe::config::{self, load_configuration};
use dataprobe::datamodel::SampleSize;
use dataprobe::http::server::run_http_server;
use dataprobe::http::state::HttpServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::Level;
use tracing::event;

#[derive(Debug, Parser)]
#[command(name = "dataprobe", version, about = "Open-data resource analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Analyze a single resource and print the result as JSON
    Analyze {
        /// Resource URL, INE table identifier or INE URL
        locator: String,
        /// Format override: csv, json, pc-axis or rdf
        #[arg(short, long)]
        format: Option<String>,
        /// Rows to sample, 0 or "all" for the configured maximum
        #[arg(short, long)]
        rows: Option<SampleSize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Initialize tracing subscriber for HTTP request logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    load_configuration().context("Failed to load configuration")?;
    let config = config::get().context("Failed to get configuration")?;
    let analyzer = Analyzer::from_config(&config).context("Failed to create the analyzer")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve(
                analyzer,
                config.endpoint,
                config.port,
                config.http_server_timeout_seconds,
            )
            .await
        }
        Command::Analyze {
            locator,
            format,
            rows,
        } => {
            let sample = analyzer.sample_size(rows);
            let result = analyzer
                .analyze(&locator, format.as_deref(), sample)
                .await
                .with_context(|| format!("Failed to analyze {}", locator))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

async fn serve(
    analyzer: Analyzer,
    endpoint: std::net::IpAddr,
    port: u16,
    timeout_seconds: u64,
) -> Result<()> {
    // Exit the program if a panic occurs
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_panic(info);
        std::process::exit(1);
    }));

    let address = SocketAddr::from((endpoint, port));
    let state = HttpServerState {
        name: Arc::new("DataProbe".to_string()),
        analyzer: Arc::new(analyzer),
    };

    match run_http_server(state, address, timeout_seconds).await {
        Ok(_) => {
            event!(Level::INFO, "HTTP server stopped gracefully");
            Ok(())
        }
        Err(err) => {
            event!(Level::ERROR, "HTTP server failed to start: {}", err);
            Err(err)
        }
    }
}
