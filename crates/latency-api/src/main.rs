use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use latency_api::{
    AppState, build_router,
    report::{self, OutputFormat},
    server,
    settings::Settings,
};
use latency_stats::aggregate;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{net::SocketAddr, path::PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "latency-api",
    about = "Per-region latency and uptime statistics over service telemetry",
    version = option_env!("BUILD_VERSION").unwrap_or(env!("CARGO_PKG_VERSION")),
    after_help = r#"Configuration:
    Configuration can be provided via:
    1. Environment variables with LATENCY__ prefix (e.g., LATENCY__SERVER__LISTEN_ADDR)
    2. .env file in the current directory
    3. Config file with -c option

Examples:
    # Serve the embedded sample dataset on port 8080
    latency-api serve

    # Serve a dataset file on a custom address
    latency-api serve --dataset telemetry.json --listen-addr 127.0.0.1:9000

    # Print stats for two regions with a 150ms breach threshold
    latency-api report --regions apac,emea --threshold-ms 150"#
)]
pub struct Cli {
    /// Path to the configuration file (TOML, JSON or YAML)
    ///
    /// If not provided, will attempt to load from environment variables
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the latency statistics HTTP API
    Serve(ServeArgs),
    /// Print per-region statistics without starting the server
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, overrides server.listen_addr
    #[arg(long, value_name = "ADDR")]
    pub listen_addr: Option<SocketAddr>,

    /// Dataset file (JSON or CSV), overrides dataset.path
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Regions to report on, defaults to every region in the dataset
    #[arg(long, value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Breach threshold in milliseconds, overrides stats.default_threshold_ms
    #[arg(long)]
    pub threshold_ms: Option<f64>,

    /// Dataset file (JSON or CSV), overrides dataset.path
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let settings = if let Some(config_path) = &self.config {
            Settings::from_path(config_path)?
        } else {
            Settings::from_env()?
        };
        init_logging(&settings.log_level)?;

        match self.command {
            Commands::Serve(args) => serve(settings, args).await,
            Commands::Report(args) => print_report(settings, args),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}

async fn serve(mut settings: Settings, args: ServeArgs) -> Result<()> {
    if let Some(listen_addr) = args.listen_addr {
        settings.server.listen_addr = listen_addr;
    }
    if let Some(dataset) = args.dataset {
        settings.dataset.path = Some(dataset);
    }
    debug!("{settings}");

    if let Some(metrics) = &settings.metrics {
        PrometheusBuilder::new()
            .with_http_listener(metrics.addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!(addr = %metrics.addr, "prometheus exporter listening");
    }
    export_build_info();

    let dataset = settings.dataset.load()?;
    let state = AppState::new(dataset, settings.stats.default_threshold_ms);
    let router = build_router(state, settings.server.max_body_bytes);

    server::serve(settings.server.listen_addr, router, shutdown_listener()?).await
}

fn print_report(mut settings: Settings, args: ReportArgs) -> Result<()> {
    if let Some(dataset) = args.dataset {
        settings.dataset.path = Some(dataset);
    }

    let dataset = settings.dataset.load()?;
    let regions: Vec<String> = if args.regions.is_empty() {
        dataset.regions().into_iter().map(str::to_string).collect()
    } else {
        args.regions
    };
    let threshold_ms = args
        .threshold_ms
        .unwrap_or(settings.stats.default_threshold_ms);

    let report = aggregate(&dataset, &regions, threshold_ms)?;
    println!("{}", report::render(&report, args.output_format)?);

    Ok(())
}

fn init_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .try_init()?;

    Ok(())
}

fn shutdown_listener() -> Result<CancellationToken> {
    let cancellation_token = CancellationToken::new();
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("sigterm listener failed")?;
    tokio::spawn({
        let cancellation_token = cancellation_token.clone();
        async move {
            tokio::select! {
                _ = sigterm.recv() => cancellation_token.cancel(),
                _ = signal::ctrl_c() => cancellation_token.cancel(),
            }
            info!("shutdown signal received");
        }
    });

    Ok(cancellation_token)
}

fn export_build_info() {
    let version = option_env!("BUILD_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    let build_commit = option_env!("BUILD_COMMIT").unwrap_or("UNKNOWN");
    let build_date = option_env!("DATE").unwrap_or("UNKNOWN");
    let pkg_version = env!("CARGO_PKG_VERSION");

    metrics::gauge!(
        "latency_api_build_info",
        "version" => version,
        "commit" => build_commit,
        "date" => build_date,
        "pkg_version" => pkg_version
    )
    .set(1);
}
