//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod distance;
pub mod geocode;
pub mod nearby;
pub mod route;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::error::Result;
use crate::format::{get_formatter, unknown_format, Report};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Location resolution, place search and route planning
#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an address, place, city or "lng,lat" to coordinates
    Geocode(geocode::GeocodeArgs),

    /// Search places by keyword
    Search(search::SearchArgs),

    /// Search places around a coordinate
    Nearby(nearby::NearbyArgs),

    /// Great-circle distance between two locations
    Distance(distance::DistanceArgs),

    /// Plan a route between two locations
    Route(route::RouteArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Output options shared by the data commands
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Output format (json, text, gpx)
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

impl OutputArgs {
    /// Render a report in the requested (or configured) format
    pub fn render(&self, report: &Report<'_>, config: &Config) -> Result<String> {
        let name = self.format.as_deref().unwrap_or(&config.defaults.format);
        let formatter = get_formatter(name).ok_or_else(|| unknown_format(name))?;
        formatter.format(report)
    }

    /// Render a report and print it or write it to the output file
    pub fn emit(&self, report: &Report<'_>, config: &Config) -> Result<()> {
        let output = self.render(report, config)?;

        if let Some(path) = &self.output {
            std::fs::write(path, &output)?;
            eprintln!("Output written to {}", path);
        } else {
            println!("{}", output.trim_end());
        }

        Ok(())
    }
}

/// Install the tracing subscriber, honouring RUST_LOG
///
/// Logs go to stderr so they never mix with command output.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve(_) => init_logging("info"),
        _ => init_logging("warn"),
    }

    match cli.command {
        Commands::Geocode(args) => geocode::run(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Nearby(args) => nearby::run(args).await,
        Commands::Distance(args) => distance::run(args).await,
        Commands::Route(args) => route::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}
