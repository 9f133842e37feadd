//! Geocode command handler

use crate::cli::OutputArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::Report;
use crate::service::MapService;
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Address, landmark, city name or "lng,lat"
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Fail instead of falling back to the default location
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the geocode command
pub async fn run(args: GeocodeArgs) -> Result<()> {
    let config = Config::load()?;
    let service = MapService::from_config(&config)?;

    let location = service
        .locate(&args.query, args.strict.then_some(true))
        .await?;
    if location.is_fallback() {
        eprintln!("Could not resolve '{}', showing the default location", args.query);
    }

    args.output.emit(&Report::Location(&location), &config)
}
