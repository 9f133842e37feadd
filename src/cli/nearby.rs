//! Nearby command handler

use crate::cli::OutputArgs;
use crate::config::defaults::DEFAULT_NEARBY_RADIUS;
use crate::config::Config;
use crate::error::Result;
use crate::format::Report;
use crate::geo::Coordinates;
use crate::service::MapService;
use clap::Args;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Search centre as "lng,lat"
    #[arg(allow_hyphen_values = true)]
    pub location: String,

    /// Keyword to filter by
    #[arg(long, short = 'k', default_value = "")]
    pub keyword: String,

    /// Search radius in metres
    #[arg(long, short = 'r')]
    pub radius: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the nearby command
pub async fn run(args: NearbyArgs) -> Result<()> {
    let center = Coordinates::parse_pair(&args.location)?;
    let config = Config::load()?;
    let service = MapService::from_config(&config)?;

    let places = service
        .places()
        .try_search_nearby(
            center,
            &args.keyword,
            args.radius.unwrap_or(DEFAULT_NEARBY_RADIUS),
        )
        .await?;

    args.output.emit(&Report::Places(&places), &config)
}
