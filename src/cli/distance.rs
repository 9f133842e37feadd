//! Distance command handler

use crate::cli::OutputArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::Report;
use crate::service::MapService;
use clap::Args;

/// Distance command arguments
#[derive(Args)]
pub struct DistanceArgs {
    /// First location
    #[arg(allow_hyphen_values = true)]
    pub from: String,

    /// Second location
    #[arg(allow_hyphen_values = true)]
    pub to: String,

    /// Fail if either location cannot be resolved
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the distance command
pub async fn run(args: DistanceArgs) -> Result<()> {
    let config = Config::load()?;
    let service = MapService::from_config(&config)?;

    let report = service
        .distance_between(&args.from, &args.to, args.strict.then_some(true))
        .await?;

    for location in [&report.from, &report.to] {
        if location.is_fallback() {
            eprintln!("Warning: a location could not be resolved; using the default");
            break;
        }
    }

    args.output.emit(&Report::Distance(&report), &config)
}
