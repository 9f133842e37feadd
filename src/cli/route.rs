//! Route command handler

use crate::cli::OutputArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::Report;
use crate::service::route::{RouteRequest, TravelMode};
use crate::service::MapService;
use clap::Args;
use std::str::FromStr;

/// Route command arguments
#[derive(Args)]
pub struct RouteArgs {
    /// Starting point (name, address or "lng,lat")
    #[arg(required_unless_present = "list_modes", allow_hyphen_values = true)]
    pub origin: Option<String>,

    /// Destination (name, address or "lng,lat")
    #[arg(required_unless_present = "list_modes", allow_hyphen_values = true)]
    pub destination: Option<String>,

    /// Travel mode: driving, bus, walking, train, bicycling, plane
    #[arg(long, short = 'm')]
    pub mode: Option<String>,

    /// List available travel modes
    #[arg(short = 'M', long = "list-modes")]
    pub list_modes: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the route command
pub async fn run(args: RouteArgs) -> Result<()> {
    if args.list_modes {
        list_modes();
        return Ok(());
    }

    let config = Config::load()?;
    let mode_str = args.mode.clone().unwrap_or(config.defaults.mode.clone());
    let mode = TravelMode::from_str(&mode_str).map_err(Error::Config)?;

    let service = MapService::from_config(&config)?;
    let request = RouteRequest::new(
        args.origin.clone().unwrap_or_default(),
        args.destination.clone().unwrap_or_default(),
        mode,
    );
    let result = service.planner().plan_route(&request).await;

    args.output.emit(&Report::Route(&result), &config)?;

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Print available travel modes
fn list_modes() {
    println!("Available travel modes:");
    for mode in TravelMode::all() {
        let style = mode.style();
        println!(
            "  {:10} {}  {}{}",
            mode.to_string(),
            mode.label(),
            style.stroke_color,
            if style.dashed { " (dashed)" } else { "" }
        );
    }
}
