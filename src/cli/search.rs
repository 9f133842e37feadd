//! Search command handler

use crate::cli::OutputArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::Report;
use crate::service::MapService;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Keyword to search for
    pub keyword: String,

    /// City to search in (defaults to search.default_city)
    #[arg(long, short = 'c', conflicts_with = "nationwide")]
    pub city: Option<String>,

    /// Search the whole country regardless of search.default_city
    #[arg(long, short = 'n')]
    pub nationwide: bool,

    /// Fail instead of returning a placeholder result
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let service = MapService::from_config(&config)?;

    let strict = args.strict.then_some(true);
    let places = if args.nationwide {
        service.find_places_nationwide(&args.keyword, strict).await?
    } else {
        service
            .find_places(&args.keyword, args.city.as_deref().unwrap_or_default(), strict)
            .await?
    };

    args.output.emit(&Report::Places(&places), &config)
}
