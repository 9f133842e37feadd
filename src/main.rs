//! wayfinder CLI entry point
//!
//! Location resolution, place search and route planning - CLI + HTTP API

use wayfinder::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
