//! tripmate binary entry point.

use clap::Parser;
use tripmate::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if matches!(cli.command, Commands::Tools(_)) {
        cli::init_logging(false);
    }

    if let Err(e) = cli::run(cli).await {
        eprintln!("Error: {e}");
        if let Some(hint) = hint(&e) {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }
}

fn hint(err: &tripmate::TripError) -> Option<&'static str> {
    use tripmate::error::RecoverySuggestion;
    match err.recovery_suggestion() {
        RecoverySuggestion::CheckCredentials | RecoverySuggestion::CheckConfiguration => {
            Some("Set OPENAI_API_KEY (and optionally OPENWEATHER_API_KEY, AMADEUS_CLIENT_ID, AMADEUS_CLIENT_SECRET) in the environment or a .env file.")
        }
        _ => None,
    }
}
