//! Command-line driver for tripmate.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::agent::{TravelAgent, TravelSession};
use crate::config::TripConfig;
use crate::error::TripError;
use crate::tools::Tool;
use crate::travel::travel_tools;

/// tripmate: plan trips by chatting with a tool-using model
#[derive(Parser, Debug)]
#[command(name = "tripmate", version, about = "Conversational trip planner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the travel agent (interactive when no prompt is given)
    Chat(ChatArgs),
    /// List the tools the agent can call
    Tools(ToolsArgs),
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Chat model (defaults to gpt-3.5-turbo)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Settings file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// One-shot prompt
    pub prompt: Option<String>,
}

#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Settings file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "tripmate=debug" } else { "tripmate=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<(), TripError> {
    match cli.command {
        Commands::Chat(args) => handle_chat(args).await,
        Commands::Tools(args) => handle_tools(args),
    }
}

fn handle_tools(args: ToolsArgs) -> Result<(), TripError> {
    let config = TripConfig::load(args.config.as_deref())?;
    for tool in travel_tools(&config).iter() {
        println!("{:<28} {}", tool.name(), tool.description());
    }
    Ok(())
}

async fn handle_chat(args: ChatArgs) -> Result<(), TripError> {
    init_logging(args.verbose);

    let mut config = TripConfig::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.set_model(model);
    }
    if let Some(temperature) = args.temperature {
        config.set_temperature(temperature);
    }

    let mut session = TravelSession::new(TravelAgent::new(&config)?);

    if let Some(prompt) = args.prompt {
        println!("{}", session.send(&prompt).await);
        return Ok(());
    }

    interactive(&mut session).await
}

/// What the interactive loop should do with one input line.
#[derive(Debug, PartialEq, Eq)]
enum LineAction<'a> {
    Skip,
    Clear,
    Quit,
    Send(&'a str),
}

fn classify(line: &str) -> LineAction<'_> {
    match line.trim() {
        "" => LineAction::Skip,
        "/clear" => LineAction::Clear,
        "/quit" | "/exit" => LineAction::Quit,
        text => LineAction::Send(text),
    }
}

async fn interactive(session: &mut TravelSession) -> Result<(), TripError> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Where would you like to go? (/clear resets, /quit exits)\n")
        .await?;
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match classify(&line) {
            LineAction::Skip => continue,
            LineAction::Clear => {
                session.clear();
                stdout.write_all(b"History cleared.\n").await?;
            }
            LineAction::Quit => break,
            LineAction::Send(text) => {
                let reply = session.send(text).await;
                stdout.write_all(format!("\n{reply}\n\n").as_bytes()).await?;
            }
        }
    }
    Ok(())
}
