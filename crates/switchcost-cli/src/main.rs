mod commands;
mod daemon_launcher;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "switchcost")]
#[command(about = "SwitchCost CLI - Track time spent per focused application", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the SwitchCost daemon in the background
    Start,
    /// Show whether the daemon runs and the time spent per application
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stop the running daemon
    Exit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => commands::start().await,
        Commands::Status { json } => commands::status(json),
        Commands::Exit => commands::exit(),
    }
}
