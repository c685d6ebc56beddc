use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "aurora-clarify")]
#[command(version, about = "Resolve ambiguous scenarios against the Aurora gate")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Gate endpoint URL. Overrides aurora.toml and AURORA_GATE_URL.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Client-side timeout for one gate call, in seconds (0 disables it)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered scenarios
    Scenarios,
    /// Show a scenario's prompt and the context sent to the gate
    Show {
        /// Scenario id (defaults to the configured default scenario)
        id: Option<String>,
    },
    /// Run one turn non-interactively
    Run {
        /// Scenario id (defaults to the configured default scenario)
        #[arg(short, long)]
        scenario: Option<String>,

        /// Binding to submit if the gate asks for clarification
        #[arg(short, long)]
        binding: Option<String>,
    },
    /// Interactive demo: start, clarify, reset and switch scenarios
    Demo,
    /// View, validate or create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default aurora.toml file
    Init,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "aurora_clarify=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Scenarios => cmd::cmd_scenarios(),
        Commands::Show { id } => cmd::cmd_show(&project_dir, id.as_deref())?,
        Commands::Run { scenario, binding } => {
            cmd::cmd_run(&cli, &project_dir, scenario.as_deref(), binding.as_deref()).await?
        }
        Commands::Demo => cmd::cmd_demo(&cli, &project_dir).await?,
        Commands::Config { command } => cmd::cmd_config(&cli, &project_dir, command.clone())?,
    }

    Ok(())
}
