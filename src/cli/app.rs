//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{match_cmd, score};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "scorebook")]
#[command(author, version, about = "Ball-by-ball cricket scoring from the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to default_format from the global config)
    #[arg(long, short = 'f', global = true, env = "SCOREBOOK_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new scorebook project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Create, start and inspect matches
    #[command(subcommand)]
    Match(match_cmd::MatchCommands),

    /// Record one scoring event
    Score(score::ScoreArgs),
}

/// Installs the log subscriber; `SCOREBOOK_LOG` overrides the level
fn init_tracing(verbose: bool) {
    let default = if verbose { "scorebook=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SCOREBOOK_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    // a second install (tests calling run twice) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("scorebook starting");

    let result = match cli.command {
        Commands::Init { path } => init(&output, &path),
        Commands::Match(cmd) => match_cmd::run(cmd, &output),
        Commands::Score(args) => score::run(args, &output),
    };

    if let Err(e) = &result {
        if output.is_json() {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
        return result;
    }

    output.verbose("Command completed successfully");
    Ok(())
}

fn init(output: &Output, path: &str) -> Result<()> {
    output.verbose_ctx("init", &format!("Initializing project at: {}", path));
    let project = Project::init(path)?;
    output.verbose_ctx(
        "init",
        &format!("Created workspace at: {}", project.workspace_dir().display()),
    );
    output.success(&format!(
        "Initialized scorebook project at {}",
        project.root().display()
    ));
    Ok(())
}
