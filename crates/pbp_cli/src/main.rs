//! pbp CLI
//!
//! Replay play-by-play feeds and inspect the game state at any step.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pbp_core::GroundoutPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pbp", version)]
#[command(about = "Replay baseball play-by-play feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a feed and emit every frame and snapshot as JSON
    Replay {
        /// Input feed file (bare event array or envelope)
        #[arg(long)]
        r#in: PathBuf,

        /// Engine config file (.json, .yaml or .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the groundout convention from the config file
        #[arg(long, value_enum)]
        groundout: Option<GroundoutArg>,

        /// Output file path (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long, default_value = "false")]
        compact: bool,
    },

    /// Print the game state after a given step
    State {
        /// Input feed file
        #[arg(long)]
        r#in: PathBuf,

        /// 1-based event number
        #[arg(long)]
        step: usize,

        /// Engine config file (.json, .yaml or .yml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the JSON schema of a play event
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroundoutArg {
    Directives,
    ForceAdvance,
}

impl From<GroundoutArg> for GroundoutPolicy {
    fn from(arg: GroundoutArg) -> Self {
        match arg {
            GroundoutArg::Directives => GroundoutPolicy::Directives,
            GroundoutArg::ForceAdvance => GroundoutPolicy::ForceAdvance,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            r#in,
            config,
            groundout,
            out,
            compact,
        } => {
            let config = pbp_cli::load_config(config.as_deref(), groundout.map(Into::into))?;
            let response = pbp_cli::replay_file(&r#in, &config)?;
            let json = pbp_cli::render_response(&response, compact)?;
            pbp_cli::write_output(out.as_deref(), &json)?;
            eprintln!("{}", pbp_cli::summary_line(&response));
        }

        Commands::State { r#in, step, config } => {
            let config = pbp_cli::load_config(config.as_deref(), None)?;
            let response = pbp_cli::replay_file(&r#in, &config)?;
            let snapshot = pbp_cli::snapshot_at(&response, step)?;
            let json =
                serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
            println!("{}", json);
        }

        Commands::Schema => {
            println!("{}", pbp_cli::event_schema()?);
        }
    }

    Ok(())
}
