use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ilgwa::commands;
use ilgwa::config::Config;

#[derive(Parser)]
#[command(
    name = "ilgwa",
    version,
    about = "Daily competitive-programming problem rotation service",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Path to a TOML config file (environment variables otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate (or look up) the problem set for a date
    Generate {
        /// Target date (YYYY-MM-DD), defaults to today in UTC
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show a user's solve progress against the daily sets
    Progress {
        /// Archive handle to check
        handle: String,

        /// Single date to check (YYYY-MM-DD), defaults to today in UTC
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Range start (YYYY-MM-DD); requires --to
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Range end (YYYY-MM-DD); requires --from
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Purge cached submission data before computing
        #[arg(long, default_value = "false")]
        sync: bool,
    },

    /// Run the daily generation loop
    Serve {
        /// Rotation time override (HH:MM, UTC)
        #[arg(long)]
        rotation_time: Option<String>,

        /// Skip the generation normally run at startup
        #[arg(long, default_value = "false")]
        no_startup: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    setup_tracing(&cli.log_format, cli.verbose)?;

    tracing::info!("ilgwa daily problem service starting");

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate()?;

    match cli.command {
        Commands::Generate { date } => {
            tracing::info!(date = ?date, "Starting generate command");
            commands::generate(config, date).await?;
        }

        Commands::Progress {
            handle,
            date,
            from,
            to,
            sync,
        } => {
            tracing::info!(
                handle = %handle,
                date = ?date,
                from = ?from,
                to = ?to,
                sync = %sync,
                "Starting progress command"
            );
            commands::progress(config, handle, date, from, to, sync).await?;
        }

        Commands::Serve {
            rotation_time,
            no_startup,
        } => {
            tracing::info!(
                rotation_time = ?rotation_time,
                no_startup = %no_startup,
                "Starting serve command"
            );
            commands::serve(config, rotation_time, no_startup).await?;
        }
    }

    tracing::info!("ilgwa completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("ilgwa=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("ilgwa=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
