//! Tokencast - token price forecasts from the command line
//!
//! # Usage
//! ```sh
//! cargo run -- tokens
//! cargo run -- predict --token aptos --timeframe 7d
//! STORAGE_MODE=sqlite cargo run -- seed --token aptos --days 90
//! ```
//!
//! See `.env` / `config` for the environment variables read at startup.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokencast::application::bootstrap::{PersistenceBootstrap, ServicesBootstrap};
use tokencast::config::Config;
use tokencast::domain::errors::PredictionError;
use tokencast::domain::prediction::Timeframe;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the token catalogue
    Tokens,

    /// Predict one timeframe for a token
    Predict {
        #[arg(long)]
        token: String,

        /// 1d, 7d or 30d
        #[arg(long, default_value = "7d")]
        timeframe: Timeframe,
    },

    /// Predict every timeframe for a token
    Analyze {
        #[arg(long)]
        token: String,
    },

    /// Show stored predictions, newest first
    History {
        #[arg(long)]
        token: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Write a synthetic daily history into the configured store
    Seed {
        #[arg(long)]
        token: String,

        #[arg(long, default_value_t = 90)]
        days: usize,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(e: &PredictionError) {
    error!("{}", e);
    eprintln!("{}", e.user_message());
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    info!(
        "Tokencast {} (storage={:?}, lookback={}d)",
        env!("CARGO_PKG_VERSION"),
        config.storage_mode,
        config.lookback_days
    );

    let persistence = PersistenceBootstrap::init(&config).await?;
    let services = ServicesBootstrap::init(&config, &persistence);
    let analysis = services.analysis.clone();

    match args.command {
        Command::Tokens => print_json(&analysis.catalogue())?,
        Command::Predict { token, timeframe } => match analysis.predict(&token, timeframe).await {
            Ok(result) => print_json(&result)?,
            Err(e) => {
                report(&e);
                std::process::exit(1);
            }
        },
        Command::Analyze { token } => match analysis.analyze(&token).await {
            Ok(result) => print_json(&result)?,
            Err(e) => {
                report(&e);
                std::process::exit(1);
            }
        },
        Command::History { token, limit } => {
            let records = analysis.history(&token, limit).await?;
            print_json(&records)?;
        }
        Command::Seed { token, days } => {
            let prices = services.generator.generate(&token, days);
            persistence.price_writer.save_daily(&token, &prices).await?;
            info!("Seeded {} daily prices for {}", prices.len(), token);
        }
    }

    Ok(())
}
