//! House Cup CLI
//!
//! Command-line entry point:
//! - Watch the leaderboard in the terminal
//! - Print totals once
//! - Run the points feed against a backend
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use house_cup::api::TotalsClient;
use house_cup::config::{generate_default_config, Config};
use house_cup::feed::{self, FeedOptions};
use house_cup::watch::{self, WatchOptions};
use house_cup::{bar_rows, logging, render_text, TimeWindow};

#[derive(Parser)]
#[command(name = "house-cup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live team leaderboard")]
#[command(long_about = "House Cup shows live team totals as bars.\nWatch the standings, switch time windows, and feed test points into a backend.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides config and HOUSE_CUP_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: user config dir, then ./house-cup.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the leaderboard; type commands on stdin
    Watch {
        /// Time window (5m, 1h, all)
        #[arg(short, long)]
        window: Option<TimeWindow>,
        /// Start with live updates on
        #[arg(short, long)]
        live: bool,
    },

    /// Fetch totals once and print them
    Totals {
        /// Time window (5m, 1h, all)
        #[arg(short, long)]
        window: Option<TimeWindow>,
        /// Print JSON instead of bars
        #[arg(long)]
        json: bool,
    },

    /// Post random points awards to the backend
    Feed {
        /// Stop after this many events (default: run until interrupted)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
        count: Option<u64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    logging::init(&config.logging);
    tracing::debug!("House Cup v{} using {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    match cli.command {
        Commands::Watch { window, live } => {
            watch::run(WatchOptions {
                base_url: config.api.base_url,
                window: window.unwrap_or(config.display.default_window),
                live: live || config.display.start_live,
                bar_width: config.display.bar_width,
            })
            .await
            .context("watcher stopped")?;
        }

        Commands::Totals { window, json } => {
            let window = window.unwrap_or(config.display.default_window);
            let client = TotalsClient::new(config.api.base_url);
            let snapshot = client
                .fetch_totals(window)
                .await
                .with_context(|| format!("failed to fetch totals for window {}", window))?;

            if json {
                let teams: Vec<_> = bar_rows(&snapshot)
                    .into_iter()
                    .map(|row| {
                        json!({
                            "team": row.team.name,
                            "icon": row.team.icon,
                            "score": row.score,
                            "percent": row.percent,
                        })
                    })
                    .collect();
                let body = json!({ "window": window, "teams": teams });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print!("{}", render_text(&snapshot, window, false, config.display.bar_width));
            }
        }

        Commands::Feed { count } => {
            let client = TotalsClient::new(config.api.base_url);
            let options = FeedOptions::from_config(&config.feed, count);
            tracing::info!("Feeding {}", house_cup::api::ingest_url(client.base_url()));

            let stats = tokio::select! {
                stats = feed::run(&client, &options) => stats,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted");
                    return Ok(());
                }
            };
            tracing::info!("Feed done: {} sent, {} failed", stats.sent, stats.failed);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}
