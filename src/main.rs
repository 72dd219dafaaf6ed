use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dota_dashboard::api::state::AppState;
use dota_dashboard::config::AppConfig;
use dota_dashboard::fetch::{FixtureSource, OpenDotaClient, StatsSource};
use dota_dashboard::models::PipelineResult;
use dota_dashboard::pipeline::Pipeline;
use dota_dashboard::reference::ReferenceData;

#[derive(Parser)]
#[command(name = "dota-dashboard")]
#[command(about = "Single-player Dota 2 stats dashboard backed by OpenDota")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Serve from local fixture files instead of OpenDota
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Run the pipeline once for a player and print the dashboard
    Show {
        /// OpenDota account id
        player_id: String,

        /// Read player data from local fixture files instead of OpenDota
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting dota-dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            fixtures,
        } => {
            let pipeline = build_pipeline(&config, fixtures.as_deref()).await?;
            let state = AppState {
                pipeline,
                cors_origin: config.server.cors_origin.clone(),
            };
            let app = dota_dashboard::api::build_router(state);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard API: http://{}/api/dashboard?player_id=", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Show {
            player_id,
            fixtures,
            json,
        } => {
            let pipeline = build_pipeline(&config, fixtures.as_deref()).await?;
            match pipeline.run(&player_id).await? {
                Some(result) if json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Some(result) => print_dashboard(&result),
                None => eprintln!("No player id given, nothing to show"),
            }
        }
    }

    Ok(())
}

/// Pick the stats source, load reference data once and wire up the pipeline.
async fn build_pipeline(config: &AppConfig, fixtures: Option<&Path>) -> Result<Arc<Pipeline>> {
    let source: Arc<dyn StatsSource> = match fixtures {
        Some(dir) => {
            tracing::info!("Using fixture data from {}", dir.display());
            Arc::new(FixtureSource::new(dir))
        }
        None => Arc::new(OpenDotaClient::new(config.api.fetcher_config()?)?),
    };

    let reference = ReferenceData::load(source.as_ref())
        .await
        .context("Failed to load reference data")?;

    Ok(Arc::new(Pipeline::new(
        source,
        Arc::new(reference),
        config.pipeline.clone(),
        config.api.deadline(),
    )))
}

fn print_dashboard(result: &PipelineResult) {
    let name = result
        .player
        .persona_name
        .as_deref()
        .unwrap_or(&result.player_id);
    println!("=== Dashboard for {} ({}) ===\n", name, result.player_id);

    let a = &result.aggregates;
    println!(
        "Matches: {}  Wins: {}  Losses: {}",
        a.match_count, a.wins, a.losses
    );
    println!(
        "Kills: {}  Deaths: {}  Assists: {}",
        a.total_kills, a.total_deaths, a.total_assists
    );
    println!(
        "Radiant: {}  Dire: {}",
        result.sides.radiant, result.sides.dire
    );

    println!("\nTop heroes by games:");
    for hero in &result.top_heroes_by_games {
        println!(
            "  {:<24} {:>5} games  {:>5.1}%",
            hero.hero, hero.games, hero.win_pct
        );
    }

    println!("\nTop heroes by win rate:");
    for hero in &result.top_heroes_by_win_rate {
        println!(
            "  {:<24} {:>5.1}%  ({} games)",
            hero.hero, hero.win_pct, hero.games
        );
    }

    println!("\nMost games with:");
    for peer in &result.top_friends {
        println!("  {:<24} {:>5}", peer.name, peer.games);
    }

    println!("\nMost wins with:");
    for peer in &result.top_winning_friends {
        println!("  {:<24} {:>5}", peer.name, peer.wins);
    }

    println!("\nRecent matches:");
    for row in result.matches.iter().take(10) {
        println!(
            "  {}  {:<16} {:<7} {:<4} {}/{}/{}  {}",
            row.match_date,
            row.hero_name.as_deref().unwrap_or("?"),
            row.side.to_string(),
            row.result.to_string(),
            row.kills,
            row.deaths,
            row.assists,
            row.duration
        );
    }
}
