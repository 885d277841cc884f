mod cli;
mod db;
mod extract;
mod models;
mod normalize;
mod parse;
mod resolver;
mod settings;
#[cfg(test)]
mod testing;

use crate::cli::{Cli, Command};
use crate::db::Database;
use crate::extract::{CareerSelection, LoadMode, Pipeline};
use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    better_panic::install();
    init_logging();

    let cli = Cli::parse();
    let settings = cli.settings(chrono::Local::now().date_naive());
    info!(
        "nba-pipeline {} using {} (season {})",
        env!("CARGO_PKG_VERSION"),
        settings.database_url,
        settings.season
    );

    let db = Database::connect(&settings.database_url)
        .await
        .with_context(|| format!("opening {}", settings.database_url))?;
    let client = settings.stats_client();
    let pipeline = Pipeline::new(db, client, settings);
    let db = pipeline.database();

    match cli.command {
        Command::Clear => {
            db.clear_all().await.context("clearing database")?;
            info!("all data cleared");
        }
        Command::Setup => {
            db.clear_all().await.context("clearing database")?;
            pipeline.setup_teams().await?;
            pipeline.setup_players().await?;
        }
        Command::SetupTeams => {
            db.clear_all().await.context("clearing database")?;
            pipeline.setup_teams().await?;
        }
        Command::SetupPlayers => {
            db.clear_players().await.context("clearing players")?;
            pipeline.setup_players().await?;
        }
        Command::Load(args) => {
            let span = args.span().unwrap_or_else(|e| e.exit());
            pipeline.load_dates(span, LoadMode::Full).await?;
        }
        Command::LoadBasic(args) => {
            let span = args.span().unwrap_or_else(|e| e.exit());
            pipeline.load_dates(span, LoadMode::Basic).await?;
        }
        Command::LoadAdvanced(args) => {
            let span = args.span().unwrap_or_else(|e| e.exit());
            pipeline.load_dates(span, LoadMode::Advanced).await?;
        }
        Command::LoadCareerAll { limit } => {
            pipeline.load_careers(CareerSelection::All { limit }).await?;
        }
        Command::LoadCareerActive => {
            pipeline.load_careers(CareerSelection::Active).await?;
        }
        Command::LoadCareerPlayers { ids } => {
            let ids = cli::player_ids(&ids);
            pipeline.load_careers(CareerSelection::Players(ids)).await?;
        }
    }

    log_store_totals(db).await;
    Ok(())
}

async fn log_store_totals(db: &Database) {
    let mut totals = Vec::new();
    for table in ["teams", "players", "games", "player_game_stats"] {
        match db.count_rows(table).await {
            Ok(n) => totals.push(format!("{n} {table}")),
            Err(e) => warn!("counting {table}: {e}"),
        }
    }
    info!("store holds {}", totals.join(", "));
}

/// `RUST_LOG` wins; otherwise info and above. `log` records from this crate
/// and its dependencies go through the same subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
