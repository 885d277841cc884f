//! Materializes players that a box score mentions before the local store
//! knows them, so the stats row can satisfy its foreign key.

use crate::db::Database;
use crate::models::Player;
use crate::normalize::{DEFAULT_HEIGHT_INCHES, DEFAULT_POSITION, DEFAULT_WEIGHT_POUNDS};
use crate::parse::{self, PlayerDetail, PlayerRef};
use chrono::NaiveDate;
use log::{debug, info, warn};
use nba_stats_api::StatsProvider;
use std::collections::HashSet;
use thiserror::Error;

/// Player ids already present locally or created earlier in this run.
pub type KnownPlayers = HashSet<String>;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    AlreadyKnown,
    Created(Player),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("player {player_id} would reference unknown team {team_id}")]
    DanglingTeam { player_id: String, team_id: String },
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub struct Resolver<'a, P> {
    db: &'a Database,
    provider: &'a P,
    today: NaiveDate,
}

impl<'a, P: StatsProvider> Resolver<'a, P> {
    pub fn new(db: &'a Database, provider: &'a P, today: NaiveDate) -> Self {
        Self { db, provider, today }
    }

    /// Make sure `player` exists locally. `game_team_id` is the team the row
    /// credits the player to for this game; it wins whenever the provider's
    /// own team claim can't be corroborated.
    pub async fn resolve(
        &self,
        player: &PlayerRef,
        game_team_id: &str,
        known: &mut KnownPlayers,
    ) -> Result<Resolution, ResolveError> {
        if known.contains(&player.id) {
            return Ok(Resolution::AlreadyKnown);
        }

        let detail = self.fetch_detail(&player.id).await;
        let team_id = match &detail {
            Some(d) => self.reconcile_team(d.listed_team_id.as_deref(), game_team_id).await?,
            None => game_team_id.to_string(),
        };

        if !self.db.team_exists(&team_id).await? {
            return Err(ResolveError::DanglingTeam { player_id: player.id.clone(), team_id });
        }

        let resolved = build_player(player, detail, team_id);
        self.db.upsert_players(std::slice::from_ref(&resolved)).await?;
        known.insert(resolved.id.clone());
        info!("created player {} ({}) on team {:?}", resolved.id, resolved.name, resolved.team_id);
        Ok(Resolution::Created(resolved))
    }

    async fn fetch_detail(&self, player_id: &str) -> Option<PlayerDetail> {
        match self.provider.player_info(player_id).await {
            Ok(sets) => {
                let detail = parse::player_detail(&sets, self.today);
                if detail.is_none() {
                    warn!("no player info rows for {player_id}, using defaults");
                }
                detail
            }
            Err(e) => {
                warn!("player info for {player_id} failed, using defaults: {e}");
                None
            }
        }
    }

    async fn reconcile_team(
        &self,
        listed: Option<&str>,
        game_team_id: &str,
    ) -> Result<String, ResolveError> {
        let Some(listed) = listed.map(str::trim).filter(|t| !is_unaffiliated(t)) else {
            debug!("no listed team, using game team {game_team_id}");
            return Ok(game_team_id.to_string());
        };
        if self.db.team_exists(listed).await? {
            Ok(listed.to_string())
        } else {
            debug!("listed team {listed} is not stored, using game team {game_team_id}");
            Ok(game_team_id.to_string())
        }
    }
}

/// Team ids that mean "between contracts".
fn is_unaffiliated(team_id: &str) -> bool {
    matches!(team_id, "" | "0" | "None")
}

fn build_player(player: &PlayerRef, detail: Option<PlayerDetail>, team_id: String) -> Player {
    let fallback_name = || format!("Player {}", player.id);
    match detail {
        Some(d) => Player {
            id: player.id.clone(),
            name: player.name.clone().or(d.name).unwrap_or_else(fallback_name),
            team_id: Some(team_id),
            age: d.age,
            position: d.position,
            height_inches: d.height_inches,
            weight_pounds: d.weight_pounds,
            years_experience: d.years_experience,
        },
        None => Player {
            id: player.id.clone(),
            name: player.name.clone().unwrap_or_else(fallback_name),
            team_id: Some(team_id),
            age: None,
            position: DEFAULT_POSITION.to_string(),
            height_inches: DEFAULT_HEIGHT_INCHES,
            weight_pounds: DEFAULT_WEIGHT_POUNDS,
            years_experience: 0,
        },
    }
}
