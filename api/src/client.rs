use crate::stats::{StatsResponse, lenient_result_sets};
use crate::{BoxScoreKind, ResultSets, StatsProvider};
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const STATS_BASE: &str = "https://stats.nba.com/stats";
const NBA_REFERER: &str = "https://www.nba.com/";
const NBA_ORIGIN: &str = "https://www.nba.com";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fixed delays slept before each outbound request. stats.nba.com throttles
/// aggressive clients; the delays are the whole strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub box_score: Duration,
    pub player_info: Duration,
    pub roster: Duration,
    pub career: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            box_score: Duration::from_millis(1000),
            player_info: Duration::from_millis(500),
            roster: Duration::from_millis(500),
            career: Duration::from_millis(1000),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            box_score: Duration::ZERO,
            player_info: Duration::ZERO,
            roster: Duration::ZERO,
            career: Duration::ZERO,
        }
    }
}

/// stats.nba.com client.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    pacing: Pacing,
}

impl Default for StatsClient {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("nba-pipeline/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: STATS_BASE.to_string(),
            timeout: Duration::from_secs(30),
            pacing: Pacing::default(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

/// Which request style to use. Structured mirrors the official site's API
/// headers and decodes strictly; raw poses as a browser and walks whatever
/// JSON comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Structured,
    Raw,
}

#[derive(Debug, Clone, Copy)]
enum Endpoint<'a> {
    Scoreboard(NaiveDate),
    BoxScore(&'a str, BoxScoreKind),
    PlayerInfo(&'a str),
    TeamRoster(&'a str, &'a str),
    PlayerCareer(&'a str),
}

impl Endpoint<'_> {
    fn path(&self) -> &'static str {
        match self {
            Endpoint::Scoreboard(_) => "scoreboardv2",
            Endpoint::BoxScore(_, BoxScoreKind::Traditional) => "boxscoretraditionalv2",
            Endpoint::BoxScore(_, BoxScoreKind::Advanced) => "boxscoreadvancedv2",
            Endpoint::PlayerInfo(_) => "commonplayerinfo",
            Endpoint::TeamRoster(..) => "commonteamroster",
            Endpoint::PlayerCareer(_) => "playercareerstats",
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match *self {
            Endpoint::Scoreboard(date) => vec![
                ("GameDate", date.format("%m/%d/%Y").to_string()),
                ("LeagueID", "00".into()),
                ("DayOffset", "0".into()),
            ],
            // Full game, every period, no time slicing.
            Endpoint::BoxScore(game_id, _) => vec![
                ("GameID", game_id.into()),
                ("StartPeriod", "0".into()),
                ("EndPeriod", "10".into()),
                ("StartRange", "0".into()),
                ("EndRange", "55800".into()),
                ("RangeType", "2".into()),
            ],
            Endpoint::PlayerInfo(player_id) => vec![("PlayerID", player_id.into())],
            Endpoint::TeamRoster(team_id, season) => {
                vec![("TeamID", team_id.into()), ("Season", season.into())]
            }
            Endpoint::PlayerCareer(player_id) => {
                vec![("PlayerID", player_id.into()), ("PerMode", "Totals".into())]
            }
        }
    }

    fn delay(&self, pacing: &Pacing) -> Duration {
        match self {
            Endpoint::Scoreboard(_) => Duration::ZERO,
            Endpoint::BoxScore(..) => pacing.box_score,
            Endpoint::PlayerInfo(_) => pacing.player_info,
            Endpoint::TeamRoster(..) => pacing.roster,
            Endpoint::PlayerCareer(_) => pacing.career,
        }
    }
}

impl StatsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch one endpoint's result sets.
    ///
    /// Fallback chain:
    /// 1) Structured: official-site headers, strict `resultSets` decode.
    /// 2) Raw: browser headers, lenient walk of the JSON body.
    ///
    /// The pacing delay is slept once, before the first attempt.
    async fn fetch(&self, endpoint: Endpoint<'_>) -> ApiResult<ResultSets> {
        let delay = endpoint.delay(&self.pacing);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let url = self.url_for(&endpoint)?;

        match self.get::<StatsResponse>(&url, Backend::Structured).await {
            Ok(raw) => return Ok(raw.into()),
            Err(e) => warn!("{} structured fetch failed, retrying raw: {e}", endpoint.path()),
        }

        let body = self.get::<Value>(&url, Backend::Raw).await?;
        let sets = lenient_result_sets(&body);
        if sets.is_empty() {
            return Err(ApiError::NotFound(format!("no result sets in {url}")));
        }
        debug!("{} served by raw backend", endpoint.path());
        Ok(sets)
    }

    fn url_for(&self, endpoint: &Endpoint<'_>) -> ApiResult<Url> {
        let base = format!("{}/{}", self.base_url, endpoint.path());
        Url::parse_with_params(&base, endpoint.params())
            .map_err(|e| ApiError::Other(format!("invalid url {base}: {e}")))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &Url, backend: Backend) -> ApiResult<T> {
        let request = self.client.get(url.clone()).timeout(self.timeout);
        let request = match backend {
            Backend::Structured => request
                .header("Accept", "application/json, text/plain, */*")
                .header("Referer", NBA_REFERER)
                .header("Origin", NBA_ORIGIN)
                .header("x-nba-stats-origin", "stats")
                .header("x-nba-stats-token", "true"),
            Backend::Raw => request
                .header("User-Agent", BROWSER_USER_AGENT)
                .header("Accept", "application/json, text/plain, */*")
                .header("Referer", NBA_REFERER),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_string()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_string())),
            Err(e) => Err(ApiError::Api(e, url.to_string())),
        }
    }
}

impl StatsProvider for StatsClient {
    async fn scoreboard(&self, date: NaiveDate) -> ApiResult<ResultSets> {
        self.fetch(Endpoint::Scoreboard(date)).await
    }

    async fn box_score(&self, game_id: &str, kind: BoxScoreKind) -> ApiResult<ResultSets> {
        self.fetch(Endpoint::BoxScore(game_id, kind)).await
    }

    async fn player_info(&self, player_id: &str) -> ApiResult<ResultSets> {
        self.fetch(Endpoint::PlayerInfo(player_id)).await
    }

    async fn team_roster(&self, team_id: &str, season: &str) -> ApiResult<ResultSets> {
        self.fetch(Endpoint::TeamRoster(team_id, season)).await
    }

    async fn player_career(&self, player_id: &str) -> ApiResult<ResultSets> {
        self.fetch(Endpoint::PlayerCareer(player_id)).await
    }
}
