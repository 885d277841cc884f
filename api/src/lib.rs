pub mod client;
pub mod stats;
pub mod teams;

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;

pub use client::{ApiError, ApiResult, Pacing, StatsClient};

// ---------------------------------------------------------------------------
// Result sets: named tables decoded from a stats.nba.com payload
// ---------------------------------------------------------------------------

/// One named table: an ordered header list plus value tuples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Every table returned by a single endpoint call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSets {
    tables: Vec<ResultSet>,
}

impl ResultSets {
    pub fn new(tables: Vec<ResultSet>) -> Self {
        Self { tables }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Find the table called `name` and zip each tuple against its headers.
    ///
    /// `None` means the payload carries no such table. Some tables are
    /// legitimately absent (a player with no playoff history), so most
    /// callers want [`ResultSets::rows`] instead.
    pub fn locate(&self, name: &str) -> Option<Vec<Row>> {
        let table = self.tables.iter().find(|t| t.name == name)?;
        let rows = table
            .rows
            .iter()
            .map(|values| Row {
                fields: table
                    .headers
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect(),
            })
            .collect();
        Some(rows)
    }

    /// Rows of `name`, or nothing when the table is missing.
    pub fn rows(&self, name: &str) -> Vec<Row> {
        self.locate(name).unwrap_or_default()
    }
}

/// A single decoded row: field name → raw JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Raw value; JSON null is reported as absent.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    /// Field as text. Numbers are rendered, so numeric ids come back as
    /// `"1610612738"` rather than failing.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.value(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => i.to_string(),
                None => n.to_string(),
            }),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Field as a non-empty, trimmed string.
    pub fn non_empty(&self, field: &str) -> Option<String> {
        self.text(field)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        match self.value(field)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        match self.value(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Counting stat with a zero default.
    pub fn count(&self, field: &str) -> i32 {
        self.int(field).and_then(|i| i32::try_from(i).ok()).unwrap_or(0)
    }

    /// Rate stat with a zero default.
    pub fn rate(&self, field: &str) -> f64 {
        self.float(field).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Provider capability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxScoreKind {
    Traditional,
    Advanced,
}

impl BoxScoreKind {
    pub fn label(&self) -> &'static str {
        match self {
            BoxScoreKind::Traditional => "traditional",
            BoxScoreKind::Advanced => "advanced",
        }
    }
}

/// What the pipeline needs from a stats source. Implemented by
/// [`StatsClient`]; tests swap in canned payloads.
#[allow(async_fn_in_trait)]
pub trait StatsProvider {
    /// Games scheduled or played on `date` (`GameHeader` table).
    async fn scoreboard(&self, date: NaiveDate) -> ApiResult<ResultSets>;

    /// `PlayerStats` / `TeamStats` for one game.
    async fn box_score(&self, game_id: &str, kind: BoxScoreKind) -> ApiResult<ResultSets>;

    /// `CommonPlayerInfo` for one player.
    async fn player_info(&self, player_id: &str) -> ApiResult<ResultSets>;

    /// `CommonTeamRoster` for one team and season label ("2024-25").
    async fn team_roster(&self, team_id: &str, season: &str) -> ApiResult<ResultSets>;

    /// Season, career and ranking tables for one player.
    async fn player_career(&self, player_id: &str) -> ApiResult<ResultSets>;
}
