use crate::normalize::current_season;
use chrono::NaiveDate;
use nba_stats_api::{Pacing, StatsClient};
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://nba_stats.db";

/// Run-wide knobs, resolved once at startup from flags and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub base_url: Option<String>,
    /// Roster season label, e.g. "2024-25".
    pub season: String,
    pub pacing: bool,
    /// Per-request HTTP timeout; the client default when unset.
    pub timeout: Option<Duration>,
    /// Reference date for ages and the default season.
    pub today: NaiveDate,
}

impl Settings {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            base_url: None,
            season: current_season(today),
            pacing: true,
            timeout: None,
            today,
        }
    }

    pub fn stats_client(&self) -> StatsClient {
        let mut client = StatsClient::new();
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url.clone());
        }
        if !self.pacing {
            client = client.with_pacing(Pacing::none());
        }
        if let Some(timeout) = self.timeout {
            client = client.with_timeout(timeout);
        }
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_calendar() {
        let settings = Settings::new(NaiveDate::from_ymd_opt(2024, 11, 2).unwrap());
        assert_eq!(settings.season, "2024-25");
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert!(settings.pacing);
        assert_eq!(settings.timeout, None);

        let spring = Settings::new(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(spring.season, "2024-25");
    }
}
