use crate::extract::DateSpan;
use crate::settings::{DEFAULT_DATABASE_URL, Settings};
use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "nba-pipeline", version)]
#[command(about = "Load NBA games, box scores and careers into a local database", long_about = None)]
pub struct Cli {
    /// SQLite database URL.
    #[arg(long, global = true, env = "NBA_PIPELINE_DATABASE", default_value = DEFAULT_DATABASE_URL)]
    pub database: String,

    /// Stats API root, for mirrors and proxies.
    #[arg(long, global = true, env = "NBA_STATS_BASE_URL")]
    pub base_url: Option<String>,

    /// Roster season label such as 2024-25. Defaults to the season in progress.
    #[arg(long, global = true, env = "NBA_PIPELINE_SEASON")]
    pub season: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, global = true, env = "NBA_STATS_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Skip the delays between API requests.
    #[arg(long, global = true)]
    pub no_pacing: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Command {
    /// Delete every stored row.
    Clear,
    /// Clear everything, then load teams and rosters.
    Setup,
    /// Clear everything, then load teams.
    SetupTeams,
    /// Clear players, then reload rosters.
    SetupPlayers,
    /// Games, box scores and advanced box scores.
    Load(SpanArgs),
    /// Games and traditional box scores.
    LoadBasic(SpanArgs),
    /// Advanced box scores for games already stored.
    LoadAdvanced(SpanArgs),
    /// Career stats for every stored player.
    LoadCareerAll {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Career stats for players currently on a team.
    LoadCareerActive,
    /// Career stats for the given player ids.
    LoadCareerPlayers {
        /// Comma separated player ids.
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<String>,
    },
}

/// `<date> [to <date>]`
#[derive(Debug, PartialEq, Args)]
pub struct SpanArgs {
    /// First day (YYYY-MM-DD).
    pub start: NaiveDate,

    #[arg(value_parser = ["to"], requires = "end", hide = true)]
    pub to: Option<String>,

    /// Last day, inclusive.
    #[arg(requires = "to")]
    pub end: Option<NaiveDate>,
}

impl SpanArgs {
    pub fn span(&self) -> Result<DateSpan, clap::Error> {
        let (Some(_), Some(end)) = (&self.to, self.end) else {
            return Ok(DateSpan::single(self.start));
        };
        DateSpan::new(self.start, end).ok_or_else(|| {
            Cli::command().error(
                ErrorKind::ValueValidation,
                format!("start date {} is after end date {end}", self.start),
            )
        })
    }
}

impl Cli {
    pub fn settings(&self, today: NaiveDate) -> Settings {
        let mut settings = Settings::new(today);
        settings.database_url = self.database.clone();
        settings.base_url = self.base_url.clone();
        if let Some(season) = &self.season {
            settings.season = season.clone();
        }
        settings.pacing = !self.no_pacing;
        settings.timeout = self.timeout.map(Duration::from_secs);
        settings
    }
}

/// Player ids from `load-career-players`, trimmed and de-duplicated in order.
pub fn player_ids(raw: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(raw.len());
    for id in raw.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("nba-pipeline").chain(args.iter().copied()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn verbs_use_kebab_case() {
        assert_eq!(parse(&["setup-teams"]).unwrap().command, Command::SetupTeams);
        assert_eq!(
            parse(&["load-career-all", "--limit", "25"]).unwrap().command,
            Command::LoadCareerAll { limit: Some(25) }
        );
        assert!(parse(&["reload"]).is_err());
    }

    #[test]
    fn single_day_and_range() {
        let Command::Load(args) = parse(&["load", "2025-01-15"]).unwrap().command else {
            panic!("expected load");
        };
        assert_eq!(args.span().unwrap(), DateSpan::single(date(2025, 1, 15)));

        let Command::LoadBasic(args) =
            parse(&["load-basic", "2025-01-15", "to", "2025-01-22"]).unwrap().command
        else {
            panic!("expected load-basic");
        };
        assert_eq!(args.span().unwrap().day_count(), 8);
    }

    #[test]
    fn malformed_spans_are_usage_errors() {
        for args in [
            &["load", "2025-13-01"][..],
            &["load", "2025-01-15", "to"][..],
            &["load", "2025-01-15", "2025-01-22"][..],
            &["load", "2025-01-15", "until", "2025-01-22"][..],
        ] {
            let err = parse(args).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{args:?}");
        }

        let Command::LoadAdvanced(args) =
            parse(&["load-advanced", "2025-01-22", "to", "2025-01-15"]).unwrap().command
        else {
            panic!("expected load-advanced");
        };
        assert_eq!(args.span().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn player_lists_split_on_commas() {
        let Command::LoadCareerPlayers { ids } =
            parse(&["load-career-players", "2544,201939, 2544"]).unwrap().command
        else {
            panic!("expected load-career-players");
        };
        assert_eq!(player_ids(&ids), vec!["2544", "201939"]);
        assert!(parse(&["load-career-players"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["--no-pacing", "clear", "--season", "2023-24", "--database", "sqlite://x.db"]).unwrap();
        let settings = cli.settings(date(2025, 1, 1));
        assert!(!settings.pacing);
        assert_eq!(settings.season, "2023-24");
        assert_eq!(settings.database_url, "sqlite://x.db");
        assert_eq!(settings.timeout, None);

        let cli = parse(&["load", "2025-01-15", "--timeout", "5"]).unwrap();
        assert_eq!(cli.settings(date(2025, 1, 1)).timeout, Some(Duration::from_secs(5)));
        assert!(parse(&["clear", "--timeout", "soon"]).is_err());
    }
}
