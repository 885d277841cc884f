//! Field normalizers. Every function here is total: malformed input maps to a
//! fixed default instead of an error, so one bad field never blocks a row.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

pub const DEFAULT_HEIGHT_INCHES: i32 = 72;
pub const DEFAULT_WEIGHT_POUNDS: i32 = 200;
pub const DEFAULT_POSITION: &str = "G";
/// Width of `players.position`.
pub const POSITION_MAX_LEN: usize = 10;

const POSITIONS: [(&str, &str); 14] = [
    ("Point Guard", "PG"),
    ("Shooting Guard", "SG"),
    ("Small Forward", "SF"),
    ("Power Forward", "PF"),
    ("Center", "C"),
    ("Guard", "G"),
    ("Forward", "F"),
    ("Guard-Forward", "G-F"),
    ("Forward-Guard", "F-G"),
    ("Forward-Center", "F-C"),
    ("Center-Forward", "C-F"),
    ("Point Guard-Shooting Guard", "PG-SG"),
    ("Shooting Guard-Small Forward", "SG-SF"),
    ("Small Forward-Power Forward", "SF-PF"),
];

const UNRANKED: [&str; 3] = ["NR", "N/A", "NULL"];

/// `"MM:SS"` → fractional minutes.
pub fn minutes_to_decimal(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let mut parts = raw.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), None) => match (m.trim().parse::<i64>(), s.trim().parse::<i64>()) {
            (Ok(m), Ok(s)) => m as f64 + s as f64 / 60.0,
            _ => 0.0,
        },
        _ => 0.0,
    }
}

/// `"F-I"` → inches.
pub fn height_to_inches(raw: Option<&str>) -> i32 {
    let Some(raw) = raw else { return DEFAULT_HEIGHT_INCHES };
    let mut parts = raw.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(f), Some(i), None) => match (f.trim().parse::<i32>(), i.trim().parse::<i32>()) {
            (Ok(feet), Ok(inches)) => feet * 12 + inches,
            _ => DEFAULT_HEIGHT_INCHES,
        },
        _ => DEFAULT_HEIGHT_INCHES,
    }
}

pub fn parse_weight(raw: Option<&str>) -> i32 {
    raw.and_then(|w| w.trim().parse().ok())
        .unwrap_or(DEFAULT_WEIGHT_POUNDS)
}

/// Seasons of experience; the roster endpoint reports rookies as `"R"`.
pub fn parse_experience(raw: Option<&str>) -> i32 {
    match raw.map(str::trim) {
        Some("R") | None => 0,
        Some(exp) => exp.parse().unwrap_or(0),
    }
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Age from `"1984-12-30T00:00:00"` or `"1984-12-30"`; only the date part is read.
pub fn age_from_birthdate(raw: Option<&str>, today: NaiveDate) -> Option<i32> {
    let date_part: String = raw?.chars().take(10).collect();
    let birth = NaiveDate::parse_from_str(&date_part, "%Y-%m-%d").ok()?;
    Some(age_on(birth, today))
}

/// Collapse a free-text position into a code of at most ten characters.
///
/// Normalizing an already normalized value returns it unchanged.
pub fn normalize_position(raw: Option<&str>) -> String {
    let label = raw.unwrap_or("").trim();
    if label.is_empty() || label == "nan" {
        return DEFAULT_POSITION.to_string();
    }
    if let Some(code) = position_code(label) {
        return code.to_string();
    }
    if label.chars().count() <= POSITION_MAX_LEN {
        return label.to_string();
    }

    let shortened: String = if label.contains('-') {
        label
            .split('-')
            .filter_map(|part| part.chars().next())
            .map(String::from)
            .collect::<Vec<_>>()
            .join("-")
    } else {
        label.to_string()
    };
    let shortened: String = shortened.chars().take(POSITION_MAX_LEN).collect();
    let shortened = shortened
        .trim_end_matches(|c: char| c == '-' || c.is_whitespace())
        .trim_start();

    if shortened.is_empty() || shortened == "nan" {
        return DEFAULT_POSITION.to_string();
    }
    position_code(shortened).unwrap_or(shortened).to_string()
}

fn position_code(label: &str) -> Option<&'static str> {
    POSITIONS.iter().find(|(long, _)| *long == label).map(|(_, code)| *code)
}

/// Rank text → rank. Placeholders mean "not ranked".
pub fn parse_rank(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || UNRANKED.iter().any(|m| m.eq_ignore_ascii_case(trimmed)) {
        return None;
    }
    trimmed.parse().ok()
}

/// [`parse_rank`] over a raw JSON cell, which may already be numeric.
pub fn rank_value(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => parse_rank(s),
        _ => None,
    }
}

/// Season label ("2024-25") in effect on `today`. Seasons tip off in October.
pub fn current_season(today: NaiveDate) -> String {
    let start = if today.month() >= 10 { today.year() } else { today.year() - 1 };
    format!("{start}-{:02}", (start + 1) % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn minutes_parse_clock_format() {
        assert_eq!(minutes_to_decimal(Some("34:30")), 34.5);
        assert_eq!(minutes_to_decimal(Some("0:00")), 0.0);
        assert_eq!(minutes_to_decimal(Some("12:15")), 12.25);
    }

    #[test]
    fn malformed_minutes_are_zero() {
        for raw in ["", "34", "34:xx", "1:2:3", "abc"] {
            assert_eq!(minutes_to_decimal(Some(raw)), 0.0, "{raw:?}");
        }
        assert_eq!(minutes_to_decimal(None), 0.0);
    }

    #[test]
    fn heights_convert_to_inches() {
        assert_eq!(height_to_inches(Some("6-9")), 81);
        assert_eq!(height_to_inches(Some("7-0")), 84);
        for feet in 4..8 {
            for inches in 0..12 {
                let raw = format!("{feet}-{inches}");
                assert_eq!(height_to_inches(Some(&raw)), feet * 12 + inches);
            }
        }
    }

    #[test]
    fn malformed_heights_default_to_72() {
        for raw in ["", "nan", "6", "6-", "six-nine", "6-9-1", "6'9\""] {
            assert_eq!(height_to_inches(Some(raw)), 72, "{raw:?}");
        }
        assert_eq!(height_to_inches(None), 72);
    }

    #[test]
    fn weight_and_experience_defaults() {
        assert_eq!(parse_weight(Some("250")), 250);
        assert_eq!(parse_weight(Some("")), 200);
        assert_eq!(parse_weight(None), 200);
        assert_eq!(parse_experience(Some("R")), 0);
        assert_eq!(parse_experience(Some("12")), 12);
        assert_eq!(parse_experience(Some("?")), 0);
    }

    #[test]
    fn age_accounts_for_birthday_not_yet_reached() {
        let today = date(2024, 6, 1);
        assert_eq!(age_from_birthdate(Some("1984-12-30T00:00:00"), today), Some(39));
        assert_eq!(age_from_birthdate(Some("1984-06-01"), today), Some(40));
        assert_eq!(age_from_birthdate(Some("1984-06-02"), today), Some(39));
    }

    #[test]
    fn unparsable_birthdates_have_no_age() {
        let today = date(2024, 6, 1);
        assert_eq!(age_from_birthdate(Some(""), today), None);
        assert_eq!(age_from_birthdate(Some("December 30"), today), None);
        assert_eq!(age_from_birthdate(None, today), None);
    }

    #[test]
    fn positions_map_known_labels() {
        assert_eq!(normalize_position(Some("Point Guard")), "PG");
        assert_eq!(normalize_position(Some("Forward-Center")), "F-C");
        assert_eq!(normalize_position(Some(" Center ")), "C");
        assert_eq!(normalize_position(Some("")), "G");
        assert_eq!(normalize_position(Some("nan")), "G");
        assert_eq!(normalize_position(None), "G");
    }

    #[test]
    fn unknown_positions_are_abbreviated_or_truncated() {
        assert_eq!(normalize_position(Some("Wing-Big-Stretch")), "W-B-S");
        assert_eq!(normalize_position(Some("Swingman Deluxe")), "Swingman D");
        assert_eq!(normalize_position(Some("F-C")), "F-C");
        assert_eq!(normalize_position(Some("PG")), "PG");
    }

    #[test]
    fn short_unknown_positions_are_kept() {
        assert_eq!(normalize_position(Some("Guard-Wing")), "Guard-Wing");
        assert_eq!(normalize_position(Some(" Wing ")), "Wing");
        assert_eq!(normalize_position(Some("PG-SG")), "PG-SG");
    }

    #[test]
    fn position_normalization_is_idempotent_and_bounded() {
        let samples = [
            "Point Guard",
            "Guard-Forward",
            "G",
            "",
            "nan",
            " ",
            "-",
            "----------------",
            "A-B-C-D-E-F-G",
            "Guard     extra",
            "nan       trailing",
            "Forward - Center",
            "Very Long Position Label",
            "Ünïcödé Pösitiön Länger",
            "Point Guard-Shooting Guard",
            "Shooting Guard-Small Forward",
            "Small Forward-Power Forward",
            "Guard-Wing",
            "-  abc-def-ghi",
        ];
        for raw in samples {
            let once = normalize_position(Some(raw));
            let twice = normalize_position(Some(&once));
            assert_eq!(once, twice, "{raw:?}");
            assert!(once.chars().count() <= POSITION_MAX_LEN, "{raw:?} -> {once:?}");
        }
    }

    #[test]
    fn ranks_skip_placeholders() {
        for raw in ["", "NR", "nr", "N/A", "n/a", "NULL", "Null", "abc", "1.5"] {
            assert_eq!(parse_rank(raw), None, "{raw:?}");
        }
        assert_eq!(parse_rank("7"), Some(7));
        assert_eq!(parse_rank(" 12 "), Some(12));
    }

    #[test]
    fn rank_values_accept_numbers() {
        assert_eq!(rank_value(Some(&json!(3))), Some(3));
        assert_eq!(rank_value(Some(&json!(4.0))), Some(4));
        assert_eq!(rank_value(Some(&json!(1.5))), None);
        assert_eq!(rank_value(Some(&json!("NR"))), None);
        assert_eq!(rank_value(Some(&json!(null))), None);
        assert_eq!(rank_value(None), None);
    }

    #[test]
    fn season_label_rolls_over_in_october() {
        assert_eq!(current_season(date(2025, 2, 1)), "2024-25");
        assert_eq!(current_season(date(2025, 9, 30)), "2024-25");
        assert_eq!(current_season(date(2025, 10, 1)), "2025-26");
        assert_eq!(current_season(date(1999, 11, 1)), "1999-00");
    }
}
