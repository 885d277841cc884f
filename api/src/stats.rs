//! stats.nba.com raw wire types (serde shapes for the `resultSets` envelope).
//! Both backends end up as [`ResultSets`]; the strict shape is tried first and
//! the lenient `Value` walk picks up payloads that drift from it.
use crate::{ResultSet, ResultSets};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Strict envelope (structured backend)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct StatsResponse {
    #[serde(rename = "resultSets")]
    pub result_sets: Vec<WireResultSet>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireResultSet {
    pub name: String,
    pub headers: Vec<String>,
    #[serde(rename = "rowSet")]
    pub row_set: Vec<Vec<Value>>,
}

impl From<StatsResponse> for ResultSets {
    fn from(raw: StatsResponse) -> Self {
        ResultSets::new(
            raw.result_sets
                .into_iter()
                .map(|s| ResultSet { name: s.name, headers: s.headers, rows: s.row_set })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Lenient walk (raw backend)
// ---------------------------------------------------------------------------

/// Pull every named table out of an arbitrary payload.
///
/// Accepts `resultSets` (array) or `resultSet` (object or array). Entries
/// without a name are skipped; a missing `rowSet` is an empty table; non-array
/// rows are dropped.
pub fn lenient_result_sets(payload: &Value) -> ResultSets {
    let entries: Vec<&Value> = match payload
        .get("resultSets")
        .or_else(|| payload.get("resultSet"))
    {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => Vec::new(),
    };

    let tables = entries.into_iter().filter_map(lenient_table).collect();
    ResultSets::new(tables)
}

fn lenient_table(entry: &Value) -> Option<ResultSet> {
    let name = entry.get("name")?.as_str()?.to_string();
    let headers = entry
        .get("headers")
        .and_then(Value::as_array)
        .map(|hs| {
            hs.iter()
                .map(|h| h.as_str().map(str::to_string).unwrap_or_else(|| h.to_string()))
                .collect()
        })
        .unwrap_or_default();
    let rows = entry
        .get("rowSet")
        .and_then(Value::as_array)
        .map(|rs| rs.iter().filter_map(|r| r.as_array().cloned()).collect())
        .unwrap_or_default();
    Some(ResultSet { name, headers, rows })
}
