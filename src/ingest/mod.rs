//! CSV cleaning for raw tournament stat exports.
//!
//! The raw files cover every tournament stage and map; cleaning keeps
//! only rows for maps in the competitive pool, lowercases the join
//! keys, and reduces each file to the thin record types the aggregation
//! loader consumes. Cleaned copies can be written back out as flat
//! derived CSVs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{join_key, LineupRecord, OutcomeRecord, PickRateRecord, Role, RoleTable};

pub mod rounds;

pub use rounds::{load_eco_rounds, load_map_scores, YearRows};

/// Default competitive map pool used when the config does not override
/// it.
pub fn default_map_pool() -> HashSet<String> {
    [
        "ascent", "bind", "breeze", "fracture", "haven", "icebox", "lotus", "pearl", "split",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Ingestion errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed record in {path}: {detail}")]
    MalformedRecord { path: PathBuf, detail: String },
}

impl IngestError {
    fn csv(path: &Path, source: csv::Error) -> Self {
        IngestError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        IngestError::MalformedRecord {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPickRateRow {
    #[serde(rename = "Map")]
    map: String,
    #[serde(rename = "Agent")]
    agent: String,
    #[serde(rename = "Pick Rate")]
    pick_rate: String,
}

#[derive(Debug, Deserialize)]
struct RawTeamAgentRow {
    #[serde(rename = "Map")]
    map: String,
    #[serde(rename = "Agent Picked")]
    agent: String,
    #[serde(rename = "Total Wins By Map")]
    wins: u32,
    #[serde(rename = "Total Maps Played")]
    plays: u32,
}

#[derive(Debug, Deserialize)]
struct RawRoleRow {
    #[serde(rename = "Agent")]
    agent: String,
    #[serde(rename = "Role")]
    role: String,
}

#[derive(Debug, Deserialize)]
struct RawLineupRow {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Agents")]
    agents: String,
}

/// Parse a pick-rate cell: either `"12%"` or a bare fraction.
fn parse_pick_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let value = if let Some(percent) = raw.strip_suffix('%') {
        percent.trim().parse::<f64>().ok()? / 100.0
    } else {
        raw.parse::<f64>().ok()?
    };
    (0.0..=1.0).contains(&value).then_some(value)
}

/// Load and clean pick-rate exports. Rows outside the map pool are
/// dropped; the same (map, agent) pair may appear once per tournament
/// file and is kept as separate records for later averaging.
pub fn load_pick_rates(
    paths: &[PathBuf],
    pool: &HashSet<String>,
) -> Result<Vec<PickRateRecord>, IngestError> {
    let mut records = Vec::new();
    for path in paths {
        let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;
        for row in reader.deserialize::<RawPickRateRow>() {
            let row = row.map_err(|e| IngestError::csv(path, e))?;
            let map = join_key(&row.map);
            if !pool.contains(&map) {
                continue;
            }
            let pick_rate = parse_pick_rate(&row.pick_rate).ok_or_else(|| {
                IngestError::malformed(path, format!("bad pick rate: {:?}", row.pick_rate))
            })?;
            records.push(PickRateRecord {
                map,
                agent: join_key(&row.agent),
                pick_rate,
            });
        }
    }
    info!(files = paths.len(), records = records.len(), "loaded pick rates");
    Ok(records)
}

/// Load and clean the teams-picked-agents exports into outcome records.
pub fn load_outcomes(
    paths: &[PathBuf],
    pool: &HashSet<String>,
) -> Result<Vec<OutcomeRecord>, IngestError> {
    let mut records = Vec::new();
    for path in paths {
        let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;
        for row in reader.deserialize::<RawTeamAgentRow>() {
            let row = row.map_err(|e| IngestError::csv(path, e))?;
            let map = join_key(&row.map);
            if !pool.contains(&map) {
                continue;
            }
            records.push(OutcomeRecord {
                map,
                agent: join_key(&row.agent),
                wins: row.wins,
                plays: row.plays,
            });
        }
    }
    info!(files = paths.len(), records = records.len(), "loaded outcomes");
    Ok(records)
}

/// Load the agent role table.
pub fn load_roles(path: &Path) -> Result<RoleTable, IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;
    let mut table = RoleTable::new();
    for row in reader.deserialize::<RawRoleRow>() {
        let row = row.map_err(|e| IngestError::csv(path, e))?;
        let role: Role = row
            .role
            .parse()
            .map_err(|e| IngestError::malformed(path, format!("{e}")))?;
        table.insert(join_key(&row.agent), role);
    }
    debug!(agents = table.len(), "loaded role table");
    Ok(table)
}

/// Load lineup records. The `Agents` column holds `|`-separated names.
pub fn load_lineups(path: &Path) -> Result<Vec<LineupRecord>, IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;
    let mut lineups = Vec::new();
    for row in reader.deserialize::<RawLineupRow>() {
        let row = row.map_err(|e| IngestError::csv(path, e))?;
        let agents: Vec<String> = row
            .agents
            .split('|')
            .map(join_key)
            .filter(|a| !a.is_empty())
            .collect();
        if agents.is_empty() {
            return Err(IngestError::malformed(
                path,
                format!("lineup for {:?} lists no agents", row.team),
            ));
        }
        lineups.push(LineupRecord {
            team: join_key(&row.team),
            agents,
        });
    }
    debug!(lineups = lineups.len(), "loaded lineups");
    Ok(lineups)
}

#[derive(Debug, Serialize)]
struct CleanPickRateRow<'a> {
    #[serde(rename = "Map")]
    map: &'a str,
    #[serde(rename = "Agent")]
    agent: &'a str,
    #[serde(rename = "Pick Rate")]
    pick_rate: f64,
}

#[derive(Debug, Serialize)]
struct CleanOutcomeRow<'a> {
    #[serde(rename = "Map")]
    map: &'a str,
    #[serde(rename = "Agent")]
    agent: &'a str,
    #[serde(rename = "Total Wins By Map")]
    wins: u32,
    #[serde(rename = "Total Maps Played")]
    plays: u32,
}

/// Write cleaned pick-rate records as a flat derived CSV.
pub fn write_pick_rates(records: &[PickRateRecord], path: &Path) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| IngestError::csv(path, e))?;
    for record in records {
        writer
            .serialize(CleanPickRateRow {
                map: &record.map,
                agent: &record.agent,
                pick_rate: record.pick_rate,
            })
            .map_err(|e| IngestError::csv(path, e))?;
    }
    writer.flush().map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(records = records.len(), ?path, "wrote cleaned pick rates");
    Ok(())
}

/// Write cleaned outcome records as a flat derived CSV.
pub fn write_outcomes(records: &[OutcomeRecord], path: &Path) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| IngestError::csv(path, e))?;
    for record in records {
        writer
            .serialize(CleanOutcomeRow {
                map: &record.map,
                agent: &record.agent,
                wins: record.wins,
                plays: record.plays,
            })
            .map_err(|e| IngestError::csv(path, e))?;
    }
    writer.flush().map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(records = records.len(), ?path, "wrote cleaned outcomes");
    Ok(())
}

/// Find data files under `dir` whose names start with `prefix`, sorted
/// by name (which sorts year-suffixed exports chronologically).
pub fn discover_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, IngestError> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "csv")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    paths.sort();
    Ok(paths)
}
