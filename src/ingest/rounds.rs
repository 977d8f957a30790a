//! Parsing of the per-year map-scores and economy-rounds exports into
//! tree input rows.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::tree::{RoundRow, TreeLabel};

use super::IngestError;

/// One year's worth of tree input rows, labeled with the tournament
/// year extracted from the export.
#[derive(Debug, Clone, PartialEq)]
pub struct YearRows {
    pub year: String,
    pub rows: Vec<RoundRow>,
}

#[derive(Debug, Deserialize)]
struct RawMapScoreRow {
    #[serde(rename = "Tournament")]
    tournament: String,
    #[serde(rename = "Match Name")]
    match_name: String,
    #[serde(rename = "Map")]
    map: String,
    #[serde(rename = "Team A")]
    team_a: String,
    #[serde(rename = "Team A Attacker Score")]
    team_a_attack: Option<u32>,
    #[serde(rename = "Team A Defender Score")]
    team_a_defend: Option<u32>,
    #[serde(rename = "Team B")]
    team_b: String,
    #[serde(rename = "Team B Attacker Score")]
    team_b_attack: Option<u32>,
    #[serde(rename = "Team B Defender Score")]
    team_b_defend: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawEcoRoundRow {
    #[serde(rename = "Tournament")]
    tournament: String,
    #[serde(rename = "Match Name")]
    match_name: String,
    #[serde(rename = "Map")]
    map: String,
    #[serde(rename = "Round Number")]
    round_number: u32,
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Buy Type")]
    buy_type: String,
    #[serde(rename = "Outcome")]
    outcome: String,
}

/// Pull the four-digit year out of a tournament name like
/// `"Valorant Champions Tour 2023: Lock-In"`.
fn extract_year(tournament: &str) -> Option<String> {
    tournament
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_digit()))
        .find(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .map(String::from)
}

/// Parse one map-scores export.
///
/// Each row carries both teams' attack/defend round wins on one map,
/// yielding two tree rows. Rows missing a side score (forfeits, partial
/// exports) are skipped.
pub fn load_map_scores(path: &Path) -> Result<YearRows, IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;
    let mut year: Option<String> = None;
    let mut rows = Vec::new();

    for row in reader.deserialize::<RawMapScoreRow>() {
        let row = row.map_err(|e| IngestError::csv(path, e))?;
        if year.is_none() {
            year = extract_year(&row.tournament);
        }

        let sides = [
            (&row.team_a, row.team_a_attack, row.team_a_defend),
            (&row.team_b, row.team_b_attack, row.team_b_defend),
        ];
        for (team, attack, defend) in sides {
            let (Some(attack), Some(defend)) = (attack, defend) else {
                warn!(map = %row.map, %team, "skipping map score row without side scores");
                continue;
            };
            rows.push(RoundRow {
                match_name: row.match_name.clone(),
                map_name: row.map.clone(),
                group: team.clone(),
                leaf: TreeLabel::SideScore { attack, defend },
            });
        }
    }

    let year = year.ok_or_else(|| {
        IngestError::malformed(path, "no tournament year found in any row".to_string())
    })?;
    info!(%year, rows = rows.len(), "loaded map scores");
    Ok(YearRows { year, rows })
}

/// Parse one economy-rounds export.
///
/// Every round appears twice, once per team; only the winning team's
/// row is kept, keyed by round number so repeated rounds of the same
/// match stay distinct branches.
pub fn load_eco_rounds(path: &Path) -> Result<YearRows, IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;
    let mut year: Option<String> = None;
    let mut rows = Vec::new();

    for row in reader.deserialize::<RawEcoRoundRow>() {
        let row = row.map_err(|e| IngestError::csv(path, e))?;
        if year.is_none() {
            year = extract_year(&row.tournament);
        }
        if !row.outcome.eq_ignore_ascii_case("win") {
            continue;
        }
        rows.push(RoundRow {
            match_name: row.match_name.clone(),
            map_name: row.map.clone(),
            group: row.round_number.to_string(),
            leaf: TreeLabel::RoundOutcome {
                winner: row.team.clone(),
                buy: row.buy_type.clone(),
            },
        });
    }

    let year = year.ok_or_else(|| {
        IngestError::malformed(path, "no tournament year found in any row".to_string())
    })?;
    info!(%year, rows = rows.len(), "loaded economy rounds");
    Ok(YearRows { year, rows })
}

/// Load every per-year export matching `prefix` under `dir`.
pub fn load_year_files<F>(
    dir: &Path,
    prefix: &str,
    loader: F,
) -> Result<Vec<YearRows>, IngestError>
where
    F: Fn(&Path) -> Result<YearRows, IngestError>,
{
    let paths: Vec<PathBuf> = super::discover_files(dir, prefix)?;
    paths.iter().map(|path| loader(path)).collect()
}
