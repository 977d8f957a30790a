//! Input record types consumed by the aggregation loader and builders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Role;

/// One observation of an agent's pick rate on a map.
///
/// Produced by the CSV cleaning layer. `pick_rate` is a fraction in
/// `[0, 1]`; the same (map, agent) pair may appear once per tournament
/// entry and is averaged later by the aggregation loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRateRecord {
    pub map: String,
    pub agent: String,
    pub pick_rate: f64,
}

/// One observation of an agent's map outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub map: String,
    pub agent: String,
    pub wins: u32,
    pub plays: u32,
}

/// A set of agents observed played together in one professional lineup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupRecord {
    pub team: String,
    pub agents: Vec<String>,
}

/// Mapping from lowercase agent name to its role.
pub type RoleTable = HashMap<String, Role>;
