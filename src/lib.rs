//! # tacmeta
//!
//! Tactical meta analysis for professional Valorant tournament data.
//!
//! ## Architecture
//!
//! - **models**: Core record types, roles, and the dataset snapshot
//! - **ingest**: CSV cleaning of the raw stat exports
//! - **aggregate**: Per-(map, agent) statistic accumulators
//! - **graph**: Weighted relation graph over maps and agents
//! - **recommend**: Agent ranking queries over the graph
//! - **tree**: Match statistic trees and side/buy verdicts
//! - **dataset**: End-to-end assembly from a data directory
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod api;
pub mod config;
pub mod dataset;
pub mod graph;
pub mod ingest;
pub mod models;
pub mod recommend;
pub mod tree;

pub use models::*;
