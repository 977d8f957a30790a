//! Serializable graph view for plotting layers.
//!
//! The core does no layout itself; it hands a flat node/edge listing to
//! whatever force-directed renderer the dashboard uses.

use serde::Serialize;

use crate::models::Role;

use super::{VertexKind, WeightedGraph};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexView {
    pub id: String,
    pub kind: VertexKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Flat listing of a graph's vertices and edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<VertexView>,
    pub edges: Vec<EdgeView>,
}

impl GraphView {
    /// Snapshot a graph into sorted node and edge listings. Each edge
    /// appears once, with `source < target`.
    pub fn from_graph(graph: &WeightedGraph) -> Self {
        let mut nodes: Vec<VertexView> = graph
            .vertices()
            .map(|v| VertexView {
                id: v.identity().to_string(),
                kind: v.kind(),
                role: v.role(),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<EdgeView> = Vec::new();
        for vertex in graph.vertices() {
            for (neighbour, weight) in vertex.neighbour_weights() {
                if vertex.identity() < neighbour {
                    edges.push(EdgeView {
                        source: vertex.identity().to_string(),
                        target: neighbour.to_string(),
                        weight,
                    });
                }
            }
        }
        edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));

        Self { nodes, edges }
    }
}
