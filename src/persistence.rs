//! Saved node positions and edge anchors, carried across re-parses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::graph::{Graph, Position};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SavedLayout {
    #[serde(default)]
    pub nodes: Vec<SavedNode>,
    #[serde(default)]
    pub edges: Vec<SavedEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedNode {
    pub id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEdge {
    pub id: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

/// Anchors previously chosen for one edge. Input to the transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedHandles {
    pub source_handle: String,
    pub target_handle: String,
}

impl SavedLayout {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Like `from_json`, but an unreadable layout counts as no layout.
    pub fn load_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("ignoring saved layout: {e}");
            SavedLayout::default()
        })
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn capture(graph: &Graph) -> Self {
        SavedLayout {
            nodes: graph
                .nodes
                .iter()
                .map(|n| SavedNode {
                    id: n.id.clone(),
                    position: n.position,
                })
                .collect(),
            edges: graph
                .edges
                .iter()
                .map(|e| SavedEdge {
                    id: e.id.clone(),
                    source_handle: Some(e.source_handle.clone()),
                    target_handle: Some(e.target_handle.clone()),
                })
                .collect(),
        }
    }

    /// Edge anchors keyed by edge id; entries missing either handle are left out.
    pub fn saved_handles(&self) -> HashMap<String, SavedHandles> {
        self.edges
            .iter()
            .filter_map(|e| match (&e.source_handle, &e.target_handle) {
                (Some(source), Some(target)) => Some((
                    e.id.clone(),
                    SavedHandles {
                        source_handle: source.clone(),
                        target_handle: target.clone(),
                    },
                )),
                _ => None,
            })
            .collect()
    }

    /// Overrides node positions and edge anchors of `graph` with the saved
    /// ones. Ids that no longer exist are ignored.
    pub fn apply(&self, graph: &mut Graph) {
        let positions: HashMap<&str, Position> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.position))
            .collect();
        for node in &mut graph.nodes {
            if let Some(position) = positions.get(node.id.as_str()) {
                node.position = *position;
            }
        }

        let edges: HashMap<&str, &SavedEdge> =
            self.edges.iter().map(|e| (e.id.as_str(), e)).collect();
        for edge in &mut graph.edges {
            let Some(saved) = edges.get(edge.id.as_str()) else {
                continue;
            };
            if let Some(handle) = &saved.source_handle {
                edge.source_handle.clone_from(handle);
            }
            if let Some(handle) = &saved.target_handle {
                edge.target_handle.clone_from(handle);
            }
        }
    }
}
