//! Collaboration network payload (`/api/collaboration/network/`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaborationGraph {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

impl CollaborationGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges touching `node_id`.
    pub fn collaborations_of(&self, node_id: i64) -> usize {
        self.edges
            .iter()
            .filter(|e| e.source == node_id || e.target == node_id)
            .count()
    }
}

/// A contributor in the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkNode {
    pub id: i64,
    pub name: String,
    pub avatar: String,
    pub score: i64,
    pub level: u32,
}

/// A collaboration between two contributors. `strength` is roughly 0..=1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkEdge {
    pub source: i64,
    pub target: i64,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub strength: f64,
    pub interactions: u64,
}
