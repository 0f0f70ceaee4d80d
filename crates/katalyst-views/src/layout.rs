//! Circular layout and hit-testing for the collaboration network.
//!
//! Node `i` of `n` sits at angle `2πi/n` on a circle of radius
//! `min(w, h) / 3` around the canvas centre. Layout is a pure function of
//! the node list and canvas size.

use std::f64::consts::TAU;

use katalyst_protocol::{CollaborationGraph, NetworkNode};

use crate::format::group_thousands;

pub const MIN_NODE_RADIUS: f64 = 8.0;
pub const MAX_NODE_RADIUS: f64 = 20.0;
pub const MIN_EDGE_OPACITY: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTone {
    Selected,
    High,
    Medium,
    Regular,
}

pub fn node_radius(score: i64) -> f64 {
    (score as f64 / 300.0).clamp(MIN_NODE_RADIUS, MAX_NODE_RADIUS)
}

pub fn node_tone(score: i64, selected: bool) -> NodeTone {
    if selected {
        NodeTone::Selected
    } else if score > 5000 {
        NodeTone::High
    } else if score > 2000 {
        NodeTone::Medium
    } else {
        NodeTone::Regular
    }
}

pub fn edge_width(strength: f64) -> f64 {
    (strength * 3.0).max(1.0)
}

pub fn edge_opacity(strength: f64) -> f64 {
    strength.clamp(MIN_EDGE_OPACITY, 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub score: i64,
}

impl PlacedNode {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.x, y - self.y);
        (dx * dx + dy * dy).sqrt() <= self.radius
    }
}

/// Edge between two placed nodes, by index into `GraphLayout::nodes`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEdge {
    pub from: usize,
    pub to: usize,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphLayout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<PlacedEdge>,
}

impl GraphLayout {
    pub fn circle(graph: &CollaborationGraph, width: f64, height: f64) -> Self {
        let n = graph.nodes.len();
        let (cx, cy) = (width / 2.0, height / 2.0);
        let ring = width.min(height) / 3.0;

        let nodes: Vec<PlacedNode> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let angle = TAU * i as f64 / n as f64;
                PlacedNode {
                    id: node.id,
                    x: cx + ring * angle.cos(),
                    y: cy + ring * angle.sin(),
                    radius: node_radius(node.score),
                    score: node.score,
                }
            })
            .collect();

        let index_of = |id: i64| nodes.iter().position(|n| n.id == id);
        let mut edges = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            match (index_of(edge.source), index_of(edge.target)) {
                (Some(from), Some(to)) => edges.push(PlacedEdge {
                    from,
                    to,
                    width: edge_width(edge.strength),
                    opacity: edge_opacity(edge.strength),
                }),
                _ => tracing::trace!(
                    source = edge.source,
                    target = edge.target,
                    "skipping edge with a missing endpoint"
                ),
            }
        }

        Self {
            width,
            height,
            nodes,
            edges,
        }
    }

    /// First node in layout order whose circle contains the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.contains(x, y))
    }
}

/// What the selected-node panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails {
    pub name: String,
    pub level: u32,
    pub score: String,
    pub collaborations: usize,
}

/// Network page state: the graph, its layout and the current selection.
#[derive(Debug, Clone, Default)]
pub struct NetworkView {
    graph: CollaborationGraph,
    layout: GraphLayout,
    selected: Option<i64>,
}

impl NetworkView {
    pub fn new(graph: CollaborationGraph, width: f64, height: f64) -> Self {
        let layout = GraphLayout::circle(&graph, width, height);
        Self {
            graph,
            layout,
            selected: None,
        }
    }

    /// Re-lay out for a new canvas size, keeping the selection.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.layout.width != width || self.layout.height != height {
            self.layout = GraphLayout::circle(&self.graph, width, height);
        }
    }

    pub fn graph(&self) -> &CollaborationGraph {
        &self.graph
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    /// Select the node under the point; a miss clears the selection.
    pub fn click(&mut self, x: f64, y: f64) -> Option<i64> {
        self.selected = self.layout.hit_test(x, y).map(|n| n.id);
        self.selected
    }

    /// Cycle forward through nodes in layout order.
    pub fn select_next(&mut self) {
        self.step(1);
    }

    pub fn select_prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: isize) {
        let n = self.layout.nodes.len() as isize;
        if n == 0 {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|id| self.layout.nodes.iter().position(|p| p.id == id));
        let next = match current {
            Some(i) => (i as isize + delta).rem_euclid(n),
            None if delta >= 0 => 0,
            None => n - 1,
        };
        self.selected = Some(self.layout.nodes[next as usize].id);
    }

    /// Select a node by id; unknown ids clear the selection.
    pub fn select(&mut self, id: i64) {
        self.selected = self.layout.nodes.iter().find(|n| n.id == id).map(|n| n.id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn tone_of(&self, node: &PlacedNode) -> NodeTone {
        node_tone(node.score, self.selected == Some(node.id))
    }

    pub fn node(&self, id: i64) -> Option<&NetworkNode> {
        self.graph.nodes.iter().find(|n| n.id == id)
    }

    pub fn selected_details(&self) -> Option<NodeDetails> {
        let node = self.node(self.selected?)?;
        Some(NodeDetails {
            name: node.name.clone(),
            level: node.level,
            score: group_thousands(node.score),
            collaborations: self.graph.collaborations_of(node.id),
        })
    }
}
