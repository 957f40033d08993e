use serde::{Deserialize, Serialize, Serializer};

use crate::ast::{ContentNode, SceneVariant};
use crate::error::Diagnostic;

/// Structural tag of a diagram node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Scene,
    Global,
    Start,
    End,
    Break,
    Fork,
    Process,
    External,
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    pub width: f64,
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub raw_content: Vec<ContentNode>,
    pub is_global: bool,
    pub is_main: bool,
    pub variant: SceneVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl NodeData {
    pub fn labelled(label: impl Into<String>) -> Self {
        NodeData {
            label: label.into(),
            raw_content: Vec::new(),
            is_global: false,
            is_main: false,
            variant: SceneVariant::Normal,
            action: None,
        }
    }
}

/// Visual classification of an edge, after endpoint-based reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    Normal,
    Repair,
    Mediated,
    Simultaneous,
}

impl EdgeKind {
    pub fn dash_pattern(self) -> Option<&'static str> {
        match self {
            EdgeKind::Repair => Some("5, 5"),
            _ => None,
        }
    }

    pub fn marker(self) -> Option<Marker> {
        match self {
            EdgeKind::Normal | EdgeKind::Repair => Some(Marker::ArrowClosed),
            EdgeKind::Mediated => Some(Marker::DoubleArrowhead),
            EdgeKind::Simultaneous => None,
        }
    }

    /// Renderer component for the edge.
    pub fn edge_type(self) -> &'static str {
        match self {
            EdgeKind::Simultaneous => "simultaneous",
            _ => "molic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Marker {
    ArrowClosed,
    DoubleArrowhead,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_pattern: Option<&'static str>,
}

pub const STROKE_WIDTH: f64 = 1.5;
pub const PREFERRED_STROKE_WIDTH: f64 = 3.0;

impl EdgeStyle {
    pub fn new(kind: EdgeKind, preferred: bool) -> Self {
        EdgeStyle {
            stroke_width: if preferred {
                PREFERRED_STROKE_WIDTH
            } else {
                STROKE_WIDTH
            },
            dash_pattern: kind.dash_pattern(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineRole {
    When,
    Condition,
    Main,
    Let,
    Effect,
    Why,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelLine {
    pub role: LineRole,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeLabel {
    pub lines: Vec<LabelLine>,
}

impl EdgeLabel {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    pub label: Option<EdgeLabel>,
    #[serde(rename = "type")]
    pub edge_type: &'static str,
    #[serde(rename = "className")]
    pub kind: EdgeKind,
    pub style: EdgeStyle,
    pub marker_end: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(serialize_with = "diagnostic_messages")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }
}

fn diagnostic_messages<S: Serializer>(diags: &[Diagnostic], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(diags.iter().map(ToString::to_string))
}
