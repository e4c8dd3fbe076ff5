//! Issue link graph: mapping backend data to the vis-network schema and
//! managing the single live renderer instance.

pub mod html;
pub mod renderer;

use serde::Serialize;

use crate::data::{GraphData, GraphEdge, GraphNode, LinkDirection};
use crate::format::{or_dash, StatusClass};

pub use html::HtmlGraphRenderer;
pub use renderer::{GraphHandle, GraphRenderer, GraphStatus, GraphView};

pub const HIGHLIGHT_BORDER: &str = "#667eea";
pub const INWARD_EDGE_COLOR: &str = "#e74c3c";
pub const OUTWARD_EDGE_COLOR: &str = "#3498db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Hexagon,
    Ellipse,
    Box,
}

impl NodeShape {
    /// Shape and border width for an issue type.
    pub fn for_type(issue_type: Option<&str>) -> (Self, u8) {
        let t = issue_type.unwrap_or("").to_lowercase();
        if t.contains("epic") || t == "эпик" {
            (Self::Hexagon, 3)
        } else if t.contains("story") || t.contains("история") {
            (Self::Ellipse, 2)
        } else {
            (Self::Box, 2)
        }
    }

    /// Glyph used by the terminal node list.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Hexagon => "⬢",
            Self::Ellipse => "●",
            Self::Box => "■",
        }
    }
}

/// Background and border colour for a status.
pub fn node_palette(status: Option<&str>) -> (&'static str, &'static str) {
    match StatusClass::classify(status) {
        StatusClass::Done => ("#55efc4", "#00b894"),
        StatusClass::InProgress => ("#74b9ff", "#0984e3"),
        StatusClass::Open => ("#ffeaa7", "#fdcb6e"),
        StatusClass::Closed => ("#dfe6e9", "#b2bec3"),
    }
}

pub fn edge_color(direction: LinkDirection) -> &'static str {
    match direction {
        LinkDirection::Inward => INWARD_EDGE_COLOR,
        LinkDirection::Outward => OUTWARD_EDGE_COLOR,
    }
}

/// Multi-line hover text for a node.
pub fn tooltip_text(node: &GraphNode) -> String {
    [
        node.issue_key.clone(),
        format!("Название: {}", or_dash(node.summary.as_deref())),
        format!("Статус: {}", or_dash(node.status.as_deref())),
        format!("Тип: {}", or_dash(node.issue_type.as_deref())),
        format!("Приоритет: {}", or_dash(node.priority.as_deref())),
        format!("Исполнитель: {}", or_dash(node.assignee.as_deref())),
    ]
    .join("\n")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPair {
    pub background: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeColor {
    pub background: &'static str,
    pub border: &'static str,
    pub highlight: ColorPair,
    pub hover: ColorPair,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisNode {
    pub id: String,
    pub label: String,
    pub title: String,
    pub color: NodeColor,
    pub font: Font,
    pub shape: NodeShape,
    pub margin: u8,
    pub border_width: u8,
    pub border_width_selected: u8,
}

impl VisNode {
    pub fn from_node(node: &GraphNode) -> Self {
        let (shape, border_width) = NodeShape::for_type(node.issue_type.as_deref());
        let (background, border) = node_palette(node.status.as_deref());
        let accent = ColorPair {
            background,
            border: HIGHLIGHT_BORDER,
        };
        Self {
            id: node.issue_key.clone(),
            label: node.issue_key.clone(),
            title: tooltip_text(node),
            color: NodeColor {
                background,
                border,
                highlight: accent.clone(),
                hover: accent,
            },
            font: Font {
                size: 12,
                color: Some("#333"),
                bold: Some(true),
            },
            shape,
            margin: 10,
            border_width,
            border_width_selected: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Smooth {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub roundness: f64,
}

impl Default for Smooth {
    fn default() -> Self {
        Self {
            kind: "curvedCW",
            roundness: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisEdge {
    pub id: usize,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub arrows: &'static str,
    pub color: &'static str,
    pub font: Font,
    pub smooth: Smooth,
}

impl VisEdge {
    pub fn from_edge(id: usize, edge: &GraphEdge) -> Self {
        Self {
            id,
            from: edge.source_issue_key.clone(),
            to: edge.target_issue_key.clone(),
            label: edge.direction_label.clone(),
            arrows: "to",
            color: edge_color(edge.direction),
            font: Font {
                size: 9,
                color: None,
                bold: None,
            },
            smooth: Smooth::default(),
        }
    }
}

/// Network options handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphOptions {
    pub nodes: NodeDefaults,
    pub edges: EdgeDefaults,
    pub physics: Physics,
    pub interaction: Interaction,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefaults {
    pub shape: NodeShape,
    pub margin: u8,
    pub width_constraint: WidthConstraint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidthConstraint {
    pub maximum: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeDefaults {
    pub smooth: Smooth,
    pub arrows: Arrows,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrows {
    pub to: ArrowHead,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowHead {
    pub enabled: bool,
    pub scale_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Physics {
    pub enabled: bool,
    pub stabilization: Stabilization,
    pub barnes_hut: BarnesHut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stabilization {
    pub iterations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarnesHut {
    pub gravitational_constant: f64,
    pub spring_constant: f64,
    pub spring_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub hover: bool,
    pub tooltip_delay: u32,
    pub hide_edges_on_drag: bool,
    pub hide_edges_on_zoom: bool,
    pub navigation_buttons: bool,
    pub keyboard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub improved_layout: bool,
}

impl GraphOptions {
    pub fn new(physics: bool) -> Self {
        Self {
            nodes: NodeDefaults {
                shape: NodeShape::Box,
                margin: 8,
                width_constraint: WidthConstraint { maximum: 120 },
            },
            edges: EdgeDefaults {
                smooth: Smooth::default(),
                arrows: Arrows {
                    to: ArrowHead {
                        enabled: true,
                        scale_factor: 0.4,
                    },
                },
            },
            physics: Physics {
                enabled: physics,
                stabilization: Stabilization { iterations: 200 },
                barnes_hut: BarnesHut {
                    gravitational_constant: -10000.0,
                    spring_constant: 0.04,
                    spring_length: 150.0,
                },
            },
            interaction: Interaction {
                hover: true,
                tooltip_delay: 200,
                hide_edges_on_drag: false,
                hide_edges_on_zoom: false,
                navigation_buttons: true,
                keyboard: true,
            },
            layout: Layout {
                improved_layout: true,
            },
        }
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Map backend graph data to renderer nodes and edges. Edge ids are their
/// positions in the backend list.
pub fn build_vis_graph(data: &GraphData) -> (Vec<VisNode>, Vec<VisEdge>) {
    let nodes = data.nodes.iter().map(VisNode::from_node).collect();
    let edges = data
        .edges
        .iter()
        .enumerate()
        .map(|(idx, e)| VisEdge::from_edge(idx, e))
        .collect();
    (nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(key: &str, issue_type: &str, status: &str) -> GraphNode {
        GraphNode {
            issue_key: key.into(),
            issue_type: Some(issue_type.into()),
            status: Some(status.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_shapes_by_type() {
        assert_eq!(NodeShape::for_type(Some("Epic")), (NodeShape::Hexagon, 3));
        assert_eq!(NodeShape::for_type(Some("Эпик")), (NodeShape::Hexagon, 3));
        assert_eq!(NodeShape::for_type(Some("История")), (NodeShape::Ellipse, 2));
        assert_eq!(NodeShape::for_type(Some("Задача")), (NodeShape::Box, 2));
        assert_eq!(NodeShape::for_type(None), (NodeShape::Box, 2));
    }

    #[test]
    fn test_vis_node_schema() {
        let vis = VisNode::from_node(&node("MAR-1", "Epic", "Готово"));
        let value = serde_json::to_value(&vis).unwrap();
        assert_eq!(value["id"], "MAR-1");
        assert_eq!(value["shape"], "hexagon");
        assert_eq!(value["borderWidth"], 3);
        assert_eq!(value["borderWidthSelected"], 4);
        assert_eq!(value["color"]["background"], "#55efc4");
        assert_eq!(value["color"]["border"], "#00b894");
        assert_eq!(value["color"]["hover"]["border"], "#667eea");
        assert_eq!(value["font"], json!({"size": 12, "color": "#333", "bold": true}));
    }

    #[test]
    fn test_edges_keep_backend_order_and_colors() {
        let data = GraphData {
            nodes: vec![],
            edges: vec![
                GraphEdge {
                    source_issue_key: "A".into(),
                    target_issue_key: "B".into(),
                    direction: LinkDirection::Inward,
                    direction_label: Some("is blocked by".into()),
                    link_type_name: None,
                },
                GraphEdge {
                    source_issue_key: "B".into(),
                    target_issue_key: "C".into(),
                    direction: LinkDirection::Outward,
                    direction_label: None,
                    link_type_name: None,
                },
            ],
        };
        let (_, edges) = build_vis_graph(&data);
        assert_eq!(edges[0].id, 0);
        assert_eq!(edges[0].color, "#e74c3c");
        assert_eq!(edges[1].color, "#3498db");
        let value = serde_json::to_value(&edges[0]).unwrap();
        assert_eq!(value["smooth"], json!({"type": "curvedCW", "roundness": 0.15}));
        assert_eq!(value["arrows"], "to");
    }

    #[test]
    fn test_tooltip_lines() {
        let text = tooltip_text(&node("MAR-2", "Задача", "Открыто"));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "MAR-2");
        assert_eq!(lines[1], "Название: -");
        assert_eq!(lines[2], "Статус: Открыто");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_options_schema() {
        let value = serde_json::to_value(GraphOptions::new(false)).unwrap();
        assert_eq!(value["physics"]["enabled"], false);
        assert_eq!(value["physics"]["barnesHut"]["gravitationalConstant"], -10000.0);
        assert_eq!(value["interaction"]["tooltipDelay"], 200);
        assert_eq!(value["nodes"]["widthConstraint"]["maximum"], 120);
    }
}
