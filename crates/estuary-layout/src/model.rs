//! Positioned output: what a renderer needs to draw nodes, links and labels.

use crate::config::Orientation;
use crate::highlight::HighlightSet;
use crate::solver::Scales;
use estuary_core::{LinkId, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Maps a logical `(column axis, value axis)` coordinate onto the screen.
pub fn to_screen(orientation: Orientation, along_columns: f64, along_values: f64) -> Point {
    match orientation {
        Orientation::Horizontal => Point {
            x: along_columns,
            y: along_values,
        },
        Orientation::Vertical => Point {
            x: along_values,
            y: along_columns,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelSide {
    /// Towards the middle of the diagram.
    Inside,
    /// Towards the nearest edge of the diagram.
    Outside,
}

/// Text anchor along the column axis: `Start` extends away from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAnchor {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLabel {
    pub side: LabelSide,
    pub anchor: TextAnchor,
    /// Logical column-axis position of the anchor.
    pub x: f64,
    /// Logical value-axis position (the node's midpoint).
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    pub name: String,
    pub column: usize,
    pub row: usize,
    pub value: f64,
    /// Column-axis extent of the bar.
    pub x0: f64,
    pub x1: f64,
    /// Value-axis extent of the bar.
    pub y0: f64,
    pub y1: f64,
    pub label: NodeLabel,
}

impl PositionedNode {
    pub fn rect(&self, orientation: Orientation) -> Rect {
        let origin = to_screen(orientation, self.x0, self.y0);
        let far = to_screen(orientation, self.x1, self.y1);
        Rect {
            x: origin.x,
            y: origin.y,
            width: far.x - origin.x,
            height: far.y - origin.y,
        }
    }
}

/// Centre-line of a link as one cubic Bezier segment, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkPath {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    /// Stroke width.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedLink {
    pub id: LinkId,
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
    /// Thickness on the shared value scale.
    pub width: f64,
    pub sy0: f64,
    pub sy1: f64,
    pub ty0: f64,
    pub ty1: f64,
    pub path: LinkPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedGraph {
    pub orientation: Orientation,
    pub scales: Scales,
    /// Indexed by [`NodeId`].
    pub nodes: Vec<PositionedNode>,
    /// Indexed by [`LinkId`].
    pub links: Vec<PositionedLink>,
    /// Links in paint order (last painted on top).
    pub link_order: Vec<LinkId>,
}

impl PositionedGraph {
    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.get(id.0)
    }

    pub fn link(&self, id: LinkId) -> Option<&PositionedLink> {
        self.links.get(id.0)
    }

    /// `link_order` with highlighted links moved to the end, so they paint on top.
    pub fn paint_order(&self, highlight: &HighlightSet) -> Vec<LinkId> {
        let (mut rest, lit): (Vec<LinkId>, Vec<LinkId>) = self
            .link_order
            .iter()
            .copied()
            .partition(|id| !highlight.contains_link(*id));
        rest.extend(lit);
        rest
    }

    /// Nodes of one column, top to bottom.
    pub fn column_nodes(&self, column: usize) -> Vec<&PositionedNode> {
        let mut nodes: Vec<&PositionedNode> =
            self.nodes.iter().filter(|n| n.column == column).collect();
        nodes.sort_by_key(|n| n.row);
        nodes
    }
}
