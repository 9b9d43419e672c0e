//! Hover highlight state machine.
//!
//! The interaction layer turns pointer events into the transition calls below; the renderer
//! reads [`HighlightState::highlighted`] on every pass. Nothing here touches the graph.

use estuary_core::{FlowGraph, LinkId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "camelCase")]
pub enum Highlight {
    #[default]
    Idle,
    NodeActive(NodeId),
    LinkActive(LinkId),
}

/// Nodes and links related to the active element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighlightSet {
    pub nodes: BTreeSet<NodeId>,
    pub links: BTreeSet<LinkId>,
}

impl HighlightSet {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn contains_link(&self, id: LinkId) -> bool {
        self.links.contains(&id)
    }

    fn derive(graph: &FlowGraph, state: Highlight) -> Self {
        let mut out = Self::default();
        match state {
            Highlight::Idle => {}
            Highlight::NodeActive(id) => {
                if let Some(node) = graph.node(id) {
                    out.nodes.insert(id);
                    out.links.extend(node.incoming_links.iter().copied());
                    out.links.extend(node.outgoing_links.iter().copied());
                }
            }
            Highlight::LinkActive(id) => {
                if let Some(link) = graph.link(id) {
                    out.links.insert(id);
                    out.nodes.insert(link.source);
                    out.nodes.insert(link.target);
                }
            }
        }
        out
    }
}

/// One per diagram; owned by whoever drives its interaction.
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    state: Highlight,
    highlighted: HighlightSet,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Highlight {
        self.state
    }

    pub fn highlighted(&self) -> &HighlightSet {
        &self.highlighted
    }

    pub fn node_hover(&mut self, graph: &FlowGraph, node: NodeId) -> bool {
        let next = if graph.node(node).is_some() {
            Highlight::NodeActive(node)
        } else {
            tracing::debug!(node = node.0, "hover over unknown node");
            Highlight::Idle
        };
        self.transition(graph, next)
    }

    pub fn link_hover(&mut self, graph: &FlowGraph, link: LinkId) -> bool {
        let next = if graph.link(link).is_some() {
            Highlight::LinkActive(link)
        } else {
            tracing::debug!(link = link.0, "hover over unknown link");
            Highlight::Idle
        };
        self.transition(graph, next)
    }

    pub fn node_leave(&mut self) -> bool {
        self.clear()
    }

    pub fn link_leave(&mut self) -> bool {
        self.clear()
    }

    /// Back to idle. Returns whether the highlighted set changed.
    pub fn clear(&mut self) -> bool {
        self.state = Highlight::Idle;
        let changed = !self.highlighted.is_empty();
        self.highlighted = HighlightSet::default();
        changed
    }

    fn transition(&mut self, graph: &FlowGraph, next: Highlight) -> bool {
        self.state = next;
        let derived = HighlightSet::derive(graph, next);
        let changed = derived != self.highlighted;
        self.highlighted = derived;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estuary_core::{FlowRecord, FlowRecordAdapter, build_flow_graph};

    fn graph() -> FlowGraph {
        build_flow_graph(
            &[
                FlowRecord::new("A", "X", 10.0),
                FlowRecord::new("A", "Y", 5.0),
                FlowRecord::new("B", "X", 3.0),
            ],
            &FlowRecordAdapter,
            &[vec!["A", "B"], vec!["X", "Y"]],
        )
        .unwrap()
    }

    #[test]
    fn node_hover_highlights_every_incident_link() {
        let g = graph();
        let x = g.node_id(1, "X").unwrap();
        let mut state = HighlightState::new();
        assert!(state.node_hover(&g, x));
        assert_eq!(state.state(), Highlight::NodeActive(x));
        let set = state.highlighted();
        assert_eq!(set.nodes, BTreeSet::from([x]));
        assert_eq!(set.links, BTreeSet::from([LinkId(0), LinkId(2)]));
    }

    #[test]
    fn link_hover_highlights_both_endpoints() {
        let g = graph();
        let mut state = HighlightState::new();
        assert!(state.link_hover(&g, LinkId(1)));
        let a = g.node_id(0, "A").unwrap();
        let y = g.node_id(1, "Y").unwrap();
        assert_eq!(state.highlighted().nodes, BTreeSet::from([a, y]));
        assert_eq!(state.highlighted().links, BTreeSet::from([LinkId(1)]));
    }

    #[test]
    fn leaving_returns_to_idle_and_reports_changes() {
        let g = graph();
        let a = g.node_id(0, "A").unwrap();
        let mut state = HighlightState::new();
        assert!(!state.node_leave());
        assert!(state.node_hover(&g, a));
        assert!(!state.node_hover(&g, a), "same node twice is not a change");
        assert!(state.link_leave());
        assert_eq!(state.state(), Highlight::Idle);
        assert!(state.highlighted().is_empty());
    }

    #[test]
    fn zero_value_nodes_highlight_only_themselves() {
        let g = build_flow_graph(
            &[FlowRecord::new("A", "X", 1.0)],
            &FlowRecordAdapter,
            &[vec!["A", "B"], vec!["X"]],
        )
        .unwrap();
        let b = g.node_id(0, "B").unwrap();
        let mut state = HighlightState::new();
        assert!(state.node_hover(&g, b));
        assert!(state.highlighted().links.is_empty());
        assert!(state.highlighted().contains_node(b));
    }

    #[test]
    fn unknown_ids_fall_back_to_idle() {
        let g = graph();
        let mut state = HighlightState::new();
        state.link_hover(&g, LinkId(0));
        assert!(state.node_hover(&g, NodeId(99)));
        assert_eq!(state.state(), Highlight::Idle);
    }
}
