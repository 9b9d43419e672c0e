//! Applies solved scales to a flow graph: node rows, link spans, labels and paths.
//!
//! Pure: equal inputs produce bit-identical output. Link order is recomputed from scratch on
//! every call.

use crate::config::{LabelConfig, Orientation};
use crate::label::place_label;
use crate::model::{PositionedGraph, PositionedLink, PositionedNode};
use crate::order::{LinkComparator, LinkView, sort_links};
use crate::path::link_path;
use crate::solver::Scales;
use crate::{Error, Result};
use estuary_core::{FlowGraph, LinkId};

pub fn assemble<C>(
    graph: &FlowGraph,
    scales: &Scales,
    comparator: &C,
    orientation: Orientation,
    labels: &LabelConfig,
) -> Result<PositionedGraph>
where
    C: LinkComparator + ?Sized,
{
    if scales.column_positions.len() != graph.columns.len()
        || scales.column_paddings.len() != graph.columns.len()
    {
        return Err(Error::ScalesMismatch {
            graph_columns: graph.columns.len(),
            scale_columns: scales.column_positions.len(),
        });
    }
    check_ids(graph)?;

    // Node rows follow id-list order; link stacking never moves a node.
    let mut y0 = vec![0.0_f64; graph.nodes.len()];
    let mut y1 = vec![0.0_f64; graph.nodes.len()];
    for (c, column) in graph.columns.iter().enumerate() {
        let mut cursor = if column.len() == 1 {
            let only = column.nodes[0];
            ((scales.extent - scales.thickness(graph.nodes[only.0].value)) / 2.0).max(0.0)
        } else {
            0.0
        };
        for id in &column.nodes {
            y0[id.0] = cursor;
            y1[id.0] = cursor + scales.thickness(graph.nodes[id.0].value);
            cursor = y1[id.0] + scales.column_paddings[c];
        }
    }

    let views: Vec<LinkView<'_>> = graph
        .links
        .iter()
        .enumerate()
        .map(|(i, link)| LinkView {
            id: LinkId(i),
            link,
            source_y0: y0[link.source.0],
            target_y0: y0[link.target.0],
        })
        .collect();
    let widths: Vec<f64> = graph
        .links
        .iter()
        .map(|l| scales.thickness(l.value))
        .collect();

    let mut source_spans = vec![(0.0_f64, 0.0_f64); graph.links.len()];
    let mut target_spans = vec![(0.0_f64, 0.0_f64); graph.links.len()];
    for column in &graph.columns {
        for id in &column.nodes {
            let node = &graph.nodes[id.0];

            let mut outgoing = node.outgoing_links.clone();
            sort_links(&mut outgoing, &views, comparator);
            let mut cursor = y0[id.0];
            for l in outgoing {
                source_spans[l.0] = (cursor, cursor + widths[l.0]);
                cursor += widths[l.0];
            }

            let mut incoming = node.incoming_links.clone();
            sort_links(&mut incoming, &views, comparator);
            let mut cursor = y0[id.0];
            for l in incoming {
                target_spans[l.0] = (cursor, cursor + widths[l.0]);
                cursor += widths[l.0];
            }
        }
    }

    let nodes: Vec<PositionedNode> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let x0 = scales.column_positions[n.column];
            PositionedNode {
                id: n.id.clone(),
                name: n.name.clone(),
                column: n.column,
                row: n.row,
                value: n.value,
                x0,
                x1: x0 + scales.node_thickness,
                y0: y0[i],
                y1: y1[i],
                label: place_label(scales, n.column, &n.name, n.value, y0[i], y1[i], labels),
            }
        })
        .collect();

    let links: Vec<PositionedLink> = graph
        .links
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let (sy0, sy1) = source_spans[i];
            let (ty0, ty1) = target_spans[i];
            PositionedLink {
                id: LinkId(i),
                source: l.source,
                target: l.target,
                value: l.value,
                width: widths[i],
                sy0,
                sy1,
                ty0,
                ty1,
                path: link_path(
                    orientation,
                    nodes[l.source.0].x1,
                    nodes[l.target.0].x0,
                    (sy0 + sy1) / 2.0,
                    (ty0 + ty1) / 2.0,
                    widths[i],
                ),
            }
        })
        .collect();

    let mut link_order: Vec<LinkId> = (0..graph.links.len()).map(LinkId).collect();
    sort_links(&mut link_order, &views, comparator);

    Ok(PositionedGraph {
        orientation,
        scales: scales.clone(),
        nodes,
        links,
        link_order,
    })
}

/// Every id a graph hands out must resolve. Graphs from `GraphBuilder` always pass; this guards
/// deserialized or hand-edited ones.
fn check_ids(graph: &FlowGraph) -> Result<()> {
    let malformed = |message: String| -> Result<()> { Err(Error::MalformedGraph { message }) };
    let node_count = graph.nodes.len();
    let link_count = graph.links.len();

    for (c, column) in graph.columns.iter().enumerate() {
        for id in &column.nodes {
            match graph.nodes.get(id.0) {
                None => return malformed(format!("column {c} lists missing node {}", id.0)),
                Some(node) if node.column != c => {
                    return malformed(format!("node {} listed in column {c}", node.id));
                }
                Some(_) => {}
            }
        }
    }
    for node in &graph.nodes {
        if node.column >= graph.columns.len() {
            return malformed(format!("node {} has column {}", node.id, node.column));
        }
        if let Some(l) = node
            .incoming_links
            .iter()
            .chain(&node.outgoing_links)
            .find(|l| l.0 >= link_count)
        {
            return malformed(format!("node {} references missing link {}", node.id, l.0));
        }
    }
    for (i, link) in graph.links.iter().enumerate() {
        if link.source.0 >= node_count || link.target.0 >= node_count {
            return malformed(format!("link {i} references a missing node"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::order::LinkOrder;
    use crate::solver::solve;
    use estuary_core::{FlowRecord, FlowRecordAdapter, build_flow_graph};

    fn positioned(records: &[FlowRecord], left: &[&str], right: &[&str]) -> PositionedGraph {
        let g = build_flow_graph(records, &FlowRecordAdapter, &[left.to_vec(), right.to_vec()])
            .unwrap();
        let s = solve(
            &g.column_lengths(),
            &g.column_totals(),
            100.0,
            300.0,
            &SolverConfig::default(),
        )
        .unwrap();
        assemble(
            &g,
            &s,
            &LinkOrder::Value,
            Orientation::Horizontal,
            &LabelConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn outgoing_links_stack_from_the_node_top_in_comparator_order() {
        let out = positioned(
            &[
                FlowRecord::new("A", "X", 8.0),
                FlowRecord::new("A", "Y", 2.0),
            ],
            &["A"],
            &["X", "Y"],
        );
        let a = &out.nodes[0];
        let (ax, ay) = (&out.links[0], &out.links[1]);
        // Ascending by value: A->Y sits on top of A->X.
        assert_eq!(ay.sy0, a.y0);
        assert_eq!(ax.sy0, ay.sy1);
        assert!((ax.sy1 - a.y1).abs() < 1e-9);
        assert_eq!(out.link_order, vec![LinkId(1), LinkId(0)]);
    }

    #[test]
    fn single_node_columns_are_centred() {
        let out = positioned(&[FlowRecord::new("A", "X", 1.0)], &["A", "B"], &["X"]);
        let x = &out.nodes[2];
        let a = &out.nodes[0];
        let b = &out.nodes[1];
        assert!(((x.y0 + x.y1) / 2.0 - 50.0).abs() < 1e-9);
        assert_eq!(b.y0, b.y1);
        assert!(a.y1 <= b.y0);
    }

    #[test]
    fn mismatched_scales_are_rejected() {
        let g = build_flow_graph(
            &[FlowRecord::new("A", "X", 1.0)],
            &FlowRecordAdapter,
            &[vec!["A"], vec!["X"]],
        )
        .unwrap();
        let s = solve(&[1, 1, 1], &[1.0, 1.0, 1.0], 100.0, 100.0, &SolverConfig::default())
            .unwrap();
        let err = assemble(
            &g,
            &s,
            &LinkOrder::Value,
            Orientation::Horizontal,
            &LabelConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ScalesMismatch {
                graph_columns: 2,
                scale_columns: 3
            }
        ));
    }

    #[test]
    fn dangling_ids_are_rejected_before_indexing() {
        let g = build_flow_graph(
            &[FlowRecord::new("A", "X", 1.0)],
            &FlowRecordAdapter,
            &[vec!["A"], vec!["X"]],
        )
        .unwrap();
        let s = solve(&[1, 1], &[1.0, 1.0], 100.0, 100.0, &SolverConfig::default()).unwrap();
        let run = |g: &FlowGraph| {
            assemble(
                g,
                &s,
                &LinkOrder::Value,
                Orientation::Horizontal,
                &LabelConfig::default(),
            )
        };

        let mut bad_link = g.clone();
        bad_link.links[0].target = estuary_core::NodeId(7);
        assert!(matches!(run(&bad_link), Err(Error::MalformedGraph { .. })));

        let mut bad_member = g.clone();
        bad_member.columns[1].nodes.push(estuary_core::NodeId(9));
        assert!(matches!(run(&bad_member), Err(Error::MalformedGraph { .. })));

        let mut bad_incident = g.clone();
        bad_incident.nodes[0].outgoing_links.push(LinkId(4));
        assert!(matches!(run(&bad_incident), Err(Error::MalformedGraph { .. })));

        let mut bad_column = g;
        bad_column.nodes[1].column = 5;
        assert!(matches!(run(&bad_column), Err(Error::MalformedGraph { .. })));
    }
}
