#![forbid(unsafe_code)]

//! Headless flow-diagram (Sankey) layout.
//!
//! The pipeline is `records -> FlowGraph -> Scales -> PositionedGraph`; every stage is a pure
//! function and is recomputed from scratch on each call. [`HighlightState`] tracks hover state
//! next to it without ever touching the graph.

pub mod assemble;
pub mod config;
pub mod highlight;
pub mod label;
pub mod model;
pub mod order;
pub mod path;
pub mod solver;

pub use assemble::assemble;
pub use config::{LabelConfig, LayoutConfig, Orientation, Size, SolverConfig};
pub use highlight::{Highlight, HighlightSet, HighlightState};
pub use model::{
    LabelSide, LinkPath, NodeLabel, Point, PositionedGraph, PositionedLink, PositionedNode, Rect,
    TextAnchor,
};
pub use order::{HighlightLast, LinkComparator, LinkOrder, LinkView};
pub use solver::{LinearScale, Scales, solve};

use estuary_core::{FlowGraph, GraphBuilder, RecordAdapter};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] estuary_core::Error),
    #[error("column statistics disagree: {lengths} lengths vs {totals} totals")]
    StatsMismatch { lengths: usize, totals: usize },
    #[error("cannot lay out a diagram without columns")]
    NoColumns,
    #[error("scales were solved for {scale_columns} columns, graph has {graph_columns}")]
    ScalesMismatch {
        graph_columns: usize,
        scale_columns: usize,
    },
    #[error("malformed flow graph: {message}")]
    MalformedGraph { message: String },
    #[error("invalid drawing area: {message}")]
    InvalidArea { message: String },
    #[error("invalid layout configuration: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A built graph together with its positioned form.
#[derive(Debug, Clone)]
pub struct FlowLayout {
    pub graph: FlowGraph,
    pub positioned: PositionedGraph,
}

/// Solves and assembles an already built graph using `config`.
pub fn layout_graph<C>(
    graph: &FlowGraph,
    config: &LayoutConfig,
    comparator: &C,
) -> Result<PositionedGraph>
where
    C: LinkComparator + ?Sized,
{
    config.validate()?;
    let (extent, breadth) = config.area.extents(config.orientation);
    let scales = solve(
        &graph.column_lengths(),
        &graph.column_totals(),
        extent,
        breadth,
        &config.solver,
    )?;
    assemble(graph, &scales, comparator, config.orientation, &config.labels)
}

/// Runs the whole pipeline with the configured link order.
pub fn layout_flow_diagram<T, A, L, S>(
    records: &[T],
    adapter: &A,
    id_lists: &[L],
    config: &LayoutConfig,
) -> Result<FlowLayout>
where
    A: RecordAdapter<T> + ?Sized,
    L: AsRef<[S]>,
    S: AsRef<str>,
{
    let graph = GraphBuilder::new(id_lists)?.build(records, adapter)?;
    let positioned = layout_graph(&graph, config, &config.link_order)?;
    tracing::debug!(
        nodes = positioned.nodes.len(),
        links = positioned.links.len(),
        node_padding = positioned.scales.node_padding,
        "laid out flow diagram"
    );
    Ok(FlowLayout { graph, positioned })
}
