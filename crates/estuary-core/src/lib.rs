#![forbid(unsafe_code)]

//! Flow-diagram (Sankey) records, configuration and graph construction (headless).
//!
//! Design goals:
//! - deterministic outputs: equal inputs always build equal graphs
//! - fail fast on caller contract violations, skip (and report) malformed rows
//! - no module-level state; everything is passed in explicitly

pub mod config;
pub mod error;
pub mod graph;
pub mod record;

pub use config::FlowConfig;
pub use error::{Error, Result};
pub use graph::{
    Column, FlowGraph, GraphBuilder, Link, LinkId, Node, NodeId, build_flow_graph, node_key,
};
pub use record::{
    DroppedRecord, FlowRecord, FlowRecordAdapter, JsonRecordAdapter, MalformedReason,
    RecordAdapter, infer_id_lists,
};
