//! Column-partitioned flow graph construction.
//!
//! Column membership comes from caller-supplied id lists rather than being inferred from the
//! records, so zero-value categories stay visible and column order is fixed by the caller.

use crate::record::{DroppedRecord, RecordAdapter, read_record};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub usize);

/// Links are numbered in creation order (the order of the first record of each pair).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LinkId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// `"{column}::{name}"`, unique across the graph.
    pub id: String,
    pub name: String,
    pub column: usize,
    /// Position within the column's id list.
    pub row: usize,
    pub value: f64,
    pub incoming_links: Vec<LinkId>,
    pub outgoing_links: Vec<LinkId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
    /// Index of the first record that produced this link.
    pub first_record: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub nodes: Vec<NodeId>,
    pub total: f64,
}

impl Column {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub columns: Vec<Column>,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    /// Malformed records skipped during construction.
    pub dropped: Vec<DroppedRecord>,
}

pub fn node_key(column: usize, name: &str) -> String {
    format!("{column}::{name}")
}

impl FlowGraph {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)
    }

    pub fn node_id(&self, column: usize, name: &str) -> Option<NodeId> {
        self.columns
            .get(column)?
            .nodes
            .iter()
            .copied()
            .find(|id| self.node(*id).is_some_and(|n| n.name == name))
    }

    pub fn node_by_key(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == key)
    }

    pub fn link_between(&self, source: NodeId, target: NodeId) -> Option<LinkId> {
        let node = self.node(source)?;
        node.outgoing_links
            .iter()
            .copied()
            .find(|l| self.link(*l).is_some_and(|link| link.target == target))
    }

    pub fn column_lengths(&self) -> Vec<usize> {
        self.columns.iter().map(Column::len).collect()
    }

    pub fn column_totals(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.total).collect()
    }

    pub fn is_interior_column(&self, column: usize) -> bool {
        column > 0 && column + 1 < self.columns.len()
    }
}

/// Validated column layout that turns record batches into [`FlowGraph`]s.
///
/// Id lists are checked once at construction; `build` can then be called for every new dataset.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    names: Vec<Vec<String>>,
    lookup: Vec<FxHashMap<String, usize>>,
}

impl GraphBuilder {
    pub fn new<L, S>(id_lists: &[L]) -> Result<Self>
    where
        L: AsRef<[S]>,
        S: AsRef<str>,
    {
        if id_lists.len() < 2 {
            return Err(Error::TooFewColumns {
                found: id_lists.len(),
            });
        }

        let mut names = Vec::with_capacity(id_lists.len());
        let mut lookup = Vec::with_capacity(id_lists.len());
        for (column, list) in id_lists.iter().enumerate() {
            let list = list.as_ref();
            let mut column_names = Vec::with_capacity(list.len());
            let mut column_lookup: FxHashMap<String, usize> = FxHashMap::default();
            for (row, name) in list.iter().enumerate() {
                let name = name.as_ref();
                if column_lookup.insert(name.to_string(), row).is_some() {
                    return Err(Error::DuplicateIdInColumn {
                        column,
                        name: name.to_string(),
                    });
                }
                column_names.push(name.to_string());
            }
            names.push(column_names);
            lookup.push(column_lookup);
        }

        Ok(Self { names, lookup })
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    pub fn build<T, A>(&self, records: &[T], adapter: &A) -> Result<FlowGraph>
    where
        A: RecordAdapter<T> + ?Sized,
    {
        let column_count = self.names.len();

        let mut nodes: Vec<Node> = Vec::new();
        let mut columns: Vec<Column> = Vec::with_capacity(column_count);
        // First node id of each column; rows are contiguous.
        let mut column_base: Vec<usize> = Vec::with_capacity(column_count);
        for (column, names) in self.names.iter().enumerate() {
            column_base.push(nodes.len());
            let mut ids = Vec::with_capacity(names.len());
            for (row, name) in names.iter().enumerate() {
                ids.push(NodeId(nodes.len()));
                nodes.push(Node {
                    id: node_key(column, name),
                    name: name.clone(),
                    column,
                    row,
                    value: 0.0,
                    incoming_links: Vec::new(),
                    outgoing_links: Vec::new(),
                });
            }
            columns.push(Column {
                nodes: ids,
                total: 0.0,
            });
        }

        let resolve = |record: usize, column: usize, name: &str| -> Result<NodeId> {
            self.lookup[column]
                .get(name)
                .map(|row| NodeId(column_base[column] + row))
                .ok_or_else(|| Error::UnknownEndpoint {
                    record,
                    column,
                    name: name.to_string(),
                })
        };

        let mut links: Vec<Link> = Vec::new();
        let mut link_by_pair: FxHashMap<(NodeId, NodeId), LinkId> = FxHashMap::default();
        let mut dropped: Vec<DroppedRecord> = Vec::new();

        for (i, record) in records.iter().enumerate() {
            let fields = match read_record(adapter, record) {
                Ok(fields) => fields,
                Err(reason) => {
                    tracing::warn!(record = i, %reason, "dropping malformed flow record");
                    dropped.push(DroppedRecord { record: i, reason });
                    continue;
                }
            };

            if fields.column + 1 >= column_count {
                return Err(Error::ColumnOutOfRange {
                    record: i,
                    column: fields.column,
                    columns: column_count,
                });
            }
            let source = resolve(i, fields.column, fields.source)?;
            let target = resolve(i, fields.column + 1, fields.target)?;

            match link_by_pair.get(&(source, target)) {
                Some(existing) => links[existing.0].value += fields.value,
                None => {
                    let id = LinkId(links.len());
                    links.push(Link {
                        source,
                        target,
                        value: fields.value,
                        first_record: i,
                    });
                    link_by_pair.insert((source, target), id);
                    nodes[source.0].outgoing_links.push(id);
                    nodes[target.0].incoming_links.push(id);
                }
            }
        }

        for node in &mut nodes {
            let incoming = links_total(&links, &node.incoming_links);
            let outgoing = links_total(&links, &node.outgoing_links);
            // Only pass-through nodes must conserve flow; a middle-column node that only receives
            // or only emits is a sink or source like any end-column node.
            let passes_through = !node.incoming_links.is_empty() && !node.outgoing_links.is_empty();
            if passes_through && !values_match(incoming, outgoing) {
                return Err(Error::UnbalancedNode {
                    id: node.id.clone(),
                    incoming,
                    outgoing,
                });
            }
            node.value = if passes_through {
                incoming
            } else {
                incoming.max(outgoing)
            };
        }

        for column in &mut columns {
            column.total = column.nodes.iter().map(|id| nodes[id.0].value).sum();
        }

        tracing::debug!(
            columns = column_count,
            nodes = nodes.len(),
            links = links.len(),
            dropped = dropped.len(),
            "built flow graph"
        );

        Ok(FlowGraph {
            columns,
            nodes,
            links,
            dropped,
        })
    }
}

/// Convenience wrapper for one-shot construction.
pub fn build_flow_graph<T, A, L, S>(records: &[T], adapter: &A, id_lists: &[L]) -> Result<FlowGraph>
where
    A: RecordAdapter<T> + ?Sized,
    L: AsRef<[S]>,
    S: AsRef<str>,
{
    GraphBuilder::new(id_lists)?.build(records, adapter)
}

fn links_total(links: &[Link], ids: &[LinkId]) -> f64 {
    ids.iter().fold(0.0, |acc, l| acc + links[l.0].value)
}

fn values_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
