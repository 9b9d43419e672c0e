//! Input records and the adapters that read them.
//!
//! The graph builder never inspects record shapes directly; it goes through a
//! [`RecordAdapter`], so typed structs and loosely-typed JSON rows share one code path.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single flow between `source` (in `column`) and `target` (in `column + 1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub source: String,
    pub target: String,
    pub value: f64,
    /// Column of `source`; omitted for plain two-column diagrams.
    #[serde(default)]
    pub column: usize,
}

impl FlowRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
            column: 0,
        }
    }

    pub fn in_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }
}

/// Reads the fields the graph builder needs out of an arbitrary record type.
///
/// Returning `None` marks the field as missing; the record is then dropped as malformed.
pub trait RecordAdapter<T: ?Sized> {
    fn source<'a>(&self, record: &'a T) -> Option<&'a str>;
    fn target<'a>(&self, record: &'a T) -> Option<&'a str>;
    fn value(&self, record: &T) -> Option<f64>;

    fn column(&self, _record: &T) -> usize {
        0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowRecordAdapter;

impl RecordAdapter<FlowRecord> for FlowRecordAdapter {
    fn source<'a>(&self, record: &'a FlowRecord) -> Option<&'a str> {
        Some(record.source.as_str()).filter(|s| !s.trim().is_empty())
    }

    fn target<'a>(&self, record: &'a FlowRecord) -> Option<&'a str> {
        Some(record.target.as_str()).filter(|s| !s.trim().is_empty())
    }

    fn value(&self, record: &FlowRecord) -> Option<f64> {
        Some(record.value)
    }

    fn column(&self, record: &FlowRecord) -> usize {
        record.column
    }
}

/// Reads records from JSON objects with configurable field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRecordAdapter {
    pub source_key: String,
    pub target_key: String,
    pub value_key: String,
    pub column_key: Option<String>,
}

impl Default for JsonRecordAdapter {
    fn default() -> Self {
        Self {
            source_key: "source".to_string(),
            target_key: "target".to_string(),
            value_key: "value".to_string(),
            column_key: None,
        }
    }
}

impl JsonRecordAdapter {
    pub fn with_keys(source: &str, target: &str, value: &str) -> Self {
        Self {
            source_key: source.to_string(),
            target_key: target.to_string(),
            value_key: value.to_string(),
            column_key: None,
        }
    }

    pub fn with_column_key(mut self, key: &str) -> Self {
        self.column_key = Some(key.to_string());
        self
    }
}

impl RecordAdapter<Value> for JsonRecordAdapter {
    fn source<'a>(&self, record: &'a Value) -> Option<&'a str> {
        record
            .get(&self.source_key)?
            .as_str()
            .filter(|s| !s.trim().is_empty())
    }

    fn target<'a>(&self, record: &'a Value) -> Option<&'a str> {
        record
            .get(&self.target_key)?
            .as_str()
            .filter(|s| !s.trim().is_empty())
    }

    fn value(&self, record: &Value) -> Option<f64> {
        match record.get(&self.value_key)? {
            Value::Number(n) => n.as_f64(),
            // CSV loaders frequently hand numbers over as text.
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn column(&self, record: &Value) -> usize {
        self.column_key
            .as_deref()
            .and_then(|key| record.get(key))
            .and_then(Value::as_u64)
            .map_or(0, |c| c as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MalformedReason {
    MissingSource,
    MissingTarget,
    MissingValue,
    NonFiniteValue,
    NonPositiveValue { value: f64 },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSource => f.write_str("missing source"),
            Self::MissingTarget => f.write_str("missing target"),
            Self::MissingValue => f.write_str("missing or non-numeric value"),
            Self::NonFiniteValue => f.write_str("non-finite value"),
            Self::NonPositiveValue { value } => write!(f, "non-positive value {value}"),
        }
    }
}

/// A record skipped during graph construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRecord {
    pub record: usize,
    pub reason: MalformedReason,
}

/// The well-formed view of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RecordFields<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub value: f64,
    pub column: usize,
}

pub(crate) fn read_record<'a, T, A>(
    adapter: &A,
    record: &'a T,
) -> std::result::Result<RecordFields<'a>, MalformedReason>
where
    T: ?Sized,
    A: RecordAdapter<T> + ?Sized,
{
    let source = adapter
        .source(record)
        .ok_or(MalformedReason::MissingSource)?;
    let target = adapter
        .target(record)
        .ok_or(MalformedReason::MissingTarget)?;
    let value = adapter.value(record).ok_or(MalformedReason::MissingValue)?;
    if !value.is_finite() {
        return Err(MalformedReason::NonFiniteValue);
    }
    if value <= 0.0 {
        return Err(MalformedReason::NonPositiveValue { value });
    }
    Ok(RecordFields {
        source,
        target,
        value,
        column: adapter.column(record),
    })
}

/// Derives per-column id lists from the records, in order of first appearance.
///
/// The column count is one more than the largest source column seen (at least two). Malformed
/// records are ignored, the same way the graph builder ignores them.
pub fn infer_id_lists<T, A>(records: &[T], adapter: &A) -> Vec<Vec<String>>
where
    A: RecordAdapter<T> + ?Sized,
{
    let fields: Vec<RecordFields<'_>> = records
        .iter()
        .filter_map(|r| read_record(adapter, r).ok())
        .collect();
    let columns = fields
        .iter()
        .map(|f| f.column + 2)
        .max()
        .unwrap_or(2)
        .max(2);

    let mut lists: Vec<IndexSet<&str>> = vec![IndexSet::new(); columns];
    for f in &fields {
        lists[f.column].insert(f.source);
        lists[f.column + 1].insert(f.target);
    }
    lists
        .into_iter()
        .map(|set| set.into_iter().map(str::to_string).collect())
        .collect()
}
