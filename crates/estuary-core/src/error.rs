pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a flow diagram needs at least two columns, got {found}")]
    TooFewColumns { found: usize },

    #[error("duplicate node name {name:?} in column {column}")]
    DuplicateIdInColumn { column: usize, name: String },

    #[error("record {record}: unknown node {name:?} in column {column}")]
    UnknownEndpoint {
        record: usize,
        column: usize,
        name: String,
    },

    #[error("record {record}: source column {column} has no following column ({columns} columns)")]
    ColumnOutOfRange {
        record: usize,
        column: usize,
        columns: usize,
    },

    #[error("node {id} is not balanced: incoming {incoming} != outgoing {outgoing}")]
    UnbalancedNode {
        id: String,
        incoming: f64,
        outgoing: f64,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
