use thiserror::Error;

/// Errors reported by the graph views, the SCC engines and the graph loader.
///
/// Every engine either returns a complete partition or one of these errors;
/// no partially assembled result ever escapes a failed traversal.
#[derive(Debug, Error)]
pub enum SCCError {
    /// An edge endpoint (or a queried vertex) is not part of the vertex enumeration.
    #[error("unknown vertex {vertex}")]
    UnknownVertex { vertex: String },

    /// `out_edges(vertex)` returned an edge whose tail is another enumerated vertex.
    #[error("edge listed under {vertex} has tail {tail}")]
    ForeignEdge { vertex: String, tail: String },

    /// A set of components does not partition the vertex set of the graph.
    #[error("invalid partition: {reason}")]
    InvalidPartition { reason: String },

    /// Two engines produced different partitions for the same graph.
    #[error("engines disagree: {left} and {right} returned different partitions")]
    EngineDisagreement { left: String, right: String },

    /// A line of a graph file could not be parsed.
    #[error("graph file format error at line {line}: {message}")]
    GraphFormat { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl SCCError {
    /// Builds an `UnknownVertex` error from any debuggable vertex identity.
    pub fn unknown_vertex<V: std::fmt::Debug>(vertex: &V) -> Self {
        SCCError::UnknownVertex {
            vertex: format!("{:?}", vertex),
        }
    }
}

impl SCCError {
    pub fn foreign_edge<V: std::fmt::Debug>(vertex: &V, tail: &V) -> Self {
        SCCError::ForeignEdge {
            vertex: format!("{:?}", vertex),
            tail: format!("{:?}", tail),
        }
    }
}

/// Result alias used across the crate.
pub type SCCResult<T> = Result<T, SCCError>;
