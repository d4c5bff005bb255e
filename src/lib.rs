//! Strongly connected component discovery over read-only directed graph views.
//!
//! Three interchangeable engines (Tarjan, Kosaraju–Sharir and
//! Cheriyan–Mehlhorn–Gabow) implement the [`SCC`] trait and return the same
//! partition for the same graph.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod types;
pub mod util;

pub use algorithms::{
    CheriyanMehlhornGabow, Components, Condensation, KosarajuSharir, SCCAlgorithm, SCCController,
    Tarjan, SCC,
};
pub use config::SCCConfig;
pub use error::{SCCError, SCCResult};
pub use types::graph_query::{GraphView, VertexId};
pub use types::DirectedGraph;
