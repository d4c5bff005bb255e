pub mod cmg;
pub mod components;
pub mod kosaraju;
pub mod scc;
pub mod tarjan;
pub(crate) mod traversal;

pub use cmg::CheriyanMehlhornGabow;
pub use components::{Components, Condensation};
pub use kosaraju::KosarajuSharir;
pub use scc::{SCCAlgorithm, SCCController, SCC};
pub use tarjan::Tarjan;
