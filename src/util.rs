use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SCCResult;
use crate::types::DirectedGraph;

/// Generates a random directed multigraph for benchmarks and stress tests.
///
/// Vertices are `0..vertex_count`. Each edge picks both endpoints uniformly at
/// random, so parallel edges and self-loops occur naturally. The same seed
/// always produces the same graph.
///
/// # Arguments
/// * `vertex_count` - Number of vertices
/// * `edge_count` - Number of edges to draw
/// * `seed` - Seed for the random number generator
pub fn generate_random_graph(
    vertex_count: u64,
    edge_count: usize,
    seed: u64,
) -> SCCResult<DirectedGraph<u64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let edges: Vec<(u64, u64)> = if vertex_count == 0 {
        Vec::new()
    } else {
        (0..edge_count)
            .map(|_| (rng.gen_range(0..vertex_count), rng.gen_range(0..vertex_count)))
            .collect()
    };

    DirectedGraph::new(0..vertex_count, edges)
}
