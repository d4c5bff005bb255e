use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{SCCError, SCCResult};

/// Identity of a vertex as seen by the SCC engines.
///
/// Engines only compare, hash and order vertices; they never look at any
/// payload behind the identity.
pub trait VertexId: Copy + Eq + Hash + Ord + Debug + Send + Sync {}

impl<T> VertexId for T where T: Copy + Eq + Hash + Ord + Debug + Send + Sync {}

/// A read-only view of a directed graph.
///
/// This trait is the only surface the SCC engines consume: enumerating the
/// vertices, enumerating the out-going edges of one vertex, and resolving the
/// endpoints of an edge. No method mutates the graph, so one view can be
/// shared by several engine invocations running at the same time.
///
/// # Associated Types
///
/// * `Vertex` - The vertex identifier type.
/// * `Edge` - The edge type. Only its endpoints matter to the engines.
pub trait GraphView {
    type Vertex: VertexId;
    type Edge;

    /// Retrieves all vertices of the graph.
    ///
    /// The order is unspecified but must be stable for an unchanged graph.
    fn vertices(&self) -> Vec<Self::Vertex>;

    /// Retrieves all edges whose tail is `vertex`.
    ///
    /// The engines reject an edge whose `tail` is not `vertex`: with
    /// `SCCError::UnknownVertex` when the tail is not enumerated, otherwise with
    /// `SCCError::ForeignEdge`.
    ///
    /// # Errors
    ///
    /// * `SCCError::UnknownVertex` - If `vertex` is not a member of the graph.
    fn out_edges(&self, vertex: &Self::Vertex) -> SCCResult<Vec<Self::Edge>>;

    /// Returns the vertex an edge points to.
    fn head(&self, edge: &Self::Edge) -> Self::Vertex;

    /// Returns the vertex an edge starts from.
    fn tail(&self, edge: &Self::Edge) -> Self::Vertex;

    /// Checks if a specific vertex exists in the graph.
    ///
    /// The default builds the whole vertex list on every call, so it is O(V).
    /// Views with an index should override it, as `DirectedGraph` does.
    fn has_vertex(&self, vertex: &Self::Vertex) -> bool {
        self.vertices().contains(vertex)
    }

    /// Number of vertices in the graph.
    ///
    /// O(V) by default for the same reason as `has_vertex`; override it when
    /// the count is known.
    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }
}

/// A plain adjacency list: vertex `i` is position `i`, and `self[i]` lists the
/// heads of its out-edges. Edges are reported as `(tail, head)` pairs.
impl GraphView for Vec<Vec<usize>> {
    type Vertex = usize;
    type Edge = (usize, usize);

    fn vertices(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    fn out_edges(&self, vertex: &usize) -> SCCResult<Vec<(usize, usize)>> {
        match self.get(*vertex) {
            Some(heads) => Ok(heads.iter().map(|&head| (*vertex, head)).collect()),
            None => Err(SCCError::unknown_vertex(vertex)),
        }
    }

    fn head(&self, edge: &(usize, usize)) -> usize {
        edge.1
    }

    fn tail(&self, edge: &(usize, usize)) -> usize {
        edge.0
    }

    fn has_vertex(&self, vertex: &usize) -> bool {
        *vertex < self.len()
    }

    fn vertex_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod test_graph_query {
    use super::*;

    #[test]
    fn test_adjacency_list_view() {
        let graph: Vec<Vec<usize>> = vec![vec![1, 1], vec![0], vec![]];

        assert_eq!(graph.vertices(), vec![0, 1, 2]);
        assert_eq!(graph.vertex_count(), 3);
        assert!(graph.has_vertex(&2));
        assert!(!graph.has_vertex(&3));

        // Parallel edges are reported individually
        let edges = graph.out_edges(&0).unwrap();
        assert_eq!(edges, vec![(0, 1), (0, 1)]);
        assert_eq!(graph.tail(&edges[0]), 0);
        assert_eq!(graph.head(&edges[0]), 1);

        assert!(graph.out_edges(&2).unwrap().is_empty());
    }

    #[test]
    fn test_adjacency_list_unknown_vertex() {
        let graph: Vec<Vec<usize>> = vec![vec![]];
        let err = graph.out_edges(&7).unwrap_err();
        assert!(matches!(err, SCCError::UnknownVertex { .. }));
    }
}
