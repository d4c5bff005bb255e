use rustc_hash::FxHashMap;

use crate::algorithms::components::Components;
use crate::error::{SCCError, SCCResult};
use crate::types::graph_query::{GraphView, VertexId};

/// Marker for a vertex that has not been discovered yet.
pub(crate) const UNVISITED: usize = usize::MAX;

/// Dense numbering of the vertices of one graph, private to a single engine call.
///
/// All per-vertex traversal records (discovery index, low-link, stack flags)
/// are kept in `Vec`s addressed by these positions, so the graph's own vertex
/// objects are never decorated with traversal state.
pub(crate) struct VertexIndexer<V> {
    /// Position to vertex ID
    vertex_list: Vec<V>,
    /// Vertex ID to position
    position: FxHashMap<V, usize>,
}

impl<V> VertexIndexer<V>
where
    V: VertexId
{
    /// Numbers the vertices of `graph` in enumeration order.
    pub(crate) fn new<G>(graph: &G) -> Self
    where
        G: GraphView<Vertex = V>,
    {
        let mut vertex_list = graph.vertices();
        let mut position = FxHashMap::default();
        position.reserve(vertex_list.len());

        // A view that repeats a vertex keeps only its first occurrence
        vertex_list.retain(|vertex| {
            if position.contains_key(vertex) {
                false
            } else {
                position.insert(*vertex, position.len());
                true
            }
        });

        Self {
            vertex_list,
            position,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.vertex_list.len()
    }

    pub(crate) fn vertex(&self, pos: usize) -> V {
        self.vertex_list[pos]
    }

    /// Dense position of a vertex, or `UnknownVertex` if it was not enumerated.
    pub(crate) fn position_of(&self, vertex: &V) -> SCCResult<usize> {
        self.position
            .get(vertex)
            .copied()
            .ok_or_else(|| SCCError::unknown_vertex(vertex))
    }

    /// Resolves the heads of the out-edges of the vertex at `pos`.
    ///
    /// Each edge's tail must be the vertex itself: a tail outside the
    /// enumeration is `UnknownVertex`, any other vertex is `ForeignEdge`.
    /// Parallel edges resolve to repeated positions; the engines tolerate that.
    pub(crate) fn successors<G>(&self, graph: &G, pos: usize) -> SCCResult<Vec<usize>>
    where
        G: GraphView<Vertex = V>,
    {
        let vertex = &self.vertex_list[pos];
        graph
            .out_edges(vertex)?
            .iter()
            .map(|edge| {
                let tail = graph.tail(edge);
                if self.position_of(&tail)? != pos {
                    return Err(SCCError::foreign_edge(vertex, &tail));
                }
                self.position_of(&graph.head(edge))
            })
            .collect()
    }

    /// Builds the reverse adjacency index: for each position, the positions of
    /// the tails of its in-edges. Edges are checked exactly as in `successors`.
    pub(crate) fn predecessors<G>(&self, graph: &G) -> SCCResult<Vec<Vec<usize>>>
    where
        G: GraphView<Vertex = V>,
    {
        let mut reverse = vec![Vec::new(); self.len()];
        for tail in 0..self.len() {
            for head in self.successors(graph, tail)? {
                reverse[head].push(tail);
            }
        }
        Ok(reverse)
    }

    /// Maps groups of positions back to vertex IDs.
    pub(crate) fn into_components(self, groups: Vec<Vec<usize>>) -> Components<V> {
        Components::from_groups(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(|pos| self.vertex_list[pos]).collect())
                .collect(),
        )
    }
}

/// One simulated call of a recursive depth-first search.
///
/// The frame remembers which vertex it explores and how far it got through
/// the vertex's successors, so the walk can resume after a child frame returns.
pub(crate) struct Frame {
    pub(crate) vertex: usize,
    successors: Vec<usize>,
    cursor: usize,
}

impl Frame {
    pub(crate) fn new(vertex: usize, successors: Vec<usize>) -> Self {
        Self {
            vertex,
            successors,
            cursor: 0,
        }
    }

    /// Advances the edge cursor, returning the next successor if any remain.
    pub(crate) fn next_successor(&mut self) -> Option<usize> {
        let next = self.successors.get(self.cursor).copied();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }
}

#[cfg(test)]
mod test_traversal {
    use super::*;

    /// Vertices `{0, 1}`; vertex 0 lists the single edge `edge`.
    struct FixedEdgeView {
        edge: (usize, usize),
    }

    impl GraphView for FixedEdgeView {
        type Vertex = usize;
        type Edge = (usize, usize);

        fn vertices(&self) -> Vec<usize> {
            vec![0, 1]
        }

        fn out_edges(&self, vertex: &usize) -> SCCResult<Vec<(usize, usize)>> {
            Ok(if *vertex == 0 { vec![self.edge] } else { vec![] })
        }

        fn head(&self, edge: &(usize, usize)) -> usize {
            edge.1
        }

        fn tail(&self, edge: &(usize, usize)) -> usize {
            edge.0
        }
    }

    #[test]
    fn test_indexer_positions() {
        let graph: Vec<Vec<usize>> = vec![vec![1, 2], vec![2], vec![0, 0]];
        let indexer = VertexIndexer::new(&graph);

        assert_eq!(indexer.len(), 3);
        assert_eq!(indexer.vertex(2), 2);
        assert_eq!(indexer.position_of(&1).unwrap(), 1);
        assert!(indexer.position_of(&3).is_err());
        assert_eq!(indexer.successors(&graph, 2).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_indexer_rejects_dangling_head() {
        let graph: Vec<Vec<usize>> = vec![vec![4]];
        let indexer = VertexIndexer::new(&graph);
        assert!(matches!(
            indexer.successors(&graph, 0),
            Err(SCCError::UnknownVertex { .. })
        ));
        assert!(indexer.predecessors(&graph).is_err());
    }

    #[test]
    fn test_indexer_checks_tails() {
        let unknown = FixedEdgeView { edge: (7, 1) };
        let indexer = VertexIndexer::new(&unknown);
        assert!(matches!(
            indexer.successors(&unknown, 0),
            Err(SCCError::UnknownVertex { vertex }) if vertex == "7"
        ));
        assert!(matches!(
            indexer.predecessors(&unknown),
            Err(SCCError::UnknownVertex { .. })
        ));

        let foreign = FixedEdgeView { edge: (1, 0) };
        let indexer = VertexIndexer::new(&foreign);
        assert!(matches!(
            indexer.successors(&foreign, 0),
            Err(SCCError::ForeignEdge { .. })
        ));
        assert!(matches!(
            indexer.predecessors(&foreign),
            Err(SCCError::ForeignEdge { .. })
        ));

        let valid = FixedEdgeView { edge: (0, 1) };
        let indexer = VertexIndexer::new(&valid);
        assert_eq!(indexer.successors(&valid, 0).unwrap(), vec![1]);
        assert_eq!(indexer.predecessors(&valid).unwrap(), vec![vec![], vec![0]]);
    }

    #[test]
    fn test_predecessors() {
        let graph: Vec<Vec<usize>> = vec![vec![1, 2], vec![2], vec![0]];
        let indexer = VertexIndexer::new(&graph);
        let reverse = indexer.predecessors(&graph).unwrap();
        assert_eq!(reverse, vec![vec![2], vec![0], vec![0, 1]]);
    }

    #[test]
    fn test_frame_cursor() {
        let mut frame = Frame::new(0, vec![3, 5]);
        assert_eq!(frame.next_successor(), Some(3));
        assert_eq!(frame.next_successor(), Some(5));
        assert_eq!(frame.next_successor(), None);
        assert_eq!(frame.next_successor(), None);
        assert_eq!(frame.vertex, 0);
    }
}
