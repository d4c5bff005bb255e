use log::debug;

use crate::algorithms::components::Components;
use crate::algorithms::scc::SCC;
use crate::algorithms::traversal::{Frame, VertexIndexer, UNVISITED};
use crate::error::SCCResult;
use crate::types::graph_query::GraphView;

/// Tarjan's strongly connected components algorithm.
///
/// # Algorithm
///
/// A single depth-first search assigns every vertex a discovery index and a
/// low-link value (the smallest discovery index reachable from the vertex's
/// DFS subtree through at most one back-edge). Discovered vertices are kept
/// on an open stack; when a vertex finishes with `low_link == index` it is
/// the root of a component, and the open stack is popped down to it.
///
/// The search runs on an explicit frame stack instead of native recursion,
/// so long chains cannot overflow the call stack.
///
/// # Time Complexity
///
/// * O(V + E) where V is the number of vertices and E is the number of edges
///
/// # Space Complexity
///
/// * O(V) for indices, low links, the open stack and the frame stack
#[derive(Clone, Copy, Debug, Default)]
pub struct Tarjan;

/// Per-call bookkeeping for Tarjan's algorithm, addressed by dense vertex position.
struct TarjanState {
    next_index: usize,          // Next discovery index to hand out
    indices: Vec<usize>,        // Discovery index per vertex
    low_links: Vec<usize>,      // Lowest index reachable from the DFS subtree
    on_stack: Vec<bool>,        // Whether the vertex is still on the open stack
    stack: Vec<usize>,          // Open stack: visited but not yet assigned
    groups: Vec<Vec<usize>>,    // Completed components
}

impl TarjanState {
    fn new(vertex_count: usize) -> Self {
        Self {
            next_index: 0,
            indices: vec![UNVISITED; vertex_count],
            low_links: vec![UNVISITED; vertex_count],
            on_stack: vec![false; vertex_count],
            stack: Vec::new(),
            groups: Vec::new(),
        }
    }

    fn is_visited(&self, v: usize) -> bool {
        self.indices[v] != UNVISITED
    }

    /// First visit: index and low-link start equal, vertex goes on the open stack.
    fn discover(&mut self, v: usize) {
        self.indices[v] = self.next_index;
        self.low_links[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    /// Emits a component if `v` turned out to be a root.
    fn finish(&mut self, v: usize) {
        if self.low_links[v] != self.indices[v] {
            return;
        }

        let mut group = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            group.push(w);
            if w == v {
                break;
            }
        }
        self.groups.push(group);
    }
}

impl SCC for Tarjan {
    fn compute_components<G>(&self, graph: &G) -> SCCResult<Components<G::Vertex>>
    where
        G: GraphView,
    {
        let indexer = VertexIndexer::new(graph);
        let n = indexer.len();
        let mut state = TarjanState::new(n);
        let mut dfs_stack: Vec<Frame> = Vec::new();

        // Process all vertices (handles disconnected regions)
        for start in 0..n {
            if state.is_visited(start) {
                continue;
            }

            state.discover(start);
            dfs_stack.push(Frame::new(start, indexer.successors(graph, start)?));

            while let Some(frame) = dfs_stack.last_mut() {
                let v = frame.vertex;
                match frame.next_successor() {
                    Some(w) => {
                        if !state.is_visited(w) {
                            // Tree edge: simulate the recursive call
                            state.discover(w);
                            dfs_stack.push(Frame::new(w, indexer.successors(graph, w)?));
                        } else if state.on_stack[w] {
                            // Edge into the open part of the search
                            state.low_links[v] = state.low_links[v].min(state.indices[w]);
                        }
                        // Edges into closed components are ignored
                    }
                    None => {
                        dfs_stack.pop();
                        state.finish(v);

                        // Return to the caller frame and propagate the low-link
                        if let Some(parent) = dfs_stack.last() {
                            let p = parent.vertex;
                            state.low_links[p] = state.low_links[p].min(state.low_links[v]);
                        }
                    }
                }
            }
        }

        debug!("Tarjan: {} vertices, {} components.", n, state.groups.len());
        Ok(indexer.into_components(state.groups))
    }
}

#[cfg(test)]
mod test_tarjan {
    use super::*;
    use crate::error::SCCError;

    fn sorted_groups(components: Components<usize>) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = components
            .into_iter()
            .map(|mut group| {
                group.sort_unstable();
                group
            })
            .collect();
        groups.sort();
        groups
    }

    #[test]
    fn test_tarjan_mixed_graph() {
        // (0)-->(1)-->(2)<->(3)
        //  ^  /  |      |
        //  | v   v      v
        // (4)-->(5)<->(6)<--(7)
        let graph: Vec<Vec<usize>> = vec![
            vec![1],
            vec![4, 5, 2],
            vec![3, 6],
            vec![2, 7],
            vec![0, 5],
            vec![6],
            vec![5],
            vec![6, 3],
        ];

        let result = Tarjan.compute_components(&graph).unwrap();
        assert_eq!(
            sorted_groups(result),
            vec![vec![0, 1, 4], vec![2, 3, 7], vec![5, 6]]
        );
    }

    #[test]
    fn test_tarjan_emits_sinks_first() {
        // 0 -> 1 -> 2: the sink closes before its ancestors
        let graph: Vec<Vec<usize>> = vec![vec![1], vec![2], vec![]];
        let result = Tarjan.compute_components(&graph).unwrap();
        assert_eq!(result.into_inner(), vec![vec![2], vec![1], vec![0]]);
    }

    #[test]
    fn test_tarjan_long_chain() {
        // Deep enough to overflow a naive recursive implementation
        const LENGTH: usize = 200_000;
        let mut graph: Vec<Vec<usize>> = (0..LENGTH).map(|v| vec![v + 1]).collect();
        graph[LENGTH - 1] = vec![0];

        let result = Tarjan.compute_components(&graph).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.iter().next().map(|g| g.len()), Some(LENGTH));
    }

    #[test]
    fn test_tarjan_unknown_vertex() {
        let graph: Vec<Vec<usize>> = vec![vec![1], vec![0, 9]];
        match Tarjan.compute_components(&graph) {
            Err(SCCError::UnknownVertex { vertex }) => assert_eq!(vertex, "9"),
            other => panic!("expected UnknownVertex, got {:?}", other),
        }
    }
}
