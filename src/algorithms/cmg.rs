use log::debug;

use crate::algorithms::components::Components;
use crate::algorithms::scc::SCC;
use crate::algorithms::traversal::{Frame, VertexIndexer, UNVISITED};
use crate::error::SCCResult;
use crate::types::graph_query::GraphView;

/// The Cheriyan–Mehlhorn–Gabow (path-based) strongly connected components algorithm.
///
/// # Algorithm
///
/// One depth-first search maintains two stacks:
/// - the open stack, holding every visited vertex not yet assigned to a
///   component, in visit order;
/// - the root-candidate stack, holding discovery indices that mark where a
///   component may begin on the open stack.
///
/// An edge to a visited, unassigned vertex `w` proves that every candidate
/// boundary above `index(w)` lies on a cycle through `w`, so those boundaries
/// are collapsed. When a vertex finishes and its own index is still the top
/// candidate, the open stack down to that vertex is one component.
///
/// No per-vertex low-link is stored; the candidate stack carries the same
/// information.
///
/// # Time Complexity
///
/// * O(V + E)
#[derive(Clone, Copy, Debug, Default)]
pub struct CheriyanMehlhornGabow;

struct PathState {
    next_index: usize,
    indices: Vec<usize>,
    assigned: Vec<bool>,
    open_stack: Vec<usize>,
    root_stack: Vec<usize>,
    groups: Vec<Vec<usize>>,
}

impl PathState {
    fn new(vertex_count: usize) -> Self {
        Self {
            next_index: 0,
            indices: vec![UNVISITED; vertex_count],
            assigned: vec![false; vertex_count],
            open_stack: Vec::new(),
            root_stack: Vec::new(),
            groups: Vec::new(),
        }
    }

    fn is_visited(&self, v: usize) -> bool {
        self.indices[v] != UNVISITED
    }

    fn discover(&mut self, v: usize) {
        self.indices[v] = self.next_index;
        self.next_index += 1;
        self.open_stack.push(v);
        self.root_stack.push(self.indices[v]);
    }

    /// Collapses every candidate boundary discovered after `w`.
    fn contract(&mut self, w: usize) {
        let w_index = self.indices[w];
        while let Some(&top) = self.root_stack.last() {
            if top <= w_index {
                break;
            }
            self.root_stack.pop();
        }
    }

    fn finish(&mut self, v: usize) {
        if self.root_stack.last() != Some(&self.indices[v]) {
            return;
        }
        self.root_stack.pop();

        let mut group = Vec::new();
        while let Some(w) = self.open_stack.pop() {
            self.assigned[w] = true;
            group.push(w);
            if w == v {
                break;
            }
        }
        self.groups.push(group);
    }
}

impl SCC for CheriyanMehlhornGabow {
    fn compute_components<G>(&self, graph: &G) -> SCCResult<Components<G::Vertex>>
    where
        G: GraphView,
    {
        let indexer = VertexIndexer::new(graph);
        let n = indexer.len();
        let mut state = PathState::new(n);
        let mut dfs_stack: Vec<Frame> = Vec::new();

        for start in 0..n {
            if state.is_visited(start) {
                continue;
            }

            state.discover(start);
            dfs_stack.push(Frame::new(start, indexer.successors(graph, start)?));

            while let Some(frame) = dfs_stack.last_mut() {
                let v = frame.vertex;
                match frame.next_successor() {
                    Some(w) if !state.is_visited(w) => {
                        state.discover(w);
                        dfs_stack.push(Frame::new(w, indexer.successors(graph, w)?));
                    }
                    Some(w) => {
                        if !state.assigned[w] {
                            state.contract(w);
                        }
                    }
                    None => {
                        dfs_stack.pop();
                        state.finish(v);
                    }
                }
            }
        }

        debug!(
            "Cheriyan-Mehlhorn-Gabow: {} vertices, {} components.",
            n,
            state.groups.len()
        );
        Ok(indexer.into_components(state.groups))
    }
}
