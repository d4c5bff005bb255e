use log::debug;

use crate::algorithms::components::Components;
use crate::algorithms::scc::SCC;
use crate::algorithms::traversal::{Frame, VertexIndexer};
use crate::error::SCCResult;
use crate::types::graph_query::GraphView;

/// Kosaraju–Sharir's two-pass strongly connected components algorithm.
///
/// # Algorithm
///
/// 1. A depth-first search along the edges records every vertex when its
///    exploration completes, giving a finish order.
/// 2. Vertices are taken in reverse finish order; each one not yet assigned
///    starts a search along the *reversed* edges, and everything it reaches
///    that is still unassigned forms one component.
///
/// The reversed adjacency is built once per call from the view's edges and
/// dropped when the call returns.
///
/// # Time Complexity
///
/// * O(V + E)
#[derive(Clone, Copy, Debug, Default)]
pub struct KosarajuSharir;

/// First pass: post-order of an iterative depth-first search over all vertices.
fn finish_order<G>(indexer: &VertexIndexer<G::Vertex>, graph: &G) -> SCCResult<Vec<usize>>
where
    G: GraphView,
{
    let n = indexer.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut dfs_stack: Vec<Frame> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        dfs_stack.push(Frame::new(start, indexer.successors(graph, start)?));

        while let Some(frame) = dfs_stack.last_mut() {
            match frame.next_successor() {
                Some(w) => {
                    if !visited[w] {
                        visited[w] = true;
                        dfs_stack.push(Frame::new(w, indexer.successors(graph, w)?));
                    }
                }
                None => {
                    let v = frame.vertex;
                    dfs_stack.pop();
                    order.push(v);
                }
            }
        }
    }
    Ok(order)
}

/// Marks and returns every position reachable from `start` through `adjacency`.
fn reach(start: usize, adjacency: &[Vec<usize>]) -> Vec<bool> {
    let mut seen = vec![false; adjacency.len()];
    seen[start] = true;
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        for &w in &adjacency[v] {
            if !seen[w] {
                seen[w] = true;
                stack.push(w);
            }
        }
    }
    seen
}

impl KosarajuSharir {
    /// Computes only the strongly connected component that contains `source`.
    ///
    /// The component is the intersection of the vertices reachable from
    /// `source` and the vertices that can reach `source`.
    ///
    /// # Returns
    ///
    /// * `Vec<V>` - The members of the component, `source` first
    ///
    /// # Errors
    ///
    /// * `SCCError::UnknownVertex` - If `source` (or any edge endpoint) is not
    ///   in the vertex enumeration
    pub fn component_containing<G>(&self, graph: &G, source: &G::Vertex) -> SCCResult<Vec<G::Vertex>>
    where
        G: GraphView,
    {
        let indexer = VertexIndexer::new(graph);
        let source_pos = indexer.position_of(source)?;

        let mut forward = Vec::with_capacity(indexer.len());
        for v in 0..indexer.len() {
            forward.push(indexer.successors(graph, v)?);
        }
        let backward = indexer.predecessors(graph)?;

        let from_source = reach(source_pos, &forward);
        let to_source = reach(source_pos, &backward);

        let mut component = vec![*source];
        component.extend(
            (0..indexer.len())
                .filter(|&v| v != source_pos && from_source[v] && to_source[v])
                .map(|v| indexer.vertex(v)),
        );
        Ok(component)
    }
}

impl SCC for KosarajuSharir {
    fn compute_components<G>(&self, graph: &G) -> SCCResult<Components<G::Vertex>>
    where
        G: GraphView,
    {
        let indexer = VertexIndexer::new(graph);
        let n = indexer.len();

        // Pass 1: finish order along the given edge direction
        let order = finish_order(&indexer, graph)?;

        // Reverse adjacency, private to this call
        let reverse = indexer.predecessors(graph)?;

        // Pass 2: latest finisher first, walking reversed edges
        let mut assigned = vec![false; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for &root in order.iter().rev() {
            if assigned[root] {
                continue;
            }

            assigned[root] = true;
            let mut group = vec![root];
            let mut stack = vec![root];
            while let Some(v) = stack.pop() {
                for &u in &reverse[v] {
                    if !assigned[u] {
                        assigned[u] = true;
                        stack.push(u);
                        group.push(u);
                    }
                }
            }
            groups.push(group);
        }

        debug!("Kosaraju-Sharir: {} vertices, {} components.", n, groups.len());
        Ok(indexer.into_components(groups))
    }
}

#[cfg(test)]
mod test_kosaraju {
    use super::*;
    use crate::error::SCCError;
    use crate::types::DirectedGraph;
    use std::collections::BTreeSet;

    /// Finish order of `graph` expressed in vertex IDs.
    fn finish_order_of(graph: &Vec<Vec<usize>>) -> Vec<usize> {
        let indexer = VertexIndexer::new(graph);
        finish_order(&indexer, graph)
            .unwrap()
            .into_iter()
            .map(|pos| indexer.vertex(pos))
            .collect()
    }

    #[test]
    fn test_finish_order_is_post_order() {
        // 0 -> 1 -> 2, 0 -> 3
        let graph: Vec<Vec<usize>> = vec![vec![1, 3], vec![2], vec![], vec![]];
        assert_eq!(finish_order_of(&graph), vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_kosaraju_sources_first() {
        // Reverse finish order visits 0 first; its reversed search stays at {0}
        let graph: Vec<Vec<usize>> = vec![vec![1], vec![2], vec![]];
        let result = KosarajuSharir.compute_components(&graph).unwrap();
        assert_eq!(result.into_inner(), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_kosaraju_cycle_with_tail() {
        // 0 -> 1 -> 2 -> 0, 2 -> 3
        let graph: Vec<Vec<usize>> = vec![vec![1], vec![2], vec![0, 3], vec![]];
        let result = KosarajuSharir.compute_components(&graph).unwrap();
        let partition = result.to_partition();
        assert_eq!(partition.len(), 2);
        let cycle: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
        let tail: BTreeSet<usize> = [3].into_iter().collect();
        assert!(partition.contains(&cycle));
        assert!(partition.contains(&tail));
    }

    #[test]
    fn test_component_containing() {
        let graph = DirectedGraph::new(
            vec!["a", "b", "c", "d"],
            vec![("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")],
        )
        .unwrap();

        let mut component = KosarajuSharir.component_containing(&graph, &"b").unwrap();
        assert_eq!(component[0], "b");
        component.sort();
        assert_eq!(component, vec!["a", "b", "c"]);

        assert_eq!(
            KosarajuSharir.component_containing(&graph, &"d").unwrap(),
            vec!["d"]
        );
        assert!(matches!(
            KosarajuSharir.component_containing(&graph, &"z"),
            Err(SCCError::UnknownVertex { .. })
        ));
    }

    #[test]
    fn test_kosaraju_unknown_vertex() {
        let graph: Vec<Vec<usize>> = vec![vec![2]];
        assert!(matches!(
            KosarajuSharir.compute_components(&graph),
            Err(SCCError::UnknownVertex { .. })
        ));
    }
}
