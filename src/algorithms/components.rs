use std::collections::{BTreeSet, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::error::{SCCError, SCCResult};
use crate::types::graph_query::{GraphView, VertexId};

/// The strongly connected components of one graph, as returned by an engine.
///
/// Groups are non-empty, pairwise disjoint and together cover the vertex set
/// of the graph they were computed from. Neither the order of the groups nor
/// the order inside a group carries meaning; compare results with
/// [`Components::same_partition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Components<V> {
    groups: Vec<Vec<V>>,
}

impl<V> Components<V>
where
    V: VertexId
{
    pub(crate) fn from_groups(groups: Vec<Vec<V>>) -> Self {
        Self { groups }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates the components as vertex slices.
    pub fn iter(&self) -> impl Iterator<Item = &[V]> {
        self.groups.iter().map(|group| group.as_slice())
    }

    pub fn into_inner(self) -> Vec<Vec<V>> {
        self.groups
    }

    /// The component with the most vertices, if any.
    pub fn largest(&self) -> Option<&[V]> {
        self.iter().max_by_key(|group| group.len())
    }

    /// The component holding `vertex`, if it is covered by this result.
    pub fn component_of(&self, vertex: &V) -> Option<&[V]> {
        self.iter().find(|group| group.contains(vertex))
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.component_of(vertex).is_some()
    }

    /// Maps every covered vertex to the position of its component.
    pub fn component_index(&self) -> FxHashMap<V, usize> {
        let mut index = FxHashMap::default();
        for (component_id, group) in self.groups.iter().enumerate() {
            for &vertex in group {
                index.insert(vertex, component_id);
            }
        }
        index
    }

    /// Order-insensitive form of the partition.
    pub fn to_partition(&self) -> BTreeSet<BTreeSet<V>> {
        self.groups
            .iter()
            .map(|group| group.iter().copied().collect())
            .collect()
    }

    /// Whether two results describe the same partition, ignoring all ordering.
    pub fn same_partition(&self, other: &Components<V>) -> bool {
        self.len() == other.len() && self.to_partition() == other.to_partition()
    }

    /// Checks that the groups partition the vertex set of `graph`.
    ///
    /// # Errors
    ///
    /// * `SCCError::InvalidPartition` - If a group is empty, a vertex is
    ///   repeated or foreign to the graph, or a graph vertex is not covered.
    pub fn validate<G>(&self, graph: &G) -> SCCResult<()>
    where
        G: GraphView<Vertex = V>,
    {
        let graph_vertices: FxHashSet<V> = graph.vertices().into_iter().collect();
        let mut seen: FxHashSet<V> = FxHashSet::default();

        for (component_id, group) in self.groups.iter().enumerate() {
            if group.is_empty() {
                return Err(SCCError::InvalidPartition {
                    reason: format!("component {} is empty", component_id),
                });
            }
            for vertex in group {
                if !graph_vertices.contains(vertex) {
                    return Err(SCCError::InvalidPartition {
                        reason: format!("vertex {:?} is not in the graph", vertex),
                    });
                }
                if !seen.insert(*vertex) {
                    return Err(SCCError::InvalidPartition {
                        reason: format!("vertex {:?} appears in more than one component", vertex),
                    });
                }
            }
        }

        if seen.len() != graph_vertices.len() {
            return Err(SCCError::InvalidPartition {
                reason: format!(
                    "{} of {} vertices are not covered",
                    graph_vertices.len() - seen.len(),
                    graph_vertices.len()
                ),
            });
        }
        Ok(())
    }

    /// Builds the component DAG: one node per component, and an edge between two
    /// components whenever some graph edge crosses from one to the other.
    ///
    /// # Errors
    ///
    /// * `SCCError::UnknownVertex` - If an edge endpoint is not covered by
    ///   this result.
    pub fn condensation<G>(&self, graph: &G) -> SCCResult<Condensation>
    where
        G: GraphView<Vertex = V>,
    {
        let index = self.component_index();
        let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); self.len()];

        for (source_id, group) in self.groups.iter().enumerate() {
            for vertex in group {
                for edge in graph.out_edges(vertex)? {
                    let head = graph.head(&edge);
                    let target_id = *index
                        .get(&head)
                        .ok_or_else(|| SCCError::unknown_vertex(&head))?;
                    if target_id != source_id {
                        successors[source_id].insert(target_id);
                    }
                }
            }
        }

        Ok(Condensation {
            successors: successors
                .into_iter()
                .map(|targets| targets.into_iter().collect())
                .collect(),
        })
    }
}

impl<V> IntoIterator for Components<V> {
    type Item = Vec<V>;
    type IntoIter = std::vec::IntoIter<Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// The acyclic graph of components. Node `i` is the `i`-th group of the
/// [`Components`] it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condensation {
    /// Sorted, deduplicated successor components of each component
    pub successors: Vec<Vec<usize>>,
}

impl Condensation {
    pub fn component_count(&self) -> usize {
        self.successors.len()
    }

    /// Groups the components into levels: level 0 holds the components without
    /// incoming edges, and every other component sits one level below its
    /// deepest predecessor.
    pub fn topological_levels(&self) -> Vec<Vec<usize>> {
        let count = self.component_count();
        let mut in_degree = vec![0usize; count];
        for targets in &self.successors {
            for &target in targets {
                in_degree[target] += 1;
            }
        }

        let mut level = vec![0usize; count];
        let mut queue: VecDeque<usize> = (0..count).filter(|&c| in_degree[c] == 0).collect();
        let mut levels: Vec<Vec<usize>> = Vec::new();

        while let Some(component) = queue.pop_front() {
            let current = level[component];
            if levels.len() <= current {
                levels.resize_with(current + 1, Vec::new);
            }
            levels[current].push(component);

            for &next in &self.successors[component] {
                level[next] = level[next].max(current + 1);
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }
        levels
    }
}

#[cfg(test)]
mod test_components {
    use super::*;

    fn sample() -> (Vec<Vec<usize>>, Components<usize>) {
        // 0 <-> 1 -> 2 <-> 3, 4 isolated
        let graph = vec![vec![1], vec![0, 2], vec![3], vec![2], vec![]];
        let components = Components::from_groups(vec![vec![3, 2], vec![1, 0], vec![4]]);
        (graph, components)
    }

    #[test]
    fn test_accessors() {
        let (_, components) = sample();

        assert_eq!(components.len(), 3);
        assert!(!components.is_empty());
        assert_eq!(components.component_of(&0), Some(&[1usize, 0][..]));
        assert!(components.contains_vertex(&4));
        assert!(!components.contains_vertex(&5));
        assert_eq!(components.largest().map(|g| g.len()), Some(2));

        let index = components.component_index();
        assert_eq!(index[&2], index[&3]);
        assert_ne!(index[&1], index[&2]);
    }

    #[test]
    fn test_same_partition_ignores_order() {
        let (_, components) = sample();
        let shuffled = Components::from_groups(vec![vec![4], vec![0, 1], vec![2, 3]]);
        assert!(components.same_partition(&shuffled));

        let different = Components::from_groups(vec![vec![4], vec![0], vec![1], vec![2, 3]]);
        assert!(!components.same_partition(&different));
    }

    #[test]
    fn test_validate() {
        let (graph, components) = sample();
        assert!(components.validate(&graph).is_ok());

        let missing = Components::from_groups(vec![vec![0, 1], vec![2, 3]]);
        assert!(matches!(
            missing.validate(&graph),
            Err(SCCError::InvalidPartition { .. })
        ));

        let overlapping = Components::from_groups(vec![vec![0, 1], vec![1, 2, 3], vec![4]]);
        assert!(overlapping.validate(&graph).is_err());

        let foreign = Components::from_groups(vec![vec![0, 1, 2, 3, 4], vec![9]]);
        assert!(foreign.validate(&graph).is_err());

        let empty_group = Components::from_groups(vec![vec![0, 1, 2, 3, 4], vec![]]);
        assert!(empty_group.validate(&graph).is_err());
    }

    #[test]
    fn test_condensation_levels() {
        let (graph, components) = sample();
        let dag = components.condensation(&graph).unwrap();

        // {0,1} is group 1, {2,3} is group 0, {4} is group 2
        assert_eq!(dag.successors, vec![vec![], vec![0], vec![]]);
        assert_eq!(dag.topological_levels(), vec![vec![1, 2], vec![0]]);
    }

    #[test]
    fn test_condensation_deepest_predecessor() {
        // a -> b -> c and a -> c: c sits below b, not next to it
        let graph = vec![vec![1, 2], vec![2], vec![]];
        let components = Components::from_groups(vec![vec![0], vec![1], vec![2]]);
        let dag = components.condensation(&graph).unwrap();
        assert_eq!(dag.topological_levels(), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_empty() {
        let components: Components<usize> = Components::from_groups(vec![]);
        let graph: Vec<Vec<usize>> = vec![];
        assert!(components.is_empty());
        assert!(components.validate(&graph).is_ok());
        assert!(components.condensation(&graph).unwrap().topological_levels().is_empty());
    }
}
