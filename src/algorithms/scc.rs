use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use clap::ValueEnum;
use log::info;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::algorithms::cmg::CheriyanMehlhornGabow;
use crate::algorithms::components::Components;
use crate::algorithms::kosaraju::KosarajuSharir;
use crate::algorithms::tarjan::Tarjan;
use crate::config::SCCConfig;
use crate::error::{SCCError, SCCResult};
use crate::types::graph_query::GraphView;

/// Trait for computing Strongly Connected Components (SCC) in a graph
///
/// Implementors partition the vertex set of any [`GraphView`] into maximal
/// groups of mutually reachable vertices. Every implementation must return
/// the same partition for the same graph; only the enumeration order of the
/// groups and of the vertices inside a group may differ.
///
/// An implementation keeps all traversal state local to one call, so the
/// same engine value may be used repeatedly and from several threads.
pub trait SCC {
    /// Computes strongly connected components in the graph
    ///
    /// # Arguments
    ///
    /// * `graph` - The read-only graph view to analyse
    ///
    /// # Returns
    ///
    /// * `Components` - Disjoint, non-empty groups covering every vertex;
    ///                  empty for a graph without vertices
    ///
    /// # Errors
    ///
    /// * `SCCError::UnknownVertex` - If the view reports an edge whose endpoint
    ///   is missing from its vertex enumeration. No components are returned.
    fn compute_components<G>(&self, graph: &G) -> SCCResult<Components<G::Vertex>>
    where
        G: GraphView;
}

/// Selects one of the interchangeable SCC engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SCCAlgorithm {
    /// Single DFS with low-link values
    Tarjan,
    /// Finish-order pass followed by a pass over reversed edges
    #[value(alias = "kosaraju")]
    KosarajuSharir,
    /// Single DFS with an open stack and a root-candidate stack
    #[value(alias = "cmg")]
    CheriyanMehlhornGabow,
}

impl SCCAlgorithm {
    pub const ALL: [SCCAlgorithm; 3] = [
        SCCAlgorithm::Tarjan,
        SCCAlgorithm::KosarajuSharir,
        SCCAlgorithm::CheriyanMehlhornGabow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SCCAlgorithm::Tarjan => "tarjan",
            SCCAlgorithm::KosarajuSharir => "kosaraju-sharir",
            SCCAlgorithm::CheriyanMehlhornGabow => "cheriyan-mehlhorn-gabow",
        }
    }
}

impl fmt::Display for SCCAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SCC for SCCAlgorithm {
    fn compute_components<G>(&self, graph: &G) -> SCCResult<Components<G::Vertex>>
    where
        G: GraphView,
    {
        match self {
            SCCAlgorithm::Tarjan => Tarjan.compute_components(graph),
            SCCAlgorithm::KosarajuSharir => KosarajuSharir.compute_components(graph),
            SCCAlgorithm::CheriyanMehlhornGabow => CheriyanMehlhornGabow.compute_components(graph),
        }
    }
}

/// Controller for Strongly Connected Components (SCC) algorithm operations
///
/// Holds a shared, read-only graph view and runs engines against it. Each run
/// gets fresh traversal state, so concurrent runs never share bookkeeping.
///
/// # Fields
///
/// * `graph` - Thread-safe reference (Arc) to the graph being analysed
pub struct SCCController<G> {
    graph: Arc<G>,
}

impl<G> SCCController<G>
where
    G: GraphView + Send + Sync,
{
    /// Creates a new controller over the provided graph view.
    pub fn new(graph: Arc<G>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &G {
        self.graph.as_ref()
    }

    /// Runs the engine named in `scc_config` once.
    ///
    /// When `scc_config.validate` is set the partition is checked against
    /// the graph before it is returned.
    pub fn scc(&self, scc_config: &SCCConfig) -> SCCResult<Components<G::Vertex>> {
        let start = Instant::now();
        let components = scc_config.algorithm.compute_components(self.graph())?;
        if scc_config.validate {
            components.validate(self.graph())?;
        }

        info!(
            "{}: {} components in {} us.",
            scc_config.algorithm,
            components.len(),
            start.elapsed().as_micros()
        );
        Ok(components)
    }

    /// Runs all engines concurrently on a pool of `scc_config.thread_num`
    /// threads and cross-checks their partitions.
    ///
    /// # Returns
    ///
    /// One `(algorithm, components)` pair per engine, in [`SCCAlgorithm::ALL`] order.
    ///
    /// # Errors
    ///
    /// * `SCCError::EngineDisagreement` - If any two engines return different partitions
    /// * Any error reported by an engine, or by validation when enabled
    pub fn scc_all(
        &self,
        scc_config: &SCCConfig,
    ) -> SCCResult<Vec<(SCCAlgorithm, Components<G::Vertex>)>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(scc_config.thread_num)
            .build()
            .map_err(|e| SCCError::ThreadPool(e.to_string()))?;

        let graph = self.graph();
        let outcomes: Vec<(SCCAlgorithm, SCCResult<Components<G::Vertex>>)> = pool.install(|| {
            SCCAlgorithm::ALL
                .par_iter()
                .map(|&algorithm| (algorithm, algorithm.compute_components(graph)))
                .collect()
        });

        let mut results = Vec::with_capacity(outcomes.len());
        for (algorithm, outcome) in outcomes {
            let components = outcome?;
            if scc_config.validate {
                components.validate(graph)?;
            }
            results.push((algorithm, components));
        }

        if let Some((reference_algorithm, reference)) = results.first() {
            for (algorithm, components) in &results[1..] {
                if !reference.same_partition(components) {
                    return Err(SCCError::EngineDisagreement {
                        left: reference_algorithm.to_string(),
                        right: algorithm.to_string(),
                    });
                }
            }
            info!("All engines agree on {} components.", reference.len());
        }
        Ok(results)
    }
}

#[cfg(test)]
mod test_scc_controller {
    use super::*;
    use crate::types::DirectedGraph;

    fn two_cycles() -> DirectedGraph<char> {
        DirectedGraph::new(
            vec!['a', 'b', 'c', 'd', 'e'],
            vec![('a', 'b'), ('b', 'a'), ('c', 'd'), ('d', 'c'), ('b', 'c')],
        )
        .unwrap()
    }

    #[test]
    fn test_algorithm_names() {
        for algorithm in SCCAlgorithm::ALL {
            let parsed = SCCAlgorithm::from_str(algorithm.name(), false).unwrap();
            assert_eq!(parsed, algorithm);
        }
        assert_eq!(
            SCCAlgorithm::from_str("cmg", false).unwrap(),
            SCCAlgorithm::CheriyanMehlhornGabow
        );
        assert_eq!(
            SCCAlgorithm::from_str("kosaraju", false).unwrap(),
            SCCAlgorithm::KosarajuSharir
        );
    }

    #[test]
    fn test_controller_single_engine() {
        let controller = SCCController::new(Arc::new(two_cycles()));
        for algorithm in SCCAlgorithm::ALL {
            let config = SCCConfig {
                thread_num: 1,
                algorithm,
                validate: true,
            };
            let components = controller.scc(&config).unwrap();
            assert_eq!(components.len(), 3);
            assert_eq!(components.component_of(&'e'), Some(&['e'][..]));
        }
    }

    #[test]
    fn test_controller_all_engines() {
        let controller = SCCController::new(Arc::new(two_cycles()));
        let config = SCCConfig {
            thread_num: 3,
            validate: true,
            ..SCCConfig::default()
        };

        let results = controller.scc_all(&config).unwrap();
        let algorithms: Vec<SCCAlgorithm> = results.iter().map(|(a, _)| *a).collect();
        assert_eq!(algorithms, SCCAlgorithm::ALL.to_vec());
        assert!(results.iter().all(|(_, c)| c.len() == 3));
    }

    #[test]
    fn test_controller_propagates_engine_error() {
        let broken: Vec<Vec<usize>> = vec![vec![0, 3]];
        let controller = SCCController::new(Arc::new(broken));
        assert!(matches!(
            controller.scc(&SCCConfig::default()),
            Err(SCCError::UnknownVertex { .. })
        ));
        assert!(matches!(
            controller.scc_all(&SCCConfig::default()),
            Err(SCCError::UnknownVertex { .. })
        ));
    }
}
