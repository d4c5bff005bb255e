use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use rustc_hash::FxHashMap;

use crate::config::{HEADER_RESERVE_LIMIT, READ_BUFFER_SIZE};
use crate::error::{SCCError, SCCResult};
use crate::types::graph_query::{GraphView, VertexId};

pub mod graph_query;

/// An in-memory directed multigraph stored in CSR (Compressed Sparse Row) form.
///
/// Parallel edges and self-loops are kept exactly as they were supplied.
/// Vertex identities are arbitrary; a hash map translates them into the
/// dense positions used by the offset array.
///
/// # Type Parameters
/// - `V`: Type of the vertex identifiers
#[derive(Debug, Clone)]
pub struct DirectedGraph<V> {
    /// Vertices in insertion order
    vertex_list: Vec<V>,

    /// For each vertex position i, its out-neighbours are stored in
    /// neighbor_list[offsets[i]..offsets[i + 1]]
    offsets: Vec<usize>,

    /// Flattened adjacency list containing the heads of all edges
    neighbor_list: Vec<V>,

    /// Maps vertex IDs to their position in vertex_list
    vertex_index: FxHashMap<V, usize>,
}

impl<V> DirectedGraph<V>
where
    V: VertexId
{
    /// Creates a graph from a vertex set and an edge multiset.
    ///
    /// Repeated vertices are collapsed into one; repeated edges are kept.
    ///
    /// # Arguments
    /// * `vertices` - All vertices of the graph, including isolated ones
    /// * `edges` - `(tail, head)` pairs
    ///
    /// # Errors
    /// * `SCCError::UnknownVertex` - If an edge endpoint is not in `vertices`
    pub fn new<I, E>(vertices: I, edges: E) -> SCCResult<Self>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V)>,
    {
        let mut vertex_list = Vec::new();
        let mut vertex_index = FxHashMap::default();
        for vertex in vertices {
            if !vertex_index.contains_key(&vertex) {
                vertex_index.insert(vertex, vertex_list.len());
                vertex_list.push(vertex);
            }
        }

        let mut positioned_edges = Vec::new();
        for (tail, head) in edges {
            let tail_pos = *vertex_index
                .get(&tail)
                .ok_or_else(|| SCCError::unknown_vertex(&tail))?;
            if !vertex_index.contains_key(&head) {
                return Err(SCCError::unknown_vertex(&head));
            }
            positioned_edges.push((tail_pos, head));
        }

        Ok(Self::assemble(vertex_list, vertex_index, positioned_edges))
    }

    /// Creates a graph whose vertex set is exactly the set of edge endpoints,
    /// in order of first appearance.
    pub fn from_edges<E>(edges: E) -> Self
    where
        E: IntoIterator<Item = (V, V)>,
    {
        let mut vertex_list = Vec::new();
        let mut vertex_index = FxHashMap::default();
        let mut positioned_edges = Vec::new();

        for (tail, head) in edges {
            for vertex in [tail, head] {
                if !vertex_index.contains_key(&vertex) {
                    vertex_index.insert(vertex, vertex_list.len());
                    vertex_list.push(vertex);
                }
            }
            positioned_edges.push((vertex_index[&tail], head));
        }

        Self::assemble(vertex_list, vertex_index, positioned_edges)
    }

    /// Lays the edges out in CSR order. Edge order per tail is preserved.
    fn assemble(
        vertex_list: Vec<V>,
        vertex_index: FxHashMap<V, usize>,
        positioned_edges: Vec<(usize, V)>,
    ) -> Self {
        let vertex_count = vertex_list.len();

        // Count out-degrees, then prefix-sum them into offsets
        let mut offsets = vec![0usize; vertex_count + 1];
        for &(tail_pos, _) in &positioned_edges {
            offsets[tail_pos + 1] += 1;
        }
        for v in 0..vertex_count {
            offsets[v + 1] += offsets[v];
        }

        // Bucket each head into its tail's slot range
        let mut cursor = offsets.clone();
        let mut slots: Vec<Option<V>> = vec![None; positioned_edges.len()];
        for (tail_pos, head) in positioned_edges {
            slots[cursor[tail_pos]] = Some(head);
            cursor[tail_pos] += 1;
        }
        let neighbor_list = slots.into_iter().flatten().collect();

        Self {
            vertex_list,
            offsets,
            neighbor_list,
            vertex_index,
        }
    }

    /// Total number of edges, counting parallel edges and self-loops.
    pub fn edge_count(&self) -> usize {
        self.neighbor_list.len()
    }

    /// Heads of the out-edges of `vertex`, or `None` if it is not in the graph.
    pub fn neighbors(&self, vertex: &V) -> Option<&[V]> {
        let pos = *self.vertex_index.get(vertex)?;
        Some(&self.neighbor_list[self.offsets[pos]..self.offsets[pos + 1]])
    }

    /// Builds the transpose: every edge `v -> w` becomes `w -> v`.
    pub fn reversed(&self) -> Self {
        let mut positioned_edges = Vec::with_capacity(self.edge_count());
        for (pos, &vertex) in self.vertex_list.iter().enumerate() {
            for head in &self.neighbor_list[self.offsets[pos]..self.offsets[pos + 1]] {
                positioned_edges.push((self.vertex_index[head], vertex));
            }
        }
        Self::assemble(self.vertex_list.clone(), self.vertex_index.clone(), positioned_edges)
    }
}

impl DirectedGraph<u64> {
    /// Loads a graph from a text graph file without progress output.
    ///
    /// See [`DirectedGraph::load_graph_file`] for the format.
    pub fn from_graph_file<P: AsRef<Path>>(file_path: P) -> SCCResult<Self> {
        Self::load_graph_file(file_path, false)
    }

    /// Loads a graph from a text graph file.
    ///
    /// The format is line based:
    /// * `t <vertex_count> <edge_count>` - optional header, sizes the progress bar
    /// * `v <id> [label ...]` - declares a vertex; trailing fields are ignored
    /// * `e <src> <dst>` - declares an edge
    ///
    /// Blank lines and lines starting with `#` are skipped. When the file has
    /// no `v` lines, the vertex set is taken from the edge endpoints.
    ///
    /// # Arguments
    /// * `file_path` - Path of the graph file
    /// * `show_progress` - Whether to draw a progress bar while reading
    ///
    /// # Errors
    /// * `SCCError::Io` - If the file cannot be opened or read
    /// * `SCCError::GraphFormat` - If a line cannot be parsed
    /// * `SCCError::UnknownVertex` - If an edge references an undeclared vertex
    pub fn load_graph_file<P: AsRef<Path>>(file_path: P, show_progress: bool) -> SCCResult<Self> {
        let graph_file = File::open(file_path.as_ref())?;
        let graph_reader = BufReader::with_capacity(READ_BUFFER_SIZE, graph_file);

        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        let mut pb = ProgressBar::hidden();

        for (line_no, line) in graph_reader.lines().enumerate() {
            let line = line?;
            let line_no = line_no + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();

            match tokens.first() {
                None => continue,
                Some(token) if token.starts_with('#') => continue,
                Some(&"t") => {
                    let vertex_count = parse_field(&tokens, 1, line_no)?;
                    let edge_count = parse_field(&tokens, 2, line_no)?;
                    // The header is only a hint
                    vertices.reserve(reserve_hint(vertex_count));
                    edges.reserve(reserve_hint(edge_count));
                    if show_progress {
                        pb = loading_progress_bar(vertex_count.saturating_add(edge_count));
                    }
                }
                Some(&"v") => {
                    vertices.push(parse_field(&tokens, 1, line_no)?);
                    pb.inc(1);
                }
                Some(&"e") => {
                    let src = parse_field(&tokens, 1, line_no)?;
                    let dst = parse_field(&tokens, 2, line_no)?;
                    edges.push((src, dst));
                    pb.inc(1);
                }
                Some(other) => {
                    return Err(SCCError::GraphFormat {
                        line: line_no,
                        message: format!("unknown record type '{}'", other),
                    });
                }
            }
        }
        pb.finish_and_clear();

        debug!(
            "Loaded graph file {}: {} vertex records, {} edge records.",
            file_path.as_ref().display(),
            vertices.len(),
            edges.len()
        );

        if vertices.is_empty() {
            Ok(Self::from_edges(edges))
        } else {
            Self::new(vertices, edges)
        }
    }
}

/// Capacity to pre-allocate for a record count announced by the header.
fn reserve_hint(count: u64) -> usize {
    usize::try_from(count).map_or(HEADER_RESERVE_LIMIT, |count| count.min(HEADER_RESERVE_LIMIT))
}

/// Parses the numeric field at `pos` of a tokenized graph file line.
fn parse_field(tokens: &[&str], pos: usize, line_no: usize) -> SCCResult<u64> {
    let token = tokens.get(pos).ok_or_else(|| SCCError::GraphFormat {
        line: line_no,
        message: format!("missing field {}", pos),
    })?;
    token.parse::<u64>().map_err(|e| SCCError::GraphFormat {
        line: line_no,
        message: format!("invalid number '{}': {}", token, e),
    })
}

fn loading_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb.set_message("Graph Loading.");
    pb
}

impl<V> GraphView for DirectedGraph<V>
where
    V: VertexId
{
    type Vertex = V;
    type Edge = (V, V);

    fn vertices(&self) -> Vec<V> {
        self.vertex_list.clone()
    }

    fn out_edges(&self, vertex: &V) -> SCCResult<Vec<(V, V)>> {
        let neighbors = self
            .neighbors(vertex)
            .ok_or_else(|| SCCError::unknown_vertex(vertex))?;
        Ok(neighbors.iter().map(|&head| (*vertex, head)).collect())
    }

    fn head(&self, edge: &(V, V)) -> V {
        edge.1
    }

    fn tail(&self, edge: &(V, V)) -> V {
        edge.0
    }

    fn has_vertex(&self, vertex: &V) -> bool {
        self.vertex_index.contains_key(vertex)
    }

    fn vertex_count(&self) -> usize {
        self.vertex_list.len()
    }
}
