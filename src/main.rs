use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;

use scc_engine::{DirectedGraph, GraphView, KosarajuSharir, SCCAlgorithm, SCCConfig, SCCController};

#[derive(Parser, Debug, Serialize)]
#[command(author, version, about)]
struct Args {
    /// Path of the graph file (t/v/e line format)
    #[arg(short, long, default_value_t = String::from("data/example.graph"))]
    dataset: String,

    /// Engine to run.
    #[arg(short, long, value_enum)]
    algorithm: Option<SCCAlgorithm>,

    /// Run all engines concurrently and cross-check their partitions.
    #[arg(long)]
    all: bool,

    /// Thread count used with --all.
    #[arg(short, long)]
    num_threads: Option<usize>,

    /// YAML configuration file; command line flags take precedence.
    #[arg(short, long)]
    config: Option<String>,

    /// Print only the component containing this vertex.
    #[arg(short, long)]
    source_vertex: Option<u64>,

    /// Validate the partition against the graph.
    #[arg(long)]
    validate: bool,

    /// Print the components as YAML.
    #[arg(long)]
    dump: bool,
}

impl Args {
    /// Merges the optional config file with the command line flags.
    fn scc_config(&self) -> anyhow::Result<SCCConfig> {
        let mut scc_config = match &self.config {
            Some(path) => SCCConfig::from_yaml_file(path)
                .with_context(|| format!("failed to read config {}", path))?,
            None => SCCConfig::default(),
        };
        if let Some(algorithm) = self.algorithm {
            scc_config.algorithm = algorithm;
        }
        if let Some(thread_num) = self.num_threads {
            scc_config.thread_num = thread_num;
        }
        scc_config.validate |= self.validate;
        Ok(scc_config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = Args::parse();
    let scc_config = args.scc_config()?;

    // Step 1: Load the graph file
    let graph = DirectedGraph::load_graph_file(&args.dataset, true)
        .with_context(|| format!("failed to load graph {}", args.dataset))?;
    println!(
        "Loaded {}: {} vertices, {} edges.",
        args.dataset,
        graph.vertex_count(),
        graph.edge_count()
    );

    // Step 2: Single-component query
    if let Some(source_vertex) = args.source_vertex {
        if !graph.has_vertex(&source_vertex) {
            bail!("vertex {} is not in {}", source_vertex, args.dataset);
        }
        let start = Instant::now();
        let mut component = KosarajuSharir.component_containing(&graph, &source_vertex)?;
        let duration = start.elapsed();
        component.sort_unstable();
        println!("Component of {}: {:?}", source_vertex, component);
        println!("Component Elapsed Time: {:?} us", duration.as_micros());
        return Ok(());
    }

    // Step 3: Run the engine(s) and report the time
    let scc_controller = SCCController::new(Arc::new(graph));
    if args.all {
        let start = Instant::now();
        let results = scc_controller.scc_all(&scc_config)?;
        let duration = start.elapsed();
        for (algorithm, components) in &results {
            println!("{}: {} components.", algorithm, components.len());
        }
        println!("SCC (all engines) Elapsed Time: {:?} us", duration.as_micros());
        if args.dump {
            if let Some((_, components)) = results.first() {
                print!("{}", serde_yaml::to_string(components)?);
            }
        }
    } else {
        let start = Instant::now();
        let components = scc_controller.scc(&scc_config)?;
        let duration = start.elapsed();
        let largest = components.largest().map_or(0, |group| group.len());
        println!(
            "{}: {} components, largest has {} vertices.",
            scc_config.algorithm,
            components.len(),
            largest
        );
        println!("SCC Elapsed Time: {:?} us", duration.as_micros());
        if args.dump {
            print!("{}", serde_yaml::to_string(&components)?);
        }
    }
    Ok(())
}
