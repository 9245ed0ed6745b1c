use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::path::PathBuf;

use graph_community_engine::cluster::detection;
use graph_community_engine::config::Config;
use graph_community_engine::data::{self, partition, GraphFormat, IndexBase};
use graph_community_engine::storage;
use graph_community_engine::{Clustering, ConductancePolicy};

#[derive(Parser, Debug)]
#[clap(
    name = "graph-community-engine",
    about = "Load a graph and evaluate community partitions of it"
)]
struct Cli {
    /// Path to input graph file
    #[clap(short = 'i', long)]
    input: PathBuf,

    /// Vertex ids in the input start at 0 instead of 1
    #[clap(short = 'z', long)]
    zero_based: bool,

    /// Input format: gml, edgelist or net (guessed from the extension if omitted)
    #[clap(short = 'f', long)]
    format: Option<String>,

    /// Initial partition file (JSON array, -1 = own community); may be repeated
    #[clap(short = 'p', long = "partition")]
    partitions: Vec<PathBuf>,

    /// Also evaluate the partition into connected components
    #[clap(long)]
    seed_components: bool,

    /// Components smaller than this start as singletons
    #[clap(long, default_value = "2")]
    min_component_size: usize,

    /// Conductance aggregation reported as the headline value
    #[clap(long, value_enum, default_value = "worst-case")]
    conductance: ConductancePolicy,

    /// Output directory for results
    #[clap(short, long, default_value = "community_results")]
    output_dir: String,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

/// Headline numbers of one evaluated partition
struct RunReport {
    name: String,
    communities: usize,
    modularity: f64,
    conductance: f64,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let format = match &args.format {
        Some(name) => {
            log::info!("Input file format is: {}", name);
            Some(GraphFormat::from_name(name).ok_or_else(|| anyhow!("unknown graph format: {name}"))?)
        }
        None => None,
    };

    let index_base = if args.zero_based {
        log::info!("Setting index to 0-based");
        IndexBase::Zero
    } else {
        IndexBase::One
    };

    let config = Config::new(
        index_base,
        format,
        args.conductance,
        args.output_dir.clone(),
        args.threads,
    );

    let num_threads = config.worker_threads();
    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    // 1. Load the graph
    log::info!("Input file: {}", args.input.display());
    let graph = data::load_graph(&args.input, config.format, config.index_base)?;

    log::info!("The number of vertices in this graph is = {}", graph.num_vertices());
    log::info!("The number of edges in this graph is = {}", graph.num_edges());
    log::debug!("Graph uses about {} bytes", graph.memory_usage());

    storage::save_graph_stats(&graph, &config.output_dir)?;

    // 2. Collect the partitions to evaluate
    let mut runs = vec![(
        "singletons".to_string(),
        partition::singleton_partition(graph.num_vertices()),
    )];

    for path in &args.partitions {
        let labels = partition::read_partition(path)
            .with_context(|| format!("reading partition {}", path.display()))?;
        let name = path
            .file_stem()
            .map_or_else(|| "partition".to_string(), |s| s.to_string_lossy().into_owned());
        runs.push((name, labels));
    }

    if args.seed_components {
        runs.push((
            "components".to_string(),
            detection::component_partition(&graph, args.min_component_size),
        ));
    }

    // 3. Evaluate each partition on its own clustering over the shared graph
    let reports: Vec<RunReport> = runs
        .par_iter()
        .map(|(name, labels)| -> Result<RunReport> {
            let clustering = Clustering::with_initial_partition(&graph, labels)
                .with_context(|| format!("building partition {name}"))?;

            storage::save_results(&clustering, name, config.conductance_policy, &config.output_dir)?;

            Ok(RunReport {
                name: name.clone(),
                communities: clustering.num_communities(),
                modularity: clustering.modularity(),
                conductance: clustering.conductance(config.conductance_policy),
            })
        })
        .collect::<Result<_>>()?;

    for report in &reports {
        log::info!(
            "{}: {} communities, modularity {:.6}, conductance ({:?}) {:.6}",
            report.name,
            report.communities,
            report.modularity,
            config.conductance_policy,
            report.conductance
        );
    }

    log::info!("Analysis complete. Results saved to {}", config.output_dir);

    Ok(())
}
