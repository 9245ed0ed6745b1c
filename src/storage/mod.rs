//! Results persistence module

use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::cluster::{Clustering, ConductancePolicy};
use crate::graph::algorithms::{degree_distribution, graph_stats};
use crate::graph::Graph;

/// Save one evaluated partition under `output_dir/name`
pub fn save_results(
    clustering: &Clustering<'_>,
    name: &str,
    policy: ConductancePolicy,
    output_dir: &str,
) -> Result<()> {
    let run_dir = Path::new(output_dir).join(name);
    log::info!(
        "Saving {} communities to {}",
        clustering.num_communities(),
        run_dir.display()
    );

    fs::create_dir_all(&run_dir)?;

    save_summary(clustering, policy, &run_dir)?;
    save_communities(clustering, &run_dir)?;
    save_partition(clustering, &run_dir)?;

    Ok(())
}

/// Save summary information
fn save_summary(clustering: &Clustering<'_>, policy: ConductancePolicy, run_dir: &Path) -> Result<()> {
    let sizes: Vec<usize> = clustering.communities().map(|c| c.len()).collect();
    let count = sizes.len();

    let summary = json!({
        "graph": {
            "num_vertices": clustering.graph().num_vertices(),
            "num_edges": clustering.graph().num_edges(),
        },
        "partition": {
            "community_count": count,
            "largest_community_size": sizes.iter().max().copied().unwrap_or(0),
            "smallest_community_size": sizes.iter().min().copied().unwrap_or(0),
            "avg_community_size": sizes.iter().sum::<usize>() as f64 /
                                  if count == 0 { 1.0 } else { count as f64 },
            "crossing_community_pairs": clustering.community_edges().len(),
        },
        "modularity": clustering.modularity(),
        "conductance": {
            "policy": policy,
            "value": clustering.conductance(policy),
            "worst_case": clustering.conductance(ConductancePolicy::WorstCase),
            "weighted_average": clustering.conductance(ConductancePolicy::WeightedAverage),
        }
    });

    let mut file = File::create(run_dir.join("summary.json"))?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save per-community statistics, largest first
fn save_communities(clustering: &Clustering<'_>, run_dir: &Path) -> Result<()> {
    let mut summaries = clustering.summaries();
    summaries.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));

    let mut file = File::create(run_dir.join("communities.json"))?;
    file.write_all(to_string_pretty(&json!({ "communities": summaries }))?.as_bytes())?;

    Ok(())
}

/// Save the vertex -> community vector; it can be read back as an initial partition
fn save_partition(clustering: &Clustering<'_>, run_dir: &Path) -> Result<()> {
    let mut file = File::create(run_dir.join("partition.json"))?;
    file.write_all(serde_json::to_string(&clustering.assignment())?.as_bytes())?;

    Ok(())
}

/// Save graph statistics
pub fn save_graph_stats(graph: &Graph, output_dir: &str) -> Result<()> {
    log::info!("Saving graph statistics");

    fs::create_dir_all(output_dir)?;
    let path = Path::new(output_dir).join("graph_stats.json");
    let mut file = File::create(path)?;

    let stats = json!({
        "stats": graph_stats(graph),
        "degree_distribution": degree_distribution(graph, 100),
    });

    file.write_all(to_string_pretty(&stats)?.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::partition::read_partition;
    use crate::graph::GraphBuilder;

    #[test]
    fn test_saved_partition_reloads() {
        let mut builder = GraphBuilder::with_capacity(4);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            builder.add_edge(a, b).unwrap();
        }
        let graph = builder.build();
        let clustering = Clustering::with_initial_partition(&graph, &[0, 0, 1, 1]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        save_results(&clustering, "halves", ConductancePolicy::WorstCase, out).unwrap();
        save_graph_stats(&graph, out).unwrap();

        let run_dir = dir.path().join("halves");
        assert!(run_dir.join("summary.json").exists());
        assert!(run_dir.join("communities.json").exists());
        assert!(dir.path().join("graph_stats.json").exists());

        let labels = read_partition(&run_dir.join("partition.json")).unwrap();
        let reloaded = Clustering::with_initial_partition(&graph, &labels).unwrap();
        assert_eq!(reloaded.assignment(), clustering.assignment());

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(run_dir.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["partition"]["community_count"], 2);
        assert_eq!(summary["conductance"]["policy"], "worst-case");
    }
}
