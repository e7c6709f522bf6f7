use clap::Args;
use kinship::error::AppError;
use kinship::health::{
    calculate_health_score, status_from_score, tier_target_days, HealthStatus, Tier,
};
use kinship::network::{
    build_graph, calculate_network_stats, ConnectionGraph, EdgeImporter, NetworkStats, NodeId,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATHS,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Days since the last interaction
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) days: i64,
    /// Relationship tier (1 = closest). Omit for the default monthly cadence.
    #[arg(long)]
    pub(crate) tier: Option<u8>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PathArgs {
    /// CSV export with source_id,target_id columns
    #[arg(long)]
    pub(crate) edges: PathBuf,
    #[arg(long)]
    pub(crate) from: String,
    #[arg(long)]
    pub(crate) to: String,
    /// List up to --max-paths paths instead of only the shortest
    #[arg(long)]
    pub(crate) all: bool,
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub(crate) max_depth: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_PATHS)]
    pub(crate) max_paths: usize,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// CSV export with source_id,target_id columns
    #[arg(long)]
    pub(crate) edges: PathBuf,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ScoreSummary {
    pub(crate) days_since_contact: i64,
    pub(crate) target_days: u32,
    pub(crate) health_score: u8,
    pub(crate) status: HealthStatus,
    pub(crate) color: &'static str,
}

pub(crate) fn score_summary(days: i64, tier: Option<u8>) -> ScoreSummary {
    let target_days = tier_target_days(tier.map(Tier));
    let health_score = calculate_health_score(days, target_days);
    let status = status_from_score(health_score);
    ScoreSummary {
        days_since_contact: days,
        target_days,
        health_score,
        status,
        color: status.color(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PathListing {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) paths: Vec<Vec<NodeId>>,
}

pub(crate) fn path_listing(graph: &ConnectionGraph, args: &PathArgs) -> PathListing {
    let from = NodeId::new(args.from.trim());
    let to = NodeId::new(args.to.trim());
    let paths = if args.all {
        graph.find_all_paths(&from, &to, args.max_paths, args.max_depth)
    } else {
        graph
            .find_path(&from, &to, args.max_depth)
            .into_iter()
            .collect()
    };
    PathListing { from, to, paths }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let summary = score_summary(args.days, args.tier);
    if args.json {
        print_json(&summary);
        return Ok(());
    }

    println!(
        "Health score: {} ({}, {})",
        summary.health_score, summary.status, summary.color
    );
    println!(
        "  {} days since contact against a {}-day cadence",
        summary.days_since_contact, summary.target_days
    );
    Ok(())
}

pub(crate) fn run_path(args: PathArgs) -> Result<(), AppError> {
    let edges = EdgeImporter::from_path(&args.edges)?;
    let graph = build_graph(&edges);
    let listing = path_listing(&graph, &args);
    if args.json {
        print_json(&listing);
        return Ok(());
    }

    if listing.paths.is_empty() {
        println!(
            "No path from {} to {} within {} hops",
            listing.from, listing.to, args.max_depth
        );
        return Ok(());
    }
    for (index, path) in listing.paths.iter().enumerate() {
        println!(
            "{}. {} ({} hops)",
            index + 1,
            render_path(path),
            path.len().saturating_sub(1)
        );
    }
    Ok(())
}

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let edges = EdgeImporter::from_path(&args.edges)?;
    let stats = calculate_network_stats(&build_graph(&edges));
    if args.json {
        print_json(&stats);
        return Ok(());
    }

    render_stats(&stats);
    Ok(())
}

fn render_stats(stats: &NetworkStats) {
    println!("Network summary");
    println!("  People: {}", stats.node_count);
    println!("  Connections: {}", stats.edge_count);
    println!("  Most connected: {} links", stats.max_degree);
    println!("  Average links: {:.1}", stats.avg_degree);
    println!("  Density: {:.3}", stats.density);
}

fn render_path(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to render JSON: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship::network::ConnectionEdge;

    fn path_args(all: bool) -> PathArgs {
        PathArgs {
            edges: PathBuf::from("unused.csv"),
            from: " A ".to_string(),
            to: "D".to_string(),
            all,
            max_depth: DEFAULT_MAX_DEPTH,
            max_paths: DEFAULT_MAX_PATHS,
            json: false,
        }
    }

    fn diamond() -> ConnectionGraph {
        build_graph(&[
            ConnectionEdge::new("A", "B"),
            ConnectionEdge::new("A", "C"),
            ConnectionEdge::new("B", "D"),
            ConnectionEdge::new("C", "D"),
        ])
    }

    #[test]
    fn score_summary_uses_tier_cadence() {
        let summary = score_summary(14, Some(2));
        assert_eq!(summary.target_days, 14);
        assert_eq!(summary.health_score, 50);
        assert_eq!(summary.status, HealthStatus::AtRisk);
        assert_eq!(summary.color, HealthStatus::AtRisk.color());
    }

    #[test]
    fn score_summary_defaults_to_monthly_cadence() {
        let summary = score_summary(0, None);
        assert_eq!(summary.target_days, 30);
        assert_eq!(summary.health_score, 100);
    }

    #[test]
    fn path_listing_trims_endpoints() {
        let listing = path_listing(&diamond(), &path_args(false));
        assert_eq!(listing.from.as_str(), "A");
        assert_eq!(listing.paths.len(), 1);
        assert_eq!(render_path(&listing.paths[0]), "A -> B -> D");
    }

    #[test]
    fn path_listing_can_enumerate_alternatives() {
        let listing = path_listing(&diamond(), &path_args(true));
        assert_eq!(listing.paths.len(), 2);
        assert!(listing.paths.iter().all(|path| path.len() == 3));
    }
}
