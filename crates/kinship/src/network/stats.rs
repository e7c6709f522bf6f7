use serde::{Deserialize, Serialize};

use super::graph::ConnectionGraph;

/// Aggregate shape of a connection graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub max_degree: usize,
    pub avg_degree: f64,
    pub density: f64,
}

/// One pass over the adjacency sets; undirected edges are counted once.
pub fn calculate_network_stats(graph: &ConnectionGraph) -> NetworkStats {
    let node_count = graph.node_count();
    let (degree_sum, max_degree) = graph
        .degrees()
        .fold((0usize, 0usize), |(sum, max), degree| {
            (sum + degree, max.max(degree))
        });
    let edge_count = degree_sum / 2;

    let avg_degree = if node_count > 0 {
        round_tenths(degree_sum as f64 / node_count as f64)
    } else {
        0.0
    };
    let density = if node_count > 1 {
        (2 * edge_count) as f64 / (node_count * (node_count - 1)) as f64
    } else {
        0.0
    };

    NetworkStats {
        node_count,
        edge_count,
        max_degree,
        avg_degree,
        density,
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
