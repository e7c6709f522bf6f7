use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use tracing::debug;

use super::domain::{ConnectionEdge, NodeId};

/// "Six degrees of separation".
pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_MAX_PATHS: usize = 5;

/// Undirected adjacency built fresh from an edge snapshot.
///
/// Neighbour sets are ordered by node id, so among equally short paths the search always
/// returns the lexicographically first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionGraph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

/// Build an undirected graph. Duplicate edges collapse; self-loops are kept; edges with a blank
/// endpoint are skipped.
pub fn build_graph(edges: &[ConnectionEdge]) -> ConnectionGraph {
    let mut graph = ConnectionGraph::default();
    let mut skipped = 0usize;
    for edge in edges {
        if edge.is_well_formed() {
            graph.insert_edge(edge.source_id.clone(), edge.target_id.clone());
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!(skipped, "ignored malformed connection edges");
    }
    graph
}

impl ConnectionGraph {
    pub fn insert_edge(&mut self, a: NodeId, b: NodeId) {
        self.adjacency.entry(a.clone()).or_default().insert(b.clone());
        self.adjacency.entry(b).or_default().insert(a);
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn neighbors<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.adjacency.get(node).into_iter().flatten()
    }

    pub fn degree(&self, node: &NodeId) -> usize {
        self.adjacency.get(node).map_or(0, BTreeSet::len)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    pub(crate) fn degrees(&self) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.values().map(BTreeSet::len)
    }

    /// Breadth-first search for the shortest simple path of at most `max_depth` edges.
    ///
    /// Returns `[start]` when both ends are the same node and `None` when `start` is not in the
    /// graph or `end` is out of reach.
    pub fn find_path(
        &self,
        start: &NodeId,
        end: &NodeId,
        max_depth: usize,
    ) -> Option<Vec<NodeId>> {
        if start == end {
            return Some(vec![start.clone()]);
        }
        let (start, _) = self.adjacency.get_key_value(start)?;

        let mut parents: HashMap<&NodeId, &NodeId> = HashMap::new();
        let mut visited: HashSet<&NodeId> = HashSet::from([start]);
        let mut queue: VecDeque<(&NodeId, usize)> = VecDeque::from([(start, 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for next in self.neighbors(node) {
                if !visited.insert(next) {
                    continue;
                }
                parents.insert(next, node);
                if next == end {
                    return Some(trace_back(&parents, start, next));
                }
                queue.push_back((next, depth + 1));
            }
        }

        None
    }

    /// Depth-first enumeration of up to `max_paths` simple paths of at most `max_depth` edges,
    /// shortest first. Exploration stops as soon as `max_paths` paths are collected.
    pub fn find_all_paths(
        &self,
        start: &NodeId,
        end: &NodeId,
        max_paths: usize,
        max_depth: usize,
    ) -> Vec<Vec<NodeId>> {
        if max_paths == 0 {
            return Vec::new();
        }
        if start == end {
            return vec![vec![start.clone()]];
        }
        let Some((start, _)) = self.adjacency.get_key_value(start) else {
            return Vec::new();
        };

        let mut collector = PathCollector {
            graph: self,
            end,
            max_paths,
            max_depth,
            visited: HashSet::from([start]),
            path: vec![start],
            found: Vec::new(),
        };
        collector.explore(start);

        let mut found = collector.found;
        found.sort_by_key(Vec::len);
        found
    }
}

fn trace_back(parents: &HashMap<&NodeId, &NodeId>, start: &NodeId, end: &NodeId) -> Vec<NodeId> {
    let mut path = vec![end.clone()];
    let mut current = end;
    while current != start {
        match parents.get(current) {
            Some(parent) => {
                path.push((*parent).clone());
                current = *parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

struct PathCollector<'g> {
    graph: &'g ConnectionGraph,
    end: &'g NodeId,
    max_paths: usize,
    max_depth: usize,
    visited: HashSet<&'g NodeId>,
    path: Vec<&'g NodeId>,
    found: Vec<Vec<NodeId>>,
}

impl<'g> PathCollector<'g> {
    fn explore(&mut self, node: &'g NodeId) {
        if self.found.len() >= self.max_paths {
            return;
        }
        if node == self.end {
            let path = self.path.iter().map(|id| (*id).clone()).collect();
            self.found.push(path);
            return;
        }
        // path holds nodes, so it already spans `len - 1` edges.
        if self.path.len() > self.max_depth {
            return;
        }

        let graph = self.graph;
        for next in graph.neighbors(node) {
            if self.found.len() >= self.max_paths {
                break;
            }
            if !self.visited.insert(next) {
                continue;
            }
            self.path.push(next);
            self.explore(next);
            self.path.pop();
            self.visited.remove(next);
        }
    }
}
