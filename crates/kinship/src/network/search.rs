use serde::Serialize;

use super::domain::{NetworkContact, NetworkSnapshot, NodeId, TargetDescriptor};
use super::graph::build_graph;
use crate::error::InvalidInput;

/// Result of looking for a target person inside the owner's own network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PathLookup {
    Connected {
        contact: NetworkContact,
        path: Vec<NodeId>,
    },
    /// The contact is in the owner's list but no chain of at most `max_depth` edges reaches
    /// them.
    Unreachable {
        contact: NetworkContact,
        max_depth: usize,
    },
    NotInNetwork {
        target: String,
    },
}

impl PathLookup {
    /// Hops between the owner and the matched contact.
    pub fn degrees(&self) -> Option<usize> {
        match self {
            PathLookup::Connected { path, .. } => Some(path.len().saturating_sub(1)),
            PathLookup::Unreachable { .. } | PathLookup::NotInNetwork { .. } => None,
        }
    }
}

/// Find the target among the owner's contacts (case-insensitive substring on name) and route
/// to them through the connection graph.
///
/// When several contacts match, the one with the shortest graph path wins, ties going to the
/// earlier contact. Matches that the graph cannot reach within `max_depth` only surface as
/// [`PathLookup::Unreachable`] when no match is reachable. Discovery outside the network is
/// left to the caller.
pub fn find_path_to_target(
    owner: &NodeId,
    target: &TargetDescriptor,
    snapshot: &NetworkSnapshot,
    max_depth: usize,
) -> Result<PathLookup, InvalidInput> {
    let needle = target.name.trim().to_lowercase();
    if needle.is_empty() {
        return Err(InvalidInput::MissingIdentifier {
            field: "target.name",
        });
    }

    let matches: Vec<&NetworkContact> = snapshot
        .contacts
        .iter()
        .filter(|contact| contact.name.to_lowercase().contains(&needle))
        .collect();
    if matches.is_empty() {
        return Ok(PathLookup::NotInNetwork {
            target: target.name.trim().to_string(),
        });
    }

    let graph = build_graph(&snapshot.edges);
    let best = matches
        .iter()
        .filter_map(|contact| {
            graph
                .find_path(owner, &contact.node_id, max_depth)
                .map(|path| (*contact, path))
        })
        .min_by_key(|(_, path)| path.len());

    Ok(match (best, matches.first()) {
        (Some((contact, path)), _) => PathLookup::Connected {
            contact: contact.clone(),
            path,
        },
        (None, Some(contact)) => PathLookup::Unreachable {
            contact: (*contact).clone(),
            max_depth,
        },
        (None, None) => PathLookup::NotInNetwork {
            target: target.name.trim().to_string(),
        },
    })
}
