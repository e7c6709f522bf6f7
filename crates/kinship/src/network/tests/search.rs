use super::common::*;
use crate::error::InvalidInput;
use crate::network::domain::{NetworkContact, TargetDescriptor};
use crate::network::search::{find_path_to_target, PathLookup};

fn target(name: &str) -> TargetDescriptor {
    TargetDescriptor {
        name: name.to_string(),
        company: None,
        title: None,
    }
}

#[test]
fn matches_contacts_case_insensitively() {
    let lookup = find_path_to_target(&node("me"), &target("hamilton"), &snapshot(), 6)
        .expect("valid target");

    match &lookup {
        PathLookup::Connected { contact, path: found } => {
            assert_eq!(contact.name, "Margaret Hamilton");
            assert_eq!(found, &path(&["me", "grace", "linus", "margaret"]));
        }
        other => panic!("expected connection, got {other:?}"),
    }
    assert_eq!(lookup.degrees(), Some(3));
}

#[test]
fn shortest_match_wins_among_several() {
    let mut network = snapshot();
    network
        .contacts
        .insert(0, NetworkContact::new("linus", "Grace Linus"));

    let lookup =
        find_path_to_target(&node("me"), &target("GRACE"), &network, 6).expect("valid target");

    assert_eq!(lookup.degrees(), Some(1));
}

#[test]
fn contacts_without_graph_edges_are_unreachable() {
    let lookup =
        find_path_to_target(&node("me"), &target("turing"), &snapshot(), 6).expect("valid target");

    assert_eq!(
        lookup,
        PathLookup::Unreachable {
            contact: NetworkContact::new("alan", "Alan Turing"),
            max_depth: 6,
        }
    );
    assert_eq!(lookup.degrees(), None);
}

#[test]
fn reachable_match_beats_an_isolated_one() {
    let mut network = snapshot();
    network
        .contacts
        .insert(0, NetworkContact::new("ghost", "Margaret Ghost"));

    let lookup =
        find_path_to_target(&node("me"), &target("margaret"), &network, 6).expect("valid target");

    match &lookup {
        PathLookup::Connected { contact, path: found } => {
            assert_eq!(contact.node_id, node("margaret"));
            assert_eq!(found, &path(&["me", "grace", "linus", "margaret"]));
        }
        other => panic!("expected connection, got {other:?}"),
    }
}

#[test]
fn matches_beyond_the_depth_bound_are_unreachable() {
    let lookup =
        find_path_to_target(&node("me"), &target("hamilton"), &snapshot(), 2).expect("valid target");

    assert_eq!(
        lookup,
        PathLookup::Unreachable {
            contact: NetworkContact::new("margaret", "Margaret Hamilton"),
            max_depth: 2,
        }
    );
}

#[test]
fn unknown_targets_are_not_in_network() {
    let lookup = find_path_to_target(&node("me"), &target("  Barbara Liskov "), &snapshot(), 6)
        .expect("valid target");

    assert_eq!(
        lookup,
        PathLookup::NotInNetwork {
            target: "Barbara Liskov".to_string()
        }
    );
    assert_eq!(lookup.degrees(), None);
}

#[test]
fn blank_target_names_are_rejected() {
    let result = find_path_to_target(&node("me"), &target("   "), &snapshot(), 6);
    assert_eq!(
        result,
        Err(InvalidInput::MissingIdentifier {
            field: "target.name"
        })
    );
}
