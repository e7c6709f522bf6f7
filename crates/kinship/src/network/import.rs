use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{ConnectionEdge, ConnectionType, NetworkContact, NodeId};
use crate::error::InvalidInput;
use crate::health::UserId;
use crate::import::{empty_string_as_none, read_rows, ImportError};

/// Reads `source_id,target_id[,connection_type,strength]` exports into connection edges.
pub struct EdgeImporter;

impl EdgeImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ConnectionEdge>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ConnectionEdge>, ImportError> {
        read_rows(reader, |row: EdgeRow| {
            Ok(ConnectionEdge {
                source_id: NodeId(row.source_id),
                target_id: NodeId(row.target_id),
                connection_type: row.connection_type.as_deref().map(ConnectionType::parse),
                strength: row.strength.and_then(|raw| raw.parse::<u8>().ok()),
            })
        })
    }
}

/// Reads `user_id,node_id,name[,company,title]` exports: each row is one entry of a user's
/// own contact list.
pub struct ContactImporter;

impl ContactImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<(UserId, NetworkContact)>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<(UserId, NetworkContact)>, ImportError> {
        read_rows(reader, |row: ContactRow| {
            let user_id = UserId::parse(&row.user_id)?;
            let node_id = NodeId::new(row.node_id);
            if node_id.is_blank() {
                return Err(InvalidInput::MissingIdentifier { field: "node_id" });
            }
            let contact = NetworkContact {
                node_id,
                name: row.name,
                company: row.company,
                title: row.title,
            };
            Ok((user_id, contact))
        })
    }
}

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source_id: String,
    target_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    connection_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    strength: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContactRow {
    user_id: String,
    node_id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
}
