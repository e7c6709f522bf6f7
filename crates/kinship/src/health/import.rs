use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{CircleMembership, ContactId, Tier, UserId};
use crate::import::{read_rows, ImportError};

/// Reads `user_id,contact_id,tier` exports of tiered circle placements.
pub struct MembershipImporter;

impl MembershipImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<(UserId, CircleMembership)>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<(UserId, CircleMembership)>, ImportError> {
        read_rows(reader, |row: MembershipRow| {
            let user_id = UserId::parse(&row.user_id)?;
            let contact_id = ContactId::parse(&row.contact_id)?;
            Ok((user_id, CircleMembership::new(contact_id, Tier(row.tier))))
        })
    }
}

#[derive(Debug, Deserialize)]
struct MembershipRow {
    user_id: String,
    contact_id: String,
    tier: u8,
}
