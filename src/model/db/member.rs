use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::{common::MemberStatus, mongodb::Id};

/// Core member data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCore {
    /// Name shown to other members of the same groups.
    pub display_name: String,
    /// Accounts that are not `Normal` cannot sign in and are never ranked.
    #[serde(default)]
    pub status: MemberStatus,
}

/// A member from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub member: MemberCore,
}

impl Deref for Member {
    type Target = MemberCore;

    fn deref(&self) -> &Self::Target {
        &self.member
    }
}

impl DerefMut for Member {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.member
    }
}
