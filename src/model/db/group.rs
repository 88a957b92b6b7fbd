use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// A named set of members who can see each other's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
}

/// One member's membership of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub group_id: Id,
    pub user_id: Id,
}

impl Membership {
    /// Filter matching this exact membership.
    pub fn filter(group_id: Id, user_id: Id) -> Document {
        doc! {
            "group_id": group_id,
            "user_id": user_id,
        }
    }
}
