use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// A label that can be attached to questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
}
