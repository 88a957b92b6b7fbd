use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use mongodb::bson::{doc, DateTime, Document};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core question data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// The group the question was asked in.
    pub group_id: Id,
    /// The member who asked it.
    pub author_id: Id,
    pub title: String,
    pub option_a: String,
    pub option_b: String,
    #[serde(default)]
    pub tag_ids: BTreeSet<Id>,
    pub created_at: DateTime,
    /// Set when the question is soft-deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime>,
}

impl QuestionCore {
    /// Has this question not been deleted?
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Filter matching questions that have not been deleted.
    /// `null` also matches documents lacking the field.
    pub fn live_filter() -> Document {
        doc! { "deleted_at": null }
    }
}

/// A question from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub question: QuestionCore,
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.question
    }
}

impl DerefMut for Question {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.question
    }
}
