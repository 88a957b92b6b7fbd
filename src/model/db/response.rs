use serde::{Deserialize, Serialize};

use crate::model::{common::Choice, mongodb::Id};

/// One answer to one question.
///
/// A member answers a question at most once; this is enforced by a unique
/// index. Answers given without signing in have no `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: Id,
    #[serde(default)]
    pub user_id: Option<Id>,
    pub selected_option: Choice,
}

impl Response {
    pub fn new(question_id: Id, user_id: Id, selected_option: Choice) -> Self {
        Self {
            question_id,
            user_id: Some(user_id),
            selected_option,
        }
    }

    pub fn anonymous(question_id: Id, selected_option: Choice) -> Self {
        Self {
            question_id,
            user_id: None,
            selected_option,
        }
    }
}
