use serde::{Deserialize, Serialize};

use crate::model::api::id::ApiId;

/// How closely another member's answers match the caller's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityEntry {
    pub user_id: ApiId,
    pub display_name: String,
    pub common_questions: usize,
    pub matched_answers: usize,
    pub match_percentage: f64,
}

/// Body of the similarity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityRanking {
    pub users: Vec<SimilarityEntry>,
    /// Explains an empty ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
