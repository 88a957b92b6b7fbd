use serde::{Deserialize, Serialize};

use crate::model::api::id::ApiId;

/// Vote totals and shares for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStat {
    pub question_id: ApiId,
    pub title: String,
    pub option_a: String,
    pub option_b: String,
    pub total_responses: u64,
    pub option_a_count: u64,
    pub option_b_count: u64,
    /// Whole-number percentage.
    pub option_a_percentage: u32,
    /// Whole-number percentage.
    pub option_b_percentage: u32,
    pub tags: Vec<String>,
}

/// An [`AggregateStat`] restricted to the members of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStat {
    pub group_id: ApiId,
    pub group_name: String,
    #[serde(flatten)]
    pub stat: AggregateStat,
}

/// Body of the question stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub overall: AggregateStat,
    /// Only present for signed-in callers: one entry per group they belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_group: Option<Vec<GroupStat>>,
}

/// Body of the group responses endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponses {
    pub questions: Vec<AggregateStat>,
    pub total_members: u64,
}

/// Body of the "my questions" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredQuestions {
    pub questions: Vec<AggregateStat>,
}
