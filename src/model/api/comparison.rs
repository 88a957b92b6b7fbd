use rocket::FromFormField;
use serde::{Deserialize, Serialize};

use crate::model::{api::id::ApiId, common::Choice, db::Question};

/// How a comparison lists the shared questions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromFormField)]
pub enum ComparisonOrder {
    /// Ascending question ID, i.e. the order the questions were asked in.
    #[default]
    #[field(value = "as-answered")]
    AsAnswered,
    /// Agreements first, then disagreements; each part keeps `AsAnswered` order.
    #[field(value = "matches-first")]
    MatchesFirst,
}

/// Two members' answers to one question they both answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub question_id: ApiId,
    pub title: String,
    pub option_a: String,
    pub option_b: String,
    pub my_choice: Choice,
    pub their_choice: Choice,
    pub is_match: bool,
}

impl ComparisonResult {
    pub fn new(question: &Question, my_choice: Choice, their_choice: Choice) -> Self {
        Self {
            question_id: question.id.into(),
            title: question.title.clone(),
            option_a: question.option_a.clone(),
            option_b: question.option_b.clone(),
            my_choice,
            their_choice,
            is_match: my_choice == their_choice,
        }
    }
}

/// Everything two members have in common.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub common_questions: usize,
    pub matched_answers: usize,
    /// Percentage of common questions answered alike, to one decimal place.
    pub match_percentage: f64,
    pub comparisons: Vec<ComparisonResult>,
}

/// Body of the comparison endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberComparison {
    pub target_user_id: ApiId,
    pub target_name: String,
    #[serde(flatten)]
    pub summary: ComparisonSummary,
}
