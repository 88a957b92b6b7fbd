//! The answer-comparison and vote-aggregation engine.
//!
//! Everything here is a pure, synchronous function over data that has
//! already been fetched: nothing touches the database, blocks or fails
//! except for the self-comparison check in [`compare_members`]. Callers
//! fetch through [`crate::model::store`] first and run the engine after.
//!
//! Fetches are not snapshotted, so an answer submitted while a request is
//! being served may or may not be reflected in its result.

use std::collections::BTreeMap;

use crate::model::{common::Choice, mongodb::Id};

mod aggregate;
mod compare;
mod percent;
mod similarity;

pub use aggregate::{
    aggregate, authored_question_stats, group_stats, stat, stats_for_question, GroupScope,
    VoteCount,
};
pub use compare::{compare, compare_members, ensure_distinct, match_counts, MatchCounts};
pub use percent::{match_percentage, vote_percentages, ZeroResponsePolicy};
pub use similarity::{rank, Candidate, DEFAULT_MIN_COMMON_QUESTIONS};

/// One member's answers, keyed by question.
///
/// Ordered by question ID so that anything derived from it is deterministic.
pub type ResponseMap = BTreeMap<Id, Choice>;
