use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{
    api::stats::{AggregateStat, GroupStat, QuestionStats},
    common::Choice,
    db::{Question, Response},
    mongodb::Id,
};

use super::percent::{vote_percentages, ZeroResponsePolicy};

/// Raw vote counts for one question.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCount {
    pub option_a_count: u64,
    pub option_b_count: u64,
}

impl VoteCount {
    pub fn record(&mut self, choice: Choice) {
        match choice {
            Choice::A => self.option_a_count += 1,
            Choice::B => self.option_b_count += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.option_a_count + self.option_b_count
    }
}

/// A group and the IDs of its members.
#[derive(Debug, Clone)]
pub struct GroupScope {
    pub group_id: Id,
    pub group_name: String,
    pub members: HashSet<Id>,
}

/// Count votes per question.
///
/// With `scope`, only responses by those members count; anonymous responses
/// then never do. With `questions`, only responses to those questions count.
/// Questions nobody voted on are absent from the result.
pub fn aggregate<'a>(
    responses: impl IntoIterator<Item = &'a Response>,
    scope: Option<&HashSet<Id>>,
    questions: Option<&HashSet<Id>>,
) -> HashMap<Id, VoteCount> {
    let mut counts = HashMap::<Id, VoteCount>::new();
    for response in responses {
        if let Some(scope) = scope {
            match response.user_id {
                Some(user_id) if scope.contains(&user_id) => {}
                _ => continue,
            }
        }
        if let Some(questions) = questions {
            if !questions.contains(&response.question_id) {
                continue;
            }
        }
        counts
            .entry(response.question_id)
            .or_default()
            .record(response.selected_option);
    }
    counts
}

/// Present `counts` for `question`, naming its tags from `tag_names`.
/// Tags missing from `tag_names` are left out.
pub fn stat(
    question: &Question,
    counts: VoteCount,
    tag_names: &HashMap<Id, String>,
    policy: ZeroResponsePolicy,
) -> AggregateStat {
    let (option_a_percentage, option_b_percentage) = vote_percentages(counts, policy);
    AggregateStat {
        question_id: question.id.into(),
        title: question.title.clone(),
        option_a: question.option_a.clone(),
        option_b: question.option_b.clone(),
        total_responses: counts.total(),
        option_a_count: counts.option_a_count,
        option_b_count: counts.option_b_count,
        option_a_percentage,
        option_b_percentage,
        tags: question
            .tag_ids
            .iter()
            .filter_map(|tag_id| tag_names.get(tag_id).cloned())
            .collect(),
    }
}

/// Stats for every live question of a group, counting only its members' votes.
///
/// With `tag_filter`, only the questions it contains are listed, so an empty
/// filter lists nothing. Questions keep the order they were given in and are
/// listed even when nobody has answered them.
pub fn group_stats(
    questions: &[Question],
    responses: &[Response],
    members: &HashSet<Id>,
    tag_filter: Option<&HashSet<Id>>,
    tag_names: &HashMap<Id, String>,
    policy: ZeroResponsePolicy,
) -> Vec<AggregateStat> {
    let counts = aggregate(responses, Some(members), tag_filter);
    questions
        .iter()
        .filter(|q| q.is_live())
        .filter(|q| tag_filter.map_or(true, |filter| filter.contains(&q.id)))
        .map(|q| {
            let votes = counts.get(&q.id).copied().unwrap_or_default();
            stat(q, votes, tag_names, policy)
        })
        .collect()
}

/// Overall stats for one question and, if `groups` is given, the same stats
/// restricted to each group in turn. Every group is listed, even one whose
/// members have not answered.
pub fn stats_for_question(
    question: &Question,
    responses: &[Response],
    groups: Option<&[GroupScope]>,
    tag_names: &HashMap<Id, String>,
    policy: ZeroResponsePolicy,
) -> QuestionStats {
    let only_this = HashSet::from([question.id]);
    let votes = |scope: Option<&HashSet<Id>>| {
        aggregate(responses, scope, Some(&only_this))
            .remove(&question.id)
            .unwrap_or_default()
    };

    let overall = stat(question, votes(None), tag_names, policy);
    let per_group = groups.map(|groups| {
        groups
            .iter()
            .map(|group| GroupStat {
                group_id: group.group_id.into(),
                group_name: group.group_name.clone(),
                stat: stat(question, votes(Some(&group.members)), tag_names, policy),
            })
            .collect()
    });

    QuestionStats { overall, per_group }
}

/// Overall stats for each live question in `questions`, in the order given.
pub fn authored_question_stats(
    questions: &[Question],
    responses: &[Response],
    tag_names: &HashMap<Id, String>,
    policy: ZeroResponsePolicy,
) -> Vec<AggregateStat> {
    let counts = aggregate(responses, None, None);
    questions
        .iter()
        .filter(|q| q.is_live())
        .map(|q| {
            let votes = counts.get(&q.id).copied().unwrap_or_default();
            stat(q, votes, tag_names, policy)
        })
        .collect()
}
