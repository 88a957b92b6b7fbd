use std::collections::HashSet;

use rocket::{serde::json::Json, Route, State};

use crate::{
    engine,
    error::Result,
    model::{
        api::{auth::AuthToken, stats::GroupResponses},
        db::{Group, Membership, Question, Response},
        mongodb::{Coll, Id},
        store::{ResponseStore, TagFilterResolver, TagIndex},
    },
    Config,
};

use super::common::{group_by_id, group_member_ids, live_group_questions, require_membership};

pub fn routes() -> Vec<Route> {
    routes![group_responses]
}

/// Vote totals of a group's members on the group's questions, optionally
/// limited to one tag. A blank tag means no filter.
#[allow(clippy::too_many_arguments)]
#[get("/groups/<group_id>/responses?<tag>")]
async fn group_responses(
    token: AuthToken,
    group_id: Id,
    tag: Option<&str>,
    config: &State<Config>,
    groups: Coll<Group>,
    memberships: Coll<Membership>,
    questions: Coll<Question>,
    responses: Coll<Response>,
    tags: TagIndex,
) -> Result<Json<GroupResponses>> {
    group_by_id(&groups, group_id).await?;
    require_membership(&memberships, group_id, token.member_id()).await?;

    let members = group_member_ids(&memberships, group_id)
        .await?
        .into_iter()
        .collect::<HashSet<_>>();
    let total_members = members.len() as u64;

    let tag_filter = match tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(name) => Some(tags.resolve(name).await?),
        None => None,
    };
    if tag_filter.as_ref().map_or(false, HashSet::is_empty) {
        return Ok(Json(GroupResponses {
            questions: Vec::new(),
            total_members,
        }));
    }

    let group_questions = live_group_questions(&questions, group_id).await?;
    let question_ids = group_questions
        .iter()
        .map(|q| q.id)
        .filter(|id| tag_filter.as_ref().map_or(true, |f| f.contains(id)))
        .collect::<Vec<_>>();
    let votes = responses.responses_to_questions(&question_ids).await?;
    let tag_names = tags.names_for(&group_questions).await?;

    let questions = engine::group_stats(
        &group_questions,
        &votes,
        &members,
        tag_filter.as_ref(),
        &tag_names,
        config.zero_response_policy(),
    );
    Ok(Json(GroupResponses {
        questions,
        total_members,
    }))
}
