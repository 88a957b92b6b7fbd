use std::collections::HashMap;

use rocket::{serde::json::Json, Route};

use crate::{
    engine,
    error::{Error, Result},
    logging::RequestId,
    model::{
        api::{
            auth::AuthToken,
            comparison::{ComparisonOrder, MemberComparison},
        },
        db::{Group, Member, Membership, Question, Response},
        mongodb::{Coll, Id},
        store::ResponseStore,
    },
};

use super::common::{group_by_id, is_member, live_group_questions, require_membership};

pub fn routes() -> Vec<Route> {
    routes![compare_with_member]
}

#[allow(clippy::too_many_arguments)]
#[get("/groups/<group_id>/compare/<user_id>?<order>")]
async fn compare_with_member(
    token: AuthToken,
    group_id: Id,
    user_id: Id,
    order: Option<ComparisonOrder>,
    request_id: &RequestId,
    groups: Coll<Group>,
    memberships: Coll<Membership>,
    members: Coll<Member>,
    questions: Coll<Question>,
    responses: Coll<Response>,
) -> Result<Json<MemberComparison>> {
    let me = token.member_id();
    engine::ensure_distinct(me, user_id)?;

    group_by_id(&groups, group_id).await?;
    require_membership(&memberships, group_id, me).await?;
    if !is_member(&memberships, group_id, user_id).await? {
        return Err(Error::not_found(format!(
            "Member with ID '{user_id}' in group '{group_id}'"
        )));
    }
    let target = members
        .find_one(user_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Member with ID '{user_id}'")))?;

    let group_questions = live_group_questions(&questions, group_id).await?;
    let question_ids = group_questions.iter().map(|q| q.id).collect::<Vec<_>>();
    let mut by_user = responses
        .responses_by_users(&[me, user_id], &question_ids)
        .await?;
    let mine = by_user.remove(&me).unwrap_or_default();
    let theirs = by_user.remove(&user_id).unwrap_or_default();

    let metadata = group_questions
        .into_iter()
        .map(|q| (q.id, q))
        .collect::<HashMap<_, _>>();
    let summary = engine::compare_members(
        me,
        user_id,
        &mine,
        &theirs,
        &metadata,
        order.unwrap_or_default(),
    )?;
    debug!(
        "req{request_id} compared {me} with {user_id}: {}/{} matched",
        summary.matched_answers, summary.common_questions
    );

    Ok(Json(MemberComparison {
        target_user_id: user_id.into(),
        target_name: target.member.display_name,
        summary,
    }))
}
