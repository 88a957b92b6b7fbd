use rocket::{serde::json::Json, Route, State};

use crate::{
    engine::{self, Candidate},
    error::Result,
    logging::RequestId,
    model::{
        api::{auth::AuthToken, similarity::SimilarityRanking},
        db::{Group, Member, Membership, Question, Response},
        mongodb::{Coll, Id},
        store::ResponseStore,
    },
    Config,
};

use super::common::{
    group_by_id, group_member_ids, live_group_questions, members_by_id, require_membership,
};

const NO_ANSWERS_MESSAGE: &str = "Answer some questions to see who thinks like you";
const NO_MATCHES_MESSAGE: &str = "Nobody has answered enough of the same questions yet";

pub fn routes() -> Vec<Route> {
    routes![similar_members]
}

#[allow(clippy::too_many_arguments)]
#[get("/groups/<group_id>/similarity?<limit>")]
async fn similar_members(
    token: AuthToken,
    group_id: Id,
    limit: Option<usize>,
    config: &State<Config>,
    request_id: &RequestId,
    groups: Coll<Group>,
    memberships: Coll<Membership>,
    members: Coll<Member>,
    questions: Coll<Question>,
    responses: Coll<Response>,
) -> Result<Json<SimilarityRanking>> {
    let me = token.member_id();
    group_by_id(&groups, group_id).await?;
    require_membership(&memberships, group_id, me).await?;

    let question_ids = live_group_questions(&questions, group_id)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect::<Vec<_>>();
    let member_ids = group_member_ids(&memberships, group_id).await?;
    let mut by_user = responses
        .responses_by_users(&member_ids, &question_ids)
        .await?;

    let mine = by_user.remove(&me).unwrap_or_default();
    if mine.is_empty() {
        return Ok(Json(SimilarityRanking {
            users: Vec::new(),
            message: Some(NO_ANSWERS_MESSAGE.to_string()),
        }));
    }

    // Candidates keep the order members joined in, which breaks ranking ties.
    let mut profiles = members_by_id(&members, &member_ids).await?;
    let candidates = member_ids
        .iter()
        .filter_map(|id| {
            let profile = profiles.remove(id)?;
            profile.status.is_normal().then(|| Candidate {
                user_id: profile.id,
                display_name: profile.member.display_name,
                status: profile.member.status,
                responses: by_user.remove(id).unwrap_or_default(),
            })
        })
        .collect::<Vec<_>>();

    let mut users = engine::rank(
        me,
        &mine,
        candidates,
        config.similarity_min_common_questions(),
    );
    users.truncate(limit.unwrap_or_else(|| config.similarity_limit()));
    debug!("req{request_id} returning {} similar members", users.len());

    let message = users.is_empty().then(|| NO_MATCHES_MESSAGE.to_string());
    Ok(Json(SimilarityRanking { users, message }))
}
