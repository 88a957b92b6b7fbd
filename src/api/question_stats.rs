use std::slice;

use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};

use crate::{
    engine,
    error::{Error, Result},
    model::{
        api::{
            auth::AuthToken,
            stats::{AuthoredQuestions, QuestionStats},
        },
        db::{Group, Membership, Question, QuestionCore, Response},
        mongodb::{Coll, Id},
        store::{ResponseStore, TagIndex},
    },
    Config,
};

use super::common::member_group_scopes;

pub fn routes() -> Vec<Route> {
    routes![question_stats, my_questions]
}

/// Vote totals for one question. Anyone may ask; signed-in callers also get
/// the totals within each of their groups.
#[allow(clippy::too_many_arguments)]
#[get("/questions/<question_id>/stats")]
async fn question_stats(
    token: Option<AuthToken>,
    question_id: Id,
    config: &State<Config>,
    groups: Coll<Group>,
    memberships: Coll<Membership>,
    questions: Coll<Question>,
    responses: Coll<Response>,
    tags: TagIndex,
) -> Result<Json<QuestionStats>> {
    let mut filter = QuestionCore::live_filter();
    filter.insert("_id", question_id);
    let question = questions
        .find_one(filter, None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question with ID '{question_id}'")))?;

    let votes = responses.responses_to_questions(&[question.id]).await?;
    let scopes = match token {
        Some(token) => Some(member_group_scopes(&groups, &memberships, token.member_id()).await?),
        None => None,
    };
    let tag_names = tags.names_for(slice::from_ref(&question)).await?;

    Ok(Json(engine::stats_for_question(
        &question,
        &votes,
        scopes.as_deref(),
        &tag_names,
        config.zero_response_policy(),
    )))
}

/// Vote totals for every question the caller asked, newest first.
#[get("/questions/mine")]
async fn my_questions(
    token: AuthToken,
    config: &State<Config>,
    questions: Coll<Question>,
    responses: Coll<Response>,
    tags: TagIndex,
) -> Result<Json<AuthoredQuestions>> {
    let mut filter = QuestionCore::live_filter();
    filter.insert("author_id", token.member_id());
    let newest_first = FindOptions::builder()
        .sort(doc! {"created_at": -1, "_id": -1})
        .build();
    let authored = questions
        .find(filter, newest_first)
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    let ids = authored.iter().map(|q| q.id).collect::<Vec<_>>();
    let votes = responses.responses_to_questions(&ids).await?;
    let tag_names = tags.names_for(&authored).await?;

    Ok(Json(AuthoredQuestions {
        questions: engine::authored_question_stats(
            &authored,
            &votes,
            &tag_names,
            config.zero_response_policy(),
        ),
    }))
}

#[cfg(test)]
mod tests {
    use mongodb::Database;
    use rocket::{http::Status, local::asynchronous::Client};

    use super::*;
    use crate::api::testing::{answer, insert_group, insert_member, insert_questions, session};
    use crate::model::common::Choice::{A, B};

    #[backend_test]
    async fn anyone_sees_overall_stats(client: Client, db: Database, responses: Coll<Response>) {
        let me = insert_member(&db, "me").await;
        let group = insert_group(&db, "friends", &[&me]).await;
        let question = Question::example(group.id, me.id, "lunch");
        insert_questions(&db, slice::from_ref(&question)).await;
        answer(&db, &me, slice::from_ref(&question), &[A]).await;
        responses
            .insert_many(
                [
                    Response::anonymous(question.id, A),
                    Response::anonymous(question.id, B),
                ],
                None,
            )
            .await
            .unwrap();

        let response = client
            .get(uri!(question_stats(question.id)))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let stats = response.into_json::<QuestionStats>().await.unwrap();
        assert_eq!(stats.overall.total_responses, 3);
        assert_eq!(stats.overall.option_a_count, 2);
        assert_eq!(stats.overall.option_a_percentage, 67);
        assert!(stats.per_group.is_none());
    }

    #[backend_test]
    async fn members_see_stats_per_group(client: Client, db: Database) {
        let me = insert_member(&db, "me").await;
        let friend = insert_member(&db, "friend").await;
        let colleague = insert_member(&db, "colleague").await;
        let friends = insert_group(&db, "friends", &[&me, &friend]).await;
        let work = insert_group(&db, "work", &[&colleague, &me]).await;
        let question = Question::example(friends.id, me.id, "lunch");
        insert_questions(&db, slice::from_ref(&question)).await;
        answer(&db, &friend, slice::from_ref(&question), &[A]).await;
        answer(&db, &colleague, slice::from_ref(&question), &[B]).await;

        let response = client
            .get(uri!(question_stats(question.id)))
            .cookie(session(&client, &me))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let stats = response.into_json::<QuestionStats>().await.unwrap();
        assert_eq!(stats.overall.total_responses, 2);
        let per_group = stats.per_group.unwrap();
        assert_eq!(per_group.len(), 2);
        assert_eq!(*per_group[0].group_id, friends.id);
        assert_eq!(per_group[0].stat.option_a_percentage, 100);
        assert_eq!(*per_group[1].group_id, work.id);
        assert_eq!(per_group[1].group_name, "work");
        assert_eq!(per_group[1].stat.option_b_count, 1);
    }

    #[backend_test]
    async fn deleted_or_unknown_questions_are_not_found(client: Client, db: Database) {
        let me = insert_member(&db, "me").await;
        let deleted = Question::example(Id::new(), me.id, "gone").deleted();
        insert_questions(&db, slice::from_ref(&deleted)).await;

        for id in [deleted.id, Id::new()] {
            let response = client.get(uri!(question_stats(id))).dispatch().await;
            assert_eq!(Status::NotFound, response.status());
        }
    }

    #[backend_test]
    async fn authors_see_their_questions(client: Client, db: Database) {
        let me = insert_member(&db, "me").await;
        let other = insert_member(&db, "other").await;
        let group = insert_group(&db, "friends", &[&me, &other]).await;
        let asked = vec![
            Question::example(group.id, me.id, "first"),
            Question::example(group.id, me.id, "second"),
            Question::example(group.id, me.id, "withdrawn").deleted(),
            Question::example(group.id, other.id, "theirs"),
        ];
        insert_questions(&db, &asked).await;
        answer(&db, &other, &asked[..2], &[B, A]).await;

        let response = client
            .get(uri!(my_questions))
            .cookie(session(&client, &me))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let body = response.into_json::<AuthoredQuestions>().await.unwrap();
        let titles = body
            .questions
            .iter()
            .map(|q| q.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, ["second", "first"]);
        assert_eq!(body.questions[1].option_b_percentage, 100);

        let response = client.get(uri!(my_questions)).dispatch().await;
        assert_eq!(Status::Unauthorized, response.status());
    }
}
