//! Read access to answers and tags, fetched up front for the engine.

use std::collections::{HashMap, HashSet};

use mongodb::{bson::doc, Database};
use rocket::{
    futures::TryStreamExt,
    request::{self, FromRequest, Request},
    State,
};

use crate::engine::ResponseMap;
use crate::error::Result;
use crate::model::{
    db::{Question, QuestionCore, Response, Tag},
    mongodb::{Coll, Id},
};

/// Where members' answers come from.
#[rocket::async_trait]
pub trait ResponseStore {
    /// Each listed member's answers to the listed questions, in one fetch.
    /// Every member is present in the result, possibly with no answers.
    async fn responses_by_users(
        &self,
        users: &[Id],
        questions: &[Id],
    ) -> Result<HashMap<Id, ResponseMap>>;

    /// All answers to the listed questions, anonymous ones included.
    async fn responses_to_questions(&self, questions: &[Id]) -> Result<Vec<Response>>;
}

#[rocket::async_trait]
impl ResponseStore for Coll<Response> {
    async fn responses_by_users(
        &self,
        users: &[Id],
        questions: &[Id],
    ) -> Result<HashMap<Id, ResponseMap>> {
        let mut by_user = users
            .iter()
            .map(|&user| (user, ResponseMap::new()))
            .collect::<HashMap<_, _>>();
        if users.is_empty() || questions.is_empty() {
            return Ok(by_user);
        }

        let filter = doc! {
            "user_id": { "$in": users.to_vec() },
            "question_id": { "$in": questions.to_vec() },
        };
        let mut cursor = self.find(filter, None).await?;
        while let Some(response) = cursor.try_next().await? {
            if let Some(user_id) = response.user_id {
                by_user
                    .entry(user_id)
                    .or_default()
                    .insert(response.question_id, response.selected_option);
            }
        }
        Ok(by_user)
    }

    async fn responses_to_questions(&self, questions: &[Id]) -> Result<Vec<Response>> {
        if questions.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! {
            "question_id": { "$in": questions.to_vec() },
        };
        let responses = self.find(filter, None).await?.try_collect().await?;
        Ok(responses)
    }
}

/// Resolves a tag name to the questions carrying it.
#[rocket::async_trait]
pub trait TagFilterResolver {
    /// IDs of the live questions tagged `tag_name`. An unknown tag resolves to
    /// no questions rather than an error.
    async fn resolve(&self, tag_name: &str) -> Result<HashSet<Id>>;
}

/// Tags and the questions they are attached to.
pub struct TagIndex {
    tags: Coll<Tag>,
    questions: Coll<Question>,
}

impl TagIndex {
    pub fn from_db(db: &Database) -> Self {
        Self {
            tags: Coll::from_db(db),
            questions: Coll::from_db(db),
        }
    }

    /// Names of the given tags. Unknown IDs are left out.
    pub async fn names(&self, ids: impl IntoIterator<Item = Id>) -> Result<HashMap<Id, String>> {
        let ids = ids.into_iter().collect::<HashSet<_>>();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let filter = doc! {
            "_id": { "$in": ids.into_iter().collect::<Vec<_>>() },
        };
        let names = self
            .tags
            .find(filter, None)
            .await?
            .map_ok(|tag| (tag.id, tag.name))
            .try_collect()
            .await?;
        Ok(names)
    }

    /// Names of every tag attached to any of `questions`.
    pub async fn names_for(&self, questions: &[Question]) -> Result<HashMap<Id, String>> {
        self.names(questions.iter().flat_map(|q| q.tag_ids.iter().copied()))
            .await
    }
}

#[rocket::async_trait]
impl TagFilterResolver for TagIndex {
    async fn resolve(&self, tag_name: &str) -> Result<HashSet<Id>> {
        let Some(tag) = self.tags.find_one(doc! { "name": tag_name }, None).await? else {
            debug!("Unknown tag {tag_name:?}");
            return Ok(HashSet::new());
        };

        let mut filter = QuestionCore::live_filter();
        filter.insert("tag_ids", tag.id);
        let ids = self
            .questions
            .find(filter, None)
            .await?
            .map_ok(|question| question.id)
            .try_collect()
            .await?;
        Ok(ids)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for TagIndex {
    type Error = ();

    /// Panics iff the [`Database`] is not managed by [`rocket::Rocket`].
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = req.guard::<&State<Database>>().await.unwrap();
        request::Outcome::Success(TagIndex::from_db(db))
    }
}
