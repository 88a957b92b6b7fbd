use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};
use rocket::{
    request::{self, FromRequest, Request},
    State,
};

use crate::model::db::{Group, Member, Membership, Question, Response, Tag};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r, T> FromRequest<'r> for Coll<T>
where
    T: MongoCollection,
{
    type Error = ();

    /// Get the database connection from the managed state and wrap it in a collection.
    ///
    /// Panics iff the [`Database`] is not managed by [`rocket::Rocket`].
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = req.guard::<&State<Database>>().await.unwrap();
        request::Outcome::Success(Coll::from_db(db))
    }
}

impl MongoCollection for Member {
    const NAME: &'static str = "members";
}

impl MongoCollection for Group {
    const NAME: &'static str = "groups";
}

impl MongoCollection for Membership {
    const NAME: &'static str = "memberships";
}

impl MongoCollection for Question {
    const NAME: &'static str = "questions";
}

impl MongoCollection for Tag {
    const NAME: &'static str = "tags";
}

impl MongoCollection for Response {
    const NAME: &'static str = "responses";
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    // One membership per member per group.
    let membership_index = IndexModel::builder()
        .keys(doc! {"group_id": 1, "user_id": 1})
        .options(unique.clone())
        .build();
    Coll::<Membership>::from_db(db)
        .create_index(membership_index, None)
        .await?;

    // Tag names are what filters are resolved by.
    let tag_index = IndexModel::builder()
        .keys(doc! {"name": 1})
        .options(unique.clone())
        .build();
    Coll::<Tag>::from_db(db)
        .create_index(tag_index, None)
        .await?;

    let question_index = IndexModel::builder()
        .keys(doc! {"group_id": 1, "created_at": -1})
        .build();
    Coll::<Question>::from_db(db)
        .create_index(question_index, None)
        .await?;

    // At most one answer per member per question. Anonymous answers are exempt.
    let one_answer_each = IndexOptions::builder()
        .unique(true)
        .partial_filter_expression(doc! {"user_id": {"$type": "objectId"}})
        .build();
    let response_index = IndexModel::builder()
        .keys(doc! {"question_id": 1, "user_id": 1})
        .options(one_answer_each)
        .build();
    Coll::<Response>::from_db(db)
        .create_index(response_index, None)
        .await?;

    Ok(())
}
