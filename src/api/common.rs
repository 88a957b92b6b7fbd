//! Membership and question lookups shared by the handlers.

use std::collections::{HashMap, HashSet};

use mongodb::{bson::doc, options::FindOptions};
use rocket::futures::TryStreamExt;

use crate::engine::GroupScope;
use crate::error::{Error, Result};
use crate::model::{
    db::{Group, Member, Membership, Question, QuestionCore},
    mongodb::{Coll, Id},
};

/// Look up a group, or fail with not found.
pub async fn group_by_id(groups: &Coll<Group>, group_id: Id) -> Result<Group> {
    groups
        .find_one(group_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Group with ID '{group_id}'")))
}

/// Is the member in the group?
pub async fn is_member(memberships: &Coll<Membership>, group_id: Id, member_id: Id) -> Result<bool> {
    let count = memberships
        .count_documents(Membership::filter(group_id, member_id), None)
        .await?;
    Ok(count > 0)
}

/// Fail with forbidden unless the member is in the group.
pub async fn require_membership(
    memberships: &Coll<Membership>,
    group_id: Id,
    member_id: Id,
) -> Result<()> {
    if is_member(memberships, group_id, member_id).await? {
        Ok(())
    } else {
        Err(Error::forbidden(format!("Not a member of group '{group_id}'")))
    }
}

/// IDs of everyone in the group, in the order they joined.
pub async fn group_member_ids(memberships: &Coll<Membership>, group_id: Id) -> Result<Vec<Id>> {
    let oldest_first = FindOptions::builder().sort(doc! {"_id": 1}).build();
    let ids = memberships
        .find(doc! {"group_id": group_id}, oldest_first)
        .await?
        .map_ok(|membership| membership.user_id)
        .try_collect()
        .await?;
    Ok(ids)
}

/// The given members' records, keyed by ID. Unknown IDs are left out.
pub async fn members_by_id(members: &Coll<Member>, ids: &[Id]) -> Result<HashMap<Id, Member>> {
    let filter = doc! {
        "_id": { "$in": ids.to_vec() },
    };
    let members = members
        .find(filter, None)
        .await?
        .map_ok(|member| (member.id, member))
        .try_collect()
        .await?;
    Ok(members)
}

/// The group's questions that have not been deleted, oldest first.
pub async fn live_group_questions(questions: &Coll<Question>, group_id: Id) -> Result<Vec<Question>> {
    let mut filter = QuestionCore::live_filter();
    filter.insert("group_id", group_id);
    let oldest_first = FindOptions::builder()
        .sort(doc! {"created_at": 1, "_id": 1})
        .build();
    let questions = questions
        .find(filter, oldest_first)
        .await?
        .try_collect()
        .await?;
    Ok(questions)
}

/// Every group the member belongs to, with its members, in the order the
/// member joined them.
pub async fn member_group_scopes(
    groups: &Coll<Group>,
    memberships: &Coll<Membership>,
    member_id: Id,
) -> Result<Vec<GroupScope>> {
    let oldest_first = FindOptions::builder().sort(doc! {"_id": 1}).build();
    let group_ids = memberships
        .find(doc! {"user_id": member_id}, oldest_first)
        .await?
        .map_ok(|membership| membership.group_id)
        .try_collect::<Vec<_>>()
        .await?;
    if group_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut names = groups
        .find(doc! {"_id": {"$in": group_ids.clone()}}, None)
        .await?
        .map_ok(|group| (group.id, group.name))
        .try_collect::<HashMap<_, _>>()
        .await?;

    let mut members = HashMap::<Id, HashSet<Id>>::new();
    let mut cursor = memberships
        .find(doc! {"group_id": {"$in": group_ids.clone()}}, None)
        .await?;
    while let Some(membership) = cursor.try_next().await? {
        members
            .entry(membership.group_id)
            .or_default()
            .insert(membership.user_id);
    }

    // Memberships of groups that no longer exist are skipped.
    let scopes = group_ids
        .into_iter()
        .filter_map(|group_id| {
            Some(GroupScope {
                group_id,
                group_name: names.remove(&group_id)?,
                members: members.remove(&group_id).unwrap_or_default(),
            })
        })
        .collect();
    Ok(scopes)
}
