//! JSON shapes returned by the service operations.
//!
//! Entities are never serialized directly: each view flattens the related
//! rows it needs (location names, author username, category name) and
//! computes the derived counters at read time.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use models::{advertisement, category, location, user, user_location};

use crate::media::MediaStorage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
}

impl From<category::Model> for CategoryView {
    fn from(m: category::Model) -> Self { Self { id: m.id, name: m.name } }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationView {
    pub id: i32,
    pub name: String,
}

impl From<location::Model> for LocationView {
    fn from(m: location::Model) -> Self { Self { id: m.id, name: m.name } }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub age: Option<i32>,
    pub locations: Vec<String>,
    /// Number of the user's advertisements with `is_published = true`.
    pub total_advertisements: i64,
}

impl UserView {
    fn build(m: user::Model, locations: Vec<String>, total_advertisements: i64) -> Self {
        Self {
            id: m.id,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            role: m.role,
            age: m.age,
            locations,
            total_advertisements,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvertisementSummary {
    pub id: i32,
    pub name: String,
    /// Author's username.
    pub author: String,
    pub price: i32,
}

impl AdvertisementSummary {
    pub fn build(ad: advertisement::Model, author: Option<user::Model>) -> Self {
        Self {
            id: ad.id,
            name: ad.name,
            author: author.map(|u| u.username).unwrap_or_default(),
            price: ad.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvertisementDetail {
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    pub author: String,
    pub price: i32,
    pub description: Option<String>,
    /// The author's location names.
    pub address: Vec<String>,
    pub image: Option<String>,
    pub is_published: bool,
    pub category_id: i32,
    pub category_name: String,
}

/// Location names per user id, each list ordered by location id.
pub async fn location_names<C: ConnectionTrait>(db: &C, user_ids: &[i32]) -> Result<HashMap<i32, Vec<String>>, DbErr> {
    let mut out: HashMap<i32, Vec<String>> = HashMap::new();
    if user_ids.is_empty() {
        return Ok(out);
    }
    let rows = user_location::Entity::find()
        .filter(user_location::Column::UserId.is_in(user_ids.to_vec()))
        .find_also_related(location::Entity)
        .order_by_asc(user_location::Column::UserId)
        .order_by_asc(user_location::Column::LocationId)
        .all(db)
        .await?;
    for (link, loc) in rows {
        if let Some(loc) = loc {
            out.entry(link.user_id).or_default().push(loc.name);
        }
    }
    Ok(out)
}

/// Published advertisement count per author id; authors without any are absent.
pub async fn published_counts<C: ConnectionTrait>(db: &C, user_ids: &[i32]) -> Result<HashMap<i32, i64>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = advertisement::Entity::find()
        .select_only()
        .column(advertisement::Column::AuthorId)
        .column_as(advertisement::Column::Id.count(), "published")
        .filter(advertisement::Column::AuthorId.is_in(user_ids.to_vec()))
        .filter(advertisement::Column::IsPublished.eq(true))
        .group_by(advertisement::Column::AuthorId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Project users in order, resolving locations and counters with two batched queries.
pub async fn user_views<C: ConnectionTrait>(db: &C, users: Vec<user::Model>) -> Result<Vec<UserView>, DbErr> {
    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let mut locations = location_names(db, &ids).await?;
    let counts = published_counts(db, &ids).await?;
    Ok(users
        .into_iter()
        .map(|u| {
            let locs = locations.remove(&u.id).unwrap_or_default();
            let count = counts.get(&u.id).copied().unwrap_or(0);
            UserView::build(u, locs, count)
        })
        .collect())
}

pub async fn user_view<C: ConnectionTrait>(db: &C, user: user::Model) -> Result<UserView, DbErr> {
    let mut views = user_views(db, vec![user]).await?;
    views.pop().ok_or_else(|| DbErr::Custom("user projection missing".into()))
}

pub async fn advertisement_detail<C: ConnectionTrait>(
    db: &C,
    media: &MediaStorage,
    ad: advertisement::Model,
) -> Result<AdvertisementDetail, DbErr> {
    let author = user::Entity::find_by_id(ad.author_id).one(db).await?;
    let category = category::Entity::find_by_id(ad.category_id).one(db).await?;
    let address = location_names(db, &[ad.author_id]).await?.remove(&ad.author_id).unwrap_or_default();
    Ok(AdvertisementDetail {
        id: ad.id,
        name: ad.name,
        author_id: ad.author_id,
        author: author.map(|u| u.username).unwrap_or_default(),
        price: ad.price,
        description: ad.description,
        address,
        image: ad.image.as_deref().map(|rel| media.url(rel)),
        is_published: ad.is_published,
        category_id: ad.category_id,
        category_name: category.map(|c| c.name).unwrap_or_default(),
    })
}
