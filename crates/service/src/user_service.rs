use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::{errors::db_error, location, user, user_location};
use crate::{
    errors::ServiceError,
    pagination::{fetch_page, Page, Pagination},
    password::hash_password,
    projections::{self, UserView},
};

/// Creation input; `username` and `password` are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Partial update; omitted keys leave the stored value alone.
///
/// `locations`, when present, replaces the whole set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub locations: Option<Vec<String>>,
}

/// One page of users ordered by username.
pub async fn list_users(db: &DatabaseConnection, opts: Pagination) -> Result<Page<UserView>, ServiceError> {
    let (page, per_page) = opts.normalize();
    let paginator = user::Entity::find()
        .order_by_asc(user::Column::Username)
        .paginate(db, per_page);
    let found = fetch_page(paginator, page).await?;
    let items = projections::user_views(db, found.items).await?;
    Ok(Page { items, pages_number: found.pages_number, total: found.total })
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<UserView, ServiceError> {
    let found = user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    Ok(projections::user_view(db, found).await?)
}

/// Create a user and associate it with its locations in one transaction.
#[instrument(skip(db, input), fields(username = %input.username))]
pub async fn create_user(db: &DatabaseConnection, input: CreateUserInput) -> Result<UserView, ServiceError> {
    let password = hash_password(&input.password)?;
    let txn = db.begin().await?;
    let created = user::create(
        &txn,
        user::NewUser {
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            password,
            role: input.role,
            age: input.age,
        },
    )
    .await?;
    attach_locations(&txn, created.id, &input.locations).await?;
    let view = projections::user_view(&txn, created).await?;
    txn.commit().await?;
    info!(user_id = view.id, locations = view.locations.len(), "user_created");
    Ok(view)
}

/// Apply the supplied fields; a `locations` list replaces every prior association.
#[instrument(skip(db, input))]
pub async fn update_user(db: &DatabaseConnection, id: i32, input: UpdateUserInput) -> Result<UserView, ServiceError> {
    let txn = db.begin().await?;
    let found = user::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    let mut am: user::ActiveModel = found.clone().into();
    if let Some(username) = input.username.as_deref() {
        am.username = Set(user::validate_username(username)?);
    }
    if let Some(first_name) = input.first_name.as_deref() {
        am.first_name = Set(user::validate_name("first_name", first_name)?);
    }
    if let Some(last_name) = input.last_name.as_deref() {
        am.last_name = Set(user::validate_name("last_name", last_name)?);
    }
    if let Some(age) = input.age {
        am.age = Set(Some(user::validate_age(age)?));
    }
    let updated = if am.is_changed() { am.update(&txn).await.map_err(db_error)? } else { found };

    if let Some(names) = input.locations.as_deref() {
        user_location::Entity::delete_many()
            .filter(user_location::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        attach_locations(&txn, id, names).await?;
    }

    let view = projections::user_view(&txn, updated).await?;
    txn.commit().await?;
    info!(user_id = id, "user_updated");
    Ok(view)
}

/// Delete by id; location associations and the user's advertisements go with it.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("user"));
    }
    info!(user_id = id, "user_deleted");
    Ok(())
}

/// Resolve each name with get-or-create and link it to `user_id`, skipping repeats.
async fn attach_locations<C: ConnectionTrait>(db: &C, user_id: i32, names: &[String]) -> Result<(), ServiceError> {
    let mut linked: Vec<i32> = Vec::with_capacity(names.len());
    for name in names {
        let loc = location::get_or_create(db, name).await?;
        if linked.contains(&loc.id) {
            continue;
        }
        user_location::ActiveModel { user_id: Set(user_id), location_id: Set(loc.id) }
            .insert(db)
            .await
            .map_err(db_error)?;
        linked.push(loc.id);
    }
    Ok(())
}
