use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::{errors::db_error, location};
use crate::{errors::ServiceError, projections::LocationView};

#[derive(Debug, Deserialize)]
pub struct CreateLocationInput {
    pub name: String,
}

/// Omitted `name` keeps the current one.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLocationInput {
    pub name: Option<String>,
}

pub async fn list_locations(db: &DatabaseConnection) -> Result<Vec<LocationView>, ServiceError> {
    let list = location::Entity::find()
        .order_by_asc(location::Column::Name)
        .all(db)
        .await?;
    Ok(list.into_iter().map(LocationView::from).collect())
}

pub async fn get_location(db: &DatabaseConnection, id: i32) -> Result<LocationView, ServiceError> {
    let found = location::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("location"))?;
    Ok(found.into())
}

/// Create a location; an existing name is a conflict.
#[instrument(skip(db))]
pub async fn create_location(db: &DatabaseConnection, input: CreateLocationInput) -> Result<LocationView, ServiceError> {
    let created = location::create(db, &input.name).await?;
    info!(location_id = created.id, "location_created");
    Ok(created.into())
}

#[instrument(skip(db))]
pub async fn update_location(db: &DatabaseConnection, id: i32, input: UpdateLocationInput) -> Result<LocationView, ServiceError> {
    let found = location::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("location"))?;
    let Some(name) = input.name else { return Ok(found.into()) };
    let mut am: location::ActiveModel = found.into();
    am.name = Set(location::validate_name(&name)?);
    let updated = am.update(db).await.map_err(db_error)?;
    info!(location_id = id, "location_updated");
    Ok(updated.into())
}

/// Delete by id; users only lose the association.
#[instrument(skip(db))]
pub async fn delete_location(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = location::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("location"));
    }
    info!(location_id = id, "location_deleted");
    Ok(())
}
