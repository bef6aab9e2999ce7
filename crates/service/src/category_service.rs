use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::{category, errors::db_error};
use crate::{errors::ServiceError, projections::CategoryView};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
}

/// Omitted `name` keeps the current one.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
}

/// All categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategoryView>, ServiceError> {
    let list = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;
    Ok(list.into_iter().map(CategoryView::from).collect())
}

pub async fn get_category(db: &DatabaseConnection, id: i32) -> Result<CategoryView, ServiceError> {
    let found = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("category"))?;
    Ok(found.into())
}

#[instrument(skip(db))]
pub async fn create_category(db: &DatabaseConnection, input: CreateCategoryInput) -> Result<CategoryView, ServiceError> {
    let created = category::create(db, &input.name).await?;
    info!(category_id = created.id, "category_created");
    Ok(created.into())
}

/// Partial update: `None` keeps the current name.
#[instrument(skip(db))]
pub async fn update_category(db: &DatabaseConnection, id: i32, input: UpdateCategoryInput) -> Result<CategoryView, ServiceError> {
    let found = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("category"))?;
    let Some(name) = input.name else { return Ok(found.into()) };
    let mut am: category::ActiveModel = found.into();
    am.name = Set(category::validate_name(&name)?);
    let updated = am.update(db).await.map_err(db_error)?;
    info!(category_id = id, "category_updated");
    Ok(updated.into())
}

/// Delete by id; its advertisements go with it.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = category::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("category"));
    }
    info!(category_id = id, "category_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn named(name: &str) -> CreateCategoryInput {
        CreateCategoryInput { name: name.to_string() }
    }

    #[tokio::test]
    async fn category_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let c = create_category(&db, named("Electronics")).await?;
        assert_eq!(c.name, "Electronics");
        create_category(&db, named("Books")).await?;

        let names: Vec<String> = list_categories(&db).await?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Books".to_string(), "Electronics".to_string()]);

        assert_eq!(get_category(&db, c.id).await?, c);

        let same = update_category(&db, c.id, UpdateCategoryInput::default()).await?;
        assert_eq!(same, c);
        let renamed = update_category(&db, c.id, UpdateCategoryInput { name: Some("Gadgets".into()) }).await?;
        assert_eq!(renamed.name, "Gadgets");

        delete_category(&db, c.id).await?;
        assert!(matches!(get_category(&db, c.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_category(&db, c.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn blank_name_is_a_validation_error() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = create_category(&db, named(" ")).await.unwrap_err();
        assert!(err.is_client_error());
        Ok(())
    }
}
