use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{db_error, ModelError};
use crate::{category, user, validation};

pub const NAME_MAX: usize = 255;
pub const IMAGE_PATH_MAX: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "advertisement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    pub price: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Path relative to the media root, e.g. `ads/3f2a..._bike.jpg`.
    pub image: Option<String>,
    pub is_published: bool,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Author,
    Category,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(user::Entity)
                .from(Column::AuthorId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Author.def() }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validation::required_text("name", name, NAME_MAX)
}

pub fn validate_price(price: i32) -> Result<i32, ModelError> {
    if price < 0 {
        return Err(ModelError::Validation("price must not be negative".into()));
    }
    Ok(price)
}

/// A stored image reference must stay inside the media root.
pub fn validate_image_path(path: &str) -> Result<String, ModelError> {
    let path = validation::required_text("image", path, IMAGE_PATH_MAX)?;
    if path.starts_with('/') || path.contains('\\') || path.split('/').any(|seg| seg == "..") {
        return Err(ModelError::Validation("image must be a relative path inside the media root".into()));
    }
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct NewAdvertisement {
    pub name: String,
    pub author_id: i32,
    pub price: i32,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_published: bool,
    pub category_id: i32,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewAdvertisement) -> Result<Model, ModelError> {
    let am = ActiveModel {
        name: Set(validate_name(&new.name)?),
        author_id: Set(new.author_id),
        price: Set(validate_price(new.price)?),
        description: Set(new.description),
        image: Set(new.image.as_deref().map(validate_image_path).transpose()?),
        is_published: Set(new.is_published),
        category_id: Set(new.category_id),
        ..Default::default()
    };
    am.insert(db).await.map_err(db_error)
}
