use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{db_error, ModelError};
use crate::{advertisement, validation};

pub const NAME_MAX: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Advertisement }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Advertisement => Entity::has_many(advertisement::Entity).into() }
    }
}

impl Related<advertisement::Entity> for Entity {
    fn to() -> RelationDef { Relation::Advertisement.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validation::required_text("category name", name, NAME_MAX)
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, ModelError> {
    let name = validate_name(name)?;
    let am = ActiveModel { name: Set(name), ..Default::default() };
    am.insert(db).await.map_err(db_error)
}
