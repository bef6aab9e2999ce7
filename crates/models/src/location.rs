use sea_orm::{entity::prelude::*, sea_query::OnConflict, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{db_error, ModelError};
use crate::{user, user_location, validation};

pub const NAME_MAX: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { UserLocation }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::UserLocation => Entity::has_many(user_location::Entity).into() }
    }
}

impl Related<user_location::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserLocation.def() }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { user_location::Relation::User.def() }
    fn via() -> Option<RelationDef> { Some(user_location::Relation::Location.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validation::required_text("location name", name, NAME_MAX)
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, ModelError> {
    let name = validate_name(name)?;
    let am = ActiveModel { name: Set(name), ..Default::default() };
    am.insert(db).await.map_err(db_error)
}

/// Find the location named `name`, inserting it first when absent.
///
/// The insert is `ON CONFLICT (name) DO NOTHING`, so two concurrent callers
/// with the same name both end up with the single stored row.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, ModelError> {
    let name = validate_name(name)?;
    let am = ActiveModel { name: Set(name.clone()), ..Default::default() };
    match Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Name).do_nothing().to_owned())
        .exec_without_returning(db)
        .await
    {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(db_error(e)),
    }
    Entity::find()
        .filter(Column::Name.eq(name.as_str()))
        .one(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| ModelError::Db(format!("location {name:?} missing after upsert")))
}
