use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{db_error, ModelError};
use crate::{advertisement, location, user_location, validation};

pub const USERNAME_MAX: usize = 150;
pub const NAME_MAX: usize = 150;
pub const AGE_MAX: i32 = 150;

pub const ROLE_MEMBER: &str = "member";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLES: [&str; 3] = [ROLE_MEMBER, ROLE_MODERATOR, ROLE_ADMIN];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub age: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UserLocation,
    Advertisement,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UserLocation => Entity::has_many(user_location::Entity).into(),
            Relation::Advertisement => Entity::has_many(advertisement::Entity).into(),
        }
    }
}

impl Related<user_location::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserLocation.def() }
}

impl Related<advertisement::Entity> for Entity {
    fn to() -> RelationDef { Relation::Advertisement.def() }
}

impl Related<location::Entity> for Entity {
    fn to() -> RelationDef { user_location::Relation::Location.def() }
    fn via() -> Option<RelationDef> { Some(user_location::Relation::User.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

/// Letters, digits and `@ . + - _`, at most 150 characters.
pub fn validate_username(username: &str) -> Result<String, ModelError> {
    let username = validation::required_text("username", username, USERNAME_MAX)?;
    let ok = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !ok {
        return Err(ModelError::Validation(
            "username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    Ok(username)
}

pub fn validate_name(field: &str, value: &str) -> Result<String, ModelError> {
    validation::optional_text(field, value, NAME_MAX)
}

pub fn validate_role(role: &str) -> Result<String, ModelError> {
    let role = role.trim();
    if ROLES.contains(&role) {
        Ok(role.to_string())
    } else {
        Err(ModelError::Validation(format!("role must be one of {}", ROLES.join(", "))))
    }
}

pub fn validate_age(age: i32) -> Result<i32, ModelError> {
    if (0..=AGE_MAX).contains(&age) {
        Ok(age)
    } else {
        Err(ModelError::Validation(format!("age must be between 0 and {AGE_MAX}")))
    }
}

/// Fields of a user about to be inserted; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Option<String>,
    pub age: Option<i32>,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewUser) -> Result<Model, ModelError> {
    let username = validate_username(&new.username)?;
    let first_name = validate_name("first_name", &new.first_name)?;
    let last_name = validate_name("last_name", &new.last_name)?;
    let role = match new.role.as_deref() {
        Some(r) => validate_role(r)?,
        None => ROLE_MEMBER.to_string(),
    };
    let age = new.age.map(validate_age).transpose()?;
    if new.password.is_empty() {
        return Err(ModelError::Validation("password required".into()));
    }
    let am = ActiveModel {
        username: Set(username),
        first_name: Set(first_name),
        last_name: Set(last_name),
        password: Set(new.password),
        role: Set(role),
        age: Set(age),
        ..Default::default()
    };
    am.insert(db).await.map_err(db_error)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await
        .map_err(db_error)
}
