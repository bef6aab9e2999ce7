//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! The schemas below mirror the JSON shapes produced by the service
//! projections; they exist only for documentation.

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub database: String }

#[derive(ToSchema)]
pub struct AckDoc { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub detail: Option<String> }

/// Category or location.
#[derive(ToSchema)]
pub struct NamedDoc { pub id: i32, pub name: String }

#[derive(ToSchema)]
pub struct NameInputDoc { pub name: String }

#[derive(ToSchema)]
pub struct NameUpdateDoc { pub name: Option<String> }

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub age: Option<i32>,
    pub locations: Vec<String>,
    pub total_advertisements: i64,
}

#[derive(ToSchema)]
pub struct CreateUserDoc {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
    /// `member`, `moderator` or `admin`.
    pub role: Option<String>,
    pub age: Option<i32>,
    pub locations: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct UpdateUserDoc {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    /// Replaces every current location when present.
    pub locations: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct UserPageDoc { pub items: Vec<UserDoc>, pub pages_number: u64, pub total: u64 }

#[derive(ToSchema)]
pub struct AdvertisementSummaryDoc { pub id: i32, pub name: String, pub author: String, pub price: i32 }

#[derive(ToSchema)]
pub struct AdvertisementPageDoc { pub items: Vec<AdvertisementSummaryDoc>, pub pages_number: u64, pub total: u64 }

#[derive(ToSchema)]
pub struct AdvertisementDetailDoc {
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    pub author: String,
    pub price: i32,
    pub description: Option<String>,
    pub address: Vec<String>,
    pub image: Option<String>,
    pub is_published: bool,
    pub category_id: i32,
    pub category_name: String,
}

#[derive(ToSchema)]
pub struct CreateAdvertisementDoc {
    pub name: String,
    /// Username of an existing user.
    pub author: String,
    pub price: i32,
    pub description: Option<String>,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub is_published: Option<bool>,
    pub category_id: i32,
}

#[derive(ToSchema)]
pub struct UpdateAdvertisementDoc { pub name: Option<String>, pub price: Option<i32>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct ImageUploadDoc {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::index,
        crate::routes::health,
        crate::routes::categories::list,
        crate::routes::categories::create,
        crate::routes::categories::get,
        crate::routes::categories::update,
        crate::routes::categories::delete,
        crate::routes::locations::list,
        crate::routes::locations::create,
        crate::routes::locations::get,
        crate::routes::locations::update,
        crate::routes::locations::delete,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::advertisements::list,
        crate::routes::advertisements::get,
        crate::routes::advertisements::create,
        crate::routes::advertisements::update,
        crate::routes::advertisements::delete,
        crate::routes::advertisements::upload_image,
    ),
    components(
        schemas(
            HealthResponse,
            AckDoc,
            ErrorDoc,
            NamedDoc,
            NameInputDoc,
            NameUpdateDoc,
            UserDoc,
            CreateUserDoc,
            UpdateUserDoc,
            UserPageDoc,
            AdvertisementSummaryDoc,
            AdvertisementPageDoc,
            AdvertisementDetailDoc,
            CreateAdvertisementDoc,
            UpdateAdvertisementDoc,
            ImageUploadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "categories"),
        (name = "locations"),
        (name = "users"),
        (name = "advertisements")
    )
)]
pub struct ApiDoc;
