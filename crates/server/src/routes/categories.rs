use axum::extract::State;
use common::{json::PrettyJson, types::Ack};
use service::{
    category_service::{self, CreateCategoryInput, UpdateCategoryInput},
    projections::CategoryView,
};
use tracing::info;

use crate::{
    errors::{IdPath, JsonApiError, JsonBody},
    state::ServerState,
};

#[utoipa::path(
    get, path = "/categories", tag = "categories",
    responses((status = 200, description = "List OK", body = [crate::openapi::NamedDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<PrettyJson<Vec<CategoryView>>, JsonApiError> {
    let list = category_service::list_categories(&state.db).await?;
    info!(count = list.len(), "list categories");
    Ok(PrettyJson(list))
}

#[utoipa::path(
    post, path = "/categories", tag = "categories",
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::NamedDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<CreateCategoryInput>,
) -> Result<PrettyJson<CategoryView>, JsonApiError> {
    let created = category_service::create_category(&state.db, input).await?;
    Ok(PrettyJson(created))
}

#[utoipa::path(
    get, path = "/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::NamedDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<PrettyJson<CategoryView>, JsonApiError> {
    Ok(PrettyJson(category_service::get_category(&state.db, id).await?))
}

#[utoipa::path(
    patch, path = "/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = crate::openapi::NameUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::NamedDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<UpdateCategoryInput>,
) -> Result<PrettyJson<CategoryView>, JsonApiError> {
    let updated = category_service::update_category(&state.db, id, input).await?;
    Ok(PrettyJson(updated))
}

#[utoipa::path(
    delete, path = "/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::AckDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<PrettyJson<Ack>, JsonApiError> {
    category_service::delete_category(&state.db, id).await?;
    Ok(PrettyJson(Ack::ok()))
}
