use axum::extract::{Query, State};
use common::{json::PrettyJson, types::Ack};
use serde::Deserialize;
use service::{
    pagination::{Page, Pagination},
    projections::UserView,
    user_service::{self, CreateUserInput, UpdateUserInput},
};
use tracing::info;

use crate::{
    errors::{IdPath, JsonApiError, JsonBody},
    state::ServerState,
};

/// `?page=` kept as text so that garbage falls back to the first page instead of a 400.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    params(PageQuery),
    responses((status = 200, description = "List OK", body = crate::openapi::UserPageDoc))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<PageQuery>,
) -> Result<PrettyJson<Page<UserView>>, JsonApiError> {
    let opts = Pagination::from_query(q.page.as_deref(), state.pagination.users_per_page);
    let page = user_service::list_users(&state.db, opts).await?;
    info!(count = page.items.len(), total = page.total, "list users");
    Ok(PrettyJson(page))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::UserDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<PrettyJson<UserView>, JsonApiError> {
    Ok(PrettyJson(user_service::get_user(&state.db, id).await?))
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::CreateUserDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<CreateUserInput>,
) -> Result<PrettyJson<UserView>, JsonApiError> {
    Ok(PrettyJson(user_service::create_user(&state.db, input).await?))
}

#[utoipa::path(
    patch, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = crate::openapi::UpdateUserDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<UpdateUserInput>,
) -> Result<PrettyJson<UserView>, JsonApiError> {
    Ok(PrettyJson(user_service::update_user(&state.db, id, input).await?))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::AckDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<PrettyJson<Ack>, JsonApiError> {
    user_service::delete_user(&state.db, id).await?;
    Ok(PrettyJson(Ack::ok()))
}
