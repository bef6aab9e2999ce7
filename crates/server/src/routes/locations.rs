use axum::extract::State;
use common::{json::PrettyJson, types::Ack};
use service::{
    location_service::{self, CreateLocationInput, UpdateLocationInput},
    projections::LocationView,
};
use tracing::info;

use crate::{
    errors::{IdPath, JsonApiError, JsonBody},
    state::ServerState,
};

#[utoipa::path(
    get, path = "/locations", tag = "locations",
    responses((status = 200, description = "List OK", body = [crate::openapi::NamedDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<PrettyJson<Vec<LocationView>>, JsonApiError> {
    let list = location_service::list_locations(&state.db).await?;
    info!(count = list.len(), "list locations");
    Ok(PrettyJson(list))
}

#[utoipa::path(
    post, path = "/locations", tag = "locations",
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::NamedDoc),
        (status = 400, description = "Validation Error or duplicate name", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<CreateLocationInput>,
) -> Result<PrettyJson<LocationView>, JsonApiError> {
    Ok(PrettyJson(location_service::create_location(&state.db, input).await?))
}

#[utoipa::path(
    get, path = "/locations/{id}", tag = "locations",
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::NamedDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<PrettyJson<LocationView>, JsonApiError> {
    Ok(PrettyJson(location_service::get_location(&state.db, id).await?))
}

#[utoipa::path(
    patch, path = "/locations/{id}", tag = "locations",
    params(("id" = i32, Path, description = "Location id")),
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
    JsonBody(input): JsonBody<UpdateLocationInput>,
) -> Result<PrettyJson<LocationView>, JsonApiError> {
    let updated = location_service::update_location(&state.db, id, input).await?;
    Ok(PrettyJson(updated))
}

#[utoipa::path(
    delete, path = "/locations/{id}", tag = "locations",
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::AckDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<PrettyJson<Ack>, JsonApiError> {
    location_service::delete_location(&state.db, id).await?;
    Ok(PrettyJson(Ack::ok()))
}
