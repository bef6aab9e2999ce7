use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::StatusCode,
};
use common::{json::PrettyJson, types::Ack};
use service::{
    advertisement_service::{self, CreateAdvertisementInput, ImageUpload, UpdateAdvertisementInput},
    pagination::{Page, Pagination},
    projections::{AdvertisementDetail, AdvertisementSummary},
};
use tracing::info;

use crate::{
    errors::{IdPath, JsonApiError, JsonBody},
    routes::users::PageQuery,
    state::ServerState,
};

const IMAGE_FIELD: &str = "image";

#[utoipa::path(
    get, path = "/advertisements", tag = "advertisements",
    params(PageQuery),
    responses((status = 200, description = "List OK", body = crate::openapi::AdvertisementPageDoc))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<PageQuery>,
) -> Result<PrettyJson<Page<AdvertisementSummary>>, JsonApiError> {
    let opts = Pagination::from_query(q.page.as_deref(), state.pagination.advertisements_per_page);
    let page = advertisement_service::list_advertisements(&state.db, opts).await?;
    info!(count = page.items.len(), total = page.total, "list advertisements");
    Ok(PrettyJson(page))
}

#[utoipa::path(
    get, path = "/advertisements/{id}", tag = "advertisements",
    params(("id" = i32, Path, description = "Advertisement id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::AdvertisementDetailDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
) -> Result<PrettyJson<AdvertisementDetail>, JsonApiError> {
    Ok(PrettyJson(advertisement_service::get_advertisement(&state.db, &state.media, id).await?))
}

#[utoipa::path(
    post, path = "/advertisements", tag = "advertisements",
    request_body = crate::openapi::CreateAdvertisementDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::AdvertisementDetailDoc),
        (status = 400, description = "Validation Error, unknown author or category", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<CreateAdvertisementInput>,
) -> Result<PrettyJson<AdvertisementDetail>, JsonApiError> {
    let created = advertisement_service::create_advertisement(&state.db, &state.media, input).await?;
    Ok(PrettyJson(created))
}

#[utoipa::path(
    patch, path = "/advertisements/{id}", tag = "advertisements",
    params(("id" = i32, Path, description = "Advertisement id")),
    request_body = crate::openapi::UpdateAdvertisementDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::AdvertisementDetailDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<UpdateAdvertisementInput>,
) -> Result<PrettyJson<AdvertisementDetail>, JsonApiError> {
    let updated = advertisement_service::update_advertisement(&state.db, &state.media, id, input).await?;
    Ok(PrettyJson(updated))
}

#[utoipa::path(
    delete, path = "/advertisements/{id}", tag = "advertisements",
    params(("id" = i32, Path, description = "Advertisement id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::AckDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<PrettyJson<Ack>, JsonApiError> {
    advertisement_service::delete_advertisement(&state.db, id).await?;
    Ok(PrettyJson(Ack::ok()))
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    let status = e.status();
    let title = if status == StatusCode::PAYLOAD_TOO_LARGE { "Payload Too Large" } else { "Malformed Upload" };
    JsonApiError::new(status, title, Some(e.body_text()))
}

#[utoipa::path(
    post, path = "/advertisements/{id}/image", tag = "advertisements",
    params(("id" = i32, Path, description = "Advertisement id")),
    request_body(content = crate::openapi::ImageUploadDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = crate::openapi::AdvertisementDetailDoc),
        (status = 400, description = "Missing or invalid image", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn upload_image(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<PrettyJson<AdvertisementDetail>, JsonApiError> {
    let mut multipart = multipart.map_err(|rej| JsonApiError::bad_request(rej.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some(ImageUpload { file_name, content_type, bytes: bytes.to_vec() });
        break;
    }
    let upload = upload.ok_or_else(|| JsonApiError::bad_request(format!("multipart field `{IMAGE_FIELD}` is required")))?;

    let updated = advertisement_service::set_image(&state.db, &state.media, id, upload).await?;
    Ok(PrettyJson(updated))
}
