use std::convert::Infallible;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use common::{
    json::PrettyJson,
    types::{Ack, Health},
};
use sea_orm::ConnectionTrait;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, warn, Level};
use utoipa::OpenApi;

use crate::{guard, openapi::ApiDoc, state::ServerState};

pub mod advertisements;
pub mod categories;
pub mod locations;
pub mod users;

/// Multipart framing on top of the file itself. Exceeding the limit surfaces
/// as a 413 multipart error from the upload handler.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::AckDoc)))]
pub async fn index() -> PrettyJson<Ack> {
    PrettyJson(Ack::ok())
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = crate::openapi::HealthResponse),
        (status = 503, description = "Database unreachable", body = crate::openapi::HealthResponse)
    )
)]
pub async fn health(State(state): State<ServerState>) -> (StatusCode, PrettyJson<Health>) {
    match state.db.execute_unprepared("SELECT 1").await {
        Ok(_) => (StatusCode::OK, PrettyJson(Health { status: "ok", database: "up" })),
        Err(e) => {
            error!(err = %e, "health check: database unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, PrettyJson(Health { status: "degraded", database: "down" }))
        }
    }
}

pub async fn openapi_json() -> PrettyJson<utoipa::openapi::OpenApi> {
    PrettyJson(ApiDoc::openapi())
}

/// CORS from the same allow-list the origin guard uses; empty list means same-origin only.
pub fn build_cors(allowed: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring unparsable allowed origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application router: API resources, uploaded media and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let upload_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let media_dir = ServeDir::new(state.media.root().to_path_buf());
    let media_prefix = state.media.url_prefix().to_string();

    let api = Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get).patch(categories::update).delete(categories::delete),
        )
        .route("/locations", get(locations::list).post(locations::create))
        .route(
            "/locations/:id",
            get(locations::get).patch(locations::update).delete(locations::delete),
        )
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get).patch(users::update).delete(users::delete))
        .route("/advertisements", get(advertisements::list).post(advertisements::create))
        .route(
            "/advertisements/:id",
            get(advertisements::get)
                .patch(advertisements::update)
                .delete(advertisements::delete),
        )
        .route(
            "/advertisements/:id/image",
            post(advertisements::upload_image).layer::<_, Infallible>(DefaultBodyLimit::max(upload_limit)),
        );

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .nest_service(&media_prefix, media_dir)
        .layer(middleware::from_fn_with_state(state.clone(), guard::require_trusted_origin))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
