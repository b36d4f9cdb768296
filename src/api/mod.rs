//! HTTP API exposing the gallery and the disabled set as JSON.

// Allow clippy lint triggered by utoipa's OpenApi derive macro
#![allow(clippy::needless_for_each)]

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::build_info;
use crate::config::Config;
use crate::core::{
    DisabledReview, DisabledSet, DisabledStore, Error, Gallery, Photo, PhotoKey, PhotoSource,
    ReviewEntry,
};

/// Shared application state.
pub struct AppState {
    /// Where photos come from.
    pub source: Arc<dyn PhotoSource>,

    /// The disabled set, shared with every request.
    pub store: Arc<DisabledStore>,

    /// API token for authentication (if configured).
    pub token: Option<String>,
}

type SharedState = Arc<AppState>;

/// `OpenAPI` documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "photodeck API",
        description = "Visible photos and the disabled set",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(health, list_photos, list_disabled, disable_photo, enable_photo),
    components(schemas(Photo, ReviewEntry, DisabledResponse, KeysResponse, ErrorBody))
)]
struct ApiDoc;

/// JSON error payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            kind: "source_unavailable",
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let (status, kind) = match &e {
            Error::Key(_) => (StatusCode::BAD_REQUEST, "invalid_key"),
            Error::Fetch(_) => (StatusCode::BAD_GATEWAY, "source_unavailable"),
            Error::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_failed"),
        };
        Self {
            status,
            kind,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Authentication middleware.
///
/// Validates the `Authorization: Bearer <token>` header if a token is configured.
async fn auth_middleware(
    State(state): State<SharedState>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    // If no token configured, allow all requests (localhost-only mode)
    let Some(ref expected_token) = state.token else {
        return next.run(request).await;
    };

    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match auth_header {
        Some(token) if token == expected_token => next.run(request).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: "unauthorized".to_string(),
                message: "Missing or invalid Authorization header. Use: Bearer <token>"
                    .to_string(),
            }),
        )
            .into_response(),
    }
}

/// Routes without docs or tracing layers.
pub fn router(state: SharedState) -> Router {
    let protected_routes = Router::new()
        .route("/api/photos", get(list_photos))
        .route("/api/disabled", get(list_disabled))
        .route(
            "/api/disabled/{key}",
            axum::routing::put(disable_photo).delete(enable_photo),
        )
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ));

    Router::new()
        .merge(protected_routes)
        .route("/health", get(health))
        .with_state(state)
}

/// Start the HTTP API server.
///
/// # Errors
///
/// Returns an error if the server fails to bind or start.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let (source, store) = crate::core::open(config)?;
    let state = Arc::new(AppState {
        source,
        store,
        token: config.api.token(),
    });
    let auth_enabled = state.token.is_some();

    let app = router(state)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if auth_enabled {
        tracing::info!(addr = %addr, "starting HTTP API server (auth enabled)");
    } else {
        tracing::warn!(addr = %addr, "starting HTTP API server (NO AUTH - localhost only recommended)");
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service healthy", body = String))
)]
async fn health() -> impl IntoResponse {
    ([("x-photodeck-build", build_info::short_version())], "ok")
}

/// Query parameters for the photo list.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PhotoQuery {
    /// Case-insensitive title filter.
    pub search: Option<String>,
}

/// Disabled photos plus what could not be resolved.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DisabledResponse {
    /// One entry per disabled photo; key-only when the source failed.
    pub entries: Vec<ReviewEntry>,
    /// Disabled keys the source no longer returns.
    pub unmatched: usize,
    /// Why photo details are missing, if the source failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_error: Option<String>,
}

/// The disabled set after a mutation.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KeysResponse {
    /// Disabled keys, sorted.
    pub keys: Vec<String>,
}

impl From<DisabledSet> for KeysResponse {
    fn from(set: DisabledSet) -> Self {
        Self {
            keys: set.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Photos that are neither disabled nor filtered out.
#[utoipa::path(
    get,
    path = "/api/photos",
    params(PhotoQuery),
    responses(
        (status = 200, description = "Visible photos", body = Vec<Photo>),
        (status = 502, description = "Photo source unavailable", body = ErrorBody)
    )
)]
async fn list_photos(
    State(state): State<SharedState>,
    Query(query): Query<PhotoQuery>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let mut gallery = Gallery::new(Arc::clone(&state.store));
    gallery.activate(state.source.as_ref()).await;

    if let Some(reason) = gallery.state().failure() {
        return Err(ApiError::bad_gateway(reason));
    }

    gallery.set_search(query.search.unwrap_or_default());
    Ok(Json(gallery.visible().into_iter().cloned().collect()))
}

/// Photos the user has disabled.
#[utoipa::path(
    get,
    path = "/api/disabled",
    responses((status = 200, description = "Disabled photos", body = DisabledResponse))
)]
async fn list_disabled(State(state): State<SharedState>) -> Json<DisabledResponse> {
    let mut review = DisabledReview::new(Arc::clone(&state.store));
    review.activate(state.source.as_ref()).await;

    Json(DisabledResponse {
        entries: review.entries(),
        unmatched: review.unmatched(),
        source_error: review.state().failure().map(str::to_string),
    })
}

/// Disable a photo.
#[utoipa::path(
    put,
    path = "/api/disabled/{key}",
    params(("key" = String, Path, description = "Photo key `<albumId>-<id>`")),
    responses(
        (status = 200, description = "Updated disabled set", body = KeysResponse),
        (status = 400, description = "Malformed key", body = ErrorBody)
    )
)]
async fn disable_photo(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<KeysResponse>, ApiError> {
    let key: PhotoKey = key.parse().map_err(Error::from)?;
    let set = state.store.add(key).map_err(Error::from)?;
    Ok(Json(set.into()))
}

/// Re-enable a photo.
#[utoipa::path(
    delete,
    path = "/api/disabled/{key}",
    params(("key" = String, Path, description = "Photo key `<albumId>-<id>`")),
    responses(
        (status = 200, description = "Updated disabled set", body = KeysResponse),
        (status = 400, description = "Malformed key", body = ErrorBody)
    )
)]
async fn enable_photo(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<KeysResponse>, ApiError> {
    let key: PhotoKey = key.parse().map_err(Error::from)?;
    let set = state.store.remove(&key).map_err(Error::from)?;
    Ok(Json(set.into()))
}
