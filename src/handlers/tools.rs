//! Tool catalog and shareable configuration HTTP handlers.
//!
//! This module implements:
//! - POST /api/v1/configs - Save a tool configuration, get a share link
//! - GET /api/v1/shares/:share_id - Fetch a shared configuration (public)
//! - GET /api/v1/tools - List active tools with optional filters (public)
//! - GET /api/v1/tools/:key/meta - Fetch tool metadata (public)

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::tool::{ToolListQuery, ToolMetadata, ToolSummary},
    models::tool_config::{SaveConfigRequest, SaveConfigResponse, SharedConfigResponse},
    services::config_service::{self, NewToolConfig, PgConfigStore},
    services::tool_service,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Save a tool configuration and return its share identifiers.
///
/// # Endpoint
///
/// `POST /api/v1/configs`
///
/// # Authentication
///
/// Requires a valid bearer token; the authenticated user becomes the
/// configuration's owner.
///
/// # Request Body
///
/// ```json
/// {
///   "tool_key": "warm-text-card",
///   "config": { "theme": "warm", "maxCards": 12 },
///   "fingerprint": "optional-client-string",
///   "expires_at": "2026-12-31T00:00:00Z"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{"share_id": "...", "record_id": "cfg_..."}`
/// - **Error (400)**: Empty tool key or non-object config
/// - **Error (401)**: Invalid bearer token
/// - **Error (503)**: Share id allocation exhausted (rare)
/// - **Error (500)**: Database error
pub async fn save_config(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<SaveConfigRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = PgConfigStore::new(state.pool.clone());

    let saved: SaveConfigResponse = config_service::save_config(
        &state.ids,
        &store,
        state.save_attempts,
        NewToolConfig {
            tool_key: request.tool_key,
            config: request.config,
            owner_id: auth.user_id,
            fingerprint: request.fingerprint,
            expires_at: request.expires_at,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Fetch a shared configuration by its share id.
///
/// # Endpoint
///
/// `GET /api/v1/shares/:share_id`
///
/// # Authentication
///
/// None. The share id is the capability: anyone holding the link can
/// read the configuration.
///
/// # Response
///
/// - **Success (200 OK)**: The configuration, payload verbatim as saved
/// - **Error (404)**: No visible record - the response is identical
///   whether the share id never existed, was deleted, or has expired
pub async fn get_shared_config(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> Result<Json<SharedConfigResponse>, AppError> {
    let store = PgConfigStore::new(state.pool.clone());
    let record = config_service::get_by_share_id(&store, &share_id).await?;

    Ok(Json(record.into()))
}

/// List active tools.
///
/// # Endpoint
///
/// `GET /api/v1/tools?q=card&tag=anniversary&category=<id-or-name>`
///
/// All filters are optional. Results are sorted newest-updated first.
pub async fn list_tools(
    State(state): State<AppState>,
    Query(filter): Query<ToolListQuery>,
) -> Result<Json<Vec<ToolSummary>>, AppError> {
    let tools = tool_service::list_tools(&state.pool, &filter).await?;

    Ok(Json(tools))
}

/// Fetch metadata for one tool.
///
/// # Endpoint
///
/// `GET /api/v1/tools/:key/meta`
///
/// # Response
///
/// - **Success (200 OK)**: The metadata row
/// - **Error (404)**: Unknown or inactive tool key
pub async fn get_tool_meta(
    State(state): State<AppState>,
    Path(tool_key): Path<String>,
) -> Result<Json<ToolMetadata>, AppError> {
    let meta = tool_service::get_tool_metadata(&state.pool, &tool_key).await?;

    Ok(Json(meta))
}
