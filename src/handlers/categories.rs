//! Category management HTTP handlers.
//!
//! This module implements:
//! - POST /api/v1/categories - Create a category (authenticated)
//! - PUT /api/v1/categories/:id_or_name - Update a category (authenticated)
//! - DELETE /api/v1/categories/:id_or_name - Delete a category (authenticated)
//! - GET /api/v1/categories - Paginated listing (public)
//! - GET /api/v1/categories/:id_or_name - Category detail (public)
//! - GET /api/v1/categories/:id_or_name/tools - Tools in a category (public)
//!
//! Categories can be addressed by UUID or by their unique name.

use crate::{
    AppState,
    error::AppError,
    models::category::{
        Category, CreateCategoryRequest, Page, PageQuery, UpdateCategoryRequest,
    },
    models::tool::ToolSummary,
    services::category_service,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Create a new category.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "anniversary",
///   "description": "Tools for anniversaries",
///   "sort": 10
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: The created category
/// - **Error (409)**: A category with this name already exists
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = category_service::create_category(&state.pool, request).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category; absent fields are left unchanged.
///
/// # Response
///
/// - **Success (200 OK)**: The updated category
/// - **Error (404)**: No category matches the id or name
/// - **Error (409)**: Renaming to a taken name
pub async fn update_category(
    State(state): State<AppState>,
    Path(id_or_name): Path<String>,
    Json(patch): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = category_service::update_category(&state.pool, &id_or_name, patch).await?;

    Ok(Json(category))
}

/// Delete a category.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: No category matches the id or name
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id_or_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    category_service::delete_category(&state.pool, &id_or_name).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Fetch one category by id or name.
pub async fn get_category(
    State(state): State<AppState>,
    Path(id_or_name): Path<String>,
) -> Result<Json<Category>, AppError> {
    let category = category_service::get_category(&state.pool, &id_or_name).await?;

    Ok(Json(category))
}

/// Paginated category listing with optional substring filter.
///
/// # Endpoint
///
/// `GET /api/v1/categories?q=anni&page=1&page_size=20`
pub async fn list_categories(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<Category>>, AppError> {
    let categories = category_service::list_categories(&state.pool, &page).await?;

    Ok(Json(categories))
}

/// Paginated listing of active tools in a category.
///
/// An unknown category returns an empty page, not 404.
pub async fn list_category_tools(
    State(state): State<AppState>,
    Path(id_or_name): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<ToolSummary>>, AppError> {
    let tools = category_service::list_tools_in_category(&state.pool, &id_or_name, &page).await?;

    Ok(Json(tools))
}
