//! Tool catalog lookup and listing.
//!
//! The catalog is read-only from this service's point of view: rows are
//! seeded/curated out of band, and only active tools are ever exposed.

use crate::{
    db::DbPool,
    error::AppError,
    models::tool::{ToolListQuery, ToolMetadata, ToolSummary},
    services::category_service,
};

/// Fetch metadata for one tool by its key.
///
/// Inactive tools read as not-found, same as unknown keys.
pub async fn get_tool_metadata(pool: &DbPool, tool_key: &str) -> Result<ToolMetadata, AppError> {
    sqlx::query_as::<_, ToolMetadata>(
        "SELECT * FROM tool_metadata WHERE tool_key = $1 AND is_active = true",
    )
    .bind(tool_key)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::ToolNotFound)
}

/// List active tools, optionally filtered.
///
/// # Filters (combined with AND)
///
/// - `q`: case-insensitive substring match on name or description
/// - `tag`: exact tag match
/// - `category`: category id or name; an unknown category yields an
///   empty list rather than an error
///
/// Results are sorted newest-updated first.
pub async fn list_tools(
    pool: &DbPool,
    filter: &ToolListQuery,
) -> Result<Vec<ToolSummary>, AppError> {
    // Resolve the category filter up front so the main query can bind a
    // plain UUID (or NULL when the filter is absent).
    let category_id = match &filter.category {
        Some(id_or_name) => match category_service::resolve_category(pool, id_or_name).await? {
            Some(category) => Some(category.id),
            None => return Ok(Vec::new()),
        },
        None => None,
    };

    let tools = sqlx::query_as::<_, ToolSummary>(
        r#"
        SELECT t.tool_key, t.tool_name, t.description, t.tag
        FROM tool_metadata t
        WHERE t.is_active = true
          AND ($1::text IS NULL
               OR t.tool_name ILIKE '%' || $1 || '%'
               OR t.description ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR t.tag = $2)
          AND ($3::uuid IS NULL OR EXISTS (
                SELECT 1 FROM tool_categories tc
                WHERE tc.tool_id = t.id AND tc.category_id = $3
          ))
        ORDER BY t.updated_at DESC
        "#,
    )
    .bind(&filter.q)
    .bind(&filter.tag)
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(tools)
}
