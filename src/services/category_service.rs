//! Category CRUD and category-scoped tool listing.
//!
//! Categories can be addressed by UUID or by their unique name; every
//! operation here accepts either form and resolves id first, then name.

use crate::{
    db::DbPool,
    error::AppError,
    models::category::{Category, CreateCategoryRequest, Page, PageQuery, UpdateCategoryRequest},
    models::tool::ToolSummary,
};
use uuid::Uuid;

/// Postgres constraint name for unique category names.
const CATEGORY_NAME_KEY: &str = "categories_name_key";

/// Map a unique violation on the category name to `DuplicateCategory`.
fn map_category_name_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(CATEGORY_NAME_KEY) {
            return AppError::DuplicateCategory;
        }
    }
    err.into()
}

/// Create a new category.
///
/// # Errors
///
/// - `DuplicateCategory`: a category with this name already exists
pub async fn create_category(
    pool: &DbPool,
    request: CreateCategoryRequest,
) -> Result<Category, AppError> {
    sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, description, sort)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&request.name)
    .bind(&request.description)
    .bind(request.sort)
    .fetch_one(pool)
    .await
    .map_err(map_category_name_conflict)
}

/// Resolve a category by UUID or by name.
///
/// Tries the UUID form first; anything that does not parse as a UUID is
/// looked up as a name.
pub async fn resolve_category(
    pool: &DbPool,
    id_or_name: &str,
) -> Result<Option<Category>, sqlx::Error> {
    if let Ok(id) = Uuid::parse_str(id_or_name) {
        let by_id = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if by_id.is_some() {
            return Ok(by_id);
        }
    }

    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = $1")
        .bind(id_or_name)
        .fetch_optional(pool)
        .await
}

/// Fetch one category by id or name.
pub async fn get_category(pool: &DbPool, id_or_name: &str) -> Result<Category, AppError> {
    resolve_category(pool, id_or_name)
        .await?
        .ok_or(AppError::CategoryNotFound)
}

/// Update a category; absent fields are left unchanged.
///
/// # Errors
///
/// - `CategoryNotFound`: no category matches the id or name
/// - `DuplicateCategory`: renaming to a name that is already taken
pub async fn update_category(
    pool: &DbPool,
    id_or_name: &str,
    patch: UpdateCategoryRequest,
) -> Result<Category, AppError> {
    let existing = get_category(pool, id_or_name).await?;

    sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            sort = COALESCE($4, sort),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(patch.sort)
    .fetch_one(pool)
    .await
    .map_err(map_category_name_conflict)
}

/// Delete a category.
///
/// Hard delete; the join rows cascade. Tools themselves are untouched.
pub async fn delete_category(pool: &DbPool, id_or_name: &str) -> Result<(), AppError> {
    let existing = get_category(pool, id_or_name).await?;

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(existing.id)
        .execute(pool)
        .await?;

    Ok(())
}

/// List categories, optionally filtered by a name/description substring,
/// newest-updated first.
pub async fn list_categories(pool: &DbPool, page: &PageQuery) -> Result<Page<Category>, AppError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM categories
        WHERE ($1::text IS NULL
               OR name ILIKE '%' || $1 || '%'
               OR description ILIKE '%' || $1 || '%')
        "#,
    )
    .bind(&page.q)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, Category>(
        r#"
        SELECT *
        FROM categories
        WHERE ($1::text IS NULL
               OR name ILIKE '%' || $1 || '%'
               OR description ILIKE '%' || $1 || '%')
        ORDER BY updated_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(&page.q)
    .bind(page.page_size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page {
        items,
        total,
        page: page.page,
        page_size: page.page_size,
    })
}

/// List active tools belonging to a category, paginated.
///
/// An unknown category yields an empty page rather than an error.
pub async fn list_tools_in_category(
    pool: &DbPool,
    id_or_name: &str,
    page: &PageQuery,
) -> Result<Page<ToolSummary>, AppError> {
    let Some(category) = resolve_category(pool, id_or_name).await? else {
        return Ok(Page {
            items: Vec::new(),
            total: 0,
            page: page.page,
            page_size: page.page_size,
        });
    };

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM tool_metadata t
        JOIN tool_categories tc ON tc.tool_id = t.id
        WHERE t.is_active = true AND tc.category_id = $1
        "#,
    )
    .bind(category.id)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, ToolSummary>(
        r#"
        SELECT t.tool_key, t.tool_name, t.description, t.tag
        FROM tool_metadata t
        JOIN tool_categories tc ON tc.tool_id = t.id
        WHERE t.is_active = true AND tc.category_id = $1
        ORDER BY t.updated_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(category.id)
    .bind(page.page_size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page {
        items,
        total,
        page: page.page,
        page_size: page.page_size,
    })
}
