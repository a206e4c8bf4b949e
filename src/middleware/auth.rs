//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Hash it and verify it exists in the database
//! 3. Inject the resolved owner identity into the request
//! 4. Reject unauthorized requests with HTTP 401
//!
//! Only write endpoints are protected. Share links are readable without
//! any token: the share id itself is the capability.

use crate::{AppState, error::AppError, models::api_token::ApiToken};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user
    ///
    /// Becomes the `owner_id` of any configuration saved in this request.
    pub user_id: String,

    /// Optional label of the token used
    pub display_name: Option<String>,
}

/// Bearer token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Hash the `<token>` using SHA-256
/// 3. Query database for matching hash where `is_active = true`
/// 4. If found: inject `AuthContext` into request, call next handler
/// 5. If not found: return 401 Unauthorized error
///
/// # Headers
///
/// Expected header format:
/// ```text
/// Authorization: Bearer abc123xyz
/// ```
///
/// # Returns
///
/// - `Ok(Response)` if authenticated successfully (calls next handler)
/// - `Err(AppError::InvalidToken)` if authentication fails (returns 401)
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidToken)?;

    // Expected format: "Bearer <token>"
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidToken)?;

    // Hash the token; only hashes are stored server side
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let token_hash = hex::encode(hasher.finalize());

    // Lookup hashed token in database
    let token_record = sqlx::query_as::<_, ApiToken>(
        "SELECT id, token_hash, user_id, display_name, is_active, created_at
         FROM api_tokens
         WHERE token_hash = $1 AND is_active = true",
    )
    .bind(&token_hash)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::InvalidToken)?;

    // Route handlers can extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext {
        user_id: token_record.user_id,
        display_name: token_record.display_name,
    });

    Ok(next.run(request).await)
}
