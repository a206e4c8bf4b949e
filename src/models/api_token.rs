//! Bearer token model for authentication.
//!
//! Tokens identify the user who owns saved configurations. They are stored in the database as SHA-256 hashes, never in plaintext.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents an API token record from the database.
///
/// # Database Table
///
/// Maps to the `api_tokens` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `token_hash`: SHA-256 hash of the actual token
/// - `user_id`: The principal this token authenticates as
/// - `display_name`: Optional human-readable label
/// - `is_active`: Whether the token is currently valid
/// - `created_at`: When the token was created
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiToken {
    /// Unique identifier for this token
    pub id: Uuid,

    /// SHA-256 hash of the actual token (64 hex characters)
    ///
    /// When a request comes in with "Bearer abc123", we:
    /// 1. Hash "abc123" with SHA-256
    /// 2. Look up this hash in the database
    /// 3. If found and active, authenticate the request
    pub token_hash: String,

    /// The user this token authenticates as
    ///
    /// Becomes the `owner_id` on any configuration saved with this token.
    pub user_id: String,

    /// Optional human-readable label for the token
    pub display_name: Option<String>,

    /// Whether this token is currently active
    ///
    /// Inactive tokens are rejected during authentication. This provides a way to revoke access without deleting the record.
    pub is_active: bool,

    /// Timestamp when this token was created
    pub created_at: DateTime<Utc>,
}
