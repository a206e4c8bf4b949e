//! HTTP middleware.

/// Bearer token authentication
pub mod auth;
