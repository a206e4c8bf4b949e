//! HTTP request handlers.
//!
//! Handlers translate between HTTP and the service layer; no business
//! rules live here.

/// Category CRUD endpoints
pub mod categories;
/// Health check endpoint
pub mod health;
/// Tool catalog + shareable configuration endpoints
pub mod tools;
