//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated actor from a JWT Bearer token.
//! - [`rbac::RequireTaskHistoryRead`] -- Requires the task history read scope.
//! - [`rbac::RequireTaskHistoryWrite`] -- Requires the task history write scope.

pub mod auth;
pub mod rbac;
