//! Bearer-token authentication for task history endpoints.
//!
//! The token's role and granted paths are resolved into a capability set
//! once, at extraction time. Permission extractors in [`super::rbac`] only
//! ever look at that set.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use taskhist_core::error::CoreError;
use taskhist_core::permissions::{can_read, can_write, capabilities_for, CapabilitySet};
use taskhist_core::types::DbId;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity resolved from a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Capability paths held: explicit grants plus `/` for admins.
    pub capabilities: CapabilitySet,
    /// The actor's internal id (`claims.sub`), kept for log correlation.
    pub user_id: DbId,
    pub role: String,
}

impl AuthUser {
    pub fn can_read_task_history(&self, advanced_permissions: bool) -> bool {
        can_read(&self.capabilities, advanced_permissions)
    }

    pub fn can_write_task_history(&self, advanced_permissions: bool) -> bool {
        can_write(&self.capabilities, advanced_permissions)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            capabilities: capabilities_for(&claims.role, &claims.perms),
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// The raw token from `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid ASCII"))?;

    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;
        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhist_core::permissions::{MONITORING_PATH, ROOT_PATH};

    fn claims(role: &str, perms: &[&str]) -> Claims {
        Claims {
            sub: 9,
            role: role.to_string(),
            perms: perms.iter().map(|p| p.to_string()).collect(),
            exp: 0,
            iat: 0,
            jti: "t".to_string(),
        }
    }

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = axum::http::Request::builder();
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn admin_claims_resolve_to_root() {
        let user = AuthUser::from(claims("admin", &[]));
        assert!(user.capabilities.contains(ROOT_PATH));
        assert!(user.can_read_task_history(false));
        assert!(user.can_write_task_history(true));
    }

    #[test]
    fn granted_monitoring_path_depends_on_flag() {
        let user = AuthUser::from(claims("user", &[MONITORING_PATH]));
        assert!(!user.can_read_task_history(false));
        assert!(user.can_read_task_history(true));
        assert!(user.can_write_task_history(true));
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc.def"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def");
    }

    #[test]
    fn missing_or_malformed_header_is_rejected() {
        assert!(bearer_token(&parts_with(None)).is_err());
        assert!(bearer_token(&parts_with(Some("Basic dXNlcg=="))).is_err());
        assert!(bearer_token(&parts_with(Some("Bearer "))).is_err());
    }
}
