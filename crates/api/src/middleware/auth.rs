//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lms_core::error::CoreError;
use lms_core::roles::ROLE_ADMIN;
use lms_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (e.g. `"admin"`, `"learner"`).
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Resolve whose data a request targets.
    ///
    /// Users may always act on their own data; acting on another user's
    /// data requires the admin role.
    pub fn target_user(&self, requested: Option<DbId>) -> Result<DbId, AppError> {
        match requested {
            None => Ok(self.user_id),
            Some(id) if id == self.user_id => Ok(id),
            Some(id) if self.is_admin() => Ok(id),
            Some(_) => Err(AppError::Core(CoreError::Forbidden(
                "Admin role required to access another user's progress".into(),
            ))),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            user_id: 7,
            role: role.to_string(),
        }
    }

    #[test]
    fn learners_target_only_themselves() {
        let learner = user("learner");
        assert_eq!(learner.target_user(None).unwrap(), 7);
        assert_eq!(learner.target_user(Some(7)).unwrap(), 7);
        assert_matches!(
            learner.target_user(Some(8)),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
    }

    #[test]
    fn admins_may_target_anyone() {
        assert_eq!(user(ROLE_ADMIN).target_user(Some(8)).unwrap(), 8);
    }
}
