//! Caller role extraction from the `X-User-Role` header.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use log::warn;
use shared::UserRole;

pub const ROLE_HEADER: &str = "x-user-role";

/// Role of the caller. A missing header means a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerRole(pub UserRole);

impl CallerRole {
    /// Reject callers that may not edit class data
    pub fn require_teacher(&self) -> Result<(), Response> {
        if self.0.can_edit() {
            Ok(())
        } else {
            warn!("Rejected edit from role {}", self.0.as_str());
            Err((StatusCode::FORBIDDEN, "Only teachers can make changes").into_response())
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerRole
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ROLE_HEADER) else {
            return Ok(CallerRole(UserRole::Parent));
        };

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.parse::<UserRole>().ok())
            .map(CallerRole)
            .ok_or_else(|| (StatusCode::BAD_REQUEST, "Invalid X-User-Role header").into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<CallerRole, Response> {
        let mut builder = Request::builder().uri("/api/students");
        if let Some(value) = header {
            builder = builder.header(ROLE_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CallerRole::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_header_is_parent() {
        assert_eq!(extract(None).await.unwrap(), CallerRole(UserRole::Parent));
    }

    #[tokio::test]
    async fn test_teacher_header() {
        let role = extract(Some("Teacher")).await.unwrap();
        assert_eq!(role, CallerRole(UserRole::Teacher));
        assert!(role.require_teacher().is_ok());
    }

    #[tokio::test]
    async fn test_parent_cannot_edit() {
        let role = extract(Some("parent")).await.unwrap();
        let rejection = role.require_teacher().unwrap_err();
        assert_eq!(rejection.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_role_is_bad_request() {
        let rejection = extract(Some("principal")).await.unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }
}
