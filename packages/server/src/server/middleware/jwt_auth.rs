use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domains::auth::jwt::JwtService;
use crate::domains::auth::types::Role;

/// Authenticated principal information from a session token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub mobile: String,
    pub role: Role,
}

/// Session-token middleware for routes mounted behind this service.
///
/// Extracts the bearer token from the Authorization header, verifies it,
/// and adds AuthUser to request extensions. A missing or invalid token
/// leaves the request unauthenticated rather than rejecting it; protected
/// handlers decide what anonymous access means for them.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = extract_auth_user(&request, &jwt_service) {
        debug!(user_id = %user.user_id, role = user.role.as_str(), "authenticated request");
        request.extensions_mut().insert(user);
    } else {
        debug!("no valid session token");
    }

    next.run(request).await
}

/// Extract and verify the session token from a request.
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.uid,
        mobile: claims.mobile,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    fn request_with_auth(value: Option<String>) -> axum::http::Request<axum::body::Body> {
        let mut builder = axum::http::Request::builder();
        if let Some(value) = value {
            builder = builder.header("authorization", value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = service();
        let user_id = Uuid::new_v4();
        let token = jwt_service
            .issue_token(user_id, "9876543210".to_string(), Role::Employer)
            .unwrap();

        let request = request_with_auth(Some(format!("Bearer {}", token)));
        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert_eq!(auth_user.user_id, user_id);
        assert_eq!(auth_user.role, Role::Employer);
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = service();
        let user_id = Uuid::new_v4();
        let token = jwt_service
            .issue_token(user_id, "9876543210".to_string(), Role::Candidate)
            .unwrap();

        let request = request_with_auth(Some(token));
        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert_eq!(auth_user.user_id, user_id);
    }

    #[test]
    fn test_no_auth_header() {
        let request = request_with_auth(None);
        assert!(extract_auth_user(&request, &service()).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let request = request_with_auth(Some("Bearer invalid_token".to_string()));
        assert!(extract_auth_user(&request, &service()).is_none());
    }
}
