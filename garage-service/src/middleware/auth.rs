use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::{services::AccessTokenClaims, startup::AppState};

/// Require a valid bearer token and expose its claims to handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
        })?;

    let claims = state.jwt.validate_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token"))
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Claims of the authenticated caller. Only valid behind [`auth_middleware`].
pub struct AuthUser(pub AccessTokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessTokenClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn whoami(AuthUser(claims): AuthUser) -> String {
        claims.email
    }

    #[tokio::test]
    async fn extractor_rejects_requests_without_claims() {
        let app = Router::new().route("/", get(whoami));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn extractor_reads_claims_from_extensions() {
        let app = Router::new().route("/", get(whoami));

        let mut request = axum::http::Request::builder().uri("/").body(Body::empty()).unwrap();
        request.extensions_mut().insert(AccessTokenClaims {
            sub: "7".to_string(),
            email: "clerk@garage.test".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        });

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
