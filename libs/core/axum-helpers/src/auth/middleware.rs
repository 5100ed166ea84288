use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extract a bearer token from the `Authorization` header, falling back to
/// the `access_token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .or_else(|| {
            headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|cookies| cookies.split(';'))
                .find_map(|cookie| {
                    let (name, value) = cookie.trim().split_once('=')?;
                    (name == ACCESS_TOKEN_COOKIE && !value.is_empty()).then_some(value)
                })
        })
}

/// JWT authentication middleware.
///
/// Requires a valid, unexpired access token and inserts its
/// [`JwtClaims`](super::JwtClaims) into the request extensions. Rejection
/// happens before the inner handler runs.
///
/// ```ignore
/// let routes = Router::new()
///     .route("/todos/", post(create_todo))
///     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(request.headers()) else {
        tracing::debug!("No JWT found in Authorization header or cookie");
        return Err(AppError::Unauthorized(
            "Authentication credentials were not provided".to_string(),
        ));
    };

    let claims = auth.verify_access_token(token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    tracing::debug!(user = %claims.username, "Request authenticated");
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
