use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, header},
    response::{AppendHeaders, IntoResponse, Response},
    routing::post,
};
use axum_helpers::{AppError, ErrorResponse, JwtAuth, ValidatedJson};
use core_config::Environment;
use utoipa::OpenApi;

use crate::error::AuthError;
use crate::models::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Application state for auth handlers
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt_auth: JwtAuth,
    /// Add `Secure` to the access token cookie
    pub secure_cookies: bool,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            jwt_auth: self.jwt_auth.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

/// OpenAPI documentation for the auth endpoints
#[derive(OpenApi)]
#[openapi(
    paths(login, refresh),
    components(schemas(LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserResponse)),
    tags((name = "auth", description = "Token issue and renewal"))
)]
pub struct AuthApiDoc;

/// Auth routes: `POST /auth/login/` and `POST /auth/refresh/`
pub fn router<R: UserRepository + 'static>(
    service: UserService<R>,
    jwt_auth: JwtAuth,
    environment: Environment,
) -> Router {
    let state = AuthState {
        service,
        jwt_auth,
        secure_cookies: environment.is_production(),
    };

    Router::new()
        .route("/auth/login/", post(login::<R>))
        .route("/auth/refresh/", post(refresh::<R>))
        .with_state(state)
}

/// HttpOnly cookie carrying the access token, for browser clients
fn access_cookie<R: UserRepository>(
    state: &AuthState<R>,
    access_token: &str,
) -> Result<HeaderValue, AppError> {
    let secure_flag = if state.secure_cookies { " Secure;" } else { "" };
    let cookie = format!(
        "access_token={}; HttpOnly;{} SameSite=Strict; Path=/; Max-Age={}",
        access_token,
        secure_flag,
        state.jwt_auth.access_ttl_secs()
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::InternalServerError(format!("Failed to create cookie: {}", e)))
}

/// Exchange a username and password for an access token and a renewal token
#[utoipa::path(
    post,
    path = "/auth/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Response, AppError> {
    let user = state
        .service
        .verify_credentials(&input.username, &input.password)
        .await?;

    let pair = state
        .jwt_auth
        .issue_pair(&user.id.to_string(), &user.username)
        .map_err(AuthError::TokenIssue)?;
    let cookie = access_cookie(&state, &pair.access_token)?;

    let response = LoginResponse {
        access_token: pair.access_token,
        renewal_token: pair.refresh_token,
        user: user.into(),
    };

    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(response)).into_response())
}

/// Exchange a renewal token for a new access token
#[utoipa::path(
    post,
    path = "/auth/refresh/",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid or expired renewal token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn refresh<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> Result<Response, AppError> {
    let claims = state
        .jwt_auth
        .verify_refresh_token(&input.renewal_token)
        .map_err(AuthError::InvalidToken)?;

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        tracing::warn!(sub = %claims.sub, "Renewal token subject is not a user id");
        return Err(AppError::Unauthorized(
            "Invalid or expired renewal token".to_string(),
        ));
    };
    let user = state.service.get_active_user(user_id).await?;

    let access_token = state
        .jwt_auth
        .create_access_token(&user.id.to_string(), &user.username)
        .map_err(AuthError::TokenIssue)?;
    let cookie = access_cookie(&state, &access_token)?;

    tracing::info!(user_id = user.id, "Access token renewed");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(RefreshResponse { access_token }),
    )
        .into_response())
}
