use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_name, validate_password};
use crate::store::{Role, User};
use crate::AppState;

/// User record as returned by the API (password hash excluded).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub wallet_address: Option<String>,
    pub token_balance: u64,
    pub enrolled_courses: Vec<String>,
    pub completed_courses: Vec<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            wallet_address: user.wallet_address,
            token_balance: user.token_balance,
            enrolled_courses: user.enrolled_courses.into_iter().collect(),
            completed_courses: user.completed_courses.into_iter().collect(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Register a new account
///
/// POST /api/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&request.name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_email(&request.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&request.password) {
        errors.add("password", e);
    }
    errors.finish()?;

    let (user, token) = state
        .users
        .sign_up(&request.name, &request.email, &request.password)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Open a session for an existing account
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = state.users.sign_in(&request.email, &request.password)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Close the current session
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = extract_token(&headers) {
        state.users.sign_out(&token)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Current user's profile
///
/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Extract the token from request headers
fn extract_token(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first
    if let Some(auth_header) = headers.get("Authorization").and_then(|h| h.to_str().ok()) {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    // Fall back to X-API-Key header
    headers
        .get("X-API-Key")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Constant-time comparison against the configured admin token.
fn is_admin_token(state: &AppState, token: &str) -> bool {
    let admin_token = state.config.auth.admin_token.as_bytes();
    let provided = token.as_bytes();
    admin_token.len() == provided.len() && admin_token.ct_eq(provided).into()
}

/// Synthetic user representing static admin-token auth.
fn system_admin() -> User {
    User {
        id: "system".to_string(),
        name: "System Admin".to_string(),
        email: "system@gradxp.local".to_string(),
        password_hash: String::new(),
        role: Role::Admin,
        wallet_address: None,
        token_balance: 0,
        enrolled_courses: Default::default(),
        completed_courses: Default::default(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Auth middleware that validates tokens on protected routes
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    if is_admin_token(&state, &token) || state.users.authenticate(&token).is_some() {
        return Ok(next.run(request).await);
    }

    Err(ApiError::unauthorized("Invalid or expired token"))
}

/// Extractor resolving the request's bearer token to a user.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

        if is_admin_token(state, &token) {
            return Ok(CurrentUser(system_admin()));
        }

        state
            .users
            .authenticate(&token)
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))
    }
}
