use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::auth::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
    middleware::AuthUser,
    models::SanitizedUser,
    services::metrics::ERRORS_TOTAL,
    startup::AppState,
    utils::{hash_password, verify_password, Password, PasswordHashString, ValidatedJson},
};

/// Register a new user
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = SignupResponse),
        (status = 400, description = "Missing fields or email already registered", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();

    if state.db.find_user_by_email(&email).await?.is_some() {
        tracing::warn!("Signup rejected: email already registered");
        return Err(AppError::BadRequest(anyhow::anyhow!("Email already registered")));
    }

    let hash = hash_password(&Password::new(req.password))?;
    let user = state.db.create_user(req.name.trim(), &email, &hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid email or password", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invalid = || AppError::BadRequest(anyhow::anyhow!("Invalid email or password"));

    let email = req.email.trim().to_lowercase();
    let user = state.db.find_user_by_email(&email).await?.ok_or_else(|| {
        ERRORS_TOTAL.with_label_values(&["login_failed"]).inc();
        invalid()
    })?;

    let stored = PasswordHashString::new(user.password.clone());
    if !verify_password(&Password::new(req.password), &stored)? {
        ERRORS_TOTAL.with_label_values(&["login_failed"]).inc();
        tracing::warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let token = state.jwt.generate_access_token(user.id, &user.email)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.expires_in(),
        user: SanitizedUser::from(user),
    }))
}

/// Current user
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "Authenticated user", body = SanitizedUser),
        (status = 401, description = "Missing or invalid token", body = crate::dtos::ErrorResponse),
        (status = 404, description = "User no longer exists", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let user = state
        .db
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(SanitizedUser::from(user)))
}
