// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload},
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado, token emitido", body = AuthResponse),
        (status = 409, description = "E-mail já em uso"),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validar o payload
    payload.validate()?;

    // 2. Chamar o serviço
    let token = app_state
        .auth_service
        .register_user(&payload.email, &payload.password)
        .await?;

    // 3. Responder com sucesso
    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(AuthResponse { token })))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Dados do usuário autenticado", body = crate::models::auth::User),
    ),
    security(("api_jwt" = [])),
    tag = "Users"
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(user.0)))
}
