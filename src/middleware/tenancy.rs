// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState};

// O nome do nosso cabeçalho HTTP customizado
const RESTAURANT_ID_HEADER: &str = "x-restaurant-id";

// O contexto do tenant: o UUID do restaurante que o usuário quer acessar.
#[derive(Debug, Clone)]
pub struct RestaurantContext(pub Uuid);

/// O guard de tenancy: autentica o usuário, lê o cabeçalho
/// X-Restaurant-ID e confirma que o usuário pertence ao restaurante
/// (tem vínculo com pelo menos um local dele).
pub async fn restaurant_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Autentica (mesma lógica do auth_guard)
    let headers = request.headers();
    let token = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)?;

    let user = app_state.auth_service.validate_token(token).await?;

    // 2. Lê e valida o cabeçalho do tenant
    let restaurant_id = headers
        .get(RESTAURANT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or(AppError::RestaurantNotFound)?;

    // 3. A verificação de autorização mais importante: o usuário
    //    realmente pertence a este restaurante?
    let belongs = app_state
        .assignment_service
        .user_belongs_to_restaurant(user.id, restaurant_id)
        .await?;

    if !belongs {
        return Err(AppError::RestaurantNotFound);
    }

    // 4. Sucesso: insere usuário e contexto nos extensions
    request.extensions_mut().insert(user);
    request.extensions_mut().insert(RestaurantContext(restaurant_id));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for RestaurantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RestaurantContext>()
            .cloned()
            .ok_or(AppError::RestaurantNotFound)
    }
}
